//! Low-level wire types and constants.
//!
//! This module defines:
//! - Opcodes for requests and notifications.
//! - Field limits imposed by the layout.
//!
//! The actual encode/decode logic lives in `binary_codec`.
//!
//! Opcodes are ASCII letters. The two directions use separate
//! vocabularies, so `M` is a move request going up and a move-made
//! notification coming down.

/// Request opcodes (client → server).
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RequestOpcode {
    /// Join with a name.
    Join = b'J',

    /// Move: pile, start, amount.
    MoveRequest = b'M',

    /// Restart the game.
    NewGame = b'N',

    /// Leave.
    Quit = b'Q',
}

impl RequestOpcode {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            b'J' => Some(RequestOpcode::Join),
            b'M' => Some(RequestOpcode::MoveRequest),
            b'N' => Some(RequestOpcode::NewGame),
            b'Q' => Some(RequestOpcode::Quit),
            _ => None,
        }
    }
}

/// Notification opcodes (server → client).
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NotificationOpcode {
    /// New position after a move.
    MoveMade = b'M',

    /// No opponent yet.
    WaitingOtherPlayer = b'P',

    /// Your turn.
    MyTurn = b'T',

    /// Opponent's turn (with their name).
    OtherTurn = b'U',

    /// You won.
    YouWon = b'W',

    /// Opponent won (with their name).
    OtherWin = b'O',

    /// Game (re)started with this position.
    NewGame = b'N',

    /// Session over.
    Quit = b'Q',
}

impl NotificationOpcode {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            b'M' => Some(NotificationOpcode::MoveMade),
            b'P' => Some(NotificationOpcode::WaitingOtherPlayer),
            b'T' => Some(NotificationOpcode::MyTurn),
            b'U' => Some(NotificationOpcode::OtherTurn),
            b'W' => Some(NotificationOpcode::YouWon),
            b'O' => Some(NotificationOpcode::OtherWin),
            b'N' => Some(NotificationOpcode::NewGame),
            b'Q' => Some(NotificationOpcode::Quit),
            _ => None,
        }
    }
}

/// Longest string payload in bytes (two-byte length prefix).
pub const MAX_STRING_LEN: usize = u16::MAX as usize;

/// Most piles a position message can carry (one-byte count).
pub const MAX_PILE_COUNT: usize = u8::MAX as usize;
