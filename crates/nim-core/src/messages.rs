//! Message types exchanged between players and the game engine.
//!
//! These are **transport-agnostic** logical messages:
//! - [`Request`]: what a player asks of the server.
//! - [`Notification`]: what the server tells a player.
//!
//! Each message maps one-to-one onto a method of the corresponding
//! listener trait; `deliver` performs that call. Binary encoders live in
//! the `nim-protocol` crate; this module is purely logical.

use crate::listener::{ModelListener, ViewListener};
use crate::piles::Move;

/// A player → server request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Join (or create) a session under this display name.
    Join { name: String },

    /// Propose a move for the current position.
    MoveRequest(Move),

    /// Restart the session from the original piles.
    NewGame,

    /// Leave the session.
    Quit,
}

/// A server → player notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Authoritative position after an accepted move.
    MoveMade(Vec<u8>),

    /// No opponent has joined yet.
    WaitingForOtherPlayer,

    /// It is this player's turn (also sent to re-prompt after an invalid move).
    MyTurn,

    /// It is the named opponent's turn.
    OtherTurn(String),

    /// This player took the last pile.
    YouWon,

    /// The named opponent took the last pile.
    OtherWin(String),

    /// A game (re)started from this position.
    NewGame(Vec<u8>),

    /// The session is over.
    Quit,
}

impl Request {
    /// Invoke the matching method on `listener`.
    pub fn deliver(self, listener: &dyn ViewListener) {
        match self {
            Request::Join { name } => listener.join(&name),
            Request::MoveRequest(mv) => listener.move_request(mv),
            Request::NewGame => listener.new_game(),
            Request::Quit => listener.quit(),
        }
    }
}

impl Notification {
    /// Invoke the matching method on `listener`.
    pub fn deliver(self, listener: &dyn ModelListener) {
        match self {
            Notification::MoveMade(piles) => listener.move_made(&piles),
            Notification::WaitingForOtherPlayer => listener.waiting_for_other_player(),
            Notification::MyTurn => listener.my_turn(),
            Notification::OtherTurn(name) => listener.other_turn(&name),
            Notification::YouWon => listener.you_won(),
            Notification::OtherWin(name) => listener.other_win(&name),
            Notification::NewGame(piles) => listener.new_game(&piles),
            Notification::Quit => listener.quit(),
        }
    }
}
