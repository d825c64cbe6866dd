//! Binary encoding/decoding for Nim messages.
//!
//! This module converts between:
//! - raw bytes read from / written to a stream
//! - high-level `nim_core::Request` / `Notification`
//!
//! Layout (no framing beyond the opcode; every field has a fixed or
//! self-describing size):
//!
//! ```text
//! Requests (client → server)
//! --------------------------
//! J  : [0] 'J'  [1..3] name_len (u16 BE)  [3..] name (UTF-8)
//! M  : [0] 'M'  [1] pile (u8)  [2] start (u8)  [3] amount (u8)
//! N  : [0] 'N'
//! Q  : [0] 'Q'
//!
//! Notifications (server → client)
//! -------------------------------
//! M  : [0] 'M'  [1] count (u8)  [2..2+count] pile sizes (u8 each)
//! P  : [0] 'P'
//! T  : [0] 'T'
//! U  : [0] 'U'  [1..3] name_len (u16 BE)  [3..] name (UTF-8)
//! W  : [0] 'W'
//! O  : [0] 'O'  [1..3] name_len (u16 BE)  [3..] name (UTF-8)
//! N  : [0] 'N'  [1] count (u8)  [2..2+count] pile sizes (u8 each)
//! Q  : [0] 'Q'
//! ```
//!
//! Because messages are not length-prefixed, the decoders work on a
//! growing read buffer: they return `Ok(None)` until the buffer holds a
//! complete message, then the message and how many bytes it used. An
//! unknown opcode is reported as soon as the first byte is available.

use nim_core::{Move, Notification, Request};

use crate::error::ProtocolError;
use crate::wire_types::{MAX_PILE_COUNT, MAX_STRING_LEN, NotificationOpcode, RequestOpcode};

// ============================================================================
// REQUESTS: client → server
// ============================================================================

/// Encode a single request.
///
/// The encoded bytes are appended to `out`.
pub fn encode_request(msg: &Request, out: &mut Vec<u8>) -> Result<(), ProtocolError> {
    match msg {
        Request::Join { name } => {
            out.push(RequestOpcode::Join as u8);
            put_string(name, out)?;
        }
        Request::MoveRequest(mv) => {
            out.push(RequestOpcode::MoveRequest as u8);
            out.extend_from_slice(&[mv.pile, mv.start, mv.amount]);
        }
        Request::NewGame => out.push(RequestOpcode::NewGame as u8),
        Request::Quit => out.push(RequestOpcode::Quit as u8),
    }
    Ok(())
}

/// Decode one request from the front of `buf`.
///
/// Returns `Ok(None)` if `buf` does not yet hold a complete request.
pub fn decode_request(buf: &[u8]) -> Result<Option<(Request, usize)>, ProtocolError> {
    decode_with(buf, |r| {
        let opcode = r.u8()?;
        let op = RequestOpcode::from_u8(opcode).ok_or(ProtocolError::UnknownOpcode(opcode))?;

        Ok(match op {
            RequestOpcode::Join => Request::Join { name: r.string()? },
            RequestOpcode::MoveRequest => {
                let pile = r.u8()?;
                let start = r.u8()?;
                let amount = r.u8()?;
                Request::MoveRequest(Move { pile, start, amount })
            }
            RequestOpcode::NewGame => Request::NewGame,
            RequestOpcode::Quit => Request::Quit,
        })
    })
}

// ============================================================================
// NOTIFICATIONS: server → client
// ============================================================================

/// Encode a single notification.
///
/// The encoded bytes are appended to `out`.
pub fn encode_notification(msg: &Notification, out: &mut Vec<u8>) -> Result<(), ProtocolError> {
    match msg {
        Notification::MoveMade(piles) => {
            out.push(NotificationOpcode::MoveMade as u8);
            put_piles(piles, out)?;
        }
        Notification::WaitingForOtherPlayer => {
            out.push(NotificationOpcode::WaitingOtherPlayer as u8);
        }
        Notification::MyTurn => out.push(NotificationOpcode::MyTurn as u8),
        Notification::OtherTurn(name) => {
            out.push(NotificationOpcode::OtherTurn as u8);
            put_string(name, out)?;
        }
        Notification::YouWon => out.push(NotificationOpcode::YouWon as u8),
        Notification::OtherWin(name) => {
            out.push(NotificationOpcode::OtherWin as u8);
            put_string(name, out)?;
        }
        Notification::NewGame(piles) => {
            out.push(NotificationOpcode::NewGame as u8);
            put_piles(piles, out)?;
        }
        Notification::Quit => out.push(NotificationOpcode::Quit as u8),
    }
    Ok(())
}

/// Decode one notification from the front of `buf`.
///
/// Returns `Ok(None)` if `buf` does not yet hold a complete notification.
pub fn decode_notification(buf: &[u8]) -> Result<Option<(Notification, usize)>, ProtocolError> {
    decode_with(buf, |r| {
        let opcode = r.u8()?;
        let op =
            NotificationOpcode::from_u8(opcode).ok_or(ProtocolError::UnknownOpcode(opcode))?;

        Ok(match op {
            NotificationOpcode::MoveMade => Notification::MoveMade(r.piles()?),
            NotificationOpcode::WaitingOtherPlayer => Notification::WaitingForOtherPlayer,
            NotificationOpcode::MyTurn => Notification::MyTurn,
            NotificationOpcode::OtherTurn => Notification::OtherTurn(r.string()?),
            NotificationOpcode::YouWon => Notification::YouWon,
            NotificationOpcode::OtherWin => Notification::OtherWin(r.string()?),
            NotificationOpcode::NewGame => Notification::NewGame(r.piles()?),
            NotificationOpcode::Quit => Notification::Quit,
        })
    })
}

// -----------------------------------------------------------------------------
// Helpers
// -----------------------------------------------------------------------------

fn put_string(s: &str, out: &mut Vec<u8>) -> Result<(), ProtocolError> {
    let bytes = s.as_bytes();
    if bytes.len() > MAX_STRING_LEN {
        return Err(ProtocolError::StringTooLong(bytes.len()));
    }
    out.extend_from_slice(&(bytes.len() as u16).to_be_bytes());
    out.extend_from_slice(bytes);
    Ok(())
}

fn put_piles(piles: &[u8], out: &mut Vec<u8>) -> Result<(), ProtocolError> {
    if piles.len() > MAX_PILE_COUNT {
        return Err(ProtocolError::TooManyPiles(piles.len()));
    }
    out.push(piles.len() as u8);
    out.extend_from_slice(piles);
    Ok(())
}

/// Run a decoder over `buf`, turning `Truncated` into "not yet".
fn decode_with<T>(
    buf: &[u8],
    decode: impl FnOnce(&mut Reader<'_>) -> Result<T, ProtocolError>,
) -> Result<Option<(T, usize)>, ProtocolError> {
    let mut reader = Reader { buf, pos: 0 };
    match decode(&mut reader) {
        Ok(msg) => Ok(Some((msg, reader.pos))),
        Err(ProtocolError::Truncated) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Forward-only cursor over a read buffer.
struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8], ProtocolError> {
        let end = self.pos + n;
        let bytes = self.buf.get(self.pos..end).ok_or(ProtocolError::Truncated)?;
        self.pos = end;
        Ok(bytes)
    }

    fn u8(&mut self) -> Result<u8, ProtocolError> {
        Ok(self.take(1)?[0])
    }

    fn u16_be(&mut self) -> Result<u16, ProtocolError> {
        let bytes = self.take(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    fn string(&mut self) -> Result<String, ProtocolError> {
        let len = usize::from(self.u16_be()?);
        let bytes = self.take(len)?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| ProtocolError::InvalidString)
    }

    fn piles(&mut self) -> Result<Vec<u8>, ProtocolError> {
        let count = usize::from(self.u8()?);
        Ok(self.take(count)?.to_vec())
    }
}
