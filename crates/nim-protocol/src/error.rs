//! Error types for the wire protocol and the connections that carry it.

use std::io;

use thiserror::Error;

/// Errors that can arise when encoding/decoding a message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// Buffer holds only part of a message.
    #[error("buffer truncated")]
    Truncated,

    /// First byte is not an opcode of this direction.
    #[error("unknown opcode: {0:#04x}")]
    UnknownOpcode(u8),

    /// String payload is not valid UTF-8.
    #[error("invalid UTF-8 in string field")]
    InvalidString,

    /// String too long for its two-byte length prefix.
    #[error("string of {0} bytes exceeds the 65535-byte limit")]
    StringTooLong(usize),

    /// Position too large for its one-byte pile count.
    #[error("{0} piles exceed the 255-pile limit")]
    TooManyPiles(usize),
}

/// Why a connection's dispatch loop stopped.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// Reading from the socket failed.
    #[error("transport error: {0}")]
    Io(#[from] io::Error),

    /// The peer sent bytes that are not a valid message.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The peer closed the stream in the middle of a message.
    #[error("connection closed with {0} bytes of an incomplete message")]
    ClosedMidMessage(usize),
}
