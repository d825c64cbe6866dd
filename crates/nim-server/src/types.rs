//! Shared types for the Nim TCP server.
//!
//! This module defines:
//! - the command type flowing into a connection's writer task
//! - channel aliases between the engine side and that writer

use nim_core::Notification;
use tokio::sync::mpsc;

/// Instruction for a connection's writer task.
#[derive(Debug)]
pub enum WriterCommand {
    /// Encode, write and flush one notification.
    Send(Notification),

    /// Shut down the write half and stop.
    Close,
}

/// Outbound commands from the engine side to a given connection.
pub type OutboundTx = mpsc::UnboundedSender<WriterCommand>;
pub type OutboundRx = mpsc::UnboundedReceiver<WriterCommand>;
