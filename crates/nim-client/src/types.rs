// crates/nim-client/src/types.rs

use nim_core::Request;
use tokio::sync::mpsc;

/// Instruction for the client's writer task.
#[derive(Debug)]
pub enum WriterCommand {
    /// Encode, write and flush one request.
    Send(Request),

    /// Shut down the write half and stop.
    Close,
}

pub type OutboundTx = mpsc::UnboundedSender<WriterCommand>;
pub type OutboundRx = mpsc::UnboundedReceiver<WriterCommand>;
