//! nim-client
//!
//! Client side of networked Nim: the remote model proxy, a line-oriented
//! text view, and the command parser the binary feeds it from stdin.

pub mod command;
pub mod model_proxy;
pub mod types;
pub mod view;

pub use command::{Command, CommandError};
pub use model_proxy::{ModelProxy, NotificationDispatcher};
pub use view::{NimView, ViewEvent};
