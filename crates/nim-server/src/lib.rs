//! nim-server
//!
//! Async TCP server that pairs connections into two-player Nim games.

pub mod config;
pub mod server;
pub mod types;
pub mod view_proxy;

pub use config::{Config, ConfigError};
pub use server::{NimServer, SessionAcceptor};
pub use view_proxy::{RequestDispatcher, ViewProxy};
