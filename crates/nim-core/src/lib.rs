//! nim-core
//!
//! Pure Nim game logic:
//! - piles and move arithmetic
//! - listener capabilities for both directions
//! - request / notification messages
//! - the two-player game engine and its shared handle

pub mod error;
pub mod game;
pub mod listener;
pub mod messages;
pub mod piles;
pub mod session;

pub use error::InvalidMove;
pub use game::{GameState, NimGame};
pub use listener::{ModelListener, PlayerId, ViewListener};
pub use messages::{Notification, Request};
pub use piles::{Move, MoveOutcome, PileSet, MAX_PILES};
pub use session::{Seat, SharedGame};
