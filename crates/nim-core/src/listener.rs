//! Listener capabilities for the two directions of the game.
//!
//! Both traits have a local and a remote flavour. The engine only ever
//! sees `dyn ModelListener`, so whether a notification is a direct call
//! or gets encoded onto a socket is decided when a session is wired up.

use std::fmt;

use crate::piles::Move;

/// Identifier for a connected player.
///
/// Opaque; uniqueness is guaranteed over the lifetime of the process by
/// whoever hands them out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Receives game events on behalf of one player (server → client).
///
/// Calls must not block: implementations either act immediately or queue
/// the event for a writer.
pub trait ModelListener: Send + Sync {
    fn quit(&self);

    fn move_made(&self, piles: &[u8]);

    fn waiting_for_other_player(&self);

    fn my_turn(&self);

    /// It is `player`'s turn.
    fn other_turn(&self, player: &str);

    fn you_won(&self);

    /// `player` won the game.
    fn other_win(&self, player: &str);

    fn new_game(&self, piles: &[u8]);
}

/// Receives requests from one player (client → server).
pub trait ViewListener: Send + Sync {
    fn join(&self, name: &str);

    fn move_request(&self, mv: Move);

    fn new_game(&self);

    fn quit(&self);
}
