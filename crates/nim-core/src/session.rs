//! Shared access to one game from both players' connections.
//!
//! Both players' dispatch loops call into the same engine, possibly at
//! the same time (a quit racing a move). The whole `NimGame` sits behind
//! a single mutex; every operation, including the notifications it
//! emits, runs inside that critical section.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::game::NimGame;
use crate::listener::{ModelListener, PlayerId, ViewListener};
use crate::piles::{Move, PileSet};

/// Cloneable handle to one mutex-guarded [`NimGame`].
#[derive(Clone, Debug)]
pub struct SharedGame {
    inner: Arc<Mutex<NimGame>>,
}

impl SharedGame {
    pub fn new(piles: PileSet) -> Self {
        SharedGame {
            inner: Arc::new(Mutex::new(NimGame::new(piles))),
        }
    }

    /// Run `f` with exclusive access to the engine.
    pub fn with<R>(&self, f: impl FnOnce(&mut NimGame) -> R) -> R {
        let mut guard = self.lock();
        f(&mut *guard)
    }

    pub fn is_finished(&self) -> bool {
        self.lock().is_finished()
    }

    /// True if both handles refer to the same game.
    pub fn ptr_eq(a: &SharedGame, b: &SharedGame) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }

    /// Bind a connected player to this game.
    ///
    /// The returned [`Seat`] is what that player's requests get
    /// dispatched to; `view` is where the engine sends their
    /// notifications.
    pub fn seat(&self, id: PlayerId, view: Arc<dyn ModelListener>) -> Seat {
        Seat {
            game: self.clone(),
            id,
            view,
        }
    }

    // Poison is ignored; a session keeps running after a listener panic.
    fn lock(&self) -> MutexGuard<'_, NimGame> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// One player's end of a [`SharedGame`].
///
/// Turns the player's requests into engine calls tagged with their id.
pub struct Seat {
    game: SharedGame,
    id: PlayerId,
    view: Arc<dyn ModelListener>,
}

impl ViewListener for Seat {
    fn join(&self, name: &str) {
        let view = Arc::clone(&self.view);
        self.game.with(|g| g.join(self.id, name, view));
    }

    fn move_request(&self, mv: Move) {
        self.game.with(|g| g.move_request(self.id, mv));
    }

    fn new_game(&self) {
        self.game.with(|g| g.new_game());
    }

    fn quit(&self) {
        self.game.with(|g| g.quit());
    }
}
