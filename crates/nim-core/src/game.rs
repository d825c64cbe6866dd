//! Two-player Nim game engine.
//!
//! One `NimGame` is the authoritative state for one session:
//! - records the two players and their notification sinks,
//! - owns the current pile set and whose turn it is,
//! - validates and applies moves,
//! - tells both players what happened.
//!
//! Lifecycle:
//!
//! ```text
//! AwaitingSecondPlayer --second join--> InProgress --last pile taken--> Won
//!                                           ^                            |
//!                                           +--------- new_game ---------+
//! any state --quit--> Finished
//! ```
//!
//! The engine is synchronous and never blocks; callers are expected to
//! serialize access (see [`crate::SharedGame`]).

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::listener::{ModelListener, PlayerId};
use crate::piles::{Move, PileSet};

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    /// Zero or one player has joined.
    AwaitingSecondPlayer,

    /// Both players joined; moves are accepted from the current player.
    InProgress,

    /// The last pile was taken. Only `new_game` or `quit` do anything.
    Won,

    /// A player quit. Absorbing.
    Finished,
}

/// Which of the two seats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    One,
    Two,
}

impl Slot {
    fn other(self) -> Slot {
        match self {
            Slot::One => Slot::Two,
            Slot::Two => Slot::One,
        }
    }
}

struct Player {
    id: PlayerId,
    name: String,
    view: Arc<dyn ModelListener>,
}

/// Authoritative state machine for one Nim session.
pub struct NimGame {
    /// Position every game of this session starts from.
    original: PileSet,

    current: PileSet,

    player_one: Option<Player>,
    player_two: Option<Player>,

    /// Seat to move; `None` unless `state == InProgress`.
    turn: Option<Slot>,

    state: GameState,
}

impl NimGame {
    /// Create a session that will start every game from `piles`.
    pub fn new(piles: PileSet) -> Self {
        NimGame {
            current: piles.clone(),
            original: piles,
            player_one: None,
            player_two: None,
            turn: None,
            state: GameState::AwaitingSecondPlayer,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state == GameState::Finished
    }

    /// Current position.
    pub fn piles(&self) -> &PileSet {
        &self.current
    }

    /// Player whose move it is, if a game is in progress.
    pub fn current_player(&self) -> Option<PlayerId> {
        self.turn.and_then(|slot| self.player(slot)).map(|p| p.id)
    }

    /// A player joins the session.
    ///
    /// The first caller is told to wait; the second starts the game.
    /// Joining a session that already ended gets an immediate QUIT.
    pub fn join(&mut self, id: PlayerId, name: &str, view: Arc<dyn ModelListener>) {
        if self.state == GameState::Finished {
            info!(player = %id, player_name = name, "join after session ended");
            view.quit();
            return;
        }

        if self.state != GameState::AwaitingSecondPlayer {
            warn!(player = %id, player_name = name, state = ?self.state, "join ignored: session already started");
            return;
        }

        let player = Player {
            id,
            name: name.to_string(),
            view,
        };

        match self.player_one.as_ref().map(|p| p.id) {
            None => {
                player.view.waiting_for_other_player();
                info!(player = %id, player_name = name, "waiting for an opponent");
                self.player_one = Some(player);
            }
            Some(first) if first == id => {
                warn!(player = %id, player_name = name, "duplicate join ignored");
            }
            Some(_) => {
                self.player_two = Some(player);
                self.start();
            }
        }
    }

    /// The player `id` asks to make `mv`.
    ///
    /// Invalid moves re-prompt the current player and change nothing.
    /// Requests from the player who is not on turn are dropped.
    pub fn move_request(&mut self, id: PlayerId, mv: Move) {
        if self.state != GameState::InProgress {
            debug!(player = %id, %mv, state = ?self.state, "move ignored: no game in progress");
            return;
        }

        let Some(turn) = self.turn else {
            return;
        };

        if self.player(turn).map(|p| p.id) != Some(id) {
            warn!(player = %id, %mv, "move ignored: not this player's turn");
            return;
        }

        let result = self.current.apply(mv);

        let (Some(mover), Some(opponent)) = (self.player(turn), self.player(turn.other())) else {
            return;
        };

        match result {
            Err(reason) => {
                debug!(player = %id, %mv, %reason, "invalid move, prompting again");
                mover.view.my_turn();
            }
            Ok(_) if self.current.is_empty() => {
                mover.view.you_won();
                opponent.view.other_win(&mover.name);
                info!(
                    "{} vs. {} winner: {}",
                    self.name(Slot::One),
                    self.name(Slot::Two),
                    mover.name
                );
                self.turn = None;
                self.state = GameState::Won;
            }
            Ok(outcome) => {
                debug!(player = %id, %mv, ?outcome, "move accepted");
                self.broadcast_position();
                self.switch_turns(turn);
            }
        }
    }

    /// Restart from the original piles with player one to move.
    pub fn new_game(&mut self) {
        match self.state {
            GameState::InProgress | GameState::Won => {
                self.start();
                info!("{} vs. {}  restarting game", self.name(Slot::One), self.name(Slot::Two));
            }
            GameState::AwaitingSecondPlayer | GameState::Finished => {
                debug!(state = ?self.state, "new game ignored");
            }
        }
    }

    /// End the session for both players.
    pub fn quit(&mut self) {
        if self.state == GameState::Finished {
            return;
        }

        for player in [&self.player_one, &self.player_two].into_iter().flatten() {
            player.view.quit();
        }

        self.turn = None;
        self.state = GameState::Finished;
        info!("{} vs. {}  ending game", self.name(Slot::One), self.name(Slot::Two));
    }

    // -------------------------------------------------------------------------
    // Internal helpers
    // -------------------------------------------------------------------------

    fn player(&self, slot: Slot) -> Option<&Player> {
        match slot {
            Slot::One => self.player_one.as_ref(),
            Slot::Two => self.player_two.as_ref(),
        }
    }

    fn name(&self, slot: Slot) -> &str {
        self.player(slot).map(|p| p.name.as_str()).unwrap_or("<none>")
    }

    /// Reset the position and tell both players a game started.
    fn start(&mut self) {
        let (Some(one), Some(two)) = (&self.player_one, &self.player_two) else {
            return;
        };

        self.current = self.original.clone();
        self.turn = Some(Slot::One);
        self.state = GameState::InProgress;

        let piles = self.current.as_slice();
        one.view.new_game(piles);
        two.view.new_game(piles);
        one.view.my_turn();
        two.view.other_turn(&one.name);

        info!(piles = %self.current, "{} vs. {}  start game", one.name, two.name);
    }

    fn broadcast_position(&self) {
        let piles = self.current.as_slice();
        for player in [&self.player_one, &self.player_two].into_iter().flatten() {
            player.view.move_made(piles);
        }
        info!(
            "{} vs. {} new state: {}",
            self.name(Slot::One),
            self.name(Slot::Two),
            self.current
        );
    }

    /// Hand the turn from `from` to the other seat and notify both.
    fn switch_turns(&mut self, from: Slot) {
        let next = from.other();
        self.turn = Some(next);

        let (Some(to_move), Some(waiting)) = (self.player(next), self.player(from)) else {
            return;
        };
        waiting.view.other_turn(&to_move.name);
        to_move.view.my_turn();

        info!(
            "{} vs. {} whose turn: {}",
            self.name(Slot::One),
            self.name(Slot::Two),
            to_move.name
        );
    }
}

impl std::fmt::Debug for NimGame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NimGame")
            .field("original", &self.original)
            .field("current", &self.current)
            .field("player_one", &self.player_one.as_ref().map(|p| &p.name))
            .field("player_two", &self.player_two.as_ref().map(|p| &p.name))
            .field("turn", &self.turn)
            .field("state", &self.state)
            .finish()
    }
}
