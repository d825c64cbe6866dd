//! Line-oriented terminal view.
//!
//! `NimView` is the local [`ModelListener`] on the client. It prints what
//! the server reports and remembers whether it is our turn, so the input
//! loop can refuse moves locally.
//! Events the input loop has to act on are forwarded as [`ViewEvent`]s.

use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};

use nim_core::ModelListener;
use tokio::sync::mpsc;
use tracing::debug;

pub const HELP: &str = "\
Command  Example/Description
h        show this help
q        quit the game
n        request new restarted game
P S A    remove A sticks starting at index S from pile P
Commands use 0-based indexing.";

/// Something the input loop must react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewEvent {
    /// We took the last pile.
    Won,

    /// The session is over.
    Quit,
}

struct ViewState {
    out: Box<dyn Write + Send>,
    my_turn: bool,
    quit: bool,
}

pub struct NimView {
    state: Mutex<ViewState>,
    events: mpsc::UnboundedSender<ViewEvent>,
}

impl NimView {
    /// A view printing to stdout.
    pub fn new(events: mpsc::UnboundedSender<ViewEvent>) -> Self {
        Self::with_output(Box::new(io::stdout()), events)
    }

    pub fn with_output(
        out: Box<dyn Write + Send>,
        events: mpsc::UnboundedSender<ViewEvent>,
    ) -> Self {
        NimView {
            state: Mutex::new(ViewState {
                out,
                my_turn: false,
                quit: false,
            }),
            events,
        }
    }

    pub fn is_my_turn(&self) -> bool {
        self.lock().my_turn
    }

    /// Mark our move as sent; the server prompts again if it was rejected.
    pub fn end_turn(&self) {
        self.lock().my_turn = false;
    }

    pub fn print_help(&self) {
        self.lock().line(HELP);
    }

    /// Print a line of local feedback (e.g. a rejected command).
    pub fn say(&self, text: &str) {
        self.lock().line(text);
    }

    fn lock(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: ViewEvent) {
        if self.events.send(event).is_err() {
            debug!(?event, "input loop gone");
        }
    }
}

impl ViewState {
    fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{}", text).and_then(|_| self.out.flush()) {
            debug!("view output: {}", e);
        }
    }

    fn show_piles(&mut self, piles: &[u8]) {
        let row = piles
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        self.line(&format!("Piles: {}", row));
    }
}

impl ModelListener for NimView {
    fn quit(&self) {
        {
            let mut state = self.lock();
            if state.quit {
                return;
            }
            state.quit = true;
            state.my_turn = false;
            state.line("quitting");
        }
        self.emit(ViewEvent::Quit);
    }

    fn move_made(&self, piles: &[u8]) {
        self.lock().show_piles(piles);
    }

    fn waiting_for_other_player(&self) {
        self.lock().line("Waiting for an opponent...");
    }

    fn my_turn(&self) {
        let mut state = self.lock();
        state.my_turn = true;
        let shown = write!(state.out, "Your turn > ").and_then(|_| state.out.flush());
        if let Err(e) = shown {
            debug!("view output: {}", e);
        }
    }

    fn other_turn(&self, player: &str) {
        let mut state = self.lock();
        state.my_turn = false;
        state.line(&format!("{} planning move.", player));
    }

    fn you_won(&self) {
        {
            let mut state = self.lock();
            state.my_turn = false;
            state.line("You win!");
        }
        self.emit(ViewEvent::Won);
    }

    fn other_win(&self, player: &str) {
        let mut state = self.lock();
        state.my_turn = false;
        state.line(&format!("{} wins!", player));
    }

    fn new_game(&self, piles: &[u8]) {
        let mut state = self.lock();
        state.my_turn = false;
        state.line("new game started.");
        state.show_piles(piles);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn view() -> (NimView, Captured, mpsc::UnboundedReceiver<ViewEvent>) {
        let out = Captured::default();
        let (tx, rx) = mpsc::unbounded_channel();
        (NimView::with_output(Box::new(out.clone()), tx), out, rx)
    }

    #[test]
    fn prints_position_and_turns() {
        let (view, out, _rx) = view();

        view.new_game(&[3, 4, 5]);
        view.other_turn("bob");
        view.move_made(&[4, 5]);
        assert!(!view.is_my_turn());
        view.my_turn();

        assert!(view.is_my_turn());
        assert_eq!(
            out.text(),
            "new game started.\nPiles: 3 4 5\nbob planning move.\nPiles: 4 5\nYour turn > "
        );

        view.end_turn();
        assert!(!view.is_my_turn());
    }

    #[test]
    fn win_and_quit_are_forwarded() {
        let (view, out, mut rx) = view();

        view.you_won();
        view.quit();
        view.quit();

        assert_eq!(rx.try_recv(), Ok(ViewEvent::Won));
        assert_eq!(rx.try_recv(), Ok(ViewEvent::Quit));
        assert!(rx.try_recv().is_err());
        assert_eq!(out.text(), "You win!\nquitting\n");
    }

    #[test]
    fn losing_is_announced_by_name() {
        let (view, out, mut rx) = view();

        view.waiting_for_other_player();
        view.other_win("alice");

        assert_eq!(out.text(), "Waiting for an opponent...\nalice wins!\n");
        assert!(rx.try_recv().is_err());
    }
}
