use std::sync::Arc;

use nim_core::{
    GameState, ModelListener, Move, MoveOutcome, NimGame, PileSet, PlayerId,
};
use proptest::prelude::*;

/// A position with at least one pile of `min_size`..=255 sticks, plus the
/// index of a pile to play on.
fn position(min_size: u8) -> impl Strategy<Value = (Vec<u8>, usize)> {
    prop::collection::vec(min_size..=255u8, 1..8).prop_flat_map(|piles| {
        let len = piles.len();
        (Just(piles), 0..len)
    })
}

fn others_unchanged(before: &[u8], after: &[u8], skip: usize, extra: usize) {
    assert_eq!(&before[..skip], &after[..skip]);
    assert_eq!(&before[skip + 1..], &after[skip + 1 + extra..]);
}

proptest! {
    #[test]
    fn right_edge_take_shrinks_to_start(
        (piles, idx, start) in position(2).prop_flat_map(|(piles, idx)| {
            let size = piles[idx];
            (Just(piles), Just(idx), 1..size)
        })
    ) {
        let size = piles[idx];
        let mut set = PileSet::new(piles.clone());
        let outcome = set.apply(Move::new(idx as u8, start, size - start));

        prop_assert_eq!(outcome, Ok(MoveOutcome::Shrunk));
        prop_assert_eq!(set.len(), piles.len());
        prop_assert_eq!(set.get(idx), Some(start));
        others_unchanged(&piles, set.as_slice(), idx, 0);
    }

    #[test]
    fn interior_take_splits_into_two(
        (piles, idx, start, amount) in position(3)
            .prop_flat_map(|(piles, idx)| {
                let size = piles[idx];
                (Just(piles), Just(idx), 1..size - 1)
            })
            .prop_flat_map(|(piles, idx, start)| {
                let size = piles[idx];
                (Just(piles), Just(idx), Just(start), 1..size - start)
            })
    ) {
        let size = piles[idx];
        let mut set = PileSet::new(piles.clone());
        let outcome = set.apply(Move::new(idx as u8, start, amount));

        prop_assert_eq!(outcome, Ok(MoveOutcome::Split));
        prop_assert_eq!(set.len(), piles.len() + 1);
        prop_assert_eq!(set.get(idx), Some(start));
        prop_assert_eq!(set.get(idx + 1), Some(size - start - amount));
        others_unchanged(&piles, set.as_slice(), idx, 1);
    }

    #[test]
    fn whole_pile_take_removes_it((piles, idx) in position(1)) {
        let mut set = PileSet::new(piles.clone());
        let outcome = set.apply(Move::new(idx as u8, 0, piles[idx]));

        prop_assert_eq!(outcome, Ok(MoveOutcome::RemovedPile));
        prop_assert_eq!(set.len(), piles.len() - 1);

        let mut expected = piles.clone();
        expected.remove(idx);
        prop_assert_eq!(set.as_slice(), expected.as_slice());
    }

    #[test]
    fn rejected_moves_leave_position_alone(
        piles in prop::collection::vec(1..=255u8, 0..6),
        pile in any::<u8>(),
        start in any::<u8>(),
        amount in any::<u8>(),
    ) {
        let mut set = PileSet::new(piles.clone());
        if set.apply(Move::new(pile, start, amount)).is_err() {
            prop_assert_eq!(set.as_slice(), piles.as_slice());
        }
    }

    #[test]
    fn turns_strictly_alternate(
        piles in prop::collection::vec(1..=20u8, 1..5),
        moves in prop::collection::vec((0..6u8, 0..20u8, 0..20u8), 1..40),
    ) {
        let mut game = NimGame::new(PileSet::new(piles));
        game.join(PlayerId(1), "one", Arc::new(Silent));
        game.join(PlayerId(2), "two", Arc::new(Silent));

        for (pile, start, amount) in moves {
            if game.state() != GameState::InProgress {
                break;
            }
            let mover = game.current_player().unwrap();
            let before = game.piles().clone();

            game.move_request(mover, Move::new(pile, start, amount));

            if game.state() != GameState::InProgress {
                prop_assert!(game.piles().is_empty());
            } else if game.piles() == &before {
                prop_assert_eq!(game.current_player(), Some(mover));
            } else {
                prop_assert_ne!(game.current_player(), Some(mover));
                prop_assert!(game.current_player().is_some());
            }
        }
    }
}

struct Silent;

impl ModelListener for Silent {
    fn quit(&self) {}
    fn move_made(&self, _piles: &[u8]) {}
    fn waiting_for_other_player(&self) {}
    fn my_turn(&self) {}
    fn other_turn(&self, _player: &str) {}
    fn you_won(&self) {}
    fn other_win(&self, _player: &str) {}
    fn new_game(&self, _piles: &[u8]) {}
}
