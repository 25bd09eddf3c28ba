//! Player picking a random row and a random amount from it

use crate::{
    board::{Board, Move},
    strategy::Strategy,
};
use rand::{Rng, RngCore, seq::IndexedRandom};

/// Uniformly picks a nonempty row, then uniformly picks how many objects to take from it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RandomPlayer;

impl RandomPlayer {
    /// Create new random player
    #[inline]
    pub const fn new() -> Self {
        Self
    }
}

impl Strategy for RandomPlayer {
    fn name(&self) -> &str {
        "Random player"
    }

    fn decide(&mut self, board: &mut Board, rng: &mut dyn RngCore) -> Move {
        let rows = board.nonempty_rows().collect::<Vec<_>>();
        let row = *rows.choose(rng).expect("board is not terminal");
        Move::new(row, rng.random_range(1..=board.max_count(row)))
    }
}
