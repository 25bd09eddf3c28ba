//! Players that decide moves on a Nim board

use crate::board::{Board, Move};
use rand::RngCore;

pub mod expert;
pub mod minimax;
pub mod random;
pub mod reinforcement;
pub mod tunable;

/// A Nim player
pub trait Strategy {
    /// Human readable name used in reports
    fn name(&self) -> &str;

    /// Choose a legal move on a non-terminal board.
    ///
    /// The board may be changed while deciding but must be left as it was given.
    fn decide(&mut self, board: &mut Board, rng: &mut dyn RngCore) -> Move;

    /// Called once after every finished game
    fn end_episode(&mut self) {}
}
