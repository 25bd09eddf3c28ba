//! Nim played by a family of agents.
//!
//! The [board](crate::board) holds the position and the legal-move generator,
//! the [minimax searcher](crate::search) explores the game tree with a nim-sum
//! heuristic at the depth cutoff, and the [strategies](crate::strategy) range from
//! a random player to a [genetically tuned](crate::genetic_algorithm) player and a
//! tabular [reinforcement learner](crate::strategy::reinforcement).
//! [Games](crate::game) between any two strategies are driven by a single loop.

#![warn(missing_docs)]

pub mod board;
pub mod game;
pub mod genetic_algorithm;
pub mod impartial;
pub mod nimber;
pub mod search;
pub mod strategy;

mod display;
