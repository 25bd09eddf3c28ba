//! Tabular reinforcement learner.
//!
//! The agent keeps an estimate of the long-term value of every pile configuration it has seen.
//! It picks the reachable configuration with the highest estimate, except for a decaying
//! fraction of moves where it explores a random one. After each game the rewards collected along
//! the way are propagated backwards through the visited configurations.

use crate::{
    board::{Board, Move},
    strategy::Strategy,
};
use rand::{Rng, RngCore, seq::IndexedRandom};
use std::collections::HashMap;

/// Amount by which the exploration probability shrinks after every episode
pub const RANDOM_FACTOR_DECAY: f64 = 1e-4;

/// Pile sizes after a move, the key of the value table
pub type State = Vec<u32>;

/// Learning player
#[derive(Debug, Clone)]
pub struct Agent {
    values: HashMap<State, f64, ahash::RandomState>,
    history: Vec<(State, f64)>,
    alpha: f64,
    random_factor: f64,
}

impl Default for Agent {
    fn default() -> Self {
        Self::new(0.1, 0.4)
    }
}

impl Agent {
    /// Create new agent with learning rate `alpha` and exploration probability `random_factor`
    pub fn new(alpha: f64, random_factor: f64) -> Self {
        Self {
            values: HashMap::default(),
            history: Vec::new(),
            alpha,
            random_factor,
        }
    }

    /// Learning rate
    #[inline]
    pub const fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Current probability of making an exploratory move
    #[inline]
    pub const fn random_factor(&self) -> f64 {
        self.random_factor
    }

    /// Value estimate of a configuration, if it was ever seen
    #[inline]
    pub fn value(&self, state: &[u32]) -> Option<f64> {
        self.values.get(state).copied()
    }

    /// Number of configurations with an estimate
    #[inline]
    pub fn known_states(&self) -> usize {
        self.values.len()
    }

    /// Configurations visited in the current episode with their rewards
    #[inline]
    pub fn history(&self) -> &[(State, f64)] {
        &self.history
    }

    /// Estimate of `state`, initialized at random on first sight
    fn estimate(&mut self, state: &State, rng: &mut dyn RngCore) -> f64 {
        if let Some(&value) = self.values.get(state) {
            return value;
        }
        let value = rng.random_range(0.1..1.0);
        self.values.insert(state.clone(), value);
        value
    }

    /// Record a visited configuration. Reaching the empty board is worth `0`, any other step `-1`.
    pub fn update_state_history(&mut self, state: State) {
        let reward = if state.iter().all(|&pile| pile == 0) {
            0.0
        } else {
            -1.0
        };
        self.history.push((state, reward));
    }

    /// Propagate rewards of the finished episode backwards, then forget the episode and explore a
    /// bit less
    pub fn learn(&mut self) {
        let mut target = 0.0;
        for (state, reward) in self.history.drain(..).rev() {
            let value = self.values.entry(state).or_default();
            *value += self.alpha * (target - *value);
            target += reward;
        }
        self.random_factor = (self.random_factor - RANDOM_FACTOR_DECAY).max(0.0);
    }
}

impl Strategy for Agent {
    fn name(&self) -> &str {
        "RL system"
    }

    fn decide(&mut self, board: &mut Board, rng: &mut dyn RngCore) -> Move {
        let options = board
            .legal_moves()
            .map(|m| {
                let mut state = board.piles().to_vec();
                state[m.row] -= m.count;
                (m, state)
            })
            .collect::<Vec<_>>();

        let (m, state) = if rng.random::<f64>() < self.random_factor {
            let (m, state) = options.choose(rng).expect("board is not terminal").clone();
            self.estimate(&state, rng);
            (m, state)
        } else {
            let mut best = None;
            for (m, state) in options {
                let value = self.estimate(&state, rng);
                if best.as_ref().is_none_or(|(_, _, best_value)| value >= *best_value) {
                    best = Some((m, state, value));
                }
            }
            let (m, state, _) = best.expect("board is not terminal");
            (m, state)
        };

        self.update_state_history(state);
        m
    }

    fn end_episode(&mut self) {
        self.learn();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameConfig, Seat, TRAINING_WINDOW, train};
    use crate::strategy::random::RandomPlayer;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn learn_updates_backwards() {
        let mut agent = Agent::new(0.5, 0.4);
        agent.values.insert(vec![2, 1], 1.0);
        agent.values.insert(vec![1, 0], 0.5);
        agent.values.insert(vec![0, 0], 0.2);
        agent.update_state_history(vec![2, 1]);
        agent.update_state_history(vec![1, 0]);
        agent.update_state_history(vec![0, 0]);
        assert_eq!(agent.history()[2].1, 0.0);
        assert_eq!(agent.history()[0].1, -1.0);

        agent.learn();

        // target: 0 for [0 0], then 0 for [1 0], then -1 for [2 1]
        assert_eq!(agent.value(&[0, 0]), Some(0.1));
        assert_eq!(agent.value(&[1, 0]), Some(0.25));
        assert_eq!(agent.value(&[2, 1]), Some(0.0));
        assert!(agent.history().is_empty());
        assert!((agent.random_factor() - (0.4 - RANDOM_FACTOR_DECAY)).abs() < 1e-12);
    }

    #[test]
    fn greedy_choice_follows_estimates() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut agent = Agent::new(0.1, 0.0);
        let mut board = Board::from_piles(vec![1, 2], None);
        agent.values.insert(vec![0, 2], 0.0);
        agent.values.insert(vec![1, 1], 5.0);
        agent.values.insert(vec![1, 0], 0.0);

        let m = agent.decide(&mut board, &mut rng);
        assert_eq!(m, Move::new(1, 1));
        assert_eq!(board.piles(), &[1, 2]);
        assert_eq!(agent.history(), &[(vec![1, 1], -1.0)]);
    }

    #[test]
    fn unseen_states_are_initialized() {
        let mut rng = StdRng::seed_from_u64(12);
        let mut agent = Agent::new(0.1, 1.0);
        let mut board = Board::new(3, None);
        let m = agent.decide(&mut board, &mut rng);
        board.apply(m);
        let value = agent.value(board.piles()).unwrap();
        assert!((0.1..1.0).contains(&value));
    }

    #[test]
    fn exploration_decays_during_training() {
        let mut rng = StdRng::seed_from_u64(21);
        let mut agent = Agent::default();
        let stats = train(
            &mut agent,
            &mut RandomPlayer::new(),
            &GameConfig::new(3, None),
            2 * TRAINING_WINDOW,
            &mut rng,
            |_| {},
        );
        assert_eq!(stats.games, 2 * TRAINING_WINDOW);
        assert!(stats.wins[Seat::First.index()] > 0);
        assert!((agent.random_factor() - (0.4 - 100.0 * RANDOM_FACTOR_DECAY)).abs() < 1e-9);
        assert!(agent.known_states() > 0);
        assert!(agent.history().is_empty());
    }
}
