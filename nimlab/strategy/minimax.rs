//! Player backed by the minimax searcher

use crate::{
    board::{Board, Move},
    search::{Minimax, SearchStats},
    strategy::Strategy,
};
use rand::RngCore;

/// Plays the move chosen by [`Minimax`]
#[derive(Debug, Clone, Default)]
pub struct MinimaxPlayer {
    searcher: Minimax,
    total_stats: SearchStats,
}

impl MinimaxPlayer {
    /// Create new player with given searcher configuration
    #[inline]
    pub fn new(searcher: Minimax) -> Self {
        Self {
            searcher,
            total_stats: SearchStats::default(),
        }
    }

    /// Underlying searcher
    #[inline]
    pub const fn searcher(&self) -> &Minimax {
        &self.searcher
    }

    /// Counters summed over all searches made so far
    #[inline]
    pub const fn total_stats(&self) -> SearchStats {
        self.total_stats
    }
}

impl Strategy for MinimaxPlayer {
    fn name(&self) -> &str {
        "MinMax system"
    }

    fn decide(&mut self, board: &mut Board, _rng: &mut dyn RngCore) -> Move {
        let (result, stats) = self.searcher.search_with_stats(board);
        self.total_stats.nodes += stats.nodes;
        self.total_stats.cutoffs += stats.cutoffs;
        result.best_move.expect("board is not terminal")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        game::{GameConfig, Seat, play},
        search::TieBreak,
        strategy::expert::ExpertPlayer,
    };
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn full_depth_beats_expert_from_won_start() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut minimax = MinimaxPlayer::new(Minimax::full_depth(TieBreak::FirstFound));
        let mut expert = ExpertPlayer::new();
        let record = play(
            &mut GameConfig::new(3, None).board(),
            [&mut minimax, &mut expert],
            Seat::First,
            &mut rng,
        );
        assert_eq!(record.winner, Seat::First);
        assert!(minimax.total_stats().nodes > 0);
    }

    #[test]
    fn depth_limited_player_finishes_games() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut minimax = MinimaxPlayer::default();
        let mut expert = ExpertPlayer::new();
        let mut board = GameConfig::new(4, Some(4)).board();
        let record = play(&mut board, [&mut expert, &mut minimax], Seat::Second, &mut rng);
        assert!(board.is_terminal());
        assert!(!record.logs[record.winner.index()].moves().is_empty());
    }
}
