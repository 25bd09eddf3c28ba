//! Player following the nim-sum rule

use crate::{
    board::{Board, Move},
    strategy::Strategy,
};
use rand::{RngCore, seq::IndexedRandom};

/// Plays the first move that leaves a balanced position, a random legal move if there is none
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ExpertPlayer;

impl ExpertPlayer {
    /// Create new expert player
    #[inline]
    pub const fn new() -> Self {
        Self
    }

    /// First legal move after which the nim-sum is zero
    pub fn balancing_move(board: &mut Board) -> Option<Move> {
        let moves = board.legal_moves().collect::<Vec<_>>();
        moves.into_iter().find(|&m| {
            board.apply(m);
            let balanced = board.is_balanced();
            board.undo(m);
            balanced
        })
    }
}

impl Strategy for ExpertPlayer {
    fn name(&self) -> &str {
        "Expert system"
    }

    fn decide(&mut self, board: &mut Board, rng: &mut dyn RngCore) -> Move {
        if let Some(m) = Self::balancing_move(board) {
            return m;
        }
        let moves = board.legal_moves().collect::<Vec<_>>();
        *moves.choose(rng).expect("board is not terminal")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        game::{GameConfig, Seat, play, play_many},
        strategy::random::RandomPlayer,
    };
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn balances_when_possible() {
        let mut board = Board::new(3, None);
        let m = ExpertPlayer::balancing_move(&mut board).unwrap();
        assert_eq!(board.piles(), &[1, 3, 5]);
        assert_eq!(m, Move::new(2, 3));
        board.apply(m);
        assert!(board.is_balanced());
    }

    #[test]
    fn falls_back_to_legal_move() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut board = Board::from_piles(vec![1, 2, 3], None);
        assert_eq!(ExpertPlayer::balancing_move(&mut board), None);
        let m = ExpertPlayer::new().decide(&mut board, &mut rng);
        assert!(board.is_legal(m));
        assert_eq!(board.piles(), &[1, 2, 3]);
    }

    #[test]
    fn never_loses_a_won_start() {
        // Staircase start with an odd row count is unbalanced, the starter wins with perfect play
        let mut rng = StdRng::seed_from_u64(11);
        let config = GameConfig::new(5, None);
        let mut expert = ExpertPlayer::new();
        let mut random = RandomPlayer::new();
        for _ in 0..20 {
            let record = play(
                &mut config.board(),
                [&mut expert, &mut random],
                Seat::First,
                &mut rng,
            );
            assert_eq!(record.winner, Seat::First);
        }

        let stats = play_many(&config, 50, [&mut expert, &mut random], &mut rng, |_| {});
        assert!(stats.wins[Seat::First.index()] >= stats.wins[Seat::Second.index()]);
    }
}
