//! Minimax search over Nim positions.
//!
//! The searcher mutates the board in place and undoes every trial move, so the board passed to
//! [`Minimax::search`] is identical before and after the call. Values are always seen from the
//! searcher's side: [`Value::Win`] means the player to move at the root wins. Normal play is
//! assumed, the player who takes the last object wins.
//!
//! Full Nim trees grow exponentially with pile sizes, so the search can be cut at a fixed depth,
//! where the nim-sum of the position decides the value instead of further recursion.

use crate::board::{Board, Move};
use std::{cmp::Ordering, fmt::Display, num::NonZeroUsize};

/// Ordinal outcome of a line of play from the searcher's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    /// Searcher loses, scored `-1`
    Loss,

    /// Searcher wins, scored `+1`
    Win,
}

impl Value {
    /// Numeric score, `-1` or `+1`
    #[inline]
    pub const fn score(self) -> i8 {
        match self {
            Value::Loss => -1,
            Value::Win => 1,
        }
    }
}

impl From<Value> for i8 {
    fn from(value: Value) -> i8 {
        value.score()
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:+}", self.score())
    }
}

/// Who is to move in the searched position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Perspective {
    /// The searcher is to move and maximizes the value
    Maximizing,

    /// The opponent is to move and minimizes the value
    Minimizing,
}

impl Perspective {
    /// Side to move after one more ply
    #[inline(always)]
    #[must_use]
    pub const fn opposite(self) -> Perspective {
        match self {
            Perspective::Maximizing => Perspective::Minimizing,
            Perspective::Minimizing => Perspective::Maximizing,
        }
    }

    /// Value of a position where the side to move has no move left, i.e. the other side took
    /// the last object
    #[inline]
    pub const fn terminal_value(self) -> Value {
        match self {
            Perspective::Maximizing => Value::Loss,
            Perspective::Minimizing => Value::Win,
        }
    }

    /// Value of a position at the depth cutoff. A balanced position is assumed lost for the side
    /// to move.
    #[inline]
    pub fn heuristic_value(self, board: &Board) -> Value {
        match (self, board.is_balanced()) {
            (Perspective::Maximizing, true) | (Perspective::Minimizing, false) => Value::Loss,
            (Perspective::Maximizing, false) | (Perspective::Minimizing, true) => Value::Win,
        }
    }
}

/// How to choose between moves of equal value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TieBreak {
    /// Keep the first move with the best value in enumeration order
    #[default]
    FirstFound,

    /// Win as fast as possible and lose as slow as possible. The searcher stops at the first move
    /// that empties the board.
    ShallowestWin,
}

/// Chosen move together with its value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SearchResult {
    /// Best move, `None` for terminal positions and positions at the depth cutoff
    pub best_move: Option<Move>,

    /// Value of the position under the chosen line
    pub value: Value,

    /// Depth at which the chosen line was decided, by an empty board or by the cutoff heuristic
    pub resolved_at: usize,
}

/// Counters collected during a single search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchStats {
    /// Number of visited positions, root included
    pub nodes: u64,

    /// Number of positions evaluated with the nim-sum heuristic
    pub cutoffs: u64,
}

/// Depth-limited minimax searcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Minimax {
    max_depth: Option<NonZeroUsize>,
    tie_break: TieBreak,
}

impl Default for Minimax {
    fn default() -> Self {
        Self::new(NonZeroUsize::new(4), TieBreak::FirstFound)
    }
}

impl Minimax {
    /// Create new searcher. `None` depth searches until the board is empty.
    #[inline]
    pub const fn new(max_depth: Option<NonZeroUsize>, tie_break: TieBreak) -> Self {
        Self {
            max_depth,
            tie_break,
        }
    }

    /// Searcher without depth cutoff
    #[inline]
    pub const fn full_depth(tie_break: TieBreak) -> Self {
        Self::new(None, tie_break)
    }

    /// Depth at which the heuristic replaces recursion
    #[inline]
    pub const fn max_depth(&self) -> Option<NonZeroUsize> {
        self.max_depth
    }

    /// Tie-break policy
    #[inline]
    pub const fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    /// Find the best move for the player to move. Board is restored before returning.
    ///
    /// On a non-terminal board the result always carries a move.
    pub fn search(&self, board: &mut Board) -> SearchResult {
        self.search_with_stats(board).0
    }

    /// Like [`Self::search`] but also report how much of the tree was explored
    pub fn search_with_stats(&self, board: &mut Board) -> (SearchResult, SearchStats) {
        let mut stats = SearchStats::default();
        let result = self.search_from(board, Perspective::Maximizing, 0, &mut stats);
        (result, stats)
    }

    fn search_from(
        &self,
        board: &mut Board,
        perspective: Perspective,
        depth: usize,
        stats: &mut SearchStats,
    ) -> SearchResult {
        stats.nodes += 1;

        if perspective == Perspective::Maximizing {
            if let Some(take_all) = single_row_take(board) {
                return SearchResult {
                    best_move: Some(take_all),
                    value: Value::Win,
                    resolved_at: depth + 1,
                };
            }
        }

        let moves = board.legal_moves().collect::<Vec<_>>();
        let Some((&first, rest)) = moves.split_first() else {
            return SearchResult {
                best_move: None,
                value: perspective.terminal_value(),
                resolved_at: depth,
            };
        };

        if self.max_depth.is_some_and(|max_depth| depth >= max_depth.get()) {
            stats.cutoffs += 1;
            return SearchResult {
                best_move: None,
                value: perspective.heuristic_value(board),
                resolved_at: depth,
            };
        }

        let mut best = self.trial(board, first, perspective, depth, stats);
        for &m in rest {
            if self.is_settled(perspective, &best, depth) {
                break;
            }

            let candidate = self.trial(board, m, perspective, depth, stats);
            if self.prefers(perspective, &candidate, &best) {
                best = candidate;
            }
        }
        best
    }

    /// Play `m`, search the reply and take `m` back
    fn trial(
        &self,
        board: &mut Board,
        m: Move,
        perspective: Perspective,
        depth: usize,
        stats: &mut SearchStats,
    ) -> SearchResult {
        board.apply(m);
        let reply = self.search_from(board, perspective.opposite(), depth + 1, stats);
        board.undo(m);

        SearchResult {
            best_move: Some(m),
            value: reply.value,
            resolved_at: reply.resolved_at,
        }
    }

    /// No later sibling can replace `best`. Lines from a node at `depth` resolve at `depth + 1`
    /// at the earliest.
    fn is_settled(&self, perspective: Perspective, best: &SearchResult, depth: usize) -> bool {
        let extremal = match perspective {
            Perspective::Maximizing => Value::Win,
            Perspective::Minimizing => Value::Loss,
        };
        match self.tie_break {
            TieBreak::FirstFound => best.value == extremal,
            TieBreak::ShallowestWin => best.value == extremal && best.resolved_at == depth + 1,
        }
    }

    /// Check if `candidate` should replace `best` for the side to move
    fn prefers(&self, perspective: Perspective, candidate: &SearchResult, best: &SearchResult) -> bool {
        let by_value = match perspective {
            Perspective::Maximizing => candidate.value.cmp(&best.value),
            Perspective::Minimizing => best.value.cmp(&candidate.value),
        };
        match by_value {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => match self.tie_break {
                TieBreak::FirstFound => false,
                TieBreak::ShallowestWin => {
                    let winning = match perspective {
                        Perspective::Maximizing => candidate.value == Value::Win,
                        Perspective::Minimizing => candidate.value == Value::Loss,
                    };
                    if winning {
                        candidate.resolved_at < best.resolved_at
                    } else {
                        candidate.resolved_at > best.resolved_at
                    }
                }
            },
        }
    }
}

/// Taking the whole row when it is the only one left wins on the spot
fn single_row_take(board: &Board) -> Option<Move> {
    let mut rows = board.nonempty_rows();
    let row = rows.next()?;
    if rows.next().is_some() {
        return None;
    }
    let take_all = Move::new(row, board.piles()[row]);
    board.is_legal(take_all).then_some(take_all)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impartial::{GrundyTable, ImpartialGame};
    use itertools::Itertools;
    use quickcheck::QuickCheck;

    fn small_boards(max_total: u32) -> impl Iterator<Item = Board> {
        (1..=3usize).flat_map(move |rows| {
            (0..rows)
                .map(|_| 0..=max_total)
                .multi_cartesian_product()
                .filter(move |piles| piles.iter().sum::<u32>() <= max_total)
                .flat_map(|piles| {
                    [None, Some(2), Some(3), Some(4)]
                        .map(|max_take| Board::from_piles(piles.clone(), max_take))
                })
        })
    }

    #[test]
    fn terminal_board_has_no_move() {
        let mut board = Board::from_piles(vec![0, 0, 0], None);
        let (result, stats) = Minimax::default().search_with_stats(&mut board);
        assert_eq!(result.best_move, None);
        assert_eq!(result.value, Value::Loss);
        assert_eq!(stats.nodes, 1);
        assert_eq!(board.piles(), &[0, 0, 0]);
    }

    #[test]
    fn staircase_three_rows_is_won() {
        for tie_break in [TieBreak::FirstFound, TieBreak::ShallowestWin] {
            let mut board = Board::new(3, None);
            let result = Minimax::full_depth(tie_break).search(&mut board);
            assert_eq!(board.piles(), &[1, 3, 5]);
            assert_eq!(result.value, Value::Win);

            let best_move = result.best_move.unwrap();
            board.apply(best_move);
            assert!(board.is_balanced(), "{} leads to {}", best_move, board);
        }
    }

    #[test]
    fn single_row_is_taken_whole() {
        let mut board = Board::from_piles(vec![0, 0, 5], None);
        let result = Minimax::default().search(&mut board);
        assert_eq!(result.best_move, Some(Move::new(2, 5)));
        assert_eq!(result.value, Value::Win);
        assert_eq!(result.resolved_at, 1);
    }

    #[test]
    fn capped_single_row_is_searched() {
        // Only one object per move, the opponent takes the last one
        let mut board = Board::from_piles(vec![2], Some(2));
        let result = Minimax::full_depth(TieBreak::FirstFound).search(&mut board);
        assert_eq!(result.best_move, Some(Move::new(0, 1)));
        assert_eq!(result.value, Value::Loss);
        assert_eq!(result.resolved_at, 2);
    }

    #[test]
    fn shallowest_win_prefers_short_lines() {
        let mut board = Board::from_piles(vec![2, 2, 3], None);
        let first_found = Minimax::full_depth(TieBreak::FirstFound).search(&mut board);
        assert_eq!(first_found.best_move, Some(Move::new(0, 1)));
        assert_eq!(first_found.value, Value::Win);
        assert_eq!(first_found.resolved_at, 7);

        let shallowest = Minimax::full_depth(TieBreak::ShallowestWin).search(&mut board);
        assert_eq!(shallowest.best_move, Some(Move::new(2, 3)));
        assert_eq!(shallowest.value, Value::Win);
        assert_eq!(shallowest.resolved_at, 5);
        assert_eq!(board.piles(), &[2, 2, 3]);
    }

    #[test]
    fn shallowest_win_delays_losses() {
        let mut board = Board::from_piles(vec![2, 1, 3], None);
        let first_found = Minimax::full_depth(TieBreak::FirstFound).search(&mut board);
        assert_eq!(first_found.value, Value::Loss);

        let shallowest = Minimax::full_depth(TieBreak::ShallowestWin).search(&mut board);
        assert_eq!(shallowest.best_move, Some(Move::new(1, 1)));
        assert_eq!(shallowest.value, Value::Loss);
        assert_eq!(shallowest.resolved_at, 6);
        assert!(shallowest.resolved_at > first_found.resolved_at);
    }

    #[test]
    fn depth_one_moves_to_balanced_position() {
        let mut board = Board::from_piles(vec![1, 2, 4], None);
        let searcher = Minimax::new(NonZeroUsize::new(1), TieBreak::FirstFound);
        let (result, stats) = searcher.search_with_stats(&mut board);
        assert_eq!(result.best_move, Some(Move::new(2, 1)));
        assert_eq!(result.value, Value::Win);
        assert!(stats.cutoffs > 0);
    }

    #[test]
    fn cutoff_heuristic_signs() {
        let balanced = Board::from_piles(vec![1, 2, 3], None);
        let unbalanced = Board::from_piles(vec![1, 2, 4], None);
        assert_eq!(Perspective::Maximizing.heuristic_value(&balanced), Value::Loss);
        assert_eq!(Perspective::Maximizing.heuristic_value(&unbalanced), Value::Win);
        assert_eq!(Perspective::Minimizing.heuristic_value(&balanced), Value::Win);
        assert_eq!(Perspective::Minimizing.heuristic_value(&unbalanced), Value::Loss);
    }

    #[test]
    fn full_depth_is_optimal_on_small_boards() {
        let mut table = GrundyTable::new();
        for tie_break in [TieBreak::FirstFound, TieBreak::ShallowestWin] {
            let searcher = Minimax::full_depth(tie_break);
            for mut board in small_boards(7).filter(|board| !board.is_terminal()) {
                let before = board.clone();
                let result = searcher.search(&mut board);
                assert_eq!(board, before);

                let winning = !board.is_p_position(&mut table);
                assert_eq!(result.value == Value::Win, winning, "{}", board);

                let best_move = result.best_move.unwrap();
                assert!(board.is_legal(best_move));
                if winning {
                    board.apply(best_move);
                    assert!(board.is_p_position(&mut table), "{} after {}", board, best_move);
                }
            }
        }
    }

    #[test]
    fn search_restores_board() {
        let mut qc = QuickCheck::new();
        let test = |board: Board| {
            let mut scratch = board.clone();
            let result = Minimax::default().search(&mut scratch);
            assert_eq!(scratch, board);
            assert_eq!(result.best_move.is_none(), board.is_terminal());
            if let Some(best_move) = result.best_move {
                assert!(board.is_legal(best_move));
            }
        };
        qc.quickcheck(test as fn(Board));
    }
}
