//! Nim board and its legal moves

use crate::{display, nimber::Nimber};
use std::fmt::{self, Display};

/// Single move: take `count` objects from row `row`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Move {
    /// Index of the row
    pub row: usize,

    /// Number of objects removed, at least one
    pub count: u32,
}

impl Move {
    /// Construct new move
    #[inline]
    pub const fn new(row: usize, count: u32) -> Self {
        Self { row, count }
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} items from row {}", self.count, self.row)
    }
}

/// Largest staircase accepted by [`Board::new`]
pub const MAX_STAIRCASE_ROWS: usize = 1 << 31;

/// Nim position: ordered piles and an optional cap on objects taken per move
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Board {
    piles: Vec<u32>,

    // Exclusive upper bound on objects per move. Invariant: greater than 1
    max_take: Option<u32>,
}

impl Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        display::brackets(f, |f| display::spaces(f, &self.piles))?;
        if let Some(max_take) = self.max_take {
            write!(f, " (take < {})", max_take)?;
        }
        Ok(())
    }
}

impl Board {
    /// Staircase starting position, row `i` holds `2 * i + 1` objects
    ///
    /// # Panics
    /// - `rows` exceeds [`MAX_STAIRCASE_ROWS`], the last pile would not fit in `u32`
    /// - `max_take` is `Some(0)` or `Some(1)`, no move would ever be legal
    pub fn new(rows: usize, max_take: Option<u32>) -> Self {
        let rows = u32::try_from(rows)
            .ok()
            .filter(|&rows| rows as usize <= MAX_STAIRCASE_ROWS)
            .unwrap_or_else(|| panic!("Staircase cannot have {} rows", rows));
        Self::from_piles((0..rows).map(|i| 2 * i + 1).collect(), max_take)
    }

    /// Arbitrary position
    ///
    /// # Panics
    /// - `max_take` is `Some(0)` or `Some(1)`, no move would ever be legal
    pub fn from_piles(piles: Vec<u32>, max_take: Option<u32>) -> Self {
        assert!(
            max_take.is_none_or(|max_take| max_take > 1),
            "max_take must allow taking at least one object"
        );
        Self { piles, max_take }
    }

    /// Pile sizes, one per row
    #[inline]
    pub fn piles(&self) -> &[u32] {
        &self.piles
    }

    /// Exclusive cap on objects removed in a single move, if any
    #[inline]
    pub const fn max_take(&self) -> Option<u32> {
        self.max_take
    }

    /// Number of rows, including empty ones
    #[inline]
    pub fn rows(&self) -> usize {
        self.piles.len()
    }

    /// Total number of objects left on the board
    #[inline]
    pub fn total(&self) -> u32 {
        self.piles.iter().sum()
    }

    /// Largest number of objects that can be taken from `row` in one move, zero if the row is
    /// empty
    #[inline]
    pub fn max_count(&self, row: usize) -> u32 {
        let pile = self.piles[row];
        self.max_take
            .map_or(pile, |max_take| pile.min(max_take - 1))
    }

    /// Check if move can be played in the current position
    #[inline]
    pub fn is_legal(&self, m: Move) -> bool {
        m.row < self.rows() && m.count >= 1 && m.count <= self.max_count(m.row)
    }

    /// Remove `count` objects from `row`
    ///
    /// # Panics
    /// - Row holds fewer than `count` objects
    /// - `count` is not below the per-move cap
    #[inline]
    pub fn remove(&mut self, row: usize, count: u32) {
        assert!(
            self.piles[row] >= count,
            "Cannot take {} objects from row {} holding {}",
            count,
            row,
            self.piles[row]
        );
        assert!(
            self.max_take.is_none_or(|max_take| count < max_take),
            "Cannot take {} objects at once, cap is {:?}",
            count,
            self.max_take
        );
        self.piles[row] -= count;
    }

    /// Put back `count` objects into `row`. Inverse of [`Self::remove`], not checked.
    #[inline]
    pub fn add(&mut self, row: usize, count: u32) {
        self.piles[row] += count;
    }

    /// [`Self::remove`] taking a [`Move`]
    #[inline]
    pub fn apply(&mut self, m: Move) {
        self.remove(m.row, m.count);
    }

    /// [`Self::add`] taking a [`Move`]
    #[inline]
    pub fn undo(&mut self, m: Move) {
        self.add(m.row, m.count);
    }

    /// Check if all rows are empty, i.e. the previous player has taken the last object
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.piles.iter().all(|&pile| pile == 0)
    }

    /// Xor of all pile sizes
    #[inline]
    pub fn nim_sum(&self) -> Nimber {
        self.piles.iter().copied().map(Nimber::new).sum()
    }

    /// Check if nim-sum is zero. Without a cap such position is lost for the player to move.
    #[inline]
    pub fn is_balanced(&self) -> bool {
        self.nim_sum().is_zero()
    }

    /// All legal moves, row by row and by increasing count.
    ///
    /// The iterator borrows the board, collect it before mutating.
    pub fn legal_moves(&self) -> impl Iterator<Item = Move> + '_ {
        (0..self.rows())
            .flat_map(move |row| (1..=self.max_count(row)).map(move |count| Move::new(row, count)))
    }

    /// Indices of rows that still hold objects
    pub fn nonempty_rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.piles
            .iter()
            .enumerate()
            .filter(|(_, pile)| **pile > 0)
            .map(|(row, _)| row)
    }

    /// Row with the most objects, first one on ties. `None` if board is terminal
    pub fn longest_row(&self) -> Option<usize> {
        self.nonempty_rows()
            .fold(None, |best: Option<usize>, row| match best {
                Some(best) if self.piles[best] >= self.piles[row] => Some(best),
                _ => Some(row),
            })
    }

    /// Nonempty row with the fewest objects, first one on ties. `None` if board is terminal
    pub fn shortest_row(&self) -> Option<usize> {
        self.nonempty_rows()
            .fold(None, |best: Option<usize>, row| match best {
                Some(best) if self.piles[best] <= self.piles[row] => Some(best),
                _ => Some(row),
            })
    }
}

#[cfg(any(test, feature = "quickcheck"))]
mod arbitrary {
    use super::Board;
    use quickcheck::{Arbitrary, Gen};

    impl Arbitrary for Board {
        fn arbitrary(g: &mut Gen) -> Self {
            let rows = usize::arbitrary(g) % 4 + 1;
            let piles = (0..rows).map(|_| u32::arbitrary(g) % 7).collect();
            let max_take = if u8::arbitrary(g) % 3 == 0 {
                Some(u32::arbitrary(g) % 4 + 2)
            } else {
                None
            };
            Board::from_piles(piles, max_take)
        }

        fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
            let max_take = self.max_take;
            Box::new(
                self.piles
                    .clone()
                    .shrink()
                    .filter(|piles| !piles.is_empty())
                    .map(move |piles| Board::from_piles(piles, max_take)),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::QuickCheck;

    #[test]
    fn staircase_start() {
        let board = Board::new(4, None);
        assert_eq!(board.piles(), &[1, 3, 5, 7]);
        assert_eq!(board.total(), 16);
        assert_eq!(board.to_string(), "[1 3 5 7]");
        assert_eq!(Board::new(2, Some(3)).to_string(), "[1 3] (take < 3)");
    }

    #[test]
    fn legal_moves_are_enumerated_in_order() {
        let board = Board::from_piles(vec![2, 0, 1], None);
        assert_eq!(
            board.legal_moves().collect::<Vec<_>>(),
            vec![Move::new(0, 1), Move::new(0, 2), Move::new(2, 1)]
        );

        let capped = Board::from_piles(vec![4, 1], Some(3));
        assert_eq!(
            capped.legal_moves().collect::<Vec<_>>(),
            vec![Move::new(0, 1), Move::new(0, 2), Move::new(1, 1)]
        );
    }

    #[test]
    fn longest_and_shortest_rows() {
        let board = Board::from_piles(vec![0, 3, 5, 1, 5, 1], None);
        assert_eq!(board.longest_row(), Some(2));
        assert_eq!(board.shortest_row(), Some(3));
        assert_eq!(Board::from_piles(vec![0, 0], None).longest_row(), None);
    }

    #[test]
    fn balanced_positions() {
        assert!(!Board::new(3, None).is_balanced());
        assert!(Board::from_piles(vec![1, 2, 3], None).is_balanced());
        assert!(Board::from_piles(vec![0, 0, 0], None).is_balanced());
    }

    #[test]
    #[should_panic]
    fn removing_too_much_panics() {
        Board::new(2, None).remove(0, 2);
    }

    #[test]
    #[should_panic]
    fn removing_at_cap_panics() {
        Board::new(3, Some(3)).remove(2, 3);
    }

    #[test]
    #[should_panic]
    fn oversized_staircase_panics() {
        let _ = Board::new(MAX_STAIRCASE_ROWS + 1, None);
    }

    #[test]
    fn legal_moves_respect_bounds() {
        let mut qc = QuickCheck::new();
        let test = |board: Board| {
            let moves = board.legal_moves().collect::<Vec<_>>();
            assert_eq!(moves.is_empty(), board.is_terminal());
            for m in moves {
                assert!(m.count >= 1 && m.count <= board.piles()[m.row]);
                if let Some(max_take) = board.max_take() {
                    assert!(m.count < max_take);
                }
                assert!(board.is_legal(m));
            }
        };
        qc.quickcheck(test as fn(Board));
    }

    #[test]
    fn undo_restores_board() {
        let mut qc = QuickCheck::new();
        let test = |board: Board| {
            let mut scratch = board.clone();
            for m in board.legal_moves() {
                scratch.apply(m);
                scratch.undo(m);
                assert_eq!(scratch, board);
            }
        };
        qc.quickcheck(test as fn(Board));
    }

    #[test]
    fn balanced_iff_xor_is_zero() {
        let mut qc = QuickCheck::new();
        let test = |board: Board| {
            let xor = board.piles().iter().fold(0, |acc, pile| acc ^ pile);
            assert_eq!(board.is_balanced(), xor == 0);
        };
        qc.quickcheck(test as fn(Board));
    }
}
