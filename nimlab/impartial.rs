//! Impartial game theory used as the exact reference for Nim positions.
//!
//! Both players have the same moves, so every position has a Nim value (Grundy value) and the
//! player to move loses exactly when it is zero.

use crate::{board::Board, nimber::Nimber};
use std::{collections::HashMap, hash::Hash};

/// Impartial game
pub trait ImpartialGame: Sized + Clone + Eq + Hash {
    /// Get a list of positions reachable in one move
    fn moves(&self) -> Vec<Self>;

    /// Calculate the Nim value of the position, caching every visited subposition
    fn nim_value(&self, table: &mut GrundyTable<Self>) -> Nimber {
        if let Some(known) = table.lookup_position(self) {
            return known;
        }

        let moves = self.moves();
        let mut game_moves = Vec::with_capacity(moves.len());
        for m in moves {
            game_moves.push(m.nim_value(table));
        }
        let value = Nimber::mex(game_moves);
        table.insert_position(self.clone(), value);
        value
    }

    /// Check if the player to move loses under optimal play by both sides
    fn is_p_position(&self, table: &mut GrundyTable<Self>) -> bool {
        self.nim_value(table).is_zero()
    }
}

impl ImpartialGame for Board {
    fn moves(&self) -> Vec<Self> {
        self.legal_moves()
            .map(|m| {
                let mut next = self.clone();
                next.apply(m);
                next
            })
            .collect()
    }
}

/// Cache of already computed Nim values
#[derive(Debug, Clone)]
pub struct GrundyTable<G> {
    positions: HashMap<G, Nimber, ahash::RandomState>,
}

impl<G> GrundyTable<G>
where
    G: Eq + Hash,
{
    /// Create new empty table
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lookup a position value if exists
    #[inline]
    pub fn lookup_position(&self, position: &G) -> Option<Nimber> {
        self.positions.get(position).copied()
    }

    /// Save position and its Nim value
    #[inline]
    pub fn insert_position(&mut self, position: G, value: Nimber) {
        self.positions.insert(position, value);
    }

    /// Get number of saved positions
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Check if table stores any position
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl<G> Default for GrundyTable<G>
where
    G: Eq + Hash,
{
    #[inline]
    fn default() -> Self {
        Self {
            positions: HashMap::default(),
        }
    }
}
