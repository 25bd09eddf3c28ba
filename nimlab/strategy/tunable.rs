//! Player driven by three integer parameters, tuned with a [genetic algorithm](crate::genetic_algorithm)

use crate::{
    board::{Board, Move},
    game::{GameConfig, Seat, play_many},
    genetic_algorithm::Algorithm,
    strategy::{Strategy, random::RandomPlayer},
};
use rand::{Rng, RngCore, rngs::StdRng, seq::IndexedRandom};
use std::fmt::{self, Display};

/// Parameters of [`TunablePlayer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TunableParameters {
    /// Objects taken from the longest row
    pub longest_take: u32,

    /// Objects taken from the shortest nonempty row
    pub shortest_take: u32,

    /// Row to clear completely. A random nonempty row is used when this one is empty or missing
    pub clear_row: usize,
}

impl Display for TunableParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{}",
            self.longest_take, self.shortest_take, self.clear_row
        )
    }
}

impl TunableParameters {
    /// Create new parameter set
    #[inline]
    pub const fn new(longest_take: u32, shortest_take: u32, clear_row: usize) -> Self {
        Self {
            longest_take,
            shortest_take,
            clear_row,
        }
    }

    /// The three moves the parameters describe, in order: take from the longest row, take from
    /// the shortest row, clear a row. Counts are clamped to what is legal.
    pub fn candidates(&self, board: &Board, rng: &mut dyn RngCore) -> [Move; 3] {
        let longest = board.longest_row().expect("board is not terminal");
        let shortest = board.shortest_row().expect("board is not terminal");
        let clear_row = if self.clear_row < board.rows() && board.piles()[self.clear_row] > 0 {
            self.clear_row
        } else {
            let rows = board.nonempty_rows().collect::<Vec<_>>();
            *rows.choose(rng).expect("board is not terminal")
        };

        let clamp = |row: usize, count: u32| Move::new(row, count.clamp(1, board.max_count(row)));
        [
            clamp(longest, self.longest_take),
            clamp(shortest, self.shortest_take),
            clamp(clear_row, board.max_count(clear_row)),
        ]
    }
}

/// Plays one of the moves described by [`TunableParameters`], chosen uniformly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TunablePlayer {
    parameters: TunableParameters,
}

impl TunablePlayer {
    /// Create new player
    #[inline]
    pub const fn new(parameters: TunableParameters) -> Self {
        Self { parameters }
    }

    /// Parameters used by the player
    #[inline]
    pub const fn parameters(&self) -> TunableParameters {
        self.parameters
    }
}

impl Strategy for TunablePlayer {
    fn name(&self) -> &str {
        "Genetic Algorithm system"
    }

    fn decide(&mut self, board: &mut Board, rng: &mut dyn RngCore) -> Move {
        let candidates = self.parameters.candidates(board, rng);
        *candidates.choose(rng).expect("unreachable")
    }
}

/// Share of games won, compared by number of wins. All specimen of a run play the same number of
/// games.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fitness {
    /// Games won
    pub wins: usize,

    /// Games played
    pub games: usize,
}

impl Fitness {
    /// Fraction of games won
    #[inline]
    pub fn ratio(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.wins as f64 / self.games as f64
        }
    }
}

impl Display for Fitness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.wins, self.games)
    }
}

/// Tunes [`TunableParameters`] by playing against [`RandomPlayer`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TunableSearch {
    /// Board every evaluation game starts from
    pub config: GameConfig,

    /// Games played to score one parameter set
    pub games_per_evaluation: usize,

    /// Probability of redrawing each parameter during mutation
    pub mutation_rate: f64,
}

impl Default for TunableSearch {
    fn default() -> Self {
        Self {
            config: GameConfig::default(),
            games_per_evaluation: 20,
            mutation_rate: 0.7,
        }
    }
}

impl TunableSearch {
    fn random_longest_take(&self, rng: &mut StdRng) -> u32 {
        rng.random_range(1..=self.config.rows.max(1) as u32)
    }

    fn random_shortest_take(&self, rng: &mut StdRng) -> u32 {
        rng.random_range(1..=self.config.rows.max(1) as u32)
    }

    fn random_clear_row(&self, rng: &mut StdRng) -> usize {
        rng.random_range(0..=self.config.rows)
    }
}

impl Algorithm<TunableParameters, Fitness> for TunableSearch {
    fn mutate(&self, parameters: &mut TunableParameters, rng: &mut StdRng) {
        if rng.random_bool(self.mutation_rate) {
            parameters.longest_take = self.random_longest_take(rng);
        }
        if rng.random_bool(self.mutation_rate) {
            parameters.shortest_take = self.random_shortest_take(rng);
        }
        if rng.random_bool(self.mutation_rate) {
            parameters.clear_row = self.random_clear_row(rng);
        }
    }

    fn cross(
        &self,
        lhs: &TunableParameters,
        rhs: &TunableParameters,
        rng: &mut StdRng,
    ) -> TunableParameters {
        let mut pick = || if rng.random_bool(0.5) { lhs } else { rhs };
        TunableParameters {
            longest_take: pick().longest_take,
            shortest_take: pick().shortest_take,
            clear_row: pick().clear_row,
        }
    }

    fn lowest_score(&self) -> Fitness {
        Fitness {
            wins: 0,
            games: self.games_per_evaluation,
        }
    }

    fn score(&self, parameters: &TunableParameters, rng: &mut StdRng) -> Fitness {
        let mut player = TunablePlayer::new(*parameters);
        let mut opponent = RandomPlayer::new();
        let stats = play_many(
            &self.config,
            self.games_per_evaluation,
            [&mut player, &mut opponent],
            rng,
            |_| {},
        );
        Fitness {
            wins: stats.wins[Seat::First.index()],
            games: stats.games,
        }
    }

    fn random(&self, rng: &mut StdRng) -> TunableParameters {
        TunableParameters {
            longest_take: self.random_longest_take(rng),
            shortest_take: self.random_shortest_take(rng),
            clear_row: self.random_clear_row(rng),
        }
    }
}
