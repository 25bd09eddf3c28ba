//! Playing games between two strategies

use crate::{
    board::{Board, Move},
    display,
    strategy::Strategy,
};
use rand::{Rng, RngCore};
use std::fmt::{self, Display};

/// Number of episodes summarized by a single [`TrainingWindow`]
pub const TRAINING_WINDOW: usize = 50;

/// Board shape used to start every game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    /// Number of rows of the staircase start
    pub rows: usize,

    /// Exclusive cap on objects taken per move
    pub max_take: Option<u32>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(3, None)
    }
}

impl GameConfig {
    /// Create new configuration
    #[inline]
    pub const fn new(rows: usize, max_take: Option<u32>) -> Self {
        Self { rows, max_take }
    }

    /// Fresh starting board
    #[inline]
    pub fn board(&self) -> Board {
        Board::new(self.rows, self.max_take)
    }
}

/// One of the two players of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Seat {
    #[allow(missing_docs)]
    First,
    #[allow(missing_docs)]
    Second,
}

impl Seat {
    /// The other seat
    #[inline(always)]
    #[must_use]
    pub const fn opposite(self) -> Seat {
        match self {
            Seat::First => Seat::Second,
            Seat::Second => Seat::First,
        }
    }

    /// Index into per-seat arrays
    #[inline(always)]
    pub const fn index(self) -> usize {
        match self {
            Seat::First => 0,
            Seat::Second => 1,
        }
    }

    /// Seat chosen with a fair coin
    #[inline]
    pub fn random(rng: &mut dyn RngCore) -> Seat {
        if rng.random_bool(0.5) {
            Seat::First
        } else {
            Seat::Second
        }
    }
}

/// Moves made by a single player during a game
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveLog {
    moves: Vec<Move>,
}

impl MoveLog {
    /// Create new empty log
    #[inline]
    pub const fn new() -> Self {
        Self { moves: Vec::new() }
    }

    /// Record a move
    #[inline]
    pub fn push(&mut self, m: Move) {
        self.moves.push(m);
    }

    /// Recorded moves in order
    #[inline]
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// Number of recorded moves
    #[inline]
    pub fn total(&self) -> usize {
        self.moves.len()
    }
}

impl Display for MoveLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "moves have been: ")?;
        display::brackets(f, |f| display::commas(f, &self.moves))?;
        write!(f, "; total: {}", self.total())
    }
}

/// Outcome of a finished game
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameRecord {
    /// Seat that took the last object
    pub winner: Seat,

    /// Seat that moved first
    pub starter: Seat,

    /// Moves of each seat, indexed by [`Seat::index`]
    pub logs: [MoveLog; 2],
}

/// Play a single game to the end. The player who empties the board wins.
///
/// Both strategies get [`Strategy::end_episode`] once the game is over.
///
/// # Panics
/// - A strategy returns an illegal move
pub fn play(
    board: &mut Board,
    mut players: [&mut dyn Strategy; 2],
    starter: Seat,
    rng: &mut dyn RngCore,
) -> GameRecord {
    let mut logs = [MoveLog::new(), MoveLog::new()];
    let mut to_move = starter;
    while !board.is_terminal() {
        let m = players[to_move.index()].decide(board, rng);
        board.apply(m);
        logs[to_move.index()].push(m);
        to_move = to_move.opposite();
    }

    for player in &mut players {
        player.end_episode();
    }

    GameRecord {
        winner: to_move.opposite(),
        starter,
        logs,
    }
}

/// Win counts of a series of games
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchStats {
    /// Number of games played
    pub games: usize,

    /// Wins per seat, indexed by [`Seat::index`]
    pub wins: [usize; 2],
}

impl MatchStats {
    /// Count a finished game
    #[inline]
    pub const fn record(&mut self, winner: Seat) {
        self.games += 1;
        self.wins[winner.index()] += 1;
    }

    /// Fraction of games won by `seat`, zero if no game was played
    #[inline]
    pub fn win_ratio(&self, seat: Seat) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.wins[seat.index()] as f64 / self.games as f64
        }
    }
}

/// Play `games` games on fresh boards, the starting seat is drawn at random for every game
pub fn play_many<F>(
    config: &GameConfig,
    games: usize,
    mut players: [&mut dyn Strategy; 2],
    rng: &mut dyn RngCore,
    mut on_game: F,
) -> MatchStats
where
    F: FnMut(&GameRecord),
{
    let mut stats = MatchStats::default();
    for _ in 0..games {
        let starter = Seat::random(rng);
        let [first, second] = &mut players;
        let record = play(&mut config.board(), [&mut **first, &mut **second], starter, rng);
        stats.record(record.winner);
        on_game(&record);
    }
    stats
}

/// Progress of a learner over the last [`TRAINING_WINDOW`] episodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrainingWindow {
    /// Number of finished episodes
    pub episode: usize,

    /// Wins of the learner since the start of training
    pub total_wins: usize,

    /// Wins of the learner within the window
    pub window_wins: usize,
}

/// Let `learner` play `episodes` games against `opponent`, learning after each of them through
/// [`Strategy::end_episode`]. `on_window` is called after every [`TRAINING_WINDOW`] episodes.
pub fn train<F>(
    learner: &mut dyn Strategy,
    opponent: &mut dyn Strategy,
    config: &GameConfig,
    episodes: usize,
    rng: &mut dyn RngCore,
    mut on_window: F,
) -> MatchStats
where
    F: FnMut(TrainingWindow),
{
    let mut episode = 0;
    let mut total_wins = 0;
    let mut window_wins = 0;
    play_many(config, episodes, [learner, opponent], rng, |record| {
        episode += 1;
        if record.winner == Seat::First {
            total_wins += 1;
            window_wins += 1;
        }
        if episode % TRAINING_WINDOW == 0 {
            on_window(TrainingWindow {
                episode,
                total_wins,
                window_wins,
            });
            window_wins = 0;
        }
    })
}
