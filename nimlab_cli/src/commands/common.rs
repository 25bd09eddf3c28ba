use anyhow::{Context, Result, bail};
use nimlab::{
    board::{Board, Move},
    game::{GameConfig, GameRecord, MatchStats, TrainingWindow},
    search::{Minimax, SearchStats, TieBreak},
    strategy::{
        Strategy,
        expert::ExpertPlayer,
        minimax::MinimaxPlayer,
        random::RandomPlayer,
        tunable::{Fitness, TunableParameters, TunablePlayer},
    },
};
use rand::{SeedableRng, rngs::StdRng};
use std::{io::Write, num::NonZeroUsize};

#[derive(serde::Serialize, serde::Deserialize)]
pub enum Log {
    Game {
        game: usize,
        players: [String; 2],
        record: GameRecord,
    },
    Match {
        players: [String; 2],
        stats: MatchStats,
    },
    Search {
        board: Board,
        best_move: Option<Move>,
        value: i8,
        resolved_at: usize,
        stats: SearchStats,
    },
    Generation {
        generation: usize,
        top_score: Fitness,
        parameters: TunableParameters,
    },
    Training(TrainingWindow),
}

pub fn write_log(writer: &mut impl Write, log: &Log) -> Result<()> {
    let line = serde_json::ser::to_string(log).context("Could not serialize log entry")?;
    writeln!(writer, "{}", line).context("Could not write log entry")?;
    writer.flush().context("Could not flush log")?;
    Ok(())
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    Random,
    Expert,
    Minimax,
    Tunable,
}

#[derive(clap::Args, Debug, Clone)]
pub struct BoardArgs {
    /// Number of rows, row `i` starts with `2 * i + 1` objects
    #[arg(long, default_value_t = 3)]
    pub rows: usize,

    /// Take strictly fewer than that many objects per move
    #[arg(long, default_value = None)]
    pub max_take: Option<u32>,
}

impl BoardArgs {
    pub fn config(&self) -> Result<GameConfig> {
        if self.rows == 0 {
            bail!("Board needs at least one row");
        }
        check_max_take(self.max_take)?;
        Ok(GameConfig::new(self.rows, self.max_take))
    }
}

pub fn check_max_take(max_take: Option<u32>) -> Result<()> {
    if max_take.is_some_and(|max_take| max_take < 2) {
        bail!("--max-take must be at least 2, otherwise no move is legal");
    }
    Ok(())
}

#[derive(clap::Args, Debug, Clone)]
pub struct SearchArgs {
    /// Replace search with the nim-sum heuristic at that depth. Zero searches to the end
    #[arg(long, default_value_t = 4)]
    pub max_depth: usize,

    /// Prefer the fastest win instead of the first winning move found
    #[arg(long)]
    pub shallowest_win: bool,
}

impl SearchArgs {
    pub fn searcher(&self) -> Minimax {
        let tie_break = if self.shallowest_win {
            TieBreak::ShallowestWin
        } else {
            TieBreak::FirstFound
        };
        Minimax::new(NonZeroUsize::new(self.max_depth), tie_break)
    }
}

#[derive(clap::Args, Debug, Clone)]
pub struct StrategyArgs {
    #[command(flatten)]
    pub search: SearchArgs,

    /// Parameters of the tunable strategy: longest row take, shortest row take, row to clear
    #[arg(long, num_args=1.., value_delimiter=',')]
    pub parameters: Vec<u32>,
}

impl StrategyArgs {
    pub fn tunable_parameters(&self) -> Result<TunableParameters> {
        let &[longest_take, shortest_take, clear_row] = self.parameters.as_slice() else {
            bail!("Tunable strategy needs three parameters. Use --parameters a,b,c to specify them.");
        };
        if longest_take == 0 || shortest_take == 0 {
            bail!("Tunable strategy must take at least one object");
        }
        Ok(TunableParameters::new(
            longest_take,
            shortest_take,
            clear_row as usize,
        ))
    }

    pub fn build(&self, kind: StrategyKind) -> Result<Box<dyn Strategy>> {
        let strategy: Box<dyn Strategy> = match kind {
            StrategyKind::Random => Box::new(RandomPlayer::new()),
            StrategyKind::Expert => Box::new(ExpertPlayer::new()),
            StrategyKind::Minimax => Box::new(MinimaxPlayer::new(self.search.searcher())),
            StrategyKind::Tunable => Box::new(TunablePlayer::new(self.tunable_parameters()?)),
        };
        Ok(strategy)
    }
}

pub fn rng(seed: Option<u64>) -> StdRng {
    seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64)
}
