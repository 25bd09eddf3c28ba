use crate::{
    commands::common::{self, BoardArgs, Log, StrategyArgs, StrategyKind, write_log},
    io::FileOrStderr,
};
use anyhow::{Context, Result};
use clap::{self, Parser};
use nimlab::game::{MatchStats, Seat, play};

/// Play games between two strategies and report the winners
#[derive(Parser, Debug)]
pub struct Args {
    #[command(flatten)]
    board: BoardArgs,

    /// Strategy of the first seat
    #[arg(long, value_enum)]
    first: StrategyKind,

    /// Strategy of the second seat
    #[arg(long, value_enum)]
    second: StrategyKind,

    #[command(flatten)]
    strategy: StrategyArgs,

    /// Number of games, the starting seat is drawn for each of them
    #[arg(long, default_value_t = 1)]
    games: usize,

    /// Seed of the random generator. Drawn from the OS otherwise
    #[arg(long, default_value = None)]
    seed: Option<u64>,

    /// Path to output logs
    #[arg(long, default_value = "-")]
    out_file: FileOrStderr,
}

#[allow(clippy::needless_pass_by_value)]
pub fn run(args: Args) -> Result<()> {
    let config = args.board.config()?;
    let mut first = args.strategy.build(args.first)?;
    let mut second = args.strategy.build(args.second)?;
    let players = [
        format!("{} (first seat)", first.name()),
        format!("{} (second seat)", second.name()),
    ];
    let mut rng = common::rng(args.seed);
    let mut log_writer = args
        .out_file
        .create()
        .with_context(|| format!("Could not open output file `{}`", &args.out_file))?;

    let mut stats = MatchStats::default();
    for game in 0..args.games {
        let starter = Seat::random(&mut rng);
        let record = play(
            &mut config.board(),
            [&mut *first, &mut *second],
            starter,
            &mut rng,
        );
        stats.record(record.winner);
        println!(
            "{} won, {}",
            players[record.winner.index()],
            record.logs[record.winner.index()]
        );

        let log = Log::Game {
            game,
            players: players.clone(),
            record,
        };
        write_log(&mut log_writer, &log)?;
    }

    for seat in [Seat::First, Seat::Second] {
        println!(
            "{}: {}/{} wins ({:.1}%)",
            players[seat.index()],
            stats.wins[seat.index()],
            stats.games,
            100.0 * stats.win_ratio(seat)
        );
    }
    write_log(&mut log_writer, &Log::Match { players, stats })?;

    Ok(())
}
