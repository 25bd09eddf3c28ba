use crate::{
    commands::common::{self, BoardArgs, Log, StrategyArgs, StrategyKind, write_log},
    io::FileOrStderr,
};
use anyhow::{Context, Result, bail};
use clap::{self, Parser};
use nimlab::{
    game::{Seat, train},
    strategy::{Strategy, reinforcement::Agent},
};

/// Train the reinforcement learning agent against another strategy
#[derive(Parser, Debug)]
pub struct Args {
    #[command(flatten)]
    board: BoardArgs,

    /// Number of games to learn from
    #[arg(long, default_value_t = 5000)]
    episodes: usize,

    /// Strategy the agent plays against
    #[arg(long, value_enum, default_value_t = StrategyKind::Random)]
    opponent: StrategyKind,

    #[command(flatten)]
    strategy: StrategyArgs,

    /// Learning rate
    #[arg(long, default_value_t = 0.1)]
    alpha: f64,

    /// Initial probability of an exploratory move
    #[arg(long, default_value_t = 0.4)]
    random_factor: f64,

    /// Seed of the random generator. Drawn from the OS otherwise
    #[arg(long, default_value = None)]
    seed: Option<u64>,

    /// Path to output logs
    #[arg(long, default_value = "-")]
    out_file: FileOrStderr,
}

#[allow(clippy::needless_pass_by_value)]
pub fn run(args: Args) -> Result<()> {
    if !(0.0..=1.0).contains(&args.alpha) {
        bail!("Learning rate must be between 0 and 1");
    }
    let config = args.board.config()?;
    let mut opponent = args.strategy.build(args.opponent)?;
    let mut agent = Agent::new(args.alpha, args.random_factor);
    let mut rng = common::rng(args.seed);
    let mut log_writer = args
        .out_file
        .create()
        .with_context(|| format!("Could not open output file `{}`", &args.out_file))?;

    let mut log_result = Ok(());
    let stats = train(
        &mut agent,
        &mut *opponent,
        &config,
        args.episodes,
        &mut rng,
        |window| {
            println!("{}: {}", window.episode, window.total_wins);
            if log_result.is_ok() {
                log_result = write_log(&mut log_writer, &Log::Training(window));
            }
        },
    );
    log_result?;

    println!(
        "{} total wins: {}/{} against {}, {} positions learned",
        agent.name(),
        stats.wins[Seat::First.index()],
        stats.games,
        opponent.name(),
        agent.known_states()
    );

    Ok(())
}
