use crate::{
    commands::common::{Log, SearchArgs, check_max_take, write_log},
    io::FileOrStderr,
};
use anyhow::{Context, Result, bail};
use clap::{self, Parser};
use nimlab::board::Board;

/// Run the minimax searcher on a single position
#[derive(Parser, Debug)]
pub struct Args {
    /// Comma separated pile sizes
    #[arg(long, num_args=1.., value_delimiter=',')]
    piles: Vec<u32>,

    /// Take strictly fewer than that many objects per move
    #[arg(long, default_value = None)]
    max_take: Option<u32>,

    #[command(flatten)]
    search: SearchArgs,

    /// Path to output logs
    #[arg(long, default_value = "-")]
    out_file: FileOrStderr,
}

#[allow(clippy::needless_pass_by_value)]
pub fn run(args: Args) -> Result<()> {
    if args.piles.is_empty() {
        bail!("Board cannot be empty. Use --piles a,b,... to specify it.");
    }
    check_max_take(args.max_take)?;

    let mut log_writer = args
        .out_file
        .create()
        .with_context(|| format!("Could not open output file `{}`", &args.out_file))?;

    let mut board = Board::from_piles(args.piles, args.max_take);
    let (result, stats) = args.search.searcher().search_with_stats(&mut board);

    match result.best_move {
        Some(best_move) => println!("{}: take {} (value {})", board, best_move, result.value),
        None => println!("{}: no move (value {})", board, result.value),
    }
    println!(
        "visited {} positions, {} decided by nim-sum",
        stats.nodes, stats.cutoffs
    );

    let log = Log::Search {
        board,
        best_move: result.best_move,
        value: result.value.score(),
        resolved_at: result.resolved_at,
        stats,
    };
    write_log(&mut log_writer, &log)
}
