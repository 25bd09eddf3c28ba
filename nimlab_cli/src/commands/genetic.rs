use crate::{
    commands::common::{self, BoardArgs, Log, write_log},
    io::FileOrStderr,
};
use anyhow::{Context, Result, bail};
use clap::{self, Parser};
use nimlab::{
    genetic_algorithm::{GeneticAlgorithm, Scored},
    strategy::tunable::{Fitness, TunableParameters, TunableSearch},
};
use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    num::NonZeroUsize,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

/// Tune parameters of the tunable strategy by playing against the random player
#[derive(Parser, Debug, Clone)]
pub struct Args {
    #[command(flatten)]
    board: BoardArgs,

    #[arg(long, default_value = "10")]
    generation_size: NonZeroUsize,

    /// Probability of redrawing each parameter of a new specimen
    #[arg(long, default_value_t = 0.7)]
    mutation_rate: f64,

    /// Games played against the random player to score a specimen
    #[arg(long, default_value_t = 20)]
    games_per_evaluation: usize,

    /// Stop after running that many generations. Run until interrupted otherwise
    #[arg(long, default_value = None)]
    generation_limit: Option<usize>,

    /// Path to saved snapshot to be loaded
    #[arg(long, default_value = None)]
    snapshot_load_file: Option<String>,

    /// Path to save snapshot file
    #[arg(long)]
    snapshot_save_file: String,

    /// Path to output logs
    #[arg(long, default_value = "-")]
    out_file: FileOrStderr,

    /// Number of threads used to score specimen
    #[arg(long, default_value = None)]
    threads: Option<usize>,

    /// Seed of the random generator. Drawn from the OS otherwise
    #[arg(long, default_value = None)]
    seed: Option<u64>,
}

#[derive(serde::Serialize, serde::Deserialize)]
struct Snapshot {
    specimen: Vec<Scored<TunableParameters, Fitness>>,
}

#[allow(clippy::needless_pass_by_value)]
pub fn run(args: Args) -> Result<()> {
    if !(0.0..=1.0).contains(&args.mutation_rate) {
        bail!("Mutation rate must be between 0 and 1");
    }
    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Could not build the thread pool")?;
    }

    let search = TunableSearch {
        config: args.board.config()?,
        games_per_evaluation: args.games_per_evaluation,
        mutation_rate: args.mutation_rate,
    };

    let specimen = if let Some(snapshot_file) = args.snapshot_load_file.clone() {
        let f = BufReader::new(File::open(snapshot_file).context("Could not open snapshot file")?);
        let snapshot: Snapshot =
            serde_json::de::from_reader(f).context("Could not parse snapshot file")?;
        snapshot.specimen.into_iter().map(|s| s.object).collect()
    } else {
        Vec::new()
    };

    let mut alg = GeneticAlgorithm::with_specimen(
        specimen,
        args.generation_size,
        search,
        common::rng(args.seed),
    );

    let mut log_writer = args
        .out_file
        .create()
        .with_context(|| format!("Could not open output file `{}`", &args.out_file))?;

    let finished = Arc::new(AtomicBool::new(false));
    ctrlc::set_handler({
        let finished = Arc::clone(&finished);
        move || {
            finished.store(true, Ordering::Relaxed);
        }
    })
    .context("Could not set interrupt handler")?;

    while !finished.load(Ordering::Relaxed) {
        if args
            .generation_limit
            .is_some_and(|limit| alg.generation() >= limit)
        {
            break;
        }

        alg.step_generation();

        {
            let mut output = BufWriter::new(
                File::create(&args.snapshot_save_file)
                    .context("Could not create/open output file")?,
            );
            let snapshot = Snapshot {
                specimen: alg.specimen().to_vec(),
            };
            writeln!(
                output,
                "{}",
                serde_json::ser::to_string(&snapshot).context("Could not serialize snapshot")?
            )
            .context("Could not write snapshot")?;
        }

        let best = alg.highest_score();
        let log = Log::Generation {
            generation: alg.generation(),
            top_score: best.score,
            parameters: best.object,
        };
        write_log(&mut log_writer, &log)?;
    }

    let best = alg.highest_score();
    println!(
        "Best parameters after {} generations: {} won {} games ({:.1}%)",
        alg.generation(),
        best.object,
        best.score,
        100.0 * best.score.ratio()
    );

    Ok(())
}
