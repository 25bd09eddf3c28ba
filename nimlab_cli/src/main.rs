use crate::commands::*;
use anyhow::Result;
use clap::{self, Parser, Subcommand};

mod commands;
mod io;

#[cfg(not(windows))]
#[global_allocator]
static ALLOC: jemallocator::Jemalloc = jemallocator::Jemalloc;

#[derive(Subcommand, Debug)]
enum Command {
    Play(play::Args),
    Search(search::Args),
    Genetic(genetic::Args),
    Train(train::Args),
}

#[derive(Parser)]
struct Args {
    #[clap(subcommand)]
    command: Command,
}

fn main() -> Result<()> {
    let args = Args::parse();
    match args.command {
        Command::Play(args) => play::run(args),
        Command::Search(args) => search::run(args),
        Command::Genetic(args) => genetic::run(args),
        Command::Train(args) => train::run(args),
    }
}
