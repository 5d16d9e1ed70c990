use crate::commands::*;
use anyhow::Result;
use clap::{self, Parser, Subcommand};

mod commands;

#[cfg(not(windows))]
#[global_allocator]
static ALLOC: jemallocator::Jemalloc = jemallocator::Jemalloc;

#[derive(Subcommand, Debug)]
enum Command {
    Subtraction(subtraction::Args),
}

#[derive(Parser)]
struct Args {
    #[clap(subcommand)]
    command: Command,
}

fn main() -> Result<()> {
    let args = Args::parse();
    match args.command {
        Command::Subtraction(args) => subtraction::run(args),
    }
}
