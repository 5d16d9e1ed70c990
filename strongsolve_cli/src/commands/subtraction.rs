use anyhow::{Result, bail};
use clap::{self, Parser};
use itertools::Itertools;
use std::sync::{Arc, atomic::AtomicBool};
use strongsolve::{games::subtraction::Sub, solver::Solver, status::Status};

/// Classify the starting position of a subtraction game.
#[derive(Parser, Debug)]
pub struct Args {
    /// Comma separated list of values in the subtraction set
    #[arg(long, num_args = 1.., value_delimiter = ',', default_value = "1,2")]
    moves: Vec<u32>,

    /// Starting pile size
    #[arg(long, default_value_t = 4)]
    start: u32,

    /// Emit a JSON report instead of the bare status
    #[arg(long)]
    json: bool,
}

#[derive(Debug, serde::Serialize)]
struct Report {
    game: String,
    status: Status,
    positions: usize,
}

pub fn run(args: Args) -> Result<()> {
    if args.moves.is_empty() {
        bail!("Subtraction set cannot be empty. Use --moves a,b,... to specify it.");
    }
    if args.moves.contains(&0) {
        bail!(
            "Subtraction set cannot contain 0: taking nothing is not a move. Got --moves {}.",
            args.moves.iter().join(",")
        );
    }

    let stop = Arc::new(AtomicBool::new(false));
    ctrlc::set_handler({
        let stop = Arc::clone(&stop);
        move || {
            stop.store(true, std::sync::atomic::Ordering::Relaxed);
        }
    })?;

    let game = Sub::new(args.moves, args.start);
    let mut solver = Solver::with_stop_flag(&game, &stop);
    let status = solver.solve()?;

    if args.json {
        let report = Report {
            game: game.to_string(),
            status,
            positions: solver.position_count(),
        };
        println!("{}", serde_json::to_string(&report)?);
    } else {
        println!("{}", status);
    }
    Ok(())
}
