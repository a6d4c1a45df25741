//! Analyze an Oware game trail from the command line.
//!
//! Takes a `/RANK/MOVE/…` trail (the same format the web front-end
//! speaks), runs the iterative deepener within the time budget, and
//! prints the root score interval, the principal variation, and the
//! search statistics.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use sankofa::board::Game;
use sankofa::db::Database;
use sankofa::search::Engine;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Game trail, e.g. /1224204106872/A/b
    trail: String,

    /// Database file; a missing one downgrades the leaves to the
    /// heuristic
    #[arg(long = "db", default_value = "oware.db")]
    db: PathBuf,

    /// Number of parallel workers
    #[arg(short = 'g', long = "workers", default_value_t = 5)]
    workers: usize,

    /// Response time in seconds
    #[arg(short = 't', long = "time", default_value_t = 1.0)]
    time: f64,

    /// Be chatty
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(if args.verbose {
        "debug"
    } else {
        "warn"
    }))
    .init();

    let game: Game = args
        .trail
        .parse()
        .with_context(|| format!("cannot parse game trail '{}'", args.trail))?;
    let rank = game.current().rank();
    println!("request: {game}");
    println!("position: {}", game.current());

    let engine = Engine::new(Database::open(&args.db))
        .with_workers(args.workers)
        .with_budget(Duration::from_secs_f64(args.time));
    let tt = engine.analyze(&game);

    match tt.interval(rank) {
        Some(interval) => println!("score: {interval}"),
        None => println!("score: unknown"),
    }
    println!("line: {}", tt.game());
    println!("stats: {tt}");

    Ok(())
}
