//! Retrograde analysis of Oware with the Awari rule set.
//!
//! The score database is built incrementally, layer for layer,
//! starting with the empty board. Strongly connected components in
//! lower layers are discovered with Tarjan's algorithm and seeded with
//! the Awari cycle score; a layer is then iterated until no new node
//! gets a score. A partial database is immediately usable by the
//! search. The complete database is on the order of a terabyte and
//! takes a very long time; build it only on a machine provisioned
//! for it.

use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use clap::Parser;

use sankofa::db::Database;
use sankofa::retrograde::{build, BuildOptions};
use sankofa::sync::Latch;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Database file
    #[arg(long = "db", default_value = "oware.db")]
    db: PathBuf,

    /// Number of parallel workers
    #[arg(short = 'g', long = "workers", default_value_t = 8)]
    workers: usize,

    /// From-layer; overrides the saved checkpoint when >= 0
    #[arg(short = 'f', long = "from", default_value_t = -1)]
    from: i32,

    /// To-layer; 12 is the lowest layer the search profits from
    #[arg(short = 't', long = "to", default_value_t = 12)]
    to: i32,

    /// Maximum layer for SCC cycle seeding
    #[arg(short = 's', long = "scc", default_value_t = 12)]
    scc: i32,

    /// Be chatty
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(if args.verbose {
        "debug"
    } else {
        "info"
    }))
    .init();

    // A signal trips the stop latch; the layer loop observes it
    // between feeds and exits with the checkpoint preserved.
    let stop = Latch::new();
    for signal in [
        signal_hook::consts::SIGINT,
        signal_hook::consts::SIGTERM,
        signal_hook::consts::SIGQUIT,
        signal_hook::consts::SIGHUP,
    ] {
        signal_hook::flag::register(signal, stop.as_arc())
            .with_context(|| format!("cannot register signal {signal}"))?;
    }

    let db = Database::open(&args.db);
    ensure!(
        db.is_open(),
        "cannot open database file {}",
        args.db.display()
    );
    println!("database: {}", args.db.display());
    println!("checkpoint: {}", db.checkpoint());

    let options = BuildOptions::default()
        .with_layers(
            (args.from >= 0).then_some(args.from as i8),
            args.to.clamp(0, 48) as i8,
        )
        .with_scc_max(args.scc.clamp(0, 48) as i8)
        .with_workers(args.workers);

    build(&db, &options, &stop);

    println!("DONE");
    Ok(())
}
