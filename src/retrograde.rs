//! Retrograde analysis: build the score database bottom-up, layer by
//! layer, with the Awari rule set.
//!
//! Each layer is iterated to a fixed point: a worker swarm sweeps the
//! layer's ranks and re-derives every cell from its successors (which
//! live in the same or lower layers) until a sweep initializes nothing
//! new. Re-scores of already-initialized cells are applied but not
//! counted; this flip-flop exclusion guarantees termination.
//!
//! Cycle members get their Awari score of 0 seeded up front via Tarjan
//! on the zero-capture subgraph. Oware would split the seeds by side
//! instead; the ≤1-seed inaccuracy near cycle boundaries is the
//! documented price of a tractable build.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Instant;

use log::{debug, info};

use crate::board::{Position, Rank};
use crate::db::Database;
use crate::levels::layer_bounds;
use crate::scc;
use crate::sync::Latch;

/// Layer range and swarm size for a build run.
#[derive(Clone, Debug)]
pub struct BuildOptions {
    /// First layer; `None` resumes from the database checkpoint.
    pub from: Option<i8>,
    /// Last layer, inclusive.
    pub to: i8,
    /// Highest layer that still gets SCC seeding. Tarjan is in-memory
    /// and O(|V|); beyond the default it stops fitting.
    pub scc_max: i8,
    /// Worker thread count.
    pub workers: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        BuildOptions {
            from: None,
            to: 12,
            scc_max: 12,
            workers: 8,
        }
    }
}

impl BuildOptions {
    #[must_use]
    pub fn with_layers(mut self, from: Option<i8>, to: i8) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    #[must_use]
    pub fn with_scc_max(mut self, scc_max: i8) -> Self {
        self.scc_max = scc_max;
        self
    }

    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }
}

/// Build the database over the configured layer range, honoring the
/// stop latch between feeds. The checkpoint byte always names the layer
/// being processed, so an interrupted run resumes by redoing at most
/// one layer.
pub fn build(db: &Database, options: &BuildOptions, stop: &Latch) {
    assert!(db.is_open(), "retrograde build needs an open database");

    let from = options.from.unwrap_or_else(|| db.checkpoint()).max(0);
    let to = options.to.max(0);
    info!("retrograde: layers {from}..={to}, {} workers", options.workers);

    for layer in from..=to {
        if layer == 47 {
            continue;
        }
        if stop.is_tripped() {
            info!("retrograde: cancelled before layer {layer}");
            return;
        }

        db.set_checkpoint(layer);
        let started = Instant::now();
        let (low, high) = layer_bounds(layer);
        info!("layer {layer}: ranks {low}..={high}");

        if layer <= options.scc_max {
            let members = scc::layer_components(layer);
            for &rank in &members {
                db.set_score(rank, 0);
            }
            info!("layer {layer}: {} cycle members seeded", members.len());
        }

        let mut iteration = 0;
        loop {
            iteration += 1;
            let pass = Instant::now();
            let scored = sweep(db, low, high, options.workers, stop);
            info!(
                "layer {layer}: iteration {iteration}: {scored} scored in {:.2?}",
                pass.elapsed()
            );

            if stop.is_tripped() {
                info!("retrograde: cancelled in layer {layer}");
                return;
            }
            if scored == 0 {
                break;
            }
        }

        info!("layer {layer}: converged in {:.2?}", started.elapsed());
    }

    info!("retrograde: done");
}

/// One sweep of a layer, top rank down. Returns how many cells went
/// from uninitialized to initialized.
fn sweep(db: &Database, low: Rank, high: Rank, workers: usize, stop: &Latch) -> usize {
    let scored = AtomicUsize::new(0);
    let (sender, receiver) = crossbeam_channel::bounded::<Rank>(workers);

    thread::scope(|scope| {
        for _ in 0..workers {
            let receiver = receiver.clone();
            let scored = &scored;
            scope.spawn(move || {
                while let Ok(rank) = receiver.recv() {
                    visit(db, rank, scored);
                }
            });
        }
        drop(receiver);

        for rank in (low..=high).rev() {
            if stop.is_tripped() {
                debug!("sweep: stop latch tripped at rank {rank}");
                break;
            }
            if sender.send(rank).is_err() {
                break;
            }
        }
        drop(sender);
    });

    scored.into_inner()
}

/// Retrograde score derivation for one rank. Writes a value only when
/// sure of it; counts a change only on the uninitialized→initialized
/// transition.
fn visit(db: &Database, rank: Rank, scored: &AtomicUsize) {
    let (current, initialized) = match db.score(rank) {
        Some(score) => (score, true),
        None => (crate::db::UNINITIALIZED, false),
    };

    let position = Position::unrank(rank);
    if position.is_starved() {
        // Terminal: each side takes its own seeds. For the mover that
        // is minus whatever the opponent still holds.
        let split = position.split();
        if current != split {
            db.set_score(rank, split);
            scored.fetch_add(1, Ordering::Relaxed);
        }
        return;
    }

    let legal = position.legal_moves();

    // Best attainable score over all moves; unknown successors count
    // as 0 and get revisited once they settle.
    let mut best = i8::MIN;
    let mut found = false;
    for &m in legal.moves() {
        let captured = legal.captured(m);
        match db.score(legal.next(m)) {
            Some(successor) => {
                found = true;
                best = best.max(captured - successor);
            }
            None => {
                best = best.max(captured);
            }
        }
    }

    if found && best != current {
        debug!("rank {rank}: {} => {best}", position.board());
        db.set_score(rank, best);
    }

    // Flip-flops of already-initialized cells don't count as progress.
    if found && !initialized {
        scored.fetch_add(1, Ordering::Relaxed);
    }
}
