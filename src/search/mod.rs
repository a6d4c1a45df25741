//! Minimax evaluation of Oware positions.
//!
//! Features:
//! - Iterative deepening with a wall-clock watchdog
//! - Parallel aspiration over quartile sub-windows of [α, β]
//! - Fail-soft negamax with α—β pruning
//! - Shared transposition table of score intervals; the previous
//!   iteration's table orders killer moves
//! - Database scores at the leaves, parity heuristic as fallback
//!
//! Call stack: [`Engine::analyze`] ⇢ deepener ⇢ aspiration ⇢ worker ⇢
//! negamax.

mod aspiration;
mod deepener;
mod interval;
mod killer;
mod negamax;
mod partition;
mod tt;

pub use interval::Interval;
pub use partition::quartiles;
pub use tt::TranspositionTable;

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::board::Game;
use crate::db::Database;

/// Analysis front door: owns the database handle and the search
/// configuration.
pub struct Engine {
    db: Arc<Database>,
    workers: usize,
    budget: Duration,
}

impl Engine {
    /// Engine over the given database. A closed database is fine;
    /// search then leans on the heuristic at the leaves. Defaults: one worker
    /// per core, a one-second budget.
    #[must_use]
    pub fn new(db: Database) -> Self {
        Engine {
            db: Arc::new(db),
            workers: thread::available_parallelism().map_or(5, NonZeroUsize::get),
            budget: Duration::from_secs(1),
        }
    }

    /// Set the aspiration worker count.
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Set the wall-clock budget of the iterative deepener.
    #[must_use]
    pub fn with_budget(mut self, budget: Duration) -> Self {
        self.budget = budget;
        self
    }

    #[must_use]
    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Evaluate the game's current position within the time budget.
    ///
    /// The returned table holds the interval knowledge accumulated by
    /// the deepest completed iteration; its [`TranspositionTable::game`]
    /// is the principal variation.
    #[must_use]
    pub fn analyze(&self, game: &Game) -> Arc<TranspositionTable> {
        deepener::explore(game, &self.db, self.workers, self.budget)
    }
}
