//! Transposition table: interval knowledge per rank, shared by the
//! aspiration workers of one deepener iteration, plus the memoization
//! caches and cancellation latches living in the same scope.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use log::debug;
use parking_lot::RwLock;

use crate::board::{Game, LegalMoves, Position, Rank, Verdict};
use crate::db::Database;
use crate::levels::level;
use crate::sync::Latch;

use super::interval::Interval;

/// Initial capacity of the interval map.
const TT_CAPACITY: usize = 4096;

pub(crate) struct TtInner {
    /// rank ⇢ score range.
    pub(crate) intervals: HashMap<Rank, Interval>,
    /// Input game, replaced by the principal variation once a worker
    /// finds a final root score.
    pub(crate) game: Game,
    /// Has a worker already published its line?
    pub(crate) found: bool,
    /// Deepest iteration depth seen; monotonically increasing across
    /// restarts.
    pub(crate) depth: i32,
    /// Shallowest recursion depth reached this iteration; 0 means the
    /// search touched the leaves.
    pub(crate) base: i32,
}

/// Search statistics. Plain atomics: the counters sit on hot paths
/// shared by every worker.
#[derive(Default)]
pub(crate) struct Counters {
    pub(crate) visited: AtomicU64,
    pub(crate) cumulative: AtomicU64,
    pub(crate) tt_reads: AtomicU64,
    pub(crate) legal_reads: AtomicU64,
    pub(crate) mih_reads: AtomicU64,
    pub(crate) cutoffs: AtomicU64,
    pub(crate) game_over: AtomicU64,
    pub(crate) db_hits: AtomicU64,
    pub(crate) heuristic: AtomicU64,
    pub(crate) killed: AtomicU64,
    pub(crate) active: AtomicUsize,
}

/// Memoization of CPU-intensive evaluations. Legal moves and
/// moves-in-hand survive deepener restarts (they depend on the rank
/// alone); positions are rebuilt per iteration.
pub(crate) struct Caches {
    pub(crate) positions: RwLock<HashMap<Rank, Position>>,
    pub(crate) legal: Arc<RwLock<HashMap<Rank, Arc<LegalMoves>>>>,
    pub(crate) moves_in_hand: Arc<RwLock<HashMap<Rank, i8>>>,
}

/// Thread-safe transposition table for negamax. One instance per
/// deepener iteration; [`TranspositionTable::restart`] chains them, the
/// predecessor serving killer-move ordering as `old`.
pub struct TranspositionTable {
    pub(crate) inner: RwLock<TtInner>,
    pub(crate) counters: Counters,
    pub(crate) caches: Caches,
    pub(crate) iteration: Latch,
    pub(crate) deepener: Latch,
    pub(crate) old: Option<Arc<TranspositionTable>>,
    pub(crate) db: Arc<Database>,
    started: Instant,
    iteration_started: Instant,
}

impl TranspositionTable {
    #[must_use]
    pub fn new(game: Game, db: Arc<Database>) -> Self {
        TranspositionTable {
            inner: RwLock::new(TtInner {
                intervals: HashMap::with_capacity(TT_CAPACITY),
                game,
                found: false,
                depth: i32::MIN,
                base: i32::MAX,
            }),
            counters: Counters::default(),
            caches: Caches {
                positions: RwLock::new(HashMap::with_capacity(TT_CAPACITY)),
                legal: Arc::new(RwLock::new(HashMap::with_capacity(TT_CAPACITY))),
                moves_in_hand: Arc::new(RwLock::new(HashMap::with_capacity(TT_CAPACITY))),
            },
            iteration: Latch::new(),
            deepener: Latch::new(),
            old: None,
            db,
            started: Instant::now(),
            iteration_started: Instant::now(),
        }
    }

    /// A fresh table for the next deepener iteration: same deepener
    /// latch, same long-lived caches, cumulative counter carried over,
    /// and this table retained as `old` for killer ordering.
    #[must_use]
    pub fn restart(self: &Arc<Self>) -> Arc<TranspositionTable> {
        debug!("restart");
        let inner = self.inner.read();
        let counters = Counters::default();
        counters
            .cumulative
            .store(self.counters.cumulative.load(Ordering::Relaxed), Ordering::Relaxed);

        Arc::new(TranspositionTable {
            inner: RwLock::new(TtInner {
                intervals: HashMap::with_capacity(TT_CAPACITY),
                game: inner.game.clone(),
                found: false,
                depth: inner.depth,
                base: i32::MAX,
            }),
            counters,
            caches: Caches {
                positions: RwLock::new(HashMap::with_capacity(TT_CAPACITY)),
                legal: Arc::clone(&self.caches.legal),
                moves_in_hand: Arc::clone(&self.caches.moves_in_hand),
            },
            iteration: Latch::new(),
            deepener: self.deepener.clone(),
            old: Some(Arc::clone(self)),
            db: Arc::clone(&self.db),
            started: self.started,
            iteration_started: Instant::now(),
        })
    }

    /// The previous iteration's table, if any.
    #[must_use]
    pub fn previous(&self) -> Option<&Arc<TranspositionTable>> {
        self.old.as_ref()
    }

    /// Wall-clock time since the first iteration started; restarts
    /// carry the origin along.
    #[must_use]
    pub fn elapsed(&self) -> std::time::Duration {
        self.started.elapsed()
    }

    /// The best game found so far (the input game until a worker
    /// publishes a principal variation).
    #[must_use]
    pub fn game(&self) -> Game {
        self.inner.read().game.clone()
    }

    pub(crate) fn set_game(&self, game: &Game) {
        self.inner.write().game = game.clone();
    }

    /// Is anything recorded for this rank?
    #[must_use]
    pub fn known(&self, rank: Rank) -> bool {
        self.inner.read().intervals.contains_key(&rank)
    }

    /// The recorded score range for a rank.
    #[must_use]
    pub fn interval(&self, rank: Rank) -> Option<Interval> {
        let hit = self.inner.read().intervals.get(&rank).copied();
        if hit.is_some() {
            self.counters.tt_reads.fetch_add(1, Ordering::Relaxed);
        }
        hit
    }

    /// Merge a fail-soft negamax return into the table.
    ///
    /// The score is interpreted relative to the `(α, β)` window the
    /// caller searched: `score ≤ α` bounds from above, `score ≥ β`
    /// from below, anything between is exact. The result intersects
    /// any prior knowledge; a final interval is sticky.
    ///
    /// # Panics
    ///
    /// Panics when `α > β` or the score exceeds the rank's layer;
    /// both are logic bugs.
    pub(crate) fn set_score(&self, rank: Rank, alpha: i8, beta: i8, score: i8) {
        assert!(beta >= alpha, "rank {rank}: α {alpha} > β {beta}");
        let layer = level(rank);
        assert!(
            (-layer..=layer).contains(&score),
            "score {score} out of layer {layer} at rank {rank}"
        );

        let mut inner = self.inner.write();
        let old = match inner.intervals.get(&rank) {
            Some(existing) if existing.is_final() => return,
            Some(existing) => *existing,
            None => Interval::new(rank, i8::MIN, i8::MAX, Verdict::Open),
        };

        let new = if score <= alpha {
            Interval::new(rank, -layer, score, Verdict::Open)
        } else if score >= beta {
            Interval::new(rank, score, layer, Verdict::Open)
        } else {
            Interval::new(rank, score, score, Verdict::Open)
        };

        let merged = old.intersect(&new);
        debug!("rank {rank}: {old} ⋂ {new} ⇢ {merged}");
        inner.intervals.insert(rank, merged);
    }

    /// Ask every worker of this iteration to wind down. The ones still
    /// running are counted as killed.
    pub fn abort_iteration(&self) {
        if !self.iteration.is_tripped() {
            self.counters.killed.store(
                self.counters.active.load(Ordering::Relaxed) as u64,
                Ordering::Relaxed,
            );
            self.iteration.trip();
        }
    }

    #[must_use]
    pub fn iteration_aborted(&self) -> bool {
        self.iteration.is_tripped()
    }

    /// Stop the whole deepening loop; the latch is shared across
    /// restarts.
    pub fn abort_deepener(&self) {
        self.deepener.trip();
    }

    #[must_use]
    pub fn deepener_aborted(&self) -> bool {
        self.deepener.is_tripped()
    }

    pub(crate) fn deepener_latch(&self) -> Latch {
        self.deepener.clone()
    }

    pub(crate) fn set_depth(&self, depth: i32) {
        let mut inner = self.inner.write();
        inner.depth = inner.depth.max(depth);
    }

    pub(crate) fn set_base(&self, depth: i32) {
        let mut inner = self.inner.write();
        inner.base = inner.base.min(depth);
    }

    /// Current iteration depth.
    #[must_use]
    pub fn depth(&self) -> i32 {
        self.inner.read().depth
    }

    /// Distance between the iteration depth and the shallowest depth
    /// actually reached; > 0 means the iteration never touched the
    /// leaves.
    #[must_use]
    pub fn base(&self) -> i32 {
        self.inner.read().base
    }

    pub(crate) fn count_visit(&self) {
        self.counters.visited.fetch_add(1, Ordering::Relaxed);
        self.counters.cumulative.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn count_game_over(&self) {
        self.counters.game_over.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn count_db_hit(&self) {
        self.counters.db_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn count_heuristic(&self) {
        self.counters.heuristic.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn count_cutoff(&self) {
        self.counters.cutoffs.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn worker_started(&self) {
        self.counters.active.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn worker_done(&self) {
        self.counters.active.fetch_sub(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn visited(&self) -> u64 {
        self.counters.visited.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn cumulative_visited(&self) -> u64 {
        self.counters.cumulative.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn db_hits(&self) -> u64 {
        self.counters.db_hits.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn heuristic_leaves(&self) -> u64 {
        self.counters.heuristic.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn cutoffs(&self) -> u64 {
        self.counters.cutoffs.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn game_over_hits(&self) -> u64 {
        self.counters.game_over.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn killed(&self) -> u64 {
        self.counters.killed.load(Ordering::Relaxed)
    }
}

impl fmt::Display for TranspositionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.read();
        let c = &self.counters;
        let reached = if inner.base > inner.depth {
            0
        } else {
            inner.depth - inner.base
        };
        write!(
            f,
            "{} | visited: {}, Σ: {}, database: {}, heuristic: {}, game-over: {} \
             | depth: {}, killed: {} \
             | TT: size: {}, #rd: {} | legal: size: {}, #rd: {} | Δν: size: {}, #rd: {} \
             | {:.2} sec.",
            inner.game,
            c.visited.load(Ordering::Relaxed),
            c.cumulative.load(Ordering::Relaxed),
            c.db_hits.load(Ordering::Relaxed),
            c.heuristic.load(Ordering::Relaxed),
            c.game_over.load(Ordering::Relaxed),
            reached,
            c.killed.load(Ordering::Relaxed),
            inner.intervals.len(),
            c.tt_reads.load(Ordering::Relaxed),
            self.caches.legal.read().len(),
            c.legal_reads.load(Ordering::Relaxed),
            self.caches.moves_in_hand.read().len(),
            c.mih_reads.load(Ordering::Relaxed),
            self.iteration_started.elapsed().as_secs_f64(),
        )
    }
}
