//! Parallel aspiration: Baudet's divide and conquer over the score
//! range, one negamax worker per sub-window on a shared table.

use std::thread;

use log::{debug, info};

use crate::board::LegalMoves;

use super::tt::{TranspositionTable, TtInner};

impl TranspositionTable {
    /// Are the root and all its first-level successors finally scored?
    /// Runs under the caller's lock on `inner`.
    fn finished(&self, inner: &TtInner, root_legal: &LegalMoves) -> bool {
        match inner.intervals.get(&root_legal.rank()) {
            Some(interval) if interval.is_final() => {}
            _ => return false,
        }

        root_legal.moves().iter().all(|&m| {
            matches!(
                inner.intervals.get(&root_legal.next(m)),
                Some(interval) if interval.is_final()
            )
        })
    }

    /// One aspiration worker: negamax over the given window, then a
    /// single transaction that publishes the continuation (first exact
    /// root match wins) and trips the iteration latch when nothing is
    /// left to prove.
    fn worker(&self, alpha: i8, beta: i8, depth: i32) {
        self.worker_started();
        debug!("worker: α {alpha}, β {beta}, depth {depth}");

        let root = self.game();
        let (score, mut line) = self.negamax(&root, alpha, beta, depth);
        line.set_cursor(root.cursor());

        // The root's legal moves, fetched outside the transaction.
        let root_legal = self.legal_moves(root.current().rank());

        {
            let mut inner = self.inner.write();

            // Publish the line if its score settled into a final
            // interval matching the negamax return.
            if !inner.found {
                let rank = line.current().rank();
                if let Some(interval) = inner.intervals.get(&rank) {
                    if interval.is_final() && interval.score() == score {
                        info!("continuation ⇢ {line}, score: {score}");
                        inner.game = line;
                        inner.found = true;
                    }
                }
            }

            // With every first-level score final, the other workers
            // have nothing left to contribute.
            if !self.iteration_aborted() && self.finished(&inner, &root_legal) {
                self.abort_iteration();
                info!("root finished: cancel the other workers");
            }
        }

        self.worker_done();
    }

    /// Run one worker per window and wait for all of them.
    pub(crate) fn aspiration(&self, windows: &[(i8, i8)], depth: i32) {
        debug!("aspiration: {windows:?}, depth {depth}");

        thread::scope(|scope| {
            for &(alpha, beta) in windows {
                scope.spawn(move || self.worker(alpha, beta, depth));
            }
        });

        debug!("all aspiration workers done");
    }
}
