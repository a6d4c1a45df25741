//! Fail-soft negamax with α—β pruning and killer-move ordering.

use log::debug;

use crate::board::Game;

use super::tt::TranspositionTable;

impl TranspositionTable {
    /// Evaluate the game's current position to the given depth within
    /// the window `[alpha, beta]`.
    ///
    /// Fail-soft: the returned score may fall outside the window,
    /// which lets the table store one-sided bounds. The second return
    /// value is the continuation realizing the score, possibly
    /// truncated when the score came out of the table.
    ///
    /// # Panics
    ///
    /// Panics when the move loop ends with the sentinel best score: a
    /// position with no moves is starved and never reaches recursion.
    #[must_use]
    pub fn negamax(&self, game: &Game, alpha: i8, beta: i8, depth: i32) -> (i8, Game) {
        self.count_visit();
        self.set_depth(depth);
        self.set_base(depth);

        let position = *game.current();
        let rank = position.rank();

        // Decided by the capture threshold: half the seeds are gone
        // and no further capture can change the outcome.
        if position.is_decided() {
            self.count_game_over();
            return (0, game.clone());
        }

        // Starved: terminal, each side takes its own seeds.
        if position.is_starved() {
            let score = position.split();
            self.set_score(rank, alpha, beta, score);
            self.count_game_over();
            debug!("{game} starved: {score}");
            return (score, game.clone());
        }

        // Cycle: terminal with the accumulated captures.
        if game.cycle() {
            let score = game.capture();
            self.count_game_over();
            debug!("{game} cycle: {score}");
            return (score, game.clone());
        }

        // A final table entry ends the search here. The continuation
        // is whatever the caller already has.
        if let Some(interval) = self.interval(rank) {
            if interval.is_final() {
                return (interval.score(), game.clone());
            }
        }

        // Recursion bottom: database score if we have one, cheap
        // parity heuristic otherwise.
        if depth == 0 {
            if let Some(score) = self.db.score(rank) {
                self.count_db_hit();
                return (score, game.clone());
            }
            self.count_heuristic();
            return (game.heuristic(), game.clone());
        }

        // Cancelled: return something cheap, the deepener discards it.
        if self.iteration_aborted() || self.deepener_aborted() {
            return (game.heuristic(), game.clone());
        }

        let legal = self.legal_moves(rank);
        let mut best_score = i8::MIN;
        let mut best_game = game.clone();

        for m in self.killer_moves(rank) {
            // The first level below the iteration root keeps the full
            // window: move selection needs exact scores, not bounds.
            let lower = if self.depth() - depth <= 1 {
                alpha
            } else {
                alpha.max(best_score.min(beta))
            };
            let (child_score, child_game) = self.negamax(&game.play(m), -beta, -lower, depth - 1);

            let candidate = legal.captured(m) - child_score;
            if candidate > best_score {
                best_score = candidate;
                best_game = child_game;
                best_game.set_cursor(game.cursor());

                if best_score >= beta && self.depth() - depth > 1 {
                    self.count_cutoff();
                    debug!("{game} cut at {m}: {best_score} ≥ β {beta}");
                    break;
                }
            }
        }

        assert!(
            best_score != i8::MIN,
            "recursion on a final position: rank {rank}"
        );

        self.set_score(rank, alpha, beta, best_score);
        (best_score, best_game)
    }
}
