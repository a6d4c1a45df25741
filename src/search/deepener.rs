//! Iterative deepening with a wall-clock watchdog.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use log::{debug, info};

use crate::board::Game;
use crate::db::Database;
use crate::levels::level;

use super::partition::quartiles;
use super::tt::TranspositionTable;

/// Deepen the search depth by depth until the budget runs out or the
/// tree bottoms out, returning the table of the deepest completed
/// iteration.
///
/// Every iteration runs on a fresh table chained to its predecessor;
/// an iteration the watchdog interrupts is discarded in favor of that
/// predecessor.
pub(crate) fn explore(
    game: &Game,
    db: &Arc<Database>,
    workers: usize,
    budget: Duration,
) -> Arc<TranspositionTable> {
    // The seeds on the board bound the score range and feed the
    // workload histogram.
    let layer = level(game.current().rank());
    let windows = quartiles(-layer, layer, layer, workers);
    info!("aspiration windows for layer {layer}: {windows:?}");

    let mut tt = Arc::new(TranspositionTable::new(game.clone(), Arc::clone(db)));

    let watchdog = tt.deepener_latch();
    thread::Builder::new()
        .name("watchdog".into())
        .spawn(move || {
            thread::sleep(budget);
            watchdog.trip();
            info!("watchdog");
        })
        .expect("failed to spawn the watchdog");

    let mut depth = 2;
    while !tt.deepener_aborted() {
        let next = tt.restart();
        next.set_game(game);
        next.aspiration(&windows, depth);
        debug!("depth {depth}: {next}");

        // Nothing reached the leaves: the game tree is exhausted and
        // deeper iterations cannot learn more.
        if next.base() > 0 {
            info!("base {} above bottom: solved", next.base());
            tt = next;
            break;
        }

        // Interrupted mid-iteration: the results are partial, keep
        // the previous table.
        if next.deepener_aborted() {
            info!("watchdog: discard the unfinished iteration");
            break;
        }

        info!("{next}");
        tt = next;
        depth += 1;
    }

    tt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Position;

    #[test]
    fn deepener_solves_a_forced_endgame() {
        // The two-seed march is forced into a cycle worth 0; the tree
        // is finite, so the deepener bottoms out long before a generous
        // budget and publishes an exact root score.
        let position: Position = "1.0.0.0.0.0-1.0.0.0.0.0".parse().expect("board");
        let game = Game::new(position);
        let tt = explore(
            &game,
            &Arc::new(Database::closed()),
            2,
            Duration::from_secs(30),
        );

        assert!(tt.known(position.rank()));
        let interval = tt.interval(position.rank()).expect("root interval");
        assert!(interval.is_final());
        assert_eq!(interval.score(), 0);
    }

    #[test]
    fn deepener_watchdog_returns_a_completed_iteration() {
        let game = Game::new(Position::initial());
        let tt = explore(
            &game,
            &Arc::new(Database::closed()),
            2,
            Duration::from_millis(400),
        );

        // Whatever depth was reached, the table is a completed
        // iteration (or the untouched initial table) and the game is
        // intact.
        assert_eq!(tt.game().first().board(), Position::initial().board());
    }
}
