//! End-to-end search tests: the engine API as the front-end consumes
//! it.

use std::time::Duration;

use sankofa::board::{Game, Position, INITIAL_RANK};
use sankofa::db::Database;
use sankofa::retrograde::{build, BuildOptions};
use sankofa::search::Engine;
use sankofa::sync::Latch;

#[test]
fn analyze_initial_position_within_budget() {
    let engine = Engine::new(Database::closed())
        .with_workers(2)
        .with_budget(Duration::from_secs(1));
    let game = Game::from_rank(INITIAL_RANK);
    let tt = engine.analyze(&game);

    // The deepener completed at least the depth-2 iteration: the root
    // has recorded knowledge and the table saw real work.
    assert!(tt.known(INITIAL_RANK));
    assert!(tt.interval(INITIAL_RANK).is_some());
    assert!(tt.cumulative_visited() > 0);
    assert_eq!(tt.game().first().board(), Position::initial().board());
}

#[test]
fn single_worker_publishes_a_principal_variation() {
    let engine = Engine::new(Database::closed())
        .with_workers(1)
        .with_budget(Duration::from_secs(1));
    let game = Game::from_rank(INITIAL_RANK);
    let tt = engine.analyze(&game);

    let line = tt.game();
    assert!(!line.moves().is_empty(), "empty principal variation");
    assert_eq!(line.first().board(), Position::initial().board());
    // The line replays from the root: every step is a legal move.
    let mut replay = Game::new(*line.first());
    for &m in line.moves() {
        assert!(replay.current().legal_moves().contains(m));
        replay = replay.play(m);
    }
}

#[test]
fn starved_root_is_solved_exactly() {
    let position: Position = "0.0.0.0.0.0-3.0.0.0.0.0".parse().expect("board");
    let engine = Engine::new(Database::closed())
        .with_workers(2)
        .with_budget(Duration::from_secs(5));
    let tt = engine.analyze(&Game::new(position));

    let interval = tt.interval(position.rank()).expect("root interval");
    assert!(interval.is_final());
    assert_eq!(interval.score(), -3);
}

#[test]
fn forced_march_is_solved_exactly() {
    // Two seeds marching in lockstep: the game is forced into a cycle
    // worth zero. The tree is finite, so the deepener bottoms out well
    // inside the budget.
    let position: Position = "1.0.0.0.0.0-1.0.0.0.0.0".parse().expect("board");
    let engine = Engine::new(Database::closed())
        .with_workers(2)
        .with_budget(Duration::from_secs(30));
    let tt = engine.analyze(&Game::new(position));

    let interval = tt.interval(position.rank()).expect("root interval");
    assert!(interval.is_final());
    assert_eq!(interval.score(), 0);
}

#[test]
fn database_scores_reach_the_leaves() {
    // Build the endgame layers, then let a deeper midgame search lean
    // on them.
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("oware.db");
    let db = Database::open(&path);
    build(
        &db,
        &BuildOptions::default().with_layers(Some(0), 2).with_workers(2),
        &Latch::new(),
    );

    // A layer-2 position whose exact score the database knows: the
    // march cycle, seeded 0 by the SCC pass.
    let position: Position = "1.0.0.0.0.0-1.0.0.0.0.0".parse().expect("board");
    assert_eq!(db.score(position.rank()), Some(0));

    let engine = Engine::new(db)
        .with_workers(2)
        .with_budget(Duration::from_secs(10));
    let tt = engine.analyze(&Game::new(position));
    let interval = tt.interval(position.rank()).expect("root interval");
    assert!(interval.is_final());
    assert_eq!(interval.score(), 0);
}
