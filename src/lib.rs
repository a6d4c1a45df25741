//! Sankofa is the bird that looks back into the past in order to
//! understand the future: a game-theoretic analyzer for Oware.
//!
//! Provides:
//! - The Oware rule engine (sowing, capturing, grand slam, starvation)
//!   over a dense combinadic position ranking
//! - A retrograde analyzer that builds an exact-score endgame database
//!   layer by layer, with Tarjan SCC seeding for cycle members
//! - A parallel-aspiration negamax search with iterative deepening,
//!   consulting the database at the leaves
//!
//! The rule set: grand slams are allowed but capture nothing; the
//! first player past 24 captured seeds wins; a starved side with no
//! feeding move possible ends the game; the first repeated position
//! ends the game; when the game ends, each player takes the seeds on
//! her side.
//!
//! # Quick start
//!
//! ```
//! use std::time::Duration;
//! use sankofa::board::Game;
//! use sankofa::db::Database;
//! use sankofa::search::Engine;
//!
//! // Analyze the initial position for half a second, no database.
//! let engine = Engine::new(Database::closed())
//!     .with_workers(2)
//!     .with_budget(Duration::from_millis(500));
//! let game = Game::from_rank(sankofa::board::INITIAL_RANK);
//! let tt = engine.analyze(&game);
//!
//! println!("score: {:?}", tt.interval(game.current().rank()));
//! println!("line: {}", tt.game());
//! ```
//!
//! # Building the database
//!
//! ```no_run
//! use sankofa::db::Database;
//! use sankofa::retrograde::{build, BuildOptions};
//! use sankofa::sync::Latch;
//!
//! let db = Database::open("oware.db");
//! build(&db, &BuildOptions::default(), &Latch::new());
//! ```

// Enable pedantic lints with domain-specific exceptions
#![warn(clippy::pedantic)]
// Seed counts, scores, and ranks convert between i8/i64/usize all over;
// the values are bounded by the 48-seed board.
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_lossless)]
// Module-level documentation is sufficient for this codebase
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod board;
pub mod db;
pub mod levels;
pub mod retrograde;
pub mod scc;
pub mod search;
pub mod sync;
