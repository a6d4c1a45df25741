//! Game history, cycle detection, and trail text tests.

use crate::board::{Game, Move, Position, INITIAL_RANK};

fn game(text: &str) -> Game {
    text.parse().expect("test game")
}

/// Two lone seeds marching in lockstep return to the start in 12 plies
/// without a single capture.
const MARCH: [usize; 12] = [0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5];

fn march_start() -> Position {
    "1.0.0.0.0.0-1.0.0.0.0.0".parse().expect("march board")
}

#[test]
fn play_appends_and_advances_the_cursor() {
    let start = Game::new(Position::initial());
    let next = start.play(Move::new(0));
    assert_eq!(next.cursor(), 1);
    assert_eq!(next.positions().len(), 2);
    assert_eq!(next.moves(), &[Move::new(0)]);
    // The original is untouched.
    assert_eq!(start.cursor(), 0);
    assert_eq!(start.positions().len(), 1);
}

#[test]
fn play_truncates_at_the_cursor() {
    let mut game = Game::new(Position::initial())
        .play(Move::new(0))
        .play(Move::new(1));
    game.set_cursor(1);
    let rewound = game.play(Move::new(2));
    assert_eq!(rewound.positions().len(), 3);
    assert_eq!(rewound.moves()[0], Move::new(0));
    assert_eq!(rewound.moves()[1], Move::new(2));
    assert_eq!(rewound.cursor(), 2);
}

#[test]
fn starvation_splits_the_remaining_seeds() {
    // A keeps the lone seed on the mover's side; the opponent is left
    // starved and the terminal split credits the seed to its owner.
    let start = Game::new("1.0.0.0.0.0-0.0.0.0.0.0".parse().unwrap());
    let finished = start.play(Move::new(0));
    assert!(finished.last().is_starved());
    assert!(finished.game_over());
    assert_eq!(finished.last().scores(), [0, 1]);
}

#[test]
fn cycle_detection_finds_the_march() {
    let mut game = Game::new(march_start());
    for (i, &pit) in MARCH.iter().enumerate() {
        assert!(!game.cycle(), "premature cycle at ply {i}");
        game = game.play(Move::new(pit));
    }
    assert!(game.cycle());
    assert!(game.game_over());
    // The terminal split hands each side its own seed; accumulated
    // captures stay zero.
    assert_eq!(game.last().scores(), [1, 1]);
    assert_eq!(game.capture(), 0);
}

#[test]
fn heuristic_follows_layer_parity() {
    // 48 seeds: even layer.
    assert_eq!(Game::new(Position::initial()).heuristic(), 0);
    // A single seed: odd layer.
    assert_eq!(Game::from_rank(5).heuristic(), -1);
}

#[test]
fn trail_roundtrip_plain() {
    let game = Game::new(Position::initial())
        .play(Move::new(0))
        .play(Move::new(1));
    let text = game.to_string();
    assert!(text.starts_with(&format!("/{INITIAL_RANK}/A/b")));
    let parsed: Game = text.parse().expect("round trip");
    assert!(parsed.same_game(&game));
    assert_eq!(parsed.to_string(), text);
}

#[test]
fn trail_roundtrip_with_cursor_marker() {
    let mut played = Game::new(Position::initial())
        .play(Move::new(0))
        .play(Move::new(1))
        .play(Move::new(2));
    played.set_cursor(1);
    let text = played.to_string();
    assert!(text.contains("/!A/"), "marker missing in {text}");
    let parsed = game(&text);
    assert_eq!(parsed.cursor(), 1);
    assert!(parsed.same_game(&played));
    assert_eq!(parsed.to_string(), text);
}

#[test]
fn trail_roundtrip_game_over() {
    let mut cycle = Game::new(march_start());
    for &pit in &MARCH {
        cycle = cycle.play(Move::new(pit));
    }
    let text = cycle.to_string();
    assert!(text.ends_with('.'), "no game-over mark in {text}");
    let parsed = game(&text);
    assert!(parsed.game_over());
    assert!(parsed.same_game(&cycle));
    assert_eq!(parsed.to_string(), text);
}

#[test]
fn trail_rejects_garbage() {
    assert!("".parse::<Game>().is_err());
    assert!("/".parse::<Game>().is_err());
    assert!("/notarank/A".parse::<Game>().is_err());
    assert!("/-3/A".parse::<Game>().is_err());
    assert!(format!("/{INITIAL_RANK}/Z").parse::<Game>().is_err());
    assert!("/9999999999999999/A".parse::<Game>().is_err());
}

#[test]
fn trail_rejects_empty_pit_moves() {
    let start = Game::new("2.0.0.0.0.0-1.0.0.0.0.0".parse().unwrap());
    // After A, the reply pit b holds nothing.
    let text = format!("{}/b", start.play(Move::new(0)));
    assert!(text.parse::<Game>().is_err());
}

#[test]
fn trail_rejects_moves_past_game_over() {
    let mut cycle = Game::new(march_start());
    for &pit in &MARCH {
        cycle = cycle.play(Move::new(pit));
    }
    let text = format!("{}/A", cycle.to_string().trim_end_matches('.'));
    assert!(text.parse::<Game>().is_err());
}

#[test]
fn capture_accumulates_scores() {
    // F captures two seeds; the capture is visible at the new cursor.
    let start = Game::new("0.0.0.0.0.1-1.1.0.0.0.0".parse().unwrap());
    let after = start.play(Move::new(5));
    assert_eq!(after.current().scores(), [0, 2]);
    assert_eq!(after.capture(), -2);
}
