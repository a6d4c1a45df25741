//! Game history: a sequence of positions and the moves between them,
//! plus a cursor at the "current" position.
//!
//! Destructive operations return a new game and leave the original
//! untouched; positions are small `Copy` values, so a clone is cheap.

use std::fmt;
use std::str::FromStr;

use crate::levels::level;

use super::{Move, ParseError, Position, Rank, MAX_RANK, MIN_RANK};

/// An ordered sequence of positions with one fewer move than positions.
/// The cursor is a position index.
#[derive(Clone, Debug)]
pub struct Game {
    positions: Vec<Position>,
    moves: Vec<Move>,
    cursor: usize,
}

impl Game {
    #[must_use]
    pub fn new(position: Position) -> Self {
        Game {
            positions: vec![position],
            moves: Vec::new(),
            cursor: 0,
        }
    }

    /// Single-position game at the given rank, scores zeroed.
    #[must_use]
    pub fn from_rank(rank: Rank) -> Self {
        Game::new(Position::unrank(rank))
    }

    #[must_use]
    pub fn first(&self) -> &Position {
        &self.positions[0]
    }

    /// The position the cursor points at.
    #[must_use]
    pub fn current(&self) -> &Position {
        &self.positions[self.cursor]
    }

    /// Position before the cursor; with no predecessor, the mirrored
    /// current position stands in.
    #[must_use]
    pub fn before_current(&self) -> Position {
        if self.positions.len() < 2 || self.cursor < 1 {
            self.current().mirrored()
        } else {
            self.positions[self.cursor - 1]
        }
    }

    #[must_use]
    pub fn last(&self) -> &Position {
        &self.positions[self.positions.len() - 1]
    }

    /// Position before the last; with no predecessor, the mirrored
    /// current position stands in.
    #[must_use]
    pub fn before_last(&self) -> Position {
        if self.positions.len() < 2 {
            self.current().mirrored()
        } else {
            self.positions[self.positions.len() - 2]
        }
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set_cursor(&mut self, cursor: usize) {
        assert!(
            cursor < self.positions.len(),
            "cursor {cursor} > #positions {}",
            self.positions.len()
        );
        self.cursor = cursor;
    }

    #[must_use]
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    #[must_use]
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Execute a move from the current (cursor) position: the history
    /// past the cursor is dropped, the new position appended, and the
    /// cursor advanced. A cycle or starvation triggers the terminal
    /// split: each side takes the seeds on its own half.
    #[must_use]
    pub fn play(&self, m: Move) -> Game {
        let mut out = Game {
            positions: self.positions[..=self.cursor].to_vec(),
            moves: self.moves[..self.cursor].to_vec(),
            cursor: self.cursor,
        };

        let next = out.last().play(m);
        out.positions.push(next);
        out.moves.push(m);
        out.cursor = self.cursor + 1;

        if out.cycle() || out.last().is_starved() {
            if let Some(last) = out.positions.last_mut() {
                last.credit_split();
            }
        }

        out
    }

    /// True when the last position's board already occurred earlier.
    /// Scores are disregarded: the board and the side to move identify
    /// a repetition.
    #[must_use]
    pub fn cycle(&self) -> bool {
        let last = *self.last();
        self.positions[..self.positions.len() - 1]
            .iter()
            .any(|earlier| earlier.same_board(&last))
    }

    /// Game over when the last position is decided or starved, or the
    /// history cycles.
    #[must_use]
    pub fn game_over(&self) -> bool {
        self.last().game_over() || self.cycle()
    }

    /// Cheap score guess for the current position. Only an even number
    /// of seeds can split evenly, so odd layers sit half a seed worse.
    /// Does not touch the recorded scores.
    #[must_use]
    pub fn heuristic(&self) -> i8 {
        if level(self.current().rank()) % 2 == 0 {
            0
        } else {
            -1
        }
    }

    /// Accumulated capture score at the cursor.
    #[must_use]
    pub fn capture(&self) -> i8 {
        if self.positions.len() < 2 || self.cursor < 1 {
            self.current().score()
        } else {
            self.current().score() + self.before_current().score()
        }
    }

    /// Same positions and cursor? Capture scores are part of the
    /// positions' boards-and-scores comparison already done per move,
    /// so board equality suffices here.
    #[must_use]
    pub fn same_game(&self, other: &Game) -> bool {
        self.positions.len() == other.positions.len()
            && self.cursor == other.cursor
            && self
                .positions
                .iter()
                .zip(&other.positions)
                .all(|(a, b)| a.same_board(b))
    }
}

impl fmt::Display for Game {
    /// The REST trail: `/RANK/MOVE/…`, `!` before the cursor's move,
    /// `(s-n)` after capturing moves and the last move, a trailing `.`
    /// when the game is over. South plies print uppercase, North plies
    /// lowercase.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.first().rank())?;

        for (i, m) in self.moves.iter().enumerate() {
            write!(f, "/")?;
            // No marker needed on the last move.
            if self.cursor == i + 1 && self.cursor < self.positions.len() - 1 {
                write!(f, "!")?;
            }
            if i % 2 == 0 {
                write!(f, "{}", m.letter())?;
            } else {
                write!(f, "{}", m.opposite_letter())?;
            }

            // Annotate captures and the final move with the running
            // score, printed South-first regardless of perspective.
            let after = &self.positions[i + 1];
            if (i > 1 && self.positions[i].scores[0] != after.scores[1])
                || i == self.moves.len() - 1
            {
                if i % 2 == 0 {
                    write!(f, "({}-{})", after.scores[1], after.scores[0])?;
                } else {
                    write!(f, "({}-{})", after.scores[0], after.scores[1])?;
                }
            }
        }

        if self.game_over() {
            write!(f, ".")?;
        }
        Ok(())
    }
}

impl FromStr for Game {
    type Err = ParseError;

    /// Parses a `/RANK/MOVE/…` trail. Move letters are read
    /// case-insensitively (the ply index fixes the side), a `!` prefix
    /// marks the cursor, and score annotations plus the trailing `.`
    /// are ignored and regenerated on display.
    fn from_str(s: &str) -> Result<Self, ParseError> {
        let mut game: Option<Game> = None;
        let mut cursor: Option<usize> = None;

        for (i, elem) in s.split('/').enumerate() {
            match i {
                // Server address or empty leading element.
                0 => {}
                1 => {
                    let rank: Rank = elem.parse().map_err(|_| ParseError::Rank {
                        text: elem.to_string(),
                    })?;
                    if !(MIN_RANK..=MAX_RANK).contains(&rank) {
                        return Err(ParseError::RankRange { rank });
                    }
                    game = Some(Game::from_rank(rank));
                }
                _ => {
                    let current = game.as_mut().ok_or(ParseError::MissingRank)?;
                    if current.game_over() {
                        return Err(ParseError::PastGameOver { index: i });
                    }

                    let mut chars = elem.chars();
                    let mut letter = chars.next().ok_or(ParseError::EmptyMove { index: i })?;
                    if letter == '!' {
                        letter = chars.next().ok_or(ParseError::EmptyMove { index: i })?;
                        // The cursor sits at the first marker.
                        if cursor.is_none() {
                            cursor = Some(i - 1);
                        }
                    }

                    let m = Move::from_char(letter)
                        .ok_or(ParseError::UnknownMove { letter })?;
                    if current.last().board.0[m.pit()] == 0 {
                        return Err(ParseError::EmptyPit { letter });
                    }
                    *current = current.play(m);
                }
            }
        }

        let mut game = game.ok_or(ParseError::MissingRank)?;
        let last = game.positions.len() - 1;
        game.cursor = cursor.unwrap_or(last);
        if game.cursor > last {
            game.cursor = last;
        }
        Ok(game)
    }
}
