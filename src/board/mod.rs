//! Oware board mechanics: boards, positions, ranking, moves, games.
//!
//! Positions are always stored from the mover's perspective: pits 0..=5
//! belong to the side to move (South), pits 6..=11 to the opponent, and
//! every rule application returns a new, mirrored position. Ranks are
//! `i64`: the combinadic bijection over 12-pit boards with up to 48
//! seeds overflows 32-bit integers.

mod error;
mod game;
mod legal;
mod moves;
mod position;
#[cfg(test)]
mod tests;

pub use error::ParseError;
pub use game::Game;
pub use legal::LegalMoves;
pub use moves::Move;
pub use position::{Position, Verdict};

use std::fmt;
use std::str::FromStr;

/// Dense position index assigned by the combinadic bijection.
pub type Rank = i64;

/// Number of pits on the board.
pub const PITS: usize = 12;

/// Maximum number of seeds on the board.
pub const MAX_SEEDS: i8 = 48;

/// Rank of the empty board.
pub const MIN_RANK: Rank = 0;

/// Rank of the initial position, four seeds in every pit.
pub const INITIAL_RANK: Rank = 1_224_204_106_872;

/// Largest possible rank; counting starts at 0.
pub const MAX_RANK: Rank = 1_399_358_844_974;

pub(crate) const SOUTH_LEFT: usize = 0;
pub(crate) const SOUTH_RIGHT: usize = 5;
pub(crate) const NORTH_LEFT: usize = 6;
pub(crate) const NORTH_RIGHT: usize = 11;

/// Seed counts per pit. Pits 0..=5 are the mover's, 6..=11 the
/// opponent's.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Board(pub(crate) [i8; PITS]);

impl Board {
    #[must_use]
    pub fn new(pits: [i8; PITS]) -> Self {
        Board(pits)
    }

    /// The starting board: four seeds in every pit.
    #[must_use]
    pub fn initial() -> Self {
        Board([4; PITS])
    }

    #[must_use]
    pub fn pit(&self, i: usize) -> i8 {
        self.0[i]
    }

    #[must_use]
    pub fn seeds(&self) -> i8 {
        self.0.iter().sum()
    }

    /// Swap the two sides of the board.
    #[must_use]
    pub fn mirrored(&self) -> Self {
        let mut pits = [0; PITS];
        for i in 0..PITS {
            pits[i] = if i < NORTH_LEFT {
                self.0[i + NORTH_LEFT]
            } else {
                self.0[i - NORTH_LEFT]
            };
        }
        Board(pits)
    }
}

impl std::ops::Index<usize> for Board {
    type Output = i8;

    fn index(&self, i: usize) -> &i8 {
        &self.0[i]
    }
}

impl fmt::Display for Board {
    /// `4.4.4.4.4.4-4.4.4.4.4.4`, a dash between the two sides.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seeds) in self.0.iter().enumerate() {
            if i == NORTH_LEFT {
                write!(f, "-")?;
            } else if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{seeds}")?;
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = ParseError;

    /// Accepts any non-digit characters as pit separators.
    fn from_str(s: &str) -> Result<Self, ParseError> {
        let mut pits = [0i8; PITS];
        let mut count = 0;
        for token in s.split(|c: char| !c.is_ascii_digit()) {
            if token.is_empty() {
                continue;
            }
            if count >= PITS {
                return Err(ParseError::PitCount { found: count + 1 });
            }
            pits[count] = token.parse().map_err(|_| ParseError::PitValue {
                pit: count,
                text: token.to_string(),
            })?;
            count += 1;
        }
        if count != PITS {
            return Err(ParseError::PitCount { found: count });
        }
        Ok(Board(pits))
    }
}
