//! Error types for board, position, and game text parsing.

use std::fmt;

use super::Rank;

/// Error type for text-format parsing failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Board text does not contain exactly 12 pit counts
    PitCount { found: usize },
    /// A pit count is not a small non-negative integer
    PitValue { pit: usize, text: String },
    /// Game trail lacks the leading rank element
    MissingRank,
    /// Rank element is not an integer
    Rank { text: String },
    /// Rank outside [0, MAX_RANK]
    RankRange { rank: Rank },
    /// Empty move element in a game trail
    EmptyMove { index: usize },
    /// Move letter outside A..F / a..f
    UnknownMove { letter: char },
    /// Move sows from a pit that holds no seeds
    EmptyPit { letter: char },
    /// Moves follow a finished game
    PastGameOver { index: usize },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::PitCount { found } => {
                write!(f, "board must have 12 pits, found {found}")
            }
            ParseError::PitValue { pit, text } => {
                write!(f, "cannot parse seed count '{text}' for pit {pit}")
            }
            ParseError::MissingRank => write!(f, "game trail has no rank element"),
            ParseError::Rank { text } => write!(f, "cannot parse rank '{text}'"),
            ParseError::RankRange { rank } => write!(f, "rank out of range: {rank}"),
            ParseError::EmptyMove { index } => {
                write!(f, "empty move at trail element {index}")
            }
            ParseError::UnknownMove { letter } => write!(f, "no such move: '{letter}'"),
            ParseError::EmptyPit { letter } => {
                write!(f, "move '{letter}' sows from an empty pit")
            }
            ParseError::PastGameOver { index } => {
                write!(f, "trail element {index} follows a finished game")
            }
        }
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mentions_the_offender() {
        let err = ParseError::PitCount { found: 3 };
        assert!(err.to_string().contains('3'));

        let err = ParseError::UnknownMove { letter: 'x' };
        assert!(err.to_string().contains("'x'"));

        let err = ParseError::RankRange { rank: -7 };
        assert!(err.to_string().contains("-7"));
    }

    #[test]
    fn errors_are_comparable() {
        assert_eq!(
            ParseError::EmptyMove { index: 2 },
            ParseError::EmptyMove { index: 2 }
        );
    }
}
