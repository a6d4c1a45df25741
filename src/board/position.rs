//! Positions (board + capture scores), the combinadic ranking, and
//! verdicts.

use std::fmt;
use std::str::FromStr;

use crate::levels::binomial;

use super::{
    Board, ParseError, Rank, MAX_RANK, MAX_SEEDS, NORTH_LEFT, NORTH_RIGHT, PITS, SOUTH_LEFT,
    SOUTH_RIGHT,
};

/// A board plus the cumulative captures of both players. `scores[0]`
/// belongs to the side to move.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub(crate) board: Board,
    pub(crate) scores: [i8; 2],
}

impl Position {
    #[must_use]
    pub fn new(board: Board, scores: [i8; 2]) -> Self {
        Position { board, scores }
    }

    /// The starting position: four seeds everywhere, nothing captured.
    #[must_use]
    pub fn initial() -> Self {
        Position::new(Board::initial(), [0, 0])
    }

    #[must_use]
    pub fn board(&self) -> Board {
        self.board
    }

    #[must_use]
    pub fn scores(&self) -> [i8; 2] {
        self.scores
    }

    /// Dense index of the board under the combinadic bijection.
    ///
    /// # Panics
    ///
    /// Panics when the board carries more than 48 seeds.
    #[must_use]
    pub fn rank(&self) -> Rank {
        let mut combinadics = [0i64; PITS + 1];
        combinadics[0] = -1;
        for i in 0..PITS {
            combinadics[i + 1] = combinadics[i] + i64::from(self.board.0[i]) + 1;
        }

        let mut rank: i64 = -1;
        for (i, &c) in combinadics.iter().enumerate() {
            rank += binomial(c, i as i64);
        }

        assert!(
            self.seeds() <= MAX_SEEDS,
            "too many seeds on the board: {}",
            self.board
        );

        rank
    }

    /// Inverse of [`Position::rank`]; scores start at zero.
    ///
    /// # Panics
    ///
    /// Panics when the rank is outside `[0, MAX_RANK]`.
    #[must_use]
    pub fn unrank(rank: Rank) -> Self {
        assert!(
            (0..=MAX_RANK).contains(&rank),
            "rank out of range: {rank}"
        );

        let mut combinadics = [0i64; PITS + 1];
        let mut rest = rank;
        for d in (1..=PITS as i64).rev() {
            let mut i = 0i64;
            while binomial(i + 1, d) <= rest {
                i += 1;
            }
            combinadics[d as usize] = i;
            rest -= binomial(i, d);
        }
        combinadics[0] = -1;

        let mut board = Board::default();
        for j in 0..PITS {
            board.0[j] = (combinadics[j + 1] - combinadics[j] - 1) as i8;
        }
        Position::new(board, [0, 0])
    }

    /// The same position seen by the opponent: sides and scores swapped.
    #[must_use]
    pub fn mirrored(&self) -> Self {
        Position {
            board: self.board.mirrored(),
            scores: [self.scores[1], self.scores[0]],
        }
    }

    #[must_use]
    pub fn south_seeds(&self) -> i8 {
        self.board.0[SOUTH_LEFT..=SOUTH_RIGHT].iter().sum()
    }

    #[must_use]
    pub fn north_seeds(&self) -> i8 {
        self.board.0[NORTH_LEFT..=NORTH_RIGHT].iter().sum()
    }

    #[must_use]
    pub fn seeds(&self) -> i8 {
        self.board.seeds()
    }

    /// Score delta when each player takes the seeds on her side.
    #[must_use]
    pub fn split(&self) -> i8 {
        self.south_seeds() - self.north_seeds()
    }

    /// Capture-score balance from the mover's point of view.
    #[must_use]
    pub fn score(&self) -> i8 {
        self.scores[0] - self.scores[1]
    }

    /// Same board, scores disregarded. This is the equality cycle
    /// detection uses.
    #[must_use]
    pub fn same_board(&self, other: &Position) -> bool {
        self.board == other.board
    }

    /// Is the side to move left without seeds?
    #[must_use]
    pub fn is_starved(&self) -> bool {
        self.board.0[SOUTH_LEFT..=SOUTH_RIGHT]
            .iter()
            .all(|&seeds| seeds == 0)
    }

    #[must_use]
    pub fn is_won(&self) -> bool {
        self.scores[0] > MAX_SEEDS / 2
    }

    #[must_use]
    pub fn is_lost(&self) -> bool {
        self.scores[1] > MAX_SEEDS / 2
    }

    #[must_use]
    pub fn is_drawn(&self) -> bool {
        self.scores[0] == MAX_SEEDS / 2 && self.scores[1] == MAX_SEEDS / 2
    }

    /// Decided by the capture threshold: one side owns more than half
    /// the seeds, or both own exactly half.
    #[must_use]
    pub fn is_decided(&self) -> bool {
        self.is_won() || self.is_lost() || self.is_drawn()
    }

    #[must_use]
    pub fn game_over(&self) -> bool {
        self.is_decided() || self.is_starved()
    }

    #[must_use]
    pub fn verdict(&self) -> Verdict {
        if self.is_won() {
            Verdict::Win
        } else if self.is_lost() {
            Verdict::Loss
        } else if self.is_drawn() {
            Verdict::Draw
        } else {
            Verdict::Open
        }
    }

    /// Credit each side with the seeds on its own half; the terminal
    /// split for starved and cycled games.
    pub(crate) fn credit_split(&mut self) {
        self.scores[0] += self.south_seeds();
        self.scores[1] += self.north_seeds();
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rank: {}, board: {}, score: {}:{}",
            self.rank(),
            self.board,
            self.scores[0],
            self.scores[1]
        )
    }
}

impl FromStr for Position {
    type Err = ParseError;

    /// Parses a board in `4.4.4.4.4.4-4.4.4.4.4.4` form; scores start
    /// at zero.
    fn from_str(s: &str) -> Result<Self, ParseError> {
        Ok(Position::new(s.parse()?, [0, 0]))
    }
}

/// What the capture scores already say about the game.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Verdict {
    Open,
    Loss,
    Draw,
    Win,
}

impl Verdict {
    /// The opponent's view.
    #[must_use]
    pub fn reversed(self) -> Self {
        match self {
            Verdict::Win => Verdict::Loss,
            Verdict::Loss => Verdict::Win,
            Verdict::Draw => Verdict::Draw,
            Verdict::Open => Verdict::Open,
        }
    }

    /// Combine two observations. Open yields to anything; a genuine
    /// conflict collapses back to Open; the verdict is display-side
    /// information and never drives pruning.
    #[must_use]
    pub fn intersect(self, other: Verdict) -> Self {
        match (self, other) {
            (a, b) if a == b => a,
            (a, Verdict::Open) => a,
            (Verdict::Open, b) => b,
            _ => Verdict::Open,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Open => Ok(()),
            Verdict::Loss => write!(f, "loss"),
            Verdict::Draw => write!(f, "draw"),
            Verdict::Win => write!(f, "win"),
        }
    }
}
