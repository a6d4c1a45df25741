//! Move execution: sowing, capturing, the grand-slam rule, and the
//! moves-in-hand heuristic.

use std::fmt;

use super::{Position, PITS, SOUTH_RIGHT};

/// A move names the mover's pit it sows from, 0..=5. In game text a
/// South ply prints as `A..F` and a North ply as `a..f`; the board is
/// mirrored after every move, so internally the mover is always South.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Move(u8);

impl Move {
    /// Playable pits per side.
    pub const COUNT: usize = 6;

    /// All moves in stable A..F order.
    pub const ALL: [Move; Move::COUNT] = [Move(0), Move(1), Move(2), Move(3), Move(4), Move(5)];

    /// # Panics
    ///
    /// Panics when the pit is not on the mover's side.
    #[must_use]
    pub fn new(pit: usize) -> Self {
        assert!(pit < Move::COUNT, "no such move: pit {pit}");
        Move(pit as u8)
    }

    #[must_use]
    pub fn pit(self) -> usize {
        usize::from(self.0)
    }

    /// Case-insensitive: the ply index, not the letter case, decides
    /// the side a move belongs to.
    #[must_use]
    pub fn from_char(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            c @ 'A'..='F' => Some(Move(c as u8 - b'A')),
            _ => None,
        }
    }

    /// South notation, `A..F`.
    #[must_use]
    pub fn letter(self) -> char {
        char::from(b'A' + self.0)
    }

    /// North notation, `a..f`: the same pit seen from the other side.
    #[must_use]
    pub fn opposite_letter(self) -> char {
        char::from(b'a' + self.0)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl Position {
    /// Execute a move: sow counterclockwise, capture backward from the
    /// landing pit, apply the grand-slam rule, and mirror the result so
    /// the side to move is South again.
    ///
    /// # Panics
    ///
    /// Panics when the source pit is empty; legality is the caller's
    /// business.
    #[must_use]
    pub fn play(&self, m: Move) -> Position {
        let seeds = self.board.0[m.pit()];
        assert!(seeds > 0, "cannot move an empty pit: {m} at {}", self.board);

        let mut out = *self;

        // Sow, skipping the source pit on every lap.
        out.board.0[m.pit()] = 0;
        let mut left = seeds;
        let mut pit = m.pit();
        let mut landing = pit;
        while left > 0 {
            pit = (pit + 1) % PITS;
            if pit == m.pit() {
                continue;
            }
            out.board.0[pit] += 1;
            left -= 1;
            landing = pit;
        }

        // A grand slam captures nothing; keep the sown board around.
        let checkpoint = out;

        // Collect opponent pits holding 2 or 3, walking backward from
        // the landing pit until the chain breaks.
        let mut i = landing;
        while i > SOUTH_RIGHT {
            if out.board.0[i] == 2 || out.board.0[i] == 3 {
                out.scores[0] += out.board.0[i];
                out.board.0[i] = 0;
                i -= 1;
            } else {
                break;
            }
        }

        // The capture is refused if it would starve the opponent,
        // unless the sowing alone already leaves them starved.
        if !checkpoint.mirrored().is_starved() && out.mirrored().is_starved() {
            out = checkpoint;
        }

        out.mirrored()
    }

    /// Maximum number of consecutive moves the mover can play without
    /// sowing into the opponent's side (the ν heuristic, used only for
    /// killer-move ordering).
    ///
    /// Walks the pits right to left. A pit whose seeds would spill over
    /// the edge is an obstacle and opens a new free interval; otherwise
    /// its seeds are sown into the intervals to its right, each pit
    /// contributing a triangular number of moves.
    #[must_use]
    pub fn moves_in_hand(&self) -> i8 {
        let mut mih = 0i64;
        let mut intervals: Vec<i64> = Vec::with_capacity(Move::COUNT);
        intervals.push(1);

        // The rightmost pit cannot be moved without feeding the opponent.
        for i in (0..SOUTH_RIGHT).rev() {
            let seeds = i64::from(self.board.0[i]);

            // A new interval starts at each obstacle.
            if seeds > (SOUTH_RIGHT - i) as i64 {
                intervals.push(1);
                continue;
            }

            let mut rest = seeds;
            if rest > 0 {
                // The initial sowing itself.
                mih += 1;
                for j in (0..intervals.len()).rev() {
                    if rest <= 0 {
                        break;
                    }
                    let (moves, remaining) = count_moves(rest, intervals[j]);
                    mih += moves;
                    rest = remaining;
                }
            }

            if let Some(current) = intervals.last_mut() {
                *current += 1;
            }
        }

        mih as i8
    }
}

/// Moves available from a single pit sowing into an empty interval at
/// its right: a triangular count while the seeds fit, plus follow-ups
/// for each remaining slot.
fn count_moves(mut seeds: i64, interval: i64) -> (i64, i64) {
    let mut rest = 0;
    if seeds > interval {
        rest = seeds - interval;
        seeds = interval;
    }

    let mut moves = 0;
    if seeds > 0 {
        moves = seeds * (seeds + 1) / 2 + seeds * (interval - 1 - seeds);
    }

    (moves, rest)
}
