//! Score intervals: what is known about a rank's exact score.

use std::fmt;

use crate::board::{Rank, Verdict};
use crate::levels::level;

/// A range `[low, high]` containing the score of `rank`, plus the
/// verdict the capture totals already imply. Bounds are clamped to
/// ±level at construction: a layer cannot yield more captures than it
/// has seeds.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Interval {
    rank: Rank,
    low: i8,
    high: i8,
    verdict: Verdict,
}

impl Interval {
    /// # Panics
    ///
    /// Panics when the clamped bounds cross.
    #[must_use]
    pub fn new(rank: Rank, low: i8, high: i8, verdict: Verdict) -> Self {
        let layer = level(rank);
        let interval = Interval {
            rank,
            low: low.max(-layer),
            high: high.min(layer),
            verdict,
        };
        assert!(
            interval.high >= interval.low,
            "high < low at rank {rank}: [{}, {}]",
            interval.low,
            interval.high
        );
        interval
    }

    #[must_use]
    pub fn rank(&self) -> Rank {
        self.rank
    }

    #[must_use]
    pub fn low(&self) -> i8 {
        self.low
    }

    #[must_use]
    pub fn high(&self) -> i8 {
        self.high
    }

    #[must_use]
    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    /// The score range from the opponent's perspective.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Interval::new(self.rank, -self.high, -self.low, self.verdict.reversed())
    }

    /// Shift both bounds. No re-clamping: captures along the path move
    /// the frame of reference.
    #[must_use]
    pub fn plus(&self, delta: i8) -> Self {
        Interval {
            low: self.low + delta,
            high: self.high + delta,
            ..*self
        }
    }

    /// A zero-width interval is a final score.
    #[must_use]
    pub fn is_final(&self) -> bool {
        self.low == self.high
    }

    /// # Panics
    ///
    /// Panics on a non-final interval; check [`Interval::is_final`]
    /// first.
    #[must_use]
    pub fn score(&self) -> i8 {
        assert!(
            self.is_final(),
            "score request on non-final interval: {self}"
        );
        self.low
    }

    #[must_use]
    pub fn disjoint(&self, other: &Interval) -> bool {
        self.high < other.low || self.low > other.high
    }

    /// Combine two observations of the same rank. A final interval
    /// wins over an open one; overlapping intervals narrow; disjoint
    /// observations keep the newer (`other`).
    ///
    /// # Panics
    ///
    /// Panics when the ranks differ.
    #[must_use]
    pub fn intersect(&self, other: &Interval) -> Interval {
        assert!(
            self.rank == other.rank,
            "different ranks: {} != {}",
            self.rank,
            other.rank
        );

        if self.is_final() && !other.is_final() {
            return *self;
        }
        if other.is_final() && !self.is_final() {
            return *other;
        }
        if self.disjoint(other) {
            return *other;
        }

        Interval::new(
            self.rank,
            self.low.max(other.low),
            self.high.min(other.high),
            self.verdict.intersect(other.verdict),
        )
    }

    /// Strictly greater. Only defined on disjoint intervals.
    ///
    /// # Panics
    ///
    /// Panics when the intervals overlap.
    #[must_use]
    pub fn gt(&self, other: &Interval) -> bool {
        assert!(
            self.disjoint(other),
            "overlapping intervals are not comparable: {self} <> {other}"
        );
        self.low > other.high
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = self.verdict.to_string();
        if !verdict.is_empty() {
            write!(f, "{verdict} ")?;
        }
        if self.is_final() {
            write!(f, "{}", self.low)
        } else {
            write!(f, "[{}, {}]", self.low, self.high)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Rank 100 sits in layer 3: bounds clamp to ±3.
    const RANK: Rank = 100;

    fn open(low: i8, high: i8) -> Interval {
        Interval::new(RANK, low, high, Verdict::Open)
    }

    #[test]
    fn construction_clamps_to_the_layer() {
        let all = open(i8::MIN, i8::MAX);
        assert_eq!(all.low(), -3);
        assert_eq!(all.high(), 3);
    }

    #[test]
    fn final_interval_scores() {
        let exact = open(2, 2);
        assert!(exact.is_final());
        assert_eq!(exact.score(), 2);
    }

    #[test]
    #[should_panic(expected = "non-final")]
    fn open_interval_has_no_score() {
        let _ = open(0, 2).score();
    }

    #[test]
    #[should_panic(expected = "high < low")]
    fn crossed_bounds_panic() {
        let _ = open(2, -2);
    }

    #[test]
    fn reversed_negates_and_swaps() {
        let interval = Interval::new(RANK, -1, 2, Verdict::Win);
        let reversed = interval.reversed();
        assert_eq!(reversed.low(), -2);
        assert_eq!(reversed.high(), 1);
        assert_eq!(reversed.verdict(), Verdict::Loss);
    }

    #[test]
    fn plus_shifts_both_bounds() {
        let shifted = open(-1, 1).plus(2);
        assert_eq!((shifted.low(), shifted.high()), (1, 3));
    }

    #[test]
    fn intersection_narrows() {
        let narrowed = open(-3, 1).intersect(&open(0, 3));
        assert_eq!((narrowed.low(), narrowed.high()), (0, 1));
    }

    #[test]
    fn intersection_is_commutative_and_associative_on_overlaps() {
        let a = open(-3, 1);
        let b = open(-1, 3);
        let c = open(0, 2);
        assert_eq!(a.intersect(&b), b.intersect(&a));
        assert_eq!(
            a.intersect(&b).intersect(&c),
            a.intersect(&b.intersect(&c))
        );
    }

    #[test]
    fn final_intervals_are_sticky() {
        let exact = open(1, 1);
        let wide = open(-3, 3);
        assert_eq!(wide.intersect(&exact), exact);
        assert_eq!(exact.intersect(&wide), exact);
        // Idempotent against an equal final.
        assert_eq!(exact.intersect(&exact), exact);
    }

    #[test]
    fn disjoint_intersection_prefers_the_newer() {
        let stale = open(-3, -2);
        let fresh = open(1, 3);
        assert_eq!(stale.intersect(&fresh), fresh);
    }

    #[test]
    fn gt_on_disjoint_intervals() {
        let lower = open(-3, -1);
        let higher = open(0, 3);
        assert!(higher.gt(&lower));
        assert!(!lower.gt(&higher));
    }

    #[test]
    #[should_panic(expected = "not comparable")]
    fn gt_rejects_overlap() {
        let _ = open(-1, 1).gt(&open(0, 2));
    }

    #[test]
    #[should_panic(expected = "different ranks")]
    fn intersect_rejects_different_ranks() {
        let other = Interval::new(RANK + 1, 0, 1, Verdict::Open);
        let _ = open(0, 1).intersect(&other);
    }
}
