//! Combinatorics behind the position ranking: memoized binomial
//! coefficients and the cumulative position counts per layer.
//!
//! A *layer* (or level) is the number of seeds on the board, 0..=48.
//! Layer l holds `repetitions(12, l)` boards, the weak compositions of
//! l seeds into 12 pits, and the ranking assigns them the contiguous
//! interval `(upper_limit(l-1), upper_limit(l)]`. Layer 0 is exactly
//! rank 0, the empty board.

use once_cell::sync::Lazy;

/// Number of layers: 0 through 48 seeds.
pub const LAYERS: usize = 49;

/// Memoized binomial coefficients for every n, k the ranking can ask for.
///
/// Built with saturating Pascal recurrences: entries deep in the table
/// exceed `i64` and saturate, but every consulted entry has k <= 12 or
/// n <= 64 and is exact.
static BINOMIAL: Lazy<Vec<[i64; 256]>> = Lazy::new(|| {
    let mut table = vec![[0i64; 256]; 256];
    for n in 0..256 {
        table[n][0] = 1;
        for k in 1..=n {
            table[n][k] = table[n - 1][k - 1].saturating_add(table[n - 1][k]);
        }
    }
    table
});

/// Combinations of n taken by k, without repetitions.
///
/// Out-of-range inputs yield 0, with one deliberate exception: k == 0 or
/// k == n answers 1 even for degenerate n. The combinadic encode feeds
/// `binomial(-1, 0)` for its first partial sum and relies on the 1.
#[must_use]
pub fn binomial(n: i64, k: i64) -> i64 {
    if k == 0 || k == n {
        return 1;
    }
    if n < 1 || k < 1 || k > n || n >= 256 {
        return 0;
    }
    BINOMIAL[n as usize][k as usize]
}

/// Combinations of n taken by k, with repetitions: the number of weak
/// compositions of k into n slots.
#[must_use]
pub fn repetitions(n: i64, k: i64) -> i64 {
    binomial(n + k - 1, k)
}

/// `LEVEL_UPPER[l]` is the highest rank of layer l; layer l occupies
/// `(LEVEL_UPPER[l-1], LEVEL_UPPER[l]]`.
static LEVEL_UPPER: Lazy<[i64; LAYERS + 1]> = Lazy::new(|| {
    let mut limits = [0i64; LAYERS + 1];
    for level in 1..=LAYERS {
        limits[level] = limits[level - 1] + repetitions(12, level as i64);
    }
    limits
});

/// Highest rank of the given layer.
///
/// # Panics
///
/// Panics when the layer is outside 0..=49.
#[must_use]
pub fn upper_limit(level: i8) -> i64 {
    assert!(
        (0..=LAYERS as i8).contains(&level),
        "layer out of range: {level}"
    );
    LEVEL_UPPER[level as usize]
}

/// Inclusive rank bounds of the given layer.
#[must_use]
pub fn layer_bounds(level: i8) -> (i64, i64) {
    let low = if level > 0 { upper_limit(level - 1) + 1 } else { 0 };
    (low, upper_limit(level))
}

/// Number of seeds on the board for a given rank.
///
/// # Panics
///
/// Panics on a negative or super-maximal rank.
#[must_use]
pub fn level(rank: i64) -> i8 {
    assert!(rank >= 0, "negative rank: {rank}");
    for level in 0..LAYERS as i8 {
        if rank <= LEVEL_UPPER[level as usize] {
            return level;
        }
    }
    panic!("rank out of range: {rank}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binomial_basics() {
        assert_eq!(binomial(0, 0), 1);
        assert_eq!(binomial(-1, 0), 1);
        assert_eq!(binomial(5, 2), 10);
        assert_eq!(binomial(12, 1), 12);
        assert_eq!(binomial(52, 5), 2_598_960);
        assert_eq!(binomial(2, 5), 0);
        assert_eq!(binomial(-3, 2), 0);
    }

    #[test]
    fn repetitions_counts_weak_compositions() {
        // 12 ways to put one seed into 12 pits.
        assert_eq!(repetitions(12, 1), 12);
        // C(13, 2) ways for two seeds.
        assert_eq!(repetitions(12, 2), 78);
        assert_eq!(repetitions(6, 0), 1);
    }

    #[test]
    fn layer_limits() {
        assert_eq!(upper_limit(0), 0);
        assert_eq!(upper_limit(1), 12);
        // The full board space: 48 seeds in 12 pits, all layers summed.
        assert_eq!(upper_limit(48), 1_399_358_844_974);
    }

    #[test]
    fn level_of_rank() {
        assert_eq!(level(0), 0);
        assert_eq!(level(1), 1);
        assert_eq!(level(12), 1);
        assert_eq!(level(13), 2);
        assert_eq!(level(1_399_358_844_974), 48);
    }

    #[test]
    fn layer_bounds_are_contiguous() {
        let mut next = 0;
        for l in 0..LAYERS as i8 {
            let (low, high) = layer_bounds(l);
            assert_eq!(low, next);
            assert!(high >= low || l == 0);
            next = high + 1;
        }
    }

    #[test]
    #[should_panic(expected = "negative rank")]
    fn negative_rank_panics() {
        level(-1);
    }

    #[test]
    #[should_panic(expected = "rank out of range")]
    fn super_maximal_rank_panics() {
        level(1_399_358_844_975);
    }
}
