//! Quartile partition of the aspiration window.
//!
//! The score range [α, β] is split into sub-windows holding a similar
//! number of positions, under the assumption that the split-score
//! histogram is a fair proxy for the true-score distribution. An
//! exhaustive minimum-deviation split would be expensive; gradient
//! descent over one-step boundary shifts stops at the first local
//! minimum, which lands close enough to the optimum.

use once_cell::sync::Lazy;

use crate::levels::repetitions;

/// Offset turning a score −48..=48 into a histogram index.
const OFFSET: usize = 48;

/// Minimum window width, end stakes included.
const MIN_WIDTH: i8 = 2;

/// Reserved partition slots.
const SLICE_CAPACITY: usize = 8;

/// Cumulative empirical histogram: `HISTOGRAM[layer][score + 48]` is
/// the number of positions of layers ≤ layer whose split-score is
/// `score`. A split of s seeds against n seeds happens in
/// `repetitions(6, s) · repetitions(6, n)` ways; layer 47 contributes
/// nothing.
static HISTOGRAM: Lazy<Box<[[i64; 97]; 49]>> = Lazy::new(|| {
    let mut histogram = Box::new([[0i64; 97]; 49]);
    for layer in 1..49i64 {
        if layer != 47 {
            for south in 0..=layer {
                let score = south - (layer - south);
                let ways = repetitions(6, south) * repetitions(6, layer - south);
                histogram[layer as usize][(score + OFFSET as i64) as usize] = ways;
            }
        }
        for index in 0..97 {
            histogram[layer as usize][index] += histogram[layer as usize - 1][index];
        }
    }
    histogram
});

fn positions_with_score(layer: i8, score: i8) -> i64 {
    HISTOGRAM[layer as usize][(i64::from(score) + OFFSET as i64) as usize]
}

/// Uniform seed partition: up to `slices` windows of the minimum
/// width, the last one taking the rest.
fn uniform(alpha: i8, beta: i8, slices: usize) -> Vec<(i8, i8)> {
    let mut windows = Vec::with_capacity(SLICE_CAPACITY);
    let mut last = alpha;
    for _ in 1..slices {
        if beta - last < MIN_WIDTH {
            break;
        }
        windows.push((last, last + MIN_WIDTH));
        last += MIN_WIDTH;
    }
    if last < beta || alpha == beta {
        windows.push((last, beta));
    }
    windows
}

/// Standard deviation of the per-window position counts.
fn deviation(windows: &[(i8, i8)], layer: i8) -> f64 {
    let n = windows.len() as f64;
    let mut sum = 0f64;
    let mut squares = 0f64;
    for &(low, high) in windows {
        let mut count = 0i64;
        for score in low..=high {
            count += positions_with_score(layer, score);
        }
        sum += count as f64;
        squares += (count as f64) * (count as f64);
    }
    ((squares - sum * sum / n) / n).sqrt()
}

/// Move the stake between windows `at-1` and `at` one step left.
/// Refuses to shrink a window below the minimum width.
fn shift_left(windows: &mut [(i8, i8)], at: usize) -> bool {
    assert!(
        at >= 1 && at < windows.len(),
        "stake {at} out of range for {} windows",
        windows.len()
    );
    if windows[at - 1].1 - windows[at - 1].0 > MIN_WIDTH {
        windows[at - 1].1 -= 1;
        windows[at].0 = windows[at - 1].1;
        true
    } else {
        false
    }
}

/// Move the stake between windows `at-1` and `at` one step right.
fn shift_right(windows: &mut [(i8, i8)], at: usize) -> bool {
    assert!(
        at >= 1 && at < windows.len(),
        "stake {at} out of range for {} windows",
        windows.len()
    );
    if windows[at].1 - windows[at].0 > MIN_WIDTH {
        windows[at].0 += 1;
        windows[at - 1].1 = windows[at].0;
        true
    } else {
        false
    }
}

/// Gradient descent in the stake-shift space; stops at the first local
/// minimum of the deviation.
fn balance(windows: &mut [(i8, i8)], layer: i8) {
    let mut best = deviation(windows, layer);
    let mut improved = true;
    while improved {
        improved = false;
        for stake in 1..windows.len() {
            if shift_right(windows, stake) {
                let candidate = deviation(windows, layer);
                if candidate < best {
                    improved = true;
                    best = candidate;
                } else {
                    shift_left(windows, stake);
                }
            }
            if shift_left(windows, stake) {
                let candidate = deviation(windows, layer);
                if candidate < best {
                    improved = true;
                    best = candidate;
                } else {
                    shift_right(windows, stake);
                }
            }
        }
    }
}

/// Split `[alpha, beta]` (clamped to ±layer) into up to `slices`
/// workload-balanced sub-windows.
#[must_use]
pub fn quartiles(alpha: i8, beta: i8, layer: i8, slices: usize) -> Vec<(i8, i8)> {
    let alpha = alpha.max(-layer);
    let beta = beta.min(layer);
    let mut windows = uniform(alpha, beta, slices);
    balance(&mut windows, layer);
    windows
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The windows must tile [α, β]: consecutive windows share their
    /// stake, the ends touch the bounds.
    fn assert_tiling(windows: &[(i8, i8)], alpha: i8, beta: i8) {
        assert!(!windows.is_empty());
        assert_eq!(windows[0].0, alpha);
        assert_eq!(windows[windows.len() - 1].1, beta);
        for pair in windows.windows(2) {
            assert_eq!(pair[0].1, pair[1].0);
        }
    }

    #[test]
    fn histogram_counts_layer_one() {
        // One seed: 6 boards on either side, cumulative over layers 0
        // and 1.
        assert_eq!(positions_with_score(1, 1), 6);
        assert_eq!(positions_with_score(1, -1), 6);
        assert_eq!(positions_with_score(1, 0), 0);
    }

    #[test]
    fn single_slice_is_the_whole_window() {
        let windows = quartiles(-10, 10, 10, 1);
        assert_eq!(windows, vec![(-10, 10)]);
    }

    #[test]
    fn windows_tile_the_range() {
        for slices in 1..=6 {
            let windows = quartiles(-48, 48, 48, slices);
            assert_tiling(&windows, -48, 48);
            assert!(windows.len() <= slices);
            for &(low, high) in &windows {
                assert!(high - low >= MIN_WIDTH, "window ({low}, {high})");
            }
        }
    }

    #[test]
    fn bounds_clamp_to_the_layer() {
        let windows = quartiles(-48, 48, 4, 2);
        assert_tiling(&windows, -4, 4);
    }

    #[test]
    fn narrow_ranges_yield_fewer_slices() {
        // Width 4 fits at most two width-2 windows.
        let windows = quartiles(-2, 2, 48, 8);
        assert_tiling(&windows, -2, 2);
        assert!(windows.len() <= 2);
    }

    #[test]
    fn balanced_windows_beat_the_uniform_seed() {
        let layer = 24;
        let slices = 4;
        let mut seed = uniform(-layer, layer, slices);
        let before = deviation(&seed, layer);
        balance(&mut seed, layer);
        let after = deviation(&seed, layer);
        assert!(after <= before);
    }

    #[test]
    fn degenerate_range_still_produces_a_window() {
        let windows = quartiles(0, 0, 48, 4);
        assert_eq!(windows, vec![(0, 0)]);
    }
}
