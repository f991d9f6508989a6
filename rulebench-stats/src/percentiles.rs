//! Nearest-Rank Percentiles
//!
//! Percentiles are read directly from a sorted sample array at rank
//! `ceil(p * n) - 1`, clamped to the valid range. Reported values are always
//! values that were actually observed.

/// Index of the `fraction` percentile (0.0..=1.0) in a sorted array of length `n`.
///
/// Returns 0 for empty arrays; callers must check emptiness before indexing.
pub fn nearest_rank_index(n: usize, fraction: f64) -> usize {
    if n == 0 {
        return 0;
    }
    let rank = (fraction * n as f64).ceil() as usize;
    rank.saturating_sub(1).min(n - 1)
}

/// Nearest-rank percentile of an ascending `sorted` slice (0.0 when empty).
///
/// # Examples
///
/// ```
/// # use rulebench_stats::nearest_rank;
/// let sorted = [10.0, 20.0, 30.0, 40.0, 50.0];
/// assert_eq!(nearest_rank(&sorted, 0.75), 40.0);
/// assert_eq!(nearest_rank(&sorted, 0.99), 50.0);
/// ```
pub fn nearest_rank(sorted: &[f64], fraction: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    sorted[nearest_rank_index(sorted.len(), fraction)]
}
