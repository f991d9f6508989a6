//! Descriptive Statistics
//!
//! Computes the metrics snapshot reported for one (test case, code sample)
//! pair. Input is expected to be already outlier-filtered; order does not matter.
//!
//! Conventions:
//! - Median averages the two central values for even-length input
//! - p75/p99 are nearest-rank, see [`crate::nearest_rank`]
//! - Standard deviation is the population form (divide by `n`)
//! - `period` is the mean converted from milliseconds to seconds

use crate::MILLIS_PER_SECOND;
use crate::percentiles::nearest_rank;
use serde::{Deserialize, Serialize};

/// Metrics snapshot for one measured unit of work
///
/// All duration fields are milliseconds except `period` (seconds).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkMetrics {
    /// Number of samples the metrics were derived from
    pub sample_count: usize,
    /// Arithmetic mean
    pub mean: f64,
    /// Median
    pub median: f64,
    /// Fastest sample
    pub min: f64,
    /// Slowest sample
    pub max: f64,
    /// 75th percentile (nearest rank)
    pub p75: f64,
    /// 99th percentile (nearest rank)
    pub p99: f64,
    /// Population standard deviation
    pub std_dev: f64,
    /// Mean duration in seconds
    pub period: f64,
    /// Operations per second (0 when period is not positive)
    pub hz: f64,
}

impl BenchmarkMetrics {
    /// Relative standard deviation in percent (0 when mean is 0)
    pub fn coefficient_of_variation(&self) -> f64 {
        if self.mean == 0.0 {
            0.0
        } else {
            (self.std_dev / self.mean) * 100.0
        }
    }

    /// Whether the metrics were computed from at least one sample
    pub fn has_samples(&self) -> bool {
        self.sample_count > 0
    }
}

/// Compute the metrics snapshot for `samples` (milliseconds, any order).
///
/// Never panics and never produces NaN or infinite values, even for inputs
/// near `f64::MAX`. An empty input yields all-zero metrics.
///
/// Non-finite input values (NaN, ±infinity) are dropped before anything is
/// computed, so for such input `sample_count` is the number of finite values
/// rather than `samples.len()`. Timer output is always finite.
pub fn calculate_statistics(samples: &[f64]) -> BenchmarkMetrics {
    let mut sorted: Vec<f64> = samples.iter().copied().filter(|s| s.is_finite()).collect();
    if sorted.is_empty() {
        return BenchmarkMetrics::default();
    }
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    let (mean, std_dev) = mean_and_std_dev(&sorted);

    let median = if n % 2 == 0 {
        let mid = n / 2;
        let (lo, hi) = (sorted[mid - 1], sorted[mid]);
        (lo / 2.0 + hi / 2.0).clamp(lo, hi)
    } else {
        sorted[n / 2]
    };

    let period = mean / MILLIS_PER_SECOND;
    // 1/period overflows for subnormal periods
    let hz = if period > 0.0 {
        (1.0 / period).min(f64::MAX)
    } else {
        0.0
    };

    BenchmarkMetrics {
        sample_count: n,
        mean,
        median,
        min: sorted[0],
        max: sorted[n - 1],
        p75: nearest_rank(&sorted, 0.75),
        p99: nearest_rank(&sorted, 0.99),
        std_dev,
        period,
        hz,
    }
}

/// Mean and population standard deviation of finite, sorted `samples`.
///
/// Values are scaled by the largest magnitude first so neither the sum nor the
/// squared deviations can overflow.
fn mean_and_std_dev(sorted: &[f64]) -> (f64, f64) {
    let scale = sorted[0].abs().max(sorted[sorted.len() - 1].abs());
    if scale == 0.0 {
        return (0.0, 0.0);
    }

    let n = sorted.len() as f64;
    let scaled_mean = sorted.iter().map(|x| x / scale).sum::<f64>() / n;
    let scaled_variance = sorted
        .iter()
        .map(|x| (x / scale - scaled_mean).powi(2))
        .sum::<f64>()
        / n;

    let mean = (scaled_mean * scale).clamp(sorted[0], sorted[sorted.len() - 1]);
    let std_dev = (scaled_variance.sqrt() * scale).min(f64::MAX);
    (mean, std_dev)
}
