//! Outlier Rejection
//!
//! Tukey's fences: samples outside `[Q1 - k*IQR, Q3 + k*IQR]` are dropped
//! before statistics are computed. Quartiles are read at nearest-rank style
//! indices from the sorted samples, so bounds always derive from observed values.
//!
//! When every sample is identical the IQR is zero and the fences collapse onto
//! that value: any distinct sample, even a single one, is rejected.

use crate::DEFAULT_IQR_MULTIPLIER;
use serde::{Deserialize, Serialize};

/// Samples surviving the outlier filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilteredSampleSet {
    /// Kept samples, ascending
    pub filtered_samples: Vec<f64>,
    /// Number of input samples rejected as outliers
    pub outliers_removed_count: usize,
    /// Lower fence used (0.0 for empty input)
    pub lower_bound: f64,
    /// Upper fence used (0.0 for empty input)
    pub upper_bound: f64,
}

impl FilteredSampleSet {
    fn empty() -> Self {
        Self {
            filtered_samples: Vec::new(),
            outliers_removed_count: 0,
            lower_bound: 0.0,
            upper_bound: 0.0,
        }
    }

    /// Total number of samples that went into the filter
    pub fn raw_count(&self) -> usize {
        self.filtered_samples.len() + self.outliers_removed_count
    }

    /// Percentage of input samples rejected
    pub fn removed_percentage(&self) -> f64 {
        let raw = self.raw_count();
        if raw == 0 {
            return 0.0;
        }
        (self.outliers_removed_count as f64 / raw as f64) * 100.0
    }
}

/// Tukey fence filter with a configurable multiplier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlierFilter {
    /// IQR multiplier (1.5 = standard fences, 3.0 = "far out" only)
    pub multiplier: f64,
}

impl Default for OutlierFilter {
    fn default() -> Self {
        Self {
            multiplier: DEFAULT_IQR_MULTIPLIER,
        }
    }
}

impl OutlierFilter {
    /// Create a filter with the given multiplier
    pub fn new(multiplier: f64) -> Self {
        Self { multiplier }
    }

    /// Apply the filter; see [`filter_outliers`]
    pub fn apply(&self, samples: &[f64]) -> FilteredSampleSet {
        filter_outliers(samples, self.multiplier)
    }
}

/// Reject outliers from `samples` using Tukey's fences.
///
/// The input is never mutated. Output samples are sorted ascending and
/// `filtered_samples.len() + outliers_removed_count == samples.len()`.
///
/// # Examples
///
/// ```
/// # use rulebench_stats::filter_outliers;
/// let set = filter_outliers(&[10.0, 12.0, 15.0, 11.0, 13.0, 100.0, 9.0, 14.0], 1.5);
/// assert_eq!(set.outliers_removed_count, 1);
/// assert_eq!(set.filtered_samples.last(), Some(&15.0));
/// ```
pub fn filter_outliers(samples: &[f64], multiplier: f64) -> FilteredSampleSet {
    if samples.is_empty() {
        return FilteredSampleSet::empty();
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    let q1_index = n / 4;
    let q3_index = (3 * n).div_ceil(4).saturating_sub(1);

    let q1 = sorted[q1_index];
    let q3 = sorted[q3_index];
    let iqr = q3 - q1;

    let lower_bound = q1 - multiplier * iqr;
    let upper_bound = q3 + multiplier * iqr;

    let filtered_samples: Vec<f64> = sorted
        .into_iter()
        .filter(|&s| s >= lower_bound && s <= upper_bound)
        .collect();
    let outliers_removed_count = n - filtered_samples.len();

    FilteredSampleSet {
        filtered_samples,
        outliers_removed_count,
        lower_bound,
        upper_bound,
    }
}
