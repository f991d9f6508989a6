#![warn(missing_docs)]
//! rulebench Statistical Engine
//!
//! Turns raw duration samples into stable, comparable metrics:
//! - Outlier rejection via Tukey's fences (IQR method)
//! - Nearest-rank percentiles (observed values only, never interpolated)
//! - Descriptive statistics snapshot (mean, median, spread, throughput)
//!
//! All samples are durations in **milliseconds**. The derived `period` is in
//! seconds and `hz` in operations per second.

mod outliers;
mod percentiles;
mod summary;

pub use outliers::{FilteredSampleSet, OutlierFilter, filter_outliers};
pub use percentiles::{nearest_rank, nearest_rank_index};
pub use summary::{BenchmarkMetrics, calculate_statistics};

/// Default Tukey fence multiplier applied to the IQR
pub const DEFAULT_IQR_MULTIPLIER: f64 = 1.5;

/// Milliseconds per second, used to convert a mean sample into a period
pub const MILLIS_PER_SECOND: f64 = 1000.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert!((DEFAULT_IQR_MULTIPLIER - 1.5).abs() < f64::EPSILON);
        assert!((MILLIS_PER_SECOND - 1000.0).abs() < f64::EPSILON);
    }
}
