//! Statistics Computation
//!
//! Turns raw sample runs into processed tasks once measurement is over.
//! Each run is filtered with Tukey's fences and summarized independently, so the
//! work is spread over the Rayon pool. Nothing here runs while a timing loop is
//! active.

use super::execution::MeasuredSample;
use rayon::prelude::*;
use rulebench_report::ProcessedBenchmarkTask;
use rulebench_stats::{OutlierFilter, calculate_statistics};

/// Compute a processed task for every completed run (parallelized with Rayon)
///
/// Aborted runs yield no task. Input order is preserved.
pub fn compute_statistics(
    measured: &[MeasuredSample],
    filter: &OutlierFilter,
) -> Vec<ProcessedBenchmarkTask> {
    measured
        .par_iter()
        .filter(|m| !m.run.aborted)
        .map(|m| {
            let filtered = filter.apply(&m.run.samples);
            let metrics = calculate_statistics(&filtered.filtered_samples);

            ProcessedBenchmarkTask {
                name: format!("{} > {}", m.case_name, m.filename),
                case_id: m.case_id.clone(),
                sample_index: m.sample_index,
                filename: m.filename.clone(),
                metrics,
                raw_sample_count: m.run.samples.len(),
                outliers_removed: filtered.outliers_removed_count,
            }
        })
        .collect()
}
