#![warn(missing_docs)]
//! rulebench Report - Result Hierarchy
//!
//! Measurement produces a flat list of [`ProcessedBenchmarkTask`] values, one per
//! (test case, code sample) pair. This crate regroups them into the declared
//! spec → case → sample hierarchy consumed by reporters:
//! - Declaration order is always restored, whatever order tasks finished in
//! - Every declared case and sample gets a row, failures and empty cases included
//!
//! Rendering (console, JSON, Markdown) is left to reporters; every type here is
//! `serde`-serializable so they can do so directly.

mod aggregate;
mod report;

pub use aggregate::{aggregate_results, duplicate_case_ids};
pub use report::{
    BenchmarkReport, CaseOutcome, CaseStatus, ProcessedBenchmarkTask, ReportMeta,
    ReportSummary, SampleFailure, SampleRow, TestCaseResult, TestSpec, TestSpecResult,
};

/// Reason shown for a declared test case without any samples
pub const NO_SAMPLES_REASON: &str = "no samples";
