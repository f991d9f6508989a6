//! Report Data Structures

use chrono::{DateTime, Utc};
use rulebench_core::{BenchmarkConfig, Language, TestCase};
use rulebench_stats::BenchmarkMetrics;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Metrics for one (test case, code sample) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedBenchmarkTask {
    /// Display name (`<case name> > <filename>`)
    pub name: String,
    /// Owning test case id
    pub case_id: String,
    /// Index of the sample in the case's declaration order
    pub sample_index: usize,
    /// Sample file name
    pub filename: String,
    /// Metrics over the outlier-filtered samples
    pub metrics: BenchmarkMetrics,
    /// Samples collected before filtering
    pub raw_sample_count: usize,
    /// Samples rejected by the outlier filter
    pub outliers_removed: usize,
}

/// A group of test cases declared together (typically one spec file)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestSpec {
    /// Spec name
    pub name: String,
    /// File the test spec was declared in, if any
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Test cases in declaration order
    pub cases: Vec<TestCase>,
}

impl TestSpec {
    /// Create a spec
    pub fn new(name: impl Into<String>, cases: Vec<TestCase>) -> Self {
        Self {
            name: name.into(),
            path: None,
            cases,
        }
    }

    /// Record the declaring file
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }
}

/// Terminal state of a test case after a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CaseStatus {
    /// Every runnable sample was measured
    Completed,
    /// At least one sample's measurement aborted
    SampleAborted,
    /// The evaluator could not be constructed
    EvaluatorFailed,
    /// Skipped: no recognized samples
    NoSamples,
    /// No outcome was recorded for this case
    NotRun,
}

impl CaseStatus {
    /// Whether the case produced any measurements
    pub fn has_measurements(self) -> bool {
        matches!(self, CaseStatus::Completed | CaseStatus::SampleAborted)
    }
}

/// A sample whose measurement aborted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleFailure {
    /// Index of the sample in declaration order
    pub sample_index: usize,
    /// Sample file name
    pub filename: String,
    /// Captured error text
    pub error: String,
}

/// What happened to one test case during orchestration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseOutcome {
    /// Test case id
    pub case_id: String,
    /// Terminal status
    pub status: CaseStatus,
    /// Case-level error (evaluator construction failure, skip reason)
    pub error: Option<String>,
    /// Per-sample aborts
    pub sample_failures: Vec<SampleFailure>,
}

/// One row of a test case in the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SampleRow {
    /// The sample was measured
    Measured {
        /// The processed task
        task: ProcessedBenchmarkTask,
    },
    /// The sample's measurement aborted
    Failed {
        /// Sample file name
        filename: String,
        /// Captured error text
        error: String,
    },
    /// The sample was never measured
    Skipped {
        /// Sample file name
        filename: String,
        /// Why it was skipped
        reason: String,
    },
    /// Stand-in row for a case without declared samples
    Placeholder {
        /// Text to display
        reason: String,
    },
}

impl SampleRow {
    /// The processed task, for measured rows
    pub fn task(&self) -> Option<&ProcessedBenchmarkTask> {
        match self {
            SampleRow::Measured { task } => Some(task),
            _ => None,
        }
    }

    /// File name of the sample, if the row refers to one
    pub fn filename(&self) -> Option<&str> {
        match self {
            SampleRow::Measured { task } => Some(&task.filename),
            SampleRow::Failed { filename, .. } | SampleRow::Skipped { filename, .. } => {
                Some(filename)
            }
            SampleRow::Placeholder { .. } => None,
        }
    }
}

/// Report entry for one declared test case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCaseResult {
    /// Test case id
    pub id: String,
    /// Display name
    pub name: String,
    /// Rule under test
    pub rule_id: String,
    /// Languages present among the case's samples
    pub languages: Vec<Language>,
    /// Terminal status
    pub status: CaseStatus,
    /// Case-level error
    pub error: Option<String>,
    /// One row per declared sample (or a single placeholder)
    pub rows: Vec<SampleRow>,
}

impl TestCaseResult {
    /// Processed tasks of this case, in sample declaration order
    pub fn tasks(&self) -> impl Iterator<Item = &ProcessedBenchmarkTask> {
        self.rows.iter().filter_map(SampleRow::task)
    }
}

/// Report entry for one declared spec
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestSpecResult {
    /// Spec name
    pub name: String,
    /// Declaring file
    pub path: Option<PathBuf>,
    /// Case results in declaration order
    pub cases: Vec<TestCaseResult>,
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    /// Run name
    pub name: String,
    /// When the report was assembled
    pub timestamp: DateTime<Utc>,
    /// Sample executor policy used for the run
    pub config: BenchmarkConfig,
}

/// Counters over a report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Declared test cases
    pub total_cases: usize,
    /// Cases with every sample measured
    pub completed: usize,
    /// Cases with at least one aborted sample
    pub sample_aborted: usize,
    /// Cases whose evaluator failed to build
    pub evaluator_failed: usize,
    /// Cases skipped for lack of samples or not run
    pub skipped: usize,
    /// Processed tasks across the report
    pub tasks: usize,
}

impl ReportSummary {
    /// Tally a set of spec results
    pub fn from_specs(specs: &[TestSpecResult]) -> Self {
        let mut summary = ReportSummary::default();
        for case in specs.iter().flat_map(|s| &s.cases) {
            summary.total_cases += 1;
            summary.tasks += case.tasks().count();
            match case.status {
                CaseStatus::Completed => summary.completed += 1,
                CaseStatus::SampleAborted => summary.sample_aborted += 1,
                CaseStatus::EvaluatorFailed => summary.evaluator_failed += 1,
                CaseStatus::NoSamples | CaseStatus::NotRun => summary.skipped += 1,
            }
        }
        summary
    }
}

/// Complete hierarchical result of one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkReport {
    /// Metadata
    pub meta: ReportMeta,
    /// Spec results in declaration order
    pub specs: Vec<TestSpecResult>,
    /// Counters
    pub summary: ReportSummary,
}

impl BenchmarkReport {
    /// Assemble a report stamped with the current time
    pub fn new(config: &BenchmarkConfig, specs: Vec<TestSpecResult>) -> Self {
        let summary = ReportSummary::from_specs(&specs);
        Self {
            meta: ReportMeta {
                name: config.name.clone(),
                timestamp: Utc::now(),
                config: config.clone(),
            },
            specs,
            summary,
        }
    }

    /// Whether any task was produced
    pub fn has_results(&self) -> bool {
        self.summary.tasks > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rulebench_stats::calculate_statistics;

    fn case_result(id: &str, status: CaseStatus, rows: Vec<SampleRow>) -> TestCaseResult {
        TestCaseResult {
            id: id.to_string(),
            name: id.to_string(),
            rule_id: "no-var".to_string(),
            languages: vec![Language::JavaScript],
            status,
            error: None,
            rows,
        }
    }

    fn measured(case_id: &str) -> SampleRow {
        SampleRow::Measured {
            task: ProcessedBenchmarkTask {
                name: format!("{case_id} > a.js"),
                case_id: case_id.to_string(),
                sample_index: 0,
                filename: "a.js".to_string(),
                metrics: calculate_statistics(&[1.0, 1.5, 2.0]),
                raw_sample_count: 3,
                outliers_removed: 0,
            },
        }
    }

    fn specs() -> Vec<TestSpecResult> {
        vec![TestSpecResult {
            name: "spec".to_string(),
            path: None,
            cases: vec![
                case_result("a", CaseStatus::Completed, vec![measured("a")]),
                case_result("b", CaseStatus::SampleAborted, vec![measured("b")]),
                case_result("c", CaseStatus::EvaluatorFailed, Vec::new()),
                case_result("d", CaseStatus::NoSamples, Vec::new()),
            ],
        }]
    }

    #[test]
    fn test_summary_counts() {
        let summary = ReportSummary::from_specs(&specs());

        assert_eq!(summary.total_cases, 4);
        assert_eq!(summary.completed, 1);
        assert_eq!(summary.sample_aborted, 1);
        assert_eq!(summary.evaluator_failed, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.tasks, 2);
    }

    #[test]
    fn test_report_json_shape() {
        let report = BenchmarkReport::new(&BenchmarkConfig::default(), specs());
        assert!(report.has_results());
        assert_eq!(report.meta.name, "rulebench");

        let json = serde_json::to_value(&report).unwrap();
        let rows = &json["specs"][0]["cases"][0]["rows"];
        assert_eq!(rows[0]["kind"], "measured");
        assert_eq!(json["specs"][0]["cases"][1]["status"], "sample-aborted");
        assert_eq!(json["summary"]["tasks"], 2);
    }

    #[test]
    fn test_has_measurements() {
        assert!(CaseStatus::Completed.has_measurements());
        assert!(CaseStatus::SampleAborted.has_measurements());
        assert!(!CaseStatus::EvaluatorFailed.has_measurements());
        assert!(!CaseStatus::NotRun.has_measurements());
    }
}
