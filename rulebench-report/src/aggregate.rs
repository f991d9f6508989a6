//! Result Aggregation
//!
//! Regroups the flat task list produced by a run into the declared
//! spec → case → sample hierarchy. Output order always follows declaration
//! order, whatever order the tasks arrive in, and every declared case and
//! sample gets a row.

use crate::NO_SAMPLES_REASON;
use crate::report::{
    CaseOutcome, CaseStatus, ProcessedBenchmarkTask, SampleRow, TestCaseResult, TestSpec,
    TestSpecResult,
};
use fxhash::{FxHashMap, FxHashSet};
use rulebench_core::TestCase;
use tracing::warn;

/// Case ids declared more than once across `specs`, in first-repeat order
///
/// Rows are matched to cases by id, so every case sharing a repeated id shows
/// the same measurements.
pub fn duplicate_case_ids(specs: &[TestSpec]) -> Vec<&str> {
    let mut seen = FxHashSet::default();
    let mut duplicates: Vec<&str> = Vec::new();
    for case in specs.iter().flat_map(|s| &s.cases) {
        if !seen.insert(case.id.as_str()) && !duplicates.contains(&case.id.as_str()) {
            duplicates.push(&case.id);
        }
    }
    duplicates
}

/// Rebuild the declared hierarchy from processed tasks and case outcomes
pub fn aggregate_results(
    specs: &[TestSpec],
    tasks: &[ProcessedBenchmarkTask],
    outcomes: &[CaseOutcome],
) -> Vec<TestSpecResult> {
    for id in duplicate_case_ids(specs) {
        warn!(case = id, "test case id declared more than once; rows will be shared");
    }

    let task_index: FxHashMap<(&str, usize), &ProcessedBenchmarkTask> = tasks
        .iter()
        .map(|t| ((t.case_id.as_str(), t.sample_index), t))
        .collect();
    let outcome_index: FxHashMap<&str, &CaseOutcome> =
        outcomes.iter().map(|o| (o.case_id.as_str(), o)).collect();

    specs
        .iter()
        .map(|spec| TestSpecResult {
            name: spec.name.clone(),
            path: spec.path.clone(),
            cases: spec
                .cases
                .iter()
                .map(|case| {
                    aggregate_case(case, outcome_index.get(case.id.as_str()).copied(), &task_index)
                })
                .collect(),
        })
        .collect()
}

fn aggregate_case(
    case: &TestCase,
    outcome: Option<&CaseOutcome>,
    tasks: &FxHashMap<(&str, usize), &ProcessedBenchmarkTask>,
) -> TestCaseResult {
    let status = outcome.map_or(CaseStatus::NotRun, |o| o.status);
    let error = outcome.and_then(|o| o.error.clone());

    let rows = if case.samples.is_empty() {
        vec![SampleRow::Placeholder {
            reason: NO_SAMPLES_REASON.to_string(),
        }]
    } else {
        case.samples
            .iter()
            .enumerate()
            .map(|(index, sample)| {
                if let Some(task) = tasks.get(&(case.id.as_str(), index)) {
                    return SampleRow::Measured {
                        task: (*task).clone(),
                    };
                }

                let failure = outcome.and_then(|o| {
                    o.sample_failures
                        .iter()
                        .find(|f| f.sample_index == index)
                });
                if let Some(failure) = failure {
                    return SampleRow::Failed {
                        filename: sample.filename.clone(),
                        error: failure.error.clone(),
                    };
                }

                let reason = if !sample.language.is_recognized() {
                    format!("unsupported language: {}", sample.language)
                } else if let Some(err) = &error {
                    err.clone()
                } else {
                    match status {
                        CaseStatus::NotRun => "not run".to_string(),
                        _ => "no measurement recorded".to_string(),
                    }
                };
                SampleRow::Skipped {
                    filename: sample.filename.clone(),
                    reason,
                }
            })
            .collect()
    };

    TestCaseResult {
        id: case.id.clone(),
        name: case.name.clone(),
        rule_id: case.rule.rule_id.clone(),
        languages: case.languages(),
        status,
        error,
        rows,
    }
}
