//! Benchmark Orchestration
//!
//! Drives every test case through its lifecycle:
//!
//! ```text
//! TestCase
//!    │ no runnable samples ──▶ NoSamples (warn, skip)
//!    ▼
//! EvaluatorProvider::build ──Err──▶ EvaluatorFailed (warn, skip)
//!    │ one evaluator per case, reused across its samples
//!    ▼
//! run_samples, once per runnable sample, in declaration order
//!    │ aborted sample ──▶ SampleFailure (warn), other samples continue
//!    ▼
//! MeasuredSample ──▶ statistics ──▶ ProcessedBenchmarkTask
//! ```
//!
//! Measurement is strictly serial: one timing loop at a time across the whole
//! run. A failing case or sample never aborts the batch.

use super::state::{CaseStateMachine, InvalidCaseTransition};
use super::statistics::compute_statistics;
use crate::config::RulebenchConfig;
use indicatif::{ProgressBar, ProgressStyle};
use rulebench_core::{
    BenchmarkConfig, EvaluatorProvider, SampleRun, TestCase, duration_to_ms, run_samples,
};
use rulebench_report::{
    BenchmarkReport, CaseOutcome, CaseStatus, NO_SAMPLES_REASON, ProcessedBenchmarkTask,
    SampleFailure, TestSpec, aggregate_results,
};
use rulebench_stats::OutlierFilter;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Raw measurement of one (test case, code sample) pair
#[derive(Debug, Clone)]
pub struct MeasuredSample {
    pub case_id: String,
    pub case_name: String,
    /// Declaration index of the sample within its case
    pub sample_index: usize,
    pub filename: String,
    pub run: SampleRun,
}

/// Run-level errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunError {
    /// Every test case failed or had no runnable samples
    #[error("no runnable work: the run produced no benchmark results")]
    NoRunnableWork,
}

/// Flat result of orchestrating a set of test cases
#[derive(Debug, Clone, Default)]
pub struct RunOutput {
    /// Processed tasks, in case then sample declaration order
    pub tasks: Vec<ProcessedBenchmarkTask>,
    /// One outcome per test case, in execution order
    pub outcomes: Vec<CaseOutcome>,
}

impl RunOutput {
    /// Whether the run produced no tasks
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Tasks, or [`RunError::NoRunnableWork`] when there are none
    pub fn require_tasks(&self) -> Result<&[ProcessedBenchmarkTask], RunError> {
        if self.tasks.is_empty() {
            return Err(RunError::NoRunnableWork);
        }
        Ok(&self.tasks)
    }

    /// Warnings raised by the run: one per skipped case, one per aborted sample
    pub fn warning_count(&self) -> usize {
        self.outcomes
            .iter()
            .map(|o| match o.status {
                CaseStatus::EvaluatorFailed | CaseStatus::NoSamples => 1,
                _ => o.sample_failures.len(),
            })
            .sum()
    }

    /// Outcome recorded for `case_id`
    pub fn outcome(&self, case_id: &str) -> Option<&CaseOutcome> {
        self.outcomes.iter().find(|o| o.case_id == case_id)
    }

    /// Tasks produced for `case_id`
    pub fn tasks_for<'a>(
        &'a self,
        case_id: &'a str,
    ) -> impl Iterator<Item = &'a ProcessedBenchmarkTask> + 'a {
        self.tasks.iter().filter(move |t| t.case_id == case_id)
    }
}

/// Benchmark orchestrator
pub struct Runner<P> {
    provider: P,
    config: BenchmarkConfig,
    filter: OutlierFilter,
    show_progress: bool,
}

impl<P: EvaluatorProvider> Runner<P> {
    pub fn new(provider: P, config: BenchmarkConfig) -> Self {
        Self {
            provider,
            config,
            filter: OutlierFilter::default(),
            show_progress: false,
        }
    }

    /// Build a runner from a loaded configuration file
    pub fn from_config(provider: P, config: &RulebenchConfig) -> anyhow::Result<Self> {
        Ok(Self::new(provider, config.benchmark_config()?)
            .with_outlier_filter(OutlierFilter::new(config.outlier_multiplier()?))
            .with_progress(config.runner.progress))
    }

    pub fn with_outlier_filter(mut self, filter: OutlierFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Show an indicatif progress bar (hidden by default)
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn config(&self) -> &BenchmarkConfig {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Run every declared case and assemble the hierarchical report
    pub async fn run(&self, specs: &[TestSpec]) -> BenchmarkReport {
        let output = self.execute(specs.iter().flat_map(|s| &s.cases)).await;
        self.report(specs, &output)
    }

    /// Regroup a run's output under the declared specs
    pub fn report(&self, specs: &[TestSpec], output: &RunOutput) -> BenchmarkReport {
        let results = aggregate_results(specs, &output.tasks, &output.outcomes);
        BenchmarkReport::new(&self.config, results)
    }

    /// Measure the given cases and compute their statistics
    pub async fn execute<'a>(&self, cases: impl IntoIterator<Item = &'a TestCase>) -> RunOutput {
        let cases: Vec<&TestCase> = cases.into_iter().collect();

        info!(
            name = %self.config.name,
            cases = cases.len(),
            iterations = self.config.iterations,
            timeout_ms = duration_to_ms(self.config.timeout),
            warmup = self.config.warmup.enabled,
            "starting benchmark run"
        );

        let pb = if self.show_progress {
            ProgressBar::new(cases.len() as u64)
        } else {
            ProgressBar::hidden()
        };
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );

        let mut measured = Vec::new();
        let mut outcomes = Vec::with_capacity(cases.len());

        for case in cases {
            pb.set_message(case.id.clone());
            let outcome = match self.execute_case(case, &mut measured).await {
                Ok(outcome) => outcome,
                Err(transition) => {
                    error!(case = %case.id, error = %transition, "test case lifecycle violated");
                    CaseOutcome {
                        case_id: case.id.clone(),
                        status: CaseStatus::NotRun,
                        error: Some(transition.to_string()),
                        sample_failures: Vec::new(),
                    }
                }
            };
            outcomes.push(outcome);
            pb.inc(1);
        }

        pb.finish_with_message("Complete");

        let tasks = compute_statistics(&measured, &self.filter);
        let output = RunOutput { tasks, outcomes };

        if output.is_empty() {
            info!("benchmark run produced no results");
        } else {
            info!(
                tasks = output.tasks.len(),
                warnings = output.warning_count(),
                "benchmark run finished"
            );
        }

        output
    }

    async fn execute_case(
        &self,
        case: &TestCase,
        measured: &mut Vec<MeasuredSample>,
    ) -> Result<CaseOutcome, InvalidCaseTransition> {
        let mut lifecycle = CaseStateMachine::new();
        let runnable: Vec<_> = case.runnable_samples().collect();

        if runnable.is_empty() {
            lifecycle.no_samples()?;
            warn!(
                case = %case.id,
                declared = case.samples.len(),
                "skipping test case: no runnable samples"
            );
            return Ok(CaseOutcome {
                case_id: case.id.clone(),
                status: CaseStatus::NoSamples,
                error: Some(NO_SAMPLES_REASON.to_string()),
                sample_failures: Vec::new(),
            });
        }

        lifecycle.begin_build()?;
        let evaluator = match self.provider.build(&case.rule, &case.languages()).await {
            Ok(evaluator) => {
                lifecycle.evaluator_ready()?;
                evaluator
            }
            Err(err) => {
                lifecycle.evaluator_failed()?;
                warn!(
                    case = %case.id,
                    rule = %case.rule.rule_id,
                    error = %err,
                    "skipping test case: evaluator construction failed"
                );
                return Ok(CaseOutcome {
                    case_id: case.id.clone(),
                    status: CaseStatus::EvaluatorFailed,
                    error: Some(err.to_string()),
                    sample_failures: Vec::new(),
                });
            }
        };

        lifecycle.begin_sampling()?;
        let mut failures = Vec::new();

        for (index, sample) in runnable {
            let run = run_samples(&self.config, || {
                evaluator.evaluate(&sample.code, &sample.filename)
            })
            .await;

            if run.aborted {
                let error = run.error.clone().unwrap_or_default();
                warn!(
                    case = %case.id,
                    sample = %sample.filename,
                    error = %error,
                    collected = run.samples.len(),
                    "sample measurement aborted"
                );
                failures.push(SampleFailure {
                    sample_index: index,
                    filename: sample.filename.clone(),
                    error,
                });
            } else {
                debug!(
                    case = %case.id,
                    sample = %sample.filename,
                    samples = run.samples.len(),
                    warmup_calls = run.warmup_calls,
                    total_ms = duration_to_ms(run.total_time),
                    "sample measured"
                );
            }

            measured.push(MeasuredSample {
                case_id: case.id.clone(),
                case_name: case.name.clone(),
                sample_index: index,
                filename: sample.filename.clone(),
                run,
            });
        }

        lifecycle.finish(!failures.is_empty())?;
        let status = lifecycle.state().status().unwrap_or(CaseStatus::Completed);

        Ok(CaseOutcome {
            case_id: case.id.clone(),
            status,
            error: None,
            sample_failures: failures,
        })
    }
}
