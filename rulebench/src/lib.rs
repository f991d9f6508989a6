#![warn(missing_docs)]
//! # rulebench
//!
//! Statistical benchmark engine for lint rules.
//!
//! rulebench measures how long one rule takes to evaluate a corpus of code
//! samples and reduces the noisy wall-clock timings to stable metrics:
//! - **Sample Executor**: warmup, then timed calls bounded by an iteration and a timeout budget
//! - **Outlier Filter**: Tukey's fences (1.5 × IQR by default)
//! - **Statistics**: mean, median, nearest-rank p75/p99, population std dev, ops/sec
//! - **Isolation**: one namespaced evaluator per test case; a failing case or
//!   sample is recorded and skipped, never fatal to the run
//! - **Stable Reports**: results regrouped in declaration order, with explicit
//!   rows for failed and empty cases
//!
//! ## Quick Start
//!
//! ```ignore
//! use rulebench::prelude::*;
//!
//! let mut registry = ModuleRegistry::new();
//! registry.register_builtin("no-var", no_var);
//!
//! let specs = vec![TestSpec::new("style", vec![TestCase::new(
//!     "no-var-basic",
//!     "no-var on small files",
//!     RuleConfig::new("no-var"),
//!     vec![CodeSample::new("a.js", "var a = 1;")],
//! )])];
//!
//! let runner = Runner::new(ModuleEvaluatorProvider::new(registry), BenchmarkConfig::default());
//! let report = runner.run(&specs).await;
//! ```

// Re-export core types
pub use rulebench_core::{
    BenchmarkConfig, ChainLoader, CodeSample, Diagnostic, EvaluateError, Evaluator,
    EvaluatorError, EvaluatorFactory, EvaluatorProvider, Finding, Language, LoadOutcome,
    ModuleCache, ModuleEvaluatorProvider, ModuleExport, ModuleKey, ModuleRegistry, ModuleSource,
    ParserKind, Rule, RuleConfig, RuleContext, RuleEvaluator, RuleLoader, SampleRun, Severity,
    TestCase, Timer, WarmupConfig, run_samples,
};

// Re-export stats
pub use rulebench_stats::{
    BenchmarkMetrics, FilteredSampleSet, OutlierFilter, calculate_statistics, filter_outliers,
};

// Re-export report types
pub use rulebench_report::{
    BenchmarkReport, CaseOutcome, CaseStatus, ProcessedBenchmarkTask, SampleRow, TestCaseResult,
    TestSpec, TestSpecResult, aggregate_results,
};

// Re-export runner
pub use rulebench_runner::{RulebenchConfig, RunError, RunOutput, Runner};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        BenchmarkConfig, CodeSample, EvaluateError, Finding, ModuleEvaluatorProvider,
        ModuleRegistry, RuleConfig, RuleContext, Runner, TestCase, TestSpec, WarmupConfig,
    };
}

/// Install a `tracing` subscriber filtered by `RUST_LOG` (default `info`).
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
