//! rulebench Runner - Configuration and Orchestration
//!
//! Loads `rulebench.toml`, runs test cases through the sample executor one at a
//! time and hands the results to the aggregator.

pub mod config;
mod executor;

pub use config::{BenchmarkSection, OutlierConfig, RulebenchConfig, RunnerConfig, WarmupSection};
pub use executor::{
    CaseState, CaseStateMachine, InvalidCaseTransition, MeasuredSample, RunError, RunOutput,
    Runner, compute_statistics,
};
