//! Benchmark Executor
//!
//! Orchestrates test cases and turns their raw samples into processed tasks.
//!
//! ## Pipeline Overview
//!
//! ```text
//! TestSpec[] / TestCase[]
//!       │
//!       ▼
//! ┌─────────────┐
//! │  execution  │  One evaluator per case, serial timing loops
//! └──────┬──────┘
//!        │  MeasuredSample[]
//!        ▼
//! ┌─────────────┐
//! │ statistics  │  Outlier filter + summary (parallel)
//! └──────┬──────┘
//!        │  ProcessedBenchmarkTask[]
//!        ▼
//! ┌─────────────┐
//! │  aggregate  │  Declared hierarchy (rulebench-report)
//! └─────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`execution`] - Orchestrator and run output
//! - [`state`] - Per-case lifecycle state machine
//! - [`statistics`] - Parallel statistics computation

mod execution;
mod state;
mod statistics;

pub use execution::{MeasuredSample, RunError, RunOutput, Runner};
pub use state::{CaseState, CaseStateMachine, InvalidCaseTransition};
pub use statistics::compute_statistics;
