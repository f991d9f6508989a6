#![warn(missing_docs)]
//! rulebench Core - Measurement Runtime
//!
//! This crate provides the pieces every benchmark run is built from:
//! - The data model (`TestCase`, `CodeSample`, `RuleConfig`, `BenchmarkConfig`)
//! - A millisecond `Timer`
//! - The sample executor (`run_samples`): warmup, then timed iterations bounded
//!   by an iteration budget and a timeout budget
//! - The rule evaluator seam (`EvaluatorProvider` / `RuleEvaluator`) plus a
//!   default module-backed provider

mod evaluator;
mod measure;
mod model;
mod sampler;

pub use evaluator::{
    ChainLoader, DefaultDirectRule, DefaultRulesCollection, Diagnostic, DirectRule,
    EvaluateError, Evaluator, EvaluatorError, EvaluatorFactory, EvaluatorProvider,
    ExtractionStrategy, Finding, LoadOutcome, ModuleCache, ModuleEvaluatorProvider, ModuleExport,
    ModuleKey, ModuleRegistry, ModuleSource, ParserKind, Rule, RuleContext, RuleEvaluator,
    RuleHandle, RuleLoader, RulesCollection,
};
pub use measure::{Timer, duration_to_ms};
pub use model::{
    BenchmarkConfig, CodeSample, Language, RuleConfig, Severity, TestCase, WarmupConfig,
};
pub use sampler::{SampleRun, run_samples};

/// Prefix of every namespaced rule identifier handed to an evaluator
pub const RULE_NAMESPACE_PREFIX: &str = "rulebench";
