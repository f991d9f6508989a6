//! Rule Evaluator Seam
//!
//! The orchestrator only sees two traits: an [`EvaluatorProvider`] that builds
//! one isolated [`RuleEvaluator`] per test case, and the evaluator itself.
//! This module also ships a default provider assembled from small parts:
//!
//! ```text
//! RuleConfig
//!     │ ModuleKey::for_rule
//!     ▼
//! ModuleCache ──miss──▶ ModuleSource (e.g. ModuleRegistry)
//!     │ ModuleExport
//!     ▼
//! RuleLoader (ChainLoader: direct → collection → default-direct → default-collection)
//!     │ RuleHandle
//!     ▼
//! EvaluatorFactory (namespaced id, severity, options, parser)
//!     │
//!     ▼
//! Evaluator: evaluate(source, filename) → diagnostics
//! ```

mod cache;
mod factory;
mod loader;
mod provider;
mod rule;

pub use cache::ModuleCache;
pub use factory::{Evaluator, EvaluatorFactory};
pub use loader::{
    ChainLoader, DefaultDirectRule, DefaultRulesCollection, DirectRule, ExtractionStrategy,
    LoadOutcome, ModuleExport, ModuleKey, ModuleRegistry, ModuleSource, RuleLoader,
    RulesCollection,
};
pub use provider::ModuleEvaluatorProvider;
pub use rule::{Finding, ParserKind, Rule, RuleContext, RuleHandle};

use crate::model::{Language, RuleConfig, Severity};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A finding reported by an evaluator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Namespaced identifier of the reporting rule
    pub rule_id: String,
    /// Severity the rule ran at
    pub severity: Severity,
    /// Human-readable message
    pub message: String,
    /// 1-based line
    pub line: u32,
    /// 1-based column
    pub column: u32,
}

/// Errors building an evaluator for a test case
#[derive(Debug, Clone, Error)]
pub enum EvaluatorError {
    /// No module is known for the rule's module key
    #[error("rule module not found: {module}")]
    RuleNotFound {
        /// Module key that failed to resolve
        module: String,
    },

    /// The module exists but could not be loaded
    #[error("failed to load rule module {module}: {reason}")]
    ModuleLoad {
        /// Module key
        module: String,
        /// Loader error text
        reason: String,
    },

    /// The module loaded but does not export the requested rule
    #[error("rule `{rule_id}` not found in module {module}: {reason}")]
    RuleIdAbsent {
        /// Requested rule
        rule_id: String,
        /// Module key
        module: String,
        /// Why every extraction strategy failed
        reason: String,
    },

    /// The rule is configured with severity `off` and would never run
    #[error("rule `{0}` is configured with severity off")]
    RuleDisabled(String),
}

/// Failure while evaluating a rule against one sample
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct EvaluateError {
    message: String,
}

impl EvaluateError {
    /// Create an error from any message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Error text
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Evaluates exactly one rule against source text
///
/// Implementations must only report findings of the rule under test, never
/// apply fixes and ignore inline directives that could disable the rule.
#[async_trait]
pub trait RuleEvaluator: Send + Sync {
    /// Evaluate the rule against `source`, reported as `filename`
    async fn evaluate(&self, source: &str, filename: &str)
    -> Result<Vec<Diagnostic>, EvaluateError>;
}

/// Builds one isolated evaluator per test case
#[async_trait]
pub trait EvaluatorProvider: Send + Sync {
    /// Build an evaluator for `rule`, given the languages present in the case
    async fn build(
        &self,
        rule: &RuleConfig,
        languages: &[Language],
    ) -> Result<Box<dyn RuleEvaluator>, EvaluatorError>;
}
