//! Evaluator Assembly
//!
//! The factory turns a loaded rule plus its configuration into an [`Evaluator`].
//! The rule is registered under `rulebench-<run uuid>/<rule id>`, so it cannot
//! collide with any real plugin name and no other rule is ever active. Fixes
//! are never applied and inline directives are never interpreted: a
//! `disable` comment in a sample cannot switch off the rule being measured.

use super::rule::{ParserKind, RuleContext, RuleHandle};
use super::{Diagnostic, EvaluateError, EvaluatorError, RuleEvaluator};
use crate::RULE_NAMESPACE_PREFIX;
use crate::model::Severity;
use async_trait::async_trait;
use uuid::Uuid;

/// Builds evaluators sharing one collision-proof namespace
#[derive(Debug, Clone)]
pub struct EvaluatorFactory {
    namespace: String,
}

impl EvaluatorFactory {
    /// Factory with a fresh random namespace
    pub fn new() -> Self {
        Self {
            namespace: format!("{}-{}", RULE_NAMESPACE_PREFIX, Uuid::new_v4().simple()),
        }
    }

    /// Namespace shared by all evaluators from this factory
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Namespaced identifier for `rule_id`
    pub fn namespaced_id(&self, rule_id: &str) -> String {
        format!("{}/{}", self.namespace, rule_id)
    }

    /// Assemble an evaluator for one rule
    pub fn create(
        &self,
        rule: RuleHandle,
        rule_id: &str,
        severity: Severity,
        options: Option<serde_json::Value>,
        parser: ParserKind,
    ) -> Result<Evaluator, EvaluatorError> {
        if severity == Severity::Off {
            return Err(EvaluatorError::RuleDisabled(rule_id.to_string()));
        }

        Ok(Evaluator {
            rule,
            rule_id: self.namespaced_id(rule_id),
            severity,
            options: options.unwrap_or(serde_json::Value::Null),
            parser,
        })
    }
}

impl Default for EvaluatorFactory {
    fn default() -> Self {
        Self::new()
    }
}

/// Single-rule evaluator
pub struct Evaluator {
    rule: RuleHandle,
    rule_id: String,
    severity: Severity,
    options: serde_json::Value,
    parser: ParserKind,
}

impl Evaluator {
    /// Namespaced identifier of the rule under test
    pub fn rule_id(&self) -> &str {
        &self.rule_id
    }

    /// Parser handed to the rule
    pub fn parser(&self) -> ParserKind {
        self.parser
    }

    /// Severity findings are reported at
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Run the rule synchronously
    pub fn run(&self, source: &str, filename: &str) -> Result<Vec<Diagnostic>, EvaluateError> {
        let ctx = RuleContext {
            source,
            filename,
            options: &self.options,
            parser: self.parser,
        };

        let diagnostics = self
            .rule
            .check(&ctx)?
            .into_iter()
            .map(|finding| Diagnostic {
                rule_id: self.rule_id.clone(),
                severity: self.severity,
                message: finding.message,
                line: finding.line,
                column: finding.column,
            })
            .collect();

        Ok(diagnostics)
    }
}

impl std::fmt::Debug for Evaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Evaluator")
            .field("rule_id", &self.rule_id)
            .field("severity", &self.severity)
            .field("parser", &self.parser)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl RuleEvaluator for Evaluator {
    async fn evaluate(
        &self,
        source: &str,
        filename: &str,
    ) -> Result<Vec<Diagnostic>, EvaluateError> {
        self.run(source, filename)
    }
}
