//! Rule Implementations

use super::EvaluateError;
use crate::model::Language;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Parser an evaluator hands to its rule
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParserKind {
    /// Default JavaScript/JSX parser
    #[default]
    Default,
    /// TypeScript-aware parser
    TypeScript,
    /// Vue single-file-component parser
    Vue,
}

impl ParserKind {
    /// Pick the parser able to handle every language present in a test case
    pub fn for_languages(languages: &[Language]) -> Self {
        if languages.iter().any(Language::is_typescript) {
            ParserKind::TypeScript
        } else if languages.contains(&Language::Vue) {
            ParserKind::Vue
        } else {
            ParserKind::Default
        }
    }
}

/// Everything a rule sees for one evaluation
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    /// Source text
    pub source: &'a str,
    /// Reported file name
    pub filename: &'a str,
    /// Rule options (`Null` when none configured)
    pub options: &'a serde_json::Value,
    /// Parser selected for the test case
    pub parser: ParserKind,
}

/// A raw finding produced by a rule, before namespacing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Message
    pub message: String,
    /// 1-based line
    pub line: u32,
    /// 1-based column
    pub column: u32,
}

impl Finding {
    /// Create a finding
    pub fn new(message: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            message: message.into(),
            line,
            column,
        }
    }
}

/// A lint rule
pub trait Rule: Send + Sync {
    /// Check one source text
    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<Finding>, EvaluateError>;
}

impl<F> Rule for F
where
    F: Fn(&RuleContext<'_>) -> Result<Vec<Finding>, EvaluateError> + Send + Sync,
{
    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<Finding>, EvaluateError> {
        self(ctx)
    }
}

/// Shared handle to a loaded rule
pub type RuleHandle = Arc<dyn Rule>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_selection() {
        assert_eq!(ParserKind::for_languages(&[]), ParserKind::Default);
        assert_eq!(
            ParserKind::for_languages(&[Language::JavaScript, Language::Jsx]),
            ParserKind::Default
        );
        assert_eq!(
            ParserKind::for_languages(&[Language::JavaScript, Language::Tsx]),
            ParserKind::TypeScript
        );
        assert_eq!(
            ParserKind::for_languages(&[Language::Vue, Language::JavaScript]),
            ParserKind::Vue
        );
        // TypeScript wins over Vue
        assert_eq!(
            ParserKind::for_languages(&[Language::Vue, Language::TypeScript]),
            ParserKind::TypeScript
        );
    }

    #[test]
    fn test_closure_rule() {
        let rule = |ctx: &RuleContext<'_>| -> Result<Vec<Finding>, EvaluateError> {
            Ok(ctx
                .source
                .lines()
                .enumerate()
                .filter(|(_, l)| l.contains("debugger"))
                .map(|(i, _)| Finding::new("unexpected debugger", i as u32 + 1, 1))
                .collect())
        };
        let options = serde_json::Value::Null;
        let ctx = RuleContext {
            source: "a();\ndebugger;\n",
            filename: "a.js",
            options: &options,
            parser: ParserKind::Default,
        };

        let findings = rule.check(&ctx).unwrap();
        assert_eq!(findings, vec![Finding::new("unexpected debugger", 2, 1)]);
    }
}
