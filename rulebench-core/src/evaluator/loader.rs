//! Rule Module Resolution
//!
//! A rule module can export its rule in several shapes: the rule itself, a
//! named collection of rules (a plugin), or either of those wrapped in a
//! default export. Instead of nested shape checks, resolution runs an ordered
//! chain of [`ExtractionStrategy`] values and stops at the first hit.

use super::rule::RuleHandle;
use super::{EvaluatorError, Rule};
use crate::model::RuleConfig;
use fxhash::FxHashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Shape of what a rule module exports
#[derive(Clone)]
pub enum ModuleExport {
    /// The module is a single rule
    Rule(RuleHandle),
    /// Named rules, in export order
    Rules(Vec<(String, RuleHandle)>),
    /// A default export wrapping another shape
    Default(Box<ModuleExport>),
}

impl ModuleExport {
    /// Short description of the export shape, for error messages
    pub fn shape(&self) -> String {
        match self {
            ModuleExport::Rule(_) => "rule".to_string(),
            ModuleExport::Rules(rules) => format!("rules collection ({} rules)", rules.len()),
            ModuleExport::Default(inner) => format!("default export of {}", inner.shape()),
        }
    }
}

impl fmt::Debug for ModuleExport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleExport::Rule(_) => f.write_str("Rule(..)"),
            ModuleExport::Rules(rules) => f
                .debug_tuple("Rules")
                .field(&rules.iter().map(|(name, _)| name).collect::<Vec<_>>())
                .finish(),
            ModuleExport::Default(inner) => f.debug_tuple("Default").field(inner).finish(),
        }
    }
}

/// Identifies a rule module
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ModuleKey {
    /// The built-in rule set
    Builtin,
    /// A module loaded from a path
    Path(PathBuf),
}

impl ModuleKey {
    /// Module key a rule configuration refers to
    pub fn for_rule(rule: &RuleConfig) -> Self {
        match &rule.path {
            Some(path) => ModuleKey::Path(path.clone()),
            None => ModuleKey::Builtin,
        }
    }
}

impl fmt::Display for ModuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleKey::Builtin => f.write_str("<builtin>"),
            ModuleKey::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Resolves module keys to module exports
pub trait ModuleSource: Send + Sync {
    /// Load the module behind `key`
    fn resolve(&self, key: &ModuleKey) -> Result<ModuleExport, EvaluatorError>;
}

/// In-memory module source
///
/// Built-in rules are collected into a single rules collection; path modules
/// are registered with whatever export shape they have.
#[derive(Clone, Default)]
pub struct ModuleRegistry {
    builtin: Vec<(String, RuleHandle)>,
    modules: FxHashMap<PathBuf, ModuleExport>,
}

impl ModuleRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a built-in rule
    pub fn register_builtin(&mut self, rule_id: impl Into<String>, rule: impl Rule + 'static) {
        self.builtin.push((rule_id.into(), Arc::new(rule)));
    }

    /// Register a module at `path`
    pub fn register_module(&mut self, path: impl Into<PathBuf>, export: ModuleExport) {
        self.modules.insert(path.into(), export);
    }

    /// Whether a module is registered at `path`
    pub fn contains_module(&self, path: &Path) -> bool {
        self.modules.contains_key(path)
    }
}

impl ModuleSource for ModuleRegistry {
    fn resolve(&self, key: &ModuleKey) -> Result<ModuleExport, EvaluatorError> {
        match key {
            ModuleKey::Builtin => Ok(ModuleExport::Rules(self.builtin.clone())),
            ModuleKey::Path(path) => {
                self.modules
                    .get(path)
                    .cloned()
                    .ok_or_else(|| EvaluatorError::RuleNotFound {
                        module: key.to_string(),
                    })
            }
        }
    }
}

/// One way of pulling a rule out of a module export
pub trait ExtractionStrategy: Send + Sync {
    /// Strategy name used in diagnostics
    fn name(&self) -> &'static str;

    /// Extract the rule, or `None` if the export does not have this shape
    fn extract(&self, export: &ModuleExport, rule_id: &str) -> Option<RuleHandle>;
}

/// Look a rule up in a collection by full id, then by its last `/` segment
fn find_in_collection(rules: &[(String, RuleHandle)], rule_id: &str) -> Option<RuleHandle> {
    let short = rule_id.rsplit('/').next().unwrap_or(rule_id);
    rules
        .iter()
        .find(|(name, _)| name == rule_id)
        .or_else(|| rules.iter().find(|(name, _)| name == short))
        .map(|(_, rule)| Arc::clone(rule))
}

/// The module export is the rule
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectRule;

impl ExtractionStrategy for DirectRule {
    fn name(&self) -> &'static str {
        "direct-rule"
    }

    fn extract(&self, export: &ModuleExport, _rule_id: &str) -> Option<RuleHandle> {
        match export {
            ModuleExport::Rule(rule) => Some(Arc::clone(rule)),
            _ => None,
        }
    }
}

/// The module exports a collection containing the rule
#[derive(Debug, Clone, Copy, Default)]
pub struct RulesCollection;

impl ExtractionStrategy for RulesCollection {
    fn name(&self) -> &'static str {
        "rules-collection"
    }

    fn extract(&self, export: &ModuleExport, rule_id: &str) -> Option<RuleHandle> {
        match export {
            ModuleExport::Rules(rules) => find_in_collection(rules, rule_id),
            _ => None,
        }
    }
}

/// The default export is the rule
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultDirectRule;

impl ExtractionStrategy for DefaultDirectRule {
    fn name(&self) -> &'static str {
        "default-rule"
    }

    fn extract(&self, export: &ModuleExport, rule_id: &str) -> Option<RuleHandle> {
        match export {
            ModuleExport::Default(inner) => DirectRule.extract(inner, rule_id),
            _ => None,
        }
    }
}

/// The default export is a collection containing the rule
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRulesCollection;

impl ExtractionStrategy for DefaultRulesCollection {
    fn name(&self) -> &'static str {
        "default-rules-collection"
    }

    fn extract(&self, export: &ModuleExport, rule_id: &str) -> Option<RuleHandle> {
        match export {
            ModuleExport::Default(inner) => RulesCollection.extract(inner, rule_id),
            _ => None,
        }
    }
}

/// Result of loading a rule from a module export
#[derive(Clone)]
pub enum LoadOutcome {
    /// The rule was extracted
    Found {
        /// Loaded rule
        handle: RuleHandle,
        /// Name of the strategy that matched
        strategy: &'static str,
    },
    /// No strategy matched
    NotFound {
        /// Explanation listing what was tried
        reason: String,
    },
}

impl fmt::Debug for LoadOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadOutcome::Found { strategy, .. } => {
                f.debug_struct("Found").field("strategy", strategy).finish()
            }
            LoadOutcome::NotFound { reason } => {
                f.debug_struct("NotFound").field("reason", reason).finish()
            }
        }
    }
}

/// Extracts a rule from a module export
pub trait RuleLoader: Send + Sync {
    /// Load `rule_id` from `export`
    fn load(&self, export: &ModuleExport, rule_id: &str) -> LoadOutcome;
}

/// Ordered chain of extraction strategies
pub struct ChainLoader {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl ChainLoader {
    /// Chain with no strategies
    pub fn empty() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Append a strategy to the end of the chain
    pub fn with_strategy(mut self, strategy: impl ExtractionStrategy + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    /// Strategy names in evaluation order
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }
}

impl Default for ChainLoader {
    fn default() -> Self {
        Self::empty()
            .with_strategy(DirectRule)
            .with_strategy(RulesCollection)
            .with_strategy(DefaultDirectRule)
            .with_strategy(DefaultRulesCollection)
    }
}

impl RuleLoader for ChainLoader {
    fn load(&self, export: &ModuleExport, rule_id: &str) -> LoadOutcome {
        for strategy in &self.strategies {
            if let Some(handle) = strategy.extract(export, rule_id) {
                return LoadOutcome::Found {
                    handle,
                    strategy: strategy.name(),
                };
            }
        }

        LoadOutcome::NotFound {
            reason: format!(
                "module exports {}; tried {}",
                export.shape(),
                self.strategy_names().join(", ")
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::{EvaluateError, Finding, RuleContext};

    fn marker_rule(tag: &'static str) -> RuleHandle {
        Arc::new(
            move |_: &RuleContext<'_>| -> Result<Vec<Finding>, EvaluateError> {
                Ok(vec![Finding::new(tag, 1, 1)])
            },
        )
    }

    fn tag_of(outcome: &LoadOutcome) -> Option<String> {
        let LoadOutcome::Found { handle, .. } = outcome else {
            return None;
        };
        let options = serde_json::Value::Null;
        let ctx = RuleContext {
            source: "",
            filename: "a.js",
            options: &options,
            parser: Default::default(),
        };
        handle.check(&ctx).ok()?.pop().map(|f| f.message)
    }

    fn strategy_of(outcome: &LoadOutcome) -> Option<&'static str> {
        match outcome {
            LoadOutcome::Found { strategy, .. } => Some(*strategy),
            LoadOutcome::NotFound { .. } => None,
        }
    }

    #[test]
    fn test_direct_rule() {
        let export = ModuleExport::Rule(marker_rule("direct"));
        let outcome = ChainLoader::default().load(&export, "anything");

        assert_eq!(strategy_of(&outcome), Some("direct-rule"));
        assert_eq!(tag_of(&outcome).as_deref(), Some("direct"));
    }

    #[test]
    fn test_rules_collection() {
        let export = ModuleExport::Rules(vec![
            ("no-a".to_string(), marker_rule("a")),
            ("no-b".to_string(), marker_rule("b")),
        ]);
        let outcome = ChainLoader::default().load(&export, "no-b");

        assert_eq!(strategy_of(&outcome), Some("rules-collection"));
        assert_eq!(tag_of(&outcome).as_deref(), Some("b"));
    }

    #[test]
    fn test_plugin_qualified_id_matches_short_name() {
        let export = ModuleExport::Rules(vec![("no-b".to_string(), marker_rule("b"))]);
        let outcome = ChainLoader::default().load(&export, "my-plugin/no-b");

        assert_eq!(tag_of(&outcome).as_deref(), Some("b"));
    }

    #[test]
    fn test_full_id_preferred_over_short_name() {
        let export = ModuleExport::Rules(vec![
            ("no-b".to_string(), marker_rule("short")),
            ("p/no-b".to_string(), marker_rule("full")),
        ]);
        let outcome = ChainLoader::default().load(&export, "p/no-b");

        assert_eq!(tag_of(&outcome).as_deref(), Some("full"));
    }

    #[test]
    fn test_default_wrapped_shapes() {
        let loader = ChainLoader::default();

        let export = ModuleExport::Default(Box::new(ModuleExport::Rule(marker_rule("d"))));
        let outcome = loader.load(&export, "x");
        assert_eq!(strategy_of(&outcome), Some("default-rule"));

        let export = ModuleExport::Default(Box::new(ModuleExport::Rules(vec![(
            "x".to_string(),
            marker_rule("dc"),
        )])));
        let outcome = loader.load(&export, "x");
        assert_eq!(strategy_of(&outcome), Some("default-rules-collection"));
        assert_eq!(tag_of(&outcome).as_deref(), Some("dc"));
    }

    #[test]
    fn test_not_found_reason() {
        let export = ModuleExport::Rules(vec![("no-a".to_string(), marker_rule("a"))]);
        let outcome = ChainLoader::default().load(&export, "no-z");

        match outcome {
            LoadOutcome::NotFound { reason } => {
                assert!(reason.contains("rules collection (1 rules)"), "{reason}");
                assert!(reason.contains("direct-rule, rules-collection"), "{reason}");
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_custom_chain_order() {
        let loader = ChainLoader::empty().with_strategy(RulesCollection);
        let export = ModuleExport::Rule(marker_rule("direct"));

        assert!(matches!(
            loader.load(&export, "x"),
            LoadOutcome::NotFound { .. }
        ));
        assert_eq!(loader.strategy_names(), vec!["rules-collection"]);
    }

    #[test]
    fn test_registry_resolution() {
        let mut registry = ModuleRegistry::new();
        registry.register_builtin(
            "no-debugger",
            |_: &RuleContext<'_>| -> Result<Vec<Finding>, EvaluateError> { Ok(Vec::new()) },
        );
        registry.register_module("rules/x.js", ModuleExport::Rule(marker_rule("x")));

        assert!(matches!(
            registry.resolve(&ModuleKey::Builtin),
            Ok(ModuleExport::Rules(ref rules)) if rules.len() == 1
        ));
        assert!(registry.contains_module(Path::new("rules/x.js")));
        assert!(registry
            .resolve(&ModuleKey::Path(PathBuf::from("rules/x.js")))
            .is_ok());

        let missing = registry.resolve(&ModuleKey::Path(PathBuf::from("nope.js")));
        assert!(matches!(
            missing,
            Err(EvaluatorError::RuleNotFound { ref module }) if module == "nope.js"
        ));
    }

    #[test]
    fn test_module_key_for_rule() {
        assert_eq!(
            ModuleKey::for_rule(&RuleConfig::new("eqeqeq")),
            ModuleKey::Builtin
        );
        assert_eq!(
            ModuleKey::for_rule(&RuleConfig::new("p/x").with_path("p.js")),
            ModuleKey::Path(PathBuf::from("p.js"))
        );
        assert_eq!(ModuleKey::Builtin.to_string(), "<builtin>");
    }
}
