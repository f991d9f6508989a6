//! Default Evaluator Provider
//!
//! Wires a [`ModuleSource`], a per-run [`ModuleCache`], a [`RuleLoader`] and an
//! [`EvaluatorFactory`] into an [`EvaluatorProvider`].

use super::cache::ModuleCache;
use super::factory::EvaluatorFactory;
use super::loader::{ChainLoader, LoadOutcome, ModuleKey, ModuleSource, RuleLoader};
use super::rule::ParserKind;
use super::{EvaluatorError, EvaluatorProvider, RuleEvaluator};
use crate::model::{Language, RuleConfig};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Provider resolving rules from a module source
pub struct ModuleEvaluatorProvider<S> {
    source: S,
    cache: Arc<ModuleCache>,
    loader: Box<dyn RuleLoader>,
    factory: EvaluatorFactory,
}

impl<S: ModuleSource> ModuleEvaluatorProvider<S> {
    /// Provider with a fresh cache, the default loader chain and a fresh namespace
    pub fn new(source: S) -> Self {
        Self {
            source,
            cache: Arc::new(ModuleCache::new()),
            loader: Box::new(ChainLoader::default()),
            factory: EvaluatorFactory::new(),
        }
    }

    /// Use an existing module cache
    pub fn with_cache(mut self, cache: Arc<ModuleCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Use a custom rule loader
    pub fn with_loader(mut self, loader: impl RuleLoader + 'static) -> Self {
        self.loader = Box::new(loader);
        self
    }

    /// Use a specific factory (and therefore namespace)
    pub fn with_factory(mut self, factory: EvaluatorFactory) -> Self {
        self.factory = factory;
        self
    }

    /// Module cache backing this provider
    pub fn cache(&self) -> &Arc<ModuleCache> {
        &self.cache
    }

    /// Factory used to assemble evaluators
    pub fn factory(&self) -> &EvaluatorFactory {
        &self.factory
    }
}

#[async_trait]
impl<S: ModuleSource> EvaluatorProvider for ModuleEvaluatorProvider<S> {
    async fn build(
        &self,
        rule: &RuleConfig,
        languages: &[Language],
    ) -> Result<Box<dyn RuleEvaluator>, EvaluatorError> {
        let key = ModuleKey::for_rule(rule);
        let export = self.cache.get_or_resolve(&key, &self.source)?;

        let handle = match self.loader.load(&export, &rule.rule_id) {
            LoadOutcome::Found { handle, strategy } => {
                debug!(rule = %rule.rule_id, module = %key, strategy, "rule loaded");
                handle
            }
            LoadOutcome::NotFound { reason } => {
                return Err(EvaluatorError::RuleIdAbsent {
                    rule_id: rule.rule_id.clone(),
                    module: key.to_string(),
                    reason,
                });
            }
        };

        let parser = ParserKind::for_languages(languages);
        let evaluator = self.factory.create(
            handle,
            &rule.rule_id,
            rule.severity,
            rule.options.clone(),
            parser,
        )?;

        Ok(Box::new(evaluator))
    }
}
