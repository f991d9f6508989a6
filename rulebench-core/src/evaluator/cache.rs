//! Per-Run Module Cache
//!
//! Memoizes resolved module exports so several test cases pointing at the same
//! plugin load it once. The cache is an ordinary value owned by whoever builds
//! evaluators; dropping it (or calling [`ModuleCache::clear`]) ends its
//! lifetime. Evaluators themselves are never cached. Failed resolutions are not
//! cached either, so every case gets its own attempt and its own error.

use super::EvaluatorError;
use super::loader::{ModuleExport, ModuleKey, ModuleSource};
use fxhash::FxHashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Memo of resolved modules for one run
#[derive(Debug, Default)]
pub struct ModuleCache {
    entries: Mutex<FxHashMap<ModuleKey, ModuleExport>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ModuleCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, FxHashMap<ModuleKey, ModuleExport>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return the cached export for `key`, resolving it through `source` on a miss
    pub fn get_or_resolve(
        &self,
        key: &ModuleKey,
        source: &dyn ModuleSource,
    ) -> Result<ModuleExport, EvaluatorError> {
        if let Some(export) = self.entries().get(key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(export.clone());
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let export = source.resolve(key)?;
        self.entries().insert(key.clone(), export.clone());
        Ok(export)
    }

    /// Number of cached modules
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// (hits, misses) since creation
    pub fn stats(&self) -> (u64, u64) {
        (
            self.hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
        )
    }

    /// Drop every cached module
    pub fn clear(&mut self) {
        self.entries
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
