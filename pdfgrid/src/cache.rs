//! A cache of loaded PDF sets owned by the caller.

use super::error::Result;
use super::manage::SetResolver;
use super::set::PdfSet;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use tracing::debug;

/// Keeps loaded sets by name, so that each set is read only once.
#[derive(Debug)]
pub struct PdfCache {
    resolver: SetResolver,
    sets: FxHashMap<String, Arc<PdfSet>>,
}

impl Default for PdfCache {
    fn default() -> Self {
        Self::new(SetResolver::from_env())
    }
}

impl PdfCache {
    /// Constructor. Sets are found with `resolver`.
    #[must_use]
    pub fn new(resolver: SetResolver) -> Self {
        Self {
            resolver,
            sets: FxHashMap::default(),
        }
    }

    /// The resolver used to find sets.
    #[must_use]
    pub const fn resolver(&self) -> &SetResolver {
        &self.resolver
    }

    /// Return the set `name`, loading it if it is not cached yet.
    ///
    /// # Errors
    ///
    /// See [`SetResolver::load_set`]. Failed loads are not cached.
    pub fn get_or_load(&mut self, name: &str) -> Result<Arc<PdfSet>> {
        if let Some(set) = self.sets.get(name) {
            return Ok(Arc::clone(set));
        }

        debug!(name, "PDF set not cached");

        let set = Arc::new(self.resolver.load_set(name)?);
        self.sets.insert(name.to_owned(), Arc::clone(&set));

        Ok(set)
    }

    /// Return the set `name` if it is cached.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<PdfSet>> {
        self.sets.get(name).cloned()
    }

    /// Remove the set `name` from the cache and return it.
    pub fn evict(&mut self, name: &str) -> Option<Arc<PdfSet>> {
        self.sets.remove(name)
    }

    /// Remove all sets.
    pub fn clear(&mut self) {
        self.sets.clear();
    }

    /// Number of cached sets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Whether no set is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}
