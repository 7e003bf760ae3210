//! Reference resolution: display names to stable store identifiers.

use anyhow::Result;

use super::split_list;
use crate::record_store::{BrandId, CategoryId, RecordStore};

/// Resolves human-readable reference names against the record store.
///
/// Unmatched names are tolerated, never fatal: a reference mismatch degrades
/// the one field instead of failing the batch.
pub struct ReferenceResolver<'a> {
    store: &'a dyn RecordStore,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(store: &'a dyn RecordStore) -> Self {
        Self { store }
    }

    /// Resolve a comma-delimited category name list to the subset of ids
    /// that exist, in one batched store query. Duplicate names collapse.
    pub fn resolve_categories(&self, raw: &str) -> Result<Vec<CategoryId>> {
        let mut names = split_list(raw);
        let mut seen = std::collections::HashSet::new();
        names.retain(|n| seen.insert(n.clone()));
        if names.is_empty() {
            return Ok(Vec::new());
        }
        self.store.find_category_ids_by_names(&names)
    }

    /// Resolve a single brand name to its id. `None` (not an error) on miss.
    pub fn resolve_brand(&self, raw: &str) -> Result<Option<BrandId>> {
        let name = raw.trim();
        if name.is_empty() {
            return Ok(None);
        }
        self.store.find_brand_id_by_name(name)
    }
}
