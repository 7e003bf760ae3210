//! Natural-key reconciliation of canonical records against the store.

use anyhow::Result;
use serde::Serialize;

use crate::record_store::{CanonicalRecord, RecordStore};

/// What the reconciler did with one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReconcileAction {
    Inserted,
    Updated,
}

/// Per-record reconciliation result.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileOutcome {
    pub action: ReconcileAction,
    pub name: String,
}

/// A row that failed reconciliation because of a store error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedRow {
    pub name: String,
    pub error: String,
}

/// Aggregated per-batch result, threaded through the import loop as a plain
/// value and returned, never shared mutable state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchResult {
    pub inserted: Vec<String>,
    pub updated: Vec<String>,
    pub failed: Vec<FailedRow>,
}

impl BatchResult {
    pub fn record(&mut self, outcome: ReconcileOutcome) {
        match outcome.action {
            ReconcileAction::Inserted => self.inserted.push(outcome.name),
            ReconcileAction::Updated => self.updated.push(outcome.name),
        }
    }

    pub fn record_failure(&mut self, name: String, error: String) {
        self.failed.push(FailedRow { name, error });
    }

    /// Batch summary derived from which lists are non-empty.
    pub fn summary_message(&self) -> String {
        match (!self.inserted.is_empty(), !self.updated.is_empty()) {
            (true, true) => "Products uploaded and updated successfully!",
            (true, false) => "Products uploaded successfully!",
            (false, true) => "Products updated successfully!",
            (false, false) => "No products were uploaded or updated.",
        }
        .to_string()
    }
}

/// Inserts or updates one canonical record by its natural key.
pub struct Reconciler<'a> {
    store: &'a dyn RecordStore,
}

impl<'a> Reconciler<'a> {
    pub fn new(store: &'a dyn RecordStore) -> Self {
        Self { store }
    }

    /// Look up an existing record by exact trimmed name; replace all of its
    /// fields if found, create it otherwise. The store enforces name
    /// uniqueness, so concurrent same-name imports resolve last-write-wins.
    pub fn reconcile(&self, record: &CanonicalRecord) -> Result<ReconcileOutcome> {
        let name = record.name.trim().to_string();
        match self.store.find_product_by_name(&name)? {
            Some(existing) => {
                self.store.update_product(&existing.id, record)?;
                Ok(ReconcileOutcome {
                    action: ReconcileAction::Updated,
                    name: existing.record.name,
                })
            }
            None => {
                let created = self.store.insert_product(record)?;
                Ok(ReconcileOutcome {
                    action: ReconcileAction::Inserted,
                    name: created.record.name,
                })
            }
        }
    }
}
