//! The import/export pipeline: normalization, reference resolution,
//! reconciliation and the batch-level services around them.

mod normalizer;
mod reconciler;
mod resolver;
mod service;

pub use normalizer::RecordNormalizer;
pub use reconciler::{BatchResult, FailedRow, ReconcileAction, ReconcileOutcome, Reconciler};
pub use resolver::ReferenceResolver;
pub use service::{BatchImporter, CatalogExporter, ExportError, ExportFile, ImportError, ImportReport};

/// Split a comma-delimited list field into trimmed, non-empty entries.
pub(crate) fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
