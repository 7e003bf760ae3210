//! Bulk Catalog Library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod config;
pub mod media;
pub mod pipeline;
pub mod record_store;
pub mod tabular;

// Re-export commonly used types for convenience
pub use media::{HttpMediaHost, MediaHost, MediaIngestor};
pub use pipeline::{BatchImporter, CatalogExporter, ExportFile, ImportReport};
pub use record_store::{RecordStore, SqliteRecordStore};
pub use tabular::ExportFormat;
