//! Batch-level services: the transport-free counterparts of the import,
//! export and template endpoints.

use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

use super::normalizer::RecordNormalizer;
use super::reconciler::{BatchResult, FailedRow, Reconciler};
use crate::media::MediaIngestor;
use crate::record_store::RecordStore;
use crate::tabular::{
    decode_workbook, encode_rows, encode_template, DecodeError, EncodeError, ExportFormat,
    ExportRow, RawRow, EXPORT_FILENAME_STEM,
};

/// Validation-class failures of a batch import. The transport maps these to
/// 4xx responses; anything else from the store surfaces as a 5xx.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("File is empty or invalid: no data rows found")]
    EmptyBatch,

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Failures while producing an export or template file.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// Transport-ready result of a batch import.
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub message: String,
    #[serde(rename = "insertedCount")]
    pub inserted_count: usize,
    pub inserted: Vec<String>,
    #[serde(rename = "updatedCount")]
    pub updated_count: usize,
    pub updated: Vec<String>,
    #[serde(rename = "failedCount")]
    pub failed_count: usize,
    pub failed: Vec<FailedRow>,
}

impl ImportReport {
    fn from_result(result: BatchResult) -> Self {
        Self {
            message: result.summary_message(),
            inserted_count: result.inserted.len(),
            inserted: result.inserted,
            updated_count: result.updated.len(),
            updated: result.updated,
            failed_count: result.failed.len(),
            failed: result.failed,
        }
    }
}

/// An encoded download: filename, content type and bytes, ready for the
/// transport to stream as an attachment.
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportFile {
    fn new(format: ExportFormat, bytes: Vec<u8>) -> Self {
        Self {
            filename: format!("{}.{}", EXPORT_FILENAME_STEM, format.extension()),
            content_type: format.content_type(),
            bytes,
        }
    }
}

/// Runs one uploaded batch through decode → normalize → reconcile.
pub struct BatchImporter {
    store: Arc<dyn RecordStore>,
    ingestor: MediaIngestor,
}

impl BatchImporter {
    pub fn new(store: Arc<dyn RecordStore>, ingestor: MediaIngestor) -> Self {
        Self { store, ingestor }
    }

    /// Import one tabular batch from an in-memory buffer.
    ///
    /// Rows missing `name` or `price` are silently dropped before
    /// processing. Rows are reconciled strictly sequentially: the store's
    /// consistency model assumes one in-flight mutation per name. A store
    /// failure on one row is recorded and the batch continues.
    pub async fn import_batch(&self, bytes: &[u8]) -> Result<ImportReport, ImportError> {
        let rows = decode_workbook(bytes)?;
        if rows.is_empty() {
            return Err(ImportError::EmptyBatch);
        }

        let eligible: Vec<RawRow> = rows.into_iter().filter(is_eligible).collect();
        info!("Importing batch: {} eligible rows", eligible.len());

        let normalizer = RecordNormalizer::new(self.store.as_ref(), &self.ingestor);
        let reconciler = Reconciler::new(self.store.as_ref());

        let mut result = BatchResult::default();
        for row in &eligible {
            let name = row.text("name").unwrap_or_default();
            let reconciled = match normalizer.normalize(row).await {
                Ok(record) => reconciler.reconcile(&record),
                Err(e) => Err(e),
            };
            match reconciled {
                Ok(outcome) => result.record(outcome),
                Err(e) => {
                    error!("Failed to reconcile row '{}': {:#}", name, e);
                    result.record_failure(name, e.to_string());
                }
            }
        }

        info!(
            "Batch done: {} inserted, {} updated, {} failed",
            result.inserted.len(),
            result.updated.len(),
            result.failed.len()
        );
        Ok(ImportReport::from_result(result))
    }
}

/// Maps persisted records back to the template shape and encodes them.
pub struct CatalogExporter {
    store: Arc<dyn RecordStore>,
}

impl CatalogExporter {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Export all persisted records in the requested format.
    pub fn export_all(&self, format: ExportFormat) -> Result<ExportFile, ExportError> {
        let products = self.store.list_products_expanded()?;
        let rows: Vec<ExportRow> = products.iter().map(ExportRow::from_expanded).collect();
        info!("Exporting {} records as {:?}", rows.len(), format);
        let bytes = encode_rows(&rows, format)?;
        Ok(ExportFile::new(format, bytes))
    }

    /// Emit a headers-only template in the requested format.
    pub fn template(&self, format: ExportFormat) -> Result<ExportFile, ExportError> {
        let bytes = encode_template(format)?;
        Ok(ExportFile::new(format, bytes))
    }
}

/// A row is eligible only when both `name` and `price` are present and
/// non-empty; everything else is dropped with no count reported.
fn is_eligible(row: &RawRow) -> bool {
    row.text("name").is_some() && row.text("price").is_some()
}
