//! Common test infrastructure
//!
//! Fixtures for end-to-end import/export tests: a seeded record store, a fake
//! in-process media host and a builder for xlsx batch buffers.

// Not every test binary uses every helper.
#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use bulk_catalog::media::{MediaHost, MediaIngestor};
use bulk_catalog::record_store::{RecordStore, SqliteRecordStore};
use bulk_catalog::{BatchImporter, CatalogExporter};
use rust_xlsxwriter::Workbook;
use std::sync::{Arc, Mutex};

/// Fake media host that records every upload and returns a deterministic
/// hosted URL. Payloads listed in `reject` fail the upload.
pub struct FakeMediaHost {
    pub uploads: Mutex<Vec<(String, String)>>,
    reject: Vec<String>,
}

impl FakeMediaHost {
    pub fn new() -> Self {
        Self {
            uploads: Mutex::new(Vec::new()),
            reject: Vec::new(),
        }
    }

    pub fn rejecting(payloads: &[&str]) -> Self {
        Self {
            uploads: Mutex::new(Vec::new()),
            reject: payloads.iter().map(|p| p.to_string()).collect(),
        }
    }
}

#[async_trait]
impl MediaHost for FakeMediaHost {
    async fn upload(&self, payload: &str, folder: &str) -> Result<String> {
        if self.reject.iter().any(|p| p == payload) {
            anyhow::bail!("upload rejected");
        }
        self.uploads
            .lock()
            .unwrap()
            .push((payload.to_string(), folder.to_string()));
        Ok(format!("https://cdn.test/{}/{}", folder, slug(payload)))
    }
}

fn slug(payload: &str) -> String {
    payload
        .rsplit('/')
        .next()
        .unwrap_or(payload)
        .to_string()
}

/// Everything an import/export test needs, wired against one in-memory store.
pub struct TestHarness {
    pub store: Arc<dyn RecordStore>,
    pub host: Arc<FakeMediaHost>,
    pub importer: BatchImporter,
    pub exporter: CatalogExporter,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_host(Arc::new(FakeMediaHost::new()))
    }

    pub fn with_host(host: Arc<FakeMediaHost>) -> Self {
        let store: Arc<dyn RecordStore> = Arc::new(SqliteRecordStore::in_memory().unwrap());
        // Categories and brands that batches can reference by name.
        for name in ["Toys", "Games", "Outdoor"] {
            store.create_category(name).unwrap();
        }
        for name in ["Acme", "Globex"] {
            store.create_brand(name).unwrap();
        }
        let ingestor = MediaIngestor::new(host.clone(), None);
        Self {
            store: store.clone(),
            host,
            importer: BatchImporter::new(store.clone(), ingestor),
            exporter: CatalogExporter::new(store),
        }
    }
}

/// Build an xlsx batch buffer from a header row and data rows of strings.
pub fn xlsx_batch(headers: &[&str], rows: &[Vec<&str>]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header).unwrap();
    }
    for (r, row) in rows.iter().enumerate() {
        for (col, value) in row.iter().enumerate() {
            if !value.is_empty() {
                sheet.write_string(r as u32 + 1, col as u16, *value).unwrap();
            }
        }
    }
    workbook.save_to_buffer().unwrap()
}

/// Shorthand for the common name/price/extra-columns batch shape.
pub fn simple_batch(rows: &[Vec<&str>]) -> Vec<u8> {
    xlsx_batch(
        &[
            "name",
            "price",
            "category",
            "brand",
            "tags",
            "productHeroImage",
            "productGallery",
            "status",
        ],
        rows,
    )
}
