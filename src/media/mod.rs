//! Media ingestion: turning image references into durable hosted URLs.

mod client;
mod ingestor;

pub use client::HttpMediaHost;
pub use ingestor::{IngestOutcome, MediaIngestor, SkipReason};

use anyhow::Result;
use async_trait::async_trait;

/// Seam for the external media-hosting service.
///
/// The payload is either an absolute URL or an inline `data:` URI; the host
/// fetches/decodes it, stores it under the given logical folder and returns
/// the canonical public URL.
#[async_trait]
pub trait MediaHost: Send + Sync {
    async fn upload(&self, payload: &str, folder: &str) -> Result<String>;
}
