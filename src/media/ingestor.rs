//! Best-effort image ingestion.
//!
//! Bulk imports should never fail outright because one thumbnail is
//! unreachable: every failure here degrades to a `Skipped` outcome and the
//! batch continues with an empty URL for that image.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;

use super::MediaHost;

/// Outcome of one image ingestion attempt.
///
/// Callers can distinguish "uploaded" from "degraded": `Skipped` carries the
/// reason instead of collapsing into an empty string.
#[derive(Debug, Clone, PartialEq)]
pub enum IngestOutcome {
    /// The media host accepted the image; this is its durable public URL.
    Uploaded(String),
    /// The image was not ingested; the record proceeds without it.
    Skipped(SkipReason),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// Input was not an absolute URL, a data URI, or a resolvable dev path.
    UnsupportedReference,
    /// A local dev path resolved but the file could not be read.
    UnreadableFile(String),
    /// The media host rejected or failed the upload.
    UploadFailed(String),
}

impl IngestOutcome {
    /// The hosted URL, or an empty string for a skipped ingestion. This is
    /// the degraded value that ends up in the persisted record.
    pub fn into_url(self) -> String {
        match self {
            Self::Uploaded(url) => url,
            Self::Skipped(_) => String::new(),
        }
    }
}

/// Ingests image references through the media host.
pub struct MediaIngestor {
    host: Arc<dyn MediaHost>,
    /// Root against which relative file paths are resolved. Development
    /// convenience only; `None` disables the filesystem input shape.
    working_root: Option<PathBuf>,
}

impl MediaIngestor {
    pub fn new(host: Arc<dyn MediaHost>, working_root: Option<PathBuf>) -> Self {
        Self { host, working_root }
    }

    /// Ingest one image reference into the given logical folder.
    ///
    /// Accepts an absolute http(s) URL, an inline `data:` URI, or a relative
    /// file path under the working root. Never returns an error: unsupported
    /// or failing inputs are logged and reported as `Skipped`.
    pub async fn ingest(&self, input: &str, folder: &str) -> IngestOutcome {
        let input = input.trim();
        if input.is_empty() {
            return IngestOutcome::Skipped(SkipReason::UnsupportedReference);
        }

        if is_http_url(input) || is_data_uri(input) {
            return self.upload(input, folder).await;
        }

        if let Some(root) = &self.working_root {
            let path = Path::new(input);
            if !path.is_absolute() {
                let abs = root.join(path);
                if abs.exists() {
                    return match file_to_data_uri(&abs).await {
                        Ok(data_uri) => self.upload(&data_uri, folder).await,
                        Err(e) => {
                            warn!("Failed to read image file {}: {}", abs.display(), e);
                            IngestOutcome::Skipped(SkipReason::UnreadableFile(e.to_string()))
                        }
                    };
                }
            }
        }

        warn!("Unsupported image reference (use URL or data URI): {}", input);
        IngestOutcome::Skipped(SkipReason::UnsupportedReference)
    }

    async fn upload(&self, payload: &str, folder: &str) -> IngestOutcome {
        match self.host.upload(payload, folder).await {
            Ok(url) => IngestOutcome::Uploaded(url),
            Err(e) => {
                warn!("Media upload to folder '{}' failed: {}", folder, e);
                IngestOutcome::Skipped(SkipReason::UploadFailed(e.to_string()))
            }
        }
    }
}

fn is_http_url(s: &str) -> bool {
    let lower = s.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn is_data_uri(s: &str) -> bool {
    s.starts_with("data:")
}

/// Read a local image file and wrap it into an inline data URI, guessing the
/// image type from the extension, then the bytes, then falling back to jpeg.
async fn file_to_data_uri(path: &Path) -> std::io::Result<String> {
    let bytes = tokio::fs::read(path).await?;

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .or_else(|| infer::get(&bytes).map(|kind| kind.extension().to_string()))
        .unwrap_or_else(|| "jpeg".to_string());

    Ok(format!("data:image/{};base64,{}", ext, BASE64.encode(&bytes)))
}
