//! Row normalization: one raw row into one canonical record.

use anyhow::Result;

use super::resolver::ReferenceResolver;
use super::split_list;
use crate::media::{IngestOutcome, MediaIngestor};
use crate::record_store::{CanonicalRecord, RecordStore};
use crate::tabular::RawRow;

/// Logical media folder for hero images.
const HERO_FOLDER: &str = "products";
/// Logical media folder for gallery images.
const GALLERY_FOLDER: &str = "products/gallery";

/// Turns one raw row into a canonical, store-ready record: references
/// resolved, media ingested, list fields materialized.
///
/// This performs network calls (resolver queries, media uploads) per row and
/// has no retry of its own.
pub struct RecordNormalizer<'a> {
    resolver: ReferenceResolver<'a>,
    ingestor: &'a MediaIngestor,
}

impl<'a> RecordNormalizer<'a> {
    pub fn new(store: &'a dyn RecordStore, ingestor: &'a MediaIngestor) -> Self {
        Self {
            resolver: ReferenceResolver::new(store),
            ingestor,
        }
    }

    /// Normalize one row. Only store failures propagate; media failures
    /// degrade per-field. Import-only columns (`category`, `brand`, vendor
    /// or variant extras) never reach the record: it is built field by
    /// field from the canonical shape.
    pub async fn normalize(&self, row: &RawRow) -> Result<CanonicalRecord> {
        let category_ids = match row.text("category") {
            Some(raw) => self.resolver.resolve_categories(&raw)?,
            None => Vec::new(),
        };

        let brand_id = match row.text("brand") {
            Some(raw) => self.resolver.resolve_brand(&raw)?,
            None => None,
        };

        let product_hero_image = match row.text("productHeroImage") {
            Some(input) => self.ingestor.ingest(&input, HERO_FOLDER).await.into_url(),
            None => String::new(),
        };

        let mut product_gallery = Vec::new();
        if let Some(raw) = row.text("productGallery") {
            for entry in split_list(&raw) {
                // One failing gallery image skips the entry, not the row.
                match self.ingestor.ingest(&entry, GALLERY_FOLDER).await {
                    IngestOutcome::Uploaded(url) => product_gallery.push(url),
                    IngestOutcome::Skipped(_) => {}
                }
            }
        }

        let tags = row
            .text("tags")
            .map(|raw| split_list(&raw))
            .unwrap_or_default();
        let special_appearance = row
            .text("specialAppearance")
            .map(|raw| split_list(&raw))
            .unwrap_or_default();

        Ok(CanonicalRecord {
            name: row.text("name").unwrap_or_default(),
            price: row.number("price").unwrap_or_default(),
            tags,
            special_appearance,
            category_ids,
            brand_id,
            product_hero_image,
            product_gallery,
            short_description: row.text("shortDescription").unwrap_or_default(),
            stock_quantity: row.integer("stockQuantity").unwrap_or_default(),
            discounted_price: row.number("discountedPrice").unwrap_or_default(),
            number_of_pieces: row.text("numberOfPieces").unwrap_or_default(),
            sound_level: row.text("soundLevel").unwrap_or_default(),
            light_effect: row.text("lightEffect").unwrap_or_default(),
            safety_rating: row.text("safetyRating").unwrap_or_default(),
            usage_area: row.text("usageArea").unwrap_or_default(),
            duration: row.text("duration").unwrap_or_default(),
            weight_per_box: row.text("weightPerBox").unwrap_or_default(),
            status: row.boolean("status").unwrap_or_default(),
        })
    }
}
