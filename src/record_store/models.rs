//! Record types shared between the pipeline and the store.

use serde::{Deserialize, Serialize};

/// Stable identifier of a category record.
pub type CategoryId = String;

/// Stable identifier of a brand record.
pub type BrandId = String;

/// The normalized, store-ready shape of one catalog item.
///
/// Built transiently per row by the normalizer, consumed once by the
/// reconciler, then discarded. Reference fields (`category_ids`, `brand_id`)
/// hold resolved ids, never raw display names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    /// Natural key, unique within the store.
    pub name: String,
    pub price: f64,
    pub tags: Vec<String>,
    pub special_appearance: Vec<String>,
    pub category_ids: Vec<CategoryId>,
    pub brand_id: Option<BrandId>,
    pub product_hero_image: String,
    pub product_gallery: Vec<String>,
    pub short_description: String,
    pub stock_quantity: i64,
    pub discounted_price: f64,
    pub number_of_pieces: String,
    pub sound_level: String,
    pub light_effect: String,
    pub safety_rating: String,
    pub usage_area: String,
    pub duration: String,
    pub weight_per_box: String,
    pub status: bool,
}

impl Default for CanonicalRecord {
    fn default() -> Self {
        Self {
            name: String::new(),
            price: 0.0,
            tags: Vec::new(),
            special_appearance: Vec::new(),
            category_ids: Vec::new(),
            brand_id: None,
            product_hero_image: String::new(),
            product_gallery: Vec::new(),
            short_description: String::new(),
            stock_quantity: 0,
            discounted_price: 0.0,
            number_of_pieces: String::new(),
            sound_level: String::new(),
            light_effect: String::new(),
            safety_rating: String::new(),
            usage_area: String::new(),
            duration: String::new(),
            weight_per_box: String::new(),
            status: false,
        }
    }
}

/// A persisted product: surrogate id plus the canonical fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: String,
    #[serde(flatten)]
    pub record: CanonicalRecord,
}

/// A persisted product with its reference fields expanded to display names,
/// as produced by the store for export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpandedProduct {
    pub product: ProductRecord,
    /// Category names in the product's category order.
    pub category_names: Vec<String>,
    pub brand_name: Option<String>,
}
