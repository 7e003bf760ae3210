//! RecordStore trait definition.
//!
//! Abstracts the authoritative record store so the pipeline can run against
//! either the SQLite implementation or a test double.

use anyhow::Result;

use super::models::{BrandId, CanonicalRecord, CategoryId, ExpandedProduct, ProductRecord};

/// Trait for the authoritative catalog record store.
pub trait RecordStore: Send + Sync {
    // =========================================================================
    // Reference lookups (read-only)
    // =========================================================================

    /// Look up category ids for the given display names in one batched query.
    ///
    /// Unmatched names are silently omitted from the result.
    fn find_category_ids_by_names(&self, names: &[String]) -> Result<Vec<CategoryId>>;

    /// Look up a brand id by exact display name. `None` if no match.
    fn find_brand_id_by_name(&self, name: &str) -> Result<Option<BrandId>>;

    // =========================================================================
    // Product reconciliation
    // =========================================================================

    /// Find a persisted product by exact natural key (name).
    fn find_product_by_name(&self, name: &str) -> Result<Option<ProductRecord>>;

    /// Create a new persisted product from a canonical record.
    fn insert_product(&self, record: &CanonicalRecord) -> Result<ProductRecord>;

    /// Replace all fields of an existing product with the canonical record's
    /// fields. Full overwrite, not a sparse patch.
    fn update_product(&self, id: &str, record: &CanonicalRecord) -> Result<()>;

    // =========================================================================
    // Export support
    // =========================================================================

    /// List all persisted products with reference ids expanded to names.
    fn list_products_expanded(&self) -> Result<Vec<ExpandedProduct>>;

    // =========================================================================
    // Reference data management (admin/seed path)
    // =========================================================================

    /// Create a category, returning its id. Idempotent on name.
    fn create_category(&self, name: &str) -> Result<CategoryId>;

    /// Create a brand, returning its id. Idempotent on name.
    fn create_brand(&self, name: &str) -> Result<BrandId>;

    /// Number of persisted products.
    fn product_count(&self) -> Result<usize>;
}
