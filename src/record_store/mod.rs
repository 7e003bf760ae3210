//! Authoritative record store for catalog products and their references.

mod models;
mod schema;
mod store;
mod trait_def;

pub use models::{BrandId, CanonicalRecord, CategoryId, ExpandedProduct, ProductRecord};
pub use schema::{RECORD_SCHEMA_SQL, RECORD_SCHEMA_VERSION};
pub use store::SqliteRecordStore;
pub use trait_def::RecordStore;
