//! SQLite-backed record store implementation.

use anyhow::{Context, Result};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::info;
use uuid::Uuid;

use super::models::{BrandId, CanonicalRecord, CategoryId, ExpandedProduct, ProductRecord};
use super::schema::{RECORD_SCHEMA_SQL, RECORD_SCHEMA_VERSION};
use super::trait_def::RecordStore;

/// SQLite-backed store for products and their category/brand references.
#[derive(Clone)]
pub struct SqliteRecordStore {
    conn: Arc<Mutex<Connection>>,
}

const PRODUCT_COLUMNS: &str = "id, name, price, tags, special_appearance, brand_id, \
     product_hero_image, product_gallery, short_description, stock_quantity, \
     discounted_price, number_of_pieces, sound_level, light_effect, safety_rating, \
     usage_area, duration, weight_per_box, status";

/// Product row as read from SQLite, before JSON columns are parsed.
struct RawProductRow {
    id: String,
    name: String,
    price: f64,
    tags_json: String,
    special_appearance_json: String,
    brand_id: Option<String>,
    product_hero_image: String,
    product_gallery_json: String,
    short_description: String,
    stock_quantity: i64,
    discounted_price: f64,
    number_of_pieces: String,
    sound_level: String,
    light_effect: String,
    safety_rating: String,
    usage_area: String,
    duration: String,
    weight_per_box: String,
    status: bool,
}

fn read_product_row(row: &rusqlite::Row) -> rusqlite::Result<RawProductRow> {
    Ok(RawProductRow {
        id: row.get(0)?,
        name: row.get(1)?,
        price: row.get(2)?,
        tags_json: row.get(3)?,
        special_appearance_json: row.get(4)?,
        brand_id: row.get(5)?,
        product_hero_image: row.get(6)?,
        product_gallery_json: row.get(7)?,
        short_description: row.get(8)?,
        stock_quantity: row.get(9)?,
        discounted_price: row.get(10)?,
        number_of_pieces: row.get(11)?,
        sound_level: row.get(12)?,
        light_effect: row.get(13)?,
        safety_rating: row.get(14)?,
        usage_area: row.get(15)?,
        duration: row.get(16)?,
        weight_per_box: row.get(17)?,
        status: row.get(18)?,
    })
}

impl RawProductRow {
    /// Parse the JSON list columns and assemble the product record.
    /// Category ids are attached separately from the join table.
    fn into_product(self, category_ids: Vec<CategoryId>) -> Result<ProductRecord> {
        let tags: Vec<String> =
            serde_json::from_str(&self.tags_json).context("Invalid tags column")?;
        let special_appearance: Vec<String> = serde_json::from_str(&self.special_appearance_json)
            .context("Invalid special_appearance column")?;
        let product_gallery: Vec<String> = serde_json::from_str(&self.product_gallery_json)
            .context("Invalid product_gallery column")?;

        Ok(ProductRecord {
            id: self.id,
            record: CanonicalRecord {
                name: self.name,
                price: self.price,
                tags,
                special_appearance,
                category_ids,
                brand_id: self.brand_id,
                product_hero_image: self.product_hero_image,
                product_gallery,
                short_description: self.short_description,
                stock_quantity: self.stock_quantity,
                discounted_price: self.discounted_price,
                number_of_pieces: self.number_of_pieces,
                sound_level: self.sound_level,
                light_effect: self.light_effect,
                safety_rating: self.safety_rating,
                usage_area: self.usage_area,
                duration: self.duration,
                weight_per_box: self.weight_per_box,
                status: self.status,
            },
        })
    }
}

impl SqliteRecordStore {
    /// Open (or create) a record store database at the given path.
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path.as_ref()).context("Failed to open record database")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        let store = Self::from_connection(conn)?;

        let product_count = store.product_count()?;
        info!("Opened record store: {} products", product_count);
        Ok(store)
    }

    /// Open an in-memory store. Used by tests and throwaway runs.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        create_schema_if_needed(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn category_ids_for_product(
        conn: &Connection,
        product_id: &str,
    ) -> rusqlite::Result<Vec<CategoryId>> {
        let mut stmt = conn.prepare(
            "SELECT category_id FROM product_categories WHERE product_id = ?1 ORDER BY position",
        )?;
        let ids = stmt.query_map(params![product_id], |r| r.get(0))?.collect();
        ids
    }

    fn replace_product_categories(
        conn: &Connection,
        product_id: &str,
        category_ids: &[CategoryId],
    ) -> rusqlite::Result<()> {
        conn.execute(
            "DELETE FROM product_categories WHERE product_id = ?1",
            params![product_id],
        )?;
        let mut stmt = conn.prepare(
            "INSERT OR IGNORE INTO product_categories (product_id, category_id, position) \
             VALUES (?1, ?2, ?3)",
        )?;
        for (position, category_id) in category_ids.iter().enumerate() {
            stmt.execute(params![product_id, category_id, position as i64])?;
        }
        Ok(())
    }

    fn write_product_fields(
        conn: &Connection,
        id: &str,
        record: &CanonicalRecord,
        insert: bool,
    ) -> Result<()> {
        let tags_json = serde_json::to_string(&record.tags)?;
        let special_appearance_json = serde_json::to_string(&record.special_appearance)?;
        let product_gallery_json = serde_json::to_string(&record.product_gallery)?;

        let sql = if insert {
            "INSERT INTO products (id, name, price, tags, special_appearance, brand_id, \
             product_hero_image, product_gallery, short_description, stock_quantity, \
             discounted_price, number_of_pieces, sound_level, light_effect, safety_rating, \
             usage_area, duration, weight_per_box, status) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, \
             ?17, ?18, ?19)"
        } else {
            "UPDATE products SET name = ?2, price = ?3, tags = ?4, special_appearance = ?5, \
             brand_id = ?6, product_hero_image = ?7, product_gallery = ?8, \
             short_description = ?9, stock_quantity = ?10, discounted_price = ?11, \
             number_of_pieces = ?12, sound_level = ?13, light_effect = ?14, \
             safety_rating = ?15, usage_area = ?16, duration = ?17, weight_per_box = ?18, \
             status = ?19 WHERE id = ?1"
        };

        conn.execute(
            sql,
            params![
                id,
                record.name.trim(),
                record.price,
                tags_json,
                special_appearance_json,
                record.brand_id,
                record.product_hero_image,
                product_gallery_json,
                record.short_description,
                record.stock_quantity,
                record.discounted_price,
                record.number_of_pieces,
                record.sound_level,
                record.light_effect,
                record.safety_rating,
                record.usage_area,
                record.duration,
                record.weight_per_box,
                record.status,
            ],
        )
        .context("Failed to write product row")?;
        Ok(())
    }
}

fn create_schema_if_needed(conn: &Connection) -> Result<()> {
    let db_version: i64 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
    if db_version >= RECORD_SCHEMA_VERSION {
        return Ok(());
    }

    info!("Creating record store schema at version {}", RECORD_SCHEMA_VERSION);
    conn.execute_batch(RECORD_SCHEMA_SQL)
        .context("Failed to create record store schema")?;
    conn.pragma_update(None, "user_version", RECORD_SCHEMA_VERSION)?;
    Ok(())
}

impl RecordStore for SqliteRecordStore {
    fn find_category_ids_by_names(&self, names: &[String]) -> Result<Vec<CategoryId>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }
        let conn = self.conn.lock().unwrap();
        let placeholders = vec!["?"; names.len()].join(", ");
        let sql = format!(
            "SELECT id FROM categories WHERE name IN ({})",
            placeholders
        );
        let mut stmt = conn.prepare(&sql)?;
        let ids = stmt
            .query_map(params_from_iter(names.iter()), |r| r.get(0))?
            .collect::<rusqlite::Result<Vec<CategoryId>>>()
            .context("Failed to query categories")?;
        Ok(ids)
    }

    fn find_brand_id_by_name(&self, name: &str) -> Result<Option<BrandId>> {
        let conn = self.conn.lock().unwrap();
        let id = conn
            .query_row(
                "SELECT id FROM brands WHERE name = ?1",
                params![name],
                |r| r.get(0),
            )
            .optional()
            .context("Failed to query brand")?;
        Ok(id)
    }

    fn find_product_by_name(&self, name: &str) -> Result<Option<ProductRecord>> {
        let conn = self.conn.lock().unwrap();
        let sql = format!("SELECT {} FROM products WHERE name = ?1", PRODUCT_COLUMNS);
        let raw = conn
            .query_row(&sql, params![name], read_product_row)
            .optional()
            .context("Failed to query product by name")?;

        match raw {
            Some(raw) => {
                let category_ids = Self::category_ids_for_product(&conn, &raw.id)?;
                Ok(Some(raw.into_product(category_ids)?))
            }
            None => Ok(None),
        }
    }

    fn insert_product(&self, record: &CanonicalRecord) -> Result<ProductRecord> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        let id = Uuid::new_v4().to_string();

        Self::write_product_fields(&tx, &id, record, true)?;
        Self::replace_product_categories(&tx, &id, &record.category_ids)?;
        tx.commit()?;

        // The persisted name is trimmed; return the same.
        let mut record = record.clone();
        record.name = record.name.trim().to_string();
        Ok(ProductRecord { id, record })
    }

    fn update_product(&self, id: &str, record: &CanonicalRecord) -> Result<()> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        Self::write_product_fields(&tx, id, record, false)?;
        Self::replace_product_categories(&tx, id, &record.category_ids)?;
        tx.commit()?;
        Ok(())
    }

    fn list_products_expanded(&self) -> Result<Vec<ExpandedProduct>> {
        let conn = self.conn.lock().unwrap();

        // Category names per product, in position order.
        let mut stmt = conn.prepare(
            "SELECT pc.product_id, c.id, c.name FROM product_categories pc \
             JOIN categories c ON c.id = pc.category_id \
             ORDER BY pc.product_id, pc.position",
        )?;
        let mut categories_by_product: HashMap<String, Vec<(CategoryId, String)>> = HashMap::new();
        let rows = stmt.query_map([], |r| {
            Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?, r.get::<_, String>(2)?))
        })?;
        for row in rows {
            let (product_id, category_id, category_name) = row?;
            categories_by_product
                .entry(product_id)
                .or_default()
                .push((category_id, category_name));
        }

        let mut stmt = conn.prepare("SELECT id, name FROM brands")?;
        let brand_names: HashMap<BrandId, String> = stmt
            .query_map([], |r| Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?)))?
            .collect::<rusqlite::Result<_>>()?;

        let sql = format!("SELECT {} FROM products ORDER BY name", PRODUCT_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let raw_rows = stmt
            .query_map([], read_product_row)?
            .collect::<rusqlite::Result<Vec<RawProductRow>>>()
            .context("Failed to list products")?;

        let mut expanded = Vec::with_capacity(raw_rows.len());
        for raw in raw_rows {
            let (category_ids, category_names) = categories_by_product
                .remove(&raw.id)
                .map(|pairs| pairs.into_iter().unzip())
                .unwrap_or_default();
            let product = raw.into_product(category_ids)?;
            let brand_name = product
                .record
                .brand_id
                .as_ref()
                .and_then(|id| brand_names.get(id).cloned());
            expanded.push(ExpandedProduct {
                product,
                category_names,
                brand_name,
            });
        }
        Ok(expanded)
    }

    fn create_category(&self, name: &str) -> Result<CategoryId> {
        let conn = self.conn.lock().unwrap();
        if let Some(id) = conn
            .query_row(
                "SELECT id FROM categories WHERE name = ?1",
                params![name],
                |r| r.get::<_, String>(0),
            )
            .optional()?
        {
            return Ok(id);
        }
        let id = Uuid::new_v4().to_string();
        conn.execute(
            "INSERT INTO categories (id, name) VALUES (?1, ?2)",
            params![id, name],
        )
        .context("Failed to insert category")?;
        Ok(id)
    }

    fn create_brand(&self, name: &str) -> Result<BrandId> {
        let conn = self.conn.lock().unwrap();
        if let Some(id) = conn
            .query_row(
                "SELECT id FROM brands WHERE name = ?1",
                params![name],
                |r| r.get::<_, String>(0),
            )
            .optional()?
        {
            return Ok(id);
        }
        let id = Uuid::new_v4().to_string();
        conn.execute(
            "INSERT INTO brands (id, name) VALUES (?1, ?2)",
            params![id, name],
        )
        .context("Failed to insert brand")?;
        Ok(id)
    }

    fn product_count(&self) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM products", [], |r| r.get(0))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record(name: &str) -> CanonicalRecord {
        CanonicalRecord {
            name: name.to_string(),
            price: 9.99,
            tags: vec!["new".to_string(), "sale".to_string()],
            product_hero_image: "https://cdn.example.com/hero.jpg".to_string(),
            stock_quantity: 5,
            status: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_insert_and_find_by_name() {
        let store = SqliteRecordStore::in_memory().unwrap();
        let inserted = store.insert_product(&sample_record("Widget")).unwrap();

        let found = store.find_product_by_name("Widget").unwrap().unwrap();
        assert_eq!(found.id, inserted.id);
        assert_eq!(found.record.tags, vec!["new", "sale"]);
        assert!(found.record.status);
        assert!(store.find_product_by_name("Gadget").unwrap().is_none());
    }

    #[test]
    fn test_insert_returns_the_trimmed_name_it_persisted() {
        let store = SqliteRecordStore::in_memory().unwrap();
        let inserted = store.insert_product(&sample_record("  Widget  ")).unwrap();

        assert_eq!(inserted.record.name, "Widget");
        let found = store.find_product_by_name("Widget").unwrap().unwrap();
        assert_eq!(found.record.name, inserted.record.name);
    }

    #[test]
    fn test_update_overwrites_all_fields() {
        let store = SqliteRecordStore::in_memory().unwrap();
        let toys = store.create_category("Toys").unwrap();
        let games = store.create_category("Games").unwrap();

        let mut record = sample_record("Widget");
        record.category_ids = vec![toys.clone(), games.clone()];
        let inserted = store.insert_product(&record).unwrap();

        let mut replacement = CanonicalRecord {
            name: "Widget".to_string(),
            price: 4.5,
            ..Default::default()
        };
        replacement.category_ids = vec![games];
        store.update_product(&inserted.id, &replacement).unwrap();

        let found = store.find_product_by_name("Widget").unwrap().unwrap();
        assert_eq!(found.record.price, 4.5);
        assert!(found.record.tags.is_empty());
        assert_eq!(found.record.category_ids.len(), 1);
        assert_eq!(store.product_count().unwrap(), 1);
    }

    #[test]
    fn test_batched_category_lookup_omits_unmatched() {
        let store = SqliteRecordStore::in_memory().unwrap();
        let toys = store.create_category("Toys").unwrap();
        store.create_category("Games").unwrap();

        let ids = store
            .find_category_ids_by_names(&["Toys".to_string(), "Nonexistent".to_string()])
            .unwrap();
        assert_eq!(ids, vec![toys]);

        assert!(store.find_category_ids_by_names(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_brand_lookup_miss_is_none() {
        let store = SqliteRecordStore::in_memory().unwrap();
        let acme = store.create_brand("Acme").unwrap();

        assert_eq!(store.find_brand_id_by_name("Acme").unwrap(), Some(acme));
        assert_eq!(store.find_brand_id_by_name("Other").unwrap(), None);
    }

    #[test]
    fn test_create_category_is_idempotent_on_name() {
        let store = SqliteRecordStore::in_memory().unwrap();
        let first = store.create_category("Toys").unwrap();
        let second = store.create_category("Toys").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_list_products_expanded_resolves_names() {
        let store = SqliteRecordStore::in_memory().unwrap();
        let toys = store.create_category("Toys").unwrap();
        let acme = store.create_brand("Acme").unwrap();

        let mut record = sample_record("Widget");
        record.category_ids = vec![toys];
        record.brand_id = Some(acme);
        store.insert_product(&record).unwrap();

        let expanded = store.list_products_expanded().unwrap();
        assert_eq!(expanded.len(), 1);
        assert_eq!(expanded[0].category_names, vec!["Toys"]);
        assert_eq!(expanded[0].brand_name.as_deref(), Some("Acme"));
    }
}
