//! SQLite schema for the record store.
//!
//! List-valued product fields (tags, special appearance, gallery) are stored
//! as JSON text columns. Category membership is a join table ordered by
//! position so export reproduces the resolution order.

/// Schema version written to `PRAGMA user_version`.
pub const RECORD_SCHEMA_VERSION: i64 = 1;

/// Full schema for a fresh database.
pub const RECORD_SCHEMA_SQL: &str = r#"
CREATE TABLE categories (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE brands (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE products (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    price REAL NOT NULL,
    tags TEXT NOT NULL DEFAULT '[]',
    special_appearance TEXT NOT NULL DEFAULT '[]',
    brand_id TEXT REFERENCES brands(id),
    product_hero_image TEXT NOT NULL DEFAULT '',
    product_gallery TEXT NOT NULL DEFAULT '[]',
    short_description TEXT NOT NULL DEFAULT '',
    stock_quantity INTEGER NOT NULL DEFAULT 0,
    discounted_price REAL NOT NULL DEFAULT 0,
    number_of_pieces TEXT NOT NULL DEFAULT '',
    sound_level TEXT NOT NULL DEFAULT '',
    light_effect TEXT NOT NULL DEFAULT '',
    safety_rating TEXT NOT NULL DEFAULT '',
    usage_area TEXT NOT NULL DEFAULT '',
    duration TEXT NOT NULL DEFAULT '',
    weight_per_box TEXT NOT NULL DEFAULT '',
    status INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX idx_products_name ON products(name);

CREATE TABLE product_categories (
    product_id TEXT NOT NULL REFERENCES products(id) ON DELETE CASCADE,
    category_id TEXT NOT NULL REFERENCES categories(id),
    position INTEGER NOT NULL,
    PRIMARY KEY (product_id, category_id)
);

CREATE INDEX idx_product_categories_product ON product_categories(product_id);
"#;
