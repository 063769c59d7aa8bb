//! Shared fixtures for the integration suites.
//!
//! Import via `mod common;` from any suite's main.rs.

#![allow(dead_code)]
#![allow(unused_imports)]

pub use typed_overlay::memory::{MemoryRecord, MemoryTable, RecordId, SqlQuery};
pub use typed_overlay::{
    CollisionPolicy, Declaration, DirtyPolicy, FieldSpec, HostSchema, OverlayConfig, Value,
};

/// The `options` overlay of the product fixture
pub fn options_declaration() -> Declaration {
    Declaration::new("options")
        .field("color", "string")
        .field("price", "integer")
        .field("published", FieldSpec::keyed("boolean", "p"))
        .field("weight", FieldSpec::keyed("float", "w"))
        .field("popular", "boolean")
        .field("build_timestamp", "time")
        .field("tags", "array")
        .field("reviews", "hash")
        .field("released_at", "date")
        .field("miles", "decimal")
}

/// The `data` overlay of the product fixture
pub fn data_declaration() -> Declaration {
    Declaration::new("data").field("color_data", "string")
}

/// Product schema with both overlays, default configuration
pub fn product_schema() -> HostSchema {
    product_schema_with(OverlayConfig::default())
}

/// Product schema with both overlays
pub fn product_schema_with(config: OverlayConfig) -> HostSchema {
    let mut schema = HostSchema::new("products").with_config(config);
    schema
        .declare(options_declaration())
        .expect("options overlay declares");
    schema
        .declare(data_declaration())
        .expect("data overlay declares");
    schema
}

/// A saved product record with the given field values
pub fn saved_product(schema: &HostSchema, fields: &[(&str, Value)]) -> MemoryRecord {
    let mut record = MemoryRecord::new();
    for (field, value) in fields {
        schema.write(&mut record, field, value).expect("fixture write");
    }
    record.save();
    record
}

/// A products table holding one saved record per row
pub fn products_table(schema: &HostSchema, rows: &[Vec<(&str, Value)>]) -> MemoryTable {
    let mut table = MemoryTable::new("products");
    for row in rows {
        table.insert(saved_product(schema, row));
    }
    table
}
