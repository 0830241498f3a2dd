//! Document, collection and database size estimation.
//!
//! Sizing rules (defaults from `SizeConfig`):
//! - integer / number: 8 bytes
//! - string: 80 bytes (average)
//! - date: 20 bytes (any field whose name ends with "date", case-insensitive)
//! - long string: 200 bytes (fields named exactly "description" or "comment")
//! - every field: +12 bytes key/type overhead, including embedded objects and arrays
//! - arrays: 2 elements on average
//!
//! The walk is depth-first and terminates because schemas are trees.

use nosqlcost_core::collection::Collection;
use nosqlcost_core::config::SizeConfig;
use nosqlcost_core::error::Result;
use nosqlcost_core::schema::{LogicalType, SchemaKind, SchemaNode};
use serde_json::Value;

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Refine a declared scalar type by field name.
pub fn logical_type(field_name: Option<&str>, declared: Option<&str>, cfg: &SizeConfig) -> LogicalType {
    let mut logical = LogicalType::from_declared(declared);
    if let Some(name) = field_name {
        if !cfg.date_suffix.is_empty()
            && name.to_lowercase().ends_with(&cfg.date_suffix.to_lowercase())
        {
            logical = LogicalType::Date;
        }
        if cfg.long_text_fields.iter().any(|f| f == name) {
            logical = LogicalType::LongString;
        }
    }
    logical
}

/// Value bytes for a logical type; unrecognized types cost nothing.
pub fn value_bytes(logical: &LogicalType, cfg: &SizeConfig) -> u64 {
    match logical {
        LogicalType::Integer => cfg.integer_bytes,
        LogicalType::Number => cfg.number_bytes,
        LogicalType::String => cfg.string_bytes,
        LogicalType::Date => cfg.date_bytes,
        LogicalType::LongString => cfg.long_string_bytes,
        LogicalType::Other(_) | LogicalType::Unknown => 0,
    }
}

/// Estimated size in bytes of one document described by `schema`.
pub fn estimate_document_size(schema: &SchemaNode) -> u64 {
    estimate_document_size_with(&SizeConfig::default(), schema)
}

/// Expects a mapping root, as held by every `Collection`; a scalar or array
/// root has no fields and sizes to 0. Use `estimate_document_size_json` to
/// reject such roots from raw input.
pub fn estimate_document_size_with(cfg: &SizeConfig, schema: &SchemaNode) -> u64 {
    match schema.children() {
        Some(children) => children
            .iter()
            .map(|(name, field)| field_size(cfg, name, field))
            .fold(0u64, u64::saturating_add),
        None => 0,
    }
}

fn field_size(cfg: &SizeConfig, name: &str, field: &SchemaNode) -> u64 {
    let value = match &field.kind {
        SchemaKind::Object { .. } => estimate_document_size_with(cfg, field),
        SchemaKind::Array { item } => cfg
            .avg_array_len
            .saturating_mul(estimate_document_size_with(cfg, item)),
        SchemaKind::Scalar { declared } => {
            value_bytes(&logical_type(Some(name), declared.as_deref(), cfg), cfg)
        }
    };
    cfg.key_overhead_bytes.saturating_add(value)
}

/// Parse-and-size convenience for raw JSON schemas.
/// Fails with `InvalidShape` if `schema` is not a mapping.
pub fn estimate_document_size_json(schema: &Value) -> Result<u64> {
    Ok(estimate_document_size(&SchemaNode::from_json(schema)?))
}

/// Document size × document count.
pub fn compute_collection_size_bytes(collection: &Collection) -> u64 {
    compute_collection_size_bytes_with(&SizeConfig::default(), collection)
}

pub fn compute_collection_size_bytes_with(cfg: &SizeConfig, collection: &Collection) -> u64 {
    estimate_document_size_with(cfg, collection.schema()).saturating_mul(collection.document_count())
}

/// Sum of collection sizes.
pub fn compute_database_size_bytes(collections: &[Collection]) -> u64 {
    compute_database_size_bytes_with(&SizeConfig::default(), collections)
}

pub fn compute_database_size_bytes_with(cfg: &SizeConfig, collections: &[Collection]) -> u64 {
    collections
        .iter()
        .map(|c| compute_collection_size_bytes_with(cfg, c))
        .fold(0u64, u64::saturating_add)
}

pub fn compute_database_size_gb(collections: &[Collection]) -> f64 {
    bytes_to_gb(compute_database_size_bytes(collections))
}

pub fn bytes_to_gb(size_bytes: u64) -> f64 {
    size_bytes as f64 / BYTES_PER_GB
}

pub fn gb_to_bytes(size_gb: f64) -> f64 {
    size_gb * BYTES_PER_GB
}
