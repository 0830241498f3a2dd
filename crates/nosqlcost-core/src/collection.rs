//! A collection: name + document schema + domain statistics + document count.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::schema::{SchemaKind, SchemaNode};
use crate::stats::DomainStatistics;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    name: String,
    schema: SchemaNode,
    stats: DomainStatistics,
    document_count: u64,
}

impl Collection {
    /// Fails with `InvalidShape` if the schema root is not a mapping and with
    /// `InvalidValue` if `document_count` is negative.
    pub fn new(
        name: impl Into<String>,
        schema: SchemaNode,
        stats: DomainStatistics,
        document_count: i64,
    ) -> Result<Self> {
        let name = name.into();
        let root = match schema.kind {
            SchemaKind::Object { .. } => None,
            SchemaKind::Array { .. } => Some("array"),
            SchemaKind::Scalar { .. } => Some("scalar"),
        };
        if let Some(kind) = root {
            return Err(Error::InvalidShape(format!(
                "schema of collection `{name}` must be a mapping, got {kind}"
            )));
        }
        let document_count = u64::try_from(document_count).map_err(|_| {
            Error::InvalidValue(format!(
                "document_count must be non-negative, got {}",
                document_count
            ))
        })?;
        Ok(Self {
            name,
            schema,
            stats,
            document_count,
        })
    }

    /// Fails with `InvalidShape` if `schema` is not a JSON object.
    pub fn from_json(
        name: impl Into<String>,
        schema: &Value,
        stats: DomainStatistics,
        document_count: i64,
    ) -> Result<Self> {
        let schema = SchemaNode::from_json(schema)?;
        Self::new(name, schema, stats, document_count)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &SchemaNode {
        &self.schema
    }

    pub fn stats(&self) -> &DomainStatistics {
        &self.stats
    }

    pub fn document_count(&self) -> u64 {
        self.document_count
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} documents", self.name, self.document_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn negative_count_is_invalid_value() {
        let err = Collection::new("product", SchemaNode::document(Vec::new()), DomainStatistics::new(), -1)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidValue(_)));
    }

    #[test]
    fn non_mapping_schema_is_invalid_shape() {
        let err = Collection::from_json("product", &json!(["not", "a", "schema"]), DomainStatistics::new(), 10)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidShape(_)));
    }

    #[test]
    fn typed_schema_root_must_be_a_mapping() {
        let scalar = Collection::new("c", SchemaNode::scalar("x", "integer"), DomainStatistics::new(), 10);
        assert!(matches!(scalar, Err(Error::InvalidShape(_))));

        let array = Collection::new(
            "c",
            SchemaNode::array("items", Vec::new()),
            DomainStatistics::new(),
            10,
        );
        assert!(matches!(array, Err(Error::InvalidShape(_))));
    }

    #[test]
    fn display_shows_name_and_count() {
        let c = Collection::new("Stock", SchemaNode::document(Vec::new()), DomainStatistics::new(), 20_000_000)
            .unwrap();
        assert_eq!(c.to_string(), "Stock: 20000000 documents");
    }
}
