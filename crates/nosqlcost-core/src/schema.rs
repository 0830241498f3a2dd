//! Document schema trees. Pure data; sizing rules live in `nosqlcost-model`.
//!
//! A `SchemaNode` is parsed once from a JSON-Schema-like description:
//!
//! ```json
//! { "properties": {
//!     "IDP":   { "type": "integer" },
//!     "brand": { "type": "string" },
//!     "categories": { "type": "array", "items": { "properties": { "title": { "type": "string" } } } },
//!     "supplier":   { "type": "object", "properties": { "name": { "type": "string" } } }
//! } }
//! ```
//!
//! Only the root must be a mapping. Malformed nested field schemas degrade to
//! an untyped scalar (one key slot, no value bytes) instead of failing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Storage class used by the size model once a field's declared type has been
/// refined by its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalType {
    Integer,
    Number,
    String,
    Date,
    LongString,
    /// Any other declared type (`boolean`, `null`, typos...). Costs no value bytes.
    Other(String),
    /// No declared type at all.
    Unknown,
}

impl LogicalType {
    pub fn from_declared(declared: Option<&str>) -> Self {
        match declared {
            Some("integer") => LogicalType::Integer,
            Some("number") => LogicalType::Number,
            Some("string") => LogicalType::String,
            Some("date") => LogicalType::Date,
            Some("longstring") => LogicalType::LongString,
            Some(other) => LogicalType::Other(other.to_string()),
            None => LogicalType::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum SchemaKind {
    Scalar {
        declared: Option<String>,
    },
    Object {
        children: BTreeMap<String, SchemaNode>,
    },
    /// `item` is itself a document-shaped node (its own `properties`).
    Array {
        item: Box<SchemaNode>,
    },
}

/// One field, or a whole document when `name` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaNode {
    pub name: Option<String>,
    pub kind: SchemaKind,
}

impl SchemaNode {
    /// A root document with the given fields.
    pub fn document(fields: impl IntoIterator<Item = SchemaNode>) -> Self {
        Self {
            name: None,
            kind: SchemaKind::Object {
                children: index_fields(fields),
            },
        }
    }

    pub fn scalar(name: impl Into<String>, declared: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            kind: SchemaKind::Scalar {
                declared: Some(declared.into()),
            },
        }
    }

    /// An embedded sub-document.
    pub fn object(name: impl Into<String>, fields: impl IntoIterator<Item = SchemaNode>) -> Self {
        Self {
            name: Some(name.into()),
            kind: SchemaKind::Object {
                children: index_fields(fields),
            },
        }
    }

    /// An array whose items are documents with the given fields.
    pub fn array(name: impl Into<String>, item_fields: impl IntoIterator<Item = SchemaNode>) -> Self {
        Self {
            name: Some(name.into()),
            kind: SchemaKind::Array {
                item: Box::new(SchemaNode::document(item_fields)),
            },
        }
    }

    /// Add (or replace) a field on an object node. No-op for other kinds.
    pub fn with_field(mut self, field: SchemaNode) -> Self {
        if let SchemaKind::Object { children } = &mut self.kind {
            let key = field.name.clone().unwrap_or_default();
            children.insert(key, field);
        }
        self
    }

    pub fn children(&self) -> Option<&BTreeMap<String, SchemaNode>> {
        match &self.kind {
            SchemaKind::Object { children } => Some(children),
            _ => None,
        }
    }

    pub fn field(&self, name: &str) -> Option<&SchemaNode> {
        self.children().and_then(|c| c.get(name))
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.children().map_or(true, |c| c.is_empty())
    }

    /// Parse a root schema. The root must be a JSON object; its `properties`
    /// (if any) become the document's fields.
    pub fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::Object(_) => Ok(Self {
                name: None,
                kind: SchemaKind::Object {
                    children: parse_properties(value),
                },
            }),
            other => Err(Error::InvalidShape(format!(
                "schema must be a mapping (JSON object), got {}",
                json_kind(other)
            ))),
        }
    }

    pub fn from_json_str(src: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(src)
            .map_err(|e| Error::InvalidShape(format!("schema is not valid JSON: {e}")))?;
        Self::from_json(&value)
    }
}

fn index_fields(fields: impl IntoIterator<Item = SchemaNode>) -> BTreeMap<String, SchemaNode> {
    fields
        .into_iter()
        .map(|f| (f.name.clone().unwrap_or_default(), f))
        .collect()
}

fn parse_properties(schema: &Value) -> BTreeMap<String, SchemaNode> {
    match schema.get("properties") {
        Some(Value::Object(props)) => props
            .iter()
            .map(|(name, field)| (name.clone(), parse_field(name, field)))
            .collect(),
        _ => BTreeMap::new(),
    }
}

fn parse_field(name: &str, field: &Value) -> SchemaNode {
    let declared = declared_type(field);
    let kind = match declared.as_deref() {
        Some("object") => SchemaKind::Object {
            children: parse_properties(field),
        },
        Some("array") => {
            let item = match field.get("items") {
                Some(items @ Value::Object(_)) => parse_properties(items),
                _ => BTreeMap::new(),
            };
            SchemaKind::Array {
                item: Box::new(SchemaNode {
                    name: None,
                    kind: SchemaKind::Object { children: item },
                }),
            }
        }
        _ => SchemaKind::Scalar { declared },
    };
    SchemaNode {
        name: Some(name.to_string()),
        kind,
    }
}

/// `"type": "string"` or `"type": ["string", "null"]` (first non-null wins).
fn declared_type(field: &Value) -> Option<String> {
    match field.get("type")? {
        Value::String(s) => Some(s.clone()),
        Value::Array(types) => types
            .iter()
            .filter_map(Value::as_str)
            .find(|t| *t != "null")
            .map(str::to_string),
        _ => None,
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_nested_objects_and_arrays() {
        let schema = SchemaNode::from_json(&json!({
            "properties": {
                "IDP": { "type": "integer" },
                "supplier": { "type": "object", "properties": { "name": { "type": "string" } } },
                "categories": { "type": "array", "items": { "properties": { "title": { "type": "string" } } } }
            }
        }))
        .unwrap();

        let children = schema.children().unwrap();
        assert_eq!(children.len(), 3);
        assert!(matches!(
            children["IDP"].kind,
            SchemaKind::Scalar { declared: Some(ref t) } if t == "integer"
        ));
        assert!(schema.field("supplier").unwrap().has_field("name"));
        match &children["categories"].kind {
            SchemaKind::Array { item } => assert!(item.has_field("title")),
            other => panic!("expected array, got {:?}", other),
        }
    }

    #[test]
    fn rejects_non_mapping_root() {
        for bad in [json!([1, 2]), json!("schema"), json!(42), json!(null)] {
            let err = SchemaNode::from_json(&bad).unwrap_err();
            assert!(matches!(err, Error::InvalidShape(_)));
        }
    }

    #[test]
    fn missing_properties_is_empty_document() {
        let schema = SchemaNode::from_json(&json!({ "title": "Empty" })).unwrap();
        assert!(schema.is_empty());
    }

    #[test]
    fn malformed_field_degrades_to_untyped_scalar() {
        let schema = SchemaNode::from_json(&json!({ "properties": { "weird": 7 } })).unwrap();
        assert_eq!(
            schema.field("weird").unwrap().kind,
            SchemaKind::Scalar { declared: None }
        );
    }

    #[test]
    fn nullable_type_lists_use_first_concrete_type() {
        let schema =
            SchemaNode::from_json(&json!({ "properties": { "price": { "type": ["null", "number"] } } }))
                .unwrap();
        assert_eq!(
            schema.field("price").unwrap().kind,
            SchemaKind::Scalar {
                declared: Some("number".into())
            }
        );
    }

    #[test]
    fn builders_match_parsed_tree() {
        let built = SchemaNode::document([
            SchemaNode::scalar("IDP", "integer"),
            SchemaNode::object("supplier", [SchemaNode::scalar("name", "string")]),
        ]);
        let parsed = SchemaNode::from_json(&json!({
            "properties": {
                "IDP": { "type": "integer" },
                "supplier": { "type": "object", "properties": { "name": { "type": "string" } } }
            }
        }))
        .unwrap();
        assert_eq!(built, parsed);
    }
}
