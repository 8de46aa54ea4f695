//! Typed object rows
//!
//! GraphQL returns each object as a loosely shaped JSON node. Rows are parsed
//! against the node's schema so that every field is one of three explicit
//! shapes: an attribute value, a single related node, or a list of them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SchemaError;
use crate::schema::{Cardinality, NodeSchema};

/// Reference to another object as returned in relationship payloads
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_label: Option<String>,
    #[serde(default, rename = "__typename", skip_serializing_if = "Option::is_none")]
    pub typename: Option<String>,
}

impl NodeRef {
    pub fn label(&self) -> &str {
        self.display_label.as_deref().unwrap_or(&self.id)
    }

    fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let id = obj.get("id")?.as_str()?.to_string();
        Some(Self {
            id,
            display_label: obj
                .get("display_label")
                .and_then(Value::as_str)
                .map(String::from),
            typename: obj
                .get("__typename")
                .and_then(Value::as_str)
                .map(String::from),
        })
    }
}

/// Metadata carried by attributes and relationship edges
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Properties {
    pub is_protected: Option<bool>,
    pub is_visible: Option<bool>,
    pub owner: Option<NodeRef>,
    pub source: Option<NodeRef>,
    pub updated_at: Option<String>,
}

impl Properties {
    /// Read properties stored either directly on `obj` or behind a prefix
    /// such as `_relation__`
    fn from_object(obj: &serde_json::Map<String, Value>, prefix: &str) -> Self {
        let get = |key: &str| obj.get(&format!("{prefix}{key}"));
        Self {
            is_protected: get("is_protected").and_then(Value::as_bool),
            is_visible: get("is_visible").and_then(Value::as_bool),
            owner: get("owner").and_then(NodeRef::from_value),
            source: get("source").and_then(NodeRef::from_value),
            updated_at: get("updated_at").and_then(Value::as_str).map(String::from),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeValue {
    pub value: Value,
    pub properties: Properties,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RelatedNode {
    pub node: NodeRef,
    pub properties: Properties,
}

impl RelatedNode {
    pub fn id(&self) -> &str {
        &self.node.id
    }

    /// Accepts `{node, properties}` edges as well as flat nodes carrying
    /// `_relation__` prefixed properties
    fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        if let Some(inner) = obj.get("node") {
            if inner.is_null() {
                return None;
            }
            let node = NodeRef::from_value(inner)?;
            let properties = obj
                .get("properties")
                .and_then(Value::as_object)
                .map(|p| Properties::from_object(p, ""))
                .unwrap_or_default();
            return Some(Self { node, properties });
        }
        let node = NodeRef::from_value(value)?;
        Some(Self {
            node,
            properties: Properties::from_object(obj, "_relation__"),
        })
    }
}

/// One field of an object row
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RowField {
    Attribute(AttributeValue),
    One(Option<RelatedNode>),
    Many(Vec<RelatedNode>),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectRow {
    pub id: String,
    pub display_label: Option<String>,
    pub typename: Option<String>,
    fields: BTreeMap<String, RowField>,
}

impl ObjectRow {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_label: None,
            typename: None,
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, field: RowField) -> Self {
        self.fields.insert(name.into(), field);
        self
    }

    /// Parse a GraphQL node payload using the schema to pick each field's shape
    pub fn from_node(schema: &NodeSchema, node: &Value) -> Result<Self, SchemaError> {
        let obj = node
            .as_object()
            .ok_or_else(|| SchemaError::shape(&schema.kind, "object"))?;
        let id = obj
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| SchemaError::missing("id", &schema.kind))?
            .to_string();

        let mut row = Self::new(id);
        row.display_label = obj
            .get("display_label")
            .and_then(Value::as_str)
            .map(String::from);
        row.typename = obj
            .get("__typename")
            .and_then(Value::as_str)
            .map(String::from);

        for attr in &schema.attributes {
            let Some(raw) = obj.get(&attr.name) else {
                continue;
            };
            let value = match raw {
                Value::Object(inner) => AttributeValue {
                    value: inner.get("value").cloned().unwrap_or(Value::Null),
                    properties: Properties::from_object(inner, ""),
                },
                scalar => AttributeValue {
                    value: scalar.clone(),
                    properties: Properties::default(),
                },
            };
            row.fields.insert(attr.name.clone(), RowField::Attribute(value));
        }

        for rel in &schema.relationships {
            let Some(raw) = obj.get(&rel.name) else {
                continue;
            };
            let field = match rel.cardinality {
                Cardinality::One => RowField::One(RelatedNode::from_value(raw)),
                Cardinality::Many => {
                    let items: &[Value] = match raw {
                        Value::Array(items) => items.as_slice(),
                        Value::Object(inner) => inner
                            .get("edges")
                            .and_then(Value::as_array)
                            .map(Vec::as_slice)
                            .ok_or_else(|| SchemaError::shape(&rel.name, "edges list"))?,
                        Value::Null => &[],
                        _ => return Err(SchemaError::shape(&rel.name, "list or edges")),
                    };
                    RowField::Many(items.iter().filter_map(RelatedNode::from_value).collect())
                }
            };
            row.fields.insert(rel.name.clone(), field);
        }

        Ok(row)
    }

    pub fn field(&self, name: &str) -> Option<&RowField> {
        self.fields.get(name)
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        match self.fields.get(name) {
            Some(RowField::Attribute(value)) => Some(value),
            _ => None,
        }
    }

    pub fn one(&self, name: &str) -> Option<&RelatedNode> {
        match self.fields.get(name) {
            Some(RowField::One(Some(related))) => Some(related),
            _ => None,
        }
    }

    pub fn many(&self, name: &str) -> &[RelatedNode] {
        match self.fields.get(name) {
            Some(RowField::Many(items)) => items,
            _ => &[],
        }
    }

    /// Display text for list cells
    pub fn cell_text(&self, name: &str) -> String {
        match self.fields.get(name) {
            Some(RowField::Attribute(attr)) => match &attr.value {
                Value::Null => String::new(),
                Value::String(s) => s.clone(),
                other => other.to_string(),
            },
            Some(RowField::One(Some(related))) => related.node.label().to_string(),
            Some(RowField::Many(items)) => items
                .iter()
                .map(|r| r.node.label())
                .collect::<Vec<_>>()
                .join(", "),
            _ => String::new(),
        }
    }
}

/// One page of an object list query
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObjectPage {
    pub count: usize,
    pub rows: Vec<ObjectRow>,
}

impl ObjectPage {
    /// Parse `data[<kind>] = { count, edges: [{ node }] }`
    pub fn from_response(schema: &NodeSchema, data: &Value) -> Result<Self, SchemaError> {
        let envelope = data
            .get(&schema.kind)
            .ok_or_else(|| SchemaError::missing(&schema.kind, "response data"))?;
        let count = envelope
            .get("count")
            .and_then(Value::as_u64)
            .unwrap_or_default() as usize;
        let edges = envelope
            .get("edges")
            .and_then(Value::as_array)
            .ok_or_else(|| SchemaError::shape("edges", "list"))?;
        let rows = edges
            .iter()
            .map(|edge| {
                let node = edge
                    .get("node")
                    .ok_or_else(|| SchemaError::missing("node", "edge"))?;
                ObjectRow::from_node(schema, node)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { count, rows })
    }
}
