//! Schema definitions served by the remote schema endpoint
//!
//! A schema document lists concrete node types and abstract generic types.
//! Kinds the UI does not know about are preserved as `Other(..)` so that a
//! newer server never breaks deserialization.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SchemaError;

// ============================================================================
// Attribute kinds
// ============================================================================

/// Declared data kind of an attribute
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AttributeKind {
    Id,
    Text,
    String,
    TextArea,
    Number,
    Integer,
    Bandwidth,
    Boolean,
    Checkbox,
    DateTime,
    Email,
    Password,
    Url,
    File,
    MacAddress,
    Color,
    IpHost,
    IpNetwork,
    List,
    Json,
    Any,
    Other(String),
}

impl AttributeKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Id => "ID",
            Self::Text => "Text",
            Self::String => "String",
            Self::TextArea => "TextArea",
            Self::Number => "Number",
            Self::Integer => "Integer",
            Self::Bandwidth => "Bandwidth",
            Self::Boolean => "Boolean",
            Self::Checkbox => "Checkbox",
            Self::DateTime => "DateTime",
            Self::Email => "Email",
            Self::Password => "Password",
            Self::Url => "URL",
            Self::File => "File",
            Self::MacAddress => "MacAddress",
            Self::Color => "Color",
            Self::IpHost => "IPHost",
            Self::IpNetwork => "IPNetwork",
            Self::List => "List",
            Self::Json => "JSON",
            Self::Any => "Any",
            Self::Other(kind) => kind,
        }
    }
}

impl From<String> for AttributeKind {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "ID" => Self::Id,
            "Text" => Self::Text,
            "String" => Self::String,
            "TextArea" => Self::TextArea,
            "Number" => Self::Number,
            "Integer" => Self::Integer,
            "Bandwidth" => Self::Bandwidth,
            "Boolean" => Self::Boolean,
            "Checkbox" => Self::Checkbox,
            "DateTime" => Self::DateTime,
            "Email" => Self::Email,
            "Password" => Self::Password,
            "URL" => Self::Url,
            "File" => Self::File,
            "MacAddress" => Self::MacAddress,
            "Color" => Self::Color,
            "IPHost" => Self::IpHost,
            "IPNetwork" => Self::IpNetwork,
            "List" => Self::List,
            "JSON" => Self::Json,
            "Any" => Self::Any,
            _ => Self::Other(kind),
        }
    }
}

impl From<AttributeKind> for String {
    fn from(kind: AttributeKind) -> Self {
        match kind {
            AttributeKind::Other(kind) => kind,
            known => known.as_str().to_string(),
        }
    }
}

// ============================================================================
// Relationship kinds
// ============================================================================

/// Role a relationship plays on its node
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RelationshipKind {
    #[default]
    Generic,
    /// Edited inline on the node form like an attribute
    Attribute,
    Component,
    Parent,
    Group,
    Other(String),
}

impl RelationshipKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Generic => "Generic",
            Self::Attribute => "Attribute",
            Self::Component => "Component",
            Self::Parent => "Parent",
            Self::Group => "Group",
            Self::Other(kind) => kind,
        }
    }
}

impl From<String> for RelationshipKind {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "Generic" => Self::Generic,
            "Attribute" => Self::Attribute,
            "Component" => Self::Component,
            "Parent" => Self::Parent,
            "Group" => Self::Group,
            _ => Self::Other(kind),
        }
    }
}

impl From<RelationshipKind> for String {
    fn from(kind: RelationshipKind) -> Self {
        match kind {
            RelationshipKind::Other(kind) => kind,
            known => known.as_str().to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    #[default]
    One,
    Many,
}

// ============================================================================
// Definitions
// ============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttributeSchema {
    pub name: String,
    pub kind: AttributeKind,
    #[serde(default)]
    pub optional: bool,
    /// Allowed values; a non-empty list turns the input into a select
    #[serde(default, rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default)]
    pub unique: bool,
    #[serde(default)]
    pub read_only: bool,
}

impl AttributeSchema {
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    /// Enumerated values, empty when the attribute is free-form
    pub fn allowed_values(&self) -> &[Value] {
        self.enum_values.as_deref().unwrap_or(&[])
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RelationshipSchema {
    pub name: String,
    pub peer: String,
    #[serde(default)]
    pub kind: RelationshipKind,
    #[serde(default)]
    pub cardinality: Cardinality,
    #[serde(default)]
    pub inherited: bool,
    #[serde(default = "default_optional")]
    pub optional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
}

fn default_optional() -> bool {
    true
}

impl RelationshipSchema {
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    pub fn is_many(&self) -> bool {
        self.cardinality == Cardinality::Many
    }
}

/// A concrete object type
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeSchema {
    pub name: String,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_filter: Option<String>,
    #[serde(default)]
    pub inherit_from: Vec<String>,
    #[serde(default)]
    pub attributes: Vec<AttributeSchema>,
    #[serde(default)]
    pub relationships: Vec<RelationshipSchema>,
}

impl NodeSchema {
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeSchema> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn relationship(&self, name: &str) -> Option<&RelationshipSchema> {
        self.relationships.iter().find(|r| r.name == name)
    }

    pub fn inherits(&self, generic: &str) -> bool {
        self.inherit_from.iter().any(|g| g == generic)
    }
}

/// An abstract type implemented by one or more node types
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenericSchema {
    pub name: String,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Kinds of the node types that implement this generic
    #[serde(default)]
    pub used_by: Vec<String>,
    #[serde(default)]
    pub attributes: Vec<AttributeSchema>,
    #[serde(default)]
    pub relationships: Vec<RelationshipSchema>,
}

impl GenericSchema {
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Namespace {
    pub name: String,
    #[serde(default = "default_user_editable")]
    pub user_editable: bool,
}

fn default_user_editable() -> bool {
    true
}

/// Payload of the schema endpoint
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaDocument {
    #[serde(default)]
    pub nodes: Vec<NodeSchema>,
    #[serde(default)]
    pub generics: Vec<GenericSchema>,
    #[serde(default)]
    pub namespaces: Vec<Namespace>,
}

impl SchemaDocument {
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_value(value: Value) -> Result<Self, SchemaError> {
        Ok(serde_json::from_value(value)?)
    }
}
