//! Schema-driven form structure
//!
//! A form is a flat, ordered list of [`FieldDescriptor`]s derived from a node
//! schema. The UI renders one input per descriptor and collects the edited
//! [`FieldValue`]s, which [`mutation`] turns back into a GraphQL input.

pub mod deriver;
pub mod mutation;

#[cfg(test)]
mod deriver_test;

pub use deriver::*;
pub use mutation::*;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dropdown::SelectOption;
use crate::row::NodeRef;
use crate::schema::{AttributeKind, Cardinality};

// ============================================================================
// Control types
// ============================================================================

/// Input control used to render a field
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlType {
    Text,
    TextArea,
    Number,
    Checkbox,
    DatePicker,
    Email,
    Password,
    Code,
    Select,
    #[serde(rename = "select2step")]
    Select2Step,
    MultiSelect,
}

impl ControlType {
    /// Control for a free-form attribute of the given kind
    pub fn for_attribute_kind(kind: &AttributeKind) -> Self {
        match kind {
            AttributeKind::TextArea => Self::TextArea,
            AttributeKind::Number | AttributeKind::Integer | AttributeKind::Bandwidth => {
                Self::Number
            }
            AttributeKind::Boolean | AttributeKind::Checkbox => Self::Checkbox,
            AttributeKind::DateTime => Self::DatePicker,
            AttributeKind::Email => Self::Email,
            AttributeKind::Password => Self::Password,
            AttributeKind::Json => Self::Code,
            AttributeKind::Id
            | AttributeKind::Text
            | AttributeKind::String
            | AttributeKind::Url
            | AttributeKind::File
            | AttributeKind::MacAddress
            | AttributeKind::Color
            | AttributeKind::IpHost
            | AttributeKind::IpNetwork
            | AttributeKind::List
            | AttributeKind::Any
            | AttributeKind::Other(_) => Self::Text,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::TextArea => "textarea",
            Self::Number => "number",
            Self::Checkbox => "checkbox",
            Self::DatePicker => "datepicker",
            Self::Email => "email",
            Self::Password => "password",
            Self::Code => "code",
            Self::Select => "select",
            Self::Select2Step => "select2step",
            Self::MultiSelect => "multiselect",
        }
    }

    /// HTML `type` attribute for controls rendered as a plain `<input>`
    pub fn input_type(&self) -> Option<&'static str> {
        match self {
            Self::Text => Some("text"),
            Self::Number => Some("number"),
            Self::DatePicker => Some("datetime-local"),
            Self::Email => Some("email"),
            Self::Password => Some("password"),
            _ => None,
        }
    }
}

// ============================================================================
// Field kinds and values
// ============================================================================

/// What a field edits
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Attribute { kind: AttributeKind },
    Relationship { peer: String, cardinality: Cardinality },
    /// Owner or source assignment of an attribute/relationship
    Property { generic: String },
    /// Visibility or protection flag
    Flag,
}

/// Value held by one form field
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    #[default]
    Empty,
    Scalar(Value),
    Id(String),
    Ids(Vec<String>),
    /// Inherited single relationship: the peer's concrete kind matters
    Related(NodeRef),
    TwoStep { parent: String, child: String },
}

impl FieldValue {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Scalar(v) => v.is_null(),
            Self::Id(id) => id.is_empty(),
            Self::Ids(_) => false,
            Self::Related(node) => node.id.is_empty(),
            Self::TwoStep { child, .. } => child.is_empty(),
        }
    }

    /// `(parent kind, child id)` for values a two-step select can show
    pub fn two_step_parts(&self) -> Option<(&str, &str)> {
        match self {
            Self::TwoStep { parent, child } => Some((parent.as_str(), child.as_str())),
            Self::Related(node) => {
                Some((node.typename.as_deref().unwrap_or(""), node.id.as_str()))
            }
            _ => None,
        }
    }

    /// Text shown in plain inputs
    pub fn as_text(&self) -> String {
        match self {
            Self::Scalar(Value::String(s)) => s.clone(),
            Self::Scalar(Value::Null) | Self::Empty => String::new(),
            Self::Scalar(other) => other.to_string(),
            Self::Id(id) => id.clone(),
            Self::Ids(ids) => ids.join(", "),
            Self::Related(node) => node.id.clone(),
            Self::TwoStep { child, .. } => child.clone(),
        }
    }

    pub fn as_bool(&self) -> bool {
        matches!(self, Self::Scalar(Value::Bool(true)))
    }
}

/// Everything needed to render one input
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub kind: FieldKind,
    pub control: ControlType,
    pub label: String,
    pub value: FieldValue,
    pub options: Vec<SelectOption>,
    pub required: bool,
    #[serde(default)]
    pub read_only: bool,
}
