//! Form-structure derivation
//!
//! Turns a node schema (plus the loaded snapshot, dropdown options and an
//! optional existing row) into the ordered descriptor list a create/edit form
//! renders: every attribute, then every relationship of kind `Attribute`.

use serde_json::Value;

use super::{ControlType, FieldDescriptor, FieldKind, FieldValue};
use crate::dropdown::{DropdownOptions, SelectOption};
use crate::row::{ObjectRow, Properties};
use crate::schema::{AttributeSchema, Cardinality, NodeSchema, RelationshipKind, RelationshipSchema};
use crate::snapshot::SchemaSnapshot;

/// Generic implemented by every kind that can be an attribute's source
pub const SOURCE_GENERIC: &str = "DataSource";
/// Generic implemented by every kind that can own an attribute
pub const OWNER_GENERIC: &str = "DataOwner";

/// Prefix of relationship edge properties in payloads and mutation inputs
pub const RELATION_PREFIX: &str = "_relation__";

/// Read-only inputs shared by every form of one render
#[derive(Clone, Copy)]
pub struct FormContext<'a> {
    /// All node and generic schemas, with the kind-name and generic maps
    pub schemas: &'a SchemaSnapshot,
    pub options: &'a DropdownOptions,
}

impl<'a> FormContext<'a> {
    pub fn new(schemas: &'a SchemaSnapshot, options: &'a DropdownOptions) -> Self {
        Self { schemas, options }
    }
}

/// Relationships edited inline on the node form
pub fn form_relationships(schema: &NodeSchema) -> impl Iterator<Item = &RelationshipSchema> {
    schema
        .relationships
        .iter()
        .filter(|r| r.kind == RelationshipKind::Attribute)
}

/// Peer kinds whose objects must be fetched before the form can render
pub fn dropdown_peers(schema: &NodeSchema, snapshot: &SchemaSnapshot) -> Vec<String> {
    let mut peers: Vec<String> = Vec::new();
    for rel in form_relationships(schema) {
        if rel.inherited || snapshot.is_generic(&rel.peer) {
            continue;
        }
        if !peers.contains(&rel.peer) {
            peers.push(rel.peer.clone());
        }
    }
    peers
}

/// Derive the descriptors of a create/edit form.
///
/// Returns an empty list when `schema` is absent.
pub fn derive_form_structure(
    schema: Option<&NodeSchema>,
    ctx: &FormContext<'_>,
    row: Option<&ObjectRow>,
) -> Vec<FieldDescriptor> {
    let Some(schema) = schema else {
        return Vec::new();
    };

    let attributes = schema
        .attributes
        .iter()
        .map(|attr| attribute_field(attr, row));
    let relationships = form_relationships(schema).map(|rel| relationship_field(rel, ctx, row));

    attributes.chain(relationships).collect()
}

fn attribute_field(attr: &AttributeSchema, row: Option<&ObjectRow>) -> FieldDescriptor {
    let allowed = attr.allowed_values();
    let (control, options) = if allowed.is_empty() {
        (ControlType::for_attribute_kind(&attr.kind), Vec::new())
    } else {
        let options = allowed
            .iter()
            .map(|v| {
                let text = match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                SelectOption::new(text.clone(), text)
            })
            .collect();
        (ControlType::Select, options)
    };

    FieldDescriptor {
        name: attr.name.clone(),
        kind: FieldKind::Attribute {
            kind: attr.kind.clone(),
        },
        control,
        label: attr.display_label().to_string(),
        value: initial_attribute_value(attr, row),
        options,
        required: !attr.optional,
        read_only: attr.read_only,
    }
}

fn relationship_field(
    rel: &RelationshipSchema,
    ctx: &FormContext<'_>,
    row: Option<&ObjectRow>,
) -> FieldDescriptor {
    let peer_options = if rel.inherited {
        None
    } else {
        ctx.options.get(&rel.peer)
    };

    let options = match peer_options {
        Some(options) => options.to_vec(),
        None if ctx.schemas.is_generic(&rel.peer) => ctx
            .schemas
            .used_by(&rel.peer)
            .iter()
            .map(|kind| SelectOption::new(kind.clone(), ctx.schemas.kind_name(kind)))
            .collect(),
        None => {
            tracing::debug!(relationship = %rel.name, peer = %rel.peer, "No options for relationship");
            Vec::new()
        }
    };

    FieldDescriptor {
        name: rel.name.clone(),
        kind: FieldKind::Relationship {
            peer: rel.peer.clone(),
            cardinality: rel.cardinality,
        },
        control: relationship_control(rel),
        label: rel.display_label().to_string(),
        value: initial_relationship_value(rel, row),
        options,
        required: !rel.optional,
        read_only: false,
    }
}

/// Control for an inline relationship; depends only on cardinality and inheritance
pub fn relationship_control(rel: &RelationshipSchema) -> ControlType {
    match (rel.cardinality, rel.inherited) {
        (Cardinality::Many, _) => ControlType::MultiSelect,
        (Cardinality::One, true) => ControlType::Select2Step,
        (Cardinality::One, false) => ControlType::Select,
    }
}

/// Value an attribute input starts with
pub fn initial_attribute_value(attr: &AttributeSchema, row: Option<&ObjectRow>) -> FieldValue {
    match row.and_then(|r| r.attribute(&attr.name)) {
        Some(current) if !current.value.is_null() => FieldValue::Scalar(current.value.clone()),
        _ => FieldValue::Empty,
    }
}

/// Value a relationship input starts with; the shape follows the cardinality
pub fn initial_relationship_value(rel: &RelationshipSchema, row: Option<&ObjectRow>) -> FieldValue {
    match rel.cardinality {
        Cardinality::Many => FieldValue::Ids(
            row.map(|r| r.many(&rel.name).iter().map(|n| n.id().to_string()).collect())
                .unwrap_or_default(),
        ),
        Cardinality::One => match row.and_then(|r| r.one(&rel.name)) {
            Some(related) if rel.inherited => FieldValue::Related(related.node.clone()),
            Some(related) => FieldValue::Id(related.id().to_string()),
            None => FieldValue::Empty,
        },
    }
}

// ============================================================================
// Metadata edit form
// ============================================================================

/// The attribute or relationship whose metadata is edited
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MetadataTarget<'a> {
    Attribute(&'a str),
    Relationship(&'a str),
}

impl MetadataTarget<'_> {
    /// Prefix of the property names in payloads and mutation inputs
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Attribute(_) => "",
            Self::Relationship(_) => RELATION_PREFIX,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Attribute(name) | Self::Relationship(name) => name,
        }
    }

    fn properties<'r>(&self, row: Option<&'r ObjectRow>) -> Option<&'r Properties> {
        let row = row?;
        match self {
            Self::Attribute(name) => row.attribute(name).map(|a| &a.properties),
            Self::Relationship(name) => row.one(name).map(|r| &r.properties),
        }
    }
}

/// Descriptors for editing the owner/source and visibility/protection of a
/// single attribute or relationship.
///
/// Always returns the same fields in the same order: `source`, `owner`
/// (two-step selects over the kinds implementing the source/owner generics)
/// then `is_visible`, `is_protected` (checkboxes).
pub fn derive_metadata_form(
    row: Option<&ObjectRow>,
    target: MetadataTarget<'_>,
    snapshot: &SchemaSnapshot,
) -> Vec<FieldDescriptor> {
    let prefix = target.prefix();
    let properties = target.properties(row);

    let property_field = |name: &str, generic: &str| {
        let current = properties.and_then(|p| match name {
            "source" => p.source.as_ref(),
            _ => p.owner.as_ref(),
        });
        let options = snapshot
            .used_by(generic)
            .iter()
            .map(|kind| SelectOption::new(kind.clone(), snapshot.kind_name(kind)))
            .collect();
        FieldDescriptor {
            name: format!("{prefix}{name}"),
            kind: FieldKind::Property {
                generic: generic.to_string(),
            },
            control: ControlType::Select2Step,
            label: capitalize(name),
            value: current
                .map(|node| FieldValue::Related(node.clone()))
                .unwrap_or_default(),
            options,
            required: false,
            read_only: false,
        }
    };

    let flag_field = |name: &str, current: Option<bool>| FieldDescriptor {
        name: format!("{prefix}{name}"),
        kind: FieldKind::Flag,
        control: ControlType::Checkbox,
        label: name
            .split('_')
            .filter(|s| !s.is_empty())
            .map(capitalize)
            .collect::<Vec<_>>()
            .join(" "),
        value: FieldValue::Scalar(Value::Bool(current.unwrap_or_default())),
        options: Vec::new(),
        required: false,
        read_only: false,
    };

    vec![
        property_field("source", SOURCE_GENERIC),
        property_field("owner", OWNER_GENERIC),
        flag_field("is_visible", Some(properties.and_then(|p| p.is_visible).unwrap_or(true))),
        flag_field("is_protected", properties.and_then(|p| p.is_protected)),
    ]
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
