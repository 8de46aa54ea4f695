//! Mutation input generation from submitted form values
//!
//! Attributes are sent as `{ "value": .. }`, single relationships as
//! `{ "id": .. }` and many relationships as `[{ "id": .. }]`. In update mode
//! only fields whose value differs from the existing row are sent.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::{json, Map, Value};

use super::deriver::{form_relationships, initial_attribute_value, initial_relationship_value, MetadataTarget};
use super::FieldValue;
use crate::row::ObjectRow;
use crate::schema::{Cardinality, NodeSchema};

/// Field name -> submitted value
pub type FormValues = BTreeMap<String, FieldValue>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MutationMode {
    Create,
    Update,
}

/// Seed form values from descriptors, as a form does on mount
pub fn form_values(fields: &[super::FieldDescriptor]) -> FormValues {
    fields
        .iter()
        .map(|f| (f.name.clone(), f.value.clone()))
        .collect()
}

/// Build the `data` input of a create or update mutation
pub fn build_mutation_input(
    schema: &NodeSchema,
    values: &FormValues,
    mode: MutationMode,
    existing: Option<&ObjectRow>,
) -> Value {
    let mut data = Map::new();
    let existing = existing.filter(|_| mode == MutationMode::Update);

    if let Some(row) = existing {
        data.insert("id".to_string(), Value::String(row.id.clone()));
    }

    for attr in &schema.attributes {
        let Some(value) = values.get(&attr.name) else {
            continue;
        };
        if let Some(row) = existing {
            if *value == initial_attribute_value(attr, Some(row)) {
                continue;
            }
        } else if value.is_empty() {
            continue;
        }
        let encoded = match value {
            FieldValue::Scalar(v) => v.clone(),
            FieldValue::Empty => Value::Null,
            other => Value::String(other.as_text()),
        };
        data.insert(attr.name.clone(), json!({ "value": encoded }));
    }

    for rel in form_relationships(schema) {
        let Some(value) = values.get(&rel.name) else {
            continue;
        };
        if let Some(row) = existing {
            if same_relationship_value(value, &initial_relationship_value(rel, Some(row))) {
                continue;
            }
        }
        let encoded = match rel.cardinality {
            Cardinality::Many => Value::Array(
                peer_ids(value)
                    .into_iter()
                    .map(|id| json!({ "id": id }))
                    .collect(),
            ),
            Cardinality::One => match peer_ids(value).into_iter().next() {
                Some(id) => json!({ "id": id }),
                None if existing.is_some() => Value::Null,
                None => continue,
            },
        };
        data.insert(rel.name.clone(), encoded);
    }

    Value::Object(data)
}

/// Build the `data` input updating the metadata of one attribute or relationship
pub fn build_metadata_input(target: MetadataTarget<'_>, values: &FormValues, row: &ObjectRow) -> Value {
    let prefix = target.prefix();
    let mut field = Map::new();

    if let MetadataTarget::Relationship(name) = target {
        if let Some(peer) = row.one(name) {
            field.insert("id".to_string(), Value::String(peer.id().to_string()));
        }
    }

    for property in ["source", "owner"] {
        let key = format!("{prefix}{property}");
        let encoded = values
            .get(&key)
            .and_then(|v| peer_ids(v).into_iter().next())
            .map(|id| json!({ "id": id }))
            .unwrap_or(Value::Null);
        field.insert(key, encoded);
    }
    for flag in ["is_visible", "is_protected"] {
        let key = format!("{prefix}{flag}");
        let enabled = values.get(&key).map(FieldValue::as_bool).unwrap_or_default();
        field.insert(key, Value::Bool(enabled));
    }

    let mut data = Map::new();
    data.insert("id".to_string(), Value::String(row.id.clone()));
    data.insert(target.name().to_string(), Value::Object(field));
    Value::Object(data)
}

fn peer_ids(value: &FieldValue) -> Vec<String> {
    match value {
        FieldValue::Id(id) if !id.is_empty() => vec![id.clone()],
        FieldValue::Ids(ids) => ids.clone(),
        FieldValue::Related(node) if !node.id.is_empty() => vec![node.id.clone()],
        FieldValue::TwoStep { child, .. } if !child.is_empty() => vec![child.clone()],
        FieldValue::Scalar(Value::String(id)) if !id.is_empty() => vec![id.clone()],
        _ => Vec::new(),
    }
}

/// Relationship values compare by peer ids; order of many values is ignored
fn same_relationship_value(a: &FieldValue, b: &FieldValue) -> bool {
    let left: BTreeSet<String> = peer_ids(a).into_iter().collect();
    let right: BTreeSet<String> = peer_ids(b).into_iter().collect();
    left == right
}
