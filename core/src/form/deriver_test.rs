use serde_json::json;

use super::*;
use crate::dropdown::{DropdownOptions, SelectOption};
use crate::row::ObjectRow;
use crate::schema::NodeSchema;
use crate::snapshot::SchemaSnapshot;

fn snapshot() -> SchemaSnapshot {
    SchemaSnapshot::from_json(
        r#"{
            "nodes": [
                {
                    "name": "device",
                    "kind": "InfraDevice",
                    "label": "Device",
                    "attributes": [
                        {"name": "name", "kind": "Text", "optional": false, "label": "Name"},
                        {"name": "role", "kind": "Number", "enum": ["edge", "core"]},
                        {"name": "config", "kind": "JSON", "optional": true},
                        {"name": "enabled", "kind": "Boolean", "optional": true}
                    ],
                    "relationships": [
                        {"name": "site", "peer": "BuiltinLocation", "kind": "Attribute", "cardinality": "one", "optional": false},
                        {"name": "tags", "peer": "BuiltinTag", "kind": "Attribute", "cardinality": "many"},
                        {"name": "owner", "peer": "DataOwner", "kind": "Attribute", "cardinality": "one", "inherited": true},
                        {"name": "interfaces", "peer": "InfraInterface", "kind": "Component", "cardinality": "many"}
                    ]
                },
                {
                    "name": "circuit",
                    "kind": "InfraCircuit",
                    "label": "Circuit",
                    "relationships": [
                        {"name": "provider", "peer": "CoreGenericAccount", "kind": "Attribute", "cardinality": "one"},
                        {"name": "team", "peer": "CoreGroup", "kind": "Attribute", "cardinality": "one"}
                    ]
                },
                {"name": "account", "kind": "CoreAccount", "label": "Account"},
                {"name": "group", "kind": "CoreGroup", "label": "Group"},
                {"name": "repository", "kind": "CoreRepository", "label": "Repository"}
            ],
            "generics": [
                {"name": "owner", "kind": "DataOwner", "used_by": ["CoreAccount", "CoreGroup"]},
                {"name": "source", "kind": "DataSource", "used_by": ["CoreAccount", "CoreRepository"]},
                {"name": "generic_account", "kind": "CoreGenericAccount", "used_by": ["CoreAccount"]}
            ]
        }"#,
    )
    .unwrap()
}

fn options() -> DropdownOptions {
    let mut options = DropdownOptions::new();
    options.insert(
        "BuiltinLocation",
        vec![SelectOption::new("s1", "DFW"), SelectOption::new("s2", "JFK")],
    );
    options.insert("BuiltinTag", vec![SelectOption::new("t1", "blue")]);
    options
}

fn device(snapshot: &SchemaSnapshot) -> &NodeSchema {
    snapshot.node("InfraDevice").unwrap()
}

fn existing_row(snapshot: &SchemaSnapshot) -> ObjectRow {
    ObjectRow::from_node(
        device(snapshot),
        &json!({
            "id": "d1",
            "name": {"value": "spine1", "is_visible": true, "is_protected": true,
                     "source": {"id": "r1", "display_label": "repo", "__typename": "CoreRepository"}},
            "role": {"value": "edge"},
            "config": {"value": null},
            "site": {"node": {"id": "s1", "display_label": "DFW"}},
            "tags": {"edges": [{"node": {"id": "t1"}}, {"node": {"id": "t2"}}]},
            "owner": {"node": {"id": "a1", "display_label": "admin", "__typename": "CoreAccount"}}
        }),
    )
    .unwrap()
}

#[test]
fn test_absent_schema_yields_no_fields() {
    let snapshot = snapshot();
    let options = options();
    let ctx = FormContext::new(&snapshot, &options);
    assert!(derive_form_structure(None, &ctx, None).is_empty());
}

#[test]
fn test_field_count_and_order() {
    let snapshot = snapshot();
    let options = options();
    let ctx = FormContext::new(&snapshot, &options);
    let schema = device(&snapshot);

    let fields = derive_form_structure(Some(schema), &ctx, None);
    let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();

    let inline = schema
        .relationships
        .iter()
        .filter(|r| r.kind == crate::schema::RelationshipKind::Attribute)
        .count();
    assert_eq!(fields.len(), schema.attributes.len() + inline);
    assert_eq!(
        names,
        vec!["name", "role", "config", "enabled", "site", "tags", "owner"]
    );
}

#[test]
fn test_control_types() {
    let snapshot = snapshot();
    let options = options();
    let ctx = FormContext::new(&snapshot, &options);
    let fields = derive_form_structure(Some(device(&snapshot)), &ctx, None);
    let control = |name: &str| fields.iter().find(|f| f.name == name).unwrap().control;

    assert_eq!(control("name"), ControlType::Text);
    // enum wins over the declared kind
    assert_eq!(control("role"), ControlType::Select);
    assert_eq!(control("config"), ControlType::Code);
    assert_eq!(control("enabled"), ControlType::Checkbox);
    assert_eq!(control("site"), ControlType::Select);
    assert_eq!(control("tags"), ControlType::MultiSelect);
    assert_eq!(control("owner"), ControlType::Select2Step);
}

#[test]
fn test_control_type_is_deterministic() {
    let snapshot = snapshot();
    let options = options();
    let ctx = FormContext::new(&snapshot, &options);
    let first = derive_form_structure(Some(device(&snapshot)), &ctx, None);
    let second = derive_form_structure(Some(device(&snapshot)), &ctx, None);
    assert_eq!(first, second);
}

#[test]
fn test_required_and_labels() {
    let snapshot = snapshot();
    let options = options();
    let ctx = FormContext::new(&snapshot, &options);
    let fields = derive_form_structure(Some(device(&snapshot)), &ctx, None);

    assert!(fields[0].required);
    assert_eq!(fields[0].label, "Name");
    assert!(!fields[2].required);
    assert_eq!(fields[2].label, "config");
    let site = fields.iter().find(|f| f.name == "site").unwrap();
    assert!(site.required);
}

#[test]
fn test_options() {
    let snapshot = snapshot();
    let options = options();
    let ctx = FormContext::new(&snapshot, &options);
    let fields = derive_form_structure(Some(device(&snapshot)), &ctx, None);
    let field = |name: &str| fields.iter().find(|f| f.name == name).unwrap();

    assert_eq!(
        field("role").options,
        vec![SelectOption::new("edge", "edge"), SelectOption::new("core", "core")]
    );
    assert_eq!(field("site").options.len(), 2);
    // generic peer: one option per implementing kind, labelled with its name
    assert_eq!(
        field("owner").options,
        vec![
            SelectOption::new("CoreAccount", "Account"),
            SelectOption::new("CoreGroup", "Group"),
        ]
    );
}

#[test]
fn test_initial_values_without_row() {
    let snapshot = snapshot();
    let options = options();
    let ctx = FormContext::new(&snapshot, &options);
    let fields = derive_form_structure(Some(device(&snapshot)), &ctx, None);
    let value = |name: &str| fields.iter().find(|f| f.name == name).unwrap().value.clone();

    assert_eq!(value("name"), FieldValue::Empty);
    assert_eq!(value("site"), FieldValue::Empty);
    assert_eq!(value("tags"), FieldValue::Ids(vec![]));
}

#[test]
fn test_initial_values_from_row() {
    let snapshot = snapshot();
    let options = options();
    let ctx = FormContext::new(&snapshot, &options);
    let row = existing_row(&snapshot);
    let fields = derive_form_structure(Some(device(&snapshot)), &ctx, Some(&row));
    let value = |name: &str| fields.iter().find(|f| f.name == name).unwrap().value.clone();

    assert_eq!(value("name"), FieldValue::Scalar(json!("spine1")));
    assert_eq!(value("config"), FieldValue::Empty);
    assert_eq!(value("site"), FieldValue::Id(row.one("site").unwrap().id().to_string()));
    assert_eq!(
        value("tags"),
        FieldValue::Ids(vec!["t1".to_string(), "t2".to_string()])
    );

    let owner = value("owner");
    assert_eq!(owner.two_step_parts(), Some(("CoreAccount", "a1")));
}

#[test]
fn test_inherited_relationship_ignores_peer_options() {
    let snapshot = snapshot();
    let mut options = options();
    options.insert("DataOwner", vec![SelectOption::new("x", "should not be used")]);
    let ctx = FormContext::new(&snapshot, &options);
    let fields = derive_form_structure(Some(device(&snapshot)), &ctx, None);
    let owner = fields.iter().find(|f| f.name == "owner").unwrap();
    assert_eq!(owner.options.len(), 2);
    assert_eq!(owner.options[0].id, "CoreAccount");
}

#[test]
fn test_generic_peer_options_without_inheritance() {
    let snapshot = snapshot();
    let options = options();
    let ctx = FormContext::new(&snapshot, &options);
    let circuit = snapshot.node("InfraCircuit").unwrap();
    let fields = derive_form_structure(Some(circuit), &ctx, None);

    let provider = fields.iter().find(|f| f.name == "provider").unwrap();
    assert_eq!(provider.control, ControlType::Select);
    assert_eq!(provider.options, vec![SelectOption::new("CoreAccount", "Account")]);
}

#[test]
fn test_concrete_peer_without_options_is_empty() {
    let snapshot = snapshot();
    let options = options();
    let ctx = FormContext::new(&snapshot, &options);
    let circuit = snapshot.node("InfraCircuit").unwrap();
    let fields = derive_form_structure(Some(circuit), &ctx, None);

    let team = fields.iter().find(|f| f.name == "team").unwrap();
    assert_eq!(team.control, ControlType::Select);
    assert!(team.options.is_empty());
    assert_eq!(dropdown_peers(circuit, &snapshot), vec!["CoreGroup".to_string()]);
}

#[test]
fn test_dropdown_peers_skip_generics() {
    let snapshot = snapshot();
    let peers = dropdown_peers(device(&snapshot), &snapshot);
    assert_eq!(peers, vec!["BuiltinLocation".to_string(), "BuiltinTag".to_string()]);
}

#[test]
fn test_metadata_form_for_attribute() {
    let snapshot = snapshot();
    let row = existing_row(&snapshot);
    let fields = derive_metadata_form(Some(&row), MetadataTarget::Attribute("name"), &snapshot);

    let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["source", "owner", "is_visible", "is_protected"]);
    assert_eq!(fields[0].control, ControlType::Select2Step);
    assert_eq!(fields[1].control, ControlType::Select2Step);
    assert_eq!(fields[2].control, ControlType::Checkbox);
    assert_eq!(fields[3].control, ControlType::Checkbox);

    assert_eq!(fields[0].value.two_step_parts(), Some(("CoreRepository", "r1")));
    assert_eq!(fields[1].value, FieldValue::Empty);
    assert!(fields[3].value.as_bool());
    assert_eq!(fields[3].label, "Is Protected");
    assert_eq!(
        fields[0].options.iter().map(|o| o.id.as_str()).collect::<Vec<_>>(),
        vec!["CoreAccount", "CoreRepository"]
    );
}

#[test]
fn test_metadata_form_for_relationship_without_row() {
    let snapshot = snapshot();
    let fields = derive_metadata_form(None, MetadataTarget::Relationship("site"), &snapshot);
    let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "_relation__source",
            "_relation__owner",
            "_relation__is_visible",
            "_relation__is_protected"
        ]
    );
    // visible unless told otherwise
    assert!(fields[2].value.as_bool());
    assert!(!fields[3].value.as_bool());
}

// ============================================================================
// Mutation inputs
// ============================================================================

#[test]
fn test_create_input() {
    let snapshot = snapshot();
    let options = options();
    let ctx = FormContext::new(&snapshot, &options);
    let schema = device(&snapshot);
    let mut values = form_values(&derive_form_structure(Some(schema), &ctx, None));

    values.insert("name".into(), FieldValue::Scalar(json!("leaf1")));
    values.insert("site".into(), FieldValue::Id("s2".into()));
    values.insert(
        "owner".into(),
        FieldValue::TwoStep {
            parent: "CoreGroup".into(),
            child: "g1".into(),
        },
    );

    let input = build_mutation_input(schema, &values, MutationMode::Create, None);
    assert_eq!(
        input,
        json!({
            "name": {"value": "leaf1"},
            "site": {"id": "s2"},
            "tags": [],
            "owner": {"id": "g1"}
        })
    );
}

#[test]
fn test_unchanged_update_only_carries_id() {
    let snapshot = snapshot();
    let options = options();
    let ctx = FormContext::new(&snapshot, &options);
    let schema = device(&snapshot);
    let row = existing_row(&snapshot);
    let values = form_values(&derive_form_structure(Some(schema), &ctx, Some(&row)));

    let input = build_mutation_input(schema, &values, MutationMode::Update, Some(&row));
    assert_eq!(input, json!({"id": "d1"}));
}

#[test]
fn test_update_sends_changed_fields() {
    let snapshot = snapshot();
    let options = options();
    let ctx = FormContext::new(&snapshot, &options);
    let schema = device(&snapshot);
    let row = existing_row(&snapshot);
    let mut values = form_values(&derive_form_structure(Some(schema), &ctx, Some(&row)));

    values.insert("role".into(), FieldValue::Scalar(json!("core")));
    values.insert("site".into(), FieldValue::Empty);
    // same peers, different order: unchanged
    values.insert("tags".into(), FieldValue::Ids(vec!["t2".into(), "t1".into()]));

    let input = build_mutation_input(schema, &values, MutationMode::Update, Some(&row));
    assert_eq!(
        input,
        json!({
            "id": "d1",
            "role": {"value": "core"},
            "site": null
        })
    );
}

#[test]
fn test_metadata_input() {
    let snapshot = snapshot();
    let row = existing_row(&snapshot);
    let target = MetadataTarget::Relationship("site");
    let mut values = form_values(&derive_metadata_form(Some(&row), target, &snapshot));
    values.insert(
        "_relation__owner".into(),
        FieldValue::TwoStep {
            parent: "CoreAccount".into(),
            child: "a9".into(),
        },
    );
    values.insert("_relation__is_protected".into(), FieldValue::Scalar(json!(true)));

    let input = build_metadata_input(target, &values, &row);
    assert_eq!(
        input,
        json!({
            "id": "d1",
            "site": {
                "id": "s1",
                "_relation__source": null,
                "_relation__owner": {"id": "a9"},
                "_relation__is_visible": true,
                "_relation__is_protected": true
            }
        })
    );
}
