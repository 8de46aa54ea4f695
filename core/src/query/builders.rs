//! Query and mutation document builders
//!
//! Every builder is a pure function of the schema it is given. Callers that may
//! not have a schema yet use [`query_or_fallback`] so the GraphQL client always
//! receives a syntactically valid document.

use super::{ArgValue, Document, Field};
use crate::schema::{Cardinality, NodeSchema};

/// Placeholder document sent while the governing schema is not loaded
pub const FALLBACK_QUERY: &str = "query { ok }";

/// Page window of a list query
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    pub offset: usize,
    pub limit: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 10,
        }
    }
}

impl Pagination {
    pub fn new(offset: usize, limit: usize) -> Self {
        Self { offset, limit }
    }

    /// Window of the given zero-based page
    pub fn page(page: usize, limit: usize) -> Self {
        Self {
            offset: page * limit,
            limit,
        }
    }
}

/// Render `build(schema)` or [`FALLBACK_QUERY`] when there is no schema
pub fn query_or_fallback<F>(schema: Option<&NodeSchema>, build: F) -> String
where
    F: FnOnce(&NodeSchema) -> Document,
{
    match schema {
        Some(schema) => build(schema).to_string(),
        None => FALLBACK_QUERY.to_string(),
    }
}

fn node_ref() -> Field {
    Field::new("node").leaves(["id", "display_label", "__typename"])
}

fn node_ref_named(name: &str) -> Field {
    Field::new(name).leaves(["id", "display_label", "__typename"])
}

fn property_fields(field: Field) -> Field {
    field
        .leaves(["updated_at", "is_protected", "is_visible"])
        .child(node_ref_named("source"))
        .child(node_ref_named("owner"))
}

// ============================================================================
// Objects
// ============================================================================

/// Paginated list of objects of one kind with the requested columns.
///
/// Columns naming neither an attribute nor a relationship of `schema` are
/// skipped. Filters are passed through as extra arguments of the root field.
pub fn object_list_query(
    schema: &NodeSchema,
    columns: &[String],
    pagination: Pagination,
    filters: &[(String, ArgValue)],
) -> Document {
    let mut node = Field::new("node").leaves(["id", "display_label"]);
    for column in columns {
        if let Some(attr) = schema.attribute(column) {
            node = node.child(Field::new(&attr.name).leaves(["value"]));
        } else if let Some(rel) = schema.relationship(column) {
            let target = match rel.cardinality {
                Cardinality::One => Field::new(&rel.name).child(node_ref()),
                Cardinality::Many => Field::new(&rel.name).child(Field::edges(node_ref())),
            };
            node = node.child(target);
        } else {
            tracing::warn!(kind = %schema.kind, column = %column, "Unknown list column");
        }
    }

    let mut root = Field::new(&schema.kind)
        .arg("offset", ArgValue::Int(pagination.offset as i64))
        .arg("limit", ArgValue::Int(pagination.limit as i64));
    for (name, value) in filters {
        root = root.arg(name.clone(), value.clone());
    }

    Document::query().field(root.leaves(["count"]).child(Field::edges(node)))
}

/// Every attribute with its metadata and every relationship of one object
pub fn object_details_query(schema: &NodeSchema, id: &str) -> Document {
    let mut node = Field::new("node").leaves(["id", "display_label", "__typename"]);

    for attr in &schema.attributes {
        node = node.child(property_fields(Field::new(&attr.name).leaves(["value"])));
    }
    for rel in &schema.relationships {
        let field = match rel.cardinality {
            Cardinality::One => Field::new(&rel.name)
                .child(node_ref())
                .child(property_fields(Field::new("properties"))),
            Cardinality::Many => Field::new(&rel.name)
                .leaves(["count"])
                .child(Field::edges(node_ref())),
        };
        node = node.child(field);
    }

    Document::query().field(
        Field::new(&schema.kind)
            .arg("ids", ArgValue::List(vec![ArgValue::str(id)]))
            .child(Field::edges(node)),
    )
}

/// Peers behind one many relationship of an object, shown in a details tab.
///
/// When the peer schema is known its attribute values are requested as well.
pub fn relationship_tab_query(
    schema: &NodeSchema,
    id: &str,
    relationship: &str,
    peer: Option<&NodeSchema>,
) -> Document {
    let mut peer_node = node_ref();
    if let Some(peer) = peer {
        for attr in &peer.attributes {
            peer_node = peer_node.child(Field::new(&attr.name).leaves(["value"]));
        }
    }

    Document::query().field(
        Field::new(&schema.kind)
            .arg("ids", ArgValue::List(vec![ArgValue::str(id)]))
            .child(Field::edges(
                Field::new("node").leaves(["id"]).child(
                    Field::new(relationship)
                        .leaves(["count"])
                        .child(Field::edges(peer_node)),
                ),
            )),
    )
}

/// `id display_label` of every object of each peer kind
pub fn dropdown_options_query(peers: &[String]) -> Document {
    peers.iter().fold(
        Document::query().named("DropdownOptions"),
        |doc, peer| {
            doc.field(
                Field::new(peer)
                    .child(Field::edges(Field::new("node").leaves(["id", "display_label"]))),
            )
        },
    )
}

// ============================================================================
// Permissions
// ============================================================================

/// Kind holding object permissions
pub const OBJECT_PERMISSION_KIND: &str = "CoreObjectPermission";
/// Kind holding global permissions
pub const GLOBAL_PERMISSION_KIND: &str = "CoreGlobalPermission";

fn permission_listing(kind: &str, attributes: &[&str]) -> Document {
    let mut node = Field::new("node").leaves(["id", "display_label"]);
    for attr in attributes {
        node = node.child(Field::new(*attr).leaves(["value"]));
    }
    node = node.child(
        Field::new("roles")
            .leaves(["count"])
            .child(Field::edges(Field::new("node").leaves(["id", "display_label"]))),
    );

    Document::query()
        .named(kind)
        .field(Field::new(kind).leaves(["count"]).child(Field::edges(node)))
}

pub fn object_permissions_query() -> Document {
    permission_listing(
        OBJECT_PERMISSION_KIND,
        &["name", "branch", "namespace", "action", "decision", "identifier"],
    )
}

pub fn global_permissions_query() -> Document {
    permission_listing(
        GLOBAL_PERMISSION_KIND,
        &["name", "action", "decision", "identifier"],
    )
}

/// What the current account may do with objects of `kind`
pub fn kind_permissions_query(kind: &str) -> Document {
    Document::query().field(
        Field::new(kind).child(
            Field::new("permissions").leaves(["count"]).child(Field::edges(
                Field::new("node").leaves(["kind", "view", "create", "update", "delete"]),
            )),
        ),
    )
}

// ============================================================================
// Branches
// ============================================================================

const BRANCH_FIELDS: [&str; 9] = [
    "id",
    "name",
    "description",
    "origin_branch",
    "branched_from",
    "created_at",
    "sync_with_git",
    "is_default",
    "has_schema_changes",
];

pub fn branches_query() -> Document {
    Document::query()
        .named("GetBranches")
        .field(Field::new("Branch").leaves(BRANCH_FIELDS))
}

/// `BranchCreate`; variables `name`, `description`, `sync_with_git`
pub fn branch_create_mutation() -> Document {
    Document::mutation()
        .named("BranchCreate")
        .variable("name", "String!")
        .variable("description", "String")
        .variable("sync_with_git", "Boolean")
        .field(
            Field::new("BranchCreate")
                .arg(
                    "data",
                    ArgValue::Object(vec![
                        ("name".into(), ArgValue::var("name")),
                        ("description".into(), ArgValue::var("description")),
                        ("sync_with_git".into(), ArgValue::var("sync_with_git")),
                    ]),
                )
                .leaves(["ok"])
                .child(Field::new("object").leaves(BRANCH_FIELDS)),
        )
}

/// `BranchDelete`; variable `name`
pub fn branch_delete_mutation() -> Document {
    Document::mutation()
        .named("BranchDelete")
        .variable("name", "String!")
        .field(
            Field::new("BranchDelete")
                .arg(
                    "data",
                    ArgValue::Object(vec![("name".into(), ArgValue::var("name"))]),
                )
                .leaves(["ok"]),
        )
}

// ============================================================================
// Object mutations
// ============================================================================

fn object_mutation(kind: &str, action: &str, input: &str) -> Document {
    let operation = format!("{kind}{action}");
    Document::mutation()
        .named(&operation)
        .variable("data", format!("{input}!"))
        .field(
            Field::new(&operation)
                .arg("data", ArgValue::var("data"))
                .leaves(["ok"])
                .child(Field::new("object").leaves(["id", "display_label"])),
        )
}

/// `<Kind>Create(data: $data)`; pair with a create input
pub fn create_mutation(kind: &str) -> Document {
    object_mutation(kind, "Create", &format!("{kind}CreateInput"))
}

/// `<Kind>Update(data: $data)`; the input carries the object id
pub fn update_mutation(kind: &str) -> Document {
    object_mutation(kind, "Update", &format!("{kind}UpdateInput"))
}

/// `<Kind>Delete(data: $data)` with `data = { id }`
pub fn delete_mutation(kind: &str) -> Document {
    let operation = format!("{kind}Delete");
    Document::mutation()
        .named(&operation)
        .variable("data", "DeleteInput!")
        .field(
            Field::new(&operation)
                .arg("data", ArgValue::var("data"))
                .leaves(["ok"]),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn device() -> NodeSchema {
        serde_json::from_value(json!({
            "name": "device",
            "kind": "InfraDevice",
            "attributes": [
                {"name": "name", "kind": "Text"},
                {"name": "role", "kind": "Text"}
            ],
            "relationships": [
                {"name": "site", "peer": "BuiltinLocation", "kind": "Attribute", "cardinality": "one"},
                {"name": "interfaces", "peer": "InfraInterface", "kind": "Component", "cardinality": "many"}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_object_list_query() {
        let columns = vec!["name".to_string(), "site".to_string(), "bogus".to_string()];
        let filters = vec![("role__value".to_string(), ArgValue::str("edge"))];
        let query = object_list_query(&device(), &columns, Pagination::page(2, 10), &filters)
            .to_string();

        let expected = "\
query {
  InfraDevice(offset: 20, limit: 10, role__value: \"edge\") {
    count
    edges {
      node {
        id
        display_label
        name {
          value
        }
        site {
          node {
            id
            display_label
            __typename
          }
        }
      }
    }
  }
}
";
        assert_eq!(query, expected);
    }

    #[test]
    fn test_object_details_query() {
        let query = object_details_query(&device(), "d1").to_string();
        assert!(query.contains("InfraDevice(ids: [\"d1\"]) {"));
        assert!(query.contains("      name {\n          value\n          updated_at\n"));
        assert!(query.contains("properties {"));
        assert!(query.contains("interfaces {\n          count\n          edges {"));
    }

    #[test]
    fn test_relationship_tab_query() {
        let query = relationship_tab_query(&device(), "d1", "interfaces", None).to_string();
        assert!(query.contains("interfaces {"));
        assert!(query.contains("count"));
        assert!(!query.contains("value"));
    }

    #[test]
    fn test_dropdown_options_query() {
        let peers = vec!["BuiltinTag".to_string(), "BuiltinLocation".to_string()];
        let query = dropdown_options_query(&peers).to_string();
        assert!(query.starts_with("query DropdownOptions {\n  BuiltinTag {\n"));
        assert!(query.contains("  BuiltinLocation {\n    edges {\n      node {\n        id\n        display_label\n"));
    }

    #[test]
    fn test_permission_queries() {
        let object = object_permissions_query().to_string();
        for field in ["branch", "namespace", "decision", "identifier", "roles"] {
            assert!(object.contains(field), "missing {field}");
        }
        let global = global_permissions_query().to_string();
        assert!(global.contains("CoreGlobalPermission {"));
        assert!(!global.contains("namespace"));

        let kind = kind_permissions_query("InfraDevice").to_string();
        assert!(kind.contains("permissions {"));
        assert!(kind.contains("view\n"));
    }

    #[test]
    fn test_branch_mutations() {
        let create = branch_create_mutation().to_string();
        assert!(create.starts_with(
            "mutation BranchCreate($name: String!, $description: String, $sync_with_git: Boolean) {"
        ));
        let delete = branch_delete_mutation().to_string();
        assert!(delete.contains("BranchDelete(data: {name: $name}) {\n    ok\n  }"));
    }

    #[test]
    fn test_object_mutations() {
        let create = create_mutation("InfraDevice");
        assert_eq!(create.name.as_deref(), Some("InfraDeviceCreate"));
        assert!(create
            .to_string()
            .starts_with("mutation InfraDeviceCreate($data: InfraDeviceCreateInput!) {"));
        assert!(update_mutation("InfraDevice")
            .to_string()
            .contains("InfraDeviceUpdate(data: $data)"));
        assert!(delete_mutation("InfraDevice")
            .to_string()
            .contains("$data: DeleteInput!"));
    }

    #[test]
    fn test_fallback_without_schema() {
        assert_eq!(query_or_fallback(None, |s| object_details_query(s, "x")), FALLBACK_QUERY);
        let schema = device();
        assert!(query_or_fallback(Some(&schema), |s| object_details_query(s, "x"))
            .contains("InfraDevice"));
    }
}
