//! Columns of list views and tabs of detail views

use serde::{Deserialize, Serialize};

use crate::schema::{Cardinality, NodeSchema, RelationshipKind};

/// Query parameter selecting the active detail tab
pub const TAB_QUERY_PARAM: &str = "tab";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Attribute,
    Relationship,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub label: String,
    pub kind: ColumnKind,
}

/// Attributes followed by single relationships of kind `Attribute`
pub fn list_columns(schema: &NodeSchema) -> Vec<Column> {
    let attributes = schema.attributes.iter().map(|attr| Column {
        name: attr.name.clone(),
        label: attr.display_label().to_string(),
        kind: ColumnKind::Attribute,
    });
    let relationships = schema
        .relationships
        .iter()
        .filter(|r| r.kind == RelationshipKind::Attribute && r.cardinality == Cardinality::One)
        .map(|rel| Column {
            name: rel.name.clone(),
            label: rel.display_label().to_string(),
            kind: ColumnKind::Relationship,
        });
    attributes.chain(relationships).collect()
}

/// Names of [`list_columns`], as the list query expects them
pub fn column_names(columns: &[Column]) -> Vec<String> {
    columns.iter().map(|c| c.name.clone()).collect()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailTab {
    /// Value of the `tab` query parameter; `None` for the details tab
    pub name: Option<String>,
    pub label: String,
    /// Peer kind listed in the tab
    pub peer: Option<String>,
}

/// A "Details" tab, then one tab per many relationship shown outside the form
pub fn detail_tabs(schema: &NodeSchema) -> Vec<DetailTab> {
    let details = DetailTab {
        name: None,
        label: "Details".to_string(),
        peer: None,
    };
    std::iter::once(details)
        .chain(
            schema
                .relationships
                .iter()
                .filter(|r| r.cardinality == Cardinality::Many && r.kind != RelationshipKind::Attribute)
                .map(|rel| DetailTab {
                    name: Some(rel.name.clone()),
                    label: rel.display_label().to_string(),
                    peer: Some(rel.peer.clone()),
                }),
        )
        .collect()
}

/// Tab selected by the `tab` query parameter; unknown names select the
/// details tab
pub fn selected_tab<'a>(tabs: &'a [DetailTab], param: Option<&str>) -> Option<&'a DetailTab> {
    let wanted = param.filter(|p| !p.is_empty());
    tabs.iter()
        .find(|t| t.name.as_deref() == wanted)
        .or_else(|| tabs.first())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn device() -> NodeSchema {
        serde_json::from_value(json!({
            "name": "device",
            "kind": "InfraDevice",
            "attributes": [{"name": "name", "kind": "Text", "label": "Name"}],
            "relationships": [
                {"name": "site", "peer": "BuiltinLocation", "kind": "Attribute", "cardinality": "one"},
                {"name": "tags", "peer": "BuiltinTag", "kind": "Attribute", "cardinality": "many"},
                {"name": "interfaces", "peer": "InfraInterface", "kind": "Component", "cardinality": "many", "label": "Interfaces"},
                {"name": "primary", "peer": "InfraInterface", "kind": "Generic", "cardinality": "one"}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_list_columns() {
        let columns = list_columns(&device());
        assert_eq!(column_names(&columns), vec!["name", "site"]);
        assert_eq!(columns[0].label, "Name");
        assert_eq!(columns[1].kind, ColumnKind::Relationship);
    }

    #[test]
    fn test_detail_tabs() {
        let tabs = detail_tabs(&device());
        assert_eq!(tabs.len(), 2);
        assert_eq!(tabs[0].label, "Details");
        assert_eq!(tabs[1].name.as_deref(), Some("interfaces"));
        assert_eq!(tabs[1].peer.as_deref(), Some("InfraInterface"));
    }

    #[test]
    fn test_selected_tab() {
        let tabs = detail_tabs(&device());
        assert_eq!(selected_tab(&tabs, Some("interfaces")).unwrap().label, "Interfaces");
        assert_eq!(selected_tab(&tabs, None).unwrap().label, "Details");
        assert_eq!(selected_tab(&tabs, Some("nope")).unwrap().label, "Details");
        assert!(selected_tab(&[], None).is_none());
    }
}
