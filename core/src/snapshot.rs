//! Indexed, immutable view over one schema document
//!
//! A snapshot is built once per fetch and never mutated. Consumers hold it
//! behind an `Arc` and a reload swaps the whole snapshot.

use std::collections::HashMap;

use crate::error::SchemaError;
use crate::schema::{GenericSchema, Namespace, NodeSchema, SchemaDocument};

#[derive(Clone, Debug, Default)]
pub struct SchemaSnapshot {
    nodes: Vec<NodeSchema>,
    generics: Vec<GenericSchema>,
    namespaces: Vec<Namespace>,
    node_index: HashMap<String, usize>,
    generic_index: HashMap<String, usize>,
    /// kind -> human readable name, for nodes and generics
    kind_names: HashMap<String, String>,
}

impl SchemaSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_document(doc: SchemaDocument) -> Self {
        let node_index = doc
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.kind.clone(), i))
            .collect();
        let generic_index = doc
            .generics
            .iter()
            .enumerate()
            .map(|(i, g)| (g.kind.clone(), i))
            .collect();

        let mut kind_names = HashMap::new();
        for node in &doc.nodes {
            kind_names.insert(node.kind.clone(), node.display_label().to_string());
        }
        for generic in &doc.generics {
            kind_names.insert(generic.kind.clone(), generic.display_label().to_string());
        }

        tracing::debug!(
            nodes = doc.nodes.len(),
            generics = doc.generics.len(),
            "Built schema snapshot"
        );

        Self {
            nodes: doc.nodes,
            generics: doc.generics,
            namespaces: doc.namespaces,
            node_index,
            generic_index,
            kind_names,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        SchemaDocument::from_json(json).map(Self::from_document)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.generics.is_empty()
    }

    pub fn nodes(&self) -> &[NodeSchema] {
        &self.nodes
    }

    pub fn generics(&self) -> &[GenericSchema] {
        &self.generics
    }

    pub fn namespaces(&self) -> &[Namespace] {
        &self.namespaces
    }

    pub fn node(&self, kind: &str) -> Option<&NodeSchema> {
        self.node_index.get(kind).map(|&i| &self.nodes[i])
    }

    /// Like [`Self::node`] but reports a missing kind as an error
    pub fn require_node(&self, kind: &str) -> Result<&NodeSchema, SchemaError> {
        self.node(kind)
            .ok_or_else(|| SchemaError::UnknownKind(kind.to_string()))
    }

    pub fn generic(&self, kind: &str) -> Option<&GenericSchema> {
        self.generic_index.get(kind).map(|&i| &self.generics[i])
    }

    pub fn is_generic(&self, kind: &str) -> bool {
        self.generic_index.contains_key(kind)
    }

    /// Human readable name of a kind; falls back to the kind itself
    pub fn kind_name<'a>(&'a self, kind: &'a str) -> &'a str {
        self.kind_names.get(kind).map(String::as_str).unwrap_or(kind)
    }

    /// Concrete kinds implementing a generic, empty when unknown
    pub fn used_by(&self, generic: &str) -> &[String] {
        self.generic(generic)
            .map(|g| g.used_by.as_slice())
            .unwrap_or(&[])
    }

    /// Node types shown in the navigation menu, grouped under their namespace
    pub fn menu(&self) -> Vec<(String, Vec<&NodeSchema>)> {
        let mut groups: Vec<(String, Vec<&NodeSchema>)> = Vec::new();
        for node in &self.nodes {
            let namespace = node.namespace.clone().unwrap_or_default();
            if let Some(ns) = self.namespaces.iter().find(|ns| ns.name == namespace) {
                if !ns.user_editable {
                    continue;
                }
            }
            match groups.iter_mut().find(|(name, _)| *name == namespace) {
                Some((_, members)) => members.push(node),
                None => groups.push((namespace, vec![node])),
            }
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
        "nodes": [
            {"name": "device", "kind": "InfraDevice", "namespace": "Infra", "label": "Device"},
            {"name": "account", "kind": "CoreAccount", "namespace": "Core", "label": "Account"},
            {"name": "tag", "kind": "BuiltinTag", "namespace": "Builtin"}
        ],
        "generics": [
            {"name": "owner", "kind": "DataOwner", "label": "Owner", "used_by": ["CoreAccount"]}
        ],
        "namespaces": [
            {"name": "Infra"},
            {"name": "Core", "user_editable": false}
        ]
    }"#;

    #[test]
    fn test_lookups() {
        let snapshot = SchemaSnapshot::from_json(DOC).unwrap();
        assert_eq!(snapshot.node("InfraDevice").unwrap().name, "device");
        assert!(snapshot.node("DataOwner").is_none());
        assert!(snapshot.is_generic("DataOwner"));
        assert_eq!(snapshot.used_by("DataOwner"), &["CoreAccount".to_string()]);
        assert!(snapshot.used_by("Unknown").is_empty());
        assert!(matches!(
            snapshot.require_node("Nope"),
            Err(SchemaError::UnknownKind(kind)) if kind == "Nope"
        ));
    }

    #[test]
    fn test_kind_names_fall_back_to_kind() {
        let snapshot = SchemaSnapshot::from_json(DOC).unwrap();
        assert_eq!(snapshot.kind_name("InfraDevice"), "Device");
        assert_eq!(snapshot.kind_name("BuiltinTag"), "tag");
        assert_eq!(snapshot.kind_name("Missing"), "Missing");
    }

    #[test]
    fn test_menu_skips_non_editable_namespaces() {
        let snapshot = SchemaSnapshot::from_json(DOC).unwrap();
        let menu = snapshot.menu();
        let names: Vec<&str> = menu.iter().map(|(ns, _)| ns.as_str()).collect();
        assert_eq!(names, vec!["Infra", "Builtin"]);
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = SchemaSnapshot::empty();
        assert!(snapshot.is_empty());
        assert!(snapshot.menu().is_empty());
    }
}
