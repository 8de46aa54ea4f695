//! Candidate values for relationship inputs

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SchemaError;

/// One selectable entry of a select-like input
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub id: String,
    pub name: String,
}

impl SelectOption {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Peer kind -> selectable objects of that kind
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DropdownOptions {
    by_peer: HashMap<String, Vec<SelectOption>>,
}

impl DropdownOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, peer: impl Into<String>, options: Vec<SelectOption>) {
        self.by_peer.insert(peer.into(), options);
    }

    pub fn get(&self, peer: &str) -> Option<&[SelectOption]> {
        self.by_peer.get(peer).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.by_peer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_peer.is_empty()
    }

    /// Parse the response of [`crate::query::dropdown_options_query`]:
    /// `data[<peer>] = { edges: [{ node: { id, display_label } }] }`
    pub fn from_response(peers: &[String], data: &Value) -> Result<Self, SchemaError> {
        let mut options = Self::new();
        for peer in peers {
            let Some(envelope) = data.get(peer) else {
                continue;
            };
            let edges = envelope
                .get("edges")
                .and_then(Value::as_array)
                .ok_or_else(|| SchemaError::shape(peer, "edges list"))?;
            let entries = edges
                .iter()
                .filter_map(|edge| {
                    let node = edge.get("node")?;
                    let id = node.get("id")?.as_str()?;
                    let name = node
                        .get("display_label")
                        .and_then(Value::as_str)
                        .unwrap_or(id);
                    Some(SelectOption::new(id, name))
                })
                .collect();
            options.insert(peer.clone(), entries);
        }
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_response() {
        let data = json!({
            "BuiltinTag": {"edges": [
                {"node": {"id": "t1", "display_label": "blue"}},
                {"node": {"id": "t2"}}
            ]},
        });
        let peers = vec!["BuiltinTag".to_string(), "BuiltinLocation".to_string()];
        let options = DropdownOptions::from_response(&peers, &data).unwrap();

        assert_eq!(options.len(), 1);
        assert_eq!(
            options.get("BuiltinTag").unwrap(),
            &[SelectOption::new("t1", "blue"), SelectOption::new("t2", "t2")]
        );
        assert!(options.get("BuiltinLocation").is_none());
    }

    #[test]
    fn test_from_response_rejects_bad_envelope() {
        let data = json!({"BuiltinTag": {"edges": 3}});
        let peers = vec!["BuiltinTag".to_string()];
        assert!(DropdownOptions::from_response(&peers, &data).is_err());
    }
}
