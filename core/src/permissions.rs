//! Role-based permission listings

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SchemaError;
use crate::row::NodeRef;

/// Outcome stored on a permission; values match the server's integer encoding
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionDecision {
    Deny,
    AllowDefault,
    AllowOther,
    AllowAll,
}

impl PermissionDecision {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Deny),
            2 => Some(Self::AllowDefault),
            4 => Some(Self::AllowOther),
            6 => Some(Self::AllowAll),
            _ => None,
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            Self::Deny => 1,
            Self::AllowDefault => 2,
            Self::AllowOther => 4,
            Self::AllowAll => 6,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Deny => "Deny",
            Self::AllowDefault => "Allow default branch",
            Self::AllowOther => "Allow other branches",
            Self::AllowAll => "Allow all",
        }
    }

    pub fn is_allowed(&self) -> bool {
        !matches!(self, Self::Deny)
    }
}

/// One row of an object or global permission listing
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PermissionRow {
    pub id: String,
    pub display_label: String,
    pub name: Option<String>,
    /// Object permissions only
    pub branch: Option<String>,
    /// Object permissions only
    pub namespace: Option<String>,
    pub action: Option<String>,
    pub decision: Option<PermissionDecision>,
    pub identifier: Option<String>,
    pub roles: Vec<NodeRef>,
}

fn attribute_value(node: &Value, name: &str) -> Option<Value> {
    node.get(name)
        .and_then(|attr| attr.get("value"))
        .filter(|v| !v.is_null())
        .cloned()
}

fn attribute_text(node: &Value, name: &str) -> Option<String> {
    attribute_value(node, name).map(|v| match v {
        Value::String(s) => s,
        other => other.to_string(),
    })
}

impl PermissionRow {
    pub fn from_node(node: &Value) -> Result<Self, SchemaError> {
        let id = node
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| SchemaError::missing("id", "permission"))?
            .to_string();
        let roles = node
            .get("roles")
            .and_then(|r| r.get("edges"))
            .and_then(Value::as_array)
            .map(|edges| {
                edges
                    .iter()
                    .filter_map(|e| serde_json::from_value(e.get("node")?.clone()).ok())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            display_label: node
                .get("display_label")
                .and_then(Value::as_str)
                .unwrap_or(&id)
                .to_string(),
            id,
            name: attribute_text(node, "name"),
            branch: attribute_text(node, "branch"),
            namespace: attribute_text(node, "namespace"),
            action: attribute_text(node, "action"),
            decision: attribute_value(node, "decision")
                .and_then(|v| v.as_i64())
                .and_then(PermissionDecision::from_code),
            identifier: attribute_text(node, "identifier"),
            roles,
        })
    }

    /// Parse `data[<kind>] = { edges: [{ node }] }`
    pub fn listing(kind: &str, data: &Value) -> Result<Vec<Self>, SchemaError> {
        let edges = data
            .get(kind)
            .and_then(|envelope| envelope.get("edges"))
            .and_then(Value::as_array)
            .ok_or_else(|| SchemaError::shape(kind, "edges list"))?;
        edges
            .iter()
            .map(|edge| {
                let node = edge
                    .get("node")
                    .ok_or_else(|| SchemaError::missing("node", "edge"))?;
                Self::from_node(node)
            })
            .collect()
    }
}

/// Which operations the current account may perform on one kind
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindPermissions {
    pub view: bool,
    pub create: bool,
    pub update: bool,
    pub delete: bool,
}

impl KindPermissions {
    pub const ALL: Self = Self {
        view: true,
        create: true,
        update: true,
        delete: true,
    };

    /// Parse the response of [`crate::query::kind_permissions_query`].
    ///
    /// Values are `"ALLOW"`/`"DENY"` strings. A kind with no permission
    /// entries is fully allowed.
    pub fn from_response(kind: &str, data: &Value) -> Result<Self, SchemaError> {
        let edges = data
            .get(kind)
            .and_then(|k| k.get("permissions"))
            .and_then(|p| p.get("edges"))
            .and_then(Value::as_array)
            .ok_or_else(|| SchemaError::shape(kind, "permissions edges"))?;
        let Some(node) = edges.iter().find_map(|e| e.get("node")) else {
            return Ok(Self::ALL);
        };
        let allowed = |op: &str| {
            node.get(op)
                .and_then(Value::as_str)
                .map(|v| v.eq_ignore_ascii_case("allow"))
                .unwrap_or(false)
        };
        Ok(Self {
            view: allowed("view"),
            create: allowed("create"),
            update: allowed("update"),
            delete: allowed("delete"),
        })
    }
}
