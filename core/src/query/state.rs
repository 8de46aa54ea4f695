//! Request/response envelopes and the state a query hook exposes

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Document;

/// Lifecycle of one issued query
#[derive(Clone, Debug, PartialEq)]
pub enum QueryState<T> {
    Loading,
    Error(String),
    Data(T),
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self::Loading
    }
}

impl<T> QueryState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Data(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> QueryState<U> {
        match self {
            Self::Loading => QueryState::Loading,
            Self::Error(message) => QueryState::Error(message),
            Self::Data(data) => QueryState::Data(f(data)),
        }
    }
}

impl<T, E: std::fmt::Display> From<Result<T, E>> for QueryState<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => Self::Data(data),
            Err(err) => Self::Error(err.to_string()),
        }
    }
}

/// Body of a GraphQL POST
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphqlRequest {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<Value>,
    #[serde(default, rename = "operationName", skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
}

impl GraphqlRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            variables: None,
            operation_name: None,
        }
    }

    pub fn with_variables(mut self, variables: Value) -> Self {
        self.variables = Some(variables);
        self
    }
}

impl From<&Document> for GraphqlRequest {
    fn from(doc: &Document) -> Self {
        Self {
            query: doc.to_string(),
            variables: None,
            operation_name: doc.name.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphqlError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<Value>>,
}

/// `{ data, errors }` as returned by the endpoint
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphqlResponse<T = Value> {
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphqlError>,
}

impl<T> GraphqlResponse<T> {
    /// Data when the response carries no errors; otherwise the joined error
    /// messages
    pub fn into_result(self) -> Result<T, String> {
        if !self.errors.is_empty() {
            return Err(self
                .errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; "));
        }
        self.data
            .ok_or_else(|| "GraphQL response carried no data".to_string())
    }
}
