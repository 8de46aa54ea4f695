//! Error types for schema and payload decoding

use thiserror::Error;

/// Errors raised while decoding schema documents or object payloads
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The schema document could not be parsed
    #[error("Invalid schema document: {0}")]
    InvalidDocument(#[from] serde_json::Error),

    /// A payload lacked a field every object carries
    #[error("Missing field '{field}' in {context}")]
    MissingField { field: String, context: String },

    /// A payload field had an unexpected shape
    #[error("Unexpected shape for '{field}': expected {expected}")]
    UnexpectedShape { field: String, expected: String },

    /// The requested kind is not part of the loaded schema
    #[error("Unknown kind: {0}")]
    UnknownKind(String),
}

impl SchemaError {
    pub fn missing(field: &str, context: &str) -> Self {
        Self::MissingField {
            field: field.to_string(),
            context: context.to_string(),
        }
    }

    pub fn shape(field: &str, expected: &str) -> Self {
        Self::UnexpectedShape {
            field: field.to_string(),
            expected: expected.to_string(),
        }
    }
}
