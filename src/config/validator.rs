use thiserror::Error;

use crate::config::{E2eSettings, ServerSettings, Settings, UiSettings, UpstreamSettings};

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

impl ValidationError {
    fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

pub struct ConfigValidator;

impl ConfigValidator {
    /// Check every section, collecting all errors rather than stopping at the first
    pub fn validate(settings: &Settings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        Self::validate_server(&settings.server, &mut errors);
        Self::validate_upstream(&settings.upstream, &mut errors);
        Self::validate_ui(&settings.ui, &mut errors);
        Self::validate_e2e(&settings.e2e, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_server(server: &ServerSettings, errors: &mut Vec<ValidationError>) {
        if server.host.is_empty() {
            errors.push(ValidationError::MissingField("server.host".to_string()));
        }
        // Port 0 asks the OS for a free port, which tests rely on
    }

    fn validate_upstream(upstream: &UpstreamSettings, errors: &mut Vec<ValidationError>) {
        Self::validate_url("upstream.graphql_url", &upstream.graphql_url, errors);
        Self::validate_url("upstream.schema_url", &upstream.schema_url, errors);
        if upstream.timeout_seconds == 0 {
            errors.push(ValidationError::invalid(
                "upstream.timeout_seconds",
                "Timeout must be greater than 0",
            ));
        }
    }

    fn validate_ui(ui: &UiSettings, errors: &mut Vec<ValidationError>) {
        if ui.default_branch.trim().is_empty() {
            errors.push(ValidationError::MissingField("ui.default_branch".to_string()));
        }
        if ui.page_size == 0 {
            errors.push(ValidationError::invalid(
                "ui.page_size",
                "Page size must be greater than 0",
            ));
        }
    }

    fn validate_e2e(e2e: &E2eSettings, errors: &mut Vec<ValidationError>) {
        Self::validate_url("e2e.webdriver_url", &e2e.webdriver_url, errors);
        Self::validate_url("e2e.base_url", &e2e.base_url, errors);
    }

    fn validate_url(field: &str, url: &str, errors: &mut Vec<ValidationError>) {
        if url.is_empty() {
            errors.push(ValidationError::MissingField(field.to_string()));
        } else if !(url.starts_with("http://") || url.starts_with("https://")) {
            errors.push(ValidationError::invalid(
                field,
                format!("'{url}' is not an http(s) URL"),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(ConfigValidator::validate(&Settings::default()).is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let mut settings = Settings::default();
        settings.server.host.clear();
        settings.upstream.graphql_url = "localhost:8000/graphql".to_string();
        settings.ui.page_size = 0;

        let errors = ConfigValidator::validate(&settings).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors
            .iter()
            .any(|e| e.to_string().contains("upstream.graphql_url")));
    }
}
