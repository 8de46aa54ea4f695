use config::{Config, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub mod validator;
pub mod watcher;

use crate::cli::Cli;

/// Settings file read when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "infraview.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub upstream: UpstreamSettings,
    #[serde(default)]
    pub ui: UiSettings,
    #[serde(default)]
    pub e2e: E2eSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Remote API the UI talks to through the host
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamSettings {
    #[serde(default = "default_graphql_url")]
    pub graphql_url: String,
    #[serde(default = "default_schema_url")]
    pub schema_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_graphql_url() -> String {
    "http://localhost:8000/graphql".to_string()
}

fn default_schema_url() -> String {
    "http://localhost:8000/schema".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            graphql_url: default_graphql_url(),
            schema_url: default_schema_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UiSettings {
    #[serde(default = "default_branch")]
    pub default_branch: String,
    /// Rows per page of object lists
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_branch() -> String {
    infraview_core::branch::DEFAULT_BRANCH.to_string()
}

fn default_page_size() -> usize {
    10
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            default_branch: default_branch(),
            page_size: default_page_size(),
        }
    }
}

/// Browser test helpers
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct E2eSettings {
    /// WebDriver server (chromedriver, geckodriver, selenium)
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,
    /// Where the UI under test is served
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_screenshot_dir")]
    pub screenshot_dir: PathBuf,
    /// How long to wait for one GraphQL response
    #[serde(default = "default_response_timeout")]
    pub response_timeout_ms: u64,
    #[serde(default = "default_headless")]
    pub headless: bool,
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_screenshot_dir() -> PathBuf {
    PathBuf::from("docs/media")
}

fn default_response_timeout() -> u64 {
    10_000
}

fn default_headless() -> bool {
    true
}

impl Default for E2eSettings {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            base_url: default_base_url(),
            screenshot_dir: default_screenshot_dir(),
            response_timeout_ms: default_response_timeout(),
            headless: default_headless(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
            upstream: UpstreamSettings::default(),
            ui: UiSettings::default(),
            e2e: E2eSettings::default(),
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, anyhow::Error> {
        Self::from_file(DEFAULT_CONFIG_FILE)
    }

    /// Create settings from CLI arguments (includes config file and CLI overrides)
    pub fn new_with_cli(cli: &Cli) -> Result<Self, anyhow::Error> {
        let mut settings = Self::load(&cli.config)?;

        // CLI > env vars > config file
        settings.apply_cli_overrides(cli);

        settings.validate()?;
        Ok(settings)
    }

    /// Load a settings file; a missing file yields the defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        let settings = Self::load(path.as_ref())?;
        settings.validate()?;
        Ok(settings)
    }

    fn load(path: &Path) -> Result<Self, anyhow::Error> {
        let s = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .build()?;

        let settings: Settings = s.try_deserialize()?;
        tracing::debug!(path = %path.display(), "Loaded settings");
        Ok(settings)
    }

    fn validate(&self) -> Result<(), anyhow::Error> {
        validator::ConfigValidator::validate(self).map_err(|errors| {
            let error_messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            anyhow::anyhow!(
                "Configuration validation failed:\n{}",
                error_messages.join("\n")
            )
        })
    }

    /// Apply CLI argument overrides to settings
    fn apply_cli_overrides(&mut self, cli: &Cli) {
        if let Some(host) = &cli.host {
            self.server.host = host.clone();
        }
        if let Some(port) = cli.port {
            self.server.port = port;
        }
        if let Some(url) = &cli.graphql_url {
            self.upstream.graphql_url = url.clone();
        }
        if let Some(url) = &cli.schema_url {
            self.upstream.schema_url = url.clone();
        }
        if let Some(branch) = &cli.branch {
            self.ui.default_branch = branch.clone();
        }
    }

    /// Effective settings rendered as TOML
    pub fn to_toml(&self) -> Result<String, anyhow::Error> {
        Ok(toml::to_string_pretty(self)?)
    }
}
