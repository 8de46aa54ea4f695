//! Browser automation helpers for end-to-end tests
//!
//! Tests drive the UI through the [`BrowserPage`] trait. [`WebDriverPage`]
//! implements it against any W3C WebDriver server; tests that only check the
//! helpers' sequencing use a scripted page instead.

pub mod branch;
pub mod screenshots;
pub mod webdriver;

pub use branch::{create_branch, delete_branch};
pub use screenshots::DocsScreenshots;
pub use webdriver::WebDriverPage;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BrowserError {
    /// The WebDriver server rejected a command
    #[error("WebDriver error '{error}': {message}")]
    WebDriver { error: String, message: String },

    /// The WebDriver server could not be reached
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A reply did not have the documented shape
    #[error("Unexpected WebDriver reply: {0}")]
    Protocol(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Timed out waiting for {0}")]
    Timeout(String),

    /// A post-condition of a test helper did not hold
    #[error("Assertion failed: {0}")]
    Assertion(String),

    #[error("Invalid screenshot data: {0}")]
    Screenshot(#[from] base64::DecodeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// How to find an element
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Locator {
    Css(String),
    /// Button or link whose visible text is exactly this
    Text(String),
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// `(strategy, value)` as WebDriver's find-element command expects
    pub fn strategy(&self) -> (&'static str, String) {
        match self {
            Self::Css(selector) => ("css selector", selector.clone()),
            Self::Text(text) => (
                "xpath",
                format!(
                    "//*[self::button or self::a][normalize-space(.)={}]",
                    xpath_literal(text)
                ),
            ),
        }
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Css(selector) => write!(f, "css `{selector}`"),
            Self::Text(text) => write!(f, "text `{text}`"),
        }
    }
}

fn xpath_literal(text: &str) -> String {
    if !text.contains('\'') {
        format!("'{text}'")
    } else if !text.contains('"') {
        format!("\"{text}\"")
    } else {
        let parts: Vec<String> = text.split('\'').map(|p| format!("'{p}'")).collect();
        format!("concat({})", parts.join(", \"'\", "))
    }
}

/// A network response observed by the page
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseInfo {
    pub url: String,
    pub status: u16,
    #[serde(rename = "operationName", default)]
    pub operation_name: Option<String>,
}

impl ResponseInfo {
    /// True for responses of the GraphQL endpoint, whatever the query string
    pub fn is_graphql(&self) -> bool {
        self.url
            .split('?')
            .next()
            .map(|path| path.ends_with("/graphql"))
            .unwrap_or(false)
    }

    pub fn is_operation(&self, name: &str) -> bool {
        self.operation_name.as_deref() == Some(name)
    }
}

/// The subset of browser control the test helpers need
#[async_trait]
pub trait BrowserPage: Send + Sync {
    /// Navigate to a path relative to the UI base URL
    async fn goto(&self, path: &str) -> Result<(), BrowserError>;

    async fn click(&self, locator: &Locator) -> Result<(), BrowserError>;

    /// Replace the value of an input
    async fn fill(&self, locator: &Locator, text: &str) -> Result<(), BrowserError>;

    async fn current_url(&self) -> Result<String, BrowserError>;

    /// PNG of the viewport
    async fn screenshot(&self) -> Result<Vec<u8>, BrowserError>;

    /// Every response recorded since the last navigation, oldest first
    async fn responses(&self) -> Result<Vec<ResponseInfo>, BrowserError>;
}

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Wait for a response matching `predicate` among those recorded after the
/// first `since` responses
pub async fn wait_for_response<P, F>(
    page: &P,
    since: usize,
    what: &str,
    timeout: Duration,
    predicate: F,
) -> Result<ResponseInfo, BrowserError>
where
    P: BrowserPage + ?Sized,
    F: Fn(&ResponseInfo) -> bool,
{
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        let responses = page.responses().await?;
        if let Some(found) = responses.iter().skip(since).find(|r| predicate(r)) {
            tracing::debug!(url = %found.url, status = found.status, "Observed {}", what);
            return Ok(found.clone());
        }
        if tokio::time::Instant::now() >= deadline {
            return Err(BrowserError::Timeout(what.to_string()));
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}
