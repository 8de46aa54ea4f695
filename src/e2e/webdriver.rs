use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Method;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info};

use super::{BrowserError, BrowserPage, Locator, ResponseInfo};
use crate::config::E2eSettings;

/// Key under which WebDriver returns element references
const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// Wraps `window.fetch` so the test can see which GraphQL operations the page
/// issued and how they were answered
const RECORDER_SCRIPT: &str = r#"
if (!window.__infraviewResponses) {
    window.__infraviewResponses = [];
    const originalFetch = window.fetch;
    window.fetch = async function (input, init) {
        const response = await originalFetch(input, init);
        let operationName = null;
        try {
            const body = init && typeof init.body === "string" ? JSON.parse(init.body) : null;
            operationName = (body && body.operationName) || null;
        } catch (e) {}
        window.__infraviewResponses.push({
            url: response.url,
            status: response.status,
            operationName: operationName,
        });
        return response;
    };
}
"#;

const READ_RESPONSES_SCRIPT: &str = "return window.__infraviewResponses || [];";

/// One WebDriver session driving the UI under test
pub struct WebDriverPage {
    http: reqwest::Client,
    session_url: String,
    base_url: String,
}

impl WebDriverPage {
    /// Open a Chrome session on the configured WebDriver server
    pub async fn connect(settings: &E2eSettings) -> Result<Self, BrowserError> {
        let http = reqwest::Client::new();
        let mut args = vec!["--window-size=1440,900"];
        if settings.headless {
            args.push("--headless=new");
        }
        let capabilities = json!({
            "capabilities": {
                "alwaysMatch": {
                    "browserName": "chrome",
                    "goog:chromeOptions": { "args": args }
                }
            }
        });

        let webdriver_url = settings.webdriver_url.trim_end_matches('/');
        let reply: Value = http
            .post(format!("{webdriver_url}/session"))
            .json(&capabilities)
            .send()
            .await?
            .json()
            .await?;
        let value = Self::unwrap_value(reply)?;
        let session_id = value
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| BrowserError::Protocol("new session reply lacks sessionId".into()))?;
        info!(session = %session_id, "Opened WebDriver session");

        let page = Self {
            http,
            session_url: format!("{webdriver_url}/session/{session_id}"),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        };
        // element lookups retry for up to the response timeout
        page.command(
            Method::POST,
            "/timeouts",
            Some(json!({ "implicit": settings.response_timeout_ms })),
        )
        .await?;
        Ok(page)
    }

    /// End the session and close the browser
    pub async fn close(self) -> Result<(), BrowserError> {
        self.command(Method::DELETE, "", None).await?;
        Ok(())
    }

    fn unwrap_value(reply: Value) -> Result<Value, BrowserError> {
        let value = reply.get("value").cloned().unwrap_or(Value::Null);
        if let Some(error) = value.get("error").and_then(Value::as_str) {
            return Err(BrowserError::WebDriver {
                error: error.to_string(),
                message: value
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            });
        }
        Ok(value)
    }

    async fn command(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, BrowserError> {
        let url = format!("{}{}", self.session_url, path);
        debug!(%method, %url, "WebDriver command");
        let mut request = self.http.request(method, &url);
        if let Some(body) = body {
            request = request.json(&body);
        }
        let reply: Value = request.send().await?.json().await?;
        Self::unwrap_value(reply)
    }

    async fn find(&self, locator: &Locator) -> Result<String, BrowserError> {
        let (using, value) = locator.strategy();
        let reply = self
            .command(
                Method::POST,
                "/element",
                Some(json!({ "using": using, "value": value })),
            )
            .await
            .map_err(|e| match e {
                BrowserError::WebDriver { error, .. } if error == "no such element" => {
                    BrowserError::ElementNotFound(locator.to_string())
                }
                other => other,
            })?;
        reply
            .get(ELEMENT_KEY)
            .and_then(Value::as_str)
            .map(String::from)
            .ok_or_else(|| BrowserError::Protocol(format!("no element reference for {locator}")))
    }

    pub async fn execute(&self, script: &str, args: Vec<Value>) -> Result<Value, BrowserError> {
        self.command(
            Method::POST,
            "/execute/sync",
            Some(json!({ "script": script, "args": args })),
        )
        .await
    }

    async fn install_recorder(&self) -> Result<(), BrowserError> {
        self.execute(RECORDER_SCRIPT, Vec::new()).await?;
        Ok(())
    }
}

#[async_trait]
impl BrowserPage for WebDriverPage {
    async fn goto(&self, path: &str) -> Result<(), BrowserError> {
        let url = if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}/{}", self.base_url, path.trim_start_matches('/'))
        };
        self.command(Method::POST, "/url", Some(json!({ "url": url })))
            .await?;
        self.install_recorder().await
    }

    async fn click(&self, locator: &Locator) -> Result<(), BrowserError> {
        let element = self.find(locator).await?;
        self.command(Method::POST, &format!("/element/{element}/click"), Some(json!({})))
            .await?;
        Ok(())
    }

    async fn fill(&self, locator: &Locator, text: &str) -> Result<(), BrowserError> {
        let element = self.find(locator).await?;
        self.command(Method::POST, &format!("/element/{element}/clear"), Some(json!({})))
            .await?;
        self.command(
            Method::POST,
            &format!("/element/{element}/value"),
            Some(json!({ "text": text })),
        )
        .await?;
        Ok(())
    }

    async fn current_url(&self) -> Result<String, BrowserError> {
        let value = self.command(Method::GET, "/url", None).await?;
        value
            .as_str()
            .map(String::from)
            .ok_or_else(|| BrowserError::Protocol("url is not a string".into()))
    }

    async fn screenshot(&self) -> Result<Vec<u8>, BrowserError> {
        let value = self.command(Method::GET, "/screenshot", None).await?;
        let encoded = value
            .as_str()
            .ok_or_else(|| BrowserError::Protocol("screenshot is not a string".into()))?;
        Ok(STANDARD.decode(encoded)?)
    }

    async fn responses(&self) -> Result<Vec<ResponseInfo>, BrowserError> {
        let value = self.execute(READ_RESPONSES_SCRIPT, Vec::new()).await?;
        serde_json::from_value(value).map_err(|e| BrowserError::Protocol(e.to_string()))
    }
}

/// Wait long enough for a page to settle after an action
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(250)).await;
}
