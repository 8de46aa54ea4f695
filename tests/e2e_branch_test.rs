//! Branch lifecycle against a running UI and WebDriver server.
//!
//! Start the host (`infraview serve`) and a WebDriver server such as
//! `chromedriver --port=4444`, then run `cargo test -- --ignored`.

use infraview::config::Settings;
use infraview::e2e::{create_branch, delete_branch, BrowserPage, DocsScreenshots, WebDriverPage};
use std::time::Duration;

const BRANCH: &str = "test-branch";

fn settings() -> Settings {
    Settings::new().expect("settings")
}

#[tokio::test]
#[ignore = "needs a running UI and WebDriver server"]
async fn test_create_and_delete_branch() -> anyhow::Result<()> {
    let settings = settings();
    let timeout = Duration::from_millis(settings.e2e.response_timeout_ms);
    let page = WebDriverPage::connect(&settings.e2e).await?;
    let shots = DocsScreenshots::from_env(&settings.e2e.screenshot_dir);

    page.goto("/").await?;
    shots.capture(&page, "branch-home").await?;

    create_branch(&page, BRANCH, timeout).await?;
    assert!(page.current_url().await?.contains("?branch=test-branch"));
    shots.capture(&page, "branch-created").await?;

    delete_branch(&page, BRANCH, timeout).await?;
    shots.capture(&page, "branch-deleted").await?;

    page.close().await?;
    Ok(())
}
