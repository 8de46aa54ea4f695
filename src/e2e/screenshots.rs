use std::path::{Path, PathBuf};
use tracing::info;

use super::webdriver::settle;
use super::{BrowserError, BrowserPage};

/// Environment flag that turns screenshot capture on
pub const DOCS_SCREENSHOTS_ENV: &str = "INFRAVIEW_DOCS_SCREENSHOTS";

/// Saves documentation screenshots while tests run.
///
/// Disabled unless [`DOCS_SCREENSHOTS_ENV`] is set, in which case every
/// [`capture`](Self::capture) writes `<dir>/<name>.png`.
#[derive(Clone, Debug)]
pub struct DocsScreenshots {
    dir: PathBuf,
    enabled: bool,
}

impl DocsScreenshots {
    pub fn new(dir: impl Into<PathBuf>, enabled: bool) -> Self {
        Self {
            dir: dir.into(),
            enabled,
        }
    }

    pub fn from_env(dir: impl Into<PathBuf>) -> Self {
        let enabled = std::env::var(DOCS_SCREENSHOTS_ENV)
            .map(|v| flag_enabled(&v))
            .unwrap_or(false);
        Self::new(dir, enabled)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Save the current viewport; returns the written path, or `None` when
    /// capture is disabled
    pub async fn capture<P>(&self, page: &P, name: &str) -> Result<Option<PathBuf>, BrowserError>
    where
        P: BrowserPage + ?Sized,
    {
        if !self.enabled {
            return Ok(None);
        }
        settle().await;
        let png = page.screenshot().await?;
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(format!("{name}.png"));
        tokio::fs::write(&path, png).await?;
        info!(path = %path.display(), "Saved screenshot");
        Ok(Some(path))
    }
}

fn flag_enabled(value: &str) -> bool {
    !matches!(value.trim().to_ascii_lowercase().as_str(), "" | "0" | "false" | "no")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_values() {
        assert!(flag_enabled("1"));
        assert!(flag_enabled("true"));
        assert!(!flag_enabled("0"));
        assert!(!flag_enabled("False"));
        assert!(!flag_enabled(""));
    }
}
