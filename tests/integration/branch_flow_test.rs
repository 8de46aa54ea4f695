use async_trait::async_trait;
use infraview::e2e::branch::{BRANCH_NAME_INPUT, CREATE_BRANCH_TRIGGER, DELETE_CONFIRM_BUTTON};
use infraview::e2e::{
    create_branch, delete_branch, BrowserError, BrowserPage, DocsScreenshots, Locator,
    ResponseInfo,
};
use std::sync::Mutex;
use std::time::Duration;

const BASE: &str = "http://localhost:3000";
const TIMEOUT: Duration = Duration::from_secs(2);

/// Page that reacts to the branch flows the way the UI does
#[derive(Default)]
struct ScriptedPage {
    state: Mutex<PageState>,
    /// Leave out the follow-up query after a branch is created
    skip_follow_up: bool,
    /// Status the BranchDelete response is answered with
    delete_status: Option<u16>,
}

#[derive(Default)]
struct PageState {
    url: String,
    typed: String,
    actions: Vec<String>,
    responses: Vec<ResponseInfo>,
}

fn graphql(status: u16, operation: Option<&str>, branch: Option<&str>) -> ResponseInfo {
    let url = match branch {
        Some(branch) => format!("{BASE}/graphql?branch={branch}"),
        None => format!("{BASE}/graphql"),
    };
    ResponseInfo {
        url,
        status,
        operation_name: operation.map(String::from),
    }
}

impl ScriptedPage {
    fn actions(&self) -> Vec<String> {
        self.state.lock().unwrap().actions.clone()
    }
}

#[async_trait]
impl BrowserPage for ScriptedPage {
    async fn goto(&self, path: &str) -> Result<(), BrowserError> {
        let mut state = self.state.lock().unwrap();
        state.url = format!("{BASE}{path}");
        state.responses.clear();
        state.actions.push(format!("goto {path}"));
        Ok(())
    }

    async fn click(&self, locator: &Locator) -> Result<(), BrowserError> {
        // let the waiters take their baseline first
        tokio::time::sleep(Duration::from_millis(20)).await;
        let mut state = self.state.lock().unwrap();
        state.actions.push(format!("click {locator}"));

        if *locator == Locator::text("Create") {
            let name = state.typed.clone();
            state.responses.push(graphql(200, Some("BranchCreate"), None));
            if !self.skip_follow_up {
                state.responses.push(graphql(200, Some("GetBranches"), Some(&name)));
            }
            state.url = format!("{BASE}/?branch={name}");
        } else if *locator == Locator::css(DELETE_CONFIRM_BUTTON) {
            let status = self.delete_status.unwrap_or(200);
            state.responses.push(graphql(status, Some("BranchDelete"), None));
            state.url = format!("{BASE}/branches");
        }
        Ok(())
    }

    async fn fill(&self, locator: &Locator, text: &str) -> Result<(), BrowserError> {
        let mut state = self.state.lock().unwrap();
        if *locator != Locator::css(BRANCH_NAME_INPUT) {
            return Err(BrowserError::ElementNotFound(locator.to_string()));
        }
        state.typed = text.to_string();
        state.actions.push(format!("fill {text}"));
        Ok(())
    }

    async fn current_url(&self) -> Result<String, BrowserError> {
        Ok(self.state.lock().unwrap().url.clone())
    }

    async fn screenshot(&self) -> Result<Vec<u8>, BrowserError> {
        Ok(vec![0x89, b'P', b'N', b'G'])
    }

    async fn responses(&self) -> Result<Vec<ResponseInfo>, BrowserError> {
        Ok(self.state.lock().unwrap().responses.clone())
    }
}

#[tokio::test]
async fn test_create_branch_leaves_branch_in_url() {
    let page = ScriptedPage::default();
    page.goto("/").await.unwrap();

    create_branch(&page, "test-branch", TIMEOUT).await.unwrap();

    let url = page.current_url().await.unwrap();
    assert!(url.contains("?branch=test-branch"));
    assert_eq!(
        page.actions(),
        vec![
            "goto /".to_string(),
            format!("click css `{CREATE_BRANCH_TRIGGER}`"),
            "fill test-branch".to_string(),
            "click text `Create`".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_create_branch_times_out_without_follow_up_query() {
    let page = ScriptedPage {
        skip_follow_up: true,
        ..Default::default()
    };
    page.goto("/").await.unwrap();

    let err = create_branch(&page, "test-branch", Duration::from_millis(300))
        .await
        .unwrap_err();
    assert!(matches!(err, BrowserError::Timeout(what) if what.contains("new branch")));
}

#[tokio::test]
async fn test_delete_branch_completes() {
    let page = ScriptedPage::default();

    delete_branch(&page, "test-branch", TIMEOUT).await.unwrap();

    let actions = page.actions();
    assert_eq!(actions[0], "goto /branches/test-branch");
    assert_eq!(actions[1], "click text `Delete`");
    assert_eq!(actions[2], format!("click css `{DELETE_CONFIRM_BUTTON}`"));
}

#[tokio::test]
async fn test_delete_branch_reports_failed_mutation() {
    let page = ScriptedPage {
        delete_status: Some(500),
        ..Default::default()
    };

    let err = delete_branch(&page, "test-branch", TIMEOUT).await.unwrap_err();
    assert!(matches!(err, BrowserError::Assertion(_)));
}

#[tokio::test]
async fn test_screenshots_disabled_write_nothing() {
    let dir = tempfile::TempDir::new().unwrap();
    let page = ScriptedPage::default();

    let shots = DocsScreenshots::new(dir.path().join("media"), false);
    assert!(shots.capture(&page, "branches").await.unwrap().is_none());
    assert!(!dir.path().join("media").exists());

    let shots = DocsScreenshots::new(dir.path().join("media"), true);
    let path = shots.capture(&page, "branches").await.unwrap().unwrap();
    assert_eq!(std::fs::read(path).unwrap(), vec![0x89, b'P', b'N', b'G']);
}
