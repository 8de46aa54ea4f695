//! Branch lifecycle flows
//!
//! The selectors match the branch selector and branch detail page of the UI.

use infraview_core::branch::{branch_route, BRANCH_QUERY_PARAM};
use std::time::Duration;
use tracing::info;

use super::{wait_for_response, BrowserError, BrowserPage, Locator, ResponseInfo};

pub const CREATE_BRANCH_TRIGGER: &str = "[data-testid='create-branch-button']";
pub const BRANCH_NAME_INPUT: &str = "#new-branch-name";
pub const DELETE_CONFIRM_BUTTON: &str = "[data-testid='modal-delete-confirm']";

const BRANCH_CREATE: &str = "BranchCreate";
const BRANCH_DELETE: &str = "BranchDelete";

fn ensure_ok(response: &ResponseInfo, what: &str) -> Result<(), BrowserError> {
    if response.status >= 400 {
        return Err(BrowserError::Assertion(format!(
            "{what} answered with status {}",
            response.status
        )));
    }
    Ok(())
}

/// Create `name` through the branch selector.
///
/// Clicking "Create" must produce the `BranchCreate` response and, once the
/// UI has switched branch, another GraphQL response for the new branch. All
/// three are awaited together so neither response can be missed.
pub async fn create_branch<P>(page: &P, name: &str, timeout: Duration) -> Result<(), BrowserError>
where
    P: BrowserPage + ?Sized,
{
    page.click(&Locator::css(CREATE_BRANCH_TRIGGER)).await?;
    page.fill(&Locator::css(BRANCH_NAME_INPUT), name).await?;

    let since = page.responses().await?.len();
    let create = Locator::text("Create");
    let (created, _follow_up, ()) = futures::try_join!(
        wait_for_response(page, since, "BranchCreate response", timeout, |r| {
            r.is_graphql() && r.is_operation(BRANCH_CREATE)
        }),
        wait_for_response(page, since, "query on the new branch", timeout, |r| {
            r.is_graphql() && !r.is_operation(BRANCH_CREATE)
        }),
        page.click(&create),
    )?;
    ensure_ok(&created, BRANCH_CREATE)?;

    let url = page.current_url().await?;
    let expected = format!("?{BRANCH_QUERY_PARAM}={}", urlencoding::encode(name));
    if !url.contains(&expected) {
        return Err(BrowserError::Assertion(format!(
            "expected URL to contain '{expected}', got '{url}'"
        )));
    }
    info!(branch = %name, "Branch created");
    Ok(())
}

/// Delete `name` from its detail page, confirming in the modal
pub async fn delete_branch<P>(page: &P, name: &str, timeout: Duration) -> Result<(), BrowserError>
where
    P: BrowserPage + ?Sized,
{
    page.goto(&branch_route(name)).await?;
    page.click(&Locator::text("Delete")).await?;

    let since = page.responses().await?.len();
    let confirm = Locator::css(DELETE_CONFIRM_BUTTON);
    let (deleted, ()) = futures::try_join!(
        wait_for_response(page, since, "BranchDelete response", timeout, |r| {
            r.is_graphql() && r.is_operation(BRANCH_DELETE)
        }),
        page.click(&confirm),
    )?;
    ensure_ok(&deleted, BRANCH_DELETE)?;
    info!(branch = %name, "Branch deleted");
    Ok(())
}
