//! API client for the Infraview host
//!
//! The host proxies both endpoints to the remote API; every call carries the
//! active branch as `?branch=<name>`.

use gloo_net::http::Request;
use infraview_core::branch::BRANCH_QUERY_PARAM;
use infraview_core::query::{Document, GraphqlRequest, GraphqlResponse};
use infraview_core::SchemaSnapshot;
use serde_json::Value;

const GRAPHQL_ENDPOINT: &str = "/graphql";
const SCHEMA_ENDPOINT: &str = "/schema";

/// Fetch and index the schema of a branch
pub async fn fetch_schema(branch: Option<&str>) -> Result<SchemaSnapshot, String> {
    let url = with_branch(SCHEMA_ENDPOINT, branch);
    let text = fetch_text(&url).await?;
    SchemaSnapshot::from_json(&text).map_err(|e| format!("Invalid schema: {}", e))
}

/// Send a built document, returning the `data` object
pub async fn query(
    document: &Document,
    variables: Option<Value>,
    branch: Option<&str>,
) -> Result<Value, String> {
    let mut request = GraphqlRequest::from(document);
    if let Some(variables) = variables {
        request = request.with_variables(variables);
    }
    execute(&request, branch).await
}

pub async fn execute(request: &GraphqlRequest, branch: Option<&str>) -> Result<Value, String> {
    let url = with_branch(GRAPHQL_ENDPOINT, branch);
    log::debug!(
        "GraphQL {} on {}",
        request.operation_name.as_deref().unwrap_or("(anonymous)"),
        url
    );
    let response: GraphqlResponse = post_json(&url, request).await?;
    response.into_result()
}

// ============================================================================
// Helper functions
// ============================================================================

fn urlencoding_encode(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

fn with_branch(endpoint: &str, branch: Option<&str>) -> String {
    match branch.filter(|b| !b.is_empty()) {
        Some(branch) => format!(
            "{}?{}={}",
            endpoint,
            BRANCH_QUERY_PARAM,
            urlencoding_encode(branch)
        ),
        None => endpoint.to_string(),
    }
}

async fn fetch_text(url: &str) -> Result<String, String> {
    let response = Request::get(url)
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    if !response.ok() {
        return Err(format!("Request failed with status {}", response.status()));
    }
    response
        .text()
        .await
        .map_err(|e| format!("Failed to read response: {}", e))
}

async fn post_json<T: serde::Serialize, R: serde::de::DeserializeOwned>(
    url: &str,
    body: &T,
) -> Result<R, String> {
    let response = Request::post(url)
        .json(body)
        .map_err(|e| format!("Failed to serialize body: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    response
        .json()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}
