//! Pass-through of the UI's API calls to the upstream endpoints
//!
//! The UI only ever talks to the host it was served from. Query strings
//! (including `?branch=`) and the headers listed in [`FORWARDED_HEADERS`] are
//! forwarded unchanged.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::adapters::graphql_client::ClientError;
use crate::AppState;

const FORWARDED_HEADERS: [&str; 3] = ["content-type", "authorization", "x-api-key"];

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Upstream unreachable: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error(transparent)]
    Client(#[from] ClientError),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        warn!("Proxy error: {}", self);
        let body = serde_json::json!({ "errors": [{ "message": self.to_string() }] });
        (StatusCode::BAD_GATEWAY, Json(body)).into_response()
    }
}

fn upstream_url(base: &str, uri: &Uri) -> String {
    match uri.query() {
        Some(query) if !query.is_empty() => {
            let separator = if base.contains('?') { '&' } else { '?' };
            format!("{base}{separator}{query}")
        }
        _ => base.to_string(),
    }
}

async fn relay(response: reqwest::Response) -> Result<Response, ProxyError> {
    let status = StatusCode::from_u16(response.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/json")
        .to_string();
    let body = response.bytes().await?;
    Ok((status, [(header::CONTENT_TYPE, content_type)], body.to_vec()).into_response())
}

/// `POST /graphql`
pub async fn graphql(
    State(state): State<AppState>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ProxyError> {
    let client = state.client.current().await;
    let url = upstream_url(client.graphql_url(), &uri);
    debug!(url = %url, bytes = body.len(), "Forwarding GraphQL request");

    let mut request = client.http().post(&url);
    for name in FORWARDED_HEADERS {
        if let Some(value) = headers.get(name) {
            request = request.header(name, value.as_bytes());
        }
    }
    let response = request.body(body.to_vec()).send().await?;
    relay(response).await
}

/// `GET /schema`
pub async fn schema(State(state): State<AppState>, uri: Uri) -> Result<Response, ProxyError> {
    let client = state.client.current().await;
    let url = upstream_url(client.schema_url(), &uri);
    debug!(url = %url, "Forwarding schema request");
    let response = client.http().get(&url).send().await?;
    relay(response).await
}

#[derive(Debug, Deserialize)]
pub struct ReloadParams {
    pub branch: Option<String>,
}

/// `POST /schema/reload`: refetch the schema the host serves health checks from
pub async fn reload_schema(
    State(state): State<AppState>,
    Query(params): Query<ReloadParams>,
) -> Result<Response, ProxyError> {
    let client = state.client.current().await;
    let snapshot = state
        .store
        .reload(&client, params.branch.as_deref())
        .await?;
    let body = serde_json::json!({
        "nodes": snapshot.nodes().len(),
        "generics": snapshot.generics().len(),
    });
    Ok((StatusCode::OK, Json(body)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_url_keeps_query() {
        let uri: Uri = "/graphql?branch=test-branch".parse().unwrap();
        assert_eq!(
            upstream_url("http://api/graphql", &uri),
            "http://api/graphql?branch=test-branch"
        );

        let uri: Uri = "/graphql".parse().unwrap();
        assert_eq!(upstream_url("http://api/graphql", &uri), "http://api/graphql");

        let uri: Uri = "/schema?branch=b".parse().unwrap();
        assert_eq!(upstream_url("http://api/schema?x=1", &uri), "http://api/schema?x=1&branch=b");
    }
}
