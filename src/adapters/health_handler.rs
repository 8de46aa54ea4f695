//! `/health` endpoints. The host counts as ready once a schema snapshot is
//! loaded; without one the UI cannot render any list or form.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::adapters::schema_store::SchemaStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaState {
    Pending,
    Loaded,
}

/// What the host knows about the schema it serves
#[derive(Debug, Serialize, Deserialize)]
pub struct SchemaHealth {
    pub state: SchemaState,
    pub nodes: usize,
    pub generics: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub schema: SchemaHealth,
}

pub struct HealthHandler {
    store: SchemaStore,
    started: Instant,
}

impl HealthHandler {
    pub fn new(store: SchemaStore) -> Self {
        Self {
            store,
            started: Instant::now(),
        }
    }

    async fn schema_health(&self) -> SchemaHealth {
        let snapshot = self.store.snapshot().await;
        let state = if snapshot.is_empty() {
            SchemaState::Pending
        } else {
            SchemaState::Loaded
        };
        SchemaHealth {
            state,
            nodes: snapshot.nodes().len(),
            generics: snapshot.generics().len(),
        }
    }

    /// Always 200; the report says whether the schema is in yet
    pub async fn health(&self) -> impl IntoResponse {
        Json(HealthReport {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: self.started.elapsed().as_secs(),
            schema: self.schema_health().await,
        })
    }

    /// 503 until the first schema load succeeds
    pub async fn ready(&self) -> impl IntoResponse {
        let schema = self.schema_health().await;
        let code = match schema.state {
            SchemaState::Loaded => StatusCode::OK,
            SchemaState::Pending => StatusCode::SERVICE_UNAVAILABLE,
        };
        (code, Json(schema))
    }

    pub async fn live(&self) -> impl IntoResponse {
        Json(serde_json::json!({ "status": "alive" }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use infraview_core::SchemaSnapshot;

    async fn body_of(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    const DOC: &str = r#"{"nodes": [{"name": "tag", "kind": "BuiltinTag"}]}"#;

    #[tokio::test]
    async fn test_report_before_schema_load() {
        let handler = HealthHandler::new(SchemaStore::new());

        let response = handler.health().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_of(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["schema"]["state"], "pending");
        assert_eq!(body["schema"]["nodes"], 0);
    }

    #[tokio::test]
    async fn test_readiness_follows_store() {
        let store = SchemaStore::new();
        let handler = HealthHandler::new(store.clone());
        let response = handler.ready().await.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        store.replace(SchemaSnapshot::from_json(DOC).unwrap()).await;
        let response = handler.ready().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_of(response).await;
        assert_eq!(body["state"], "loaded");
        assert_eq!(body["nodes"], 1);
    }

    #[tokio::test]
    async fn test_alive_without_schema() {
        let handler = HealthHandler::new(SchemaStore::new());
        let response = handler.live().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_of(response).await["status"], "alive");
    }
}
