//! # Infraview
//!
//! Host for a schema-driven data management UI. The browser application
//! (`infraview-ui`) renders lists, detail views and forms from a schema fetched
//! at runtime; this crate serves it, proxies its API calls to the upstream
//! GraphQL and schema endpoints and keeps a schema snapshot for readiness
//! checks and the CLI.
//!
//! ## Features
//!
//! - **Embedded UI**: the compiled UI bundle is served with an SPA fallback
//! - **API proxy**: `/graphql` and `/schema` forwarded with their query strings
//! - **Schema store**: explicit reload, readers never see a partial schema
//! - **Health Checks**: Kubernetes-ready health endpoints
//! - **Browser helpers**: WebDriver-driven branch flows and doc screenshots
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use infraview::config::Settings;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::new()?;
//!     let app = infraview::create_app(infraview::AppState::new(&settings)?);
//!     # let _ = app;
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod e2e;

use crate::adapters::graphql_client::{ClientError, GraphqlClient, UpstreamClient};
use crate::adapters::health_handler::HealthHandler;
use crate::adapters::proxy_handler;
use crate::adapters::schema_store::SchemaStore;
use crate::config::Settings;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Shared by every request handler
#[derive(Clone)]
pub struct AppState {
    pub client: UpstreamClient,
    pub store: SchemaStore,
}

impl AppState {
    pub fn new(settings: &Settings) -> Result<Self, ClientError> {
        Ok(Self {
            client: UpstreamClient::new(GraphqlClient::new(&settings.upstream)?),
            store: SchemaStore::new(),
        })
    }

    /// Point the proxy at the upstream of `settings`, then reload the schema
    /// from it. The schema is only reloaded once the new client is in place.
    pub async fn apply_upstream(
        &self,
        settings: &Settings,
        branch: Option<&str>,
    ) -> Result<(), ClientError> {
        let client = GraphqlClient::new(&settings.upstream)?;
        self.client.replace(client.clone()).await;
        self.store.reload(&client, branch).await?;
        Ok(())
    }
}

/// Creates the Axum application router with all endpoints configured.
///
/// Health endpoints first, then the API proxy, then the embedded UI as the
/// fallback for every other path.
pub fn create_app(state: AppState) -> Router {
    let health_handler = Arc::new(HealthHandler::new(state.store.clone()));

    let health_router = Router::new()
        .route("/health", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.health().await }
            }
        }))
        .route("/health/ready", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.ready().await }
            }
        }))
        .route("/health/live", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.live().await }
            }
        }));

    let api_router = Router::new()
        .route("/graphql", post(proxy_handler::graphql))
        .route("/schema", get(proxy_handler::schema))
        .route("/schema/reload", post(proxy_handler::reload_schema))
        .with_state(state);

    health_router
        .merge(api_router)
        .fallback(crate::adapters::ui_handler::UIHandler::serve)
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
}
