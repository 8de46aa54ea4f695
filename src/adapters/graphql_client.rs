//! Native client for the upstream GraphQL and schema endpoints

use infraview_core::branch::with_branch_param;
use infraview_core::query::{Document, GraphqlRequest, GraphqlResponse};
use infraview_core::{SchemaError, SchemaSnapshot};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

use crate::config::UpstreamSettings;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status
    #[error("Upstream returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response carried a GraphQL `errors` array
    #[error("GraphQL error: {0}")]
    Graphql(String),

    /// The schema document could not be decoded
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

#[derive(Clone)]
pub struct GraphqlClient {
    http: reqwest::Client,
    graphql_url: String,
    schema_url: String,
}

/// The client requests go through. A config reload swaps in a client built
/// from the new `upstream` section; requests already running keep the one
/// they started with.
#[derive(Clone)]
pub struct UpstreamClient {
    current: Arc<RwLock<GraphqlClient>>,
}

impl UpstreamClient {
    pub fn new(client: GraphqlClient) -> Self {
        Self {
            current: Arc::new(RwLock::new(client)),
        }
    }

    pub async fn current(&self) -> GraphqlClient {
        self.current.read().await.clone()
    }

    pub async fn replace(&self, client: GraphqlClient) {
        info!(graphql = %client.graphql_url, schema = %client.schema_url, "Upstream switched");
        *self.current.write().await = client;
    }
}

impl GraphqlClient {
    pub fn new(settings: &UpstreamSettings) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()?;
        Ok(Self {
            http,
            graphql_url: settings.graphql_url.clone(),
            schema_url: settings.schema_url.clone(),
        })
    }

    /// Underlying HTTP client, shared with the proxy
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn graphql_url(&self) -> &str {
        &self.graphql_url
    }

    pub fn schema_url(&self) -> &str {
        &self.schema_url
    }

    /// Fetch and index the schema of `branch`
    #[instrument(skip(self))]
    pub async fn fetch_schema(&self, branch: Option<&str>) -> Result<SchemaSnapshot, ClientError> {
        let url = with_branch_param(&self.schema_url, branch);
        let response = self.http.get(&url).send().await?;
        let body = Self::check_status(response).await?;
        let snapshot = SchemaSnapshot::from_json(&body)?;
        debug!(nodes = snapshot.nodes().len(), "Fetched schema");
        Ok(snapshot)
    }

    /// Send one request and return its `data`
    #[instrument(skip(self, request), fields(operation = ?request.operation_name))]
    pub async fn execute(
        &self,
        request: &GraphqlRequest,
        branch: Option<&str>,
    ) -> Result<Value, ClientError> {
        let url = with_branch_param(&self.graphql_url, branch);
        let response = self.http.post(&url).json(request).send().await?;
        let body = Self::check_status(response).await?;
        let response: GraphqlResponse =
            serde_json::from_str(&body).map_err(|e| ClientError::Schema(e.into()))?;
        response.into_result().map_err(ClientError::Graphql)
    }

    /// Render `document`, attach `variables` and execute it
    pub async fn execute_document(
        &self,
        document: &Document,
        variables: Option<Value>,
        branch: Option<&str>,
    ) -> Result<Value, ClientError> {
        let mut request = GraphqlRequest::from(document);
        request.variables = variables;
        self.execute(&request, branch).await
    }

    async fn check_status(response: reqwest::Response) -> Result<String, ClientError> {
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(ClientError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }
}
