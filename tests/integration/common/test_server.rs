use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use infraview::config::Settings;
use infraview::{create_app, AppState};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

pub const SCHEMA_DOC: &str = r#"{
    "nodes": [
        {
            "name": "device",
            "kind": "InfraDevice",
            "namespace": "Infra",
            "label": "Device",
            "attributes": [{"name": "name", "kind": "Text"}],
            "relationships": [
                {"name": "owner", "peer": "DataOwner", "kind": "Attribute", "cardinality": "one", "inherited": true}
            ]
        },
        {"name": "account", "kind": "CoreAccount", "namespace": "Core", "label": "Account"}
    ],
    "generics": [
        {"name": "owner", "kind": "DataOwner", "used_by": ["CoreAccount"]}
    ]
}"#;

/// What the fake upstream saw
#[derive(Clone, Debug, Default)]
pub struct Recorded {
    /// `(branch query parameter, request body)` of each GraphQL call
    pub graphql: Vec<(Option<String>, Value)>,
    pub schema_calls: usize,
}

type Shared = Arc<Mutex<Recorded>>;

async fn upstream_graphql(
    State(recorded): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let branch = params.get("branch").cloned();
    recorded
        .lock()
        .unwrap()
        .graphql
        .push((branch.clone(), body.clone()));

    let operation = body["operationName"].as_str().unwrap_or_default();
    if operation == "Broken" {
        return Json(json!({"data": null, "errors": [{"message": "broken on purpose"}]}));
    }
    Json(json!({
        "data": {
            "echo": {
                "operation": operation,
                "branch": branch,
                "variables": body.get("variables").cloned().unwrap_or(Value::Null)
            }
        }
    }))
}

async fn upstream_schema(State(recorded): State<Shared>) -> (axum::http::StatusCode, String) {
    recorded.lock().unwrap().schema_calls += 1;
    (axum::http::StatusCode::OK, SCHEMA_DOC.to_string())
}

/// Stand-in for the remote API
pub struct FakeUpstream {
    pub base_url: String,
    pub recorded: Shared,
}

impl FakeUpstream {
    pub async fn start() -> Self {
        let recorded: Shared = Arc::default();
        let app = Router::new()
            .route("/graphql", post(upstream_graphql))
            .route("/schema", get(upstream_schema))
            .with_state(recorded.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        FakeUpstream {
            base_url: format!("http://{}", addr),
            recorded,
        }
    }

    pub fn recorded(&self) -> Recorded {
        self.recorded.lock().unwrap().clone()
    }
}

pub struct TestServer {
    pub addr: SocketAddr,
    pub base_url: String,
    pub state: AppState,
    pub upstream: FakeUpstream,
}

impl TestServer {
    pub async fn new() -> Self {
        let upstream = FakeUpstream::start().await;

        let mut settings = Settings::default();
        settings.server.port = 0;
        settings.upstream.graphql_url = format!("{}/graphql", upstream.base_url);
        settings.upstream.schema_url = format!("{}/schema", upstream.base_url);

        let state = AppState::new(&settings).unwrap();
        let app = create_app(state.clone());

        // Start server on random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        TestServer {
            addr,
            base_url,
            state,
            upstream,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
