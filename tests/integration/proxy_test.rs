use super::common;

use common::test_server::{FakeUpstream, TestServer};
use infraview_core::query::{branch_delete_mutation, GraphqlRequest};
use serde_json::{json, Value};

#[tokio::test]
async fn test_graphql_is_forwarded_with_branch() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();

    let request = GraphqlRequest::from(&branch_delete_mutation())
        .with_variables(json!({"name": "test-branch"}));
    let response = client
        .post(server.url("/graphql?branch=test-branch"))
        .json(&request)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["echo"]["operation"], "BranchDelete");
    assert_eq!(body["data"]["echo"]["branch"], "test-branch");

    let recorded = server.upstream.recorded();
    assert_eq!(recorded.graphql.len(), 1);
    assert_eq!(recorded.graphql[0].0.as_deref(), Some("test-branch"));
    assert_eq!(recorded.graphql[0].1["variables"]["name"], "test-branch");
}

#[tokio::test]
async fn test_schema_is_forwarded() {
    let server = TestServer::new().await;

    let response = reqwest::get(server.url("/schema")).await.unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["nodes"][0]["kind"], "InfraDevice");
    assert_eq!(server.upstream.recorded().schema_calls, 1);
}

#[tokio::test]
async fn test_unreachable_upstream_is_bad_gateway() {
    let mut settings = infraview::config::Settings::default();
    // nothing listens on the discard port
    settings.upstream.graphql_url = "http://127.0.0.1:9/graphql".to_string();
    let app = infraview::create_app(infraview::AppState::new(&settings).unwrap());

    use tower::util::ServiceExt;
    let response = app
        .oneshot(
            axum::http::Request::builder()
                .method("POST")
                .uri("/graphql")
                .header("content-type", "application/json")
                .body(axum::body::Body::from(r#"{"query": "query { ok }"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), axum::http::StatusCode::BAD_GATEWAY);

    use http_body_util::BodyExt;
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["errors"][0]["message"].is_string());
}

#[tokio::test]
async fn test_native_client_against_upstream() {
    let server = TestServer::new().await;
    let client = server.state.client.current().await;

    let snapshot = client.fetch_schema(Some("main")).await.unwrap();
    assert_eq!(snapshot.used_by("DataOwner"), &["CoreAccount".to_string()]);

    let data = client
        .execute(&GraphqlRequest::new("query { ok }"), Some("dev"))
        .await
        .unwrap();
    assert_eq!(data["echo"]["branch"], "dev");

    let mut broken = GraphqlRequest::new("query Broken { ok }");
    broken.operation_name = Some("Broken".to_string());
    let err = client.execute(&broken, None).await.unwrap_err();
    assert!(err.to_string().contains("broken on purpose"));
}

#[tokio::test]
async fn test_proxy_follows_upstream_change() {
    let server = TestServer::new().await;
    let replacement = FakeUpstream::start().await;
    let client = reqwest::Client::new();

    let request = GraphqlRequest::new("query Before { ok }");
    let response = client
        .post(server.url("/graphql"))
        .json(&request)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(server.upstream.recorded().graphql.len(), 1);

    let mut settings = infraview::config::Settings::default();
    settings.upstream.graphql_url = format!("{}/graphql", replacement.base_url);
    settings.upstream.schema_url = format!("{}/schema", replacement.base_url);
    server
        .state
        .apply_upstream(&settings, Some("main"))
        .await
        .unwrap();
    // the schema reload already went to the new upstream
    assert_eq!(replacement.recorded().schema_calls, 1);

    let mut after = GraphqlRequest::new("query After { ok }");
    after.operation_name = Some("After".to_string());
    let response = client
        .post(server.url("/graphql?branch=dev"))
        .json(&after)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["echo"]["operation"], "After");

    let response = reqwest::get(server.url("/schema")).await.unwrap();
    assert_eq!(response.status(), 200);

    let old = server.upstream.recorded();
    assert_eq!(old.graphql.len(), 1);
    assert_eq!(old.schema_calls, 0);

    let new = replacement.recorded();
    assert_eq!(new.graphql.len(), 1);
    assert_eq!(new.graphql[0].0.as_deref(), Some("dev"));
    assert_eq!(new.schema_calls, 2);
    assert!(server.state.store.is_loaded().await);
}
