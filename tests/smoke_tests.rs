//! Smoke tests for the fully wired app with the real upstream clients.
//!
//! Nothing here reaches the network: the default config carries no API key
//! or OAuth credentials, so every route under test stops before sending.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use jobswipe::config::Config;
use tower::ServiceExt;

async fn spawn_app() -> Router {
    let mut config = Config::default();
    config.ai.api_key = None;
    config.recruiting.client_id = None;
    config.recruiting.client_secret = None;

    let state = jobswipe::api::create_app_state_from_config(config, None)
        .expect("failed to create app state");
    jobswipe::api::router(state).await
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_health() {
    let app = spawn_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/system/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["data"]["cache_entries"], 0);
}

#[tokio::test]
async fn test_ai_without_api_key_uses_fallback() {
    let app = spawn_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/ai/news")
                .header("Content-Type", "application/json")
                .body(Body::from(r#"{"profile":{"title":"Тестировщик"}}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["fallback"], true);
    assert!(!body["data"]["result"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_oauth_without_client_id_is_server_error() {
    let app = spawn_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/auth/url")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(response).await["success"], false);
}

#[tokio::test]
async fn test_metrics_disabled_message() {
    let app = spawn_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert!(String::from_utf8_lossy(&body).contains("Metrics not enabled"));
}

#[tokio::test]
async fn test_negotiation_without_token_is_rejected() {
    let app = spawn_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/negotiations")
                .header("Content-Type", "application/json")
                .body(Body::from(r#"{"vacancyId":"1","resumeId":"r"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
