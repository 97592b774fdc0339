//! HTTP metrics as scraped from `/api/metrics`.
//!
//! Lives in its own test binary because it installs the global recorder.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use jobswipe::config::Config;
use metrics_exporter_prometheus::PrometheusBuilder;
use tower::ServiceExt;

async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8_lossy(&body).into_owned())
}

#[tokio::test]
async fn request_metrics_are_labelled_by_route_template() {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install recorder");

    let mut config = Config::default();
    config.ai.api_key = None;
    let state = jobswipe::api::create_app_state_from_config(config, Some(handle))
        .expect("failed to create app state");
    let app = jobswipe::api::router(state).await;

    // Invalid ids are rejected before any upstream call.
    for id in ["12x34", "98x76"] {
        let (status, _) = get(&app, &format!("/api/vacancies/{id}")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let (status, scrape) = get(&app, "/api/metrics").await;
    assert_eq!(status, StatusCode::OK);

    let vacancy_lines: Vec<&str> = scrape
        .lines()
        .filter(|l| l.starts_with("http_requests_total{") && l.contains("vacancies"))
        .collect();
    assert_eq!(vacancy_lines.len(), 1, "{scrape}");
    assert!(vacancy_lines[0].contains(r#"path="/api/vacancies/{id}""#));
    assert!(vacancy_lines[0].contains(r#"status="400""#));
    assert!(vacancy_lines[0].ends_with(" 2"));
    assert!(!scrape.contains("12x34"));
}
