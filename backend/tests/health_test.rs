//! Integration tests for health check endpoints

mod common;

use axum::http::StatusCode;

#[tokio::test]
async fn test_health_endpoint() {
    let app = common::TestApp::spawn().await;

    let (status, body) = app.get("/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_liveness_endpoint() {
    let app = common::TestApp::spawn().await;

    let (status, body) = app.get("/health/live", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "alive");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_readiness_endpoint() {
    let app = common::TestApp::with_database().await;

    let (status, body) = app.get("/health/ready", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_swagger_document_served_in_development() {
    let app = common::TestApp::spawn().await;

    let (status, body) = app.get("/api-docs/openapi.json", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]
        .as_object()
        .is_some_and(|paths| paths.contains_key("/api/v1/bikes")));
}
