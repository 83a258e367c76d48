//! Integration Tests for API Endpoints
//!
//! Tests the full request/response cycle against the fixture content.

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use content_cache::{api::create_router, AppState};
use serde_json::Value;
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app() -> Router {
    let (service, _backend) = common::service();
    create_router(AppState::new(service))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// == Read Endpoints ==

#[tokio::test]
async fn test_levels_endpoint() {
    let app = create_test_app();

    let (status, json) = send(&app, get("/levels")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert!(json["error"].is_null());
    assert_eq!(json["data"][0]["name"], "A1");
    assert_eq!(json["data"][0]["modules"][0]["title"], "Travel");
}

#[tokio::test]
async fn test_levels_endpoint_with_query_filters() {
    let app = create_test_app();

    let (status, json) = send(&app, get("/levels?include_inactive=true&sort_order=desc")).await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Legacy", "A2", "A1"]);
}

#[tokio::test]
async fn test_module_endpoint() {
    let app = create_test_app();

    let (status, json) = send(&app, get("/modules/1")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["title"], "Basics");
    assert_eq!(json["data"]["lessons"][0]["title"], "Greetings");
}

#[tokio::test]
async fn test_module_endpoint_not_found() {
    let app = create_test_app();

    let (status, json) = send(&app, get("/modules/404")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
    assert!(json["data"].is_null());
    assert!(json["error"].as_str().unwrap().contains("module 404"));
}

#[tokio::test]
async fn test_lesson_endpoint() {
    let app = create_test_app();

    let (_, with_related) = send(&app, get("/lessons/11")).await;
    assert_eq!(with_related["data"]["vocabulary"].as_array().unwrap().len(), 2);
    assert_eq!(with_related["data"]["questions"][0]["id"], 301);

    let (_, bare) = send(&app, get("/lessons/11?include_related=false")).await;
    assert!(bare["data"].get("vocabulary").is_none());
}

#[tokio::test]
async fn test_search_endpoint() {
    let app = create_test_app();

    let (status, json) = send(&app, get("/search?term=hola&types=vocabulary")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["vocabulary"][0]["translation"], "hello");
    assert!(json["data"]["lessons"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_search_endpoint_rejects_unknown_type() {
    let app = create_test_app();

    let (status, json) = send(&app, get("/search?term=hola&types=podcasts")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("podcasts"));
}

#[tokio::test]
async fn test_learning_path_endpoint() {
    let app = create_test_app();

    let (status, json) = send(&app, get("/users/user-1/learning-path?level=1")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["completion_percentage"], 33);
    assert_eq!(json["data"]["recommended_lessons"][0]["id"], 12);
}

// == Sync and Versions ==

#[tokio::test]
async fn test_sync_endpoint_flushes_cache() {
    let app = create_test_app();

    send(&app, get("/levels")).await;
    let (_, stats) = send(&app, get("/cache/stats")).await;
    assert_eq!(stats["size"], 1);

    let (status, json) = send(
        &app,
        post_json("/sync", r#"{"last_sync_timestamp":"2024-02-01T00:00:00Z"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["lessons"].as_array().unwrap().len(), 1);
    assert!(json["data"]["synced_at"].is_string());

    let (_, stats) = send(&app, get("/cache/stats")).await;
    assert_eq!(stats["size"], 0);
}

#[tokio::test]
async fn test_sync_endpoint_bad_cursor() {
    let app = create_test_app();

    let (status, json) = send(&app, post_json("/sync", r#"{"last_sync_timestamp":"soon"}"#)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_sync_endpoint_rejects_mistyped_cursor() {
    let app = create_test_app();

    let (status, json) = send(&app, post_json("/sync", r#"{"last_sync_timestamp": 12345}"#)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert!(json["data"].is_null());
}

#[tokio::test]
async fn test_sync_endpoint_without_content_type() {
    let app = create_test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/sync")
        .body(Body::from(r#"{"last_sync_timestamp":"2024-02-01T00:00:00Z"}"#))
        .unwrap();
    let (status, json) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["lessons"].as_array().unwrap().len(), 1);

    let empty = Request::builder()
        .method("POST")
        .uri("/sync")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(&app, empty).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["lessons"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_version_endpoints() {
    let app = create_test_app();

    let (_, current) = send(&app, get("/versions/lesson/5")).await;
    assert_eq!(current["data"], "1.0");

    let (status, recorded) = send(
        &app,
        post_json("/versions/lesson/5", r#"{"change_description":"fixed audio"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(recorded["data"]["version"], "1.1");
    assert_eq!(recorded["data"]["change_description"], "fixed audio");

    let (_, current) = send(&app, get("/versions/lesson/5")).await;
    assert_eq!(current["data"], "1.1");
}

// == Cache Endpoints ==

#[tokio::test]
async fn test_cache_stats_and_clear() {
    let app = create_test_app();

    send(&app, get("/modules/1")).await;
    send(&app, get("/modules/1")).await;

    let (_, stats) = send(&app, get("/cache/stats")).await;
    assert_eq!(stats["size"], 1);
    assert_eq!(stats["hits"], 1);
    assert_eq!(stats["entries"][0]["version"], "1.0");

    let (status, cleared) = send(
        &app,
        Request::builder()
            .method("DELETE")
            .uri("/cache")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cleared["removed"], 1);

    let (_, stats) = send(&app, get("/cache/stats")).await;
    assert_eq!(stats["size"], 0);
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let (status, json) = send(&app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
}
