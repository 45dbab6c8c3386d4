//! Integration tests for prodtime-api endpoints
//!
//! Tests cover:
//! - Health and build info endpoints
//! - Rate table listing
//! - Single-lesson preview
//! - Project, folder and workspace totals
//! - Tier analytics
//! - Error mapping for cycles, dangling references and oversized bodies

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use prodtime_api::{build_router, AppState};
use prodtime_common::config::TomlConfig;
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot` method

/// Test helper: Create app with default configuration
fn setup_app() -> axum::Router {
    build_router(AppState::new(TomlConfig::default()))
}

/// Test helper: GET request
fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Test helper: POST request with JSON body
fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

/// Test helper: Extract JSON body from response
async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

// =============================================================================
// Health / Build Info
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let response = setup_app().oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "prodtime-api");
    assert!(body["version"].is_string());
    assert_eq!(body["default_tier"], "interactive");
    assert_eq!(body["tier_count"], 4);
}

#[tokio::test]
async fn test_buildinfo_endpoint() {
    let response = setup_app().oneshot(get_request("/api/buildinfo")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert!(body["git_hash"].is_string());
    assert_eq!(body["max_body_bytes"], 2 * 1024 * 1024);
}

// =============================================================================
// Rate Table
// =============================================================================

#[tokio::test]
async fn test_tiers_endpoint() {
    let response = setup_app().oneshot(get_request("/api/tiers")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["default_tier"], "interactive");

    let tiers = body["tiers"].as_array().unwrap();
    assert_eq!(tiers.len(), 4);
    assert_eq!(tiers[0]["tier"], "basic");
    assert_eq!(tiers[0]["rate"], 150);
    assert_eq!(tiers[0]["aliases"], json!(["starter"]));
    assert_eq!(tiers[2]["tier"], "advanced");
    assert_eq!(tiers[2]["aliases"], json!([]));
    assert_eq!(tiers[3]["rate"], 400);
}

// =============================================================================
// Single-Lesson Preview
// =============================================================================

#[tokio::test]
async fn test_production_time_preview() {
    let request = post_json(
        "/api/production-time",
        &json!({"completionTime": "5m", "qualityTier": "basic"}),
    );
    let response = setup_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["completion_minutes"], 5);
    assert_eq!(body["production_minutes"], 750);
    assert_eq!(body["tier"], "basic");
    assert_eq!(body["rate"], 150);
    assert_eq!(body["source"], "lesson");
    assert_eq!(body["custom"], false);
}

#[tokio::test]
async fn test_production_time_unparseable_is_zero() {
    let request = post_json("/api/production-time", &json!({"completionTime": "a while"}));
    let response = setup_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["production_minutes"], 0);
    assert_eq!(body["tier"], "interactive");
}

// =============================================================================
// Totals
// =============================================================================

#[tokio::test]
async fn test_project_totals() {
    let project = json!({
        "id": 42,
        "name": "Course",
        "qualityTier": "basic",
        "sections": [
            {"title": "One", "customRate": 500, "lessons": [{"completionTime": "6m"}]},
            {"title": "Two", "lessons": [{"completionTime": "5m"}, {"completionTime": ""}]}
        ]
    });

    let response = setup_app()
        .oneshot(post_json("/api/totals/project", &project))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["id"], 42);
    assert_eq!(body["totals"]["lesson_count"], 3);
    assert_eq!(body["totals"]["module_count"], 2);
    assert_eq!(body["totals"]["completion_minutes"], 11);
    assert_eq!(body["totals"]["production_minutes"], 3750);
    assert_eq!(body["totals"]["per_tier_production_minutes"]["basic"], 3750);
    assert_eq!(body["sections"][0]["totals"]["production_minutes"], 3000);
}

#[tokio::test]
async fn test_project_totals_tolerates_odd_completion_values() {
    let project = json!({
        "name": "Odd",
        "qualityTier": "basic",
        "sections": [{"lessons": [
            {"completionTime": "5m"},
            {"completionTime": 5.5},
            {"completionTime": false}
        ]}]
    });

    let response = setup_app()
        .oneshot(post_json("/api/totals/project", &project))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["totals"]["lesson_count"], 3);
    assert_eq!(body["totals"]["production_minutes"], 750);
}

#[tokio::test]
async fn test_folder_totals_rollup() {
    let folder = json!({
        "id": 1,
        "name": "F",
        "projects": [
            {"name": "A", "qualityTier": "basic", "sections": [{"lessons": [{"completionTime": "4m"}]}]},
            {"name": "B", "sections": [{"lessons": [{"completionTime": "10m"}]}]}
        ],
        "children": [
            {"id": 2, "name": "Child", "qualityTier": "advanced",
             "projects": [{"name": "C", "sections": [{"lessons": [{"completionTime": "3m"}]}]}]}
        ]
    });

    let response = setup_app()
        .oneshot(post_json("/api/totals/folder", &folder))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["totals"]["production_minutes"], 3500);
    assert_eq!(body["own_totals"]["production_minutes"], 2600);
    assert_eq!(body["children"][0]["totals"]["production_minutes"], 900);
}

#[tokio::test]
async fn test_folder_totals_repeated_id_is_cycle() {
    let folder = json!({
        "id": 1,
        "children": [{"id": 2, "children": [{"id": 1}]}]
    });

    let response = setup_app()
        .oneshot(post_json("/api/totals/folder", &folder))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = extract_json(response.into_body()).await;
    assert!(body["error"].as_str().unwrap().contains("cycle"));
}

#[tokio::test]
async fn test_workspace_totals() {
    let workspace = json!({
        "folders": [
            {"id": 1, "name": "Root", "qualityTier": "immersive"},
            {"id": 2, "name": "Sub", "parentId": 1}
        ],
        "projects": [
            {"id": 10, "name": "Deep", "folderId": 2, "sections": [{"lessons": [{"completionTime": "1m"}]}]},
            {"id": 11, "name": "Loose", "sections": [{"lessons": [{"completionTime": "1m"}]}]}
        ]
    });

    let response = setup_app()
        .oneshot(post_json("/api/totals/workspace", &workspace))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["folders"][0]["totals"]["production_minutes"], 400);
    assert_eq!(body["folders"][0]["children"][0]["default_tier"], "immersive");
    assert_eq!(body["unfiled"][0]["totals"]["production_minutes"], 200);
    assert_eq!(body["totals"]["production_minutes"], 600);
}

#[tokio::test]
async fn test_workspace_cycle_rejected() {
    let workspace = json!({
        "folders": [{"id": 1, "parentId": 2}, {"id": 2, "parentId": 1}],
        "projects": []
    });

    let response = setup_app()
        .oneshot(post_json("/api/totals/workspace", &workspace))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_workspace_unknown_folder_rejected() {
    let workspace = json!({
        "folders": [],
        "projects": [{"id": 5, "name": "Lost", "folderId": 99}]
    });

    let response = setup_app()
        .oneshot(post_json("/api/totals/workspace", &workspace))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_workspace_duplicate_folder_rejected() {
    let workspace = json!({
        "folders": [{"id": 1}, {"id": 1}],
        "projects": []
    });

    let response = setup_app()
        .oneshot(post_json("/api/totals/workspace", &workspace))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Analytics
// =============================================================================

#[tokio::test]
async fn test_tier_analytics() {
    let snapshot = json!({
        "kind": "project",
        "name": "Mixed",
        "sections": [{"lessons": [
            {"completionTime": "5m", "qualityTier": "basic"},
            {"completionTime": "5m", "qualityTier": "advanced"},
            {"completionTime": "5m", "qualityTier": "bogus_value"}
        ]}]
    });

    let response = setup_app()
        .oneshot(post_json("/api/analytics/tiers", &snapshot))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["totals"]["production_minutes"], 750 + 1500 + 1000);

    let breakdown = body["breakdown"].as_array().unwrap();
    let tiers: Vec<&str> = breakdown.iter().map(|row| row["tier"].as_str().unwrap()).collect();
    assert_eq!(tiers, vec!["basic", "interactive", "advanced"]);
    assert_eq!(breakdown[1]["production_minutes"], 1000);
}

// =============================================================================
// Request Validation
// =============================================================================

#[tokio::test]
async fn test_malformed_json_rejected() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/totals/project")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = setup_app().oneshot(request).await.unwrap();
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let config = TomlConfig {
        max_body_bytes: 64,
        ..TomlConfig::default()
    };
    let app = build_router(AppState::new(config));

    let lessons: Vec<Value> = (0..50).map(|_| json!({"completionTime": "5m"})).collect();
    let project = json!({"name": "Big", "sections": [{"lessons": lessons}]});

    let response = app
        .oneshot(post_json("/api/totals/project", &project))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
