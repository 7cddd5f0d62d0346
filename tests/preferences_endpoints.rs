use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use accessibridge_backend::api::server::build_router_with_content_store;
use accessibridge_backend::db::content::ContentStore;

#[tokio::test]
async fn preferences_upsert_and_read_back_as_a_flat_object() {
    let app = build_router_with_content_store(test_store());

    let initial = send_json(
        app.clone(),
        Method::GET,
        "/api/preferences",
        Body::empty(),
        StatusCode::OK,
    )
    .await;
    assert_eq!(initial, json!({}));

    let saved = send_json(
        app.clone(),
        Method::POST,
        "/api/preferences",
        Body::from(json!({"theme":"dark","font_size":18,"captions":true}).to_string()),
        StatusCode::OK,
    )
    .await;
    assert_eq!(saved, json!({"success": true, "count": 3}));

    let _overwrite = send_json(
        app.clone(),
        Method::POST,
        "/api/preferences",
        Body::from(json!({"theme":"light"}).to_string()),
        StatusCode::OK,
    )
    .await;

    let current = send_json(
        app,
        Method::GET,
        "/api/preferences",
        Body::empty(),
        StatusCode::OK,
    )
    .await;
    assert_eq!(
        current,
        json!({"captions": "true", "font_size": "18", "theme": "light"})
    );
}

#[tokio::test]
async fn preferences_reject_empty_or_non_object_bodies() {
    let app = build_router_with_content_store(test_store());

    for body in ["", "{}", "null"] {
        let rejected = send_json(
            app.clone(),
            Method::POST,
            "/api/preferences",
            Body::from(body),
            StatusCode::BAD_REQUEST,
        )
        .await;
        assert_eq!(rejected["error"], json!("No data provided"));
    }

    let array = send_json(
        app.clone(),
        Method::POST,
        "/api/preferences",
        Body::from(r#"["theme","dark"]"#),
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert_eq!(array["error"], json!("Preferences must be a JSON object"));

    let empty_key = send_json(
        app.clone(),
        Method::POST,
        "/api/preferences",
        Body::from(json!({"theme":"dark","":"x"}).to_string()),
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert_eq!(empty_key["error_code"], json!("validation_error"));

    let unchanged = send_json(
        app,
        Method::GET,
        "/api/preferences",
        Body::empty(),
        StatusCode::OK,
    )
    .await;
    assert_eq!(unchanged, json!({}));
}

async fn send_json(
    app: axum::Router,
    method: Method,
    uri: &str,
    body: Body,
    expected_status: StatusCode,
) -> Value {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body)
        .expect("request should build");

    let response = app
        .oneshot(request)
        .await
        .expect("router should return response");
    assert_eq!(response.status(), expected_status);

    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    serde_json::from_slice(body.as_ref()).expect("response should be valid JSON")
}

fn test_store() -> Arc<ContentStore> {
    let suffix = Uuid::new_v4().to_string();
    let root = std::env::temp_dir().join(format!("accessibridge_preferences_test_{suffix}"));
    let store = ContentStore::open(root.join("var/accessibility.db")).expect("store should open");
    store.initialize().expect("store should initialize");
    Arc::new(store)
}
