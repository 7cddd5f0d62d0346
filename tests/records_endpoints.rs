use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use accessibridge_backend::api::server::build_router_with_content_store;
use accessibridge_backend::db::content::ContentStore;

#[tokio::test]
async fn delete_removes_a_single_record_and_repeats_harmlessly() {
    let store = test_store();
    let kept = store
        .insert_image_description("kept.png", "A kitchen table.")
        .expect("description should insert");
    let doomed = store
        .insert_image_description("doomed.png", "A parked car.")
        .expect("description should insert");
    let app = build_router_with_content_store(store.clone());

    let first = send_json(
        app.clone(),
        Method::DELETE,
        &format!("/api/delete/image_descriptions/{doomed}"),
        Body::empty(),
        StatusCode::OK,
    )
    .await;
    assert_eq!(first, json!({"success": true, "deleted": 1}));

    let again = send_json(
        app.clone(),
        Method::DELETE,
        &format!("/api/delete/image_descriptions/{doomed}"),
        Body::empty(),
        StatusCode::OK,
    )
    .await;
    assert_eq!(again, json!({"success": true, "deleted": 0}));

    let saved = send_json(
        app,
        Method::GET,
        "/api/saved-content",
        Body::empty(),
        StatusCode::OK,
    )
    .await;
    assert_eq!(saved["descriptions"].as_array().map(Vec::len), Some(1));
    assert_eq!(saved["descriptions"][0]["id"], json!(kept));
}

#[tokio::test]
async fn delete_refuses_tables_outside_the_allow_list() {
    let store = test_store();
    store
        .upsert_preference("theme", "dark")
        .expect("preference should save");
    let app = build_router_with_content_store(store.clone());

    let _saved = send_json(
        app.clone(),
        Method::POST,
        "/api/save-text",
        Body::from(json!({"content":"keep me"}).to_string()),
        StatusCode::OK,
    )
    .await;

    for table in ["users", "user_preferences", "conversation_history"] {
        let rejected = send_json(
            app.clone(),
            Method::DELETE,
            &format!("/api/delete/{table}/1"),
            Body::empty(),
            StatusCode::BAD_REQUEST,
        )
        .await;
        assert_eq!(rejected["success"], json!(false));
        assert_eq!(rejected["error"], json!("Invalid table"));
        assert_eq!(rejected["error_kind"], json!("validation"));
    }

    let preferences = store.list_preferences().expect("preferences should list");
    assert_eq!(preferences.get("theme").map(String::as_str), Some("dark"));
    assert_eq!(
        store
            .recent_saved_texts(10)
            .expect("saved texts should list")
            .len(),
        1
    );
}

#[tokio::test]
async fn delete_rejects_non_numeric_ids() {
    let app = build_router_with_content_store(test_store());

    let rejected = send_json(
        app,
        Method::DELETE,
        "/api/delete/saved_texts/abc",
        Body::empty(),
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert_eq!(rejected["error"], json!("Invalid id"));
}

#[tokio::test]
async fn saved_content_starts_empty_and_groups_each_kind() {
    let store = test_store();
    let app = build_router_with_content_store(store.clone());

    let empty = send_json(
        app.clone(),
        Method::GET,
        "/api/saved-content",
        Body::empty(),
        StatusCode::OK,
    )
    .await;
    assert_eq!(
        empty,
        json!({"success": true, "descriptions": [], "transcriptions": [], "saved_texts": []})
    );

    store
        .insert_image_description("sign.png", "A yield sign.")
        .expect("description should insert");
    let _transcription = send_json(
        app.clone(),
        Method::POST,
        "/api/save-transcription",
        Body::from(json!({"text":"hello there"}).to_string()),
        StatusCode::OK,
    )
    .await;

    let listing = send_json(
        app,
        Method::GET,
        "/api/saved-content",
        Body::empty(),
        StatusCode::OK,
    )
    .await;
    assert_eq!(listing["descriptions"][0]["filename"], json!("sign.png"));
    assert_eq!(listing["transcriptions"][0]["source"], json!("speech"));
    assert_eq!(listing["saved_texts"], json!([]));
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
    let root = std::env::temp_dir().join(format!("accessibridge_records_test_{suffix}"));
    let store = ContentStore::open(root.join("var/accessibility.db")).expect("store should open");
    store.initialize().expect("store should initialize");
    Arc::new(store)
}
