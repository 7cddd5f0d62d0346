use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use accessibridge_backend::api::pages::Page;
use accessibridge_backend::api::server::build_router_with_content_store;
use accessibridge_backend::db::content::ContentStore;

#[tokio::test]
async fn every_page_is_served_as_html() {
    let app = build_router_with_content_store(test_store());

    for page in Page::ALL {
        let request = Request::builder()
            .method(Method::GET)
            .uri(page.path())
            .body(Body::empty())
            .expect("request should build");
        let response = app
            .clone()
            .oneshot(request)
            .await
            .expect("router should return response");
        assert_eq!(response.status(), StatusCode::OK, "{} failed", page.path());
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(content_type.starts_with("text/html"));

        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        let html = String::from_utf8(body.to_vec()).expect("page should be UTF-8");
        assert!(html.contains(page.title()));
        assert!(html.contains(r#"data-gemini-available="false""#));
    }
}

#[tokio::test]
async fn health_reports_service_and_gateway_state() {
    let app = build_router_with_content_store(test_store());

    let health = send_json(app, Method::GET, "/health", Body::empty(), StatusCode::OK).await;
    assert_eq!(health["status"], json!("ok"));
    assert_eq!(health["service"], json!("accessibridge-backend"));
    assert_eq!(health["gemini_available"], json!(false));
    assert_eq!(health["route_count"], json!(19));
}

#[tokio::test]
async fn unknown_routes_are_not_found() {
    let app = build_router_with_content_store(test_store());

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/unknown")
        .body(Body::empty())
        .expect("request should build");
    let response = app
        .oneshot(request)
        .await
        .expect("router should return response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
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
    let root = std::env::temp_dir().join(format!("accessibridge_pages_test_{suffix}"));
    let store = ContentStore::open(root.join("var/accessibility.db")).expect("store should open");
    store.initialize().expect("store should initialize");
    Arc::new(store)
}
