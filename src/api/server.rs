use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post, MethodRouter};
use axum::{Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::api::routes::{route_catalog, HttpMethod, RouteDefinition};
use crate::db::content::{ContentRepoError, ContentStore};
use crate::db::resolve_db_config;
use crate::gateway::{AiGateway, GatewayConfig};

pub const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub service_name: &'static str,
    pub service_version: &'static str,
    pub started_unix_ms: u128,
    pub route_count: usize,
    pub content_store: Arc<ContentStore>,
    pub gateway: AiGateway,
}

impl AppState {
    pub fn new(route_count: usize, content_store: Arc<ContentStore>, gateway: AiGateway) -> Self {
        Self {
            service_name: "accessibridge-backend",
            service_version: env!("CARGO_PKG_VERSION"),
            started_unix_ms: now_unix_ms(),
            route_count,
            content_store,
            gateway,
        }
    }
}

/// Opens the store from `ACCESSIBRIDGE_DB` and configures the gateway from
/// the `GEMINI_*` variables.
pub fn build_router() -> Result<Router, ContentRepoError> {
    let working_dir = std::env::current_dir().map_err(|e| {
        ContentRepoError::Internal(format!("could not resolve working directory: {e}"))
    })?;
    let db_config = resolve_db_config(working_dir.as_path());
    let content_store = Arc::new(ContentStore::open(db_config.app_db_path)?);
    content_store.initialize()?;
    info!(db = %content_store.db_path().display(), "content store ready");

    let gateway = AiGateway::from_config(&GatewayConfig::from_env());
    Ok(build_router_with_state(content_store, gateway))
}

pub fn build_router_with_content_store(content_store: Arc<ContentStore>) -> Router {
    build_router_with_state(content_store, AiGateway::unavailable())
}

pub fn build_router_with_state(content_store: Arc<ContentStore>, gateway: AiGateway) -> Router {
    let catalog = route_catalog();
    let state = AppState::new(catalog.len(), content_store, gateway);
    build_router_with_catalog(catalog, state)
}

fn build_router_with_catalog(catalog: Vec<RouteDefinition>, state: AppState) -> Router {
    let mut router = Router::new();

    for route in catalog {
        let Some(method_router) = method_router_for(&route) else {
            warn!(route = %route.spec, handler_id = %route.handler_id, "route has no handler; skipping");
            continue;
        };
        router = router.route(route.spec.path, method_router);
    }

    router
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, app: Router) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(bind = %addr, "starting accessibridge HTTP surface");
    axum::serve(listener, app).await
}

fn method_router_for(route: &RouteDefinition) -> Option<MethodRouter<AppState>> {
    use crate::api::{conversation, describe, documents, pages, preferences, records, texts};

    let method_router = match (route.spec.method, route.spec.path) {
        (HttpMethod::Get, "/health") => get(health_handler),
        (HttpMethod::Get, "/") => get(pages::index_page),
        (HttpMethod::Get, "/image-describer") => get(pages::image_describer_page),
        (HttpMethod::Get, "/speech-to-text") => get(pages::speech_to_text_page),
        (HttpMethod::Get, "/text-to-speech") => get(pages::text_to_speech_page),
        (HttpMethod::Get, "/communication-bridge") => get(pages::communication_bridge_page),
        (HttpMethod::Get, "/document-reader") => get(pages::document_reader_page),
        (HttpMethod::Get, "/saved-content") => get(pages::saved_content_page),
        (HttpMethod::Post, "/api/describe-image") => post(describe::describe_image_handler),
        (HttpMethod::Post, "/api/extract-document") => {
            post(documents::extract_document_handler)
        }
        (HttpMethod::Post, "/api/simplify-text") => post(texts::simplify_text_handler),
        (HttpMethod::Post, "/api/save-transcription") => {
            post(texts::save_transcription_handler)
        }
        (HttpMethod::Post, "/api/save-text") => post(texts::save_text_handler),
        (HttpMethod::Post, "/api/conversation") => {
            post(conversation::append_conversation_handler)
        }
        (HttpMethod::Get, "/api/conversation/{session_id}") => {
            get(conversation::conversation_history_handler)
        }
        (HttpMethod::Get, "/api/preferences") => get(preferences::get_preferences_handler),
        (HttpMethod::Post, "/api/preferences") => post(preferences::save_preferences_handler),
        (HttpMethod::Get, "/api/saved-content") => get(records::saved_content_handler),
        (HttpMethod::Delete, "/api/delete/{table}/{id}") => {
            delete(records::delete_record_handler)
        }
        _ => return None,
    };
    Some(method_router)
}

async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "status": "ok",
            "service": state.service_name,
            "version": state.service_version,
            "started_unix_ms": state.started_unix_ms,
            "route_count": state.route_count,
            "gemini_available": state.gateway.is_available(),
        })),
    )
}

fn now_unix_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_millis())
}
