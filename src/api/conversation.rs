use axum::body::Bytes;
use axum::extract::{Path, State};
use serde::Serialize;
use serde_json::Value;

use crate::api::handler_utils::{
    decode_json_body, internal_error, map_repo_error, success, validation_error, ApiObject,
};
use crate::api::server::AppState;
use crate::db::content::{AppendConversationInput, ConversationTurnRecord};

const HISTORY_LIMIT: usize = 200;

#[derive(Debug, Clone, Serialize)]
struct AppendResponse {
    success: bool,
    id: i64,
}

#[derive(Debug, Clone, Serialize)]
struct HistoryResponse {
    success: bool,
    session_id: String,
    count: usize,
    messages: Vec<ConversationTurnRecord>,
}

pub async fn append_conversation_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiObject<Value> {
    let fields = match decode_json_body::<Value>(&body) {
        Ok(Some(Value::Object(map))) if !map.is_empty() => map,
        Ok(_) => return validation_error("No data provided"),
        Err(response) => return response,
    };
    let input = match serde_json::from_value::<AppendConversationInput>(Value::Object(fields)) {
        Ok(input) => input,
        Err(error) => return validation_error(format!("Invalid JSON body: {error}")),
    };

    let store = state.content_store.clone();
    let result = tokio::task::spawn_blocking(move || store.append_conversation_turn(input)).await;

    match result {
        Ok(Ok(id)) => success(AppendResponse { success: true, id }),
        Ok(Err(error)) => map_repo_error(error),
        Err(join_error) => internal_error(format!("conversation append task failed: {join_error}")),
    }
}

pub async fn conversation_history_handler(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> ApiObject<Value> {
    let store = state.content_store.clone();
    let lookup_id = session_id.clone();
    let result = tokio::task::spawn_blocking(move || {
        store.conversation_turns(lookup_id.as_str(), HISTORY_LIMIT)
    })
    .await;

    match result {
        Ok(Ok(messages)) => success(HistoryResponse {
            success: true,
            session_id,
            count: messages.len(),
            messages,
        }),
        Ok(Err(error)) => map_repo_error(error),
        Err(join_error) => {
            internal_error(format!("conversation history task failed: {join_error}"))
        }
    }
}
