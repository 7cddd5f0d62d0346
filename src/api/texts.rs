use axum::body::Bytes;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::handler_utils::{
    decode_json_body, internal_error, map_gateway_error, map_repo_error, success,
    validation_error, ApiObject,
};
use crate::api::server::AppState;
use crate::db::content::{SaveTextInput, SaveTranscriptionInput};
use crate::gateway::GatewayError;

#[derive(Debug, Clone, Default, Deserialize)]
struct SimplifyTextInput {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Clone, Serialize)]
struct SimplifyTextResponse {
    success: bool,
    simplified: String,
}

#[derive(Debug, Clone, Serialize)]
struct SavedResponse {
    success: bool,
    id: i64,
}

pub async fn simplify_text_handler(State(state): State<AppState>, body: Bytes) -> ApiObject<Value> {
    if !state.gateway.is_available() {
        return map_gateway_error(GatewayError::Unavailable);
    }
    let input = match decode_json_body::<SimplifyTextInput>(&body) {
        Ok(Some(input)) if !input.text.trim().is_empty() => input,
        Ok(_) => return validation_error("No text provided"),
        Err(response) => return response,
    };

    let gateway = state.gateway.clone();
    let result =
        tokio::task::spawn_blocking(move || gateway.simplify_text(input.text.as_str())).await;

    match result {
        Ok(Ok(simplified)) => success(SimplifyTextResponse {
            success: true,
            simplified,
        }),
        Ok(Err(error)) => map_gateway_error(error),
        Err(join_error) => internal_error(format!("text simplification task failed: {join_error}")),
    }
}

pub async fn save_transcription_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiObject<Value> {
    let input = match decode_json_body::<SaveTranscriptionInput>(&body) {
        Ok(Some(input)) => input,
        Ok(None) => return validation_error("No text provided"),
        Err(response) => return response,
    };

    let store = state.content_store.clone();
    let result = tokio::task::spawn_blocking(move || store.insert_transcription(input)).await;

    match result {
        Ok(Ok(id)) => success(SavedResponse { success: true, id }),
        Ok(Err(error)) => map_repo_error(error),
        Err(join_error) => internal_error(format!("transcription save task failed: {join_error}")),
    }
}

pub async fn save_text_handler(State(state): State<AppState>, body: Bytes) -> ApiObject<Value> {
    let input = match decode_json_body::<SaveTextInput>(&body) {
        Ok(Some(input)) => input,
        Ok(None) => return validation_error("No content provided"),
        Err(response) => return response,
    };

    let store = state.content_store.clone();
    let result = tokio::task::spawn_blocking(move || store.insert_saved_text(input)).await;

    match result {
        Ok(Ok(id)) => success(SavedResponse { success: true, id }),
        Ok(Err(error)) => map_repo_error(error),
        Err(join_error) => internal_error(format!("text save task failed: {join_error}")),
    }
}
