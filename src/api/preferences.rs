use axum::body::Bytes;
use axum::extract::State;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::api::handler_utils::{
    decode_json_body, internal_error, map_repo_error, success, validation_error, ApiObject,
};
use crate::api::server::AppState;
use crate::db::content::preference_value_to_text;

#[derive(Debug, Clone, Serialize)]
struct SavedPreferencesResponse {
    success: bool,
    count: usize,
}

/// Returns the bare key→value object.
pub async fn get_preferences_handler(State(state): State<AppState>) -> ApiObject<Value> {
    let store = state.content_store.clone();
    let result = tokio::task::spawn_blocking(move || store.list_preferences()).await;

    match result {
        Ok(Ok(preferences)) => success(preferences),
        Ok(Err(error)) => map_repo_error(error),
        Err(join_error) => internal_error(format!("preference listing task failed: {join_error}")),
    }
}

pub async fn save_preferences_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiObject<Value> {
    let entries = match decode_json_body::<Value>(&body) {
        Ok(Some(Value::Object(map))) if !map.is_empty() => stringify_entries(map),
        Ok(Some(Value::Object(_)) | None) => return validation_error("No data provided"),
        Ok(Some(_)) => return validation_error("Preferences must be a JSON object"),
        Err(response) => return response,
    };
    let count = entries.len();

    let store = state.content_store.clone();
    let result = tokio::task::spawn_blocking(move || store.upsert_preferences(entries)).await;

    match result {
        Ok(Ok(())) => success(SavedPreferencesResponse {
            success: true,
            count,
        }),
        Ok(Err(error)) => map_repo_error(error),
        Err(join_error) => internal_error(format!("preference save task failed: {join_error}")),
    }
}

fn stringify_entries(map: Map<String, Value>) -> Vec<(String, String)> {
    map.into_iter()
        .map(|(key, value)| {
            let text = preference_value_to_text(&value);
            (key, text)
        })
        .collect()
}
