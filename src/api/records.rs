use axum::extract::{Path, State};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::api::handler_utils::{
    internal_error, map_repo_error, success, validation_error, ApiObject,
};
use crate::api::server::AppState;
use crate::db::content::{
    DeletableRecord, ImageDescriptionRecord, SavedTextRecord, TranscriptionRecord, RECENT_LIMIT,
};

#[derive(Debug, Clone, Serialize)]
struct DeleteResponse {
    success: bool,
    deleted: usize,
}

#[derive(Debug, Clone, Serialize)]
struct SavedContentResponse {
    success: bool,
    descriptions: Vec<ImageDescriptionRecord>,
    transcriptions: Vec<TranscriptionRecord>,
    saved_texts: Vec<SavedTextRecord>,
}

/// Table names outside [`DeletableRecord`] are refused before the store is
/// touched.
pub async fn delete_record_handler(
    State(state): State<AppState>,
    Path((table, id)): Path<(String, String)>,
) -> ApiObject<Value> {
    let kind = match table.parse::<DeletableRecord>() {
        Ok(kind) => kind,
        Err(error) => return map_repo_error(error),
    };
    let Ok(id) = id.parse::<i64>() else {
        return validation_error("Invalid id");
    };

    let store = state.content_store.clone();
    let result = tokio::task::spawn_blocking(move || store.delete_record(kind, id)).await;

    match result {
        Ok(Ok(deleted)) => {
            info!(table = %kind, id, deleted, "record delete processed");
            success(DeleteResponse {
                success: true,
                deleted,
            })
        }
        Ok(Err(error)) => map_repo_error(error),
        Err(join_error) => internal_error(format!("record delete task failed: {join_error}")),
    }
}

pub async fn saved_content_handler(State(state): State<AppState>) -> ApiObject<Value> {
    let store = state.content_store.clone();
    let result = tokio::task::spawn_blocking(move || {
        Ok::<_, crate::db::content::ContentRepoError>(SavedContentResponse {
            success: true,
            descriptions: store.recent_image_descriptions(RECENT_LIMIT)?,
            transcriptions: store.recent_transcriptions(RECENT_LIMIT)?,
            saved_texts: store.recent_saved_texts(RECENT_LIMIT)?,
        })
    })
    .await;

    match result {
        Ok(Ok(payload)) => success(payload),
        Ok(Err(error)) => map_repo_error(error),
        Err(join_error) => internal_error(format!("saved content task failed: {join_error}")),
    }
}
