use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::extract::State;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::api::handler_utils::{
    internal_error, map_gateway_error, map_repo_error, success, ApiObject,
};
use crate::api::server::AppState;
use crate::api::uploads::{read_upload_form, validate_upload, UploadLabel};
use crate::gateway::{DescribeMode, GatewayError};

#[derive(Debug, Clone, Serialize)]
struct DescribeImageResponse {
    success: bool,
    id: i64,
    description: String,
    mode: String,
}

pub async fn describe_image_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiObject<Value> {
    if !state.gateway.is_available() {
        return map_gateway_error(GatewayError::Unavailable);
    }

    let mut form = match read_upload_form(multipart).await {
        Ok(form) => form,
        Err(response) => return response,
    };
    let upload = match validate_upload(form.take_file("image"), UploadLabel("image")) {
        Ok(upload) => upload,
        Err(response) => return response,
    };
    let requested_mode = form.text("mode").map(str::to_string);
    let mode = DescribeMode::from_request(requested_mode.as_deref());
    let echoed_mode = requested_mode.unwrap_or_else(|| mode.as_str().to_string());

    let gateway = state.gateway.clone();
    let store = state.content_store.clone();
    let result = tokio::task::spawn_blocking(move || {
        let description = gateway
            .describe_image(upload.bytes, upload.content_type.as_deref(), mode)
            .map_err(map_gateway_error)?;
        let id = store
            .insert_image_description(upload.filename.as_str(), description.as_str())
            .map_err(map_repo_error)?;
        info!(id, filename = %upload.filename, mode = %mode, "image described");
        Ok::<_, ApiObject<Value>>((id, description))
    })
    .await;

    match result {
        Ok(Ok((id, description))) => success(DescribeImageResponse {
            success: true,
            id,
            description,
            mode: echoed_mode,
        }),
        Ok(Err(response)) => response,
        Err(join_error) => internal_error(format!("image description task failed: {join_error}")),
    }
}
