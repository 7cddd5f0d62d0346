use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::extract::State;
use serde::Serialize;
use serde_json::Value;

use crate::api::handler_utils::{internal_error, map_gateway_error, success, ApiObject};
use crate::api::server::AppState;
use crate::api::uploads::{read_upload_form, validate_upload, UploadLabel};
use crate::gateway::ExtractionMethod;

#[derive(Debug, Clone, Serialize)]
struct ExtractDocumentResponse {
    success: bool,
    text: String,
    method: ExtractionMethod,
}

pub async fn extract_document_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiObject<Value> {
    let mut form = match read_upload_form(multipart).await {
        Ok(form) => form,
        Err(response) => return response,
    };
    let upload = match validate_upload(form.take_file("document"), UploadLabel("document")) {
        Ok(upload) => upload,
        Err(response) => return response,
    };

    let gateway = state.gateway.clone();
    let result = tokio::task::spawn_blocking(move || {
        gateway.extract_document_text(upload.bytes, upload.extension.as_str())
    })
    .await;

    match result {
        Ok(Ok(extraction)) => success(ExtractDocumentResponse {
            success: true,
            text: extraction.text,
            method: extraction.method,
        }),
        Ok(Err(error)) => map_gateway_error(error),
        Err(join_error) => internal_error(format!("document extraction task failed: {join_error}")),
    }
}
