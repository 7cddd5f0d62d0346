use axum::extract::multipart::{Multipart, MultipartRejection};
use serde_json::Value;

use crate::api::handler_utils::{validation_error, ApiObject};

pub const ALLOWED_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "webp", "pdf", "txt", "doc", "docx",
];

const FALLBACK_FILENAME: &str = "upload";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub field: String,
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Buffered multipart body: file parts plus plain text fields.
#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    files: Vec<UploadedFile>,
    fields: Vec<(String, String)>,
}

impl UploadForm {
    pub fn take_file(&mut self, field: &str) -> Option<UploadedFile> {
        let index = self.files.iter().position(|file| file.field == field)?;
        Some(self.files.swap_remove(index))
    }

    pub fn text(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value.as_str())
    }
}

/// An upload that passed the filename and extension checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUpload {
    pub filename: String,
    pub extension: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Labels used in the client-facing messages, e.g. "No image provided".
#[derive(Debug, Clone, Copy)]
pub struct UploadLabel(pub &'static str);

pub async fn read_upload_form(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<UploadForm, ApiObject<Value>> {
    let mut multipart = multipart.map_err(|rejection| validation_error(rejection.body_text()))?;
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| validation_error(format!("Multipart read error: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match field.file_name().map(str::to_string) {
            Some(filename) => {
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| validation_error(format!("Failed to read upload body: {e}")))?;
                form.files.push(UploadedFile {
                    field: name,
                    filename,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            None => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| validation_error(format!("Failed to read form field: {e}")))?;
                form.fields.push((name, value));
            }
        }
    }

    Ok(form)
}

pub fn validate_upload(
    file: Option<UploadedFile>,
    label: UploadLabel,
) -> Result<ValidatedUpload, ApiObject<Value>> {
    let UploadLabel(label) = label;
    let file = file.ok_or_else(|| validation_error(format!("No {label} provided")))?;
    if file.filename.trim().is_empty() {
        return Err(validation_error(format!("No {label} selected")));
    }
    let extension = allowed_extension(file.filename.as_str())
        .ok_or_else(|| validation_error("Invalid file type"))?;

    Ok(ValidatedUpload {
        filename: secure_filename(file.filename.as_str()),
        extension,
        content_type: file.content_type,
        bytes: file.bytes,
    })
}

/// Lower-cased extension when it is on the allow-list.
pub fn allowed_extension(filename: &str) -> Option<String> {
    let (_, extension) = filename.rsplit_once('.')?;
    let extension = extension.to_ascii_lowercase();
    ALLOWED_EXTENSIONS
        .contains(&extension.as_str())
        .then_some(extension)
}

/// Reduces a client-supplied name to a plain ASCII basename.
pub fn secure_filename(filename: &str) -> String {
    let basename = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();
    let cleaned = basename
        .chars()
        .filter_map(|ch| {
            if ch.is_whitespace() {
                Some('_')
            } else if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '_') {
                Some(ch)
            } else {
                None
            }
        })
        .collect::<String>();
    let trimmed = cleaned.trim_matches(['.', '_']);
    if trimmed.is_empty() {
        String::from(FALLBACK_FILENAME)
    } else {
        trimmed.to_string()
    }
}
