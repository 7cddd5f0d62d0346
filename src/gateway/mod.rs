mod gemini;
pub mod prompts;

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

pub use gemini::GeminiClient;
pub use prompts::DescribeMode;

use prompts::{simplify_prompt, EXTRACTION_PROMPT};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Gemini API not configured. Please set GEMINI_API_KEY environment variable.")]
    Unavailable,

    #[error("Unsupported file type or Gemini not available")]
    UnsupportedInput,

    #[error("{0}")]
    Upstream(String),
}

/// Binary attachment sent next to a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlinePayload {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl InlinePayload {
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
        }
    }
}

/// One blocking prompt/response round-trip against a generative model.
pub trait GenerativeClient: Send + Sync + 'static {
    fn generate(
        &self,
        prompt: &str,
        payload: Option<&InlinePayload>,
    ) -> Result<String, GatewayError>;
}

pub type SharedGenerativeClient = Arc<dyn GenerativeClient>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
}

impl GatewayConfig {
    pub fn from_env() -> Self {
        let api_key = std::env::var("GEMINI_API_KEY").ok();
        let model = std::env::var("GEMINI_MODEL").ok();
        let api_base = std::env::var("GEMINI_API_BASE").ok();
        select_gateway_config(api_key.as_deref(), model.as_deref(), api_base.as_deref())
    }
}

fn select_gateway_config(
    api_key: Option<&str>,
    model: Option<&str>,
    api_base: Option<&str>,
) -> GatewayConfig {
    let non_empty = |value: Option<&str>| {
        value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };
    GatewayConfig {
        api_key: non_empty(api_key),
        model: non_empty(model).unwrap_or_else(|| String::from(DEFAULT_GEMINI_MODEL)),
        api_base: non_empty(api_base).unwrap_or_else(|| String::from(DEFAULT_GEMINI_API_BASE)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMethod {
    Direct,
    Gemini,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentExtraction {
    pub text: String,
    pub method: ExtractionMethod,
}

/// Entry point for every AI-backed operation.
///
/// Availability is fixed when the gateway is built; a gateway without a
/// client answers AI requests with [`GatewayError::Unavailable`].
#[derive(Clone, Default)]
pub struct AiGateway {
    client: Option<SharedGenerativeClient>,
}

impl AiGateway {
    pub fn from_config(config: &GatewayConfig) -> Self {
        let Some(api_key) = config.api_key.as_deref() else {
            warn!("GEMINI_API_KEY is not set; AI features are disabled");
            return Self::unavailable();
        };
        match GeminiClient::new(api_key, config.model.as_str(), config.api_base.as_str()) {
            Ok(client) => {
                info!(model = %client.model(), "Gemini gateway configured");
                Self::with_client(Arc::new(client))
            }
            Err(error) => {
                warn!(error = %error, "Gemini gateway configuration failed; AI features are disabled");
                Self::unavailable()
            }
        }
    }

    pub fn unavailable() -> Self {
        Self { client: None }
    }

    pub fn with_client(client: SharedGenerativeClient) -> Self {
        Self {
            client: Some(client),
        }
    }

    pub fn is_available(&self) -> bool {
        self.client.is_some()
    }

    pub fn describe_image(
        &self,
        bytes: Vec<u8>,
        mime_type: Option<&str>,
        mode: DescribeMode,
    ) -> Result<String, GatewayError> {
        let client = self.client()?;
        let mime_type = mime_type
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_IMAGE_MIME);
        let payload = InlinePayload::new(mime_type, bytes);
        client.generate(mode.prompt(), Some(&payload))
    }

    /// Plain-text files are decoded locally; PDFs and common image types go
    /// through the model when it is configured.
    pub fn extract_document_text(
        &self,
        bytes: Vec<u8>,
        extension: &str,
    ) -> Result<DocumentExtraction, GatewayError> {
        let extension = extension.to_ascii_lowercase();
        if extension == "txt" {
            return Ok(DocumentExtraction {
                text: decode_text(bytes),
                method: ExtractionMethod::Direct,
            });
        }

        let mime_type = match extension.as_str() {
            "pdf" => String::from("application/pdf"),
            "png" | "jpg" | "jpeg" => format!("image/{extension}"),
            _ => return Err(GatewayError::UnsupportedInput),
        };
        let Some(client) = self.client.as_ref() else {
            return Err(GatewayError::UnsupportedInput);
        };
        let payload = InlinePayload::new(mime_type, bytes);
        let text = client.generate(EXTRACTION_PROMPT, Some(&payload))?;
        Ok(DocumentExtraction {
            text,
            method: ExtractionMethod::Gemini,
        })
    }

    pub fn simplify_text(&self, text: &str) -> Result<String, GatewayError> {
        let client = self.client()?;
        client.generate(simplify_prompt(text).as_str(), None)
    }

    fn client(&self) -> Result<&SharedGenerativeClient, GatewayError> {
        self.client.as_ref().ok_or(GatewayError::Unavailable)
    }
}

/// UTF-8 first, Latin-1 when the bytes are not valid UTF-8.
fn decode_text(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(error) => error.into_bytes().into_iter().map(char::from).collect(),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Mutex;

    use super::{GatewayError, GenerativeClient, InlinePayload};

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct RecordedCall {
        pub prompt: String,
        pub payload: Option<InlinePayload>,
    }

    #[derive(Debug, Default)]
    pub struct RecordingClient {
        pub reply: Option<String>,
        pub calls: Mutex<Vec<RecordedCall>>,
    }

    impl RecordingClient {
        pub fn replying(reply: &str) -> Self {
            Self {
                reply: Some(reply.to_string()),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().expect("calls lock poisoned").clone()
        }
    }

    impl GenerativeClient for RecordingClient {
        fn generate(
            &self,
            prompt: &str,
            payload: Option<&InlinePayload>,
        ) -> Result<String, GatewayError> {
            self.calls
                .lock()
                .expect("calls lock poisoned")
                .push(RecordedCall {
                    prompt: prompt.to_string(),
                    payload: payload.cloned(),
                });
            self.reply
                .clone()
                .ok_or_else(|| GatewayError::Upstream(String::from("model exploded")))
        }
    }
}
