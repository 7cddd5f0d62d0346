use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use super::{GatewayError, GenerativeClient, InlinePayload};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Blocking client for the Gemini `generateContent` REST endpoint.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    api_key: String,
    model: String,
    endpoint: Url,
}

impl GeminiClient {
    pub fn new(api_key: &str, model: &str, api_base: &str) -> Result<Self, GatewayError> {
        let endpoint = generate_content_endpoint(api_base, model)?;
        Ok(Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            endpoint,
        })
    }

    pub fn model(&self) -> &str {
        self.model.as_str()
    }

    #[cfg(test)]
    fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl GenerativeClient for GeminiClient {
    fn generate(
        &self,
        prompt: &str,
        payload: Option<&InlinePayload>,
    ) -> Result<String, GatewayError> {
        let body = build_request(prompt, payload);
        debug!(
            model = %self.model,
            inline_bytes = payload.map_or(0, |p| p.data.len()),
            "sending generateContent request"
        );

        let client = Client::builder()
            .build()
            .map_err(|e| GatewayError::Upstream(format!("http client init failed: {e}")))?;
        let resp = client
            .post(self.endpoint.clone())
            .header(API_KEY_HEADER, self.api_key.as_str())
            .json(&body)
            .send()
            .map_err(|e| GatewayError::Upstream(format!("Gemini request failed: {e}")))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(GatewayError::Upstream(format!(
                "HTTP {}: {}",
                status.as_u16(),
                body
            )));
        }
        let payload: GenerateContentResponse = resp
            .json()
            .map_err(|e| GatewayError::Upstream(format!("Gemini JSON decode failed: {e}")))?;
        response_text(&payload)
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<RequestContent>,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RequestPart {
    Text {
        text: String,
    },
    #[serde(rename_all = "camelCase")]
    InlineData { inline_data: Blob },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Blob {
    mime_type: String,
    data: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<ResponseContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

fn generate_content_endpoint(api_base: &str, model: &str) -> Result<Url, GatewayError> {
    let model = model.trim();
    if model.is_empty() || model.contains('/') {
        return Err(GatewayError::Upstream(format!(
            "invalid Gemini model name '{model}'"
        )));
    }
    let base = Url::parse(api_base.trim())
        .map_err(|e| GatewayError::Upstream(format!("invalid Gemini API base '{api_base}': {e}")))?;
    base.join(format!("v1beta/models/{model}:generateContent").as_str())
        .map_err(|e| GatewayError::Upstream(format!("invalid Gemini endpoint: {e}")))
}

fn build_request(prompt: &str, payload: Option<&InlinePayload>) -> GenerateContentRequest {
    let mut parts = vec![RequestPart::Text {
        text: prompt.to_string(),
    }];
    if let Some(payload) = payload {
        parts.push(RequestPart::InlineData {
            inline_data: Blob {
                mime_type: payload.mime_type.clone(),
                data: BASE64_STANDARD.encode(payload.data.as_slice()),
            },
        });
    }
    GenerateContentRequest {
        contents: vec![RequestContent { parts }],
    }
}

fn response_text(payload: &GenerateContentResponse) -> Result<String, GatewayError> {
    let text = payload
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|part| part.text.as_deref())
                .collect::<String>()
        })
        .unwrap_or_default();
    if text.is_empty() {
        return Err(GatewayError::Upstream(format!(
            "Gemini returned no text ({})",
            diagnose(payload)
        )));
    }
    Ok(text)
}

fn diagnose(payload: &GenerateContentResponse) -> String {
    let mut diag = Vec::new();
    if let Some(reason) = payload
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.as_deref())
    {
        diag.push(format!("blockReason={reason}"));
    }
    match payload.candidates.first() {
        None => diag.push(String::from("no candidates")),
        Some(candidate) => {
            if let Some(reason) = candidate.finish_reason.as_deref() {
                diag.push(format!("finishReason={reason}"));
            }
            if candidate.content.is_none() {
                diag.push(String::from("candidate has no content"));
            }
        }
    }
    if diag.is_empty() {
        String::from("empty text parts")
    } else {
        diag.join(", ")
    }
}
