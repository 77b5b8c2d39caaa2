use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::Client;
use serde_json::{json, Value};

use super::GradingError;

const MODELS_PAGE_SIZE: u32 = 1000;
const MAX_MODEL_PAGES: usize = 20;

#[derive(Debug, Clone)]
pub(crate) enum Part {
    Text(String),
    InlineImage { mime_type: String, data: Vec<u8> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ModelInfo {
    pub(crate) name: String,
    pub(crate) supported_generation_methods: Vec<String>,
}

/// The remote generative model. One call per request; implementations keep
/// no state between calls.
#[async_trait]
pub(crate) trait ModelBackend: Send + Sync {
    async fn generate_content(
        &self,
        api_key: &str,
        model: &str,
        parts: Vec<Part>,
    ) -> Result<String, GradingError>;

    async fn list_models(&self, api_key: &str) -> Result<Vec<ModelInfo>, GradingError>;
}

#[derive(Debug, Clone)]
pub(crate) struct GeminiBackend {
    client: Client,
    base_url: String,
}

impl GeminiBackend {
    pub(crate) fn new(base_url: &str, request_timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .timeout(request_timeout)
            .build()
            .context("Failed to build Gemini HTTP client")?;

        Ok(Self { client, base_url: base_url.trim_end_matches('/').to_string() })
    }
}

#[async_trait]
impl ModelBackend for GeminiBackend {
    async fn generate_content(
        &self,
        api_key: &str,
        model: &str,
        parts: Vec<Part>,
    ) -> Result<String, GradingError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model_id(model));
        let payload = json!({
            "contents": [{
                "role": "user",
                "parts": parts.iter().map(part_to_json).collect::<Vec<_>>()
            }]
        });

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|err| GradingError::Transport(err.to_string()))?;

        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);
        if !status.is_success() {
            return Err(GradingError::Upstream {
                status: status.as_u16(),
                message: extract_error_message(&body),
            });
        }

        extract_reply_text(&body).ok_or(GradingError::EmptyReply)
    }

    async fn list_models(&self, api_key: &str) -> Result<Vec<ModelInfo>, GradingError> {
        let url = format!("{}/models", self.base_url);
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        for _ in 0..MAX_MODEL_PAGES {
            let mut request = self
                .client
                .get(&url)
                .header("x-goog-api-key", api_key)
                .query(&[("pageSize", MODELS_PAGE_SIZE.to_string())]);
            if let Some(token) = page_token.as_deref() {
                request = request.query(&[("pageToken", token)]);
            }

            let response =
                request.send().await.map_err(|err| GradingError::Transport(err.to_string()))?;
            let status = response.status();
            let body: Value = response.json().await.unwrap_or(Value::Null);
            if !status.is_success() {
                return Err(GradingError::Upstream {
                    status: status.as_u16(),
                    message: extract_error_message(&body),
                });
            }

            models.extend(parse_model_page(&body));

            page_token = body
                .get("nextPageToken")
                .and_then(Value::as_str)
                .filter(|token| !token.is_empty())
                .map(str::to_string);
            if page_token.is_none() {
                break;
            }
        }

        Ok(models)
    }
}

/// Model names from the listing endpoint carry a `models/` prefix; the
/// generate endpoint wants the bare id.
fn model_id(model: &str) -> &str {
    model.strip_prefix("models/").unwrap_or(model)
}

fn part_to_json(part: &Part) -> Value {
    match part {
        Part::Text(text) => json!({ "text": text }),
        Part::InlineImage { mime_type, data } => json!({
            "inline_data": {
                "mime_type": mime_type,
                "data": STANDARD.encode(data)
            }
        }),
    }
}

fn extract_reply_text(body: &Value) -> Option<String> {
    let parts = body
        .get("candidates")
        .and_then(|candidates| candidates.get(0))
        .and_then(|candidate| candidate.get("content"))
        .and_then(|content| content.get("parts"))
        .and_then(Value::as_array)?;

    let text = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect::<Vec<_>>()
        .join("");

    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

fn parse_model_page(body: &Value) -> Vec<ModelInfo> {
    body.get("models")
        .and_then(Value::as_array)
        .map(|models| {
            models
                .iter()
                .filter_map(|model| {
                    let name = model.get("name").and_then(Value::as_str)?.to_string();
                    let supported_generation_methods = model
                        .get("supportedGenerationMethods")
                        .and_then(Value::as_array)
                        .map(|methods| {
                            methods
                                .iter()
                                .filter_map(Value::as_str)
                                .map(str::to_string)
                                .collect()
                        })
                        .unwrap_or_default();
                    Some(ModelInfo { name, supported_generation_methods })
                })
                .collect()
        })
        .unwrap_or_default()
}

fn extract_error_message(body: &Value) -> String {
    body.get("error")
        .and_then(|error| error.get("message"))
        .and_then(Value::as_str)
        .or_else(|| body.get("message").and_then(Value::as_str))
        .unwrap_or("unknown_error")
        .to_string()
}
