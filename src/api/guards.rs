use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::api::errors::ApiError;
use crate::core::state::AppState;

pub(crate) const API_KEY_HEADER: &str = "x-gemini-api-key";

/// Per-request Gemini key from the `X-Gemini-Api-Key` header. Absence is not
/// an error here; the grading client falls back to the configured key.
#[derive(Debug, Clone, Default)]
pub(crate) struct ApiKeyHeader(pub(crate) Option<String>);

impl ApiKeyHeader {
    pub(crate) fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

#[async_trait]
impl FromRequestParts<AppState> for ApiKeyHeader {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(API_KEY_HEADER) else {
            return Ok(ApiKeyHeader(None));
        };

        let value = value
            .to_str()
            .map_err(|_| ApiError::BadRequest("Invalid X-Gemini-Api-Key header".to_string()))?
            .trim();

        Ok(ApiKeyHeader((!value.is_empty()).then(|| value.to_string())))
    }
}
