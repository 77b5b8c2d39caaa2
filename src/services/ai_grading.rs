mod backend;
mod prompt;
mod reply;

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::core::config::Settings;
use crate::core::metrics;
use crate::schemas::grading::{GradingResult, Language, Strictness};

pub(crate) use backend::{GeminiBackend, ModelBackend, ModelInfo, Part};
use reply::parse_grading_reply;

pub(crate) const STUDY_PLAN_FALLBACK: &str = "Could not generate study plan.";
pub(crate) const DEFAULT_STUDENT_LEVEL: &str = "High School";
const GENERATE_CONTENT_METHOD: &str = "generateContent";

#[derive(Debug, thiserror::Error)]
pub(crate) enum GradingError {
    #[error("Gemini API key is required")]
    MissingCredential,
    #[error("Failed to reach the model API: {0}")]
    Transport(String),
    #[error("Model API returned {status}: {message}")]
    Upstream { status: u16, message: String },
    #[error("Model reply contained no text")]
    EmptyReply,
    #[error("Model reply contained no JSON object")]
    NoJson,
    #[error("Model reply is not valid JSON: {0}")]
    Parse(String),
    #[error("Model reply does not match the grading schema: {0}")]
    Schema(String),
}

impl GradingError {
    fn metric_label(&self) -> &'static str {
        match self {
            Self::MissingCredential => "missing_credential",
            Self::Transport(_) | Self::Upstream { .. } => "upstream_error",
            Self::EmptyReply | Self::NoJson | Self::Parse(_) | Self::Schema(_) => "invalid_reply",
        }
    }
}

/// The key and model one request runs against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ModelSelection {
    pub(crate) api_key: String,
    pub(crate) model: String,
}

#[derive(Debug, Clone)]
pub(crate) struct GradeRequest {
    pub(crate) image: Vec<u8>,
    pub(crate) mime_type: String,
    pub(crate) question_paper_text: String,
    pub(crate) answer_key_text: String,
    pub(crate) max_marks: i64,
    pub(crate) student_name: String,
    pub(crate) student_level: String,
    pub(crate) strictness: Strictness,
    pub(crate) language: Language,
}

#[derive(Clone)]
pub(crate) struct GradingClient {
    backend: Arc<dyn ModelBackend>,
    default_api_key: String,
    default_model: String,
}

impl GradingClient {
    pub(crate) fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let backend = GeminiBackend::new(
            &settings.ai().base_url,
            Duration::from_secs(settings.ai().request_timeout),
        )?;
        Ok(Self::with_backend(Arc::new(backend), settings))
    }

    pub(crate) fn with_backend(backend: Arc<dyn ModelBackend>, settings: &Settings) -> Self {
        Self {
            backend,
            default_api_key: settings.ai().api_key.clone(),
            default_model: settings.ai().model.clone(),
        }
    }

    /// Picks the per-request key and model, falling back to the configured
    /// defaults. An empty key on both sides is rejected before any call.
    pub(crate) fn select(
        &self,
        api_key: Option<&str>,
        model: Option<&str>,
    ) -> Result<ModelSelection, GradingError> {
        let api_key = api_key
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(self.default_api_key.trim());
        if api_key.is_empty() {
            return Err(GradingError::MissingCredential);
        }

        let model = model
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(&self.default_model);

        Ok(ModelSelection { api_key: api_key.to_string(), model: model.to_string() })
    }

    pub(crate) async fn grade(
        &self,
        selection: &ModelSelection,
        request: GradeRequest,
    ) -> Result<GradingResult, GradingError> {
        let timer = Instant::now();
        let instruction = prompt::grading_prompt(&request);

        tracing::info!(
            student_name = %request.student_name,
            model = %selection.model,
            strictness = request.strictness.as_str(),
            language = request.language.as_str(),
            image_bytes = request.image.len(),
            "Sending grading request"
        );

        let parts = vec![
            Part::Text(instruction),
            Part::InlineImage { mime_type: request.mime_type, data: request.image },
        ];

        let outcome = match self
            .backend
            .generate_content(&selection.api_key, &selection.model, parts)
            .await
        {
            Ok(text) => parse_grading_reply(&text),
            Err(err) => Err(err),
        };

        let elapsed = timer.elapsed().as_secs_f64();
        match &outcome {
            Ok(result) => {
                metrics::record_grading("success", elapsed);
                tracing::info!(
                    student_name = %request.student_name,
                    total_score_obtained = result.total_score_obtained,
                    max_score = result.max_score,
                    duration_seconds = elapsed,
                    "Grading completed"
                );
            }
            Err(err) => {
                metrics::record_grading(err.metric_label(), elapsed);
                tracing::warn!(
                    student_name = %request.student_name,
                    duration_seconds = elapsed,
                    error = %err,
                    "Grading failed"
                );
            }
        }

        outcome
    }

    /// Never fails; any error yields [`STUDY_PLAN_FALLBACK`].
    pub(crate) async fn study_plan(
        &self,
        selection: &ModelSelection,
        grading_result: &serde_json::Value,
        language: Language,
    ) -> String {
        let instruction = prompt::study_plan_prompt(grading_result, language);

        match self
            .backend
            .generate_content(&selection.api_key, &selection.model, vec![Part::Text(instruction)])
            .await
        {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => STUDY_PLAN_FALLBACK.to_string(),
            Err(err) => {
                tracing::warn!(error = %err, "Study plan generation failed");
                STUDY_PLAN_FALLBACK.to_string()
            }
        }
    }

    /// Names of models that can generate content, newest-looking first.
    /// Failures yield an empty list.
    pub(crate) async fn list_models(&self, api_key: &str) -> Vec<String> {
        match self.backend.list_models(api_key).await {
            Ok(models) => {
                let mut names: Vec<String> = models
                    .into_iter()
                    .filter(|model| {
                        model
                            .supported_generation_methods
                            .iter()
                            .any(|method| method == GENERATE_CONTENT_METHOD)
                    })
                    .map(|model| model.name)
                    .collect();
                names.sort_unstable_by(|left, right| right.cmp(left));
                names
            }
            Err(err) => {
                tracing::warn!(error = %err, "Listing models failed");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests;
