use std::sync::Arc;

use serde_json::json;

use super::*;
use crate::test_support::{grading_reply, model_info, ScriptedBackend, TEST_API_KEY};

fn client(backend: Arc<ScriptedBackend>, default_api_key: &str) -> GradingClient {
    GradingClient {
        backend,
        default_api_key: default_api_key.to_string(),
        default_model: "gemini-1.5-flash".to_string(),
    }
}

fn selection() -> ModelSelection {
    ModelSelection { api_key: TEST_API_KEY.to_string(), model: "gemini-1.5-flash".to_string() }
}

fn request() -> GradeRequest {
    GradeRequest {
        image: vec![1, 2, 3, 4],
        mime_type: "image/jpeg".to_string(),
        question_paper_text: "Q1. Define velocity.".to_string(),
        answer_key_text: "Rate of change of displacement.".to_string(),
        max_marks: 50,
        student_name: "Asha".to_string(),
        student_level: DEFAULT_STUDENT_LEVEL.to_string(),
        strictness: Strictness::Strict,
        language: Language::English,
    }
}

#[test]
fn select_prefers_request_key_and_model() {
    let grader = client(Arc::new(ScriptedBackend::default()), "configured-key");

    let selection = grader.select(Some("header-key"), Some("models/gemini-1.5-pro")).expect("selection");
    assert_eq!(selection.api_key, "header-key");
    assert_eq!(selection.model, "models/gemini-1.5-pro");

    let fallback = grader.select(Some("  "), None).expect("fallback");
    assert_eq!(fallback.api_key, "configured-key");
    assert_eq!(fallback.model, "gemini-1.5-flash");
}

#[test]
fn select_without_any_key_is_rejected() {
    let grader = client(Arc::new(ScriptedBackend::default()), "");
    let err = grader.select(None, None).unwrap_err();
    assert!(matches!(err, GradingError::MissingCredential));
    assert_eq!(err.to_string(), "Gemini API key is required");
}

#[tokio::test]
async fn grade_sends_prompt_and_image_in_one_call() {
    let backend = Arc::new(ScriptedBackend::default());
    backend.push_reply(format!("```json\n{}\n```", grading_reply("Asha", 42.0, 50.0)));
    let grader = client(backend.clone(), "");

    let result = grader.grade(&selection(), request()).await.expect("grade");
    assert_eq!(result.total_score_obtained, 42.0);
    assert_eq!(result.max_score, 50.0);

    let calls = backend.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].api_key, TEST_API_KEY);
    assert_eq!(calls[0].images, vec![("image/jpeg".to_string(), 4)]);
    assert_eq!(calls[0].texts.len(), 1);
    assert!(calls[0].texts[0].contains("Grading mode: Strict"));
    assert!(calls[0].texts[0].contains("Q1. Define velocity."));
}

#[tokio::test]
async fn grade_surfaces_upstream_failure_without_retry() {
    let backend = Arc::new(ScriptedBackend::default());
    backend.push_error(GradingError::Upstream { status: 429, message: "quota".to_string() });
    backend.push_reply(grading_reply("Asha", 42.0, 50.0));
    let grader = client(backend.clone(), "");

    let err = grader.grade(&selection(), request()).await.unwrap_err();
    assert!(matches!(err, GradingError::Upstream { status: 429, .. }));
    assert_eq!(backend.calls().len(), 1);
}

#[tokio::test]
async fn grade_rejects_reply_missing_fields() {
    let backend = Arc::new(ScriptedBackend::default());
    backend.push_reply(json!({"student_name": "Asha", "total_score_obtained": 42}).to_string());
    let grader = client(backend, "");

    let err = grader.grade(&selection(), request()).await.unwrap_err();
    assert!(matches!(err, GradingError::Schema(_)));
}

#[tokio::test]
async fn study_plan_returns_model_text() {
    let backend = Arc::new(ScriptedBackend::default());
    backend.push_reply("## Week 1\nRevise equations of motion.");
    let grader = client(backend.clone(), "");

    let plan = grader
        .study_plan(&selection(), &json!({"concepts_to_revise": ["Kinematics"]}), Language::Tamil)
        .await;
    assert_eq!(plan, "## Week 1\nRevise equations of motion.");

    let calls = backend.calls();
    assert!(calls[0].images.is_empty());
    assert!(calls[0].texts[0].contains("in Tamil"));
}

#[tokio::test]
async fn study_plan_falls_back_on_failure() {
    let backend = Arc::new(ScriptedBackend::default());
    backend.push_error(GradingError::Transport("timed out".to_string()));
    let grader = client(backend, "");

    let plan = grader.study_plan(&selection(), &json!({}), Language::English).await;
    assert_eq!(plan, STUDY_PLAN_FALLBACK);
}

#[tokio::test]
async fn list_models_filters_and_sorts_descending() {
    let backend = Arc::new(ScriptedBackend::default());
    backend.set_models(vec![
        model_info("models/gemini-1.0-pro", &["generateContent"]),
        model_info("models/embedding-001", &["embedContent"]),
        model_info("models/gemini-1.5-flash", &["countTokens", "generateContent"]),
    ]);
    let grader = client(backend, "");

    let models = grader.list_models(TEST_API_KEY).await;
    assert_eq!(
        models,
        vec!["models/gemini-1.5-flash".to_string(), "models/gemini-1.0-pro".to_string()]
    );
}

#[tokio::test]
async fn list_models_is_empty_on_failure() {
    let grader = client(Arc::new(ScriptedBackend::default()), "");
    assert!(grader.list_models(TEST_API_KEY).await.is_empty());
}
