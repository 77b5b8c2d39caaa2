use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex as StdMutex, OnceLock};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request},
    Router,
};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::api;
use crate::core::{config::Settings, state::AppState};
use crate::db::models::{Class, Exam, Student};
use crate::repositories;
use crate::services::ai_grading::{GradingClient, GradingError, ModelBackend, ModelInfo, Part};
use crate::services::temp_files::TempFileStore;

pub(crate) const TEST_API_KEY: &str = "test-gemini-key";
const MULTIPART_BOUNDARY: &str = "sheet-grader-test-boundary";

pub(crate) struct TestContext {
    pub(crate) state: AppState,
    pub(crate) app: Router,
    pub(crate) backend: Arc<ScriptedBackend>,
    pub(crate) upload_dir: PathBuf,
    _guard: OwnedMutexGuard<()>,
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.upload_dir);
    }
}

pub(crate) async fn env_lock() -> OwnedMutexGuard<()> {
    static LOCK: OnceLock<Arc<Mutex<()>>> = OnceLock::new();
    let lock = LOCK.get_or_init(|| Arc::new(Mutex::new(()))).clone();
    lock.lock_owned().await
}

pub(crate) fn set_test_env() {
    std::env::set_var("GRADER_ENV", "test");
    std::env::set_var("DATABASE_URL", "sqlite::memory:");
    std::env::set_var("PROMETHEUS_ENABLED", "0");
    std::env::remove_var("GRADER_HOST");
    std::env::remove_var("GRADER_PORT");
    std::env::remove_var("PROJECT_NAME");
    std::env::remove_var("API_V1_STR");
    std::env::remove_var("BACKEND_CORS_ORIGINS");
    std::env::remove_var("DATABASE_MAX_CONNECTIONS");
    std::env::remove_var("GEMINI_API_KEY");
    std::env::remove_var("GEMINI_BASE_URL");
    std::env::remove_var("GEMINI_MODEL");
    std::env::remove_var("AI_REQUEST_TIMEOUT");
    std::env::remove_var("ALLOWED_IMAGE_EXTENSIONS");
    std::env::remove_var("UPLOAD_DIR");
    std::env::remove_var("MAX_UPLOAD_SIZE_MB");
}

/// A path under the system temp dir that does not exist yet.
pub(crate) fn temp_dir(label: &str) -> PathBuf {
    std::env::temp_dir().join(format!("sheet-grader-{label}-{}", Uuid::new_v4()))
}

/// In-memory databases live per connection, so the pool is pinned to one
/// connection that is never recycled.
pub(crate) async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("sqlite pool");
    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await.expect("foreign keys");
    crate::db::run_migrations(&pool).await.expect("migrations");
    pool
}

pub(crate) async fn setup_test_context() -> TestContext {
    let guard = env_lock().await;
    set_test_env();

    let settings = Settings::load().expect("settings");
    let db = test_pool().await;

    let upload_dir = temp_dir("uploads");
    let uploads = TempFileStore::new(&upload_dir);

    let backend = Arc::new(ScriptedBackend::default());
    let grader = GradingClient::with_backend(backend.clone(), &settings);

    let state = AppState::new(settings, db, uploads, grader);
    let app = api::router::router(state.clone());

    TestContext { state, app, backend, upload_dir, _guard: guard }
}

#[derive(Debug, Clone)]
pub(crate) struct RecordedCall {
    pub(crate) api_key: String,
    pub(crate) model: String,
    pub(crate) texts: Vec<String>,
    pub(crate) images: Vec<(String, usize)>,
}

/// Replays queued replies in order. An exhausted queue answers with an
/// upstream error.
#[derive(Default)]
pub(crate) struct ScriptedBackend {
    replies: StdMutex<VecDeque<Result<String, GradingError>>>,
    models: StdMutex<Option<Vec<ModelInfo>>>,
    calls: StdMutex<Vec<RecordedCall>>,
}

impl ScriptedBackend {
    pub(crate) fn push_reply(&self, text: impl Into<String>) {
        self.replies.lock().expect("replies").push_back(Ok(text.into()));
    }

    pub(crate) fn push_error(&self, error: GradingError) {
        self.replies.lock().expect("replies").push_back(Err(error));
    }

    pub(crate) fn set_models(&self, models: Vec<ModelInfo>) {
        *self.models.lock().expect("models") = Some(models);
    }

    pub(crate) fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("calls").clone()
    }
}

#[async_trait]
impl ModelBackend for ScriptedBackend {
    async fn generate_content(
        &self,
        api_key: &str,
        model: &str,
        parts: Vec<Part>,
    ) -> Result<String, GradingError> {
        let mut texts = Vec::new();
        let mut images = Vec::new();
        for part in parts {
            match part {
                Part::Text(text) => texts.push(text),
                Part::InlineImage { mime_type, data } => images.push((mime_type, data.len())),
            }
        }
        self.calls.lock().expect("calls").push(RecordedCall {
            api_key: api_key.to_string(),
            model: model.to_string(),
            texts,
            images,
        });

        self.replies.lock().expect("replies").pop_front().unwrap_or_else(|| {
            Err(GradingError::Upstream { status: 500, message: "no scripted reply".to_string() })
        })
    }

    async fn list_models(&self, _api_key: &str) -> Result<Vec<ModelInfo>, GradingError> {
        self.models
            .lock()
            .expect("models")
            .clone()
            .ok_or_else(|| GradingError::Transport("connection refused".to_string()))
    }
}

pub(crate) fn model_info(name: &str, methods: &[&str]) -> ModelInfo {
    ModelInfo {
        name: name.to_string(),
        supported_generation_methods: methods.iter().map(|method| method.to_string()).collect(),
    }
}

/// A well-formed model reply with a single question worth the whole exam.
pub(crate) fn grading_reply(student_name: &str, total: f64, max: f64) -> String {
    serde_json::json!({
        "student_name": student_name,
        "total_score_obtained": total,
        "max_score": max,
        "question_wise_breakdown": [{
            "question_number": "1",
            "marks_obtained": total,
            "max_marks": max,
            "feedback": "Method is correct; units missing in the final step.",
            "status": if total >= max { "Correct" } else { "Partially Correct" }
        }],
        "overall_feedback": "Good grasp of the fundamentals.",
        "improvement_pointers": ["Always write units"],
        "concepts_to_revise": ["Equations of motion"],
        "real_world_connections": "Braking distances depend on these equations."
    })
    .to_string()
}

pub(crate) async fn insert_class(pool: &SqlitePool, name: &str) -> Class {
    repositories::classes::create(pool, name, "High School").await.expect("insert class")
}

pub(crate) async fn insert_student(
    pool: &SqlitePool,
    class_id: i64,
    name: &str,
    roll_number: &str,
) -> Student {
    repositories::students::create(
        pool,
        repositories::students::CreateStudent { name, roll_number, class_id },
    )
    .await
    .expect("insert student")
}

pub(crate) async fn insert_exam(
    pool: &SqlitePool,
    class_id: i64,
    name: &str,
    subject: &str,
    max_marks: i64,
) -> Exam {
    repositories::exams::create(
        pool,
        repositories::exams::CreateExam {
            name,
            subject,
            class_id,
            question_paper_text: "Q1. A car accelerates from rest at 2 m/s^2 for 5 s. Find v.",
            answer_key_text: "v = u + at = 10 m/s",
            max_marks,
        },
    )
    .await
    .expect("insert exam")
}

pub(crate) fn json_request(
    method: Method,
    uri: &str,
    api_key: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(api_key) = api_key {
        builder = builder.header("x-gemini-api-key", api_key);
    }

    if let Some(body) = body {
        let bytes = serde_json::to_vec(&body).expect("serialize body");
        builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(bytes))
            .expect("request body")
    } else {
        builder.body(Body::empty()).expect("request body")
    }
}

pub(crate) struct UploadFile<'a> {
    pub(crate) file_name: &'a str,
    pub(crate) content_type: &'a str,
    pub(crate) bytes: &'a [u8],
}

pub(crate) fn multipart_request(
    uri: &str,
    api_key: Option<&str>,
    fields: &[(&str, &str)],
    file: Option<UploadFile<'_>>,
) -> Request<Body> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(file) = file {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                file.file_name, file.content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(file.bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());

    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"));
    if let Some(api_key) = api_key {
        builder = builder.header("x-gemini-api-key", api_key);
    }

    builder.body(Body::from(body)).expect("request body")
}

/// Bytes that start with the PNG signature.
pub(crate) fn png_bytes() -> Vec<u8> {
    let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.extend_from_slice(b"answer-sheet");
    bytes
}

pub(crate) async fn read_json(response: axum::response::Response<Body>) -> serde_json::Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.expect("response body");
    serde_json::from_slice(&body).unwrap_or_else(|err| {
        let body_text = String::from_utf8_lossy(&body);
        panic!("json parse: {err}; body: {body_text}");
    })
}
