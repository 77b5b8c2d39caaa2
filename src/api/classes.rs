use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::helpers::fetch_class;
use crate::core::state::AppState;
use crate::repositories;
use crate::schemas::class::{ClassCreate, ClassResponse, StudentCreate, StudentResponse};
use crate::schemas::exam::{ExamCreate, ExamResponse};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_class).get(list_classes))
        .route("/:class_id", get(get_class))
        .route("/:class_id/students", post(add_student).get(list_students))
        .route("/:class_id/exams", post(create_exam).get(list_exams))
}

async fn create_class(
    State(state): State<AppState>,
    Json(payload): Json<ClassCreate>,
) -> Result<(StatusCode, Json<ClassResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let class = repositories::classes::create(
        state.db(),
        payload.name.trim(),
        payload.grade_level.trim(),
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create class"))?;

    tracing::info!(class_id = class.id, name = %class.name, "Class created");
    Ok((StatusCode::CREATED, Json(ClassResponse::from_db(class))))
}

async fn list_classes(State(state): State<AppState>) -> Result<Json<Vec<ClassResponse>>, ApiError> {
    let classes = repositories::classes::list_all(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list classes"))?;

    Ok(Json(classes.into_iter().map(ClassResponse::from_db).collect()))
}

async fn get_class(
    Path(class_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<ClassResponse>, ApiError> {
    let class = fetch_class(state.db(), class_id).await?;
    Ok(Json(ClassResponse::from_db(class)))
}

async fn add_student(
    Path(class_id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<StudentCreate>,
) -> Result<(StatusCode, Json<StudentResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let class = fetch_class(state.db(), class_id).await?;

    let student = repositories::students::create(
        state.db(),
        repositories::students::CreateStudent {
            name: payload.name.trim(),
            roll_number: payload.roll_number.trim(),
            class_id: class.id,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to add student"))?;

    tracing::info!(class_id, student_id = student.id, "Student added");
    Ok((StatusCode::CREATED, Json(StudentResponse::from_db(student))))
}

async fn list_students(
    Path(class_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Vec<StudentResponse>>, ApiError> {
    fetch_class(state.db(), class_id).await?;

    let students = repositories::students::list_by_class(state.db(), class_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list students"))?;

    Ok(Json(students.into_iter().map(StudentResponse::from_db).collect()))
}

async fn create_exam(
    Path(class_id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<ExamCreate>,
) -> Result<(StatusCode, Json<ExamResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let class = fetch_class(state.db(), class_id).await?;

    let exam = repositories::exams::create(
        state.db(),
        repositories::exams::CreateExam {
            name: payload.name.trim(),
            subject: payload.subject.trim(),
            class_id: class.id,
            question_paper_text: &payload.question_paper_text,
            answer_key_text: &payload.answer_key_text,
            max_marks: payload.max_marks,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create exam"))?;

    tracing::info!(class_id, exam_id = exam.id, name = %exam.name, "Exam created");
    Ok((StatusCode::CREATED, Json(ExamResponse::from_db(exam))))
}

async fn list_exams(
    Path(class_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Vec<ExamResponse>>, ApiError> {
    fetch_class(state.db(), class_id).await?;

    let exams = repositories::exams::list_by_class(state.db(), class_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list exams"))?;

    Ok(Json(exams.into_iter().map(ExamResponse::from_db).collect()))
}
