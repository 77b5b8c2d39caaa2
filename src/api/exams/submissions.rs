use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use validator::Validate;

use super::upload::{read_sheet_upload, stored_file_name, SheetUpload};
use crate::api::errors::ApiError;
use crate::api::guards::ApiKeyHeader;
use crate::api::helpers::{fetch_class, fetch_exam_student};
use crate::api::validation::{validate_image_signature, validate_image_upload};
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::types::SubmissionStatus;
use crate::repositories;
use crate::schemas::submission::{FeedbackUpdate, GradeResponse, SubmissionResponse};
use crate::services::ai_grading::{GradeRequest, DEFAULT_STUDENT_LEVEL};

pub(super) async fn grade_sheet(
    Path((exam_id, student_id)): Path<(i64, i64)>,
    api_key: ApiKeyHeader,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<GradeResponse>, ApiError> {
    let (exam, student) = fetch_exam_student(state.db(), exam_id, student_id).await?;
    let class = fetch_class(state.db(), exam.class_id).await?;
    let student_level = match class.grade_level.trim() {
        "" => DEFAULT_STUDENT_LEVEL.to_string(),
        level => level.to_string(),
    };

    let upload =
        read_sheet_upload(&mut multipart, state.settings().uploads().max_upload_size_mb).await?;
    let mime_type = check_image(&state, &upload)?;
    let selection = state.grader().select(api_key.as_deref(), upload.model.as_deref())?;

    let stored_name = stored_file_name(exam_id, student_id, &upload.file_name);
    let image_path = state.uploads().save(&stored_name, &upload.bytes).await?;
    let image_path = image_path.to_string_lossy().into_owned();

    let result = state
        .grader()
        .grade(
            &selection,
            GradeRequest {
                image: upload.bytes,
                mime_type: mime_type.to_string(),
                question_paper_text: exam.question_paper_text,
                answer_key_text: exam.answer_key_text,
                max_marks: exam.max_marks,
                student_name: student.name,
                student_level,
                strictness: upload.strictness,
                language: upload.language,
            },
        )
        .await?;

    let warnings = result.consistency_warnings();
    if !warnings.is_empty() {
        tracing::warn!(exam_id, student_id, ?warnings, "Grading result is inconsistent");
    }

    let grades_json = serde_json::to_string(&result)
        .map_err(|e| ApiError::internal(e, "Failed to serialize grading result"))?;

    let submission = repositories::submissions::save_graded(
        state.db(),
        repositories::submissions::SaveGraded {
            exam_id,
            student_id,
            image_path: &image_path,
            grades_json: &grades_json,
            status: SubmissionStatus::Graded,
            graded_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to save grading result"))?;

    tracing::info!(
        exam_id,
        student_id,
        submission_id = submission.id,
        total_score_obtained = result.total_score_obtained,
        "Submission graded"
    );

    Ok(Json(GradeResponse { submission: SubmissionResponse::from_db(submission), result, warnings }))
}

/// Stores a sheet for later grading. Any earlier grade for the pair is
/// superseded.
pub(super) async fn upload_sheet(
    Path((exam_id, student_id)): Path<(i64, i64)>,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<SubmissionResponse>, ApiError> {
    fetch_exam_student(state.db(), exam_id, student_id).await?;

    let upload =
        read_sheet_upload(&mut multipart, state.settings().uploads().max_upload_size_mb).await?;
    check_image(&state, &upload)?;

    let stored_name = stored_file_name(exam_id, student_id, &upload.file_name);
    let image_path = state.uploads().save(&stored_name, &upload.bytes).await?;

    let submission = repositories::submissions::register_upload(
        state.db(),
        exam_id,
        student_id,
        &image_path.to_string_lossy(),
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to store submission"))?;

    tracing::info!(exam_id, student_id, submission_id = submission.id, "Answer sheet uploaded");
    Ok(Json(SubmissionResponse::from_db(submission)))
}

pub(super) async fn get_submission(
    Path((exam_id, student_id)): Path<(i64, i64)>,
    State(state): State<AppState>,
) -> Result<Json<SubmissionResponse>, ApiError> {
    fetch_exam_student(state.db(), exam_id, student_id).await?;

    let submission = repositories::submissions::find_by_pair(state.db(), exam_id, student_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch submission"))?
        .ok_or_else(|| ApiError::NotFound("Submission not found".to_string()))?;

    Ok(Json(SubmissionResponse::from_db(submission)))
}

pub(super) async fn update_feedback(
    Path((exam_id, student_id)): Path<(i64, i64)>,
    State(state): State<AppState>,
    Json(payload): Json<FeedbackUpdate>,
) -> Result<Json<SubmissionResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    fetch_exam_student(state.db(), exam_id, student_id).await?;

    let feedback = payload.teacher_feedback.as_deref().map(str::trim).filter(|text| !text.is_empty());

    let submission =
        repositories::submissions::set_teacher_feedback(state.db(), exam_id, student_id, feedback)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to update feedback"))?
            .ok_or_else(|| ApiError::NotFound("Submission not found".to_string()))?;

    Ok(Json(SubmissionResponse::from_db(submission)))
}

fn check_image(state: &AppState, upload: &SheetUpload) -> Result<&'static str, ApiError> {
    let mime_type = validate_image_upload(
        &upload.file_name,
        upload.content_type.as_deref(),
        &state.settings().uploads().allowed_image_extensions,
    )?;
    validate_image_signature(&upload.bytes, mime_type)?;
    Ok(mime_type)
}
