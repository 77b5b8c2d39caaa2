mod submissions;
mod upload;

use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};

use crate::api::errors::ApiError;
use crate::api::helpers::fetch_exam;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::exam::{ExamResponse, PublishResponse};
use crate::schemas::submission::RosterEntryResponse;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/:exam_id", get(get_exam))
        .route("/:exam_id/submissions", get(list_roster))
        .route("/:exam_id/publish", post(publish_exam))
        .route("/:exam_id/students/:student_id/grade", post(submissions::grade_sheet))
        .route("/:exam_id/students/:student_id/upload", post(submissions::upload_sheet))
        .route("/:exam_id/students/:student_id/submission", get(submissions::get_submission))
        .route("/:exam_id/students/:student_id/feedback", put(submissions::update_feedback))
}

async fn get_exam(
    Path(exam_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<ExamResponse>, ApiError> {
    let exam = fetch_exam(state.db(), exam_id).await?;
    Ok(Json(ExamResponse::from_db(exam)))
}

/// Every student of the exam's class, including those who have not
/// uploaded yet.
async fn list_roster(
    Path(exam_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Vec<RosterEntryResponse>>, ApiError> {
    fetch_exam(state.db(), exam_id).await?;

    let rows = repositories::submissions::list_roster(state.db(), exam_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list submissions"))?;

    Ok(Json(rows.into_iter().map(RosterEntryResponse::from_row).collect()))
}

async fn publish_exam(
    Path(exam_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<PublishResponse>, ApiError> {
    fetch_exam(state.db(), exam_id).await?;

    let published =
        repositories::submissions::publish_results(state.db(), exam_id, primitive_now_utc())
            .await
            .map_err(|e| ApiError::internal(e, "Failed to publish results"))?;

    tracing::info!(exam_id, published, "Exam results published");
    Ok(Json(PublishResponse { exam_id, published }))
}
