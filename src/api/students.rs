use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};

use crate::api::errors::ApiError;
use crate::api::guards::ApiKeyHeader;
use crate::api::helpers::fetch_student;
use crate::core::state::AppState;
use crate::repositories;
use crate::schemas::submission::{StudentResultResponse, StudyPlanRequest, StudyPlanResponse};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/:student_id/results", get(list_results))
        .route("/:student_id/results/:submission_id/study-plan", post(study_plan))
}

/// Published results only; graded but unpublished sheets stay hidden.
async fn list_results(
    Path(student_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Vec<StudentResultResponse>>, ApiError> {
    fetch_student(state.db(), student_id).await?;

    let rows = repositories::submissions::student_results(state.db(), student_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch results"))?;

    Ok(Json(rows.into_iter().map(StudentResultResponse::from_row).collect()))
}

async fn study_plan(
    Path((student_id, submission_id)): Path<(i64, i64)>,
    api_key: ApiKeyHeader,
    State(state): State<AppState>,
    payload: Option<Json<StudyPlanRequest>>,
) -> Result<Json<StudyPlanResponse>, ApiError> {
    let Json(payload) = payload.unwrap_or_default();
    fetch_student(state.db(), student_id).await?;

    let row = repositories::submissions::find_student_result(state.db(), student_id, submission_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch result"))?
        .ok_or_else(|| ApiError::NotFound("Published result not found".to_string()))?;

    let result = StudentResultResponse::from_row(row);
    let grading_result = result
        .grading_result
        .ok_or_else(|| ApiError::BadRequest("Result has no grading data".to_string()))?;

    let selection = state.grader().select(api_key.as_deref(), None)?;
    let study_plan =
        state.grader().study_plan(&selection, &grading_result, payload.language).await;

    Ok(Json(StudyPlanResponse { submission_id, language: payload.language, study_plan }))
}
