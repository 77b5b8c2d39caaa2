use axum::{extract::State, routing::delete, Json, Router};

use crate::api::errors::ApiError;
use crate::core::state::AppState;
use crate::schemas::submission::CleanupResponse;

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/", delete(cleanup_uploads))
}

/// Deletes every stored sheet. Submission rows keep their now dangling
/// `image_path`.
async fn cleanup_uploads(State(state): State<AppState>) -> Result<Json<CleanupResponse>, ApiError> {
    let removed = state.uploads().cleanup_all().await?;
    Ok(Json(CleanupResponse { removed }))
}
