use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::api::errors::ApiError;
use crate::core::metrics;
use crate::core::state::AppState;
use crate::repositories;
use crate::schemas::{HealthResponse, RootResponse};

pub(crate) async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    let api = state.settings().api();
    Json(RootResponse {
        message: api.project_name.clone(),
        version: api.version.clone(),
        api_prefix: api.api_v1_str.clone(),
    })
}

pub(crate) async fn healthz(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    repositories::health::ping(state.db()).await.map_err(|err| {
        tracing::error!(error = %err, "Database health check failed");
        ApiError::ServiceUnavailable("Database unavailable".to_string())
    })?;

    Ok(Json(HealthResponse {
        service: "sheet-grader".to_string(),
        status: "healthy".to_string(),
        database: "healthy".to_string(),
    }))
}

pub(crate) async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    if !state.settings().telemetry().prometheus_enabled {
        return StatusCode::NOT_FOUND.into_response();
    }

    match metrics::render() {
        Some(body) => ([(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4")], body)
            .into_response(),
        None => StatusCode::SERVICE_UNAVAILABLE.into_response(),
    }
}
