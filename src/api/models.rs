use axum::{extract::State, routing::get, Json, Router};

use crate::api::errors::ApiError;
use crate::api::guards::ApiKeyHeader;
use crate::core::state::AppState;
use crate::schemas::submission::ModelsResponse;

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/", get(list_models))
}

async fn list_models(
    api_key: ApiKeyHeader,
    State(state): State<AppState>,
) -> Result<Json<ModelsResponse>, ApiError> {
    let selection = state.grader().select(api_key.as_deref(), None)?;
    let models = state.grader().list_models(&selection.api_key).await;
    Ok(Json(ModelsResponse { models }))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    use crate::test_support::{self, json_request, read_json, TEST_API_KEY};

    #[tokio::test]
    async fn models_endpoint_lists_generation_models() {
        let ctx = test_support::setup_test_context().await;
        ctx.backend.set_models(vec![
            test_support::model_info("models/gemini-1.0-pro", &["generateContent"]),
            test_support::model_info("models/text-embedding-004", &["embedContent"]),
            test_support::model_info("models/gemini-1.5-flash", &["generateContent"]),
        ]);

        let response = ctx
            .app
            .clone()
            .oneshot(json_request(Method::GET, "/api/v1/models", Some(TEST_API_KEY), None))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["models"], json!(["models/gemini-1.5-flash", "models/gemini-1.0-pro"]));
    }

    #[tokio::test]
    async fn models_endpoint_requires_key() {
        let ctx = test_support::setup_test_context().await;

        let response = ctx
            .app
            .clone()
            .oneshot(json_request(Method::GET, "/api/v1/models", None, None))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
