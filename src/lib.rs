pub(crate) mod api;
pub(crate) mod core;
pub(crate) mod db;
pub(crate) mod repositories;
pub(crate) mod schemas;
pub(crate) mod services;

#[cfg(test)]
mod test_support;

use anyhow::Context;

use crate::core::{config::Settings, state::AppState, telemetry};
use crate::services::ai_grading::GradingClient;
use crate::services::temp_files::TempFileStore;

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::load()?;
    telemetry::init_tracing(&settings)?;
    core::metrics::init(&settings)?;

    let db_pool = db::init_pool(&settings).await.context("Failed to open database")?;
    db::run_migrations(&db_pool).await.context("Failed to run migrations")?;

    let uploads = TempFileStore::new(settings.uploads().upload_dir.clone());
    tokio::fs::create_dir_all(uploads.dir())
        .await
        .with_context(|| format!("Failed to create {}", uploads.dir().display()))?;

    let grader = GradingClient::from_settings(&settings)?;
    if settings.ai().api_key.is_empty() {
        tracing::warn!("GEMINI_API_KEY is not set; requests must send X-Gemini-Api-Key");
    }

    let state = AppState::new(settings, db_pool, uploads, grader);
    let app = api::router::router(state.clone());
    let listener = tokio::net::TcpListener::bind(state.settings().server_addr()).await?;

    tracing::info!(
        host = %state.settings().server_host(),
        port = state.settings().server_port(),
        environment = %state.settings().runtime().environment.as_str(),
        model = %state.settings().ai().model,
        "Sheet grader API listening"
    );

    axum::serve(listener, app).with_graceful_shutdown(core::shutdown::shutdown_signal()).await?;

    state.db().close().await;
    tracing::info!("Database pool closed");

    Ok(())
}
