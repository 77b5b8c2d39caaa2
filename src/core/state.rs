use std::sync::Arc;

use sqlx::SqlitePool;

use crate::core::config::Settings;
use crate::services::ai_grading::GradingClient;
use crate::services::temp_files::TempFileStore;

#[derive(Clone)]
pub(crate) struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    settings: Settings,
    db: SqlitePool,
    uploads: TempFileStore,
    grader: GradingClient,
}

impl AppState {
    pub(crate) fn new(
        settings: Settings,
        db: SqlitePool,
        uploads: TempFileStore,
        grader: GradingClient,
    ) -> Self {
        Self { inner: Arc::new(InnerState { settings, db, uploads, grader }) }
    }

    pub(crate) fn settings(&self) -> &Settings {
        &self.inner.settings
    }

    pub(crate) fn db(&self) -> &SqlitePool {
        &self.inner.db
    }

    pub(crate) fn uploads(&self) -> &TempFileStore {
        &self.inner.uploads
    }

    pub(crate) fn grader(&self) -> &GradingClient {
        &self.inner.grader
    }
}
