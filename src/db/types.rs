use serde::{Deserialize, Serialize};
use sqlx::Type;

/// Lifecycle of a submission row. Parents only ever see `Published`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
pub(crate) enum SubmissionStatus {
    Pending,
    Graded,
    Published,
}

impl SubmissionStatus {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Graded => "Graded",
            Self::Published => "Published",
        }
    }
}
