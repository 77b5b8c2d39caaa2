use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::Submission;
use crate::db::types::SubmissionStatus;
use crate::repositories::submissions::{RosterRow, StudentResultRow};
use crate::schemas::grading::{GradingResult, Language};

/// Roster label for a student who has no submission row yet.
pub(crate) const NOT_UPLOADED: &str = "Not Uploaded";

#[derive(Debug, Serialize)]
pub(crate) struct SubmissionResponse {
    pub(crate) id: i64,
    pub(crate) exam_id: i64,
    pub(crate) student_id: i64,
    pub(crate) image_path: Option<String>,
    pub(crate) status: SubmissionStatus,
    pub(crate) grading_result: Option<serde_json::Value>,
    pub(crate) teacher_feedback: Option<String>,
    pub(crate) graded_at: Option<String>,
    pub(crate) published_at: Option<String>,
}

impl SubmissionResponse {
    pub(crate) fn from_db(submission: Submission) -> Self {
        Self {
            id: submission.id,
            exam_id: submission.exam_id,
            student_id: submission.student_id,
            image_path: submission.image_path,
            status: submission.status,
            grading_result: decode_grades(submission.grades_json.as_deref()),
            teacher_feedback: submission.teacher_feedback,
            graded_at: submission.graded_at.map(format_primitive),
            published_at: submission.published_at.map(format_primitive),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct GradeResponse {
    pub(crate) submission: SubmissionResponse,
    pub(crate) result: GradingResult,
    pub(crate) warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RosterEntryResponse {
    pub(crate) student_id: i64,
    pub(crate) student_name: String,
    pub(crate) roll_number: String,
    pub(crate) submission_id: Option<i64>,
    pub(crate) status: String,
    pub(crate) image_path: Option<String>,
    pub(crate) total_score_obtained: Option<f64>,
    pub(crate) max_score: Option<f64>,
    pub(crate) overall_feedback: Option<String>,
}

impl RosterEntryResponse {
    pub(crate) fn from_row(row: RosterRow) -> Self {
        let grades = decode_grades(row.grades_json.as_deref());
        let summary = ScoreSummary::from_grades(grades.as_ref());

        Self {
            student_id: row.student_id,
            student_name: row.student_name,
            roll_number: row.roll_number,
            submission_id: row.submission_id,
            status: row
                .status
                .map(|status| status.as_str().to_string())
                .unwrap_or_else(|| NOT_UPLOADED.to_string()),
            image_path: row.image_path,
            total_score_obtained: summary.total,
            max_score: summary.max,
            overall_feedback: summary.feedback,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct StudentResultResponse {
    pub(crate) submission_id: i64,
    pub(crate) exam_id: i64,
    pub(crate) exam_name: String,
    pub(crate) subject: String,
    pub(crate) status: SubmissionStatus,
    pub(crate) total_score_obtained: Option<f64>,
    pub(crate) max_score: f64,
    pub(crate) grading_result: Option<serde_json::Value>,
    pub(crate) teacher_feedback: Option<String>,
    pub(crate) published_at: Option<String>,
}

impl StudentResultResponse {
    pub(crate) fn from_row(row: StudentResultRow) -> Self {
        let grades = decode_grades(row.grades_json.as_deref());
        let summary = ScoreSummary::from_grades(grades.as_ref());

        Self {
            submission_id: row.submission_id,
            exam_id: row.exam_id,
            exam_name: row.exam_name,
            subject: row.subject,
            status: row.status,
            total_score_obtained: summary.total,
            max_score: summary.max.unwrap_or(row.max_marks as f64),
            grading_result: grades,
            teacher_feedback: row.teacher_feedback,
            published_at: row.published_at.map(format_primitive),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct FeedbackUpdate {
    #[serde(default, alias = "teacherFeedback")]
    #[validate(length(max = 5000, message = "teacher_feedback must be at most 5000 characters"))]
    pub(crate) teacher_feedback: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct StudyPlanRequest {
    #[serde(default)]
    pub(crate) language: Language,
}

#[derive(Debug, Serialize)]
pub(crate) struct StudyPlanResponse {
    pub(crate) submission_id: i64,
    pub(crate) language: Language,
    pub(crate) study_plan: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ModelsResponse {
    pub(crate) models: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CleanupResponse {
    pub(crate) removed: usize,
}

struct ScoreSummary {
    total: Option<f64>,
    max: Option<f64>,
    feedback: Option<String>,
}

impl ScoreSummary {
    fn from_grades(grades: Option<&serde_json::Value>) -> Self {
        Self {
            total: grades
                .and_then(|value| value.get("total_score_obtained"))
                .and_then(serde_json::Value::as_f64),
            max: grades.and_then(|value| value.get("max_score")).and_then(serde_json::Value::as_f64),
            feedback: grades
                .and_then(|value| value.get("overall_feedback"))
                .and_then(serde_json::Value::as_str)
                .map(str::to_string),
        }
    }
}

/// Stored grades are returned as loose JSON so rows written by an older
/// schema still render.
fn decode_grades(raw: Option<&str>) -> Option<serde_json::Value> {
    let raw = raw?;
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(error = %err, "Stored grades_json is not valid JSON");
            None
        }
    }
}
