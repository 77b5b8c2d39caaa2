use time::PrimitiveDateTime;

use crate::db::types::SubmissionStatus;

pub(crate) const COLUMNS: &str = "\
    id, exam_id, student_id, image_path, grades_json, teacher_feedback, status, \
    graded_at, published_at";

pub(crate) struct SaveGraded<'a> {
    pub(crate) exam_id: i64,
    pub(crate) student_id: i64,
    pub(crate) image_path: &'a str,
    pub(crate) grades_json: &'a str,
    pub(crate) status: SubmissionStatus,
    pub(crate) graded_at: PrimitiveDateTime,
}

/// One student of an exam's class, with their submission if any exists.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct RosterRow {
    pub(crate) student_id: i64,
    pub(crate) student_name: String,
    pub(crate) roll_number: String,
    pub(crate) submission_id: Option<i64>,
    pub(crate) status: Option<SubmissionStatus>,
    pub(crate) image_path: Option<String>,
    pub(crate) grades_json: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct StudentResultRow {
    pub(crate) submission_id: i64,
    pub(crate) exam_id: i64,
    pub(crate) exam_name: String,
    pub(crate) subject: String,
    pub(crate) max_marks: i64,
    pub(crate) grades_json: Option<String>,
    pub(crate) teacher_feedback: Option<String>,
    pub(crate) status: SubmissionStatus,
    pub(crate) published_at: Option<PrimitiveDateTime>,
}
