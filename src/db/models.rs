use serde::Serialize;
use sqlx::FromRow;
use time::PrimitiveDateTime;

use crate::db::types::SubmissionStatus;

#[derive(Debug, Clone, Serialize, FromRow)]
pub(crate) struct Class {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) grade_level: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub(crate) struct Student {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) roll_number: String,
    pub(crate) class_id: i64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub(crate) struct Exam {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) subject: String,
    pub(crate) class_id: i64,
    pub(crate) question_paper_text: String,
    pub(crate) answer_key_text: String,
    pub(crate) max_marks: i64,
}

#[derive(Debug, Clone, FromRow)]
pub(crate) struct Submission {
    pub(crate) id: i64,
    pub(crate) exam_id: i64,
    pub(crate) student_id: i64,
    pub(crate) image_path: Option<String>,
    pub(crate) grades_json: Option<String>,
    pub(crate) teacher_feedback: Option<String>,
    pub(crate) status: SubmissionStatus,
    pub(crate) graded_at: Option<PrimitiveDateTime>,
    pub(crate) published_at: Option<PrimitiveDateTime>,
}
