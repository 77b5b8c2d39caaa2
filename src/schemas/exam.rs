use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::db::models::Exam;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct ExamCreate {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub(crate) name: String,
    #[validate(length(min = 1, message = "subject must not be empty"))]
    pub(crate) subject: String,
    #[serde(default, alias = "questionPaperText")]
    pub(crate) question_paper_text: String,
    #[serde(default, alias = "answerKeyText")]
    pub(crate) answer_key_text: String,
    #[serde(default = "default_max_marks", alias = "maxMarks")]
    #[validate(range(min = 1, message = "max_marks must be positive"))]
    pub(crate) max_marks: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct ExamResponse {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) subject: String,
    pub(crate) class_id: i64,
    pub(crate) question_paper_text: String,
    pub(crate) answer_key_text: String,
    pub(crate) max_marks: i64,
}

impl ExamResponse {
    pub(crate) fn from_db(exam: Exam) -> Self {
        Self {
            id: exam.id,
            name: exam.name,
            subject: exam.subject,
            class_id: exam.class_id,
            question_paper_text: exam.question_paper_text,
            answer_key_text: exam.answer_key_text,
            max_marks: exam.max_marks,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct PublishResponse {
    pub(crate) exam_id: i64,
    pub(crate) published: u64,
}

fn default_max_marks() -> i64 {
    100
}
