use sqlx::SqlitePool;

use crate::db::models::Exam;

pub(crate) const COLUMNS: &str =
    "id, name, subject, class_id, question_paper_text, answer_key_text, max_marks";

pub(crate) struct CreateExam<'a> {
    pub(crate) name: &'a str,
    pub(crate) subject: &'a str,
    pub(crate) class_id: i64,
    pub(crate) question_paper_text: &'a str,
    pub(crate) answer_key_text: &'a str,
    pub(crate) max_marks: i64,
}

pub(crate) async fn create(pool: &SqlitePool, params: CreateExam<'_>) -> Result<Exam, sqlx::Error> {
    sqlx::query_as::<_, Exam>(&format!(
        "INSERT INTO exams (
            name, subject, class_id, question_paper_text, answer_key_text, max_marks
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         RETURNING {COLUMNS}"
    ))
    .bind(params.name)
    .bind(params.subject)
    .bind(params.class_id)
    .bind(params.question_paper_text)
    .bind(params.answer_key_text)
    .bind(params.max_marks)
    .fetch_one(pool)
    .await
}

pub(crate) async fn list_by_class(
    pool: &SqlitePool,
    class_id: i64,
) -> Result<Vec<Exam>, sqlx::Error> {
    sqlx::query_as::<_, Exam>(&format!(
        "SELECT {COLUMNS} FROM exams WHERE class_id = ?1 ORDER BY id"
    ))
    .bind(class_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Exam>, sqlx::Error> {
    sqlx::query_as::<_, Exam>(&format!("SELECT {COLUMNS} FROM exams WHERE id = ?1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}
