use sqlx::SqlitePool;

use crate::db::models::Submission;
use crate::db::types::SubmissionStatus;

use super::types::{RosterRow, StudentResultRow, COLUMNS};

const STUDENT_RESULT_SELECT: &str = "\
    SELECT s.id AS submission_id,
           e.id AS exam_id,
           e.name AS exam_name,
           e.subject,
           e.max_marks,
           s.grades_json,
           s.teacher_feedback,
           s.status,
           s.published_at
    FROM submissions s
    JOIN exams e ON s.exam_id = e.id";

pub(crate) async fn find_by_pair(
    pool: &SqlitePool,
    exam_id: i64,
    student_id: i64,
) -> Result<Option<Submission>, sqlx::Error> {
    sqlx::query_as::<_, Submission>(&format!(
        "SELECT {COLUMNS} FROM submissions WHERE exam_id = ?1 AND student_id = ?2"
    ))
    .bind(exam_id)
    .bind(student_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list_roster(
    pool: &SqlitePool,
    exam_id: i64,
) -> Result<Vec<RosterRow>, sqlx::Error> {
    sqlx::query_as::<_, RosterRow>(
        "SELECT st.id AS student_id,
                st.name AS student_name,
                st.roll_number,
                s.id AS submission_id,
                s.status,
                s.image_path,
                s.grades_json
         FROM exams e
         JOIN students st ON st.class_id = e.class_id
         LEFT JOIN submissions s ON s.exam_id = e.id AND s.student_id = st.id
         WHERE e.id = ?1
         ORDER BY st.id",
    )
    .bind(exam_id)
    .fetch_all(pool)
    .await
}

/// Published results of one student, joined with their exams.
pub(crate) async fn student_results(
    pool: &SqlitePool,
    student_id: i64,
) -> Result<Vec<StudentResultRow>, sqlx::Error> {
    sqlx::query_as::<_, StudentResultRow>(&format!(
        "{STUDENT_RESULT_SELECT}
         WHERE s.student_id = ?1 AND s.status = ?2
         ORDER BY s.id"
    ))
    .bind(student_id)
    .bind(SubmissionStatus::Published)
    .fetch_all(pool)
    .await
}

pub(crate) async fn find_student_result(
    pool: &SqlitePool,
    student_id: i64,
    submission_id: i64,
) -> Result<Option<StudentResultRow>, sqlx::Error> {
    sqlx::query_as::<_, StudentResultRow>(&format!(
        "{STUDENT_RESULT_SELECT}
         WHERE s.student_id = ?1 AND s.id = ?2 AND s.status = ?3"
    ))
    .bind(student_id)
    .bind(submission_id)
    .bind(SubmissionStatus::Published)
    .fetch_optional(pool)
    .await
}
