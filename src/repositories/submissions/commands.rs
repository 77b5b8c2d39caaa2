use sqlx::SqlitePool;
use time::PrimitiveDateTime;

use crate::db::models::Submission;
use crate::db::types::SubmissionStatus;

use super::types::{SaveGraded, COLUMNS};

/// Upserts the grade for an (exam, student) pair. A second call for the same
/// pair overwrites image, grade and status of the existing row; teacher
/// feedback is kept.
pub(crate) async fn save_graded(
    pool: &SqlitePool,
    params: SaveGraded<'_>,
) -> Result<Submission, sqlx::Error> {
    let published_at =
        (params.status == SubmissionStatus::Published).then_some(params.graded_at);

    sqlx::query_as::<_, Submission>(&format!(
        "INSERT INTO submissions (
            exam_id, student_id, image_path, grades_json, status, graded_at, published_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT (exam_id, student_id) DO UPDATE SET
            image_path = excluded.image_path,
            grades_json = excluded.grades_json,
            status = excluded.status,
            graded_at = excluded.graded_at,
            published_at = excluded.published_at
         RETURNING {COLUMNS}"
    ))
    .bind(params.exam_id)
    .bind(params.student_id)
    .bind(params.image_path)
    .bind(params.grades_json)
    .bind(params.status)
    .bind(params.graded_at)
    .bind(published_at)
    .fetch_one(pool)
    .await
}

/// Stores an answer sheet without grading it. A previous grade for the pair
/// no longer matches the new sheet and is cleared.
pub(crate) async fn register_upload(
    pool: &SqlitePool,
    exam_id: i64,
    student_id: i64,
    image_path: &str,
) -> Result<Submission, sqlx::Error> {
    sqlx::query_as::<_, Submission>(&format!(
        "INSERT INTO submissions (exam_id, student_id, image_path, status)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT (exam_id, student_id) DO UPDATE SET
            image_path = excluded.image_path,
            grades_json = NULL,
            status = excluded.status,
            graded_at = NULL,
            published_at = NULL
         RETURNING {COLUMNS}"
    ))
    .bind(exam_id)
    .bind(student_id)
    .bind(image_path)
    .bind(SubmissionStatus::Pending)
    .fetch_one(pool)
    .await
}

pub(crate) async fn set_teacher_feedback(
    pool: &SqlitePool,
    exam_id: i64,
    student_id: i64,
    feedback: Option<&str>,
) -> Result<Option<Submission>, sqlx::Error> {
    sqlx::query_as::<_, Submission>(&format!(
        "UPDATE submissions SET teacher_feedback = ?1
         WHERE exam_id = ?2 AND student_id = ?3
         RETURNING {COLUMNS}"
    ))
    .bind(feedback)
    .bind(exam_id)
    .bind(student_id)
    .fetch_optional(pool)
    .await
}

/// Makes every graded submission of the exam visible to parents and returns
/// how many rows changed. Pending rows carry no grade and are left alone.
pub(crate) async fn publish_results(
    pool: &SqlitePool,
    exam_id: i64,
    now: PrimitiveDateTime,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE submissions SET status = ?1, published_at = ?2
         WHERE exam_id = ?3 AND status = ?4",
    )
    .bind(SubmissionStatus::Published)
    .bind(now)
    .bind(exam_id)
    .bind(SubmissionStatus::Graded)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
