use sqlx::SqlitePool;

use crate::api::errors::ApiError;
use crate::db::models::{Class, Exam, Student};
use crate::repositories;

pub(crate) async fn fetch_class(pool: &SqlitePool, class_id: i64) -> Result<Class, ApiError> {
    repositories::classes::find_by_id(pool, class_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch class"))?
        .ok_or_else(|| ApiError::NotFound("Class not found".to_string()))
}

pub(crate) async fn fetch_exam(pool: &SqlitePool, exam_id: i64) -> Result<Exam, ApiError> {
    repositories::exams::find_by_id(pool, exam_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch exam"))?
        .ok_or_else(|| ApiError::NotFound("Exam not found".to_string()))
}

pub(crate) async fn fetch_student(pool: &SqlitePool, student_id: i64) -> Result<Student, ApiError> {
    repositories::students::find_by_id(pool, student_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch student"))?
        .ok_or_else(|| ApiError::NotFound("Student not found".to_string()))
}

/// Loads an exam and a student and checks that the student sits in the
/// exam's class.
pub(crate) async fn fetch_exam_student(
    pool: &SqlitePool,
    exam_id: i64,
    student_id: i64,
) -> Result<(Exam, Student), ApiError> {
    let exam = fetch_exam(pool, exam_id).await?;
    let student = fetch_student(pool, student_id).await?;

    if student.class_id != exam.class_id {
        return Err(ApiError::Conflict(format!(
            "Student {student_id} is not in the class of exam {exam_id}"
        )));
    }

    Ok((exam, student))
}
