use sqlx::SqlitePool;

use crate::db::models::Student;

const COLUMNS: &str = "id, name, roll_number, class_id";

pub(crate) struct CreateStudent<'a> {
    pub(crate) name: &'a str,
    pub(crate) roll_number: &'a str,
    pub(crate) class_id: i64,
}

pub(crate) async fn create(
    pool: &SqlitePool,
    params: CreateStudent<'_>,
) -> Result<Student, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!(
        "INSERT INTO students (name, roll_number, class_id) VALUES (?1, ?2, ?3)
         RETURNING {COLUMNS}"
    ))
    .bind(params.name)
    .bind(params.roll_number)
    .bind(params.class_id)
    .fetch_one(pool)
    .await
}

pub(crate) async fn list_by_class(
    pool: &SqlitePool,
    class_id: i64,
) -> Result<Vec<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!(
        "SELECT {COLUMNS} FROM students WHERE class_id = ?1 ORDER BY id"
    ))
    .bind(class_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn find_by_id(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!("SELECT {COLUMNS} FROM students WHERE id = ?1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}
