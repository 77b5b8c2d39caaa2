use sqlx::SqlitePool;

use crate::db::models::Class;

const COLUMNS: &str = "id, name, grade_level";

pub(crate) async fn create(
    pool: &SqlitePool,
    name: &str,
    grade_level: &str,
) -> Result<Class, sqlx::Error> {
    sqlx::query_as::<_, Class>(&format!(
        "INSERT INTO classes (name, grade_level) VALUES (?1, ?2) RETURNING {COLUMNS}"
    ))
    .bind(name)
    .bind(grade_level)
    .fetch_one(pool)
    .await
}

pub(crate) async fn list_all(pool: &SqlitePool) -> Result<Vec<Class>, sqlx::Error> {
    sqlx::query_as::<_, Class>(&format!("SELECT {COLUMNS} FROM classes ORDER BY id"))
        .fetch_all(pool)
        .await
}

pub(crate) async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Class>, sqlx::Error> {
    sqlx::query_as::<_, Class>(&format!("SELECT {COLUMNS} FROM classes WHERE id = ?1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}
