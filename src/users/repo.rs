use sqlx::SqliteConnection;
use time::OffsetDateTime;

use crate::error::{AppError, Result};
use crate::users::dto::{UserCreate, UserFilter};
use crate::users::repo_types::User;

/// Insert a new user and return it with its generated id and timestamp.
pub async fn create(conn: &mut SqliteConnection, new: &UserCreate) -> Result<User> {
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (name, email, is_active, is_premium, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5)
        RETURNING id, name, email, is_active, is_premium, created_at
        "#,
    )
    .bind(&new.name)
    .bind(&new.email)
    .bind(new.is_active)
    .bind(new.is_premium)
    .bind(OffsetDateTime::now_utc())
    .fetch_one(conn)
    .await?;
    Ok(user)
}

pub async fn list_all(conn: &mut SqliteConnection) -> Result<Vec<User>> {
    filter(conn, &UserFilter::default()).await
}

pub async fn get_by_id(conn: &mut SqliteConnection, id: i64) -> Result<User> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, is_active, is_premium, created_at
        FROM users
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await?
    .ok_or(AppError::NotFound(id))
}

/// Overwrite all four mutable fields. `id` and `created_at` are left alone.
///
/// One statement, so the session's first lock is the write lock.
pub async fn update(conn: &mut SqliteConnection, id: i64, changes: &UserCreate) -> Result<User> {
    sqlx::query_as::<_, User>(
        r#"
        UPDATE users
           SET name = ?1, email = ?2, is_active = ?3, is_premium = ?4
         WHERE id = ?5
        RETURNING id, name, email, is_active, is_premium, created_at
        "#,
    )
    .bind(&changes.name)
    .bind(&changes.email)
    .bind(changes.is_active)
    .bind(changes.is_premium)
    .bind(id)
    .fetch_optional(conn)
    .await?
    .ok_or(AppError::NotFound(id))
}

pub async fn promote_to_premium(conn: &mut SqliteConnection, id: i64) -> Result<User> {
    sqlx::query_as::<_, User>(
        r#"
        UPDATE users
           SET is_premium = 1
         WHERE id = ?1
        RETURNING id, name, email, is_active, is_premium, created_at
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await?
    .ok_or(AppError::NotFound(id))
}

pub async fn list_inactive(conn: &mut SqliteConnection) -> Result<Vec<User>> {
    let filter_by = UserFilter {
        is_active: Some(false),
        ..Default::default()
    };
    filter(conn, &filter_by).await
}

pub async fn list_premium(conn: &mut SqliteConnection) -> Result<Vec<User>> {
    let filter_by = UserFilter {
        is_premium: Some(true),
        ..Default::default()
    };
    filter(conn, &filter_by).await
}

/// Rows matching every flag that is set; an empty filter returns all rows.
pub async fn filter(conn: &mut SqliteConnection, by: &UserFilter) -> Result<Vec<User>> {
    let rows = sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, is_active, is_premium, created_at
        FROM users
        WHERE (?1 IS NULL OR is_premium = ?1)
          AND (?2 IS NULL OR is_active = ?2)
        ORDER BY id ASC
        "#,
    )
    .bind(by.is_premium)
    .bind(by.is_active)
    .fetch_all(conn)
    .await?;
    Ok(rows)
}
