use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    Sqlite, SqlitePool, Transaction,
};

use crate::config::AppConfig;

/// Request-scoped unit of work. Dropping it without `commit` rolls back and
/// hands the connection back to the pool.
pub type Session = Transaction<'static, Sqlite>;

const CREATE_USERS: &str = include_str!("../migrations/0001_create_users.sql");

pub async fn connect(config: &AppConfig) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&config.database_url)
        .with_context(|| format!("parse database url {}", config.database_url))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await
        .context("connect to database")?;
    Ok(pool)
}

/// Creates the `users` table if it is missing. Safe to run on every start.
pub async fn ensure_schema(db: &SqlitePool) -> anyhow::Result<()> {
    sqlx::query(CREATE_USERS)
        .execute(db)
        .await
        .context("create users table")?;
    Ok(())
}

pub async fn open_session(db: &SqlitePool) -> sqlx::Result<Session> {
    db.begin().await
}

/// Single-connection in-memory pool with the schema in place.
#[cfg(test)]
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool");
    ensure_schema(&pool).await.expect("schema");
    pool
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ensure_schema_is_idempotent() {
        let pool = test_pool().await;
        ensure_schema(&pool).await.expect("second run");
        ensure_schema(&pool).await.expect("third run");

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn dropped_session_rolls_back() {
        let pool = test_pool().await;
        {
            let mut session = open_session(&pool).await.unwrap();
            sqlx::query(
                "INSERT INTO users (name, email, created_at) VALUES ('a', 'a@x.com', '2024-01-01T00:00:00Z')",
            )
            .execute(&mut *session)
            .await
            .unwrap();
        }

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn committed_session_persists() {
        let pool = test_pool().await;
        let mut session = open_session(&pool).await.unwrap();
        sqlx::query(
            "INSERT INTO users (name, email, created_at) VALUES ('a', 'a@x.com', '2024-01-01T00:00:00Z')",
        )
        .execute(&mut *session)
        .await
        .unwrap();
        session.commit().await.unwrap();

        let (active, premium): (bool, bool) =
            sqlx::query_as("SELECT is_active, is_premium FROM users")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert!(active);
        assert!(!premium);
    }
}
