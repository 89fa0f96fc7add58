use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::AppConfig;
use crate::db;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env());

        let db = db::connect(&config).await?;
        db::ensure_schema(&db).await?;

        tracing::info!(database_url = %config.database_url, "database ready");
        Ok(Self::from_parts(db, config))
    }

    pub fn from_parts(db: SqlitePool, config: Arc<AppConfig>) -> Self {
        Self { db, config }
    }

    /// State over a real database file, for tests that need several connections.
    #[cfg(test)]
    pub async fn on_disk(path: &std::path::Path) -> Self {
        let config = AppConfig {
            database_url: format!("sqlite://{}", path.display()),
            max_connections: 5,
            server: crate::config::ServerConfig {
                host: "127.0.0.1".into(),
                port: 0,
            },
        };
        let db = db::connect(&config).await.expect("file pool");
        db::ensure_schema(&db).await.expect("schema");
        Self::from_parts(db, Arc::new(config))
    }

    #[cfg(test)]
    pub async fn fake() -> Self {
        let config = Arc::new(AppConfig {
            database_url: "sqlite::memory:".into(),
            max_connections: 1,
            server: crate::config::ServerConfig {
                host: "127.0.0.1".into(),
                port: 0,
            },
        });
        Self::from_parts(db::test_pool().await, config)
    }
}
