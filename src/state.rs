//! # Application State
//!
//! The state every handler receives through axum's `State` extractor. It is
//! built once in `main` and cloned per request; both fields are cheap to
//! clone (`SqlitePool` is a handle, `Config` sits behind an `Arc`).

use crate::config::Config;
use crate::db::users;
use anyhow::Result;
use sqlx::sqlite::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,

    pub config: Arc<Config>,
}

impl AppState {
    /// Connect to the configured database and prepare it
    ///
    /// # Errors
    /// Returns an error if the connection, a migration, or seeding the admin
    /// account fails. The server cannot start in that case.
    pub async fn new(config: Config) -> Result<Self> {
        let db = SqlitePool::connect(&config.database_url).await?;
        Self::with_pool(db, config).await
    }

    /// Prepare an existing pool: run migrations, then seed the admin account
    ///
    /// Both steps are idempotent, so this runs on every start.
    pub async fn with_pool(db: SqlitePool, config: Config) -> Result<Self> {
        sqlx::migrate!("./migrations").run(&db).await?;

        if users::ensure_admin(&db, &config).await? {
            tracing::info!("Initialized the database");
        } else {
            tracing::info!("Database ready");
        }

        Ok(AppState {
            db,
            config: Arc::new(config),
        })
    }
}
