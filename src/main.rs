//! # wah server
//!
//! Entry point: logging, configuration, database, session store, HTTP.

use tower_sessions::ExpiredDeletion;
use tower_sessions_sqlx_store::SqliteStore;
use wah::config::Config;
use wah::state::AppState;

/// Main application entry point
///
/// 1. Loads configuration from the environment
/// 2. Sets up console and file logging (`RUST_LOG` overrides the console filter)
/// 3. Opens the database, runs migrations and seeds the admin account
/// 4. Prepares the SQLite session store and its cleanup task
/// 5. Serves the router
///
/// Failing to prepare the database aborts startup.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Dropping the guard flushes the log file
    let _log_guard = wah::logging::init(&config)?;
    tracing::info!("Configuration loaded: {:?}", config);
    config.warn_on_defaults();
    let bind_addr = config.bind_address();

    let app_state = AppState::new(config).await?;
    tracing::info!("Application state initialized");

    // Sessions share the application database
    let session_store = SqliteStore::new(app_state.db.clone());
    session_store.migrate().await?;

    // Expired sessions are removed every 10 minutes
    let deletion_store = session_store.clone();
    tokio::spawn(async move {
        if let Err(e) = deletion_store
            .continuously_delete_expired(tokio::time::Duration::from_secs(600))
            .await
        {
            tracing::error!("Session cleanup stopped: {:?}", e);
        }
    });

    let app = wah::app(app_state, session_store);

    tracing::info!("Starting server on {}", bind_addr);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
