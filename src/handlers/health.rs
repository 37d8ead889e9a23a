//! # Health Check Handler

use axum::Json;
use serde_json::{json, Value};

/// Liveness check
///
/// ## Route
/// GET /health
///
/// ## Response
/// ```json
/// { "status": "healthy", "service": "wah" }
/// ```
///
/// Does not touch the database; it only says the process is serving.
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "wah"
    }))
}
