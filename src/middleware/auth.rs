use crate::db::models::User;
use crate::error::AppError;
use crate::handlers::{page, require_user};
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tower_sessions::Session;

/// Let the request through only if the session names an existing user
///
/// The user is handed to the handler as an `Extension<User>`. Otherwise the
/// games page is rendered with an empty list and the session error (401).
pub async fn require_session(
    State(state): State<AppState>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    match require_user(&state, &session).await {
        Ok(user) => {
            request.extensions_mut().insert::<User>(user);
            Ok(next.run(request).await)
        }
        Err(e @ AppError::Session(_)) => {
            tracing::debug!("{} {} rejected: {}", request.method(), request.uri(), e);
            let page = page(&state, &session, "Games")
                .await?
                .with_error(e.user_message());
            let html = page.render("games", json!({ "games": [] }))?;
            Ok((e.status_code(), html).into_response())
        }
        Err(e) => Err(e),
    }
}
