//! # HTTP Request Handlers
//!
//! Each handler:
//! 1. Extracts state, session, path parameters and form data
//! 2. Calls into `db`
//! 3. Either redirects (after a successful write) or renders a view
//!
//! Failures are caught here and turned into a flash message plus a
//! re-rendered form or a redirect. Only session store failures propagate
//! with `?` and end up as an error page through `AppError::into_response`.
//!
//! ## Submodules
//! - `index`: front page
//! - `auth`: login and logout
//! - `cards`, `decks`, `users`, `games`: one module per entity
//! - `health`: liveness check

pub mod auth;
pub mod cards;
pub mod decks;
pub mod games;
pub mod health;
pub mod index;
pub mod users;

use crate::db::{models::User, users as user_db};
use crate::error::{AppError, AppResult};
use crate::session;
use crate::state::AppState;
use crate::views::Page;
use tower_sessions::Session;

/// The logged-in user, if the session names one that still exists
pub(crate) async fn session_user(state: &AppState, session: &Session) -> AppResult<Option<User>> {
    let Some(uid) = session::current_uid(session).await? else {
        return Ok(None);
    };

    match user_db::find_by_id(&state.db, uid).await {
        Ok(user) => Ok(Some(user)),
        Err(AppError::NotFound(_)) => {
            tracing::warn!(uid, "session refers to a missing user");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// The logged-in user, or `AppError::Session` when there is none
pub(crate) async fn require_user(state: &AppState, session: &Session) -> AppResult<User> {
    session_user(state, session)
        .await?
        .ok_or_else(|| AppError::Session("no logged-in user".to_string()))
}

/// Page skeleton with the current user and the pending flash messages
pub(crate) async fn page(state: &AppState, session: &Session, title: &str) -> AppResult<Page> {
    let user = session_user(state, session).await?;
    let flashes = session::take_flashes(session).await?;
    Ok(Page::new(title).with_user(user).with_flashes(flashes))
}
