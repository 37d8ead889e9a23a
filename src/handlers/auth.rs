//! # Login and Logout
//!
//! Passwords are checked by hashing the submitted value and comparing it to
//! the stored digest. An unknown username and a wrong password produce the
//! same "Invalid account" message.

use crate::db::users;
use crate::error::AppResult;
use crate::handlers::page;
use crate::session;
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use serde_json::Value;
use tower_sessions::Session;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// GET /login
pub async fn login_form(State(state): State<AppState>, session: Session) -> AppResult<Html<String>> {
    let page = page(&state, &session, "Log in").await?;
    page.render("login", Value::Null)
}

/// POST /login
///
/// On success marks the session as logged in, stores the user id and
/// redirects to the front page.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    // Usernames are stored trimmed
    let username = form.username.trim();

    match users::find_by_username(&state.db, username).await {
        Ok(user) if user.valid_pass(&form.password) => {
            tracing::info!(uid = user.id, "valid password for '{}'", user.username);
            session::log_in(&session, user.id).await?;
            session::flash(&session, "Logged in successfully").await?;
            return Ok(Redirect::to("/").into_response());
        }
        Ok(user) => tracing::warn!("invalid password for '{}'", user.username),
        Err(e) => tracing::info!("login failed for '{}': {}", username, e),
    }

    let page = page(&state, &session, "Log in").await?.with_error("Invalid account");
    Ok((StatusCode::UNAUTHORIZED, page.render("login", Value::Null)?).into_response())
}

/// GET /logout
pub async fn logout(session: Session) -> AppResult<Redirect> {
    session::log_out(&session).await?;
    session::flash(&session, "You were logged out").await?;
    Ok(Redirect::to("/"))
}
