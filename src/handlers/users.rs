//! # User Handlers
//!
//! Registration and the user count. Anyone can register an account; there
//! is no admin-only guard on `POST /user/add`.

use crate::db::users;
use crate::error::AppResult;
use crate::handlers::page;
use crate::session;
use crate::state::AppState;
use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UserForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// GET /user/show and GET /user/add - number of registered users
pub async fn show_users(State(state): State<AppState>, session: Session) -> AppResult<Html<String>> {
    let page = page(&state, &session, "Users").await?;

    match users::count(&state.db).await {
        Ok(n) => page.render("users", json!({ "user_count": n })),
        Err(e) => {
            tracing::error!("Error counting users: {}", e);
            page.with_error(e.user_message()).render("users", json!({ "user_count": 0 }))
        }
    }
}

/// POST /user/add
///
/// Duplicate username or email re-renders the form with the error.
pub async fn add_user(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UserForm>,
) -> AppResult<Response> {
    match users::create_user(&state.db, &form.username, &form.email, &form.password).await {
        Ok(user) => {
            tracing::info!(uid = user.id, "user '{}' added", user.username);
            session::flash(&session, "user added!").await?;
            Ok(Redirect::to("/user/show").into_response())
        }
        Err(e) => {
            tracing::error!("Error adding user '{}': {}", form.username, e);
            session::flash(&session, "Error adding the user!").await?;

            let n = users::count(&state.db).await.unwrap_or_else(|err| {
                tracing::error!("Error counting users after a failed add: {}", err);
                0
            });
            let page = page(&state, &session, "Users").await?.with_error(e.user_message());
            Ok((e.status_code(), page.render("users", json!({ "user_count": n }))?).into_response())
        }
    }
}
