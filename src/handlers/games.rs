//! # Game Handlers
//!
//! `/game/add` and `/game/list` sit behind `middleware::auth::require_session`,
//! which resolves the user before these handlers run.

use crate::db::games;
use crate::db::models::{GameStatus, User};
use crate::error::AppResult;
use crate::handlers::page;
use crate::session;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form,
};
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;

#[derive(Debug, Deserialize)]
pub struct GameForm {
    /// Optional join password; blank means an open game
    #[serde(default)]
    pub password: String,
}

/// GET /game/list and GET /game/add - games owned by the session user
pub async fn show_games(
    State(state): State<AppState>,
    session: Session,
    Extension(user): Extension<User>,
) -> AppResult<Html<String>> {
    let page = page(&state, &session, "Games").await?;

    match games::list_by_owner(&state.db, user.id).await {
        Ok(owned) => page.render("games", json!({ "games": owned })),
        Err(e) => {
            tracing::error!("Error retrieving games for user {}: {}", user.id, e);
            session::flash(&session, "Error retrieving games for the user!").await?;
            page.with_error(e.user_message()).render("games", json!({ "games": [] }))
        }
    }
}

/// POST /game/add
///
/// Creates a game owned by the session user and sends them to its play page.
pub async fn add_game(
    State(state): State<AppState>,
    session: Session,
    Extension(user): Extension<User>,
    Form(form): Form<GameForm>,
) -> AppResult<Response> {
    let status = if form.password.is_empty() {
        GameStatus::default()
    } else {
        GameStatus::with_password(&form.password)
    };

    match games::create_game(&state.db, user.id, status).await {
        Ok(game) => {
            tracing::info!(game_id = game.id, owner_id = user.id, "game created");
            session::flash(&session, "game created!").await?;
            Ok(Redirect::to(&format!("/game/{}/play", game.id)).into_response())
        }
        Err(e) => {
            tracing::error!("error while creating a game: {}", e);
            session::flash(&session, "Error creating the game!").await?;

            let owned = games::list_by_owner(&state.db, user.id)
                .await
                .unwrap_or_else(|err| {
                    tracing::error!("Error listing games after a failed create: {}", err);
                    Vec::new()
                });
            let page = page(&state, &session, "Games").await?.with_error(e.user_message());
            Ok((e.status_code(), page.render("games", json!({ "games": owned }))?).into_response())
        }
    }
}

/// GET /game/{id}/play
///
/// Placeholder: names the game without loading its state.
pub async fn play_game(
    State(state): State<AppState>,
    session: Session,
    Path(game_id): Path<i64>,
) -> AppResult<Html<String>> {
    let page = page(&state, &session, "Play").await?;
    page.render("play", json!({ "game_id": game_id }))
}
