//! # wah
//!
//! Web application for building decks for a fill-in-the-blank party card
//! game. Users register, write cards, group them into decks and open games.
//!
//! The binary in `main.rs` only wires configuration, logging and the
//! session store together; everything else lives here so the router can be driven
//! directly from tests.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod session;
pub mod state;
pub mod views;

use crate::handlers::{auth, cards, decks, games, health::health_check, index::show_index, users};
use crate::state::AppState;
use axum::{middleware as axum_middleware, routing::get, Router};
use time::Duration;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};

/// Build the application router on top of a session store
///
/// The store is a parameter so `main` can use the SQLite store while tests
/// use `tower_sessions::MemoryStore`. The session cookie is signed with the
/// key derived from `config.secret_key` and expires after 24 hours of
/// inactivity.
pub fn app<S>(state: AppState, store: S) -> Router
where
    S: SessionStore + Clone,
{
    let session_layer = SessionManagerLayer::new(store)
        .with_secure(state.config.cookie_secure)
        .with_expiry(Expiry::OnInactivity(Duration::hours(24)))
        .with_signed(state.config.session_key());

    // Routes that need a logged-in user; the middleware hands it over as an
    // Extension<User>.
    let session_routes = Router::new()
        .route("/game/add", get(games::show_games).post(games::add_game))
        .route("/game/list", get(games::show_games))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_session,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/", get(show_index))
        // Session management
        .route("/login", get(auth::login_form).post(auth::login))
        .route("/logout", get(auth::logout))
        // Cards
        .route("/card/add", get(cards::show_cards).post(cards::add_card))
        .route("/card/list", get(cards::show_cards))
        // Decks
        .route("/deck/add", get(decks::show_decks).post(decks::add_deck))
        .route("/deck/list", get(decks::show_decks))
        .route("/deck/{id}/", get(decks::show_deck))
        .route("/deck/{id}/show", get(decks::show_deck))
        .route("/deck/{id}/add/{card_id}", get(decks::add_card_to_deck))
        // Users
        .route("/user/add", get(users::show_users).post(users::add_user))
        .route("/user/show", get(users::show_users))
        // Games
        .route("/game/{id}/play", get(games::play_game))
        .merge(session_routes)
        // Stylesheet and other assets
        .fallback_service(ServeDir::new("static"))
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
