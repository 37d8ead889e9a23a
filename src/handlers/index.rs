use crate::db::cards;
use crate::error::AppResult;
use crate::handlers::page;
use crate::state::AppState;
use axum::{extract::State, response::Html};
use serde_json::json;
use tower_sessions::Session;

/// GET / - number of cards and the current user
pub async fn show_index(State(state): State<AppState>, session: Session) -> AppResult<Html<String>> {
    let page = page(&state, &session, "Home").await?;

    match cards::count(&state.db).await {
        Ok(n) => page.render("index", json!({ "card_count": n })),
        Err(e) => {
            tracing::error!("Error counting cards: {}", e);
            page.with_error(e.user_message()).render("index", json!({ "card_count": 0 }))
        }
    }
}
