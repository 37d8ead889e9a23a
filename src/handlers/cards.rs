use crate::db::cards;
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

/// A missing field reads as empty text, which `Card::new` rejects
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CardForm {
    #[serde(rename = "card-text")]
    pub card_text: String,
}

/// GET /card/list and GET /card/add - every card plus the creation form
pub async fn show_cards(State(state): State<AppState>, session: Session) -> AppResult<Html<String>> {
    let page = page(&state, &session, "Cards").await?;

    match cards::list_all(&state.db).await {
        Ok(all) => page.render("cards", json!({ "cards": all })),
        Err(e) => {
            tracing::error!("Error listing cards: {}", e);
            page.with_error(e.user_message()).render("cards", json!({ "cards": [] }))
        }
    }
}

/// POST /card/add
///
/// Redirects to the list on success. On failure (blank, too long, or
/// duplicate text) the form is rendered again with the error.
pub async fn add_card(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CardForm>,
) -> AppResult<Response> {
    match cards::create_card(&state.db, &form.card_text).await {
        Ok(card) => {
            tracing::info!(card_id = card.id, kind = ?card.kind, "card added");
            session::flash(&session, "Card added!").await?;
            Ok(Redirect::to("/card/list").into_response())
        }
        Err(e) => {
            tracing::error!("Error adding card {:?}: {}", form.card_text, e);
            session::flash(&session, "Error adding the card!").await?;

            let all = cards::list_all(&state.db).await.unwrap_or_else(|err| {
                tracing::error!("Error listing cards after a failed add: {}", err);
                Vec::new()
            });
            let page = page(&state, &session, "Cards").await?.with_error(e.user_message());
            Ok((e.status_code(), page.render("cards", json!({ "cards": all }))?).into_response())
        }
    }
}
