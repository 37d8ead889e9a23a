use crate::db::{cards, decks};
use crate::error::{AppError, AppResult};
use crate::handlers::{page, session_user};
use crate::session;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_sessions::Session;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DeckForm {
    #[serde(rename = "deck-name")]
    pub deck_name: String,
}

/// GET /deck/list and GET /deck/add
pub async fn show_decks(State(state): State<AppState>, session: Session) -> AppResult<Html<String>> {
    let page = page(&state, &session, "Decks").await?;

    match decks::list_all(&state.db).await {
        Ok(all) => page.render("decks", json!({ "decks": all })),
        Err(e) => {
            tracing::error!("Error listing decks: {}", e);
            page.with_error(e.user_message()).render("decks", json!({ "decks": [] }))
        }
    }
}

/// POST /deck/add
///
/// A logged-in user becomes the owner of the new deck.
pub async fn add_deck(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<DeckForm>,
) -> AppResult<Response> {
    let owner_id = session_user(&state, &session).await?.map(|u| u.id);

    match decks::create_deck(&state.db, &form.deck_name, owner_id).await {
        Ok(deck) => {
            tracing::info!(deck_id = deck.id, ?owner_id, "deck added");
            session::flash(&session, "Deck added!").await?;
            Ok(Redirect::to("/deck/list").into_response())
        }
        Err(e) => {
            tracing::error!("Error adding deck {:?}: {}", form.deck_name, e);
            session::flash(&session, "Error adding the deck!").await?;

            let all = decks::list_all(&state.db).await.unwrap_or_else(|err| {
                tracing::error!("Error listing decks after a failed add: {}", err);
                Vec::new()
            });
            let page = page(&state, &session, "Decks").await?.with_error(e.user_message());
            Ok((e.status_code(), page.render("decks", json!({ "decks": all }))?).into_response())
        }
    }
}

/// GET /deck/{id}/add/{card_id}
///
/// Always redirects back to the deck; the outcome travels as a flash
/// message. A missing deck, a missing card and a failed insert all take the
/// same error path.
pub async fn add_card_to_deck(
    State(state): State<AppState>,
    session: Session,
    Path((deck_id, card_id)): Path<(i64, i64)>,
) -> AppResult<Redirect> {
    match decks::add_card(&state.db, deck_id, card_id).await {
        Ok(card) => {
            tracing::info!(deck_id, card_id, "card added to deck");
            session::flash(&session, format!("Added card {}", card.text)).await?;
        }
        Err(e) => {
            tracing::error!("Error adding card id {} to deck id {}: {}", card_id, deck_id, e);
            session::flash(
                &session,
                format!(
                    "Error adding card id {} to deck id {}: {}",
                    card_id,
                    deck_id,
                    e.user_message()
                ),
            )
            .await?;
        }
    }

    Ok(Redirect::to(&format!("/deck/{}/", deck_id)))
}

/// GET /deck/{id}/ and GET /deck/{id}/show
pub async fn show_deck(
    State(state): State<AppState>,
    session: Session,
    Path(deck_id): Path<i64>,
) -> AppResult<Response> {
    let page = page(&state, &session, "Deck").await?;

    let loaded = async {
        let deck = decks::find_by_id(&state.db, deck_id).await?;
        let deck_cards = decks::cards_in_deck(&state.db, deck_id).await?;
        let all_cards = cards::list_all(&state.db).await?;
        Ok::<_, AppError>((deck, deck_cards, all_cards))
    }
    .await;

    match loaded {
        Ok((deck, deck_cards, all_cards)) => {
            let body = json!({
                "deck": deck,
                "card_count": deck_cards.len(),
                "deck_cards": deck_cards,
                "all_cards": all_cards,
            });
            Ok(page.render("deck", body)?.into_response())
        }
        Err(e) => {
            tracing::error!("Error retrieving deck_id {}: {}", deck_id, e);
            let status = e.status_code();
            let message = format!("Error retrieving deck_id {}: {}", deck_id, e.user_message());
            Ok((status, page.with_error(message).render("error", Value::Null)?).into_response())
        }
    }
}
