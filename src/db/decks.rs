//! # Deck Database Operations
//!
//! Decks reference cards through `deck_card_associations`. That table has
//! no uniqueness constraint, so associating the same card twice stores two
//! rows and the card shows up twice in the deck.

use crate::db::cards;
use crate::db::models::{Card, Deck};
use crate::error::{AppError, AppResult};
use sqlx::SqlitePool;

pub async fn create_deck(pool: &SqlitePool, name: &str, owner_id: Option<i64>) -> AppResult<Deck> {
    let mut deck = Deck::new(name, owner_id)?;

    let result = sqlx::query("INSERT INTO decks (name, owner_id, created_at) VALUES (?, ?, ?)")
        .bind(&deck.name)
        .bind(deck.owner_id)
        .bind(&deck.created_at)
        .execute(pool)
        .await?;

    deck.id = result.last_insert_rowid();
    Ok(deck)
}

pub async fn find_by_id(pool: &SqlitePool, deck_id: i64) -> AppResult<Deck> {
    let deck = sqlx::query_as::<_, Deck>("SELECT * FROM decks WHERE id = ?")
        .bind(deck_id)
        .fetch_one(pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => AppError::NotFound(format!("Deck {} not found", deck_id)),
            _ => AppError::from(e),
        })?;

    Ok(deck)
}

pub async fn list_all(pool: &SqlitePool) -> AppResult<Vec<Deck>> {
    let decks = sqlx::query_as::<_, Deck>("SELECT * FROM decks ORDER BY id")
        .fetch_all(pool)
        .await?;

    Ok(decks)
}

/// Cards of a deck, one entry per association row
pub async fn cards_in_deck(pool: &SqlitePool, deck_id: i64) -> AppResult<Vec<Card>> {
    let cards = sqlx::query_as::<_, Card>(
        "SELECT cards.* FROM cards
         JOIN deck_card_associations a ON a.card_id = cards.id
         WHERE a.deck_id = ?
         ORDER BY a.rowid",
    )
    .bind(deck_id)
    .fetch_all(pool)
    .await?;

    Ok(cards)
}

/// Associate an existing card with an existing deck
///
/// Both ids are checked first so a miss is reported as NotFound rather
/// than as a foreign key failure. Returns the card that was added.
pub async fn add_card(pool: &SqlitePool, deck_id: i64, card_id: i64) -> AppResult<Card> {
    let deck = find_by_id(pool, deck_id).await?;
    let card = cards::find_by_id(pool, card_id).await?;

    sqlx::query("INSERT INTO deck_card_associations (card_id, deck_id) VALUES (?, ?)")
        .bind(card.id)
        .bind(deck.id)
        .execute(pool)
        .await
        .map_err(|e| {
            tracing::error!("error adding card {:?} to deck {:?}: {}", card.text, deck.name, e);
            AppError::from(e)
        })?;

    Ok(card)
}
