//! # Card Database Operations

use crate::db::models::Card;
use crate::error::{AppError, AppResult};
use sqlx::SqlitePool;

/// Normalize `text` into a new card and store it
///
/// A card whose normalized text already exists fails with
/// `AppError::Validation` and leaves the table untouched.
pub async fn create_card(pool: &SqlitePool, text: &str) -> AppResult<Card> {
    let mut card = Card::new(text)?;

    let result = sqlx::query("INSERT INTO cards (text, kind, created_at) VALUES (?, ?, ?)")
        .bind(&card.text)
        .bind(card.kind)
        .bind(&card.created_at)
        .execute(pool)
        .await?;

    card.id = result.last_insert_rowid();
    Ok(card)
}

pub async fn find_by_id(pool: &SqlitePool, card_id: i64) -> AppResult<Card> {
    let card = sqlx::query_as::<_, Card>("SELECT * FROM cards WHERE id = ?")
        .bind(card_id)
        .fetch_one(pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => AppError::NotFound(format!("Card {} not found", card_id)),
            _ => AppError::from(e),
        })?;

    Ok(card)
}

pub async fn list_all(pool: &SqlitePool) -> AppResult<Vec<Card>> {
    let cards = sqlx::query_as::<_, Card>("SELECT * FROM cards ORDER BY id")
        .fetch_all(pool)
        .await?;

    Ok(cards)
}

pub async fn count(pool: &SqlitePool) -> AppResult<i64> {
    let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM cards")
        .fetch_one(pool)
        .await?;

    Ok(n)
}
