//! # Game Database Operations
//!
//! The status column is JSON text. Writes go through [`save_status`], a
//! compare-and-swap on the `version` column: two requests that loaded the
//! same version cannot both write, the second one gets `AppError::Conflict`.

use crate::db::models::{Game, GameStatus};
use crate::error::{AppError, AppResult};
use sqlx::SqlitePool;

/// Raw row; `status` is still JSON text here
#[derive(Debug, sqlx::FromRow)]
struct GameRow {
    id: i64,
    owner_id: i64,
    status: String,
    version: i64,
    created_at: String,
}

impl TryFrom<GameRow> for Game {
    type Error = AppError;

    fn try_from(row: GameRow) -> AppResult<Self> {
        Ok(Game {
            id: row.id,
            owner_id: row.owner_id,
            status: GameStatus::from_json(&row.status)?,
            version: row.version,
            created_at: row.created_at,
        })
    }
}

pub async fn create_game(pool: &SqlitePool, owner_id: i64, status: GameStatus) -> AppResult<Game> {
    let mut game = Game::new(owner_id, status);
    let status_json = game.status.to_json()?;

    let result = sqlx::query(
        "INSERT INTO games (owner_id, status, version, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(game.owner_id)
    .bind(status_json)
    .bind(game.version)
    .bind(&game.created_at)
    .execute(pool)
    .await?;

    game.id = result.last_insert_rowid();
    Ok(game)
}

pub async fn find_by_id(pool: &SqlitePool, game_id: i64) -> AppResult<Game> {
    let row = sqlx::query_as::<_, GameRow>("SELECT * FROM games WHERE id = ?")
        .bind(game_id)
        .fetch_one(pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => AppError::NotFound(format!("Game {} not found", game_id)),
            _ => AppError::from(e),
        })?;

    Game::try_from(row)
}

pub async fn list_by_owner(pool: &SqlitePool, owner_id: i64) -> AppResult<Vec<Game>> {
    let rows = sqlx::query_as::<_, GameRow>("SELECT * FROM games WHERE owner_id = ? ORDER BY id")
        .bind(owner_id)
        .fetch_all(pool)
        .await?;

    rows.into_iter().map(Game::try_from).collect()
}

/// Write the live status back to the database
///
/// Succeeds only if nobody saved this game since it was loaded; on success
/// `game.version` is bumped to match the row.
pub async fn save_status(pool: &SqlitePool, game: &mut Game) -> AppResult<()> {
    let status_json = game.status.to_json()?;

    let result = sqlx::query(
        "UPDATE games
         SET status = ?, version = version + 1
         WHERE id = ? AND version = ?",
    )
    .bind(status_json)
    .bind(game.id)
    .bind(game.version)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        // Either the game is gone or somebody else saved first
        find_by_id(pool, game.id).await?;
        tracing::warn!(game_id = game.id, version = game.version, "stale game status");
        return Err(AppError::Conflict(format!(
            "game {} was modified since version {}",
            game.id, game.version
        )));
    }

    game.version += 1;
    Ok(())
}
