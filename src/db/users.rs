use crate::config::Config;
use crate::db::models::User;
use crate::error::{AppError, AppResult};
use sqlx::SqlitePool;

/// Hash the password and store a new user
///
/// Duplicate username or email fails with `AppError::Validation`.
pub async fn create_user(
    pool: &SqlitePool,
    username: &str,
    email: &str,
    password: &str,
) -> AppResult<User> {
    let mut user = User::new(username, email, password)?;

    let result = sqlx::query(
        "INSERT INTO users (username, email, password, created_at)
         VALUES (?, ?, ?, ?)",
    )
    .bind(&user.username)
    .bind(&user.email)
    .bind(&user.password)
    .bind(&user.created_at)
    .execute(pool)
    .await?;

    user.id = result.last_insert_rowid();
    Ok(user)
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> AppResult<User> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
        .bind(username)
        .fetch_one(pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => AppError::NotFound(format!("User '{}' not found", username)),
            _ => AppError::from(e),
        })?;

    Ok(user)
}

pub async fn find_by_id(pool: &SqlitePool, user_id: i64) -> AppResult<User> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => AppError::NotFound(format!("User with id {} not found", user_id)),
            _ => AppError::from(e),
        })?;

    Ok(user)
}

pub async fn count(pool: &SqlitePool) -> AppResult<i64> {
    let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    Ok(n)
}

/// Create the configured admin account unless that username already exists
///
/// Returns true when the account was created. Safe to run on every start.
pub async fn ensure_admin(pool: &SqlitePool, config: &Config) -> AppResult<bool> {
    match find_by_username(pool, &config.admin_user).await {
        Ok(_) => Ok(false),
        Err(AppError::NotFound(_)) => {
            create_user(pool, &config.admin_user, &config.admin_mail, &config.admin_pass).await?;
            tracing::info!("Created admin account '{}'", config.admin_user);
            Ok(true)
        }
        Err(e) => Err(e),
    }
}
