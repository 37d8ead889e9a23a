//! # Session Keys and Flash Messages
//!
//! Thin helpers over `tower_sessions::Session` so handlers never spell out
//! key names. The session carries:
//! - `logged_in`: set to true after a successful login
//! - `uid`: id of the logged-in user
//! - `_flashes`: messages queued for the next rendered page

use tower_sessions::Session;

use crate::error::AppResult;

const LOGGED_IN: &str = "logged_in";
const UID: &str = "uid";
const FLASHES: &str = "_flashes";

pub async fn log_in(session: &Session, user_id: i64) -> AppResult<()> {
    session.insert(LOGGED_IN, true).await?;
    session.insert(UID, user_id).await?;
    Ok(())
}

pub async fn log_out(session: &Session) -> AppResult<()> {
    session.remove::<bool>(LOGGED_IN).await?;
    session.remove::<i64>(UID).await?;
    Ok(())
}

/// Id of the logged-in user, if any
///
/// A `uid` without `logged_in` does not count.
pub async fn current_uid(session: &Session) -> AppResult<Option<i64>> {
    let logged_in = session.get::<bool>(LOGGED_IN).await?.unwrap_or(false);
    if !logged_in {
        return Ok(None);
    }
    Ok(session.get::<i64>(UID).await?)
}

/// Queue a message for the next rendered page
pub async fn flash(session: &Session, message: impl Into<String>) -> AppResult<()> {
    let mut flashes: Vec<String> = session.get(FLASHES).await?.unwrap_or_default();
    flashes.push(message.into());
    session.insert(FLASHES, flashes).await?;
    Ok(())
}

/// Remove and return all queued messages
pub async fn take_flashes(session: &Session) -> AppResult<Vec<String>> {
    Ok(session.remove::<Vec<String>>(FLASHES).await?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tower_sessions::MemoryStore;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn flashes_are_consumed_once() {
        let session = session();
        flash(&session, "one").await.unwrap();
        flash(&session, "two").await.unwrap();

        assert_eq!(take_flashes(&session).await.unwrap(), vec!["one", "two"]);
        assert!(take_flashes(&session).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn login_state_round_trip() {
        let session = session();
        assert_eq!(current_uid(&session).await.unwrap(), None);

        log_in(&session, 7).await.unwrap();
        assert_eq!(current_uid(&session).await.unwrap(), Some(7));

        log_out(&session).await.unwrap();
        assert_eq!(current_uid(&session).await.unwrap(), None);
    }

    #[tokio::test]
    async fn uid_without_logged_in_flag_is_ignored() {
        let session = session();
        session.insert(UID, 3_i64).await.unwrap();
        assert_eq!(current_uid(&session).await.unwrap(), None);
    }
}
