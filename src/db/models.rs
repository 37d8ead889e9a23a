//! # Database Models
//!
//! Structs that map to rows of the `cards`, `decks`, `users` and `games`
//! tables. Each has a validating constructor; ids are assigned by SQLite on
//! insert, so a freshly constructed value carries `id == 0` until the
//! matching `create_*` function in the sibling modules stores it.

use std::sync::LazyLock;

use chrono::Utc;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::error::{AppError, AppResult};

/// Replacement for any run of two or more underscores in card text
pub const BLANK: &str = "____";

pub const MAX_CARD_TEXT: usize = 512;
pub const MAX_DECK_NAME: usize = 512;
pub const MAX_USERNAME: usize = 128;
pub const MAX_EMAIL: usize = 512;

static UNDERSCORE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("__+").expect("underscore pattern is valid"));

/// SHA-256 of the UTF-8 bytes of `text`, as lowercase hex
pub fn sha256_hex(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

/// Rewrites every run of two or more underscores to exactly [`BLANK`]
pub fn normalize_card_text(text: &str) -> String {
    UNDERSCORE_RUN.replace_all(text, BLANK).into_owned()
}

fn check_length(field: &str, value: &str, max: usize) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} must not be empty", field)));
    }
    if value.chars().count() > max {
        return Err(AppError::Validation(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}

/// Classification derived from card text
///
/// Cards with a blank are questions (prompt cards), the rest are answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[repr(i64)]
pub enum CardKind {
    Answer = 0,
    Question = 1,
}

impl CardKind {
    /// Kind of already-normalized text
    pub fn of(text: &str) -> Self {
        if text.contains(BLANK) {
            CardKind::Question
        } else {
            CardKind::Answer
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Card {
    pub id: i64,

    /// Normalized text, unique across all cards
    pub text: String,

    pub kind: CardKind,

    /// RFC 3339 timestamp
    pub created_at: String,
}

impl Card {
    /// Normalizes `text`, derives the kind, and validates the length
    ///
    /// ## Example
    /// ```rust
    /// let card = wah::db::models::Card::new("a__b").unwrap();
    /// assert_eq!(card.text, "a____b");
    /// ```
    pub fn new(text: &str) -> AppResult<Self> {
        let text = normalize_card_text(text);
        check_length("card text", &text, MAX_CARD_TEXT)?;

        let kind = CardKind::of(&text);
        tracing::debug!(?kind, "new card: {:?}", text);

        Ok(Self {
            id: 0,
            text,
            kind,
            created_at: Utc::now().to_rfc3339(),
        })
    }
}

/// A named collection of cards
///
/// The cards themselves live in `deck_card_associations` and are loaded
/// separately with `decks::cards_in_deck`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Deck {
    pub id: i64,
    pub name: String,
    pub owner_id: Option<i64>,
    pub created_at: String,
}

impl Deck {
    pub fn new(name: &str, owner_id: Option<i64>) -> AppResult<Self> {
        let name = name.trim();
        check_length("deck name", name, MAX_DECK_NAME)?;

        Ok(Self {
            id: 0,
            name: name.to_string(),
            owner_id,
            created_at: Utc::now().to_rfc3339(),
        })
    }
}

/// User account
///
/// `password` always holds the SHA-256 hex digest of the plaintext.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub created_at: String,
}

impl User {
    /// Validates the fields and hashes the plaintext password
    pub fn new(username: &str, email: &str, password: &str) -> AppResult<Self> {
        let username = username.trim();
        let email = email.trim();
        check_length("username", username, MAX_USERNAME)?;
        check_length("email", email, MAX_EMAIL)?;
        if !email.contains('@') {
            return Err(AppError::Validation("email must contain '@'".to_string()));
        }
        if password.is_empty() {
            return Err(AppError::Validation("password must not be empty".to_string()));
        }

        Ok(Self {
            id: 0,
            username: username.to_string(),
            email: email.to_string(),
            password: sha256_hex(password),
            created_at: Utc::now().to_rfc3339(),
        })
    }

    /// True iff the digest of `password` matches the stored digest
    pub fn valid_pass(&self, password: &str) -> bool {
        sha256_hex(password) == self.password
    }
}

/// Application-defined state of a game
///
/// Only `password` has a meaning to the server (digest of the join
/// password); everything else is carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GameStatus {
    /// Status protected by a join password (stored hashed)
    pub fn with_password(password: &str) -> Self {
        Self {
            password: Some(sha256_hex(password)),
            extra: Map::new(),
        }
    }

    pub fn set_password(&mut self, password: &str) {
        self.password = Some(sha256_hex(password));
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.extra.insert(key.into(), value)
    }

    pub fn to_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(raw: &str) -> AppResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// A game owned by a user
///
/// `status` is the live, deserialized value. Mutating it changes nothing in
/// the database until `games::save_status` is called, which only succeeds
/// if the row still has the `version` this value was loaded with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Game {
    pub id: i64,
    pub owner_id: i64,
    #[serde(skip_serializing)]
    pub status: GameStatus,
    pub version: i64,
    pub created_at: String,
}

impl Game {
    pub fn new(owner_id: i64, status: GameStatus) -> Self {
        tracing::debug!(owner_id, "new game, status: {:?}", status);
        Self {
            id: 0,
            owner_id,
            status,
            version: 0,
            created_at: Utc::now().to_rfc3339(),
        }
    }

    /// Checks a join password; games without one reject everything
    pub fn valid_pass(&self, password: &str) -> bool {
        match &self.status.password {
            Some(digest) => sha256_hex(password) == *digest,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn runs_of_underscores_collapse_to_four() {
        assert_eq!(normalize_card_text("a__b"), "a____b");
        assert_eq!(normalize_card_text("a___b"), "a____b");
        assert_eq!(normalize_card_text("a________b"), "a____b");
        assert_eq!(normalize_card_text("__ and __."), "____ and ____.");
    }

    #[test]
    fn single_underscores_are_left_alone() {
        assert_eq!(normalize_card_text("snake_case_word"), "snake_case_word");
        assert_eq!(normalize_card_text("no blanks here"), "no blanks here");
    }

    #[test]
    fn kind_follows_blanks() {
        assert_eq!(Card::new("a__b").unwrap().kind, CardKind::Question);
        assert_eq!(Card::new("What is ____?").unwrap().kind, CardKind::Question);
        assert_eq!(Card::new("a_b").unwrap().kind, CardKind::Answer);
        assert_eq!(Card::new("sopra la panca la capra canta").unwrap().kind, CardKind::Answer);
    }

    #[test]
    fn card_text_is_stored_normalized() {
        let card = Card::new("sopra__la___panca").unwrap();
        assert_eq!(card.text, "sopra____la____panca");
        assert_eq!(card.id, 0);
    }

    #[test]
    fn card_text_length_is_checked_after_normalization() {
        // 600 underscores collapse to four, which is fine
        assert!(Card::new(&"_".repeat(600)).is_ok());
        assert!(Card::new(&"x".repeat(MAX_CARD_TEXT)).is_ok());
        assert!(matches!(
            Card::new(&"x".repeat(MAX_CARD_TEXT + 1)),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(Card::new("   "), Err(AppError::Validation(_))));
    }

    #[test]
    fn sha256_matches_known_digest() {
        assert_eq!(
            sha256_hex("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn user_password_is_hashed() {
        let user = User::new("alice", "alice@example.org", "wonderland").unwrap();
        assert_ne!(user.password, "wonderland");
        assert_eq!(user.password, sha256_hex("wonderland"));
        assert_eq!(user.password.len(), 64);
        assert!(user.valid_pass("wonderland"));
        assert!(!user.valid_pass("Wonderland"));
        assert!(!user.valid_pass(&user.password));
    }

    #[test]
    fn user_fields_are_validated() {
        assert!(User::new("", "a@b.c", "pw").is_err());
        assert!(User::new("bob", "not-an-email", "pw").is_err());
        assert!(User::new("bob", "bob@example.org", "").is_err());
        assert!(User::new(&"b".repeat(MAX_USERNAME + 1), "bob@example.org", "pw").is_err());
    }

    #[test]
    fn deck_name_is_trimmed() {
        let deck = Deck::new("  base set ", Some(3)).unwrap();
        assert_eq!(deck.name, "base set");
        assert_eq!(deck.owner_id, Some(3));
        assert!(Deck::new(" ", None).is_err());
    }

    #[test]
    fn game_status_keeps_unknown_keys() {
        let raw = r#"{"password":"abc","round":3,"players":["a","b"]}"#;
        let status = GameStatus::from_json(raw).unwrap();
        assert_eq!(status.password.as_deref(), Some("abc"));
        assert_eq!(status.get("round"), Some(&json!(3)));

        let back: Value = serde_json::from_str(&status.to_json().unwrap()).unwrap();
        assert_eq!(back, serde_json::from_str::<Value>(raw).unwrap());
    }

    #[test]
    fn empty_status_serializes_to_empty_object() {
        assert_eq!(GameStatus::default().to_json().unwrap(), "{}");
    }

    #[test]
    fn game_password_check() {
        let open = Game::new(1, GameStatus::default());
        assert!(!open.valid_pass(""));

        let mut locked = Game::new(1, GameStatus::with_password("letmein"));
        assert!(locked.valid_pass("letmein"));
        assert!(!locked.valid_pass("nope"));

        locked.status.set_password("changed");
        assert!(locked.valid_pass("changed"));
    }
}
