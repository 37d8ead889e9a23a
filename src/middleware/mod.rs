//! # Middleware Module
//!
//! - `auth`: resolves the session user for routes that need one
//!   (`/game/add`, `/game/list`)

pub mod auth;
