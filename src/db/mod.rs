//! # Database Module
//!
//! - `models`: row types and their validating constructors
//! - `cards`, `decks`, `users`, `games`: queries, one module per table
//!
//! Every function takes the pool explicitly; there is no global handle.

pub mod cards;
pub mod decks;
pub mod games;
pub mod models;
pub mod users;
