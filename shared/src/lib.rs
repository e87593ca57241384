//! Shared types for the storefront back office
//!
//! Data models exchanged between the server and its clients, plus small
//! utilities (IDs, timestamps, slugs). DB row types derive
//! `sqlx::FromRow` behind the `db` feature so frontend consumers don't
//! pull in the database stack.

pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
