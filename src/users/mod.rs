//! User registry subsystem.
//!
//! # Data Flow
//! ```text
//! POST /api/register → handlers.rs (decode) → store.rs (insert-if-absent)
//! POST /api/login    → handlers.rs (decode) → store.rs (lookup + compare)
//! ```
//!
//! No hashing, persistence or real tokens: login hands back a constant
//! placeholder.

pub mod handlers;
pub mod store;

pub use store::{User, UserStore, UserStoreError, PLACEHOLDER_TOKEN};
