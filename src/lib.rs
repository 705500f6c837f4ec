//! Guardian Gateway Library
//!
//! An HTTP gateway in front of the vision, QA, translation and audio
//! services, plus an in-memory user registry.
//!
//! ```text
//!     Client ──▶ http::server ──┬──▶ /health            (local)
//!                               ├──▶ /api/register      (users::store)
//!                               ├──▶ /api/login         (users::store)
//!                               └──▶ /api/<route>  ──▶ http::proxy ──▶ Backend
//! ```

// Core subsystems
pub mod config;
pub mod error;
pub mod http;
pub mod routing;
pub mod users;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::schema::GatewayConfig;
pub use error::GatewayError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use users::{User, UserStore};
