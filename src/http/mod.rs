//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum setup, middleware)
//!     → request.rs (assign x-request-id)
//!     → dispatch by path:
//!         /health          → server.rs
//!         /api/register    → users::handlers
//!         /api/login       → users::handlers
//!         proxy routes     → proxy.rs → backend
//!     → Send to client
//! ```

pub mod proxy;
pub mod request;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
