//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     RouteConfig[] + BackendConfig[]
//!     → router.rs (resolve backend base URL + upstream path)
//!     → Freeze as immutable RouteTable
//!
//! Server assembly:
//!     RouteTable → one axum route per ProxyRoute → http::proxy
//! ```

pub mod router;

pub use router::{ProxyRoute, RouteError, RouteTable};
