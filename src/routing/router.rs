//! Proxy route table.
//!
//! # Responsibilities
//! - Compile `RouteConfig` entries into routes with a resolved upstream URI
//!
//! # Design Decisions
//! - Immutable after construction (shared via Arc without locks)
//! - Exact path matching only; the axum router does the dispatch
//! - Upstream URIs are built once at startup, never per request

use axum::http::Uri;
use thiserror::Error;
use url::Url;

use crate::config::GatewayConfig;

/// Error compiling the route table.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("route '{path}' references unknown backend '{backend}'")]
    UnknownBackend { path: String, backend: String },

    #[error("invalid upstream url for route '{path}': {reason}")]
    InvalidUpstream { path: String, reason: String },
}

/// A gateway path bound to a fixed backend endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyRoute {
    /// Path the gateway serves (e.g. "/api/qa").
    pub path: String,
    /// Backend name, used for logging and metrics.
    pub backend: String,
    /// Full upstream URI (e.g. "http://qa:5003/qa").
    pub upstream: Uri,
}

/// Compiled, immutable set of proxy routes.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<ProxyRoute>,
}

impl RouteTable {
    /// Build the table from configuration.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, RouteError> {
        let mut table = Self::default();

        for route in &config.routes {
            let backend =
                config
                    .backend(&route.backend)
                    .ok_or_else(|| RouteError::UnknownBackend {
                        path: route.path.clone(),
                        backend: route.backend.clone(),
                    })?;

            let upstream = resolve_upstream(&backend.url, &route.upstream_path).map_err(
                |reason| RouteError::InvalidUpstream {
                    path: route.path.clone(),
                    reason,
                },
            )?;

            table.routes.push(ProxyRoute {
                path: route.path.clone(),
                backend: route.backend.clone(),
                upstream,
            });
        }

        Ok(table)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProxyRoute> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Join a backend base URL and an absolute upstream path into a URI.
fn resolve_upstream(base: &str, upstream_path: &str) -> Result<Uri, String> {
    let base = Url::parse(base).map_err(|e| e.to_string())?;
    let joined = base.join(upstream_path).map_err(|e| e.to_string())?;
    joined
        .as_str()
        .parse::<Uri>()
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BackendConfig, RouteConfig};

    fn find<'a>(table: &'a RouteTable, path: &str) -> Option<&'a ProxyRoute> {
        table.iter().find(|r| r.path == path)
    }

    #[test]
    fn test_default_table() {
        let table = RouteTable::from_config(&GatewayConfig::default()).unwrap();
        assert_eq!(table.len(), 6);

        let expected = [
            ("/api/detect", "http://vision:5001/detect"),
            ("/api/qa", "http://qa:5003/qa"),
            ("/api/summarize", "http://qa:5003/summarize"),
            ("/api/translate", "http://translation:5004/translate"),
            ("/api/tts", "http://translation:5004/tts"),
            ("/api/classify_audio", "http://audio:5002/classify_audio"),
        ];
        for (path, upstream) in expected {
            let route = find(&table, path).unwrap();
            assert_eq!(route.upstream.to_string(), upstream, "route {path}");
        }
        assert!(find(&table, "/api/login").is_none());
    }

    #[test]
    fn test_upstream_path_replaces_base_path() {
        let config = GatewayConfig {
            backends: vec![BackendConfig::new("qa", "http://127.0.0.1:7003/v1/")],
            routes: vec![RouteConfig::new("/api/qa", "qa", "/qa")],
            ..GatewayConfig::default()
        };

        let table = RouteTable::from_config(&config).unwrap();
        let route = find(&table, "/api/qa").unwrap();
        assert_eq!(route.upstream.to_string(), "http://127.0.0.1:7003/qa");
        assert_eq!(route.backend, "qa");
    }

    #[test]
    fn test_unknown_backend() {
        let config = GatewayConfig {
            backends: Vec::new(),
            ..GatewayConfig::default()
        };
        let err = RouteTable::from_config(&config).unwrap_err();
        assert!(matches!(err, RouteError::UnknownBackend { .. }));
    }
}
