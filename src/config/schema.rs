//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Backend service definitions.
    pub backends: Vec<BackendConfig>,

    /// Proxy routes mapping gateway paths to backend endpoints.
    pub routes: Vec<RouteConfig>,

    /// Request limits.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            backends: default_backends(),
            routes: default_routes(),
            limits: LimitsConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl GatewayConfig {
    /// Look up a backend by name.
    pub fn backend(&self, name: &str) -> Option<&BackendConfig> {
        self.backends.iter().find(|b| b.name == name)
    }

    /// Point an existing backend at a new base URL.
    ///
    /// Returns false if no backend with that name is defined.
    pub fn set_backend_url(&mut self, name: &str, url: impl Into<String>) -> bool {
        match self.backends.iter_mut().find(|b| b.name == name) {
            Some(backend) => {
                backend.url = url.into();
                true
            }
            None => false,
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// A backend service the gateway forwards to.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct BackendConfig {
    /// Unique backend identifier, referenced by routes.
    pub name: String,

    /// Base URL of the service (e.g., "http://vision:5001").
    pub url: String,
}

impl BackendConfig {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// A proxy route: requests to `path` are POSTed to `backend` at `upstream_path`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct RouteConfig {
    /// Gateway path (exact match, e.g. "/api/qa").
    pub path: String,

    /// Backend name to forward to.
    pub backend: String,

    /// Path on the backend service (e.g. "/qa").
    pub upstream_path: String,
}

impl RouteConfig {
    pub fn new(
        path: impl Into<String>,
        backend: impl Into<String>,
        upstream_path: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            backend: backend.into(),
            upstream_path: upstream_path.into(),
        }
    }
}

/// Request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum proxied request body size in bytes.
    pub max_body_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_size: 10 * 1024 * 1024, // 10MB
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// The AI services as they are addressed inside the deployment network.
pub fn default_backends() -> Vec<BackendConfig> {
    vec![
        BackendConfig::new("vision", "http://vision:5001"),
        BackendConfig::new("audio", "http://audio:5002"),
        BackendConfig::new("qa", "http://qa:5003"),
        BackendConfig::new("translation", "http://translation:5004"),
    ]
}

/// The built-in proxy route table.
pub fn default_routes() -> Vec<RouteConfig> {
    vec![
        RouteConfig::new("/api/detect", "vision", "/detect"),
        RouteConfig::new("/api/qa", "qa", "/qa"),
        RouteConfig::new("/api/summarize", "qa", "/summarize"),
        RouteConfig::new("/api/translate", "translation", "/translate"),
        RouteConfig::new("/api/tts", "translation", "/tts"),
        RouteConfig::new("/api/classify_audio", "audio", "/classify_audio"),
    ]
}
