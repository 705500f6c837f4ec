//! Configuration validation.
//!
//! Serde handles syntax; this module checks what serde cannot: addresses
//! parse, backend URLs are usable, and every route points at a defined
//! backend without shadowing a built-in endpoint.
//!
//! All problems are collected, not just the first.

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// Paths served by the gateway itself.
pub const RESERVED_PATHS: [&str; 3] = ["/health", "/api/register", "/api/login"];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid socket address for {field}: '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("backend name must not be empty")]
    EmptyBackendName,

    #[error("duplicate backend '{0}'")]
    DuplicateBackend(String),

    #[error("backend '{name}' has invalid url '{url}': {reason}")]
    InvalidBackendUrl {
        name: String,
        url: String,
        reason: String,
    },

    #[error("route path '{0}' must start with '/' and contain only literal segments")]
    InvalidRoutePath(String),

    #[error("duplicate route '{0}'")]
    DuplicateRoute(String),

    #[error("route '{0}' shadows a built-in endpoint")]
    ReservedRoute(String),

    #[error("route '{path}' references unknown backend '{backend}'")]
    UnknownBackend { path: String, backend: String },

    #[error("route '{path}' has upstream path '{upstream_path}' not starting with '/'")]
    InvalidUpstreamPath { path: String, upstream_path: String },

    #[error("limits.max_body_size must be greater than 0")]
    ZeroBodyLimit,
}

/// Validate a configuration, returning every problem found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(
        "listener.bind_address",
        &config.listener.bind_address,
        &mut errors,
    );
    if config.observability.metrics_enabled {
        check_address(
            "observability.metrics_address",
            &config.observability.metrics_address,
            &mut errors,
        );
    }

    let mut backend_names = HashSet::new();
    for backend in &config.backends {
        if backend.name.is_empty() {
            errors.push(ValidationError::EmptyBackendName);
        } else if !backend_names.insert(backend.name.as_str()) {
            errors.push(ValidationError::DuplicateBackend(backend.name.clone()));
        }

        if let Err(reason) = check_backend_url(&backend.url) {
            errors.push(ValidationError::InvalidBackendUrl {
                name: backend.name.clone(),
                url: backend.url.clone(),
                reason,
            });
        }
    }

    let mut route_paths = HashSet::new();
    for route in &config.routes {
        if !is_literal_path(&route.path) {
            errors.push(ValidationError::InvalidRoutePath(route.path.clone()));
        } else if RESERVED_PATHS.contains(&route.path.as_str()) {
            errors.push(ValidationError::ReservedRoute(route.path.clone()));
        } else if !route_paths.insert(route.path.as_str()) {
            errors.push(ValidationError::DuplicateRoute(route.path.clone()));
        }

        if !backend_names.contains(route.backend.as_str()) {
            errors.push(ValidationError::UnknownBackend {
                path: route.path.clone(),
                backend: route.backend.clone(),
            });
        }

        if !route.upstream_path.starts_with('/') {
            errors.push(ValidationError::InvalidUpstreamPath {
                path: route.path.clone(),
                upstream_path: route.upstream_path.clone(),
            });
        }
    }

    if config.limits.max_body_size == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

// Routes match exactly; anything the axum router would read as a capture or
// wildcard is rejected here instead of panicking at registration.
fn is_literal_path(path: &str) -> bool {
    path.starts_with('/')
        && path.split('/').all(|segment| {
            !segment.starts_with(':') && !segment.contains(|c| matches!(c, '{' | '}' | '*'))
        })
}

// The outbound connector speaks plain HTTP only.
fn check_backend_url(raw: &str) -> Result<(), String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;
    if url.scheme() != "http" {
        return Err(format!("unsupported scheme '{}'", url.scheme()));
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    Ok(())
}
