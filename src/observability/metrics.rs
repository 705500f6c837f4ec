//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by method, matched path, status
//! - `gateway_request_duration_seconds` (histogram): latency by method, matched path
//! - `gateway_upstream_failures_total` (counter): unreachable backend by name
//! - `gateway_user_events_total` (counter): register/login outcomes
//!
//! Recording is a no-op until a recorder is installed with [`init_metrics`].

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware::Next,
    response::Response,
};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener on `addr`.
///
/// Must be called from within a tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Middleware recording request count and latency per matched route.
pub async fn track_metrics(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let path = match request.extensions().get::<MatchedPath>() {
        Some(matched) => matched.as_str().to_string(),
        None => "unmatched".to_string(),
    };
    let method = request.method().to_string();

    let response = next.run(request).await;

    record_request(method, path, response.status().as_u16(), start);
    response
}

pub fn record_request(method: String, path: String, status: u16, start: Instant) {
    let elapsed = start.elapsed().as_secs_f64();
    metrics::counter!(
        "gateway_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!(
        "gateway_request_duration_seconds",
        "method" => method,
        "path" => path
    )
    .record(elapsed);
}

pub fn record_upstream_failure(backend: &str) {
    metrics::counter!("gateway_upstream_failures_total", "backend" => backend.to_string())
        .increment(1);
}

pub fn record_user_event(event: &'static str) {
    metrics::counter!("gateway_user_events_total", "event" => event).increment(1);
}
