//! Proxy handler.
//!
//! # Responsibilities
//! - Buffer the inbound body (bounded by `limits.max_body_size`)
//! - POST it as JSON to the route's fixed upstream URI
//! - Relay the upstream status and body, labelled as JSON
//!
//! # Design Decisions
//! - The inbound method is ignored; the upstream always receives a POST
//! - Body bytes are forwarded untouched, never re-serialized
//! - One attempt only: no retries, no timeout
//! - The upstream body is streamed back, not buffered

use axum::{
    body::Body,
    http::{header, HeaderValue, Method, Request, StatusCode},
    response::{IntoResponse, Response},
};

use crate::error::GatewayError;
use crate::http::request::{request_id, X_REQUEST_ID};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::routing::ProxyRoute;

const APPLICATION_JSON: HeaderValue = HeaderValue::from_static("application/json");

/// Forward `request` to `route.upstream`.
pub async fn proxy_handler(state: AppState, route: &ProxyRoute, request: Request<Body>) -> Response {
    match forward(&state, route, request).await {
        Ok(response) => response,
        Err(e) => e.into_response(),
    }
}

async fn forward(
    state: &AppState,
    route: &ProxyRoute,
    request: Request<Body>,
) -> Result<Response, GatewayError> {
    let (parts, body) = request.into_parts();
    let request_id = request_id(&parts.headers).to_string();

    let body = axum::body::to_bytes(body, state.max_body_size)
        .await
        .map_err(|e| {
            tracing::warn!(request_id = %request_id, path = %route.path, error = %e, "Failed to read request body");
            GatewayError::BodyRead(e)
        })?;

    tracing::debug!(
        request_id = %request_id,
        path = %route.path,
        upstream = %route.upstream,
        bytes = body.len(),
        "Proxying request"
    );

    let mut upstream_request = Request::builder()
        .method(Method::POST)
        .uri(route.upstream.clone())
        .header(header::CONTENT_TYPE, APPLICATION_JSON);
    if let Some(id) = parts.headers.get(X_REQUEST_ID) {
        upstream_request = upstream_request.header(X_REQUEST_ID, id.clone());
    }
    let upstream_request = upstream_request.body(Body::from(body))?;

    let upstream_response = state.client.request(upstream_request).await.map_err(|e| {
        tracing::error!(
            request_id = %request_id,
            backend = %route.backend,
            upstream = %route.upstream,
            error = %e,
            "Upstream error"
        );
        metrics::record_upstream_failure(&route.backend);
        GatewayError::Upstream(e)
    })?;

    let status = upstream_response.status();
    tracing::debug!(
        request_id = %request_id,
        backend = %route.backend,
        status = %status,
        "Upstream responded"
    );

    Ok(relay(status, Body::new(upstream_response.into_body())))
}

/// Build the client response: upstream status, JSON content type, upstream body.
fn relay(status: StatusCode, body: Body) -> Response {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, APPLICATION_JSON);
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_relay_overrides_content_type() {
        let response = relay(StatusCode::CREATED, Body::from(r#"{"x":1}"#));
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], br#"{"x":1}"#);
    }
}
