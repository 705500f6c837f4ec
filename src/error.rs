//! Request-level errors and their HTTP mapping.
//!
//! Every error is terminal for the request that raised it and is rendered
//! as a status code with a short plain-text message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::users::UserStoreError;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// Body was not valid JSON for the endpoint.
    #[error("Invalid request body")]
    InvalidBody(#[source] serde_json::Error),

    /// Body could not be read (transport error or over the size limit).
    #[error("Failed to read request body")]
    BodyRead(#[source] axum::Error),

    #[error(transparent)]
    Users(#[from] UserStoreError),

    /// The backend could not be reached.
    #[error("Service unavailable")]
    Upstream(#[source] hyper_util::client::legacy::Error),

    /// The outbound request could not be built.
    #[error("Failed to build upstream request")]
    Request(#[from] axum::http::Error),
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::InvalidBody(_) | GatewayError::BodyRead(_) => StatusCode::BAD_REQUEST,
            GatewayError::Users(UserStoreError::AlreadyExists) => StatusCode::BAD_REQUEST,
            GatewayError::Users(UserStoreError::InvalidCredentials) => StatusCode::UNAUTHORIZED,
            GatewayError::Upstream(_) => StatusCode::SERVICE_UNAVAILABLE,
            GatewayError::Request(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (self.status_code(), self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn test_user_errors_map_to_status() {
        assert_eq!(
            GatewayError::from(UserStoreError::AlreadyExists).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GatewayError::from(UserStoreError::InvalidCredentials).status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_invalid_body_is_bad_request() {
        let err = serde_json::from_str::<serde_json::Value>("{nope").unwrap_err();
        let err = GatewayError::InvalidBody(err);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Invalid request body");
    }

    #[tokio::test]
    async fn test_response_is_plain_text_message() {
        let response = GatewayError::from(UserStoreError::InvalidCredentials).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "text/plain; charset=utf-8"
        );
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"Invalid credentials");
    }
}
