//! Registration and login handlers.
//!
//! Bodies are decoded by hand rather than with the `Json` extractor so that
//! any malformed payload is a 400, whatever its content type.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;

use crate::error::GatewayError;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::users::store::{User, PLACEHOLDER_TOKEN};

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub token: &'static str,
}

// Only the first JSON value is read; anything after it is ignored.
fn decode_user(body: &[u8]) -> Result<User, GatewayError> {
    let mut values = serde_json::Deserializer::from_slice(body).into_iter::<User>();
    match values.next() {
        Some(user) => user.map_err(GatewayError::InvalidBody),
        // Empty or whitespace-only body: let the plain decoder report EOF.
        None => serde_json::from_slice(body).map_err(GatewayError::InvalidBody),
    }
}

/// `POST /api/register`
pub async fn register_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, GatewayError> {
    let user = decode_user(&body)?;
    let username = user.username.clone();

    if let Err(e) = state.users.register(user) {
        tracing::debug!(username = %username, "Registration rejected: {}", e);
        metrics::record_user_event("register_rejected");
        return Err(e.into());
    }

    tracing::info!(username = %username, "User registered");
    metrics::record_user_event("register");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User registered",
        }),
    ))
}

/// `POST /api/login`
pub async fn login_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<LoginResponse>, GatewayError> {
    let creds = decode_user(&body)?;

    if let Err(e) = state.users.authenticate(&creds.username, &creds.password) {
        tracing::debug!(username = %creds.username, "Login rejected");
        metrics::record_user_event("login_rejected");
        return Err(e.into());
    }

    tracing::debug!(username = %creds.username, "Login successful");
    metrics::record_user_event("login");
    Ok(Json(LoginResponse {
        message: "Login successful",
        token: PLACEHOLDER_TOKEN,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_user() {
        let user = decode_user(br#"{"username":"alice","password":"pw"}"#).unwrap();
        assert_eq!(user, User::new("alice", "pw"));

        assert!(matches!(
            decode_user(b"username=alice"),
            Err(GatewayError::InvalidBody(_))
        ));
    }

    #[test]
    fn test_decode_user_ignores_trailing_text() {
        let user = decode_user(b"{\"username\":\"erin\",\"password\":\"pw\"} trailing").unwrap();
        assert_eq!(user, User::new("erin", "pw"));

        let user = decode_user(br#"{"username":"erin"}{"username":"mallory"}"#).unwrap();
        assert_eq!(user, User::new("erin", ""));
    }

    #[test]
    fn test_decode_user_rejects_empty_and_mistyped_bodies() {
        for body in [&b""[..], b"   ", b"[1,2]", br#"{"password":7}"#, b"{\"username\":"] {
            assert!(
                matches!(decode_user(body), Err(GatewayError::InvalidBody(_))),
                "{:?}",
                String::from_utf8_lossy(body)
            );
        }
    }

    #[test]
    fn test_login_response_shape() {
        let body = serde_json::to_value(LoginResponse {
            message: "Login successful",
            token: PLACEHOLDER_TOKEN,
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"message": "Login successful", "token": "dummy-token"})
        );
    }
}
