//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    body::{Body, Bytes},
    http::{header, Method, Request, StatusCode},
    Router,
};
use tokio::net::TcpListener;

use guardian_gateway::config::GatewayConfig;
use guardian_gateway::http::HttpServer;
use guardian_gateway::lifecycle::Shutdown;
use guardian_gateway::users::UserStore;

/// A gateway running on an ephemeral port. Shuts down when dropped.
pub struct TestGateway {
    pub addr: SocketAddr,
    pub users: Arc<UserStore>,
    shutdown: Shutdown,
}

impl TestGateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestGateway {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a gateway with `config` on 127.0.0.1 and an ephemeral port.
pub async fn spawn_gateway(mut config: GatewayConfig) -> TestGateway {
    config.listener.bind_address = "127.0.0.1:0".to_string();
    let server = HttpServer::new(config).expect("valid test config");
    let users = server.users();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestGateway {
        addr,
        users,
        shutdown,
    }
}

/// A request as seen by a stub backend.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub content_type: Option<String>,
    pub request_id: Option<String>,
    pub body: Bytes,
}

/// A backend that answers every request with a fixed status and body and
/// records what it received.
pub struct StubBackend {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubBackend {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

/// Start a stub backend. It labels its responses `text/plain` so tests can
/// tell whether the gateway rewrote the content type.
pub async fn start_stub_backend(status: StatusCode, body: &'static str) -> StubBackend {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let recorded = requests.clone();

    let app = Router::new().fallback(move |request: Request<Body>| {
        let recorded = recorded.clone();
        async move {
            let (parts, body_in) = request.into_parts();
            let bytes = axum::body::to_bytes(body_in, usize::MAX).await.unwrap();
            let header_str = |name: &str| {
                parts
                    .headers
                    .get(name)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string)
            };
            recorded.lock().unwrap().push(RecordedRequest {
                method: parts.method.clone(),
                path: parts.uri.path().to_string(),
                content_type: header_str("content-type"),
                request_id: header_str("x-request-id"),
                body: bytes,
            });
            (status, [(header::CONTENT_TYPE, "text/plain")], body)
        }
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    StubBackend { addr, requests }
}

/// A base URL nothing is listening on.
pub async fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// HTTP client that ignores proxy environment variables.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
