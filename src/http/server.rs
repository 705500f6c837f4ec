//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the axum Router with local handlers and one proxy route per
//!   `ProxyRoute`
//! - Wire up middleware (request id, tracing, metrics)
//! - Serve on a listener until shutdown is signalled

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware,
    routing::{any, post},
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::{validate_config, ConfigError, GatewayConfig};
use crate::http::proxy::proxy_handler;
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::observability::metrics;
use crate::routing::RouteTable;
use crate::users::handlers::{login_handler, register_handler};
use crate::users::UserStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<RouteTable>,
    pub users: Arc<UserStore>,
    pub client: Client<HttpConnector, Body>,
    pub max_body_size: usize,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    routes: Arc<RouteTable>,
    users: Arc<UserStore>,
}

impl HttpServer {
    /// Create a new server with an empty user store.
    pub fn new(config: GatewayConfig) -> Result<Self, ConfigError> {
        Self::with_user_store(config, Arc::new(UserStore::new()))
    }

    /// Create a new server backed by the given user store.
    pub fn with_user_store(
        config: GatewayConfig,
        users: Arc<UserStore>,
    ) -> Result<Self, ConfigError> {
        validate_config(&config).map_err(ConfigError::Validation)?;
        let routes = Arc::new(RouteTable::from_config(&config)?);

        for route in routes.iter() {
            tracing::debug!(
                path = %route.path,
                backend = %route.backend,
                upstream = %route.upstream,
                "Proxy route registered"
            );
        }

        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let state = AppState {
            routes: routes.clone(),
            users: users.clone(),
            client,
            max_body_size: config.limits.max_body_size,
        };

        let router = Self::build_router(state);
        Ok(Self {
            router,
            routes,
            users,
        })
    }

    /// Build the axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        let mut router: Router<AppState> = Router::new()
            .route("/health", any(health_handler))
            .route("/api/register", post(register_handler))
            .route("/api/login", post(login_handler));

        for route in state.routes.iter() {
            let path = route.path.clone();
            let route = Arc::new(route.clone());
            router = router.route(
                &path,
                any(move |State(state): State<AppState>, request: Request<Body>| {
                    let route = Arc::clone(&route);
                    async move { proxy_handler(state, &route, request).await }
                }),
            );
        }

        router
            .with_state(state)
            .layer(middleware::from_fn(metrics::track_metrics))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(make_span))
            .layer(set_request_id_layer())
    }

    /// Run the server until a message arrives on `shutdown`.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            proxy_routes = self.routes.len(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The user store shared with the handlers.
    pub fn users(&self) -> Arc<UserStore> {
        self.users.clone()
    }

    /// Consume the server, returning the assembled router.
    pub fn into_router(self) -> Router {
        self.router
    }
}

/// `/health`: any method, always 200 "ok".
async fn health_handler() -> &'static str {
    "ok"
}

fn make_span(request: &Request<Body>) -> tracing::Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id(request.headers()),
    )
}
