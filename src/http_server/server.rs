//! # HTTP Server
//!
//! Combines the customer and employee routers with the home page and a
//! health check, and serves them until Ctrl-C.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Response, routing::get, Router};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::config::HttpServerConfig;
use super::customer_routes::customer_routes;
use super::employee_routes::employee_routes;
use super::errors::HttpResult;
use super::state::AppState;

/// HTTP Server for the record pages
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server over `state`
    pub fn new(config: HttpServerConfig, state: Arc<AppState>) -> Self {
        let router = build_router(state);
        Self { config, router }
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Serve until Ctrl-C
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr = self.config.socket_addr();
        let listener = TcpListener::bind(&addr).await?;

        info!(addr = %listener.local_addr()?, "http server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("http server stopped");
        Ok(())
    }
}

/// Build the combined router with all endpoints
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home_handler))
        .route("/health", get(health_handler))
        .with_state(state.clone())
        .merge(customer_routes(state.clone()))
        .merge(employee_routes(state))
        .layer(TraceLayer::new_for_http())
}

async fn home_handler(State(state): State<Arc<AppState>>) -> HttpResult<Response> {
    state.page("home", &json!({ "title": "Home" }))
}

async fn health_handler() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; run until the process is killed.
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
