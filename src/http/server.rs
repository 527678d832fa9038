//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, request deadline, CORS)
//! - Build the shared upstream client from config
//! - Serve until a shutdown signal arrives

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::{EndpointsConfig, RelayConfig};
use crate::http::handlers;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::lifecycle::shutdown::ShutdownSignal;
use crate::lifecycle::signals::shutdown_signal;
use crate::upstream::{UpstreamClient, UpstreamError};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub client: UpstreamClient,
    pub endpoints: Arc<EndpointsConfig>,
    pub service_name: Arc<str>,
}

/// HTTP server for the relay.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: RelayConfig) -> Result<Self, UpstreamError> {
        let client = UpstreamClient::new(&config.upstream)?;

        let state = AppState {
            client,
            endpoints: Arc::new(config.endpoints.clone()),
            service_name: Arc::from(config.server.service_name.as_str()),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RelayConfig, state: AppState) -> Router {
        let router = Router::new()
            .route("/", get(handlers::health))
            .route("/proxy", get(handlers::proxy_without_target))
            .route("/proxy/", get(handlers::proxy_without_target))
            .route("/proxy/{*target}", get(handlers::proxy))
            .route("/check", post(handlers::check))
            .route("/broken", post(handlers::broken))
            .with_state(state);

        let router = if config.server.cors_enabled {
            router.layer(CorsLayer::permissive())
        } else {
            router
        };

        router
            .layer(TimeoutLayer::new(Duration::from_secs(config.server.request_timeout_secs)))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// The fully layered router, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires or the process is signalled.
    pub async fn run(self, listener: TcpListener, shutdown: ShutdownSignal) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = shutdown.recv() => {},
                    _ = shutdown_signal() => {},
                }
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
