//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout)
//! - Load the application shell served for deep links
//! - Serve the shell's assets under `/public`
//! - Serve until the shutdown broadcast fires

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::http::handlers;
use crate::routing::RouteTable;

/// Shell used when no `shell_path` is configured. It loads no scripts; a
/// real shell and its bundle come from `shell_path` and `static_dir`.
pub const DEFAULT_SHELL: &str = "<!DOCTYPE html>\n\
<html>\n\
<head><meta charset=\"utf-8\"><title>Snappy</title></head>\n\
<body><div id=\"main\"></div></body>\n\
</html>\n";

/// Mount point for `static_dir`.
pub const ASSET_PREFIX: &str = "/public";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub table: Arc<RouteTable>,
    pub shell: Arc<str>,
    pub metrics: Option<PrometheusHandle>,
}

/// HTTP server exposing the route table.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a server for `table`. Fails if the configured shell cannot be read.
    pub fn new(
        table: Arc<RouteTable>,
        config: &ServerConfig,
        metrics: Option<PrometheusHandle>,
    ) -> Result<Self, std::io::Error> {
        let shell: Arc<str> = match &config.shell_path {
            Some(path) => fs::read_to_string(path)?.into(),
            None => Arc::from(DEFAULT_SHELL),
        };

        let state = AppState {
            table,
            shell,
            metrics,
        };

        Ok(Self {
            router: Self::build_router(config, state),
            config: config.clone(),
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        let mut router = Router::new()
            .route("/_routes", get(handlers::list_routes))
            .route("/_routes/resolve", get(handlers::resolve_route))
            .route("/metrics", get(handlers::render_metrics));
        if let Some(dir) = &config.static_dir {
            tracing::debug!(dir = %dir, prefix = ASSET_PREFIX, "Serving static assets");
            router = router.nest_service(ASSET_PREFIX, ServeDir::new(dir));
        }

        router
            .fallback(handlers::serve_shell)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.request_timeout_secs,
                    )))
                    .layer(PropagateRequestIdLayer::x_request_id()),
            )
    }

    /// The assembled router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
