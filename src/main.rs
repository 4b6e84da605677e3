//! webdm route server.
//!
//! # Architecture Overview
//!
//! ```text
//!     config (TOML, optional)
//!         │
//!         ▼
//!     validate ──▶ bind section controllers ──▶ RouteTable (immutable, Arc)
//!                                                    │
//!     Browser request                                ▼
//!     ───────────────▶ http server ──▶ resolve ──▶ app shell │ 404
//!                                                    │
//!                                        /_routes, /_routes/resolve, /metrics
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use webdm_routes::config::{load_config, RouterConfig};
use webdm_routes::http::HttpServer;
use webdm_routes::lifecycle::{build_table, signals, Shutdown};
use webdm_routes::observability::{logging, metrics};
use webdm_routes::sections;

#[derive(Parser)]
#[command(name = "webdm-routes")]
#[command(about = "Serve the webdm route table and application shell", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => RouterConfig::default(),
    };

    logging::init_logging(&config.observability);
    tracing::info!("webdm-routes v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.server.bind_address,
        groups = config.routes.len(),
        request_timeout_secs = config.server.request_timeout_secs,
        "Configuration loaded"
    );

    let controllers = sections::registry(&sections::section_controllers());
    let table = Arc::new(build_table(&config, &controllers)?);

    let metrics_handle = if config.observability.metrics_enabled {
        metrics::install_recorder()
    } else {
        None
    };

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(table, &config.server, metrics_handle)?;
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        signals::wait_for_signal().await;
        shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
