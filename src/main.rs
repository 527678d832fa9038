//! Frame Relay
//!
//! Fetches a resource on the caller's behalf and relays it without the
//! headers that prevent iframe embedding.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌───────────────────────────────────────────────────────┐
//!                         │                      FRAME RELAY                       │
//!                         │                                                        │
//!   Client Request        │  ┌─────────┐   ┌──────────┐   ┌──────────────┐         │
//!   ──────────────────────┼─▶│  http   │──▶│ routing  │──▶│   upstream   │─────────┼──▶ Target
//!                         │  │ server  │   │ resolver │   │    client    │◀────────┼─── Server
//!                         │  └─────────┘   └──────────┘   └──────┬───────┘         │
//!                         │                                      │                 │
//!                         │                                      ▼                 │
//!   Client Response       │  ┌─────────┐            ┌──────────────────────────┐   │
//!   ◀─────────────────────┼──│response │◀───────────│ security: sanitize headers│   │
//!                         │  │ relay   │            │ + frameability analysis  │   │
//!                         │  └─────────┘            └──────────────────────────┘   │
//!                         │                                                        │
//!                         │  Cross-cutting: config, observability, lifecycle       │
//!                         └───────────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use frame_relay::config::{load_config, RelayConfig};
use frame_relay::observability::{logging, metrics};
use frame_relay::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "frame-relay")]
#[command(about = "HTTP relay that makes resources embeddable in iframes", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "FRAME_RELAY_CONFIG")]
    config: Option<PathBuf>,

    /// Override the configured bind address.
    #[arg(short, long, env = "FRAME_RELAY_BIND")]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => RelayConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.server.bind_address = bind;
    }

    logging::init_logging(&config.observability);

    tracing::info!("frame-relay v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.server.bind_address,
        max_redirects = config.upstream.max_redirects,
        request_timeout_secs = config.server.request_timeout_secs,
        config_file = ?args.config,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        "Listening for connections"
    );

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
