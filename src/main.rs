//! route-keeper admin service.
//!
//! # Architecture Overview
//!
//! ```text
//!   admin client ──▶ http (axum) ──▶ store (one lock) ──▶ document / routes
//!                                        │
//!                                        ▼
//!                                  persistence ──▶ config.yaml ──▶ proxy (watches file)
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use route_keeper::config::load_or_default;
use route_keeper::http::AdminServer;
use route_keeper::lifecycle::{signals, startup, Shutdown};
use route_keeper::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "route-keeper")]
#[command(about = "Admin API for a file-backed reverse proxy configuration", long_about = None)]
struct Args {
    /// Service configuration file (TOML). Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Document to manage; overrides `store.path`.
    #[arg(short, long)]
    document: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = load_or_default(args.config.as_deref())?;
    if let Some(document) = args.document {
        config.store.path = document.display().to_string();
    }

    logging::init_logging(&config.observability);
    tracing::info!("route-keeper v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let store = startup::open_store(&config.store).map_err(|e| {
        tracing::error!(path = %config.store.path, error = %e, "Cannot start without a valid document");
        e
    })?;
    let _watcher = startup::start_watcher(&config.store, &store);

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        document = %config.store.path,
        policy = ?config.store.reload,
        request_timeout_secs = config.timeouts.request_secs,
        "Listening for admin requests"
    );

    let shutdown = Shutdown::new();
    let server = AdminServer::new(&config, store);
    let server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    signals::wait_for_shutdown().await;
    shutdown.trigger();
    server_task.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}
