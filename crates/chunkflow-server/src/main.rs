//! chunkflow server binary.
//!
//! Serves the queue over HTTP from either the disk engine or the in-memory
//! engine:
//!
//! ```bash
//! # Durable queue in /var/lib/chunkflow, port 8080
//! chunkflow-server --dirname /var/lib/chunkflow
//!
//! # Volatile queue for local development
//! chunkflow-server --inmem --port 9000
//! ```
//!
//! Logging is controlled via `RUST_LOG` (default: `info`).

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chunkflow_server::{create_router, AppState};
use chunkflow_storage::{DiskStorage, MemoryStorage, Storage, StorageConfig};
use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "chunkflow-server", about = "Persistent message queue server")]
struct Args {
    /// Directory where chunk files are stored
    #[arg(long)]
    dirname: Option<PathBuf>,

    /// Use the in-memory storage engine instead of the disk one
    #[arg(long)]
    inmem: bool,

    /// Network port to listen on
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let storage: Arc<dyn Storage> = if args.inmem {
        tracing::info!("using in-memory storage");
        Arc::new(MemoryStorage::default())
    } else {
        let directory = args
            .dirname
            .context("the flag `--dirname` must be provided unless `--inmem` is set")?;
        let storage = DiskStorage::open(StorageConfig {
            directory,
            ..Default::default()
        })
        .await
        .context("opening disk storage")?;
        Arc::new(storage)
    };

    let app = create_router(AppState { storage });
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", args.port))
        .await
        .with_context(|| format!("binding port {}", args.port))?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server shut down");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C handler");
    tracing::info!("received Ctrl+C, shutting down");
}
