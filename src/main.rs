//! Multi-app dispatch server.
//!
//! ```text
//!     Client Request
//!     ───────────────▶ request id ─▶ trace ─▶ timeout ─▶ dispatch ─┬─▶ app-stage chain ─▶ handler
//!                                                                  │
//!                                              NoMatch (forward) ──┴─────────────────────▶ handler
//!                                              NotFound ─────────────────────────────────▶ 404
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use multi_app::app::AppRegistry;
use multi_app::config::watcher::ConfigWatcher;
use multi_app::lifecycle::{signals, startup, Shutdown};
use multi_app::observability::{logging, metrics};
use multi_app::HttpServer;

#[derive(Parser)]
#[command(name = "multi-app")]
#[command(about = "Serve sub-applications resolved by domain and path", long_about = None)]
struct Args {
    /// TOML configuration file. Watched for changes when given.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = startup::load_or_default(args.config.as_deref())?;
    logging::init_logging(&config.observability);

    tracing::info!("multi-app v{} starting", env!("CARGO_PKG_VERSION"));
    match &args.config {
        Some(path) => tracing::info!(path = ?path, "Configuration file loaded"),
        None => tracing::info!("No config file given, using defaults"),
    }
    tracing::info!(
        bind_address = %config.listener.bind_address,
        default_app = %config.app.default_app,
        base_path = ?config.app.base_path,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    // The watcher must outlive the server.
    let (_watcher, config_updates) = match &args.config {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (Some(watcher.run()?), updates)
        }
        None => {
            let (_, updates) = mpsc::unbounded_channel();
            (None, updates)
        }
    };

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    let server = HttpServer::new(config, AppRegistry::with_builtins())?;
    server.run(listener, config_updates, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
