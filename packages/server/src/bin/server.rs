//! WebSocket broadcast hub server.
//!
//! Relays every message to all connected clients and replays recent history
//! to newcomers.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hearth-server
//! cargo run --bin hearth-server -- --host 0.0.0.0 --port 3000 --history-capacity 50
//! ```

use std::{sync::Arc, time::Duration};

use clap::Parser;
use hearth_server::{
    config::{HistoryConfig, ServerConfig},
    ui::{Server, signal::shutdown_signal},
};
use hearth_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "hearth-server")]
#[command(about = "WebSocket broadcast hub with history replay", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Maximum number of messages replayed to new clients
    #[arg(long, default_value = "10")]
    history_capacity: usize,

    /// Seconds a message stays eligible for replay
    #[arg(long, default_value = "10")]
    history_ttl_secs: u64,

    /// Seconds between background history sweeps (disabled when omitted)
    #[arg(long)]
    sweep_interval_secs: Option<u64>,
}

fn build_config(args: &Args) -> Result<ServerConfig, hearth_server::config::ConfigError> {
    let history = HistoryConfig::new(
        args.history_capacity,
        Duration::from_secs(args.history_ttl_secs),
    )?;
    ServerConfig::new(
        &args.host,
        args.port,
        history,
        args.sweep_interval_secs.map(Duration::from_secs),
    )
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(
        &[env!("CARGO_CRATE_NAME"), "hearth_shared", "tower_http"],
        "debug",
    );

    let args = Args::parse();

    let config = match build_config(&args) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };

    let server = Arc::new(Server::new(config, Arc::new(SystemClock)));

    // Stop on Ctrl+C / SIGTERM
    let stopper = server.clone();
    let stop_task = tokio::spawn(async move {
        shutdown_signal().await;
        if let Err(e) = stopper.stop().await {
            tracing::error!("Error while stopping server: {}", e);
        }
    });

    tracing::info!("Press Ctrl+C to shutdown gracefully");
    if let Err(e) = server.start().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    // start() only returns Ok once stop() has begun; let it report its result
    if let Err(e) = stop_task.await {
        tracing::error!("Stop task failed: {}", e);
    }
}
