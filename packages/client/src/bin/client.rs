//! Hearth CLI client.
//!
//! Connects to a Hearth hub, prints the replayed backlog and live messages as
//! `[HH:MM] origin: content`, and sends each stdin line as `{"content": line}`.
//! Reconnects on disconnection (max 5 attempts with 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hearth-client
//! cargo run --bin hearth-client -- --url ws://192.168.0.10:8080/ws
//! ```

use clap::Parser;

use hearth_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "hearth-client")]
#[command(about = "CLI client for the Hearth broadcast hub", long_about = None)]
struct Args {
    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,
}

#[tokio::main]
async fn main() {
    setup_logger(&[env!("CARGO_CRATE_NAME"), "hearth_shared"], "info");

    let args = Args::parse();

    if let Err(e) = hearth_client::run_client(args.url).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
