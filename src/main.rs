//! Diagnostic echo server.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────────┐
//!                        │                   ECHO SERVER                    │
//!                        │                                                  │
//!   HTTP/1.1, h2c        │  ┌──────────┐   ┌──────────┐   ┌──────────────┐  │
//!   ─────────────────────┼─▶│ listener │──▶│  router  │──▶│  dispatcher  │  │
//!   (one port)           │  └──────────┘   └────┬─────┘   └──────┬───────┘  │
//!                        │                      │                │          │
//!                        │           health / throw / pets       ├─▶ websocket
//!                        │                                       ├─▶ ui page │
//!                        │                                       ├─▶ sse     │
//!                        │                                       └─▶ plain   │
//!                        │                                                  │
//!   gRPC                 │  ┌──────────┐   ┌──────────────────────────────┐ │
//!   ─────────────────────┼─▶│ listener │──▶│ tonic: echo.Echo + reflection│ │
//!   (own port)           │  └──────────┘   └──────────────────────────────┘ │
//!                        │                                                  │
//!                        │   config · lifecycle · observability · echo core │
//!                        └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use echo_server::config::load_config;
use echo_server::lifecycle::{signals, startup, Shutdown};
use echo_server::observability::logging;

#[derive(Parser)]
#[command(name = "echo-server")]
#[command(about = "Echoes HTTP, WebSocket, SSE and gRPC requests back to the caller", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, env = "ECHO_CONFIG")]
    config: Option<PathBuf>,

    /// HTTP port (HTTP/1.1, h2c, WebSocket, SSE)
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// gRPC port
    #[arg(short, long, env = "GRPC_PORT")]
    grpc_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref(), cli.port, cli.grpc_port)?;

    logging::init(&config.observability.log_level);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        http = %config.listener.bind_address,
        grpc = %config.grpc.bind_address,
        "echo-server starting"
    );

    let shutdown = Shutdown::new();
    tokio::spawn(signals::trigger_on_signal(shutdown.clone()));

    startup::run(config, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
