//! Device registry server — entry point.
//!
//! This binary accepts WebSocket connections from clients and keeps a shared,
//! in-memory registry of device records synchronized across all of them in
//! real time.  Every successful mutation (`create` / `update` / `remove`) is
//! broadcast to every connected session, and a background keep-alive loop
//! probes all sessions on a fixed interval.
//!
//! # Usage
//!
//! ```text
//! devreg-server [OPTIONS]
//!
//! Options:
//!   --port <PORT>                 WebSocket listener port [default: 9220]
//!   --bind <ADDR>                 Bind address [default: 0.0.0.0]
//!   --keepalive-interval <SECS>   Liveness probe interval in seconds [default: 10]
//! ```
//!
//! # Environment variable overrides
//!
//! CLI args take precedence when both are present.
//!
//! | Variable                     | Default   | Description                  |
//! |------------------------------|-----------|------------------------------|
//! | `DEVREG_PORT`                | `9220`    | WebSocket listener port      |
//! | `DEVREG_BIND`                | `0.0.0.0` | Bind address                 |
//! | `DEVREG_KEEPALIVE_INTERVAL`  | `10`      | Probe interval (seconds)     |
//!
//! # Architecture overview
//!
//! ```text
//! Clients  (JSON over WebSocket)
//!       ↕
//! devreg-server  ← this process
//!   domain/          ServerConfig
//!   application/     MessageRouter (decode → store → broadcast)
//!   infrastructure/
//!     registry/      SessionRegistry
//!     keepalive/     Periodic liveness probes
//!     ws_server/     Accept loop, per-connection tasks
//!       ↕
//! devreg-core  (DeviceStore, wire-protocol envelopes)
//! ```

use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use devreg_server::domain::ServerConfig;
use devreg_server::infrastructure::run_server;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Real-time shared device registry served over WebSocket.
///
/// Clients connect over WebSocket, send JSON action envelopes, and receive
/// every resulting state change as a broadcast.
#[derive(Debug, Parser)]
#[command(
    name = "devreg-server",
    about = "Real-time shared device registry over WebSocket",
    version
)]
struct Cli {
    /// TCP port for the WebSocket server to listen on.
    #[arg(long, default_value_t = 9220, env = "DEVREG_PORT")]
    port: u16,

    /// IP address to bind the WebSocket server to.
    ///
    /// Use `0.0.0.0` to accept connections from any network interface, or
    /// `127.0.0.1` to accept only local connections.
    #[arg(long, default_value = "0.0.0.0", env = "DEVREG_BIND")]
    bind: String,

    /// Keep-alive probe interval in seconds.
    ///
    /// The server sends an empty-payload ping frame to every connected
    /// session this often.
    #[arg(long, default_value_t = 10, env = "DEVREG_KEEPALIVE_INTERVAL")]
    keepalive_interval: u64,
}

impl Cli {
    /// Converts the parsed CLI arguments into a [`ServerConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if `--bind` is not a valid IP address, or the
    /// resulting socket address string cannot be parsed.
    fn into_server_config(self) -> anyhow::Result<ServerConfig> {
        let bind_addr: SocketAddr = format!("{}:{}", self.bind, self.port)
            .parse()
            .with_context(|| format!("invalid bind address: '{}:{}'", self.bind, self.port))?;

        Ok(ServerConfig {
            bind_addr,
            keepalive_interval: Duration::from_secs(self.keepalive_interval),
        })
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Program entry point.
///
/// 1. Initialises `tracing_subscriber` (log level via `RUST_LOG`, fallback
///    `info`).
/// 2. Parses CLI arguments into a [`ServerConfig`].
/// 3. Spawns a Ctrl+C handler that clears the shared shutdown flag.
/// 4. Runs the accept loop until shutdown, then tears down keep-alive and
///    all remaining sessions.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.into_server_config()?;

    info!(
        "device registry starting — bind={}, keepalive={:?}",
        config.bind_addr, config.keepalive_interval
    );

    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);

    // The accept loop checks this flag every 200 ms and exits cleanly.
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C — initiating graceful shutdown");
                running_clone.store(false, Ordering::Relaxed);
            }
            Err(e) => {
                tracing::error!("failed to listen for Ctrl+C signal: {e}");
            }
        }
    });

    run_server(config, running).await?;

    info!("device registry stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_produce_correct_port() {
        let cli = Cli::parse_from(["devreg-server"]);
        assert_eq!(cli.port, 9220);
    }

    #[test]
    fn test_cli_defaults_produce_correct_bind_address() {
        let cli = Cli::parse_from(["devreg-server"]);
        assert_eq!(cli.bind, "0.0.0.0");
    }

    #[test]
    fn test_cli_defaults_produce_correct_keepalive_interval() {
        let cli = Cli::parse_from(["devreg-server"]);
        assert_eq!(cli.keepalive_interval, 10);
    }

    #[test]
    fn test_cli_port_override() {
        let cli = Cli::parse_from(["devreg-server", "--port", "9999"]);
        assert_eq!(cli.port, 9999);
    }

    #[test]
    fn test_cli_bind_override() {
        let cli = Cli::parse_from(["devreg-server", "--bind", "127.0.0.1"]);
        assert_eq!(cli.bind, "127.0.0.1");
    }

    #[test]
    fn test_cli_keepalive_interval_override() {
        let cli = Cli::parse_from(["devreg-server", "--keepalive-interval", "3"]);
        assert_eq!(cli.keepalive_interval, 3);
    }

    #[test]
    fn test_into_server_config_default_port() {
        let cli = Cli::parse_from(["devreg-server"]);
        let config = cli.into_server_config().unwrap();
        assert_eq!(config.bind_addr.port(), 9220);
    }

    #[test]
    fn test_into_server_config_custom_values() {
        let cli = Cli::parse_from([
            "devreg-server",
            "--bind",
            "127.0.0.1",
            "--port",
            "8080",
            "--keepalive-interval",
            "30",
        ]);
        let config = cli.into_server_config().unwrap();
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.keepalive_interval, Duration::from_secs(30));
    }

    #[test]
    fn test_into_server_config_invalid_bind_returns_error() {
        let cli = Cli {
            port: 9220,
            bind: "not.an.ip".to_string(),
            keepalive_interval: 10,
        };

        let result = cli.into_server_config();

        assert!(result.is_err());
    }
}
