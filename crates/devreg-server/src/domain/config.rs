//! Server configuration types.
//!
//! [`ServerConfig`] is the single source of truth for all runtime settings.
//! It is populated from CLI arguments (see `main.rs`) or from defaults that
//! suit local development and tests.  No environment variable reads happen
//! inside the domain layer.

use std::net::SocketAddr;
use std::time::Duration;

/// All runtime configuration for the device registry server.
///
/// Build this struct once at startup and pass it into
/// [`run_server`](crate::infrastructure::run_server).
///
/// # Example
///
/// ```rust
/// use devreg_server::domain::ServerConfig;
///
/// let cfg = ServerConfig::default();
/// assert_eq!(cfg.bind_addr.port(), 9220);
/// ```
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// The address and port the WebSocket server binds to.
    ///
    /// `0.0.0.0` accepts connections from any network interface.  Set to
    /// `127.0.0.1` to accept only local connections.
    pub bind_addr: SocketAddr,

    /// How often the keep-alive loop sends an empty-payload ping frame to
    /// every registered session.
    ///
    /// Per-session send failures during a tick are swallowed; they never
    /// cause session removal.
    pub keepalive_interval: Duration,
}

impl Default for ServerConfig {
    /// Returns a `ServerConfig` suitable for local development without any
    /// external configuration: bind `0.0.0.0:9220`, keep-alive every 10 s.
    fn default() -> Self {
        Self {
            // Compile-time-known valid socket address string.
            bind_addr: "0.0.0.0:9220".parse().unwrap(),
            keepalive_interval: Duration::from_secs(10),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_port_is_9220() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.bind_addr.port(), 9220);
    }

    #[test]
    fn test_default_keepalive_interval_is_10s() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.keepalive_interval, Duration::from_secs(10));
    }

    #[test]
    fn test_config_can_be_cloned() {
        let cfg = ServerConfig::default();
        let cloned = cfg.clone();
        assert_eq!(cfg.bind_addr, cloned.bind_addr);
        assert_eq!(cfg.keepalive_interval, cloned.keepalive_interval);
    }

    #[test]
    fn test_config_custom_values_are_stored() {
        let cfg = ServerConfig {
            bind_addr: "127.0.0.1:9000".parse().unwrap(),
            keepalive_interval: Duration::from_secs(3),
        };
        assert_eq!(cfg.bind_addr.port(), 9000);
        assert_eq!(cfg.keepalive_interval, Duration::from_secs(3));
    }
}
