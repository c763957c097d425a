//! Server configuration.

use std::net::SocketAddr;
use std::time::Duration;

/// Configuration for the dictionary server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to.
    pub bind_addr: SocketAddr,
    /// Maximum concurrently served connections; further connections wait
    /// in the accept queue until a session ends.
    pub max_connections: usize,
    /// How long a session may sit idle between request lines before the
    /// server closes it. `None` disables the timeout.
    pub idle_timeout: Option<Duration>,
}

impl ServerConfig {
    /// Creates a configuration with defaults for everything but the
    /// address.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            max_connections: 64,
            idle_timeout: Some(Duration::from_secs(300)),
        }
    }

    /// Sets the maximum number of concurrently served connections.
    #[must_use]
    pub fn with_max_connections(mut self, max: usize) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the idle-read timeout.
    #[must_use]
    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = Some(timeout);
        self
    }

    /// Disables the idle-read timeout; a silent client holds its session
    /// until it disconnects.
    #[must_use]
    pub fn without_idle_timeout(mut self) -> Self {
        self.idle_timeout = None;
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(SocketAddr::from(([127, 0, 0, 1], 3000)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.max_connections, 64);
        assert!(config.idle_timeout.is_some());
    }

    #[test]
    fn config_builder() {
        let config = ServerConfig::new("0.0.0.0:9000".parse().unwrap())
            .with_max_connections(8)
            .without_idle_timeout();

        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.max_connections, 8);
        assert!(config.idle_timeout.is_none());
    }
}
