//! Server configuration assembled from the command line.

use std::net::SocketAddr;
use std::time::Duration;

/// Default listen host.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default listen port.
pub const DEFAULT_PORT: u16 = 4444;

/// Maximum number of load clients running at the same time in `clients` mode.
pub const CLIENT_CONCURRENCY: usize = 1000;

/// Runtime configuration for a war server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the listener binds to.
    pub bind: SocketAddr,
    /// Longest a connection may sit unpaired before it is closed. `None` disables the bound.
    pub queue_timeout: Option<Duration>,
    /// Longest a session waits for a round to complete before aborting. `None` disables the bound.
    pub play_timeout: Option<Duration>,
}

impl ServerConfig {
    /// Configuration with both timeouts disabled.
    pub fn new(bind: SocketAddr) -> Self {
        Self {
            bind,
            queue_timeout: None,
            play_timeout: None,
        }
    }

    pub fn with_queue_timeout(mut self, timeout: Duration) -> Self {
        self.queue_timeout = Some(timeout);
        self
    }

    pub fn with_play_timeout(mut self, timeout: Duration) -> Self {
        self.play_timeout = Some(timeout);
        self
    }
}
