//! Server configuration.

use clap::Args;

/// Default listen backlog for the accepting socket.
pub const DEFAULT_BACKLOG: u32 = 256;

/// Where and how the relay listens.
#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct ServerConfig {
    /// IP address or hostname to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// TCP port to listen on (0 picks a free port)
    #[arg(short, long, default_value_t = 8080)]
    pub port: u16,

    /// Maximum number of pending connections
    #[arg(long, default_value_t = DEFAULT_BACKLOG)]
    pub backlog: u32,
}

impl ServerConfig {
    /// `host:port`, ready for address resolution.
    pub fn address(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            // Bare IPv6 literal
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            backlog: DEFAULT_BACKLOG,
        }
    }
}
