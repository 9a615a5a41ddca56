//! Client configuration.

use clap::Args;

/// Which relay to join and under what name.
#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct ClientConfig {
    /// Relay IP address or hostname
    pub host: String,

    /// Relay TCP port
    pub port: u16,

    /// Display name to claim
    pub name: String,
}

impl ClientConfig {
    /// `host:port`, ready for address resolution.
    pub fn address(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}
