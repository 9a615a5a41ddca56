//! Envelopes: the only unit the server ever sends to a client.

use std::net::SocketAddr;

use parley_shared::time::message_time;
use serde::{Deserialize, Serialize};

use super::entity::Peer;

/// A message sent from the server to a client.
///
/// Serialized with an explicit `type` tag; receivers dispatch on the tag only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Envelope {
    /// Informational text from the server itself
    Server { time: String, message: String },
    /// Fatal error; the client must terminate after displaying it
    Error { time: String, message: String },
    /// A relayed chat message
    Text {
        time: String,
        address: SocketAddr,
        name: String,
        message: String,
    },
}

impl Envelope {
    /// Informational envelope stamped with the current time
    pub fn server(message: impl Into<String>) -> Self {
        Self::Server {
            time: message_time(),
            message: message.into(),
        }
    }

    /// Fatal error envelope stamped with the current time
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            time: message_time(),
            message: message.into(),
        }
    }

    /// Chat message from `sender`, stamped with the current time
    pub fn text(sender: &Peer, message: impl Into<String>) -> Self {
        Self::Text {
            time: message_time(),
            address: sender.address,
            name: sender.name.as_str().to_string(),
            message: message.into(),
        }
    }

    /// The message body, whatever the variant
    pub fn message(&self) -> &str {
        match self {
            Self::Server { message, .. } | Self::Error { message, .. } | Self::Text { message, .. } => {
                message
            }
        }
    }

    /// The display timestamp, whatever the variant
    pub fn time(&self) -> &str {
        match self {
            Self::Server { time, .. } | Self::Error { time, .. } | Self::Text { time, .. } => time,
        }
    }
}
