//! Core domain models for the chat relay.

use std::net::SocketAddr;

use bytes::Bytes;
use tokio::sync::mpsc::{self, error::SendError};

use super::value_object::PeerName;

/// Sending endpoint of a peer's connection.
///
/// Frames pushed here are written to the socket by the connection's writer
/// task. Once that task stops (socket closed or write failed) every send
/// fails, which is how an unreachable peer is detected.
#[derive(Debug, Clone)]
pub struct PeerOutbound(mpsc::UnboundedSender<Bytes>);

impl PeerOutbound {
    /// Wrap the sending half of a connection's outbound queue.
    pub fn new(sender: mpsc::UnboundedSender<Bytes>) -> Self {
        Self(sender)
    }

    /// Queue one encoded frame for the connection.
    pub fn send(&self, frame: Bytes) -> Result<(), SendError<Bytes>> {
        self.0.send(frame)
    }

    /// Resolves once the connection's writer has stopped.
    pub async fn closed(&self) {
        self.0.closed().await
    }

    /// Whether the connection's writer has stopped.
    pub fn is_closed(&self) -> bool {
        self.0.is_closed()
    }

    /// Whether both endpoints feed the same connection.
    pub fn same_connection(&self, other: &PeerOutbound) -> bool {
        self.0.same_channel(&other.0)
    }
}

/// A connected, named chat participant.
#[derive(Debug, Clone)]
pub struct Peer {
    /// Display name, unique among registered peers
    pub name: PeerName,
    /// Remote address of the connection
    pub address: SocketAddr,
    outbound: PeerOutbound,
}

impl Peer {
    /// Create a new peer
    pub fn new(name: PeerName, address: SocketAddr, outbound: PeerOutbound) -> Self {
        Self {
            name,
            address,
            outbound,
        }
    }

    /// The peer's connection endpoint
    pub fn outbound(&self) -> &PeerOutbound {
        &self.outbound
    }

    /// Whether `other` is this very connection, not just the same name.
    pub fn is_same_connection(&self, other: &Peer) -> bool {
        self.name == other.name && self.outbound.same_connection(&other.outbound)
    }
}
