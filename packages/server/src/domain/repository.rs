//! Peer registry abstraction.

use async_trait::async_trait;

use super::{entity::Peer, error::RegistryError, value_object::PeerName};

/// Shared store of name → peer associations.
///
/// Every operation is atomic with respect to concurrent callers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PeerRegistry: Send + Sync {
    /// Insert `peer` unless its name is already taken.
    async fn try_register(&self, peer: Peer) -> Result<(), RegistryError>;

    /// Remove the peer holding `name`, returning it if it was present.
    ///
    /// Removing an absent name is a no-op.
    async fn remove(&self, name: &PeerName) -> Option<Peer>;

    /// Remove `peer` only if its name is still held by that same connection.
    ///
    /// A later connection that reused the name is left in place.
    async fn remove_peer(&self, peer: &Peer) -> Option<Peer>;

    /// Find the peer holding `name`.
    async fn lookup(&self, name: &PeerName) -> Option<Peer>;

    /// Point-in-time copy of every registered peer, ordered by name.
    async fn snapshot(&self) -> Vec<Peer>;

    /// Number of registered peers.
    async fn count(&self) -> usize;
}
