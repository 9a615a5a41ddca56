//! InMemory implementations.

mod peer;

pub use peer::InMemoryPeerRegistry;
