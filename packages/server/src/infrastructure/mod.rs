//! Infrastructure layer: wire codec and registry implementations.

pub mod codec;
pub mod repository;

pub use codec::{CodecError, frame_codec};
pub use repository::InMemoryPeerRegistry;
