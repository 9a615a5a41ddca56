//! Domain layer for the chat relay.
//!
//! This module contains the relay's vocabulary (peers, names, envelopes and
//! commands) and the registry abstraction, independent of sockets and wire
//! formats.

pub mod command;
pub mod entity;
pub mod envelope;
pub mod error;
pub mod repository;
pub mod value_object;

pub use command::{Action, Command, CommandKind};
pub use entity::{Peer, PeerOutbound};
pub use envelope::Envelope;
pub use error::{CommandError, RegistryError, ValueObjectError};
pub use repository::PeerRegistry;
pub use value_object::PeerName;
