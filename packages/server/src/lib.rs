//! Group chat relay server library.
//!
//! Accepts TCP connections, gives every connection a unique display name and
//! relays text among the connected peers through a small command protocol
//! (`list`, `send -all`, `send -user`, `bye`).
//!
//! The crate follows a layered layout:
//!
//! - [`domain`]: peers, names, envelopes, commands and the registry trait
//! - [`usecase`]: connect/disconnect/list/send plus the command dispatcher
//! - [`infrastructure`]: wire codec and the in-memory registry
//! - [`ui`]: TCP listener, per-connection handler and shutdown signal

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use config::ServerConfig;
pub use ui::{Server, ServerError, run as run_server};
