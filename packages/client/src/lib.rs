//! Terminal client for the Parley relay.
//!
//! Connects to a relay, claims a display name and then interleaves two
//! streams: lines typed by the user, which are sent as commands, and
//! envelopes from the server, which are rendered to the terminal.

pub mod config;
pub mod error;
pub mod render;
pub mod session;

pub use config::ClientConfig;
pub use error::ClientError;
pub use session::{Exit, Session, run as run_client};
