//! TCP front end of the relay server.

mod handler;
mod runner;
mod signal;
pub mod state;

pub use runner::{Server, ServerError, run};
