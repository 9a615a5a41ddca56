//! Shared utilities for Parley.
//!
//! Logging setup and wall-clock helpers used by both the server and the client.

pub mod logger;
pub mod time;
