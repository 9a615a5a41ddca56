//! Handler modules for TCP connections.

pub mod connection;

pub use connection::handle_connection;
