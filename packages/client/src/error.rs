//! Client error types.

use parley_server::infrastructure::codec::CodecError;
use rustyline::error::ReadlineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Failed to connect to {address}: {source}")]
    Connect {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// The server sent an `error` envelope and closed the session
    #[error("Server refused the session: {0}")]
    Refused(String),

    #[error("Connection error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("Terminal error: {0}")]
    Terminal(#[from] ReadlineError),
}
