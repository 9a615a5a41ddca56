//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// PeerName validation error
    #[error("Name cannot be empty")]
    PeerNameEmpty,

    /// PeerName too long error
    #[error("Name cannot exceed {max} bytes (got {actual})")]
    PeerNameTooLong { max: usize, actual: usize },

    /// PeerName containing whitespace
    #[error("Name cannot contain whitespace")]
    PeerNameWhitespace,
}

/// Errors related to the peer registry
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Another peer already holds the name
    #[error("Name already in use: {0}")]
    NameConflict(String),
}

/// Errors produced while turning a line of input into an action
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The line has no tokens at all
    #[error("empty command line")]
    Empty,

    /// First token is not a known command
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// Flags are not acceptable for the command
    #[error("invalid flags for '{command}': {flags:?}")]
    InvalidFlags { command: String, flags: Vec<String> },

    /// `send -user` without a target name
    #[error("missing target name")]
    MissingTarget,
}
