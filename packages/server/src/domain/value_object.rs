//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::ValueObjectError;

/// Longest accepted display name, in bytes.
pub const MAX_PEER_NAME_LEN: usize = 64;

/// Display name value object.
///
/// The unique, case-sensitive key of a peer in the registry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PeerName(String);

impl PeerName {
    /// Create a new PeerName.
    ///
    /// Surrounding whitespace is trimmed. The result must be non-empty, fit in
    /// [`MAX_PEER_NAME_LEN`] bytes and contain no whitespace, otherwise it could
    /// never be addressed by `send -user`.
    pub fn new(name: impl AsRef<str>) -> Result<Self, ValueObjectError> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(ValueObjectError::PeerNameEmpty);
        }
        let len = name.len();
        if len > MAX_PEER_NAME_LEN {
            return Err(ValueObjectError::PeerNameTooLong {
                max: MAX_PEER_NAME_LEN,
                actual: len,
            });
        }
        if name.chars().any(char::is_whitespace) {
            return Err(ValueObjectError::PeerNameWhitespace);
        }
        Ok(Self(name.to_string()))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for PeerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for PeerName {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for PeerName {
    type Error = ValueObjectError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
