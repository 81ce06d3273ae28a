//! User identity handle

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Identifier of the user owning a tracker document
///
/// Identity resolution itself (sessions, auth) lives outside this crate;
/// callers hand vital an opaque, non-empty id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    /// Create a user id from a non-empty string
    pub fn new(id: impl Into<String>) -> Result<Self, Error> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidInput("User id must not be empty".into()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The raw id string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for UserId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_trims() {
        let id = UserId::new("  alice  ").unwrap();
        assert_eq!(id.as_str(), "alice");
    }

    #[test]
    fn test_user_id_rejects_empty() {
        assert!(UserId::new("   ").is_err());
    }
}
