//! Subject Value Object
//!
//! The `sub` claim: the opaque user identifier a token is issued for.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Token subject (user identifier)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Subject(String);

impl Subject {
    /// Create a subject from an opaque identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Uuid> for Subject {
    fn from(id: Uuid) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for Subject {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl AsRef<str> for Subject {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_uuid() {
        let id = Uuid::new_v4();
        let subject = Subject::from(id);
        assert_eq!(subject.as_str(), id.to_string());
    }

    #[test]
    fn test_serde_transparent() {
        let subject = Subject::new("alice-id");
        let json = serde_json::to_string(&subject).unwrap();
        assert_eq!(json, "\"alice-id\"");

        let back: Subject = serde_json::from_str(&json).unwrap();
        assert_eq!(back, subject);
    }
}
