use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a person who can pay for, or owe a share of, an expense.
///
/// Participants are plain handles (`@alice`, `Bob Smith`). Whether a raw
/// string is usable as a participant is decided by [`ParticipantId::parse`];
/// [`ParticipantId::new`] performs no checks and is meant for values that
/// already passed validation or came back from storage.
///
/// # Examples
///
/// ```
/// use split_ledger::core::participant::ParticipantId;
///
/// let alice = ParticipantId::new("@alice");
/// let bob = ParticipantId::new("@bob");
/// assert_ne!(alice, bob);
/// assert!(ParticipantId::parse("   ").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Parse a participant handle from user input.
    ///
    /// Surrounding whitespace is trimmed. Returns `None` when nothing is
    /// left or the handle contains control characters.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.chars().any(char::is_control) {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Opaque identifier of the group an expense belongs to.
///
/// Typically the chat id of the group conversation. Groups never share
/// state with each other.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(String);

impl GroupId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for GroupId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participant_equality() {
        let a = ParticipantId::new("@alice");
        let b = ParticipantId::new("@alice");
        let c = ParticipantId::new("@bob");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_participant_parse_trims() {
        let p = ParticipantId::parse("  @carol ").unwrap();
        assert_eq!(p.as_str(), "@carol");
    }

    #[test]
    fn test_participant_parse_rejects_blank_and_control() {
        assert!(ParticipantId::parse("").is_none());
        assert!(ParticipantId::parse(" \t ").is_none());
        assert!(ParticipantId::parse("bad\nname").is_none());
    }

    #[test]
    fn test_participant_ordering() {
        let a = ParticipantId::new("A");
        let b = ParticipantId::new("B");
        assert!(a < b);
    }

    #[test]
    fn test_group_display() {
        let g = GroupId::new("-100123");
        assert_eq!(format!("{}", g), "-100123");
    }
}
