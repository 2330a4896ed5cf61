use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when an identifier is blank.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} cannot be empty")]
pub struct IdError {
    kind: &'static str,
}

fn normalize(kind: &'static str, raw: &str) -> Result<String, IdError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(IdError { kind });
    }
    Ok(trimmed.to_owned())
}

/// Identifier of a word in the catalog.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WordId(String);

impl WordId {
    /// Creates a `WordId`, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `IdError` if the id is empty after trimming.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, IdError> {
        normalize("word id", raw.as_ref()).map(Self)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifier of a learner.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// The implicit single learner of a device.
    pub const DEFAULT_LEARNER: &'static str = "user1";

    /// Creates a `UserId`, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `IdError` if the id is empty after trimming.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, IdError> {
        normalize("user id", raw.as_ref()).map(Self)
    }

    #[must_use]
    pub fn default_learner() -> Self {
        Self(Self::DEFAULT_LEARNER.to_owned())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::default_learner()
    }
}

/// Composite storage key of a progress record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProgressKey {
    pub user_id: UserId,
    pub word_id: WordId,
}

impl ProgressKey {
    #[must_use]
    pub fn new(user_id: UserId, word_id: WordId) -> Self {
        Self { user_id, word_id }
    }
}

impl fmt::Debug for WordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WordId({})", self.0)
    }
}

impl fmt::Debug for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserId({})", self.0)
    }
}

// ─── Display Implementations ───────────────────────────────────────────────────

impl fmt::Display for WordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ProgressKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.user_id, self.word_id)
    }
}

// ─── Conversions ───────────────────────────────────────────────────────────────

impl FromStr for WordId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl FromStr for UserId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for WordId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for UserId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<WordId> for String {
    fn from(id: WordId) -> Self {
        id.0
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_id_trims_and_displays() {
        let id = WordId::new("  w1 ").unwrap();
        assert_eq!(id.as_str(), "w1");
        assert_eq!(id.to_string(), "w1");
    }

    #[test]
    fn blank_ids_are_rejected() {
        assert!(WordId::new("   ").is_err());
        let err = "".parse::<UserId>().unwrap_err();
        assert_eq!(err.to_string(), "user id cannot be empty");
    }

    #[test]
    fn default_learner_is_user1() {
        assert_eq!(UserId::default().as_str(), "user1");
    }

    #[test]
    fn progress_key_display_joins_user_and_word() {
        let key = ProgressKey::new(UserId::new("u1").unwrap(), WordId::new("w7").unwrap());
        assert_eq!(key.to_string(), "u1/w7");
    }

    #[test]
    fn word_id_deserialize_rejects_blank() {
        let ok: WordId = serde_json::from_str("\"w2\"").unwrap();
        assert_eq!(ok, WordId::new("w2").unwrap());
        assert!(serde_json::from_str::<WordId>("\" \"").is_err());
    }
}
