use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum IdError {
    #[error("topic id cannot be empty")]
    EmptyTopic,

    #[error("difficulty cannot be empty")]
    EmptyDifficulty,

    #[error("team name cannot be empty")]
    EmptyTeamName,
}

/// Identifier of a quiz topic in the catalog (e.g. `history`).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TopicId(String);

impl TopicId {
    /// Creates a topic id from trimmed, non-empty input.
    ///
    /// # Errors
    ///
    /// Returns `IdError::EmptyTopic` if the input is blank.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, IdError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(IdError::EmptyTopic);
        }
        Ok(Self(trimmed.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Difficulty band of a question set, normalized to lowercase.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Difficulty(String);

impl Difficulty {
    /// Creates a difficulty label; surrounding whitespace is dropped and case folded.
    ///
    /// # Errors
    ///
    /// Returns `IdError::EmptyDifficulty` if the input is blank.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, IdError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(IdError::EmptyDifficulty);
        }
        Ok(Self(trimmed.to_lowercase()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Name of a tournament team. Names are trimmed and compared exactly.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TeamName(String);

impl TeamName {
    /// Creates a team name from user input.
    ///
    /// # Errors
    ///
    /// Returns `IdError::EmptyTeamName` if nothing is left after trimming.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, IdError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(IdError::EmptyTeamName);
        }
        Ok(Self(trimmed.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// ─── Conversions ───────────────────────────────────────────────────────────────

impl TryFrom<String> for TopicId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for Difficulty {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for TeamName {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TopicId> for String {
    fn from(id: TopicId) -> Self {
        id.0
    }
}

impl From<Difficulty> for String {
    fn from(d: Difficulty) -> Self {
        d.0
    }
}

impl From<TeamName> for String {
    fn from(name: TeamName) -> Self {
        name.0
    }
}

impl FromStr for TopicId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl FromStr for Difficulty {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl FromStr for TeamName {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

// ─── Debug / Display ───────────────────────────────────────────────────────────

impl fmt::Debug for TopicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TopicId({})", self.0)
    }
}

impl fmt::Debug for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Difficulty({})", self.0)
    }
}

impl fmt::Debug for TeamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TeamName({})", self.0)
    }
}

impl fmt::Display for TopicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for TeamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_name_is_trimmed() {
        let name = TeamName::new("  Alpha ").unwrap();
        assert_eq!(name.as_str(), "Alpha");
        assert_eq!(name.to_string(), "Alpha");
    }

    #[test]
    fn blank_team_name_is_rejected() {
        assert_eq!(TeamName::new("   ").unwrap_err(), IdError::EmptyTeamName);
    }

    #[test]
    fn difficulty_is_case_folded() {
        let d: Difficulty = " Easy ".parse().unwrap();
        assert_eq!(d.as_str(), "easy");
    }

    #[test]
    fn topic_id_rejects_empty() {
        assert!("".parse::<TopicId>().is_err());
    }

    #[test]
    fn team_name_deserialize_validates() {
        let err = serde_json::from_str::<TeamName>("\"  \"");
        assert!(err.is_err());
        let ok: TeamName = serde_json::from_str("\"Beta\"").unwrap();
        assert_eq!(ok.as_str(), "Beta");
    }
}
