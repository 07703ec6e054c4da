use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier wrapper for platform users.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// Co-founder matching attributes owned by the profile store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: UserId,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub roles: BTreeSet<String>,
    #[serde(default)]
    pub industries: BTreeSet<String>,
    #[serde(default)]
    pub commitment: Option<CommitmentLevel>,
    #[serde(default)]
    pub stage: Option<StartupStage>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub languages: BTreeSet<String>,
    /// Telegram chat the user linked through the login widget.
    #[serde(default)]
    pub telegram_chat_id: Option<i64>,
}

impl Profile {
    /// Profile with no matching attributes filled in yet.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: UserId(id.into()),
            display_name: None,
            roles: BTreeSet::new(),
            industries: BTreeSet::new(),
            commitment: None,
            stage: None,
            location: None,
            languages: BTreeSet::new(),
            telegram_chat_id: None,
        }
    }
}

/// How much time a founder is ready to put in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitmentLevel {
    #[serde(alias = "exploring_options")]
    Exploring,
    #[serde(alias = "part-time", alias = "parttime")]
    PartTime,
    #[serde(alias = "full-time", alias = "fulltime")]
    FullTime,
}

impl CommitmentLevel {
    pub fn rank(self) -> u8 {
        match self {
            CommitmentLevel::Exploring => 0,
            CommitmentLevel::PartTime => 1,
            CommitmentLevel::FullTime => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CommitmentLevel::Exploring => "exploring",
            CommitmentLevel::PartTime => "part-time",
            CommitmentLevel::FullTime => "full-time",
        }
    }
}

/// Where the founder's venture currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartupStage {
    Idea,
    Prototype,
    Mvp,
    #[serde(alias = "early-traction", alias = "traction")]
    EarlyTraction,
    #[serde(alias = "scaling")]
    Growth,
}

impl StartupStage {
    pub fn rank(self) -> u8 {
        match self {
            StartupStage::Idea => 0,
            StartupStage::Prototype => 1,
            StartupStage::Mvp => 2,
            StartupStage::EarlyTraction => 3,
            StartupStage::Growth => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StartupStage::Idea => "idea",
            StartupStage::Prototype => "prototype",
            StartupStage::Mvp => "MVP",
            StartupStage::EarlyTraction => "early traction",
            StartupStage::Growth => "growth",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub country: String,
    #[serde(default)]
    pub city: Option<String>,
}

impl Location {
    pub fn new(country: impl Into<String>, city: Option<&str>) -> Self {
        Self {
            country: country.into(),
            city: city.map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_deserializes_with_sparse_fields() {
        let profile: Profile = serde_json::from_str(
            r#"{"id":"u-1","commitment":"full-time","stage":"mvp","roles":["CTO"]}"#,
        )
        .expect("profile parses");

        assert_eq!(profile.id, UserId("u-1".to_string()));
        assert_eq!(profile.commitment, Some(CommitmentLevel::FullTime));
        assert_eq!(profile.stage, Some(StartupStage::Mvp));
        assert!(profile.languages.is_empty());
        assert!(profile.telegram_chat_id.is_none());
    }

    #[test]
    fn ranks_follow_declaration_order() {
        assert!(CommitmentLevel::Exploring.rank() < CommitmentLevel::FullTime.rank());
        assert_eq!(StartupStage::Growth.rank(), 4);
    }
}
