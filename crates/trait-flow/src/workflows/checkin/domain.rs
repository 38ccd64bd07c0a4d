use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for stored check-ins.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CheckinId(pub String);

/// Self-reported mood on the 1..=5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Mood(u8);

impl Mood {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;
    pub const NEUTRAL: Mood = Mood(3);

    pub fn new(value: u8) -> Result<Self, CheckinValidationError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(CheckinValidationError::MoodOutOfRange(value))
        }
    }

    pub const fn value(self) -> u8 {
        self.0
    }
}

impl Default for Mood {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl TryFrom<u8> for Mood {
    type Error = CheckinValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Mood> for u8 {
    fn from(value: Mood) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergyLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl EnergyLevel {
    pub const fn ordered() -> [Self; 3] {
        [Self::Low, Self::Medium, Self::High]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// A stored daily check-in. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkin {
    pub id: CheckinId,
    pub created_at: DateTime<Utc>,
    pub mood: Mood,
    pub energy: EnergyLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Raw form payload submitted by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckinSubmission {
    pub mood: u8,
    #[serde(default)]
    pub energy: EnergyLevel,
    #[serde(default)]
    pub note: Option<String>,
}

/// Submission after range checks and note normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCheckin {
    pub mood: Mood,
    pub energy: EnergyLevel,
    pub note: Option<String>,
}

impl CheckinSubmission {
    pub fn validate(self) -> Result<ValidatedCheckin, CheckinValidationError> {
        let mood = Mood::new(self.mood)?;
        let note = self
            .note
            .map(|note| note.trim().to_string())
            .filter(|note| !note.is_empty());

        Ok(ValidatedCheckin {
            mood,
            energy: self.energy,
            note,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckinValidationError {
    #[error("mood {0} is outside the 1-5 scale")]
    MoodOutOfRange(u8),
}
