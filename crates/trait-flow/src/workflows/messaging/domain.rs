use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::checkin::{Checkin, EnergyLevel, Mood};
use crate::workflows::personality::BigFiveTrait;

/// Identifier wrapper for generated messages. Ids increase monotonically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MessageId(pub String);

static MESSAGE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_message_id() -> MessageId {
    let id = MESSAGE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    MessageId(format!("msg-{id:06}"))
}

/// Inputs in effect when a message was generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalizationSnapshot {
    pub base_trait: BigFiveTrait,
    pub mood: Mood,
    pub energy: EnergyLevel,
}

impl PersonalizationSnapshot {
    /// Copies mood and energy from `latest`, or uses mood 3 / medium energy without one.
    pub fn new(base_trait: BigFiveTrait, latest: Option<&Checkin>) -> Self {
        match latest {
            Some(checkin) => Self {
                base_trait,
                mood: checkin.mood,
                energy: checkin.energy,
            },
            None => Self {
                base_trait,
                mood: Mood::NEUTRAL,
                energy: EnergyLevel::Medium,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageSource {
    Generated,
    Fallback,
}

/// User feedback on a message, 1..=5 stars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct MessageRating(u8);

impl MessageRating {
    pub fn new(value: u8) -> Result<Self, RatingError> {
        if (1..=5).contains(&value) {
            Ok(Self(value))
        } else {
            Err(RatingError::OutOfRange(value))
        }
    }

    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for MessageRating {
    type Error = RatingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MessageRating> for u8 {
    fn from(value: MessageRating) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RatingError {
    #[error("rating {0} is outside the 1-5 scale")]
    OutOfRange(u8),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalizedMessage {
    pub id: MessageId,
    pub created_at: DateTime<Utc>,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<MessageRating>,
    pub personalization: PersonalizationSnapshot,
    pub source: MessageSource,
}

impl PersonalizedMessage {
    pub fn new(text: String, personalization: PersonalizationSnapshot, source: MessageSource) -> Self {
        Self {
            id: next_message_id(),
            created_at: Utc::now(),
            text,
            rating: None,
            personalization,
            source,
        }
    }

    /// Returns a copy carrying `rating`; every other field is left untouched.
    pub fn rated(&self, rating: MessageRating) -> Self {
        Self {
            rating: Some(rating),
            ..self.clone()
        }
    }
}
