use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tracing::info;

use super::domain::{Checkin, CheckinId, CheckinSubmission, CheckinValidationError};
use super::export::{write_checkins_csv, ExportError};
use super::repository::{JournalRepository, RepositoryError};
use super::stats::CheckinStats;
use crate::workflows::messaging::{
    MessageGenerator, MessageId, MessageRating, MessageSelector, PersonalizedMessage, RatingError,
};
use crate::workflows::personality::TraitScores;

/// Service composing the journal repository and the message selector.
pub struct DailyCheckinService<R, G> {
    repository: Arc<R>,
    selector: Arc<MessageSelector<G>>,
}

static CHECKIN_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_checkin_id() -> CheckinId {
    let id = CHECKIN_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    CheckinId(format!("chk-{id:06}"))
}

/// Stored check-in together with the message generated for it.
#[derive(Debug, Clone, Serialize)]
pub struct CheckinReceipt {
    pub checkin: Checkin,
    pub message: PersonalizedMessage,
}

impl<R, G> DailyCheckinService<R, G>
where
    R: JournalRepository + 'static,
    G: MessageGenerator + 'static,
{
    pub fn new(repository: Arc<R>, selector: Arc<MessageSelector<G>>) -> Self {
        Self {
            repository,
            selector,
        }
    }

    /// Record a check-in and generate a message personalized to it.
    pub async fn submit(
        &self,
        submission: CheckinSubmission,
    ) -> Result<CheckinReceipt, CheckinServiceError> {
        let validated = submission.validate()?;
        let checkin = Checkin {
            id: next_checkin_id(),
            created_at: Utc::now(),
            mood: validated.mood,
            energy: validated.energy,
            note: validated.note,
        };

        let scores = self.current_scores()?;
        let message = self.selector.select(&scores, Some(&checkin)).await;
        let (checkin, message) = self.repository.record_checkin(checkin, message)?;

        info!(
            checkin_id = %checkin.id.0,
            message_id = %message.id.0,
            base_trait = %message.personalization.base_trait,
            "check-in recorded"
        );

        Ok(CheckinReceipt { checkin, message })
    }

    /// Latest message created on `today`, generating one if none exists yet.
    pub async fn todays_message(
        &self,
        today: NaiveDate,
    ) -> Result<PersonalizedMessage, CheckinServiceError> {
        let existing = self
            .repository
            .messages()?
            .into_iter()
            .find(|message| message.created_at.date_naive() == today);
        if let Some(message) = existing {
            return Ok(message);
        }

        let latest = self.repository.latest_checkin()?;
        let scores = self.current_scores()?;
        let message = self.selector.select(&scores, latest.as_ref()).await;
        let message = self.repository.insert_message(message)?;
        info!(message_id = %message.id.0, "daily message generated");
        Ok(message)
    }

    pub fn rate_message(
        &self,
        message_id: &MessageId,
        rating: u8,
    ) -> Result<PersonalizedMessage, CheckinServiceError> {
        let rating = MessageRating::new(rating)?;
        let message = self
            .repository
            .fetch_message(message_id)?
            .ok_or(RepositoryError::NotFound)?;

        let rated = message.rated(rating);
        self.repository.update_message(rated.clone())?;
        Ok(rated)
    }

    pub fn checkins(&self) -> Result<Vec<Checkin>, CheckinServiceError> {
        Ok(self.repository.checkins()?)
    }

    pub fn messages(&self) -> Result<Vec<PersonalizedMessage>, CheckinServiceError> {
        Ok(self.repository.messages()?)
    }

    pub fn stats(&self, today: NaiveDate) -> Result<CheckinStats, CheckinServiceError> {
        let checkins = self.repository.checkins()?;
        Ok(CheckinStats::compute(&checkins, today))
    }

    pub fn export_csv(&self) -> Result<String, CheckinServiceError> {
        let checkins = self.repository.checkins()?;
        let mut buffer = Vec::new();
        write_checkins_csv(&mut buffer, &checkins)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    /// Stored profile, or neutral scores before onboarding has finished.
    fn current_scores(&self) -> Result<TraitScores, RepositoryError> {
        Ok(self.repository.profile()?.unwrap_or_else(TraitScores::neutral))
    }
}

/// Error raised by the check-in service.
#[derive(Debug, thiserror::Error)]
pub enum CheckinServiceError {
    #[error(transparent)]
    Validation(#[from] CheckinValidationError),
    #[error(transparent)]
    Rating(#[from] RatingError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

impl CheckinServiceError {
    /// Whether the user may resubmit the same form unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Repository(RepositoryError::Unavailable(_)))
    }
}
