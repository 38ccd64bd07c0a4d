use super::domain::{Checkin, CheckinId};
use crate::workflows::messaging::{MessageId, PersonalizedMessage};
use crate::workflows::personality::TraitScores;

/// Storage for check-ins, generated messages, and the current trait profile.
///
/// List operations return records newest first.
pub trait JournalRepository: Send + Sync {
    fn insert_checkin(&self, checkin: Checkin) -> Result<Checkin, RepositoryError>;
    fn checkins(&self) -> Result<Vec<Checkin>, RepositoryError>;
    fn latest_checkin(&self) -> Result<Option<Checkin>, RepositoryError>;
    fn remove_checkin(&self, id: &CheckinId) -> Result<(), RepositoryError>;

    fn insert_message(
        &self,
        message: PersonalizedMessage,
    ) -> Result<PersonalizedMessage, RepositoryError>;
    fn messages(&self) -> Result<Vec<PersonalizedMessage>, RepositoryError>;
    fn fetch_message(&self, id: &MessageId)
        -> Result<Option<PersonalizedMessage>, RepositoryError>;
    fn update_message(&self, message: PersonalizedMessage) -> Result<(), RepositoryError>;

    fn save_profile(&self, scores: TraitScores) -> Result<(), RepositoryError>;
    fn profile(&self) -> Result<Option<TraitScores>, RepositoryError>;

    /// Stores a check-in with its message. When the message cannot be stored the
    /// check-in is removed again, so a resubmission does not leave a duplicate.
    fn record_checkin(
        &self,
        checkin: Checkin,
        message: PersonalizedMessage,
    ) -> Result<(Checkin, PersonalizedMessage), RepositoryError> {
        let checkin = self.insert_checkin(checkin)?;
        match self.insert_message(message) {
            Ok(message) => Ok((checkin, message)),
            Err(error) => {
                if let Err(rollback) = self.remove_checkin(&checkin.id) {
                    tracing::error!(
                        checkin_id = %checkin.id.0,
                        error = %rollback,
                        "failed to roll back check-in"
                    );
                }
                Err(error)
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
