use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{Duration, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use trait_flow::workflows::checkin::{
    Checkin, CheckinId, EnergyLevel, JournalRepository, Mood, RepositoryError,
};
use trait_flow::workflows::messaging::{
    MessageId, MessageRating, MessageSource, PersonalizationSnapshot, PersonalizedMessage,
};
use trait_flow::workflows::personality::{BigFiveTrait, TraitScores};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local journal; lists are kept newest first.
#[derive(Default, Clone)]
pub(crate) struct InMemoryJournalRepository {
    checkins: Arc<Mutex<Vec<Checkin>>>,
    messages: Arc<Mutex<Vec<PersonalizedMessage>>>,
    profile: Arc<Mutex<Option<TraitScores>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable("journal mutex poisoned".to_string()))
}

impl JournalRepository for InMemoryJournalRepository {
    fn insert_checkin(&self, checkin: Checkin) -> Result<Checkin, RepositoryError> {
        lock(&self.checkins)?.insert(0, checkin.clone());
        Ok(checkin)
    }

    fn checkins(&self) -> Result<Vec<Checkin>, RepositoryError> {
        Ok(lock(&self.checkins)?.clone())
    }

    fn latest_checkin(&self) -> Result<Option<Checkin>, RepositoryError> {
        Ok(lock(&self.checkins)?.first().cloned())
    }

    fn remove_checkin(&self, id: &CheckinId) -> Result<(), RepositoryError> {
        lock(&self.checkins)?.retain(|checkin| &checkin.id != id);
        Ok(())
    }

    fn insert_message(
        &self,
        message: PersonalizedMessage,
    ) -> Result<PersonalizedMessage, RepositoryError> {
        lock(&self.messages)?.insert(0, message.clone());
        Ok(message)
    }

    fn messages(&self) -> Result<Vec<PersonalizedMessage>, RepositoryError> {
        Ok(lock(&self.messages)?.clone())
    }

    fn fetch_message(&self, id: &MessageId) -> Result<Option<PersonalizedMessage>, RepositoryError> {
        Ok(lock(&self.messages)?
            .iter()
            .find(|message| &message.id == id)
            .cloned())
    }

    fn update_message(&self, message: PersonalizedMessage) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.messages)?;
        let slot = guard
            .iter_mut()
            .find(|stored| stored.id == message.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = message;
        Ok(())
    }

    fn save_profile(&self, scores: TraitScores) -> Result<(), RepositoryError> {
        *lock(&self.profile)? = Some(scores);
        Ok(())
    }

    fn profile(&self) -> Result<Option<TraitScores>, RepositoryError> {
        Ok(*lock(&self.profile)?)
    }
}

/// Loads a few days of sample history so the history and stats views have content.
pub(crate) fn seed_demo_history(
    repository: &InMemoryJournalRepository,
) -> Result<(), RepositoryError> {
    let now = Utc::now();
    let samples = [
        (4, 1, EnergyLevel::Low, Some("Rough start to the morning")),
        (3, 4, EnergyLevel::High, None),
        (2, 3, EnergyLevel::Medium, Some("A little tired")),
        (1, 5, EnergyLevel::High, Some("The project is going well")),
    ];

    for (index, (days_ago, mood, energy, note)) in samples.into_iter().enumerate() {
        let mood = Mood::new(mood).map_err(|err| RepositoryError::Unavailable(err.to_string()))?;
        repository.insert_checkin(Checkin {
            id: CheckinId(format!("chk-seed-{}", index + 1)),
            created_at: now - Duration::days(days_ago),
            mood,
            energy,
            note: note.map(str::to_string),
        })?;
    }

    let rated = PersonalizedMessage::new(
        "Rest is part of the plan too. Move forward at your own pace.".to_string(),
        PersonalizationSnapshot {
            base_trait: BigFiveTrait::Conscientiousness,
            mood: Mood::NEUTRAL,
            energy: EnergyLevel::Medium,
        },
        MessageSource::Generated,
    );
    let rated = MessageRating::new(4)
        .map(|rating| rated.rated(rating))
        .unwrap_or(rated);
    repository.insert_message(rated)?;

    Ok(())
}
