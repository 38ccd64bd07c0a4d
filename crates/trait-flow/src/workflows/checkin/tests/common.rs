use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::http::StatusCode;
use axum::response::Response;
use serde_json::Value;

use crate::workflows::checkin::domain::{Checkin, CheckinId, CheckinSubmission, EnergyLevel};
use crate::workflows::checkin::repository::{JournalRepository, RepositoryError};
use crate::workflows::checkin::{checkin_router, DailyCheckinService};
use crate::workflows::messaging::{
    CannedMessageGenerator, GenerationPolicy, MessageId, MessageSelector, PersonalizedMessage,
};
use crate::workflows::personality::TraitScores;

#[derive(Default)]
pub(super) struct MemoryRepository {
    checkins: Mutex<Vec<Checkin>>,
    messages: Mutex<Vec<PersonalizedMessage>>,
    profile: Mutex<Option<TraitScores>>,
}

impl JournalRepository for MemoryRepository {
    fn insert_checkin(&self, checkin: Checkin) -> Result<Checkin, RepositoryError> {
        self.checkins.lock().unwrap().insert(0, checkin.clone());
        Ok(checkin)
    }

    fn checkins(&self) -> Result<Vec<Checkin>, RepositoryError> {
        Ok(self.checkins.lock().unwrap().clone())
    }

    fn latest_checkin(&self) -> Result<Option<Checkin>, RepositoryError> {
        Ok(self.checkins.lock().unwrap().first().cloned())
    }

    fn remove_checkin(&self, id: &CheckinId) -> Result<(), RepositoryError> {
        self.checkins.lock().unwrap().retain(|checkin| &checkin.id != id);
        Ok(())
    }

    fn insert_message(
        &self,
        message: PersonalizedMessage,
    ) -> Result<PersonalizedMessage, RepositoryError> {
        self.messages.lock().unwrap().insert(0, message.clone());
        Ok(message)
    }

    fn messages(&self) -> Result<Vec<PersonalizedMessage>, RepositoryError> {
        Ok(self.messages.lock().unwrap().clone())
    }

    fn fetch_message(
        &self,
        id: &MessageId,
    ) -> Result<Option<PersonalizedMessage>, RepositoryError> {
        Ok(self
            .messages
            .lock()
            .unwrap()
            .iter()
            .find(|message| &message.id == id)
            .cloned())
    }

    fn update_message(&self, message: PersonalizedMessage) -> Result<(), RepositoryError> {
        let mut guard = self.messages.lock().unwrap();
        match guard.iter_mut().find(|stored| stored.id == message.id) {
            Some(slot) => {
                *slot = message;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn save_profile(&self, scores: TraitScores) -> Result<(), RepositoryError> {
        *self.profile.lock().unwrap() = Some(scores);
        Ok(())
    }

    fn profile(&self) -> Result<Option<TraitScores>, RepositoryError> {
        Ok(*self.profile.lock().unwrap())
    }
}

/// Every call fails as if the backing store were offline.
pub(super) struct UnavailableRepository;

impl JournalRepository for UnavailableRepository {
    fn insert_checkin(&self, _checkin: Checkin) -> Result<Checkin, RepositoryError> {
        Err(offline())
    }

    fn checkins(&self) -> Result<Vec<Checkin>, RepositoryError> {
        Err(offline())
    }

    fn latest_checkin(&self) -> Result<Option<Checkin>, RepositoryError> {
        Err(offline())
    }

    fn remove_checkin(&self, _id: &CheckinId) -> Result<(), RepositoryError> {
        Err(offline())
    }

    fn insert_message(
        &self,
        _message: PersonalizedMessage,
    ) -> Result<PersonalizedMessage, RepositoryError> {
        Err(offline())
    }

    fn messages(&self) -> Result<Vec<PersonalizedMessage>, RepositoryError> {
        Err(offline())
    }

    fn fetch_message(
        &self,
        _id: &MessageId,
    ) -> Result<Option<PersonalizedMessage>, RepositoryError> {
        Err(offline())
    }

    fn update_message(&self, _message: PersonalizedMessage) -> Result<(), RepositoryError> {
        Err(offline())
    }

    fn save_profile(&self, _scores: TraitScores) -> Result<(), RepositoryError> {
        Err(offline())
    }

    fn profile(&self) -> Result<Option<TraitScores>, RepositoryError> {
        Err(offline())
    }
}

/// Delegates to [`MemoryRepository`] but rejects the first `failures` message inserts.
#[derive(Default)]
pub(super) struct FlakyMessageRepository {
    pub(super) inner: MemoryRepository,
    pub(super) failures: AtomicU32,
}

impl FlakyMessageRepository {
    pub(super) fn failing_once() -> Self {
        Self {
            inner: MemoryRepository::default(),
            failures: AtomicU32::new(1),
        }
    }
}

impl JournalRepository for FlakyMessageRepository {
    fn insert_checkin(&self, checkin: Checkin) -> Result<Checkin, RepositoryError> {
        self.inner.insert_checkin(checkin)
    }

    fn checkins(&self) -> Result<Vec<Checkin>, RepositoryError> {
        self.inner.checkins()
    }

    fn latest_checkin(&self) -> Result<Option<Checkin>, RepositoryError> {
        self.inner.latest_checkin()
    }

    fn remove_checkin(&self, id: &CheckinId) -> Result<(), RepositoryError> {
        self.inner.remove_checkin(id)
    }

    fn insert_message(
        &self,
        message: PersonalizedMessage,
    ) -> Result<PersonalizedMessage, RepositoryError> {
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Err(offline());
        }
        self.inner.insert_message(message)
    }

    fn messages(&self) -> Result<Vec<PersonalizedMessage>, RepositoryError> {
        self.inner.messages()
    }

    fn fetch_message(
        &self,
        id: &MessageId,
    ) -> Result<Option<PersonalizedMessage>, RepositoryError> {
        self.inner.fetch_message(id)
    }

    fn update_message(&self, message: PersonalizedMessage) -> Result<(), RepositoryError> {
        self.inner.update_message(message)
    }

    fn save_profile(&self, scores: TraitScores) -> Result<(), RepositoryError> {
        self.inner.save_profile(scores)
    }

    fn profile(&self) -> Result<Option<TraitScores>, RepositoryError> {
        self.inner.profile()
    }
}

fn offline() -> RepositoryError {
    RepositoryError::Unavailable("store offline".to_string())
}

pub(super) fn instant_selector() -> Arc<MessageSelector<CannedMessageGenerator>> {
    Arc::new(MessageSelector::canned(
        Duration::ZERO,
        GenerationPolicy {
            timeout: Duration::from_millis(200),
            max_retries: 0,
            retry_backoff: Duration::ZERO,
        },
    ))
}

pub(super) type MemoryService = DailyCheckinService<MemoryRepository, CannedMessageGenerator>;

pub(super) fn build_service() -> (Arc<MemoryService>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = Arc::new(DailyCheckinService::new(
        repository.clone(),
        instant_selector(),
    ));
    (service, repository)
}

pub(super) fn router_with_service(service: Arc<MemoryService>) -> axum::Router {
    checkin_router(service)
}

pub(super) fn low_energy_submission() -> CheckinSubmission {
    CheckinSubmission {
        mood: 1,
        energy: EnergyLevel::Low,
        note: None,
    }
}

pub(super) async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}

pub(super) async fn assert_retryable_failure(response: Response) {
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = json_body(response).await;
    assert_eq!(body["retryable"], Value::Bool(true));
}
