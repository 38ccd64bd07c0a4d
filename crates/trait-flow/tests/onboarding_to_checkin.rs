//! End-to-end journey through the public service facades: onboarding produces a profile,
//! and later check-ins receive messages driven by that profile.

mod common {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use trait_flow::workflows::checkin::{
        Checkin, CheckinId, DailyCheckinService, JournalRepository, RepositoryError,
    };
    use trait_flow::workflows::messaging::{
        CannedMessageGenerator, GenerationPolicy, MessageId, MessageSelector, PersonalizedMessage,
    };
    use trait_flow::workflows::onboarding::{OnboardingService, SessionLimits, DEFAULT_PAGE_SIZE};
    use trait_flow::workflows::personality::{TipiInventory, TraitScores};

    #[derive(Default)]
    pub struct SharedRepository {
        checkins: Mutex<Vec<Checkin>>,
        messages: Mutex<Vec<PersonalizedMessage>>,
        profile: Mutex<Option<TraitScores>>,
    }

    impl JournalRepository for SharedRepository {
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
            let slot = guard
                .iter_mut()
                .find(|stored| stored.id == message.id)
                .ok_or(RepositoryError::NotFound)?;
            *slot = message;
            Ok(())
        }

        fn save_profile(&self, scores: TraitScores) -> Result<(), RepositoryError> {
            *self.profile.lock().unwrap() = Some(scores);
            Ok(())
        }

        fn profile(&self) -> Result<Option<TraitScores>, RepositoryError> {
            Ok(*self.profile.lock().unwrap())
        }
    }

    pub struct Services {
        pub onboarding: OnboardingService<SharedRepository>,
        pub checkins: DailyCheckinService<SharedRepository, CannedMessageGenerator>,
    }

    pub fn onboarding_with_limits(limits: SessionLimits) -> OnboardingService<SharedRepository> {
        OnboardingService::new(
            Arc::new(SharedRepository::default()),
            Arc::new(TipiInventory::standard()),
            DEFAULT_PAGE_SIZE,
        )
        .expect("valid page size")
        .with_session_limits(limits)
    }

    pub fn services() -> Services {
        let repository = Arc::new(SharedRepository::default());
        let selector = Arc::new(MessageSelector::canned(
            Duration::from_millis(5),
            GenerationPolicy {
                timeout: Duration::from_secs(1),
                max_retries: 0,
                retry_backoff: Duration::ZERO,
            },
        ));

        Services {
            onboarding: OnboardingService::new(
                repository.clone(),
                Arc::new(TipiInventory::standard()),
                DEFAULT_PAGE_SIZE,
            )
            .expect("valid page size"),
            checkins: DailyCheckinService::new(repository, selector),
        }
    }
}

use std::time::Duration;

use common::{onboarding_with_limits, services};
use trait_flow::workflows::checkin::{CheckinSubmission, EnergyLevel};
use trait_flow::workflows::messaging::{MessageSource, TemplateTable};
use trait_flow::workflows::onboarding::{OnboardingServiceError, SessionLimits};
use trait_flow::workflows::personality::BigFiveTrait;

#[tokio::test]
async fn conscientious_profile_drives_checkin_message() {
    let services = services();
    let (id, welcome) = services.onboarding.create().expect("session created");
    assert_eq!(welcome.step, "welcome");
    assert_eq!(welcome.page_count, 2);

    let first_page = services.onboarding.start(&id).expect("quiz starts");
    assert_eq!(first_page.page, Some(0));
    assert!(!first_page.can_advance);

    // Conscientiousness items: 3 (straight) and 8 (reversed).
    for item in 1..=5 {
        let value = if item == 3 { 7 } else { 4 };
        services
            .onboarding
            .answer(&id, item, value)
            .expect("answer accepted");
    }
    let second_page = services.onboarding.next(&id).expect("advances");
    assert_eq!(second_page.page, Some(1));

    for item in 6..=10 {
        let value = if item == 8 { 1 } else { 4 };
        services
            .onboarding
            .answer(&id, item, value)
            .expect("answer accepted");
    }
    let result = services.onboarding.next(&id).expect("scored");
    assert_eq!(result.step, "result");
    assert_eq!(result.dominant_trait, Some(BigFiveTrait::Conscientiousness));

    let profile = services.onboarding.finish(&id).expect("profile saved");
    assert_eq!(profile.scores.get(BigFiveTrait::Conscientiousness), 7.0);
    assert!(matches!(
        services.onboarding.view(&id),
        Err(OnboardingServiceError::NotFound)
    ));

    let receipt = services
        .checkins
        .submit(CheckinSubmission {
            mood: 1,
            energy: EnergyLevel::Low,
            note: None,
        })
        .await
        .expect("check-in accepted");

    assert_eq!(receipt.message.source, MessageSource::Generated);
    assert_eq!(
        receipt.message.personalization.base_trait,
        BigFiveTrait::Conscientiousness
    );
    assert_eq!(
        receipt.message.text,
        TemplateTable::standard().template_for(BigFiveTrait::Conscientiousness)
    );
    assert_eq!(receipt.message.personalization.mood.value(), 1);
    assert_eq!(receipt.message.personalization.energy, EnergyLevel::Low);
    assert!(receipt.checkin.note.is_none());
}

#[tokio::test]
async fn finishing_before_result_is_rejected() {
    let services = services();
    let (id, _) = services.onboarding.create().expect("session created");
    services.onboarding.start(&id).expect("quiz starts");

    assert!(matches!(
        services.onboarding.finish(&id),
        Err(OnboardingServiceError::Session(_))
    ));
    assert!(services.onboarding.profile().expect("readable").is_none());
}

#[tokio::test]
async fn history_lists_newest_first() {
    let services = services();
    for mood in [2, 5] {
        services
            .checkins
            .submit(CheckinSubmission {
                mood,
                energy: EnergyLevel::Medium,
                note: Some(format!("mood {mood}")),
            })
            .await
            .expect("check-in accepted");
    }

    let checkins = services.checkins.checkins().expect("history");
    assert_eq!(checkins.len(), 2);
    assert_eq!(checkins[0].mood.value(), 5);
    assert_eq!(checkins[1].note.as_deref(), Some("mood 2"));

    let messages = services.checkins.messages().expect("messages");
    assert_eq!(messages.len(), 2);
    assert!(messages[0].id > messages[1].id);
}

#[test]
fn session_cap_evicts_least_recently_used() {
    let onboarding = onboarding_with_limits(SessionLimits {
        ttl: Duration::from_secs(3600),
        max_sessions: 2,
    });

    let (first, _) = onboarding.create().expect("session created");
    std::thread::sleep(Duration::from_millis(2));
    let (second, _) = onboarding.create().expect("session created");
    std::thread::sleep(Duration::from_millis(2));
    onboarding.start(&first).expect("first session touched");
    std::thread::sleep(Duration::from_millis(2));

    let (third, _) = onboarding.create().expect("session created");

    assert_eq!(onboarding.session_count(), 2);
    assert!(onboarding.view(&first).is_ok());
    assert!(onboarding.view(&third).is_ok());
    assert!(matches!(
        onboarding.view(&second),
        Err(OnboardingServiceError::NotFound)
    ));
}

#[test]
fn idle_sessions_expire_and_are_dropped_on_create() {
    let onboarding = onboarding_with_limits(SessionLimits {
        ttl: Duration::ZERO,
        max_sessions: 100,
    });

    let (abandoned, _) = onboarding.create().expect("session created");
    assert!(matches!(
        onboarding.view(&abandoned),
        Err(OnboardingServiceError::NotFound)
    ));

    for _ in 0..5 {
        onboarding.create().expect("session created");
    }
    assert_eq!(onboarding.session_count(), 1);
}
