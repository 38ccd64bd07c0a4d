use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::session::{OnboardingError, OnboardingSession, OnboardingStep, OnboardingView};
use crate::workflows::checkin::{JournalRepository, RepositoryError};
use crate::workflows::personality::{BigFiveTrait, RadarChart, TipiInventory, TraitScores};

/// Identifier wrapper for in-progress onboarding sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OnboardingSessionId(pub String);

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> OnboardingSessionId {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    OnboardingSessionId(format!("onb-{id:06}"))
}

/// Scores with the derived dominant trait and chart payload.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    pub scores: TraitScores,
    pub dominant_trait: BigFiveTrait,
    pub chart: RadarChart,
}

impl ProfileView {
    pub fn from_scores(scores: TraitScores) -> Self {
        Self {
            scores,
            dominant_trait: scores.dominant_trait(),
            chart: RadarChart::from_scores(&scores),
        }
    }
}

/// Bounds on abandoned sessions: idle ones expire after `ttl`, and at most
/// `max_sessions` are held at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionLimits {
    pub ttl: Duration,
    pub max_sessions: usize,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(30 * 60),
            max_sessions: 1_000,
        }
    }
}

struct SessionEntry {
    session: OnboardingSession,
    touched: Instant,
}

impl SessionEntry {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.touched.elapsed() >= ttl
    }
}

/// Holds onboarding sessions in memory and hands finished profiles to the repository.
pub struct OnboardingService<R> {
    inventory: Arc<TipiInventory>,
    page_size: usize,
    limits: SessionLimits,
    sessions: Mutex<HashMap<OnboardingSessionId, SessionEntry>>,
    repository: Arc<R>,
}

impl<R> OnboardingService<R>
where
    R: JournalRepository + 'static,
{
    pub fn new(
        repository: Arc<R>,
        inventory: Arc<TipiInventory>,
        page_size: usize,
    ) -> Result<Self, OnboardingError> {
        if page_size == 0 {
            return Err(OnboardingError::InvalidPageSize);
        }

        Ok(Self {
            inventory,
            page_size,
            limits: SessionLimits::default(),
            sessions: Mutex::new(HashMap::new()),
            repository,
        })
    }

    pub fn with_session_limits(mut self, limits: SessionLimits) -> Self {
        self.limits = SessionLimits {
            max_sessions: limits.max_sessions.max(1),
            ..limits
        };
        self
    }

    pub fn session_count(&self) -> usize {
        self.sessions().len()
    }

    pub fn inventory(&self) -> &TipiInventory {
        &self.inventory
    }

    pub fn create(&self) -> Result<(OnboardingSessionId, OnboardingView), OnboardingServiceError> {
        let session = OnboardingSession::new(self.inventory.clone(), self.page_size)?;
        let view = session.view();
        let id = next_session_id();

        let mut sessions = self.sessions();
        self.evict(&mut sessions);
        sessions.insert(
            id.clone(),
            SessionEntry {
                session,
                touched: Instant::now(),
            },
        );
        drop(sessions);

        info!(session_id = %id.0, "onboarding session created");
        Ok((id, view))
    }

    pub fn view(&self, id: &OnboardingSessionId) -> Result<OnboardingView, OnboardingServiceError> {
        self.with_session(id, |session| Ok(session.view()))
    }

    pub fn start(&self, id: &OnboardingSessionId) -> Result<OnboardingView, OnboardingServiceError> {
        self.with_session(id, |session| {
            session.start()?;
            Ok(session.view())
        })
    }

    pub fn answer(
        &self,
        id: &OnboardingSessionId,
        item_id: u8,
        value: u8,
    ) -> Result<OnboardingView, OnboardingServiceError> {
        self.with_session(id, |session| {
            session.answer(item_id, value)?;
            Ok(session.view())
        })
    }

    pub fn next(&self, id: &OnboardingSessionId) -> Result<OnboardingView, OnboardingServiceError> {
        self.with_session(id, |session| {
            if session.next()? == OnboardingStep::Result {
                info!(session_id = %id.0, "onboarding quiz scored");
            }
            Ok(session.view())
        })
    }

    pub fn back(&self, id: &OnboardingSessionId) -> Result<OnboardingView, OnboardingServiceError> {
        self.with_session(id, |session| {
            session.back()?;
            Ok(session.view())
        })
    }

    /// Leaves the result screen: stores the scores as the current profile and closes the session.
    pub fn finish(&self, id: &OnboardingSessionId) -> Result<ProfileView, OnboardingServiceError> {
        let mut sessions = self.sessions();
        let session = &sessions
            .get(id)
            .filter(|entry| !entry.is_expired(self.limits.ttl))
            .ok_or(OnboardingServiceError::NotFound)?
            .session;
        let scores = match (session.step(), session.scores()) {
            (OnboardingStep::Result, Some(scores)) => scores,
            (step, _) => return Err(OnboardingError::WrongStep(step.label()).into()),
        };

        self.repository.save_profile(scores)?;
        sessions.remove(id);
        info!(
            session_id = %id.0,
            dominant_trait = %scores.dominant_trait(),
            "trait profile saved"
        );
        Ok(ProfileView::from_scores(scores))
    }

    pub fn profile(&self) -> Result<Option<ProfileView>, OnboardingServiceError> {
        Ok(self.repository.profile()?.map(ProfileView::from_scores))
    }

    fn with_session<T>(
        &self,
        id: &OnboardingSessionId,
        action: impl FnOnce(&mut OnboardingSession) -> Result<T, OnboardingError>,
    ) -> Result<T, OnboardingServiceError> {
        let mut sessions = self.sessions();
        let entry = sessions
            .get_mut(id)
            .filter(|entry| !entry.is_expired(self.limits.ttl))
            .ok_or(OnboardingServiceError::NotFound)?;
        entry.touched = Instant::now();
        Ok(action(&mut entry.session)?)
    }

    /// Drops expired sessions, then the least recently touched ones until a new
    /// session fits under the cap.
    fn evict(&self, sessions: &mut HashMap<OnboardingSessionId, SessionEntry>) {
        let before = sessions.len();
        sessions.retain(|_, entry| !entry.is_expired(self.limits.ttl));

        while sessions.len() >= self.limits.max_sessions {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.touched)
                .map(|(id, _)| id.clone());
            match oldest {
                Some(id) => {
                    sessions.remove(&id);
                }
                None => break,
            }
        }

        let evicted = before - sessions.len();
        if evicted > 0 {
            debug!(evicted, remaining = sessions.len(), "onboarding sessions evicted");
        }
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<OnboardingSessionId, SessionEntry>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OnboardingServiceError {
    #[error("onboarding session not found")]
    NotFound,
    #[error(transparent)]
    Session(#[from] OnboardingError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
