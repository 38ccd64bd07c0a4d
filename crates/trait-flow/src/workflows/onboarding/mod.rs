//! Welcome, paginated quiz, and result: the flow that produces a trait profile.

pub mod router;
mod service;
mod session;

pub use router::onboarding_router;
pub use service::{
    OnboardingService, OnboardingServiceError, OnboardingSessionId, ProfileView, SessionLimits,
};
pub use session::{
    OnboardingError, OnboardingSession, OnboardingStep, OnboardingView, QuizItemView,
    DEFAULT_PAGE_SIZE,
};
