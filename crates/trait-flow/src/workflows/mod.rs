pub mod checkin;
pub mod messaging;
pub mod onboarding;
pub mod personality;
