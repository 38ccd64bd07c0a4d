//! Daily mood and energy check-ins and the message history they feed.

pub mod domain;
mod export;
pub mod form;
pub mod repository;
pub mod router;
pub mod service;
mod stats;

#[cfg(test)]
mod tests;

pub use domain::{
    Checkin, CheckinId, CheckinSubmission, CheckinValidationError, EnergyLevel, Mood,
    ValidatedCheckin,
};
pub use export::{write_checkins_csv, ExportError};
pub use form::{CheckinForm, FormStatus, SUBMISSION_FAILED_MESSAGE};
pub use repository::{JournalRepository, RepositoryError};
pub use router::checkin_router;
pub use service::{CheckinReceipt, CheckinServiceError, DailyCheckinService};
pub use stats::CheckinStats;
