use serde::Serialize;

use super::domain::{CheckinSubmission, EnergyLevel, Mood};
use super::repository::JournalRepository;
use super::service::{CheckinReceipt, CheckinServiceError, DailyCheckinService};
use crate::workflows::messaging::{MessageGenerator, PersonalizedMessage};

/// Message shown on the form after a failed submission.
pub const SUBMISSION_FAILED_MESSAGE: &str =
    "Submission failed. Please wait a moment and try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormStatus {
    Form,
    Loading,
    Result,
}

/// Check-in form state: `Form -> Loading -> Result`, falling back to `Form` on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckinForm {
    pub mood: u8,
    pub energy: EnergyLevel,
    pub note: String,
    status: FormStatus,
    result: Option<PersonalizedMessage>,
    error: Option<String>,
}

impl Default for CheckinForm {
    fn default() -> Self {
        Self {
            mood: Mood::NEUTRAL.value(),
            energy: EnergyLevel::Medium,
            note: String::new(),
            status: FormStatus::Form,
            result: None,
            error: None,
        }
    }
}

impl CheckinForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> FormStatus {
        self.status
    }

    pub fn result(&self) -> Option<&PersonalizedMessage> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Moves to `Loading` and returns the payload, or `None` while a submission is in flight.
    pub fn begin_submit(&mut self) -> Option<CheckinSubmission> {
        if self.status == FormStatus::Loading {
            return None;
        }
        self.status = FormStatus::Loading;
        self.error = None;

        Some(CheckinSubmission {
            mood: self.mood,
            energy: self.energy,
            note: Some(self.note.clone()),
        })
    }

    pub fn complete(&mut self, message: PersonalizedMessage) {
        self.status = FormStatus::Result;
        self.result = Some(message);
    }

    /// Returns to `Form` keeping the entered values. Only retryable failures ask the
    /// user to resubmit unchanged; anything else shows the error itself.
    pub fn fail(&mut self, error: &CheckinServiceError) {
        self.status = FormStatus::Form;
        self.error = Some(if error.is_retryable() {
            SUBMISSION_FAILED_MESSAGE.to_string()
        } else {
            error.to_string()
        });
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Drives one submission through `service`.
    pub async fn submit<R, G>(
        &mut self,
        service: &DailyCheckinService<R, G>,
    ) -> Option<CheckinReceipt>
    where
        R: JournalRepository + 'static,
        G: MessageGenerator + 'static,
    {
        let submission = self.begin_submit()?;
        match service.submit(submission).await {
            Ok(receipt) => {
                self.complete(receipt.message.clone());
                Some(receipt)
            }
            Err(error) => {
                tracing::warn!(%error, "check-in submission failed");
                self.fail(&error);
                None
            }
        }
    }
}
