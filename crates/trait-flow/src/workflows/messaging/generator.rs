use std::future::Future;
use std::time::Duration;

use serde::Serialize;

use super::templates::TemplateTable;
use crate::workflows::checkin::{EnergyLevel, Mood};
use crate::workflows::personality::{BigFiveTrait, TraitScores};

/// Everything a generator may use to write a message.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerationRequest {
    pub base_trait: BigFiveTrait,
    pub scores: TraitScores,
    pub mood: Mood,
    pub energy: EnergyLevel,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("generation backend unavailable: {0}")]
    Transient(String),
    #[error("generation rejected: {0}")]
    Permanent(String),
    #[error("generation timed out after {0:?}")]
    TimedOut(Duration),
}

impl GenerationError {
    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_) | Self::TimedOut(_))
    }
}

/// Backend producing message text. Dropping the returned future cancels the call.
pub trait MessageGenerator: Send + Sync {
    fn generate(
        &self,
        request: GenerationRequest,
    ) -> impl Future<Output = Result<String, GenerationError>> + Send;
}

/// Returns the trait template after a fixed artificial latency.
#[derive(Debug, Clone)]
pub struct CannedMessageGenerator {
    templates: TemplateTable,
    latency: Duration,
}

impl CannedMessageGenerator {
    pub const DEFAULT_LATENCY: Duration = Duration::from_millis(800);

    pub fn new(latency: Duration) -> Self {
        Self {
            templates: TemplateTable::standard(),
            latency,
        }
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }
}

impl Default for CannedMessageGenerator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LATENCY)
    }
}

impl MessageGenerator for CannedMessageGenerator {
    fn generate(
        &self,
        request: GenerationRequest,
    ) -> impl Future<Output = Result<String, GenerationError>> + Send {
        let latency = self.latency;
        let text = self.templates.template_for(request.base_trait).to_string();

        async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            Ok(text)
        }
    }
}
