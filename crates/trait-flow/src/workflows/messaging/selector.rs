use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::domain::{MessageSource, PersonalizationSnapshot, PersonalizedMessage};
use super::generator::{CannedMessageGenerator, GenerationError, GenerationRequest, MessageGenerator};
use super::templates::TemplateTable;
use crate::workflows::checkin::Checkin;
use crate::workflows::personality::TraitScores;

/// Timeout and retry limits applied to every generation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationPolicy {
    pub timeout: Duration,
    pub max_retries: u32,
    pub retry_backoff: Duration,
}

impl Default for GenerationPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            max_retries: 1,
            retry_backoff: Duration::from_millis(250),
        }
    }
}

/// Picks the dominant trait and turns it into a [`PersonalizedMessage`].
pub struct MessageSelector<G> {
    generator: Arc<G>,
    templates: TemplateTable,
    policy: GenerationPolicy,
}

impl MessageSelector<CannedMessageGenerator> {
    pub fn canned(latency: Duration, policy: GenerationPolicy) -> Self {
        Self::new(Arc::new(CannedMessageGenerator::new(latency)), policy)
    }
}

impl<G> MessageSelector<G>
where
    G: MessageGenerator,
{
    pub fn new(generator: Arc<G>, policy: GenerationPolicy) -> Self {
        Self {
            generator,
            templates: TemplateTable::standard(),
            policy,
        }
    }

    pub fn policy(&self) -> GenerationPolicy {
        self.policy
    }

    /// Never fails: when generation gives up, the trait template is used instead.
    pub async fn select(
        &self,
        scores: &TraitScores,
        latest_checkin: Option<&Checkin>,
    ) -> PersonalizedMessage {
        let base_trait = scores.dominant_trait();
        let personalization = PersonalizationSnapshot::new(base_trait, latest_checkin);
        let request = GenerationRequest {
            base_trait,
            scores: *scores,
            mood: personalization.mood,
            energy: personalization.energy,
        };

        match self.generate(request).await {
            Ok(text) => {
                debug!(%base_trait, "personalized message generated");
                PersonalizedMessage::new(text, personalization, MessageSource::Generated)
            }
            Err(error) => {
                warn!(%base_trait, %error, "message generation failed; using fallback template");
                let text = self.templates.template_for(base_trait).to_string();
                PersonalizedMessage::new(text, personalization, MessageSource::Fallback)
            }
        }
    }

    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            let outcome =
                match tokio::time::timeout(self.policy.timeout, self.generator.generate(request))
                    .await
                {
                    Ok(result) => result,
                    Err(_) => Err(GenerationError::TimedOut(self.policy.timeout)),
                };

            match outcome {
                Ok(text) => return Ok(text),
                Err(error) if error.is_transient() && attempt <= self.policy.max_retries => {
                    warn!(attempt, %error, "message generation attempt failed; retrying");
                    tokio::time::sleep(self.policy.retry_backoff).await;
                }
                Err(error) => return Err(error),
            }
        }
    }
}
