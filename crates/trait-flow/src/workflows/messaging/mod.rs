//! Trait-driven personalized messages.
//!
//! The dominant trait picks a template from [`TemplateTable`]; a [`MessageGenerator`]
//! produces the final text under the timeout and retry rules of [`GenerationPolicy`].

pub mod domain;
pub mod generator;
mod selector;
mod templates;

pub use domain::{
    MessageId, MessageRating, MessageSource, PersonalizationSnapshot, PersonalizedMessage,
    RatingError,
};
pub use generator::{CannedMessageGenerator, GenerationError, GenerationRequest, MessageGenerator};
pub use selector::{GenerationPolicy, MessageSelector};
pub use templates::TemplateTable;
