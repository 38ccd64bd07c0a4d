//! Ten-item personality inventory and Big Five scoring.

pub mod chart;
pub mod domain;
mod inventory;
mod scoring;

pub use chart::{RadarAxis, RadarChart};
pub use domain::{AnswerSet, BigFiveTrait, Likert, LikertError, TraitScores};
pub use inventory::{InventoryItem, TipiInventory};
pub use scoring::{compute_scores, NEUTRAL_RESPONSE};
