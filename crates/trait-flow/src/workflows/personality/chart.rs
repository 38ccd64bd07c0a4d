use serde::Serialize;

use super::domain::{BigFiveTrait, TraitScores};

/// Upper bound of the radar chart radius.
pub const FULL_MARK: f64 = 7.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarAxis {
    #[serde(rename = "trait")]
    pub trait_: BigFiveTrait,
    pub label: &'static str,
    pub score: f64,
    pub full_mark: f64,
}

/// Five-axis polar chart payload; axes follow trait declaration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarChart {
    pub domain: [f64; 2],
    pub axes: Vec<RadarAxis>,
}

impl RadarChart {
    pub fn from_scores(scores: &TraitScores) -> Self {
        let axes = scores
            .iter()
            .map(|(trait_, score)| RadarAxis {
                trait_,
                label: trait_.short_label(),
                score,
                full_mark: FULL_MARK,
            })
            .collect();

        Self {
            domain: [0.0, FULL_MARK],
            axes,
        }
    }
}
