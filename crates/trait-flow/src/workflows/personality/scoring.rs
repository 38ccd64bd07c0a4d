use super::domain::{AnswerSet, Likert, TraitScores};
use super::inventory::TipiInventory;

/// Response assumed for an item that has not been answered.
pub const NEUTRAL_RESPONSE: u8 = 4;

/// Averages the (reverse-coded where flagged) responses of each trait.
///
/// Missing answers count as [`NEUTRAL_RESPONSE`]. Raw values are clamped to the
/// Likert scale rather than rejected; range checks belong to the input boundary.
pub fn compute_scores(inventory: &TipiInventory, answers: &AnswerSet) -> TraitScores {
    let mut sums = [0.0_f64; 5];
    let mut counts = [0_u32; 5];

    for item in inventory.items() {
        let raw = answers
            .get(item.id)
            .unwrap_or(NEUTRAL_RESPONSE)
            .clamp(Likert::MIN, Likert::MAX);
        let value = if item.reversed {
            Likert::MIN + Likert::MAX - raw
        } else {
            raw
        };

        let slot = item.trait_.index();
        sums[slot] += f64::from(value);
        counts[slot] += 1;
    }

    TraitScores::from_fn(|trait_| {
        let slot = trait_.index();
        match counts[slot] {
            0 => f64::from(NEUTRAL_RESPONSE),
            count => sums[slot] / f64::from(count),
        }
    })
}
