use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::inventory::TipiInventory;

/// Big Five personality dimensions, declared in their canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BigFiveTrait {
    Extraversion,
    Agreeableness,
    Conscientiousness,
    Neuroticism,
    Openness,
}

impl BigFiveTrait {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Extraversion,
            Self::Agreeableness,
            Self::Conscientiousness,
            Self::Neuroticism,
            Self::Openness,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Extraversion => "Extraversion",
            Self::Agreeableness => "Agreeableness",
            Self::Conscientiousness => "Conscientiousness",
            Self::Neuroticism => "Neuroticism",
            Self::Openness => "Openness",
        }
    }

    /// Compact axis label used by the radar chart.
    pub const fn short_label(self) -> &'static str {
        match self {
            Self::Extraversion => "Extra.",
            Self::Agreeableness => "Agree.",
            Self::Conscientiousness => "Consc.",
            Self::Neuroticism => "Neuro.",
            Self::Openness => "Open.",
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Self::Extraversion => 0,
            Self::Agreeableness => 1,
            Self::Conscientiousness => 2,
            Self::Neuroticism => 3,
            Self::Openness => 4,
        }
    }
}

impl fmt::Display for BigFiveTrait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A validated Likert response on the 1..=7 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Likert(u8);

impl Likert {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 7;

    pub fn new(value: u8) -> Result<Self, LikertError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(LikertError::OutOfRange(value))
        }
    }

    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Likert {
    type Error = LikertError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Likert> for u8 {
    fn from(value: Likert) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LikertError {
    #[error("response {0} is outside the 1-7 scale")]
    OutOfRange(u8),
}

/// Raw responses keyed by inventory item id. Entries are not range checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet(BTreeMap<u8, u8>);

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, item_id: u8, response: u8) {
        self.0.insert(item_id, response);
    }

    pub fn get(&self, item_id: u8) -> Option<u8> {
        self.0.get(&item_id).copied()
    }

    pub fn is_answered(&self, item_id: u8) -> bool {
        self.0.contains_key(&item_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        self.0.iter().map(|(id, response)| (*id, *response))
    }

    /// Whether every item of `inventory` has a response.
    pub fn is_complete(&self, inventory: &TipiInventory) -> bool {
        inventory.items().iter().all(|item| self.is_answered(item.id))
    }
}

impl FromIterator<(u8, u8)> for AnswerSet {
    fn from_iter<I: IntoIterator<Item = (u8, u8)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Per-trait averages on the 0..=7 scale. Always carries all five traits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraitScores([f64; 5]);

impl TraitScores {
    pub fn from_fn(mut score: impl FnMut(BigFiveTrait) -> f64) -> Self {
        let mut values = [0.0; 5];
        for trait_ in BigFiveTrait::ordered() {
            values[trait_.index()] = score(trait_);
        }
        Self(values)
    }

    /// Every trait at the scale midpoint.
    pub fn neutral() -> Self {
        Self([4.0; 5])
    }

    pub fn get(&self, trait_: BigFiveTrait) -> f64 {
        self.0[trait_.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (BigFiveTrait, f64)> + '_ {
        BigFiveTrait::ordered()
            .into_iter()
            .map(|trait_| (trait_, self.get(trait_)))
    }

    /// Highest scoring trait. Ties resolve to the trait declared first in
    /// [`BigFiveTrait::ordered`].
    pub fn dominant_trait(&self) -> BigFiveTrait {
        let mut best = BigFiveTrait::Extraversion;
        for (trait_, score) in self.iter() {
            if score > self.get(best) {
                best = trait_;
            }
        }
        best
    }
}

impl Default for TraitScores {
    fn default() -> Self {
        Self::neutral()
    }
}

impl Serialize for TraitScores {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let map: BTreeMap<BigFiveTrait, f64> = self.iter().collect();
        map.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TraitScores {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = BTreeMap::<BigFiveTrait, f64>::deserialize(deserializer)?;
        let mut scores = [0.0; 5];
        for trait_ in BigFiveTrait::ordered() {
            scores[trait_.index()] = *map.get(&trait_).ok_or_else(|| {
                serde::de::Error::custom(format!("missing score for {}", trait_.label()))
            })?;
        }
        Ok(Self(scores))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn likert_rejects_values_outside_scale() {
        assert!(Likert::new(0).is_err());
        assert!(Likert::new(8).is_err());
        assert_eq!(Likert::new(7).expect("in range").value(), 7);
    }

    #[test]
    fn dominant_trait_prefers_earlier_trait_on_ties() {
        let scores = TraitScores::from_fn(|trait_| match trait_ {
            BigFiveTrait::Agreeableness | BigFiveTrait::Openness => 6.0,
            _ => 2.5,
        });
        assert_eq!(scores.dominant_trait(), BigFiveTrait::Agreeableness);
        assert_eq!(TraitScores::neutral().dominant_trait(), BigFiveTrait::Extraversion);
    }

    #[test]
    fn scores_serialize_with_snake_case_keys() {
        let scores = TraitScores::neutral();
        let value = serde_json::to_value(scores).expect("serializes");
        assert_eq!(value["conscientiousness"], 4.0);

        let parsed: TraitScores = serde_json::from_value(value).expect("deserializes");
        assert_eq!(parsed, scores);
    }

    #[test]
    fn answer_set_completeness_tracks_inventory() {
        let inventory = TipiInventory::standard();
        let mut answers: AnswerSet = (1..=9).map(|id| (id, 4)).collect();
        assert!(!answers.is_complete(&inventory));
        answers.record(10, 9);
        assert!(answers.is_complete(&inventory));
    }

    #[test]
    fn scores_reject_missing_traits() {
        let value = serde_json::json!({ "extraversion": 3.0 });
        assert!(serde_json::from_value::<TraitScores>(value).is_err());
    }
}
