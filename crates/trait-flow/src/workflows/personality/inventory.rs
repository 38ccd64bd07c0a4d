use serde::Serialize;

use super::domain::BigFiveTrait;

/// One fixed inventory prompt and how its response feeds a trait.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryItem {
    pub id: u8,
    pub prompt: &'static str,
    #[serde(rename = "trait")]
    pub trait_: BigFiveTrait,
    pub reversed: bool,
}

#[derive(Debug, Clone)]
pub struct TipiInventory {
    items: Vec<InventoryItem>,
}

impl TipiInventory {
    pub fn standard() -> Self {
        Self {
            items: standard_items(),
        }
    }

    /// Builds an inventory from arbitrary items; scoring divides by the real per-trait count.
    pub fn from_items(items: Vec<InventoryItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    pub fn item(&self, id: u8) -> Option<&InventoryItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn items_for_trait(&self, trait_: BigFiveTrait) -> Vec<&InventoryItem> {
        self.items
            .iter()
            .filter(|item| item.trait_ == trait_)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for TipiInventory {
    fn default() -> Self {
        Self::standard()
    }
}

fn standard_items() -> Vec<InventoryItem> {
    vec![
        InventoryItem {
            id: 1,
            prompt: "Extraverted, enthusiastic",
            trait_: BigFiveTrait::Extraversion,
            reversed: false,
        },
        InventoryItem {
            id: 2,
            prompt: "Critical, quarrelsome",
            trait_: BigFiveTrait::Agreeableness,
            reversed: true,
        },
        InventoryItem {
            id: 3,
            prompt: "Dependable, self-disciplined",
            trait_: BigFiveTrait::Conscientiousness,
            reversed: false,
        },
        InventoryItem {
            id: 4,
            prompt: "Anxious, easily upset",
            trait_: BigFiveTrait::Neuroticism,
            reversed: false,
        },
        InventoryItem {
            id: 5,
            prompt: "Open to new experiences, complex",
            trait_: BigFiveTrait::Openness,
            reversed: false,
        },
        InventoryItem {
            id: 6,
            prompt: "Reserved, quiet",
            trait_: BigFiveTrait::Extraversion,
            reversed: true,
        },
        InventoryItem {
            id: 7,
            prompt: "Sympathetic, warm",
            trait_: BigFiveTrait::Agreeableness,
            reversed: false,
        },
        InventoryItem {
            id: 8,
            prompt: "Disorganized, careless",
            trait_: BigFiveTrait::Conscientiousness,
            reversed: true,
        },
        InventoryItem {
            id: 9,
            prompt: "Calm, emotionally stable",
            trait_: BigFiveTrait::Neuroticism,
            reversed: true,
        },
        InventoryItem {
            id: 10,
            prompt: "Conventional, uncreative",
            trait_: BigFiveTrait::Openness,
            reversed: true,
        },
    ]
}
