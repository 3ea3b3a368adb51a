//! Consumable items sold at the market.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::stats::{MAX_NEED, Survivor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// Raises hunger.
    Food,
    /// Raises thirst.
    Water,
    /// Lowers infection.
    Medicine,
}

impl ItemKind {
    pub const ALL: [ItemKind; 3] = [ItemKind::Food, ItemKind::Water, ItemKind::Medicine];
}

impl std::str::FromStr for ItemKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "food" => Ok(ItemKind::Food),
            "water" => Ok(ItemKind::Water),
            "medicine" | "med" | "medkit" => Ok(ItemKind::Medicine),
            other => Err(ValidationError::InvalidItem(format!("unknown item kind '{other}'"))),
        }
    }
}

/// Immutable consumable. Built fresh for display; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    kind: ItemKind,
    name: String,
    cost: i64,
    effect_value: i64,
}

impl Item {
    pub fn new(
        kind: ItemKind,
        name: impl Into<String>,
        cost: i64,
        effect_value: i64,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::InvalidItem("name must be non-empty".to_string()));
        }
        if cost < 0 {
            return Err(ValidationError::InvalidItem(format!("cost cannot be negative ({cost})")));
        }
        Ok(Self {
            kind,
            name,
            cost,
            effect_value,
        })
    }

    /// The market's stock item for `kind`.
    pub fn standard(kind: ItemKind) -> Self {
        let (name, cost, effect_value) = match kind {
            ItemKind::Food => ("Food Ration", 10, 20),
            ItemKind::Water => ("Water Bottle", 8, 15),
            ItemKind::Medicine => ("Medkit", 15, 25),
        };
        Self {
            kind,
            name: name.to_string(),
            cost,
            effect_value,
        }
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cost(&self) -> i64 {
        self.cost
    }

    pub fn effect_value(&self) -> i64 {
        self.effect_value
    }

    /// True when using the item now would push its stat past the useful range.
    ///
    /// Advisory only: `use_on` would clamp regardless.
    pub fn would_waste(&self, survivor: &Survivor) -> bool {
        match self.kind {
            ItemKind::Food => survivor.hunger().saturating_add(self.effect_value) > MAX_NEED,
            ItemKind::Water => survivor.thirst().saturating_add(self.effect_value) > MAX_NEED,
            ItemKind::Medicine => survivor.infection().saturating_sub(self.effect_value) < 0,
        }
    }

    /// Apply the effect. Affordability is the caller's concern.
    pub fn use_on(&self, survivor: &mut Survivor) {
        match self.kind {
            ItemKind::Food => survivor.add_hunger(self.effect_value),
            ItemKind::Water => survivor.add_thirst(self.effect_value),
            ItemKind::Medicine => survivor.add_infection(self.effect_value.saturating_neg()),
        }
    }
}

/// Everything the market sells, in display order.
pub fn market_catalog() -> Vec<Item> {
    ItemKind::ALL.into_iter().map(Item::standard).collect()
}
