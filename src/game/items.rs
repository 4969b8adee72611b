//! # Items
//!
//! Things a hero can carry: loot dropped by monsters and the contents of chests.

use serde::{Deserialize, Serialize};

/// The four pillars hidden in the dungeon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PillarKind {
    Abstraction,
    Encapsulation,
    Inheritance,
    Polymorphism,
}

/// What an item does when used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    /// Restores up to `amount` health
    HealingPotion { amount: u32 },
    /// Activates one pillar when used
    Pillar(PillarKind),
    /// No effect; worth keeping for its own sake
    Trinket,
}

/// A single inventory item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub description: String,
    pub kind: ItemKind,
}

impl Item {
    /// Creates a new item.
    pub fn new(name: impl Into<String>, description: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind,
        }
    }

    /// A healing potion restoring `amount` health.
    pub fn healing_potion(amount: u32) -> Self {
        Self::new(
            "Healing Potion",
            format!("Restores up to {} health.", amount),
            ItemKind::HealingPotion { amount },
        )
    }

    /// The item form of a pillar.
    pub fn pillar(kind: PillarKind) -> Self {
        Self::new(
            format!("Pillar of {:?}", kind),
            "One of the four pillars. Activate it to weaken the dungeon's hold.",
            ItemKind::Pillar(kind),
        )
    }

    /// Whether using the item removes it from the inventory.
    ///
    /// Trinkets have no use and therefore stay.
    pub fn is_consumable(&self) -> bool {
        !matches!(self.kind, ItemKind::Trinket)
    }
}
