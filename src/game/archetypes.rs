//! # Archetypes
//!
//! Immutable stat tables for every hero and monster type.
//!
//! An archetype is shared by all instances of its type and is never mutated after
//! definition. Instances only keep their type tag and look the record up here.

use crate::DelveError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stat template for a playable hero type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeroArchetype {
    pub display_name: &'static str,
    pub description: &'static str,
    pub base_health: u32,
    pub base_attack: u32,
    pub special_attack_name: &'static str,
    pub special_attack_damage: u32,
    /// Probability in [0, 1] that an attack is critical
    pub crit_chance: f64,
    /// Damage multiplier of a critical hit, at least 1.0
    pub crit_multiplier: f64,
}

/// Stat template for a monster type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonsterArchetype {
    pub display_name: &'static str,
    pub description: &'static str,
    pub base_health: u32,
    pub base_attack: u32,
    pub special_attack_name: &'static str,
    pub special_attack_damage: u32,
    pub crit_chance: f64,
    pub crit_multiplier: f64,
    pub gold_reward: u32,
    pub is_elite: bool,
    pub is_boss: bool,
}

const WARRIOR: HeroArchetype = HeroArchetype {
    display_name: "Warrior",
    description: "A heavily armored fighter who trades finesse for staying power.",
    base_health: 125,
    base_attack: 15,
    special_attack_name: "Crushing Blow",
    special_attack_damage: 35,
    crit_chance: 0.05,
    crit_multiplier: 2.0,
};

const PRIESTESS: HeroArchetype = HeroArchetype {
    display_name: "Priestess",
    description: "A devoted healer whose prayers can also burn.",
    base_health: 75,
    base_attack: 10,
    special_attack_name: "Divine Smite",
    special_attack_damage: 25,
    crit_chance: 0.10,
    crit_multiplier: 1.5,
};

const THIEF: HeroArchetype = HeroArchetype {
    display_name: "Thief",
    description: "Quick and fragile, deadly when striking from the shadows.",
    base_health: 75,
    base_attack: 12,
    special_attack_name: "Surprise Attack",
    special_attack_damage: 30,
    crit_chance: 0.20,
    crit_multiplier: 1.75,
};

const GOBLIN: MonsterArchetype = MonsterArchetype {
    display_name: "Goblin",
    description: "A sneering scavenger armed with a rusty knife.",
    base_health: 40,
    base_attack: 5,
    special_attack_name: "Dirty Stab",
    special_attack_damage: 10,
    crit_chance: 0.05,
    crit_multiplier: 1.5,
    gold_reward: 5,
    is_elite: false,
    is_boss: false,
};

const SKELETON: MonsterArchetype = MonsterArchetype {
    display_name: "Skeleton",
    description: "Old bones held together by older magic.",
    base_health: 55,
    base_attack: 8,
    special_attack_name: "Bone Rattle",
    special_attack_damage: 14,
    crit_chance: 0.05,
    crit_multiplier: 1.5,
    gold_reward: 10,
    is_elite: false,
    is_boss: false,
};

const ORC: MonsterArchetype = MonsterArchetype {
    display_name: "Orc",
    description: "A battle-scarred brute leading lesser creatures.",
    base_health: 90,
    base_attack: 15,
    special_attack_name: "Cleave",
    special_attack_damage: 25,
    crit_chance: 0.10,
    crit_multiplier: 1.5,
    gold_reward: 25,
    is_elite: true,
    is_boss: false,
};

const OGRE: MonsterArchetype = MonsterArchetype {
    display_name: "Ogre",
    description: "Slow, enormous and very hard to put down.",
    base_health: 150,
    base_attack: 20,
    special_attack_name: "Ground Slam",
    special_attack_damage: 35,
    crit_chance: 0.05,
    crit_multiplier: 2.0,
    gold_reward: 40,
    is_elite: true,
    is_boss: false,
};

const DRAGON: MonsterArchetype = MonsterArchetype {
    display_name: "Dragon",
    description: "Guardian of the deepest chamber.",
    base_health: 300,
    base_attack: 25,
    special_attack_name: "Fire Breath",
    special_attack_damage: 50,
    crit_chance: 0.10,
    crit_multiplier: 2.0,
    gold_reward: 200,
    is_elite: false,
    is_boss: true,
};

/// Playable hero types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeroType {
    Warrior,
    Priestess,
    Thief,
}

impl HeroType {
    /// Looks up the stat record for this hero type.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::HeroType;
    ///
    /// let warrior = HeroType::Warrior.archetype();
    /// assert_eq!(warrior.base_health, 125);
    /// assert_eq!(warrior.base_attack, 15);
    /// ```
    pub fn archetype(self) -> &'static HeroArchetype {
        match self {
            HeroType::Warrior => &WARRIOR,
            HeroType::Priestess => &PRIESTESS,
            HeroType::Thief => &THIEF,
        }
    }

    /// Returns every hero type in selection order.
    pub fn all() -> [HeroType; 3] {
        [HeroType::Warrior, HeroType::Priestess, HeroType::Thief]
    }
}

impl fmt::Display for HeroType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.archetype().display_name)
    }
}

impl FromStr for HeroType {
    type Err = DelveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HeroType::all()
            .into_iter()
            .find(|hero_type| hero_type.archetype().display_name.eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DelveError::InvalidArgument(format!("unknown hero type '{}'", s)))
    }
}

/// Monster types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MonsterType {
    Goblin,
    Skeleton,
    Orc,
    Ogre,
    Dragon,
}

impl MonsterType {
    /// Looks up the stat record for this monster type.
    pub fn archetype(self) -> &'static MonsterArchetype {
        match self {
            MonsterType::Goblin => &GOBLIN,
            MonsterType::Skeleton => &SKELETON,
            MonsterType::Orc => &ORC,
            MonsterType::Ogre => &OGRE,
            MonsterType::Dragon => &DRAGON,
        }
    }

    /// Returns every monster type, weakest first.
    pub fn all() -> [MonsterType; 5] {
        [
            MonsterType::Goblin,
            MonsterType::Skeleton,
            MonsterType::Orc,
            MonsterType::Ogre,
            MonsterType::Dragon,
        ]
    }
}

impl fmt::Display for MonsterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.archetype().display_name)
    }
}
