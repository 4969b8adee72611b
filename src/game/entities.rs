//! # Entities
//!
//! The character model shared by heroes and monsters.
//!
//! [`Character`] carries health and position and provides damage, the alive
//! predicate and movement. [`Attacker`] supplies the deterministic base damage
//! of an attack; crits and the rest of the combat math live in the combat engine.

use crate::config::defaults;
use crate::game::{
    new_entity_id, Direction, EntityId, HeroType, Item, ItemKind, MonsterType, PillarKind,
    Position,
};
use crate::{DelveError, DelveResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Health and position, the state every character shares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vitals {
    pub health: u32,
    pub max_health: u32,
    pub position: Position,
}

impl Vitals {
    /// Creates vitals at full health.
    pub fn new(max_health: u32, position: Position) -> Self {
        Self {
            health: max_health,
            max_health,
            position,
        }
    }
}

/// Base behavior for anything that has health and stands on the grid.
pub trait Character {
    /// Unique identifier of this character
    fn id(&self) -> EntityId;

    /// Display name
    fn name(&self) -> &str;

    /// Shared health and position state
    fn vitals(&self) -> &Vitals;

    /// Mutable access to health and position
    fn vitals_mut(&mut self) -> &mut Vitals;

    /// Current health
    fn health(&self) -> u32 {
        self.vitals().health
    }

    /// Current position
    fn position(&self) -> Position {
        self.vitals().position
    }

    /// Whether the character still has health left.
    fn is_alive(&self) -> bool {
        self.health() > 0
    }

    /// Reduces health by `amount`, never below zero.
    ///
    /// Negative amounts count as zero damage; healing has its own path.
    fn take_damage(&mut self, amount: i64) {
        let amount = amount.max(0);
        let vitals = self.vitals_mut();
        let remaining = (vitals.health as i64 - amount).max(0);
        vitals.health = remaining as u32;
    }

    /// Moves exactly one grid unit in `direction`. No bounds checking.
    fn move_in(&mut self, direction: Direction) {
        let vitals = self.vitals_mut();
        vitals.position = vitals.position.step(direction);
    }

    /// Places the character at `position`.
    fn set_position(&mut self, position: Position) {
        self.vitals_mut().position = position;
    }

    /// Hands out whatever this character drops on defeat, at most once.
    fn claim_rewards(&mut self) -> Option<Loot> {
        None
    }
}

/// A character that can deal damage.
pub trait Attacker: Character {
    /// Deterministic base damage of a basic attack against `target`.
    fn attack(&self, target: &dyn Character) -> u32;

    /// Deterministic base damage of a special attack against `target`.
    fn special_attack(&self, target: &dyn Character) -> u32;

    /// Name of the special attack, for presentation
    fn special_attack_name(&self) -> &'static str;

    /// Probability in [0, 1] of a critical hit
    fn crit_chance(&self) -> f64;

    /// Damage multiplier of a critical hit
    fn crit_multiplier(&self) -> f64;
}

/// Items and gold dropped by a defeated character.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Loot {
    pub items: Vec<Item>,
    pub gold: u32,
}

/// Result of using an inventory item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemEffect {
    /// Health actually restored
    Healed { amount: u32 },
    /// A pillar was activated; `total` is the new count
    PillarActivated { kind: PillarKind, total: u32 },
    /// The pillar of this kind was already active
    PillarAlreadyActive { kind: PillarKind },
    /// The item has no use
    NoEffect,
}

/// The player-controlled hero. One per session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hero {
    id: EntityId,
    pub hero_type: HeroType,
    pub name: String,
    vitals: Vitals,
    /// Items in acquisition order
    pub inventory: Vec<Item>,
    pillars: BTreeSet<PillarKind>,
    pub gold: u32,
}

impl Hero {
    /// Creates a hero at full health.
    ///
    /// A blank name is a wiring bug at this level and is rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{Character, Hero, HeroType, Position};
    ///
    /// let hero = Hero::new(HeroType::Warrior, "Brom", Position::origin()).unwrap();
    /// assert_eq!(hero.health(), 125);
    /// assert!(hero.is_alive());
    /// ```
    pub fn new(hero_type: HeroType, name: impl Into<String>, position: Position) -> DelveResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DelveError::InvalidArgument("hero name must not be empty".to_string()));
        }

        Ok(Self {
            id: new_entity_id(),
            hero_type,
            name,
            vitals: Vitals::new(hero_type.archetype().base_health, position),
            inventory: Vec::new(),
            pillars: BTreeSet::new(),
            gold: 0,
        })
    }

    /// Restores health up to the maximum. Returns the amount actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.vitals.health;
        self.vitals.health = before.saturating_add(amount).min(self.vitals.max_health);
        self.vitals.health - before
    }

    /// Appends items to the inventory, keeping acquisition order.
    pub fn add_items(&mut self, items: impl IntoIterator<Item = Item>) {
        self.inventory.extend(items);
    }

    /// Activates the pillar of `kind` and returns the new total, or `None` if
    /// that pillar was already active.
    pub fn activate_pillar(&mut self, kind: PillarKind) -> Option<u32> {
        if self.pillars.insert(kind) {
            Some(self.pillars_activated())
        } else {
            None
        }
    }

    /// Number of distinct pillars activated
    pub fn pillars_activated(&self) -> u32 {
        self.pillars.len() as u32
    }

    /// Whether `kind` has been activated.
    pub fn has_pillar(&self, kind: PillarKind) -> bool {
        self.pillars.contains(&kind)
    }

    /// Whether every pillar in the dungeon has been activated.
    pub fn has_all_pillars(&self) -> bool {
        self.pillars_activated() >= defaults::PILLAR_COUNT
    }

    /// Uses the item at `index`, removing it if it is consumable.
    pub fn use_item(&mut self, index: usize) -> DelveResult<ItemEffect> {
        let item = self.inventory.get(index).ok_or_else(|| {
            DelveError::InvalidArgument(format!(
                "inventory slot {} is empty ({} items)",
                index,
                self.inventory.len()
            ))
        })?;

        let effect = match item.kind.clone() {
            ItemKind::HealingPotion { amount } => ItemEffect::Healed {
                amount: self.heal(amount),
            },
            ItemKind::Pillar(kind) => match self.activate_pillar(kind) {
                Some(total) => ItemEffect::PillarActivated { kind, total },
                None => ItemEffect::PillarAlreadyActive { kind },
            },
            ItemKind::Trinket => ItemEffect::NoEffect,
        };

        if self.inventory[index].is_consumable() {
            self.inventory.remove(index);
        }
        Ok(effect)
    }
}

impl Character for Hero {
    fn id(&self) -> EntityId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    fn vitals_mut(&mut self) -> &mut Vitals {
        &mut self.vitals
    }
}

impl Attacker for Hero {
    fn attack(&self, _target: &dyn Character) -> u32 {
        self.hero_type.archetype().base_attack
    }

    fn special_attack(&self, _target: &dyn Character) -> u32 {
        self.hero_type.archetype().special_attack_damage
    }

    fn special_attack_name(&self) -> &'static str {
        self.hero_type.archetype().special_attack_name
    }

    fn crit_chance(&self) -> f64 {
        self.hero_type.archetype().crit_chance
    }

    fn crit_multiplier(&self) -> f64 {
        self.hero_type.archetype().crit_multiplier
    }
}

/// A monster met in the dungeon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Monster {
    id: EntityId,
    pub monster_type: MonsterType,
    pub is_elite: bool,
    vitals: Vitals,
    /// Items handed to the hero on defeat
    pub rewards: Vec<Item>,
    elite_multiplier: u32,
    rewards_claimed: bool,
}

impl Monster {
    /// Creates a monster with the stats and elite flag of its archetype.
    pub fn new(monster_type: MonsterType, position: Position) -> Self {
        let stats = monster_type.archetype();
        Self {
            id: new_entity_id(),
            monster_type,
            is_elite: stats.is_elite,
            vitals: Vitals::new(stats.base_health, position),
            rewards: Vec::new(),
            elite_multiplier: defaults::ELITE_MULTIPLIER,
            rewards_claimed: false,
        }
    }

    /// Attaches the items dropped on defeat.
    pub fn with_rewards(mut self, rewards: Vec<Item>) -> Self {
        self.rewards = rewards;
        self
    }

    /// Turns this instance into an elite regardless of its archetype.
    pub fn promoted(mut self) -> Self {
        self.is_elite = true;
        self
    }

    /// Overrides the elite/boss damage multiplier.
    pub fn set_elite_multiplier(&mut self, multiplier: u32) {
        self.elite_multiplier = multiplier.max(1);
    }

    /// Whether this monster is the dungeon's boss.
    pub fn is_boss(&self) -> bool {
        self.monster_type.archetype().is_boss
    }

    /// Gold granted on defeat
    pub fn gold_reward(&self) -> u32 {
        self.monster_type.archetype().gold_reward
    }

    fn scaled(&self, base: u32) -> u32 {
        if self.is_elite || self.is_boss() {
            base.saturating_mul(self.elite_multiplier)
        } else {
            base
        }
    }
}

impl Character for Monster {
    fn id(&self) -> EntityId {
        self.id
    }

    fn name(&self) -> &str {
        self.monster_type.archetype().display_name
    }

    fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    fn vitals_mut(&mut self) -> &mut Vitals {
        &mut self.vitals
    }

    fn claim_rewards(&mut self) -> Option<Loot> {
        if self.rewards_claimed || self.is_alive() {
            return None;
        }
        self.rewards_claimed = true;
        Some(Loot {
            items: std::mem::take(&mut self.rewards),
            gold: self.gold_reward(),
        })
    }
}

impl Attacker for Monster {
    fn attack(&self, _target: &dyn Character) -> u32 {
        self.scaled(self.monster_type.archetype().base_attack)
    }

    fn special_attack(&self, _target: &dyn Character) -> u32 {
        self.scaled(self.monster_type.archetype().special_attack_damage)
    }

    fn special_attack_name(&self) -> &'static str {
        self.monster_type.archetype().special_attack_name
    }

    fn crit_chance(&self) -> f64 {
        self.monster_type.archetype().crit_chance
    }

    fn crit_multiplier(&self) -> f64 {
        self.monster_type.archetype().crit_multiplier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn warrior() -> Hero {
        Hero::new(HeroType::Warrior, "Brom", Position::new(5, 5)).unwrap()
    }

    #[test]
    fn test_take_damage_clamps_at_zero() {
        let mut goblin = Monster::new(MonsterType::Goblin, Position::origin());
        goblin.take_damage(15);
        assert_eq!(goblin.health(), 25);
        goblin.take_damage(100);
        assert_eq!(goblin.health(), 0);
        assert!(!goblin.is_alive());
    }

    #[test]
    fn test_negative_damage_does_not_heal() {
        let mut hero = warrior();
        hero.take_damage(25);
        hero.take_damage(-50);
        assert_eq!(hero.health(), 100);
    }

    #[test]
    fn test_move_in_each_direction() {
        let mut hero = warrior();
        hero.move_in(Direction::North);
        assert_eq!(hero.position(), Position::new(5, 4));
        hero.move_in(Direction::East);
        assert_eq!(hero.position(), Position::new(6, 4));
        hero.move_in(Direction::South);
        hero.move_in(Direction::West);
        assert_eq!(hero.position(), Position::new(5, 5));
    }

    #[test]
    fn test_blank_hero_name_rejected() {
        let result = Hero::new(HeroType::Thief, "   ", Position::origin());
        assert!(matches!(result, Err(DelveError::InvalidArgument(_))));
    }

    #[test]
    fn test_hero_attack_uses_archetype() {
        let hero = warrior();
        let goblin = Monster::new(MonsterType::Goblin, Position::origin());
        assert_eq!(hero.attack(&goblin), 15);
        assert_eq!(hero.special_attack(&goblin), 35);
        assert_eq!(hero.special_attack_name(), "Crushing Blow");
    }

    #[test]
    fn test_elite_monster_doubles_base() {
        let hero = warrior();
        let orc = Monster::new(MonsterType::Orc, Position::origin());
        assert!(orc.is_elite);
        assert_eq!(orc.attack(&hero), 30);

        let goblin = Monster::new(MonsterType::Goblin, Position::origin());
        assert_eq!(goblin.attack(&hero), 5);
        assert_eq!(goblin.promoted().attack(&hero), 10);
    }

    #[test]
    fn test_boss_uses_elite_multiplier() {
        let hero = warrior();
        let mut dragon = Monster::new(MonsterType::Dragon, Position::origin());
        assert_eq!(dragon.attack(&hero), 50);
        dragon.set_elite_multiplier(3);
        assert_eq!(dragon.special_attack(&hero), 150);
    }

    #[test]
    fn test_rewards_claimed_once_after_defeat() {
        let mut goblin = Monster::new(MonsterType::Goblin, Position::origin())
            .with_rewards(vec![Item::healing_potion(20)]);
        assert!(goblin.claim_rewards().is_none(), "alive monsters drop nothing");

        goblin.take_damage(40);
        let loot = goblin.claim_rewards().unwrap();
        assert_eq!(loot.items.len(), 1);
        assert_eq!(loot.gold, 5);
        assert!(goblin.claim_rewards().is_none());
    }

    #[test]
    fn test_all_pillars() {
        let mut hero = warrior();
        let kinds = [
            PillarKind::Abstraction,
            PillarKind::Encapsulation,
            PillarKind::Inheritance,
            PillarKind::Polymorphism,
        ];
        for (count, kind) in kinds.into_iter().enumerate() {
            assert!(!hero.has_all_pillars());
            assert_eq!(hero.activate_pillar(kind), Some(count as u32 + 1));
        }
        assert!(hero.has_all_pillars());
    }

    #[test]
    fn test_duplicate_pillars_count_once() {
        let mut hero = warrior();
        hero.add_items((0..defaults::PILLAR_COUNT).map(|_| Item::pillar(PillarKind::Abstraction)));

        assert_eq!(
            hero.use_item(0).unwrap(),
            ItemEffect::PillarActivated {
                kind: PillarKind::Abstraction,
                total: 1
            }
        );
        while !hero.inventory.is_empty() {
            assert_eq!(
                hero.use_item(0).unwrap(),
                ItemEffect::PillarAlreadyActive {
                    kind: PillarKind::Abstraction
                }
            );
        }

        assert_eq!(hero.pillars_activated(), 1);
        assert!(hero.has_pillar(PillarKind::Abstraction));
        assert!(!hero.has_pillar(PillarKind::Polymorphism));
        assert!(!hero.has_all_pillars());
    }

    #[test]
    fn test_heal_capped_at_max() {
        let mut hero = warrior();
        hero.take_damage(10);
        assert_eq!(hero.heal(50), 10);
        assert_eq!(hero.health(), 125);
    }

    #[test]
    fn test_use_potion_and_pillar() {
        let mut hero = warrior();
        hero.take_damage(30);
        hero.add_items(vec![
            Item::healing_potion(20),
            Item::pillar(PillarKind::Encapsulation),
            Item::new("Bone Dice", "Loaded.", ItemKind::Trinket),
        ]);

        assert_eq!(hero.use_item(0).unwrap(), ItemEffect::Healed { amount: 20 });
        assert_eq!(hero.health(), 115);
        assert_eq!(
            hero.use_item(0).unwrap(),
            ItemEffect::PillarActivated {
                kind: PillarKind::Encapsulation,
                total: 1
            }
        );
        assert!(!hero.has_all_pillars());
        assert_eq!(hero.use_item(0).unwrap(), ItemEffect::NoEffect);
        assert_eq!(hero.inventory.len(), 1, "trinkets are kept");
        assert!(hero.use_item(3).is_err());
    }
}
