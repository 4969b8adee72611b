//! # Combat Module
//!
//! Resolution of a single attack between two characters.
//!
//! The attacker supplies its deterministic base damage (elite and boss scaling
//! already applied). The engine rolls for a critical hit, applies the result to
//! the defender and reports what happened. Granting rewards to the hero is left
//! to the caller; the engine only hands the payload over.

use crate::game::{Attacker, Character, EntityId, Item};
use crate::{DelveError, DelveResult};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Which attack the attacker performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackKind {
    Basic,
    Special,
}

/// Payload emitted once when a monster is defeated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefeatReward {
    pub monster_id: EntityId,
    pub items: Vec<Item>,
    pub gold: u32,
}

/// Everything the presentation layer needs to show an attack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatOutcome {
    pub attacker: EntityId,
    pub defender: EntityId,
    pub kind: AttackKind,
    /// Damage actually dealt, always non-negative
    pub damage: u32,
    pub critical: bool,
    /// Whether this attack took the defender from alive to dead
    pub defeated: bool,
    /// Defender health after the attack
    pub defender_health: u32,
    pub reward: Option<DefeatReward>,
}

/// Rolls crits and applies attacks.
///
/// The engine owns its random source so tests can inject a seeded or mock RNG.
///
/// # Examples
///
/// ```
/// use delve::{AttackKind, Character, CombatEngine, Hero, HeroType, Monster, MonsterType, Position};
///
/// let mut engine = CombatEngine::from_seed(7);
/// let hero = Hero::new(HeroType::Warrior, "Brom", Position::origin()).unwrap();
/// let mut goblin = Monster::new(MonsterType::Goblin, Position::origin());
///
/// let outcome = engine.resolve(&hero, &mut goblin, AttackKind::Basic).unwrap();
/// assert!(outcome.damage == 15 || outcome.damage == 30);
/// assert_eq!(goblin.health(), 40 - outcome.damage);
/// ```
#[derive(Debug, Clone)]
pub struct CombatEngine<R: Rng = StdRng> {
    rng: R,
}

impl CombatEngine<StdRng> {
    /// Creates an engine with a reproducible random source.
    pub fn from_seed(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Creates an engine seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> CombatEngine<R> {
    /// Creates an engine drawing from `rng`.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Rolls once for a critical hit and scales `base` accordingly.
    ///
    /// Returns the damage and whether it was critical.
    pub fn roll_damage(&mut self, base: u32, crit_chance: f64, crit_multiplier: f64) -> (u32, bool) {
        let roll: f64 = self.rng.gen();
        let critical = roll < crit_chance;
        let damage = if critical {
            (base as f64 * crit_multiplier).round() as u32
        } else {
            base
        };
        debug!(
            "Attack roll {:.4} against crit chance {:.2}: {} damage{}",
            roll,
            crit_chance,
            damage,
            if critical { " (critical)" } else { "" }
        );
        (damage, critical)
    }

    /// Resolves one attack of `attacker` against `defender`.
    ///
    /// Attacking a defender that is already down is a caller bug and fails with
    /// [`DelveError::InvalidTarget`].
    pub fn resolve(
        &mut self,
        attacker: &dyn Attacker,
        defender: &mut dyn Character,
        kind: AttackKind,
    ) -> DelveResult<CombatOutcome> {
        if !defender.is_alive() {
            warn!("{} attacked {} who is already down", attacker.name(), defender.name());
            return Err(DelveError::InvalidTarget(format!(
                "{} has no health left",
                defender.name()
            )));
        }

        let base = match kind {
            AttackKind::Basic => attacker.attack(&*defender),
            AttackKind::Special => attacker.special_attack(&*defender),
        };
        let (damage, critical) =
            self.roll_damage(base, attacker.crit_chance(), attacker.crit_multiplier());

        defender.take_damage(i64::from(damage));
        let defeated = !defender.is_alive();

        let reward = if defeated {
            info!("{} defeated {}", attacker.name(), defender.name());
            defender.claim_rewards().map(|loot| DefeatReward {
                monster_id: defender.id(),
                items: loot.items,
                gold: loot.gold,
            })
        } else {
            None
        };

        Ok(CombatOutcome {
            attacker: attacker.id(),
            defender: defender.id(),
            kind,
            damage,
            critical,
            defeated,
            defender_health: defender.health(),
            reward,
        })
    }

    /// Rolls a flee attempt that succeeds with probability `chance`.
    pub fn attempt_flee(&mut self, chance: f64) -> bool {
        let roll: f64 = self.rng.gen();
        let escaped = roll < chance;
        debug!("Flee roll {:.4} against {:.2}: {}", roll, chance, escaped);
        escaped
    }
}
