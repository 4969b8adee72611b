//! # Configuration
//!
//! Tunable gameplay parameters and their defaults.
//!
//! The defaults reproduce the stock game. A host can override them from a JSON
//! document, which is validated before any session sees it.

use crate::{DelveError, DelveResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default values for [`GameConfig`] and library-wide constants.
pub mod defaults {
    /// Window after leaving combat during which exploration movement is ignored
    pub const MOVEMENT_COOLDOWN_MS: u64 = 500;

    /// Probability that a flee attempt succeeds
    pub const FLEE_CHANCE: f64 = 0.5;

    /// Damage multiplier for elite and boss attackers
    pub const ELITE_MULTIPLIER: u32 = 2;

    /// Gold the hero starts a session with
    pub const STARTING_GOLD: u32 = 0;

    /// Pillars that exist in a dungeon
    pub const PILLAR_COUNT: u32 = 4;
}

/// Gameplay configuration for a session.
///
/// # Examples
///
/// ```
/// use delve::GameConfig;
///
/// let config = GameConfig::default();
/// assert_eq!(config.movement_cooldown_ms, 500);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Post-combat movement cooldown in milliseconds
    pub movement_cooldown_ms: u64,
    /// Probability (0.0 to 1.0) that fleeing succeeds
    pub flee_chance: f64,
    /// Multiplier applied to elite and boss base damage
    pub elite_multiplier: u32,
    /// Gold granted when a session starts
    pub starting_gold: u32,
}

impl GameConfig {
    /// Parses and validates a configuration from JSON.
    ///
    /// Missing fields fall back to their defaults.
    pub fn from_json(json: &str) -> DelveResult<Self> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a configuration file.
    pub fn load(path: impl AsRef<Path>) -> DelveResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Serializes the configuration to pretty-printed JSON.
    pub fn to_json(&self) -> DelveResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks every field against its legal range.
    pub fn validate(&self) -> DelveResult<()> {
        if !(0.0..=1.0).contains(&self.flee_chance) {
            return Err(DelveError::InvalidArgument(format!(
                "flee_chance must be within [0, 1], got {}",
                self.flee_chance
            )));
        }
        if self.elite_multiplier == 0 {
            return Err(DelveError::InvalidArgument(
                "elite_multiplier must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            movement_cooldown_ms: defaults::MOVEMENT_COOLDOWN_MS,
            flee_chance: defaults::FLEE_CHANCE,
            elite_multiplier: defaults::ELITE_MULTIPLIER,
            starting_gold: defaults::STARTING_GOLD,
        }
    }
}
