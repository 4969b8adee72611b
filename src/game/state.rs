//! # Game State Module
//!
//! The finite state machine that holds the single live game mode.
//!
//! There is no state stack: exactly one [`GameState`] is current at any time.
//! The controller performs no legality checks; which transitions can happen is
//! decided by which actions the input dispatcher offers in each state.
//!
//! Transitions made through [`StateController::change_state_at`] carry the
//! time they happened. The controller keeps the time combat last ended so the
//! input dispatcher can measure its cooldown from the transition itself.

use log::info;
use serde::{Deserialize, Serialize};

/// The mode the game is in. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameState {
    #[default]
    Exploring,
    Combat,
    Inventory,
    Chest,
    Paused,
    GameOver,
    Victory,
}

impl GameState {
    /// Whether this state ends the game as far as the core is concerned.
    pub fn is_terminal(self) -> bool {
        matches!(self, GameState::GameOver | GameState::Victory)
    }
}

/// An actual change of state, as observed by collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateTransition {
    pub from: GameState,
    pub to: GameState,
}

/// Holder of the authoritative [`GameState`].
///
/// # Examples
///
/// ```
/// use delve::{GameState, StateController};
///
/// let mut controller = StateController::new();
/// assert!(controller.is_in_state(GameState::Exploring));
///
/// assert!(controller.change_state(GameState::Combat).is_some());
/// assert!(controller.change_state(GameState::Combat).is_none());
/// assert_eq!(controller.transition_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateController {
    current: GameState,
    transitions: u64,
    /// When the latest combat -> exploring transition happened, if it was timed
    #[serde(default)]
    combat_ended_at: Option<u64>,
}

impl StateController {
    /// Creates a controller in the initial `Exploring` state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Switches to `target` unconditionally.
    ///
    /// A self-transition is a no-op and returns `None`; otherwise the
    /// transition is returned so the caller can forward it.
    pub fn change_state(&mut self, target: GameState) -> Option<StateTransition> {
        self.switch(target, None)
    }

    /// Switches to `target`, recording `now_ms` as the time of the transition.
    ///
    /// `now_ms` must come from the same clock the input dispatcher reads.
    pub fn change_state_at(&mut self, target: GameState, now_ms: u64) -> Option<StateTransition> {
        self.switch(target, Some(now_ms))
    }

    /// When combat last ended, if that transition was timed.
    pub fn combat_ended_at(&self) -> Option<u64> {
        self.combat_ended_at
    }

    fn switch(&mut self, target: GameState, now_ms: Option<u64>) -> Option<StateTransition> {
        if target == self.current {
            return None;
        }

        let transition = StateTransition {
            from: self.current,
            to: target,
        };
        self.current = target;
        self.transitions += 1;
        if transition.from == GameState::Combat && transition.to == GameState::Exploring {
            // An untimed exit clears any stale stamp from an earlier fight.
            self.combat_ended_at = now_ms;
        }
        info!("Game state {:?} -> {:?}", transition.from, transition.to);
        Some(transition)
    }

    /// The current state
    pub fn current_state(&self) -> GameState {
        self.current
    }

    /// Whether the current state is `state`.
    pub fn is_in_state(&self, state: GameState) -> bool {
        self.current == state
    }

    /// Number of actual transitions since creation
    pub fn transition_count(&self) -> u64 {
        self.transitions
    }
}
