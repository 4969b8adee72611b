//! # Input Module
//!
//! Turns raw key events into game actions, gated by the current game state.
//!
//! Beyond the per-state key table the dispatcher enforces two temporal rules:
//! leaving exploration cancels all held movement, and for a short window after
//! combat ends exploration movement is ignored.

pub mod actions;
pub mod clock;

pub use actions::*;
pub use clock::*;

use crate::config::{defaults, GameConfig};
use crate::game::{GameState, StateController};
use log::debug;

/// What the dispatcher did with one key event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Dispatch {
    /// Actions to execute, in order
    pub actions: Vec<GameAction>,
    /// Whether a mapped action was dropped by the post-combat cooldown
    pub suppressed: bool,
}

impl Dispatch {
    /// Every event handed to the dispatcher stops propagating, matched or not.
    pub fn consumed(&self) -> bool {
        true
    }

    /// Whether nothing is to be executed.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Input dispatcher for processing player key events.
///
/// Reads the authoritative state from the [`StateController`] on every event
/// and caches only the previously observed state, to detect transition edges.
///
/// # Examples
///
/// ```
/// use delve::{Direction, GameAction, InputDispatcher, KeyCode, KeyEvent, ManualClock, StateController};
///
/// let clock = ManualClock::new();
/// let mut dispatcher = InputDispatcher::new(&clock);
/// let controller = StateController::new();
///
/// let dispatch = dispatcher.dispatch(KeyEvent::press(KeyCode::W), &controller);
/// assert_eq!(dispatch.actions, vec![GameAction::MoveStart(Direction::North)]);
/// assert!(dispatch.consumed());
/// ```
#[derive(Debug)]
pub struct InputDispatcher<C: Clock = MonotonicClock> {
    clock: C,
    cooldown_ms: u64,
    previous_state: GameState,
    last_combat_end: Option<u64>,
}

impl<C: Clock> InputDispatcher<C> {
    /// Creates a dispatcher with the default 500 ms post-combat cooldown.
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            cooldown_ms: defaults::MOVEMENT_COOLDOWN_MS,
            previous_state: GameState::default(),
            last_combat_end: None,
        }
    }

    /// Creates a dispatcher using the cooldown from `config`.
    pub fn from_config(clock: C, config: &GameConfig) -> Self {
        Self::new(clock).with_cooldown(config.movement_cooldown_ms)
    }

    /// Replaces the post-combat cooldown window.
    pub fn with_cooldown(mut self, cooldown_ms: u64) -> Self {
        self.cooldown_ms = cooldown_ms;
        self
    }

    /// The state seen on the previous observation
    pub fn previous_state(&self) -> GameState {
        self.previous_state
    }

    /// Whether exploration movement is ignored, as of the last observation.
    pub fn in_cooldown(&self) -> bool {
        self.cooldown_active(self.last_combat_end, self.clock.now_millis())
    }

    /// Compares the authoritative state with the previous observation.
    ///
    /// Returns [`GameAction::StopAllMovement`] when exploration was just left and
    /// starts the cooldown when combat just ended. The cooldown runs from the
    /// time the controller recorded for the transition; if the transition was
    /// untimed it runs from this observation instead.
    /// [`dispatch`](Self::dispatch) calls this on every event.
    pub fn observe(&mut self, state: &StateController) -> Option<GameAction> {
        let current = state.current_state();
        let previous = self.previous_state;
        if current == previous {
            return None;
        }
        self.previous_state = current;

        if previous == GameState::Combat && current == GameState::Exploring {
            let ended = state
                .combat_ended_at()
                .unwrap_or_else(|| self.clock.now_millis());
            debug!("Combat ended at {} ms, movement cooldown started", ended);
            self.last_combat_end = Some(ended);
        }

        if previous == GameState::Exploring {
            debug!("Left exploration for {:?}, stopping all movement", current);
            Some(GameAction::StopAllMovement)
        } else {
            None
        }
    }

    /// Handles one key event.
    ///
    /// The cooldown is measured from the controller's recorded combat end when
    /// there is one, so a host that drives the controller through
    /// [`StateController::change_state_at`] never needs to call
    /// [`observe`](Self::observe) between events.
    pub fn dispatch(&mut self, event: KeyEvent, state: &StateController) -> Dispatch {
        let mut dispatch = Dispatch::default();
        if let Some(stop) = self.observe(state) {
            dispatch.actions.push(stop);
        }

        let current = state.current_state();
        let Some(action) = map_key(current, event) else {
            return dispatch;
        };

        let ended = self.last_combat_end.max(state.combat_ended_at());
        if current == GameState::Exploring
            && action.is_movement()
            && self.cooldown_active(ended, self.clock.now_millis())
        {
            debug!("Suppressed {:?} during post-combat cooldown", action);
            dispatch.suppressed = true;
            return dispatch;
        }

        dispatch.actions.push(action);
        dispatch
    }

    fn cooldown_active(&self, ended: Option<u64>, now: u64) -> bool {
        ended.is_some_and(|ended| now.saturating_sub(ended) <= self.cooldown_ms)
    }
}

/// The per-state key table.
///
/// Paused and terminal states map nothing; their input belongs to the
/// presentation layer.
pub fn map_key(state: GameState, event: KeyEvent) -> Option<GameAction> {
    use GameAction::*;

    match (state, event.kind) {
        (GameState::Exploring, KeyEventKind::Press) => {
            if let Some(direction) = event.key.direction() {
                return Some(MoveStart(direction));
            }
            match event.key {
                KeyCode::E | KeyCode::Enter => Some(Interact),
                KeyCode::I => Some(OpenInventory),
                KeyCode::Escape => Some(Pause),
                _ => None,
            }
        }
        (GameState::Exploring, KeyEventKind::Release) => event.key.direction().map(MoveStop),
        (GameState::Combat, KeyEventKind::Press) => match event.key {
            KeyCode::A => Some(BasicAttack),
            KeyCode::S => Some(SpecialAttack),
            KeyCode::R => Some(Flee),
            KeyCode::I => Some(OpenInventory),
            KeyCode::Escape => Some(Pause),
            _ => None,
        },
        (GameState::Inventory, KeyEventKind::Press) => match event.key {
            KeyCode::Up | KeyCode::W => Some(ScrollUp),
            KeyCode::Down | KeyCode::S => Some(ScrollDown),
            KeyCode::E | KeyCode::Enter => Some(UseSelected),
            KeyCode::I | KeyCode::Escape => Some(CloseInventory),
            _ => None,
        },
        (GameState::Chest, KeyEventKind::Press) => match event.key {
            KeyCode::E | KeyCode::Enter => Some(OpenChest),
            KeyCode::Escape => Some(CancelChest),
            _ => None,
        },
        _ => None,
    }
}
