//! # Actions
//!
//! Raw key events coming from the host and the game actions they turn into.

use crate::game::Direction;
use serde::{Deserialize, Serialize};

/// Keys the dispatcher understands. Anything else arrives as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    Up,
    Down,
    Left,
    Right,
    W,
    A,
    S,
    D,
    E,
    I,
    R,
    Enter,
    Escape,
    Space,
    /// Host key code with no meaning to the core
    Other(u32),
}

impl KeyCode {
    /// The movement direction bound to this key, if any.
    ///
    /// Arrow keys and WASD both move.
    pub fn direction(self) -> Option<Direction> {
        match self {
            KeyCode::Up | KeyCode::W => Some(Direction::North),
            KeyCode::Down | KeyCode::S => Some(Direction::South),
            KeyCode::Left | KeyCode::A => Some(Direction::West),
            KeyCode::Right | KeyCode::D => Some(Direction::East),
            _ => None,
        }
    }
}

/// Whether a key went down or came up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyEventKind {
    Press,
    Release,
}

/// A single key event delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: KeyCode,
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// A key-press event.
    pub fn press(key: KeyCode) -> Self {
        Self {
            key,
            kind: KeyEventKind::Press,
        }
    }

    /// A key-release event.
    pub fn release(key: KeyCode) -> Self {
        Self {
            key,
            kind: KeyEventKind::Release,
        }
    }
}

/// A game action produced by the input dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameAction {
    /// Start walking in a direction (key held)
    MoveStart(Direction),
    /// Stop walking in a direction (key released)
    MoveStop(Direction),
    /// Cancel every held movement; safe to issue when nothing moves
    StopAllMovement,
    Interact,
    OpenInventory,
    Pause,
    BasicAttack,
    SpecialAttack,
    Flee,
    ScrollUp,
    ScrollDown,
    UseSelected,
    CloseInventory,
    OpenChest,
    CancelChest,
}

impl GameAction {
    /// Whether this is an exploration movement start or stop.
    pub fn is_movement(self) -> bool {
        matches!(self, GameAction::MoveStart(_) | GameAction::MoveStop(_))
    }
}
