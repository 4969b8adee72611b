//! # Delve
//!
//! Runtime core of a turn-based dungeon crawler.
//!
//! ## Architecture Overview
//!
//! The core owns game rules and nothing else. Rendering, menus, persistence and
//! dungeon generation are collaborators that consume the data emitted here.
//!
//! - **Stat Tables**: immutable hero and monster archetypes
//! - **Entity Model**: the `Character` and `Attacker` traits with `Hero` and `Monster`
//! - **Combat Engine**: crit rolls, special attacks and elite scaling
//! - **State Controller**: the single live `GameState`
//! - **Input Dispatcher**: key events to `GameAction`s, gated by state and cooldown
//! - **Session**: the explicitly owned context that ties all of the above together
//!
//! Everything runs on one logical event thread. Nothing blocks and nothing sleeps;
//! time-based rules compare stored timestamps against an injected [`Clock`].

pub mod combat;
pub mod config;
pub mod game;
pub mod input;

pub use combat::*;
pub use config::*;
pub use game::*;
pub use input::*;

/// Core error type for the Delve runtime.
#[derive(thiserror::Error, Debug)]
pub enum DelveError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// A collaborator or value handed to a constructor is invalid
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The requested transition or action is not available in the current state
    #[error("Invalid transition from {from:?} to {to:?}")]
    InvalidTransition { from: game::GameState, to: game::GameState },

    /// An attack was issued against a target that cannot receive it
    #[error("Invalid target: {0}")]
    InvalidTarget(String),
}

/// Result type used throughout the Delve codebase.
pub type DelveResult<T> = Result<T, DelveError>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
