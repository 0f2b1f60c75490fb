//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! Rendering and input live in collaborators that read a `Snapshot` and call into `Game`.

pub mod config;
pub mod controller;
pub mod direction;
pub mod session;
pub mod state;

// Re-export commonly used types
pub use config::{
    FOOD_SCORE, GameConfig, MAX_GRID_SIDE, SELF_COLLISION_EXEMPT_SEGMENTS, TICK_INTERVAL,
};
pub use controller::{GameController, TickResult};
pub use direction::Direction;
pub use session::{Game, Snapshot};
pub use state::{CollisionType, GameState, Phase, Position, Snake};
