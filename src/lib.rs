//! Snake - a grid snake game
//!
//! This library provides:
//! - Core simulation (game module): state, per-tick update, steering, restart
//! - Key mapping (input module)
//! - TUI rendering (render module)
//! - The interactive terminal driver (modes module)

pub mod game;
pub mod input;
pub mod modes;
pub mod render;
