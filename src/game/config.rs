use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Fixed cadence at which the driver advances the simulation
pub const TICK_INTERVAL: Duration = Duration::from_millis(140);

/// Points awarded for each piece of food eaten
pub const FOOD_SCORE: u32 = 10;

/// Number of segments right behind the head that never count as a
/// self-collision. Only segments at an index greater than this are checked.
pub const SELF_COLLISION_EXEMPT_SEGMENTS: usize = 4;

/// Largest accepted grid side, in cells. Keeps the snake's reserved
/// storage bounded.
pub const MAX_GRID_SIDE: usize = 1000;

/// Configuration for the game board and the initial snake
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the board in cells
    pub grid_width: usize,
    /// Height of the board in cells
    pub grid_height: usize,
    /// Side of one cell in board units
    pub cell_size: i32,
    /// Number of segments the snake spawns with
    pub initial_snake_length: usize,
    /// Head start column, in cells
    pub start_x: usize,
    /// Head start row, in cells
    pub start_y: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 30,
            grid_height: 30,
            cell_size: 10,
            initial_snake_length: 3,
            start_x: 5,
            start_y: 5,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Parse a JSON configuration; absent fields fall back to the defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("Invalid game configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("Failed to load {}", path.display()))
    }

    /// Maximum number of segments the snake can hold
    pub fn capacity(&self) -> usize {
        self.grid_width * self.grid_height
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.grid_width > 0 && self.grid_height > 0,
            "grid must be at least 1x1, got {}x{}",
            self.grid_width,
            self.grid_height
        );
        ensure!(
            self.grid_width <= MAX_GRID_SIDE && self.grid_height <= MAX_GRID_SIDE,
            "grid of {}x{} exceeds the {} cell limit per side",
            self.grid_width,
            self.grid_height,
            MAX_GRID_SIDE
        );
        ensure!(self.cell_size > 0, "cell size must be positive");
        // One extra cell: the head may step just past the edge before the
        // collision is detected.
        ensure!(
            board_extent(self.grid_width, self.cell_size).is_some()
                && board_extent(self.grid_height, self.cell_size).is_some(),
            "cell size {} is too large for a {}x{} grid",
            self.cell_size,
            self.grid_width,
            self.grid_height
        );
        ensure!(
            self.initial_snake_length >= 3,
            "initial snake length must be at least 3, got {}",
            self.initial_snake_length
        );
        ensure!(
            self.start_x < self.grid_width && self.start_y < self.grid_height,
            "start cell ({}, {}) is outside the grid",
            self.start_x,
            self.start_y
        );
        // The body trails to the left of the head.
        ensure!(
            self.start_x + 1 >= self.initial_snake_length,
            "snake of length {} starting at column {} would not fit on the board",
            self.initial_snake_length,
            self.start_x
        );
        Ok(())
    }
}

/// Extent in board units of `cells` cells plus one, if it fits in `i32`
fn board_extent(cells: usize, cell_size: i32) -> Option<i32> {
    i32::try_from(cells)
        .ok()?
        .checked_add(1)?
        .checked_mul(cell_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.grid_width, 30);
        assert_eq!(config.grid_height, 30);
        assert_eq!(config.cell_size, 10);
        assert_eq!(config.initial_snake_length, 3);
        assert_eq!(config.capacity(), 900);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new(15, 12);
        assert_eq!(config.grid_width, 15);
        assert_eq!(config.grid_height, 12);
        assert_eq!(config.cell_size, 10);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = GameConfig::from_json(r#"{ "grid_width": 40, "cell_size": 5 }"#).unwrap();
        assert_eq!(config.grid_width, 40);
        assert_eq!(config.grid_height, 30);
        assert_eq!(config.cell_size, 5);
        assert_eq!(config.initial_snake_length, 3);
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(GameConfig::from_json("{ grid_width: ").is_err());
    }

    #[test]
    fn test_validation_failures() {
        assert!(GameConfig::new(0, 10).validate().is_err());

        let mut config = GameConfig::default();
        config.cell_size = 0;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.initial_snake_length = 2;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.start_x = 1;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.start_y = 30;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_oversized_boards_rejected() {
        let mut config = GameConfig::default();
        config.cell_size = 100_000_000;
        assert!(config.validate().is_err());

        assert!(GameConfig::new(1 << 20, 1 << 20).validate().is_err());
        assert!(GameConfig::new(MAX_GRID_SIDE + 1, 30).validate().is_err());

        let mut config = GameConfig::new(MAX_GRID_SIDE, MAX_GRID_SIDE);
        config.cell_size = 1000;
        assert!(config.validate().is_ok());
        assert_eq!(config.capacity(), 1_000_000);
    }

    #[test]
    fn test_oversized_cell_from_json_rejected() {
        assert!(GameConfig::from_json(r#"{ "cell_size": 2000000000 }"#).is_err());
    }

    #[test]
    fn test_missing_file_is_error() {
        let err = GameConfig::load(Path::new("/nonexistent/snake.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
