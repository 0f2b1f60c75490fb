use super::{
    config::GameConfig,
    controller::{GameController, TickResult},
    direction::Direction,
    state::{GameState, Phase, Position},
};

/// Read-only view of a game, taken between ticks for drawing
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Snake segments, head first
    pub snake: Vec<Position>,
    pub food: Position,
    pub heading: Direction,
    pub score: u32,
    pub high_score: u32,
    pub is_alive: bool,
    pub grid_width: usize,
    pub grid_height: usize,
    pub cell_size: i32,
}

impl Snapshot {
    pub fn head(&self) -> Position {
        self.snake[0]
    }

    pub fn phase(&self) -> Phase {
        if self.is_alive {
            Phase::Running
        } else {
            Phase::Over
        }
    }

    /// Grid cell (column, row) of a board position, if it lies on the board
    pub fn cell_of(&self, pos: Position) -> Option<(usize, usize)> {
        if pos.x < 0 || pos.y < 0 {
            return None;
        }
        let col = (pos.x / self.cell_size) as usize;
        let row = (pos.y / self.cell_size) as usize;
        (col < self.grid_width && row < self.grid_height).then_some((col, row))
    }
}

/// A running game session: the state plus the controller that drives it.
///
/// This is the surface the driver talks to. Callers must serialise
/// `tick`, `set_heading` and `reset` onto one task; `&mut self` enforces
/// it within safe code.
pub struct Game {
    controller: GameController,
    state: GameState,
}

impl Game {
    /// Start a session. `high_score` is the best score reached earlier in
    /// this process, 0 for the first game.
    pub fn new(config: GameConfig, high_score: u32) -> Self {
        Self::with_controller(GameController::new(config), high_score)
    }

    /// Start a session with reproducible food placement
    pub fn with_seed(config: GameConfig, seed: u64, high_score: u32) -> Self {
        Self::with_controller(GameController::with_seed(config, seed), high_score)
    }

    fn with_controller(mut controller: GameController, high_score: u32) -> Self {
        let state = controller.new_game(high_score);
        Self { controller, state }
    }

    /// Advance the simulation by one step
    pub fn tick(&mut self) -> TickResult {
        self.controller.advance(&mut self.state)
    }

    /// Steer the snake; reversals and steering after game over are ignored
    pub fn set_heading(&mut self, heading: Direction) -> bool {
        self.controller.request_direction(&mut self.state, heading)
    }

    /// Start a new game. Only honoured once the current game is over;
    /// returns true when the tick timer should be restarted.
    pub fn reset(&mut self) -> bool {
        if self.state.phase() != Phase::Over {
            return false;
        }
        self.controller.reset(&mut self.state);
        true
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn high_score(&self) -> u32 {
        self.state.high_score
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            snake: self.state.snake.segments().to_vec(),
            food: self.state.food,
            heading: self.state.heading,
            score: self.state.score,
            high_score: self.state.high_score,
            is_alive: self.state.is_alive,
            grid_width: self.state.grid_width,
            grid_height: self.state.grid_height,
            cell_size: self.state.cell_size,
        }
    }
}
