use super::{
    config::{FOOD_SCORE, GameConfig, SELF_COLLISION_EXEMPT_SEGMENTS},
    direction::Direction,
    state::{CollisionType, GameState, Position, Snake},
};
use rand::{Rng, SeedableRng, rngs::StdRng};

/// What happened during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickResult {
    /// Whether the snake ate food this tick
    pub ate_food: bool,
    /// Collision that ended the game on this tick
    pub collision: Option<CollisionType>,
    /// Whether the game is over after this tick; the tick timer should stop
    pub terminated: bool,
}

/// Drives a `GameState`: spawning, steering and the per-tick update
pub struct GameController {
    config: GameConfig,
    rng: StdRng,
}

impl GameController {
    /// Create a controller whose food placement is seeded from the OS
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a controller with reproducible food placement
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Start the very first game of the process
    pub fn init_game(&mut self) -> GameState {
        self.new_game(0)
    }

    /// Start a game carrying over a previously reached high score
    pub fn new_game(&mut self, high_score: u32) -> GameState {
        let snake = self.spawn_snake();
        let food = self.locate_food();

        let mut state = GameState::new(
            snake,
            Direction::Right,
            food,
            self.config.grid_width,
            self.config.grid_height,
            self.config.cell_size,
        );
        state.high_score = high_score;

        log::info!(
            "New game on {}x{} board, high score {}",
            state.grid_width,
            state.grid_height,
            high_score
        );
        state
    }

    /// Reinitialise `state` for a new game, keeping its high score
    pub fn reset(&mut self, state: &mut GameState) {
        *state = self.new_game(state.high_score);
    }

    /// Pick a random cell for the food. The snake's body is not avoided.
    pub fn locate_food(&mut self) -> Position {
        let x = self.rng.gen_range(0..self.config.grid_width) as i32;
        let y = self.rng.gen_range(0..self.config.grid_height) as i32;
        let food = Position::new(x * self.config.cell_size, y * self.config.cell_size);
        log::debug!("Food placed at ({}, {})", food.x, food.y);
        food
    }

    /// Change heading unless the game is over or the turn is a reversal.
    /// Returns whether the heading was applied.
    pub fn request_direction(&self, state: &mut GameState, heading: Direction) -> bool {
        if !state.is_alive || state.heading.is_opposite(heading) {
            log::trace!("Rejected heading {:?} while moving {:?}", heading, state.heading);
            return false;
        }
        state.heading = heading;
        true
    }

    /// Advance the game by one tick: eat, then check collisions, then move
    pub fn advance(&mut self, state: &mut GameState) -> TickResult {
        if !state.is_alive {
            return TickResult {
                terminated: true,
                ..Default::default()
            };
        }

        let ate_food = self.check_food(state);

        if let Some(collision) = self.check_collision(state) {
            state.is_alive = false;
            if state.settle_high_score() {
                log::info!("New high score: {}", state.high_score);
            }
            log::info!(
                "Game over ({:?}), score {}, high score {}",
                collision,
                state.score,
                state.high_score
            );

            return TickResult {
                ate_food,
                collision: Some(collision),
                terminated: true,
            };
        }

        state.snake.shift(state.heading, state.cell_size);

        TickResult {
            ate_food,
            collision: None,
            terminated: false,
        }
    }

    fn spawn_snake(&self) -> Snake {
        let cell = self.config.cell_size;
        let head = Position::new(
            self.config.start_x as i32 * cell,
            self.config.start_y as i32 * cell,
        );
        Snake::new(
            head,
            Direction::Right,
            self.config.initial_snake_length,
            cell,
            self.config.capacity(),
        )
    }

    fn check_food(&mut self, state: &mut GameState) -> bool {
        if state.head() != state.food {
            return false;
        }

        if !state.snake.grow() {
            log::warn!("Snake reached capacity of {} segments", state.snake.capacity());
        }
        state.score += FOOD_SCORE;
        state.food = self.locate_food();
        log::debug!("Food eaten, score {}", state.score);
        true
    }

    fn check_collision(&self, state: &GameState) -> Option<CollisionType> {
        if state.snake.head_overlaps_body(SELF_COLLISION_EXEMPT_SEGMENTS) {
            return Some(CollisionType::SelfCollision);
        }

        if !state.is_in_bounds(state.head()) {
            return Some(CollisionType::Wall);
        }

        None
    }
}
