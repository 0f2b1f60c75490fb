use super::direction::Direction;

/// A position on the board, in board units (multiples of the cell size)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position one cell of `cell_size` units in a direction
    pub fn moved_in_direction(&self, direction: Direction, cell_size: i32) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx * cell_size, dy * cell_size)
    }
}

/// The snake's body, head first and tail last.
///
/// Storage is reserved up front for `capacity` segments so the per-tick
/// shift never reallocates.
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    body: Vec<Position>,
    capacity: usize,
}

impl Snake {
    /// Create a snake with `length` segments trailing behind `head`, opposite
    /// to `direction`
    pub fn new(
        head: Position,
        direction: Direction,
        length: usize,
        cell_size: i32,
        capacity: usize,
    ) -> Self {
        let mut body = Vec::with_capacity(capacity.max(length));
        body.push(head);

        let back = direction.opposite();
        for i in 1..length {
            let prev = body[i - 1];
            body.push(prev.moved_in_direction(back, cell_size));
        }

        Self { body, capacity }
    }

    /// Build a snake from explicit segments, head first.
    ///
    /// # Panics
    ///
    /// Panics if `segments` is empty.
    pub fn from_segments(segments: Vec<Position>, capacity: usize) -> Self {
        assert!(!segments.is_empty(), "a snake needs at least one segment");
        let mut body = Vec::with_capacity(capacity.max(segments.len()));
        body.extend(segments);
        Self { body, capacity }
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    pub fn segments(&self) -> &[Position] {
        &self.body
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Add one live segment at the tail, ahead of the next shift.
    ///
    /// The new slot starts as a copy of the current tail; the following
    /// `shift` keeps it there while every other segment moves up, so the
    /// snake ends the tick one segment longer with its tail where it was.
    /// Returns false when the snake is already at capacity.
    pub fn grow(&mut self) -> bool {
        if self.body.len() >= self.capacity {
            return false;
        }
        let tail = self.tail();
        self.body.push(tail);
        true
    }

    /// Move every segment onto its predecessor, then step the head one cell
    pub fn shift(&mut self, direction: Direction, cell_size: i32) {
        let len = self.body.len();
        self.body.copy_within(0..len - 1, 1);
        self.body[0] = self.body[0].moved_in_direction(direction, cell_size);
    }

    /// True if the head overlaps any segment past the first `exempt`
    /// trailing segments
    pub fn head_overlaps_body(&self, exempt: usize) -> bool {
        let head = self.head();
        self.body.iter().skip(exempt + 1).any(|&segment| segment == head)
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }
}

/// Type of collision that ended a game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Head left the board
    Wall,
    /// Head ran into its own body
    SelfCollision,
}

/// Lifecycle of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Running,
    Over,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub heading: Direction,
    pub food: Position,
    pub grid_width: usize,
    pub grid_height: usize,
    pub cell_size: i32,
    pub score: u32,
    /// Best score seen in this process; carried over by resets
    pub high_score: u32,
    pub is_alive: bool,
}

impl GameState {
    pub fn new(
        snake: Snake,
        heading: Direction,
        food: Position,
        grid_width: usize,
        grid_height: usize,
        cell_size: i32,
    ) -> Self {
        Self {
            snake,
            heading,
            food,
            grid_width,
            grid_height,
            cell_size,
            score: 0,
            high_score: 0,
            is_alive: true,
        }
    }

    pub fn head(&self) -> Position {
        self.snake.head()
    }

    pub fn phase(&self) -> Phase {
        if self.is_alive {
            Phase::Running
        } else {
            Phase::Over
        }
    }

    /// Board width in board units
    pub fn board_width(&self) -> i32 {
        self.grid_width as i32 * self.cell_size
    }

    /// Board height in board units
    pub fn board_height(&self) -> i32 {
        self.grid_height as i32 * self.cell_size
    }

    /// Check if a position is within the board
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.board_width() && pos.y >= 0 && pos.y < self.board_height()
    }

    /// Check if a position is occupied by the snake
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.contains(pos)
    }

    /// Record the current score as the high score if it beats it.
    /// Returns true when the high score changed.
    pub fn settle_high_score(&mut self) -> bool {
        if self.score > self.high_score {
            self.high_score = self.score;
            true
        } else {
            false
        }
    }
}
