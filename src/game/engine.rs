use log::{debug, info, warn};
use rand::Rng;
use serde::Serialize;
use tokio::sync::watch;

use super::{
    action::{Action, Direction},
    clock::GameClock,
    collision::{Collision, CollisionDetector},
    config::{ConfigError, Difficulty, GameConfig},
    input::InputQueue,
    score::{ScoreKeeper, ScoreStore, StoreError},
    state::{Board, Cell, Snake},
};

/// Lifecycle phase of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameState {
    /// Fresh board, waiting for the first tick or an explicit start
    Ready,
    Running,
    Paused,
    /// The last move hit a wall or the snake; only `reset` leaves this state
    GameOver,
}

/// Read-only copy of everything a renderer needs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub snake: Vec<Cell>,
    pub food: Cell,
    pub direction: Direction,
    pub score: u32,
    pub high_score: u32,
    pub state: GameState,
    pub difficulty: Difficulty,
    pub grid_width: usize,
    pub grid_height: usize,
    pub steps: u32,
    /// The finished game beat the previous high score
    pub new_high_score: bool,
}

/// What a single tick did
#[derive(Debug)]
pub enum TickOutcome {
    /// The snake moved onto an empty cell
    Moved,
    /// The snake ate and grew; food has been respawned
    Ate,
    /// The move was fatal and was not committed
    GameOver {
        collision: Collision,
        new_high_score: bool,
        /// Set when the new high score could not be written
        persist_error: Option<StoreError>,
    },
}

/// Top-level state machine driving one game at a time
pub struct GameController<S, R = rand::rngs::ThreadRng> {
    config: GameConfig,
    rng: R,
    board: Board,
    input: InputQueue,
    clock: GameClock,
    scores: ScoreKeeper<S>,
    difficulty: Difficulty,
    state: GameState,
    steps: u32,
    new_high_score: bool,
    publisher: watch::Sender<Snapshot>,
}

impl<S: ScoreStore> GameController<S, rand::rngs::ThreadRng> {
    /// Create a controller with thread-local randomness
    pub fn new(config: GameConfig, store: S) -> Result<Self, ConfigError> {
        Self::with_rng(config, store, rand::thread_rng())
    }
}

impl<S: ScoreStore, R: Rng> GameController<S, R> {
    /// Create a controller with a caller-supplied RNG (seed it for reproducible games)
    pub fn with_rng(config: GameConfig, store: S, mut rng: R) -> Result<Self, ConfigError> {
        config.validate()?;

        let board = Self::fresh_board(&config, &mut rng);
        let scores = ScoreKeeper::new(store);
        let difficulty = config.difficulty;
        let input = InputQueue::new(config.initial_direction);

        let (publisher, _) = watch::channel(Self::placeholder_snapshot());
        let controller = Self {
            config,
            rng,
            board,
            input,
            clock: GameClock::new(),
            scores,
            difficulty,
            state: GameState::Ready,
            steps: 0,
            new_high_score: false,
            publisher,
        };
        controller.publish();
        Ok(controller)
    }

    fn placeholder_snapshot() -> Snapshot {
        Snapshot {
            snake: Vec::new(),
            food: Cell::new(0, 0),
            direction: Direction::Right,
            score: 0,
            high_score: 0,
            state: GameState::Ready,
            difficulty: Difficulty::default(),
            grid_width: 0,
            grid_height: 0,
            steps: 0,
            new_high_score: false,
        }
    }

    fn fresh_board(config: &GameConfig, rng: &mut R) -> Board {
        let head = Cell::new(
            (config.grid_height / 2) as i32,
            (config.grid_width / 2) as i32,
        );
        let snake = Snake::new(head, config.initial_direction, config.initial_snake_length);
        let (rows, cols) = config.food_interior();
        let food = Board::random_free_cell(&snake, rows, cols, rng);
        Board::new(config.grid_width, config.grid_height, snake, food)
    }

    /// Feed one frame timestamp (milliseconds, monotonic).
    ///
    /// Runs at most one simulation step. Paused and finished games keep
    /// accepting frames without ticking.
    pub fn advance(&mut self, timestamp_ms: u64) -> Option<TickOutcome> {
        let enabled = self.accepts_ticks();
        if self.clock.advance(timestamp_ms, self.difficulty.tick_interval(), enabled) {
            self.tick()
        } else {
            None
        }
    }

    fn accepts_ticks(&self) -> bool {
        matches!(self.state, GameState::Ready | GameState::Running)
    }

    /// Run one simulation step now, if the game is Ready or Running
    pub fn tick(&mut self) -> Option<TickOutcome> {
        if !self.accepts_ticks() {
            return None;
        }
        if self.state == GameState::Ready {
            self.state = GameState::Running;
        }

        let direction = self.input.consume_pending();
        let candidate = self.board.snake.head().moved_in_direction(direction);

        let outcome = match CollisionDetector::classify(&self.board, candidate) {
            collision @ (Collision::Wall | Collision::SelfHit) => self.finish(collision),
            Collision::Food => {
                self.board.snake.advance(candidate, true);
                self.scores.on_food_consumed();
                let (rows, cols) = self.config.food_interior();
                self.board.respawn_food(rows, cols, &mut self.rng);
                self.steps += 1;
                TickOutcome::Ate
            }
            Collision::Free => {
                self.board.snake.advance(candidate, false);
                self.steps += 1;
                TickOutcome::Moved
            }
        };

        self.publish();
        Some(outcome)
    }

    fn finish(&mut self, collision: Collision) -> TickOutcome {
        // The high score is persisted before GameOver becomes visible.
        let (new_high_score, persist_error) = match self.scores.on_game_over() {
            Ok(new_high_score) => (new_high_score, None),
            Err(e) => {
                warn!("failed to persist high score: {e}");
                (true, Some(e))
            }
        };
        self.state = GameState::GameOver;
        self.new_high_score = new_high_score;
        info!(
            "game over ({:?}) with score {} after {} steps",
            collision,
            self.scores.score(),
            self.steps
        );

        TickOutcome::GameOver {
            collision,
            new_high_score,
            persist_error,
        }
    }

    /// Explicit Ready -> Running without moving the snake
    pub fn start(&mut self) {
        if self.state == GameState::Ready {
            self.state = GameState::Running;
            self.publish();
        }
    }

    /// Stage a direction change for the next tick; reversals are dropped
    pub fn request_direction(&mut self, direction: Direction) -> bool {
        self.input.request_direction(direction, self.board.snake.len())
    }

    /// Running <-> Paused; a no-op in Ready and GameOver
    pub fn toggle_pause(&mut self) {
        match self.state {
            GameState::Running => self.set_paused(true),
            GameState::Paused => self.set_paused(false),
            _ => debug!("pause toggle ignored in {:?}", self.state),
        }
    }

    /// Pause or resume; asking for the current state does nothing
    pub fn set_paused(&mut self, paused: bool) {
        let next = match (self.state, paused) {
            (GameState::Running, true) => GameState::Paused,
            (GameState::Paused, false) => GameState::Running,
            _ => return,
        };
        self.state = next;
        self.publish();
    }

    /// Whether play has progressed far enough to freeze the difficulty
    pub fn difficulty_locked(&self) -> bool {
        self.scores.score() > 0 || (self.state == GameState::Running && self.steps > 0)
    }

    /// Change the tier; ignored once the game is under way. Returns whether it applied.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> bool {
        if self.difficulty_locked() {
            debug!("difficulty change to {difficulty} ignored mid-game");
            return false;
        }
        if self.difficulty != difficulty {
            info!("difficulty {} -> {}", self.difficulty, difficulty);
            self.difficulty = difficulty;
            self.publish();
        }
        true
    }

    /// Discard the current game and return to Ready
    pub fn reset(&mut self) {
        self.board = Self::fresh_board(&self.config, &mut self.rng);
        self.input.reset(self.config.initial_direction);
        self.scores.reset();
        self.clock.reset();
        self.steps = 0;
        self.new_high_score = false;
        self.state = GameState::Ready;
        info!("new game on {}x{}", self.config.grid_width, self.config.grid_height);
        self.publish();
    }

    /// Dispatch a collaborator intent
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Move(direction) => {
                self.request_direction(direction);
            }
            Action::TogglePause => self.toggle_pause(),
            Action::Restart => self.reset(),
            Action::SetDifficulty(difficulty) => {
                self.set_difficulty(difficulty);
            }
            Action::CycleDifficulty => {
                self.set_difficulty(self.difficulty.next());
            }
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            snake: self.board.snake.cells().collect(),
            food: self.board.food,
            direction: self.input.active(),
            score: self.scores.score(),
            high_score: self.scores.high_score(),
            state: self.state,
            difficulty: self.difficulty,
            grid_width: self.board.width,
            grid_height: self.board.height,
            steps: self.steps,
            new_high_score: self.new_high_score,
        }
    }

    /// Receive a fresh snapshot after every state change
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.publisher.subscribe()
    }

    fn publish(&self) {
        self.publisher.send_replace(self.snapshot());
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn score(&self) -> u32 {
        self.scores.score()
    }

    pub fn high_score(&self) -> u32 {
        self.scores.high_score()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn store(&self) -> &S {
        self.scores.store()
    }

    #[cfg(test)]
    pub(crate) fn set_board(&mut self, snake: Snake, direction: Direction, food: Cell) {
        self.board.snake = snake;
        self.board.food = food;
        self.input.reset(direction);
        self.publish();
    }
}
