//! Core game state and logic

use crate::bag::{PREVIEW_LEN, PieceBag};
use crate::grid::Grid;
use crate::progression::{Progression, START_SPEED_MS, ScoreUpdate};
use crate::shape::Shape;
use crate::tetromino::{Step, Tetromino};
use crate::timer::Timer;
use std::time::Duration;

/// Debounce window after a horizontal move
const MOVE_WAIT: Duration = Duration::from_millis(200);
/// Debounce window after a rotation
const ROTATE_WAIT: Duration = Duration::from_millis(200);

/// Game state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Playing,
    GameOver,
}

/// Logical inputs for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Intents {
    pub move_left: bool,
    pub move_right: bool,
    pub rotate: bool,
    pub soft_drop_held: bool,
}

/// Things that happened during a tick, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    PieceLocked,
    ScoreUpdated(ScoreUpdate),
    GameOver,
}

/// Tunable timings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameConfig {
    /// Fall interval at level 1, in milliseconds
    pub start_speed_ms: f64,
    pub move_wait: Duration,
    pub rotate_wait: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            start_speed_ms: START_SPEED_MS,
            move_wait: MOVE_WAIT,
            rotate_wait: ROTATE_WAIT,
        }
    }
}

/// The main game struct
pub struct Game {
    /// Locked blocks
    pub grid: Grid,
    /// Current falling piece
    active: Tetromino,
    /// Piece bag randomizer
    bag: PieceBag,
    /// Score, level and speed
    pub progression: Progression,
    state: GameState,
    /// Automatic fall
    vertical: Timer,
    /// Horizontal move debounce
    horizontal: Timer,
    /// Rotation debounce
    rotation: Timer,
    /// Soft drop interval currently swapped in
    soft_drop: bool,
}

impl Game {
    /// Create a new game with a random seed
    pub fn new(config: GameConfig) -> Self {
        Self::with_seed(config, rand::random())
    }

    /// Create a new game with a fixed seed (deterministic piece order)
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        let mut bag = PieceBag::with_seed(seed);
        let first = bag.next_shape();
        let progression = Progression::new(config.start_speed_ms);

        let mut vertical = Timer::repeating(progression.fall_interval());
        vertical.activate();

        tracing::debug!(seed, first = first.name(), "new game");

        Self {
            grid: Grid::new(),
            active: Tetromino::spawn(first),
            bag,
            progression,
            state: GameState::Playing,
            vertical,
            horizontal: Timer::new(config.move_wait),
            rotation: Timer::new(config.rotate_wait),
            soft_drop: false,
        }
    }

    #[allow(dead_code)]
    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_over(&self) -> bool {
        self.state == GameState::GameOver
    }

    pub fn active(&self) -> &Tetromino {
        &self.active
    }

    /// Upcoming shapes, next first
    pub fn preview(&self) -> [Shape; PREVIEW_LEN] {
        self.bag.preview()
    }

    /// Final totals for the game-over screen and high-score record
    pub fn summary(&self) -> ScoreUpdate {
        self.progression.snapshot()
    }

    /// Advance one frame. Does nothing once the game is over.
    pub fn tick(&mut self, intents: Intents, dt: Duration) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.is_over() {
            return events;
        }

        self.horizontal.update(dt);
        self.rotation.update(dt);

        self.apply_input(intents);

        if self.vertical.update(dt) {
            self.step_down(&mut events);
        }

        events
    }

    fn apply_input(&mut self, intents: Intents) {
        if !self.horizontal.is_active() && (intents.move_left || intents.move_right) {
            if intents.move_left {
                self.active.translate(&self.grid, -1, 0);
            }
            if intents.move_right {
                self.active.translate(&self.grid, 1, 0);
            }
            self.horizontal.activate();
        }

        if !self.rotation.is_active() && intents.rotate {
            self.active.rotate(&self.grid);
            self.rotation.activate();
        }

        if intents.soft_drop_held != self.soft_drop {
            self.soft_drop = intents.soft_drop_held;
            self.sync_fall_speed();
        }
    }

    /// Point the fall timer at the interval for the current level and soft drop state
    fn sync_fall_speed(&mut self) {
        let interval = if self.soft_drop {
            self.progression.soft_drop_interval()
        } else {
            self.progression.fall_interval()
        };
        self.vertical.set_duration(interval);
    }

    /// One automatic downward step, locking and spawning as needed
    fn step_down(&mut self, events: &mut Vec<GameEvent>) {
        let Step::Locked(outcome) = self.active.move_down(&mut self.grid) else {
            return;
        };

        tracing::debug!(
            shape = self.active.shape.name(),
            placed = outcome.placed,
            overflow = outcome.overflow,
            "piece locked"
        );
        events.push(GameEvent::PieceLocked);

        let cleared = self.grid.clear_completed_rows();
        if let Some(update) = self.progression.on_lines_cleared(cleared) {
            self.sync_fall_speed();
            events.push(GameEvent::ScoreUpdated(update));
        }

        let next = self.bag.next_shape();
        self.spawn(next, outcome.is_block_out(), events);
    }

    /// Make `shape` the active piece and check it against the stack
    fn spawn(&mut self, shape: Shape, block_out: bool, events: &mut Vec<GameEvent>) {
        self.active = Tetromino::spawn(shape);

        if block_out || self.active.overlaps(&self.grid) {
            tracing::info!(
                score = self.progression.score,
                level = self.progression.level,
                lines = self.progression.lines,
                block_out,
                "game over"
            );
            self.state = GameState::GameOver;
            events.push(GameEvent::GameOver);
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}
