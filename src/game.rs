use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::{GridSize, Rules};
use crate::food::{spawn_position, FoodError};
use crate::input::{direction_change_is_valid, Direction};
use crate::snake::{cell_extent, Position, Snake};

/// Current high-level gameplay state.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameStatus {
    Running,
    GameOver,
}

/// Why a game ended.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DeathReason {
    WallCollision,
    SelfCollision,
    /// The snake filled every cell, leaving nowhere to put food.
    BoardFull,
}

/// Full copy of everything the presentation layer draws.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Snapshot {
    pub grid: GridSize,
    pub snake: Vec<Position>,
    pub food: Position,
    pub score: u32,
    pub tick_interval: Duration,
    pub heading: Option<Direction>,
    pub status: GameStatus,
    pub death_reason: Option<DeathReason>,
}

/// Result of one [`GameState::tick`].
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TickOutcome {
    pub status: GameStatus,
    pub ate_food: bool,
    /// Set when eating changed the tick interval; the scheduler must re-arm.
    pub new_interval: Option<Duration>,
    pub snapshot: Snapshot,
}

/// Complete mutable game state for one session.
#[derive(Debug, Clone)]
pub struct GameState {
    grid: GridSize,
    rules: Rules,
    snake: Snake,
    food: Position,
    score: u32,
    tick_interval: Duration,
    heading: Option<Direction>,
    pending: Option<Direction>,
    direction_locked: bool,
    status: GameStatus,
    death_reason: Option<DeathReason>,
    tick_count: u64,
    rng: StdRng,
}

impl GameState {
    /// Creates a fresh game with entropy-seeded food placement.
    #[must_use]
    pub fn new(grid: GridSize, rules: Rules) -> Self {
        Self::with_rng(grid, rules, Snake::seeded(), StdRng::from_entropy())
    }

    /// Creates a deterministic state for tests and reproducible simulations.
    #[must_use]
    pub fn new_with_seed(grid: GridSize, rules: Rules, seed: u64) -> Self {
        Self::with_rng(grid, rules, Snake::seeded(), StdRng::seed_from_u64(seed))
    }

    /// Builds a running game from an explicit layout.
    ///
    /// `heading` is the committed direction the snake is already moving in.
    #[must_use]
    pub fn from_layout(
        grid: GridSize,
        rules: Rules,
        snake: Snake,
        food: Position,
        heading: Option<Direction>,
        seed: u64,
    ) -> Self {
        let mut state = Self::with_rng(grid, rules, snake, StdRng::seed_from_u64(seed));
        state.food = food;
        state.heading = heading;
        state
    }

    fn with_rng(grid: GridSize, rules: Rules, snake: Snake, mut rng: StdRng) -> Self {
        let (food, status, death_reason) = match spawn_position(&mut rng, grid, &snake) {
            Ok(food) => (food, GameStatus::Running, None),
            Err(FoodError::BoardFull(_)) => (
                snake.head(),
                GameStatus::GameOver,
                Some(DeathReason::BoardFull),
            ),
        };

        Self {
            grid,
            rules,
            snake,
            food,
            score: 0,
            tick_interval: rules.initial_interval(),
            heading: None,
            pending: None,
            direction_locked: false,
            status,
            death_reason,
            tick_count: 0,
            rng,
        }
    }

    /// Requests a turn for the next tick.
    ///
    /// Returns false when the request is a reversal of the committed heading,
    /// when a turn was already accepted since the last tick, or when the game
    /// is over. Before the first move the body's own orientation stands in
    /// for the heading, so the snake cannot start by turning into its neck.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if self.status != GameStatus::Running || self.direction_locked {
            return false;
        }
        let current = self.heading.or_else(|| self.snake.implied_direction());
        if !direction_change_is_valid(current, direction) {
            return false;
        }

        self.pending = Some(direction);
        self.direction_locked = true;
        true
    }

    /// Advances simulation by one gameplay tick.
    pub fn tick(&mut self) -> TickOutcome {
        if self.status != GameStatus::Running {
            return self.outcome(false, None);
        }

        if let Some(direction) = self.pending.take() {
            self.heading = Some(direction);
        }
        self.direction_locked = false;

        let Some(heading) = self.heading else {
            return self.outcome(false, None);
        };

        self.tick_count += 1;
        let candidate = self.snake.head().step(heading);

        if !candidate.is_within_bounds(self.grid) {
            return self.end(DeathReason::WallCollision);
        }
        // Checked against the pre-move body, vacating tail included.
        if self.snake.occupies(candidate) {
            return self.end(DeathReason::SelfCollision);
        }

        let ate_food = candidate == self.food;
        self.snake.advance(candidate, ate_food);
        if !ate_food {
            return self.outcome(false, None);
        }

        self.score += self.rules.food_reward;
        let next_interval = self.rules.next_interval(self.tick_interval);
        let new_interval = (next_interval != self.tick_interval).then_some(next_interval);
        self.tick_interval = next_interval;

        match spawn_position(&mut self.rng, self.grid, &self.snake) {
            Ok(food) => {
                self.food = food;
                self.outcome(true, new_interval)
            }
            Err(FoodError::BoardFull(_)) => {
                self.status = GameStatus::GameOver;
                self.death_reason = Some(DeathReason::BoardFull);
                self.outcome(true, new_interval)
            }
        }
    }

    /// Moves the live game onto `requested`, widened to keep every entity inside.
    ///
    /// Returns the grid actually applied.
    pub fn resize(&mut self, requested: GridSize) -> GridSize {
        let occupied = self.snake.extent().union(cell_extent(self.food));
        self.grid = requested.union(occupied);
        self.grid
    }

    fn end(&mut self, reason: DeathReason) -> TickOutcome {
        self.status = GameStatus::GameOver;
        self.death_reason = Some(reason);
        self.outcome(false, None)
    }

    fn outcome(&self, ate_food: bool, new_interval: Option<Duration>) -> TickOutcome {
        TickOutcome {
            status: self.status,
            ate_food,
            new_interval,
            snapshot: self.snapshot(),
        }
    }

    /// Returns a full copy of the drawable state.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            grid: self.grid,
            snake: self.snake.segments().copied().collect(),
            food: self.food,
            score: self.score,
            tick_interval: self.tick_interval,
            heading: self.heading,
            status: self.status,
            death_reason: self.death_reason,
        }
    }

    #[must_use]
    pub fn grid(&self) -> GridSize {
        self.grid
    }

    #[must_use]
    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    #[must_use]
    pub fn food(&self) -> Position {
        self.food
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    #[must_use]
    pub fn heading(&self) -> Option<Direction> {
        self.heading
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[must_use]
    pub fn death_reason(&self) -> Option<DeathReason> {
        self.death_reason
    }

    /// Ticks that actually moved the snake.
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::time::Duration;

    use crate::config::{GridSize, Rules};
    use crate::input::Direction;

    use super::{DeathReason, GameState, GameStatus};
    use crate::snake::{Position, Snake};

    const GRID: GridSize = GridSize {
        width: 15,
        height: 15,
    };

    fn moving_right(food: Position) -> GameState {
        GameState::from_layout(
            GRID,
            Rules::default(),
            Snake::seeded(),
            food,
            Some(Direction::Right),
            1,
        )
    }

    #[test]
    fn fresh_game_waits_for_first_direction() {
        let mut state = GameState::new_with_seed(GRID, Rules::default(), 5);
        let before = state.snapshot();

        let outcome = state.tick();

        assert_eq!(outcome.status, GameStatus::Running);
        assert_eq!(outcome.snapshot, before);
        assert_eq!(state.tick_count(), 0);
        assert!(!state.snake().occupies(state.food()));
    }

    #[test]
    fn fresh_game_rejects_turning_into_neck() {
        let mut state = GameState::new_with_seed(GRID, Rules::default(), 1);

        assert!(!state.set_direction(Direction::Left));
        assert!(state.set_direction(Direction::Up));

        let outcome = state.tick();
        assert_eq!(outcome.status, GameStatus::Running);
        assert_eq!(state.snake().head(), Position { x: 10, y: 9 });
    }

    #[test]
    fn single_segment_snake_starts_in_any_direction() {
        let mut state = GameState::from_layout(
            GRID,
            Rules::default(),
            Snake::from_segments(vec![Position { x: 7, y: 7 }]),
            Position { x: 0, y: 0 },
            None,
            1,
        );

        assert!(state.set_direction(Direction::Left));
    }

    #[test]
    fn reversal_is_rejected() {
        let mut state = moving_right(Position { x: 0, y: 0 });

        assert!(!state.set_direction(Direction::Left));
        assert!(state.set_direction(Direction::Up));
    }

    #[test]
    fn only_one_turn_per_tick() {
        let mut state = moving_right(Position { x: 0, y: 0 });

        assert!(state.set_direction(Direction::Up));
        assert!(!state.set_direction(Direction::Left));

        state.tick();
        assert_eq!(state.snake().head(), Position { x: 10, y: 9 });

        assert!(state.set_direction(Direction::Left));
        state.tick();
        assert_eq!(state.snake().head(), Position { x: 9, y: 9 });
    }

    #[test]
    fn non_eating_tick_keeps_length() {
        let mut state = moving_right(Position { x: 0, y: 0 });

        let outcome = state.tick();

        assert_eq!(
            outcome.snapshot.snake,
            vec![
                Position { x: 11, y: 10 },
                Position { x: 10, y: 10 },
                Position { x: 9, y: 10 },
            ]
        );
        assert_eq!(outcome.snapshot.score, 0);
        assert!(!outcome.ate_food);
        assert_eq!(outcome.new_interval, None);
    }

    #[test]
    fn eating_grows_scores_and_speeds_up() {
        let mut state = moving_right(Position { x: 11, y: 10 });

        let outcome = state.tick();

        assert!(outcome.ate_food);
        assert_eq!(state.snake().len(), 4);
        assert_eq!(state.snake().head(), Position { x: 11, y: 10 });
        assert_eq!(state.score(), 10);
        assert_eq!(outcome.new_interval, Some(Duration::from_millis(145)));
        assert!(!state.snake().occupies(state.food()));
    }

    #[test]
    fn interval_clamps_after_two_hundred_meals() {
        let mut state = GameState::from_layout(
            GridSize {
                width: 300,
                height: 1,
            },
            Rules::default(),
            Snake::from_segments(vec![Position { x: 0, y: 0 }]),
            Position { x: 1, y: 0 },
            Some(Direction::Right),
            7,
        );

        let mut previous = state.tick_interval();
        for _ in 0..200 {
            state.food = state.snake().head().step(Direction::Right);
            let outcome = state.tick();

            assert!(outcome.ate_food);
            assert!(outcome.snapshot.tick_interval <= previous);
            previous = outcome.snapshot.tick_interval;
        }

        assert_eq!(state.snake().len(), 201);
        assert_eq!(state.score(), 2000);
        assert_eq!(state.tick_interval(), Duration::from_millis(50));
    }

    #[test]
    fn wall_collision_keeps_pre_tick_state() {
        let snake = Snake::from_segments(vec![
            Position { x: 0, y: 4 },
            Position { x: 1, y: 4 },
            Position { x: 2, y: 4 },
        ]);
        let mut state = GameState::from_layout(
            GRID,
            Rules::default(),
            snake.clone(),
            Position { x: 7, y: 7 },
            Some(Direction::Left),
            2,
        );

        let outcome = state.tick();

        assert_eq!(outcome.status, GameStatus::GameOver);
        assert_eq!(state.death_reason(), Some(DeathReason::WallCollision));
        assert_eq!(state.snake(), &snake);
        assert_eq!(state.score(), 0);
    }

    #[test]
    fn moving_into_vacating_tail_is_a_collision() {
        let snake = Snake::from_segments(vec![
            Position { x: 5, y: 5 },
            Position { x: 6, y: 5 },
            Position { x: 6, y: 6 },
            Position { x: 5, y: 6 },
        ]);
        let mut state = GameState::from_layout(
            GRID,
            Rules::default(),
            snake,
            Position { x: 0, y: 0 },
            Some(Direction::Left),
            3,
        );

        assert!(state.set_direction(Direction::Down));
        let outcome = state.tick();

        assert_eq!(outcome.status, GameStatus::GameOver);
        assert_eq!(state.death_reason(), Some(DeathReason::SelfCollision));
    }

    #[test]
    fn game_over_is_terminal() {
        let mut state = GameState::from_layout(
            GRID,
            Rules::default(),
            Snake::from_segments(vec![Position { x: 14, y: 2 }]),
            Position { x: 0, y: 0 },
            Some(Direction::Right),
            4,
        );

        state.tick();
        let frozen = state.snapshot();

        assert!(!state.set_direction(Direction::Up));
        let outcome = state.tick();
        assert_eq!(outcome.status, GameStatus::GameOver);
        assert_eq!(outcome.snapshot, frozen);
    }

    #[test]
    fn filling_the_board_ends_the_game_with_score() {
        let grid = GridSize {
            width: 2,
            height: 2,
        };
        let snake = Snake::from_segments(vec![
            Position { x: 0, y: 1 },
            Position { x: 0, y: 0 },
            Position { x: 1, y: 0 },
        ]);
        let mut state = GameState::from_layout(
            grid,
            Rules::default(),
            snake,
            Position { x: 1, y: 1 },
            Some(Direction::Right),
            6,
        );

        let outcome = state.tick();

        assert!(outcome.ate_food);
        assert_eq!(outcome.status, GameStatus::GameOver);
        assert_eq!(state.death_reason(), Some(DeathReason::BoardFull));
        assert_eq!(state.score(), 10);
        assert_eq!(state.snake().len(), 4);
    }

    #[test]
    fn random_walk_never_duplicates_cells_while_running() {
        let mut state = GameState::new_with_seed(GRID, Rules::default(), 99);
        let turns = [
            Direction::Up,
            Direction::Left,
            Direction::Down,
            Direction::Right,
        ];

        for step in 0..500 {
            state.set_direction(turns[(step / 3) % turns.len()]);
            let outcome = state.tick();
            if outcome.status == GameStatus::GameOver {
                break;
            }

            let unique: HashSet<_> = outcome.snapshot.snake.iter().collect();
            assert_eq!(unique.len(), outcome.snapshot.snake.len());
            assert!(!outcome.snapshot.snake.contains(&outcome.snapshot.food));
        }
    }

    #[test]
    fn resize_never_strands_entities() {
        let mut state = GameState::from_layout(
            GridSize {
                width: 40,
                height: 30,
            },
            Rules::default(),
            Snake::from_segments(vec![Position { x: 30, y: 5 }]),
            Position { x: 2, y: 25 },
            Some(Direction::Right),
            8,
        );

        let applied = state.resize(GRID);

        assert_eq!(
            applied,
            GridSize {
                width: 31,
                height: 26
            }
        );
        assert!(state.snake().head().is_within_bounds(applied));
        assert!(state.food().is_within_bounds(applied));
    }
}
