use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::audio::AudioCues;
use crate::config::{GameConfig, GridSize, Viewport};
use crate::game::{GameState, GameStatus, Snapshot, TickOutcome};
use crate::input::Direction;
use crate::scheduler::Scheduler;

/// Owns the live game, its tick scheduler and the audio sink.
///
/// All mutation of the game goes through this type.
pub struct GameController<A: AudioCues> {
    config: GameConfig,
    state: GameState,
    scheduler: Scheduler,
    target_grid: GridSize,
    seeds: StdRng,
    audio: A,
    games_started: u32,
}

impl<A: AudioCues> GameController<A> {
    /// Creates a controller with a fresh, not yet scheduled game.
    #[must_use]
    pub fn new(config: GameConfig, viewport: Viewport, audio: A) -> Self {
        let mut seeds = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let target_grid = GridSize::fit_viewport(viewport, config.min_tiles);
        let state = GameState::new_with_seed(target_grid, config.rules, seeds.r#gen());

        Self {
            config,
            state,
            scheduler: Scheduler::new(),
            target_grid,
            seeds,
            audio,
            games_started: 0,
        }
    }

    /// Replaces the game with a fresh one and starts ticking.
    pub fn start(&mut self, now: Instant) {
        self.state =
            GameState::new_with_seed(self.target_grid, self.config.rules, self.seeds.r#gen());
        self.scheduler.start(self.state.tick_interval(), now);
        self.games_started += 1;

        log::info!(
            "game {} started on {}x{} grid",
            self.games_started,
            self.target_grid.width,
            self.target_grid.height
        );
    }

    /// Discards the current game, finished or not, and starts a new one.
    pub fn restart(&mut self, now: Instant) {
        log::info!(
            "restarting game {} at score {}",
            self.games_started,
            self.state.score()
        );
        self.start(now);
    }

    /// Forwards a turn request to the game.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        let accepted = self.state.set_direction(direction);
        if !accepted {
            log::trace!("direction {direction:?} rejected");
        }
        accepted
    }

    /// Runs one tick if the scheduler says one is due.
    pub fn advance(&mut self, now: Instant) -> Option<TickOutcome> {
        if !self.scheduler.poll(now) {
            return None;
        }

        let outcome = self.state.tick();

        if outcome.ate_food {
            self.audio.on_food_eaten();
        }
        if let Some(interval) = outcome.new_interval {
            log::debug!("tick interval now {}ms", interval.as_millis());
            self.scheduler.restart(interval, now);
        }
        if outcome.status == GameStatus::GameOver {
            self.scheduler.stop();
            self.audio.on_game_over();
            log::info!(
                "game over: score {} ({:?})",
                outcome.snapshot.score,
                outcome.snapshot.death_reason
            );
        }

        Some(outcome)
    }

    /// Recomputes the grid for a new viewport.
    ///
    /// The result becomes the grid for the next game; the live game gets it
    /// widened as needed so no snake segment or food falls outside.
    pub fn resize(&mut self, viewport: Viewport) -> GridSize {
        self.target_grid = GridSize::fit_viewport(viewport, self.config.min_tiles);
        let applied = self.state.resize(self.target_grid);

        log::debug!(
            "resized to {}x{} (requested {}x{})",
            applied.width,
            applied.height,
            self.target_grid.width,
            self.target_grid.height
        );
        applied
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn is_ticking(&self) -> bool {
        self.scheduler.is_running()
    }

    /// How long the event loop may wait before the next tick is due.
    #[must_use]
    pub fn time_until_tick(&self, now: Instant) -> Option<Duration> {
        self.scheduler.time_until_due(now)
    }

    #[must_use]
    pub fn audio(&self) -> &A {
        &self.audio
    }
}
