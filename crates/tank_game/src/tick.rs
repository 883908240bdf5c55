//! Game tick loop.
//!
//! Each tick:
//!
//! 1. Every registered system refreshes its cache if the store has published
//!    since its last refresh, then runs, in registration order.
//! 2. The level outcome is checked. A cleared level loads the next one (or
//!    ends the game); a destroyed player ends the game.
//! 3. The tick counter advances.

use std::time::{Duration, Instant};

use tank_component::Store;
use tank_system::{Process, SystemId, SystemRegistry, TickContext};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{ConfigError, GameConfig};
use crate::level::{self, LevelError, LevelOutcome};
use crate::systems::{
    AiSystem, CollisionSystem, HudSystem, LifetimeSystem, MovementSystem, PlayerSystem,
    ShootingSystem,
};

#[derive(Debug, Error)]
pub enum TickError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Level(#[from] LevelError),
}

/// Configuration for the tick loop.
#[derive(Debug, Clone)]
pub struct TickConfig {
    /// Target ticks per second.
    pub tick_rate: f64,
    /// Maximum number of ticks to run (0 = unlimited).
    pub max_ticks: u64,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60.0,
            max_ticks: 0,
        }
    }
}

impl From<&GameConfig> for TickConfig {
    fn from(config: &GameConfig) -> Self {
        Self {
            tick_rate: config.tick_rate,
            max_ticks: config.max_ticks,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Playing { level: usize },
    /// The last level was cleared.
    Won,
    Lost,
}

impl GameState {
    #[must_use]
    pub fn is_over(&self) -> bool {
        !matches!(self, Self::Playing { .. })
    }
}

/// Register the game's systems in execution order.
pub fn register_systems(
    systems: &mut SystemRegistry,
    store: &Store,
    config: &GameConfig,
) -> Vec<SystemId> {
    let bounds = level::world_bounds(config);
    vec![
        systems.register(Process::new(PlayerSystem::new(config.player.speed)), store),
        systems.register(
            Process::new(
                AiSystem::new(config.grid_width, config.grid_height, config.cell_size)
                    .with_speed(config.enemy.speed)
                    .with_fire_range(config.enemy_fire_range)
                    .with_repath_interval(config.repath_interval),
            ),
            store,
        ),
        systems.register(Process::new(ShootingSystem::new()), store),
        systems.register(Process::new(MovementSystem::new(bounds)), store),
        systems.register(CollisionSystem::new(bounds), store),
        systems.register(Process::new(LifetimeSystem::new()), store),
        systems.register(HudSystem::new(config.hud_interval), store),
    ]
}

/// The game's tick loop state.
#[derive(Debug)]
pub struct TickLoop {
    /// Current tick counter.
    tick_id: u64,
    config: TickConfig,
    game: GameConfig,
    store: Store,
    systems: SystemRegistry,
    system_ids: Vec<SystemId>,
    state: GameState,
}

impl TickLoop {
    /// Validate the configuration, load the first level and register every
    /// system.
    ///
    /// # Errors
    ///
    /// Returns [`TickError::Config`] for an invalid configuration and
    /// [`TickError::Level`] if the first level cannot be built.
    pub fn new(game: GameConfig) -> Result<Self, TickError> {
        game.validate()?;
        let mut store = Store::new();
        level::load_level(&mut store, &game, 0)?;

        let mut systems = SystemRegistry::new();
        let system_ids = register_systems(&mut systems, &store, &game);

        Ok(Self {
            tick_id: 0,
            config: TickConfig::from(&game),
            game,
            store,
            systems,
            system_ids,
            state: GameState::Playing { level: 0 },
        })
    }

    /// Returns the current tick counter.
    #[must_use]
    pub fn tick_id(&self) -> u64 {
        self.tick_id
    }

    #[must_use]
    pub fn state(&self) -> GameState {
        self.state
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    #[must_use]
    pub fn systems(&self) -> &SystemRegistry {
        &self.systems
    }

    /// Ids of the game's systems, in execution order.
    #[must_use]
    pub fn system_ids(&self) -> &[SystemId] {
        &self.system_ids
    }

    /// Run one tick. Does nothing once the game is over.
    ///
    /// # Errors
    ///
    /// Returns an error if the next level cannot be built.
    pub fn tick(&mut self, dt: f64) -> Result<GameState, TickError> {
        let GameState::Playing { level } = self.state else {
            return Ok(self.state);
        };
        self.tick_id += 1;
        let ctx = TickContext::new(self.tick_id, dt);
        debug!(tick_id = self.tick_id, dt, level, "tick start");

        self.systems.tick_all(&mut self.store, &ctx);

        self.state = match level::outcome(&self.store) {
            LevelOutcome::InProgress => self.state,
            LevelOutcome::Lost => {
                info!(tick_id = self.tick_id, level, "player destroyed");
                GameState::Lost
            }
            LevelOutcome::Cleared if level + 1 < self.game.levels.len() => {
                info!(tick_id = self.tick_id, level, "level cleared");
                level::load_level(&mut self.store, &self.game, level + 1)?;
                GameState::Playing { level: level + 1 }
            }
            LevelOutcome::Cleared => {
                info!(tick_id = self.tick_id, level, "final level cleared");
                GameState::Won
            }
        };
        Ok(self.state)
    }

    /// Run the tick loop until the game ends or the configured number of
    /// ticks has elapsed, sleeping to hold the tick rate.
    ///
    /// # Errors
    ///
    /// Returns an error if a level cannot be built.
    pub fn run(&mut self) -> Result<GameState, TickError> {
        let tick_duration = Duration::from_secs_f64(1.0 / self.config.tick_rate);
        let mut tick_count = 0u64;

        info!(
            tick_rate = self.config.tick_rate,
            max_ticks = self.config.max_ticks,
            systems = self.systems.len(),
            "starting tick loop"
        );

        loop {
            let start = Instant::now();

            let dt = tick_duration.as_secs_f64();
            let state = self.tick(dt)?;

            tick_count += 1;
            if state.is_over() {
                info!(ticks = tick_count, ?state, "game over");
                break;
            }
            if self.config.max_ticks > 0 && tick_count >= self.config.max_ticks {
                info!(ticks = tick_count, "tick loop complete");
                break;
            }

            let elapsed = start.elapsed();
            if elapsed < tick_duration {
                std::thread::sleep(tick_duration - elapsed);
            } else {
                warn!(
                    tick_id = self.tick_id,
                    elapsed_ms = elapsed.as_millis() as u64,
                    budget_ms = tick_duration.as_millis() as u64,
                    "tick exceeded time budget"
                );
            }
        }
        Ok(self.state)
    }

    /// Release every system's cache.
    pub fn shutdown(&mut self) {
        self.systems.clean_up_all();
        info!(tick_id = self.tick_id, "systems cleaned up");
    }
}
