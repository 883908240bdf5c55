//! Game configuration.
//!
//! [`GameConfig`] is read from a JSON file. Every field is optional; missing
//! fields take their [`Default`] values.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Environment variable naming the config file when no CLI argument is given.
pub const CONFIG_ENV: &str = "TANK_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Tuning for one kind of tank.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TankConfig {
    /// Edge length of the tank's square, in world units.
    pub size: f32,
    /// Driving speed in units per second.
    pub speed: f32,
    pub health: i32,
    /// Seconds between shots.
    pub fire_cooldown: f32,
    pub bullet_speed: f32,
    pub bullet_damage: i32,
    /// Seconds a bullet lives before it is removed.
    pub bullet_lifetime: f32,
}

impl TankConfig {
    /// Default player tuning.
    #[must_use]
    pub fn player() -> Self {
        Self {
            size: 0.8,
            speed: 4.0,
            health: 10,
            fire_cooldown: 0.4,
            bullet_speed: 12.0,
            bullet_damage: 2,
            bullet_lifetime: 1.5,
        }
    }

    /// Default enemy tuning.
    #[must_use]
    pub fn enemy() -> Self {
        Self {
            size: 0.8,
            speed: 2.0,
            health: 4,
            fire_cooldown: 1.2,
            bullet_speed: 8.0,
            bullet_damage: 1,
            bullet_lifetime: 1.5,
        }
    }
}

impl Default for TankConfig {
    fn default() -> Self {
        Self::enemy()
    }
}

/// One level's layout.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Number of enemy tanks.
    pub enemies: u32,
    /// Blocked grid cells, as `[x, y]`.
    pub walls: Vec<[i32; 2]>,
}

impl LevelConfig {
    #[must_use]
    pub fn new(enemies: u32) -> Self {
        Self {
            enemies,
            walls: Vec::new(),
        }
    }

    /// Add a horizontal run of wall cells from `(x, y)` of length `len`.
    #[must_use]
    pub fn with_wall_row(mut self, x: i32, y: i32, len: i32) -> Self {
        self.walls.extend((x..x + len).map(|x| [x, y]));
        self
    }
}

/// Top-level game configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Target ticks per second.
    pub tick_rate: f64,
    /// Maximum number of ticks to run (0 = unlimited).
    pub max_ticks: u64,
    /// World width in grid cells.
    pub grid_width: u32,
    /// World height in grid cells.
    pub grid_height: u32,
    /// World units per grid cell.
    pub cell_size: f32,
    /// Enemies fire when the player is within this many world units.
    pub enemy_fire_range: f32,
    /// Seconds between enemy path recomputations.
    pub repath_interval: f32,
    /// Ticks between HUD summaries.
    pub hud_interval: u64,
    pub player: TankConfig,
    pub enemy: TankConfig,
    pub levels: Vec<LevelConfig>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60.0,
            max_ticks: 0,
            grid_width: 16,
            grid_height: 12,
            cell_size: 1.0,
            enemy_fire_range: 6.0,
            repath_interval: 0.5,
            hud_interval: 60,
            player: TankConfig::player(),
            enemy: TankConfig::enemy(),
            levels: vec![
                LevelConfig::new(2),
                LevelConfig::new(3).with_wall_row(4, 5, 8),
                LevelConfig::new(4)
                    .with_wall_row(2, 3, 5)
                    .with_wall_row(9, 7, 5),
            ],
        }
    }
}

impl GameConfig {
    /// Override the tick rate.
    #[must_use]
    pub fn with_tick_rate(mut self, tick_rate: f64) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    /// Override the tick limit (0 = unlimited).
    #[must_use]
    pub fn with_max_ticks(mut self, max_ticks: u64) -> Self {
        self.max_ticks = max_ticks;
        self
    }

    /// Override the world size, in cells.
    #[must_use]
    pub fn with_grid(mut self, width: u32, height: u32) -> Self {
        self.grid_width = width;
        self.grid_height = height;
        self
    }

    /// Replace the level list.
    #[must_use]
    pub fn with_levels(mut self, levels: Vec<LevelConfig>) -> Self {
        self.levels = levels;
        self
    }

    /// Parse and validate a config from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_json(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate the config file at `path`.
    ///
    /// # Errors
    ///
    /// See [`GameConfig::from_json`]; additionally [`ConfigError::Io`] if the
    /// file cannot be read.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text, path)
    }

    /// Resolve the config path from the first CLI argument, then
    /// [`CONFIG_ENV`].
    #[must_use]
    pub fn resolve_path(arg: Option<String>, env: Option<String>) -> Option<PathBuf> {
        arg.or(env).filter(|p| !p.is_empty()).map(PathBuf::from)
    }

    /// Check value ranges and that every wall cell lies inside the grid.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tick_rate > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "tick_rate must be positive, got {}",
                self.tick_rate
            )));
        }
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(ConfigError::Invalid("grid must be at least 1x1".into()));
        }
        if !(self.cell_size > 0.0) {
            return Err(ConfigError::Invalid("cell_size must be positive".into()));
        }
        if self.levels.is_empty() {
            return Err(ConfigError::Invalid("at least one level is required".into()));
        }
        for (number, level) in self.levels.iter().enumerate() {
            for &[x, y] in &level.walls {
                if x < 0 || y < 0 || x >= self.grid_width as i32 || y >= self.grid_height as i32 {
                    return Err(ConfigError::Invalid(format!(
                        "level {number}: wall cell [{x}, {y}] is outside the grid"
                    )));
                }
            }
        }
        Ok(())
    }
}
