//! Level construction and progress.
//!
//! Loading a level empties the store with [`Store::clear_all`] and spawns
//! the level's walls, the player, and its enemies from scratch.

use tank_component::{Entity, Store};
use tank_math::{IVec2, Rect, Vec2};
use thiserror::Error;
use tracing::info;

use crate::components::{Enemy, Player};
use crate::config::GameConfig;
use crate::pathfinding::Grid;
use crate::templates;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LevelError {
    #[error("level {number} does not exist ({count} levels configured)")]
    NoSuchLevel { number: usize, count: usize },
    #[error("level {number} has no free cell for {what}")]
    NoRoom { number: usize, what: &'static str },
}

/// Entities created by [`load_level`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelSummary {
    pub number: usize,
    pub player: Entity,
    pub enemies: Vec<Entity>,
    pub walls: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelOutcome {
    InProgress,
    /// Every enemy is destroyed.
    Cleared,
    /// The player is destroyed.
    Lost,
}

/// World bounds for `config`, in world units.
#[must_use]
pub fn world_bounds(config: &GameConfig) -> Rect {
    Rect::new(
        Vec2::ZERO,
        Vec2::new(config.grid_width as f32, config.grid_height as f32) * config.cell_size,
    )
}

/// The free cell closest to `preferred`, ties broken by row then column.
fn free_cell(grid: &Grid, preferred: IVec2) -> Option<IVec2> {
    (0..grid.height())
        .flat_map(|y| (0..grid.width()).map(move |x| IVec2::new(x, y)))
        .filter(|&cell| !grid.is_blocked(cell))
        .min_by_key(|&cell| {
            let d = (cell - preferred).abs();
            (d.x + d.y, cell.y, cell.x)
        })
}

/// Clear the store and build level `number` (zero-based).
///
/// # Errors
///
/// Returns [`LevelError::NoSuchLevel`] if `number` is out of range, and
/// [`LevelError::NoRoom`] if the walls leave no space for a tank. In the
/// latter case the store holds the partly built level.
pub fn load_level(
    store: &mut Store,
    config: &GameConfig,
    number: usize,
) -> Result<LevelSummary, LevelError> {
    let level = config.levels.get(number).ok_or(LevelError::NoSuchLevel {
        number,
        count: config.levels.len(),
    })?;

    store.clear_all();

    let size = config.cell_size;
    let mut grid = Grid::new(config.grid_width, config.grid_height);
    for &[x, y] in &level.walls {
        let cell = IVec2::new(x, y);
        grid.block(cell);
        templates::spawn_wall(store, Rect::new(cell.as_vec2() * size, Vec2::splat(size)));
    }

    let (w, h) = (grid.width(), grid.height());
    let player_cell = free_cell(&grid, IVec2::new(w / 2, h - 1)).ok_or(LevelError::NoRoom {
        number,
        what: "the player",
    })?;
    grid.block(player_cell);
    let player = templates::spawn_player(store, Grid::cell_center(player_cell, size), &config.player);

    let count = level.enemies as i32;
    let mut enemies = Vec::with_capacity(level.enemies as usize);
    for i in 0..count {
        // Spread evenly across the top row.
        let preferred = IVec2::new((i + 1) * w / (count + 1), 0);
        let cell = free_cell(&grid, preferred).ok_or(LevelError::NoRoom {
            number,
            what: "an enemy",
        })?;
        grid.block(cell);
        enemies.push(templates::spawn_enemy(store, Grid::cell_center(cell, size), &config.enemy));
    }

    info!(
        level = number,
        walls = level.walls.len(),
        enemies = enemies.len(),
        "level loaded"
    );
    Ok(LevelSummary {
        number,
        player,
        enemies,
        walls: level.walls.len(),
    })
}

/// Whether the current level has been won or lost.
///
/// Reads the per-type component counts, so it costs the same however many
/// entities are alive.
#[must_use]
pub fn outcome(store: &Store) -> LevelOutcome {
    if store.component_count::<Player>() == 0 {
        LevelOutcome::Lost
    } else if store.component_count::<Enemy>() == 0 {
        LevelOutcome::Cleared
    } else {
        LevelOutcome::InProgress
    }
}
