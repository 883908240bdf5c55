//! # tank_game
//!
//! A headless tank game built on the `tank_component` store and the
//! `tank_system` runtime. The player's tank holds the bottom of the map and
//! fires at the nearest enemy; enemies path-find towards it. Clearing every
//! enemy loads the next level.
//!
//! - [`components`] — game data attached to entities.
//! - [`templates`] — batched spawners for players, enemies, bullets, walls.
//! - [`systems`] — the per-tick game logic.
//! - [`level`] — level construction and win/loss checks.
//! - [`tick`] — the fixed-timestep [`TickLoop`](tick::TickLoop).

pub mod components;
pub mod config;
pub mod level;
pub mod pathfinding;
pub mod systems;
pub mod templates;
pub mod tick;
