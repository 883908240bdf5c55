//! Game systems.
//!
//! Most systems are [`ProcessSystem`](tank_system::ProcessSystem)s wrapped in
//! [`Process`](tank_system::Process). [`CollisionSystem`] and [`HudSystem`]
//! implement [`System`](tank_system::System) directly because they work on
//! several interest sets at once.

mod ai;
mod collision;
mod hud;
mod lifetime;
mod movement;
mod player;
mod shooting;

pub use ai::AiSystem;
pub use collision::CollisionSystem;
pub use hud::{HudSummary, HudSystem};
pub use lifetime::LifetimeSystem;
pub use movement::MovementSystem;
pub use player::PlayerSystem;
pub use shooting::ShootingSystem;

use tank_component::{Entity, Query, Store};
use tank_math::{Rect, Vec2};

use crate::components::{Spatial, Wall};

fn walls_query() -> Query {
    Query::all_of().with::<Wall>().with::<Spatial>()
}

/// Bounds of each entity in `entities` that has a [`Spatial`].
fn rects_of(store: &Store, entities: &[Entity]) -> Vec<Rect> {
    entities
        .iter()
        .filter_map(|&e| store.get_component::<Spatial>(e).map(|s| s.rect))
        .collect()
}

/// Centre of `entity`, if it has a [`Spatial`].
fn center_of(store: &Store, entity: Entity) -> Option<Vec2> {
    store.get_component::<Spatial>(entity).map(Spatial::center)
}
