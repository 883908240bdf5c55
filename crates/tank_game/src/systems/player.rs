use tank_component::{Entity, Query, Store};
use tank_math::Vec2;
use tank_system::{EntityCache, ProcessSystem, TickContext};

use crate::components::{Enemy, Player, Spatial, Velocity, Weapon};

/// Horizontal offsets smaller than this are treated as lined up.
const LINE_UP_TOLERANCE: f32 = 0.05;

/// Drives the player's tank in place of keyboard input: the tank slides
/// along its row to line up with the nearest enemy, and the turret tracks
/// that enemy and fires whenever one is alive.
#[derive(Debug)]
pub struct PlayerSystem {
    speed: f32,
    enemy_cache: EntityCache,
    enemies: Vec<Vec2>,
}

impl PlayerSystem {
    /// `speed` is the tank's horizontal speed in world units per second.
    #[must_use]
    pub fn new(speed: f32) -> Self {
        Self {
            speed,
            enemy_cache: EntityCache::new(),
            enemies: Vec::new(),
        }
    }
}

impl ProcessSystem for PlayerSystem {
    fn name(&self) -> &str {
        "player"
    }

    fn query(&self) -> Query {
        Query::all_of()
            .with::<Player>()
            .with::<Spatial>()
            .with::<Weapon>()
    }

    fn refresh(&mut self, store: &Store) {
        self.enemy_cache
            .rebuild(store, &Query::all_of().with::<Enemy>().with::<Spatial>());
    }

    fn begin_tick(&mut self, store: &mut Store, _ctx: &TickContext) {
        self.enemies = self
            .enemy_cache
            .entities()
            .iter()
            .filter_map(|&e| super::center_of(store, e))
            .collect();
    }

    fn process(&mut self, entity: Entity, store: &mut Store, _ctx: &TickContext) {
        let Some(center) = super::center_of(store, entity) else {
            return;
        };
        let nearest = self
            .enemies
            .iter()
            .copied()
            .min_by(|a, b| a.distance_squared(center).total_cmp(&b.distance_squared(center)));

        if let Some(weapon) = store.get_component_mut::<Weapon>(entity) {
            weapon.aim = nearest.map_or(Vec2::ZERO, |target| (target - center).normalize_or_zero());
            weapon.trigger = nearest.is_some();
        }

        let dx = nearest.map_or(0.0, |target| target.x - center.x);
        let linear = if dx.abs() > LINE_UP_TOLERANCE {
            Vec2::new(dx.signum() * self.speed, 0.0)
        } else {
            Vec2::ZERO
        };
        if let Some(velocity) = store.get_component_mut::<Velocity>(entity) {
            velocity.linear = linear;
        }
    }
}
