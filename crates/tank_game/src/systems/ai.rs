use tank_component::{Entity, Query, Store};
use tank_math::Vec2;
use tank_system::{EntityCache, ProcessSystem, TickContext};
use tracing::debug;

use crate::components::{Ai, Enemy, Player, Spatial, Velocity, Weapon};
use crate::pathfinding::{self, Grid};

/// A waypoint counts as reached within this fraction of a cell.
const ARRIVE_RADIUS: f32 = 0.1;

/// Steers enemy tanks towards the player along an A* path and fires when
/// the player is in range.
///
/// The blocked-cell grid is derived from [`Wall`](crate::components::Wall)
/// entities and rebuilt on refresh when the set of walls has changed.
#[derive(Debug)]
pub struct AiSystem {
    grid: Grid,
    wall_cache: EntityCache,
    player_cache: EntityCache,
    cell_size: f32,
    speed: f32,
    fire_range: f32,
    repath_interval: f32,
    target: Option<(Entity, Vec2)>,
}

impl AiSystem {
    #[must_use]
    pub fn new(width: u32, height: u32, cell_size: f32) -> Self {
        Self {
            grid: Grid::new(width, height),
            wall_cache: EntityCache::new(),
            player_cache: EntityCache::new(),
            cell_size,
            speed: 2.0,
            fire_range: 6.0,
            repath_interval: 0.5,
            target: None,
        }
    }

    /// Movement speed in world units per second.
    #[must_use]
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Distance within which enemies pull the trigger.
    #[must_use]
    pub fn with_fire_range(mut self, range: f32) -> Self {
        self.fire_range = range;
        self
    }

    /// Seconds between path recomputations.
    #[must_use]
    pub fn with_repath_interval(mut self, interval: f32) -> Self {
        self.repath_interval = interval;
        self
    }

    fn rebuild_grid(&mut self, store: &Store) {
        self.grid = Grid::new(self.grid.width() as u32, self.grid.height() as u32);
        for rect in super::rects_of(store, self.wall_cache.entities()) {
            self.grid.block(Grid::cell_at(rect.center(), self.cell_size));
        }
        debug!(walls = self.wall_cache.len(), "rebuilt path grid");
    }

    fn steer(&self, ai: &mut Ai, center: Vec2, target_pos: Vec2, dt: f32) -> Vec2 {
        ai.repath_in -= dt;
        if ai.repath_in <= 0.0 || ai.path.is_empty() {
            let from = Grid::cell_at(center, self.cell_size);
            let to = Grid::cell_at(target_pos, self.cell_size);
            ai.path = pathfinding::find_path(&self.grid, from, to).unwrap_or_default();
            ai.repath_in = self.repath_interval;
        }

        let arrive = ARRIVE_RADIUS * self.cell_size;
        while let Some(&next) = ai.path.first() {
            if Grid::cell_center(next, self.cell_size).distance(center) > arrive {
                break;
            }
            ai.path.remove(0);
        }

        ai.path.first().map_or(Vec2::ZERO, |&next| {
            (Grid::cell_center(next, self.cell_size) - center).normalize_or_zero() * self.speed
        })
    }
}

impl ProcessSystem for AiSystem {
    fn name(&self) -> &str {
        "ai"
    }

    fn query(&self) -> Query {
        Query::all_of()
            .with::<Enemy>()
            .with::<Spatial>()
            .with::<Velocity>()
            .with::<Ai>()
    }

    fn refresh(&mut self, store: &Store) {
        self.player_cache
            .rebuild(store, &Query::all_of().with::<Player>().with::<Spatial>());

        let walls_before = self.wall_cache.entities().to_vec();
        self.wall_cache.rebuild(store, &super::walls_query());
        if self.wall_cache.entities() != walls_before.as_slice() {
            self.rebuild_grid(store);
        }
    }

    fn begin_tick(&mut self, store: &mut Store, _ctx: &TickContext) {
        self.target = self
            .player_cache
            .entities()
            .iter()
            .find_map(|&e| super::center_of(store, e).map(|c| (e, c)));
    }

    fn process(&mut self, entity: Entity, store: &mut Store, ctx: &TickContext) {
        let Some(center) = super::center_of(store, entity) else {
            return;
        };
        let Some(ai) = store.get_component_mut::<Ai>(entity) else {
            return;
        };

        let (velocity, aim, in_range) = match self.target {
            Some((target, target_pos)) => {
                if ai.target != Some(target) {
                    debug!(%entity, %target, "acquired target");
                    ai.target = Some(target);
                    ai.path.clear();
                }
                let distance = center.distance(target_pos);
                let velocity = self.steer(ai, center, target_pos, ctx.dt_f32());
                (
                    velocity,
                    (target_pos - center).normalize_or_zero(),
                    distance <= self.fire_range,
                )
            }
            None => {
                ai.target = None;
                ai.path.clear();
                (Vec2::ZERO, Vec2::ZERO, false)
            }
        };

        if let Some(v) = store.get_component_mut::<Velocity>(entity) {
            v.linear = velocity;
        }
        if let Some(weapon) = store.get_component_mut::<Weapon>(entity) {
            weapon.aim = aim;
            weapon.trigger = in_range;
        }
    }
}
