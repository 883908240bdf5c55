use tank_component::{Entity, Query, Store};
use tank_math::{Rect, Vec2};
use tank_system::{EntityCache, ProcessSystem, TickContext};

use crate::components::{Bullet, Spatial, Velocity};

/// Integrates velocity into position.
///
/// Tanks are kept inside the world and cannot enter walls; each axis is
/// resolved separately so a tank slides along a wall it is pushing into.
/// Bullets move freely and are dealt with by [`super::CollisionSystem`].
#[derive(Debug)]
pub struct MovementSystem {
    bounds: Rect,
    wall_cache: EntityCache,
    walls: Vec<Rect>,
}

impl MovementSystem {
    #[must_use]
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            wall_cache: EntityCache::new(),
            walls: Vec::new(),
        }
    }

    fn blocked(&self, rect: &Rect) -> bool {
        self.walls.iter().any(|w| w.intersects(rect))
    }

    fn step_tank(&self, rect: Rect, delta: Vec2) -> Rect {
        let mut moved = rect;
        for axis in [Vec2::new(delta.x, 0.0), Vec2::new(0.0, delta.y)] {
            let candidate = moved.translated(axis).clamped_to(&self.bounds);
            if !self.blocked(&candidate) {
                moved = candidate;
            }
        }
        moved
    }
}

impl ProcessSystem for MovementSystem {
    fn name(&self) -> &str {
        "movement"
    }

    fn query(&self) -> Query {
        Query::all_of().with::<Spatial>().with::<Velocity>()
    }

    fn refresh(&mut self, store: &Store) {
        self.wall_cache.rebuild(store, &super::walls_query());
    }

    fn begin_tick(&mut self, store: &mut Store, _ctx: &TickContext) {
        self.walls = super::rects_of(store, self.wall_cache.entities());
    }

    fn process(&mut self, entity: Entity, store: &mut Store, ctx: &TickContext) {
        let Some(velocity) = store.get_component::<Velocity>(entity) else {
            return;
        };
        let delta = velocity.linear * ctx.dt_f32();
        if delta == Vec2::ZERO {
            return;
        }
        let is_bullet = store.has_component::<Bullet>(entity);
        let Some(spatial) = store.get_component_mut::<Spatial>(entity) else {
            return;
        };
        spatial.rect = if is_bullet {
            spatial.rect.translated(delta)
        } else {
            self.step_tank(spatial.rect, delta)
        };
    }
}

#[cfg(test)]
mod tests {
    use tank_system::{Process, System};

    use super::*;
    use crate::components::Wall;

    fn world() -> Rect {
        Rect::new(Vec2::ZERO, Vec2::splat(10.0))
    }

    fn tank(store: &mut Store, min: Vec2, velocity: Vec2) -> Entity {
        store.spawn_bundle((
            Spatial::new(Rect::new(min, Vec2::ONE)),
            Velocity::new(velocity),
        ))
    }

    fn min_of(store: &Store, e: Entity) -> Vec2 {
        store.get_component::<Spatial>(e).unwrap().rect.min
    }

    #[test]
    fn test_moves_by_velocity() {
        let mut store = Store::new();
        let e = tank(&mut store, Vec2::ZERO, Vec2::new(2.0, 1.0));
        let mut system = Process::new(MovementSystem::new(world()));
        system.refresh_list(&store);
        system.tick(&mut store, &TickContext::new(1, 0.5));
        assert_eq!(min_of(&store, e), Vec2::new(1.0, 0.5));
    }

    #[test]
    fn test_tank_clamped_to_world() {
        let mut store = Store::new();
        let e = tank(&mut store, Vec2::new(8.5, 0.0), Vec2::new(4.0, -4.0));
        let mut system = Process::new(MovementSystem::new(world()));
        system.refresh_list(&store);
        system.tick(&mut store, &TickContext::new(1, 1.0));
        assert_eq!(min_of(&store, e), Vec2::new(9.0, 0.0));
    }

    #[test]
    fn test_tank_slides_along_wall() {
        let mut store = Store::new();
        store.spawn_bundle((Wall, Spatial::new(Rect::new(Vec2::new(2.0, 0.0), Vec2::new(1.0, 10.0)))));
        let e = tank(&mut store, Vec2::new(0.5, 0.0), Vec2::new(1.0, 1.0));
        let mut system = Process::new(MovementSystem::new(world()));
        system.refresh_list(&store);
        system.tick(&mut store, &TickContext::new(1, 1.0));
        // x is blocked by the wall, y is free.
        assert_eq!(min_of(&store, e), Vec2::new(0.5, 1.0));
    }

    #[test]
    fn test_bullets_ignore_walls_and_bounds() {
        let mut store = Store::new();
        store.spawn_bundle((Wall, Spatial::new(Rect::new(Vec2::new(2.0, 0.0), Vec2::ONE))));
        let owner = store.create_identity();
        let bullet = store.spawn_bundle((
            Bullet { owner },
            Spatial::new(Rect::new(Vec2::ZERO, Vec2::ONE)),
            Velocity::new(Vec2::new(-3.0, 0.0)),
        ));
        let mut system = Process::new(MovementSystem::new(world()));
        system.refresh_list(&store);
        system.tick(&mut store, &TickContext::new(1, 1.0));
        assert_eq!(min_of(&store, bullet), Vec2::new(-3.0, 0.0));
    }

    #[test]
    fn test_walls_come_from_refreshed_cache() {
        let mut store = Store::new();
        let e = tank(&mut store, Vec2::ZERO, Vec2::new(1.0, 0.0));
        let mut system = Process::new(MovementSystem::new(world()));
        system.refresh_list(&store);

        // Attached without a notification, so the cached wall list misses it.
        let wall = store.create_identity();
        store.add_component(wall, Wall, false);
        store.add_component(wall, Spatial::new(Rect::new(Vec2::new(1.5, 0.0), Vec2::ONE)), false);
        system.tick(&mut store, &TickContext::new(1, 1.0));
        assert_eq!(min_of(&store, e), Vec2::new(1.0, 0.0));

        store.notify();
        system.refresh_list(&store);
        system.tick(&mut store, &TickContext::new(2, 1.0));
        assert_eq!(min_of(&store, e), Vec2::new(1.0, 0.0));
    }
}
