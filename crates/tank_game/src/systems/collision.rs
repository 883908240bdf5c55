use tank_component::{Entity, Query, Store};
use tank_math::Rect;
use tank_system::{EntityCache, System, TickContext};
use tracing::{debug, info};

use crate::components::{Bullet, Damage, Enemy, Health, Spatial};

/// Resolves bullet impacts.
///
/// A bullet is removed when it leaves the world, hits a wall, or hits a
/// [`Health`] holder other than its owner. Enemies do not damage each other.
/// Anything whose health reaches zero is removed at the end of the tick.
#[derive(Debug)]
pub struct CollisionSystem {
    bounds: Rect,
    bullets: EntityCache,
    targets: EntityCache,
    walls: EntityCache,
    kills: u64,
}

impl CollisionSystem {
    #[must_use]
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            bullets: EntityCache::new(),
            targets: EntityCache::new(),
            walls: EntityCache::new(),
            kills: 0,
        }
    }

    /// Entities destroyed by bullets since the system was created.
    #[must_use]
    pub fn kills(&self) -> u64 {
        self.kills
    }

    fn rect_of(store: &Store, entity: Entity) -> Option<Rect> {
        store.get_component::<Spatial>(entity).map(|s| s.rect)
    }

    fn hits_wall(&self, store: &Store, rect: &Rect) -> bool {
        self.walls
            .entities()
            .iter()
            .filter_map(|&w| Self::rect_of(store, w))
            .any(|w| w.intersects(rect))
    }

    /// The first target `bullet` overlaps, skipping its owner and allies.
    fn find_victim(&self, store: &Store, bullet: Entity, rect: &Rect) -> Option<Entity> {
        let owner = store.get_component::<Bullet>(bullet)?.owner;
        let owner_is_enemy = store.has_component::<Enemy>(owner);
        self.targets.entities().iter().copied().find(|&target| {
            target != owner
                && !(owner_is_enemy && store.has_component::<Enemy>(target))
                && store
                    .get_component::<Health>(target)
                    .is_some_and(|h| !h.is_dead())
                && Self::rect_of(store, target).is_some_and(|r| r.intersects(rect))
        })
    }
}

impl System for CollisionSystem {
    fn name(&self) -> &str {
        "collision"
    }

    fn refresh_list(&mut self, store: &Store) {
        self.bullets.rebuild(
            store,
            &Query::all_of()
                .with::<Bullet>()
                .with::<Spatial>()
                .with::<Damage>(),
        );
        self.targets
            .rebuild(store, &Query::all_of().with::<Health>().with::<Spatial>());
        self.walls.rebuild(store, &super::walls_query());
    }

    fn tick(&mut self, store: &mut Store, ctx: &TickContext) {
        let mut spent = Vec::new();
        let mut dead = Vec::new();

        for &bullet in self.bullets.entities() {
            let Some(rect) = Self::rect_of(store, bullet) else {
                continue;
            };
            if !self.bounds.intersects(&rect) || self.hits_wall(store, &rect) {
                spent.push(bullet);
                continue;
            }
            let Some(victim) = self.find_victim(store, bullet, &rect) else {
                continue;
            };
            let amount = store.get_component::<Damage>(bullet).map_or(0, |d| d.amount);
            spent.push(bullet);
            if let Some(health) = store.get_component_mut::<Health>(victim) {
                let fatal = health.apply_damage(amount);
                debug!(%bullet, %victim, amount, remaining = health.current, "hit");
                if fatal {
                    dead.push(victim);
                }
            }
        }

        for bullet in spent {
            store.remove_entity(bullet);
        }
        for victim in dead {
            info!(%victim, tick_id = ctx.tick_id, "destroyed");
            store.remove_entity(victim);
            self.kills += 1;
        }
    }

    fn clean_up(&mut self) {
        self.bullets.clear();
        self.targets.clear();
        self.walls.clear();
    }
}
