use tank_component::{Entity, Query, Store};
use tank_system::{ProcessSystem, TickContext};
use tracing::trace;

use crate::components::Lifetime;

/// Removes entities whose [`Lifetime`] has run out.
#[derive(Debug, Default)]
pub struct LifetimeSystem {
    expired: u64,
}

impl LifetimeSystem {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Entities removed since the system was created.
    #[must_use]
    pub fn expired(&self) -> u64 {
        self.expired
    }
}

impl ProcessSystem for LifetimeSystem {
    fn name(&self) -> &str {
        "lifetime"
    }

    fn query(&self) -> Query {
        Query::all_of().with::<Lifetime>()
    }

    fn process(&mut self, entity: Entity, store: &mut Store, ctx: &TickContext) {
        let Some(lifetime) = store.get_component_mut::<Lifetime>(entity) else {
            return;
        };
        lifetime.remaining -= ctx.dt_f32();
        if lifetime.remaining <= 0.0 {
            store.remove_entity(entity);
            self.expired += 1;
            trace!(%entity, "lifetime expired");
        }
    }
}

#[cfg(test)]
mod tests {
    use tank_system::{Process, System};

    use super::*;

    #[test]
    fn test_expires_after_lifetime() {
        let mut store = Store::new();
        let short = store.spawn_bundle(Lifetime { remaining: 0.5 });
        let long = store.spawn_bundle(Lifetime { remaining: 2.0 });

        let mut system = Process::new(LifetimeSystem::new());
        system.refresh_list(&store);
        system.tick(&mut store, &TickContext::new(1, 0.5));

        assert!(!store.contains(short));
        assert!(store.contains(long));
        assert_eq!(system.inner().expired(), 1);
        assert_eq!(
            store.get_component::<Lifetime>(long),
            Some(&Lifetime { remaining: 1.5 })
        );
    }

    #[test]
    fn test_removed_entity_is_skipped_next_tick() {
        let mut store = Store::new();
        store.spawn_bundle(Lifetime { remaining: 0.1 });

        let mut system = Process::new(LifetimeSystem::new());
        system.refresh_list(&store);
        system.tick(&mut store, &TickContext::new(1, 1.0));
        // The stale cache still lists the removed entity; it must not count twice.
        system.tick(&mut store, &TickContext::new(2, 1.0));
        assert_eq!(system.inner().expired(), 1);
    }
}
