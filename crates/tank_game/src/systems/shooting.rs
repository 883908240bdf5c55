use tank_component::{Entity, Query, Store};
use tank_math::Vec2;
use tank_system::{ProcessSystem, TickContext};
use tracing::trace;

use crate::components::{Spatial, Weapon};
use crate::templates::{self, BULLET_SIZE};

/// Counts down weapon cooldowns and fires bullets for held triggers.
#[derive(Debug, Default)]
pub struct ShootingSystem {
    shots_fired: u64,
}

impl ShootingSystem {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bullets fired since the system was created.
    #[must_use]
    pub fn shots_fired(&self) -> u64 {
        self.shots_fired
    }
}

impl ProcessSystem for ShootingSystem {
    fn name(&self) -> &str {
        "shooting"
    }

    fn query(&self) -> Query {
        Query::all_of().with::<Spatial>().with::<Weapon>()
    }

    fn process(&mut self, entity: Entity, store: &mut Store, ctx: &TickContext) {
        let Some(weapon) = store.get_component_mut::<Weapon>(entity) else {
            return;
        };
        weapon.remaining = (weapon.remaining - ctx.dt_f32()).max(0.0);
        if !weapon.trigger || !weapon.ready() || weapon.aim == Vec2::ZERO {
            return;
        }
        weapon.remaining = weapon.cooldown;
        let gun = *weapon;

        let Some(spatial) = store.get_component::<Spatial>(entity) else {
            return;
        };
        // Spawn just outside the shooter's bounds.
        let reach = spatial.rect.size.max_element() * 0.5 + BULLET_SIZE;
        let origin = spatial.center() + gun.aim * reach;

        let bullet = templates::spawn_bullet(store, entity, origin, gun.aim, &gun);
        self.shots_fired += 1;
        trace!(shooter = %entity, %bullet, tick_id = ctx.tick_id, "fired");
    }
}
