//! Entity templates.
//!
//! Each template attaches its whole component set without notifying and
//! publishes once at the end, so subscribers refresh a single time per spawn.

use tank_component::{Entity, Store};
use tank_math::{Rect, Vec2};
use tracing::debug;

use crate::components::{
    Ai, Bullet, Damage, Enemy, Health, Lifetime, Player, Spatial, Velocity, Wall, Weapon,
};
use crate::config::TankConfig;

/// Edge length of a bullet's square.
pub const BULLET_SIZE: f32 = 0.2;

fn weapon(tank: &TankConfig) -> Weapon {
    Weapon {
        cooldown: tank.fire_cooldown,
        remaining: 0.0,
        bullet_speed: tank.bullet_speed,
        bullet_lifetime: tank.bullet_lifetime,
        damage: tank.bullet_damage,
        aim: Vec2::ZERO,
        trigger: false,
    }
}

/// Spawn the player's tank centred on `center`.
pub fn spawn_player(store: &mut Store, center: Vec2, tank: &TankConfig) -> Entity {
    let entity = store.spawn_bundle((
        Player,
        Spatial::new(Rect::from_center(center, Vec2::splat(tank.size))),
        Velocity::ZERO,
        Health::full(tank.health),
        weapon(tank),
    ));
    debug!(%entity, x = center.x, y = center.y, "spawned player");
    entity
}

/// Spawn an enemy tank centred on `center`.
pub fn spawn_enemy(store: &mut Store, center: Vec2, tank: &TankConfig) -> Entity {
    let entity = store.spawn_bundle((
        Enemy,
        Spatial::new(Rect::from_center(center, Vec2::splat(tank.size))),
        Velocity::ZERO,
        Health::full(tank.health),
        weapon(tank),
        Ai::default(),
    ));
    debug!(%entity, x = center.x, y = center.y, "spawned enemy");
    entity
}

/// Spawn a bullet fired by `owner` from `origin`, travelling along the unit
/// vector `direction`.
pub fn spawn_bullet(
    store: &mut Store,
    owner: Entity,
    origin: Vec2,
    direction: Vec2,
    weapon: &Weapon,
) -> Entity {
    let entity = store.spawn_bundle((
        Bullet { owner },
        Spatial::new(Rect::from_center(origin, Vec2::splat(BULLET_SIZE))),
        Velocity::new(direction * weapon.bullet_speed),
        Damage {
            amount: weapon.damage,
        },
        Lifetime {
            remaining: weapon.bullet_lifetime,
        },
    ));
    debug!(%entity, %owner, "spawned bullet");
    entity
}

/// Spawn a wall occupying `rect`.
pub fn spawn_wall(store: &mut Store, rect: Rect) -> Entity {
    store.spawn_bundle((Wall, Spatial::new(rect)))
}

#[cfg(test)]
mod tests {
    use tank_component::type_ids;

    use super::*;

    #[test]
    fn test_spawn_player_notifies_once() {
        let mut store = Store::new();
        let before = store.version();
        let player = spawn_player(&mut store, Vec2::new(3.0, 3.0), &TankConfig::player());

        assert_eq!(store.version(), before + 1);
        assert_eq!(store.get_all_components(player).len(), 5);
        let spatial = store.get_component::<Spatial>(player).unwrap();
        assert_eq!(spatial.center(), Vec2::new(3.0, 3.0));
        assert_eq!(
            store.get_component::<Health>(player),
            Some(&Health::full(TankConfig::player().health))
        );
    }

    #[test]
    fn test_spawn_enemy_has_ai() {
        let mut store = Store::new();
        let enemy = spawn_enemy(&mut store, Vec2::ONE, &TankConfig::enemy());
        assert_eq!(
            store.get_entities_with_all(&type_ids![Enemy, Ai, Spatial, Velocity]),
            vec![enemy]
        );
        assert!(!store.has_component::<Player>(enemy));
    }

    #[test]
    fn test_spawn_bullet() {
        let mut store = Store::new();
        let owner = spawn_player(&mut store, Vec2::ZERO, &TankConfig::player());
        let gun = *store.get_component::<Weapon>(owner).unwrap();
        let bullet = spawn_bullet(&mut store, owner, Vec2::ZERO, Vec2::X, &gun);

        assert_eq!(store.get_component::<Bullet>(bullet), Some(&Bullet { owner }));
        assert_eq!(
            store.get_component::<Velocity>(bullet),
            Some(&Velocity::new(Vec2::new(gun.bullet_speed, 0.0)))
        );
        assert_eq!(
            store.get_component::<Lifetime>(bullet).map(|l| l.remaining),
            Some(gun.bullet_lifetime)
        );
    }
}
