use tank_component::{Query, Store};
use tank_system::{EntityCache, System, TickContext};
use tracing::info;

use crate::components::{Bullet, Enemy, Health, Player};

/// A snapshot of what the HUD would draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HudSummary {
    pub tick_id: u64,
    pub players: usize,
    pub enemies: usize,
    pub bullets: usize,
    /// Health of the first player, if one is alive.
    pub player_health: Option<i32>,
}

/// Logs a world summary every `interval` ticks in place of drawing.
#[derive(Debug)]
pub struct HudSystem {
    interval: u64,
    players: EntityCache,
    enemies: EntityCache,
    bullets: EntityCache,
    last: Option<HudSummary>,
}

impl HudSystem {
    /// `interval == 0` disables logging; the summary is still updated.
    #[must_use]
    pub fn new(interval: u64) -> Self {
        Self {
            interval,
            players: EntityCache::new(),
            enemies: EntityCache::new(),
            bullets: EntityCache::new(),
            last: None,
        }
    }

    /// The summary computed on the most recent tick.
    #[must_use]
    pub fn last(&self) -> Option<HudSummary> {
        self.last
    }
}

impl System for HudSystem {
    fn name(&self) -> &str {
        "hud"
    }

    fn refresh_list(&mut self, store: &Store) {
        self.players.rebuild(store, &Query::all_of().with::<Player>());
        self.enemies.rebuild(store, &Query::all_of().with::<Enemy>());
        self.bullets.rebuild(store, &Query::all_of().with::<Bullet>());
    }

    fn tick(&mut self, store: &mut Store, ctx: &TickContext) {
        let summary = HudSummary {
            tick_id: ctx.tick_id,
            players: self.players.len(),
            enemies: self.enemies.len(),
            bullets: self.bullets.len(),
            player_health: self
                .players
                .entities()
                .iter()
                .find_map(|&p| store.get_component::<Health>(p))
                .map(|h| h.current),
        };
        if self.interval > 0 && ctx.tick_id % self.interval == 0 {
            info!(
                tick_id = summary.tick_id,
                players = summary.players,
                enemies = summary.enemies,
                bullets = summary.bullets,
                player_health = ?summary.player_health,
                "hud"
            );
        }
        self.last = Some(summary);
    }

    fn clean_up(&mut self) {
        self.players.clear();
        self.enemies.clear();
        self.bullets.clear();
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use tank_math::Vec2;

    use super::*;
    use crate::config::TankConfig;
    use crate::templates;

    #[test]
    fn test_summary_counts() {
        let mut store = Store::new();
        let player = templates::spawn_player(&mut store, Vec2::ONE, &TankConfig::player());
        templates::spawn_enemy(&mut store, Vec2::splat(4.0), &TankConfig::enemy());
        templates::spawn_enemy(&mut store, Vec2::splat(6.0), &TankConfig::enemy());
        store.get_component_mut::<Health>(player).unwrap().current = 7;

        let mut hud = HudSystem::new(1);
        hud.refresh_list(&store);
        hud.tick(&mut store, &TickContext::new(3, 0.1));

        assert_eq!(
            hud.last(),
            Some(HudSummary {
                tick_id: 3,
                players: 1,
                enemies: 2,
                bullets: 0,
                player_health: Some(7),
            })
        );
    }

    #[test]
    fn test_no_player() {
        let mut store = Store::new();
        let mut hud = HudSystem::new(0);
        hud.refresh_list(&store);
        hud.tick(&mut store, &TickContext::new(1, 0.1));
        assert_eq!(hud.last().and_then(|s| s.player_health), None);

        hud.clean_up();
        assert_eq!(hud.last(), None);
    }
}
