//! Game components.
//!
//! Plain data only. Behaviour lives in [`crate::systems`].

use tank_component::{Component, Entity};
use tank_math::{IVec2, Rect, Vec2};

macro_rules! component {
    ($($ty:ident),+ $(,)?) => {
        $(
            impl Component for $ty {
                fn type_name() -> &'static str {
                    stringify!($ty)
                }
            }
        )+
    };
}

component!(Spatial, Velocity, Health, Weapon, Lifetime, Damage, Player, Enemy, Bullet, Wall, Ai);

/// World-space bounds of an entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spatial {
    pub rect: Rect,
}

impl Spatial {
    #[must_use]
    pub fn new(rect: Rect) -> Self {
        Self { rect }
    }

    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.rect.center()
    }
}

/// Units per second.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity {
    pub linear: Vec2,
}

impl Velocity {
    pub const ZERO: Self = Self { linear: Vec2::ZERO };

    #[must_use]
    pub fn new(linear: Vec2) -> Self {
        Self { linear }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    pub current: i32,
    pub max: i32,
}

impl Health {
    #[must_use]
    pub fn full(max: i32) -> Self {
        Self { current: max, max }
    }

    /// Subtract `amount`, saturating at zero. Returns `true` if this hit was
    /// fatal.
    pub fn apply_damage(&mut self, amount: i32) -> bool {
        let was_alive = !self.is_dead();
        self.current = (self.current - amount).max(0);
        was_alive && self.is_dead()
    }

    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.current <= 0
    }
}

/// A gun. Fires one bullet along `aim` whenever `trigger` is held and the
/// cooldown has run out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weapon {
    /// Seconds between shots.
    pub cooldown: f32,
    /// Seconds until the next shot is allowed.
    pub remaining: f32,
    pub bullet_speed: f32,
    pub bullet_lifetime: f32,
    pub damage: i32,
    /// Unit direction, or zero when there is nothing to aim at.
    pub aim: Vec2,
    pub trigger: bool,
}

impl Weapon {
    #[must_use]
    pub fn ready(&self) -> bool {
        self.remaining <= 0.0
    }
}

/// Seconds until the entity is removed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lifetime {
    pub remaining: f32,
}

/// Damage dealt on impact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Damage {
    pub amount: i32,
}

/// Marks the player's tank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Player;

/// Marks an enemy tank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Enemy;

/// Marks a bullet. `owner` never takes damage from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bullet {
    pub owner: Entity,
}

/// Marks an impassable wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Wall;

/// Enemy steering state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ai {
    /// The entity being chased.
    pub target: Option<Entity>,
    /// Remaining waypoints, as grid cells, nearest first.
    pub path: Vec<IVec2>,
    /// Seconds until the path is recomputed.
    pub repath_in: f32,
}
