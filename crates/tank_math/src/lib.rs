//! # tank_math
//!
//! Math types for the tank game. Re-exports [`glam`] for linear algebra and
//! defines the axis-aligned [`Rect`] used for positions and collision.

pub mod rect;

// Re-export glam types for convenience.
pub use glam::{IVec2, Vec2};

pub use rect::Rect;
