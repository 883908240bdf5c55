//! Per-tick execution context provided to systems.

/// Context provided to every system on each tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickContext {
    /// The current tick ID (the first tick is 1).
    pub tick_id: u64,
    /// Delta time since the last tick, in seconds.
    pub dt: f64,
    /// Simulated time elapsed since the loop started, in seconds.
    pub elapsed: f64,
}

impl TickContext {
    /// Create a new context for a tick.
    #[must_use]
    pub fn new(tick_id: u64, dt: f64) -> Self {
        Self {
            tick_id,
            dt,
            elapsed: tick_id as f64 * dt,
        }
    }

    /// Delta time as `f32`, the precision game components use.
    #[must_use]
    pub fn dt_f32(&self) -> f32 {
        self.dt as f32
    }
}
