//! System registry — subscription, refresh, and per-tick driving.
//!
//! Systems are kept in registration order. Each slot remembers the store
//! stamp (id and version) its system last refreshed at. Whenever the store
//! has published a newer version, or a different store is passed in, the
//! system's [`System::refresh_list`] runs before it is ticked again. One
//! notification therefore costs each subscriber at most one
//! refresh, however many silent mutations preceded it.

use std::fmt;

use tank_component::{Store, StoreStamp};
use tracing::{debug, trace};
use uuid::Uuid;

use crate::context::TickContext;
use crate::error::SystemError;
use crate::system::System;

/// Unique identifier of a registered system instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SystemId(Uuid);

impl SystemId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Lifecycle of a registered system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemState {
    /// Registered, cache not yet built.
    Constructed,
    /// Cache built, not yet ticked.
    Refreshed,
    /// Ticked at least once.
    Ticking,
    /// Cache released; no longer refreshed or ticked.
    CleanedUp,
}

struct SystemSlot {
    id: SystemId,
    state: SystemState,
    /// Store and version at the last refresh.
    seen: Option<StoreStamp>,
    refreshes: u64,
    system: Box<dyn System>,
}

impl SystemSlot {
    fn is_stale(&self, store: &Store) -> bool {
        self.state != SystemState::CleanedUp && self.seen != Some(store.stamp())
    }

    fn refresh(&mut self, store: &Store) {
        self.system.refresh_list(store);
        self.seen = Some(store.stamp());
        self.refreshes += 1;
        if self.state == SystemState::Constructed {
            self.state = SystemState::Refreshed;
        }
        trace!(
            system = self.system.name(),
            id = %self.id,
            version = store.version(),
            "refreshed system"
        );
    }
}

/// Registry of every system subscribed to a store, in registration order.
#[derive(Default)]
pub struct SystemRegistry {
    systems: Vec<SystemSlot>,
}

impl SystemRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a system and build its initial cache.
    pub fn register<S: System + 'static>(&mut self, system: S, store: &Store) -> SystemId {
        self.register_boxed(Box::new(system), store)
    }

    /// Subscribe an already boxed system and build its initial cache.
    pub fn register_boxed(&mut self, system: Box<dyn System>, store: &Store) -> SystemId {
        let id = SystemId::new();
        let mut slot = SystemSlot {
            id,
            state: SystemState::Constructed,
            seen: None,
            refreshes: 0,
            system,
        };
        slot.refresh(store);
        debug!(system = slot.system.name(), %id, "registered system");
        self.systems.push(slot);
        id
    }

    /// Refresh every subscribed system whose cache predates the store's
    /// current version, in registration order.
    ///
    /// Returns how many systems were refreshed.
    pub fn sync(&mut self, store: &Store) -> usize {
        let mut refreshed = 0;
        for slot in &mut self.systems {
            if slot.is_stale(store) {
                slot.refresh(store);
                refreshed += 1;
            }
        }
        refreshed
    }

    /// Tick every active system once, in registration order.
    ///
    /// Each system is brought up to date with the store immediately before
    /// its tick, so it sees notifications published by systems ticked earlier
    /// in the same pass.
    pub fn tick_all(&mut self, store: &mut Store, ctx: &TickContext) {
        for slot in &mut self.systems {
            if slot.state == SystemState::CleanedUp {
                continue;
            }
            if slot.is_stale(store) {
                slot.refresh(store);
            }
            slot.state = SystemState::Ticking;
            slot.system.tick(store, ctx);
        }
    }

    /// Release a system's cache and stop refreshing and ticking it.
    ///
    /// # Errors
    ///
    /// [`SystemError::UnknownSystem`] if `id` is not registered.
    pub fn clean_up(&mut self, id: SystemId) -> Result<(), SystemError> {
        let slot = self
            .systems
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(SystemError::UnknownSystem(id))?;
        Self::clean_up_slot(slot);
        Ok(())
    }

    /// Clean up every registered system.
    pub fn clean_up_all(&mut self) {
        for slot in &mut self.systems {
            Self::clean_up_slot(slot);
        }
    }

    fn clean_up_slot(slot: &mut SystemSlot) {
        if slot.state == SystemState::CleanedUp {
            return;
        }
        slot.system.clean_up();
        slot.state = SystemState::CleanedUp;
        slot.seen = None;
        debug!(system = slot.system.name(), id = %slot.id, "cleaned up system");
    }

    /// Remove a system from the registry entirely, returning it.
    ///
    /// # Errors
    ///
    /// [`SystemError::UnknownSystem`] if `id` is not registered.
    pub fn unregister(&mut self, id: SystemId) -> Result<Box<dyn System>, SystemError> {
        let pos = self
            .systems
            .iter()
            .position(|s| s.id == id)
            .ok_or(SystemError::UnknownSystem(id))?;
        let slot = self.systems.remove(pos);
        debug!(system = slot.system.name(), %id, "unregistered system");
        Ok(slot.system)
    }

    /// The lifecycle state of a system.
    #[must_use]
    pub fn state(&self, id: SystemId) -> Option<SystemState> {
        self.slot(id).map(|s| s.state)
    }

    /// How many times a system's cache has been rebuilt, including the
    /// initial build at registration.
    #[must_use]
    pub fn refresh_count(&self, id: SystemId) -> Option<u64> {
        self.slot(id).map(|s| s.refreshes)
    }

    /// System names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.systems.iter().map(|s| s.system.name())
    }

    /// Returns the number of registered systems.
    #[must_use]
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    /// Returns `true` if no systems are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    fn slot(&self, id: SystemId) -> Option<&SystemSlot> {
        self.systems.iter().find(|s| s.id == id)
    }
}

impl fmt::Debug for SystemRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
