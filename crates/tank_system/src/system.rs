//! The [`System`] base trait and the one-entity-at-a-time [`ProcessSystem`]
//! variant.
//!
//! A system keeps a private cache of the entities it is interested in. The
//! cache is rebuilt by [`System::refresh_list`] whenever the store publishes
//! a new version, and read during [`System::tick`].

use tank_component::{Entity, Query, Store, StoreStamp};

use crate::context::TickContext;

/// A subscriber that maintains a cached interest set and runs once per tick.
///
/// Implement this directly for systems that are not "process each entity"
/// shaped, such as a HUD that summarises the whole world.
pub trait System {
    /// Human-readable system name, used in logs.
    fn name(&self) -> &str;

    /// Rebuild the cached interest set from `store`.
    ///
    /// Called once at registration and again after every notification.
    fn refresh_list(&mut self, store: &Store);

    /// Run one tick.
    fn tick(&mut self, store: &mut Store, ctx: &TickContext);

    /// Release the cached interest set. The system is not ticked afterwards.
    fn clean_up(&mut self);
}

/// The cached result of a system's query, stamped with the store and version
/// it was built at.
#[derive(Debug, Clone, Default)]
pub struct EntityCache {
    entities: Vec<Entity>,
    stamp: Option<StoreStamp>,
}

impl EntityCache {
    /// Create an empty cache that has never been built.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cached entities with `query`'s current result.
    pub fn rebuild(&mut self, store: &Store, query: &Query) {
        self.entities = query.run(store);
        self.stamp = Some(store.stamp());
    }

    /// Replace the cached entities with a result the caller computed from
    /// `store`.
    pub fn set(&mut self, entities: Vec<Entity>, store: &Store) {
        self.entities = entities;
        self.stamp = Some(store.stamp());
    }

    /// Returns `true` if `store` has published since the last rebuild, or if
    /// the cache was built from a different store.
    #[must_use]
    pub fn is_stale(&self, store: &Store) -> bool {
        self.stamp != Some(store.stamp())
    }

    /// The cached entities, in query order.
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// The store version the cache was built at.
    #[must_use]
    pub fn version(&self) -> Option<u64> {
        self.stamp.map(|s| s.version)
    }

    /// The store and version the cache was built at.
    #[must_use]
    pub fn stamp(&self) -> Option<StoreStamp> {
        self.stamp
    }

    /// Number of cached entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if no entities are cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Drop the cached entities and forget the version.
    pub fn clear(&mut self) {
        self.entities = Vec::new();
        self.stamp = None;
    }
}

/// A system that applies the same logic to each entity matching its query.
///
/// Wrap it in [`Process`] to register it.
pub trait ProcessSystem {
    /// Human-readable system name, used in logs.
    fn name(&self) -> &str;

    /// The interest set. Evaluated once when wrapped in [`Process`].
    fn query(&self) -> Query;

    /// Called after the main cache is rebuilt, on registration and after
    /// every notification. Rebuild any secondary caches here rather than
    /// querying the store from [`ProcessSystem::begin_tick`].
    fn refresh(&mut self, _store: &Store) {}

    /// Called once per tick before any entity is processed.
    fn begin_tick(&mut self, _store: &mut Store, _ctx: &TickContext) {}

    /// Apply the system's logic to one cached entity.
    ///
    /// The entity may have lost components (or been removed) earlier in the
    /// same tick; lookups return `None` in that case and the entity should be
    /// skipped.
    fn process(&mut self, entity: Entity, store: &mut Store, ctx: &TickContext);

    /// Called once per tick after every entity has been processed.
    fn end_tick(&mut self, _store: &mut Store, _ctx: &TickContext) {}
}

/// Adapts a [`ProcessSystem`] into a [`System`] that owns its cache.
#[derive(Debug)]
pub struct Process<P> {
    inner: P,
    query: Query,
    cache: EntityCache,
}

impl<P: ProcessSystem> Process<P> {
    /// Wrap a process system. The cache is empty until the first refresh.
    #[must_use]
    pub fn new(inner: P) -> Self {
        let query = inner.query();
        Self {
            inner,
            query,
            cache: EntityCache::new(),
        }
    }

    /// The wrapped system.
    #[must_use]
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// The wrapped system, mutably.
    pub fn inner_mut(&mut self) -> &mut P {
        &mut self.inner
    }

    /// The cached interest set.
    #[must_use]
    pub fn cache(&self) -> &EntityCache {
        &self.cache
    }
}

impl<P: ProcessSystem> System for Process<P> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn refresh_list(&mut self, store: &Store) {
        self.cache.rebuild(store, &self.query);
        self.inner.refresh(store);
    }

    fn tick(&mut self, store: &mut Store, ctx: &TickContext) {
        self.inner.begin_tick(store, ctx);
        for &entity in self.cache.entities() {
            self.inner.process(entity, store, ctx);
        }
        self.inner.end_tick(store, ctx);
    }

    fn clean_up(&mut self) {
        self.cache.clear();
    }
}
