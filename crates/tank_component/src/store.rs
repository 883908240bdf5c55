//! The component store — single owner of entity identities and component data.
//!
//! The [`Store`] answers every query systems make and is the only path through
//! which component data is added or removed. It does not call back into
//! systems: a notifying mutation advances [`Store::version`], and subscribers
//! compare the store's [`StoreStamp`] against the one they last refreshed at.
//! The stamp carries the store's id, so a cache built against one store is
//! never mistaken for a fresh cache of another store at the same version.

use std::any::TypeId;
use std::collections::{HashMap, HashSet};
use std::fmt;

use tracing::{debug, trace, warn};
use uuid::Uuid;

use crate::bundle::Bundle;
use crate::component::{Component, ComponentTypeId};
use crate::entity::{Entity, EntityAllocator};
use crate::error::StoreError;
use crate::handle::{EntityMut, EntityRef};
use crate::storage::{ErasedStorage, SparseSet};

/// Unique identifier of a [`Store`] instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StoreId(Uuid);

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A published version of one particular store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StoreStamp {
    pub store: StoreId,
    pub version: u64,
}

/// Registry of entities and their components.
pub struct Store {
    id: StoreId,
    allocator: EntityAllocator,
    /// Live registry: entities that have received a component, in insertion
    /// order.
    live: Vec<Entity>,
    live_set: HashSet<Entity>,
    storages: HashMap<TypeId, Box<dyn ErasedStorage>>,
    /// Published version; bumped once per notification.
    version: u64,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            id: StoreId(Uuid::new_v4()),
            allocator: EntityAllocator::default(),
            live: Vec::new(),
            live_set: HashSet::new(),
            storages: HashMap::new(),
            version: 0,
        }
    }
}

impl Store {
    /// Create an empty store with a fresh id.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// This store's id. Fixed for the store's lifetime, including across
    /// [`clear_all`](Self::clear_all).
    #[must_use]
    pub fn id(&self) -> StoreId {
        self.id
    }

    // -- Identity --

    /// Mint a fresh entity identity.
    ///
    /// The identity joins the live registry only once it receives a component.
    pub fn create_identity(&mut self) -> Entity {
        self.allocator.allocate()
    }

    /// Mint a fresh identity and return a mutable handle to it.
    pub fn spawn(&mut self) -> EntityMut<'_> {
        let entity = self.create_identity();
        EntityMut::new(self, entity)
    }

    /// Mint an identity and attach a bundle of components with one
    /// notification.
    pub fn spawn_bundle<B: Bundle>(&mut self, bundle: B) -> Entity {
        let entity = self.create_identity();
        bundle.insert_into(self, entity);
        self.notify();
        entity
    }

    /// Borrow a read-only handle for `entity`.
    #[must_use]
    pub fn entity(&self, entity: Entity) -> EntityRef<'_> {
        EntityRef::new(self, entity)
    }

    /// Borrow a mutable handle for `entity`.
    pub fn entity_mut(&mut self, entity: Entity) -> EntityMut<'_> {
        EntityMut::new(self, entity)
    }

    /// Returns `true` if `entity` was allocated by this store and not removed.
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.allocator.is_alive(entity)
    }

    // -- Mutation --

    /// Attach `component` to `entity`, replacing any earlier component of the
    /// same type. The replaced value is returned.
    ///
    /// With `notify == false` subscribers are not told about the change; use
    /// that to batch several attachments behind a single notification.
    ///
    /// Attaching to a dead identity is ignored (and logged).
    pub fn add_component<T: Component>(
        &mut self,
        entity: Entity,
        component: T,
        notify: bool,
    ) -> Option<T> {
        if !self.allocator.is_alive(entity) {
            warn!(
                %entity,
                component = T::type_name(),
                "ignoring component added to dead entity"
            );
            return None;
        }

        let previous = self.storage_mut::<T>().insert(entity, component);
        if self.live_set.insert(entity) {
            self.live.push(entity);
        }
        trace!(%entity, component = T::type_name(), replaced = previous.is_some(), "added component");

        if notify {
            self.notify();
        }
        previous
    }

    /// Detach the `T` component from `entity`, returning it if present.
    ///
    /// The entity stays in the live registry even when this was its last
    /// component. Subscribers are not notified.
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> Option<T> {
        let removed = self.storage_typed_mut::<T>()?.remove(entity);
        if removed.is_some() {
            trace!(%entity, component = T::type_name(), "removed component");
        }
        removed
    }

    /// Detach every component from `entity`, drop it from the live registry,
    /// free its identity, and notify subscribers.
    ///
    /// Returns `true` if the entity was alive.
    pub fn remove_entity(&mut self, entity: Entity) -> bool {
        let mut detached = 0usize;
        for storage in self.storages.values_mut() {
            if storage.remove_entity(entity) {
                detached += 1;
            }
        }
        if self.live_set.remove(&entity) {
            self.live.retain(|&e| e != entity);
        }
        let was_alive = self.allocator.deallocate(entity);
        debug!(%entity, detached, was_alive, "removed entity");

        self.notify();
        was_alive
    }

    /// Empty the live registry and every component storage, free every
    /// identity, and notify subscribers. The store itself stays usable.
    pub fn clear_all(&mut self) {
        let entities = self.live.len();
        for storage in self.storages.values_mut() {
            storage.clear();
        }
        self.live.clear();
        self.live_set.clear();
        self.allocator.deallocate_all();
        debug!(entities, "cleared store");

        self.notify();
    }

    /// Publish all mutations made since the last notification.
    pub fn notify(&mut self) {
        self.version += 1;
        trace!(version = self.version, "store notification");
    }

    /// The published version. Changes exactly once per notification.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// The store's id paired with its published version. Subscribers compare
    /// stamps to decide whether their cache is stale.
    #[must_use]
    pub fn stamp(&self) -> StoreStamp {
        StoreStamp {
            store: self.id,
            version: self.version,
        }
    }

    // -- Lookup --

    /// Borrow the `T` component of `entity`, if attached.
    #[must_use]
    pub fn get_component<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.storage_typed::<T>()?.get(entity)
    }

    /// Mutably borrow the `T` component of `entity`, if attached.
    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.storage_typed_mut::<T>()?.get_mut(entity)
    }

    /// Like [`get_component`](Self::get_component), but treats absence as an
    /// error the caller must handle. Absence is logged.
    ///
    /// # Errors
    ///
    /// [`StoreError::DeadEntity`] if the identity is not alive,
    /// [`StoreError::MissingComponent`] if no `T` is attached.
    pub fn require_component<T: Component>(&self, entity: Entity) -> Result<&T, StoreError> {
        if !self.allocator.is_alive(entity) {
            debug!(%entity, component = T::type_name(), "required component on dead entity");
            return Err(StoreError::DeadEntity(entity));
        }
        self.get_component::<T>(entity).ok_or_else(|| {
            debug!(%entity, component = T::type_name(), "required component missing");
            StoreError::MissingComponent {
                entity,
                component: T::type_name(),
            }
        })
    }

    /// Returns `true` if `entity` has a `T` component.
    #[must_use]
    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.has_type(entity, ComponentTypeId::of::<T>())
    }

    /// Returns `true` if `entity` has a component of the given type.
    #[must_use]
    pub fn has_type(&self, entity: Entity, ty: ComponentTypeId) -> bool {
        self.storages
            .get(&ty.type_id())
            .is_some_and(|s| s.contains(entity))
    }

    /// Every component currently attached to `entity`, in unspecified order.
    #[must_use]
    pub fn get_all_components(&self, entity: Entity) -> Vec<&dyn Component> {
        self.storages
            .values()
            .filter_map(|s| s.get_dyn(entity))
            .collect()
    }

    /// Returns `true` if `entity` is in the live registry.
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.live_set.contains(&entity)
    }

    /// The live registry, in insertion order.
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.live
    }

    /// Number of entities in the live registry.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.live.len()
    }

    /// Number of `T` components stored.
    #[must_use]
    pub fn component_count<T: Component>(&self) -> usize {
        self.storages
            .get(&TypeId::of::<T>())
            .map_or(0, |s| s.len())
    }

    // -- Query --

    /// Entities that have a component for **every** type in `types`, in
    /// live-registry order. An empty `types` matches every live entity.
    #[must_use]
    pub fn get_entities_with_all(&self, types: &[ComponentTypeId]) -> Vec<Entity> {
        let storages: Option<Vec<&dyn ErasedStorage>> = types
            .iter()
            .map(|ty| self.storages.get(&ty.type_id()).map(|s| &**s))
            .collect();
        // A type that was never stored cannot be matched.
        let Some(storages) = storages else {
            return Vec::new();
        };

        self.live
            .iter()
            .copied()
            .filter(|&e| storages.iter().all(|s| s.contains(e)))
            .collect()
    }

    /// Entities that have a component for **at least one** type in `types`.
    ///
    /// This is a plain union with no deduplication: an entity owning two of
    /// the requested types appears twice. Results are grouped by requested
    /// type (in argument order), each group in live-registry order.
    #[must_use]
    pub fn get_entities_with_any(&self, types: &[ComponentTypeId]) -> Vec<Entity> {
        let mut result = Vec::new();
        for ty in types {
            if let Some(storage) = self.storages.get(&ty.type_id()) {
                result.extend(self.live.iter().copied().filter(|&e| storage.contains(e)));
            }
        }
        result
    }

    /// Like [`get_entities_with_any`](Self::get_entities_with_any) but each
    /// entity appears once, in live-registry order.
    #[must_use]
    pub fn get_entities_with_any_distinct(&self, types: &[ComponentTypeId]) -> Vec<Entity> {
        let storages: Vec<&dyn ErasedStorage> = types
            .iter()
            .filter_map(|ty| self.storages.get(&ty.type_id()).map(|s| &**s))
            .collect();

        self.live
            .iter()
            .copied()
            .filter(|&e| storages.iter().any(|s| s.contains(e)))
            .collect()
    }

    // -- Storage access --

    fn storage_typed<T: Component>(&self) -> Option<&SparseSet<T>> {
        self.storages
            .get(&TypeId::of::<T>())
            .and_then(|s| s.as_any().downcast_ref::<SparseSet<T>>())
    }

    fn storage_typed_mut<T: Component>(&mut self) -> Option<&mut SparseSet<T>> {
        self.storages
            .get_mut(&TypeId::of::<T>())
            .and_then(|s| s.as_any_mut().downcast_mut::<SparseSet<T>>())
    }

    fn storage_mut<T: Component>(&mut self) -> &mut SparseSet<T> {
        let storage = self
            .storages
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(SparseSet::<T>::new()));
        match storage.as_any_mut().downcast_mut::<SparseSet<T>>() {
            Some(set) => set,
            None => unreachable!("storage keyed by TypeId holds a different type"),
        }
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("id", &self.id)
            .field("entities", &self.live.len())
            .field("component_types", &self.storages.len())
            .field("version", &self.version)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::type_ids;

    #[derive(Debug, Clone, PartialEq)]
    struct Spatial {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
    }

    impl Spatial {
        fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
            Self { x, y, w, h }
        }
    }

    impl Component for Spatial {
        fn type_name() -> &'static str {
            "Spatial"
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Health(u32);

    impl Component for Health {
        fn type_name() -> &'static str {
            "Health"
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Velocity(f32, f32);

    impl Component for Velocity {
        fn type_name() -> &'static str {
            "Velocity"
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct TypeA;

    impl Component for TypeA {
        fn type_name() -> &'static str {
            "TypeA"
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct TypeB;

    impl Component for TypeB {
        fn type_name() -> &'static str {
            "TypeB"
        }
    }

    #[test]
    fn test_create_identity_is_unique() {
        let mut store = Store::new();
        let a = store.create_identity();
        let b = store.create_identity();
        assert_ne!(a, b);
        assert!(store.is_alive(a));
        // No component yet, so not in the live registry.
        assert!(!store.contains(a));
    }

    #[test]
    fn test_add_replaces_same_type() {
        let mut store = Store::new();
        let e = store.create_identity();
        assert_eq!(store.add_component(e, Health(100), true), None);
        assert_eq!(store.add_component(e, Health(50), true), Some(Health(100)));

        assert_eq!(store.get_component::<Health>(e), Some(&Health(50)));
        assert_eq!(store.component_count::<Health>(), 1);
        assert_eq!(store.get_all_components(e).len(), 1);
    }

    #[test]
    fn test_entity_registered_once() {
        let mut store = Store::new();
        let e = store.create_identity();
        store.add_component(e, Health(1), false);
        store.add_component(e, Velocity(0.0, 0.0), false);
        store.add_component(e, Health(2), false);
        assert_eq!(store.entities(), &[e]);
    }

    #[test]
    fn test_notify_flag_controls_version() {
        let mut store = Store::new();
        let e = store.create_identity();
        let v0 = store.version();

        store.add_component(e, Spatial::new(0.0, 0.0, 10.0, 10.0), false);
        assert_eq!(store.version(), v0);

        store.add_component(e, Health(100), true);
        assert_eq!(store.version(), v0 + 1);
    }

    #[test]
    fn test_scenario_a() {
        let mut store = Store::new();
        let id = store.create_identity();
        let v0 = store.version();

        store.add_component(id, Spatial::new(0.0, 0.0, 10.0, 10.0), false);
        store.add_component(id, Health(100), true);

        assert_eq!(store.version(), v0 + 1);
        assert_eq!(
            store.get_component::<Spatial>(id),
            Some(&Spatial::new(0.0, 0.0, 10.0, 10.0))
        );
        assert!(
            store
                .get_entities_with_all(&type_ids![Spatial, Health])
                .contains(&id)
        );
    }

    #[test]
    fn test_scenario_b_remove_entity() {
        let mut store = Store::new();
        let id = store.create_identity();
        store.add_component(id, Spatial::new(1.0, 2.0, 3.0, 4.0), false);
        store.add_component(id, Health(10), false);
        store.add_component(id, Velocity(1.0, 0.0), true);
        let v = store.version();

        assert!(store.remove_entity(id));

        assert!(store.get_all_components(id).is_empty());
        assert!(!store.contains(id));
        assert!(!store.is_alive(id));
        assert!(store.get_component::<Spatial>(id).is_none());
        assert!(store.get_component::<Health>(id).is_none());
        assert!(store.get_component::<Velocity>(id).is_none());
        assert_eq!(store.component_count::<Spatial>(), 0);
        assert_eq!(store.component_count::<Health>(), 0);
        assert_eq!(store.component_count::<Velocity>(), 0);
        // Removal always notifies.
        assert_eq!(store.version(), v + 1);
    }

    #[test]
    fn test_scenario_c_any_keeps_duplicates() {
        let mut store = Store::new();
        let e1 = store.create_identity();
        let e2 = store.create_identity();
        let e3 = store.create_identity();
        store.add_component(e1, TypeA, false);
        store.add_component(e2, TypeA, false);
        store.add_component(e2, TypeB, false);
        store.add_component(e3, Health(5), true);

        let result = store.get_entities_with_any(&type_ids![TypeA, TypeB]);
        assert_eq!(result.iter().filter(|&&e| e == e1).count(), 1);
        assert_eq!(result.iter().filter(|&&e| e == e2).count(), 2);
        assert!(!result.contains(&e3));
        assert_eq!(result, vec![e1, e2, e2]);

        let distinct = store.get_entities_with_any_distinct(&type_ids![TypeA, TypeB]);
        assert_eq!(distinct, vec![e1, e2]);
    }

    #[test]
    fn test_with_all_matches_exactly() {
        let mut store = Store::new();
        let both = store.create_identity();
        let only_spatial = store.create_identity();
        let only_health = store.create_identity();
        store.add_component(only_spatial, Spatial::new(0.0, 0.0, 1.0, 1.0), false);
        store.add_component(both, Spatial::new(0.0, 0.0, 1.0, 1.0), false);
        store.add_component(both, Health(1), false);
        store.add_component(only_health, Health(1), true);

        let result = store.get_entities_with_all(&type_ids![Spatial, Health]);
        assert_eq!(result, vec![both]);

        for e in [both, only_spatial, only_health] {
            let has_all = store.has_component::<Spatial>(e) && store.has_component::<Health>(e);
            assert_eq!(result.contains(&e), has_all);
        }
    }

    #[test]
    fn test_with_all_follows_registry_order() {
        let mut store = Store::new();
        let first = store.create_identity();
        let second = store.create_identity();
        // `second` receives a component first, so it is registered first.
        store.add_component(second, Health(1), false);
        store.add_component(first, Health(1), false);

        assert_eq!(store.get_entities_with_all(&type_ids![Health]), vec![second, first]);
    }

    #[test]
    fn test_with_all_unknown_type_is_empty() {
        let mut store = Store::new();
        let e = store.create_identity();
        store.add_component(e, Health(1), true);
        assert!(store.get_entities_with_all(&type_ids![Health, Velocity]).is_empty());
        assert!(store.get_entities_with_any(&type_ids![Velocity]).is_empty());
    }

    #[test]
    fn test_with_all_empty_types_matches_live_registry() {
        let mut store = Store::new();
        let e = store.create_identity();
        store.add_component(e, Health(1), true);
        assert_eq!(store.get_entities_with_all(&[]), vec![e]);
    }

    #[test]
    fn test_queries_are_deterministic() {
        let mut store = Store::new();
        for i in 0..20 {
            let e = store.create_identity();
            store.add_component(e, Health(i), false);
            if i % 3 == 0 {
                store.add_component(e, Velocity(0.0, 0.0), false);
            }
        }
        store.notify();

        let types = type_ids![Health, Velocity];
        assert_eq!(store.get_entities_with_all(&types), store.get_entities_with_all(&types));
        assert_eq!(store.get_entities_with_any(&types), store.get_entities_with_any(&types));
    }

    #[test]
    fn test_remove_component_is_silent_when_absent() {
        let mut store = Store::new();
        let e = store.create_identity();
        assert_eq!(store.remove_component::<Health>(e), None);

        store.add_component(e, Velocity(1.0, 1.0), true);
        assert_eq!(store.remove_component::<Health>(e), None);
        assert_eq!(store.remove_component::<Velocity>(e), Some(Velocity(1.0, 1.0)));
    }

    #[test]
    fn test_entity_stays_registered_after_last_component_removed() {
        let mut store = Store::new();
        let e = store.create_identity();
        store.add_component(e, Health(3), true);
        store.remove_component::<Health>(e);

        assert!(store.contains(e));
        assert!(store.get_all_components(e).is_empty());
    }

    #[test]
    fn test_get_mut_writes_through() {
        let mut store = Store::new();
        let e = store.create_identity();
        store.add_component(e, Health(100), true);
        if let Some(h) = store.get_component_mut::<Health>(e) {
            h.0 -= 25;
        }
        assert_eq!(store.get_component::<Health>(e), Some(&Health(75)));
    }

    #[test]
    fn test_require_component() {
        let mut store = Store::new();
        let e = store.create_identity();
        store.add_component(e, Health(9), true);

        assert_eq!(store.require_component::<Health>(e), Ok(&Health(9)));
        assert_eq!(
            store.require_component::<Velocity>(e),
            Err(StoreError::MissingComponent {
                entity: e,
                component: "Velocity",
            })
        );

        store.remove_entity(e);
        assert_eq!(
            store.require_component::<Health>(e),
            Err(StoreError::DeadEntity(e))
        );
    }

    #[test]
    fn test_get_all_components_downcast() {
        let mut store = Store::new();
        let e = store.create_identity();
        store.add_component(e, Health(7), false);
        store.add_component(e, Velocity(2.0, 3.0), true);

        let all = store.get_all_components(e);
        assert_eq!(all.len(), 2);
        let health = all.iter().find_map(|c| c.downcast_ref::<Health>());
        assert_eq!(health, Some(&Health(7)));
        assert!(all.iter().any(|c| c.is::<Velocity>()));
    }

    #[test]
    fn test_dead_entity_is_ignored() {
        let mut store = Store::new();
        let e = store.create_identity();
        store.remove_entity(e);

        assert_eq!(store.add_component(e, Health(1), true), None);
        assert!(!store.contains(e));
        assert_eq!(store.component_count::<Health>(), 0);
    }

    #[test]
    fn test_recycled_identity_does_not_see_old_components() {
        let mut store = Store::new();
        let old = store.create_identity();
        store.add_component(old, Health(1), true);
        store.remove_entity(old);

        let new = store.create_identity();
        assert_eq!(new.index(), old.index());
        assert_ne!(new, old);
        assert!(store.get_component::<Health>(new).is_none());
        assert!(store.get_all_components(old).is_empty());
    }

    #[test]
    fn test_clear_all() {
        let mut store = Store::new();
        let a = store.create_identity();
        let b = store.create_identity();
        store.add_component(a, Health(1), false);
        store.add_component(b, Velocity(0.0, 0.0), true);
        let v = store.version();

        store.clear_all();

        assert_eq!(store.entity_count(), 0);
        assert!(!store.contains(a));
        assert!(!store.is_alive(b));
        assert!(store.get_entities_with_any(&type_ids![Health, Velocity]).is_empty());
        assert_eq!(store.version(), v + 1);

        // The store is still usable afterwards.
        let c = store.create_identity();
        store.add_component(c, Health(2), true);
        assert_eq!(store.entities(), &[c]);
    }

    #[test]
    fn test_spawn_bundle_notifies_once() {
        let mut store = Store::new();
        let v = store.version();
        let e = store.spawn_bundle((Spatial::new(0.0, 0.0, 1.0, 1.0), Health(10), Velocity(1.0, 0.0)));

        assert_eq!(store.version(), v + 1);
        assert_eq!(store.get_all_components(e).len(), 3);
        assert!(store.contains(e));
    }

    #[test]
    fn test_stamp_distinguishes_stores() {
        let mut a = Store::new();
        let mut b = Store::new();
        a.notify();
        b.notify();

        assert_eq!(a.version(), b.version());
        assert_ne!(a.id(), b.id());
        assert_ne!(a.stamp(), b.stamp());

        let id = a.id();
        a.clear_all();
        assert_eq!(a.id(), id);
        assert_eq!(a.stamp().version, 2);
    }
}
