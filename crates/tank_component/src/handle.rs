//! Entity handles — an [`Entity`] paired with a borrow of its owning [`Store`].
//!
//! Handles own no component data; every call delegates to the store. Two
//! handles are equal when they wrap the same entity value.

use crate::component::Component;
use crate::entity::Entity;
use crate::error::StoreError;
use crate::store::Store;

/// Read-only handle to an entity.
#[derive(Clone, Copy)]
pub struct EntityRef<'s> {
    store: &'s Store,
    entity: Entity,
}

impl<'s> EntityRef<'s> {
    pub(crate) fn new(store: &'s Store, entity: Entity) -> Self {
        Self { store, entity }
    }

    /// The wrapped identity.
    #[must_use]
    pub fn id(&self) -> Entity {
        self.entity
    }

    /// Borrow the `T` component, if attached.
    #[must_use]
    pub fn get<T: Component>(&self) -> Option<&'s T> {
        self.store.get_component::<T>(self.entity)
    }

    /// Borrow the `T` component, treating absence as an error.
    ///
    /// # Errors
    ///
    /// See [`Store::require_component`].
    pub fn require<T: Component>(&self) -> Result<&'s T, StoreError> {
        self.store.require_component::<T>(self.entity)
    }

    /// Returns `true` if a `T` component is attached.
    #[must_use]
    pub fn has<T: Component>(&self) -> bool {
        self.store.has_component::<T>(self.entity)
    }

    /// All attached components.
    #[must_use]
    pub fn components(&self) -> Vec<&'s dyn Component> {
        self.store.get_all_components(self.entity)
    }

    /// Returns `true` if the entity is in the store's live registry.
    #[must_use]
    pub fn is_registered(&self) -> bool {
        self.store.contains(self.entity)
    }
}

impl PartialEq for EntityRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.entity == other.entity
    }
}

impl Eq for EntityRef<'_> {}

impl PartialEq<Entity> for EntityRef<'_> {
    fn eq(&self, other: &Entity) -> bool {
        self.entity == *other
    }
}

impl std::fmt::Debug for EntityRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("EntityRef").field(&self.entity).finish()
    }
}

/// Mutable handle to an entity.
pub struct EntityMut<'s> {
    store: &'s mut Store,
    entity: Entity,
}

impl<'s> EntityMut<'s> {
    pub(crate) fn new(store: &'s mut Store, entity: Entity) -> Self {
        Self { store, entity }
    }

    /// The wrapped identity.
    #[must_use]
    pub fn id(&self) -> Entity {
        self.entity
    }

    /// Attach a component, optionally notifying subscribers. Returns the
    /// replaced component of the same type, if any.
    pub fn add<T: Component>(&mut self, component: T, notify: bool) -> Option<T> {
        self.store.add_component(self.entity, component, notify)
    }

    /// Attach a component without notifying, builder style.
    pub fn insert<T: Component>(&mut self, component: T) -> &mut Self {
        self.store.add_component(self.entity, component, false);
        self
    }

    /// Publish everything attached so far.
    pub fn notify(&mut self) -> &mut Self {
        self.store.notify();
        self
    }

    /// Detach the `T` component, returning it if present.
    pub fn remove<T: Component>(&mut self) -> Option<T> {
        self.store.remove_component::<T>(self.entity)
    }

    /// Borrow the `T` component, if attached.
    #[must_use]
    pub fn get<T: Component>(&self) -> Option<&T> {
        self.store.get_component::<T>(self.entity)
    }

    /// Mutably borrow the `T` component, if attached.
    pub fn get_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.store.get_component_mut::<T>(self.entity)
    }

    /// Returns `true` if a `T` component is attached.
    #[must_use]
    pub fn has<T: Component>(&self) -> bool {
        self.store.has_component::<T>(self.entity)
    }

    /// All attached components.
    #[must_use]
    pub fn components(&self) -> Vec<&dyn Component> {
        self.store.get_all_components(self.entity)
    }

    /// Returns `true` if the entity is in the store's live registry.
    #[must_use]
    pub fn is_registered(&self) -> bool {
        self.store.contains(self.entity)
    }

    /// Remove the entity and everything attached to it.
    pub fn despawn(self) -> bool {
        self.store.remove_entity(self.entity)
    }

    /// Downgrade to a read-only handle.
    #[must_use]
    pub fn as_readonly(&self) -> EntityRef<'_> {
        EntityRef::new(self.store, self.entity)
    }
}

impl PartialEq<Entity> for EntityMut<'_> {
    fn eq(&self, other: &Entity) -> bool {
        self.entity == *other
    }
}

impl std::fmt::Debug for EntityMut<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("EntityMut").field(&self.entity).finish()
    }
}
