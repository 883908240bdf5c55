//! Per-type component storage.
//!
//! Each component type gets one [`SparseSet`]: a dense, contiguous array of
//! values plus a sparse slot table indexed by [`Entity::index`]. Lookups are
//! O(1); removal swaps the last element into the hole so the dense array
//! stays packed.

use std::any::Any;

use crate::component::Component;
use crate::entity::Entity;

const EMPTY: u32 = u32::MAX;

/// Type-erased interface over a [`SparseSet`], used by the store for
/// operations that span every component type.
pub(crate) trait ErasedStorage {
    /// Remove the entity's component, dropping it. Returns `true` if present.
    fn remove_entity(&mut self, entity: Entity) -> bool;
    fn contains(&self, entity: Entity) -> bool;
    fn get_dyn(&self, entity: Entity) -> Option<&dyn Component>;
    fn clear(&mut self);
    fn len(&self) -> usize;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Sparse-set storage for components of type `T`.
#[derive(Debug)]
pub struct SparseSet<T> {
    /// `sparse[entity.index]` is the dense position, or [`EMPTY`].
    sparse: Vec<u32>,
    /// Owning entity of each dense slot, parallel to `data`.
    entities: Vec<Entity>,
    data: Vec<T>,
}

impl<T> Default for SparseSet<T> {
    fn default() -> Self {
        Self {
            sparse: Vec::new(),
            entities: Vec::new(),
            data: Vec::new(),
        }
    }
}

impl<T> SparseSet<T> {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn dense_index(&self, entity: Entity) -> Option<usize> {
        let pos = *self.sparse.get(entity.index() as usize)?;
        if pos == EMPTY {
            return None;
        }
        let pos = pos as usize;
        // A recycled slot keeps its sparse entry only until the old generation
        // is removed, so compare the full entity.
        (self.entities[pos] == entity).then_some(pos)
    }

    /// Returns `true` if `entity` has a value in this set.
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.dense_index(entity).is_some()
    }

    /// Insert or replace the value for `entity`, returning the previous one.
    pub fn insert(&mut self, entity: Entity, value: T) -> Option<T> {
        if let Some(pos) = self.dense_index(entity) {
            return Some(std::mem::replace(&mut self.data[pos], value));
        }

        let slot = entity.index() as usize;
        if let Some(&pos) = self.sparse.get(slot)
            && pos != EMPTY
        {
            // Leftover value from an older generation of this slot.
            let stale = self.entities[pos as usize];
            self.remove(stale);
        }
        if slot >= self.sparse.len() {
            self.sparse.resize(slot + 1, EMPTY);
        }
        self.sparse[slot] = self.data.len() as u32;
        self.entities.push(entity);
        self.data.push(value);
        None
    }

    /// Remove and return the value for `entity`.
    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        let pos = self.dense_index(entity)?;
        self.sparse[entity.index() as usize] = EMPTY;

        let last = self.data.len() - 1;
        if pos != last {
            let moved = self.entities[last];
            self.sparse[moved.index() as usize] = pos as u32;
        }
        self.entities.swap_remove(pos);
        Some(self.data.swap_remove(pos))
    }

    /// Borrow the value for `entity`.
    #[must_use]
    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.dense_index(entity).map(|pos| &self.data[pos])
    }

    /// Mutably borrow the value for `entity`.
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.dense_index(entity).map(|pos| &mut self.data[pos])
    }

    /// Entities with a value, in dense (not insertion) order.
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Number of stored values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the set holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Iterate `(entity, value)` pairs in dense order.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.entities.iter().copied().zip(self.data.iter())
    }
}

impl<T: Component> ErasedStorage for SparseSet<T> {
    fn remove_entity(&mut self, entity: Entity) -> bool {
        self.remove(entity).is_some()
    }

    fn contains(&self, entity: Entity) -> bool {
        SparseSet::contains(self, entity)
    }

    fn get_dyn(&self, entity: Entity) -> Option<&dyn Component> {
        self.get(entity).map(|value| value as &dyn Component)
    }

    fn clear(&mut self) {
        self.sparse.clear();
        self.entities.clear();
        self.data.clear();
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut set = SparseSet::new();
        let e = Entity::new(3, 0);
        assert_eq!(set.insert(e, 10u32), None);
        assert_eq!(set.get(e), Some(&10));
        assert!(set.contains(e));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_insert_replaces() {
        let mut set = SparseSet::new();
        let e = Entity::new(0, 0);
        set.insert(e, 1u32);
        assert_eq!(set.insert(e, 2), Some(1));
        assert_eq!(set.get(e), Some(&2));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_remove_keeps_other_entries_reachable() {
        let mut set = SparseSet::new();
        let a = Entity::new(0, 0);
        let b = Entity::new(1, 0);
        let c = Entity::new(2, 0);
        set.insert(a, 'a');
        set.insert(b, 'b');
        set.insert(c, 'c');

        assert_eq!(set.remove(a), Some('a'));
        assert_eq!(set.get(b), Some(&'b'));
        assert_eq!(set.get(c), Some(&'c'));
        assert!(!set.contains(a));
        assert_eq!(set.remove(a), None);
    }

    #[test]
    fn test_stale_generation_is_not_found() {
        let mut set = SparseSet::new();
        set.insert(Entity::new(5, 1), 99u8);
        assert!(set.get(Entity::new(5, 0)).is_none());
        assert!(set.get(Entity::new(5, 2)).is_none());
        assert_eq!(set.get(Entity::new(5, 1)), Some(&99));
    }

    #[test]
    fn test_newer_generation_evicts_leftover() {
        let mut set = SparseSet::new();
        set.insert(Entity::new(5, 0), 1u8);
        set.insert(Entity::new(5, 1), 2u8);
        assert_eq!(set.len(), 1);
        assert!(set.get(Entity::new(5, 0)).is_none());
        assert_eq!(set.get(Entity::new(5, 1)), Some(&2));
    }

    #[test]
    fn test_get_mut() {
        let mut set = SparseSet::new();
        let e = Entity::new(0, 0);
        set.insert(e, 1i32);
        *set.get_mut(e).unwrap() += 41;
        assert_eq!(set.get(e), Some(&42));
    }
}
