//! Entity type and allocation utilities.
//!
//! An [`Entity`] is a generational index with no inherent data: a slot index
//! into component storage plus a generation counter that changes every time
//! the slot is recycled. Two entities are the same entity iff their values
//! are equal.

/// A unique entity identifier.
///
/// Entities are pure identifiers — they carry no data of their own. Components
/// are attached to entities to give them meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity {
    index: u32,
    generation: u32,
}

impl Entity {
    /// Create an entity from its raw parts.
    ///
    /// Mostly useful in tests; live entities come from [`EntityAllocator`].
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Returns the slot index.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Returns the generation of the slot this entity was allocated in.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }

    /// Pack index and generation into one `u64` (generation in the high bits).
    #[must_use]
    pub const fn to_bits(self) -> u64 {
        ((self.generation as u64) << 32) | self.index as u64
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({}v{})", self.index, self.generation)
    }
}

/// Allocates entity identities, recycling freed slots.
///
/// Each freed slot has its generation bumped before it goes back on the free
/// list, so an identity handed out earlier is never reported alive again.
#[derive(Debug, Default)]
pub struct EntityAllocator {
    generations: Vec<u32>,
    alive: Vec<bool>,
    free: Vec<u32>,
}

impl EntityAllocator {
    /// Creates a new, empty allocator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a fresh entity.
    pub fn allocate(&mut self) -> Entity {
        if let Some(index) = self.free.pop() {
            let slot = index as usize;
            self.alive[slot] = true;
            return Entity::new(index, self.generations[slot]);
        }

        debug_assert!(
            self.generations.len() < u32::MAX as usize,
            "entity index space exhausted"
        );
        let index = self.generations.len() as u32;
        self.generations.push(0);
        self.alive.push(true);
        Entity::new(index, 0)
    }

    /// Frees an entity's slot.
    ///
    /// Returns `false` if the entity was already dead.
    pub fn deallocate(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        let slot = entity.index as usize;
        self.alive[slot] = false;
        self.generations[slot] = self.generations[slot].wrapping_add(1);
        self.free.push(entity.index);
        true
    }

    /// Frees every live slot at once.
    pub fn deallocate_all(&mut self) {
        for (slot, alive) in self.alive.iter_mut().enumerate() {
            if *alive {
                *alive = false;
                self.generations[slot] = self.generations[slot].wrapping_add(1);
                self.free.push(slot as u32);
            }
        }
    }

    /// Returns `true` if `entity` refers to a currently allocated slot.
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        let slot = entity.index as usize;
        slot < self.generations.len() && self.alive[slot] && self.generations[slot] == entity.generation
    }

    /// Returns the number of currently allocated entities.
    #[must_use]
    pub fn count(&self) -> usize {
        self.alive.iter().filter(|&&a| a).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_parts() {
        let e = Entity::new(42, 7);
        assert_eq!(e.index(), 42);
        assert_eq!(e.generation(), 7);
        assert_eq!(e.to_bits(), (7u64 << 32) | 42);
    }

    #[test]
    fn test_allocator_produces_unique_ids() {
        let mut alloc = EntityAllocator::new();
        let e1 = alloc.allocate();
        let e2 = alloc.allocate();
        let e3 = alloc.allocate();
        assert_ne!(e1, e2);
        assert_ne!(e2, e3);
        assert_eq!(alloc.count(), 3);
    }

    #[test]
    fn test_recycled_slot_gets_new_generation() {
        let mut alloc = EntityAllocator::new();
        let e1 = alloc.allocate();
        assert!(alloc.deallocate(e1));
        let e2 = alloc.allocate();

        assert_eq!(e1.index(), e2.index());
        assert_ne!(e1, e2);
        assert!(!alloc.is_alive(e1));
        assert!(alloc.is_alive(e2));
    }

    #[test]
    fn test_double_deallocate_is_rejected() {
        let mut alloc = EntityAllocator::new();
        let e = alloc.allocate();
        assert!(alloc.deallocate(e));
        assert!(!alloc.deallocate(e));
        assert_eq!(alloc.count(), 0);
    }

    #[test]
    fn test_deallocate_all() {
        let mut alloc = EntityAllocator::new();
        let a = alloc.allocate();
        let b = alloc.allocate();
        alloc.deallocate_all();
        assert!(!alloc.is_alive(a));
        assert!(!alloc.is_alive(b));
        assert_eq!(alloc.count(), 0);

        let c = alloc.allocate();
        assert_ne!(c, a);
        assert_ne!(c, b);
    }
}
