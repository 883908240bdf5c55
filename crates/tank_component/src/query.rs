//! Query descriptors for system interest declarations.
//!
//! A [`Query`] declares which component types a system cares about. Systems
//! hand their query to the store on every refresh and cache the result.

use crate::component::{Component, ComponentTypeId};
use crate::entity::Entity;
use crate::store::Store;

/// How the query's component types are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    /// The entity must have every listed type.
    All,
    /// The entity must have at least one listed type. Entities matching
    /// several types are repeated, once per matching type.
    Any,
    /// Like [`QueryKind::Any`], but each entity appears once.
    AnyDistinct,
}

/// Describes the set of entities a system is interested in.
///
/// ```rust
/// # use tank_component::{Component, Query, Store};
/// # #[derive(Debug)] struct Spatial;
/// # impl Component for Spatial { fn type_name() -> &'static str { "Spatial" } }
/// # #[derive(Debug)] struct Velocity;
/// # impl Component for Velocity { fn type_name() -> &'static str { "Velocity" } }
/// let movers = Query::all_of().with::<Spatial>().with::<Velocity>();
/// assert!(movers.run(&Store::new()).is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// How `types` are combined.
    pub kind: QueryKind,
    /// Component types the query matches on.
    pub types: Vec<ComponentTypeId>,
    /// Entities owning any of these types are dropped from the result.
    pub without: Vec<ComponentTypeId>,
}

impl Query {
    fn new(kind: QueryKind, types: &[ComponentTypeId]) -> Self {
        Self {
            kind,
            types: types.to_vec(),
            without: Vec::new(),
        }
    }

    /// Match entities owning every type in `types`.
    #[must_use]
    pub fn all(types: &[ComponentTypeId]) -> Self {
        Self::new(QueryKind::All, types)
    }

    /// Match entities owning at least one type in `types` (duplicates kept).
    #[must_use]
    pub fn any(types: &[ComponentTypeId]) -> Self {
        Self::new(QueryKind::Any, types)
    }

    /// Empty exact-match query, to be extended with [`Query::with`].
    #[must_use]
    pub fn all_of() -> Self {
        Self::all(&[])
    }

    /// Empty any-match query, to be extended with [`Query::with`].
    #[must_use]
    pub fn any_of() -> Self {
        Self::any(&[])
    }

    /// Add a component type to match on.
    #[must_use]
    pub fn with<T: Component>(mut self) -> Self {
        self.types.push(ComponentTypeId::of::<T>());
        self
    }

    /// Exclude entities that own a `T`.
    #[must_use]
    pub fn without<T: Component>(mut self) -> Self {
        self.without.push(ComponentTypeId::of::<T>());
        self
    }

    /// Turn an any-match query into its deduplicated form.
    #[must_use]
    pub fn distinct(mut self) -> Self {
        if self.kind == QueryKind::Any {
            self.kind = QueryKind::AnyDistinct;
        }
        self
    }

    /// Execute the query against `store`.
    #[must_use]
    pub fn run(&self, store: &Store) -> Vec<Entity> {
        let mut result = match self.kind {
            QueryKind::All => store.get_entities_with_all(&self.types),
            QueryKind::Any => store.get_entities_with_any(&self.types),
            QueryKind::AnyDistinct => store.get_entities_with_any_distinct(&self.types),
        };
        if !self.without.is_empty() {
            result.retain(|&e| !self.without.iter().any(|&ty| store.has_type(e, ty)));
        }
        result
    }

    /// Returns `true` if `entity` currently satisfies the query.
    #[must_use]
    pub fn matches(&self, store: &Store, entity: Entity) -> bool {
        if !store.contains(entity) {
            return false;
        }
        if self.without.iter().any(|&ty| store.has_type(entity, ty)) {
            return false;
        }
        match self.kind {
            QueryKind::All => self.types.iter().all(|&ty| store.has_type(entity, ty)),
            QueryKind::Any | QueryKind::AnyDistinct => {
                self.types.iter().any(|&ty| store.has_type(entity, ty))
            }
        }
    }
}
