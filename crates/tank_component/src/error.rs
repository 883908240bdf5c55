//! Store error types.

use crate::entity::Entity;

/// Errors surfaced by the explicit-result store lookups.
///
/// Ordinary lookups return `Option`; these only come back from
/// [`Store::require_component`](crate::Store::require_component) and the
/// handle accessors built on it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The entity is alive but has no component of the requested type.
    #[error("{entity} has no '{component}' component")]
    MissingComponent {
        /// The entity that was queried.
        entity: Entity,
        /// Name of the requested component type.
        component: &'static str,
    },

    /// The entity has been removed (or was never allocated by this store).
    #[error("{0} is not alive")]
    DeadEntity(Entity),
}
