//! # tank_component
//!
//! The "E" and "C" of the tank game's ECS — entity identities, component
//! storage, and the queries systems use to find their entities.
//!
//! This crate provides:
//!
//! - [`Store`] — sole owner of identities and component data.
//! - [`Entity`] — generational entity identifiers.
//! - [`EntityRef`] / [`EntityMut`] — handles delegating to the store.
//! - [`Component`] — the contract all component data satisfies.
//! - [`Bundle`] — attach several components behind one notification.
//! - [`Query`] — declarative interest sets for systems.

pub mod bundle;
pub mod component;
pub mod entity;
pub mod error;
pub mod handle;
pub mod query;
pub mod storage;
pub mod store;

pub use bundle::Bundle;
pub use component::{AsAny, Component, ComponentTypeId};
pub use entity::{Entity, EntityAllocator};
pub use error::StoreError;
pub use handle::{EntityMut, EntityRef};
pub use query::{Query, QueryKind};
pub use storage::SparseSet;
pub use store::{Store, StoreId, StoreStamp};
