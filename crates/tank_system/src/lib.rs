//! # tank_system
//!
//! System runtime library for the tank game ECS.
//!
//! Systems subscribe to a [`Store`](tank_component::Store) through a
//! [`SystemRegistry`], keep a cached list of the entities they care about,
//! and run once per tick in registration order:
//!
//! 1. Register: the system builds its initial cache.
//! 2. Notify: a mutation published by the store makes every cache stale.
//! 3. Tick: each stale system rebuilds its cache, then runs.
//! 4. Clean up: the cache is released and the system is no longer driven.
//!
//! ## Usage
//!
//! ```rust
//! use tank_component::{Component, Entity, Query, Store};
//! use tank_system::{Process, ProcessSystem, SystemRegistry, TickContext};
//!
//! #[derive(Debug)]
//! struct Fuel(f32);
//! impl Component for Fuel {
//!     fn type_name() -> &'static str { "Fuel" }
//! }
//!
//! struct Burn;
//! impl ProcessSystem for Burn {
//!     fn name(&self) -> &str { "burn" }
//!     fn query(&self) -> Query { Query::all_of().with::<Fuel>() }
//!     fn process(&mut self, entity: Entity, store: &mut Store, ctx: &TickContext) {
//!         if let Some(fuel) = store.get_component_mut::<Fuel>(entity) {
//!             fuel.0 -= ctx.dt_f32();
//!         }
//!     }
//! }
//!
//! let mut store = Store::new();
//! let mut systems = SystemRegistry::new();
//! systems.register(Process::new(Burn), &store);
//!
//! let tank = store.spawn_bundle(Fuel(10.0));
//! systems.tick_all(&mut store, &TickContext::new(1, 1.0));
//! assert_eq!(store.get_component::<Fuel>(tank).map(|f| f.0), Some(9.0));
//! ```

pub mod context;
pub mod error;
pub mod registry;
pub mod system;

pub use context::TickContext;
pub use error::SystemError;
pub use registry::{SystemId, SystemRegistry, SystemState};
pub use system::{EntityCache, Process, ProcessSystem, System};
