//! Component bundles — a fixed group of components attached in one call.

use crate::component::Component;
use crate::entity::Entity;
use crate::store::Store;

/// A group of components that can be attached to an entity together.
///
/// Implemented for tuples of up to eight components. Every component is added
/// without notification; the caller publishes once afterwards (see
/// [`Store::spawn_bundle`]).
pub trait Bundle {
    /// Attach every component in the bundle to `entity` without notifying.
    fn insert_into(self, store: &mut Store, entity: Entity);
}

impl<T: Component> Bundle for T {
    fn insert_into(self, store: &mut Store, entity: Entity) {
        store.add_component(entity, self, false);
    }
}

macro_rules! impl_bundle {
    ($($name:ident),+) => {
        impl<$($name: Component),+> Bundle for ($($name,)+) {
            #[allow(non_snake_case)]
            fn insert_into(self, store: &mut Store, entity: Entity) {
                let ($($name,)+) = self;
                $(store.add_component(entity, $name, false);)+
            }
        }
    };
}

impl_bundle!(A);
impl_bundle!(A, B);
impl_bundle!(A, B, C);
impl_bundle!(A, B, C, D);
impl_bundle!(A, B, C, D, E);
impl_bundle!(A, B, C, D, E, F);
impl_bundle!(A, B, C, D, E, F, G);
impl_bundle!(A, B, C, D, E, F, G, H);
