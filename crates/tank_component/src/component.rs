//! Core [`Component`] trait and associated type identity.
//!
//! Components are plain data. Every type stored in the [`Store`](crate::Store)
//! implements [`Component`]; behaviour lives in systems.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identifies a component type at runtime.
///
/// Equality and hashing use the Rust [`TypeId`] only; the name is carried for
/// log output and error messages.
#[derive(Clone, Copy)]
pub struct ComponentTypeId {
    id: TypeId,
    name: &'static str,
}

impl ComponentTypeId {
    /// Returns the [`ComponentTypeId`] for component type `T`.
    #[must_use]
    pub fn of<T: Component>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: T::type_name(),
        }
    }

    /// The human-readable component name (e.g. `"Health"`).
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn type_id(&self) -> TypeId {
        self.id
    }
}

impl PartialEq for ComponentTypeId {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ComponentTypeId {}

impl Hash for ComponentTypeId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ComponentTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentTypeId({})", self.name)
    }
}

impl fmt::Display for ComponentTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Upcast helper so `dyn Component` can be downcast to its concrete type.
pub trait AsAny {
    /// Returns `self` as `&dyn Any`.
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// The core component trait.
///
/// # Examples
///
/// ```rust
/// use tank_component::Component;
///
/// #[derive(Debug, Clone)]
/// struct Health {
///     current: f32,
///     max: f32,
/// }
///
/// impl Component for Health {
///     fn type_name() -> &'static str { "Health" }
/// }
/// ```
pub trait Component: AsAny + fmt::Debug + 'static {
    /// A human-readable name for this component type.
    fn type_name() -> &'static str
    where
        Self: Sized;

    /// Returns the [`ComponentTypeId`] for this component.
    fn component_type_id() -> ComponentTypeId
    where
        Self: Sized,
    {
        ComponentTypeId::of::<Self>()
    }
}

impl<'a> dyn Component + 'a {
    /// Returns `true` if the boxed component is a `T`.
    #[must_use]
    pub fn is<T: Component>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// Downcast to the concrete component type.
    #[must_use]
    pub fn downcast_ref<T: Component>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

/// Builds a `[ComponentTypeId; N]` from a list of component types.
///
/// ```rust
/// # use tank_component::{Component, type_ids};
/// # #[derive(Debug)] struct A;
/// # impl Component for A { fn type_name() -> &'static str { "A" } }
/// # #[derive(Debug)] struct B;
/// # impl Component for B { fn type_name() -> &'static str { "B" } }
/// let types = type_ids![A, B];
/// assert_eq!(types.len(), 2);
/// ```
#[macro_export]
macro_rules! type_ids {
    ($($ty:ty),* $(,)?) => {
        [$($crate::ComponentTypeId::of::<$ty>()),*]
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Health {
        current: f32,
        max: f32,
    }

    impl Component for Health {
        fn type_name() -> &'static str {
            "Health"
        }
    }

    #[derive(Debug, Clone)]
    struct Velocity {
        x: f32,
        y: f32,
    }

    impl Component for Velocity {
        fn type_name() -> &'static str {
            "Velocity"
        }
    }

    #[test]
    fn test_component_type_id_is_stable() {
        assert_eq!(Health::component_type_id(), Health::component_type_id());
        assert_eq!(Health::component_type_id(), ComponentTypeId::of::<Health>());
    }

    #[test]
    fn test_component_type_id_differs_between_types() {
        assert_ne!(Health::component_type_id(), Velocity::component_type_id());
    }

    #[test]
    fn test_component_type_id_name() {
        let id = ComponentTypeId::of::<Health>();
        assert_eq!(id.name(), "Health");
        assert_eq!(id.to_string(), "Health");
    }

    #[test]
    fn test_type_ids_macro() {
        let ids = type_ids![Health, Velocity];
        assert_eq!(ids[0], ComponentTypeId::of::<Health>());
        assert_eq!(ids[1], ComponentTypeId::of::<Velocity>());
    }

    #[test]
    fn test_dyn_downcast() {
        let health = Health {
            current: 80.0,
            max: 100.0,
        };
        let component: &dyn Component = &health;
        assert!(component.is::<Health>());
        assert!(!component.is::<Velocity>());
        assert_eq!(component.downcast_ref::<Health>(), Some(&health));
        assert!(component.downcast_ref::<Velocity>().is_none());

        let velocity = Velocity { x: 1.0, y: 2.0 };
        let component: &dyn Component = &velocity;
        let v = component.downcast_ref::<Velocity>().unwrap();
        assert_eq!((v.x, v.y), (1.0, 2.0));
    }
}
