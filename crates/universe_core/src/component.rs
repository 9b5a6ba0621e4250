//! Core [`Component`] trait, component type identity, and type-erased storage.
//!
//! Every piece of data attached to an entity must implement [`Component`]. The
//! trait requires `Clone + Send + Sync + 'static`: values are copied out of the
//! store into view shapes, and a universe may be moved between threads behind
//! an external lock.
//!
//! ## Type Identity
//!
//! [`ComponentTypeId`] is derived from the component's **type name** using the
//! FNV-1a 64-bit hash algorithm. No registration step is needed: implementing
//! the trait is enough for a type to be stored, matched, and filtered.
//!
//! The name is declared by each component rather than taken from
//! [`std::any::type_name`], which is not guaranteed to be unique. Names must be
//! unique among the kinds stored in one universe.

use std::any::Any;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A unique identifier for a component kind, derived from its type name using
/// the FNV-1a 64-bit hash algorithm.
///
/// Two components share a `ComponentTypeId` if and only if they are the same
/// component kind. It is the sole key used for lookup, matching, and
/// replacement inside an entity record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct ComponentTypeId(pub u64);

impl ComponentTypeId {
    /// FNV-1a 64-bit offset basis.
    const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;

    /// FNV-1a 64-bit prime.
    const FNV_PRIME: u64 = 0x0100_0000_01b3;

    /// Compute a [`ComponentTypeId`] from a component's name.
    ///
    /// # Algorithm (FNV-1a 64-bit)
    ///
    /// ```text
    /// hash = 0xcbf29ce484222325          (offset basis)
    /// for each byte in name.as_bytes():
    ///     hash = hash XOR byte
    ///     hash = hash * 0x00000100000001b3  (prime)
    /// return hash
    /// ```
    #[must_use]
    pub const fn from_name(name: &str) -> Self {
        let bytes = name.as_bytes();
        let mut hash = Self::FNV_OFFSET_BASIS;
        let mut i = 0;
        while i < bytes.len() {
            hash ^= bytes[i] as u64;
            hash = hash.wrapping_mul(Self::FNV_PRIME);
            i += 1;
        }
        Self(hash)
    }

    /// Compute the [`ComponentTypeId`] for a Rust component type `C`.
    #[must_use]
    pub fn of<C: Component>() -> Self {
        C::component_type_id()
    }
}

impl fmt::Display for ComponentTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

/// The core component trait.
///
/// Components are plain data. Each one declares the name its
/// [`ComponentTypeId`] is hashed from.
///
/// # Examples
///
/// ```rust
/// use universe_core::{Component, ComponentTypeId};
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Health {
///     current: f32,
///     max: f32,
/// }
///
/// impl Component for Health {
///     fn type_name() -> &'static str {
///         "Health"
///     }
/// }
///
/// assert_eq!(Health::component_type_id(), ComponentTypeId::of::<Health>());
/// ```
pub trait Component: Clone + Send + Sync + 'static {
    /// The component kind's name, e.g. `"Position"`.
    fn type_name() -> &'static str;

    /// Returns the [`ComponentTypeId`] for this component.
    fn component_type_id() -> ComponentTypeId {
        ComponentTypeId::from_name(Self::type_name())
    }
}

/// An owned, type-erased component value tagged with its [`ComponentTypeId`].
///
/// This is what the store keeps per component. Typed access goes through
/// [`ComponentBox::downcast_ref`] and friends, which check the concrete Rust
/// type in addition to the identity token.
pub struct ComponentBox {
    type_id: ComponentTypeId,
    name: &'static str,
    value: Box<dyn Any + Send + Sync>,
}

impl ComponentBox {
    /// Erase a component value.
    #[must_use]
    pub fn new<C: Component>(value: C) -> Self {
        Self {
            type_id: C::component_type_id(),
            name: C::type_name(),
            value: Box::new(value),
        }
    }

    /// The identity token of the boxed component kind.
    #[must_use]
    pub fn type_id(&self) -> ComponentTypeId {
        self.type_id
    }

    /// The type name of the boxed component kind.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns `true` if the boxed value is a `C`.
    #[must_use]
    pub fn is<C: Component>(&self) -> bool {
        self.type_id == C::component_type_id() && self.value.is::<C>()
    }

    /// Borrow the value as a `C`, or `None` if it is another kind.
    #[must_use]
    pub fn downcast_ref<C: Component>(&self) -> Option<&C> {
        if self.type_id != C::component_type_id() {
            return None;
        }
        self.value.downcast_ref::<C>()
    }

    /// Mutably borrow the value as a `C`, or `None` if it is another kind.
    #[must_use]
    pub fn downcast_mut<C: Component>(&mut self) -> Option<&mut C> {
        if self.type_id != C::component_type_id() {
            return None;
        }
        self.value.downcast_mut::<C>()
    }

    /// Unwrap the value as a `C`, handing the box back if it is another kind.
    pub fn into_inner<C: Component>(self) -> Result<C, Self> {
        if !self.is::<C>() {
            return Err(self);
        }
        let Self {
            type_id,
            name,
            value,
        } = self;
        value.downcast::<C>().map(|boxed| *boxed).map_err(|value| Self {
            type_id,
            name,
            value,
        })
    }
}

impl<C: Component> From<C> for ComponentBox {
    fn from(value: C) -> Self {
        Self::new(value)
    }
}

impl fmt::Debug for ComponentBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentBox")
            .field("type_id", &self.type_id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Build a `Vec<ComponentBox>` from a list of component values.
///
/// ```rust
/// use universe_core::{components, Component};
///
/// #[derive(Clone)]
/// struct A(u8);
/// impl Component for A {
///     fn type_name() -> &'static str {
///         "A"
///     }
/// }
///
/// #[derive(Clone)]
/// struct B(u16);
/// impl Component for B {
///     fn type_name() -> &'static str {
///         "B"
///     }
/// }
///
/// let boxed = components![A(1), B(2)];
/// assert_eq!(boxed.len(), 2);
/// ```
#[macro_export]
macro_rules! components {
    () => {
        ::std::vec::Vec::<$crate::ComponentBox>::new()
    };
    ($($value:expr),+ $(,)?) => {
        ::std::vec![$($crate::ComponentBox::new($value)),+]
    };
}
