//! Shape descriptors: struct schemas that views project entities into.
//!
//! A shape is a plain struct whose fields are component slots. Each slot is
//! classified as one of [`SlotKind`]:
//!
//! - **required**: the entity must carry the component for a full match;
//! - **optional**: filled when present, ignored when absent;
//! - **excluded**: the entity must not carry the component;
//! - **identifier**: receives the entity's [`EntityId`] instead of a component.
//!
//! Shapes are normally declared with the [`shape!`](crate::shape!) macro,
//! which derives `Default` and implements [`Shape`] in field order.

use std::fmt;

use universe_core::{Component, ComponentBox, ComponentTypeId, EntityId, EntityRecord};

/// How a shape field takes part in matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKind {
    /// The entity must carry this component.
    Required,
    /// The entity may carry this component.
    Optional,
    /// The entity must not carry this component.
    Excluded,
    /// Receives the entity id; not a component.
    Identifier,
}

type FillFn<S> = Box<dyn Fn(&mut S, &EntityRecord) -> bool + Send + Sync>;
type TakeFn<S> = Box<dyn Fn(&mut S) -> Option<ComponentBox> + Send + Sync>;

enum Access<S> {
    Component {
        type_id: ComponentTypeId,
        fill: FillFn<S>,
        take: TakeFn<S>,
    },
    Identifier(fn(&mut S) -> &mut EntityId),
}

/// One field of a shape: its name, kind, and type-erased accessors.
pub struct Slot<S> {
    name: &'static str,
    kind: SlotKind,
    access: Access<S>,
}

impl<S: 'static> Slot<S> {
    /// A slot the entity must fill for a full match.
    #[must_use]
    pub fn required<C: Component>(name: &'static str, field: fn(&mut S) -> &mut Option<C>) -> Self {
        Self::component(name, SlotKind::Required, field)
    }

    /// A slot filled only when the entity carries the component.
    #[must_use]
    pub fn optional<C: Component>(name: &'static str, field: fn(&mut S) -> &mut Option<C>) -> Self {
        Self::component(name, SlotKind::Optional, field)
    }

    /// A slot naming a component the entity must not carry.
    #[must_use]
    pub fn excluded<C: Component>(name: &'static str, field: fn(&mut S) -> &mut Option<C>) -> Self {
        Self::component(name, SlotKind::Excluded, field)
    }

    /// The slot receiving the entity id.
    #[must_use]
    pub fn identifier(name: &'static str, field: fn(&mut S) -> &mut EntityId) -> Self {
        Self {
            name,
            kind: SlotKind::Identifier,
            access: Access::Identifier(field),
        }
    }

    fn component<C: Component>(
        name: &'static str,
        kind: SlotKind,
        field: fn(&mut S) -> &mut Option<C>,
    ) -> Self {
        Self {
            name,
            kind,
            access: Access::Component {
                type_id: C::component_type_id(),
                fill: Box::new(move |target: &mut S, record: &EntityRecord| match record.read::<C>() {
                    Some(value) => {
                        *field(target) = Some(value.clone());
                        true
                    }
                    None => false,
                }),
                take: Box::new(move |target: &mut S| field(target).take().map(ComponentBox::new)),
            },
        }
    }
}

impl<S> Slot<S> {
    /// The field name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// How the field takes part in matching.
    #[must_use]
    pub fn kind(&self) -> SlotKind {
        self.kind
    }

    /// The component kind held by this field, or `None` for the identifier slot.
    #[must_use]
    pub fn component_type(&self) -> Option<ComponentTypeId> {
        match &self.access {
            Access::Component { type_id, .. } => Some(*type_id),
            Access::Identifier(_) => None,
        }
    }

    /// Copy this field's value out of `record` into `target`.
    ///
    /// Returns `true` if the slot was satisfied: the component was found, or
    /// this is the identifier slot. An absent component leaves the field as is.
    pub(crate) fn fill(&self, target: &mut S, record: &EntityRecord) -> bool {
        match &self.access {
            Access::Component { fill, .. } => fill(target, record),
            Access::Identifier(field) => {
                *field(target) = record.id();
                true
            }
        }
    }

    /// Move this field's component out of `target`, if it holds one.
    pub(crate) fn take(&self, target: &mut S) -> Option<ComponentBox> {
        match &self.access {
            Access::Component { take, .. } => take(target),
            Access::Identifier(_) => None,
        }
    }
}

impl<S> fmt::Debug for Slot<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slot")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("component_type", &self.component_type())
            .finish()
    }
}

/// A struct schema a [`View`](crate::View) can project entities into.
///
/// `slots` lists the fields in declaration order. A fresh `Default` instance
/// is the "all fields empty" value that fills start from.
pub trait Shape: Default + Sized + 'static {
    /// Describe the fields of this shape, in declaration order.
    fn slots() -> Vec<Slot<Self>>;
}

/// Declare a shape struct and implement [`Shape`] for it.
///
/// Component fields are written with their component type and become
/// `Option<T>`; untagged fields are required, `#[optional]` and `#[excluded]`
/// tag the others. A field tagged `#[id]` must be an [`EntityId`] and receives
/// the entity id. The kind tag must directly precede the field (after any doc
/// comments). `Default` is derived by the macro.
///
/// ```rust
/// use universe::{shape, Component, EntityId};
///
/// #[derive(Debug, Clone)]
/// struct Position { x: f32, y: f32 }
/// impl Component for Position {
///     fn type_name() -> &'static str {
///         "Position"
///     }
/// }
///
/// #[derive(Debug, Clone)]
/// struct Frozen;
/// impl Component for Frozen {
///     fn type_name() -> &'static str {
///         "Frozen"
///     }
/// }
///
/// shape! {
///     #[derive(Debug)]
///     pub struct Movable {
///         #[id]
///         pub id: EntityId,
///         pub position: Position,
///         #[excluded]
///         pub frozen: Frozen,
///     }
/// }
///
/// let movable = Movable::default();
/// assert!(movable.position.is_none());
/// ```
#[macro_export]
macro_rules! shape {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $($body:tt)*
        }
    ) => {
        $crate::__shape_fields! {
            @head [[$(#[$meta])*] [$vis] [$name]]
            @fields []
            @attrs []
            @rest [$($body)*]
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __shape_fields {
    (
        @head [[$($meta:tt)*] [$vis:vis] [$name:ident]]
        @fields [$(($kind:ident [$($fattr:tt)*] [$fvis:vis] $field:ident [$ty:ty]))*]
        @attrs []
        @rest []
    ) => {
        $($meta)*
        #[derive(Default)]
        $vis struct $name {
            $($($fattr)* $fvis $field: $crate::__shape_field_type!($kind $ty),)*
        }

        impl $crate::Shape for $name {
            fn slots() -> ::std::vec::Vec<$crate::Slot<Self>> {
                ::std::vec![$($crate::__shape_slot!($kind $name $field $ty),)*]
            }
        }
    };
    (
        @head $head:tt
        @fields [$($fields:tt)*]
        @attrs [$($attrs:tt)*]
        @rest [#[id] $fvis:vis $field:ident : $ty:ty $(, $($rest:tt)*)?]
    ) => {
        $crate::__shape_fields! {
            @head $head
            @fields [$($fields)* (identifier [$($attrs)*] [$fvis] $field [$ty])]
            @attrs []
            @rest [$($($rest)*)?]
        }
    };
    (
        @head $head:tt
        @fields [$($fields:tt)*]
        @attrs [$($attrs:tt)*]
        @rest [#[optional] $fvis:vis $field:ident : $ty:ty $(, $($rest:tt)*)?]
    ) => {
        $crate::__shape_fields! {
            @head $head
            @fields [$($fields)* (optional [$($attrs)*] [$fvis] $field [$ty])]
            @attrs []
            @rest [$($($rest)*)?]
        }
    };
    (
        @head $head:tt
        @fields [$($fields:tt)*]
        @attrs [$($attrs:tt)*]
        @rest [#[excluded] $fvis:vis $field:ident : $ty:ty $(, $($rest:tt)*)?]
    ) => {
        $crate::__shape_fields! {
            @head $head
            @fields [$($fields)* (excluded [$($attrs)*] [$fvis] $field [$ty])]
            @attrs []
            @rest [$($($rest)*)?]
        }
    };
    (
        @head $head:tt
        @fields $fields:tt
        @attrs [$($attrs:tt)*]
        @rest [#[$attr:meta] $($rest:tt)*]
    ) => {
        $crate::__shape_fields! {
            @head $head
            @fields $fields
            @attrs [$($attrs)* #[$attr]]
            @rest [$($rest)*]
        }
    };
    (
        @head $head:tt
        @fields [$($fields:tt)*]
        @attrs [$($attrs:tt)*]
        @rest [$fvis:vis $field:ident : $ty:ty $(, $($rest:tt)*)?]
    ) => {
        $crate::__shape_fields! {
            @head $head
            @fields [$($fields)* (required [$($attrs)*] [$fvis] $field [$ty])]
            @attrs []
            @rest [$($($rest)*)?]
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __shape_field_type {
    (identifier $ty:ty) => { $ty };
    ($kind:ident $ty:ty) => { ::core::option::Option<$ty> };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __shape_slot {
    (identifier $name:ident $field:ident $ty:ty) => {{
        fn access(shape: &mut $name) -> &mut $crate::EntityId {
            &mut shape.$field
        }
        $crate::Slot::<$name>::identifier(::core::stringify!($field), access)
    }};
    ($kind:ident $name:ident $field:ident $ty:ty) => {{
        fn access(shape: &mut $name) -> &mut ::core::option::Option<$ty> {
            &mut shape.$field
        }
        $crate::Slot::<$name>::$kind::<$ty>(::core::stringify!($field), access)
    }};
}

#[cfg(test)]
mod tests {
    use universe_core::components;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Position {
        x: f32,
        y: f32,
    }
    impl Component for Position {
        fn type_name() -> &'static str {
            "Position"
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Name(String);
    impl Component for Name {
        fn type_name() -> &'static str {
            "Name"
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Frozen;
    impl Component for Frozen {
        fn type_name() -> &'static str {
            "Frozen"
        }
    }

    crate::shape! {
        /// Everything a test could want.
        #[derive(Debug, Clone, PartialEq)]
        struct Everything {
            /// Entity handle.
            #[id]
            id: EntityId,
            position: Position,
            #[optional]
            name: Name,
            #[excluded]
            frozen: Frozen
        }
    }

    crate::shape! {
        struct Nothing {}
    }

    mod visible {
        use universe_core::{Component, EntityId};

        #[derive(Debug, Clone, PartialEq)]
        pub struct Anchor(pub u32);
        impl Component for Anchor {
            fn type_name() -> &'static str {
                "Anchor"
            }
        }

        #[derive(Debug, Clone, PartialEq)]
        pub struct Hidden;
        impl Component for Hidden {
            fn type_name() -> &'static str {
                "Hidden"
            }
        }

        crate::shape! {
            #[derive(Debug, Clone)]
            #[allow(dead_code)]
            pub struct Exported {
                #[id]
                pub id: EntityId,
                /// Where it is.
                pub anchor: Anchor,
                #[excluded]
                pub(crate) hidden: Hidden,
            }
        }
    }

    #[test]
    fn test_macro_slots_in_declaration_order() {
        let slots = Everything::slots();
        let described: Vec<_> = slots
            .iter()
            .map(|slot| (slot.name(), slot.kind(), slot.component_type()))
            .collect();
        assert_eq!(
            described,
            vec![
                ("id", SlotKind::Identifier, None),
                ("position", SlotKind::Required, Some(Position::component_type_id())),
                ("name", SlotKind::Optional, Some(Name::component_type_id())),
                ("frozen", SlotKind::Excluded, Some(Frozen::component_type_id())),
            ]
        );
    }

    #[test]
    fn test_macro_fields_start_empty() {
        let shape = Everything::default();
        assert_eq!(shape.id, EntityId::INVALID);
        assert!(shape.position.is_none());
        assert!(shape.name.is_none());
        assert!(shape.frozen.is_none());
    }

    #[test]
    fn test_macro_keeps_visibility_and_attributes() {
        let mut shape = visible::Exported::default();
        shape.anchor = Some(visible::Anchor(7));
        let copy = shape.clone();
        assert_eq!(copy.anchor, Some(visible::Anchor(7)));
        assert!(format!("{copy:?}").starts_with("Exported"));

        let kinds: Vec<SlotKind> = visible::Exported::slots()
            .iter()
            .map(Slot::kind)
            .collect();
        assert_eq!(
            kinds,
            vec![SlotKind::Identifier, SlotKind::Required, SlotKind::Excluded]
        );
    }

    #[test]
    fn test_empty_shape_has_no_slots() {
        assert!(Nothing::slots().is_empty());
    }

    #[test]
    fn test_slot_fill_and_take() {
        let record = EntityRecord::new(
            EntityId(5),
            components![Position { x: 1.0, y: 2.0 }],
        )
        .unwrap();
        let slots = Everything::slots();
        let mut shape = Everything::default();

        assert!(slots[0].fill(&mut shape, &record));
        assert!(slots[1].fill(&mut shape, &record));
        assert!(!slots[2].fill(&mut shape, &record));
        assert_eq!(shape.id, EntityId(5));
        assert_eq!(shape.position, Some(Position { x: 1.0, y: 2.0 }));
        assert!(shape.name.is_none());

        let taken = slots[1].take(&mut shape).unwrap();
        assert_eq!(taken.type_id(), Position::component_type_id());
        assert!(shape.position.is_none());
        assert!(slots[0].take(&mut shape).is_none());
    }
}
