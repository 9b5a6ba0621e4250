//! Error types for store mutations and view compilation.

use crate::component::ComponentTypeId;
use crate::entity::EntityId;

/// Errors raised by mutating operations and by view compilation.
///
/// Lookups never return these; absence is reported with `Option`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UniverseError {
    /// A mutation addressed an id with no live record.
    #[error("entity {0} not found")]
    NoSuchEntity(EntityId),

    /// The store has issued every id it can.
    #[error("entity id space exhausted")]
    IdsExhausted,

    /// A component list carried two values of the same kind.
    #[error("duplicate component type '{name}' ({type_id})")]
    DuplicateComponentType {
        /// Type name of the repeated component.
        name: &'static str,
        /// Identity token of the repeated component.
        type_id: ComponentTypeId,
    },

    /// A shape could not be compiled into a view.
    #[error("invalid shape '{shape}': {reason}")]
    InvalidShape {
        /// Type name of the offending shape.
        shape: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}
