//! Demo component and shape definitions.

use serde::{Deserialize, Serialize};
use universe::{Component, EntityId, shape};

/// A 2D position.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Move by `velocity` over `dt` seconds.
    #[must_use]
    pub fn advanced(self, velocity: Velocity, dt: f32) -> Self {
        Self {
            x: self.x + velocity.dx * dt,
            y: self.y + velocity.dy * dt,
        }
    }
}

impl Component for Position {
    fn type_name() -> &'static str {
        "Position"
    }
}

/// A 2D velocity in units per second.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Velocity {
    /// Horizontal speed.
    pub dx: f32,
    /// Vertical speed.
    pub dy: f32,
}

impl Component for Velocity {
    fn type_name() -> &'static str {
        "Velocity"
    }
}

/// A display name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Name {
    /// The entity's display name.
    pub value: String,
}

impl Name {
    /// Create a new name component.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { value: name.into() }
    }
}

impl Component for Name {
    fn type_name() -> &'static str {
        "Name"
    }
}

/// Marks the entity driven by player input.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PlayerController;

impl Component for PlayerController {
    fn type_name() -> &'static str {
        "PlayerController"
    }
}

/// Marks an entity that must not move.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Frozen;

impl Component for Frozen {
    fn type_name() -> &'static str {
        "Frozen"
    }
}

shape! {
    /// Anything with a position and a name.
    #[derive(Debug, Clone)]
    pub struct Labelled {
        pub position: Position,
        pub name: Name,
    }
}

shape! {
    /// Entities the movement step advances.
    #[derive(Debug, Clone)]
    pub struct Movable {
        #[id]
        pub id: EntityId,
        pub position: Position,
        pub velocity: Velocity,
        #[excluded]
        pub frozen: Frozen,
    }
}

shape! {
    /// The player entity.
    #[derive(Debug, Clone)]
    pub struct Player {
        #[id]
        pub id: EntityId,
        pub position: Position,
        pub name: Name,
        pub controller: PlayerController,
        #[optional]
        pub velocity: Velocity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_advanced() {
        let p = Position::new(1.0, 2.0).advanced(Velocity { dx: 2.0, dy: -4.0 }, 0.5);
        assert_eq!(p, Position::new(2.0, 0.0));
    }

    #[test]
    fn test_named_components_have_stable_ids() {
        assert_eq!(
            Position::component_type_id(),
            universe::ComponentTypeId::from_name("Position")
        );
        assert_ne!(Frozen::component_type_id(), PlayerController::component_type_id());
    }
}
