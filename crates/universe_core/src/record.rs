//! Per-entity component storage.
//!
//! An [`EntityRecord`] is an id plus an unordered list of [`ComponentBox`]es.
//! At most one component per [`ComponentTypeId`] is kept. All lookups are a
//! linear scan, which is cheap for the handful of components a typical entity
//! carries.

use crate::component::{Component, ComponentBox, ComponentTypeId};
use crate::entity::EntityId;
use crate::error::UniverseError;

/// One live entity and the components attached to it.
#[derive(Debug)]
pub struct EntityRecord {
    id: EntityId,
    components: Vec<ComponentBox>,
}

impl EntityRecord {
    /// Create a record, rejecting component lists that repeat a kind.
    pub fn new(id: EntityId, components: Vec<ComponentBox>) -> Result<Self, UniverseError> {
        check_distinct(&components)?;
        Ok(Self { id, components })
    }

    /// The entity this record belongs to.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Number of components attached.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns `true` if no components are attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// The kinds of all attached components, in no particular order.
    pub fn types(&self) -> impl Iterator<Item = ComponentTypeId> + '_ {
        self.components.iter().map(ComponentBox::type_id)
    }

    /// Returns `true` if a component of the given kind is attached.
    #[must_use]
    pub fn has(&self, type_id: ComponentTypeId) -> bool {
        self.position(type_id).is_some()
    }

    /// Returns `true` if every given kind is attached. Vacuously true for no kinds.
    pub fn has_all<'a, I>(&self, types: I) -> bool
    where
        I: IntoIterator<Item = &'a ComponentTypeId>,
    {
        types.into_iter().all(|ty| self.has(*ty))
    }

    /// Returns `true` if at least one of the given kinds is attached.
    pub fn has_any<'a, I>(&self, types: I) -> bool
    where
        I: IntoIterator<Item = &'a ComponentTypeId>,
    {
        types.into_iter().any(|ty| self.has(*ty))
    }

    /// Borrow the erased component of the given kind.
    #[must_use]
    pub fn get(&self, type_id: ComponentTypeId) -> Option<&ComponentBox> {
        self.components.iter().find(|c| c.type_id() == type_id)
    }

    /// Mutably borrow the erased component of the given kind.
    #[must_use]
    pub fn get_mut(&mut self, type_id: ComponentTypeId) -> Option<&mut ComponentBox> {
        self.components.iter_mut().find(|c| c.type_id() == type_id)
    }

    /// Borrow the `C` component, if attached.
    #[must_use]
    pub fn read<C: Component>(&self) -> Option<&C> {
        self.get(C::component_type_id())?.downcast_ref::<C>()
    }

    /// Mutably borrow the `C` component in place, if attached.
    #[must_use]
    pub fn read_mut<C: Component>(&mut self) -> Option<&mut C> {
        self.get_mut(C::component_type_id())?.downcast_mut::<C>()
    }

    /// Attach a component, replacing (and returning) any existing one of the
    /// same kind.
    pub fn insert(&mut self, component: ComponentBox) -> Option<ComponentBox> {
        match self.position(component.type_id()) {
            Some(index) => Some(std::mem::replace(&mut self.components[index], component)),
            None => {
                self.components.push(component);
                None
            }
        }
    }

    /// Detach the component of the given kind.
    ///
    /// The last component is swapped into the vacated slot, so component order
    /// is not preserved.
    pub fn remove(&mut self, type_id: ComponentTypeId) -> Option<ComponentBox> {
        let index = self.position(type_id)?;
        Some(self.components.swap_remove(index))
    }

    fn position(&self, type_id: ComponentTypeId) -> Option<usize> {
        self.components.iter().position(|c| c.type_id() == type_id)
    }
}

/// Fail with [`UniverseError::DuplicateComponentType`] if two components share a kind.
pub fn check_distinct(components: &[ComponentBox]) -> Result<(), UniverseError> {
    for (i, component) in components.iter().enumerate() {
        if components[..i]
            .iter()
            .any(|earlier| earlier.type_id() == component.type_id())
        {
            return Err(UniverseError::DuplicateComponentType {
                name: component.name(),
                type_id: component.type_id(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components;

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
    struct PlayerController;
    impl Component for PlayerController {
        fn type_name() -> &'static str {
            "PlayerController"
        }
    }

    fn make_record() -> EntityRecord {
        EntityRecord::new(
            EntityId(1),
            components![Position { x: 3.0, y: 4.0 }, Name("joe".into())],
        )
        .unwrap()
    }

    #[test]
    fn test_read_component() {
        let record = make_record();
        assert_eq!(record.id(), EntityId(1));
        assert_eq!(record.len(), 2);
        assert_eq!(record.read::<Position>(), Some(&Position { x: 3.0, y: 4.0 }));
        assert!(record.read::<PlayerController>().is_none());
    }

    #[test]
    fn test_has_all_and_any() {
        let record = make_record();
        let position = Position::component_type_id();
        let name = Name::component_type_id();
        let player = PlayerController::component_type_id();

        assert!(record.has_all(&[position, name]));
        assert!(!record.has_all(&[position, player]));
        assert!(record.has_all(&[]));
        assert!(record.has_any(&[player, name]));
        assert!(!record.has_any(&[player]));
    }

    #[test]
    fn test_insert_replaces_same_kind() {
        let mut record = make_record();
        let previous = record.insert(ComponentBox::new(Position { x: 9.0, y: 9.0 }));
        assert_eq!(
            previous.unwrap().into_inner::<Position>().unwrap(),
            Position { x: 3.0, y: 4.0 }
        );
        assert_eq!(record.len(), 2);
        assert_eq!(record.read::<Position>(), Some(&Position { x: 9.0, y: 9.0 }));
    }

    #[test]
    fn test_remove_component() {
        let mut record = make_record();
        assert!(record.remove(Position::component_type_id()).is_some());
        assert!(!record.has(Position::component_type_id()));
        assert!(record.remove(Position::component_type_id()).is_none());
        assert_eq!(record.read::<Name>(), Some(&Name("joe".into())));
    }

    #[test]
    fn test_read_mut_in_place() {
        let mut record = make_record();
        record.read_mut::<Position>().unwrap().x = 100.0;
        assert_eq!(record.read::<Position>().unwrap().x, 100.0);
    }

    #[test]
    fn test_duplicate_kinds_rejected() {
        let err = EntityRecord::new(
            EntityId(1),
            components![Name("a".into()), PlayerController, Name("b".into())],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            UniverseError::DuplicateComponentType { type_id, .. } if type_id == Name::component_type_id()
        ));
    }

    #[test]
    fn test_empty_record() {
        let record = EntityRecord::new(EntityId(7), Vec::new()).unwrap();
        assert!(record.is_empty());
        assert_eq!(record.types().count(), 0);
    }
}
