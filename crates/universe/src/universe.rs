//! The [`Universe`]: authoritative entity lifecycle and component lookup.

use tracing::{debug, trace};
use universe_core::{
    Component, ComponentBox, ComponentTypeId, EntityId, EntityRecord, Filter, UniverseError,
};

use crate::config::UniverseConfig;
use crate::storage::{EntityStorage, SimpleStorage};

/// An in-memory entity/component store.
///
/// The universe owns every entity record through its storage backend. It is
/// synchronous and performs no internal locking; share it across threads only
/// behind an external lock.
///
/// Lookups (`get`, `read`, `has`) report absence with `Option`/`bool`.
/// Mutations addressed at a dead id fail with [`UniverseError::NoSuchEntity`].
#[derive(Debug)]
pub struct Universe<S: EntityStorage = SimpleStorage> {
    storage: S,
    config: UniverseConfig,
}

impl Universe<SimpleStorage> {
    /// Create an empty universe with the default storage backend.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(UniverseConfig::default())
    }

    /// Create an empty universe with the default storage backend, configured.
    #[must_use]
    pub fn with_config(config: UniverseConfig) -> Self {
        Self {
            storage: SimpleStorage::with_capacity(config.initial_capacity),
            config,
        }
    }
}

impl Default for Universe<SimpleStorage> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EntityStorage> Universe<S> {
    /// Create a universe over a custom storage backend.
    #[must_use]
    pub fn with_storage(storage: S, config: UniverseConfig) -> Self {
        Self { storage, config }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &UniverseConfig {
        &self.config
    }

    /// Borrow the storage backend.
    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    // -- Entity lifecycle --

    /// Create a new entity carrying `components` and return its id.
    ///
    /// Fails with [`UniverseError::DuplicateComponentType`] if two components
    /// share a kind.
    pub fn spawn<I>(&mut self, components: I) -> Result<EntityId, UniverseError>
    where
        I: IntoIterator<Item = ComponentBox>,
    {
        let components: Vec<ComponentBox> = components.into_iter().collect();
        let count = components.len();
        let id = self.storage.create(components)?;
        debug!(entity = %id, components = count, "spawned entity");
        Ok(id)
    }

    /// Borrow the record for `id`, or `None` if it is unknown or deleted.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&EntityRecord> {
        self.storage.get(id)
    }

    /// Mutably borrow the record for `id`, or `None` if it is unknown or deleted.
    #[must_use]
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut EntityRecord> {
        self.storage.get_mut(id)
    }

    /// Delete an entity. Deleting an unknown id is a no-op.
    ///
    /// Returns `true` if a live entity was removed. The id is never reissued.
    pub fn delete(&mut self, id: EntityId) -> bool {
        let removed = self.storage.delete(id);
        if removed {
            debug!(entity = %id, "deleted entity");
        }
        removed
    }

    /// Returns `true` if `id` names a live entity.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.storage.contains(id)
    }

    /// Returns `true` if `id` is live and carries every kind in `types`.
    #[must_use]
    pub fn has(&self, id: EntityId, types: &[ComponentTypeId]) -> bool {
        self.get(id).is_some_and(|record| record.has_all(types))
    }

    /// Returns `true` if `id` is live and carries a `C`.
    #[must_use]
    pub fn has_component<C: Component>(&self, id: EntityId) -> bool {
        self.has(id, &[C::component_type_id()])
    }

    /// Number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Returns `true` if there are no live entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    // -- Component operations --

    /// Borrow the erased component of kind `type_id` on `id`.
    #[must_use]
    pub fn read_erased(&self, id: EntityId, type_id: ComponentTypeId) -> Option<&ComponentBox> {
        self.get(id)?.get(type_id)
    }

    /// Borrow the `C` component on `id`.
    #[must_use]
    pub fn read<C: Component>(&self, id: EntityId) -> Option<&C> {
        self.get(id)?.read::<C>()
    }

    /// Mutably borrow the `C` component on `id`, for in-place updates.
    #[must_use]
    pub fn read_mut<C: Component>(&mut self, id: EntityId) -> Option<&mut C> {
        self.get_mut(id)?.read_mut::<C>()
    }

    /// Attach a component to `id`, replacing any existing one of the same kind.
    ///
    /// Returns the replaced component, if there was one.
    pub fn add_component(
        &mut self,
        id: EntityId,
        component: impl Into<ComponentBox>,
    ) -> Result<Option<ComponentBox>, UniverseError> {
        let component = component.into();
        let record = self
            .storage
            .get_mut(id)
            .ok_or(UniverseError::NoSuchEntity(id))?;
        trace!(entity = %id, component = component.name(), "add component");
        Ok(record.insert(component))
    }

    /// Detach the component of kind `type_id` from `id`.
    ///
    /// Returns whether a component was actually removed. For a dead id this is
    /// `Ok(false)`, or [`UniverseError::NoSuchEntity`] when
    /// [`UniverseConfig::strict_removal`] is set. Removal may reorder the
    /// entity's remaining components.
    pub fn remove_component(
        &mut self,
        id: EntityId,
        type_id: ComponentTypeId,
    ) -> Result<bool, UniverseError> {
        Ok(self.take_component(id, type_id)?.is_some())
    }

    /// Detach and return the `C` component on `id`.
    ///
    /// Dead ids are handled as in [`Universe::remove_component`].
    pub fn remove<C: Component>(&mut self, id: EntityId) -> Result<Option<C>, UniverseError> {
        Ok(self
            .take_component(id, C::component_type_id())?
            .and_then(|boxed| boxed.into_inner::<C>().ok()))
    }

    fn take_component(
        &mut self,
        id: EntityId,
        type_id: ComponentTypeId,
    ) -> Result<Option<ComponentBox>, UniverseError> {
        let strict = self.config.strict_removal;
        let Some(record) = self.storage.get_mut(id) else {
            if strict {
                return Err(UniverseError::NoSuchEntity(id));
            }
            return Ok(None);
        };
        let removed = record.remove(type_id);
        if let Some(component) = &removed {
            trace!(entity = %id, component = component.name(), "removed component");
        }
        Ok(removed)
    }

    // -- Query --

    /// Iterate over the live entities matching `filter`.
    ///
    /// The sequence is evaluated lazily and can be restarted by calling this
    /// again. Order is unspecified.
    pub fn filter<'a>(&'a self, filter: &'a Filter) -> impl Iterator<Item = &'a EntityRecord> + 'a {
        self.storage.filter(filter)
    }

    /// Iterate over the ids of every live entity, in unspecified order.
    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.storage.ids()
    }
}
