//! Storage backends for entity records.
//!
//! [`EntityStorage`] is the contract a [`Universe`](crate::Universe) needs
//! from whatever holds its records. [`SimpleStorage`] is the default: a hash
//! map from id to record, filtered by scanning every record. It is simple and
//! allocation-light but does not scale past moderate entity counts; an indexed
//! or archetype backend can be slotted in behind the same trait without
//! touching the view layer.

use std::collections::HashMap;

use universe_core::{ComponentBox, EntityAllocator, EntityId, EntityRecord, Filter, UniverseError};

/// The capabilities a universe needs from its record storage.
///
/// Implementations issue ids (strictly increasing, starting at 1, never
/// reused) and own every record they create.
pub trait EntityStorage: Send + Sync {
    /// Create a record for a fresh id holding `components`.
    ///
    /// Fails with [`UniverseError::DuplicateComponentType`] if two components
    /// share a kind; no id is consumed in that case. Fails with
    /// [`UniverseError::IdsExhausted`] once no fresh id is left.
    fn create(&mut self, components: Vec<ComponentBox>) -> Result<EntityId, UniverseError>;

    /// Borrow the record for `id`, if it is live.
    fn get(&self, id: EntityId) -> Option<&EntityRecord>;

    /// Mutably borrow the record for `id`, if it is live.
    fn get_mut(&mut self, id: EntityId) -> Option<&mut EntityRecord>;

    /// Remove the record for `id`. Returns `true` if it was live.
    fn delete(&mut self, id: EntityId) -> bool;

    /// Iterate over the live records matching `filter`, in unspecified order.
    ///
    /// The filter is evaluated lazily as the iterator advances.
    fn filter<'a>(&'a self, filter: &'a Filter) -> Box<dyn Iterator<Item = &'a EntityRecord> + 'a>;

    /// Iterate over the ids of every live record, in unspecified order.
    fn ids<'a>(&'a self) -> Box<dyn Iterator<Item = EntityId> + 'a>;

    /// Number of live records.
    fn len(&self) -> usize;

    /// Returns `true` if `id` names a live record.
    fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    /// Returns `true` if there are no live records.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory storage keyed by id, matched by linear scan.
#[derive(Debug, Default)]
pub struct SimpleStorage {
    allocator: EntityAllocator,
    entities: HashMap<EntityId, EntityRecord>,
}

impl SimpleStorage {
    /// Create an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty storage with room for `capacity` records.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            allocator: EntityAllocator::new(),
            entities: HashMap::with_capacity(capacity),
        }
    }

    /// Number of ids issued so far, including deleted ones.
    #[must_use]
    pub fn allocated(&self) -> u64 {
        self.allocator.issued()
    }
}

impl EntityStorage for SimpleStorage {
    fn create(&mut self, components: Vec<ComponentBox>) -> Result<EntityId, UniverseError> {
        universe_core::record::check_distinct(&components)?;
        let id = self.allocator.allocate()?;
        let record = EntityRecord::new(id, components)?;
        self.entities.insert(id, record);
        Ok(id)
    }

    fn get(&self, id: EntityId) -> Option<&EntityRecord> {
        self.entities.get(&id)
    }

    fn get_mut(&mut self, id: EntityId) -> Option<&mut EntityRecord> {
        self.entities.get_mut(&id)
    }

    fn delete(&mut self, id: EntityId) -> bool {
        self.entities.remove(&id).is_some()
    }

    fn filter<'a>(&'a self, filter: &'a Filter) -> Box<dyn Iterator<Item = &'a EntityRecord> + 'a> {
        Box::new(self.entities.values().filter(move |record| filter.matches(record)))
    }

    fn ids<'a>(&'a self) -> Box<dyn Iterator<Item = EntityId> + 'a> {
        Box::new(self.entities.keys().copied())
    }

    fn len(&self) -> usize {
        self.entities.len()
    }
}

#[cfg(test)]
mod tests {
    use universe_core::{Component, components};

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct V1(u8);
    impl Component for V1 {
        fn type_name() -> &'static str {
            "V1"
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct V2(u16);
    impl Component for V2 {
        fn type_name() -> &'static str {
            "V2"
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct V3(u32);
    impl Component for V3 {
        fn type_name() -> &'static str {
            "V3"
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct V4(u64);
    impl Component for V4 {
        fn type_name() -> &'static str {
            "V4"
        }
    }

    fn make_storage(size: u32) -> SimpleStorage {
        let mut storage = SimpleStorage::with_capacity(size as usize);
        for i in 0..size - 1 {
            if i % 2 == 0 {
                storage.create(components![V1(1), V2(2), V3(i)]).unwrap();
            } else {
                storage.create(components![V1(1), V3(i)]).unwrap();
            }
        }
        storage.create(components![V1(1), V2(2), V3(3), V4(4)]).unwrap();
        storage
    }

    #[test]
    fn test_get_unknown_is_none() {
        let storage = SimpleStorage::new();
        assert!(storage.get(EntityId(1)).is_none());
        assert!(storage.is_empty());
    }

    #[test]
    fn test_create_and_read() {
        let mut storage = SimpleStorage::new();
        let id = storage.create(components![V1(1), V2(2), V3(3)]).unwrap();
        assert!(id.is_valid());

        let record = storage.get(id).unwrap();
        assert_eq!(record.read::<V1>(), Some(&V1(1)));
        assert!(record.read::<V4>().is_none());
    }

    #[test]
    fn test_filter_counts() {
        let storage = make_storage(1_000);
        let count = |filter: Filter| storage.filter(&filter).count();

        assert_eq!(count(Filter::new().with::<V1>()), 1_000);
        assert_eq!(count(Filter::new().with::<V2>()), 501);
        assert_eq!(count(Filter::new().with::<V4>()), 1);
        assert_eq!(count(Filter::new().with::<V1>().without::<V2>()), 499);
    }

    #[test]
    fn test_duplicate_does_not_consume_id() {
        let mut storage = SimpleStorage::new();
        let err = storage.create(components![V1(1), V1(2)]).unwrap_err();
        assert!(matches!(err, UniverseError::DuplicateComponentType { .. }));
        assert_eq!(storage.allocated(), 0);
        assert_eq!(storage.create(components![V1(1)]).unwrap(), EntityId(1));
    }

    #[test]
    fn test_delete_is_final() {
        let mut storage = SimpleStorage::new();
        let id = storage.create(components![V1(1)]).unwrap();
        assert!(storage.delete(id));
        assert!(!storage.delete(id));
        assert!(!storage.contains(id));

        let next = storage.create(components![V1(1)]).unwrap();
        assert!(next > id);
        assert_eq!(storage.ids().collect::<Vec<_>>(), vec![next]);
    }
}
