//! Typed views over a universe.
//!
//! A [`View`] compiles a [`Shape`] once into a [`Filter`] plus the ordered
//! list of its slots, then offers typed `get`, `maybe_get`, `iter`, and
//! `spawn` on top of any [`Universe`]. Views hold no entity data and no
//! reference to a universe, so one view can be kept and reused across any
//! number of mutations.
//!
//! Fields are copied out of the store: mutating a filled shape does not touch
//! the stored components. Use [`View::store`] (or
//! [`Universe::read_mut`](crate::Universe::read_mut)) to write changes back.

use std::collections::HashSet;

use tracing::{debug, warn};
use universe_core::{ComponentBox, ComponentTypeId, EntityId, EntityRecord, Filter, UniverseError};

use crate::shape::{Shape, Slot, SlotKind};
use crate::storage::EntityStorage;
use crate::universe::Universe;

/// A compiled, typed projection of entities into the shape `S`.
#[derive(Debug)]
pub struct View<S: Shape> {
    slots: Vec<Slot<S>>,
    filter: Filter,
    required: Vec<ComponentTypeId>,
    optional: Vec<ComponentTypeId>,
    excluded: Vec<ComponentTypeId>,
    identifier: Option<usize>,
}

impl<S: Shape> View<S> {
    /// Compile the shape `S`.
    ///
    /// Fails with [`UniverseError::InvalidShape`] if the shape declares more
    /// than one identifier slot or two slots of the same component kind.
    /// Compilation walks the slot list once; keep the view around rather than
    /// compiling per call.
    pub fn new() -> Result<Self, UniverseError> {
        let shape = std::any::type_name::<S>();
        let slots = S::slots();

        let mut required = Vec::new();
        let mut optional = Vec::new();
        let mut excluded = Vec::new();
        let mut identifier = None;
        let mut seen = HashSet::new();

        for (index, slot) in slots.iter().enumerate() {
            if let Some(type_id) = slot.component_type()
                && !seen.insert(type_id)
            {
                return Err(UniverseError::InvalidShape {
                    shape,
                    reason: format!("field '{}' repeats component kind {}", slot.name(), type_id),
                });
            }

            match (slot.kind(), slot.component_type()) {
                (SlotKind::Identifier, _) => {
                    if identifier.replace(index).is_some() {
                        return Err(UniverseError::InvalidShape {
                            shape,
                            reason: format!("field '{}' is a second identifier slot", slot.name()),
                        });
                    }
                }
                (SlotKind::Required, Some(type_id)) => required.push(type_id),
                (SlotKind::Optional, Some(type_id)) => optional.push(type_id),
                (SlotKind::Excluded, Some(type_id)) => excluded.push(type_id),
                (kind, None) => {
                    return Err(UniverseError::InvalidShape {
                        shape,
                        reason: format!("{:?} field '{}' has no component kind", kind, slot.name()),
                    });
                }
            }
        }

        let filter = Filter::new()
            .with_required(required.iter().copied())
            .with_excluded(excluded.iter().copied());

        debug!(
            shape,
            required = required.len(),
            optional = optional.len(),
            excluded = excluded.len(),
            "compiled view"
        );

        Ok(Self {
            slots,
            filter,
            required,
            optional,
            excluded,
            identifier,
        })
    }

    /// Component kinds an entity must carry to fully match.
    #[must_use]
    pub fn required_types(&self) -> &[ComponentTypeId] {
        &self.required
    }

    /// Component kinds filled when present.
    #[must_use]
    pub fn optional_types(&self) -> &[ComponentTypeId] {
        &self.optional
    }

    /// Component kinds a matching entity must not carry.
    #[must_use]
    pub fn excluded_types(&self) -> &[ComponentTypeId] {
        &self.excluded
    }

    /// Name of the field receiving the entity id, if the shape has one.
    #[must_use]
    pub fn identifier_slot(&self) -> Option<&'static str> {
        self.identifier.map(|index| self.slots[index].name())
    }

    /// The shape's fields, in declaration order.
    #[must_use]
    pub fn slots(&self) -> &[Slot<S>] {
        &self.slots
    }

    /// The filter used for iteration: required and excluded kinds.
    #[must_use]
    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    /// Copy the fields of `target` out of `record`.
    ///
    /// The identifier slot receives the record's id; each component field
    /// found on the record is assigned, and absent ones are left untouched.
    /// Returns `true` iff every required field was found. Optional and
    /// excluded fields never affect the result; exclusion is enforced only by
    /// the filter used for iteration.
    pub fn fill(&self, record: &EntityRecord, target: &mut S) -> bool {
        let mut complete = true;
        for slot in &self.slots {
            let found = slot.fill(target, record);
            if slot.kind() == SlotKind::Required && !found {
                complete = false;
            }
        }
        complete
    }

    /// Fetch `id` as an `S`, whether or not it fully matches.
    ///
    /// An unknown id yields an instance with every field empty. Use
    /// [`View::maybe_get`] to learn whether the match succeeded.
    #[must_use]
    pub fn get<B: EntityStorage>(&self, universe: &Universe<B>, id: EntityId) -> S {
        self.maybe_get(universe, id).0
    }

    /// Fetch `id` as an `S`, reporting whether it fully matched.
    ///
    /// The flag is `false` if the entity is absent or lacks a required
    /// component; fields that could be filled are filled regardless.
    #[must_use]
    pub fn maybe_get<B: EntityStorage>(&self, universe: &Universe<B>, id: EntityId) -> (S, bool) {
        let mut item = S::default();
        let Some(record) = universe.get(id) else {
            return (item, false);
        };
        let complete = self.fill(record, &mut item);
        (item, complete)
    }

    /// Iterate over every entity matching this view, filled as `S`.
    ///
    /// The universe is queried lazily; calling this again re-queries it.
    /// Order is unspecified.
    pub fn iter<'a, B: EntityStorage>(
        &'a self,
        universe: &'a Universe<B>,
    ) -> impl Iterator<Item = S> + 'a {
        universe.filter(&self.filter).filter_map(move |record| {
            let mut item = S::default();
            if self.fill(record, &mut item) {
                Some(item)
            } else {
                warn!(entity = %record.id(), "filtered entity failed to fill view, skipping");
                None
            }
        })
    }

    /// Count the entities matching this view.
    #[must_use]
    pub fn count<B: EntityStorage>(&self, universe: &Universe<B>) -> usize {
        universe.filter(&self.filter).count()
    }

    /// Spawn an entity from the non-empty component fields of `instance`, in
    /// field order. The identifier field is ignored.
    pub fn spawn<B: EntityStorage>(
        &self,
        universe: &mut Universe<B>,
        instance: S,
    ) -> Result<EntityId, UniverseError> {
        universe.spawn(self.decompose(instance))
    }

    /// Write the non-empty component fields of `instance` onto the live entity
    /// `id`, replacing components of the same kinds. Empty fields leave the
    /// entity's components untouched.
    pub fn store<B: EntityStorage>(
        &self,
        universe: &mut Universe<B>,
        id: EntityId,
        instance: S,
    ) -> Result<(), UniverseError> {
        if !universe.contains(id) {
            return Err(UniverseError::NoSuchEntity(id));
        }
        for component in self.decompose(instance) {
            universe.add_component(id, component)?;
        }
        Ok(())
    }

    fn decompose(&self, mut instance: S) -> Vec<ComponentBox> {
        self.slots
            .iter()
            .filter_map(|slot| slot.take(&mut instance))
            .collect()
    }
}
