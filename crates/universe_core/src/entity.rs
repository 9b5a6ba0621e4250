//! Entity ids and the counter that issues them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::UniverseError;

/// Opaque handle naming one entity in a universe.
///
/// Ids are strictly increasing within a store and never reused, so an id that
/// has been deleted stays dead for good. Ids from different universes are
/// unrelated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

impl EntityId {
    /// Never issued by any store; the value of an unset identifier field.
    pub const INVALID: EntityId = EntityId(0);

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// `false` only for [`EntityId::INVALID`].
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != EntityId::INVALID.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Issues ids for one store, starting at 1.
///
/// Nothing is ever handed back. Once the `u64` space is used up, allocation
/// fails instead of wrapping onto ids that were already issued.
#[derive(Debug)]
pub struct EntityAllocator {
    issued: u64,
}

impl EntityAllocator {
    #[must_use]
    pub fn new() -> Self {
        Self { issued: 0 }
    }

    /// Issue the next id.
    pub fn allocate(&mut self) -> Result<EntityId, UniverseError> {
        let next = self
            .issued
            .checked_add(1)
            .ok_or(UniverseError::IdsExhausted)?;
        self.issued = next;
        Ok(EntityId(next))
    }

    /// How many ids have been issued, deleted ones included.
    #[must_use]
    pub fn issued(&self) -> u64 {
        self.issued
    }
}

impl Default for EntityAllocator {
    fn default() -> Self {
        Self::new()
    }
}
