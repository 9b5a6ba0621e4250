//! Declarative entity filters.
//!
//! A [`Filter`] is a pure predicate over an [`EntityRecord`]: every required
//! kind must be attached and no excluded kind may be. Filters are immutable
//! values; the builder methods return a new filter and leave the receiver
//! untouched, so a base filter can be shared and extended freely.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::component::{Component, ComponentTypeId};
use crate::record::EntityRecord;

/// Required and excluded component kinds.
///
/// ```text
/// matches(record) = required ⊆ record.types ∧ excluded ∩ record.types = ∅
/// ```
///
/// The empty filter matches every entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    required: BTreeSet<ComponentTypeId>,
    excluded: BTreeSet<ComponentTypeId>,
}

impl Filter {
    /// Create the empty filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of this filter that additionally requires the given kinds.
    #[must_use]
    pub fn with_required<I>(&self, types: I) -> Self
    where
        I: IntoIterator<Item = ComponentTypeId>,
    {
        let mut next = self.clone();
        next.required.extend(types);
        next
    }

    /// A copy of this filter that additionally excludes the given kinds.
    #[must_use]
    pub fn with_excluded<I>(&self, types: I) -> Self
    where
        I: IntoIterator<Item = ComponentTypeId>,
    {
        let mut next = self.clone();
        next.excluded.extend(types);
        next
    }

    /// A copy of this filter that additionally requires `C`.
    #[must_use]
    pub fn with<C: Component>(&self) -> Self {
        self.with_required([C::component_type_id()])
    }

    /// A copy of this filter that additionally excludes `C`.
    #[must_use]
    pub fn without<C: Component>(&self) -> Self {
        self.with_excluded([C::component_type_id()])
    }

    /// The filter matching entities that satisfy both `self` and `other`.
    #[must_use]
    pub fn union(&self, other: &Filter) -> Self {
        self.with_required(other.required.iter().copied())
            .with_excluded(other.excluded.iter().copied())
    }

    /// Kinds an entity must carry.
    #[must_use]
    pub fn required(&self) -> &BTreeSet<ComponentTypeId> {
        &self.required
    }

    /// Kinds an entity must not carry.
    #[must_use]
    pub fn excluded(&self) -> &BTreeSet<ComponentTypeId> {
        &self.excluded
    }

    /// Returns `true` if this filter places no constraint at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.required.is_empty() && self.excluded.is_empty()
    }

    /// Returns `true` if some kind is both required and excluded, in which
    /// case the filter matches nothing.
    #[must_use]
    pub fn contradictory(&self) -> bool {
        !self.required.is_disjoint(&self.excluded)
    }

    /// Evaluate the filter against one record.
    #[must_use]
    pub fn matches(&self, record: &EntityRecord) -> bool {
        record.has_all(&self.required) && !record.has_any(&self.excluded)
    }
}
