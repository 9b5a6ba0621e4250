//! Universe configuration.

use serde::{Deserialize, Serialize};

/// Configuration for a [`Universe`](crate::Universe).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UniverseConfig {
    /// Number of entities the default storage reserves room for up front.
    pub initial_capacity: usize,
    /// When set, removing a component from a dead entity is an error
    /// instead of a `false` result.
    pub strict_removal: bool,
}

impl UniverseConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve room for `capacity` entities.
    #[must_use]
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Toggle strict component removal.
    #[must_use]
    pub fn with_strict_removal(mut self, strict: bool) -> Self {
        self.strict_removal = strict;
        self
    }
}

impl Default for UniverseConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 0,
            strict_removal: false,
        }
    }
}
