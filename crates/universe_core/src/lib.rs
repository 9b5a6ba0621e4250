//! # universe_core
//!
//! Primitives of the universe entity store: what a component is, how entities
//! are identified, and how a single entity's components are kept and matched.
//!
//! This crate provides:
//!
//! - [`Component`] trait and [`ComponentTypeId`]: component kinds and their identity tokens.
//! - [`ComponentBox`]: an owned, type-erased component value.
//! - [`EntityId`] and [`EntityAllocator`]: monotonically increasing, never reused ids.
//! - [`EntityRecord`]: one entity's unordered component list.
//! - [`Filter`]: required/excluded kind predicate over records.
//! - [`UniverseError`]: errors raised by mutations and view compilation.

pub mod component;
pub mod entity;
pub mod error;
pub mod filter;
pub mod record;

pub use component::{Component, ComponentBox, ComponentTypeId};
pub use entity::{EntityAllocator, EntityId};
pub use error::UniverseError;
pub use filter::Filter;
pub use record::EntityRecord;
