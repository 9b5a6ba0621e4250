//! # universe
//!
//! An in-memory, single-process entity/component store with typed views.
//!
//! A [`Universe`] associates opaque [`EntityId`]s with bags of components and
//! answers filtered queries over them. A [`View`] compiles a struct-shaped
//! schema (declared with [`shape!`]) once and then fetches, iterates, and
//! spawns entities in that shape without per-call boilerplate.
//!
//! ```rust
//! use universe::{components, shape, Component, Universe, View};
//!
//! #[derive(Debug, Clone)]
//! struct Position { x: f32, y: f32 }
//! impl Component for Position {
//!     fn type_name() -> &'static str {
//!         "Position"
//!     }
//! }
//!
//! #[derive(Debug, Clone)]
//! struct Name(String);
//! impl Component for Name {
//!     fn type_name() -> &'static str {
//!         "Name"
//!     }
//! }
//!
//! shape! {
//!     struct Named {
//!         position: Position,
//!         name: Name,
//!     }
//! }
//!
//! let mut universe = Universe::new();
//! for i in 0..32 {
//!     universe
//!         .spawn(components![
//!             Position { x: 5.0 * i as f32, y: 10.0 * i as f32 },
//!             Name(format!("Joe #{i}")),
//!         ])
//!         .unwrap();
//! }
//!
//! let view = View::<Named>::new().unwrap();
//! let (x, y) = view.iter(&universe).fold((0.0, 0.0), |(x, y), named| {
//!     let position = named.position.unwrap();
//!     (x + position.x, y + position.y)
//! });
//! assert_eq!((x, y), (2480.0, 4960.0));
//! ```
//!
//! The store is synchronous and does no internal locking. Share it across
//! threads only behind an external lock.

pub mod config;
pub mod shape;
pub mod storage;
pub mod universe;
pub mod view;

pub use config::UniverseConfig;
pub use shape::{Shape, Slot, SlotKind};
pub use storage::{EntityStorage, SimpleStorage};
pub use universe::Universe;
pub use view::View;

pub use universe_core::{
    Component, ComponentBox, ComponentTypeId, EntityAllocator, EntityId, EntityRecord, Filter,
    UniverseError, components,
};
