//! # Entity-Component Runtime
//!
//! Entities own an ordered bag of boxed components; the registry owns the
//! entities. There are no archetypes or columns here: an entity carries a
//! handful of components and lookups are a short linear scan.
//!
//! ## Module Overview
//!
//! - [`entity`]: Monotonic ids and the `Entity` record
//! - [`component`]: The `Component` trait and per-entity `ComponentStore`
//! - [`registry`]: Central container, deferred removal, snapshots

pub mod component;
pub mod entity;
pub mod registry;

pub use component::{Component, ComponentStore};
pub use entity::{DEFAULT_ENTITY_SIZE, Entity, EntityId};
pub use registry::EntityRegistry;
