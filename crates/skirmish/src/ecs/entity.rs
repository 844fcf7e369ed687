//! # Entity: Identity, Placement, and Owned Components
//!
//! An [`Entity`] is a named thing in the world: it has a position, a size, an
//! active flag, an open property bag, and an ordered [`ComponentStore`].
//! Entities are owned by the [`EntityRegistry`](super::registry::EntityRegistry);
//! everyone else refers to them by [`EntityId`].
//!
//! ## Design: Monotonic IDs
//!
//! Generational indices recycle slots and bump a generation counter so stale
//! handles can be detected. We don't recycle at all: every id handed out is
//! strictly greater than the last one, and a removed id is never issued again.
//!
//! ```text
//! create("a") → 0
//! create("b") → 1
//! remove(0); update()
//! create("c") → 2        ← not 0
//! ```
//!
//! A stale [`EntityId`] can therefore never alias a newer entity; lookups on it
//! simply return `None`. The only way to restart the sequence is a full
//! [`EntityRegistry::remove_all`](super::registry::EntityRegistry::remove_all).

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::component::{Component, ComponentStore};
use crate::math::Vec2;

/// Default entity size, in world units.
pub const DEFAULT_ENTITY_SIZE: Vec2 = Vec2::new(32.0, 32.0);

/// A lightweight, copyable handle to an entity in the registry.
///
/// Ordering follows creation order, which is also the registry's iteration
/// order.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub(crate) u64);

impl EntityId {
    /// Returns the raw id. Useful for diagnostics and logs.
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out strictly increasing entity ids.
pub(crate) struct IdAllocator {
    /// The next id to hand out.
    next: u64,
    /// Total ids issued since the last reset.
    issued: u64,
}

impl IdAllocator {
    pub const INITIAL: u64 = 0;

    pub fn new() -> Self {
        Self {
            next: Self::INITIAL,
            issued: 0,
        }
    }

    pub fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        self.issued += 1;
        id
    }

    /// Rewind to the initial id. Only valid when no entity is alive.
    pub fn reset(&mut self) {
        self.next = Self::INITIAL;
        self.issued = 0;
    }

    /// The id the next [`allocate`](Self::allocate) will return.
    #[cfg(any(feature = "diagnostics", test))]
    pub fn peek(&self) -> EntityId {
        EntityId(self.next)
    }

    #[cfg(any(feature = "diagnostics", test))]
    pub fn issued(&self) -> u64 {
        self.issued
    }
}

/// A game object: identity, placement, free-form properties, and components.
#[derive(Debug)]
pub struct Entity {
    id: EntityId,
    pub name: String,
    pub position: Vec2,
    pub size: Vec2,
    /// Inactive entities are skipped by component updates and collisions.
    pub active: bool,
    /// Open string-keyed bag for gameplay data that has no component.
    pub properties: HashMap<String, serde_json::Value>,
    components: ComponentStore,
}

impl Entity {
    pub(crate) fn new(id: EntityId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            position: Vec2::ZERO,
            size: DEFAULT_ENTITY_SIZE,
            active: true,
            properties: HashMap::new(),
            components: ComponentStore::new(),
        }
    }

    /// The id assigned at creation. Never changes.
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Attach a component. Chainable:
    ///
    /// ```ignore
    /// registry.create("grunt")
    ///     .insert(Health::new(100))
    ///     .insert(Ai::with_behavior("Patrol"));
    /// ```
    ///
    /// Nothing stops two components of the same kind from being attached;
    /// lookups return the first one.
    pub fn insert<C: Component>(&mut self, component: C) -> &mut Self {
        self.components.push(component);
        self
    }

    /// Set the position (chainable).
    pub fn at(&mut self, position: Vec2) -> &mut Self {
        self.position = position;
        self
    }

    /// First attached component of kind `C`, if any.
    pub fn get<C: Component>(&self) -> Option<&C> {
        self.components.get::<C>()
    }

    /// Mutable access to the first attached component of kind `C`.
    pub fn get_mut<C: Component>(&mut self) -> Option<&mut C> {
        self.components.get_mut::<C>()
    }

    pub fn has<C: Component>(&self) -> bool {
        self.components.has::<C>()
    }

    pub fn components(&self) -> &ComponentStore {
        &self.components
    }

    pub(crate) fn components_mut(&mut self) -> &mut ComponentStore {
        &mut self.components
    }

    /// Read a property. Returns `None` if the key was never set.
    pub fn property(&self, key: &str) -> Option<&serde_json::Value> {
        self.properties.get(key)
    }

    /// Set a property, replacing any previous value.
    pub fn set_property(&mut self, key: &str, value: impl Into<serde_json::Value>) -> &mut Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }
}
