//! # EntityRegistry: The Central Container
//!
//! The [`EntityRegistry`] owns every entity and, through them, every
//! component. It's the single source of truth for simulation state; the AI
//! director, the collision scan, and abilities all go through it.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │ EntityRegistry                                       │
//! │                                                      │
//! │  allocator: IdAllocator (monotonic, never reuses)    │
//! │                                                      │
//! │  entities: BTreeMap<EntityId, Entity>                │
//! │    ordered by id = creation order                    │
//! │                                                      │
//! │  pending_removal: Vec<EntityId>                      │
//! │    flushed at the start of the next update()         │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Deferred removal and snapshots
//!
//! [`remove`](EntityRegistry::remove) only marks an entity. It stays visible
//! to `get` and to iteration until the next [`update`](EntityRegistry::update)
//! flushes it. Anything that walks entities while also creating or removing
//! them takes a snapshot first with
//! [`all_entities`](EntityRegistry::all_entities), a `Vec<EntityId>`, and
//! re-fetches each id as it goes:
//!
//! ```ignore
//! for id in registry.all_entities() {
//!     let Some(entity) = registry.get_mut(id) else { continue };
//!     // may create or remove other entities here
//! }
//! ```
//!
//! Entities created after the snapshot was taken are not in it, so a pass
//! never visits what it spawned.

use std::collections::BTreeMap;

use super::entity::{Entity, EntityId, IdAllocator};
use crate::math::Vec2;

/// Owns all entities and hands out their ids.
pub struct EntityRegistry {
    allocator: IdAllocator,
    entities: BTreeMap<EntityId, Entity>,
    pending_removal: Vec<EntityId>,
    /// Number of entities created since the last stats read (diagnostics only).
    #[cfg(feature = "diagnostics")]
    spawned_this_frame: u32,
    /// Number of entities flushed since the last stats read (diagnostics only).
    #[cfg(feature = "diagnostics")]
    despawned_this_frame: u32,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self {
            allocator: IdAllocator::new(),
            entities: BTreeMap::new(),
            pending_removal: Vec::new(),
            #[cfg(feature = "diagnostics")]
            spawned_this_frame: 0,
            #[cfg(feature = "diagnostics")]
            despawned_this_frame: 0,
        }
    }

    // ── Create / Lookup ──────────────────────────────────────────────

    /// Create an entity with the next id and return it for setup.
    pub fn create(&mut self, name: &str) -> &mut Entity {
        let id = self.allocator.allocate();
        #[cfg(feature = "diagnostics")]
        {
            self.spawned_this_frame += 1;
        }
        log::trace!("create {id} \"{name}\"");
        self.entities.entry(id).or_insert_with(|| Entity::new(id, name))
    }

    /// Look up an entity. `None` if the id was never issued or has been
    /// flushed.
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Number of entities currently held, including ones pending removal.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    // ── Removal ──────────────────────────────────────────────────────

    /// Mark an entity for removal at the start of the next update.
    ///
    /// Marking twice, or marking an unknown id, does nothing.
    pub fn remove(&mut self, id: EntityId) {
        if !self.entities.contains_key(&id) || self.pending_removal.contains(&id) {
            return;
        }
        log::trace!("mark {id} for removal");
        self.pending_removal.push(id);
    }

    pub fn is_pending_removal(&self, id: EntityId) -> bool {
        self.pending_removal.contains(&id)
    }

    /// Drop every entity and rewind the id counter.
    ///
    /// This is a reset, not a mass removal: nothing is deferred and the next
    /// created entity gets the initial id again.
    pub fn remove_all(&mut self) {
        log::debug!("registry reset ({} entities dropped)", self.entities.len());
        self.entities.clear();
        self.pending_removal.clear();
        self.allocator.reset();
    }

    fn flush_removals(&mut self) {
        for id in self.pending_removal.drain(..) {
            if self.entities.remove(&id).is_some() {
                #[cfg(feature = "diagnostics")]
                {
                    self.despawned_this_frame += 1;
                }
            }
        }
    }

    // ── Iteration / Queries ──────────────────────────────────────────

    /// Point-in-time list of every entity id, ascending.
    pub fn all_entities(&self) -> Vec<EntityId> {
        self.entities.keys().copied().collect()
    }

    /// Iterate live entities in id order. Borrows the registry; take a
    /// snapshot instead if you need to mutate while walking.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Every entity with exactly this name, in id order.
    pub fn entities_by_name(&self, name: &str) -> Vec<EntityId> {
        self.entities
            .values()
            .filter(|e| e.name == name)
            .map(Entity::id)
            .collect()
    }

    /// Every entity whose position lies within `radius` of `center`,
    /// boundary included, in id order. Inactive entities are included; callers
    /// filter if they care.
    pub fn entities_in_radius(&self, center: Vec2, radius: f32) -> Vec<EntityId> {
        self.entities
            .values()
            .filter(|e| e.position.distance(center) <= radius)
            .map(Entity::id)
            .collect()
    }

    // ── Frame ────────────────────────────────────────────────────────

    /// Flush pending removals, then run every component update hook of every
    /// active entity.
    pub fn update(&mut self, elapsed: f32) {
        self.flush_removals();
        for id in self.all_entities() {
            let Some(entity) = self.entities.get_mut(&id) else {
                continue;
            };
            if entity.active {
                entity.components_mut().update_all(elapsed);
            }
        }
    }

    /// Run the pairwise AABB scan, calling `on_collision` once per overlapping
    /// pair. Returns the number of pairs found.
    ///
    /// See [`crate::collision`] for the exact box and overlap rules.
    pub fn process_collisions(&self, on_collision: impl FnMut(&Entity, &Entity)) -> usize {
        crate::collision::scan(self, on_collision)
    }

    /// Collect entity pool statistics and reset per-frame counters.
    #[cfg(feature = "diagnostics")]
    pub(crate) fn diagnostics_entity_stats(&mut self) -> crate::diag::EntityPoolStats {
        let stats = crate::diag::EntityPoolStats {
            live_count: self.entities.len(),
            pending_removal: self.pending_removal.len(),
            next_id: self.allocator.peek().raw(),
            total_issued: self.allocator.issued(),
            spawned_this_tick: self.spawned_this_frame,
            despawned_this_tick: self.despawned_this_frame,
        };
        self.spawned_this_frame = 0;
        self.despawned_this_frame = 0;
        stats
    }
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}
