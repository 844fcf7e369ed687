//! Pairwise AABB collision scan.
//!
//! Every unordered pair of active, collidable entities is tested once per
//! call. An entity's box is its position plus the Physics `collision_box`
//! offset, sized by the box's width and height. Boxes whose edges only touch
//! do not collide (see [`Aabb::intersects`]).
//!
//! Pairs come out in `i < j` order over the id-ordered snapshot. That's the
//! only ordering promise.
//!
//! The scan is O(n²) in the number of collidable entities; there is no broad
//! phase.

use serde::Serialize;

use crate::components::Physics;
use crate::ecs::{Entity, EntityId, EntityRegistry};
use crate::math::Aabb;

/// Two entities whose boxes overlapped during a scan. `a` always has the
/// lower id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CollisionPair {
    pub a: EntityId,
    pub b: EntityId,
}

/// World-space box for an entity, or `None` if it doesn't take part in
/// collisions (inactive, no Physics, or not collidable).
pub fn collision_box(entity: &Entity) -> Option<Aabb> {
    if !entity.active {
        return None;
    }
    let physics = entity.get::<Physics>()?;
    if !physics.collidable {
        return None;
    }
    let origin = entity.position + physics.collision_box.offset();
    Some(Aabb::from_origin_size(origin, physics.collision_box.size()))
}

/// Test every candidate pair and call `on_collision` for each overlap.
/// Returns the number of overlapping pairs.
pub fn scan(registry: &EntityRegistry, mut on_collision: impl FnMut(&Entity, &Entity)) -> usize {
    let candidates: Vec<(&Entity, Aabb)> = registry
        .iter()
        .filter_map(|e| collision_box(e).map(|b| (e, b)))
        .collect();

    let mut hits = 0;
    for (i, (a, box_a)) in candidates.iter().enumerate() {
        for (b, box_b) in &candidates[i + 1..] {
            if box_a.intersects(box_b) {
                log::trace!("collision {} <-> {}", a.id(), b.id());
                on_collision(*a, *b);
                hits += 1;
            }
        }
    }
    hits
}

/// Convenience wrapper around [`scan`] that collects the pairs.
pub fn overlapping_pairs(registry: &EntityRegistry) -> Vec<CollisionPair> {
    let mut pairs = Vec::new();
    scan(registry, |a, b| {
        pairs.push(CollisionPair {
            a: a.id(),
            b: b.id(),
        })
    });
    pairs
}
