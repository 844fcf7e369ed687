//! Stock behaviors.
//!
//! Enemy behaviors return nothing for an entity without an [`Ai`] component.
//! Boss behaviors don't check. `PhaseTransition` holds still; the health gate
//! that fires RageMode lives in the director, not here.

use super::registry::{BehaviorRegistry, Tier};
use crate::components::Ai;
use crate::ecs::{Entity, EntityRegistry};
use crate::math::Vec2;

pub fn register_defaults(registry: &mut BehaviorRegistry) {
    registry.register(Tier::Enemy, "Patrol", enemy(Vec2::new(50.0, 0.0)));
    registry.register(Tier::Enemy, "Aggressive", enemy(Vec2::new(100.0, 0.0)));
    registry.register(Tier::Enemy, "Defensive", enemy(Vec2::ZERO));
    registry.register(Tier::Enemy, "Ambush", enemy(Vec2::ZERO));
    registry.register(Tier::Enemy, "Flee", enemy(Vec2::new(-75.0, 0.0)));

    registry.register(Tier::Boss, "Pattern1", |_: &EntityRegistry, _: &Entity, _| {
        Vec2::new(25.0, 0.0)
    });
    registry.register(Tier::Boss, "Pattern2", |_: &EntityRegistry, _: &Entity, _| {
        Vec2::new(0.0, 30.0)
    });
    registry.register(Tier::Boss, "PhaseTransition", |_: &EntityRegistry, _: &Entity, _| {
        Vec2::ZERO
    });
}

/// Constant velocity for anything with an Ai component.
fn enemy(velocity: Vec2) -> impl Fn(&EntityRegistry, &Entity, f32) -> Vec2 {
    move |_: &EntityRegistry, entity: &Entity, _: f32| {
        if entity.has::<Ai>() {
            velocity
        } else {
            Vec2::ZERO
        }
    }
}
