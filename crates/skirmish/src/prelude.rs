//! Convenience re-exports for common usage.
//!
//! ```ignore
//! use skirmish::prelude::*;
//! ```

pub use crate::ai::{AbilityContext, AbilityRegistry, BehaviorRegistry, Director, Tier};
pub use crate::collision::CollisionPair;
pub use crate::components::{
    Ai, Animation, AnimationFrame, Health, Physics, Player, Sprite, Transform,
};
pub use crate::config::{ConfigError, PhaseConfig, PhaseTrigger, SimConfig, Tuning};
pub use crate::ecs::{Component, Entity, EntityId, EntityRegistry};
pub use crate::effects::{Effect, EffectQueue, EffectSink, NoEffects};
pub use crate::math::{Aabb, Color, Rect, Vec2};
pub use crate::prefabs::Prefab;
pub use crate::schedule::{Schedule, System, SystemContext};
pub use crate::simulation::{Simulation, TickReport};
pub use crate::time::Time;
