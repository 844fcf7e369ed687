//! # Skirmish: Entity Runtime and Enemy AI Core
//!
//! An entity-component runtime with string-keyed ability and behavior
//! dispatch, a per-frame AI director with boss phase transitions, and a
//! pairwise AABB collision scan. Rendering, input, audio, and asset loading
//! stay outside; they talk to the core through [`Simulation`](simulation::Simulation)
//! and the [`EffectSink`](effects::EffectSink) requests it queues.
//!
//! Start with `use skirmish::prelude::*` and build a
//! [`Simulation`](simulation::Simulation).

pub mod ai;
pub mod collision;
pub mod components;
pub mod config;
pub mod ecs;
pub mod effects;
pub mod math;
pub mod prefabs;
pub mod prelude;
pub mod schedule;
pub mod simulation;
pub mod time;

#[cfg(feature = "diagnostics")]
pub mod diag;
