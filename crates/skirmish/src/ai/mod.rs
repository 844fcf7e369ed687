//! # AI: Abilities, Behaviors, and the Director
//!
//! - [`registry`]: Tiered string-keyed dispatch tables
//! - [`abilities`]: Stock one-shot abilities (10 enemy, 6 boss)
//! - [`behaviors`]: Stock movement behaviors (5 enemy, 3 boss)
//! - [`director`]: Per-frame steering plus the phase-transition check

pub mod abilities;
pub mod behaviors;
pub mod director;
pub mod registry;

pub use director::{Director, DirectorReport};
pub use registry::{
    AbilityContext, AbilityFn, AbilityRegistry, BehaviorFn, BehaviorRegistry, Tier, TieredTable,
};
