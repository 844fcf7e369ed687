//! # Simulation: One Tick at a Time
//!
//! [`Simulation`] owns every piece of runtime state: the entity registry, the
//! ability and behavior tables, the AI director, the effect queue, the RNG,
//! and the clock. Surrounding code (rendering, input, audio) talks to it
//! through the methods here and never reaches into globals.
//!
//! ## Frame order
//!
//! ```text
//! tick(dt)
//!   1. time.advance(dt)
//!   2. entities.update(dt)     flush removals, component update hooks
//!   3. director.update(...)    behaviors → velocity, phase abilities
//!   4. integrate motion        position += velocity * dt (non-static)
//!   5. systems.run(...)        gameplay systems, insertion order
//!   6. collision scan          pairs recorded, hook called
//! ```
//!
//! Abilities triggered from outside the tick (combat code, input) go through
//! [`execute_ability`](Simulation::execute_ability) and see the same context
//! the director uses.

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::ai::{
    AbilityContext, AbilityRegistry, BehaviorRegistry, Director, DirectorReport,
};
use crate::collision::{self, CollisionPair};
use crate::components::{Physics, Transform};
use crate::config::{SimConfig, Tuning};
use crate::ecs::{Entity, EntityId, EntityRegistry};
use crate::effects::{Effect, EffectQueue};
use crate::math::Vec2;
use crate::schedule::{Schedule, System, SystemContext};
use crate::time::Time;

/// Called once per overlapping pair during the collision scan.
pub type CollisionHook = Box<dyn FnMut(&Entity, &Entity)>;

/// What happened during one [`tick`](Simulation::tick).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub director: DirectorReport,
    /// Entities moved by motion integration.
    pub moved: usize,
    pub collisions: usize,
}

pub struct Simulation {
    entities: EntityRegistry,
    abilities: AbilityRegistry,
    behaviors: BehaviorRegistry,
    director: Director,
    effects: EffectQueue,
    rng: SmallRng,
    tuning: Tuning,
    time: Time,
    systems: Schedule,
    collisions: Vec<CollisionPair>,
    on_collision: Option<CollisionHook>,
    last_report: TickReport,
}

impl Simulation {
    /// A simulation with the stock abilities and behaviors.
    pub fn new(config: SimConfig) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        log::info!(
            "simulation ready (seed: {})",
            config
                .rng_seed
                .map_or_else(|| "entropy".to_string(), |s| s.to_string())
        );
        Self {
            entities: EntityRegistry::new(),
            abilities: AbilityRegistry::with_defaults(),
            behaviors: BehaviorRegistry::with_defaults(),
            director: Director::new(config.phase),
            effects: EffectQueue::new(),
            rng,
            tuning: config.tuning,
            time: Time::new(),
            systems: Schedule::new(),
            collisions: Vec::new(),
            on_collision: None,
            last_report: TickReport::default(),
        }
    }

    /// Seeded simulation with default tuning. Mostly for tests and demos.
    pub fn seeded(seed: u64) -> Self {
        Self::new(SimConfig {
            rng_seed: Some(seed),
            ..SimConfig::default()
        })
    }

    // ── Frame ────────────────────────────────────────────────────────

    /// Advance the world by `dt` seconds.
    pub fn tick(&mut self, dt: f32) -> TickReport {
        self.time.advance(dt);
        let dt = self.time.delta_secs();

        self.entities.update(dt);

        let director = {
            let mut ctx = AbilityContext {
                entities: &mut self.entities,
                effects: &mut self.effects,
                rng: &mut self.rng,
                tuning: &self.tuning,
            };
            self.director
                .update(&self.behaviors, &self.abilities, &mut ctx, dt)
        };

        let moved = integrate_motion(&mut self.entities, dt);

        {
            let mut world = AbilityContext {
                entities: &mut self.entities,
                effects: &mut self.effects,
                rng: &mut self.rng,
                tuning: &self.tuning,
            };
            let mut cx = SystemContext::new(&self.time, &self.abilities, &mut world);
            self.systems.run(&mut cx);
        }

        let collisions = self.process_collisions();

        let report = TickReport {
            director,
            moved,
            collisions,
        };
        self.last_report = report;
        report
    }

    /// Run the collision scan on its own. Pairs are recorded for
    /// [`drain_collisions`](Self::drain_collisions) and passed to the hook,
    /// if one is set.
    pub fn process_collisions(&mut self) -> usize {
        let collisions = &mut self.collisions;
        let hook = &mut self.on_collision;
        collision::scan(&self.entities, |a, b| {
            collisions.push(CollisionPair {
                a: a.id(),
                b: b.id(),
            });
            if let Some(hook) = hook.as_mut() {
                hook(a, b);
            }
        })
    }

    // ── Entities ─────────────────────────────────────────────────────

    pub fn create_entity(&mut self, name: &str) -> &mut Entity {
        self.entities.create(name)
    }

    pub fn get_entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn get_entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    /// Deferred; the entity stays visible until the next tick starts.
    pub fn remove_entity(&mut self, id: EntityId) {
        self.entities.remove(id);
    }

    pub fn all_entities(&self) -> Vec<EntityId> {
        self.entities.all_entities()
    }

    pub fn entities_by_name(&self, name: &str) -> Vec<EntityId> {
        self.entities.entities_by_name(name)
    }

    pub fn entities_in_radius(&self, center: Vec2, radius: f32) -> Vec<EntityId> {
        self.entities.entities_in_radius(center, radius)
    }

    pub fn entities(&self) -> &EntityRegistry {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut EntityRegistry {
        &mut self.entities
    }

    /// Drop every entity and pending collision, and restart ids from zero.
    pub fn reset(&mut self) {
        self.entities.remove_all();
        self.collisions.clear();
    }

    // ── Abilities / Behaviors ────────────────────────────────────────

    /// Fire ability `name` for `caster`. Returns whether the id resolved.
    pub fn execute_ability(&mut self, name: &str, caster: EntityId) -> bool {
        let mut ctx = AbilityContext {
            entities: &mut self.entities,
            effects: &mut self.effects,
            rng: &mut self.rng,
            tuning: &self.tuning,
        };
        self.abilities.execute(name, &mut ctx, caster)
    }

    /// Evaluate behavior `name` for `id` without applying it. Zero if either
    /// the behavior or the entity is unknown.
    pub fn execute_behavior(&self, name: &str, id: EntityId, elapsed: f32) -> Vec2 {
        match self.entities.get(id) {
            Some(entity) => self
                .behaviors
                .execute(name, &self.entities, entity, elapsed),
            None => Vec2::ZERO,
        }
    }

    pub fn abilities_mut(&mut self) -> &mut AbilityRegistry {
        &mut self.abilities
    }

    pub fn behaviors_mut(&mut self) -> &mut BehaviorRegistry {
        &mut self.behaviors
    }

    pub fn abilities(&self) -> &AbilityRegistry {
        &self.abilities
    }

    pub fn behaviors(&self) -> &BehaviorRegistry {
        &self.behaviors
    }

    // ── Hooks / Output ───────────────────────────────────────────────

    /// Schedule a gameplay system under `label`. See [`crate::schedule`].
    pub fn add_system(&mut self, label: &str, system: impl System + 'static) {
        self.systems.add(label, system);
    }

    /// Pause or resume systems by label. Returns whether any matched.
    pub fn set_system_enabled(&mut self, label: &str, enabled: bool) -> bool {
        self.systems.set_enabled(label, enabled)
    }

    pub fn set_collision_hook(&mut self, hook: impl FnMut(&Entity, &Entity) + 'static) {
        self.on_collision = Some(Box::new(hook));
    }

    /// Effects requested since the last drain, oldest first.
    pub fn drain_effects(&mut self) -> Vec<Effect> {
        self.effects.drain()
    }

    /// Collision pairs recorded since the last drain.
    pub fn drain_collisions(&mut self) -> Vec<CollisionPair> {
        std::mem::take(&mut self.collisions)
    }

    pub fn time(&self) -> &Time {
        &self.time
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn last_report(&self) -> TickReport {
        self.last_report
    }

    /// Serializable snapshot of the last tick. Resets per-tick counters.
    #[cfg(feature = "diagnostics")]
    pub fn diagnostics(&mut self) -> crate::diag::FrameSnapshot {
        crate::diag::FrameSnapshot {
            frame_count: self.time.frame_count(),
            elapsed_secs: self.time.elapsed_secs(),
            delta_ms: self.time.delta_secs() * 1000.0,
            entity_pool: self.entities.diagnostics_entity_stats(),
            ai_evaluated: self.last_report.director.evaluated,
            phase_triggers: self.last_report.director.phase_triggers,
            collisions: self.last_report.collisions,
            system_timings: self.systems.timings().to_vec(),
            logs: crate::diag::drain_captured_logs(64),
        }
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}

/// Move every active, non-static body by its velocity. The entity position
/// and its Transform (if any) shift by the same amount.
fn integrate_motion(entities: &mut EntityRegistry, dt: f32) -> usize {
    let mut moved = 0;
    for id in entities.all_entities() {
        let Some(entity) = entities.get_mut(id) else {
            continue;
        };
        if !entity.active {
            continue;
        }
        let Some(velocity) = entity
            .get::<Physics>()
            .filter(|p| !p.is_static)
            .map(|p| p.velocity)
        else {
            continue;
        };
        if velocity == Vec2::ZERO {
            continue;
        }
        let delta = velocity * dt;
        entity.position += delta;
        if let Some(transform) = entity.get_mut::<Transform>() {
            transform.position += delta;
        }
        moved += 1;
    }
    moved
}
