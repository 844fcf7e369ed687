//! Per-frame AI pass.
//!
//! For every active entity with an [`Ai`] component the director resolves the
//! entity's current behavior id to a movement vector and, if the entity has
//! [`Physics`], overwrites its velocity with it. There is no state machine:
//! gameplay code changes what an entity does by assigning a new behavior id.
//!
//! After steering an entity the director runs a second, separate check: if
//! the entity's behavior is the configured phase behavior and its health ratio
//! is below the threshold, the phase ability fires for it. With
//! [`PhaseTrigger::EveryFrame`] that happens on every frame the entity stays
//! below; [`PhaseTrigger::OnCrossing`] fires once per downward crossing.
//!
//! The pass walks a snapshot of ids taken at the start, so anything spawned by
//! a phase ability is first visited on the next frame.

use std::collections::HashSet;

use super::registry::{AbilityContext, AbilityRegistry, BehaviorRegistry};
use crate::components::{Ai, Health, Physics};
use crate::config::{PhaseConfig, PhaseTrigger};
use crate::ecs::EntityId;
use crate::math::Vec2;

/// Counts from one director pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectorReport {
    /// Entities whose behavior was evaluated.
    pub evaluated: usize,
    /// Phase abilities fired.
    pub phase_triggers: usize,
}

pub struct Director {
    phase: PhaseConfig,
    /// Entities currently below the threshold (`OnCrossing` only).
    below: HashSet<EntityId>,
}

impl Director {
    pub fn new(phase: PhaseConfig) -> Self {
        Self {
            phase,
            below: HashSet::new(),
        }
    }

    pub fn phase(&self) -> &PhaseConfig {
        &self.phase
    }

    pub fn update(
        &mut self,
        behaviors: &BehaviorRegistry,
        abilities: &AbilityRegistry,
        ctx: &mut AbilityContext<'_>,
        elapsed: f32,
    ) -> DirectorReport {
        let mut report = DirectorReport::default();

        for id in ctx.entities.all_entities() {
            let Some(entity) = ctx.entities.get(id) else {
                continue;
            };
            if !entity.active {
                continue;
            }
            let Some(ai) = entity.get::<Ai>() else {
                continue;
            };
            report.evaluated += 1;

            let behavior = ai.behavior.clone();
            let movement = if ai.stunned() {
                Vec2::ZERO
            } else {
                behaviors.execute(&behavior, ctx.entities, entity, elapsed)
            };
            let ratio = entity
                .get::<Health>()
                .filter(|h| h.max > 0)
                .map(Health::ratio);

            if let Some(physics) = ctx
                .entities
                .get_mut(id)
                .and_then(|e| e.get_mut::<Physics>())
            {
                physics.velocity = movement;
            }

            if behavior != self.phase.behavior {
                continue;
            }
            let Some(ratio) = ratio else {
                continue;
            };
            if self.should_fire(id, ratio) {
                log::debug!("{id} below {} health, firing `{}`", self.phase.threshold, self.phase.ability);
                abilities.execute(&self.phase.ability, ctx, id);
                report.phase_triggers += 1;
            }
        }

        if !self.below.is_empty() {
            self.below.retain(|id| ctx.entities.contains(*id));
        }
        report
    }

    fn should_fire(&mut self, id: EntityId, ratio: f32) -> bool {
        let below = ratio < self.phase.threshold;
        match self.phase.trigger {
            PhaseTrigger::EveryFrame => below,
            PhaseTrigger::OnCrossing => {
                if below {
                    self.below.insert(id)
                } else {
                    self.below.remove(&id);
                    false
                }
            }
        }
    }
}

impl Default for Director {
    fn default() -> Self {
        Self::new(PhaseConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::ai::Tier;
    use crate::config::Tuning;
    use crate::ecs::EntityRegistry;
    use crate::effects::NoEffects;

    struct Rig {
        entities: EntityRegistry,
        rng: SmallRng,
        tuning: Tuning,
        abilities: AbilityRegistry,
        behaviors: BehaviorRegistry,
        director: Director,
    }

    impl Rig {
        fn new(phase: PhaseConfig) -> Self {
            Self {
                entities: EntityRegistry::new(),
                rng: SmallRng::seed_from_u64(3),
                tuning: Tuning::default(),
                abilities: AbilityRegistry::with_defaults(),
                behaviors: BehaviorRegistry::with_defaults(),
                director: Director::new(phase),
            }
        }

        fn step(&mut self) -> DirectorReport {
            let mut effects = NoEffects;
            let mut ctx = AbilityContext {
                entities: &mut self.entities,
                effects: &mut effects,
                rng: &mut self.rng,
                tuning: &self.tuning,
            };
            self.director
                .update(&self.behaviors, &self.abilities, &mut ctx, 0.016)
        }

        fn velocity(&self, id: EntityId) -> Vec2 {
            self.entities.get(id).unwrap().get::<Physics>().unwrap().velocity
        }

        fn boss(&mut self, current: i32) -> EntityId {
            self.entities
                .create("boss")
                .insert(Ai::with_behavior("PhaseTransition"))
                .insert(Health::new(100).with_current(current))
                .id()
        }

        fn detection(&self, id: EntityId) -> f32 {
            self.entities.get(id).unwrap().get::<Ai>().unwrap().detection_range
        }
    }

    #[test]
    fn behavior_overwrites_velocity() {
        let mut rig = Rig::new(PhaseConfig::default());
        let id = rig
            .entities
            .create("grunt")
            .insert(Ai::with_behavior("Patrol"))
            .insert(Physics::new().with_velocity(Vec2::new(-999.0, 3.0)))
            .id();
        let report = rig.step();
        assert_eq!(report.evaluated, 1);
        assert_eq!(rig.velocity(id), Vec2::new(50.0, 0.0));

        rig.entities.get_mut(id).unwrap().get_mut::<Ai>().unwrap().behavior = "Flee".into();
        rig.step();
        assert_eq!(rig.velocity(id), Vec2::new(-75.0, 0.0));
    }

    #[test]
    fn unknown_behavior_stops_the_entity() {
        let mut rig = Rig::new(PhaseConfig::default());
        let id = rig
            .entities
            .create("lost")
            .insert(Ai::with_behavior("Moonwalk"))
            .insert(Physics::new().with_velocity(Vec2::ONE))
            .id();
        rig.step();
        assert_eq!(rig.velocity(id), Vec2::ZERO);
    }

    #[test]
    fn inactive_and_non_ai_entities_are_left_alone() {
        let mut rig = Rig::new(PhaseConfig::default());
        let sleeper = rig
            .entities
            .create("sleeper")
            .insert(Ai::with_behavior("Patrol"))
            .insert(Physics::new())
            .id();
        rig.entities.get_mut(sleeper).unwrap().active = false;
        let rock = rig
            .entities
            .create("rock")
            .insert(Physics::new().with_velocity(Vec2::ONE))
            .id();

        assert_eq!(rig.step().evaluated, 0);
        assert_eq!(rig.velocity(sleeper), Vec2::ZERO);
        assert_eq!(rig.velocity(rock), Vec2::ONE);
    }

    #[test]
    fn stunned_entity_is_held_still() {
        let mut rig = Rig::new(PhaseConfig::default());
        let mut ai = Ai::with_behavior("Aggressive");
        ai.stun_remaining = 1.0;
        let id = rig.entities.create("dazed").insert(ai).insert(Physics::new()).id();
        rig.step();
        assert_eq!(rig.velocity(id), Vec2::ZERO);

        rig.entities.update(1.0);
        rig.step();
        assert_eq!(rig.velocity(id), Vec2::new(100.0, 0.0));
    }

    #[test]
    fn phase_fires_every_frame_below_threshold_by_default() {
        let mut rig = Rig::new(PhaseConfig::default());
        let boss = rig.boss(29);
        assert_eq!(rig.step().phase_triggers, 1);
        assert_eq!(rig.detection(boss), 200.0);
        assert_eq!(rig.step().phase_triggers, 1);
        assert_eq!(rig.detection(boss), 400.0);
    }

    #[test]
    fn phase_does_not_fire_at_or_above_threshold() {
        let mut rig = Rig::new(PhaseConfig::default());
        let boss = rig.boss(30);
        assert_eq!(rig.step().phase_triggers, 0);
        assert_eq!(rig.detection(boss), 100.0);
    }

    #[test]
    fn phase_needs_the_phase_behavior() {
        let mut rig = Rig::new(PhaseConfig::default());
        let id = rig
            .entities
            .create("grunt")
            .insert(Ai::with_behavior("Patrol"))
            .insert(Health::new(100).with_current(1))
            .id();
        assert_eq!(rig.step().phase_triggers, 0);
        assert_eq!(rig.detection(id), 100.0);
    }

    #[test]
    fn on_crossing_fires_once_and_rearms_after_recovery() {
        let mut rig = Rig::new(PhaseConfig {
            trigger: PhaseTrigger::OnCrossing,
            ..PhaseConfig::default()
        });
        let boss = rig.boss(20);
        assert_eq!(rig.step().phase_triggers, 1);
        assert_eq!(rig.step().phase_triggers, 0);
        assert_eq!(rig.detection(boss), 200.0);

        let health = rig.entities.get_mut(boss).unwrap().get_mut::<Health>().unwrap();
        health.heal(50);
        assert_eq!(rig.step().phase_triggers, 0);

        let health = rig.entities.get_mut(boss).unwrap().get_mut::<Health>().unwrap();
        health.take_damage(60);
        assert_eq!(rig.step().phase_triggers, 1);
        assert_eq!(rig.detection(boss), 400.0);
    }

    #[test]
    fn on_crossing_forgets_removed_entities() {
        let mut rig = Rig::new(PhaseConfig {
            trigger: PhaseTrigger::OnCrossing,
            ..PhaseConfig::default()
        });
        let boss = rig.boss(10);
        rig.step();
        assert!(rig.director.below.contains(&boss));
        rig.entities.remove(boss);
        rig.entities.update(0.0);
        rig.step();
        assert!(rig.director.below.is_empty());
    }

    #[test]
    fn entities_spawned_during_the_pass_wait_for_next_frame() {
        let mut rig = Rig::new(PhaseConfig {
            ability: "SpawnScout".into(),
            ..PhaseConfig::default()
        });
        rig.abilities.register(Tier::Enemy, "SpawnScout", |ctx, _| {
            ctx.entities
                .create("scout")
                .insert(Ai::with_behavior("Patrol"))
                .insert(Physics::new());
        });
        rig.boss(5);

        let report = rig.step();
        assert_eq!(report.evaluated, 1);
        let scout = rig.entities.entities_by_name("scout")[0];
        assert_eq!(rig.velocity(scout), Vec2::ZERO);

        let report = rig.step();
        assert_eq!(report.evaluated, 2);
        assert_eq!(rig.velocity(scout), Vec2::new(50.0, 0.0));
    }
}
