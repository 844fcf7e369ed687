//! Stock abilities.
//!
//! Each body looks up the components it needs and quietly skips whatever part
//! of its effect it can't apply. A caster with Health but no Transform can
//! still Heal; it just can't AreaDamage anyone.
//!
//! Positional abilities take the caster's position from its [`Transform`] and
//! measure targets by their entity position.
//!
//! | Tier  | Id            | Effect                                                  |
//! |-------|---------------|---------------------------------------------------------|
//! | Enemy | RangedAttack  | Spawns an `EnemyProjectile` moving right                 |
//! | Enemy | MeleeAttack   | Damages players within the caster's attack range        |
//! | Enemy | Teleport      | Random jump, uniform per axis within `teleport_range`   |
//! | Enemy | Summon        | One `SummonedEnemy` nearby, behavior `Aggressive`       |
//! | Enemy | Heal          | Restores `heal_fraction` of max health                  |
//! | Enemy | Invisibility  | Sprite tint goes fully transparent                      |
//! | Enemy | AreaDamage    | Flat damage to other active entities in range           |
//! | Enemy | SpeedBoost    | Multiplies current velocity                             |
//! | Enemy | Shield        | Adds shield points that soak damage                     |
//! | Enemy | Stun          | Stuns other AI entities in range                        |
//! | Boss  | PhaseShift    | Purple tint plus temporary invulnerability              |
//! | Boss  | RageMode      | Multiplies detection and attack range                   |
//! | Boss  | SummonMinions | `minion_count` `BossMinion`s nearby                     |
//! | Boss  | LaserBeam     | Spawns a fast, long `LaserBeam` projectile              |
//! | Boss  | Earthquake    | Screen shake, then damage to everything in range        |
//! | Boss  | Nuke          | Explosion, then damage falling off linearly with range  |

use rand::Rng;
use rand::rngs::SmallRng;

use super::registry::{AbilityContext, AbilityRegistry, Tier};
use crate::components::{Ai, Health, Physics, Player, Sprite, Transform};
use crate::ecs::{EntityId, EntityRegistry};
use crate::math::{Color, Rect, Vec2};

pub fn register_defaults(registry: &mut AbilityRegistry) {
    registry.register(Tier::Enemy, "RangedAttack", ranged_attack);
    registry.register(Tier::Enemy, "MeleeAttack", melee_attack);
    registry.register(Tier::Enemy, "Teleport", teleport);
    registry.register(Tier::Enemy, "Summon", summon);
    registry.register(Tier::Enemy, "Heal", heal);
    registry.register(Tier::Enemy, "Invisibility", invisibility);
    registry.register(Tier::Enemy, "AreaDamage", area_damage);
    registry.register(Tier::Enemy, "SpeedBoost", speed_boost);
    registry.register(Tier::Enemy, "Shield", shield);
    registry.register(Tier::Enemy, "Stun", stun);

    registry.register(Tier::Boss, "PhaseShift", phase_shift);
    registry.register(Tier::Boss, "RageMode", rage_mode);
    registry.register(Tier::Boss, "SummonMinions", summon_minions);
    registry.register(Tier::Boss, "LaserBeam", laser_beam);
    registry.register(Tier::Boss, "Earthquake", earthquake);
    registry.register(Tier::Boss, "Nuke", nuke);
}

fn caster_position(entities: &EntityRegistry, caster: EntityId) -> Option<Vec2> {
    entities.get(caster)?.get::<Transform>().map(|t| t.position)
}

/// Offset with each axis uniform in `[-range, range)`.
fn scatter(rng: &mut SmallRng, range: f32) -> Vec2 {
    Vec2::new(
        (rng.r#gen::<f32>() - 0.5) * 2.0 * range,
        (rng.r#gen::<f32>() - 0.5) * 2.0 * range,
    )
}

/// Apply `damage` to the Health of every id in `targets` that has one.
fn damage_each(entities: &mut EntityRegistry, targets: &[EntityId], damage: i32) {
    for &id in targets {
        if let Some(health) = entities.get_mut(id).and_then(|e| e.get_mut::<Health>()) {
            health.take_damage(damage);
        }
    }
}

// ── Enemy tier ──────────────────────────────────────────────────────────

fn ranged_attack(ctx: &mut AbilityContext<'_>, caster: EntityId) {
    let origin = caster_position(ctx.entities, caster);
    let speed = ctx.tuning.projectile_speed;
    let projectile = ctx.entities.create("EnemyProjectile");
    if let Some(origin) = origin {
        projectile.at(origin);
    }
    projectile
        .insert(Physics::new().with_velocity(Vec2::new(speed, 0.0)))
        .insert(Sprite::new("EnemyProjectile"));
}

fn melee_attack(ctx: &mut AbilityContext<'_>, caster: EntityId) {
    let Some(caster_entity) = ctx.entities.get(caster) else {
        return;
    };
    let Some(reach) = caster_entity.get::<Ai>().map(|ai| ai.attack_range) else {
        return;
    };
    let Some(origin) = caster_entity.get::<Transform>().map(|t| t.position) else {
        return;
    };
    let targets: Vec<EntityId> = ctx
        .entities
        .entities_in_radius(origin, reach)
        .into_iter()
        .filter(|&id| id != caster)
        .filter(|&id| ctx.entities.get(id).is_some_and(|e| e.has::<Player>()))
        .collect();
    damage_each(ctx.entities, &targets, ctx.tuning.melee_damage);
}

/// Moves the Transform only; the entity's own position is left alone.
fn teleport(ctx: &mut AbilityContext<'_>, caster: EntityId) {
    let range = ctx.tuning.teleport_range;
    let Some(transform) = ctx
        .entities
        .get_mut(caster)
        .and_then(|e| e.get_mut::<Transform>())
    else {
        return;
    };
    transform.position += scatter(ctx.rng, range);
}

fn summon(ctx: &mut AbilityContext<'_>, caster: EntityId) {
    let origin = caster_position(ctx.entities, caster);
    let offset = scatter(ctx.rng, ctx.tuning.summon_offset);
    let minion = ctx.entities.create("SummonedEnemy");
    if let Some(origin) = origin {
        minion.at(origin + offset);
    }
    minion.insert(Ai::with_behavior("Aggressive"));
}

fn heal(ctx: &mut AbilityContext<'_>, caster: EntityId) {
    let fraction = ctx.tuning.heal_fraction;
    if let Some(health) = ctx
        .entities
        .get_mut(caster)
        .and_then(|e| e.get_mut::<Health>())
    {
        let amount = (health.max as f32 * fraction) as i32;
        health.heal(amount);
    }
}

fn invisibility(ctx: &mut AbilityContext<'_>, caster: EntityId) {
    if let Some(sprite) = ctx
        .entities
        .get_mut(caster)
        .and_then(|e| e.get_mut::<Sprite>())
    {
        sprite.tint = Color::TRANSPARENT;
    }
}

fn area_damage(ctx: &mut AbilityContext<'_>, caster: EntityId) {
    let Some(origin) = caster_position(ctx.entities, caster) else {
        return;
    };
    let targets: Vec<EntityId> = ctx
        .entities
        .entities_in_radius(origin, ctx.tuning.area_radius)
        .into_iter()
        .filter(|&id| id != caster)
        .filter(|&id| ctx.entities.get(id).is_some_and(|e| e.active))
        .collect();
    damage_each(ctx.entities, &targets, ctx.tuning.area_damage);
}

fn speed_boost(ctx: &mut AbilityContext<'_>, caster: EntityId) {
    let factor = ctx.tuning.speed_boost_factor;
    if let Some(physics) = ctx
        .entities
        .get_mut(caster)
        .and_then(|e| e.get_mut::<Physics>())
    {
        physics.velocity *= factor;
    }
}

fn shield(ctx: &mut AbilityContext<'_>, caster: EntityId) {
    let points = ctx.tuning.shield_points;
    if let Some(health) = ctx
        .entities
        .get_mut(caster)
        .and_then(|e| e.get_mut::<Health>())
    {
        health.shield += points;
    }
}

fn stun(ctx: &mut AbilityContext<'_>, caster: EntityId) {
    let Some(origin) = caster_position(ctx.entities, caster) else {
        return;
    };
    let duration = ctx.tuning.stun_duration;
    for id in ctx.entities.entities_in_radius(origin, ctx.tuning.stun_radius) {
        if id == caster {
            continue;
        }
        if let Some(ai) = ctx.entities.get_mut(id).and_then(|e| e.get_mut::<Ai>()) {
            // A shorter stun never cuts a longer one short.
            ai.stun_remaining = ai.stun_remaining.max(duration);
        }
    }
}

// ── Boss tier ───────────────────────────────────────────────────────────

fn phase_shift(ctx: &mut AbilityContext<'_>, caster: EntityId) {
    let duration = ctx.tuning.phase_shift_duration;
    let Some(entity) = ctx.entities.get_mut(caster) else {
        return;
    };
    if let Some(sprite) = entity.get_mut::<Sprite>() {
        sprite.tint = Color::PURPLE;
    }
    if let Some(health) = entity.get_mut::<Health>() {
        health.invulnerable = health.invulnerable.max(duration);
    }
}

fn rage_mode(ctx: &mut AbilityContext<'_>, caster: EntityId) {
    let factor = ctx.tuning.rage_factor;
    if let Some(ai) = ctx.entities.get_mut(caster).and_then(|e| e.get_mut::<Ai>()) {
        ai.attack_range *= factor;
        ai.detection_range *= factor;
    }
}

fn summon_minions(ctx: &mut AbilityContext<'_>, caster: EntityId) {
    let origin = caster_position(ctx.entities, caster);
    for _ in 0..ctx.tuning.minion_count {
        let offset = scatter(ctx.rng, ctx.tuning.minion_offset);
        let minion = ctx.entities.create("BossMinion");
        if let Some(origin) = origin {
            minion.at(origin + offset);
        }
        minion.insert(Ai::with_behavior("Aggressive"));
    }
}

fn laser_beam(ctx: &mut AbilityContext<'_>, caster: EntityId) {
    let Some(origin) = caster_position(ctx.entities, caster) else {
        return;
    };
    let tuning = ctx.tuning;
    ctx.entities
        .create("LaserBeam")
        .at(origin)
        .insert(Transform::from_position(origin))
        .insert(
            Physics::new()
                .with_velocity(Vec2::new(tuning.laser_speed, 0.0))
                .with_box(Rect::new(0.0, 0.0, tuning.laser_length, 8.0)),
        )
        .insert(Sprite::new("LaserBeam"));
}

/// Hits the caster too if it has Health.
fn earthquake(ctx: &mut AbilityContext<'_>, caster: EntityId) {
    ctx.effects
        .trigger_shake(ctx.tuning.shake_intensity, ctx.tuning.shake_duration);
    let Some(origin) = caster_position(ctx.entities, caster) else {
        return;
    };
    let targets = ctx
        .entities
        .entities_in_radius(origin, ctx.tuning.earthquake_radius);
    damage_each(ctx.entities, &targets, ctx.tuning.earthquake_damage);
}

fn nuke(ctx: &mut AbilityContext<'_>, caster: EntityId) {
    let Some(origin) = caster_position(ctx.entities, caster) else {
        return;
    };
    ctx.effects.spawn_explosion(origin, ctx.tuning.nuke_particles);

    let radius = ctx.tuning.nuke_radius;
    let peak = ctx.tuning.nuke_damage;
    let hits: Vec<(EntityId, i32)> = ctx
        .entities
        .iter()
        .filter(|e| e.id() != caster && e.has::<Health>())
        .filter_map(|e| {
            let distance = origin.distance(e.position);
            (distance < radius).then(|| (e.id(), (peak * (1.0 - distance / radius)) as i32))
        })
        .collect();
    for (id, damage) in hits {
        damage_each(ctx.entities, &[id], damage);
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::config::Tuning;
    use crate::effects::{Effect, EffectQueue};

    struct Rig {
        entities: EntityRegistry,
        effects: EffectQueue,
        rng: SmallRng,
        tuning: Tuning,
        abilities: AbilityRegistry,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                entities: EntityRegistry::new(),
                effects: EffectQueue::new(),
                rng: SmallRng::seed_from_u64(42),
                tuning: Tuning::default(),
                abilities: AbilityRegistry::with_defaults(),
            }
        }

        fn cast(&mut self, id: &str, caster: EntityId) -> bool {
            let mut ctx = AbilityContext {
                entities: &mut self.entities,
                effects: &mut self.effects,
                rng: &mut self.rng,
                tuning: &self.tuning,
            };
            self.abilities.execute(id, &mut ctx, caster)
        }

        fn placed(&mut self, name: &str, pos: Vec2) -> EntityId {
            self.entities
                .create(name)
                .at(pos)
                .insert(Transform::from_position(pos))
                .id()
        }

        fn health(&self, id: EntityId) -> i32 {
            self.entities.get(id).unwrap().get::<Health>().unwrap().current
        }
    }

    #[test]
    fn stock_tables_have_expected_sizes() {
        let abilities = AbilityRegistry::with_defaults();
        assert_eq!(abilities.table().len(Tier::Enemy), 10);
        assert_eq!(abilities.table().len(Tier::Boss), 6);
    }

    #[test]
    fn heal_restores_a_quarter_of_max() {
        let mut rig = Rig::new();
        let id = rig
            .entities
            .create("grunt")
            .insert(Health::new(100).with_current(10))
            .id();
        assert!(rig.cast("Heal", id));
        assert_eq!(rig.health(id), 35);
    }

    #[test]
    fn heal_caps_at_max() {
        let mut rig = Rig::new();
        let id = rig
            .entities
            .create("grunt")
            .insert(Health::new(100).with_current(90))
            .id();
        rig.cast("Heal", id);
        assert_eq!(rig.health(id), 100);
    }

    #[test]
    fn nuke_damage_falls_off_linearly() {
        let mut rig = Rig::new();
        let boss = rig.placed("boss", Vec2::ZERO);
        rig.entities.get_mut(boss).unwrap().insert(Health::new(1000));
        let at_100 = rig.placed("mid", Vec2::new(100.0, 0.0));
        let at_200 = rig.placed("edge", Vec2::new(0.0, 200.0));
        let far = rig.placed("far", Vec2::new(300.0, 0.0));
        for id in [at_100, at_200, far] {
            rig.entities.get_mut(id).unwrap().insert(Health::new(100));
        }

        rig.cast("Nuke", boss);
        assert_eq!(rig.health(at_100), 50);
        assert_eq!(rig.health(at_200), 100);
        assert_eq!(rig.health(far), 100);
        assert_eq!(rig.health(boss), 1000);
        assert_eq!(
            rig.effects.drain(),
            vec![Effect::Explosion {
                position: Vec2::ZERO,
                count: 50
            }]
        );
    }

    #[test]
    fn nuke_without_transform_does_nothing() {
        let mut rig = Rig::new();
        let boss = rig.entities.create("boss").id();
        let victim = rig.placed("victim", Vec2::ZERO);
        rig.entities.get_mut(victim).unwrap().insert(Health::new(100));
        rig.cast("Nuke", boss);
        assert_eq!(rig.health(victim), 100);
        assert!(rig.effects.is_empty());
    }

    #[test]
    fn area_damage_skips_caster_and_inactive() {
        let mut rig = Rig::new();
        let caster = rig.placed("caster", Vec2::ZERO);
        let near = rig.placed("near", Vec2::new(100.0, 0.0));
        let asleep = rig.placed("asleep", Vec2::new(10.0, 0.0));
        let out = rig.placed("out", Vec2::new(101.0, 0.0));
        for id in [caster, near, asleep, out] {
            rig.entities.get_mut(id).unwrap().insert(Health::new(100));
        }
        rig.entities.get_mut(asleep).unwrap().active = false;

        rig.cast("AreaDamage", caster);
        assert_eq!(rig.health(caster), 100);
        assert_eq!(rig.health(near), 80);
        assert_eq!(rig.health(asleep), 100);
        assert_eq!(rig.health(out), 100);
    }

    #[test]
    fn earthquake_shakes_and_hits_caster_too() {
        let mut rig = Rig::new();
        let boss = rig.placed("boss", Vec2::ZERO);
        let bystander = rig.placed("bystander", Vec2::new(150.0, 0.0));
        for id in [boss, bystander] {
            rig.entities.get_mut(id).unwrap().insert(Health::new(100));
        }
        rig.cast("Earthquake", boss);
        assert_eq!(rig.health(boss), 90);
        assert_eq!(rig.health(bystander), 90);
        assert_eq!(
            rig.effects.drain(),
            vec![Effect::Shake {
                intensity: 8.0,
                duration: 1.0
            }]
        );
    }

    #[test]
    fn earthquake_without_transform_still_shakes() {
        let mut rig = Rig::new();
        let boss = rig.entities.create("boss").insert(Health::new(100)).id();
        rig.cast("Earthquake", boss);
        assert_eq!(rig.health(boss), 100);
        assert_eq!(rig.effects.drain().len(), 1);
    }

    #[test]
    fn summon_minions_spawns_three_aggressive_nearby() {
        let mut rig = Rig::new();
        let origin = Vec2::new(500.0, 500.0);
        let boss = rig.placed("boss", origin);
        rig.cast("SummonMinions", boss);

        let minions = rig.entities.entities_by_name("BossMinion");
        assert_eq!(minions.len(), 3);
        for id in minions {
            let minion = rig.entities.get(id).unwrap();
            assert_eq!(minion.get::<Ai>().unwrap().behavior, "Aggressive");
            let d = minion.position - origin;
            assert!(d.x.abs() <= 50.0 && d.y.abs() <= 50.0);
        }
    }

    #[test]
    fn teleport_stays_within_range_and_moves_transform_only() {
        let mut rig = Rig::new();
        let id = rig.placed("blinker", Vec2::ZERO);
        for _ in 0..20 {
            rig.cast("Teleport", id);
            let e = rig.entities.get(id).unwrap();
            assert_eq!(e.position, Vec2::ZERO);
            let t = e.get::<Transform>().unwrap().position;
            assert!(t.x.abs() <= 100.0 * 20.0 && t.y.abs() <= 100.0 * 20.0);
        }

        let single = rig.placed("once", Vec2::ZERO);
        rig.cast("Teleport", single);
        let t = rig.entities.get(single).unwrap().get::<Transform>().unwrap().position;
        assert!(t.x.abs() <= 100.0 && t.y.abs() <= 100.0);
    }

    #[test]
    fn ranged_attack_spawns_projectile_even_without_transform() {
        let mut rig = Rig::new();
        let shooter = rig.placed("shooter", Vec2::new(5.0, 6.0));
        rig.cast("RangedAttack", shooter);
        let bare = rig.entities.create("bare").id();
        rig.cast("RangedAttack", bare);

        let shots = rig.entities.entities_by_name("EnemyProjectile");
        assert_eq!(shots.len(), 2);
        let first = rig.entities.get(shots[0]).unwrap();
        assert_eq!(first.position, Vec2::new(5.0, 6.0));
        assert_eq!(first.get::<Physics>().unwrap().velocity, Vec2::new(100.0, 0.0));
        assert_eq!(first.get::<Sprite>().unwrap().texture, "EnemyProjectile");
        assert_eq!(rig.entities.get(shots[1]).unwrap().position, Vec2::ZERO);
    }

    #[test]
    fn melee_hits_only_players_in_attack_range() {
        let mut rig = Rig::new();
        let brute = rig.placed("brute", Vec2::ZERO);
        rig.entities.get_mut(brute).unwrap().insert(Ai::with_behavior("Aggressive"));
        let hero = rig.placed("hero", Vec2::new(40.0, 0.0));
        rig.entities
            .get_mut(hero)
            .unwrap()
            .insert(Player::new())
            .insert(Health::new(100));
        let ally = rig.placed("ally", Vec2::new(10.0, 0.0));
        rig.entities.get_mut(ally).unwrap().insert(Health::new(100));

        rig.cast("MeleeAttack", brute);
        assert_eq!(rig.health(hero), 85);
        assert_eq!(rig.health(ally), 100);
    }

    #[test]
    fn stun_hits_other_ai_in_range() {
        let mut rig = Rig::new();
        let caster = rig.placed("caster", Vec2::ZERO);
        rig.entities.get_mut(caster).unwrap().insert(Ai::default());
        let near = rig.placed("near", Vec2::new(80.0, 0.0));
        let far = rig.placed("far", Vec2::new(81.0, 0.0));
        for id in [near, far] {
            rig.entities.get_mut(id).unwrap().insert(Ai::default());
        }
        rig.cast("Stun", caster);
        let stunned = |id| rig.entities.get(id).unwrap().get::<Ai>().unwrap().stunned();
        assert!(!stunned(caster));
        assert!(stunned(near));
        assert!(!stunned(far));
    }

    #[test]
    fn shield_soaks_later_damage() {
        let mut rig = Rig::new();
        let id = rig.entities.create("tank").insert(Health::new(100)).id();
        rig.cast("Shield", id);
        let health = rig.entities.get_mut(id).unwrap().get_mut::<Health>().unwrap();
        assert_eq!(health.shield, 25);
        health.take_damage(30);
        assert_eq!(health.current, 95);
    }

    #[test]
    fn phase_shift_tints_and_grants_invulnerability() {
        let mut rig = Rig::new();
        let boss = rig
            .entities
            .create("boss")
            .insert(Sprite::new("boss"))
            .insert(Health::new(500))
            .id();
        rig.cast("PhaseShift", boss);
        let e = rig.entities.get(boss).unwrap();
        assert_eq!(e.get::<Sprite>().unwrap().tint, Color::PURPLE);
        assert!(e.get::<Health>().unwrap().invulnerable > 0.0);
    }

    #[test]
    fn rage_mode_doubles_ranges() {
        let mut rig = Rig::new();
        let boss = rig.entities.create("boss").insert(Ai::default()).id();
        rig.cast("RageMode", boss);
        let ai = rig.entities.get(boss).unwrap().get::<Ai>().unwrap();
        assert_eq!(ai.detection_range, 200.0);
        assert_eq!(ai.attack_range, 100.0);
    }

    #[test]
    fn missing_components_mean_partial_or_no_effect() {
        let mut rig = Rig::new();
        let bare = rig.entities.create("bare").id();
        for id in ["Heal", "Invisibility", "SpeedBoost", "Shield", "Stun", "Teleport", "LaserBeam"] {
            assert!(rig.cast(id, bare));
        }
        assert_eq!(rig.entities.len(), 1);
        assert!(rig.entities.get(bare).unwrap().components().is_empty());
    }

    #[test]
    fn casting_for_a_missing_entity_is_harmless() {
        let mut rig = Rig::new();
        let ghost = rig.entities.create("ghost").id();
        rig.entities.remove(ghost);
        rig.entities.update(0.0);
        assert!(rig.cast("Heal", ghost));
        assert!(rig.cast("Nuke", ghost));
        assert!(rig.entities.is_empty());
    }
}
