//! Arena: a headless fight between a player, a few grunts, and a boss.
//!
//! Runs a fixed number of ticks, fires abilities on a timer, and prints what
//! happened. Pass a JSON config path as the first argument to override the
//! tuning, e.g. `cargo run --example arena -- arena.json`.

use skirmish::prefabs;
use skirmish::prelude::*;

const TICKS: u32 = 300;
const DT: f32 = 1.0 / 60.0;

fn main() {
    #[cfg(feature = "diagnostics")]
    skirmish::diag::init_logger();
    #[cfg(not(feature = "diagnostics"))]
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => match SimConfig::load(&path) {
            Ok(config) => config,
            Err(err) => {
                log::error!("{err}");
                std::process::exit(1);
            }
        },
        None => SimConfig {
            rng_seed: Some(7),
            ..SimConfig::default()
        },
    };

    let mut sim = Simulation::new(config);
    setup(&mut sim);

    sim.add_system("cull_projectiles", cull_projectiles);
    sim.add_system("grunt_volley", grunt_volley);
    sim.set_collision_hook(|a, b| {
        if a.name == "EnemyProjectile" || b.name == "EnemyProjectile" {
            log::debug!("projectile hit between {} and {}", a.id(), b.id());
        }
    });

    let Some(&boss) = sim.entities_by_name("Boss").first() else {
        log::error!("arena has no boss");
        return;
    };

    for frame in 1..=TICKS {
        let report = sim.tick(DT);

        if frame % 60 == 0 {
            sim.execute_ability("Earthquake", boss);
        }
        if frame == 120 {
            sim.execute_ability("SummonMinions", boss);
        }
        if frame == 240 {
            sim.execute_ability("Nuke", boss);
        }

        for effect in sim.drain_effects() {
            log::info!("frame {frame}: {effect:?}");
        }
        let hits = sim.drain_collisions();
        if report.director.phase_triggers > 0 || !hits.is_empty() {
            log::debug!(
                "frame {frame}: {} collisions, {} phase triggers",
                hits.len(),
                report.director.phase_triggers
            );
        }
    }

    summarize(&sim);

    #[cfg(feature = "diagnostics")]
    match sim.diagnostics().to_json() {
        Ok(json) => println!("{json}"),
        Err(err) => log::warn!("could not serialize diagnostics: {err}"),
    }
}

fn setup(sim: &mut Simulation) {
    let entities = sim.entities_mut();
    prefabs::spawn_player(entities, Vec2::new(400.0, 300.0));
    for i in 0..3 {
        let y = 200.0 + i as f32 * 100.0;
        prefabs::spawn_enemy(entities, Vec2::new(100.0, y), "Patrol", &["RangedAttack"]);
    }
    let boss = prefabs::spawn_boss(entities, Vec2::new(450.0, 320.0), 400);
    // Start the boss already hurt so the phase check has something to do.
    if let Some(health) = entities.get_mut(boss).and_then(|e| e.get_mut::<Health>()) {
        health.take_damage(300);
    }
    for x in [0.0, 800.0] {
        prefabs::place(entities, Prefab::Wall, Vec2::new(x, 300.0));
    }
}

/// Projectiles that leave the arena are removed.
fn cull_projectiles(cx: &mut SystemContext<'_, '_>) {
    for id in cx.entities().entities_by_name("EnemyProjectile") {
        let out = cx
            .entities()
            .get(id)
            .is_some_and(|e| e.position.x > 800.0 || e.position.x < 0.0);
        if out {
            cx.entities_mut().remove(id);
        }
    }
}

/// Once a second, every grunt that still stands fires its ranged attack.
fn grunt_volley(cx: &mut SystemContext<'_, '_>) {
    if cx.time().frame_count() % 60 != 0 {
        return;
    }
    for id in cx.entities().entities_by_name("Enemy") {
        let alive = cx
            .entities()
            .get(id)
            .and_then(|e| e.get::<Health>())
            .is_some_and(|h| h.alive);
        if alive {
            cx.execute_ability("RangedAttack", id);
        }
    }
}

fn summarize(sim: &Simulation) {
    println!("after {} ticks ({:.1}s):", sim.time().frame_count(), sim.time().elapsed_secs());
    for entity in sim.entities().iter() {
        let health = entity
            .get::<Health>()
            .map(|h| format!("{}/{}", h.current, h.max))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:>4} {:<16} pos=({:>7.1}, {:>7.1}) hp={}",
            entity.id(),
            entity.name,
            entity.position.x,
            entity.position.y,
            health
        );
    }
}
