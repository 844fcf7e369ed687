//! Ready-made entity setups.
//!
//! [`Prefab`] covers the kinds a level editor places by name. The
//! `spawn_*` helpers build the fuller player, enemy, and boss setups used by
//! gameplay code and the demo.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::components::{Ai, Health, Physics, Player, Sprite, Transform};
use crate::ecs::{EntityId, EntityRegistry};
use crate::math::{Rect, Vec2};

/// Object kinds a level can place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Prefab {
    PlayerSpawn,
    Enemy,
    Wall,
    Trigger,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown prefab `{0}`")]
pub struct UnknownPrefab(pub String);

impl Prefab {
    pub const ALL: [Prefab; 4] = [
        Prefab::PlayerSpawn,
        Prefab::Enemy,
        Prefab::Wall,
        Prefab::Trigger,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Prefab::PlayerSpawn => "PlayerSpawn",
            Prefab::Enemy => "Enemy",
            Prefab::Wall => "Wall",
            Prefab::Trigger => "Trigger",
        }
    }
}

impl fmt::Display for Prefab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Prefab {
    type Err = UnknownPrefab;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Prefab::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| UnknownPrefab(s.to_string()))
    }
}

/// Create a prefab at `position`. The entity is named after the prefab.
///
/// - `Enemy` gets an Ai component patrolling.
/// - `Wall` gets a static, collidable Physics body.
/// - `PlayerSpawn` and `Trigger` are bare markers.
pub fn place(entities: &mut EntityRegistry, prefab: Prefab, position: Vec2) -> EntityId {
    let entity = entities.create(prefab.name());
    entity.at(position);
    match prefab {
        Prefab::Enemy => {
            entity.insert(Ai::with_behavior("Patrol"));
        }
        Prefab::Wall => {
            entity.insert(Physics::fixed());
        }
        Prefab::PlayerSpawn | Prefab::Trigger => {}
    }
    entity.id()
}

/// Place by name. Names that aren't a known prefab still create a plain,
/// componentless entity with that name.
pub fn place_named(entities: &mut EntityRegistry, kind: &str, position: Vec2) -> EntityId {
    match kind.parse::<Prefab>() {
        Ok(prefab) => place(entities, prefab, position),
        Err(_) => {
            log::debug!("placing plain object `{kind}`");
            entities.create(kind).at(position).id()
        }
    }
}

pub fn spawn_player(entities: &mut EntityRegistry, position: Vec2) -> EntityId {
    entities
        .create("Player")
        .at(position)
        .insert(Transform::from_position(position))
        .insert(Sprite::new("Player"))
        .insert(Physics::new())
        .insert(Health::new(100))
        .insert(Player::new())
        .id()
}

/// A standard enemy with the given behavior and abilities.
pub fn spawn_enemy(
    entities: &mut EntityRegistry,
    position: Vec2,
    behavior: &str,
    abilities: &[&str],
) -> EntityId {
    let mut ai = Ai::with_behavior(behavior);
    ai.abilities = abilities.iter().map(|a| a.to_string()).collect();
    entities
        .create("Enemy")
        .at(position)
        .insert(Transform::from_position(position))
        .insert(Sprite::new("Enemy"))
        .insert(Physics::new())
        .insert(Health::new(50))
        .insert(ai)
        .id()
}

/// A boss that runs the phase-transition behavior.
pub fn spawn_boss(entities: &mut EntityRegistry, position: Vec2, max_health: i32) -> EntityId {
    let ai = Ai::with_behavior("PhaseTransition")
        .ability("SummonMinions")
        .ability("Earthquake")
        .ability("Nuke");
    entities
        .create("Boss")
        .at(position)
        .insert(Transform::from_position(position))
        .insert(Sprite::new("Boss"))
        .insert(Physics::new().with_box(Rect::new(0.0, 0.0, 64.0, 64.0)))
        .insert(Health::new(max_health))
        .insert(ai)
        .id()
}
