//! String-keyed dispatch tables for abilities and behaviors.
//!
//! Each table is split into an enemy tier and a boss tier. Lookups check the
//! enemy tier first and only fall back to the boss tier when the id is absent
//! there, so an enemy entry always shadows a boss entry with the same id.
//! Registering an id that already exists in a tier replaces it.
//!
//! Unknown ids are not errors: executing one does nothing and resolving a
//! behavior for one yields [`Vec2::ZERO`].

use std::collections::BTreeMap;
use std::fmt;

use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::config::Tuning;
use crate::ecs::{Entity, EntityId, EntityRegistry};
use crate::effects::EffectSink;
use crate::math::Vec2;

/// Which namespace an ability or behavior lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Enemy,
    Boss,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Enemy => write!(f, "enemy"),
            Tier::Boss => write!(f, "boss"),
        }
    }
}

/// Two ordered id → entry maps with enemy-first lookup.
pub struct TieredTable<F> {
    enemy: BTreeMap<String, F>,
    boss: BTreeMap<String, F>,
}

impl<F> TieredTable<F> {
    pub fn new() -> Self {
        Self {
            enemy: BTreeMap::new(),
            boss: BTreeMap::new(),
        }
    }

    fn tier_map(&self, tier: Tier) -> &BTreeMap<String, F> {
        match tier {
            Tier::Enemy => &self.enemy,
            Tier::Boss => &self.boss,
        }
    }

    /// Bind `id` in `tier`. Returns the entry it replaced, if any.
    pub fn register(&mut self, tier: Tier, id: &str, entry: F) -> Option<F> {
        let map = match tier {
            Tier::Enemy => &mut self.enemy,
            Tier::Boss => &mut self.boss,
        };
        map.insert(id.to_string(), entry)
    }

    /// Resolve `id`, enemy tier first.
    pub fn resolve(&self, id: &str) -> Option<(Tier, &F)> {
        if let Some(entry) = self.enemy.get(id) {
            return Some((Tier::Enemy, entry));
        }
        self.boss.get(id).map(|entry| (Tier::Boss, entry))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.resolve(id).is_some()
    }

    /// Ids registered in one tier, sorted.
    pub fn ids(&self, tier: Tier) -> impl Iterator<Item = &str> {
        self.tier_map(tier).keys().map(String::as_str)
    }

    pub fn len(&self, tier: Tier) -> usize {
        self.tier_map(tier).len()
    }
}

impl<F> Default for TieredTable<F> {
    fn default() -> Self {
        Self::new()
    }
}

// ── Abilities ───────────────────────────────────────────────────────────

/// Everything an ability may touch while it runs.
pub struct AbilityContext<'a> {
    pub entities: &'a mut EntityRegistry,
    pub effects: &'a mut dyn EffectSink,
    pub rng: &'a mut SmallRng,
    pub tuning: &'a Tuning,
}

/// An ability body. Receives the caster's id; the caster may not exist.
pub type AbilityFn = Box<dyn Fn(&mut AbilityContext<'_>, EntityId)>;

/// Named one-shot effects.
#[derive(Default)]
pub struct AbilityRegistry {
    table: TieredTable<AbilityFn>,
}

impl AbilityRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry preloaded with the stock enemy and boss abilities.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        super::abilities::register_defaults(&mut registry);
        registry
    }

    pub fn register(
        &mut self,
        tier: Tier,
        id: &str,
        ability: impl Fn(&mut AbilityContext<'_>, EntityId) + 'static,
    ) {
        if self.table.register(tier, id, Box::new(ability)).is_some() {
            log::debug!("{tier} ability `{id}` replaced");
        }
    }

    /// Run ability `id` for `caster`. Returns whether the id resolved.
    pub fn execute(&self, id: &str, ctx: &mut AbilityContext<'_>, caster: EntityId) -> bool {
        match self.table.resolve(id) {
            Some((tier, ability)) => {
                log::trace!("{caster} uses {tier} ability `{id}`");
                ability(ctx, caster);
                true
            }
            None => {
                log::trace!("unknown ability `{id}` ignored");
                false
            }
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.table.contains(id)
    }

    pub fn table(&self) -> &TieredTable<AbilityFn> {
        &self.table
    }
}

// ── Behaviors ───────────────────────────────────────────────────────────

/// A behavior body: entity and frame delta in, desired velocity out.
pub type BehaviorFn = Box<dyn Fn(&EntityRegistry, &Entity, f32) -> Vec2>;

/// Named per-frame movement functions.
#[derive(Default)]
pub struct BehaviorRegistry {
    table: TieredTable<BehaviorFn>,
}

impl BehaviorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry preloaded with the stock enemy and boss behaviors.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        super::behaviors::register_defaults(&mut registry);
        registry
    }

    pub fn register(
        &mut self,
        tier: Tier,
        id: &str,
        behavior: impl Fn(&EntityRegistry, &Entity, f32) -> Vec2 + 'static,
    ) {
        if self.table.register(tier, id, Box::new(behavior)).is_some() {
            log::debug!("{tier} behavior `{id}` replaced");
        }
    }

    /// Movement for `entity` under behavior `id`. Zero when `id` is unknown.
    pub fn execute(&self, id: &str, entities: &EntityRegistry, entity: &Entity, elapsed: f32) -> Vec2 {
        match self.table.resolve(id) {
            Some((_, behavior)) => behavior(entities, entity, elapsed),
            None => {
                log::trace!("unknown behavior `{id}` for {}", entity.id());
                Vec2::ZERO
            }
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.table.contains(id)
    }

    pub fn table(&self) -> &TieredTable<BehaviorFn> {
        &self.table
    }
}
