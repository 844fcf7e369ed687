//! # Schedule: Gameplay Systems in the Tick
//!
//! Combat resolution, trigger volumes, and scoring are not part of the core
//! stages. They plug in as labelled systems that run after motion integration
//! and before the collision scan, in the order they were added.
//!
//! Each system receives a [`SystemContext`]: the registry, the clock, and the
//! ability table bound to the same effect sink, RNG, and tuning the director
//! uses. Firing an ability from a system is the out-of-band path for trigger
//! logic:
//!
//! ```ignore
//! sim.add_system("contact_stun", |cx: &mut SystemContext<'_, '_>| {
//!     for id in cx.entities().entities_by_name("StunTrap") {
//!         cx.execute_ability("Stun", id);
//!     }
//! });
//! ```
//!
//! A system can be paused by label and resumed later without losing its
//! place in the order.

use crate::ai::{AbilityContext, AbilityRegistry};
use crate::ecs::{EntityId, EntityRegistry};
use crate::time::Time;

/// What a system sees during its slot in the tick.
pub struct SystemContext<'w, 'a> {
    time: &'w Time,
    abilities: &'w AbilityRegistry,
    world: &'w mut AbilityContext<'a>,
}

impl<'w, 'a> SystemContext<'w, 'a> {
    pub fn new(
        time: &'w Time,
        abilities: &'w AbilityRegistry,
        world: &'w mut AbilityContext<'a>,
    ) -> Self {
        Self {
            time,
            abilities,
            world,
        }
    }

    pub fn time(&self) -> &Time {
        self.time
    }

    pub fn entities(&self) -> &EntityRegistry {
        &*self.world.entities
    }

    pub fn entities_mut(&mut self) -> &mut EntityRegistry {
        &mut *self.world.entities
    }

    pub fn has_ability(&self, id: &str) -> bool {
        self.abilities.contains(id)
    }

    /// Fire ability `id` for `caster`, exactly as the director would.
    /// Returns whether the id resolved.
    pub fn execute_ability(&mut self, id: &str, caster: EntityId) -> bool {
        self.abilities.execute(id, &mut *self.world, caster)
    }
}

/// A gameplay system. Any `FnMut(&mut SystemContext)` qualifies.
pub trait System {
    fn run(&mut self, cx: &mut SystemContext<'_, '_>);
}

impl<F> System for F
where
    F: FnMut(&mut SystemContext<'_, '_>),
{
    fn run(&mut self, cx: &mut SystemContext<'_, '_>) {
        self(cx)
    }
}

/// How long one system took during the last run.
#[cfg(feature = "diagnostics")]
#[derive(Debug, Clone, serde::Serialize)]
pub struct SystemTiming {
    pub label: String,
    pub micros: f64,
}

struct Slot {
    label: String,
    enabled: bool,
    system: Box<dyn System>,
}

/// Labelled systems in run order.
#[derive(Default)]
pub struct Schedule {
    slots: Vec<Slot>,
    #[cfg(feature = "diagnostics")]
    timings: Vec<SystemTiming>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `system` under `label`. Labels need not be unique.
    pub fn add(&mut self, label: impl Into<String>, system: impl System + 'static) {
        let label = label.into();
        log::debug!("system `{label}` scheduled at slot {}", self.slots.len());
        self.slots.push(Slot {
            label,
            enabled: true,
            system: Box::new(system),
        });
    }

    /// Pause or resume every system named `label`. Returns whether any
    /// matched.
    pub fn set_enabled(&mut self, label: &str, enabled: bool) -> bool {
        let mut found = false;
        for slot in self.slots.iter_mut().filter(|s| s.label == label) {
            slot.enabled = enabled;
            found = true;
        }
        found
    }

    /// `None` if no system has this label.
    pub fn is_enabled(&self, label: &str) -> Option<bool> {
        self.slots
            .iter()
            .find(|s| s.label == label)
            .map(|s| s.enabled)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|s| s.label.as_str())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Run every enabled system once, in order.
    pub fn run(&mut self, cx: &mut SystemContext<'_, '_>) {
        #[cfg(feature = "diagnostics")]
        self.timings.clear();

        for slot in self.slots.iter_mut().filter(|s| s.enabled) {
            #[cfg(feature = "diagnostics")]
            let start = std::time::Instant::now();

            slot.system.run(cx);

            #[cfg(feature = "diagnostics")]
            self.timings.push(SystemTiming {
                label: slot.label.clone(),
                micros: start.elapsed().as_secs_f64() * 1_000_000.0,
            });
        }
    }

    #[cfg(feature = "diagnostics")]
    pub(crate) fn timings(&self) -> &[SystemTiming] {
        &self.timings
    }
}
