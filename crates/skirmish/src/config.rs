//! Simulation configuration.
//!
//! Loaded from JSON. Every field has a default, so `{}` is a valid config and
//! partial files only override what they name:
//!
//! ```json
//! {
//!   "rng_seed": 7,
//!   "tuning": { "nuke_radius": 250.0 },
//!   "phase": { "threshold": 0.25, "trigger": "on_crossing" }
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level simulation settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Seed for the ability RNG. `None` seeds from entropy.
    pub rng_seed: Option<u64>,
    pub tuning: Tuning,
    pub phase: PhaseConfig,
}

impl SimConfig {
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json_str(&text)?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tuning.validate()?;
        self.phase.validate()
    }
}

/// Numbers the built-in abilities use. Defaults are the stock game values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub projectile_speed: f32,
    /// Fraction of max health restored by Heal.
    pub heal_fraction: f32,
    /// Teleport offset is uniform in `±teleport_range` per axis.
    pub teleport_range: f32,
    pub summon_offset: f32,
    pub melee_damage: i32,
    pub area_damage: i32,
    pub area_radius: f32,
    pub speed_boost_factor: f32,
    pub shield_points: i32,
    pub stun_radius: f32,
    pub stun_duration: f32,
    pub phase_shift_duration: f32,
    pub rage_factor: f32,
    pub minion_count: u32,
    pub minion_offset: f32,
    pub laser_speed: f32,
    pub laser_length: f32,
    pub earthquake_damage: i32,
    pub earthquake_radius: f32,
    pub shake_intensity: f32,
    pub shake_duration: f32,
    /// Damage at the center of a Nuke; falls off linearly to zero at
    /// `nuke_radius`.
    pub nuke_damage: f32,
    pub nuke_radius: f32,
    pub nuke_particles: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            projectile_speed: 100.0,
            heal_fraction: 0.25,
            teleport_range: 100.0,
            summon_offset: 25.0,
            melee_damage: 15,
            area_damage: 20,
            area_radius: 100.0,
            speed_boost_factor: 2.0,
            shield_points: 25,
            stun_radius: 80.0,
            stun_duration: 2.0,
            phase_shift_duration: 3.0,
            rage_factor: 2.0,
            minion_count: 3,
            minion_offset: 50.0,
            laser_speed: 400.0,
            laser_length: 128.0,
            earthquake_damage: 10,
            earthquake_radius: 150.0,
            shake_intensity: 8.0,
            shake_duration: 1.0,
            nuke_damage: 100.0,
            nuke_radius: 200.0,
            nuke_particles: 50,
        }
    }
}

impl Tuning {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.heal_fraction) {
            return Err(ConfigError::Invalid(format!(
                "heal_fraction {} must be between 0.0 and 1.0",
                self.heal_fraction
            )));
        }
        let amounts = [
            ("area_radius", self.area_radius),
            ("stun_radius", self.stun_radius),
            ("earthquake_radius", self.earthquake_radius),
            ("teleport_range", self.teleport_range),
            ("summon_offset", self.summon_offset),
            ("minion_offset", self.minion_offset),
            ("laser_length", self.laser_length),
            ("nuke_damage", self.nuke_damage),
            ("speed_boost_factor", self.speed_boost_factor),
            ("rage_factor", self.rage_factor),
            ("stun_duration", self.stun_duration),
            ("phase_shift_duration", self.phase_shift_duration),
            ("shake_intensity", self.shake_intensity),
            ("shake_duration", self.shake_duration),
        ];
        for (name, value) in amounts {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        let points = [
            ("melee_damage", self.melee_damage),
            ("area_damage", self.area_damage),
            ("earthquake_damage", self.earthquake_damage),
            ("shield_points", self.shield_points),
        ];
        for (name, value) in points {
            if value < 0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must not be negative, got {value}"
                )));
            }
        }
        // Nuke falloff divides by the radius.
        if !self.nuke_radius.is_finite() || self.nuke_radius <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "nuke_radius must be positive, got {}",
                self.nuke_radius
            )));
        }
        Ok(())
    }
}

/// When the phase ability fires for an entity below the health threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseTrigger {
    /// Every frame the entity stays below the threshold.
    #[default]
    EveryFrame,
    /// Once per downward crossing. Healing back to or above the threshold
    /// re-arms it.
    OnCrossing,
}

/// Health-gated ability firing for boss phases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseConfig {
    /// Behavior whose entities are checked.
    pub behavior: String,
    /// Ability fired when the health ratio drops below `threshold`.
    pub ability: String,
    pub threshold: f32,
    pub trigger: PhaseTrigger,
}

impl Default for PhaseConfig {
    fn default() -> Self {
        Self {
            behavior: "PhaseTransition".to_string(),
            ability: "RageMode".to_string(),
            threshold: 0.3,
            trigger: PhaseTrigger::EveryFrame,
        }
    }
}

impl PhaseConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ConfigError::Invalid(format!(
                "phase threshold {} must be between 0.0 and 1.0",
                self.threshold
            )));
        }
        Ok(())
    }
}
