//! Built-in component kinds.
//!
//! Transform, Sprite, Animation, Physics, Health, Ai, and Player. All are plain
//! data with small helper methods. Animation, Health, and Ai also have
//! per-frame work (frame stepping, timers), so they override
//! [`Component::update`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::ecs::Component;
use crate::math::{Color, Rect, Vec2};

// ── Transform ───────────────────────────────────────────────────────────

/// Position, scale, and rotation (radians).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec2,
    pub scale: Vec2,
    pub rotation: f32,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec2::ZERO,
        scale: Vec2::ONE,
        rotation: 0.0,
    };

    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    pub fn from_xy(x: f32, y: f32) -> Self {
        Self::from_position(Vec2::new(x, y))
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Component for Transform {}

// ── Sprite ──────────────────────────────────────────────────────────────

/// A texture reference plus how to draw it. The texture itself lives in an
/// external asset store; we only carry its name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Sprite {
    pub texture: String,
    pub source: Rect,
    pub tint: Color,
    pub depth: f32,
}

impl Sprite {
    pub fn new(texture: &str) -> Self {
        Self {
            texture: texture.to_string(),
            ..Default::default()
        }
    }
}

impl Component for Sprite {}

// ── Animation ───────────────────────────────────────────────────────────

/// One frame of a sprite animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationFrame {
    pub source: Rect,
    /// How long this frame is shown, in seconds.
    pub duration: f32,
    /// Named events attached to this frame (footstep, hit window, ...).
    #[serde(default)]
    pub events: HashMap<String, serde_json::Value>,
}

impl AnimationFrame {
    pub fn new(source: Rect, duration: f32) -> Self {
        Self {
            source,
            duration,
            events: HashMap::new(),
        }
    }
}

/// Frame sequence with a timer. Advances itself every update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    pub name: String,
    pub frames: Vec<AnimationFrame>,
    pub current_frame: usize,
    pub frame_timer: f32,
    pub playing: bool,
    pub looping: bool,
}

impl Animation {
    pub fn new(name: &str, frames: Vec<AnimationFrame>) -> Self {
        Self {
            name: name.to_string(),
            frames,
            current_frame: 0,
            frame_timer: 0.0,
            playing: true,
            looping: true,
        }
    }

    pub fn once(mut self) -> Self {
        self.looping = false;
        self
    }

    /// The frame currently shown, if the sequence isn't empty.
    pub fn frame(&self) -> Option<&AnimationFrame> {
        self.frames.get(self.current_frame)
    }

    pub fn finished(&self) -> bool {
        !self.playing && !self.looping
    }
}

impl Component for Animation {
    fn update(&mut self, elapsed: f32) {
        if !self.playing || self.frames.is_empty() {
            return;
        }
        self.frame_timer += elapsed;
        if self.looping {
            let cycle: f32 = self.frames.iter().map(|f| f.duration).sum();
            if cycle > 0.0 && self.frame_timer >= cycle {
                self.frame_timer %= cycle;
            }
        }
        loop {
            let Some(duration) = self.frames.get(self.current_frame).map(|f| f.duration) else {
                break;
            };
            // Zero-length frames would spin forever.
            if duration <= 0.0 || self.frame_timer < duration {
                break;
            }
            self.frame_timer -= duration;
            if self.current_frame + 1 < self.frames.len() {
                self.current_frame += 1;
            } else if self.looping {
                self.current_frame = 0;
            } else {
                self.playing = false;
                self.frame_timer = 0.0;
                break;
            }
        }
    }
}

// ── Physics ─────────────────────────────────────────────────────────────

/// Velocity plus collision shape.
///
/// `collision_box` is relative to the owning entity's position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Physics {
    pub velocity: Vec2,
    pub collision_box: Rect,
    pub collidable: bool,
    /// Static bodies never move, even with a velocity.
    pub is_static: bool,
}

impl Physics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_box(mut self, collision_box: Rect) -> Self {
        self.collision_box = collision_box;
        self
    }

    /// A collidable body that never moves (walls, props).
    pub fn fixed() -> Self {
        Self {
            is_static: true,
            ..Self::default()
        }
    }

    pub fn non_collidable(mut self) -> Self {
        self.collidable = false;
        self
    }
}

impl Default for Physics {
    fn default() -> Self {
        Self {
            velocity: Vec2::ZERO,
            collision_box: Rect::new(0.0, 0.0, 32.0, 32.0),
            collidable: true,
            is_static: false,
        }
    }
}

impl Component for Physics {}

// ── Health ──────────────────────────────────────────────────────────────

/// Hit points with an alive flag.
///
/// Damage is soaked by `shield` first. While `invulnerable` is positive no
/// damage lands at all; it counts down in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub current: i32,
    pub max: i32,
    pub alive: bool,
    #[serde(default)]
    pub shield: i32,
    #[serde(default)]
    pub invulnerable: f32,
}

impl Health {
    pub fn new(max: i32) -> Self {
        Self {
            current: max,
            max,
            alive: true,
            shield: 0,
            invulnerable: 0.0,
        }
    }

    /// Start below full health.
    pub fn with_current(mut self, current: i32) -> Self {
        self.current = current.clamp(0, self.max.max(0));
        self.alive = self.current > 0;
        self
    }

    /// Apply `amount` damage. Returns the hit points actually lost.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        if amount <= 0 || self.invulnerable > 0.0 {
            return 0;
        }
        let absorbed = amount.min(self.shield.max(0));
        self.shield -= absorbed;
        let remaining = amount - absorbed;

        let before = self.current;
        self.current -= remaining;
        if self.current <= 0 {
            self.current = 0;
            self.alive = false;
        }
        before - self.current
    }

    /// Restore up to `amount` hit points, capped at `max`.
    pub fn heal(&mut self, amount: i32) {
        self.current = (self.current + amount).min(self.max);
        if self.current > 0 {
            self.alive = true;
        }
    }

    /// `current / max`, or 0 for a zero-max pool.
    pub fn ratio(&self) -> f32 {
        if self.max <= 0 {
            0.0
        } else {
            self.current as f32 / self.max as f32
        }
    }
}

impl Component for Health {
    fn update(&mut self, elapsed: f32) {
        if self.invulnerable > 0.0 {
            self.invulnerable = (self.invulnerable - elapsed).max(0.0);
        }
    }
}

// ── Ai ──────────────────────────────────────────────────────────────────

/// Drives an entity through the behavior and ability registries.
///
/// `behavior` is re-resolved every frame; swapping the string is how
/// gameplay code changes what an entity does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ai {
    pub behavior: String,
    pub abilities: Vec<String>,
    pub detection_range: f32,
    pub attack_range: f32,
    pub aggressive: bool,
    /// Seconds of stun left. A stunned entity is held in place.
    #[serde(default)]
    pub stun_remaining: f32,
}

impl Ai {
    pub fn with_behavior(behavior: &str) -> Self {
        Self {
            behavior: behavior.to_string(),
            ..Self::default()
        }
    }

    pub fn ability(mut self, ability: &str) -> Self {
        self.abilities.push(ability.to_string());
        self
    }

    pub fn stunned(&self) -> bool {
        self.stun_remaining > 0.0
    }
}

impl Default for Ai {
    fn default() -> Self {
        Self {
            behavior: String::new(),
            abilities: Vec::new(),
            detection_range: 100.0,
            attack_range: 50.0,
            aggressive: true,
            stun_remaining: 0.0,
        }
    }
}

impl Component for Ai {
    fn update(&mut self, elapsed: f32) {
        if self.stun_remaining > 0.0 {
            self.stun_remaining = (self.stun_remaining - elapsed).max(0.0);
        }
    }
}

// ── Player ──────────────────────────────────────────────────────────────

/// Marks a player-controlled entity and carries its progression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub score: u32,
    pub lives: u32,
    pub inventory: HashMap<String, u32>,
}

impl Player {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` of an item to the inventory.
    pub fn give(&mut self, item: &str, count: u32) {
        *self.inventory.entry(item.to_string()).or_insert(0) += count;
    }
}

impl Default for Player {
    fn default() -> Self {
        Self {
            score: 0,
            lives: 3,
            inventory: HashMap::new(),
        }
    }
}

impl Component for Player {}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames(n: usize, duration: f32) -> Vec<AnimationFrame> {
        (0..n)
            .map(|i| AnimationFrame::new(Rect::new(i as f32 * 16.0, 0.0, 16.0, 16.0), duration))
            .collect()
    }

    #[test]
    fn heal_caps_at_max() {
        let mut h = Health::new(100).with_current(90);
        h.heal(25);
        assert_eq!(h.current, 100);
    }

    #[test]
    fn damage_clamps_and_kills() {
        let mut h = Health::new(30);
        assert_eq!(h.take_damage(50), 30);
        assert_eq!(h.current, 0);
        assert!(!h.alive);

        h.heal(5);
        assert_eq!(h.current, 5);
        assert!(h.alive);
    }

    #[test]
    fn shield_absorbs_first() {
        let mut h = Health::new(100);
        h.shield = 15;
        assert_eq!(h.take_damage(20), 5);
        assert_eq!(h.shield, 0);
        assert_eq!(h.current, 95);
    }

    #[test]
    fn negative_shield_absorbs_nothing() {
        let mut h = Health::new(100);
        h.shield = -10;
        assert_eq!(h.take_damage(20), 20);
        assert_eq!(h.current, 80);
        assert_eq!(h.shield, -10);
    }

    #[test]
    fn with_current_on_negative_max_pool() {
        let h = Health::new(-5).with_current(0);
        assert_eq!(h.current, 0);
        assert!(!h.alive);

        let h = Health::new(-5).with_current(10);
        assert_eq!(h.current, 0);
    }

    #[test]
    fn invulnerability_blocks_damage_until_it_expires() {
        let mut h = Health::new(100);
        h.invulnerable = 1.0;
        assert_eq!(h.take_damage(40), 0);
        assert_eq!(h.current, 100);

        h.update(0.6);
        assert!(h.invulnerable > 0.0);
        h.update(0.6);
        assert_eq!(h.invulnerable, 0.0);
        assert_eq!(h.take_damage(40), 40);
    }

    #[test]
    fn health_ratio() {
        assert_eq!(Health::new(100).with_current(25).ratio(), 0.25);
        assert_eq!(Health::new(0).ratio(), 0.0);
    }

    #[test]
    fn animation_steps_and_loops() {
        let mut anim = Animation::new("walk", frames(3, 0.1));
        anim.update(0.15);
        assert_eq!(anim.current_frame, 1);
        anim.update(0.1);
        assert_eq!(anim.current_frame, 2);
        anim.update(0.1);
        assert_eq!(anim.current_frame, 0);
        assert!(anim.playing);
    }

    #[test]
    fn one_shot_animation_stops_on_last_frame() {
        let mut anim = Animation::new("die", frames(2, 0.1)).once();
        anim.update(0.5);
        assert_eq!(anim.current_frame, 1);
        assert!(anim.finished());
        anim.update(0.5);
        assert_eq!(anim.current_frame, 1);
    }

    #[test]
    fn zero_duration_frames_do_not_spin() {
        let mut anim = Animation::new("glitch", frames(2, 0.0));
        anim.update(1.0);
        assert_eq!(anim.current_frame, 0);
    }

    #[test]
    fn stun_counts_down() {
        let mut ai = Ai::with_behavior("Patrol");
        ai.stun_remaining = 0.5;
        assert!(ai.stunned());
        ai.update(0.3);
        assert!(ai.stunned());
        ai.update(0.3);
        assert!(!ai.stunned());
    }

    #[test]
    fn physics_defaults_match_engine_box() {
        let p = Physics::default();
        assert!(p.collidable);
        assert!(!p.is_static);
        assert_eq!(p.collision_box, Rect::new(0.0, 0.0, 32.0, 32.0));
    }

    #[test]
    fn player_inventory_accumulates() {
        let mut p = Player::new();
        p.give("potion", 2);
        p.give("potion", 1);
        assert_eq!(p.inventory["potion"], 3);
        assert_eq!(p.lives, 3);
    }
}
