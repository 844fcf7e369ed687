//! Presentation effects requested by gameplay code.
//!
//! Abilities don't draw particles or shake the camera themselves. They call an
//! [`EffectSink`], and whatever owns the renderer decides what that means.
//! [`EffectQueue`] is the sink the simulation uses: it records requests so the
//! host can drain them once per frame.

use serde::Serialize;

use crate::math::Vec2;

/// Receives effect requests from abilities.
pub trait EffectSink {
    /// Burst of `count` particles at `position`.
    fn spawn_explosion(&mut self, position: Vec2, count: u32);

    /// Camera shake of the given intensity, in seconds.
    fn trigger_shake(&mut self, intensity: f32, duration: f32);
}

/// A recorded effect request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Effect {
    Explosion { position: Vec2, count: u32 },
    Shake { intensity: f32, duration: f32 },
}

/// Sink that drops everything. Handy for headless runs and tests that only
/// care about gameplay state.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoEffects;

impl EffectSink for NoEffects {
    fn spawn_explosion(&mut self, _position: Vec2, _count: u32) {}
    fn trigger_shake(&mut self, _intensity: f32, _duration: f32) {}
}

/// Sink that buffers requests in order.
#[derive(Debug, Default)]
pub struct EffectQueue {
    pending: Vec<Effect>,
}

impl EffectQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every queued effect, oldest first.
    pub fn drain(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.pending)
    }

    pub fn pending(&self) -> &[Effect] {
        &self.pending
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl EffectSink for EffectQueue {
    fn spawn_explosion(&mut self, position: Vec2, count: u32) {
        log::debug!("explosion x{count} at {position}");
        self.pending.push(Effect::Explosion { position, count });
    }

    fn trigger_shake(&mut self, intensity: f32, duration: f32) {
        log::debug!("shake {intensity} for {duration}s");
        self.pending.push(Effect::Shake {
            intensity,
            duration,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_records_in_order_and_drains() {
        let mut q = EffectQueue::new();
        q.trigger_shake(8.0, 1.0);
        q.spawn_explosion(Vec2::new(1.0, 2.0), 50);
        assert_eq!(q.pending().len(), 2);

        let drained = q.drain();
        assert_eq!(
            drained,
            vec![
                Effect::Shake {
                    intensity: 8.0,
                    duration: 1.0
                },
                Effect::Explosion {
                    position: Vec2::new(1.0, 2.0),
                    count: 50
                },
            ]
        );
        assert!(q.is_empty());
    }

    #[test]
    fn effect_serializes_with_kind_tag() {
        let json = serde_json::to_value(Effect::Shake {
            intensity: 2.0,
            duration: 0.5,
        })
        .unwrap();
        assert_eq!(json["kind"], "shake");
        assert_eq!(json["intensity"], 2.0);
    }
}
