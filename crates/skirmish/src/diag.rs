//! Diagnostics: frame snapshots and log capture.
//!
//! Enabled by the `diagnostics` feature flag. [`Simulation::diagnostics`]
//! returns a [`FrameSnapshot`] that serializes to JSON, so a host can dump it
//! to a file, print it, or ship it to an external viewer.
//!
//! [`init_logger`] installs a logger that writes to stderr through env_logger
//! and also keeps recent records in a small ring buffer; snapshots drain that
//! buffer so log lines travel with the frame that produced them.
//!
//! [`Simulation::diagnostics`]: crate::simulation::Simulation::diagnostics

use std::collections::VecDeque;
use std::sync::{Mutex, OnceLock};
use std::time::Instant;

use log::Log;
use serde::Serialize;

use crate::schedule::SystemTiming;

/// Entity pool statistics. Per-tick counters reset on every read.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EntityPoolStats {
    pub live_count: usize,
    pub pending_removal: usize,
    pub next_id: u64,
    pub total_issued: u64,
    pub spawned_this_tick: u32,
    pub despawned_this_tick: u32,
}

/// One captured log record.
#[derive(Debug, Clone, Serialize)]
pub struct CapturedLog {
    pub level: String,
    pub target: String,
    pub message: String,
    pub timestamp_secs: f32,
}

/// Everything worth knowing about the most recent tick.
#[derive(Debug, Clone, Serialize)]
pub struct FrameSnapshot {
    pub frame_count: u64,
    pub elapsed_secs: f32,
    pub delta_ms: f32,
    pub entity_pool: EntityPoolStats,
    pub ai_evaluated: usize,
    pub phase_triggers: usize,
    pub collisions: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub system_timings: Vec<SystemTiming>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub logs: Vec<CapturedLog>,
}

impl FrameSnapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

// ── Log capture ─────────────────────────────────────────────────────────

const LOG_RING_CAPACITY: usize = 500;

static LOG_RING: Mutex<VecDeque<CapturedLog>> = Mutex::new(VecDeque::new());
static LOG_START: OnceLock<Instant> = OnceLock::new();

/// Forwards to env_logger and copies each record into [`LOG_RING`].
struct CaptureLogger {
    inner: env_logger::Logger,
}

impl Log for CaptureLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.inner.enabled(metadata) || metadata.level() <= log::Level::Info
    }

    fn log(&self, record: &log::Record) {
        if self.inner.enabled(record.metadata()) {
            self.inner.log(record);
        }
        let timestamp_secs = LOG_START
            .get()
            .map(|start| start.elapsed().as_secs_f32())
            .unwrap_or(0.0);
        let entry = CapturedLog {
            level: record.level().to_string(),
            target: record.target().to_string(),
            message: record.args().to_string(),
            timestamp_secs,
        };
        if let Ok(mut ring) = LOG_RING.lock() {
            if ring.len() >= LOG_RING_CAPACITY {
                ring.pop_front();
            }
            ring.push_back(entry);
        }
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

static CAPTURE_LOGGER: OnceLock<CaptureLogger> = OnceLock::new();

/// Install the capturing logger. `RUST_LOG` controls stderr output as usual;
/// info and above are always captured.
///
/// Call once, early. A second call, or a call after another logger was set,
/// leaves the existing logger in place.
pub fn init_logger() {
    LOG_START.get_or_init(Instant::now);

    let inner = env_logger::Builder::new().parse_default_env().build();
    let max_level = inner.filter();
    let logger = CAPTURE_LOGGER.get_or_init(|| CaptureLogger { inner });

    if log::set_logger(logger).is_err() {
        log::warn!("a logger is already installed; log capture disabled");
        return;
    }
    log::set_max_level(max_level.max(log::LevelFilter::Info));
}

/// Take up to `max` captured records, oldest first.
pub(crate) fn drain_captured_logs(max: usize) -> Vec<CapturedLog> {
    let Ok(mut ring) = LOG_RING.lock() else {
        return Vec::new();
    };
    let n = ring.len().min(max);
    ring.drain(..n).collect()
}
