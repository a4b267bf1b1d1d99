//! Match clock and host-rate throttle.
//!
//! The host may call the engine at any frame rate; the simulation advances at
//! a fixed `sim_tick_seconds` (10 Hz by default). The match clock itself is
//! derived from the tick counter so it never accumulates float drift.

use serde::{Deserialize, Serialize};

use crate::config::ClockConfig;
use crate::models::MatchState;

/// Host-time accumulator. Feeds at most one simulation tick per host call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TickThrottle {
    accumulated: f32,
}

impl TickThrottle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add host time; true when a simulation tick is due.
    ///
    /// Every call counts as at least `min_frame_seconds`, so zero, negative
    /// or non-finite deltas still advance the match. When a single call
    /// carries a full tick or more beyond the one it fires, the excess is
    /// dropped rather than replayed on later calls.
    pub fn feed(&mut self, delta_time: f32, cfg: &ClockConfig) -> bool {
        let frame = if delta_time.is_finite() {
            delta_time.max(cfg.min_frame_seconds)
        } else {
            cfg.min_frame_seconds
        };
        self.accumulated += frame;

        let step = cfg.sim_tick_seconds;
        if self.accumulated + step * 1e-4 < step {
            return false;
        }
        let rest = self.accumulated - step;
        self.accumulated = if rest >= step { 0.0 } else { rest.max(0.0) };
        true
    }

    pub fn pending(&self) -> f32 {
        self.accumulated
    }
}

/// Advance the tick counter and derive the match minute.
/// Returns true once full time is reached.
pub fn advance(state: &mut MatchState, cfg: &ClockConfig) -> bool {
    state.tick = state.tick.saturating_add(1);
    state.clock = state.tick as f32 * cfg.minutes_per_tick;
    state.tick >= cfg.full_time_ticks()
}
