//! # pitch_core - Tick-Based Football Match Simulation
//!
//! Fixed-tick match simulation with an adaptive AI layer on top.
//!
//! ## Features
//! - 10 Hz logical simulation decoupled from the host frame rate
//! - Probabilistic shot/tackle/pass resolution driven by player stats and tactical sliders
//! - Foul → card → send-off discipline state machine
//! - Weighted-random AI decisions and score/pressure driven tactical adaptation
//! - Injectable seeded RNG (same seed + same inputs = same match)
//!
//! ## Tick phase order
//! physics/possession → action resolution → discipline/events → AI decision/adaptation → clock.
//! Callers may only read [`MatchState`] between ticks.

// Game engine APIs often require many parameters for physics, state, etc.
#![allow(clippy::too_many_arguments)]

pub mod ai;
pub mod analysis;
pub mod config;
pub mod engine;
pub mod error;
pub mod fixtures;
pub mod models;
pub mod tactics;

pub use ai::{AIDecision, AIOption, AdaptationTrigger, DecisionOutcome, MatchAdaptation};
pub use analysis::{get_stats, player_tallies, verify, MatchReport, MatchStats};
pub use config::SimConfig;
pub use engine::{ManualAction, ManualOutcome, MatchEngine, RejectReason};
pub use error::{Result, SimError};
pub use models::{EventKind, MatchEvent, MatchState, Player, PlayerId, Team, TeamSide, Termination};
pub use tactics::{AIDifficulty, AIProfile, TacticalProfile};

/// Build the kickoff state for a match.
///
/// Missing tactics fall back to [`TacticalProfile::default`]. Players are placed on
/// their formation anchors and Home kicks off.
pub fn init_match(
    home: Team,
    away: Team,
    home_tactics: Option<TacticalProfile>,
    away_tactics: Option<TacticalProfile>,
    config: &SimConfig,
) -> Result<MatchState> {
    MatchState::kickoff(home, away, home_tactics, away_tactics, config)
}

/// Read-only view of the event log.
pub fn get_events(state: &MatchState) -> &[MatchEvent] {
    state.events.as_slice()
}
