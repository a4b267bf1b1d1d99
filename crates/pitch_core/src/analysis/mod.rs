//! Post-tick analysis: aggregate counters, per-player tallies and the
//! integrity report consumed by external services.

pub mod integrity;
pub mod stats;

pub use integrity::{check_report, event_digest, verify, IntegrityViolation, MatchReport};
pub use stats::{get_stats, player_tallies, MatchResult, MatchStats, PlayerTally, TeamReport};
