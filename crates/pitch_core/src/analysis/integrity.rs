//! Match integrity checks and replay digest.
//!
//! An external integrity service receives a [`MatchReport`] (team names,
//! player/team assignment, duration, final score, per-player goals/assists)
//! and expects it to pass [`check_report`]. Reports built from a simulated
//! state pass by construction.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use super::stats::{player_tallies, MatchResult, PlayerTally};
use crate::config::SimConfig;
use crate::error::Result;
use crate::models::{MatchEvent, MatchState, PlayerId, TeamSide};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum IntegrityViolation {
    #[error("{side} score {score} does not match {goal_events} goal events")]
    ScoreMismatch { side: TeamSide, score: u8, goal_events: u32 },

    #[error("player {player} has {goals} goals but {side} scored {score}")]
    PlayerGoalsExceedScore { player: PlayerId, side: TeamSide, goals: u32, score: u8 },

    #[error("player {player} is credited to {credited} but plays for {actual}")]
    WrongTeam { player: PlayerId, credited: TeamSide, actual: TeamSide },

    #[error("unknown player {0} in tallies")]
    UnknownPlayer(PlayerId),

    #[error("{goals} goals in {minutes:.1} minutes exceeds {max_per_90} per 90")]
    UnrealisticGoalRate { goals: u32, minutes: f32, max_per_90: f32 },

    #[error("declared result {declared:?} does not match score {home}-{away}")]
    ResultMismatch { declared: MatchResult, home: u8, away: u8 },
}

/// What the integrity service consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    pub home_team: String,
    pub away_team: String,
    pub duration_minutes: f32,
    pub home_score: u8,
    pub away_score: u8,
    pub result: MatchResult,
    pub player_teams: BTreeMap<PlayerId, TeamSide>,
    pub tallies: BTreeMap<PlayerId, PlayerTally>,
    /// Hex SHA-256 of the event log
    pub event_digest: String,
}

impl MatchReport {
    pub fn from_state(state: &MatchState) -> Result<Self> {
        let player_teams = state
            .home
            .all_players()
            .chain(state.away.all_players())
            .map(|p| (p.id, p.team))
            .collect();
        Ok(Self {
            home_team: state.home.name.clone(),
            away_team: state.away.name.clone(),
            duration_minutes: state.clock,
            home_score: state.home.score,
            away_score: state.away.score,
            result: MatchResult::from_score(state.home.score, state.away.score),
            player_teams,
            tallies: player_tallies(state.events.as_slice()),
            event_digest: event_digest(state.events.as_slice())?,
        })
    }

    fn score(&self, side: TeamSide) -> u8 {
        match side {
            TeamSide::Home => self.home_score,
            TeamSide::Away => self.away_score,
        }
    }
}

/// Every violation in `report`, empty when it is consistent.
pub fn check_report(report: &MatchReport, cfg: &SimConfig) -> Vec<IntegrityViolation> {
    let mut violations = Vec::new();

    let declared = MatchResult::from_score(report.home_score, report.away_score);
    if declared != report.result {
        violations.push(IntegrityViolation::ResultMismatch {
            declared: report.result,
            home: report.home_score,
            away: report.away_score,
        });
    }

    let mut goals_by_side = [0u32; 2];
    for (&player, tally) in &report.tallies {
        match report.player_teams.get(&player) {
            None => violations.push(IntegrityViolation::UnknownPlayer(player)),
            Some(&actual) if actual != tally.team => {
                violations.push(IntegrityViolation::WrongTeam { player, credited: tally.team, actual });
            }
            Some(_) => {}
        }
        let score = report.score(tally.team);
        if tally.goals > score as u32 {
            violations.push(IntegrityViolation::PlayerGoalsExceedScore {
                player,
                side: tally.team,
                goals: tally.goals,
                score,
            });
        }
        goals_by_side[tally.team.index()] += tally.goals;
    }

    for side in TeamSide::BOTH {
        let score = report.score(side);
        if goals_by_side[side.index()] != score as u32 {
            violations.push(IntegrityViolation::ScoreMismatch {
                side,
                score,
                goal_events: goals_by_side[side.index()],
            });
        }
    }

    // one goal of slack so an early goal is never flagged
    let total = report.home_score as u32 + report.away_score as u32;
    let minutes = report.duration_minutes.max(0.0);
    let max_per_90 = cfg.ai.max_goals_per_90;
    if total as f32 > max_per_90 * minutes / 90.0 + 1.0 {
        violations.push(IntegrityViolation::UnrealisticGoalRate { goals: total, minutes, max_per_90 });
    }

    violations
}

/// Build the report for `state` and check it. Fails on the first violation.
pub fn verify(state: &MatchState, cfg: &SimConfig) -> Result<MatchReport> {
    let report = MatchReport::from_state(state)?;
    match check_report(&report, cfg).into_iter().next() {
        Some(violation) => Err(violation.into()),
        None => Ok(report),
    }
}

/// Hex SHA-256 over the canonical JSON of the event log.
pub fn event_digest(events: &[MatchEvent]) -> Result<String> {
    let bytes = serde_json::to_vec(events)?;
    Ok(sha256_hex(&bytes))
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;
    use crate::fixtures::sample_team;
    use crate::models::EventKind;

    fn state(cfg: &SimConfig) -> MatchState {
        MatchState::kickoff(sample_team("Home", 1), sample_team("Away", 100), None, None, cfg).unwrap()
    }

    fn score_goal(state: &mut MatchState, side: TeamSide, scorer: u32) {
        let team = state.team_mut(side);
        team.score += 1;
        state.record(EventKind::Goal { assist: None }, Some(side), Some(PlayerId(scorer)), "goal");
    }

    #[test]
    fn test_consistent_state_verifies() {
        let cfg = SimConfig::default();
        let mut s = state(&cfg);
        s.clock = 90.0;
        score_goal(&mut s, TeamSide::Home, 10);
        score_goal(&mut s, TeamSide::Away, 110);
        let report = verify(&s, &cfg).unwrap();
        assert_eq!(report.result, MatchResult::Draw);
        assert_eq!(report.tallies[&PlayerId(10)].goals, 1);
        assert_eq!(report.event_digest.len(), 64);
    }

    #[test]
    fn test_tampered_report_is_caught() {
        let cfg = SimConfig::default();
        let mut s = state(&cfg);
        s.clock = 90.0;
        score_goal(&mut s, TeamSide::Home, 10);
        let mut report = MatchReport::from_state(&s).unwrap();

        report.result = MatchResult::AwayWin;
        report.tallies.get_mut(&PlayerId(10)).unwrap().goals = 3;
        let violations = check_report(&report, &cfg);
        assert!(violations.iter().any(|v| matches!(v, IntegrityViolation::ResultMismatch { .. })));
        assert!(violations.iter().any(|v| matches!(v, IntegrityViolation::PlayerGoalsExceedScore { .. })));
        assert!(violations.iter().any(|v| matches!(v, IntegrityViolation::ScoreMismatch { .. })));
    }

    #[test]
    fn test_goal_rate_bound() {
        let cfg = SimConfig::default();
        let mut s = state(&cfg);
        s.clock = 10.0;
        for _ in 0..5 {
            score_goal(&mut s, TeamSide::Home, 10);
        }
        assert!(matches!(
            verify(&s, &cfg),
            Err(SimError::Integrity(IntegrityViolation::UnrealisticGoalRate { .. }))
        ));
    }

    #[test]
    fn test_digest_changes_with_log() {
        let cfg = SimConfig::default();
        let mut s = state(&cfg);
        let before = event_digest(s.events.as_slice()).unwrap();
        assert_eq!(before, event_digest(s.events.as_slice()).unwrap());
        score_goal(&mut s, TeamSide::Home, 10);
        assert_ne!(before, event_digest(s.events.as_slice()).unwrap());
    }
}
