//! Mutable simulation state for one match.
//!
//! Owned and mutated only by the engine during a tick. Collaborators (UI,
//! persistence, integrity checks) read it between ticks.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::{Ball, EventKind, EventLog, MatchEvent, Player, PlayerId, Team, TeamSide};
use crate::ai::{AIDecision, MatchAdaptation};
use crate::config::SimConfig;
use crate::engine::actions;
use crate::error::{Result, SimError};
use crate::tactics::TacticalProfile;

/// Why the match stopped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum Termination {
    FullTime,
    Stopped,
    InvariantViolation(String),
}

/// Last completed pass, kept for assist attribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PassLink {
    pub team: TeamSide,
    pub passer: PlayerId,
    pub receiver: PlayerId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    pub home: Team,
    pub away: Team,
    pub ball: Ball,
    /// Minutes elapsed
    pub clock: f32,
    /// Simulation ticks completed
    pub tick: u32,
    pub possession_team: Option<TeamSide>,
    pub possession_player: Option<PlayerId>,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub termination: Option<Termination>,
    /// Human-selected player; auto-possession and AI leave them alone
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub controlled_player: Option<PlayerId>,
    pub events: EventLog,
    #[serde(default)]
    pub decisions: Vec<AIDecision>,
    #[serde(default)]
    pub adaptations: Vec<MatchAdaptation>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub(crate) last_pass: Option<PassLink>,
}

impl MatchState {
    /// Validate rosters, place everyone on their anchors and kick off (Home first).
    pub fn kickoff(
        mut home: Team,
        mut away: Team,
        home_tactics: Option<TacticalProfile>,
        away_tactics: Option<TacticalProfile>,
        config: &SimConfig,
    ) -> Result<Self> {
        config.validate()?;

        let mut seen = HashSet::new();
        for team in [&home, &away] {
            if team.players.is_empty() || team.players.len() > Team::MAX_PLAYERS {
                return Err(SimError::InvalidTeamSize {
                    team: team.name.clone(),
                    max: Team::MAX_PLAYERS,
                    found: team.players.len(),
                });
            }
            for p in &team.players {
                if !seen.insert(p.id) {
                    return Err(SimError::DuplicatePlayer(p.id));
                }
            }
        }

        for (team, side, tactics) in
            [(&mut home, TeamSide::Home, home_tactics), (&mut away, TeamSide::Away, away_tactics)]
        {
            team.side = side;
            team.score = 0;
            team.sent_off.clear();
            team.stats = Default::default();
            if let Some(tactics) = tactics {
                team.tactics = tactics;
            }
            for (slot, player) in team.players.iter_mut().enumerate() {
                player.team = side;
                player.slot = slot as u8;
                player.cards.clear();
            }
        }

        let mut state = Self {
            home,
            away,
            ball: Ball::at(config.field.center()),
            clock: 0.0,
            tick: 0,
            possession_team: None,
            possession_player: None,
            is_active: true,
            termination: None,
            controlled_player: None,
            events: EventLog::new(),
            decisions: Vec::new(),
            adaptations: Vec::new(),
            last_pass: None,
        };
        actions::kick_off(&mut state, config, TeamSide::Home);
        log::info!("kickoff: {} vs {}", state.home.name, state.away.name);
        Ok(state)
    }

    pub fn team(&self, side: TeamSide) -> &Team {
        match side {
            TeamSide::Home => &self.home,
            TeamSide::Away => &self.away,
        }
    }

    pub fn team_mut(&mut self, side: TeamSide) -> &mut Team {
        match side {
            TeamSide::Home => &mut self.home,
            TeamSide::Away => &mut self.away,
        }
    }

    /// On-pitch player lookup. Sent-off players are not found.
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.home.player(id).or_else(|| self.away.player(id))
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        if self.home.is_on_pitch(id) {
            self.home.player_mut(id)
        } else {
            self.away.player_mut(id)
        }
    }

    pub fn side_of(&self, id: PlayerId) -> Option<TeamSide> {
        self.player(id).map(|p| p.team)
    }

    pub fn on_pitch(&self) -> impl Iterator<Item = &Player> {
        self.home.players.iter().chain(self.away.players.iter())
    }

    pub fn possessor(&self) -> Option<&Player> {
        self.possession_player.and_then(|id| self.player(id))
    }

    pub fn score(&self) -> (u8, u8) {
        (self.home.score, self.away.score)
    }

    /// Goals for minus goals against, from `side`'s point of view.
    pub fn goal_difference(&self, side: TeamSide) -> i32 {
        self.team(side).score as i32 - self.team(side.opponent()).score as i32
    }

    /// Share of possessed ticks (50 before anyone has had the ball).
    pub fn possession_pct(&self, side: TeamSide) -> f32 {
        let own = self.team(side).stats.possession_ticks as f32;
        let other = self.team(side.opponent()).stats.possession_ticks as f32;
        if own + other <= 0.0 {
            50.0
        } else {
            own / (own + other) * 100.0
        }
    }

    /// Share of ticks with the opponent on the ball in `side`'s defensive third.
    pub fn pressure_pct(&self, side: TeamSide) -> f32 {
        if self.tick == 0 {
            return 0.0;
        }
        (self.team(side).stats.pressure_ticks as f32 / self.tick as f32 * 100.0).min(100.0)
    }

    pub(crate) fn record(
        &mut self,
        kind: EventKind,
        team: Option<TeamSide>,
        player: Option<PlayerId>,
        description: impl Into<String>,
    ) {
        let mut event = MatchEvent::new(self.clock, self.tick, kind, description);
        event.team = team;
        event.player_id = player;
        self.events.push(event);
    }

    pub(crate) fn record_event(&mut self, event: MatchEvent) {
        self.events.push(event);
    }

    /// First broken invariant, if any. Checked after every tick.
    pub fn invariant_violation(&self, config: &SimConfig) -> Option<String> {
        if let Some(id) = self.possession_player {
            match self.side_of(id) {
                None => return Some(format!("possession refers to off-pitch player {}", id)),
                Some(side) if Some(side) != self.possession_team => {
                    return Some(format!("possession team does not match player {}", id));
                }
                _ => {}
            }
        }
        for side in TeamSide::BOTH {
            let goals = self.events.goals_for(side);
            if goals != self.team(side).score as usize {
                return Some(format!(
                    "{} score {} != {} goal events",
                    side,
                    self.team(side).score,
                    goals
                ));
            }
            if !self.team(side).tactics.all_in_bounds() {
                return Some(format!("{} tactics out of bounds", side));
            }
        }
        for p in self.on_pitch() {
            let stamina = p.stats.stamina();
            if !(0.0..=100.0).contains(&stamina) {
                return Some(format!("player {} stamina {} out of range", p.id, stamina));
            }
            if p.yellow_count() >= 2 || p.has_red() {
                return Some(format!("sent-off player {} still on pitch", p.id));
            }
            if !p.position.is_finite() {
                return Some(format!("player {} position is not finite", p.id));
            }
        }
        if !self.ball.position.is_finite() || !config.field.contains(self.ball.position) {
            return Some("ball left the field".to_string());
        }
        None
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{sample_team, small_team};

    #[test]
    fn test_kickoff_sets_up_home_possession() {
        let cfg = SimConfig::default();
        let state = MatchState::kickoff(
            sample_team("Home", 1),
            sample_team("Away", 100),
            None,
            None,
            &cfg,
        )
        .unwrap();
        assert!(state.is_active);
        assert_eq!(state.possession_team, Some(TeamSide::Home));
        let kicker = state.possessor().unwrap();
        assert_eq!(kicker.position, cfg.field.center());
        assert_eq!(state.ball.position, cfg.field.center());
        assert!(state.away.players.iter().all(|p| p.team == TeamSide::Away));
        assert_eq!(state.events.len(), 1);
        assert!(state.invariant_violation(&cfg).is_none());
    }

    #[test]
    fn test_kickoff_rejects_duplicate_ids() {
        let cfg = SimConfig::default();
        let err = MatchState::kickoff(sample_team("A", 1), sample_team("B", 1), None, None, &cfg);
        assert!(matches!(err, Err(SimError::DuplicatePlayer(_))));
    }

    #[test]
    fn test_kickoff_rejects_empty_roster() {
        let cfg = SimConfig::default();
        let err = MatchState::kickoff(Team::new("Empty", vec![]), small_team("B", 50, 3), None, None, &cfg);
        assert!(matches!(err, Err(SimError::InvalidTeamSize { found: 0, .. })));
    }

    #[test]
    fn test_possession_pct_defaults_to_even() {
        let cfg = SimConfig::default();
        let state =
            MatchState::kickoff(sample_team("A", 1), sample_team("B", 100), None, None, &cfg).unwrap();
        assert_eq!(state.possession_pct(TeamSide::Home), 50.0);
        assert_eq!(state.pressure_pct(TeamSide::Away), 0.0);
    }

    #[test]
    fn test_json_round_trip_keeps_log() {
        let cfg = SimConfig::metric();
        let state =
            MatchState::kickoff(sample_team("A", 1), sample_team("B", 100), None, None, &cfg).unwrap();
        let json = state.to_json().unwrap();
        let loaded = MatchState::from_json(&json).unwrap();
        assert_eq!(loaded, state);
    }
}
