//! Aggregate counters and per-player tallies.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{EventKind, MatchEvent, MatchState, PlayerId, Team, TeamSide};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchResult {
    HomeWin,
    Draw,
    AwayWin,
}

impl MatchResult {
    pub fn from_score(home: u8, away: u8) -> Self {
        match home.cmp(&away) {
            std::cmp::Ordering::Greater => MatchResult::HomeWin,
            std::cmp::Ordering::Less => MatchResult::AwayWin,
            std::cmp::Ordering::Equal => MatchResult::Draw,
        }
    }
}

/// Per-team counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamReport {
    pub name: String,
    pub score: u8,
    pub shots: u16,
    pub shots_on_target: u16,
    pub passes: u16,
    pub passes_completed: u16,
    /// 0-100, 0 without any pass
    pub pass_accuracy: f32,
    pub tackles: u16,
    pub tackles_won: u16,
    pub fouls: u16,
    pub yellow_cards: u8,
    pub red_cards: u8,
    pub possession_pct: f32,
    pub pressure_pct: f32,
    pub players_on_pitch: usize,
    pub average_stamina: f32,
}

impl TeamReport {
    fn new(state: &MatchState, team: &Team) -> Self {
        let s = &team.stats;
        Self {
            name: team.name.clone(),
            score: team.score,
            shots: s.shots,
            shots_on_target: s.shots_on_target,
            passes: s.passes,
            passes_completed: s.passes_completed,
            pass_accuracy: if s.passes == 0 {
                0.0
            } else {
                s.passes_completed as f32 / s.passes as f32 * 100.0
            },
            tackles: s.tackles,
            tackles_won: s.tackles_won,
            fouls: s.fouls,
            yellow_cards: s.yellow_cards,
            red_cards: s.red_cards,
            possession_pct: state.possession_pct(team.side),
            pressure_pct: state.pressure_pct(team.side),
            players_on_pitch: team.players.len(),
            average_stamina: team.average_stamina(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchStats {
    pub minute: f32,
    pub result: MatchResult,
    pub home: TeamReport,
    pub away: TeamReport,
}

impl MatchStats {
    pub fn team(&self, side: TeamSide) -> &TeamReport {
        match side {
            TeamSide::Home => &self.home,
            TeamSide::Away => &self.away,
        }
    }
}

/// Snapshot of the per-team counters.
pub fn get_stats(state: &MatchState) -> MatchStats {
    MatchStats {
        minute: state.clock,
        result: MatchResult::from_score(state.home.score, state.away.score),
        home: TeamReport::new(state, &state.home),
        away: TeamReport::new(state, &state.away),
    }
}

/// Goals, assists and shots of one player, derived from the event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerTally {
    pub team: TeamSide,
    pub goals: u32,
    pub assists: u32,
    pub shots: u32,
}

impl PlayerTally {
    fn new(team: TeamSide) -> Self {
        Self { team, goals: 0, assists: 0, shots: 0 }
    }
}

/// 선수별 득점/도움 집계. Goal events carry the scorer as `player_id` and the
/// assister in the payload, so the log alone is enough.
pub fn player_tallies(events: &[MatchEvent]) -> BTreeMap<PlayerId, PlayerTally> {
    let mut tallies: BTreeMap<PlayerId, PlayerTally> = BTreeMap::new();
    for event in events {
        let (Some(team), Some(player)) = (event.team, event.player_id) else {
            continue;
        };
        match &event.kind {
            EventKind::Goal { assist } => {
                tallies.entry(player).or_insert_with(|| PlayerTally::new(team)).goals += 1;
                if let Some(assister) = assist {
                    tallies.entry(*assister).or_insert_with(|| PlayerTally::new(team)).assists += 1;
                }
            }
            EventKind::Shot { .. } => {
                tallies.entry(player).or_insert_with(|| PlayerTally::new(team)).shots += 1;
            }
            _ => {}
        }
    }
    tallies
}
