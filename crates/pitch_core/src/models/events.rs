use serde::{Deserialize, Serialize};

use super::{PlayerId, TeamSide};
use crate::ai::AdaptationTrigger;

/// One entry of the append-only match log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchEvent {
    /// Match minute when the event happened
    pub time: f32,
    /// Simulation tick (causal order key)
    pub tick: u32,
    #[serde(flatten)]
    pub kind: EventKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<TeamSide>,
    /// Primary actor (scorer, shooter, passer, tackler, offender, booked player)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_id: Option<PlayerId>,
    pub description: String,
    /// Set on goals whose deciding roll was marginal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub var_review: Option<bool>,
}

/// Per-type payload. Each variant carries only what that event needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    KickOff,
    Shot { on_target: bool, success: f32, distance: f32 },
    Goal { assist: Option<PlayerId> },
    Pass { target: PlayerId, completed: bool },
    Tackle { target: PlayerId, won: bool },
    Foul { victim: PlayerId },
    YellowCard,
    /// Send-off. `second_yellow` distinguishes accumulation from a straight red.
    RedCard { second_yellow: bool },
    TacticalChange { trigger: AdaptationTrigger },
    FullTime,
    Abandoned { reason: String },
}

impl EventKind {
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::KickOff => "kick_off",
            EventKind::Shot { .. } => "shot",
            EventKind::Goal { .. } => "goal",
            EventKind::Pass { .. } => "pass",
            EventKind::Tackle { .. } => "tackle",
            EventKind::Foul { .. } => "foul",
            EventKind::YellowCard => "yellow_card",
            EventKind::RedCard { .. } => "red_card",
            EventKind::TacticalChange { .. } => "tactical_change",
            EventKind::FullTime => "full_time",
            EventKind::Abandoned { .. } => "abandoned",
        }
    }
}

impl MatchEvent {
    pub fn new(time: f32, tick: u32, kind: EventKind, description: impl Into<String>) -> Self {
        Self { time, tick, kind, team: None, player_id: None, description: description.into(), var_review: None }
    }

    pub fn by(mut self, team: TeamSide, player_id: Option<PlayerId>) -> Self {
        self.team = Some(team);
        self.player_id = player_id;
        self
    }

    pub fn with_var_review(mut self, flagged: bool) -> Self {
        self.var_review = Some(flagged);
        self
    }

    pub fn is_goal(&self) -> bool {
        matches!(self.kind, EventKind::Goal { .. })
    }
}

/// Append-only, tick-ordered event log. There is no API to edit or remove entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventLog(Vec<MatchEvent>);

impl EventLog {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub(crate) fn push(&mut self, event: MatchEvent) {
        debug_assert!(
            self.0.last().map_or(true, |last| last.tick <= event.tick),
            "event log must stay in tick order"
        );
        log::trace!("event {} at {:.1}': {}", event.kind.name(), event.time, event.description);
        self.0.push(event);
    }

    pub fn as_slice(&self) -> &[MatchEvent] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &MatchEvent> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn goals_for(&self, side: TeamSide) -> usize {
        self.0.iter().filter(|e| e.is_goal() && e.team == Some(side)).count()
    }

    /// Owned snapshot for external collaborators.
    pub fn snapshot(&self) -> Vec<MatchEvent> {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_counting_by_side() {
        let mut log = EventLog::new();
        log.push(MatchEvent::new(1.0, 10, EventKind::KickOff, "kick off").by(TeamSide::Home, None));
        log.push(
            MatchEvent::new(2.0, 20, EventKind::Goal { assist: None }, "goal")
                .by(TeamSide::Away, Some(PlayerId(14))),
        );
        assert_eq!(log.goals_for(TeamSide::Away), 1);
        assert_eq!(log.goals_for(TeamSide::Home), 0);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_event_json_is_tagged() {
        let event = MatchEvent::new(
            12.3,
            123,
            EventKind::Pass { target: PlayerId(7), completed: true },
            "pass",
        )
        .by(TeamSide::Home, Some(PlayerId(4)));
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "pass");
        assert_eq!(json["target"], 7);
        assert_eq!(json["team"], "home");
        assert!(json.get("var_review").is_none());

        let back: MatchEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }
}
