//! In-match tactical adaptation.
//!
//! Triggers are checked in priority order and the first match wins:
//!
//! | trigger               | condition                              |
//! |-----------------------|----------------------------------------|
//! | Losing                | goals scored < goals conceded          |
//! | Winning               | goals scored > goals conceded          |
//! | UnderPressure         | pressure% > `pressure_threshold`       |
//! | DominatingPossession  | possession% > `possession_threshold`   |
//!
//! Each trigger applies a fixed set of slider deltas. Every resulting slider
//! is clamped to `[0, 100]`.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{AdaptationDeltas, SimConfig, SliderDelta};
use crate::engine::actions::refresh_anchors;
use crate::models::{EventKind, MatchState, TeamSide};
use crate::tactics::{AIProfile, AIDifficulty, Personality, TacticalProfile};

/// Scaled deltas never move a slider by less than this...
pub const MIN_DELTA: f32 = 10.0;
/// ...or more than this.
pub const MAX_DELTA: f32 = 25.0;

/// Match situation seen by the adaptation rules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdaptationInput {
    pub goals_scored: u8,
    pub goals_conceded: u8,
    pub possession_pct: f32,
    pub pressure_pct: f32,
}

impl AdaptationInput {
    pub fn from_state(state: &MatchState, side: TeamSide) -> Self {
        Self {
            goals_scored: state.team(side).score,
            goals_conceded: state.team(side.opponent()).score,
            possession_pct: state.possession_pct(side),
            pressure_pct: state.pressure_pct(side),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdaptationTrigger {
    Losing,
    Winning,
    UnderPressure,
    DominatingPossession,
}

impl AdaptationTrigger {
    pub fn detect(input: &AdaptationInput, deltas: &AdaptationDeltas) -> Option<Self> {
        if input.goals_scored < input.goals_conceded {
            Some(AdaptationTrigger::Losing)
        } else if input.goals_scored > input.goals_conceded {
            Some(AdaptationTrigger::Winning)
        } else if input.pressure_pct > deltas.pressure_threshold {
            Some(AdaptationTrigger::UnderPressure)
        } else if input.possession_pct > deltas.possession_threshold {
            Some(AdaptationTrigger::DominatingPossession)
        } else {
            None
        }
    }

    pub fn rules<'a>(&self, deltas: &'a AdaptationDeltas) -> &'a [SliderDelta] {
        match self {
            AdaptationTrigger::Losing => &deltas.losing,
            AdaptationTrigger::Winning => &deltas.winning,
            AdaptationTrigger::UnderPressure => &deltas.under_pressure,
            AdaptationTrigger::DominatingPossession => &deltas.dominating_possession,
        }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            AdaptationTrigger::Losing => "Losing - push forward",
            AdaptationTrigger::Winning => "Winning - protect the lead",
            AdaptationTrigger::UnderPressure => "Under pressure - drop deeper",
            AdaptationTrigger::DominatingPossession => "Dominating possession - speed up",
        }
    }
}

/// Record of one in-match tactical change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchAdaptation {
    pub team: TeamSide,
    /// Match minute
    pub time: f32,
    pub trigger: AdaptationTrigger,
    pub previous_tactics: TacticalProfile,
    pub new_tactics: TacticalProfile,
    pub reason: String,
    /// Goal difference when the change was made
    pub goal_difference: i32,
    /// Filled at full time: goal-difference swing since the change, in [-1, 1]
    #[serde(default)]
    pub effectiveness: Option<f32>,
}

/// How strongly a personality adapts: 0.75 (rigid) to 1.25 (flexible).
pub fn intensity_for(personality: &Personality) -> f32 {
    0.75 + personality.adaptability / 200.0
}

/// Scale a rule delta by `intensity` and keep its magnitude inside
/// [`MIN_DELTA`, `MAX_DELTA`]. A zero delta stays zero.
pub fn scale_delta(delta: f32, intensity: f32) -> f32 {
    if delta == 0.0 || !delta.is_finite() {
        return 0.0;
    }
    delta.signum() * (delta.abs() * intensity).clamp(MIN_DELTA, MAX_DELTA)
}

/// Pure adaptation step: detect a trigger and return the adjusted profile.
pub fn adapt(
    tactics: &TacticalProfile,
    input: &AdaptationInput,
    deltas: &AdaptationDeltas,
    intensity: f32,
) -> Option<(AdaptationTrigger, TacticalProfile)> {
    let trigger = AdaptationTrigger::detect(input, deltas)?;
    let mut next = tactics.clone();
    for rule in trigger.rules(deltas) {
        next.adjust(rule.slider, scale_delta(rule.delta, intensity));
    }
    Some((trigger, next))
}

/// Per-team throttle around [`adapt`].
///
/// A check is due once per `difficulty.adaptation_interval()` match minutes.
/// When due, the change goes through with `difficulty.change_probability()`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TacticalAdapter {
    last_check: Option<f32>,
}

impl TacticalAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_check(&self) -> Option<f32> {
        self.last_check
    }

    pub fn is_due(&self, difficulty: AIDifficulty, minute: f32) -> bool {
        let Some(interval) = difficulty.adaptation_interval() else {
            return false;
        };
        match self.last_check {
            None => minute + f32::EPSILON >= interval,
            Some(last) => minute - last + f32::EPSILON >= interval,
        }
    }

    /// Run a due check for `side`. Applies the change to the team, re-derives
    /// its anchors and logs a `TacticalChange` event.
    pub fn run(
        &mut self,
        state: &mut MatchState,
        side: TeamSide,
        profile: &AIProfile,
        cfg: &SimConfig,
        rng: &mut impl Rng,
    ) -> Option<MatchAdaptation> {
        let minute = state.clock;
        if !self.is_due(profile.difficulty, minute) {
            return None;
        }
        self.last_check = Some(minute);
        if rng.gen::<f32>() >= profile.difficulty.change_probability() {
            return None;
        }

        let input = AdaptationInput::from_state(state, side);
        let previous = state.team(side).tactics.clone();
        let (trigger, next) =
            adapt(&previous, &input, &cfg.ai.adaptation, intensity_for(&profile.personality))?;

        let team = state.team_mut(side);
        team.tactics = next.clone();
        refresh_anchors(team, &cfg.field);
        let name = team.name.clone();

        let adaptation = MatchAdaptation {
            team: side,
            time: minute,
            trigger,
            previous_tactics: previous,
            new_tactics: next,
            reason: trigger.reason().to_string(),
            goal_difference: state.goal_difference(side),
            effectiveness: None,
        };
        state.record(
            EventKind::TacticalChange { trigger },
            Some(side),
            None,
            format!("{}: {}", name, trigger.reason()),
        );
        state.adaptations.push(adaptation.clone());
        log::info!("{} adapts at {:.1}': {:?}", side, minute, trigger);
        Some(adaptation)
    }
}

/// Fill in effectiveness for every adaptation still open: the goal-difference
/// swing since the change, halved and clamped to [-1, 1].
pub fn evaluate_effectiveness(state: &mut MatchState) {
    let gd = [state.goal_difference(TeamSide::Home), state.goal_difference(TeamSide::Away)];
    for adaptation in state.adaptations.iter_mut().filter(|a| a.effectiveness.is_none()) {
        let swing = gd[adaptation.team.index()] - adaptation.goal_difference;
        adaptation.effectiveness = Some((swing as f32 / 2.0).clamp(-1.0, 1.0));
    }
}
