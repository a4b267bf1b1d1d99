//! Match Engine
//!
//! [`MatchEngine`] owns the [`MatchState`], the tunables and the random source
//! for one match and advances it one fixed tick at a time.
//!
//! Tick phase order (never reordered):
//! 1. [`physics`]: ball integration, possession, movement, stamina
//! 2. [`actions`]: shot / tackle / pass triggers
//! 3. [`discipline`]: foul from a lost tackle, cards, send-offs
//! 4. AI: carrier decision every `decision_interval_ticks`, tactical adaptation
//! 5. [`clock`]: advance and full-time check
//!
//! After each tick the state invariants are checked. A violation ends the
//! match (`Termination::InvariantViolation`); with the `strict_contracts`
//! feature it panics instead.

pub mod actions;
pub mod clock;
pub mod discipline;
pub mod physics;
pub mod vector;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::ai::{self, DecisionOutcome, OptionKind, TeamAi};
use crate::analysis::{self, MatchStats};
use crate::config::SimConfig;
use crate::error::Result;
use crate::models::{EventKind, MatchEvent, MatchState, PlayerId, Stat, TeamSide, Termination};
use crate::tactics::{AIProfile, Slider};

pub use actions::{PassReport, ShotOutcome, TackleReport};
pub use clock::TickThrottle;
pub use discipline::{DisciplineState, FoulReport};
pub use vector::{FieldDims, Vector2};

/// Human override for the player on the ball.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ManualAction {
    /// `strength` in [0, 1]
    Shoot { strength: f32 },
    Pass { target: PlayerId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    MatchOver,
    /// Unknown or sent-off player
    NotOnPitch,
    NotInPossession,
    InvalidTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManualOutcome {
    Applied,
    Rejected(RejectReason),
}

impl ManualOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ManualOutcome::Applied)
    }
}

pub struct MatchEngine<R: Rng = ChaCha8Rng> {
    config: SimConfig,
    state: MatchState,
    rng: R,
    ai: [Option<TeamAi>; 2],
    throttle: TickThrottle,
}

impl MatchEngine<ChaCha8Rng> {
    /// Seeded engine: same seed, same inputs, same match.
    pub fn with_seed(config: SimConfig, state: MatchState, seed: u64) -> Result<Self> {
        Self::new(config, state, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> MatchEngine<R> {
    /// Fails with [`SimError::InvalidConfig`](crate::SimError::InvalidConfig) when `config` does not validate.
    pub fn new(config: SimConfig, state: MatchState, rng: R) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, state, rng, ai: [None, None], throttle: TickThrottle::new() })
    }

    /// Hand `side` to an AI profile. Its default tactics replace the team's.
    pub fn with_ai(mut self, side: TeamSide, profile: AIProfile) -> Self {
        self.set_ai(side, Some(profile));
        self
    }

    pub fn set_ai(&mut self, side: TeamSide, profile: Option<AIProfile>) {
        if let Some(profile) = &profile {
            let team = self.state.team_mut(side);
            team.tactics = profile.default_tactics.clone();
            actions::refresh_anchors(team, &self.config.field);
        }
        self.ai[side.index()] = profile.map(TeamAi::new);
    }

    pub fn ai(&self, side: TeamSide) -> Option<&TeamAi> {
        self.ai[side.index()].as_ref()
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn into_state(self) -> MatchState {
        self.state
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn events(&self) -> &[MatchEvent] {
        self.state.events.as_slice()
    }

    pub fn stats(&self) -> MatchStats {
        analysis::get_stats(&self.state)
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active
    }

    /// Select (or clear) the human-controlled player. Only on-pitch players
    /// can be selected.
    pub fn select_player(&mut self, player: Option<PlayerId>) -> bool {
        match player {
            None => {
                self.state.controlled_player = None;
                true
            }
            Some(id) if self.state.player(id).is_some() => {
                self.state.controlled_player = Some(id);
                true
            }
            Some(id) => {
                log::warn!("cannot select {}: not on the pitch", id);
                false
            }
        }
    }

    // ===========================================
    // Driving the clock
    // ===========================================

    /// Host-driven entry point. Feeds `delta_time` seconds into the throttle
    /// and runs at most one simulation tick. No-op once the match is over.
    pub fn tick(&mut self, delta_time: f32) -> &MatchState {
        if self.state.is_active && self.throttle.feed(delta_time, &self.config.clock) {
            self.step();
        }
        &self.state
    }

    /// Alias of [`tick`](Self::tick) for host loops.
    pub fn update(&mut self, delta_time: f32) -> &MatchState {
        self.tick(delta_time)
    }

    /// Run exactly one simulation tick regardless of host time.
    pub fn step(&mut self) -> &MatchState {
        if !self.state.is_active {
            return &self.state;
        }

        // 1. physics & possession
        let report = physics::step(&mut self.state, &self.config, &mut self.rng);

        // 2. actions
        let foul = self.resolve_actions(report.wants_pass);

        // 3. discipline
        if let Some(tackle) = foul {
            discipline::commit_foul(&mut self.state, &self.config, tackle.defender, tackle.target, &mut self.rng);
        }

        // 4. AI
        self.consult_ai();

        // 5. clock
        if clock::advance(&mut self.state, &self.config.clock) {
            self.finish(Termination::FullTime);
        }

        self.check_invariants();
        &self.state
    }

    /// Run ticks until the match is over. Returns the number of ticks run.
    pub fn run_to_end(&mut self) -> u32 {
        let mut ticks = 0;
        while self.state.is_active {
            self.step();
            ticks += 1;
        }
        ticks
    }

    /// Explicit external stop.
    pub fn stop(&mut self) {
        if self.state.is_active {
            self.finish(Termination::Stopped);
        }
    }

    // ===========================================
    // Human override
    // ===========================================

    /// Apply a human action for `player`. Invalid input leaves the state
    /// untouched and reports why.
    pub fn manual_action(&mut self, player: PlayerId, action: ManualAction) -> ManualOutcome {
        let outcome = self.try_manual_action(player, action);
        if let ManualOutcome::Rejected(reason) = outcome {
            log::warn!("manual action {:?} by {} rejected: {:?}", action, player, reason);
        } else {
            self.check_invariants();
        }
        outcome
    }

    fn try_manual_action(&mut self, player: PlayerId, action: ManualAction) -> ManualOutcome {
        if !self.state.is_active {
            return ManualOutcome::Rejected(RejectReason::MatchOver);
        }
        let Some(side) = self.state.side_of(player) else {
            return ManualOutcome::Rejected(RejectReason::NotOnPitch);
        };
        if self.state.possession_player != Some(player) {
            return ManualOutcome::Rejected(RejectReason::NotInPossession);
        }
        match action {
            ManualAction::Shoot { strength } => {
                let strength = if strength.is_nan() { 0.0 } else { strength.clamp(0.0, 1.0) };
                let noise = self.rng.gen::<f32>();
                actions::resolve_shot(&mut self.state, &self.config, player, noise, 0.6 + 0.4 * strength);
            }
            ManualAction::Pass { target } => {
                if target == player || self.state.side_of(target) != Some(side) {
                    return ManualOutcome::Rejected(RejectReason::InvalidTarget);
                }
                actions::resolve_pass(&mut self.state, &self.config, player, target, &mut self.rng);
            }
        }
        ManualOutcome::Applied
    }

    // ===========================================
    // Phases
    // ===========================================

    /// Automatic shot, tackle or pass. Returns a lost tackle judged a foul.
    fn resolve_actions(&mut self, wants_pass: bool) -> Option<TackleReport> {
        let state = &mut self.state;
        let cfg = &self.config;
        let rng = &mut self.rng;

        let human = state.controlled_player.is_some() && state.controlled_player == state.possession_player;
        if let Some(holder) = state.possessor() {
            if !human && actions::holder_in_shooting_zone(state, cfg) {
                let id = holder.id;
                let aggression = state.team(holder.team).tactics.factor(Slider::OffensiveAggression);
                let trigger = actions::clamp_probability(cfg.actions.shot_trigger_chance * aggression);
                if rng.gen::<f32>() < trigger {
                    let noise = rng.gen::<f32>();
                    actions::resolve_shot(state, cfg, id, noise, 1.0);
                    return None;
                }
            }
        }

        if let Some(tackle) = actions::try_tackle(state, cfg, rng) {
            return tackle.foul.then_some(tackle);
        }

        if wants_pass && !human {
            actions::pass_to_random_teammate(state, cfg, rng);
        }
        None
    }

    fn consult_ai(&mut self) {
        let cfg = &self.config;
        let state = &mut self.state;
        let rng = &mut self.rng;

        if state.tick % cfg.ai.decision_interval_ticks.max(1) == 0 {
            if let Some(holder) = state.possessor() {
                let (id, side) = (holder.id, holder.team);
                if state.controlled_player != Some(id) {
                    if let Some(team_ai) = &self.ai[side.index()] {
                        run_decision(state, cfg, &team_ai.profile, id, rng);
                    }
                }
            }
        }

        if !state.is_active {
            return;
        }
        for side in TeamSide::BOTH {
            if let Some(team_ai) = self.ai[side.index()].as_mut() {
                team_ai.adapter.run(state, side, &team_ai.profile, cfg, rng);
            }
        }
    }

    fn finish(&mut self, termination: Termination) {
        let state = &mut self.state;
        state.is_active = false;
        ai::evaluate_effectiveness(state);
        let (home, away) = state.score();
        match &termination {
            Termination::FullTime => {
                let description = format!("Full time: {} {}-{} {}", state.home.name, home, away, state.away.name);
                state.record(EventKind::FullTime, None, None, description);
            }
            Termination::Stopped => {
                state.record(
                    EventKind::Abandoned { reason: "stopped".into() },
                    None,
                    None,
                    "Match stopped",
                );
            }
            Termination::InvariantViolation(reason) => {
                state.record(
                    EventKind::Abandoned { reason: reason.clone() },
                    None,
                    None,
                    "Match abandoned",
                );
            }
        }
        log::info!("match over at {:.1}' ({}-{}): {:?}", state.clock, home, away, termination);
        state.termination = Some(termination);
    }

    fn check_invariants(&mut self) {
        if let Some(reason) = self.state.invariant_violation(&self.config) {
            log::error!("invariant violated at tick {}: {}", self.state.tick, reason);
            if cfg!(feature = "strict_contracts") {
                panic!("invariant violated: {}", reason);
            }
            if self.state.is_active {
                self.finish(Termination::InvariantViolation(reason));
            }
        }
    }
}

/// Build, choose and execute one AI decision for `holder`.
fn run_decision(
    state: &mut MatchState,
    cfg: &SimConfig,
    profile: &AIProfile,
    holder: PlayerId,
    rng: &mut impl Rng,
) {
    let Some((ctx, options)) = ai::build_options(state, cfg, holder) else {
        return;
    };
    let Some(side) = state.side_of(holder) else {
        return;
    };
    let Some(decision) = ai::decide(profile, &ctx, options, rng) else {
        return;
    };
    let mut decision = decision.attribute(side, holder, state.clock);
    let chosen = decision.chosen_option().clone();
    log::debug!("{} AI picks {:?} for {}", side, chosen.kind, holder);

    let outcome = match chosen.kind {
        OptionKind::Shoot => {
            let noise = rng.gen::<f32>();
            match actions::resolve_shot(state, cfg, holder, noise, 1.0) {
                Some(shot) if shot.goal => DecisionOutcome::Success,
                Some(shot) if shot.on_target => DecisionOutcome::Partial,
                _ => DecisionOutcome::Failure,
            }
        }
        OptionKind::Pass { target } => match actions::resolve_pass(state, cfg, holder, target, rng) {
            Some(pass) if pass.completed => DecisionOutcome::Success,
            _ => DecisionOutcome::Failure,
        },
        OptionKind::Dribble => dribble(state, cfg, holder, side, chosen.success_chance, rng),
        OptionKind::Hold => {
            state.ball.velocity = Vector2::ZERO;
            DecisionOutcome::Success
        }
    };

    if let Err(e) = decision.record_outcome(outcome) {
        log::warn!("decision outcome not recorded: {}", e);
    }
    state.decisions.push(decision);
}

/// Burst toward goal. A failed dribble knocks the ball loose ahead of the carrier.
fn dribble(
    state: &mut MatchState,
    cfg: &SimConfig,
    holder: PlayerId,
    side: TeamSide,
    success_chance: f32,
    rng: &mut impl Rng,
) -> DecisionOutcome {
    let dir = actions::goalward(&cfg.field, state.ball.position, side);
    let pace = state.player(holder).map_or(50.0, |p| p.effective(Stat::Pace, &cfg.stamina));
    let burst = cfg.scaled(cfg.physics.carry_speed) * (0.4 + 0.6 * pace / 99.0);

    if rng.gen::<f32>() < success_chance {
        let next = cfg.field.clamp(state.ball.position + dir * (burst * 2.0));
        state.ball.position = next;
        if let Some(p) = state.player_mut(holder) {
            p.position = next;
        }
        DecisionOutcome::Success
    } else {
        state.ball.velocity = dir * (burst * 2.5);
        state.possession_player = None;
        state.possession_team = None;
        state.last_pass = None;
        DecisionOutcome::Failure
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;
    use crate::fixtures::sample_team;
    use crate::tactics::AIDifficulty;

    fn engine(seed: u64) -> MatchEngine {
        let cfg = SimConfig::default();
        let state =
            MatchState::kickoff(sample_team("Home", 1), sample_team("Away", 100), None, None, &cfg).unwrap();
        MatchEngine::with_seed(cfg, state, seed).unwrap()
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut cfg = SimConfig::default();
        let state =
            MatchState::kickoff(sample_team("Home", 1), sample_team("Away", 100), None, None, &cfg).unwrap();
        cfg.physics.lateral_speed_min = 5.0;
        cfg.physics.lateral_speed_max = 1.0;
        let result = MatchEngine::with_seed(cfg, state, 1);
        assert!(matches!(result, Err(SimError::InvalidConfig(_))));
    }

    #[test]
    fn test_zero_delta_host_reaches_full_time() {
        let mut engine = engine(8);
        let limit = engine.config().clock.full_time_ticks() * engine.config().clock.max_calls_per_tick() + 10;
        let mut calls = 0;
        while engine.is_active() {
            engine.tick(0.0);
            calls += 1;
            assert!(calls <= limit, "no full time after {} calls", calls);
        }
        assert_eq!(engine.state().termination, Some(Termination::FullTime));
    }

    #[test]
    fn test_step_advances_clock() {
        let mut engine = engine(1);
        engine.step();
        assert_eq!(engine.state().tick, 1);
        assert!((engine.state().clock - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_tick_is_throttled() {
        let mut engine = engine(1);
        engine.tick(0.05);
        assert_eq!(engine.state().tick, 0);
        engine.tick(0.05);
        assert_eq!(engine.state().tick, 1);
    }

    #[test]
    fn test_full_match_terminates() {
        let mut engine = engine(2);
        let ticks = engine.run_to_end();
        assert_eq!(ticks, 900);
        let state = engine.state();
        assert!(!state.is_active);
        assert_eq!(state.termination, Some(Termination::FullTime));
        assert_eq!(state.events.as_slice().last().unwrap().kind, EventKind::FullTime);
    }

    #[test]
    fn test_stop_is_terminal() {
        let mut engine = engine(3);
        engine.step();
        engine.stop();
        let snapshot = engine.state().clone();
        engine.step();
        engine.tick(1.0);
        assert_eq!(engine.state(), &snapshot);
        assert_eq!(snapshot.termination, Some(Termination::Stopped));
    }

    #[test]
    fn test_manual_action_rejections() {
        let mut engine = engine(4);
        let holder = engine.state().possession_player.unwrap();
        let idle = engine.state().home.players.iter().find(|p| p.id != holder).unwrap().id;
        let before = engine.state().clone();

        let out = engine.manual_action(PlayerId(9999), ManualAction::Shoot { strength: 1.0 });
        assert_eq!(out, ManualOutcome::Rejected(RejectReason::NotOnPitch));
        let out = engine.manual_action(idle, ManualAction::Shoot { strength: 1.0 });
        assert_eq!(out, ManualOutcome::Rejected(RejectReason::NotInPossession));
        let opponent = engine.state().away.players[0].id;
        let out = engine.manual_action(holder, ManualAction::Pass { target: opponent });
        assert_eq!(out, ManualOutcome::Rejected(RejectReason::InvalidTarget));
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn test_manual_pass_applies() {
        let mut engine = engine(5);
        let holder = engine.state().possession_player.unwrap();
        let mate = engine.state().home.players.iter().find(|p| p.id != holder).unwrap().id;
        let out = engine.manual_action(holder, ManualAction::Pass { target: mate });
        assert!(out.is_applied());
        assert_eq!(engine.state().home.stats.passes, 1);
    }

    #[test]
    fn test_select_player() {
        let mut engine = engine(6);
        assert!(!engine.select_player(Some(PlayerId(9999))));
        assert!(engine.select_player(Some(PlayerId(3))));
        assert_eq!(engine.state().controlled_player, Some(PlayerId(3)));
        assert!(engine.select_player(None));
        assert_eq!(engine.state().controlled_player, None);
    }

    #[test]
    fn test_ai_records_decisions() {
        let mut engine = engine(7)
            .with_ai(TeamSide::Home, AIProfile::aggressive(AIDifficulty::Hard))
            .with_ai(TeamSide::Away, AIProfile::defensive(AIDifficulty::Hard));
        for _ in 0..300 {
            engine.step();
        }
        let state = engine.state();
        assert!(!state.decisions.is_empty());
        assert!(state.decisions.iter().all(|d| d.actual_outcome().is_some()));
        assert!(state.home.tactics.all_in_bounds());
    }
}
