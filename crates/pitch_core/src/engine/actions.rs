//! Action Resolution
//!
//! Shots, tackles and passes. The probability models are pure functions of
//! their inputs; the `resolve_*` functions apply an outcome to the state and
//! append the matching events.
//!
//! - shot: `success = (shooting/100) * max(0.2, 1 - d/norm) * (1 - noise*0.3)`
//! - tackle: `success = (defense/100) * (1 - dribbling/200)`
//! - pass: `success = (passing/100) * max(0, 1 - d/norm)`
//!
//! Every probability is clamped to `[0, 1]` before use.

use rand::Rng;

use crate::config::SimConfig;
use crate::engine::vector::{FieldDims, Vector2};
use crate::models::{EventKind, MatchEvent, MatchState, PassLink, PlayerId, Stat, Team, TeamSide};
use crate::tactics::Slider;

/// Shot success above this is on target.
pub const ON_TARGET_THRESHOLD: f32 = 0.5;
/// Goal roll (`success*0.8 + noise*0.2`) above this scores.
pub const GOAL_THRESHOLD: f32 = 0.55;
/// Goals whose roll lands this close to the threshold are flagged for review.
pub const REVIEW_MARGIN: f32 = 0.02;

// ===========================================
// Probability models (pure)
// ===========================================

/// Clamp to `[0, 1]`. NaN maps to 0.
pub fn clamp_probability(p: f32) -> f32 {
    if p.is_nan() {
        0.0
    } else {
        p.clamp(0.0, 1.0)
    }
}

/// Distance penalty of the shot model, floored at 0.2.
pub fn distance_factor(distance: f32, norm: f32) -> f32 {
    (1.0 - distance.max(0.0) / norm).clamp(0.2, 1.0)
}

pub fn shot_success(shooting: f32, distance: f32, noise: f32, norm: f32) -> f32 {
    let noise = clamp_probability(noise);
    clamp_probability((shooting / 100.0) * distance_factor(distance, norm) * (1.0 - noise * 0.3))
}

pub fn tackle_success(defense: f32, dribbling: f32) -> f32 {
    clamp_probability((defense / 100.0) * (1.0 - dribbling / 200.0))
}

pub fn pass_success(passing: f32, distance: f32, norm: f32) -> f32 {
    clamp_probability((passing / 100.0) * (1.0 - distance.max(0.0) / norm).max(0.0))
}

/// Evaluated shot, before it is applied to the state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotOutcome {
    pub success: f32,
    pub on_target: bool,
    pub goal_roll: f32,
    pub goal: bool,
    /// Goal decided within [`REVIEW_MARGIN`] of the threshold
    pub marginal: bool,
    pub distance: f32,
}

/// 슈팅 판정 (순수 함수). `noise` is the single random draw of the shot.
pub fn evaluate_shot(shooting: f32, distance: f32, noise: f32, norm: f32) -> ShotOutcome {
    let noise = clamp_probability(noise);
    let success = shot_success(shooting, distance, noise, norm);
    let on_target = success > ON_TARGET_THRESHOLD;
    let goal_roll = clamp_probability(success * 0.8 + noise * 0.2);
    let goal = on_target && goal_roll > GOAL_THRESHOLD;
    ShotOutcome {
        success,
        on_target,
        goal_roll,
        goal,
        marginal: goal && goal_roll - GOAL_THRESHOLD < REVIEW_MARGIN,
        distance,
    }
}

// ===========================================
// Restarts
// ===========================================

/// Re-derive every anchor of `team` from its current tactics.
pub(crate) fn refresh_anchors(team: &mut Team, field: &FieldDims) {
    let side = team.side;
    let formation = team.tactics.formation;
    for player in team.players.iter_mut() {
        player.anchor = formation.anchor(player.slot, side, field, &team.tactics);
    }
}

/// Reset both teams onto their anchors and give `side` the ball at the centre spot.
///
/// The restarting player is the outfield player whose anchor is closest to the
/// centre (the keeper only when nobody else is left).
pub(crate) fn kick_off(state: &mut MatchState, cfg: &SimConfig, side: TeamSide) {
    let field = cfg.field;
    let center = field.center();
    for s in TeamSide::BOTH {
        let team = state.team_mut(s);
        refresh_anchors(team, &field);
        for player in team.players.iter_mut() {
            player.position = player.anchor;
        }
    }

    state.ball.place(center);
    state.last_pass = None;

    let kicker = state
        .team(side)
        .players
        .iter()
        .min_by(|a, b| {
            let key = |p: &crate::models::Player| (p.role.is_goalkeeper(), p.anchor.distance(center));
            let (ka, kb) = (key(a), key(b));
            ka.0.cmp(&kb.0).then(ka.1.total_cmp(&kb.1))
        })
        .map(|p| p.id);

    match kicker {
        Some(id) => {
            if let Some(p) = state.player_mut(id) {
                p.position = center;
            }
            state.possession_team = Some(side);
            state.possession_player = Some(id);
        }
        None => {
            state.possession_team = None;
            state.possession_player = None;
        }
    }

    let description = format!("{} kick off", state.team(side).name);
    state.record(EventKind::KickOff, Some(side), kicker, description);
}

// ===========================================
// Shots
// ===========================================

/// Apply a shot by `shooter`. `power` scales the shooting stat (1.0 for
/// automatic shots). Returns `None` when the shooter is not on the pitch.
///
/// Whatever the result, the defending team restarts from the centre.
pub fn resolve_shot(
    state: &mut MatchState,
    cfg: &SimConfig,
    shooter: PlayerId,
    noise: f32,
    power: f32,
) -> Option<ShotOutcome> {
    let player = state.player(shooter)?;
    let side = player.team;
    let shooting = player.effective(Stat::Shooting, &cfg.stamina) * power.max(0.0);
    let name = player.name.clone();

    let distance = state.ball.position.distance(cfg.field.target_goal(side));
    let outcome = evaluate_shot(shooting, distance, noise, cfg.scaled(cfg.actions.distance_norm));

    let stats = &mut state.team_mut(side).stats;
    stats.shots = stats.shots.saturating_add(1);
    if outcome.on_target {
        stats.shots_on_target = stats.shots_on_target.saturating_add(1);
    }
    state.record(
        EventKind::Shot {
            on_target: outcome.on_target,
            success: outcome.success,
            distance: outcome.distance,
        },
        Some(side),
        Some(shooter),
        format!("{} shoots from {:.0}", name, outcome.distance),
    );

    if outcome.goal {
        let assist = state
            .last_pass
            .filter(|link| link.team == side && link.receiver == shooter)
            .map(|link| link.passer);
        let team = state.team_mut(side);
        team.score = team.score.saturating_add(1);
        let event = MatchEvent::new(
            state.clock,
            state.tick,
            EventKind::Goal { assist },
            format!("GOAL! {} scores", name),
        )
        .by(side, Some(shooter))
        .with_var_review(outcome.marginal);
        state.record_event(event);
        if let Some(p) = state.player_mut(shooter) {
            p.adjust_form(10.0);
        }
        log::info!(
            "goal {} at {:.1}' ({}-{})",
            shooter,
            state.clock,
            state.home.score,
            state.away.score
        );
    } else if let Some(p) = state.player_mut(shooter) {
        p.adjust_form(if outcome.on_target { 1.0 } else { -2.0 });
    }

    kick_off(state, cfg, side.opponent());
    Some(outcome)
}

// ===========================================
// Tackles
// ===========================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TackleReport {
    pub defender: PlayerId,
    pub target: PlayerId,
    pub success: f32,
    pub won: bool,
    /// A lost tackle that was judged a foul; discipline handles it next
    pub foul: bool,
}

/// Challenge the current ball holder. Returns `None` if `defender` cannot
/// challenge (not on the pitch, same team, or nobody has the ball).
pub fn resolve_tackle(
    state: &mut MatchState,
    cfg: &SimConfig,
    defender: PlayerId,
    rng: &mut impl Rng,
) -> Option<TackleReport> {
    let target = state.possession_player?;
    let holder = state.player(target)?;
    let tackler = state.player(defender)?;
    if holder.team == tackler.team {
        return None;
    }
    let side = tackler.team;
    let success = tackle_success(
        tackler.effective(Stat::Defense, &cfg.stamina),
        holder.effective(Stat::Dribbling, &cfg.stamina),
    );
    let tackler_pos = tackler.position;
    let description = format!("{} challenges {}", tackler.name, holder.name);

    let won = rng.gen::<f32>() < success;
    let foul = !won && rng.gen::<f32>() < clamp_probability(cfg.actions.foul_chance);

    let stats = &mut state.team_mut(side).stats;
    stats.tackles = stats.tackles.saturating_add(1);
    if won {
        stats.tackles_won = stats.tackles_won.saturating_add(1);
    }
    state.record(EventKind::Tackle { target, won }, Some(side), Some(defender), description);

    if won {
        state.possession_team = Some(side);
        state.possession_player = Some(defender);
        state.ball.place(tackler_pos);
        state.last_pass = None;
        if let Some(p) = state.player_mut(defender) {
            p.adjust_form(3.0);
        }
    }
    log::debug!("tackle {} -> {} won={} foul={}", defender, target, won, foul);

    Some(TackleReport { defender, target, success, won, foul })
}

/// Nearest opponent inside the challenge radius may tackle, with a per-tick
/// chance biased by that team's pressing.
pub fn try_tackle(state: &mut MatchState, cfg: &SimConfig, rng: &mut impl Rng) -> Option<TackleReport> {
    let holder = state.possessor()?;
    let radius = cfg.scaled(cfg.actions.challenge_radius);
    let defending = holder.team.opponent();
    let holder_pos = holder.position;

    let defender = state
        .team(defending)
        .players
        .iter()
        .map(|p| (p.id, p.position.distance(holder_pos)))
        .filter(|(_, d)| *d <= radius)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| id)?;

    let trigger = clamp_probability(
        cfg.actions.tackle_trigger_chance * state.team(defending).tactics.factor(Slider::Pressing),
    );
    if rng.gen::<f32>() >= trigger {
        return None;
    }
    resolve_tackle(state, cfg, defender, rng)
}

// ===========================================
// Passes
// ===========================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassReport {
    pub passer: PlayerId,
    pub target: PlayerId,
    pub success: f32,
    pub completed: bool,
}

/// Pass from the holder `passer` to teammate `target`.
///
/// A completed pass moves ball and possession to the receiver. A failed one
/// leaves the ball loose somewhere along the passing lane, to be contested
/// by the possession rule on the next tick.
pub fn resolve_pass(
    state: &mut MatchState,
    cfg: &SimConfig,
    passer: PlayerId,
    target: PlayerId,
    rng: &mut impl Rng,
) -> Option<PassReport> {
    if passer == target || state.possession_player != Some(passer) {
        return None;
    }
    let from = state.player(passer)?;
    let to = state.player(target)?;
    if from.team != to.team {
        return None;
    }
    let side = from.team;
    let origin = state.ball.position;
    let destination = to.position;
    let distance = origin.distance(destination);
    let success = pass_success(
        from.effective(Stat::Passing, &cfg.stamina),
        distance,
        cfg.scaled(cfg.actions.distance_norm),
    );
    let description = format!("{} passes to {}", from.name, to.name);

    let completed = rng.gen::<f32>() < success;

    let stats = &mut state.team_mut(side).stats;
    stats.passes = stats.passes.saturating_add(1);
    if completed {
        stats.passes_completed = stats.passes_completed.saturating_add(1);
    }
    state.record(EventKind::Pass { target, completed }, Some(side), Some(passer), description);

    if completed {
        state.ball.place(destination);
        state.possession_player = Some(target);
        state.last_pass = Some(PassLink { team: side, passer, receiver: target });
    } else {
        let along: f32 = rng.gen_range(0.3..0.9);
        let lane = destination - origin;
        let drift = lane.perpendicular().normalized() * (rng.gen_range(-0.1f32..0.1) * distance);
        let loose = cfg.field.clamp(origin + lane * along + drift);
        state.ball.place(loose);
        state.ball.velocity = lane.normalized() * cfg.scaled(cfg.physics.lateral_speed_min);
        state.ball.spin = Some(rng.gen_range(-0.5..0.5));
        state.possession_team = None;
        state.possession_player = None;
        state.last_pass = None;
        if let Some(p) = state.player_mut(passer) {
            p.adjust_form(-2.0);
        }
    }

    Some(PassReport { passer, target, success, completed })
}

/// Pass to a random on-pitch teammate of the holder.
pub fn pass_to_random_teammate(
    state: &mut MatchState,
    cfg: &SimConfig,
    rng: &mut impl Rng,
) -> Option<PassReport> {
    let holder = state.possessor()?;
    let passer = holder.id;
    let mates: Vec<PlayerId> = state
        .team(holder.team)
        .players
        .iter()
        .filter(|p| p.id != passer)
        .map(|p| p.id)
        .collect();
    if mates.is_empty() {
        return None;
    }
    let target = mates[rng.gen_range(0..mates.len())];
    resolve_pass(state, cfg, passer, target, rng)
}

/// Whether the holder is deep enough to consider shooting.
pub fn holder_in_shooting_zone(state: &MatchState, cfg: &SimConfig) -> bool {
    state.possessor().map_or(false, |p| {
        cfg.field
            .in_shooting_zone(state.ball.position, p.team, cfg.actions.shooting_zone_fraction)
    })
}

/// Unit vector from `from` toward the goal `side` attacks.
pub fn goalward(field: &FieldDims, from: Vector2, side: TeamSide) -> Vector2 {
    (field.target_goal(side) - from).normalized()
}
