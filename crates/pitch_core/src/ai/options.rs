//! Candidate options for an AI-controlled ball carrier.

use crate::ai::decision::{AIOption, DecisionContext, OptionKind, RiskLevel};
use crate::config::SimConfig;
use crate::engine::actions::{clamp_probability, pass_success, shot_success};
use crate::models::{MatchState, PlayerId, Stat};
use crate::tactics::Slider;

/// Combined base weight of every pass option at neutral style.
pub const PASS_BUDGET: f32 = 1.2;

/// Relative share of the pass budget: forward targets get more, deep recycling less.
fn pass_share(progress: f32) -> f32 {
    if progress > 0.1 {
        2.0
    } else if progress > -0.05 {
        1.0
    } else {
        0.5
    }
}

fn risk_for(success: f32) -> RiskLevel {
    if success >= 0.7 {
        RiskLevel::Low
    } else if success >= 0.4 {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

/// Context and options for `holder`. `None` if the holder is not on the pitch.
///
/// Shoot is offered only inside the shooting zone. Every teammate gets a Pass
/// option, but all passes share [`PASS_BUDGET`], skewed toward forward
/// targets. Dribble and Hold are always there.
pub fn build_options(
    state: &MatchState,
    cfg: &SimConfig,
    holder: PlayerId,
) -> Option<(DecisionContext, Vec<AIOption>)> {
    let player = state.player(holder)?;
    let side = player.team;
    let field = cfg.field;
    let tactics = &state.team(side).tactics;
    let norm = cfg.scaled(cfg.actions.distance_norm);
    let radius = cfg.scaled(cfg.actions.nearby_radius);
    let ball = state.ball.position;

    let count_near = |players: &[crate::models::Player]| {
        players
            .iter()
            .filter(|p| p.id != holder && p.position.distance(player.position) <= radius)
            .count()
            .min(u8::MAX as usize) as u8
    };
    let ctx = DecisionContext {
        player_position: player.position,
        ball_position: ball,
        nearby_opponents: count_near(state.team(side.opponent()).players.as_slice()),
        nearby_teammates: count_near(state.team(side).players.as_slice()),
        stamina: player.stats.stamina(),
        form: player.form,
    };

    let mut options = Vec::new();

    if field.in_shooting_zone(ball, side, cfg.actions.shooting_zone_fraction) {
        let distance = ball.distance(field.target_goal(side));
        let expected = shot_success(player.effective(Stat::Shooting, &cfg.stamina), distance, 0.5, norm);
        let risk = if expected > 0.45 { RiskLevel::Medium } else { RiskLevel::High };
        options.push(
            AIOption::new(OptionKind::Shoot, expected, risk, expected * 140.0 - 30.0)
                .with_weight(1.5 * tactics.factor(Slider::OffensiveAggression)),
        );
    }

    let passing = player.effective(Stat::Passing, &cfg.stamina);
    let own_depth = field.distance_to_goal_line(player.position, side);
    let mates: Vec<_> = state
        .team(side)
        .players
        .iter()
        .filter(|p| p.id != holder)
        .map(|mate| {
            let progress = (own_depth - field.distance_to_goal_line(mate.position, side)) / field.length;
            (mate, progress)
        })
        .collect();
    let total_share: f32 = mates.iter().map(|(_, progress)| pass_share(*progress)).sum();
    for (mate, progress) in mates.iter().copied() {
        let p = pass_success(passing, player.position.distance(mate.position), norm);
        let ev = progress * 150.0 * p - (1.0 - p) * 40.0;
        let style = if progress > 0.1 {
            tactics.factor(Slider::Creativity)
        } else {
            tactics.factor(Slider::BuildUpPlay)
        };
        let weight = PASS_BUDGET * style * pass_share(progress) / total_share.max(f32::EPSILON);
        options.push(AIOption::new(OptionKind::Pass { target: mate.id }, p, risk_for(p), ev).with_weight(weight));
    }

    let pressure = 1.0 - 0.15 * ctx.nearby_opponents as f32;
    let dribble = clamp_probability(player.effective(Stat::Dribbling, &cfg.stamina) / 100.0 * pressure.max(0.1));
    options.push(
        AIOption::new(OptionKind::Dribble, dribble, RiskLevel::Medium, dribble * 30.0 - (1.0 - dribble) * 25.0)
            .with_weight(tactics.factor(Slider::TransitionSpeed)),
    );

    let hold = (0.95 - 0.1 * ctx.nearby_opponents as f32).clamp(0.2, 0.95);
    options.push(
        AIOption::new(OptionKind::Hold, hold, RiskLevel::Low, 0.0).with_weight(2.0 - tactics.factor(Slider::Tempo)),
    );

    Some((ctx, options))
}
