//! Weighted option choice for the ball carrier.
//!
//! Each candidate option gets an adjusted weight
//!
//! ```text
//! weight * risk(risk_taking) * confidence(form) * fatigue(stamina) * intelligence(ev)
//! ```
//!
//! and one is sampled proportionally. A zero total falls back to the option
//! with the highest success chance.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::engine::vector::Vector2;
use crate::error::{Result, SimError};
use crate::models::{PlayerId, TeamSide};
use crate::tactics::AIProfile;

/// Below this stamina, risky options are discounted.
pub const FATIGUE_STAMINA: f32 = 30.0;
pub const FATIGUE_PENALTY: f32 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OptionKind {
    Shoot,
    Pass { target: PlayerId },
    Dribble,
    Hold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AIOption {
    pub kind: OptionKind,
    /// 0-1
    pub success_chance: f32,
    pub risk_level: RiskLevel,
    /// -100..100
    pub expected_value: f32,
    /// Tactical base weight before personality adjustments
    pub weight: f32,
}

impl AIOption {
    pub fn new(kind: OptionKind, success_chance: f32, risk_level: RiskLevel, expected_value: f32) -> Self {
        Self {
            kind,
            success_chance: crate::engine::actions::clamp_probability(success_chance),
            risk_level,
            expected_value: if expected_value.is_nan() { 0.0 } else { expected_value.clamp(-100.0, 100.0) },
            weight: 1.0,
        }
    }

    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = if weight.is_finite() { weight.max(0.0) } else { 0.0 };
        self
    }
}

/// What the carrier sees when deciding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecisionContext {
    pub player_position: Vector2,
    pub ball_position: Vector2,
    pub nearby_opponents: u8,
    pub nearby_teammates: u8,
    pub stamina: f32,
    pub form: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionOutcome {
    Success,
    Partial,
    Failure,
}

/// One decision, kept for post-match analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AIDecision {
    pub player_id: Option<PlayerId>,
    pub team: Option<TeamSide>,
    pub time: f32,
    pub context: DecisionContext,
    pub options: Vec<AIOption>,
    pub adjusted_weights: Vec<f32>,
    pub chosen: usize,
    pub success_probability: f32,
    actual_outcome: Option<DecisionOutcome>,
}

impl AIDecision {
    pub fn chosen_option(&self) -> &AIOption {
        &self.options[self.chosen]
    }

    pub fn actual_outcome(&self) -> Option<DecisionOutcome> {
        self.actual_outcome
    }

    /// Outcomes are written once.
    pub fn record_outcome(&mut self, outcome: DecisionOutcome) -> Result<()> {
        if self.actual_outcome.is_some() {
            return Err(SimError::OutcomeAlreadyRecorded);
        }
        self.actual_outcome = Some(outcome);
        Ok(())
    }

    pub fn attribute(mut self, team: TeamSide, player: PlayerId, time: f32) -> Self {
        self.team = Some(team);
        self.player_id = Some(player);
        self.time = time;
        self
    }
}

// ============================================================================
// Multipliers
// ============================================================================

/// Risk-taking 0-100 pushes weight toward (high) or away from (low) risky options.
pub fn risk_multiplier(risk: RiskLevel, risk_taking: f32) -> f32 {
    let rt = (risk_taking / 100.0).clamp(0.0, 1.0);
    match risk {
        RiskLevel::High => 0.4 + 1.6 * rt,
        RiskLevel::Medium => 0.9 + 0.2 * rt,
        RiskLevel::Low => 1.0 - 0.25 * rt,
    }
}

/// Form 0-100 maps to 0.8-1.2. Applies to options that carry risk.
pub fn confidence_multiplier(risk: RiskLevel, form: f32) -> f32 {
    if risk == RiskLevel::Low {
        return 1.0;
    }
    0.8 + 0.4 * (form / 100.0).clamp(0.0, 1.0)
}

pub fn fatigue_multiplier(risk: RiskLevel, stamina: f32) -> f32 {
    if stamina < FATIGUE_STAMINA && risk != RiskLevel::Low {
        FATIGUE_PENALTY
    } else {
        1.0
    }
}

/// Smarter players lean toward higher expected value.
pub fn intelligence_multiplier(intelligence: f32, expected_value: f32) -> f32 {
    1.0 + (intelligence / 100.0).clamp(0.0, 1.0) * (expected_value / 100.0) * 0.5
}

pub fn adjusted_weight(profile: &AIProfile, ctx: &DecisionContext, option: &AIOption) -> f32 {
    let p = &profile.personality;
    let w = option.weight
        * risk_multiplier(option.risk_level, p.risk_taking)
        * confidence_multiplier(option.risk_level, ctx.form)
        * fatigue_multiplier(option.risk_level, ctx.stamina)
        * intelligence_multiplier(p.intelligence, option.expected_value);
    if w.is_finite() {
        w.max(0.0)
    } else {
        0.0
    }
}

/// Cumulative weighted sampling. `None` when the total is not positive.
pub fn sample_weighted(weights: &[f32], rng: &mut impl Rng) -> Option<usize> {
    let total: f32 = weights.iter().sum();
    if total.is_nan() || total <= 0.0 {
        return None;
    }
    let roll = rng.gen::<f32>() * total;
    let mut acc = 0.0f32;
    for (i, w) in weights.iter().enumerate() {
        acc += w;
        if roll < acc {
            return Some(i);
        }
    }
    // float slack: land on the last positive weight
    weights.iter().rposition(|w| *w > 0.0)
}

/// Pick one option. `None` only for an empty option list.
pub fn decide(
    profile: &AIProfile,
    ctx: &DecisionContext,
    options: Vec<AIOption>,
    rng: &mut impl Rng,
) -> Option<AIDecision> {
    if options.is_empty() {
        return None;
    }
    let adjusted_weights: Vec<f32> = options.iter().map(|o| adjusted_weight(profile, ctx, o)).collect();
    let chosen = sample_weighted(&adjusted_weights, rng).unwrap_or_else(|| {
        options
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.success_chance.total_cmp(&b.1.success_chance))
            .map(|(i, _)| i)
            .unwrap_or(0)
    });
    let success_probability = options[chosen].success_chance;
    log::trace!("decision: {:?} (p={:.2})", options[chosen].kind, success_probability);

    Some(AIDecision {
        player_id: None,
        team: None,
        time: 0.0,
        context: *ctx,
        options,
        adjusted_weights,
        chosen,
        success_probability,
        actual_outcome: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tactics::{AIDifficulty, Personality};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn ctx(stamina: f32, form: f32) -> DecisionContext {
        DecisionContext {
            player_position: Vector2::ZERO,
            ball_position: Vector2::ZERO,
            nearby_opponents: 1,
            nearby_teammates: 2,
            stamina,
            form,
        }
    }

    fn profile(risk_taking: f32) -> AIProfile {
        let mut p = AIProfile::balanced(AIDifficulty::Medium);
        p.personality = Personality::new(50.0, 50.0, 50.0, risk_taking, 50.0);
        p
    }

    #[test]
    fn test_risk_taker_prefers_high_risk() {
        let high = AIOption::new(OptionKind::Shoot, 0.3, RiskLevel::High, 0.0);
        let low = AIOption::new(OptionKind::Hold, 0.9, RiskLevel::Low, 0.0);
        let c = ctx(100.0, 50.0);
        let bold = profile(100.0);
        let timid = profile(0.0);
        assert!(adjusted_weight(&bold, &c, &high) > adjusted_weight(&bold, &c, &low));
        assert!(adjusted_weight(&timid, &c, &high) < adjusted_weight(&timid, &c, &low));
    }

    #[test]
    fn test_fatigue_discounts_risky_options_only() {
        let p = profile(50.0);
        let risky = AIOption::new(OptionKind::Dribble, 0.5, RiskLevel::Medium, 0.0);
        let safe = AIOption::new(OptionKind::Hold, 0.9, RiskLevel::Low, 0.0);
        let fresh = ctx(100.0, 50.0);
        let tired = ctx(10.0, 50.0);
        let ratio = adjusted_weight(&p, &tired, &risky) / adjusted_weight(&p, &fresh, &risky);
        assert!((ratio - FATIGUE_PENALTY).abs() < 1e-5);
        assert_eq!(adjusted_weight(&p, &tired, &safe), adjusted_weight(&p, &fresh, &safe));
    }

    #[test]
    fn test_zero_weights_fall_back_to_safest() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let options = vec![
            AIOption::new(OptionKind::Shoot, 0.2, RiskLevel::High, 10.0).with_weight(0.0),
            AIOption::new(OptionKind::Hold, 0.8, RiskLevel::Low, 0.0).with_weight(0.0),
            AIOption::new(OptionKind::Dribble, 0.5, RiskLevel::Medium, 0.0).with_weight(0.0),
        ];
        let decision = decide(&profile(50.0), &ctx(100.0, 50.0), options, &mut rng).unwrap();
        assert_eq!(decision.chosen, 1);
        assert!((decision.success_probability - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_empty_options() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        assert!(decide(&profile(50.0), &ctx(100.0, 50.0), vec![], &mut rng).is_none());
    }

    #[test]
    fn test_sampling_follows_weights() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let weights = [1.0, 3.0];
        let n = 10_000;
        let second = (0..n).filter(|_| sample_weighted(&weights, &mut rng) == Some(1)).count();
        let share = second as f32 / n as f32;
        assert!((share - 0.75).abs() < 0.03, "share {}", share);
    }

    #[test]
    fn test_outcome_is_write_once() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let options = vec![AIOption::new(OptionKind::Hold, 0.9, RiskLevel::Low, 0.0)];
        let mut decision = decide(&profile(50.0), &ctx(100.0, 50.0), options, &mut rng).unwrap();
        assert!(decision.record_outcome(DecisionOutcome::Success).is_ok());
        assert!(matches!(
            decision.record_outcome(DecisionOutcome::Failure),
            Err(SimError::OutcomeAlreadyRecorded)
        ));
        assert_eq!(decision.actual_outcome(), Some(DecisionOutcome::Success));
    }
}
