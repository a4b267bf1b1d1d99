//! # Simulation Configuration
//!
//! 모든 튜닝 상수를 한 곳에서 관리한다.
//!
//! Distances and speeds are written in legacy field units (1050 × 680) and
//! scaled through [`FieldDims::scale`] when the field is smaller.
//!
//! ```rust
//! use pitch_core::config::SimConfig;
//!
//! let legacy = SimConfig::default();
//! let metric = SimConfig::metric();
//! assert!(metric.field.scale() < legacy.field.scale());
//! ```

use serde::{Deserialize, Serialize};

use crate::engine::vector::FieldDims;
use crate::error::{Result, SimError};
use crate::tactics::Slider;

/// Full set of tunables for one match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    pub field: FieldDims,
    #[serde(default)]
    pub physics: PhysicsConfig,
    #[serde(default)]
    pub actions: ActionConfig,
    #[serde(default)]
    pub discipline: DisciplineConfig,
    #[serde(default)]
    pub clock: ClockConfig,
    #[serde(default)]
    pub stamina: StaminaConfig,
    #[serde(default)]
    pub ai: AiConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::legacy()
    }
}

impl SimConfig {
    /// 1050 × 680 field.
    pub fn legacy() -> Self {
        Self {
            field: FieldDims::legacy(),
            physics: PhysicsConfig::default(),
            actions: ActionConfig::default(),
            discipline: DisciplineConfig::default(),
            clock: ClockConfig::default(),
            stamina: StaminaConfig::default(),
            ai: AiConfig::default(),
        }
    }

    /// 104 × 68 field, same rules.
    pub fn metric() -> Self {
        Self { field: FieldDims::metric(), ..Self::legacy() }
    }

    /// Legacy-unit length converted to this field's units.
    pub fn scaled(&self, legacy_units: f32) -> f32 {
        legacy_units * self.field.scale()
    }

    pub fn validate(&self) -> Result<()> {
        fn check(ok: bool, msg: &str) -> Result<()> {
            if ok {
                Ok(())
            } else {
                Err(SimError::InvalidConfig(msg.to_string()))
            }
        }

        check(self.field.length > 0.0 && self.field.width > 0.0, "field must have positive size")?;
        check(
            self.physics.friction > 0.0 && self.physics.friction <= 1.0,
            "friction must be in (0, 1]",
        )?;
        check(
            (0.0..=1.0).contains(&self.physics.restitution),
            "restitution must be in [0, 1]",
        )?;
        check(
            self.physics.lateral_speed_min <= self.physics.lateral_speed_max,
            "lateral speed range is inverted",
        )?;
        check(
            self.actions.shooting_zone_fraction > 0.0 && self.actions.shooting_zone_fraction < 0.5,
            "shooting zone must cover less than half the field",
        )?;
        check(self.actions.distance_norm > 0.0, "distance_norm must be positive")?;
        check(self.clock.sim_tick_seconds > 0.0, "sim_tick_seconds must be positive")?;
        check(self.clock.minutes_per_tick > 0.0, "minutes_per_tick must be positive")?;
        check(self.clock.full_time_minute > 0.0, "full_time_minute must be positive")?;
        check(
            self.clock.min_frame_seconds > 0.0 && self.clock.min_frame_seconds <= self.clock.sim_tick_seconds,
            "min_frame_seconds must be in (0, sim_tick_seconds]",
        )?;
        check(self.ai.decision_interval_ticks > 0, "decision_interval_ticks must be positive")?;

        for p in [
            self.physics.auto_pass_chance,
            self.actions.shot_trigger_chance,
            self.actions.tackle_trigger_chance,
            self.actions.foul_chance,
            self.discipline.card_chance,
            self.discipline.red_chance,
        ] {
            check((0.0..=1.0).contains(&p), "probabilities must be in [0, 1]")?;
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }
}

/// Ball integration and possession.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicsConfig {
    /// Multiplicative velocity decay per tick (0.98-0.99)
    pub friction: f32,
    /// Velocity kept after a boundary bounce (0.80-0.85)
    pub restitution: f32,
    /// Constant y-velocity bias added per tick while the ball rolls (legacy units)
    pub gravity_bias: f32,
    /// A loose ball slower than this stops dead (legacy units/tick)
    pub stop_speed: f32,
    /// Possession capture radius (legacy units)
    pub capture_radius: f32,
    /// Auto-possession lateral speed range (legacy units/tick)
    pub lateral_speed_min: f32,
    pub lateral_speed_max: f32,
    /// Forward carry speed at pace 99 (legacy units/tick)
    pub carry_speed: f32,
    /// Per-tick chance of an auto-possession pass at neutral tempo
    pub auto_pass_chance: f32,
    /// Closing speed of the pressing player at pace 99 (legacy units/tick)
    pub press_speed: f32,
    /// Pressers stop this far from a held ball (legacy units)
    pub press_stand_off: f32,
    /// Off-ball return speed toward the formation anchor (legacy units/tick)
    pub recovery_speed: f32,
    /// Per-tick spin decay
    pub spin_decay: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            friction: 0.985,
            restitution: 0.82,
            gravity_bias: 0.002,
            stop_speed: 0.2,
            capture_radius: 80.0,
            lateral_speed_min: 3.0,
            lateral_speed_max: 5.0,
            carry_speed: 9.0,
            auto_pass_chance: 0.02,
            press_speed: 8.0,
            press_stand_off: 40.0,
            recovery_speed: 4.0,
            spin_decay: 0.9,
        }
    }
}

/// Shot/tackle/pass triggers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionConfig {
    /// Shooting zone depth as a fraction of field length
    pub shooting_zone_fraction: f32,
    /// Per-tick shot chance inside the zone at neutral aggression
    pub shot_trigger_chance: f32,
    /// Challenge radius (legacy units)
    pub challenge_radius: f32,
    /// Per-tick tackle chance at neutral pressing
    pub tackle_trigger_chance: f32,
    /// Chance that a failed tackle is a foul
    pub foul_chance: f32,
    /// Distance normaliser in the shot/pass models (legacy units)
    pub distance_norm: f32,
    /// Radius used to count nearby players for AI context (legacy units)
    pub nearby_radius: f32,
}

impl Default for ActionConfig {
    fn default() -> Self {
        Self {
            shooting_zone_fraction: 0.15,
            shot_trigger_chance: 0.008,
            challenge_radius: 100.0,
            tackle_trigger_chance: 0.01,
            foul_chance: 0.4,
            distance_norm: 500.0,
            nearby_radius: 150.0,
        }
    }
}

/// How the two card rolls are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CardRollOrder {
    /// Red is rolled on its own, then yellow. Red frequency = `red_chance`.
    #[default]
    Independent,
    /// Yellow is rolled first; red only when yellow missed.
    YellowFirst,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisciplineConfig {
    pub card_chance: f32,
    pub red_chance: f32,
    #[serde(default)]
    pub roll_order: CardRollOrder,
}

impl Default for DisciplineConfig {
    fn default() -> Self {
        Self { card_chance: 0.15, red_chance: 0.03, roll_order: CardRollOrder::Independent }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClockConfig {
    /// Host seconds per simulation tick (10 Hz)
    pub sim_tick_seconds: f32,
    /// Match minutes added per simulation tick
    pub minutes_per_tick: f32,
    pub full_time_minute: f32,
    /// Host time credited for a zero, negative or non-finite frame delta,
    /// and the floor for every frame.
    #[serde(default = "default_min_frame_seconds")]
    pub min_frame_seconds: f32,
}

fn default_min_frame_seconds() -> f32 {
    1.0 / 240.0
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            sim_tick_seconds: 0.1,
            minutes_per_tick: 0.1,
            full_time_minute: 90.0,
            min_frame_seconds: default_min_frame_seconds(),
        }
    }
}

impl ClockConfig {
    /// Upper bound on host calls per simulation tick.
    pub fn max_calls_per_tick(&self) -> u32 {
        (self.sim_tick_seconds / self.min_frame_seconds).ceil() as u32 + 1
    }

    pub fn full_time_ticks(&self) -> u32 {
        (self.full_time_minute / self.minutes_per_tick).round() as u32
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaminaConfig {
    /// Base drain per tick for every on-pitch player
    pub base_drain: f32,
    /// Extra drain multiplier for the ball carrier and the presser
    pub effort_multiplier: f32,
    /// Below this stamina, stats are read through `degraded_multiplier`
    pub fatigue_threshold: f32,
    pub degraded_multiplier: f32,
}

impl Default for StaminaConfig {
    fn default() -> Self {
        Self {
            base_drain: 0.06,
            effort_multiplier: 2.0,
            fatigue_threshold: 30.0,
            degraded_multiplier: 0.85,
        }
    }
}

/// One slider change of an adaptation rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SliderDelta {
    pub slider: Slider,
    pub delta: f32,
}

impl SliderDelta {
    pub const fn new(slider: Slider, delta: f32) -> Self {
        Self { slider, delta }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptationDeltas {
    pub losing: Vec<SliderDelta>,
    pub winning: Vec<SliderDelta>,
    pub under_pressure: Vec<SliderDelta>,
    pub dominating_possession: Vec<SliderDelta>,
    /// Pressure% above which the pressure trigger fires
    pub pressure_threshold: f32,
    /// Possession% above which the possession trigger fires
    pub possession_threshold: f32,
}

impl Default for AdaptationDeltas {
    fn default() -> Self {
        use Slider::*;
        Self {
            losing: vec![
                SliderDelta::new(Pressing, 15.0),
                SliderDelta::new(OffensiveAggression, 20.0),
                SliderDelta::new(DefensiveLineHeight, 10.0),
                SliderDelta::new(Creativity, 10.0),
            ],
            winning: vec![
                SliderDelta::new(Pressing, -10.0),
                SliderDelta::new(DefensiveLineHeight, -15.0),
                SliderDelta::new(OffensiveAggression, -15.0),
            ],
            under_pressure: vec![
                SliderDelta::new(DefensiveLineHeight, -15.0),
                SliderDelta::new(Pressing, -10.0),
                SliderDelta::new(BuildUpPlay, 10.0),
            ],
            dominating_possession: vec![
                SliderDelta::new(TransitionSpeed, 15.0),
                SliderDelta::new(Tempo, 10.0),
                SliderDelta::new(Creativity, -10.0),
            ],
            pressure_threshold: 70.0,
            possession_threshold: 65.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiConfig {
    /// The possessing AI side is consulted every N ticks
    pub decision_interval_ticks: u32,
    #[serde(default)]
    pub adaptation: AdaptationDeltas,
    /// Upper bound on combined goals per 90 minutes for the integrity check
    pub max_goals_per_90: f32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            decision_interval_ticks: 5,
            adaptation: AdaptationDeltas::default(),
            max_goals_per_90: 30.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_legacy_and_valid() {
        let cfg = SimConfig::default();
        assert_eq!(cfg.field, FieldDims::legacy());
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.clock.full_time_ticks(), 900);
    }

    #[test]
    fn test_metric_scales_radii() {
        let cfg = SimConfig::metric();
        assert!(cfg.validate().is_ok());
        let radius = cfg.scaled(cfg.physics.capture_radius);
        assert!((radius - 80.0 * 104.0 / 1050.0).abs() < 1e-4);
    }

    #[test]
    fn test_rejects_bad_friction() {
        let mut cfg = SimConfig::default();
        cfg.physics.friction = 1.5;
        assert!(matches!(cfg.validate(), Err(SimError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_probability_out_of_range() {
        let mut cfg = SimConfig::default();
        cfg.discipline.card_chance = 1.2;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_frame_floor() {
        let mut cfg = SimConfig::default();
        cfg.clock.min_frame_seconds = 0.0;
        assert!(cfg.validate().is_err());
        cfg.clock.min_frame_seconds = 0.5;
        assert!(cfg.validate().is_err());

        let json = r#"{ "clock": { "sim_tick_seconds": 0.1, "minutes_per_tick": 0.1, "full_time_minute": 90.0 } }"#;
        let cfg = SimConfig::from_json(json).unwrap();
        assert_eq!(cfg.clock.min_frame_seconds, 1.0 / 240.0);
        assert!((25..=26).contains(&cfg.clock.max_calls_per_tick()));
    }

    #[test]
    fn test_config_serialization() {
        let cfg = SimConfig::metric();
        let json = cfg.to_json().unwrap();
        let parsed = SimConfig::from_json(&json).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let json = r#"{ "field": { "length": 104.0, "width": 68.0 } }"#;
        let cfg = SimConfig::from_json(json).unwrap();
        assert_eq!(cfg.physics, PhysicsConfig::default());
        assert_eq!(cfg.discipline.roll_order, CardRollOrder::Independent);
    }
}
