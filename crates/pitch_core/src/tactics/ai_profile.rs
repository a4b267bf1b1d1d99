//! AI Profiles
//!
//! Immutable templates describing how an AI side decides and adapts.
//! Five presets, five difficulty levels.

use serde::{Deserialize, Serialize};

use super::{TacticalPreset, TacticalProfile};
use crate::error::{Result, SimError};

/// AI difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AIDifficulty {
    /// Never re-tunes tactics
    Beginner,
    /// Rare, slow tactical changes
    Easy,
    /// Basic situational responses
    #[default]
    Medium,
    /// Frequent, likely changes
    Hard,
    /// Checks often and always applies a matching change
    Expert,
}

impl AIDifficulty {
    pub const ALL: [AIDifficulty; 5] = [
        AIDifficulty::Beginner,
        AIDifficulty::Easy,
        AIDifficulty::Medium,
        AIDifficulty::Hard,
        AIDifficulty::Expert,
    ];

    /// Probability that a due adaptation check is actually carried out
    pub fn change_probability(&self) -> f32 {
        match self {
            Self::Beginner => 0.0,
            Self::Easy => 0.15,
            Self::Medium => 0.3,
            Self::Hard => 0.8,
            Self::Expert => 1.0,
        }
    }

    /// Minutes between adaptation checks. `None` = never.
    pub fn adaptation_interval(&self) -> Option<f32> {
        match self {
            Self::Beginner => None,
            Self::Easy => Some(15.0),
            Self::Medium => Some(10.0),
            Self::Hard => Some(5.0),
            Self::Expert => Some(3.0),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "beginner" => Some(Self::Beginner),
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            "expert" => Some(Self::Expert),
            _ => None,
        }
    }
}

/// Personality traits (0-100).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Personality {
    pub aggression: f32,
    pub intelligence: f32,
    pub adaptability: f32,
    pub risk_taking: f32,
    pub consistency: f32,
}

impl Default for Personality {
    fn default() -> Self {
        Self::new(50.0, 50.0, 50.0, 50.0, 50.0)
    }
}

impl Personality {
    pub fn new(aggression: f32, intelligence: f32, adaptability: f32, risk_taking: f32, consistency: f32) -> Self {
        let c = |v: f32| if v.is_nan() { 0.0 } else { v.clamp(0.0, 100.0) };
        Self {
            aggression: c(aggression),
            intelligence: c(intelligence),
            adaptability: c(adaptability),
            risk_taking: c(risk_taking),
            consistency: c(consistency),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AIProfile {
    pub name: String,
    pub description: String,
    pub difficulty: AIDifficulty,
    pub personality: Personality,
    pub default_tactics: TacticalProfile,
}

/// Preset names accepted by [`AIProfile::preset`].
pub const PRESET_NAMES: [&str; 5] = ["Aggressive", "Balanced", "Defensive", "Adaptive", "Counter-Attack"];

impl AIProfile {
    /// Always attacking with high pressing and fast tempo
    pub fn aggressive(difficulty: AIDifficulty) -> Self {
        Self {
            name: "Aggressive".into(),
            description: "Always attacking with high pressing and fast tempo".into(),
            difficulty,
            personality: Personality::new(85.0, 55.0, 45.0, 80.0, 50.0),
            default_tactics: TacticalProfile::for_style(TacticalPreset::HighPressing),
        }
    }

    /// Flexible tactics that adapt to match situation
    pub fn balanced(difficulty: AIDifficulty) -> Self {
        Self {
            name: "Balanced".into(),
            description: "Flexible tactics that adapt to match situation".into(),
            difficulty,
            personality: Personality::default(),
            default_tactics: TacticalProfile::for_style(TacticalPreset::Balanced),
        }
    }

    /// Compact defense with counter-attack focus
    pub fn defensive(difficulty: AIDifficulty) -> Self {
        Self {
            name: "Defensive".into(),
            description: "Compact defense with counter-attack focus".into(),
            difficulty,
            personality: Personality::new(40.0, 60.0, 40.0, 20.0, 75.0),
            default_tactics: TacticalProfile::for_style(TacticalPreset::Defensive),
        }
    }

    /// Reads the match and re-tunes quickly
    pub fn adaptive(difficulty: AIDifficulty) -> Self {
        Self {
            name: "Adaptive".into(),
            description: "Reads the match and re-tunes tactics quickly".into(),
            difficulty,
            personality: Personality::new(50.0, 80.0, 90.0, 50.0, 60.0),
            default_tactics: TacticalProfile::for_style(TacticalPreset::Possession),
        }
    }

    /// Deep defense with fast counter-attacks
    pub fn counter_attack(difficulty: AIDifficulty) -> Self {
        Self {
            name: "Counter-Attack".into(),
            description: "Deep defense with fast counter-attacks".into(),
            difficulty,
            personality: Personality::new(60.0, 60.0, 50.0, 65.0, 55.0),
            default_tactics: TacticalProfile::for_style(TacticalPreset::Counterattack),
        }
    }

    /// Find a preset by name (case-insensitive, `-`/`_` ignored).
    pub fn preset(name: &str, difficulty: AIDifficulty) -> Result<Self> {
        let key: String =
            name.chars().filter(|c| c.is_alphanumeric()).collect::<String>().to_ascii_lowercase();
        match key.as_str() {
            "aggressive" => Ok(Self::aggressive(difficulty)),
            "balanced" => Ok(Self::balanced(difficulty)),
            "defensive" => Ok(Self::defensive(difficulty)),
            "adaptive" => Ok(Self::adaptive(difficulty)),
            "counterattack" | "counter" => Ok(Self::counter_attack(difficulty)),
            _ => Err(SimError::UnknownProfile(name.to_string())),
        }
    }

    pub fn all(difficulty: AIDifficulty) -> Vec<Self> {
        PRESET_NAMES.iter().filter_map(|n| Self::preset(n, difficulty).ok()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_difficulty_probabilities() {
        assert_eq!(AIDifficulty::Beginner.change_probability(), 0.0);
        assert_eq!(AIDifficulty::Medium.change_probability(), 0.3);
        assert_eq!(AIDifficulty::Expert.change_probability(), 1.0);
    }

    #[test]
    fn test_intervals_shrink_with_difficulty() {
        assert_eq!(AIDifficulty::Beginner.adaptation_interval(), None);
        let intervals: Vec<f32> =
            AIDifficulty::ALL[1..].iter().filter_map(|d| d.adaptation_interval()).collect();
        assert!(intervals.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_find_profile_by_name() {
        assert!(AIProfile::preset("Aggressive", AIDifficulty::Hard).is_ok());
        assert!(AIProfile::preset("counter-attack", AIDifficulty::Hard).is_ok());
        assert!(matches!(
            AIProfile::preset("Unknown", AIDifficulty::Hard),
            Err(SimError::UnknownProfile(_))
        ));
        assert_eq!(AIProfile::all(AIDifficulty::Easy).len(), 5);
    }

    #[test]
    fn test_aggressive_takes_more_risk_than_defensive() {
        let a = AIProfile::aggressive(AIDifficulty::Medium);
        let d = AIProfile::defensive(AIDifficulty::Medium);
        assert!(a.personality.risk_taking > d.personality.risk_taking);
        assert!(a.default_tactics.pressing() > d.default_tactics.pressing());
    }

    #[test]
    fn test_personality_clamps() {
        let p = Personality::new(-5.0, 150.0, f32::NAN, 50.0, 50.0);
        assert_eq!(p.aggression, 0.0);
        assert_eq!(p.intelligence, 100.0);
        assert_eq!(p.adaptability, 0.0);
    }
}
