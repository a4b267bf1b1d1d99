//! Team-wide tactical sliders
//!
//! Eight 0-100 sliders per team. The match owns its own copy and the
//! adaptation loop mutates only that copy.

use serde::{Deserialize, Serialize};

use super::Formation;

/// Slider selector used by adaptation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slider {
    Pressing,
    Tempo,
    Width,
    DefensiveLineHeight,
    OffensiveAggression,
    BuildUpPlay,
    TransitionSpeed,
    Creativity,
}

impl Slider {
    pub const ALL: [Slider; 8] = [
        Slider::Pressing,
        Slider::Tempo,
        Slider::Width,
        Slider::DefensiveLineHeight,
        Slider::OffensiveAggression,
        Slider::BuildUpPlay,
        Slider::TransitionSpeed,
        Slider::Creativity,
    ];
}

/// Team-level tactical profile. Every slider stays in `[0, 100]`, including
/// profiles read from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawTacticalProfile")]
pub struct TacticalProfile {
    pub formation: Formation,
    pressing: f32,
    tempo: f32,
    width: f32,
    defensive_line_height: f32,
    offensive_aggression: f32,
    build_up_play: f32,
    transition_speed: f32,
    creativity: f32,
}

/// Wire shape of [`TacticalProfile`] before clamping.
#[derive(Deserialize)]
struct RawTacticalProfile {
    formation: Formation,
    pressing: f32,
    tempo: f32,
    width: f32,
    defensive_line_height: f32,
    offensive_aggression: f32,
    build_up_play: f32,
    transition_speed: f32,
    creativity: f32,
}

impl From<RawTacticalProfile> for TacticalProfile {
    fn from(raw: RawTacticalProfile) -> Self {
        Self::from_values(
            raw.formation,
            [
                raw.pressing,
                raw.tempo,
                raw.width,
                raw.defensive_line_height,
                raw.offensive_aggression,
                raw.build_up_play,
                raw.transition_speed,
                raw.creativity,
            ],
        )
    }
}

impl Default for TacticalProfile {
    fn default() -> Self {
        Self::for_style(TacticalPreset::Balanced)
    }
}

impl TacticalProfile {
    pub const MIN: f32 = 0.0;
    pub const MAX: f32 = 100.0;

    /// Every slider at `value`.
    pub fn uniform(formation: Formation, value: f32) -> Self {
        let mut profile = Self {
            formation,
            pressing: 0.0,
            tempo: 0.0,
            width: 0.0,
            defensive_line_height: 0.0,
            offensive_aggression: 0.0,
            build_up_play: 0.0,
            transition_speed: 0.0,
            creativity: 0.0,
        };
        for slider in Slider::ALL {
            profile.set(slider, value);
        }
        profile
    }

    /// Build from explicit slider values in [`Slider::ALL`] order.
    pub fn from_values(formation: Formation, values: [f32; 8]) -> Self {
        let mut profile = Self::uniform(formation, 50.0);
        for (slider, value) in Slider::ALL.into_iter().zip(values) {
            profile.set(slider, value);
        }
        profile
    }

    pub fn for_style(style: TacticalPreset) -> Self {
        // pressing, tempo, width, line, aggression, build-up, transition, creativity
        match style {
            TacticalPreset::Balanced => {
                Self::from_values(Formation::F442, [50.0, 50.0, 50.0, 50.0, 50.0, 50.0, 50.0, 50.0])
            }
            TacticalPreset::HighPressing => {
                Self::from_values(Formation::F433, [90.0, 80.0, 65.0, 85.0, 70.0, 55.0, 75.0, 55.0])
            }
            TacticalPreset::Counterattack => {
                Self::from_values(Formation::F451, [30.0, 70.0, 50.0, 25.0, 55.0, 30.0, 90.0, 45.0])
            }
            TacticalPreset::Possession => {
                Self::from_values(Formation::F4231, [60.0, 35.0, 60.0, 70.0, 45.0, 85.0, 40.0, 75.0])
            }
            TacticalPreset::Defensive => {
                Self::from_values(Formation::F532, [25.0, 30.0, 35.0, 15.0, 25.0, 40.0, 55.0, 30.0])
            }
        }
    }

    pub fn get(&self, slider: Slider) -> f32 {
        match slider {
            Slider::Pressing => self.pressing,
            Slider::Tempo => self.tempo,
            Slider::Width => self.width,
            Slider::DefensiveLineHeight => self.defensive_line_height,
            Slider::OffensiveAggression => self.offensive_aggression,
            Slider::BuildUpPlay => self.build_up_play,
            Slider::TransitionSpeed => self.transition_speed,
            Slider::Creativity => self.creativity,
        }
    }

    /// Set a slider, clamped to `[0, 100]`. NaN is treated as 0.
    pub fn set(&mut self, slider: Slider, value: f32) {
        let value = if value.is_nan() { Self::MIN } else { value.clamp(Self::MIN, Self::MAX) };
        let field = match slider {
            Slider::Pressing => &mut self.pressing,
            Slider::Tempo => &mut self.tempo,
            Slider::Width => &mut self.width,
            Slider::DefensiveLineHeight => &mut self.defensive_line_height,
            Slider::OffensiveAggression => &mut self.offensive_aggression,
            Slider::BuildUpPlay => &mut self.build_up_play,
            Slider::TransitionSpeed => &mut self.transition_speed,
            Slider::Creativity => &mut self.creativity,
        };
        *field = value;
    }

    pub fn adjust(&mut self, slider: Slider, delta: f32) {
        self.set(slider, self.get(slider) + delta);
    }

    /// Multiplier in `[0.5, 1.5]`, neutral (1.0) at 50.
    pub fn factor(&self, slider: Slider) -> f32 {
        0.5 + self.get(slider) / 100.0
    }

    /// Slider as a `[0, 1]` fraction.
    pub fn ratio(&self, slider: Slider) -> f32 {
        self.get(slider) / 100.0
    }

    pub fn pressing(&self) -> f32 {
        self.pressing
    }

    pub fn tempo(&self) -> f32 {
        self.tempo
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn defensive_line_height(&self) -> f32 {
        self.defensive_line_height
    }

    pub fn offensive_aggression(&self) -> f32 {
        self.offensive_aggression
    }

    pub fn build_up_play(&self) -> f32 {
        self.build_up_play
    }

    pub fn transition_speed(&self) -> f32 {
        self.transition_speed
    }

    pub fn creativity(&self) -> f32 {
        self.creativity
    }

    pub fn all_in_bounds(&self) -> bool {
        Slider::ALL.iter().all(|s| (Self::MIN..=Self::MAX).contains(&self.get(*s)))
    }
}

/// Named starting points for a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TacticalPreset {
    /// High defensive line, intense pressing, fast tempo
    HighPressing,
    /// Deep line, direct play, counter-attacks
    Counterattack,
    /// High line, slow tempo, short passing
    Possession,
    /// Balanced approach
    Balanced,
    /// Very deep, low pressing
    Defensive,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_is_neutral() {
        let p = TacticalProfile::default();
        for s in Slider::ALL {
            assert_eq!(p.get(s), 50.0);
            assert_eq!(p.factor(s), 1.0);
        }
    }

    #[test]
    fn test_set_clamps() {
        let mut p = TacticalProfile::default();
        p.set(Slider::Pressing, 140.0);
        assert_eq!(p.pressing(), 100.0);
        p.adjust(Slider::Tempo, -80.0);
        assert_eq!(p.tempo(), 0.0);
        p.set(Slider::Width, f32::NAN);
        assert_eq!(p.width(), 0.0);
    }

    #[test]
    fn test_deserialize_clamps_sliders() {
        let mut value = serde_json::to_value(TacticalProfile::default()).unwrap();
        value["pressing"] = serde_json::json!(150.0);
        value["tempo"] = serde_json::json!(-20.0);
        let p: TacticalProfile = serde_json::from_value(value).unwrap();
        assert_eq!(p.pressing(), 100.0);
        assert_eq!(p.tempo(), 0.0);
        assert_eq!(p.width(), 50.0);
        assert!(p.all_in_bounds());
    }

    #[test]
    fn test_presets_differ() {
        let press = TacticalProfile::for_style(TacticalPreset::HighPressing);
        let bus = TacticalProfile::for_style(TacticalPreset::Defensive);
        assert!(press.pressing() > bus.pressing());
        assert!(press.defensive_line_height() > bus.defensive_line_height());
        assert_eq!(bus.formation, Formation::F532);
    }

    proptest! {
        #[test]
        fn prop_adjust_stays_in_bounds(
            start in 0.0f32..=100.0,
            deltas in prop::collection::vec(-200.0f32..200.0, 1..20),
        ) {
            let mut p = TacticalProfile::uniform(Formation::F442, start);
            for (i, d) in deltas.iter().enumerate() {
                p.adjust(Slider::ALL[i % 8], *d);
                prop_assert!(p.all_in_bounds());
            }
        }
    }
}
