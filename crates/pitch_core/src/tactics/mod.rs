//! Tactics: sliders, formations and AI profile templates.

pub mod ai_profile;
pub mod formation;
pub mod profile;

pub use ai_profile::{AIDifficulty, AIProfile, Personality, PRESET_NAMES};
pub use formation::Formation;
pub use profile::{Slider, TacticalPreset, TacticalProfile};
