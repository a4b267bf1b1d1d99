use serde::{Deserialize, Serialize};
use std::fmt;

use super::TeamSide;
use crate::config::StaminaConfig;
use crate::engine::vector::Vector2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    GK,
    CB,
    FB,
    DM,
    CM,
    AM,
    WG,
    ST,
}

impl Role {
    pub fn is_goalkeeper(&self) -> bool {
        matches!(self, Role::GK)
    }
}

/// Stat selector for [`Player::effective`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stat {
    Pace,
    Shooting,
    Passing,
    Dribbling,
    Defense,
}

/// Base stats (1-99) plus the live stamina value (0-100).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub pace: u8,
    pub shooting: u8,
    pub passing: u8,
    pub dribbling: u8,
    pub defense: u8,
    stamina: f32,
}

impl PlayerStats {
    pub const MAX_STAMINA: f32 = 100.0;

    pub fn new(pace: u8, shooting: u8, passing: u8, dribbling: u8, defense: u8) -> Self {
        let clamp = |v: u8| v.clamp(1, 99);
        Self {
            pace: clamp(pace),
            shooting: clamp(shooting),
            passing: clamp(passing),
            dribbling: clamp(dribbling),
            defense: clamp(defense),
            stamina: Self::MAX_STAMINA,
        }
    }

    /// Same value for every stat.
    pub fn uniform(value: u8) -> Self {
        Self::new(value, value, value, value, value)
    }

    pub fn with_stamina(mut self, stamina: f32) -> Self {
        self.stamina = if stamina.is_finite() { stamina.clamp(0.0, Self::MAX_STAMINA) } else { 0.0 };
        self
    }

    pub fn stamina(&self) -> f32 {
        self.stamina
    }

    /// Stamina only goes down during play. Negative or non-finite amounts are ignored.
    pub fn drain(&mut self, amount: f32) {
        if amount.is_finite() && amount > 0.0 {
            self.stamina = (self.stamina - amount).max(0.0);
        }
    }

    pub fn base(&self, stat: Stat) -> u8 {
        match stat {
            Stat::Pace => self.pace,
            Stat::Shooting => self.shooting,
            Stat::Passing => self.passing,
            Stat::Dribbling => self.dribbling,
            Stat::Defense => self.defense,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardType {
    Yellow,
    Red,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub card_type: CardType,
    pub minute: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub position: Vector2,
    /// Formation slot index (0 = goalkeeper line)
    pub slot: u8,
    /// Formation position the player drifts back to off the ball
    pub anchor: Vector2,
    pub team: TeamSide,
    pub role: Role,
    pub stats: PlayerStats,
    pub cards: Vec<Card>,
    /// Recent form (0-100, 50 = neutral)
    pub form: f32,
}

impl Player {
    pub fn new(id: u32, name: impl Into<String>, role: Role, stats: PlayerStats) -> Self {
        Self {
            id: PlayerId(id),
            name: name.into(),
            position: Vector2::ZERO,
            slot: 0,
            anchor: Vector2::ZERO,
            team: TeamSide::Home,
            role,
            stats,
            cards: Vec::new(),
            form: 50.0,
        }
    }

    /// Stat as seen by the action models: base value, degraded when tired.
    /// The stored base stat is never touched.
    pub fn effective(&self, stat: Stat, cfg: &StaminaConfig) -> f32 {
        let base = self.stats.base(stat) as f32;
        if self.stats.stamina() < cfg.fatigue_threshold {
            base * cfg.degraded_multiplier
        } else {
            base
        }
    }

    pub fn yellow_count(&self) -> usize {
        self.cards.iter().filter(|c| c.card_type == CardType::Yellow).count()
    }

    pub fn has_red(&self) -> bool {
        self.cards.iter().any(|c| c.card_type == CardType::Red)
    }

    pub fn adjust_form(&mut self, delta: f32) {
        self.form = (self.form + delta).clamp(0.0, 100.0);
    }
}
