use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Player, PlayerId};
use crate::tactics::TacticalProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamSide {
    Home,
    Away,
}

impl TeamSide {
    pub const BOTH: [TeamSide; 2] = [TeamSide::Home, TeamSide::Away];

    pub fn opponent(&self) -> TeamSide {
        match self {
            TeamSide::Home => TeamSide::Away,
            TeamSide::Away => TeamSide::Home,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            TeamSide::Home => 0,
            TeamSide::Away => 1,
        }
    }

    /// +1 when attacking toward increasing x.
    pub fn attack_direction(&self) -> f32 {
        match self {
            TeamSide::Home => 1.0,
            TeamSide::Away => -1.0,
        }
    }
}

impl fmt::Display for TeamSide {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TeamSide::Home => write!(f, "home"),
            TeamSide::Away => write!(f, "away"),
        }
    }
}

/// Running counters per team. Possession/pressure are tick counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamStats {
    pub shots: u16,
    pub shots_on_target: u16,
    pub passes: u16,
    pub passes_completed: u16,
    pub tackles: u16,
    pub tackles_won: u16,
    pub fouls: u16,
    pub yellow_cards: u8,
    pub red_cards: u8,
    pub possession_ticks: u32,
    pub pressure_ticks: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub side: TeamSide,
    /// On-pitch roster. Sent-off players move to `sent_off` and are not replaced.
    pub players: Vec<Player>,
    pub sent_off: Vec<Player>,
    pub score: u8,
    pub tactics: TacticalProfile,
    pub stats: TeamStats,
}

impl Team {
    pub const MAX_PLAYERS: usize = 11;

    pub fn new(name: impl Into<String>, players: Vec<Player>) -> Self {
        Self {
            name: name.into(),
            side: TeamSide::Home,
            players,
            sent_off: Vec::new(),
            score: 0,
            tactics: TacticalProfile::default(),
            stats: TeamStats::default(),
        }
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn is_on_pitch(&self, id: PlayerId) -> bool {
        self.players.iter().any(|p| p.id == id)
    }

    /// Move a player from the pitch to the sent-off list.
    pub fn send_off(&mut self, id: PlayerId) -> Option<&Player> {
        let idx = self.players.iter().position(|p| p.id == id)?;
        let player = self.players.remove(idx);
        self.sent_off.push(player);
        self.sent_off.last()
    }

    /// Every player who took part, on pitch or sent off.
    pub fn all_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().chain(self.sent_off.iter())
    }

    pub fn average_stamina(&self) -> f32 {
        if self.players.is_empty() {
            return 0.0;
        }
        self.players.iter().map(|p| p.stats.stamina()).sum::<f32>() / self.players.len() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PlayerStats, Role};

    fn team() -> Team {
        Team::new(
            "Test FC",
            vec![
                Player::new(1, "GK", Role::GK, PlayerStats::uniform(60)),
                Player::new(2, "ST", Role::ST, PlayerStats::uniform(70)),
            ],
        )
    }

    #[test]
    fn test_side_helpers() {
        assert_eq!(TeamSide::Home.opponent(), TeamSide::Away);
        assert_eq!(TeamSide::Away.index(), 1);
        assert_eq!(TeamSide::Away.attack_direction(), -1.0);
    }

    #[test]
    fn test_send_off_keeps_history() {
        let mut t = team();
        assert!(t.send_off(PlayerId(2)).is_some());
        assert!(!t.is_on_pitch(PlayerId(2)));
        assert_eq!(t.players.len(), 1);
        assert_eq!(t.all_players().count(), 2);
        assert!(t.send_off(PlayerId(2)).is_none());
    }
}
