use serde::{Deserialize, Serialize};

use super::TacticalProfile;
use crate::engine::vector::{FieldDims, Vector2};
use crate::models::{Role, TeamSide};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Formation {
    #[serde(rename = "4-4-2")]
    F442,
    #[serde(rename = "4-3-3")]
    F433,
    #[serde(rename = "4-5-1")]
    F451,
    #[serde(rename = "3-5-2")]
    F352,
    #[serde(rename = "4-2-3-1")]
    F4231,
    #[serde(rename = "5-3-2")]
    F532,
    #[serde(rename = "3-4-3")]
    F343,
}

impl Formation {
    /// Outfield lines from back to front.
    pub fn lines(&self) -> &'static [u8] {
        match self {
            Formation::F442 => &[4, 4, 2],
            Formation::F433 => &[4, 3, 3],
            Formation::F451 => &[4, 5, 1],
            Formation::F352 => &[3, 5, 2],
            Formation::F4231 => &[4, 2, 3, 1],
            Formation::F532 => &[5, 3, 2],
            Formation::F343 => &[3, 4, 3],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Formation::F442 => "4-4-2",
            Formation::F433 => "4-3-3",
            Formation::F451 => "4-5-1",
            Formation::F352 => "3-5-2",
            Formation::F4231 => "4-2-3-1",
            Formation::F532 => "5-3-2",
            Formation::F343 => "3-4-3",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        [
            Formation::F442,
            Formation::F433,
            Formation::F451,
            Formation::F352,
            Formation::F4231,
            Formation::F532,
            Formation::F343,
        ]
        .into_iter()
        .find(|f| f.name() == name || f.name().replace('-', "") == name)
    }

    /// (line index, index within line, line size) for a slot. Slot 0 is the keeper.
    fn slot_layout(&self, slot: u8) -> Option<(usize, u8, u8)> {
        if slot == 0 {
            return None;
        }
        let mut remaining = slot - 1;
        for (line_idx, &count) in self.lines().iter().enumerate() {
            if remaining < count {
                return Some((line_idx, remaining, count));
            }
            remaining -= count;
        }
        // Extra players beyond eleven stack on the front line.
        let last = self.lines().len() - 1;
        Some((last, 0, 1))
    }

    /// Natural role of a slot, used when building squads.
    pub fn role_for_slot(&self, slot: u8) -> Role {
        let Some((line, idx, count)) = self.slot_layout(slot) else {
            return Role::GK;
        };
        let lines = self.lines().len();
        if line == 0 {
            if count >= 4 && (idx == 0 || idx == count - 1) {
                Role::FB
            } else {
                Role::CB
            }
        } else if line == lines - 1 {
            if count == 3 && idx != 1 {
                Role::WG
            } else {
                Role::ST
            }
        } else if lines == 4 && line == 1 {
            Role::DM
        } else if lines == 4 && line == 2 {
            Role::AM
        } else {
            Role::CM
        }
    }

    /// Kickoff-shape position of a slot for `side`.
    ///
    /// `defensive_line_height` pushes the whole block up or down by up to 5% of
    /// the field; `width` sets the lateral spread.
    pub fn anchor(&self, slot: u8, side: TeamSide, field: &FieldDims, tactics: &TacticalProfile) -> Vector2 {
        let line_shift = (tactics.defensive_line_height() - 50.0) / 50.0 * 0.05;
        let spread = 0.55 + 0.35 * tactics.width() / 100.0;

        let (depth, y_frac) = match self.slot_layout(slot) {
            None => (0.04, 0.5),
            Some((line, idx, count)) => {
                let lines = self.lines().len();
                let depth = if lines > 1 {
                    0.18 + 0.28 * line as f32 / (lines - 1) as f32
                } else {
                    0.3
                };
                let y = if count > 1 {
                    let t = idx as f32 / (count - 1) as f32;
                    0.5 + (t - 0.5) * spread
                } else {
                    0.5
                };
                (depth + line_shift, y)
            }
        };

        let home_x = (depth * field.length).clamp(0.0, field.length / 2.0);
        Vector2::new(field.oriented_x(home_x, side), y_frac * field.width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_formation_has_ten_outfielders() {
        for f in [
            Formation::F442,
            Formation::F433,
            Formation::F451,
            Formation::F352,
            Formation::F4231,
            Formation::F532,
            Formation::F343,
        ] {
            let outfield: u8 = f.lines().iter().sum();
            assert_eq!(outfield, 10, "{}", f.name());
        }
    }

    #[test]
    fn test_roles() {
        let f = Formation::F442;
        assert_eq!(f.role_for_slot(0), Role::GK);
        assert_eq!(f.role_for_slot(1), Role::FB);
        assert_eq!(f.role_for_slot(2), Role::CB);
        assert_eq!(f.role_for_slot(10), Role::ST);
        assert_eq!(Formation::F4231.role_for_slot(5), Role::DM);
        assert_eq!(Formation::F433.role_for_slot(8), Role::WG);
    }

    #[test]
    fn test_anchors_stay_in_own_half_and_mirror() {
        let field = FieldDims::legacy();
        let tactics = TacticalProfile::default();
        for slot in 0..11 {
            let home = Formation::F433.anchor(slot, TeamSide::Home, &field, &tactics);
            let away = Formation::F433.anchor(slot, TeamSide::Away, &field, &tactics);
            assert!(home.x <= field.length / 2.0);
            assert!(away.x >= field.length / 2.0);
            assert!((home.x + away.x - field.length).abs() < 1e-3);
            assert!(field.contains(home));
        }
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Formation::from_name("4-2-3-1"), Some(Formation::F4231));
        assert_eq!(Formation::from_name("352"), Some(Formation::F352));
        assert_eq!(Formation::from_name("2-3-5"), None);
    }
}
