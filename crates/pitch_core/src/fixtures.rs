//! Squad fixtures
//!
//! Ready-made rosters for tests, demos and the CLI runner.

use crate::models::{Player, PlayerStats, Role, Team};
use crate::tactics::Formation;

/// Eleven players in 4-4-2 order with ids `first_id..first_id + 11`.
///
/// Stats are role-flavoured around a 70 overall.
pub fn sample_team(name: &str, first_id: u32) -> Team {
    sample_team_with_overall(name, first_id, 70)
}

pub fn sample_team_with_overall(name: &str, first_id: u32, overall: u8) -> Team {
    let formation = Formation::F442;
    let players = (0..11u8)
        .map(|slot| {
            let role = formation.role_for_slot(slot);
            Player::new(
                first_id + slot as u32,
                format!("{} Player {}", name, slot + 1),
                role,
                stats_for_role(role, overall),
            )
        })
        .collect();
    Team::new(name, players)
}

/// Short-handed roster (keeper first, then strikers).
pub fn small_team(name: &str, first_id: u32, size: usize) -> Team {
    let players = (0..size)
        .map(|i| {
            let role = if i == 0 { Role::GK } else { Role::ST };
            Player::new(first_id + i as u32, format!("{} {}", name, i + 1), role, stats_for_role(role, 70))
        })
        .collect();
    Team::new(name, players)
}

/// Base stats biased by role: (pace, shooting, passing, dribbling, defense).
pub fn stats_for_role(role: Role, overall: u8) -> PlayerStats {
    let o = overall as i16;
    let bias: [i16; 5] = match role {
        Role::GK => [-20, -30, -5, -25, 10],
        Role::CB => [-5, -20, -5, -15, 15],
        Role::FB => [5, -15, 0, 0, 8],
        Role::DM => [-5, -10, 5, -5, 10],
        Role::CM => [0, -5, 10, 5, 0],
        Role::AM => [0, 5, 10, 10, -15],
        Role::WG => [12, 3, 0, 10, -20],
        Role::ST => [5, 15, -5, 5, -25],
    };
    let v = |i: usize| (o + bias[i]).clamp(1, 99) as u8;
    PlayerStats::new(v(0), v(1), v(2), v(3), v(4))
}
