//! Physics & Possession phase
//!
//! Runs first in every tick:
//! 1. integrate the loose ball (friction, spin curl, gravity bias, bounces)
//! 2. give possession to the nearest player inside the capture radius
//! 3. auto-possession: carry the ball toward goal with a little lateral jitter
//! 4. off-ball movement: one presser per defending side, everyone else drifts
//!    back toward their formation anchor
//! 5. stamina drain and possession/pressure bookkeeping

use rand::Rng;

use crate::config::SimConfig;
use crate::engine::actions::{clamp_probability, goalward};
use crate::engine::vector::Vector2;
use crate::models::{Ball, MatchState, PlayerId, Stat, TeamSide};
use crate::tactics::Slider;

/// What the physics phase hands to the action phase.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhysicsReport {
    pub possession_changed: bool,
    /// The auto-possession roll asked for a pass this tick
    pub wants_pass: bool,
    pub pressers: Vec<PlayerId>,
}

pub fn step(state: &mut MatchState, cfg: &SimConfig, rng: &mut impl Rng) -> PhysicsReport {
    if state.possession_player.is_none() {
        integrate_ball(&mut state.ball, cfg);
    }
    let possession_changed = assign_possession(state, cfg);
    let wants_pass = auto_possession(state, cfg, rng);
    let pressers = move_off_ball(state, cfg);
    drain_stamina(state, cfg, &pressers);
    track_territory(state, cfg);
    PhysicsReport { possession_changed, wants_pass, pressers }
}

/// Advance a loose ball by one tick.
pub fn integrate_ball(ball: &mut Ball, cfg: &SimConfig) {
    let p = &cfg.physics;
    let field = cfg.field;

    ball.velocity = ball.velocity * p.friction;

    if let Some(spin) = ball.spin {
        let speed = ball.speed();
        if speed > 0.0 {
            ball.velocity += ball.velocity.perpendicular().normalized() * (spin * speed * 0.01);
        }
        let decayed = spin * p.spin_decay;
        ball.spin = if decayed.abs() < 0.01 { None } else { Some(decayed) };
    }

    if ball.speed() < cfg.scaled(p.stop_speed) {
        ball.velocity = Vector2::ZERO;
        ball.spin = None;
        return;
    }
    ball.velocity.y += cfg.scaled(p.gravity_bias);

    let mut next = ball.position + ball.velocity;
    if next.x < 0.0 || next.x > field.length {
        ball.velocity.x = -ball.velocity.x * p.restitution;
        next.x = next.x.clamp(0.0, field.length);
    }
    if next.y < 0.0 || next.y > field.width {
        ball.velocity.y = -ball.velocity.y * p.restitution;
        next.y = next.y.clamp(0.0, field.width);
    }
    ball.position = field.clamp(next);
}

/// Nearest on-pitch player within the capture radius takes the ball; ties go
/// to the first found (Home before Away, roster order). Nobody in range means
/// nobody has it.
///
/// Returns whether the holder changed.
pub fn assign_possession(state: &mut MatchState, cfg: &SimConfig) -> bool {
    let radius = cfg.scaled(cfg.physics.capture_radius);
    let ball = state.ball.position;

    let mut best: Option<(f32, TeamSide, PlayerId)> = None;
    for p in state.on_pitch() {
        let d = p.position.distance(ball);
        if d <= radius && best.map_or(true, |(bd, _, _)| d < bd) {
            best = Some((d, p.team, p.id));
        }
    }

    let previous = state.possession_player;
    let new_team = best.map(|(_, side, _)| side);
    if new_team != state.possession_team {
        state.last_pass = None;
    }
    state.possession_team = new_team;
    state.possession_player = best.map(|(_, _, id)| id);

    let changed = previous != state.possession_player;
    if changed {
        log::trace!("possession {:?} -> {:?}", previous, state.possession_player);
    }
    changed
}

/// Move the holder and ball toward the attacked goal. Human-controlled holders
/// keep the ball at their feet and are not steered.
pub fn auto_possession(state: &mut MatchState, cfg: &SimConfig, rng: &mut impl Rng) -> bool {
    let Some(id) = state.possession_player else {
        return false;
    };
    let Some(holder) = state.player(id) else {
        return false;
    };
    let field = cfg.field;
    let side = holder.team;

    if state.controlled_player == Some(id) {
        let at = holder.position;
        state.ball.place(at);
        return false;
    }

    let tactics = &state.team(side).tactics;
    let pace = holder.effective(Stat::Pace, &cfg.stamina);
    let tempo = tactics.factor(Slider::Tempo);
    let pass_chance = clamp_probability(cfg.physics.auto_pass_chance * tempo);

    let dir = goalward(&field, state.ball.position, side);
    let forward = cfg.scaled(cfg.physics.carry_speed) * (0.4 + 0.6 * pace / 99.0) * tempo;
    let lateral = cfg.scaled(rng.gen_range(cfg.physics.lateral_speed_min..=cfg.physics.lateral_speed_max))
        * if rng.gen_bool(0.5) { 1.0 } else { -1.0 };

    let velocity = dir * forward + dir.perpendicular() * lateral;
    let next = field.clamp(state.ball.position + velocity);
    state.ball.velocity = velocity;
    state.ball.position = next;
    if let Some(p) = state.player_mut(id) {
        p.position = next;
    }

    rng.gen::<f32>() < pass_chance
}

/// Off-ball movement. Returns the players who pressed this tick.
pub fn move_off_ball(state: &mut MatchState, cfg: &SimConfig) -> Vec<PlayerId> {
    let field = cfg.field;
    let ball = state.ball.position;
    let holder = state.possession_player;
    let holder_side = state.possession_team;

    let pressing_sides: Vec<TeamSide> = match holder_side {
        Some(side) => vec![side.opponent()],
        None => TeamSide::BOTH.to_vec(),
    };
    let pressers: Vec<PlayerId> = pressing_sides
        .iter()
        .filter_map(|&side| {
            state
                .team(side)
                .players
                .iter()
                .filter(|p| Some(p.id) != holder && state.controlled_player != Some(p.id))
                .min_by(|a, b| a.position.distance(ball).total_cmp(&b.position.distance(ball)))
                .map(|p| p.id)
        })
        .collect();

    let stand_off = if holder.is_some() { cfg.scaled(cfg.physics.press_stand_off) } else { 0.0 };
    let press_speed = cfg.scaled(cfg.physics.press_speed);
    let recovery_speed = cfg.scaled(cfg.physics.recovery_speed);

    for side in TeamSide::BOTH {
        let in_possession = holder_side == Some(side);
        let team = state.team_mut(side);
        let pressing = team.tactics.factor(Slider::Pressing);
        let push_up = if in_possession {
            side.attack_direction() * field.length * 0.1 * team.tactics.ratio(Slider::TransitionSpeed)
        } else {
            0.0
        };

        for player in team.players.iter_mut() {
            if Some(player.id) == holder {
                continue;
            }
            let pace = player.effective(Stat::Pace, &cfg.stamina);
            let pace_factor = 0.4 + 0.6 * pace / 99.0;

            let next = if pressers.contains(&player.id) {
                let away = player.position - ball;
                if away.length() <= stand_off {
                    player.position
                } else {
                    let target = ball + away.normalized() * stand_off;
                    player.position.step_toward(target, press_speed * pace_factor * pressing)
                }
            } else {
                let target = field.clamp(Vector2::new(player.anchor.x + push_up, player.anchor.y));
                player.position.step_toward(target, recovery_speed * pace_factor)
            };
            player.position = field.clamp(next);
        }
    }
    pressers
}

/// Every on-pitch player drains each tick; the holder and pressers work harder.
/// Team intensity follows the pressing and tempo sliders.
pub fn drain_stamina(state: &mut MatchState, cfg: &SimConfig, pressers: &[PlayerId]) {
    let holder = state.possession_player;
    let s = &cfg.stamina;
    for side in TeamSide::BOTH {
        let team = state.team_mut(side);
        let intensity =
            (team.tactics.factor(Slider::Pressing) + team.tactics.factor(Slider::Tempo)) / 2.0;
        for player in team.players.iter_mut() {
            let effort = if Some(player.id) == holder || pressers.contains(&player.id) {
                s.effort_multiplier
            } else {
                1.0
            };
            player.stats.drain(s.base_drain * intensity * effort);
        }
    }
}

/// Possession ticks for the holder's team, pressure ticks for the side whose
/// defensive third the ball is in.
pub fn track_territory(state: &mut MatchState, cfg: &SimConfig) {
    let Some(side) = state.possession_team else {
        return;
    };
    let ball = state.ball.position;
    state.team_mut(side).stats.possession_ticks += 1;
    let defending = side.opponent();
    if cfg.field.in_defensive_third(ball, defending) {
        state.team_mut(defending).stats.pressure_ticks += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{sample_team, small_team};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn new_state(cfg: &SimConfig) -> MatchState {
        MatchState::kickoff(sample_team("Home", 1), sample_team("Away", 100), None, None, cfg).unwrap()
    }

    #[test]
    fn test_loose_ball_slows_and_stays_inside() {
        let cfg = SimConfig::default();
        let mut ball = Ball::at(Vector2::new(1000.0, 340.0));
        ball.velocity = Vector2::new(60.0, 0.0);
        integrate_ball(&mut ball, &cfg);
        assert!(ball.velocity.x < 0.0, "bounced off the end line");
        assert!(cfg.field.contains(ball.position));

        let mut slow = Ball::at(cfg.field.center());
        slow.velocity = Vector2::new(0.1, 0.0);
        integrate_ball(&mut slow, &cfg);
        assert_eq!(slow.velocity, Vector2::ZERO);
        assert_eq!(slow.position, cfg.field.center());
    }

    #[test]
    fn test_spin_curls_and_decays() {
        let cfg = SimConfig::default();
        let mut ball = Ball::at(cfg.field.center());
        ball.velocity = Vector2::new(20.0, 0.0);
        ball.spin = Some(0.5);
        integrate_ball(&mut ball, &cfg);
        assert!(ball.velocity.y.abs() > 0.0);
        assert!(ball.spin.unwrap() < 0.5);
    }

    #[test]
    fn test_nobody_in_range_clears_possession() {
        let cfg = SimConfig::default();
        let mut state = new_state(&cfg);
        state.ball.place(Vector2::new(525.0, 5.0));
        for p in state.home.players.iter_mut().chain(state.away.players.iter_mut()) {
            p.position = Vector2::new(100.0, 600.0);
        }
        assert!(assign_possession(&mut state, &cfg));
        assert_eq!(state.possession_player, None);
        assert_eq!(state.possession_team, None);
    }

    #[test]
    fn test_nearest_player_takes_the_ball() {
        let cfg = SimConfig::default();
        let mut state = new_state(&cfg);
        let near = state.away.players[9].id;
        for p in state.home.players.iter_mut().chain(state.away.players.iter_mut()) {
            p.position = Vector2::new(100.0, 600.0);
        }
        state.ball.place(Vector2::new(500.0, 300.0));
        state.player_mut(near).unwrap().position = Vector2::new(520.0, 300.0);
        assign_possession(&mut state, &cfg);
        assert_eq!(state.possession_player, Some(near));
        assert_eq!(state.possession_team, Some(TeamSide::Away));
    }

    #[test]
    fn test_auto_possession_moves_toward_goal() {
        let cfg = SimConfig::default();
        let mut state = new_state(&cfg);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let before = state.ball.position.x;
        auto_possession(&mut state, &cfg, &mut rng);
        assert!(state.ball.position.x > before);
        assert_eq!(state.possessor().unwrap().position, state.ball.position);
    }

    #[test]
    fn test_controlled_holder_is_not_steered() {
        let cfg = SimConfig::default();
        let mut state = new_state(&cfg);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        state.controlled_player = state.possession_player;
        let before = state.ball.position;
        assert!(!auto_possession(&mut state, &cfg, &mut rng));
        assert_eq!(state.ball.position, before);
    }

    #[test]
    fn test_presser_stops_short_of_holder() {
        let cfg = SimConfig::default();
        let mut state = new_state(&cfg);
        for _ in 0..200 {
            move_off_ball(&mut state, &cfg);
        }
        let ball = state.ball.position;
        let closest = state
            .away
            .players
            .iter()
            .map(|p| p.position.distance(ball))
            .fold(f32::MAX, f32::min);
        assert!(closest >= cfg.scaled(cfg.physics.press_stand_off) - 1e-3);
    }

    #[test]
    fn test_stamina_drains_more_for_holder() {
        let cfg = SimConfig::default();
        let mut state = new_state(&cfg);
        let holder = state.possession_player.unwrap();
        let idle = state.home.players.iter().find(|p| p.id != holder).unwrap().id;
        drain_stamina(&mut state, &cfg, &[]);
        let h = state.player(holder).unwrap().stats.stamina();
        let i = state.player(idle).unwrap().stats.stamina();
        assert!(h < i);
        assert!(i < 100.0);
    }

    #[test]
    fn test_pressure_counts_defending_side() {
        let cfg = SimConfig::default();
        let mut state = MatchState::kickoff(small_team("H", 1, 3), small_team("A", 10, 3), None, None, &cfg)
            .unwrap();
        state.ball.place(Vector2::new(1000.0, 340.0));
        track_territory(&mut state, &cfg);
        assert_eq!(state.home.stats.possession_ticks, 1);
        assert_eq!(state.away.stats.pressure_ticks, 1);
        assert_eq!(state.home.stats.pressure_ticks, 0);
    }
}
