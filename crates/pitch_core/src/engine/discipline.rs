//! Discipline: fouls, cards and send-offs.
//!
//! Per-player state machine:
//!
//! ```text
//! Clean --yellow--> OneYellow --yellow--> SentOff
//!   |                   |
//!   +------red----------+------red------> SentOff
//! ```
//!
//! `SentOff` is terminal. A sent-off player leaves the pitch list, loses
//! possession and human control, and is never eligible for anything again.

use rand::Rng;

use crate::config::{CardRollOrder, DisciplineConfig, SimConfig};
use crate::models::{Card, CardType, EventKind, MatchState, Player, PlayerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisciplineState {
    Clean,
    OneYellow,
    SentOff,
}

impl DisciplineState {
    pub fn of(player: &Player) -> Self {
        if player.has_red() || player.yellow_count() >= 2 {
            DisciplineState::SentOff
        } else if player.yellow_count() == 1 {
            DisciplineState::OneYellow
        } else {
            DisciplineState::Clean
        }
    }

    pub fn after(self, card: CardType) -> Self {
        match (self, card) {
            (DisciplineState::SentOff, _) => DisciplineState::SentOff,
            (_, CardType::Red) => DisciplineState::SentOff,
            (DisciplineState::Clean, CardType::Yellow) => DisciplineState::OneYellow,
            (DisciplineState::OneYellow, CardType::Yellow) => DisciplineState::SentOff,
        }
    }
}

/// Card decision for one foul. Always consumes two draws (red roll, then
/// card roll) so both orders see the same random stream.
pub fn roll_card(cfg: &DisciplineConfig, rng: &mut impl Rng) -> Option<CardType> {
    let red_roll = rng.gen::<f32>();
    let card_roll = rng.gen::<f32>();
    let red = red_roll < cfg.red_chance;
    let yellow = card_roll < cfg.card_chance;
    match cfg.roll_order {
        CardRollOrder::Independent => {
            if red {
                Some(CardType::Red)
            } else if yellow {
                Some(CardType::Yellow)
            } else {
                None
            }
        }
        CardRollOrder::YellowFirst => {
            if yellow {
                Some(CardType::Yellow)
            } else if red {
                Some(CardType::Red)
            } else {
                None
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoulReport {
    pub offender: PlayerId,
    pub victim: PlayerId,
    pub card: Option<CardType>,
    pub state: DisciplineState,
}

/// Foul with a random card roll.
pub fn commit_foul(
    state: &mut MatchState,
    cfg: &SimConfig,
    offender: PlayerId,
    victim: PlayerId,
    rng: &mut impl Rng,
) -> Option<FoulReport> {
    state.player(offender)?;
    let card = roll_card(&cfg.discipline, rng);
    record_foul(state, offender, victim, card)
}

/// Foul with a fixed card decision. Returns `None` if the offender is not
/// on the pitch.
pub fn record_foul(
    state: &mut MatchState,
    offender: PlayerId,
    victim: PlayerId,
    card: Option<CardType>,
) -> Option<FoulReport> {
    let player = state.player(offender)?;
    let side = player.team;
    let description = format!("Foul by {}", player.name);

    let stats = &mut state.team_mut(side).stats;
    stats.fouls = stats.fouls.saturating_add(1);
    state.record(EventKind::Foul { victim }, Some(side), Some(offender), description);

    let discipline = match card {
        Some(card) => issue_card(state, offender, card)?,
        None => DisciplineState::of(state.player(offender)?),
    };
    Some(FoulReport { offender, victim, card, state: discipline })
}

/// Book `id` and apply the state transition. Returns the resulting state,
/// or `None` if the player is not on the pitch.
pub fn issue_card(state: &mut MatchState, id: PlayerId, card: CardType) -> Option<DisciplineState> {
    let minute = state.clock;
    let player = state.player_mut(id)?;
    let side = player.team;
    let name = player.name.clone();
    let prior = DisciplineState::of(player);
    let next = prior.after(card);
    player.cards.push(Card { card_type: card, minute });
    player.adjust_form(-5.0);

    let stats = &mut state.team_mut(side).stats;
    if card == CardType::Yellow {
        stats.yellow_cards = stats.yellow_cards.saturating_add(1);
    }

    if next != DisciplineState::SentOff {
        state.record(EventKind::YellowCard, Some(side), Some(id), format!("Yellow card for {}", name));
        return Some(next);
    }

    let second_yellow = card == CardType::Yellow;
    let stats = &mut state.team_mut(side).stats;
    stats.red_cards = stats.red_cards.saturating_add(1);
    let description = if second_yellow {
        format!("Second yellow, {} is sent off", name)
    } else {
        format!("Red card for {}", name)
    };
    state.record(EventKind::RedCard { second_yellow }, Some(side), Some(id), description);

    state.team_mut(side).send_off(id);
    if state.possession_player == Some(id) {
        state.possession_player = None;
        state.possession_team = None;
    }
    if state.controlled_player == Some(id) {
        state.controlled_player = None;
    }
    if state.last_pass.map_or(false, |l| l.passer == id || l.receiver == id) {
        state.last_pass = None;
    }
    log::info!("{} sent off at {:.1}'", id, minute);
    Some(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::sample_team;
    use crate::models::TeamSide;
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn new_state(cfg: &SimConfig) -> MatchState {
        MatchState::kickoff(sample_team("Home", 1), sample_team("Away", 100), None, None, cfg).unwrap()
    }

    #[test]
    fn test_state_machine() {
        use DisciplineState::*;
        assert_eq!(Clean.after(CardType::Yellow), OneYellow);
        assert_eq!(OneYellow.after(CardType::Yellow), SentOff);
        assert_eq!(Clean.after(CardType::Red), SentOff);
        assert_eq!(SentOff.after(CardType::Yellow), SentOff);
    }

    #[test]
    fn test_roll_card_zero_draws() {
        // StepRng(0, 0) always draws 0.0: both rolls hit
        let cfg = DisciplineConfig::default();
        let mut rng = StepRng::new(0, 0);
        assert_eq!(roll_card(&cfg, &mut rng), Some(CardType::Red));

        let yellow_first = DisciplineConfig { roll_order: CardRollOrder::YellowFirst, ..cfg };
        assert_eq!(roll_card(&yellow_first, &mut rng), Some(CardType::Yellow));
    }

    #[test]
    fn test_card_frequencies() {
        let cfg = DisciplineConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let n = 20_000;
        let (mut yellow, mut red) = (0, 0);
        for _ in 0..n {
            match roll_card(&cfg, &mut rng) {
                Some(CardType::Yellow) => yellow += 1,
                Some(CardType::Red) => red += 1,
                None => {}
            }
        }
        let red_rate = red as f32 / n as f32;
        let yellow_rate = yellow as f32 / n as f32;
        assert!((red_rate - 0.03).abs() < 0.01, "red rate {}", red_rate);
        assert!((yellow_rate - 0.15 * 0.97).abs() < 0.02, "yellow rate {}", yellow_rate);
    }

    #[test]
    fn test_double_yellow_sends_off() {
        let cfg = SimConfig::default();
        let mut state = new_state(&cfg);
        let offender = state.away.players[4].id;
        let victim = state.home.players[4].id;

        record_foul(&mut state, offender, victim, Some(CardType::Yellow)).unwrap();
        assert!(state.away.is_on_pitch(offender));
        let report = record_foul(&mut state, offender, victim, Some(CardType::Yellow)).unwrap();
        assert_eq!(report.state, DisciplineState::SentOff);

        assert!(!state.away.is_on_pitch(offender));
        assert_eq!(state.away.players.len(), 10);
        assert_eq!(state.away.stats.yellow_cards, 2);
        assert_eq!(state.away.stats.red_cards, 1);
        assert_eq!(state.away.stats.fouls, 2);
        let last = state.events.as_slice().last().unwrap();
        assert_eq!(last.kind, EventKind::RedCard { second_yellow: true });
        assert!(record_foul(&mut state, offender, victim, None).is_none());
    }

    #[test]
    fn test_red_for_holder_clears_possession_and_control() {
        let cfg = SimConfig::default();
        let mut state = new_state(&cfg);
        let holder = state.possession_player.unwrap();
        state.controlled_player = Some(holder);
        issue_card(&mut state, holder, CardType::Red).unwrap();
        assert_eq!(state.possession_player, None);
        assert_eq!(state.possession_team, None);
        assert_eq!(state.controlled_player, None);
        assert_eq!(state.home.sent_off.len(), 1);
        assert!(state.invariant_violation(&cfg).is_none());
        assert_eq!(state.side_of(holder), None);
        assert!(state.home.all_players().any(|p| p.id == holder && p.team == TeamSide::Home));
    }
}
