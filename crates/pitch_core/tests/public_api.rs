//! Host-side usage of the crate root: build, drive with frame deltas, read, save.

use pitch_core::fixtures::sample_team;
use pitch_core::{
    get_events, get_stats, init_match, verify, AIDifficulty, AIProfile, EventKind, ManualAction, ManualOutcome,
    MatchEngine, MatchState, PlayerId, RejectReason, SimConfig, SimError, TacticalProfile, TeamSide, Termination,
};

fn kickoff(cfg: &SimConfig) -> MatchState {
    init_match(sample_team("Reds", 1), sample_team("Blues", 100), None, None, cfg).unwrap()
}

#[test]
fn host_loop_reaches_full_time() {
    let cfg = SimConfig::default();
    let mut engine = MatchEngine::with_seed(cfg.clone(), kickoff(&cfg), 2024)
        .unwrap()
        .with_ai(TeamSide::Away, AIProfile::adaptive(AIDifficulty::Expert));

    // 30 fps host
    let mut frames = 0u32;
    while engine.is_active() && frames < 100_000 {
        engine.update(1.0 / 30.0);
        frames += 1;
    }

    let state = engine.state();
    assert_eq!(state.termination, Some(Termination::FullTime));
    assert_eq!(get_events(state).last().map(|e| &e.kind), Some(&EventKind::FullTime));

    let stats = get_stats(state);
    assert_eq!(stats.home.score, state.home.score);
    assert!((stats.home.possession_pct + stats.away.possession_pct - 100.0).abs() < 1.0);

    verify(state, &cfg).unwrap();
}

#[test]
fn manual_actions_only_for_the_ball_holder() {
    let cfg = SimConfig::default();
    let state = kickoff(&cfg);
    let holder = state.possession_player.unwrap();
    let mut engine = MatchEngine::with_seed(cfg, state, 1).unwrap();

    assert!(engine.select_player(Some(holder)));
    assert_eq!(
        engine.manual_action(PlayerId(999), ManualAction::Shoot { strength: 1.0 }),
        ManualOutcome::Rejected(RejectReason::NotOnPitch)
    );
    assert_eq!(
        engine.manual_action(PlayerId(105), ManualAction::Shoot { strength: 1.0 }),
        ManualOutcome::Rejected(RejectReason::NotInPossession)
    );
    assert_eq!(
        engine.manual_action(holder, ManualAction::Pass { target: PlayerId(105) }),
        ManualOutcome::Rejected(RejectReason::InvalidTarget)
    );

    let before = engine.events().len();
    assert!(engine.manual_action(holder, ManualAction::Shoot { strength: 0.5 }).is_applied());
    assert!(engine.events()[before..].iter().any(|e| matches!(e.kind, EventKind::Shot { .. })));
    // restart goes to the other side
    assert_eq!(engine.state().possession_team, Some(TeamSide::Away));
}

#[test]
fn save_and_load_round_trip() {
    let cfg = SimConfig::metric();
    let mut engine = MatchEngine::with_seed(cfg.clone(), kickoff(&cfg), 77).unwrap();
    for _ in 0..50 {
        engine.step();
    }
    let json = engine.state().to_json().unwrap();
    let restored = MatchState::from_json(&json).unwrap();
    assert_eq!(restored.tick, 50);
    assert_eq!(restored.events, engine.state().events);
    assert_eq!(restored.score(), engine.state().score());

    let cfg_json = cfg.to_json().unwrap();
    assert_eq!(SimConfig::from_json(&cfg_json).unwrap(), cfg);
}

#[test]
fn bad_rosters_and_names_are_rejected() {
    let cfg = SimConfig::default();
    let clash = init_match(sample_team("A", 1), sample_team("B", 5), None, None, &cfg);
    assert!(matches!(clash, Err(SimError::DuplicatePlayer(_))));

    let empty = init_match(pitch_core::Team::new("Nobody", Vec::new()), sample_team("B", 100), None, None, &cfg);
    assert!(matches!(empty, Err(SimError::InvalidTeamSize { .. })));

    assert!(matches!(AIProfile::preset("gegenpress", AIDifficulty::Hard), Err(SimError::UnknownProfile(_))));
}

#[test]
fn tactics_from_json_are_clamped_before_kickoff() {
    let cfg = SimConfig::default();
    let json = r#"{
        "formation": "4-3-3",
        "pressing": 150.0, "tempo": 50.0, "width": 50.0, "defensive_line_height": 250.0,
        "offensive_aggression": -10.0, "build_up_play": 50.0, "transition_speed": 50.0, "creativity": 50.0
    }"#;
    let tactics: TacticalProfile = serde_json::from_str(json).unwrap();
    assert_eq!(tactics.pressing(), 100.0);
    assert_eq!(tactics.defensive_line_height(), 100.0);
    assert_eq!(tactics.offensive_aggression(), 0.0);

    let state = init_match(sample_team("Reds", 1), sample_team("Blues", 100), Some(tactics), None, &cfg).unwrap();
    let mut engine = MatchEngine::with_seed(cfg, state, 3).unwrap();
    for _ in 0..20 {
        engine.step();
    }
    assert!(engine.is_active());
    assert_eq!(engine.state().termination, None);
}
