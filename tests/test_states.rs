use side_scroller::compute::init_state;
use side_scroller::config::GameConfig;
use side_scroller::entities::*;
use side_scroller::input::{HeldKeys, InputKey};
use side_scroller::player::{ground_level, handle_input, on_ground, set_state, set_state_index};
use side_scroller::states::{StateAction, DIVE_SPEED, JUMP_IMPULSE};

use rand::rngs::StdRng;
use rand::SeedableRng;

fn make_state() -> GameState {
    init_state(GameConfig::default()).expect("default config is valid")
}

fn in_state(state: PlayerState, speed_factor: f64) -> GameState {
    let mut s = make_state();
    set_state(&mut s, state, speed_factor);
    s
}

fn lift(s: &mut GameState, y: f64) {
    s.player.y = y;
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn keys<const N: usize>(k: [InputKey; N]) -> HeldKeys {
    HeldKeys::from(k)
}

/// Assert the player entered `expected` with the animation row it owns and
/// the world speed `4 * factor`.
fn assert_entered(s: &GameState, expected: PlayerState, factor: f64) {
    let (row, max_frame) = expected.animation();
    assert_eq!(s.player.state, expected);
    assert_eq!(s.player.anim.frame_x, 0);
    assert_eq!(s.player.anim.frame_y, row);
    assert_eq!(s.player.anim.max_frame, max_frame);
    assert_eq!(s.speed, s.config.max_speed * factor);
}

// ── set_state ─────────────────────────────────────────────────────────────────

#[test]
fn set_state_derives_world_speed_from_factor() {
    for (state, factor) in [
        (PlayerState::Sitting, 0.0),
        (PlayerState::Running, 1.0),
        (PlayerState::Rolling, 2.0),
        (PlayerState::Hit, 0.0),
    ] {
        let s = in_state(state, factor);
        assert_entered(&s, state, factor);
    }
}

#[test]
fn set_state_resets_frame_index() {
    let mut s = in_state(PlayerState::Running, 1.0);
    s.player.anim.frame_x = 6;
    set_state(&mut s, PlayerState::Falling, 1.0);
    assert_eq!(s.player.anim.frame_x, 0);
}

#[test]
fn set_state_index_rejects_unknown_state() {
    let mut s = make_state();
    let err = set_state_index(&mut s, 9, 1.0).unwrap_err();
    assert_eq!(err, side_scroller::error::GameError::InvalidStateIndex { index: 9 });
    // Nothing changed
    assert_eq!(s.player.state, PlayerState::Sitting);
    assert_eq!(s.speed, 0.0);
}

#[test]
fn set_state_index_accepts_known_state() {
    let mut s = make_state();
    set_state_index(&mut s, 4, 2.0).unwrap();
    assert_entered(&s, PlayerState::Rolling, 2.0);
}

// ── Sitting ──────────────────────────────────────────────────────────────────

#[test]
fn sitting_to_running_on_either_arrow() {
    for key in [InputKey::ArrowLeft, InputKey::ArrowRight] {
        let mut s = make_state();
        handle_input(&mut s, &keys([key]), &mut seeded_rng());
        assert_entered(&s, PlayerState::Running, 1.0);
    }
}

#[test]
fn sitting_to_rolling_on_enter() {
    let mut s = make_state();
    handle_input(&mut s, &keys([InputKey::Enter]), &mut seeded_rng());
    assert_entered(&s, PlayerState::Rolling, 2.0);
}

#[test]
fn sitting_arrow_beats_enter() {
    let mut s = make_state();
    let pressed = keys([InputKey::Enter, InputKey::ArrowRight]);
    handle_input(&mut s, &pressed, &mut seeded_rng());
    assert_entered(&s, PlayerState::Running, 1.0);
}

#[test]
fn sitting_without_input_stays_and_spawns_nothing() {
    let mut s = make_state();
    let action = handle_input(&mut s, &HeldKeys::none(), &mut seeded_rng());
    assert_eq!(action, StateAction::Stay);
    assert!(s.particles.is_empty());
}

// ── Running ──────────────────────────────────────────────────────────────────

#[test]
fn running_spawns_dust_every_tick() {
    let mut s = in_state(PlayerState::Running, 1.0);
    let mut rng = seeded_rng();
    for _ in 0..3 {
        handle_input(&mut s, &HeldKeys::none(), &mut rng);
    }
    assert_eq!(s.particles.len(), 3);
    assert!(s.particles.iter().all(|p| p.kind == ParticleKind::Dust));
    let feet_x = s.player.x + s.player.width * 0.6;
    assert_eq!(s.particles[0].x, feet_x);
    assert_eq!(s.particles[0].y, s.player.y + s.player.height);
}

#[test]
fn running_down_sits() {
    let mut s = in_state(PlayerState::Running, 1.0);
    handle_input(&mut s, &keys([InputKey::ArrowDown]), &mut seeded_rng());
    assert_entered(&s, PlayerState::Sitting, 0.0);
}

#[test]
fn running_up_jumps_with_single_impulse() {
    let mut s = in_state(PlayerState::Running, 1.0);
    handle_input(&mut s, &keys([InputKey::ArrowUp]), &mut seeded_rng());
    assert_entered(&s, PlayerState::Jumping, 1.0);
    assert_eq!(s.player.vy, -JUMP_IMPULSE);
}

#[test]
fn running_enter_rolls() {
    let mut s = in_state(PlayerState::Running, 1.0);
    handle_input(&mut s, &keys([InputKey::Enter]), &mut seeded_rng());
    assert_entered(&s, PlayerState::Rolling, 2.0);
}

#[test]
fn running_takes_at_most_one_transition_per_tick() {
    let mut s = in_state(PlayerState::Running, 1.0);
    let all = keys([InputKey::ArrowDown, InputKey::ArrowUp, InputKey::Enter]);
    handle_input(&mut s, &all, &mut seeded_rng());
    // Down is listed first; Sitting would accept Enter next tick, not this one
    assert_entered(&s, PlayerState::Sitting, 0.0);
}

// ── Jumping ──────────────────────────────────────────────────────────────────

#[test]
fn jumping_in_the_air_does_not_reapply_impulse() {
    let mut s = make_state();
    lift(&mut s, 100.0);
    s.player.vy = -5.0;
    set_state(&mut s, PlayerState::Jumping, 1.0);
    assert_eq!(s.player.vy, -5.0);
}

#[test]
fn jumping_turns_to_falling_when_descending() {
    let mut s = in_state(PlayerState::Jumping, 1.0);
    lift(&mut s, 100.0);
    s.player.vy = 2.0;
    handle_input(&mut s, &keys([InputKey::Enter]), &mut seeded_rng());
    assert_entered(&s, PlayerState::Falling, 1.0);
}

#[test]
fn jumping_enter_rolls() {
    let mut s = in_state(PlayerState::Jumping, 1.0);
    lift(&mut s, 100.0);
    s.player.vy = -10.0;
    let pressed = keys([InputKey::Enter, InputKey::ArrowDown]);
    handle_input(&mut s, &pressed, &mut seeded_rng());
    assert_entered(&s, PlayerState::Rolling, 2.0);
}

#[test]
fn jumping_down_dives() {
    let mut s = in_state(PlayerState::Jumping, 1.0);
    lift(&mut s, 100.0);
    s.player.vy = -10.0;
    handle_input(&mut s, &keys([InputKey::ArrowDown]), &mut seeded_rng());
    assert_entered(&s, PlayerState::Diving, 0.0);
    assert_eq!(s.player.vy, DIVE_SPEED);
}

// ── Falling ──────────────────────────────────────────────────────────────────

#[test]
fn falling_lands_running() {
    let mut s = in_state(PlayerState::Falling, 1.0);
    assert!(on_ground(&s.player, &s.config));
    handle_input(&mut s, &keys([InputKey::ArrowDown]), &mut seeded_rng());
    assert_entered(&s, PlayerState::Running, 1.0);
}

#[test]
fn falling_down_dives_while_airborne() {
    let mut s = in_state(PlayerState::Falling, 1.0);
    lift(&mut s, 100.0);
    handle_input(&mut s, &keys([InputKey::ArrowDown]), &mut seeded_rng());
    assert_entered(&s, PlayerState::Diving, 0.0);
}

// ── Rolling ──────────────────────────────────────────────────────────────────

#[test]
fn rolling_spawns_fire_at_centre() {
    let mut s = in_state(PlayerState::Rolling, 2.0);
    handle_input(&mut s, &keys([InputKey::Enter]), &mut seeded_rng());
    assert_eq!(s.particles.len(), 1);
    let fire = &s.particles[0];
    assert!(matches!(fire.kind, ParticleKind::Fire { .. }));
    assert_eq!(fire.x, s.player.x + s.player.width * 0.5);
    assert_eq!(fire.y, s.player.y + s.player.height * 0.5);
}

#[test]
fn rolling_release_on_ground_runs() {
    let mut s = in_state(PlayerState::Rolling, 2.0);
    handle_input(&mut s, &HeldKeys::none(), &mut seeded_rng());
    assert_entered(&s, PlayerState::Running, 1.0);
}

#[test]
fn rolling_release_in_air_falls() {
    let mut s = in_state(PlayerState::Rolling, 2.0);
    lift(&mut s, 100.0);
    handle_input(&mut s, &HeldKeys::none(), &mut seeded_rng());
    assert_entered(&s, PlayerState::Falling, 1.0);
}

#[test]
fn rolling_boost_kicks_up_and_keeps_rolling() {
    let mut s = in_state(PlayerState::Rolling, 2.0);
    s.player.anim.frame_x = 3;
    let boost = keys([InputKey::Enter, InputKey::ArrowUp]);
    let action = handle_input(&mut s, &boost, &mut seeded_rng());
    assert_eq!(action, StateAction::RollBoost);
    assert_eq!(s.player.state, PlayerState::Rolling);
    assert_eq!(s.player.vy, -JUMP_IMPULSE);
    // No re-entry: the animation keeps playing
    assert_eq!(s.player.anim.frame_x, 3);
    assert_eq!(s.speed, 8.0);
}

#[test]
fn rolling_boost_needs_ground() {
    let mut s = in_state(PlayerState::Rolling, 2.0);
    lift(&mut s, 100.0);
    s.player.vy = -3.0;
    let boost = keys([InputKey::Enter, InputKey::ArrowUp]);
    let action = handle_input(&mut s, &boost, &mut seeded_rng());
    assert_eq!(action, StateAction::Stay);
    assert_eq!(s.player.vy, -3.0);
}

#[test]
fn rolling_down_in_air_dives() {
    let mut s = in_state(PlayerState::Rolling, 2.0);
    lift(&mut s, 100.0);
    let pressed = keys([InputKey::Enter, InputKey::ArrowDown]);
    handle_input(&mut s, &pressed, &mut seeded_rng());
    assert_entered(&s, PlayerState::Diving, 0.0);
}

// ── Diving ───────────────────────────────────────────────────────────────────

#[test]
fn diving_in_air_trails_fire_and_stays() {
    let mut s = in_state(PlayerState::Diving, 0.0);
    lift(&mut s, 100.0);
    let action = handle_input(&mut s, &HeldKeys::none(), &mut seeded_rng());
    assert_eq!(action, StateAction::Stay);
    assert_eq!(s.particles.len(), 1);
}

#[test]
fn diving_landing_runs_and_bursts() {
    let mut s = make_state();
    lift(&mut s, 100.0);
    set_state(&mut s, PlayerState::Diving, 0.0);
    s.player.y = ground_level(&s.player, &s.config);
    handle_input(&mut s, &HeldKeys::none(), &mut seeded_rng());
    assert_entered(&s, PlayerState::Running, 1.0);
    // One trail particle plus the 30-particle impact burst
    assert_eq!(s.particles.len(), 31);
    let feet = s.player.y + s.player.height;
    assert_eq!(s.particles.iter().filter(|p| p.y == feet).count(), 30);
}

#[test]
fn diving_never_lands_into_rolling() {
    let mut s = in_state(PlayerState::Diving, 0.0);
    handle_input(&mut s, &HeldKeys::none(), &mut seeded_rng());
    assert_eq!(s.player.state, PlayerState::Running);
}

// ── Hit ──────────────────────────────────────────────────────────────────────

#[test]
fn hit_holds_until_the_animation_finishes() {
    let mut s = in_state(PlayerState::Hit, 0.0);
    s.player.anim.frame_x = 9;
    handle_input(&mut s, &keys([InputKey::ArrowRight]), &mut seeded_rng());
    assert_eq!(s.player.state, PlayerState::Hit);
}

#[test]
fn hit_recovers_running_on_ground() {
    let mut s = in_state(PlayerState::Hit, 0.0);
    s.player.anim.frame_x = 10;
    handle_input(&mut s, &HeldKeys::none(), &mut seeded_rng());
    assert_entered(&s, PlayerState::Running, 1.0);
}

#[test]
fn hit_recovers_falling_in_air() {
    let mut s = in_state(PlayerState::Hit, 0.0);
    lift(&mut s, 100.0);
    s.player.anim.frame_x = 10;
    handle_input(&mut s, &HeldKeys::none(), &mut seeded_rng());
    assert_entered(&s, PlayerState::Falling, 1.0);
}
