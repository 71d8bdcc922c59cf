/// Player construction, state changes, and per-tick physics.

use rand::Rng;
use tracing::debug;

use crate::collision;
use crate::config::GameConfig;
use crate::entities::{GameState, Particle, Player, PlayerState, SpriteAnimation};
use crate::error::GameError;
use crate::input::{HeldKeys, InputKey};
use crate::particles;
use crate::states::{self, Footing, StateAction, JUMP_IMPULSE};

pub const PLAYER_WIDTH: f64 = 100.0;
pub const PLAYER_HEIGHT: f64 = 91.3;
pub const PLAYER_FPS: f64 = 20.0;
/// Horizontal speed while an arrow key is held, in pixels per tick.
pub const PLAYER_MAX_SPEED: f64 = 10.0;
pub const PLAYER_WEIGHT: f64 = 1.0;
/// Fire particles thrown up when a dive hits the ground.
pub const DIVE_IMPACT_PARTICLES: usize = 30;

impl Player {
    /// Standing at the left edge on the ground line, not yet in any state's
    /// animation; `player::set_state` finishes the setup.
    pub fn new(config: &GameConfig) -> Self {
        Player {
            x: 0.0,
            y: config.height - PLAYER_HEIGHT - config.ground_margin,
            vy: 0.0,
            speed: 0.0,
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            weight: PLAYER_WEIGHT,
            max_speed: PLAYER_MAX_SPEED,
            anim: SpriteAnimation::new(PLAYER_FPS, 0, 0),
            state: PlayerState::Sitting,
        }
    }
}

pub fn ground_level(player: &Player, config: &GameConfig) -> f64 {
    config.height - player.height - config.ground_margin
}

pub fn on_ground(player: &Player, config: &GameConfig) -> bool {
    player.y >= ground_level(player, config)
}

fn footing(player: &Player, config: &GameConfig) -> Footing {
    Footing {
        on_ground: on_ground(player, config),
        vy: player.vy,
        weight: player.weight,
        frame_x: player.anim.frame_x,
    }
}

// ── State changes ────────────────────────────────────────────────────────────

/// The only way into a state: swap it in, derive the world scroll speed from
/// `speed_factor`, then run the state's entry effects.
pub fn set_state(state: &mut GameState, next: PlayerState, speed_factor: f64) {
    let previous = state.player.state;
    state.player.state = next;
    state.speed = state.config.max_speed * speed_factor;
    let grounded = on_ground(&state.player, &state.config);
    states::enter(&mut state.player, next, grounded);
    debug!(from = ?previous, to = ?next, speed = state.speed, "player state changed");
}

/// `set_state` addressed by state index, for callers holding a raw number.
pub fn set_state_index(
    state: &mut GameState,
    index: u8,
    speed_factor: f64,
) -> Result<(), GameError> {
    let next = PlayerState::try_from(index)?;
    set_state(state, next, speed_factor);
    Ok(())
}

/// Run the active state for one tick: emit its trail particle, then apply
/// whatever the transition table decides.
pub fn handle_input(state: &mut GameState, keys: &HeldKeys, rng: &mut impl Rng) -> StateAction {
    let p = &state.player;
    let current = p.state;
    match current {
        PlayerState::Running => {
            let dust = Particle::dust(p.x + p.width * 0.6, p.y + p.height, rng);
            particles::spawn(&mut state.particles, dust);
        }
        PlayerState::Rolling | PlayerState::Diving => {
            let fire = Particle::fire(p.x + p.width * 0.5, p.y + p.height * 0.5, rng);
            particles::spawn(&mut state.particles, fire);
        }
        _ => {}
    }

    let action = states::decide(current, keys, footing(&state.player, &state.config));
    match action {
        StateAction::Stay => {}
        StateAction::RollBoost => state.player.vy -= JUMP_IMPULSE,
        StateAction::Enter { next, speed_factor } => {
            set_state(state, next, speed_factor);
            if current == PlayerState::Diving && next == PlayerState::Running {
                dive_impact(state, rng);
            }
        }
    }
    action
}

fn dive_impact(state: &mut GameState, rng: &mut impl Rng) {
    let (x, y) = (
        state.player.x + state.player.width * 0.5,
        state.player.y + state.player.height,
    );
    for _ in 0..DIVE_IMPACT_PARTICLES {
        particles::spawn(&mut state.particles, Particle::fire(x, y, rng));
    }
    debug!(x, y, "dive impact");
}

// ── Per-tick update ──────────────────────────────────────────────────────────

/// Collisions, the state machine, then movement and animation, in that order.
pub fn update(state: &mut GameState, keys: &HeldKeys, delta_ms: f64, rng: &mut impl Rng) {
    collision::check_player_collisions(state, rng);
    handle_input(state, keys, rng);

    let world_width = state.config.width;
    let ground = ground_level(&state.player, &state.config);
    let player = &mut state.player;

    // Horizontal: last tick's speed moves us, then input sets the next one.
    player.x += player.speed;
    let can_steer = player.state != PlayerState::Hit;
    player.speed = if can_steer && keys.contains(InputKey::ArrowRight) {
        player.max_speed
    } else if can_steer && keys.contains(InputKey::ArrowLeft) {
        -player.max_speed
    } else {
        0.0
    };
    player.x = player.x.max(0.0).min(world_width - player.width);

    // Vertical
    player.y += player.vy;
    if player.y < ground {
        player.vy += player.weight;
    } else {
        player.vy = 0.0;
    }
    if player.y > ground {
        player.y = ground;
    }

    player.anim.advance(delta_ms);
}
