/// Pure game-logic entry points.
///
/// Every public function takes an immutable reference to the current
/// `GameState` (and, where needed, an RNG handle) and returns a brand-new
/// `GameState`.  Side effects are limited to the injected RNG.

use rand::Rng;
use tracing::{info, warn};

use crate::background;
use crate::config::GameConfig;
use crate::enemies;
use crate::entities::{Background, GameState, GameStatus, Outcome, Player, PlayerState};
use crate::error::GameError;
use crate::input::HeldKeys;
use crate::lifecycle::{retain_live, sanitize_delta, Lifecycle, TickContext};
use crate::particles;
use crate::player;

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the initial world: player sitting on the ground, nothing spawned,
/// full lives and time budget.
pub fn init_state(config: GameConfig) -> Result<GameState, GameError> {
    config.validate()?;

    let mut state = GameState {
        background: Background::new(),
        player: Player::new(&config),
        enemies: Vec::new(),
        particles: Default::default(),
        collisions: Vec::new(),
        messages: Vec::new(),
        speed: 0.0,
        enemy_timer: 0.0,
        time_remaining_ms: config.time_limit_ms,
        score: 0,
        lives: config.lives,
        status: GameStatus::Playing,
        debug: false,
        frame: 0,
        config,
    };
    player::set_state(&mut state, PlayerState::Sitting, 0.0);
    Ok(state)
}

// ── Per-frame tick (nearly pure, RNG is injected) ──────────────────────────

/// Advance the simulation by one frame of `delta_ms` wall-clock milliseconds.
///
/// Component order is fixed: clock, background, player (collisions first),
/// spawner, enemies, messages, particles, collision effects, prune.  A world
/// that is already over comes back unchanged.
pub fn tick(state: &GameState, keys: &HeldKeys, delta_ms: f64, rng: &mut impl Rng) -> GameState {
    if state.status == GameStatus::GameOver {
        return state.clone();
    }

    let delta = sanitize_delta(delta_ms);
    if delta != delta_ms {
        warn!(raw = delta_ms, "clamped anomalous frame delta to zero");
    }

    let mut next = state.clone();
    next.frame += 1;

    // ── 1. Clock ─────────────────────────────────────────────────────────────
    next.time_remaining_ms -= delta;
    if next.time_remaining_ms <= 0.0 {
        next.time_remaining_ms = 0.0;
        next.status = GameStatus::GameOver;
        info!(
            score = next.score,
            win = next.score > next.config.winning_score,
            "game over: time is up"
        );
    }

    // ── 2. Scenery and player ────────────────────────────────────────────────
    background::update(&mut next.background, next.speed);
    player::update(&mut next, keys, delta, rng);

    // ── 3. Spawner (stops the moment the game ends) ──────────────────────────
    if next.status == GameStatus::Playing {
        enemies::update_spawner(&mut next, delta, rng);
    }

    // ── 4. Transient entities ────────────────────────────────────────────────
    let ctx = TickContext::from_state(&next, delta);
    enemies::update_all(&mut next.enemies, &ctx);
    for message in next.messages.iter_mut() {
        message.update(&ctx);
    }
    particles::update_all(&mut next.particles, &ctx, next.config.max_particles);
    for collision in next.collisions.iter_mut() {
        collision.update(&ctx);
    }

    // ── 5. Drop everything flagged this tick ─────────────────────────────────
    prune_marked(&mut next);
    next
}

/// Remove every entity flagged for deletion.  Running it twice in a row is the
/// same as running it once.
pub fn prune(state: &GameState) -> GameState {
    let mut next = state.clone();
    prune_marked(&mut next);
    next
}

fn prune_marked(state: &mut GameState) {
    state.enemies = retain_live(std::mem::take(&mut state.enemies));
    state.particles = retain_live(std::mem::take(&mut state.particles));
    state.collisions = retain_live(std::mem::take(&mut state.collisions));
    state.messages = retain_live(std::mem::take(&mut state.messages));
}

// ── Front-end helpers ────────────────────────────────────────────────────────

pub fn toggle_debug(state: &GameState) -> GameState {
    GameState {
        debug: !state.debug,
        ..state.clone()
    }
}

/// Milliseconds of the time budget already used.
pub fn elapsed_ms(state: &GameState) -> f64 {
    state.config.time_limit_ms - state.time_remaining_ms
}

/// `None` while playing; otherwise whether the final score beat the
/// winning threshold.
pub fn outcome(state: &GameState) -> Option<Outcome> {
    match state.status {
        GameStatus::Playing => None,
        GameStatus::GameOver if state.score > state.config.winning_score => Some(Outcome::Win),
        GameStatus::GameOver => Some(Outcome::Lose),
    }
}
