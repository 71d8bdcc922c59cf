/// Enemy variants, their motion, and the timed spawner.

use rand::Rng;
use tracing::trace;

use crate::config::GameConfig;
use crate::entities::{Enemy, EnemyKind, GameState, SpriteAnimation};
use crate::lifecycle::{Lifecycle, TickContext};

/// Sprite playback rate for every enemy sheet.
pub const ENEMY_FPS: f64 = 20.0;

// ── Constructors ─────────────────────────────────────────────────────────────

impl Enemy {
    /// Enters from beyond the right edge somewhere in the upper half.
    pub fn flying(config: &GameConfig, rng: &mut impl Rng) -> Self {
        Enemy {
            kind: EnemyKind::Flying {
                angle: 0.0,
                va: rng.gen_range(0.1..0.2),
            },
            x: config.width + rng.gen::<f64>() * config.width * 0.5,
            y: rng.gen::<f64>() * config.height * 0.5,
            width: 60.0,
            height: 44.0,
            speed_x: rng.gen_range(1.0..2.0),
            speed_y: 0.0,
            anim: SpriteAnimation::new(ENEMY_FPS, 0, 5),
            marked_for_deletion: false,
        }
    }

    /// Enters at the right edge standing on the ground line.
    pub fn ground(config: &GameConfig) -> Self {
        let height = 87.0;
        Enemy {
            kind: EnemyKind::Ground,
            x: config.width,
            y: config.height - height - config.ground_margin,
            width: 60.0,
            height,
            speed_x: 0.0,
            speed_y: 0.0,
            anim: SpriteAnimation::new(ENEMY_FPS, 0, 1),
            marked_for_deletion: false,
        }
    }

    /// Enters at the right edge in the upper half, heading up or down at random.
    pub fn climbing(config: &GameConfig, rng: &mut impl Rng) -> Self {
        Enemy {
            kind: EnemyKind::Climbing,
            x: config.width,
            y: rng.gen::<f64>() * config.height * 0.5,
            width: 120.0,
            height: 144.0,
            speed_x: 0.0,
            speed_y: if rng.gen_bool(0.5) { 1.0 } else { -1.0 },
            anim: SpriteAnimation::new(ENEMY_FPS, 0, 5),
            marked_for_deletion: false,
        }
    }
}

// ── Per-tick motion ──────────────────────────────────────────────────────────

impl Lifecycle for Enemy {
    fn update(&mut self, ctx: &TickContext) {
        self.x -= self.speed_x + ctx.world_speed;
        self.y += self.speed_y;
        self.anim.advance(ctx.delta_ms);
        if self.x + self.width < 0.0 {
            self.marked_for_deletion = true;
        }

        match &mut self.kind {
            EnemyKind::Flying { angle, va } => {
                *angle += *va;
                self.y += (*angle).sin();
            }
            EnemyKind::Ground => {}
            EnemyKind::Climbing => {
                if self.y > ctx.ground_line(self.height) {
                    self.speed_y *= -1.0;
                }
                if self.y < -self.height {
                    self.marked_for_deletion = true;
                }
            }
        }
    }

    fn marked_for_deletion(&self) -> bool {
        self.marked_for_deletion
    }
}

// ── Spawning ─────────────────────────────────────────────────────────────────

/// One spawn wave: while the world scrolls, a coin flip between a ground and
/// a climbing enemy; a flying enemy every time.
pub fn spawn_wave(state: &mut GameState, rng: &mut impl Rng) {
    if state.speed > 0.0 {
        let enemy = if rng.gen_bool(0.5) {
            Enemy::ground(&state.config)
        } else {
            Enemy::climbing(&state.config, rng)
        };
        trace!(kind = ?enemy.kind, frame = state.frame, "enemy spawned");
        state.enemies.push(enemy);
    }

    let flyer = Enemy::flying(&state.config, rng);
    trace!(kind = ?flyer.kind, frame = state.frame, "enemy spawned");
    state.enemies.push(flyer);
}

/// Advance the spawn timer, firing a wave once it passes the interval.
pub fn update_spawner(state: &mut GameState, delta_ms: f64, rng: &mut impl Rng) {
    if state.enemy_timer > state.config.enemy_interval_ms {
        spawn_wave(state, rng);
        state.enemy_timer = 0.0;
    } else {
        state.enemy_timer += delta_ms;
    }
}

pub fn update_all(enemies: &mut [Enemy], ctx: &TickContext) {
    for enemy in enemies.iter_mut() {
        enemy.update(ctx);
    }
}
