/// Particles, collision explosions and floating score text.

use std::collections::VecDeque;

use rand::Rng;

use crate::entities::{CollisionAnimation, FloatingMessage, Particle, ParticleKind, SpriteAnimation};
use crate::lifecycle::{Lifecycle, TickContext};

/// Per-tick size multiplier shared by every particle.
pub const DECAY: f64 = 0.97;
/// Particles smaller than this are finished.
pub const MIN_SIZE: f64 = 0.5;

pub const COLLISION_SPRITE_WIDTH: f64 = 100.0;
pub const COLLISION_SPRITE_HEIGHT: f64 = 90.0;
const COLLISION_MAX_FRAME: u32 = 4;

/// Fraction of the remaining distance a message covers each tick.
const MESSAGE_EASING: f64 = 0.03;
/// Ticks a message lives before it is removed.
pub const MESSAGE_LIFETIME: u32 = 100;

// ── Constructors ─────────────────────────────────────────────────────────────

impl Particle {
    /// Small grey puff kicked up while running.
    pub fn dust(x: f64, y: f64, rng: &mut impl Rng) -> Self {
        Particle {
            kind: ParticleKind::Dust,
            x,
            y,
            size: rng.gen_range(10.0..20.0),
            speed_x: rng.gen::<f64>(),
            speed_y: rng.gen::<f64>(),
            marked_for_deletion: false,
        }
    }

    /// Large ground-impact spray.  Nothing in the game spawns it yet.
    pub fn splash(x: f64, y: f64, rng: &mut impl Rng) -> Self {
        let size = rng.gen_range(100.0..200.0);
        Particle {
            kind: ParticleKind::Splash { gravity: 0.0 },
            x: x - size * 0.4,
            y: y - size * 0.5,
            size,
            speed_x: rng.gen_range(-4.0..2.0),
            speed_y: rng.gen_range(2.0..4.0),
            marked_for_deletion: false,
        }
    }

    /// Fire trail left while rolling or diving.
    pub fn fire(x: f64, y: f64, rng: &mut impl Rng) -> Self {
        Particle {
            kind: ParticleKind::Fire {
                angle: 0.0,
                va: rng.gen_range(-0.1..0.1),
            },
            x,
            y,
            size: rng.gen_range(50.0..150.0),
            speed_x: 1.0,
            speed_y: 1.0,
            marked_for_deletion: false,
        }
    }
}

impl CollisionAnimation {
    /// Explosion centred on `(x, y)` with a random scale and playback rate.
    pub fn new(x: f64, y: f64, rng: &mut impl Rng) -> Self {
        let size_modifier = rng.gen_range(0.5..1.0);
        let width = COLLISION_SPRITE_WIDTH * size_modifier;
        let height = COLLISION_SPRITE_HEIGHT * size_modifier;
        let fps = rng.gen_range(5.0..15.0);
        CollisionAnimation {
            x: x - width * 0.5,
            y: y - height * 0.5,
            width,
            height,
            anim: SpriteAnimation::new(fps, 0, COLLISION_MAX_FRAME),
            marked_for_deletion: false,
        }
    }
}

impl FloatingMessage {
    pub fn new(value: impl Into<String>, x: f64, y: f64, target_x: f64, target_y: f64) -> Self {
        FloatingMessage {
            value: value.into(),
            x,
            y,
            target_x,
            target_y,
            timer: 0,
            marked_for_deletion: false,
        }
    }
}

// ── Per-tick behaviour ───────────────────────────────────────────────────────

impl Lifecycle for Particle {
    fn update(&mut self, ctx: &TickContext) {
        self.x -= self.speed_x + ctx.world_speed;
        self.y -= self.speed_y;
        self.size *= DECAY;
        if self.size < MIN_SIZE {
            self.marked_for_deletion = true;
        }

        match &mut self.kind {
            ParticleKind::Dust => {}
            ParticleKind::Splash { gravity } => {
                *gravity += 0.1;
                self.y += *gravity;
            }
            ParticleKind::Fire { angle, va } => {
                *angle += *va;
                self.x += (*angle * 5.0).sin();
            }
        }
    }

    fn marked_for_deletion(&self) -> bool {
        self.marked_for_deletion
    }
}

impl Lifecycle for CollisionAnimation {
    fn update(&mut self, ctx: &TickContext) {
        self.x -= ctx.world_speed;
        if self.anim.frame_due(ctx.delta_ms) {
            self.anim.frame_x += 1;
        }
        if self.anim.frame_x > self.anim.max_frame {
            self.marked_for_deletion = true;
        }
    }

    fn marked_for_deletion(&self) -> bool {
        self.marked_for_deletion
    }
}

/// Messages age in ticks, not milliseconds.
impl Lifecycle for FloatingMessage {
    fn update(&mut self, _ctx: &TickContext) {
        self.x += (self.target_x - self.x) * MESSAGE_EASING;
        self.y += (self.target_y - self.y) * MESSAGE_EASING;
        self.timer += 1;
        if self.timer > MESSAGE_LIFETIME {
            self.marked_for_deletion = true;
        }
    }

    fn marked_for_deletion(&self) -> bool {
        self.marked_for_deletion
    }
}

// ── Collection helpers ───────────────────────────────────────────────────────

/// New particles go in front so the cap drops the oldest ones.
pub fn spawn(particles: &mut VecDeque<Particle>, particle: Particle) {
    particles.push_front(particle);
}

/// Update every particle, then cut the collection back to `max_particles`.
pub fn update_all(particles: &mut VecDeque<Particle>, ctx: &TickContext, max_particles: usize) {
    for particle in particles.iter_mut() {
        particle.update(ctx);
    }
    particles.truncate(max_particles);
}
