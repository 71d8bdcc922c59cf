/// Every game entity type. Pure data, no logic.

use std::collections::VecDeque;

use crate::config::GameConfig;

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned box in world pixels, origin at the top-left.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width * 0.5, self.y + self.height * 0.5)
    }
}

// ── Sprite timing ─────────────────────────────────────────────────────────────

/// Column/row cursor into a sprite sheet plus the timer that advances it.
#[derive(Clone, Debug, PartialEq)]
pub struct SpriteAnimation {
    /// Column index of the current frame.
    pub frame_x: u32,
    /// Row index of the current animation.
    pub frame_y: u32,
    /// Last column index before wrapping back to 0.
    pub max_frame: u32,
    /// Milliseconds accumulated since the last frame change.
    pub frame_timer: f64,
    /// Milliseconds each frame stays on screen.
    pub frame_interval: f64,
}

// ── Player ────────────────────────────────────────────────────────────────────

/// The closed set of player states. Discriminants are the state indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PlayerState {
    Sitting = 0,
    Running = 1,
    Jumping = 2,
    Falling = 3,
    Rolling = 4,
    Diving = 5,
    Hit = 6,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f64,
    pub y: f64,
    /// Vertical velocity, positive is downward.
    pub vy: f64,
    /// Horizontal velocity applied at the start of the next tick.
    pub speed: f64,
    pub width: f64,
    pub height: f64,
    /// Gravity added to `vy` every airborne tick.
    pub weight: f64,
    pub max_speed: f64,
    pub anim: SpriteAnimation,
    pub state: PlayerState,
}

// ── Enemies ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum EnemyKind {
    /// Bobs along a sine wave; `va` is the per-tick angle step.
    Flying { angle: f64, va: f64 },
    /// Sits on the ground line.
    Ground,
    /// Hangs from a web and bounces between the top edge and the ground.
    Climbing,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub speed_x: f64,
    pub speed_y: f64,
    pub anim: SpriteAnimation,
    pub marked_for_deletion: bool,
}

// ── Particles ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum ParticleKind {
    Dust,
    /// `gravity` grows every tick and is added to `y`.
    Splash { gravity: f64 },
    /// `angle` drives both the wavy drift and the sprite rotation.
    Fire { angle: f64, va: f64 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub kind: ParticleKind,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub speed_x: f64,
    pub speed_y: f64,
    pub marked_for_deletion: bool,
}

// ── Effects ───────────────────────────────────────────────────────────────────

/// Explosion sprite left behind where the player touched an enemy.
#[derive(Clone, Debug, PartialEq)]
pub struct CollisionAnimation {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub anim: SpriteAnimation,
    pub marked_for_deletion: bool,
}

/// Text easing from where it spawned toward a fixed target.
#[derive(Clone, Debug, PartialEq)]
pub struct FloatingMessage {
    pub value: String,
    pub x: f64,
    pub y: f64,
    pub target_x: f64,
    pub target_y: f64,
    /// Ticks lived so far.
    pub timer: u32,
    pub marked_for_deletion: bool,
}

// ── Background ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    pub x: f64,
    pub width: f64,
    pub height: f64,
    /// Fraction of the world scroll speed this layer moves at.
    pub speed_modifier: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Background {
    pub layers: Vec<Layer>,
}

// ── Master game state ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum GameStatus {
    Playing,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Lose,
}

/// The entire world.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub config: GameConfig,
    pub background: Background,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    /// Newest first; the cap truncates from the back.
    pub particles: VecDeque<Particle>,
    pub collisions: Vec<CollisionAnimation>,
    pub messages: Vec<FloatingMessage>,
    /// Current world scroll speed, owned by the player state machine.
    pub speed: f64,
    /// Milliseconds accumulated toward the next spawn wave.
    pub enemy_timer: f64,
    /// Milliseconds left in the run.
    pub time_remaining_ms: f64,
    pub score: i32,
    pub lives: u32,
    pub status: GameStatus,
    pub debug: bool,
    pub frame: u64,
}
