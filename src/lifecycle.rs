/// Shared per-tick contract for every transient entity: advance one tick,
/// report whether the entity is finished, and get filtered out afterwards.

use crate::entities::{GameState, SpriteAnimation};

/// Read-only view of the world handed to each entity update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickContext {
    /// Wall-clock milliseconds since the previous tick, already clamped.
    pub delta_ms: f64,
    pub world_speed: f64,
    pub world_height: f64,
    pub ground_margin: f64,
}

impl TickContext {
    pub fn from_state(state: &GameState, delta_ms: f64) -> Self {
        Self {
            delta_ms,
            world_speed: state.speed,
            world_height: state.config.height,
            ground_margin: state.config.ground_margin,
        }
    }

    /// Resting y for an entity of the given height.
    pub fn ground_line(&self, entity_height: f64) -> f64 {
        self.world_height - entity_height - self.ground_margin
    }
}

pub trait Lifecycle {
    fn update(&mut self, ctx: &TickContext);

    /// Once true, stays true.
    fn marked_for_deletion(&self) -> bool;
}

/// Rebuild a collection without its finished entries.
///
/// Runs after every update of the tick has completed, so nothing is removed
/// while something else is still iterating.
pub fn retain_live<C>(items: C) -> C
where
    C: IntoIterator + FromIterator<<C as IntoIterator>::Item>,
    <C as IntoIterator>::Item: Lifecycle,
{
    items
        .into_iter()
        .filter(|item| !item.marked_for_deletion())
        .collect()
}

/// Clamp a raw frame delta: negative, NaN and infinite gaps count as zero.
pub fn sanitize_delta(delta_ms: f64) -> f64 {
    if delta_ms.is_finite() && delta_ms > 0.0 {
        delta_ms
    } else {
        0.0
    }
}

impl SpriteAnimation {
    pub fn new(fps: f64, frame_y: u32, max_frame: u32) -> Self {
        Self {
            frame_x: 0,
            frame_y,
            max_frame,
            frame_timer: 0.0,
            frame_interval: 1000.0 / fps,
        }
    }

    /// Accumulate `delta_ms`; returns true (and restarts the timer) on the
    /// tick the frame interval has been exceeded.
    pub fn frame_due(&mut self, delta_ms: f64) -> bool {
        if self.frame_timer > self.frame_interval {
            self.frame_timer = 0.0;
            true
        } else {
            self.frame_timer += delta_ms;
            false
        }
    }

    /// Looping playback: step to the next column, wrapping after `max_frame`.
    pub fn advance(&mut self, delta_ms: f64) {
        if self.frame_due(delta_ms) {
            self.frame_x = if self.frame_x < self.max_frame {
                self.frame_x + 1
            } else {
                0
            };
        }
    }
}
