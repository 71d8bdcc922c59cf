/// Parallax scenery: five seamless layers scrolling at fractions of the
/// world speed.

use crate::entities::{Background, Layer};

pub const LAYER_WIDTH: f64 = 1667.0;
pub const LAYER_HEIGHT: f64 = 500.0;
/// Back to front.
pub const SPEED_MODIFIERS: [f64; 5] = [0.0, 0.2, 0.4, 0.8, 1.0];

impl Background {
    pub fn new() -> Self {
        Background {
            layers: SPEED_MODIFIERS
                .iter()
                .map(|&speed_modifier| Layer {
                    x: 0.0,
                    width: LAYER_WIDTH,
                    height: LAYER_HEIGHT,
                    speed_modifier,
                })
                .collect(),
        }
    }
}

impl Default for Background {
    fn default() -> Self {
        Self::new()
    }
}

pub fn update(background: &mut Background, world_speed: f64) {
    for layer in background.layers.iter_mut() {
        if layer.x < -layer.width {
            layer.x = 0.0;
        } else {
            layer.x -= world_speed * layer.speed_modifier;
        }
    }
}
