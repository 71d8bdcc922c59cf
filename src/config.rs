/// World configuration supplied at construction.
///
/// Every field has a default matching the shipped game, so a config file only
/// needs to list the values it overrides:
///
/// ```ron
/// (winning_score: 40, lives: 3)
/// ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::GameError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Viewport width in world pixels.
    pub width: f64,
    /// Viewport height in world pixels.
    pub height: f64,
    /// Distance between the ground line and the bottom edge.
    pub ground_margin: f64,
    /// World scroll speed at speed factor 1, in pixels per tick.
    pub max_speed: f64,
    pub max_particles: usize,
    /// Milliseconds between enemy spawn waves.
    pub enemy_interval_ms: f64,
    /// Score that must be exceeded at game-over to win.
    pub winning_score: i32,
    pub lives: u32,
    /// Time budget for one run, in milliseconds.
    pub time_limit_ms: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 900.0,
            height: 500.0,
            ground_margin: 80.0,
            max_speed: 4.0,
            max_particles: 50,
            enemy_interval_ms: 1000.0,
            winning_score: 90,
            lives: 5,
            time_limit_ms: 60_000.0,
        }
    }
}

impl GameConfig {
    pub fn from_ron_str(text: &str) -> Result<Self, GameError> {
        let config: GameConfig = ron::from_str(text).map_err(|e| GameError::ConfigParse {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, GameError> {
        let text = std::fs::read_to_string(path).map_err(|e| GameError::ConfigIo {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_ron_str(&text)
    }

    pub fn validate(&self) -> Result<(), GameError> {
        fn invalid(field: &'static str, reason: &str) -> GameError {
            GameError::InvalidConfig {
                field,
                reason: reason.to_string(),
            }
        }

        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(invalid("width", "must be a positive number"));
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(invalid("height", "must be a positive number"));
        }
        if !(self.ground_margin >= 0.0 && self.ground_margin < self.height) {
            return Err(invalid("ground_margin", "must lie in 0..height"));
        }
        if !(self.max_speed.is_finite() && self.max_speed >= 0.0) {
            return Err(invalid("max_speed", "must be zero or positive"));
        }
        if self.max_particles == 0 {
            return Err(invalid("max_particles", "must be at least 1"));
        }
        if !(self.enemy_interval_ms.is_finite() && self.enemy_interval_ms > 0.0) {
            return Err(invalid("enemy_interval_ms", "must be a positive number"));
        }
        if self.lives == 0 {
            return Err(invalid("lives", "must be at least 1"));
        }
        if !(self.time_limit_ms.is_finite() && self.time_limit_ms > 0.0) {
            return Err(invalid("time_limit_ms", "must be a positive number"));
        }
        Ok(())
    }
}
