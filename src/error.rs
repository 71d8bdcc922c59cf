use std::fmt;

use crate::render::SpriteSheet;

#[derive(Clone, Debug, PartialEq)]
pub enum GameError {
    InvalidStateIndex { index: u8 },
    InvalidConfig { field: &'static str, reason: String },
    ConfigParse { message: String },
    ConfigIo { path: String, message: String },
    MissingAsset { sheet: SpriteSheet },
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidStateIndex { index } => {
                write!(f, "invalid player state index: {index} (allowed 0..=6)")
            }
            Self::InvalidConfig { field, reason } => {
                write!(f, "invalid config field `{field}`: {reason}")
            }
            Self::ConfigParse { message } => write!(f, "config parse error: {message}"),
            Self::ConfigIo { path, message } => {
                write!(f, "cannot read config {path}: {message}")
            }
            Self::MissingAsset { sheet } => {
                write!(f, "no asset handle registered for sprite sheet {sheet:?}")
            }
        }
    }
}

impl std::error::Error for GameError {}
