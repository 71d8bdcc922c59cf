pub mod background;
pub mod collision;
pub mod compute;
pub mod config;
pub mod enemies;
pub mod entities;
pub mod error;
pub mod input;
pub mod lifecycle;
pub mod particles;
pub mod player;
pub mod render;
pub mod states;
