/// Render descriptors.
///
/// The core never touches pixels: `Scene::draw` turns a `GameState` into an
/// ordered list of `DrawCommand`s that a front end blits however it likes.
/// Sprite sheets are referenced through an `AssetTable` handed in at
/// construction, so the core never resolves asset names itself.

use std::collections::HashMap;

use crate::background::SPEED_MODIFIERS;
use crate::entities::{
    CollisionAnimation, Enemy, EnemyKind, FloatingMessage, GameState, Particle, ParticleKind,
    Player, Rect,
};
use crate::error::GameError;
use crate::particles::{COLLISION_SPRITE_HEIGHT, COLLISION_SPRITE_WIDTH};

/// Web strands reach this far below a climbing enemy's top edge.
const WEB_OVERHANG: f64 = 50.0;
/// Opacity of a dust puff.
const DUST_ALPHA: f64 = 0.2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpriteSheet {
    Player,
    FlyingEnemy,
    GroundEnemy,
    ClimbingEnemy,
    Fire,
    Boom,
    /// Background layer, 0 = farthest.
    Layer(u8),
}

impl SpriteSheet {
    pub fn all() -> Vec<SpriteSheet> {
        let mut sheets = vec![
            SpriteSheet::Player,
            SpriteSheet::FlyingEnemy,
            SpriteSheet::GroundEnemy,
            SpriteSheet::ClimbingEnemy,
            SpriteSheet::Fire,
            SpriteSheet::Boom,
        ];
        sheets.extend((0..SPEED_MODIFIERS.len() as u8).map(SpriteSheet::Layer));
        sheets
    }
}

/// Opaque front-end handle for a loaded sprite sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SheetHandle(pub u32);

#[derive(Clone, Debug, Default)]
pub struct AssetTable {
    handles: HashMap<SpriteSheet, SheetHandle>,
}

impl AssetTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every sheet registered, numbered in `SpriteSheet::all` order.
    pub fn sequential() -> Self {
        let mut table = Self::new();
        for (i, sheet) in SpriteSheet::all().into_iter().enumerate() {
            table.insert(sheet, SheetHandle(i as u32));
        }
        table
    }

    pub fn insert(&mut self, sheet: SpriteSheet, handle: SheetHandle) {
        self.handles.insert(sheet, handle);
    }

    pub fn get(&self, sheet: SpriteSheet) -> Result<SheetHandle, GameError> {
        self.handles
            .get(&sheet)
            .copied()
            .ok_or(GameError::MissingAsset { sheet })
    }

    pub fn sheet_for(&self, handle: SheetHandle) -> Option<SpriteSheet> {
        self.handles
            .iter()
            .find(|(_, h)| **h == handle)
            .map(|(sheet, _)| *sheet)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Blit `src` (whole sheet when `None`) into `dst`, rotated by
    /// `rotation` radians about the centre of `dst`.
    Sprite {
        sheet: SheetHandle,
        src: Option<Rect>,
        dst: Rect,
        rotation: Option<f64>,
    },
    Circle { x: f64, y: f64, radius: f64, alpha: f64 },
    Line { x1: f64, y1: f64, x2: f64, y2: f64 },
    /// Debug hitbox.
    Outline(Rect),
    Text { value: String, x: f64, y: f64 },
}

/// Anything that can describe itself as draw commands.
pub trait Drawable {
    fn draw(
        &self,
        assets: &AssetTable,
        debug: bool,
        out: &mut Vec<DrawCommand>,
    ) -> Result<(), GameError>;
}

impl Drawable for Player {
    fn draw(
        &self,
        assets: &AssetTable,
        debug: bool,
        out: &mut Vec<DrawCommand>,
    ) -> Result<(), GameError> {
        if debug {
            out.push(DrawCommand::Outline(self.hitbox()));
        }
        out.push(DrawCommand::Sprite {
            sheet: assets.get(SpriteSheet::Player)?,
            src: Some(Rect::new(
                self.anim.frame_x as f64 * self.width,
                self.anim.frame_y as f64 * self.height,
                self.width,
                self.height,
            )),
            dst: self.hitbox(),
            rotation: None,
        });
        Ok(())
    }
}

impl Drawable for Enemy {
    fn draw(
        &self,
        assets: &AssetTable,
        debug: bool,
        out: &mut Vec<DrawCommand>,
    ) -> Result<(), GameError> {
        if debug {
            out.push(DrawCommand::Outline(self.hitbox()));
        }
        let sheet = match self.kind {
            EnemyKind::Flying { .. } => SpriteSheet::FlyingEnemy,
            EnemyKind::Ground => SpriteSheet::GroundEnemy,
            EnemyKind::Climbing => SpriteSheet::ClimbingEnemy,
        };
        out.push(DrawCommand::Sprite {
            sheet: assets.get(sheet)?,
            src: Some(Rect::new(
                self.anim.frame_x as f64 * self.width,
                0.0,
                self.width,
                self.height,
            )),
            dst: self.hitbox(),
            rotation: None,
        });
        if self.kind == EnemyKind::Climbing {
            let x = self.x + self.width * 0.5;
            out.push(DrawCommand::Line {
                x1: x,
                y1: 0.0,
                x2: x,
                y2: self.y + WEB_OVERHANG,
            });
        }
        Ok(())
    }
}

impl Drawable for Particle {
    fn draw(
        &self,
        assets: &AssetTable,
        _debug: bool,
        out: &mut Vec<DrawCommand>,
    ) -> Result<(), GameError> {
        let command = match self.kind {
            ParticleKind::Dust => DrawCommand::Circle {
                x: self.x,
                y: self.y,
                radius: self.size,
                alpha: DUST_ALPHA,
            },
            ParticleKind::Splash { .. } => DrawCommand::Sprite {
                sheet: assets.get(SpriteSheet::Fire)?,
                src: None,
                dst: Rect::new(self.x, self.y, self.size, self.size),
                rotation: None,
            },
            ParticleKind::Fire { angle, .. } => DrawCommand::Sprite {
                sheet: assets.get(SpriteSheet::Fire)?,
                src: None,
                dst: Rect::new(
                    self.x - self.size * 0.5,
                    self.y - self.size * 0.5,
                    self.size,
                    self.size,
                ),
                rotation: Some(angle),
            },
        };
        out.push(command);
        Ok(())
    }
}

impl Drawable for CollisionAnimation {
    fn draw(
        &self,
        assets: &AssetTable,
        _debug: bool,
        out: &mut Vec<DrawCommand>,
    ) -> Result<(), GameError> {
        out.push(DrawCommand::Sprite {
            sheet: assets.get(SpriteSheet::Boom)?,
            src: Some(Rect::new(
                self.anim.frame_x as f64 * COLLISION_SPRITE_WIDTH,
                0.0,
                COLLISION_SPRITE_WIDTH,
                COLLISION_SPRITE_HEIGHT,
            )),
            dst: Rect::new(self.x, self.y, self.width, self.height),
            rotation: None,
        });
        Ok(())
    }
}

impl Drawable for FloatingMessage {
    fn draw(
        &self,
        _assets: &AssetTable,
        _debug: bool,
        out: &mut Vec<DrawCommand>,
    ) -> Result<(), GameError> {
        out.push(DrawCommand::Text {
            value: self.value.clone(),
            x: self.x,
            y: self.y,
        });
        Ok(())
    }
}

pub struct Scene {
    assets: AssetTable,
}

impl Scene {
    pub fn new(assets: AssetTable) -> Self {
        Scene { assets }
    }

    pub fn assets(&self) -> &AssetTable {
        &self.assets
    }

    /// Draw order: background, player, enemies, particles, collision
    /// effects, floating messages.
    pub fn draw(&self, state: &GameState) -> Result<Vec<DrawCommand>, GameError> {
        let mut out = Vec::new();

        for (i, layer) in state.background.layers.iter().enumerate() {
            let sheet = self.assets.get(SpriteSheet::Layer(i as u8))?;
            // Each layer is drawn twice side by side so the wrap is seamless.
            for x in [layer.x, layer.x + layer.width] {
                out.push(DrawCommand::Sprite {
                    sheet,
                    src: None,
                    dst: Rect::new(x, 0.0, layer.width, layer.height),
                    rotation: None,
                });
            }
        }

        state.player.draw(&self.assets, state.debug, &mut out)?;
        for enemy in &state.enemies {
            enemy.draw(&self.assets, state.debug, &mut out)?;
        }
        for particle in &state.particles {
            particle.draw(&self.assets, state.debug, &mut out)?;
        }
        for collision in &state.collisions {
            collision.draw(&self.assets, state.debug, &mut out)?;
        }
        for message in &state.messages {
            message.draw(&self.assets, state.debug, &mut out)?;
        }
        Ok(out)
    }
}
