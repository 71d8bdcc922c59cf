/// Rendering layer: all terminal I/O lives here.
///
/// The simulation hands over draw commands in world pixels; this module
/// scales them onto terminal cells, paints them into a frame buffer and
/// flushes the buffer row by row.  No game logic is performed here.

use std::collections::HashMap;
use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use side_scroller::compute::outcome;
use side_scroller::entities::{GameState, Outcome, Rect};
use side_scroller::error::GameError;
use side_scroller::render::{AssetTable, DrawCommand, SheetHandle, SpriteSheet};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_SKY: Color = Color::Black;
const C_GROUND: Color = Color::DarkGreen;
const C_GROUND_MARK: Color = Color::Green;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_TIME: Color = Color::White;
const C_HUD_LIVES: Color = Color::Red;
const C_DUST: Color = Color::DarkGrey;
const C_WEB: Color = Color::Grey;
const C_HITBOX: Color = Color::Red;
const C_MESSAGE: Color = Color::White;
const C_HINT: Color = Color::DarkGrey;

/// World pixels between ground texture marks on the front layer.
const GROUND_MARK_SPACING: f64 = 120.0;

// ── Glyphs ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
enum Glyph {
    Fill(char, Color),
    /// Front scenery layer: drawn as scrolling marks along the ground.
    Ground,
    /// Distant scenery layers have no terminal rendition.
    Skip,
}

/// Maps the handles of an `AssetTable` to terminal glyphs.
pub struct GlyphTable {
    glyphs: HashMap<SheetHandle, Glyph>,
}

impl GlyphTable {
    pub fn new(assets: &AssetTable) -> Result<Self, GameError> {
        let front_layer = SpriteSheet::all()
            .into_iter()
            .filter(|s| matches!(s, SpriteSheet::Layer(_)))
            .last();
        let mut glyphs = HashMap::new();
        for sheet in SpriteSheet::all() {
            let glyph = match sheet {
                SpriteSheet::Player => Glyph::Fill('█', Color::White),
                SpriteSheet::FlyingEnemy => Glyph::Fill('▼', Color::Magenta),
                SpriteSheet::GroundEnemy => Glyph::Fill('♣', Color::Green),
                SpriteSheet::ClimbingEnemy => Glyph::Fill('※', Color::Red),
                SpriteSheet::Fire => Glyph::Fill('▒', Color::DarkYellow),
                SpriteSheet::Boom => Glyph::Fill('*', Color::Yellow),
                SpriteSheet::Layer(_) if Some(sheet) == front_layer => Glyph::Ground,
                SpriteSheet::Layer(_) => Glyph::Skip,
            };
            glyphs.insert(assets.get(sheet)?, glyph);
        }
        Ok(GlyphTable { glyphs })
    }

    fn get(&self, handle: SheetHandle) -> Glyph {
        self.glyphs.get(&handle).copied().unwrap_or(Glyph::Skip)
    }
}

// ── Frame buffer ─────────────────────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq)]
struct Cell {
    ch: char,
    fg: Color,
}

struct Canvas {
    cols: u16,
    rows: u16,
    /// World pixels per cell, horizontally and vertically.
    scale_x: f64,
    scale_y: f64,
    /// First terminal row of the play area (row 0 is the HUD).
    top: u16,
    cells: Vec<Cell>,
}

impl Canvas {
    fn new(state: &GameState, cols: u16, rows: u16) -> Self {
        let top = 1;
        // Leave the HUD row and the hint row free.
        let play_rows = rows.saturating_sub(2).max(1);
        Canvas {
            cols,
            rows: play_rows,
            scale_x: state.config.width / cols.max(1) as f64,
            scale_y: state.config.height / play_rows as f64,
            top,
            cells: vec![Cell { ch: ' ', fg: C_SKY }; cols as usize * play_rows as usize],
        }
    }

    fn col(&self, x: f64) -> i32 {
        (x / self.scale_x).floor() as i32
    }

    fn row(&self, y: f64) -> i32 {
        (y / self.scale_y).floor() as i32
    }

    fn put(&mut self, col: i32, row: i32, ch: char, fg: Color) {
        if col < 0 || row < 0 || col >= self.cols as i32 || row >= self.rows as i32 {
            return;
        }
        let idx = row as usize * self.cols as usize + col as usize;
        self.cells[idx] = Cell { ch, fg };
    }

    fn fill(&mut self, r: &Rect, ch: char, fg: Color) {
        let (c0, c1) = (self.col(r.x), self.col(r.right()).max(self.col(r.x) + 1));
        let (r0, r1) = (self.row(r.y), self.row(r.bottom()).max(self.row(r.y) + 1));
        for row in r0..r1 {
            for col in c0..c1 {
                self.put(col, row, ch, fg);
            }
        }
    }

    fn outline(&mut self, r: &Rect, fg: Color) {
        let (c0, c1) = (self.col(r.x), self.col(r.right()));
        let (r0, r1) = (self.row(r.y), self.row(r.bottom()));
        for col in c0..=c1 {
            self.put(col, r0, '─', fg);
            self.put(col, r1, '─', fg);
        }
        for row in r0..=r1 {
            self.put(c0, row, '│', fg);
            self.put(c1, row, '│', fg);
        }
    }

    fn text(&mut self, x: f64, y: f64, value: &str, fg: Color) {
        let (col, row) = (self.col(x), self.row(y));
        for (i, ch) in value.chars().enumerate() {
            self.put(col + i as i32, row, ch, fg);
        }
    }

    fn ground(&mut self, ground_y: f64, layer_x: f64) {
        let first_row = self.row(ground_y);
        for row in first_row..self.rows as i32 {
            for col in 0..self.cols as i32 {
                self.put(col, row, '░', C_GROUND);
            }
        }
        let mut x = layer_x.rem_euclid(GROUND_MARK_SPACING);
        let world_width = self.cols as f64 * self.scale_x;
        while x < world_width {
            self.put(self.col(x), first_row, '▲', C_GROUND_MARK);
            x += GROUND_MARK_SPACING;
        }
    }

    fn apply(&mut self, command: &DrawCommand, glyphs: &GlyphTable, ground_y: f64) {
        match command {
            DrawCommand::Sprite { sheet, dst, .. } => match glyphs.get(*sheet) {
                Glyph::Fill(ch, fg) => self.fill(dst, ch, fg),
                // The front layer is drawn twice; the first copy covers the view.
                Glyph::Ground if dst.x <= 0.0 => self.ground(ground_y, dst.x),
                Glyph::Ground | Glyph::Skip => {}
            },
            DrawCommand::Circle { x, y, .. } => {
                let (col, row) = (self.col(*x), self.row(*y));
                self.put(col, row, '·', C_DUST);
            }
            DrawCommand::Line { x1, y1, y2, .. } => {
                let col = self.col(*x1);
                for row in self.row(*y1)..self.row(*y2) {
                    self.put(col, row, '┊', C_WEB);
                }
            }
            DrawCommand::Outline(r) => self.outline(r, C_HITBOX),
            DrawCommand::Text { value, x, y } => self.text(*x, *y, value, C_MESSAGE),
        }
    }

    fn flush<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        for row in 0..self.rows {
            out.queue(cursor::MoveTo(0, self.top + row))?;
            let mut current = None;
            let start = row as usize * self.cols as usize;
            for cell in &self.cells[start..start + self.cols as usize] {
                if current != Some(cell.fg) {
                    out.queue(style::SetForegroundColor(cell.fg))?;
                    current = Some(cell.fg);
                }
                out.queue(Print(cell.ch))?;
            }
        }
        Ok(())
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    state: &GameState,
    commands: &[DrawCommand],
    glyphs: &GlyphTable,
    best_score: Option<i32>,
) -> std::io::Result<()> {
    let (cols, rows) = terminal::size()?;
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let ground_y = state.config.height - state.config.ground_margin;
    let mut canvas = Canvas::new(state, cols, rows);
    // Hitboxes go on top, otherwise the sprite fill would hide them.
    let (outlines, rest): (Vec<&DrawCommand>, Vec<&DrawCommand>) = commands
        .iter()
        .partition(|c| matches!(c, DrawCommand::Outline(_)));
    for command in rest.into_iter().chain(outlines) {
        canvas.apply(command, glyphs, ground_y);
    }
    canvas.flush(out)?;

    draw_hud(out, state, cols, best_score)?;
    draw_controls_hint(out, state, rows)?;
    if let Some(result) = outcome(state) {
        draw_game_over(out, state, result, cols, rows)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(
    out: &mut W,
    state: &GameState,
    cols: u16,
    best_score: Option<i32>,
) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    match best_score {
        Some(best) => out.queue(Print(format!("Score:{:>5}  Best:{:>5}", state.score, best)))?,
        None => out.queue(Print(format!("Score:{:>5}", state.score)))?,
    };

    let time_str = format!("Time: {:.1}", state.time_remaining_ms * 0.001);
    out.queue(cursor::MoveTo((cols / 2).saturating_sub(time_str.len() as u16 / 2), 0))?;
    out.queue(style::SetForegroundColor(C_HUD_TIME))?;
    out.queue(Print(&time_str))?;

    let lives_str = format!("Lives:{}", "♥".repeat(state.lives as usize));
    let rx = cols.saturating_sub(lives_str.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&lives_str))?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, state: &GameState, rows: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    let debug = if state.debug { "on" } else { "off" };
    out.queue(Print(format!(
        "← → : Run  ↑ : Jump  ↓ : Sit/Dive  ENTER : Roll  D : Hitboxes ({debug})  Q : Quit"
    )))?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(
    out: &mut W,
    state: &GameState,
    result: Outcome,
    cols: u16,
    rows: u16,
) -> std::io::Result<()> {
    let (headline, detail, color) = match result {
        Outcome::Win => (
            "You win!".to_string(),
            format!(
                "You scored {} points! Play again and try to beat your best!",
                state.score
            ),
            Color::Yellow,
        ),
        Outcome::Lose => (
            "You lose...".to_string(),
            format!(
                "You weren't able to beat {} points. Better luck next time!",
                state.config.winning_score
            ),
            Color::Red,
        ),
    };

    let lines: [(&str, Color); 3] = [
        (headline.as_str(), color),
        (detail.as_str(), Color::White),
        ("R - Play Again  Q - Quit", Color::DarkGrey),
    ];

    let cx = cols / 2;
    let start_row = (rows / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (msg, color)) in lines.iter().enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }
    Ok(())
}
