mod display;

use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use side_scroller::compute::{init_state, tick, toggle_debug};
use side_scroller::config::GameConfig;
use side_scroller::entities::{GameState, GameStatus};
use side_scroller::input::{HeldKeys, InputKey};
use side_scroller::render::{AssetTable, Scene};

use display::GlyphTable;

const FRAME: Duration = Duration::from_millis(16); // ≈60 FPS

/// Without key-release events a key counts as held while its last press or
/// repeat arrived within this many frames (≈133 ms).  The OS repeat delay is
/// usually longer than the window, so on such terminals a held key drops out
/// between the first press and the first repeat.
const HOLD_WINDOW: u64 = 8;

#[derive(Parser)]
#[command(name = "side_scroller")]
#[command(about = "Side-scrolling runner: roll and dive through enemies before the clock runs out")]
struct Args {
    /// RON file overriding world settings
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,
    /// Start with hitbox outlines shown
    #[arg(long)]
    debug: bool,
    /// Write tracing output here (filter with RUST_LOG); logging is off without it
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn map_key(code: &KeyCode) -> Option<InputKey> {
    match code {
        KeyCode::Up => Some(InputKey::ArrowUp),
        KeyCode::Down => Some(InputKey::ArrowDown),
        KeyCode::Left => Some(InputKey::ArrowLeft),
        KeyCode::Right => Some(InputKey::ArrowRight),
        KeyCode::Enter => Some(InputKey::Enter),
        _ => None,
    }
}

/// Keys currently held.  When the terminal reports releases a key stays held
/// until its release arrives; otherwise it expires after `HOLD_WINDOW` frames.
fn held_keys(key_frame: &HashMap<InputKey, u64>, frame: u64, releases_reported: bool) -> HeldKeys {
    key_frame
        .iter()
        .filter(|(_, last)| releases_reported || frame.saturating_sub(**last) <= HOLD_WINDOW)
        .map(|(key, _)| *key)
        .collect()
}

// ── Best-score persistence ───────────────────────────────────────────────────

fn best_score_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".side_scroller_score")
}

fn load_best_score() -> Option<i32> {
    std::fs::read_to_string(best_score_path())
        .ok()
        .and_then(|s| s.trim().parse().ok())
}

fn save_best_score(score: i32) {
    let _ = std::fs::write(best_score_path(), score.to_string());
}

// ── Game loop ─────────────────────────────────────────────────────────────────

enum LoopExit {
    Quit,
    Restart,
}

/// Input model: a `key_frame` map records the frame of the last press/repeat
/// event for every game key, so several keys can be held at once.  With
/// `releases_reported` a key is held until its release event; elsewhere it
/// expires after `HOLD_WINDOW` silent frames.
#[allow(clippy::too_many_arguments)]
fn game_loop<W: Write>(
    out: &mut W,
    state: &mut GameState,
    scene: &Scene,
    glyphs: &GlyphTable,
    rng: &mut StdRng,
    rx: &mpsc::Receiver<Event>,
    best_score: Option<i32>,
    releases_reported: bool,
) -> Result<LoopExit> {
    let mut key_frame: HashMap<InputKey, u64> = HashMap::new();
    let mut frame: u64 = 0;
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(Event::Key(KeyEvent { code, kind, modifiers, .. })) = rx.try_recv() {
            match kind {
                KeyEventKind::Press => {
                    if let Some(key) = map_key(&code) {
                        key_frame.insert(key, frame);
                    }
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            return Ok(LoopExit::Quit);
                        }
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(LoopExit::Quit);
                        }
                        KeyCode::Char('r') | KeyCode::Char('R')
                            if state.status == GameStatus::GameOver =>
                        {
                            return Ok(LoopExit::Restart);
                        }
                        KeyCode::Char('d') | KeyCode::Char('D') => {
                            *state = toggle_debug(state);
                        }
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    if let Some(key) = map_key(&code) {
                        key_frame.insert(key, frame);
                    }
                }
                KeyEventKind::Release => {
                    if let Some(key) = map_key(&code) {
                        key_frame.remove(&key);
                    }
                }
            }
        }

        let now = Instant::now();
        let delta_ms = now.duration_since(last).as_secs_f64() * 1000.0;
        last = now;

        // No further frames are simulated once the game is over.
        if state.status == GameStatus::Playing {
            let keys = held_keys(&key_frame, frame, releases_reported);
            *state = tick(state, &keys, delta_ms, rng);
        }

        let commands = scene.draw(state)?;
        display::render(out, state, &commands, glyphs, best_score)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Logs go to `log_file` only.  The game owns the terminal, so without a file
/// no subscriber is installed and events are dropped.
fn init_tracing(log_file: Option<&PathBuf>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = std::fs::File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_file.as_ref())?;

    let config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    // Fail on a bad config before the terminal is switched over.
    init_state(config.clone())?;

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = run(&mut out, &rx, config, rng, args.debug, keyboard_enhanced);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: GameConfig,
    mut rng: StdRng,
    debug: bool,
    releases_reported: bool,
) -> Result<()> {
    let assets = AssetTable::sequential();
    let glyphs = GlyphTable::new(&assets)?;
    let scene = Scene::new(assets);
    let mut best_score = load_best_score();

    loop {
        let mut state = init_state(config.clone())?;
        if debug {
            state = toggle_debug(&state);
        }
        let exit = game_loop(
            out,
            &mut state,
            &scene,
            &glyphs,
            &mut rng,
            rx,
            best_score,
            releases_reported,
        )?;

        info!(score = state.score, lives = state.lives, "run finished");
        if best_score.map_or(true, |best| state.score > best) {
            best_score = Some(state.score);
            save_best_score(state.score);
        }

        if let LoopExit::Quit = exit {
            break;
        }
    }
    Ok(())
}
