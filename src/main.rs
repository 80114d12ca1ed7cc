//! Light Cycles entry point
//!
//! Parses flags, sets up logging and the terminal, then runs the frame loop.

use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use clap::Parser;
use crossterm::{
    ExecutableCommand, cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal,
};
use glam::Vec2;

use light_cycles::input::{InputEvent, Key};
use light_cycles::render::TerminalRenderer;
use light_cycles::{Game, GameError, GameResult, HighScores, Settings};

const FRAME: Duration = Duration::from_millis(16);

/// Two-player light-cycle arcade game
#[derive(Parser, Debug)]
#[command(name = "light-cycles", version, about)]
struct Cli {
    /// Use the whole terminal instead of a fixed viewport
    #[arg(long)]
    fullscreen: bool,

    /// Rotate output 90 degrees for a portrait cabinet
    #[arg(long)]
    rotate: bool,

    /// High score file
    #[arg(long, default_value = "highscores.json")]
    scores: PathBuf,

    /// Optional JSON file with tuning overrides
    #[arg(long)]
    settings: Option<PathBuf>,

    /// RNG seed (defaults to the clock)
    #[arg(long)]
    seed: Option<u64>,

    /// Write log output to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(log_file: Option<&Path>) -> GameResult<()> {
    let env = env_logger::Env::default().default_filter_or("info");
    let mut builder = env_logger::Builder::from_env(env);
    if let Some(path) = log_file {
        let file = File::create(path).map_err(|source| GameError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

/// Translate a terminal key event; key repeats are dropped
fn map_key(key: &KeyEvent) -> Option<InputEvent> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(InputEvent::Quit);
    }
    let code = match key.code {
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Escape,
        KeyCode::Char(' ') => Key::Space,
        KeyCode::Char(c) => Key::Char(c.to_ascii_lowercase()),
        _ => return None,
    };
    match key.kind {
        KeyEventKind::Press => Some(InputEvent::KeyDown(code)),
        KeyEventKind::Release => Some(InputEvent::KeyUp(code)),
        KeyEventKind::Repeat => None,
    }
}

fn run<W: Write>(
    game: &mut Game,
    renderer: &mut TerminalRenderer<W>,
    rx: &mpsc::Receiver<Event>,
    rotate: bool,
) -> GameResult<()> {
    let mut last = Instant::now();
    while game.is_running() {
        let frame_start = Instant::now();

        while let Ok(ev) = rx.try_recv() {
            if let Event::Key(key) = ev {
                if let Some(input) = map_key(&key) {
                    game.handle(&input);
                }
            }
        }

        let dt = frame_start.duration_since(last).as_secs_f32() * 1000.0;
        last = frame_start;
        game.update(dt);
        renderer.present(&game.draw(rotate))?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
    Ok(())
}

fn main() -> GameResult<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let settings = cli
        .settings
        .as_deref()
        .map(Settings::load)
        .unwrap_or_default();
    let scores = HighScores::load(&cli.scores);
    let seed = cli.seed.unwrap_or_else(clock_seed);
    log::info!("Light Cycles starting (seed {})", seed);

    let logical = if cli.rotate {
        Vec2::new(settings.arena_height, settings.arena_width)
    } else {
        Vec2::new(settings.arena_width, settings.arena_height)
    };
    let mut game = Game::new(settings, scores, cli.scores.clone(), seed);

    let mut out = BufWriter::new(stdout());
    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Release events need the keyboard enhancement protocol; other
    // terminals only ever report presses.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = {
        let mut renderer = TerminalRenderer::new(&mut out, cli.fullscreen, logical);
        run(&mut game, &mut renderer, &rx, cli.rotate)
    };

    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &result {
        log::error!("{}", e);
    }
    log::info!("Light Cycles exiting");
    result
}
