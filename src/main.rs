mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use space_invaders::{Command, Control, Controls, Cue, Preset, Session};

#[derive(Parser)]
#[command(name = "space_invaders")]
#[command(about = "Terminal Space Invaders")]
struct Args {
    /// Difficulty preset: Easy, Normal or Hard (unknown names mean Normal)
    #[arg(short, long, default_value = "Normal")]
    difficulty: String,

    /// Sound volume between 0.0 and 1.0
    #[arg(short, long, default_value_t = space_invaders::session::DEFAULT_VOLUME)]
    volume: f32,

    /// Seed the game RNG for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Frames per second
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Where to write the log (the terminal is busy with the game)
    #[arg(long, default_value = "space_invaders.log")]
    log_file: PathBuf,
}

// ── Simultaneous-input model ─────────────────────────────────────────────────

/// A key counts as held if its last press/repeat event arrived within this
/// many frames. Covers terminals that never report key releases: OS
/// key-repeat runs at ≥ 15 Hz, so the window is refreshed before it lapses.
const HOLD_WINDOW: u64 = 8;

const VOLUME_STEP: f32 = 0.05;

fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn held_controls(key_frame: &HashMap<KeyCode, u64>, frame: u64) -> Controls {
    let any = |keys: &[KeyCode]| keys.iter().any(|k| is_held(key_frame, k, frame));
    let mut controls = Controls::empty();
    if any(&[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')]) {
        controls.insert(Control::MoveLeft);
    }
    if any(&[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')]) {
        controls.insert(Control::MoveRight);
    }
    if any(&[KeyCode::Char(' ')]) {
        controls.insert(Control::Fire);
    }
    controls
}

// ── Audio ────────────────────────────────────────────────────────────────────

/// The only sound a terminal can make: the bell, rung when the game ends.
struct TerminalBell;

impl TerminalBell {
    fn play<W: Write>(&self, out: &mut W, cues: &[Cue], volume: f32) -> std::io::Result<()> {
        if volume > 0.0 && cues.contains(&Cue::GameOver) {
            out.write_all(b"\x07")?;
        }
        Ok(())
    }
}

// ── Screens ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Screen {
    Menu { focus: usize },
    Settings { focus: usize },
    Playing,
}

/// Returns `true` to quit the program.
fn handle_menu_key(screen: &mut Screen, focus: usize, code: KeyCode, session: &mut Session) -> bool {
    let items = display::MENU_ITEMS.len();
    match code {
        KeyCode::Up | KeyCode::Char('w') => {
            *screen = Screen::Menu {
                focus: (focus + items - 1) % items,
            }
        }
        KeyCode::Down | KeyCode::Char('s') => {
            *screen = Screen::Menu {
                focus: (focus + 1) % items,
            }
        }
        KeyCode::Enter | KeyCode::Char(' ') => match focus {
            0 => {
                session.apply(Command::StartGame);
                *screen = Screen::Playing;
            }
            1 => *screen = Screen::Settings { focus: 0 },
            _ => return true,
        },
        KeyCode::Esc => return true,
        _ => {}
    }
    false
}

/// Settings slots: 0..=2 difficulty buttons, 3 back, 4 volume slider.
fn handle_settings_key(screen: &mut Screen, focus: usize, code: KeyCode, session: &mut Session) {
    let adjust_volume = |session: &mut Session, delta: f32| {
        let stepped = ((session.volume() + delta) * 100.0).round() / 100.0;
        session.apply(Command::SetVolume(stepped));
    };
    match code {
        KeyCode::Left | KeyCode::Char('a') if focus == 4 => adjust_volume(session, -VOLUME_STEP),
        KeyCode::Right | KeyCode::Char('d') if focus == 4 => adjust_volume(session, VOLUME_STEP),
        KeyCode::Left | KeyCode::Char('a') => {
            *screen = Screen::Settings {
                focus: (focus + 4) % 5,
            }
        }
        KeyCode::Right | KeyCode::Char('d') => {
            *screen = Screen::Settings {
                focus: (focus + 1) % 5,
            }
        }
        KeyCode::Up | KeyCode::Char('w') if focus >= 3 => *screen = Screen::Settings { focus: 1 },
        KeyCode::Down | KeyCode::Char('s') if focus < 3 => *screen = Screen::Settings { focus: 3 },
        KeyCode::Enter | KeyCode::Char(' ') => match focus {
            0..=2 => {
                let name = Preset::ALL[focus].name().to_string();
                session.apply(Command::SetDifficulty(name));
            }
            3 => *screen = Screen::Menu { focus: 1 },
            _ => {}
        },
        KeyCode::Esc => *screen = Screen::Menu { focus: 1 },
        _ => {}
    }
}

// ── Main loop ────────────────────────────────────────────────────────────────

/// Input model: rather than acting on each key event, a `key_frame` map
/// records the frame of the last press/repeat of every key, and each frame
/// the still-fresh keys become the held `Controls`. That lets Space and a
/// direction be held together.
fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    session: &mut Session,
    fps: u32,
) -> anyhow::Result<()> {
    let frame_budget = Duration::from_secs(1) / fps.max(1);
    let clock = Instant::now();
    let bell = TerminalBell;

    let mut screen = Screen::Menu { focus: 0 };
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // Drain all pending input events (non-blocking)
        while let Ok(event) = rx.try_recv() {
            let Event::Key(KeyEvent {
                code, kind, modifiers, ..
            }) = event
            else {
                continue;
            };
            match kind {
                KeyEventKind::Press => {
                    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
                        return Ok(());
                    }
                    if matches!(code, KeyCode::Char('q') | KeyCode::Char('Q')) {
                        return Ok(());
                    }
                    match screen {
                        Screen::Menu { focus } => {
                            if handle_menu_key(&mut screen, focus, code, session) {
                                return Ok(());
                            }
                        }
                        Screen::Settings { focus } => {
                            handle_settings_key(&mut screen, focus, code, session)
                        }
                        Screen::Playing => {
                            key_frame.insert(code, frame);
                            if session.is_game_over() {
                                match code {
                                    KeyCode::Enter => session.apply(Command::Restart),
                                    KeyCode::Esc => screen = Screen::Menu { focus: 0 },
                                    _ => {}
                                }
                            } else if code == KeyCode::Esc {
                                screen = Screen::Menu { focus: 0 };
                            }
                        }
                    }
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        let (width, height) = terminal::size()?;
        match screen {
            Screen::Menu { focus } => display::render_menu(out, focus, width, height)?,
            Screen::Settings { focus } => display::render_settings(
                out,
                focus,
                session.preset(),
                session.volume(),
                width,
                height,
            )?,
            Screen::Playing => {
                let now = clock.elapsed().as_millis() as u64;
                session.update(now, held_controls(&key_frame, frame));
                display::render_game(out, session, width, height)?;
            }
        }
        bell.play(out, &session.drain_cues(), session.volume())?;
        out.flush()?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_budget {
            thread::sleep(frame_budget - elapsed);
        }
    }
}

// ── Entry point ──────────────────────────────────────────────────────────────

fn init_tracing(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_file)?;

    let preset = Preset::from_name_or_default(&args.difficulty);
    if !args.difficulty.eq_ignore_ascii_case(preset.name()) {
        warn!(requested = %args.difficulty, "unknown difficulty, using {preset}");
    }
    let mut session = match args.seed {
        Some(seed) => Session::with_seed(preset, seed),
        None => Session::new(preset),
    };
    session.apply(Command::SetVolume(args.volume));
    info!(%preset, volume = session.volume(), seed = ?args.seed, "starting");

    let mut out = BufWriter::new(stdout());
    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Ask for key-release (and key-repeat) events. Kitty-protocol terminals
    // support this; the rest fall back to the hold window.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicated thread for blocking event reads so the frame loop never
    // waits on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = run(&mut out, &rx, &mut session, args.fps);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    info!(score = session.score(), level = session.level(), "exiting");
    result
}
