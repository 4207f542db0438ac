mod display;

use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{self, Event},
    terminal, ExecutableCommand,
};

use bubble_trouble::compute::{begin_level, new_game_at, tick};
use bubble_trouble::config::GameConfig;
use bubble_trouble::entities::{InputAction, KeyInput, Phase};
use bubble_trouble::input::key_input;

/// Split every bubble before the clock runs out.
#[derive(Parser, Debug)]
#[command(name = "bubble_trouble", version)]
struct Args {
    /// TOML file overriding the built-in tuning and level layouts.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Level to start on (1-based).
    #[arg(long, default_value_t = 1)]
    level: u32,
    /// Write log output to this file.  Nothing is logged without it, since
    /// the game owns the terminal.
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Log filter, e.g. `debug` or `bubble_trouble=trace`.  `RUST_LOG` wins.
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn init_logging(args: &Args) -> Result<()> {
    let Some(path) = &args.log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    env_logger::Builder::new()
        .parse_filters(&args.log_level)
        .parse_env("RUST_LOG")
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .context("installing logger")?;
    Ok(())
}

// ── Event source ──────────────────────────────────────────────────────────────

/// Non-blocking: at most one pending event is consumed per call.
fn poll_key(rx: &mpsc::Receiver<Event>) -> Option<KeyInput> {
    rx.try_recv().ok().as_ref().and_then(key_input)
}

/// Blocks until a key is pressed.  `None` if the reader thread has gone away.
fn wait_for_key(rx: &mpsc::Receiver<Event>) -> Option<KeyInput> {
    loop {
        match rx.recv() {
            Ok(ev) => {
                if let Some(key) = key_input(&ev) {
                    return Some(key);
                }
            }
            Err(_) => return None,
        }
    }
}

// ── Frame driver ──────────────────────────────────────────────────────────────

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    cfg: &GameConfig,
    start_level: u32,
) -> Result<()> {
    let frame = Duration::from_secs_f64(cfg.timing.step_time);
    let mut state = new_game_at(start_level, cfg);

    loop {
        match state.phase {
            Phase::LevelIntro => {
                display::render(out, &state, cfg)?;
                if wait_for_key(rx).is_none() {
                    return Ok(());
                }
                state = begin_level(&state, cfg);
            }
            Phase::Playing => {
                let frame_start = Instant::now();

                let key = poll_key(rx);
                if matches!(key, Some(KeyInput { action: InputAction::Quit, .. })) {
                    log::info!("Quit on level {}", state.level);
                    return Ok(());
                }

                state = tick(&state, key, cfg);
                display::render(out, &state, cfg)?;

                let elapsed = frame_start.elapsed();
                if elapsed < frame {
                    thread::sleep(frame - elapsed);
                }
            }
            Phase::Victory | Phase::Defeat => {
                display::render(out, &state, cfg)?;
                wait_for_key(rx);
                return Ok(());
            }
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let cfg = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    cfg.check_start_level(args.level)?;

    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode().context("enabling raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the frame loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = run(&mut out, &rx, &cfg, args.level);

    // Always restore the terminal
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}
