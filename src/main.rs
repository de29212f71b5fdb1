//! MULTITRIS - headless demo
//!
//! Plays one session with a random autopilot and prints a JSON report.

use clap::Parser;
use multitris::{Action, EventLog, GameHost, GameMode, GameState, Settings};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::path::PathBuf;

/// Simulated frame length, roughly 60 FPS
const DEFAULT_FRAME_MS: u64 = 16;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Mode to play (classic, trio, pento, circular, gravity-flip, mirror)
    #[arg(short, long)]
    mode: Option<GameMode>,
    /// Seed for the piece sequence and the autopilot
    #[arg(short, long)]
    seed: Option<u64>,
    /// Frames to simulate before stopping
    #[arg(long, default_value_t = 3_600)]
    frames: u32,
    /// Simulated milliseconds per frame
    #[arg(
        long = "frame-ms",
        value_name = "MILLISECONDS",
        default_value_t = DEFAULT_FRAME_MS,
        value_parser = clap::value_parser!(u64).range(1..=10_000)
    )]
    frame_ms: u64,
    /// Settings file to use instead of the one in the config directory
    #[arg(long, value_name = "PATH")]
    settings: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct Report {
    seed: u64,
    frames: u32,
    elapsed_ms: u64,
    state: Option<GameState>,
    events: multitris::sink::EventCounts,
}

/// Get the multitris temp directory, creating it if needed
fn multitris_temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join("multitris");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

/// Pick the autopilot's input for one frame, if any
fn autopilot(rng: &mut ChaCha8Rng) -> Option<Action> {
    match rng.gen_range(0..12) {
        0 | 1 => Some(Action::MoveLeft),
        2 | 3 => Some(Action::MoveRight),
        4 => Some(Action::RotateCW),
        5 => Some(Action::RotateCCW),
        6 => Some(Action::MoveDown),
        7 => Some(Action::HardDrop),
        _ => None,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let run_id: u32 = rand::random();
    let log_dir = multitris_temp_dir();
    let log_file = format!("{:08x}.log", run_id);

    // Setup tracing to log file
    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("multitris=debug")),
        )
        .with_ansi(false)
        .init();

    tracing::info!("MULTITRIS starting up, run={:08x}, log={}", run_id, log_dir.join(&log_file).display());

    let mut settings = match &args.settings {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load(),
    };
    if let Some(mode) = args.mode {
        settings.gameplay.default_mode = mode;
    }
    let seed = args
        .seed
        .or(settings.gameplay.seed)
        .unwrap_or_else(rand::random);
    settings.gameplay.seed = Some(seed);

    let mut autopilot_rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(1));
    let mut host = GameHost::new(settings, EventLog::new());

    let mut now = 0;
    let mut frames = 0;
    while frames < args.frames {
        if host.state().is_none_or(|s| s.game_over) {
            break;
        }
        if let Some(action) = autopilot(&mut autopilot_rng) {
            host.apply(action);
        }
        now += args.frame_ms;
        host.update(now);
        frames += 1;
    }

    let state = host.state();
    if let Some(state) = state {
        tracing::info!(
            "Finished after {} frames: score={} level={} lines={} game_over={}",
            frames,
            state.score,
            state.level,
            state.lines,
            state.game_over
        );
    }
    let events = host.into_sink().map(|log| log.counts()).unwrap_or_default();

    let report = Report {
        seed,
        frames,
        elapsed_ms: now,
        state,
        events,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
