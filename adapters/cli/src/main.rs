#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless command-line adapter that plays a Force Field level on autopilot
//! and prints the rendered view as text.

mod ascii;
mod level;
mod session;
mod settings;

use std::{io, path::PathBuf};

use anyhow::{Context, Result as AnyResult};
use clap::{Parser, ValueEnum};
use force_field_core::Difficulty;
use force_field_rendering::RenderingBackend;
use force_field_world::query;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    ascii::AsciiBackend,
    level::LevelFile,
    session::{Autopilot, Session},
    settings::Settings,
};

/// Command line options of the headless runner.
#[derive(Debug, Parser)]
#[command(name = "force-field", about = "Plays a Force Field level headlessly")]
struct Args {
    /// TOML file with balance and view overrides.
    #[arg(long)]
    config: Option<PathBuf>,
    /// TOML level file; the built-in compound is used when omitted.
    #[arg(long)]
    level: Option<PathBuf>,
    /// Maximum number of ticks to simulate.
    #[arg(long, default_value_t = 1_800)]
    ticks: u64,
    /// Seed overriding the one stored in the level.
    #[arg(long)]
    seed: Option<u64>,
    /// Print a frame every N ticks; zero disables frames.
    #[arg(long, default_value_t = 120)]
    frame_every: u64,
    /// Difficulty overriding the one stored in the level.
    #[arg(long, value_enum)]
    difficulty: Option<DifficultyArg>,
    /// Width of printed frames in characters.
    #[arg(long, default_value_t = 80)]
    width: usize,
    /// Height of printed frames in lines.
    #[arg(long, default_value_t = 24)]
    rows: usize,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DifficultyArg {
    Easy,
    Normal,
    Hard,
    Nightmare,
}

impl From<DifficultyArg> for Difficulty {
    fn from(value: DifficultyArg) -> Self {
        match value {
            DifficultyArg::Easy => Self::Easy,
            DifficultyArg::Normal => Self::Normal,
            DifficultyArg::Hard => Self::Hard,
            DifficultyArg::Nightmare => Self::Nightmare,
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}

/// Entry point for the Force Field command-line interface.
fn main() -> AnyResult<()> {
    init_tracing();
    let args = Args::parse();

    let settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let level = match &args.level {
        Some(path) => LevelFile::load(path)?,
        None => LevelFile::builtin().context("built-in level is invalid")?,
    };
    let layout = level
        .into_layout(args.difficulty.map(Difficulty::from), args.seed)
        .context("level failed validation")?;

    let mut session = Session::new(settings.world, settings.view);
    println!("{}", query::welcome_banner(session.world()));
    let loaded = session.load(layout);
    info!(events = loaded.len(), "level ready");

    let stdout = io::stdout();
    let mut backend = AsciiBackend::new(stdout.lock(), args.width, args.rows);
    let summary = session.run(
        &mut Autopilot::default(),
        args.ticks,
        args.frame_every,
        &mut backend,
    )?;
    backend.finish()?;

    println!(
        "{:?} after {} ticks: {} kills, {} points, {} health left",
        summary.outcome, summary.ticks, summary.kills, summary.score, summary.health
    );
    Ok(())
}
