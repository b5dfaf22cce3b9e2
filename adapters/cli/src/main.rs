#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Pathforge session.

mod autobuild;
mod clock;
mod scenario;
mod session;

use std::{path::PathBuf, time::Duration};

use anyhow::Result;
use clap::{Parser, ValueEnum};
use pathforge_core::Difficulty;
use pathforge_persistence::JsonFileProgressStore;
use pathforge_world::World;
use tracing_subscriber::EnvFilter;

use crate::{
    autobuild::AutoBuilder,
    scenario::Scenario,
    session::{SessionConfig, SessionSummary},
};

const DEFAULT_MAX_TICKS: u64 = 36_000;
const AUTO_BUILD_TOWER_CAP: usize = 12;

/// Runs a Pathforge session without a display.
#[derive(Debug, Parser)]
#[command(name = "pathforge", version)]
struct Args {
    /// Difficulty of the session; overrides the scenario file.
    #[arg(long, value_enum)]
    difficulty: Option<DifficultyArg>,
    /// Play in sandbox mode with a free economy.
    #[arg(long)]
    sandbox: bool,
    /// TOML scenario describing the opening build.
    #[arg(long, value_name = "FILE")]
    scenario: Option<PathBuf>,
    /// JSON file used to load and save meta-progression.
    #[arg(long, value_name = "FILE")]
    progress: Option<PathBuf>,
    /// Simulation ticks to run before stopping; overrides the scenario file.
    #[arg(long)]
    max_ticks: Option<u64>,
    /// Simulated wall-clock milliseconds per host frame.
    #[arg(long, default_value_t = 33, value_parser = clap::value_parser!(u64).range(1..=1000))]
    frame_ms: u64,
    /// Spend gold on randomly placed towers beside the path.
    #[arg(long)]
    auto_build: bool,
    /// Seed for the auto-builder.
    #[arg(long, default_value_t = 0x5eed, requires = "auto_build")]
    seed: u64,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DifficultyArg {
    Easy,
    Medium,
    Hard,
    Endless,
}

impl From<DifficultyArg> for Difficulty {
    fn from(value: DifficultyArg) -> Self {
        match value {
            DifficultyArg::Easy => Self::Easy,
            DifficultyArg::Medium => Self::Medium,
            DifficultyArg::Hard => Self::Hard,
            DifficultyArg::Endless => Self::Endless,
        }
    }
}

/// Entry point for the Pathforge command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let scenario = match &args.scenario {
        Some(path) => Scenario::load(path)?,
        None => Scenario::default(),
    };

    let mut world = match &args.progress {
        Some(path) => World::with_store(Box::new(JsonFileProgressStore::new(path))),
        None => World::new(),
    };

    let config = SessionConfig {
        difficulty: args
            .difficulty
            .map(Difficulty::from)
            .or(scenario.difficulty)
            .unwrap_or(Difficulty::Medium),
        sandbox: args.sandbox,
        towers: scenario.towers,
        max_ticks: args
            .max_ticks
            .or(scenario.max_ticks)
            .unwrap_or(DEFAULT_MAX_TICKS),
        frame: Duration::from_millis(args.frame_ms),
        auto_build: args
            .auto_build
            .then(|| AutoBuilder::new(args.seed, AUTO_BUILD_TOWER_CAP)),
    };

    let summary = session::run(&mut world, config);
    print_summary(&summary);
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn print_summary(summary: &SessionSummary) {
    if let Some(outcome) = summary.outcome {
        println!("outcome:       {outcome:?}");
    }
    println!("ticks:         {}", summary.ticks);
    println!("waves cleared: {}", summary.waves_cleared);
    println!("kills:         {}", summary.kills);
    println!("leaks:         {}", summary.leaks);
    println!("towers:        {}", summary.towers);
    println!("gold:          {}", summary.gold);
    println!("base health:   {}", summary.base_health);
    println!("menu coins:    {}", summary.menu_coins);
    if let Some(digest) = summary.digest {
        println!("state digest:  {digest}");
    }
}
