mod config;
mod driver;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use riverside_core::{World, WorldParams};

use crate::driver::{log_counts, TickDriver};

/// Headless run of the riverside epidemic.
#[derive(clap::Parser)]
struct Args {
    /// JSON file with world parameters (camelCase keys).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for the world's generator; drawn from entropy when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Stop after this many ticks; 0 runs until nobody is infected.
    /// The count history grows by one row per tick, so with reinfection
    /// enabled a 0 run may never end; set a limit for unattended runs.
    #[arg(long, default_value_t = 0)]
    ticks: u64,
    /// Overrides the population; the initial infected count is lowered to
    /// fit when needed.
    #[arg(long)]
    population: Option<usize>,
    /// Sleep between ticks to hold the configured tick rate.
    #[arg(long)]
    realtime: bool,
    #[arg(long, default_value_t = 30)]
    report_every: u64,
    /// Write the per-tick health counts to this CSV file at the end.
    #[arg(long)]
    export: Option<PathBuf>,
    #[arg(long, default_value = "info")]
    log_level: tracing::Level,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    let mut params = match &args.config {
        Some(path) => config::load_params(path)?,
        None => WorldParams::default(),
    };
    if let Some(n) = args.population {
        params = config::with_population(params, n);
    }
    let seed = args.seed.unwrap_or_else(rand::random);

    let world = World::new(params, seed).context("invalid world parameters")?;
    let arena = world.params().arena;
    tracing::info!(
        seed,
        population = world.agents().len(),
        river = ?arena.river_rect(),
        bridge = ?arena.bridge_rect(),
        "world ready"
    );
    tracing::debug!(food = ?world.food_points());

    let mut driver = TickDriver::new(world, args.realtime, args.report_every);
    let summary = driver.run(args.ticks);
    log_counts(summary.ticks, &summary.counts);
    if !summary.ended {
        tracing::info!(ticks = summary.ticks, "tick limit reached");
    }

    if let Some(path) = &args.export {
        driver
            .world()
            .export(path)
            .with_context(|| format!("cannot export history to {}", path.display()))?;
        tracing::info!(path = %path.display(), "history exported");
    }
    Ok(())
}
