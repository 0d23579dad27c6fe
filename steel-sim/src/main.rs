//! Runs a block entity ticking simulation from a JSON5 config.

use std::{env, path::PathBuf, time::Instant};

use anyhow::Context;
use steel_sim::config::{DEFAULT_CONFIG_PATH, SimConfig};
use steel_sim::level::Level;

fn main() -> anyhow::Result<()> {
    let path = env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let config = SimConfig::load_or_create(&path)
        .with_context(|| format!("failed to load {}", path.display()))?;
    steel_sim::logging::init(&config.log_level)?;

    let start = Instant::now();
    let mut level = Level::from_config(&config).context("failed to build level")?;
    tracing::info!(
        block_entities = level.block_entity_count(),
        ticking = level.ticking().len(),
        groups = level.ticking().group_count(),
        "Level populated in {:?}",
        start.elapsed()
    );

    let start = Instant::now();
    let summary = steel_sim::run(&mut level, &config);
    let elapsed = start.elapsed();

    tracing::info!(
        frames = summary.frames,
        ticked = summary.ticked,
        peak = summary.peak_ticked,
        spawned = summary.spawned,
        destroyed = summary.destroyed,
        unloaded = summary.unloaded,
        "Finished in {elapsed:?}"
    );
    if summary.frames > 0 {
        let avg = summary.ticked as f64 / summary.frames as f64;
        tracing::info!("Average of {avg:.1} ticks per frame");
    }
    Ok(())
}
