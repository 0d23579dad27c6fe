//! Simulation run configuration, stored as JSON5 next to the binary.

use std::{fs, path::Path};

use serde::Deserialize;
use steel_ticking::{TickingConfig, error::ConfigError};

/// The config written on first start.
pub const DEFAULT_CONFIG: &str = include_str!("../../package-content/steel_sim.json5");

/// Where the binary looks for its config when no path is given.
pub const DEFAULT_CONFIG_PATH: &str = "steel_sim.json5";

/// How many block entities of one type to place before the first frame.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PopulationEntry {
    /// Block entity type, e.g. `minecraft:hopper`.
    pub kind: String,
    /// Number of block entities.
    pub count: u32,
}

/// Settings of one simulation run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SimConfig {
    /// Seed for placement, bucket assignment and churn.
    pub seed: u64,
    /// Number of frames to run.
    pub frames: u64,
    /// Game time of the first frame.
    #[serde(default)]
    pub start_frame: u64,
    /// Frames between two progress reports.
    pub report_every: u64,
    /// Log filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Radius of the square block entities are placed in.
    pub world_radius: i32,
    /// Random positions visited per frame for spawning and destroying.
    pub churn_per_frame: u32,
    /// Chance that a visited, occupied position is destroyed.
    pub destroy_chance: f64,
    /// Initial block entities.
    #[serde(default)]
    pub population: Vec<PopulationEntry>,
    /// Tick interval settings.
    #[serde(default)]
    pub ticking: TickingConfig,
}

fn default_log_level() -> String {
    "info".to_owned()
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            frames: 0,
            start_frame: 0,
            report_every: 1,
            log_level: default_log_level(),
            world_radius: 16,
            churn_per_frame: 0,
            destroy_chance: 0.0,
            population: Vec::new(),
            ticking: TickingConfig::default(),
        }
    }
}

impl SimConfig {
    /// Parses and validates a config from a JSON5 document.
    pub fn from_json5(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json5::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the config at `path`, writing the default one there first if
    /// it does not exist.
    pub fn load_or_create(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, DEFAULT_CONFIG)?;
            log::info!("Wrote default config to {}", path.display());
        }
        Self::from_json5(&fs::read_to_string(path)?)
    }

    /// Checks that every value is in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.report_every == 0 {
            return Err(ConfigError::Invalid("report_every must be at least 1"));
        }
        if !(1..=30_000_000).contains(&self.world_radius) {
            return Err(ConfigError::Invalid("world_radius must be in range 1..30000000"));
        }
        if !(0.0..=1.0).contains(&self.destroy_chance) {
            return Err(ConfigError::Invalid("destroy_chance must be between 0 and 1"));
        }
        Ok(())
    }
}
