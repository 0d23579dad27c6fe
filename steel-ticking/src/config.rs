//! Configuration of block entity tick intervals.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::{Identifier, TickIntervalTable, error::ConfigError};

/// Tick interval settings, usually embedded in a larger JSON5 config file.
///
/// ```json5
/// {
///     vanilla_intervals: true,
///     intervals: {
///         "minecraft:furnace": 10,
///         "minecraft:chest": -1,
///     },
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TickingConfig {
    /// Start from the built-in table before applying `intervals`.
    pub vanilla_intervals: bool,
    /// Raw interval overrides by block entity type. Bare paths are vanilla.
    pub intervals: BTreeMap<String, i32>,
}

impl Default for TickingConfig {
    fn default() -> Self {
        Self {
            vanilla_intervals: true,
            intervals: BTreeMap::new(),
        }
    }
}

impl TickingConfig {
    /// Parses the settings from a JSON5 document.
    pub fn from_json5(source: &str) -> Result<Self, ConfigError> {
        Ok(serde_json5::from_str(source)?)
    }

    /// Builds the interval table these settings describe.
    pub fn interval_table(&self) -> Result<TickIntervalTable, ConfigError> {
        let mut table = if self.vanilla_intervals {
            TickIntervalTable::vanilla()
        } else {
            TickIntervalTable::new()
        };
        for (kind, &interval) in &self.intervals {
            let kind: Identifier = kind.parse()?;
            if let Some(previous) = table.set(kind.clone(), interval) {
                log::debug!("Tick interval of {kind} overridden: {previous} -> {interval}");
            }
        }
        Ok(table)
    }
}
