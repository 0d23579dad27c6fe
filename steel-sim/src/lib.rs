//! # Steel Sim
//!
//! A frame loop driving a [`steel_ticking::TickList`] over a churning
//! population of block entities.

use crate::config::SimConfig;
use crate::level::{FrameStats, Level};

pub mod block_entity;
pub mod config;
pub mod level;
pub mod logging;

/// Totals over a whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Frames simulated.
    pub frames: u64,
    /// Ticks run across all frames.
    pub ticked: u64,
    /// Destroyed block entities dropped from the tick list.
    pub unloaded: u64,
    /// Block entities placed by churn.
    pub spawned: u64,
    /// Block entities destroyed by churn.
    pub destroyed: u64,
    /// The largest number of ticks in a single frame.
    pub peak_ticked: usize,
}

impl RunSummary {
    fn record(&mut self, stats: &FrameStats) {
        self.frames += 1;
        self.ticked += stats.ticked as u64;
        self.unloaded += stats.unloaded as u64;
        self.spawned += stats.spawned as u64;
        self.destroyed += stats.destroyed as u64;
        self.peak_ticked = self.peak_ticked.max(stats.ticked);
    }
}

/// Runs `config.frames` frames on `level`, reporting progress every
/// `config.report_every` frames.
pub fn run(level: &mut Level, config: &SimConfig) -> RunSummary {
    let span = tracing::info_span!("simulation", seed = config.seed);
    let _enter = span.enter();

    let mut summary = RunSummary::default();
    for i in 1..=config.frames {
        let stats = level.tick();
        summary.record(&stats);
        tracing::trace!(
            frame = stats.frame,
            ticked = stats.ticked,
            unloaded = stats.unloaded,
            "frame done"
        );

        if i % config.report_every == 0 {
            tracing::info!(
                frame = stats.frame,
                ticked = stats.ticked,
                ticking = level.ticking().len(),
                block_entities = level.block_entity_count(),
                groups = level.ticking().group_count(),
                "progress"
            );
        }
    }
    summary
}
