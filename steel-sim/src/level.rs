//! A level holding block entities and ticking them once per frame.

use std::rc::Rc;

use rand::{Rng, SeedableRng, rngs::StdRng};
use rustc_hash::FxHashMap;
use steel_ticking::{Identifier, TickIntervalTable, TickList, TickState, error::ConfigError};

use crate::block_entity::{BlockPos, SimBlockEntity};
use crate::config::SimConfig;

// Random placement stays in a band around sea level.
const MIN_Y: i32 = 60;
const MAX_Y: i32 = 72;

/// What happened during one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Game time of the frame.
    pub frame: u64,
    /// Block entities that were due and ticked.
    pub ticked: usize,
    /// Destroyed block entities dropped from the tick list this frame.
    pub unloaded: usize,
    /// Block entities placed by churn.
    pub spawned: usize,
    /// Block entities destroyed by churn.
    pub destroyed: usize,
}

/// Churn settings of a level.
#[derive(Debug, Clone, Copy, Default)]
struct Churn {
    radius: i32,
    per_frame: u32,
    destroy_chance: f64,
}

/// A level: block entities by position plus the list that ticks them.
///
/// Destroyed block entities are only flagged; they leave the tick list the
/// next time they are due, like vanilla's block entity tickers.
pub struct Level {
    game_time: u64,
    block_entities: FxHashMap<BlockPos, Rc<SimBlockEntity>>,
    ticking: TickList<SimBlockEntity>,
    rng: StdRng,
    spawn_kinds: Vec<Identifier>,
    churn: Churn,
}

impl Level {
    /// Creates an empty level without churn.
    #[must_use]
    pub fn new(intervals: TickIntervalTable, seed: u64, start_frame: u64) -> Self {
        Self {
            game_time: start_frame,
            block_entities: FxHashMap::default(),
            ticking: TickList::new(intervals),
            rng: StdRng::seed_from_u64(seed),
            spawn_kinds: Vec::new(),
            churn: Churn::default(),
        }
    }

    /// Validates `config`, then creates a level and places the configured
    /// population.
    pub fn from_config(config: &SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut level = Self::new(
            config.ticking.interval_table()?,
            config.seed,
            config.start_frame,
        );
        level.churn = Churn {
            radius: config.world_radius,
            per_frame: config.churn_per_frame,
            destroy_chance: config.destroy_chance,
        };

        for entry in &config.population {
            let kind: Identifier = entry.kind.parse()?;
            let mut placed = 0;
            // Collisions with occupied positions are retried a bounded number of times.
            let mut attempts = u64::from(entry.count) * 4;
            while placed < entry.count && attempts > 0 {
                attempts -= 1;
                let pos = level.random_pos();
                if level.add_block_entity(kind.clone(), pos).is_some() {
                    placed += 1;
                }
            }
            if placed < entry.count {
                log::warn!("Only placed {placed} of {} {kind}", entry.count);
            }
            level.spawn_kinds.push(kind);
        }
        Ok(level)
    }

    /// The game time of the next frame.
    #[must_use]
    pub fn game_time(&self) -> u64 {
        self.game_time
    }

    /// The list of ticking block entities.
    #[must_use]
    pub fn ticking(&self) -> &TickList<SimBlockEntity> {
        &self.ticking
    }

    /// The number of block entities in the level, ticking or not.
    #[must_use]
    pub fn block_entity_count(&self) -> usize {
        self.block_entities.len()
    }

    /// The block entity at `pos`.
    #[must_use]
    pub fn block_entity(&self, pos: BlockPos) -> Option<&Rc<SimBlockEntity>> {
        self.block_entities.get(&pos)
    }

    /// Places a block entity and registers it for ticking if its type ticks.
    ///
    /// Returns `None` if `pos` is already occupied.
    pub fn add_block_entity(
        &mut self,
        kind: Identifier,
        pos: BlockPos,
    ) -> Option<Rc<SimBlockEntity>> {
        if self.block_entities.contains_key(&pos) {
            return None;
        }
        let state = TickState::assign(self.ticking.policy(), &kind, &mut self.rng);
        let entity = Rc::new(SimBlockEntity::new(kind, pos, state));
        if !self.ticking.add(&entity) {
            log::trace!("{} at {pos} does not tick", entity.kind());
        }
        self.block_entities.insert(pos, entity.clone());
        Some(entity)
    }

    /// Removes the block entity at `pos` from the level and the tick list
    /// right away.
    pub fn remove_block_entity(&mut self, pos: BlockPos) -> Option<Rc<SimBlockEntity>> {
        let entity = self.block_entities.remove(&pos)?;
        entity.set_removed();
        self.ticking.remove(&entity);
        Some(entity)
    }

    /// Destroys the block entity at `pos`. It stays in the tick list until it
    /// is next due.
    pub fn mark_removed(&mut self, pos: BlockPos) -> bool {
        let Some(entity) = self.block_entities.remove(&pos) else {
            return false;
        };
        entity.set_removed();
        true
    }

    /// Runs one frame: ticks every due block entity, drops destroyed ones from
    /// the tick list, then applies churn and advances game time.
    pub fn tick(&mut self) -> FrameStats {
        let frame = self.game_time;
        let mut stats = FrameStats {
            frame,
            ..FrameStats::default()
        };

        let mut cursor = self.ticking.cursor(frame);
        while let Some(entity) = cursor.next() {
            if entity.is_removed() {
                cursor.remove_current();
                stats.unloaded += 1;
                continue;
            }
            entity.tick(frame);
            stats.ticked += 1;
        }

        self.apply_churn(&mut stats);
        self.game_time = self.game_time.wrapping_add(1);
        stats
    }

    fn apply_churn(&mut self, stats: &mut FrameStats) {
        if self.spawn_kinds.is_empty() {
            return;
        }
        for _ in 0..self.churn.per_frame {
            let pos = self.random_pos();
            if self.block_entities.contains_key(&pos) {
                if self.rng.random_bool(self.churn.destroy_chance) && self.mark_removed(pos) {
                    stats.destroyed += 1;
                }
            } else {
                let index = self.rng.random_range(0..self.spawn_kinds.len());
                let kind = self.spawn_kinds[index].clone();
                if self.add_block_entity(kind, pos).is_some() {
                    stats.spawned += 1;
                }
            }
        }
    }

    fn random_pos(&mut self) -> BlockPos {
        let radius = self.churn.radius.max(1);
        BlockPos::new(
            self.rng.random_range(-radius..=radius),
            self.rng.random_range(MIN_Y..=MAX_Y),
            self.rng.random_range(-radius..=radius),
        )
    }
}

#[cfg(test)]
mod tests {
    use steel_ticking::Tickable;

    use super::*;

    fn level() -> Level {
        Level::new(TickIntervalTable::vanilla(), 9, 0)
    }

    #[test]
    fn test_never_tick_types_are_placed_but_not_ticked() {
        let mut level = level();
        let chest = level
            .add_block_entity(Identifier::vanilla_static("chest"), BlockPos::new(0, 64, 0))
            .expect("free position");
        assert_eq!(level.block_entity_count(), 1);
        assert!(!level.ticking().contains(&chest));

        for _ in 0..100 {
            assert_eq!(level.tick().ticked, 0);
        }
        assert_eq!(chest.tick_count(), 0);
    }

    #[test]
    fn test_occupied_position() {
        let mut level = level();
        let pos = BlockPos::new(1, 2, 3);
        assert!(level.add_block_entity(Identifier::vanilla_static("furnace"), pos).is_some());
        assert!(level.add_block_entity(Identifier::vanilla_static("hopper"), pos).is_none());
        assert_eq!(level.block_entity(pos).map(|e| &*e.kind().path), Some("furnace"));
    }

    #[test]
    fn test_cadence() {
        let mut level = level();
        let furnace = level
            .add_block_entity(Identifier::vanilla_static("furnace"), BlockPos::new(0, 0, 0))
            .expect("free position");
        let beacon = level
            .add_block_entity(Identifier::vanilla_static("beacon"), BlockPos::new(1, 0, 0))
            .expect("free position");

        for _ in 0..160 {
            level.tick();
        }
        assert_eq!(furnace.tick_count(), 160);
        assert_eq!(beacon.tick_count(), 2);
        let last = beacon.last_ticked().expect("ticked");
        assert_eq!(last % 80, u64::from(beacon.tick_state().bucket()));
    }

    #[test]
    fn test_marked_removed_leaves_on_next_due_frame() {
        let mut level = level();
        let pos = BlockPos::new(4, 70, 4);
        let beacon = level
            .add_block_entity(Identifier::vanilla_static("beacon"), pos)
            .expect("free position");
        assert!(level.mark_removed(pos));
        assert!(!level.mark_removed(pos));
        assert!(level.ticking().contains(&beacon));

        let unloaded: usize = (0..80).map(|_| level.tick().unloaded).sum();
        assert_eq!(unloaded, 1);
        assert!(!level.ticking().contains(&beacon));
        assert_eq!(beacon.tick_count(), 0);
    }

    #[test]
    fn test_remove_block_entity_is_immediate() {
        let mut level = level();
        let pos = BlockPos::new(0, 0, 0);
        let hopper = level
            .add_block_entity(Identifier::vanilla_static("hopper"), pos)
            .expect("free position");
        let removed = level.remove_block_entity(pos).expect("present");
        assert!(Rc::ptr_eq(&removed, &hopper));
        assert!(removed.is_removed());
        assert!(level.ticking().is_empty());
        assert_eq!(level.tick(), FrameStats { frame: 0, ..FrameStats::default() });
    }

    #[test]
    fn test_from_config_is_deterministic() {
        let config = SimConfig {
            seed: 5,
            world_radius: 4,
            churn_per_frame: 16,
            destroy_chance: 0.5,
            population: vec![
                crate::config::PopulationEntry {
                    kind: "minecraft:hopper".to_owned(),
                    count: 200,
                },
                crate::config::PopulationEntry {
                    kind: "minecraft:beacon".to_owned(),
                    count: 20,
                },
            ],
            ..SimConfig::default()
        };

        let run = || {
            let mut level = Level::from_config(&config).expect("valid config");
            (0..100).map(|_| level.tick()).collect::<Vec<_>>()
        };
        let first = run();
        assert_eq!(first, run());
        assert!(first.iter().any(|s| s.spawned > 0));
        assert!(first.iter().any(|s| s.destroyed > 0));
        assert_eq!(first[99].frame, 99);
    }

    #[test]
    fn test_from_config_validates() {
        let config = SimConfig {
            world_radius: 1,
            churn_per_frame: 64,
            destroy_chance: 1.5,
            population: vec![crate::config::PopulationEntry {
                kind: "minecraft:hopper".to_owned(),
                count: 5,
            }],
            ..SimConfig::default()
        };
        assert!(matches!(
            Level::from_config(&config),
            Err(ConfigError::Invalid(_))
        ));

        let config = SimConfig {
            destroy_chance: 1.0,
            ..config
        };
        let mut level = Level::from_config(&config).expect("valid config");
        let stats = level.tick();
        assert_eq!(stats.frame, 0);
    }

    #[test]
    fn test_from_config_rejects_bad_kind() {
        let config = SimConfig {
            population: vec![crate::config::PopulationEntry {
                kind: "Not A Kind".to_owned(),
                count: 1,
            }],
            ..SimConfig::default()
        };
        assert!(matches!(
            Level::from_config(&config),
            Err(ConfigError::Identifier(_))
        ));
    }
}
