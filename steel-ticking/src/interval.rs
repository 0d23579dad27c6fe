//! Tick interval policy: how often a block entity type is ticked.
//!
//! An interval is the number of frames between two updates of the same
//! object. Raw intervals may be negative (never tick), zero (treated as every
//! frame) or positive.

use rustc_hash::FxHashMap;

use crate::Identifier;

/// Interval used for types without an explicit entry.
pub const DEFAULT_INTERVAL: i32 = 1;

/// Raw interval marking a type that is never ticked.
pub const NEVER_TICK: i32 = -1;

/// Resolves the raw tick interval of an object type.
///
/// Implementations must be pure: the scheduler queries the policy at most once
/// per object and caches the answer on the object.
pub trait IntervalPolicy {
    /// Returns the raw interval for `kind`. Unknown kinds are not an error.
    fn resolve(&self, kind: &Identifier) -> i32;
}

impl<F> IntervalPolicy for F
where
    F: Fn(&Identifier) -> i32,
{
    fn resolve(&self, kind: &Identifier) -> i32 {
        self(kind)
    }
}

/// Converts a raw interval into a usable one.
///
/// Negative values mean "never schedule" and yield `None`; zero is normalized
/// to one.
#[must_use]
pub const fn normalize_interval(raw: i32) -> Option<u32> {
    match raw {
        0 => Some(1),
        n if n < 0 => None,
        n => Some(n as u32),
    }
}

// Block entities whose tick does nothing; ticking them only costs time.
// Note blocks used to be listed too, but they no longer have a block entity.
const VANILLA_NEVER_TICK: [&str; 10] = [
    "jukebox",
    "dispenser",
    "dropper",
    "sign",
    "end_portal",
    "command_block",
    "skull",
    "comparator",
    "flower_pot",
    "chest",
];

// Types that only need to run every few frames. Beacons and daylight
// detectors already skip work in vanilla on the frames left out here.
const VANILLA_SLOWED: [(&str, i32); 4] = [
    ("ender_chest", 80),
    ("enchanting_table", 20),
    ("beacon", 80),
    ("daylight_detector", 20),
];

/// A fixed lookup table from block entity type to raw tick interval.
///
/// Types without an entry tick every frame.
#[derive(Debug, Clone, Default)]
pub struct TickIntervalTable {
    intervals: FxHashMap<Identifier, i32>,
}

impl TickIntervalTable {
    /// Creates an empty table where every type ticks every frame.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the table of built-in vanilla intervals.
    #[must_use]
    pub fn vanilla() -> Self {
        let mut table = Self::new();
        for path in VANILLA_NEVER_TICK {
            table.set(Identifier::vanilla_static(path), NEVER_TICK);
        }
        for (path, interval) in VANILLA_SLOWED {
            table.set(Identifier::vanilla_static(path), interval);
        }
        table
    }

    /// Sets the raw interval for `kind`, returning the previous entry.
    pub fn set(&mut self, kind: Identifier, interval: i32) -> Option<i32> {
        self.intervals.insert(kind, interval)
    }

    /// Returns the explicit entry for `kind`, if any.
    #[must_use]
    pub fn get(&self, kind: &Identifier) -> Option<i32> {
        self.intervals.get(kind).copied()
    }

    /// Returns the number of explicit entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Returns `true` if the table has no explicit entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }
}

impl IntervalPolicy for TickIntervalTable {
    fn resolve(&self, kind: &Identifier) -> i32 {
        self.get(kind).unwrap_or(DEFAULT_INTERVAL)
    }
}

impl Extend<(Identifier, i32)> for TickIntervalTable {
    fn extend<I: IntoIterator<Item = (Identifier, i32)>>(&mut self, iter: I) {
        self.intervals.extend(iter);
    }
}

impl FromIterator<(Identifier, i32)> for TickIntervalTable {
    fn from_iter<I: IntoIterator<Item = (Identifier, i32)>>(iter: I) -> Self {
        let mut table = Self::new();
        table.extend(iter);
        table
    }
}
