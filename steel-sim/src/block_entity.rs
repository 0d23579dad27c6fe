//! Block entities placed in the simulated level.

use std::cell::Cell;
use std::fmt::{self, Display};

use steel_ticking::{Identifier, TickState, Tickable};

/// A block position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockPos {
    /// East-west coordinate.
    pub x: i32,
    /// Height.
    pub y: i32,
    /// North-south coordinate.
    pub z: i32,
}

impl BlockPos {
    /// Creates a block position.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

impl Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.x, self.y, self.z)
    }
}

/// A block entity whose tick only records that it happened.
#[derive(Debug)]
pub struct SimBlockEntity {
    kind: Identifier,
    pos: BlockPos,
    state: TickState,
    ticks: Cell<u64>,
    last_ticked: Cell<Option<u64>>,
    removed: Cell<bool>,
}

impl SimBlockEntity {
    /// Creates a block entity with already assigned tick state.
    #[must_use]
    pub fn new(kind: Identifier, pos: BlockPos, state: TickState) -> Self {
        Self {
            kind,
            pos,
            state,
            ticks: Cell::new(0),
            last_ticked: Cell::new(None),
            removed: Cell::new(false),
        }
    }

    /// The block entity type.
    #[must_use]
    pub fn kind(&self) -> &Identifier {
        &self.kind
    }

    /// Where the block entity is.
    #[must_use]
    pub fn pos(&self) -> BlockPos {
        self.pos
    }

    /// Runs the block entity's update for `frame`.
    pub fn tick(&self, frame: u64) {
        self.ticks.set(self.ticks.get() + 1);
        self.last_ticked.set(Some(frame));
    }

    /// How many times the block entity has been ticked.
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.ticks.get()
    }

    /// The frame of the most recent tick.
    #[must_use]
    pub fn last_ticked(&self) -> Option<u64> {
        self.last_ticked.get()
    }

    /// Returns `true` once the block entity has been destroyed.
    #[must_use]
    pub fn is_removed(&self) -> bool {
        self.removed.get()
    }

    /// Marks the block entity as destroyed.
    pub fn set_removed(&self) {
        self.removed.set(true);
    }
}

impl Tickable for SimBlockEntity {
    fn tick_kind(&self) -> &Identifier {
        &self.kind
    }

    fn tick_state(&self) -> &TickState {
        &self.state
    }
}
