//! # Steel Ticking
//!
//! Amortized ticking of block entities.
//!
//! Instead of updating every block entity on every frame, each one gets a
//! tick interval from an [`IntervalPolicy`] and a fixed bucket inside that
//! interval. A [`TickList`] files members by `(type, interval, bucket)` so the
//! members due on a frame (`frame % interval == bucket`) can be walked
//! directly, with O(1) add and remove.
//!
//! ```
//! use std::rc::Rc;
//! use steel_ticking::{Identifier, TickIntervalTable, TickList, TickState, Tickable};
//!
//! struct Beacon {
//!     kind: Identifier,
//!     state: TickState,
//! }
//!
//! impl Tickable for Beacon {
//!     fn tick_kind(&self) -> &Identifier {
//!         &self.kind
//!     }
//!     fn tick_state(&self) -> &TickState {
//!         &self.state
//!     }
//! }
//!
//! let mut list = TickList::new(TickIntervalTable::vanilla());
//! let beacon = Rc::new(Beacon {
//!     kind: Identifier::vanilla_static("beacon"),
//!     state: TickState::new(3),
//! });
//! assert!(list.add(&beacon));
//! assert_eq!(list.iter_due(83).count(), 1);
//! assert_eq!(list.iter_due(84).count(), 0);
//! ```

mod bucket;
pub mod config;
pub mod error;
mod frame;
mod identifier;
pub mod interval;
mod state;
mod tick_list;

pub use bucket::BucketGroup;
pub use config::TickingConfig;
pub use frame::{FrameCursor, FrameIter};
pub use identifier::Identifier;
pub use interval::{IntervalPolicy, TickIntervalTable, normalize_interval};
pub use state::{TickState, Tickable};
pub use tick_list::TickList;
