//! Scheduler-owned state carried by every ticked object.

use std::cell::Cell;

use rand::Rng;

use crate::{
    Identifier,
    interval::{IntervalPolicy, normalize_interval},
};

/// An object that can be registered in a [`TickList`](crate::TickList).
pub trait Tickable {
    /// The type identity used to look up the tick interval and to group objects.
    fn tick_kind(&self) -> &Identifier;

    /// The scheduling state embedded in the object.
    fn tick_state(&self) -> &TickState;
}

/// Index of a bucket group inside one tick list's group table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct GroupId(pub(crate) u32);

/// Back-reference from an object to the place that currently holds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TickLink {
    /// Id of the owning tick list.
    pub(crate) list: u32,
    /// Group inside that list.
    pub(crate) group: GroupId,
    /// Position inside the group's bucket entry list.
    pub(crate) slot: usize,
}

/// Tick interval, bucket assignment and membership link of one object.
///
/// The bucket is fixed for the lifetime of the object. The interval is
/// resolved at most once, either up front or on the first successful
/// [`TickList::add`](crate::TickList::add). The link can only be written by
/// the tick list that holds the object.
#[derive(Debug, Default)]
pub struct TickState {
    bucket: u32,
    interval: Cell<Option<i32>>,
    link: Cell<Option<TickLink>>,
}

impl TickState {
    /// Creates a state whose interval is resolved lazily on first add.
    #[must_use]
    pub const fn new(bucket: u32) -> Self {
        Self {
            bucket,
            interval: Cell::new(None),
            link: Cell::new(None),
        }
    }

    /// Creates a state with an already resolved raw interval.
    #[must_use]
    pub const fn with_interval(interval: i32, bucket: u32) -> Self {
        Self {
            bucket,
            interval: Cell::new(Some(interval)),
            link: Cell::new(None),
        }
    }

    /// Resolves the interval for `kind` now and draws a bucket in
    /// `[0, interval)`. Never-tick kinds get bucket 0.
    pub fn assign<P, R>(policy: &P, kind: &Identifier, rng: &mut R) -> Self
    where
        P: IntervalPolicy + ?Sized,
        R: Rng + ?Sized,
    {
        let raw = policy.resolve(kind);
        let bucket = match normalize_interval(raw) {
            Some(interval) if interval > 1 => rng.random_range(0..interval),
            _ => 0,
        };
        Self::with_interval(raw, bucket)
    }

    /// The bucket this object is due on, modulo its interval.
    #[must_use]
    pub fn bucket(&self) -> u32 {
        self.bucket
    }

    /// The cached raw interval, if it has been resolved.
    #[must_use]
    pub fn interval(&self) -> Option<i32> {
        self.interval.get()
    }

    /// Returns `true` while the object is a member of some tick list.
    #[must_use]
    pub fn is_scheduled(&self) -> bool {
        self.link.get().is_some()
    }

    pub(crate) fn resolve_interval<P>(&self, policy: &P, kind: &Identifier) -> i32
    where
        P: IntervalPolicy + ?Sized,
    {
        if let Some(raw) = self.interval.get() {
            return raw;
        }
        let raw = policy.resolve(kind);
        self.interval.set(Some(raw));
        raw
    }

    pub(crate) fn link(&self) -> Option<TickLink> {
        self.link.get()
    }

    pub(crate) fn set_link(&self, link: TickLink) {
        self.link.set(Some(link));
    }

    pub(crate) fn set_slot(&self, slot: usize) {
        if let Some(mut link) = self.link.get() {
            link.slot = slot;
            self.link.set(Some(link));
        }
    }

    pub(crate) fn clear_link(&self) {
        self.link.set(None);
    }
}
