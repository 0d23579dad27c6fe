//! Storage for objects sharing one `(type, interval, bucket)` partition.

use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::Tickable;

/// A group of objects that share a tick interval, with a multimap from
/// bucket key to the objects filed under it.
///
/// The group does not check that bucket keys lie in `[0, interval)`; that is
/// the responsibility of the caller.
pub struct BucketGroup<T: ?Sized> {
    interval: u32,
    store: FxHashMap<u32, Vec<Rc<T>>>,
    len: usize,
}

impl<T: ?Sized + Tickable> BucketGroup<T> {
    /// Creates an empty group.
    ///
    /// # Panics
    /// Panics if `interval` is zero.
    #[must_use]
    pub fn new(interval: u32) -> Self {
        assert!(interval > 0, "bucket group interval must be positive");
        Self {
            interval,
            store: FxHashMap::default(),
            len: 0,
        }
    }

    /// The number of frames between two updates of a member.
    #[must_use]
    pub fn interval(&self) -> u32 {
        self.interval
    }

    /// The bucket due on `frame`.
    #[must_use]
    pub fn due_bucket(&self, frame: u64) -> u32 {
        (frame % u64::from(self.interval)) as u32
    }

    /// Files `entity` under `bucket` and returns its slot in that bucket.
    pub fn insert(&mut self, bucket: u32, entity: Rc<T>) -> usize {
        let entries = self.store.entry(bucket).or_default();
        entries.push(entity);
        self.len += 1;
        entries.len() - 1
    }

    /// Removes `entity` from `bucket`.
    ///
    /// The slot recorded in the entity's link is tried first; the entry that
    /// gets swapped into the freed slot has its link updated. Returns `false`
    /// if the entity is not filed under `bucket`.
    pub fn remove(&mut self, bucket: u32, entity: &Rc<T>) -> bool {
        let Some(entries) = self.store.get_mut(&bucket) else {
            return false;
        };

        let hinted = entity
            .tick_state()
            .link()
            .map(|link| link.slot)
            .filter(|&slot| entries.get(slot).is_some_and(|e| Rc::ptr_eq(e, entity)));
        let Some(slot) = hinted.or_else(|| entries.iter().position(|e| Rc::ptr_eq(e, entity)))
        else {
            return false;
        };

        entries.swap_remove(slot);
        if let Some(moved) = entries.get(slot) {
            moved.tick_state().set_slot(slot);
        }
        if entries.is_empty() {
            self.store.remove(&bucket);
        }
        self.len -= 1;
        true
    }

    /// The objects filed under `bucket`, possibly empty.
    #[must_use]
    pub fn entries_for(&self, bucket: u32) -> &[Rc<T>] {
        match self.store.get(&bucket) {
            Some(entries) => entries,
            None => &[],
        }
    }

    /// The total number of objects in the group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the group holds no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn drain(&mut self) -> impl Iterator<Item = Rc<T>> + '_ {
        self.len = 0;
        self.store.drain().flat_map(|(_, entries)| entries)
    }
}
