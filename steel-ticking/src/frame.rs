//! Per-frame traversal of a tick list's due members.

use std::iter::FusedIterator;
use std::rc::Rc;
use std::slice;

use crate::{BucketGroup, TickList, Tickable, interval::IntervalPolicy};

/// Read-only iterator over the members due on one frame.
///
/// Groups are visited in creation order and each contributes the entries of
/// its due bucket. Groups with nothing due are skipped without looking at
/// their other buckets.
pub struct FrameIter<'a, T: ?Sized> {
    groups: slice::Iter<'a, BucketGroup<T>>,
    entries: slice::Iter<'a, Rc<T>>,
    frame: u64,
}

impl<'a, T: ?Sized + Tickable> FrameIter<'a, T> {
    pub(crate) fn new(groups: &'a [BucketGroup<T>], frame: u64) -> Self {
        Self {
            groups: groups.iter(),
            entries: <&[Rc<T>]>::default().iter(),
            frame,
        }
    }

    /// The frame this iterator was created for.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

impl<'a, T: ?Sized + Tickable> Iterator for FrameIter<'a, T> {
    type Item = &'a Rc<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entity) = self.entries.next() {
                return Some(entity);
            }
            let group = self.groups.next()?;
            self.entries = group.entries_for(group.due_bucket(self.frame)).iter();
        }
    }
}

impl<T: ?Sized + Tickable> FusedIterator for FrameIter<'_, T> {}

/// Iterator over the members due on one frame that may remove the member it
/// just yielded.
///
/// The cursor borrows the list mutably, so [`remove_current`] is the only
/// mutation possible during a pass. Objects added after the pass are first
/// seen by the next cursor. Dropping the cursor early leaves the list
/// consistent.
///
/// [`remove_current`]: FrameCursor::remove_current
pub struct FrameCursor<'a, T: ?Sized + Tickable, P: IntervalPolicy> {
    list: &'a mut TickList<T, P>,
    frame: u64,
    // Group being walked and the next position in its due bucket.
    group: usize,
    pos: usize,
    // Group and slot of the last yielded member.
    current: Option<(usize, usize)>,
}

impl<'a, T: ?Sized + Tickable, P: IntervalPolicy> FrameCursor<'a, T, P> {
    pub(crate) fn new(list: &'a mut TickList<T, P>, frame: u64) -> Self {
        Self {
            list,
            frame,
            group: 0,
            pos: 0,
            current: None,
        }
    }

    /// The frame this cursor was created for.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Returns `true` if another due member remains.
    ///
    /// Advances past groups with nothing left to yield. Calling it
    /// repeatedly without [`next`](Iterator::next) never skips a member.
    pub fn has_next(&mut self) -> bool {
        let groups = self.list.groups();
        while let Some(group) = groups.get(self.group) {
            if self.pos < group.entries_for(group.due_bucket(self.frame)).len() {
                return true;
            }
            self.group += 1;
            self.pos = 0;
        }
        false
    }

    /// Removes the member returned by the last call to `next` from the list.
    ///
    /// Returns `false` if nothing was yielded yet or the member was already
    /// removed. The following call to `next` continues with the member after
    /// it.
    pub fn remove_current(&mut self) -> bool {
        let Some((group_idx, slot)) = self.current.take() else {
            return false;
        };
        let entity = {
            let group = &self.list.groups()[group_idx];
            match group.entries_for(group.due_bucket(self.frame)).get(slot) {
                Some(entity) => entity.clone(),
                None => return false,
            }
        };
        if !self.list.remove(&entity) {
            return false;
        }
        // The last entry of the bucket was swapped into `slot` and has not
        // been yielded yet.
        if group_idx == self.group && slot < self.pos {
            self.pos -= 1;
        }
        true
    }
}

impl<T: ?Sized + Tickable, P: IntervalPolicy> Iterator for FrameCursor<'_, T, P> {
    type Item = Rc<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.has_next() {
            return None;
        }
        let group = &self.list.groups()[self.group];
        let entity = group.entries_for(group.due_bucket(self.frame))[self.pos].clone();
        self.current = Some((self.group, self.pos));
        self.pos += 1;
        Some(entity)
    }
}

impl<T: ?Sized + Tickable, P: IntervalPolicy> FusedIterator for FrameCursor<'_, T, P> {}
