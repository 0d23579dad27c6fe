//! The tick list: a set of block entities that are ticked on a per-type cadence.

use std::rc::Rc;
use std::sync::atomic::{AtomicU32, Ordering};

use rustc_hash::FxHashMap;

use crate::{
    BucketGroup, FrameCursor, FrameIter, Identifier, Tickable,
    interval::{IntervalPolicy, TickIntervalTable, normalize_interval},
    state::{GroupId, TickLink},
};

static NEXT_LIST_ID: AtomicU32 = AtomicU32::new(0);

/// Key of one bucket group. Objects only share a group when type, interval
/// and bucket all match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct GroupKey {
    kind: Identifier,
    interval: u32,
    bucket: u32,
}

/// A set of tickable objects that spreads their updates over several frames.
///
/// Every member has a tick interval `n` and a bucket `b`; it is due on the
/// frames where `frame % n == b`. Members are partitioned into bucket groups
/// keyed by `(type, interval, bucket)`, so the due set of a frame is found
/// without looking at members that are not due.
///
/// # Membership
///
/// - [`add`](Self::add), [`remove`](Self::remove) and
///   [`contains`](Self::contains) are O(1).
/// - Failures are reported as `false` and leave the list unchanged.
/// - The list only holds shared references; the simulation owns the objects.
/// - Dropping or [clearing](Self::clear) the list unlinks every member.
pub struct TickList<T: ?Sized + Tickable, P: IntervalPolicy = TickIntervalTable> {
    id: u32,
    policy: P,
    groups: Vec<BucketGroup<T>>,
    group_index: FxHashMap<GroupKey, GroupId>,
    len: usize,
}

impl<T: ?Sized + Tickable, P: IntervalPolicy> TickList<T, P> {
    /// Creates an empty tick list resolving intervals with `policy`.
    #[must_use]
    pub fn new(policy: P) -> Self {
        Self {
            id: NEXT_LIST_ID.fetch_add(1, Ordering::Relaxed),
            policy,
            groups: Vec::new(),
            group_index: FxHashMap::default(),
            len: 0,
        }
    }

    /// The interval policy of this list.
    #[must_use]
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Adds an object to the list.
    ///
    /// Returns `false` if the object never ticks (interval below zero) or is
    /// already a member of a tick list. The interval is resolved through the
    /// policy if the object has not cached one yet.
    pub fn add(&mut self, entity: &Rc<T>) -> bool {
        let state = entity.tick_state();
        if state.is_scheduled() {
            return false;
        }

        let kind = entity.tick_kind();
        let Some(interval) = normalize_interval(state.resolve_interval(&self.policy, kind)) else {
            return false;
        };
        let bucket = state.bucket();
        if bucket >= interval {
            log::warn!(
                "{kind} has bucket {bucket} outside its interval {interval}, it will never be due"
            );
        }

        let key = GroupKey {
            kind: kind.clone(),
            interval,
            bucket,
        };
        let group_id = match self.group_index.get(&key) {
            Some(&id) => id,
            None => {
                let id = GroupId(self.groups.len() as u32);
                self.groups.push(BucketGroup::new(interval));
                log::trace!(
                    "Created bucket group {} for {kind} (interval {interval}, bucket {bucket})",
                    id.0
                );
                self.group_index.insert(key, id);
                id
            }
        };

        let slot = self.groups[group_id.0 as usize].insert(bucket, entity.clone());
        state.set_link(TickLink {
            list: self.id,
            group: group_id,
            slot,
        });
        self.len += 1;
        true
    }

    /// Removes an object from the list.
    ///
    /// Returns `false` if the object is not a member of this list.
    pub fn remove(&mut self, entity: &Rc<T>) -> bool {
        let state = entity.tick_state();
        let Some(link) = state.link().filter(|link| link.list == self.id) else {
            return false;
        };
        let Some(group) = self.groups.get_mut(link.group.0 as usize) else {
            return false;
        };
        if !group.remove(state.bucket(), entity) {
            return false;
        }
        state.clear_link();
        self.len -= 1;
        true
    }

    /// Returns `true` if the object is a member of this list.
    #[must_use]
    pub fn contains(&self, entity: &T) -> bool {
        entity
            .tick_state()
            .link()
            .is_some_and(|link| link.list == self.id)
    }

    /// The number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the list has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The number of bucket groups created so far.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Returns a lazy iterator over the members due on `frame`.
    #[must_use]
    pub fn iter_due(&self, frame: u64) -> FrameIter<'_, T> {
        FrameIter::new(&self.groups, frame)
    }

    /// Returns a cursor over the members due on `frame` that can remove the
    /// member it just yielded.
    #[must_use]
    pub fn cursor(&mut self, frame: u64) -> FrameCursor<'_, T, P> {
        FrameCursor::new(self, frame)
    }

    /// Visits every member due on `frame` and removes those for which `keep`
    /// returns `false`. Returns the number of members visited.
    pub fn retain_due<F>(&mut self, frame: u64, mut keep: F) -> usize
    where
        F: FnMut(&Rc<T>) -> bool,
    {
        let mut cursor = self.cursor(frame);
        let mut visited = 0;
        while let Some(entity) = cursor.next() {
            visited += 1;
            if !keep(&entity) {
                cursor.remove_current();
            }
        }
        visited
    }

    /// Removes every member and drops all bucket groups.
    pub fn clear(&mut self) {
        for group in &mut self.groups {
            for entity in group.drain() {
                entity.tick_state().clear_link();
            }
        }
        self.groups.clear();
        self.group_index.clear();
        self.len = 0;
    }

    pub(crate) fn groups(&self) -> &[BucketGroup<T>] {
        &self.groups
    }
}

impl<T: ?Sized + Tickable> Default for TickList<T> {
    fn default() -> Self {
        Self::new(TickIntervalTable::vanilla())
    }
}

impl<T: ?Sized + Tickable, P: IntervalPolicy> Drop for TickList<T, P> {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::TickState;

    struct TestEntity {
        name: &'static str,
        kind: Identifier,
        state: TickState,
    }

    impl Tickable for TestEntity {
        fn tick_kind(&self) -> &Identifier {
            &self.kind
        }

        fn tick_state(&self) -> &TickState {
            &self.state
        }
    }

    fn entity(
        name: &'static str,
        kind: &'static str,
        interval: i32,
        bucket: u32,
    ) -> Rc<TestEntity> {
        Rc::new(TestEntity {
            name,
            kind: Identifier::vanilla_static(kind),
            state: TickState::with_interval(interval, bucket),
        })
    }

    fn list() -> TickList<TestEntity> {
        TickList::new(TickIntervalTable::new())
    }

    fn due_names(list: &TickList<TestEntity>, frame: u64) -> Vec<&'static str> {
        let mut names: Vec<_> = list.iter_due(frame).map(|e| e.name).collect();
        names.sort_unstable();
        names
    }

    #[test]
    fn test_membership_round_trip() {
        let mut list = list();
        let a = entity("a", "hopper", 4, 1);

        assert!(!list.contains(&a));
        assert!(list.add(&a));
        assert!(list.contains(&a));
        assert!(a.tick_state().is_scheduled());
        assert_eq!(list.len(), 1);

        assert!(list.remove(&a));
        assert!(!list.contains(&a));
        assert!(!a.tick_state().is_scheduled());
        assert!(list.is_empty());
    }

    #[test]
    fn test_rejects_never_tick() {
        let mut list = list();
        let sign = entity("sign", "sign", -1, 0);
        assert!(!list.add(&sign));
        assert!(!list.contains(&sign));
        for frame in 0..10 {
            assert!(list.iter_due(frame).next().is_none());
        }
    }

    #[test]
    fn test_rejects_never_tick_from_policy() {
        let mut list = TickList::new(TickIntervalTable::vanilla());
        let chest = Rc::new(TestEntity {
            name: "chest",
            kind: Identifier::vanilla_static("chest"),
            state: TickState::new(0),
        });
        assert!(!list.add(&chest));
        assert_eq!(chest.tick_state().interval(), Some(-1));
        assert!(list.is_empty());
    }

    #[test]
    fn test_duplicate_add_rejected() {
        let mut list = list();
        let a = entity("a", "hopper", 2, 0);
        assert!(list.add(&a));
        assert!(!list.add(&a));
        assert_eq!(list.len(), 1);
        assert_eq!(due_names(&list, 0), vec!["a"]);
    }

    #[test]
    fn test_remove_non_member() {
        let mut list = list();
        let a = entity("a", "hopper", 2, 0);
        let b = entity("b", "hopper", 2, 0);
        assert!(list.add(&a));

        assert!(!list.remove(&b));
        assert!(list.remove(&a));
        assert!(!list.remove(&a));
        assert!(list.is_empty());

        assert!(list.add(&b));
        assert!(!list.remove(&a));
        assert!(list.contains(&b));
    }

    #[test]
    fn test_other_list_membership() {
        let mut first = list();
        let mut second = list();
        let a = entity("a", "hopper", 2, 0);

        assert!(first.add(&a));
        assert!(!second.contains(&a));
        assert!(!second.remove(&a));
        assert!(!second.add(&a));
        assert!(first.contains(&a));
    }

    #[test]
    fn test_concrete_schedule() {
        let mut list = list();
        let a = entity("a", "furnace", 2, 0);
        let b = entity("b", "furnace", 2, 1);
        let c = entity("c", "beacon", 4, 3);
        assert!(list.add(&a));
        assert!(list.add(&b));
        assert!(list.add(&c));

        assert_eq!(due_names(&list, 0), vec!["a"]);
        assert_eq!(due_names(&list, 1), vec!["b"]);
        assert_eq!(due_names(&list, 2), vec!["a"]);
        assert_eq!(due_names(&list, 3), vec!["b", "c"]);
        assert_eq!(due_names(&list, 4), vec!["a"]);
    }

    #[test]
    fn test_frame_coverage() {
        let mut list = list();
        let mut members = Vec::new();
        for interval in 1..=6 {
            for bucket in 0..interval {
                let e = entity("e", "hopper", interval as i32, bucket);
                assert!(list.add(&e));
                members.push((e, interval, bucket));
            }
        }

        for start in [0_u64, 5, 1_000_003] {
            for (member, interval, bucket) in &members {
                let hits: Vec<u64> = (start..start + u64::from(*interval))
                    .filter(|&frame| list.iter_due(frame).any(|e| Rc::ptr_eq(e, member)))
                    .collect();
                assert_eq!(hits.len(), 1);
                assert_eq!(hits[0] % u64::from(*interval), u64::from(*bucket));
            }
        }
    }

    #[test]
    fn test_zero_interval_ticks_every_frame() {
        let mut list = list();
        let a = entity("a", "hopper", 0, 0);
        assert!(list.add(&a));
        for frame in 0..8 {
            assert_eq!(due_names(&list, frame), vec!["a"]);
        }
    }

    #[test]
    fn test_lazy_resolution_uses_policy_once() {
        let calls = Cell::new(0);
        let policy = |_: &Identifier| {
            calls.set(calls.get() + 1);
            3
        };
        let mut list: TickList<TestEntity, _> = TickList::new(policy);
        let a = Rc::new(TestEntity {
            name: "a",
            kind: Identifier::vanilla_static("hopper"),
            state: TickState::new(2),
        });

        assert!(list.add(&a));
        assert!(list.remove(&a));
        assert!(list.add(&a));
        assert_eq!(calls.get(), 1);
        assert_eq!(due_names_generic(&list, 5), vec!["a"]);
    }

    fn due_names_generic<P: IntervalPolicy>(
        list: &TickList<TestEntity, P>,
        frame: u64,
    ) -> Vec<&'static str> {
        list.iter_due(frame).map(|e| e.name).collect()
    }

    #[test]
    fn test_groups_split_by_type_and_bucket() {
        let mut list = list();
        assert!(list.add(&entity("a", "hopper", 4, 0)));
        assert!(list.add(&entity("b", "hopper", 4, 0)));
        assert!(list.add(&entity("c", "hopper", 4, 1)));
        assert!(list.add(&entity("d", "furnace", 4, 0)));
        assert!(list.add(&entity("e", "hopper", 8, 0)));
        assert_eq!(list.group_count(), 4);
        assert_eq!(due_names(&list, 0), vec!["a", "b", "d", "e"]);
        assert_eq!(due_names(&list, 4), vec!["a", "b", "d"]);
    }

    #[test]
    fn test_remove_keeps_swapped_member_removable() {
        let mut list = list();
        let members: Vec<_> = ["a", "b", "c", "d"]
            .into_iter()
            .map(|name| entity(name, "hopper", 2, 1))
            .collect();
        for member in &members {
            assert!(list.add(member));
        }

        assert!(list.remove(&members[0]));
        assert!(list.remove(&members[3]));
        assert_eq!(due_names(&list, 1), vec!["b", "c"]);
        assert!(list.remove(&members[1]));
        assert!(list.remove(&members[2]));
        assert!(list.is_empty());
        assert!(list.iter_due(1).next().is_none());
    }

    #[test]
    fn test_retain_due() {
        let mut list = list();
        let a = entity("a", "hopper", 1, 0);
        let b = entity("b", "hopper", 1, 0);
        let c = entity("c", "hopper", 1, 0);
        for e in [&a, &b, &c] {
            assert!(list.add(e));
        }

        let visited = list.retain_due(0, |e| e.name != "b");
        assert_eq!(visited, 3);
        assert!(!list.contains(&b));
        assert_eq!(due_names(&list, 0), vec!["a", "c"]);
    }

    #[test]
    fn test_clear_and_drop_unlink() {
        let a = entity("a", "hopper", 2, 0);
        let b = entity("b", "furnace", 3, 2);
        {
            let mut list = list();
            assert!(list.add(&a));
            assert!(list.add(&b));
            list.clear();
            assert!(list.is_empty());
            assert_eq!(list.group_count(), 0);
            assert!(!a.tick_state().is_scheduled());

            assert!(list.add(&a));
        }
        assert!(!a.tick_state().is_scheduled());
        assert_eq!(Rc::strong_count(&a), 1);

        let mut list = list();
        assert!(list.add(&a));
        assert!(list.add(&b));
    }

    #[test]
    fn test_trait_objects() {
        let mut list: TickList<dyn Tickable> = TickList::new(TickIntervalTable::new());
        let a: Rc<dyn Tickable> = entity("a", "hopper", 2, 1);
        assert!(list.add(&a));
        assert_eq!(list.iter_due(3).count(), 1);
        assert!(list.remove(&a));
    }
}
