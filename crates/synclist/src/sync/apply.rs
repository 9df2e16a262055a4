#![forbid(unsafe_code)]

//! Translate a change notification from one sequence onto another.
//!
//! [`apply_change`] replays a [`CollectionChange`] raised by a *source*
//! sequence onto a *target* sequence, converting each incoming item with a
//! caller-supplied `produce` function.
//!
//! | Action    | Effect on target                                             |
//! |-----------|--------------------------------------------------------------|
//! | `Reset`   | clear, then push `produce(item)` for every source item        |
//! | `Add`     | insert `produce(new_items[k])` at `new_starting_index + k`    |
//! | `Remove`  | remove at `old_starting_index`, once per removed item         |
//! | `Replace` | overwrite `new_starting_index + k` with `produce(new_items[k])` |
//! | `Move`    | nothing; logged as unsupported                               |
//!
//! Removals are applied at the same index each time because every removal
//! shifts the later items down. This assumes the removed items were
//! contiguous in the source; non-contiguous multi-item removals are not
//! supported.
//!
//! Moves are not translated. Callers that need to reorder a synchronized
//! sequence must express the move as a removal followed by an insertion.

use tracing::{trace, warn};

use super::model::{ModelSource, SnapshotVec};
use crate::error::{SyncError, SyncResult};
use crate::reactive::{ChangeAction, CollectionChange, ObservableVec};

/// A sequence that can receive translated mutations.
pub trait SyncTarget<T> {
    fn clear_items(&self) -> SyncResult<()>;
    fn push_item(&self, item: T) -> SyncResult<()>;
    fn insert_item(&self, index: usize, item: T) -> SyncResult<()>;
    fn remove_item(&self, index: usize) -> SyncResult<()>;
    fn replace_item(&self, index: usize, item: T) -> SyncResult<()>;
}

impl<T: Clone + 'static> SyncTarget<T> for ObservableVec<T> {
    fn clear_items(&self) -> SyncResult<()> {
        self.clear()
    }

    fn push_item(&self, item: T) -> SyncResult<()> {
        self.push(item)
    }

    fn insert_item(&self, index: usize, item: T) -> SyncResult<()> {
        self.insert(index, item)
    }

    fn remove_item(&self, index: usize) -> SyncResult<()> {
        self.remove(index).map(drop)
    }

    fn replace_item(&self, index: usize, item: T) -> SyncResult<()> {
        self.replace(index, item).map(drop)
    }
}

impl<T> SyncTarget<T> for SnapshotVec<T> {
    fn clear_items(&self) -> SyncResult<()> {
        self.with_mut(Vec::clear);
        Ok(())
    }

    fn push_item(&self, item: T) -> SyncResult<()> {
        self.with_mut(|items| items.push(item));
        Ok(())
    }

    fn insert_item(&self, index: usize, item: T) -> SyncResult<()> {
        self.with_mut(|items| {
            let len = items.len();
            if index > len {
                return Err(SyncError::IndexOutOfRange { index, len });
            }
            items.insert(index, item);
            Ok(())
        })
    }

    fn remove_item(&self, index: usize) -> SyncResult<()> {
        self.with_mut(|items| {
            let len = items.len();
            if index >= len {
                return Err(SyncError::IndexOutOfRange { index, len });
            }
            items.remove(index);
            Ok(())
        })
    }

    fn replace_item(&self, index: usize, item: T) -> SyncResult<()> {
        self.with_mut(|items| {
            let len = items.len();
            let slot = items
                .get_mut(index)
                .ok_or(SyncError::IndexOutOfRange { index, len })?;
            *slot = item;
            Ok(())
        })
    }
}

impl<T: Clone + 'static> SyncTarget<T> for ModelSource<T> {
    fn clear_items(&self) -> SyncResult<()> {
        match self {
            Self::Observable(vec) => vec.clear_items(),
            Self::Snapshot(vec) => vec.clear_items(),
        }
    }

    fn push_item(&self, item: T) -> SyncResult<()> {
        match self {
            Self::Observable(vec) => vec.push_item(item),
            Self::Snapshot(vec) => vec.push_item(item),
        }
    }

    fn insert_item(&self, index: usize, item: T) -> SyncResult<()> {
        match self {
            Self::Observable(vec) => vec.insert_item(index, item),
            Self::Snapshot(vec) => vec.insert_item(index, item),
        }
    }

    fn remove_item(&self, index: usize) -> SyncResult<()> {
        match self {
            Self::Observable(vec) => vec.remove_item(index),
            Self::Snapshot(vec) => vec.remove_item(index),
        }
    }

    fn replace_item(&self, index: usize, item: T) -> SyncResult<()> {
        match self {
            Self::Observable(vec) => vec.replace_item(index, item),
            Self::Snapshot(vec) => vec.replace_item(index, item),
        }
    }
}

/// Replay `change` onto `target`.
///
/// `source_items` is only called for `Reset` and must return the source
/// sequence's current contents. `produce` converts one source item into a
/// target item.
///
/// # Errors
///
/// Returns [`SyncError::MissingIndex`] when an `Add`, `Remove` or `Replace`
/// lacks its starting index, and propagates any error raised by the target
/// (out-of-range indices, downstream handler failures). Items already
/// applied before the failure stay applied.
pub fn apply_change<S, D, Tg>(
    target: &Tg,
    change: &CollectionChange<S>,
    source_items: impl FnOnce() -> Vec<S>,
    mut produce: impl FnMut(&S) -> D,
) -> SyncResult<()>
where
    Tg: SyncTarget<D> + ?Sized,
{
    let result = replay(target, change, source_items, &mut produce);
    if let Err(err) = &result {
        warn!(action = ?change.action, %err, "sync pass failed");
    }
    result
}

fn replay<S, D, Tg>(
    target: &Tg,
    change: &CollectionChange<S>,
    source_items: impl FnOnce() -> Vec<S>,
    produce: &mut impl FnMut(&S) -> D,
) -> SyncResult<()>
where
    Tg: SyncTarget<D> + ?Sized,
{
    match change.action {
        ChangeAction::Reset => {
            target.clear_items()?;
            let items = source_items();
            trace!(count = items.len(), "apply reset");
            items
                .iter()
                .try_for_each(|item| target.push_item(produce(item)))
        }
        ChangeAction::Add => {
            let start = starting_index(change.new_starting_index, change.action)?;
            trace!(start, count = change.new_items.len(), "apply add");
            change
                .new_items
                .iter()
                .enumerate()
                .try_for_each(|(offset, item)| target.insert_item(start + offset, produce(item)))
        }
        ChangeAction::Remove => {
            let start = starting_index(change.old_starting_index, change.action)?;
            trace!(start, count = change.old_items.len(), "apply remove");
            (0..change.old_items.len()).try_for_each(|_| target.remove_item(start))
        }
        ChangeAction::Replace => {
            let start = starting_index(change.new_starting_index, change.action)?;
            trace!(start, count = change.new_items.len(), "apply replace");
            change
                .new_items
                .iter()
                .enumerate()
                .try_for_each(|(offset, item)| target.replace_item(start + offset, produce(item)))
        }
        ChangeAction::Move => {
            warn!(
                from = ?change.old_starting_index,
                to = ?change.new_starting_index,
                "move notifications are not synchronized; use remove + insert"
            );
            Ok(())
        }
    }
}

fn starting_index(index: Option<usize>, action: ChangeAction) -> SyncResult<usize> {
    index.ok_or(SyncError::MissingIndex { action })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    fn snapshot(items: &[i32]) -> SnapshotVec<i32> {
        SnapshotVec::new(items.to_vec())
    }

    fn no_source() -> Vec<i32> {
        unreachable!("only resets read the source")
    }

    #[test]
    fn reset_rebuilds_from_source() {
        let target = snapshot(&[9, 9, 9, 9]);
        apply_change(
            &target,
            &CollectionChange::reset(),
            || vec![1, 2, 3],
            |v| v * 10,
        )
        .unwrap();
        assert_eq!(target.to_vec(), vec![10, 20, 30]);
    }

    #[test]
    fn add_inserts_in_source_order() {
        let target = snapshot(&[0, 4]);
        apply_change(
            &target,
            &CollectionChange::add(1, vec![1, 2, 3]),
            no_source,
            |v| *v,
        )
        .unwrap();
        assert_eq!(target.to_vec(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn remove_repeats_at_start_index() {
        let target = snapshot(&[0, 1, 2, 3, 4]);
        apply_change(
            &target,
            &CollectionChange::remove(1, vec![1, 2, 3]),
            no_source,
            |v| *v,
        )
        .unwrap();
        assert_eq!(target.to_vec(), vec![0, 4]);
    }

    #[test]
    fn replace_overwrites_successive_positions() {
        let target = snapshot(&[1, 2, 3]);
        apply_change(
            &target,
            &CollectionChange::replace(1, vec![20, 30], vec![2, 3]),
            no_source,
            |v| *v,
        )
        .unwrap();
        assert_eq!(target.to_vec(), vec![1, 20, 30]);
    }

    #[test]
    fn move_is_ignored() {
        let target = snapshot(&[1, 2, 3]);
        apply_change(
            &target,
            &CollectionChange::moved(0, 2, 1),
            no_source,
            |v| *v,
        )
        .unwrap();
        assert_eq!(target.to_vec(), vec![1, 2, 3]);
    }

    #[traced_test]
    #[test]
    fn move_logs_unsupported_warning() {
        let target = snapshot(&[1, 2]);
        apply_change(
            &target,
            &CollectionChange::moved(1, 0, 2),
            no_source,
            |v| *v,
        )
        .unwrap();
        assert!(logs_contain("move notifications are not synchronized"));
    }

    #[traced_test]
    #[test]
    fn failed_pass_is_logged() {
        let target = snapshot(&[]);
        let _ = apply_change(
            &target,
            &CollectionChange::remove(0, vec![1]),
            no_source,
            |v| *v,
        );
        assert!(logs_contain("sync pass failed"));
    }

    #[test]
    fn missing_index_is_an_error() {
        let target = snapshot(&[1]);
        let mut change = CollectionChange::remove(0, vec![1]);
        change.old_starting_index = None;

        let err = apply_change(&target, &change, no_source, |v| *v).unwrap_err();
        assert_eq!(
            err,
            SyncError::MissingIndex {
                action: ChangeAction::Remove
            }
        );
        assert_eq!(target.to_vec(), vec![1]);
    }

    #[test]
    fn out_of_range_remove_propagates_after_partial_apply() {
        let target = snapshot(&[1, 2]);
        let err = apply_change(
            &target,
            &CollectionChange::remove(1, vec![2, 3, 4]),
            no_source,
            |v| *v,
        )
        .unwrap_err();
        assert_eq!(err, SyncError::IndexOutOfRange { index: 1, len: 1 });
        assert_eq!(target.to_vec(), vec![1], "first removal stays applied");
    }

    #[test]
    fn out_of_range_insert_propagates() {
        let target = snapshot(&[]);
        let err = apply_change(
            &target,
            &CollectionChange::add(3, vec![1]),
            no_source,
            |v| *v,
        )
        .unwrap_err();
        assert_eq!(err, SyncError::IndexOutOfRange { index: 3, len: 0 });
    }

    #[test]
    fn observable_target_raises_notifications() {
        let target = ObservableVec::from_vec(vec![1, 2]);
        let seen = std::rc::Rc::new(std::cell::Cell::new(0));
        let s = std::rc::Rc::clone(&seen);
        let _sub = target.subscribe(move |_| {
            s.set(s.get() + 1);
            Ok(())
        });

        apply_change(
            &target,
            &CollectionChange::add(2, vec![3, 4]),
            no_source,
            |v| *v,
        )
        .unwrap();

        assert_eq!(target.to_vec(), vec![1, 2, 3, 4]);
        assert_eq!(seen.get(), 2, "one Add per translated item");
    }

    #[test]
    fn model_source_dispatches_to_variant() {
        let source = ModelSource::from(vec![1, 2, 3]);
        apply_change(
            &source,
            &CollectionChange::remove(0, vec![1]),
            no_source,
            |v| *v,
        )
        .unwrap();
        assert_eq!(source.to_vec(), vec![2, 3]);
    }
}
