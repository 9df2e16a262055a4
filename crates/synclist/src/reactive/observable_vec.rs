#![forbid(unsafe_code)]

//! Observable ordered sequence with structural change notification.
//!
//! # Design
//!
//! [`ObservableVec<T>`] wraps a `Vec<T>` in shared, reference-counted storage
//! (`Rc<RefCell<..>>`). Every structural mutation produces one
//! [`CollectionChange`] which is delivered to all live subscribers in
//! registration order.
//!
//! Handlers return a [`SyncResult`]. The first handler error stops delivery
//! and is returned from the mutating call, so a failure inside a downstream
//! consumer surfaces at the call site that performed the mutation.
//!
//! # Performance
//!
//! | Operation      | Complexity                         |
//! |----------------|------------------------------------|
//! | `get()`        | O(1)                               |
//! | `push()`       | O(S) where S = subscribers         |
//! | `insert()`     | O(N + S)                           |
//! | `remove()`     | O(N + S)                           |
//! | `subscribe()`  | O(1) amortized                     |
//!
//! # Failure Modes
//!
//! - **Out-of-range index**: rejected with [`SyncError::IndexOutOfRange`]
//!   before any mutation or notification.
//! - **Re-entrant mutation**: allowed. The storage borrow is released before
//!   subscribers run, so a handler may mutate the vector it observes. Nested
//!   notifications are delivered depth-first.
//! - **Subscriber leak**: dead weak references are pruned during notify.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::change::CollectionChange;
use crate::error::{SyncError, SyncResult};

type HandlerRc<T> = Rc<dyn Fn(&CollectionChange<T>) -> SyncResult<()>>;
type HandlerWeak<T> = Weak<dyn Fn(&CollectionChange<T>) -> SyncResult<()>>;

struct VecInner<T> {
    items: Vec<T>,
    version: u64,
    subscribers: Vec<HandlerWeak<T>>,
}

/// A shared, observable `Vec<T>`.
///
/// Cloning an `ObservableVec` creates a new handle to the **same** storage:
/// both handles see the same items and share subscribers.
///
/// # Invariants
///
/// 1. `version` increments by exactly 1 per successful structural mutation.
/// 2. Exactly one notification is raised per successful mutation.
/// 3. Subscribers are notified in registration order.
pub struct ObservableVec<T> {
    inner: Rc<RefCell<VecInner<T>>>,
}

impl<T> Clone for ObservableVec<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for ObservableVec<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ObservableVec")
            .field("items", &inner.items)
            .field("version", &inner.version)
            .field("subscriber_count", &inner.subscribers.len())
            .finish()
    }
}

impl<T: Clone + 'static> Default for ObservableVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + 'static> From<Vec<T>> for ObservableVec<T> {
    fn from(items: Vec<T>) -> Self {
        Self::from_vec(items)
    }
}

impl<T: Clone + 'static> ObservableVec<T> {
    /// Create an empty observable sequence.
    #[must_use]
    pub fn new() -> Self {
        Self::from_vec(Vec::new())
    }

    /// Create an observable sequence holding `items`. No notification is
    /// raised for the initial contents.
    #[must_use]
    pub fn from_vec(items: Vec<T>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(VecInner {
                items,
                version: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().items.is_empty()
    }

    /// Clone of the item at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<T> {
        self.inner.borrow().items.get(index).cloned()
    }

    /// Clone of the whole contents.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.inner.borrow().items.clone()
    }

    /// Access the items by reference without cloning.
    ///
    /// Mutating this vector from inside `f` panics (RefCell borrow rules).
    pub fn with<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(&self.inner.borrow().items)
    }

    /// Whether both handles share the same storage.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Number of successful structural mutations so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Number of registered subscribers (including dead ones not yet pruned).
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    /// Subscribe to structural changes.
    ///
    /// Returns a [`Subscription`] guard; dropping it unsubscribes.
    pub fn subscribe(
        &self,
        handler: impl Fn(&CollectionChange<T>) -> SyncResult<()> + 'static,
    ) -> Subscription {
        let strong: HandlerRc<T> = Rc::new(handler);
        let weak = Rc::downgrade(&strong);
        self.inner.borrow_mut().subscribers.push(weak);
        Subscription {
            _guard: Box::new(strong),
        }
    }

    /// Append `item`.
    pub fn push(&self, item: T) -> SyncResult<()> {
        let index = self.len();
        self.insert_many(index, vec![item])
    }

    /// Insert `item` at `index`, shifting later items up.
    pub fn insert(&self, index: usize, item: T) -> SyncResult<()> {
        self.insert_many(index, vec![item])
    }

    /// Insert `items` starting at `index` as a single `Add` notification.
    ///
    /// Inserting an empty batch is a no-op and raises nothing.
    pub fn insert_many(&self, index: usize, items: Vec<T>) -> SyncResult<()> {
        {
            let mut inner = self.inner.borrow_mut();
            let len = inner.items.len();
            if index > len {
                return Err(SyncError::IndexOutOfRange { index, len });
            }
            if items.is_empty() {
                return Ok(());
            }
            let tail = inner.items.split_off(index);
            inner.items.extend(items.iter().cloned());
            inner.items.extend(tail);
            inner.version += 1;
        }
        self.notify(&CollectionChange::add(index, items))
    }

    /// Remove and return the item at `index`.
    pub fn remove(&self, index: usize) -> SyncResult<T> {
        let removed = {
            let mut inner = self.inner.borrow_mut();
            let len = inner.items.len();
            if index >= len {
                return Err(SyncError::IndexOutOfRange { index, len });
            }
            inner.version += 1;
            inner.items.remove(index)
        };
        self.notify(&CollectionChange::remove(index, vec![removed.clone()]))?;
        Ok(removed)
    }

    /// Remove `count` contiguous items starting at `start` as a single
    /// `Remove` notification.
    pub fn remove_range(&self, start: usize, count: usize) -> SyncResult<Vec<T>> {
        let removed: Vec<T> = {
            let mut inner = self.inner.borrow_mut();
            let len = inner.items.len();
            let end = start.saturating_add(count);
            if end > len {
                return Err(SyncError::IndexOutOfRange { index: end, len });
            }
            if count == 0 {
                return Ok(Vec::new());
            }
            inner.version += 1;
            inner.items.drain(start..end).collect()
        };
        self.notify(&CollectionChange::remove(start, removed.clone()))?;
        Ok(removed)
    }

    /// Overwrite the item at `index`, returning the previous one.
    pub fn replace(&self, index: usize, item: T) -> SyncResult<T> {
        let old = {
            let mut inner = self.inner.borrow_mut();
            let len = inner.items.len();
            let Some(slot) = inner.items.get_mut(index) else {
                return Err(SyncError::IndexOutOfRange { index, len });
            };
            let old = std::mem::replace(slot, item.clone());
            inner.version += 1;
            old
        };
        self.notify(&CollectionChange::replace(
            index,
            vec![item],
            vec![old.clone()],
        ))?;
        Ok(old)
    }

    /// Move the item at `from` so that it ends up at index `to`.
    pub fn move_item(&self, from: usize, to: usize) -> SyncResult<()> {
        let item = {
            let mut inner = self.inner.borrow_mut();
            let len = inner.items.len();
            if from >= len {
                return Err(SyncError::IndexOutOfRange { index: from, len });
            }
            if to >= len {
                return Err(SyncError::IndexOutOfRange { index: to, len });
            }
            let item = inner.items.remove(from);
            inner.items.insert(to, item.clone());
            inner.version += 1;
            item
        };
        self.notify(&CollectionChange::moved(from, to, item))
    }

    /// Remove every item. Raises a `Reset` carrying the cleared items.
    pub fn clear(&self) -> SyncResult<()> {
        self.reset(Vec::new())
    }

    /// Replace the whole contents with `items`. Raises a `Reset` carrying
    /// the discarded items.
    pub fn reset(&self, items: Vec<T>) -> SyncResult<()> {
        let old = {
            let mut inner = self.inner.borrow_mut();
            inner.version += 1;
            std::mem::replace(&mut inner.items, items)
        };
        self.notify(&CollectionChange::reset_with_old(old))
    }

    /// Deliver `change` to live subscribers and prune dead ones.
    fn notify(&self, change: &CollectionChange<T>) -> SyncResult<()> {
        // Collect first so no borrow is held while handlers run.
        let handlers: Vec<HandlerRc<T>> = {
            let mut inner = self.inner.borrow_mut();
            inner.subscribers.retain(|w| w.strong_count() > 0);
            inner
                .subscribers
                .iter()
                .filter_map(|w| w.upgrade())
                .collect()
        };

        for handler in &handlers {
            handler(change)?;
        }
        Ok(())
    }
}

/// RAII guard for a change handler.
///
/// Dropping the `Subscription` drops the strong handler reference, so the
/// weak entry in the sequence's subscriber list stops upgrading and the
/// handler is never called again.
pub struct Subscription {
    _guard: Box<dyn std::any::Any>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
