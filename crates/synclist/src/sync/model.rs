#![forbid(unsafe_code)]

//! Model-sequence binding.
//!
//! A synchronizer is bound to a [`ModelSource`]: either an
//! [`ObservableVec`], whose changes are followed, or a [`SnapshotVec`], a
//! shared plain vector that is read once when bound. Presentation-side
//! changes are written back into either kind.

use std::cell::RefCell;
use std::rc::Rc;

use crate::reactive::ObservableVec;

/// A shared, non-observable `Vec<T>`.
///
/// Cloning creates a new handle to the same storage. Changes made through
/// [`with_mut`](Self::with_mut) are invisible to a bound synchronizer until
/// the snapshot is bound again.
pub struct SnapshotVec<T> {
    items: Rc<RefCell<Vec<T>>>,
}

impl<T> Clone for SnapshotVec<T> {
    fn clone(&self) -> Self {
        Self {
            items: Rc::clone(&self.items),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for SnapshotVec<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SnapshotVec")
            .field(&self.items.borrow())
            .finish()
    }
}

impl<T> Default for SnapshotVec<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T> From<Vec<T>> for SnapshotVec<T> {
    fn from(items: Vec<T>) -> Self {
        Self::new(items)
    }
}

impl<T> SnapshotVec<T> {
    #[must_use]
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: Rc::new(RefCell::new(items)),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    pub fn with<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(&self.items.borrow())
    }

    /// Mutate the contents directly. No notification is raised.
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut Vec<T>) -> R) -> R {
        f(&mut self.items.borrow_mut())
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.items, &other.items)
    }
}

impl<T: Clone> SnapshotVec<T> {
    #[must_use]
    pub fn get(&self, index: usize) -> Option<T> {
        self.items.borrow().get(index).cloned()
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.items.borrow().clone()
    }
}

/// The model sequence a synchronizer mirrors.
pub enum ModelSource<T> {
    /// Followed through change notifications.
    Observable(ObservableVec<T>),
    /// Read once when bound; never observed.
    Snapshot(SnapshotVec<T>),
}

impl<T> Clone for ModelSource<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Observable(vec) => Self::Observable(vec.clone()),
            Self::Snapshot(vec) => Self::Snapshot(vec.clone()),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for ModelSource<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Observable(vec) => f.debug_tuple("Observable").field(vec).finish(),
            Self::Snapshot(vec) => f.debug_tuple("Snapshot").field(vec).finish(),
        }
    }
}

impl<T: Clone + 'static> Default for ModelSource<T> {
    fn default() -> Self {
        Self::Observable(ObservableVec::new())
    }
}

impl<T> From<ObservableVec<T>> for ModelSource<T> {
    fn from(vec: ObservableVec<T>) -> Self {
        Self::Observable(vec)
    }
}

impl<T> From<SnapshotVec<T>> for ModelSource<T> {
    fn from(vec: SnapshotVec<T>) -> Self {
        Self::Snapshot(vec)
    }
}

impl<T> From<Vec<T>> for ModelSource<T> {
    fn from(items: Vec<T>) -> Self {
        Self::Snapshot(SnapshotVec::new(items))
    }
}

impl<T: Clone + 'static> ModelSource<T> {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Observable(vec) => vec.len(),
            Self::Snapshot(vec) => vec.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<T> {
        match self {
            Self::Observable(vec) => vec.get(index),
            Self::Snapshot(vec) => vec.get(index),
        }
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        match self {
            Self::Observable(vec) => vec.to_vec(),
            Self::Snapshot(vec) => vec.to_vec(),
        }
    }

    /// Borrow the current contents without cloning.
    pub fn with_items<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        match self {
            Self::Observable(vec) => vec.with(f),
            Self::Snapshot(vec) => vec.with(f),
        }
    }

    /// Whether the synchronizer follows this source's changes.
    #[must_use]
    pub fn is_observable(&self) -> bool {
        matches!(self, Self::Observable(_))
    }

    #[must_use]
    pub fn as_observable(&self) -> Option<&ObservableVec<T>> {
        match self {
            Self::Observable(vec) => Some(vec),
            Self::Snapshot(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_empty_observable() {
        let source: ModelSource<u8> = ModelSource::default();
        assert!(source.is_observable());
        assert!(source.is_empty());
    }

    #[test]
    fn vec_becomes_snapshot() {
        let source = ModelSource::from(vec![1, 2]);
        assert!(!source.is_observable());
        assert!(source.as_observable().is_none());
        assert_eq!(source.to_vec(), vec![1, 2]);
        assert_eq!(source.get(1), Some(2));
    }

    #[test]
    fn snapshot_clone_shares_storage() {
        let snap = SnapshotVec::new(vec!['a']);
        let other = snap.clone();
        other.with_mut(|items| items.push('b'));
        assert_eq!(snap.to_vec(), vec!['a', 'b']);
        assert!(snap.ptr_eq(&other));
    }

    #[test]
    fn observable_source_reads_through() {
        let vec = ObservableVec::from_vec(vec![3, 4]);
        let source = ModelSource::from(vec.clone());
        vec.push(5).unwrap();
        assert_eq!(source.len(), 3);
        assert!(source.as_observable().is_some_and(|v| v.ptr_eq(&vec)));
    }
}
