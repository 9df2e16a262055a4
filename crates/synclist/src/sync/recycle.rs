#![forbid(unsafe_code)]

//! Fixed-capacity recycling pool for retired presentation items.
//!
//! # Design
//!
//! The pool is an array of optional slots plus a write cursor. [`offer`]
//! always writes at the cursor and advances it modulo capacity, so the pool
//! never grows and the oldest entry is silently overwritten once it is full.
//! Eviction is pure FIFO by insertion order.
//!
//! Lookups are linear scans. Capacity is a small constant, so every
//! operation is O(1) in practice.
//!
//! Reuse is a cache hint, not an ownership handoff: [`take_matching`] clears
//! the slot it returns but does not move the cursor, and the vacated slot is
//! refilled when the cursor next reaches it.
//!
//! [`offer`]: RecyclePool::offer
//! [`take_matching`]: RecyclePool::take_matching

use std::rc::Rc;

use super::view_model::ViewModel;

/// Number of retired items the pool remembers.
pub const RECYCLE_CAPACITY: usize = 8;

/// Ring buffer of retired presentation items.
pub struct RecyclePool<V> {
    slots: [Option<Rc<V>>; RECYCLE_CAPACITY],
    cursor: usize,
}

impl<V> Default for RecyclePool<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> RecyclePool<V> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
            cursor: 0,
        }
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        RECYCLE_CAPACITY
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Whether this exact item (by pointer) is pooled.
    #[must_use]
    pub fn contains(&self, item: &Rc<V>) -> bool {
        self.slots
            .iter()
            .flatten()
            .any(|pooled| Rc::ptr_eq(pooled, item))
    }

    /// Pool `item`, overwriting the oldest entry when full.
    ///
    /// Returns `false` without touching the cursor when the same item is
    /// already pooled.
    pub fn offer(&mut self, item: &Rc<V>) -> bool {
        if self.contains(item) {
            return false;
        }
        self.slots[self.cursor] = Some(Rc::clone(item));
        self.cursor = (self.cursor + 1) % RECYCLE_CAPACITY;
        true
    }

    /// Drop this exact item from the pool, if present.
    pub fn withdraw(&mut self, item: &Rc<V>) -> bool {
        let mut found = false;
        for slot in &mut self.slots {
            if slot.as_ref().is_some_and(|pooled| Rc::ptr_eq(pooled, item)) {
                *slot = None;
                found = true;
            }
        }
        found
    }

    /// Empty every slot and rewind the cursor.
    pub fn clear(&mut self) {
        self.slots = std::array::from_fn(|_| None);
        self.cursor = 0;
    }
}

/// Slot indices from most to least recently written, given the cursor.
fn newest_first(cursor: usize) -> impl Iterator<Item = usize> {
    (1..=RECYCLE_CAPACITY).map(move |back| (cursor + RECYCLE_CAPACITY - back) % RECYCLE_CAPACITY)
}

impl<V: ViewModel> RecyclePool<V> {
    /// Remove and return a pooled item bound to a model equal to `model`.
    ///
    /// The most recently pooled match wins.
    pub fn take_matching(&mut self, model: &V::Model) -> Option<Rc<V>> {
        let index = newest_first(self.cursor).find(|&i| {
            self.slots[i]
                .as_ref()
                .is_some_and(|pooled| pooled.model() == model)
        })?;
        self.slots[index].take()
    }
}

impl<V> std::fmt::Debug for RecyclePool<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecyclePool")
            .field("len", &self.len())
            .field("cursor", &self.cursor)
            .finish()
    }
}
