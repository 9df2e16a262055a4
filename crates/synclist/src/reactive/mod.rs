#![forbid(unsafe_code)]

//! Observable sequences for synchronized collections.
//!
//! This module provides the change-tracking primitives the synchronizer is
//! built on:
//!
//! - [`ObservableVec`]: A shared, version-tracked `Vec<T>` that raises one
//!   [`CollectionChange`] per structural mutation.
//! - [`CollectionChange`] / [`ChangeAction`]: The notification value.
//! - [`Subscription`]: RAII guard that automatically unsubscribes on drop.
//!
//! # Architecture
//!
//! `ObservableVec<T>` uses `Rc<RefCell<..>>` for single-threaded shared
//! ownership. Handlers are stored as `Weak` function pointers and cleaned up
//! lazily during notification.
//!
//! # Invariants
//!
//! 1. Version increments exactly once per successful structural mutation.
//! 2. Subscribers are notified in registration order.
//! 3. Rejected mutations (bad index) change nothing and notify no one.
//! 4. Dropping a [`Subscription`] removes the handler before the next
//!    notification cycle.

pub mod change;
pub mod observable_vec;

pub use change::{ChangeAction, CollectionChange};
pub use observable_vec::{ObservableVec, Subscription};
