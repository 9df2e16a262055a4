#![forbid(unsafe_code)]

//! Model/presentation synchronization.
//!
//! - [`SyncedCollection`]: keeps an observable sequence of presentation
//!   items aligned with a model sequence, in both directions.
//! - [`ViewModel`]: the contract a presentation item implements.
//! - [`ModelSource`] / [`SnapshotVec`]: what a synchronizer can be bound to.
//! - [`apply_change`] / [`SyncTarget`]: replay a change notification onto
//!   another sequence.
//! - [`RecyclePool`]: bounded pool of retired presentation items.
//! - [`SyncGuard`]: the re-entrancy guard around each sync pass.

pub mod apply;
pub mod collection;
pub mod guard;
pub mod model;
pub mod recycle;
pub mod view_model;

pub use apply::{SyncTarget, apply_change};
pub use collection::{SyncedCollection, SyncedCollectionBuilder};
pub use guard::SyncGuard;
pub use model::{ModelSource, SnapshotVec};
pub use recycle::{RECYCLE_CAPACITY, RecyclePool};
pub use view_model::ViewModel;
