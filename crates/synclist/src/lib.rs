#![forbid(unsafe_code)]

//! Bidirectional synchronized collections.
//!
//! `synclist` keeps a *presentation* sequence (one view item per element)
//! aligned with a *model* sequence. Mutating either side applies the
//! equivalent mutation to the other, without feedback loops, and reuses
//! presentation items when an equal model item reappears.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use synclist::{ObservableVec, SyncedCollection, ViewModel};
//!
//! #[derive(Default)]
//! struct Label {
//!     text: String,
//! }
//!
//! impl ViewModel for Label {
//!     type Model = String;
//!     fn model(&self) -> &String { &self.text }
//!     fn set_model(&mut self, model: String) { self.text = model; }
//! }
//!
//! let names = ObservableVec::from_vec(vec!["ada".to_string()]);
//! let labels = SyncedCollection::<Label>::with_model(names.clone());
//!
//! names.push("grace".to_string()).unwrap();
//! assert_eq!(labels.get(1).unwrap().text, "grace");
//!
//! labels.items().remove(0).unwrap();
//! assert_eq!(names.to_vec(), vec!["grace".to_string()]);
//! ```
//!
//! # Threading
//!
//! Everything here is single-threaded (`Rc`/`RefCell`) and synchronous: a
//! sync pass runs to completion inside the call that mutated a sequence.

pub mod config;
pub mod error;
pub mod reactive;
pub mod sync;

pub use config::SyncConfig;
pub use error::{SyncError, SyncResult};
pub use reactive::{ChangeAction, CollectionChange, ObservableVec, Subscription};
pub use sync::{
    ModelSource, RECYCLE_CAPACITY, RecyclePool, SnapshotVec, SyncGuard, SyncTarget,
    SyncedCollection, SyncedCollectionBuilder, ViewModel, apply_change,
};
