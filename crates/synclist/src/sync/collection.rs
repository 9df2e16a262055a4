#![forbid(unsafe_code)]

//! Bidirectional synchronization between a model sequence and a
//! presentation sequence.
//!
//! A [`SyncedCollection<V>`] owns an [`ObservableVec<Rc<V>>`] of
//! presentation items and keeps it aligned with a bound [`ModelSource`].
//! Changes flow both ways:
//!
//! - model → presentation: each model item is turned into a presentation
//!   item by the factory (recycled or freshly built);
//! - presentation → model: each presentation item is projected back to its
//!   `model()`.
//!
//! ```
//! use std::rc::Rc;
//! use synclist::{ObservableVec, SyncedCollection, ViewModel};
//!
//! #[derive(Default)]
//! struct Row(u32);
//!
//! impl ViewModel for Row {
//!     type Model = u32;
//!     fn model(&self) -> &u32 { &self.0 }
//!     fn set_model(&mut self, model: u32) { self.0 = model; }
//! }
//!
//! let model = ObservableVec::from_vec(vec![1, 2, 3]);
//! let synced: SyncedCollection<Row> = SyncedCollection::with_model(model.clone());
//!
//! let removed = synced.get(1).unwrap();
//! model.remove(1).unwrap();
//! model.insert(1, 2).unwrap();
//! assert!(Rc::ptr_eq(&removed, &synced.get(1).unwrap()));
//!
//! synced.items().push(Rc::new(Row(4))).unwrap();
//! assert_eq!(model.to_vec(), vec![1, 2, 3, 4]);
//! ```
//!
//! # Invariants
//!
//! 1. After every completed sync pass, both sequences have the same length.
//! 2. After every completed sync pass, `items[i].model() == model[i]`.
//! 3. A notification raised while a pass is applying never starts another
//!    pass.
//! 4. The initialization callback runs exactly once per freshly built item
//!    and never for recycled ones.
//!
//! # Failure Modes
//!
//! - **Index errors** (a notification inconsistent with the target's length)
//!   propagate to the caller that performed the original mutation. The pass
//!   stops where it failed and the sequences may stay misaligned; there is no
//!   rollback. The guard is always released.
//! - **Panicking initialization callback**: unwinds through the mutation
//!   call. The guard is released by unwinding.
//! - **Move notifications** are not synchronized (see
//!   [`apply_change`](super::apply::apply_change)).
//! - **Threads**: every type here is `!Send`. Concurrent mutation of the two
//!   sequences is impossible to express; the guard is not a lock.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use tracing::{debug, debug_span, trace};

use super::apply::apply_change;
use super::guard::SyncGuard;
use super::model::ModelSource;
use super::recycle::RecyclePool;
use super::view_model::ViewModel;
use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::reactive::{ChangeAction, CollectionChange, ObservableVec, Subscription};

type InitCallback<V> = Box<dyn Fn(&mut V)>;

/// Shared state reached from both change handlers.
struct SyncState<V: ViewModel> {
    items: ObservableVec<Rc<V>>,
    model: RefCell<ModelSource<V::Model>>,
    model_subscription: RefCell<Option<Subscription>>,
    syncing: Cell<bool>,
    pool: RefCell<RecyclePool<V>>,
    recycle: bool,
    on_item_initialized: Option<InitCallback<V>>,
}

impl<V: ViewModel> SyncState<V> {
    /// Presentation item for `model`: a pooled match, or a fresh item.
    fn produce(&self, model: &V::Model) -> Rc<V> {
        if self.recycle {
            let recycled = self.pool.borrow_mut().take_matching(model);
            if let Some(item) = recycled {
                trace!("recycled presentation item");
                return item;
            }
        }

        build_item(model, self.on_item_initialized.as_deref())
    }

    /// Presentation → model.
    fn on_items_changed(&self, change: &CollectionChange<Rc<V>>) -> SyncResult<()> {
        if self.recycle {
            let mut pool = self.pool.borrow_mut();
            if matches!(change.action, ChangeAction::Remove | ChangeAction::Reset) {
                for item in &change.old_items {
                    pool.offer(item);
                }
            }
            // Live items must never be handed out by the factory.
            for item in &change.new_items {
                pool.withdraw(item);
            }
            if change.action == ChangeAction::Reset {
                self.items.with(|current| {
                    for item in current {
                        pool.withdraw(item);
                    }
                });
            }
        }

        let Some(_guard) = SyncGuard::try_enter(&self.syncing) else {
            return Ok(());
        };
        let _span = debug_span!("sync_to_model", action = ?change.action).entered();
        let model = self.model.borrow().clone();
        apply_change(
            &model,
            change,
            || self.items.to_vec(),
            |item| item.model().clone(),
        )
    }

    /// Model → presentation.
    fn on_model_changed(&self, change: &CollectionChange<V::Model>) -> SyncResult<()> {
        let Some(_guard) = SyncGuard::try_enter(&self.syncing) else {
            return Ok(());
        };
        let _span = debug_span!("sync_to_items", action = ?change.action).entered();
        apply_change(
            &self.items,
            change,
            || self.model.borrow().to_vec(),
            |model| self.produce(model),
        )
    }
}

/// A presentation sequence kept aligned with a model sequence.
///
/// Dropping the collection (or calling [`detach`](Self::detach)) releases
/// both subscriptions; no handler runs afterwards.
pub struct SyncedCollection<V: ViewModel> {
    state: Rc<SyncState<V>>,
    _items_subscription: Subscription,
}

impl<V: ViewModel> SyncedCollection<V> {
    /// Synchronizer bound to a fresh, empty observable model.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Synchronizer bound to `model`, with default settings.
    #[must_use]
    pub fn with_model(model: impl Into<ModelSource<V::Model>>) -> Self {
        Self::builder().model(model).build()
    }

    #[must_use]
    pub fn builder() -> SyncedCollectionBuilder<V> {
        SyncedCollectionBuilder::new()
    }

    fn from_parts(
        model: ModelSource<V::Model>,
        config: SyncConfig,
        on_item_initialized: Option<InitCallback<V>>,
    ) -> Self {
        // Initial contents go in without notifications, so nothing can fail.
        let initial: Vec<Rc<V>> = model.with_items(|models| {
            models
                .iter()
                .map(|item| build_item(item, on_item_initialized.as_deref()))
                .collect()
        });
        let state = Rc::new(SyncState {
            items: ObservableVec::from_vec(initial),
            model: RefCell::new(ModelSource::default()),
            model_subscription: RefCell::new(None),
            syncing: Cell::new(false),
            pool: RefCell::new(RecyclePool::new()),
            recycle: config.recycle_view_models,
            on_item_initialized,
        });
        bind_model(&state, model);

        let weak = Rc::downgrade(&state);
        let items_subscription = state.items.subscribe(move |change| match weak.upgrade() {
            Some(state) => state.on_items_changed(change),
            None => Ok(()),
        });

        debug!(
            len = state.items.len(),
            recycle = state.recycle,
            "synced collection created"
        );
        Self {
            state,
            _items_subscription: items_subscription,
        }
    }

    /// Rebind to a new model sequence and rebuild the presentation sequence.
    ///
    /// The previous model's subscription is released first. Prior
    /// presentation items are offered to the recycling pool (when enabled)
    /// and reused for equal model items.
    ///
    /// Called from inside a handler while a sync pass is applying, only the
    /// binding changes; the rebuild is skipped like any re-entrant pass.
    ///
    /// # Errors
    ///
    /// Propagates errors raised by other subscribers of the presentation
    /// sequence while it is rebuilt.
    pub fn set_model(&self, model: impl Into<ModelSource<V::Model>>) -> SyncResult<()> {
        let model = model.into();
        debug!(
            len = model.len(),
            observable = model.is_observable(),
            "binding model sequence"
        );
        bind_model(&self.state, model);
        self.state.on_model_changed(&CollectionChange::reset())
    }

    /// Handle to the presentation sequence. Mutations made through it are
    /// propagated to the model.
    #[must_use]
    pub fn items(&self) -> ObservableVec<Rc<V>> {
        self.state.items.clone()
    }

    /// Handle to the bound model sequence.
    #[must_use]
    pub fn model(&self) -> ModelSource<V::Model> {
        self.state.model.borrow().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.state.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.items.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<Rc<V>> {
        self.state.items.get(index)
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<Rc<V>> {
        self.state.items.to_vec()
    }

    /// Whether a sync pass is currently applying.
    #[must_use]
    pub fn is_syncing(&self) -> bool {
        self.state.syncing.get()
    }

    #[must_use]
    pub fn recycling_enabled(&self) -> bool {
        self.state.recycle
    }

    /// Number of retired items currently available for reuse.
    #[must_use]
    pub fn pooled_count(&self) -> usize {
        self.state.pool.borrow().len()
    }

    /// Forget every pooled item.
    pub fn clear_pool(&self) {
        self.state.pool.borrow_mut().clear();
    }

    /// Verify the length and pointwise binding invariants.
    ///
    /// # Errors
    ///
    /// [`SyncError::LengthMismatch`] or [`SyncError::Misaligned`] for the
    /// first violation found.
    pub fn check_alignment(&self) -> SyncResult<()> {
        let model = self.state.model.borrow().to_vec();
        self.state.items.with(|items| {
            if items.len() != model.len() {
                return Err(SyncError::LengthMismatch {
                    model: model.len(),
                    presentation: items.len(),
                });
            }
            match items
                .iter()
                .zip(&model)
                .position(|(item, expected)| item.model() != expected)
            {
                Some(index) => Err(SyncError::Misaligned { index }),
                None => Ok(()),
            }
        })
    }

    /// Stop synchronizing and hand back both sequences.
    pub fn detach(self) -> (ObservableVec<Rc<V>>, ModelSource<V::Model>) {
        let items = self.items();
        let model = self.model();
        self.state.model_subscription.borrow_mut().take();
        debug!("synced collection detached");
        (items, model)
    }
}

impl<V: ViewModel> Default for SyncedCollection<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: ViewModel> std::fmt::Debug for SyncedCollection<V>
where
    V::Model: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncedCollection")
            .field("len", &self.state.items.len())
            .field("model", &*self.state.model.borrow())
            .field("recycle", &self.state.recycle)
            .field("pool", &*self.state.pool.borrow())
            .finish()
    }
}

/// Fresh presentation item bound to `model`.
fn build_item<V: ViewModel>(model: &V::Model, init: Option<&dyn Fn(&mut V)>) -> Rc<V> {
    let mut item = V::default();
    item.set_model(model.clone());
    if let Some(init) = init {
        init(&mut item);
    }
    Rc::new(item)
}

/// Swap the bound model, moving the change subscription along with it.
fn bind_model<V: ViewModel>(state: &Rc<SyncState<V>>, model: ModelSource<V::Model>) {
    state.model_subscription.borrow_mut().take();

    let subscription = model.as_observable().map(|vec| {
        let weak: Weak<SyncState<V>> = Rc::downgrade(state);
        vec.subscribe(move |change| match weak.upgrade() {
            Some(state) => state.on_model_changed(change),
            None => Ok(()),
        })
    });

    *state.model.borrow_mut() = model;
    *state.model_subscription.borrow_mut() = subscription;
}

/// Builder for [`SyncedCollection`].
///
/// ```
/// use synclist::{SyncedCollection, ViewModel};
///
/// #[derive(Default)]
/// struct Row {
///     label: String,
///     width: usize,
/// }
///
/// impl ViewModel for Row {
///     type Model = String;
///     fn model(&self) -> &String { &self.label }
///     fn set_model(&mut self, model: String) { self.label = model; }
/// }
///
/// let synced = SyncedCollection::<Row>::builder()
///     .model(vec!["ab".to_string(), "cde".to_string()])
///     .recycle_view_models(false)
///     .on_item_initialized(|row: &mut Row| row.width = row.label.len())
///     .build();
/// assert_eq!(synced.get(1).unwrap().width, 3);
/// ```
pub struct SyncedCollectionBuilder<V: ViewModel> {
    model: Option<ModelSource<V::Model>>,
    config: SyncConfig,
    on_item_initialized: Option<InitCallback<V>>,
}

impl<V: ViewModel> Default for SyncedCollectionBuilder<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: ViewModel> SyncedCollectionBuilder<V> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            model: None,
            config: SyncConfig::default(),
            on_item_initialized: None,
        }
    }

    /// Initial model sequence. Without one, a fresh empty observable
    /// sequence is bound.
    #[must_use]
    pub fn model(mut self, model: impl Into<ModelSource<V::Model>>) -> Self {
        self.model = Some(model.into());
        self
    }

    #[must_use]
    pub fn config(mut self, config: SyncConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn recycle_view_models(mut self, enabled: bool) -> Self {
        self.config.recycle_view_models = enabled;
        self
    }

    /// Called once on every freshly built presentation item, after its model
    /// is set. Not called for recycled items.
    #[must_use]
    pub fn on_item_initialized(mut self, callback: impl Fn(&mut V) + 'static) -> Self {
        self.on_item_initialized = Some(Box::new(callback));
        self
    }

    #[must_use]
    pub fn build(self) -> SyncedCollection<V> {
        SyncedCollection::from_parts(
            self.model.unwrap_or_default(),
            self.config,
            self.on_item_initialized,
        )
    }
}

impl<V: ViewModel> std::fmt::Debug for SyncedCollectionBuilder<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncedCollectionBuilder")
            .field("has_model", &self.model.is_some())
            .field("config", &self.config)
            .field("has_init_callback", &self.on_item_initialized.is_some())
            .finish()
    }
}
