#![forbid(unsafe_code)]

//! The presentation-item contract.

/// A presentation item wrapping exactly one model item.
///
/// Items are built with `Default`, bound with [`set_model`](Self::set_model),
/// and then handed to the optional initialization callback. The
/// synchronizer stores them as `Rc<Self>`, so identity is pointer identity;
/// view-specific state that changes after construction needs interior
/// mutability (`Cell`, `RefCell`).
///
/// ```
/// use synclist::ViewModel;
///
/// #[derive(Default)]
/// struct Row {
///     name: String,
/// }
///
/// impl ViewModel for Row {
///     type Model = String;
///
///     fn model(&self) -> &String {
///         &self.name
///     }
///
///     fn set_model(&mut self, model: String) {
///         self.name = model;
///     }
/// }
/// ```
pub trait ViewModel: Default + 'static {
    /// The wrapped model item. Compared by `PartialEq` when recycling.
    type Model: Clone + PartialEq + 'static;

    /// The bound model item.
    fn model(&self) -> &Self::Model;

    /// Bind the item to `model`.
    fn set_model(&mut self, model: Self::Model);
}
