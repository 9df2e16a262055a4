#![forbid(unsafe_code)]

//! Change notifications raised by [`ObservableVec`](super::ObservableVec).
//!
//! A [`CollectionChange`] describes one structural mutation: what kind of
//! mutation happened, where it started, and which items entered or left the
//! sequence. Items are carried in order.
//!
//! | Action    | `new_*` fields                | `old_*` fields                 |
//! |-----------|-------------------------------|--------------------------------|
//! | `Reset`   | empty                         | cleared items (may be empty)   |
//! | `Add`     | start + inserted items        | empty                          |
//! | `Remove`  | empty                         | start + removed items          |
//! | `Replace` | start + incoming items        | start + outgoing items         |
//! | `Move`    | destination + moved item      | source + moved item            |

/// Kind of structural mutation carried by a [`CollectionChange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeAction {
    /// The whole sequence changed; consumers should rebuild from scratch.
    Reset,
    /// Items were inserted.
    Add,
    /// Items were removed.
    Remove,
    /// Items were overwritten in place.
    Replace,
    /// An item moved to another index.
    Move,
}

/// One structural change to an observable sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionChange<T> {
    pub action: ChangeAction,
    pub new_starting_index: Option<usize>,
    pub new_items: Vec<T>,
    pub old_starting_index: Option<usize>,
    pub old_items: Vec<T>,
}

impl<T> CollectionChange<T> {
    /// A reset with no information about the previous contents.
    #[must_use]
    pub fn reset() -> Self {
        Self::reset_with_old(Vec::new())
    }

    /// A reset that also reports the items that were discarded.
    #[must_use]
    pub fn reset_with_old(old_items: Vec<T>) -> Self {
        Self {
            action: ChangeAction::Reset,
            new_starting_index: None,
            new_items: Vec::new(),
            old_starting_index: None,
            old_items,
        }
    }

    #[must_use]
    pub fn add(index: usize, new_items: Vec<T>) -> Self {
        Self {
            action: ChangeAction::Add,
            new_starting_index: Some(index),
            new_items,
            old_starting_index: None,
            old_items: Vec::new(),
        }
    }

    #[must_use]
    pub fn remove(index: usize, old_items: Vec<T>) -> Self {
        Self {
            action: ChangeAction::Remove,
            new_starting_index: None,
            new_items: Vec::new(),
            old_starting_index: Some(index),
            old_items,
        }
    }

    #[must_use]
    pub fn replace(index: usize, new_items: Vec<T>, old_items: Vec<T>) -> Self {
        Self {
            action: ChangeAction::Replace,
            new_starting_index: Some(index),
            new_items,
            old_starting_index: Some(index),
            old_items,
        }
    }

    #[must_use]
    pub fn moved(from: usize, to: usize, item: T) -> Self
    where
        T: Clone,
    {
        Self {
            action: ChangeAction::Move,
            new_starting_index: Some(to),
            new_items: vec![item.clone()],
            old_starting_index: Some(from),
            old_items: vec![item],
        }
    }

    /// Net change in sequence length implied by this notification, when it
    /// can be derived from the notification alone.
    ///
    /// Returns `None` for resets, whose effect depends on the source.
    #[must_use]
    pub fn len_delta(&self) -> Option<isize> {
        match self.action {
            ChangeAction::Reset => None,
            ChangeAction::Add => Some(self.new_items.len() as isize),
            ChangeAction::Remove => Some(-(self.old_items.len() as isize)),
            ChangeAction::Replace | ChangeAction::Move => Some(0),
        }
    }
}
