#![forbid(unsafe_code)]

//! Error type shared by the observable sequences and the synchronizer.
//!
//! There is no recovery layer: every failure propagates unchanged to the
//! caller whose mutation started the sync pass.

use crate::reactive::ChangeAction;

/// Errors raised while mutating or synchronizing sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// An index was outside the valid range for the sequence.
    IndexOutOfRange { index: usize, len: usize },
    /// A change notification lacked the starting index its action needs.
    MissingIndex { action: ChangeAction },
    /// The two sequences have different lengths.
    LengthMismatch { model: usize, presentation: usize },
    /// `presentation[index].model()` differs from `model[index]`.
    Misaligned { index: usize },
    /// A configuration document could not be parsed.
    Config(String),
}

impl std::fmt::Display for SyncError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range for sequence of length {len}")
            }
            Self::MissingIndex { action } => {
                write!(f, "{action:?} notification is missing its starting index")
            }
            Self::LengthMismatch {
                model,
                presentation,
            } => write!(
                f,
                "model length {model} differs from presentation length {presentation}"
            ),
            Self::Misaligned { index } => {
                write!(f, "presentation item at {index} is bound to a different model item")
            }
            Self::Config(msg) => write!(f, "config error: {msg}"),
        }
    }
}

impl std::error::Error for SyncError {}

/// Result alias used throughout the crate.
pub type SyncResult<T> = Result<T, SyncError>;
