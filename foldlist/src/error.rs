//! Error types for the reconciliation engine.

use thiserror::Error;

use crate::Op;

/// Fatal conditions detected by the engine.
///
/// All of them are programming or configuration errors local to one transition. They are
/// raised before any operation reaches a sink.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // Precondition errors
    #[error("anchors must be sorted by index_before: {previous} is followed by {next}")]
    UnsortedAnchors { previous: usize, next: usize },

    #[error("two anchors share index_before {0}")]
    DuplicateIndexBefore(usize),

    #[error("two anchors share index_after {0}")]
    DuplicateIndexAfter(usize),

    #[error("index_before {index} out of range for previous count {count}")]
    IndexBeforeOutOfRange { index: usize, count: usize },

    #[error("index_after {index} out of range for current count {count}")]
    IndexAfterOutOfRange { index: usize, count: usize },

    // Configuration errors
    #[error("{anchors} anchors do not fit a current count of {count}")]
    NoRoom { anchors: usize, count: usize },

    #[error("scaled index {index} cannot be placed within [0, {max_index}]")]
    ScaleCollision { index: usize, max_index: usize },

    // Replay errors
    #[error("{op:?} is out of bounds for a list of length {len}")]
    OperationOutOfBounds { op: Op, len: usize },
}

/// Result type for engine operations.
pub type Result<T> = core::result::Result<T, Error>;
