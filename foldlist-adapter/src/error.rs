//! Error types for the collection-owner side.

use alloc::string::String;

use foldlist::ExpansionState;
use thiserror::Error;

use crate::TransitionPhase;

/// Fatal conditions raised while driving a transition.
///
/// None of them is retried internally: each aborts the current transition and leaves the
/// decision to retry with corrected input to the host.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // Configuration errors
    #[error("expansion state is not set; begin_transition must run first")]
    ExpansionStateUnset,

    #[error(
        "every anchor must target the collection's expansion state {expected:?}, \
         but anchor {index_before} -> {index_after} targets {found:?}"
    )]
    MixedExpansionState {
        expected: ExpansionState,
        found: ExpansionState,
        index_before: usize,
        index_after: usize,
    },

    #[error("two anchors share index_after {0}")]
    DuplicateIndexAfter(usize),

    // Lifecycle misuse
    #[error("no anchor with id {0}")]
    UnknownAnchor(String),

    #[error("{step} called while the transition is {phase:?}")]
    OutOfOrder {
        step: &'static str,
        phase: TransitionPhase,
    },

    #[error("resync for anchor {id} at {index} no longer matches a completing anchor")]
    StaleResync { id: String, index: usize },

    #[error("the previous transition's operations have not been applied yet")]
    OperationsPending,

    #[error("animation of anchor {0} finished but the item carries no animation metadata")]
    MissingAnimationMetadata(String),

    #[error(transparent)]
    Reconcile(#[from] foldlist::Error),
}

/// Result type for adapter operations.
pub type Result<T> = core::result::Result<T, Error>;
