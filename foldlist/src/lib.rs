//! A headless engine for collapse/expand transitions of streamed lists.
//!
//! For collection-owner utilities (transition state, lifecycle hooks), see the
//! `foldlist-adapter` crate.
//!
//! When a list is replaced by a differently sized version of itself (for example every
//! paragraph collapsed into a one-line summary), a positional list host needs to be told which
//! structural operations to replay so that a handful of tracked items animate between their
//! two representations while everything else is swapped out wholesale.
//!
//! This crate computes that operation sequence from three inputs only:
//! - the previous item count
//! - the new item count
//! - a sparse set of [`Anchor`]s (items with a known before/after index and a stable id)
//!
//! The full before/after collections are never needed, so the data behind the list may be
//! streamed. The crate is UI-agnostic; the host applies the emitted [`Op`]s through an
//! [`OpSink`].
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod anchor;
mod error;
mod op;
mod options;
mod reconcile;
mod scale;
mod shadow;
mod types;


pub use anchor::Anchor;
pub use error::{Error, Result};
pub use op::{Op, OpSink};
pub use options::{CollisionPolicy, EmptyAnchorPolicy, ReconcileOptions};
pub use reconcile::{
    Reconciler, StreamingReconciler, reconcile, reconcile_into, reconcile_with,
};
pub use scale::scale_indices;
pub use shadow::{ShadowList, Slot};
pub use types::{CollapsedSpan, ExpansionState, ItemId};
