//! Collection-owner utilities for the `foldlist` crate.
//!
//! `foldlist` computes which list operations a transition needs. This crate covers the side
//! that owns the list data and drives a transition end to end:
//!
//! - [`TransitionState`]: the per-owner record (expansion state, previous count, anchors
//!   keyed by post-transition index) and the ordering discipline
//!   `begin_transition` → `set_anchors` → `validate` → `plan` → `mark_applied`
//! - lifecycle hooks binding anchor metadata to displayed items before and after a
//!   transition, and clearing it once an item's animation ends
//! - stable item ids for gap items that never collide across a direction flip
//! - [`Controller`]: all of the above plus the "apply this change without animating" flags
//!
//! This crate is framework-agnostic. Items are reached through the [`AnimatedItem`] and
//! [`ItemLookup`] traits.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod controller;
mod error;
mod hooks;
mod item;
mod key;
mod options;
mod state;

#[cfg(test)]
mod tests;

pub use controller::Controller;
pub use error::{Error, Result};
pub use hooks::{
    AnimationEnd, PendingResync, bind_post_transition, bind_pre_transition, finish_animation,
};
pub use item::{AnimatedItem, ItemAnim, ItemLookup};
pub use key::{AnchorKey, COLLAPSED_ID_OFFSET, gap_item_id};
pub use options::TransitionOptions;
pub use state::{AnchorPhase, TransitionPhase, TransitionState};

pub use foldlist::{
    Anchor, CollapsedSpan, ExpansionState, ItemId, Op, OpSink, Reconciler, StreamingReconciler,
};
