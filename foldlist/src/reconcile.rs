//! The streaming reconciliation engine.
//!
//! # Algorithm
//!
//! Only the two counts and the anchors' index pairs are known, so gap items are handled as
//! opaque ranges and anchors are walked in `index_before` order:
//!
//! 1. **Scale.** Every anchor is first placed at its proportional position in the new
//!    collection (see [`crate::scale_indices`]). Between consecutive anchors the old gap is
//!    removed and the new gap inserted, then the anchor itself is reported as changed. Anchors
//!    are never removed or inserted, so the walk keeps a size-neutral prefix behind it.
//! 2. **Move.** Each anchor then travels from its scaled position to `index_after`. Moves are
//!    computed against the live positions of every other anchor, so moves that cross each
//!    other (in either direction) never leave an anchor one slot off.
//!
//! The plan is computed completely before anything is handed to a sink: a failing reconcile
//! emits nothing.

use alloc::vec;
use alloc::vec::Vec;

use crate::op::OpEmitter;
use crate::{
    Anchor, EmptyAnchorPolicy, Error, Op, OpSink, ReconcileOptions, Result, scale_indices,
};

/// Strategy turning a transition into list operations.
///
/// Owners that drive transitions through `foldlist-adapter` plan with a `Reconciler`, so a host
/// can substitute its own operation sequence (for example always a full refresh) without
/// giving up the rest of the protocol.
pub trait Reconciler {
    fn reconcile<K, D>(
        &self,
        options: &ReconcileOptions,
        previous_count: usize,
        current_count: usize,
        anchors: &[Anchor<K, D>],
    ) -> Result<Vec<Op>>;
}

/// The streaming two-phase engine of this crate ([`reconcile_with`]).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamingReconciler;

impl Reconciler for StreamingReconciler {
    fn reconcile<K, D>(
        &self,
        options: &ReconcileOptions,
        previous_count: usize,
        current_count: usize,
        anchors: &[Anchor<K, D>],
    ) -> Result<Vec<Op>> {
        reconcile_with(options, previous_count, current_count, anchors)
    }
}

/// Computes the operation sequence with default options.
///
/// `anchors` must be sorted ascending by `index_before`.
pub fn reconcile<K, D>(
    previous_count: usize,
    current_count: usize,
    anchors: &[Anchor<K, D>],
) -> Result<Vec<Op>> {
    reconcile_with(
        &ReconcileOptions::default(),
        previous_count,
        current_count,
        anchors,
    )
}

/// Computes the operation sequence that turns a list of `previous_count` items into one of
/// `current_count` items while carrying every anchor from `index_before` to `index_after`.
///
/// Preconditions (each violation is an [`Error`]):
/// - `anchors` sorted strictly ascending by `index_before`
/// - no two anchors share `index_after`
/// - `index_before < previous_count` and `index_after < current_count`
///
/// The returned operations must be applied in order. Range and change operations come first,
/// moves strictly last.
pub fn reconcile_with<K, D>(
    options: &ReconcileOptions,
    previous_count: usize,
    current_count: usize,
    anchors: &[Anchor<K, D>],
) -> Result<Vec<Op>> {
    fdebug!(
        previous_count,
        current_count,
        anchors = anchors.len(),
        "reconcile"
    );

    if anchors.is_empty() {
        return Ok(without_anchors(options, previous_count, current_count));
    }

    let targets: Vec<usize> = anchors.iter().map(|a| a.index_after).collect();
    check_targets(&targets, current_count)?;

    let befores: Vec<usize> = anchors.iter().map(|a| a.index_before).collect();
    let scaled = scale_indices(options, previous_count, current_count, &befores)?;

    let mut out = OpEmitter::new(previous_count);
    emit_ranges(&mut out, previous_count, current_count, &befores, &scaled);
    debug_assert_eq!(out.len(), current_count, "range phase must end at current_count");
    emit_moves(&mut out, &scaled, &targets);

    let ops = out.into_ops();
    fdebug!(ops = ops.len(), "reconcile done");
    Ok(ops)
}

/// Computes the plan and forwards it to `sink`. Returns the number of operations emitted.
///
/// Nothing reaches the sink when reconciliation fails.
pub fn reconcile_into<K, D, S: OpSink + ?Sized>(
    options: &ReconcileOptions,
    previous_count: usize,
    current_count: usize,
    anchors: &[Anchor<K, D>],
    sink: &mut S,
) -> Result<usize> {
    let ops = reconcile_with(options, previous_count, current_count, anchors)?;
    for op in &ops {
        op.apply_to(sink);
    }
    Ok(ops.len())
}

fn without_anchors(
    options: &ReconcileOptions,
    previous_count: usize,
    current_count: usize,
) -> Vec<Op> {
    let mut out = OpEmitter::new(previous_count);
    match options.empty_anchors {
        EmptyAnchorPolicy::Delta => {
            if previous_count > current_count {
                out.remove_range(current_count, previous_count - current_count);
            } else {
                out.insert_range(previous_count, current_count - previous_count);
            }
        }
        EmptyAnchorPolicy::ReplaceAll => {
            out.remove_range(0, previous_count);
            out.insert_range(0, current_count);
        }
    }
    out.into_ops()
}

fn check_targets(targets: &[usize], current_count: usize) -> Result<()> {
    if let Some(&index) = targets.iter().find(|&&t| t >= current_count) {
        return Err(Error::IndexAfterOutOfRange {
            index,
            count: current_count,
        });
    }
    let mut sorted = targets.to_vec();
    sorted.sort_unstable();
    if let Some(pair) = sorted.windows(2).find(|w| w[0] == w[1]) {
        return Err(Error::DuplicateIndexAfter(pair[0]));
    }
    Ok(())
}

/// Phase A: replaces every gap and reports each anchor as changed at its scaled index.
///
/// `next_old` is the first previous-collection index not yet consumed; it currently sits at
/// `next_new`, the first position not yet finalized.
fn emit_ranges(
    out: &mut OpEmitter,
    previous_count: usize,
    current_count: usize,
    befores: &[usize],
    scaled: &[usize],
) {
    let mut next_old = 0usize;
    let mut next_new = 0usize;
    for (&before, &at) in befores.iter().zip(scaled) {
        out.remove_range(next_new, before - next_old);
        out.insert_range(next_new, at - next_new);
        out.change(at);
        next_old = before + 1;
        next_new = at + 1;
    }
    out.remove_range(next_new, previous_count - next_old);
    out.insert_range(next_new, current_count - next_new);
}

/// Phase B: moves every anchor from its scaled position to its target.
///
/// Anchors are settled in ascending target order. The "settled" view of the list is the list
/// without the anchors still waiting to move; a settled anchor always sits at its target within
/// that view, so settling the next one never disturbs the previous ones.
fn emit_moves(out: &mut OpEmitter, scaled: &[usize], targets: &[usize]) {
    let n = scaled.len();
    let mut positions = scaled.to_vec();
    let mut settled = vec![false; n];
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_unstable_by_key(|&i| targets[i]);

    for k in order {
        let from = positions[k];
        let waiting_before = (0..n)
            .filter(|&j| j != k && !settled[j] && positions[j] < from)
            .count();
        settled[k] = true;
        if from - waiting_before == targets[k] {
            continue;
        }

        let mut waiting: Vec<usize> = (0..n)
            .filter(|&j| !settled[j])
            .map(|j| lifted(positions[j], from))
            .collect();
        waiting.sort_unstable();
        let to = settled_slot(targets[k], &waiting);
        debug_assert_ne!(from, to);

        out.move_item(from, to);
        for (j, position) in positions.iter_mut().enumerate() {
            if j != k {
                *position = moved(*position, from, to);
            }
        }
        positions[k] = to;
    }
}

/// Position of `p` once the item at `from` has been lifted out.
fn lifted(p: usize, from: usize) -> usize {
    if p > from { p - 1 } else { p }
}

/// Position of `p` after the item at `from` moved to `to`.
fn moved(p: usize, from: usize, to: usize) -> usize {
    let p = lifted(p, from);
    if p >= to { p + 1 } else { p }
}

/// Smallest insertion index preceded by exactly `settled_before` settled items, given the
/// sorted positions of the items still waiting to move.
fn settled_slot(settled_before: usize, waiting: &[usize]) -> usize {
    if settled_before == 0 {
        return 0;
    }
    // Locate the settled item with settled index `settled_before - 1`.
    let mut x = settled_before - 1;
    for &w in waiting {
        if w <= x {
            x += 1;
        } else {
            break;
        }
    }
    x + 1
}
