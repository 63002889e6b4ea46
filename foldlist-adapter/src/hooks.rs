//! Anchor lifecycle hooks.
//!
//! Anchor metadata travels to the renderer through the items themselves:
//!
//! - before the transition, the item still showing the anchor's old position is marked with
//!   the state it animates *from* ([`bind_pre_transition`])
//! - after the host re-binds the anchor's new position, that item is marked with the state it
//!   animates *to* ([`bind_post_transition`])
//! - when the animation ends the metadata is cleared and a silent change must be issued for
//!   the position ([`finish_animation`], then [`crate::Controller::apply_resync`])

use alloc::format;

use foldlist::{Anchor, Reconciler};

use crate::{AnchorKey, AnchorPhase, AnimatedItem, Error, ItemLookup, Result, TransitionState};

/// How an item's animation ended.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnimationEnd {
    /// `false` when the animation was interrupted to start the next one of a chain on the same
    /// item (e.g. a collapse reversed mid-way into an expand).
    pub sequence_finished: bool,
    /// Whether the animation ended through cancellation rather than running its course.
    pub cancelled: bool,
}

impl AnimationEnd {
    /// The animation ran to its end.
    pub fn finished() -> Self {
        Self {
            sequence_finished: true,
            cancelled: false,
        }
    }

    /// The animation was cancelled and nothing follows it.
    pub fn cancelled() -> Self {
        Self {
            sequence_finished: true,
            cancelled: true,
        }
    }

    /// The animation was cancelled to start the next one on the same item.
    pub fn interrupted() -> Self {
        Self {
            sequence_finished: false,
            cancelled: true,
        }
    }
}

/// A silent identity resync the host still has to apply.
///
/// Returned instead of being applied on the spot so that a host in the middle of a layout pass
/// can defer it to its next idle point.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[must_use = "the resync must be applied with Controller::apply_resync"]
pub struct PendingResync<K> {
    pub id: K,
    /// Position the change must be reported for.
    pub index: usize,
}

/// Marks the item currently displayed at `anchor.index_before` with the state it animates
/// from.
///
/// Both directions animate from a rendering of the expanded item, so the detail is attached
/// only when that displayed item is the expanded one. Returns `false` when nothing is
/// displayed at that position.
pub fn bind_pre_transition<K, D: Clone, L: ItemLookup<D> + ?Sized>(
    anchor: &Anchor<K, D>,
    lookup: &mut L,
) -> bool {
    let Some(item) = lookup.item_at(anchor.index_before) else {
        atrace!(index_before = anchor.index_before, "pre-transition item not displayed");
        return false;
    };
    let shown = anchor.target_state.opposite();
    item.set_expansion_state(Some(shown));
    item.set_anim_detail(shown.is_expanded().then(|| anchor.detail.clone()));
    true
}

/// Binds the item the host just created or re-bound for `position` of the new collection.
///
/// Anchored positions get the anchor's target state and detail and the anchor becomes
/// [`AnchorPhase::Bound`]; every other item is cleared. Returns whether metadata was attached.
pub fn bind_post_transition<K, D, R, I>(
    state: &mut TransitionState<K, D, R>,
    item: &mut I,
    position: usize,
) -> bool
where
    K: AnchorKey,
    D: Clone,
    R: Reconciler,
    I: AnimatedItem<D> + ?Sized,
{
    let live = matches!(
        state.anchor_phase_at(position),
        Some(AnchorPhase::Pending | AnchorPhase::Bound)
    );
    let anchor = state.anchor_at(position).filter(|_| live);
    match anchor {
        Some(anchor) => {
            item.set_expansion_state(Some(anchor.target_state));
            item.set_anim_detail(Some(anchor.detail.clone()));
            state.set_anchor_phase(position, AnchorPhase::Bound);
            true
        }
        None => {
            item.clear_anim();
            false
        }
    }
}

/// Handles the end of the animation of anchor `id` on `item`.
///
/// An interrupted link of an animation chain leaves everything in place and returns `None`.
/// Otherwise the item's metadata is cleared, the anchor becomes [`AnchorPhase::Completing`]
/// and the returned resync must be applied to finish it.
pub fn finish_animation<K, D, R, I>(
    state: &mut TransitionState<K, D, R>,
    id: &K,
    item: &mut I,
    end: AnimationEnd,
) -> Result<Option<PendingResync<K>>>
where
    K: AnchorKey,
    D: Clone,
    R: Reconciler,
    I: AnimatedItem<D> + ?Sized,
{
    adebug!(
        id = ?id,
        sequence_finished = end.sequence_finished,
        cancelled = end.cancelled,
        "animation ended"
    );
    if !end.sequence_finished {
        return Ok(None);
    }

    let index = state
        .anchor_by_id(id)
        .map(|a| a.index_after)
        .ok_or_else(|| Error::UnknownAnchor(format!("{id:?}")))?;
    if !item.is_custom_animated() {
        return Err(Error::MissingAnimationMetadata(format!("{id:?}")));
    }

    item.clear_anim();
    state.set_anchor_phase(index, AnchorPhase::Completing);
    Ok(Some(PendingResync {
        id: id.clone(),
        index,
    }))
}
