use alloc::collections::BTreeMap;
use alloc::format;
use alloc::vec::Vec;

use foldlist::{Anchor, CollapsedSpan, ExpansionState, ItemId, Op, Reconciler, StreamingReconciler};

use crate::{
    AnchorKey, Error, ItemLookup, Result, TransitionOptions, bind_pre_transition, gap_item_id,
};

/// Where a [`TransitionState`] stands in the per-transition protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionPhase {
    /// No transition in progress.
    Idle,
    /// `begin_transition` recorded the previous count and the new expansion state.
    Begun,
    /// Anchors registered for the transition.
    AnchorsSet,
    /// Anchors checked against the expansion state.
    Validated,
    /// A plan has been handed out and not yet reported as applied.
    Planned,
}

/// Lifecycle of a single anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AnchorPhase {
    /// Registered by `set_anchors`.
    Pending,
    /// Metadata attached to the post-transition item; the animation is running.
    Bound,
    /// Animation finished; the silent resync is pending.
    Completing,
    /// Metadata removed. Ids without live metadata report this phase.
    Cleared,
}

#[derive(Clone, Debug)]
struct Entry<K, D> {
    anchor: Anchor<K, D>,
    phase: AnchorPhase,
}

/// Per-owner transition record.
///
/// One instance lives as long as the collection owner. Each transition runs, in order:
///
/// 1. [`begin_transition`](Self::begin_transition), before the new collection is installed
/// 2. [`set_anchors`](Self::set_anchors)
/// 3. [`validate`](Self::validate)
/// 4. [`plan`](Self::plan), whose operations the host applies
/// 5. [`mark_applied`](Self::mark_applied)
///
/// Anchors are keyed by post-transition index and drained one at a time with
/// [`complete_anchor`](Self::complete_anchor) as their animations end, which may overlap with
/// the next transition being prepared.
///
/// Plans come from `R`, the streaming engine of `foldlist` unless the owner supplies its own
/// [`Reconciler`] through [`with_reconciler`](Self::with_reconciler).
#[derive(Clone, Debug)]
pub struct TransitionState<K = ItemId, D = CollapsedSpan, R = StreamingReconciler> {
    options: TransitionOptions,
    reconciler: R,
    phase: TransitionPhase,
    expansion_state: Option<ExpansionState>,
    previous_item_count: usize,
    anchors: BTreeMap<usize, Entry<K, D>>,
}

impl<K: AnchorKey, D: Clone, R: Reconciler + Default> Default for TransitionState<K, D, R> {
    fn default() -> Self {
        Self::new(TransitionOptions::default())
    }
}

impl<K: AnchorKey, D: Clone, R: Reconciler + Default> TransitionState<K, D, R> {
    pub fn new(options: TransitionOptions) -> Self {
        Self::with_reconciler(options, R::default())
    }
}

impl<K: AnchorKey, D: Clone, R: Reconciler> TransitionState<K, D, R> {
    pub fn with_reconciler(options: TransitionOptions, reconciler: R) -> Self {
        Self {
            options,
            reconciler,
            phase: TransitionPhase::Idle,
            expansion_state: None,
            previous_item_count: 0,
            anchors: BTreeMap::new(),
        }
    }

    pub fn options(&self) -> &TransitionOptions {
        &self.options
    }

    pub fn reconciler(&self) -> &R {
        &self.reconciler
    }

    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    pub fn expansion_state(&self) -> Option<ExpansionState> {
        self.expansion_state
    }

    pub fn previous_item_count(&self) -> usize {
        self.previous_item_count
    }

    pub fn anchor_count(&self) -> usize {
        self.anchors.len()
    }

    /// Live anchors ordered by post-transition index.
    pub fn anchors(&self) -> impl Iterator<Item = &Anchor<K, D>> {
        self.anchors.values().map(|e| &e.anchor)
    }

    pub fn anchor_at(&self, index_after: usize) -> Option<&Anchor<K, D>> {
        self.anchors.get(&index_after).map(|e| &e.anchor)
    }

    pub fn anchor_by_id(&self, id: &K) -> Option<&Anchor<K, D>> {
        self.entry_by_id(id).map(|(_, e)| &e.anchor)
    }

    pub fn anchor_phase(&self, id: &K) -> AnchorPhase {
        self.entry_by_id(id)
            .map(|(_, e)| e.phase)
            .unwrap_or(AnchorPhase::Cleared)
    }

    pub(crate) fn anchor_phase_at(&self, index_after: usize) -> Option<AnchorPhase> {
        self.anchors.get(&index_after).map(|e| e.phase)
    }

    pub(crate) fn set_anchor_phase(&mut self, index_after: usize, phase: AnchorPhase) {
        if let Some(entry) = self.anchors.get_mut(&index_after) {
            atrace!(index_after, from = ?entry.phase, to = ?phase, "anchor phase");
            entry.phase = phase;
        }
    }

    fn entry_by_id(&self, id: &K) -> Option<(usize, &Entry<K, D>)> {
        self.anchors
            .iter()
            .find(|(_, e)| &e.anchor.id == id)
            .map(|(&index, e)| (index, e))
    }

    /// Records the count of the collection about to be replaced and the expansion state the
    /// whole collection moves to.
    ///
    /// Starting over from any phase but [`TransitionPhase::Planned`] abandons the transition in
    /// progress.
    pub fn begin_transition(&mut self, state: ExpansionState, current_count: usize) -> Result<()> {
        if self.phase == TransitionPhase::Planned {
            return Err(Error::OperationsPending);
        }
        adebug!(?state, previous_item_count = current_count, "begin_transition");
        self.previous_item_count = current_count;
        self.expansion_state = Some(state);
        self.phase = TransitionPhase::Begun;
        Ok(())
    }

    /// Replaces the anchor set.
    ///
    /// Every anchor is first bound to the item currently displayed at its `index_before` (see
    /// [`bind_pre_transition`]), then registered under its `index_after`. On error nothing is
    /// replaced.
    pub fn set_anchors<L: ItemLookup<D> + ?Sized>(
        &mut self,
        anchors: impl IntoIterator<Item = Anchor<K, D>>,
        lookup: &mut L,
    ) -> Result<()> {
        self.expect_phase("set_anchors", &[TransitionPhase::Begun])?;

        let anchors: Vec<Anchor<K, D>> = anchors.into_iter().collect();
        let mut targets: Vec<usize> = anchors.iter().map(|a| a.index_after).collect();
        targets.sort_unstable();
        if let Some(pair) = targets.windows(2).find(|w| w[0] == w[1]) {
            return Err(Error::DuplicateIndexAfter(pair[0]));
        }

        if !self.anchors.is_empty() {
            adebug!(dropped = self.anchors.len(), "replacing live anchors");
        }
        self.anchors.clear();
        for anchor in anchors {
            bind_pre_transition(&anchor, lookup);
            adebug!(
                id = ?anchor.id,
                index_before = anchor.index_before,
                index_after = anchor.index_after,
                "anchor registered"
            );
            self.anchors.insert(
                anchor.index_after,
                Entry {
                    anchor,
                    phase: AnchorPhase::Pending,
                },
            );
        }
        self.phase = TransitionPhase::AnchorsSet;
        Ok(())
    }

    /// Checks that the expansion state is set and every anchor targets it.
    pub fn validate(&mut self) -> Result<()> {
        let expected = self.expansion_state.ok_or(Error::ExpansionStateUnset)?;
        self.expect_phase(
            "validate",
            &[TransitionPhase::AnchorsSet, TransitionPhase::Validated],
        )?;
        if let Some(entry) = self
            .anchors
            .values()
            .find(|e| e.anchor.target_state != expected)
        {
            return Err(Error::MixedExpansionState {
                expected,
                found: entry.anchor.target_state,
                index_before: entry.anchor.index_before,
                index_after: entry.anchor.index_after,
            });
        }
        self.phase = TransitionPhase::Validated;
        Ok(())
    }

    /// Computes the operations turning the previous collection into one of `current_count`
    /// items. The host must apply them, in order, and then call
    /// [`mark_applied`](Self::mark_applied).
    pub fn plan(&mut self, current_count: usize) -> Result<Vec<Op>> {
        if self.phase == TransitionPhase::Planned {
            return Err(Error::OperationsPending);
        }
        self.expect_phase("plan", &[TransitionPhase::Validated])?;

        let mut anchors: Vec<Anchor<K, D>> = self.anchors().cloned().collect();
        anchors.sort_unstable_by_key(|a| a.index_before);
        let ops = self.reconciler.reconcile(
            &self.options.reconcile,
            self.previous_item_count,
            current_count,
            &anchors,
        )?;
        self.phase = TransitionPhase::Planned;
        Ok(ops)
    }

    /// Reports that the host applied the last plan.
    pub fn mark_applied(&mut self) -> Result<()> {
        self.expect_phase("mark_applied", &[TransitionPhase::Planned])?;
        self.phase = TransitionPhase::Idle;
        Ok(())
    }

    /// Removes the anchor with `id`; its animation is over.
    ///
    /// The returned anchor no longer takes part in reconciliation or id lookups.
    pub fn complete_anchor(&mut self, id: &K) -> Result<Anchor<K, D>> {
        let entry = self
            .entry_by_id(id)
            .map(|(index_after, _)| index_after)
            .and_then(|index_after| self.anchors.remove(&index_after))
            .ok_or_else(|| Error::UnknownAnchor(format!("{id:?}")))?;
        adebug!(id = ?id, index_after = entry.anchor.index_after, "anchor cleared");
        Ok(entry.anchor)
    }

    /// Removes the anchor a [`crate::PendingResync`] was issued for.
    ///
    /// The entry at `index_after` must still be the [`AnchorPhase::Completing`] anchor with
    /// `id`; a resync that outlived its transition (the anchor set was replaced, possibly
    /// re-registering the same id) is rejected and nothing is removed.
    pub(crate) fn complete_resync(&mut self, id: &K, index_after: usize) -> Result<Anchor<K, D>> {
        let stale = || Error::StaleResync {
            id: format!("{id:?}"),
            index: index_after,
        };
        let live = self.anchors.get(&index_after).is_some_and(|e| {
            &e.anchor.id == id && e.phase == AnchorPhase::Completing
        });
        if !live {
            awarn!(id = ?id, index_after, "rejecting stale resync");
            return Err(stale());
        }
        let entry = self.anchors.remove(&index_after).ok_or_else(stale)?;
        adebug!(id = ?id, index_after, "anchor cleared after resync");
        Ok(entry.anchor)
    }

    fn expect_phase(&self, step: &'static str, allowed: &[TransitionPhase]) -> Result<()> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(Error::OutOfOrder {
                step,
                phase: self.phase,
            })
        }
    }
}

impl<D: Clone, R> TransitionState<ItemId, D, R> {
    /// Stable id of the item at `position` of the current collection.
    ///
    /// Anchored positions keep the anchor's id; gap items get [`gap_item_id`].
    pub fn item_id(&self, position: usize) -> Result<ItemId> {
        let state = self.expansion_state.ok_or(Error::ExpansionStateUnset)?;
        Ok(self
            .anchors
            .get(&position)
            .map(|e| e.anchor.id)
            .unwrap_or_else(|| gap_item_id(state, position, self.options.collapsed_id_offset)))
    }
}
