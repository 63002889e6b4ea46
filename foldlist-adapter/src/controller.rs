use alloc::collections::BTreeSet;

use foldlist::{
    Anchor, CollapsedSpan, ExpansionState, ItemId, OpSink, Reconciler, StreamingReconciler,
};

use crate::{
    AnchorKey, AnimatedItem, AnimationEnd, ItemLookup, PendingResync, Result, TransitionOptions,
    TransitionState, bind_post_transition, finish_animation,
};

/// A framework-neutral collection owner that drives transitions end to end.
///
/// This type holds no UI objects. The host calls, per transition:
/// - `begin_transition` before installing the new collection
/// - `set_anchors` once the new collection is installed
/// - `notify_after_data_set` with the new count and its operation sink
/// - `bind_item` whenever it (re)binds an item
/// - `on_animation_end` + `apply_resync` when an anchor's animation ends
///
/// It also keeps the positions whose next change must not animate; the host's animator checks
/// them with [`take_suppression`](Self::take_suppression).
#[derive(Clone, Debug)]
pub struct Controller<K = ItemId, D = CollapsedSpan, R = StreamingReconciler> {
    state: TransitionState<K, D, R>,
    item_count: usize,
    suppressed: BTreeSet<usize>,
}

impl<K: AnchorKey, D: Clone, R: Reconciler + Default> Default for Controller<K, D, R> {
    fn default() -> Self {
        Self::new(TransitionOptions::default())
    }
}

impl<K: AnchorKey, D: Clone, R: Reconciler + Default> Controller<K, D, R> {
    pub fn new(options: TransitionOptions) -> Self {
        Self::with_reconciler(options, R::default())
    }
}

impl<K: AnchorKey, D: Clone, R: Reconciler> Controller<K, D, R> {
    /// A controller planning its transitions with `reconciler`.
    pub fn with_reconciler(options: TransitionOptions, reconciler: R) -> Self {
        Self {
            state: TransitionState::with_reconciler(options, reconciler),
            item_count: 0,
            suppressed: BTreeSet::new(),
        }
    }

    pub fn state(&self) -> &TransitionState<K, D, R> {
        &self.state
    }

    pub fn into_state(self) -> TransitionState<K, D, R> {
        self.state
    }

    /// Item count of the collection currently installed.
    pub fn item_count(&self) -> usize {
        self.item_count
    }

    /// Starts a transition toward `target`, capturing the current item count.
    ///
    /// Suppression flags the host never consumed belong to the previous transition and are
    /// dropped here.
    pub fn begin_transition(&mut self, target: ExpansionState) -> Result<()> {
        self.state.begin_transition(target, self.item_count)?;
        if !self.suppressed.is_empty() {
            awarn!(
                leaked = self.suppressed.len(),
                "dropping unconsumed suppression flags"
            );
            self.suppressed.clear();
        }
        Ok(())
    }

    /// Registers the anchors of the transition; see [`TransitionState::set_anchors`].
    pub fn set_anchors<L: ItemLookup<D> + ?Sized>(
        &mut self,
        anchors: impl IntoIterator<Item = Anchor<K, D>>,
        lookup: &mut L,
    ) -> Result<()> {
        self.state.set_anchors(anchors, lookup)
    }

    /// Validates the transition, then emits its operations to `sink`.
    ///
    /// Returns the number of operations emitted. On error nothing reaches the sink.
    pub fn notify_after_data_set<S: OpSink + ?Sized>(
        &mut self,
        current_count: usize,
        sink: &mut S,
    ) -> Result<usize> {
        self.state.validate()?;
        let ops = self.state.plan(current_count)?;
        for op in &ops {
            op.apply_to(sink);
        }
        self.state.mark_applied()?;
        self.item_count = current_count;
        adebug!(ops = ops.len(), item_count = current_count, "notified");
        Ok(ops.len())
    }

    /// Post-transition bind for the item at `position`; see [`bind_post_transition`].
    pub fn bind_item<I: AnimatedItem<D> + ?Sized>(
        &mut self,
        item: &mut I,
        position: usize,
    ) -> bool {
        bind_post_transition(&mut self.state, item, position)
    }

    /// Animation-end handling for anchor `id`; see [`finish_animation`].
    pub fn on_animation_end<I: AnimatedItem<D> + ?Sized>(
        &mut self,
        id: &K,
        item: &mut I,
        end: AnimationEnd,
    ) -> Result<Option<PendingResync<K>>> {
        finish_animation(&mut self.state, id, item, end)
    }

    /// Clears the anchor and reports a change at its position with animation suppressed.
    ///
    /// The item id at that position changes from the anchor id to a gap id, which the host
    /// must learn about without animating it again. A resync whose anchor is no longer the
    /// completing one at `pending.index` fails with [`crate::Error::StaleResync`] before
    /// anything reaches the sink.
    pub fn apply_resync<S: OpSink + ?Sized>(
        &mut self,
        pending: PendingResync<K>,
        sink: &mut S,
    ) -> Result<Anchor<K, D>> {
        let anchor = self.state.complete_resync(&pending.id, pending.index)?;
        self.suppressed.insert(pending.index);
        sink.change(pending.index);
        Ok(anchor)
    }

    /// Whether the next change at `position` must not animate.
    pub fn is_suppressed(&self, position: usize) -> bool {
        self.suppressed.contains(&position)
    }

    /// Consumes the suppression flag for `position`. Returns `true` at most once per resync.
    pub fn take_suppression(&mut self, position: usize) -> bool {
        let taken = self.suppressed.remove(&position);
        if taken {
            atrace!(position, "suppression consumed");
        }
        taken
    }
}

impl<D: Clone, R> Controller<ItemId, D, R> {
    /// Stable id of the item at `position`; see [`TransitionState::item_id`].
    pub fn item_id(&self, position: usize) -> Result<ItemId> {
        self.state.item_id(position)
    }
}
