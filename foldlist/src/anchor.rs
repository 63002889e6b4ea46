use core::fmt;

use crate::{CollapsedSpan, ExpansionState, ItemId};

/// An item tracked across a transition so it can animate between its collapsed and expanded
/// representations.
///
/// Every other item of the list is a "gap" item and is replaced wholesale.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Anchor<K = ItemId, D = CollapsedSpan> {
    /// Identity that must stay attached to the same logical item across the transition.
    pub id: K,
    /// Position in the previous collection.
    pub index_before: usize,
    /// Position in the current collection.
    pub index_after: usize,
    /// The state this item animates toward.
    pub target_state: ExpansionState,
    /// Opaque animation parameters handed to the renderer.
    pub detail: D,
}

impl<K, D> Anchor<K, D> {
    pub fn new(
        id: K,
        index_before: usize,
        index_after: usize,
        target_state: ExpansionState,
        detail: D,
    ) -> Self {
        Self {
            id,
            index_before,
            index_after,
            target_state,
            detail,
        }
    }

    /// Whether the item changes position across the transition.
    pub fn moved(&self) -> bool {
        self.index_before != self.index_after
    }
}

impl<K: fmt::Debug, D: fmt::Debug> fmt::Debug for Anchor<K, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Anchor")
            .field("id", &self.id)
            .field("index_before", &self.index_before)
            .field("index_after", &self.index_after)
            .field("target_state", &self.target_state)
            .field("detail", &self.detail)
            .finish()
    }
}
