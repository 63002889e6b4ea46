use foldlist::ReconcileOptions;

use crate::COLLAPSED_ID_OFFSET;

/// Configuration for [`crate::TransitionState`] and [`crate::Controller`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransitionOptions {
    pub reconcile: ReconcileOptions,
    /// Offset added to gap item ids while the collection is collapsed.
    pub collapsed_id_offset: u64,
}

impl Default for TransitionOptions {
    fn default() -> Self {
        Self {
            reconcile: ReconcileOptions::default(),
            collapsed_id_offset: COLLAPSED_ID_OFFSET,
        }
    }
}

impl TransitionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reconcile(mut self, reconcile: ReconcileOptions) -> Self {
        self.reconcile = reconcile;
        self
    }

    pub fn with_collapsed_id_offset(mut self, collapsed_id_offset: u64) -> Self {
        self.collapsed_id_offset = collapsed_id_offset;
        self
    }
}
