/// What to emit when a transition carries no anchors.
///
/// Without anchors nothing distinguishes one item from another, so the engine cannot tell a
/// resize apart from a full replacement; the caller picks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EmptyAnchorPolicy {
    /// Emit only the size delta: a trailing remove or insert. Equal counts emit nothing.
    #[default]
    Delta,
    /// Remove every previous item, then insert every current item.
    ReplaceAll,
}

/// Which way a colliding scaled index is shifted first.
///
/// Two anchors can round to the same scaled index (or be clamped onto the last slot). The
/// preferred direction is tried first and the other one is the fallback.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CollisionPolicy {
    /// Decrement the run of already placed indices ending at the collision, then place the new
    /// index on the freed slot. Falls back to placing the new index one slot to the right.
    #[default]
    PreferLeft,
    /// Place the new index one slot to the right of the collision. Falls back to shifting the
    /// placed run left.
    PreferRight,
}

/// Configuration for [`crate::reconcile_with`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReconcileOptions {
    pub empty_anchors: EmptyAnchorPolicy,
    pub collision: CollisionPolicy,
}

impl ReconcileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_empty_anchors(mut self, empty_anchors: EmptyAnchorPolicy) -> Self {
        self.empty_anchors = empty_anchors;
        self
    }

    pub fn with_collision(mut self, collision: CollisionPolicy) -> Self {
        self.collision = collision;
        self
    }
}
