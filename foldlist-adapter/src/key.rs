use foldlist::{ExpansionState, ItemId};

/// Identity type of an anchor.
pub trait AnchorKey: Clone + Eq + core::fmt::Debug {}
impl<T: Clone + Eq + core::fmt::Debug> AnchorKey for T {}

/// Default offset separating collapsed gap ids from expanded ones.
pub const COLLAPSED_ID_OFFSET: u64 = i32::MAX as u64;

/// Id of a gap (non-anchored) item.
///
/// Expanded items use their position; collapsed items are offset by `collapsed_id_offset` so
/// the host never reuses an item view across a direction flip.
pub fn gap_item_id(state: ExpansionState, position: usize, collapsed_id_offset: u64) -> ItemId {
    match state {
        ExpansionState::Expanded => position as ItemId,
        ExpansionState::Collapsed => collapsed_id_offset.saturating_add(position as ItemId),
    }
}
