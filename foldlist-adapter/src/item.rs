use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use foldlist::{CollapsedSpan, ExpansionState};

/// Per-item animation metadata, implemented by the host's item handle.
///
/// The renderer animates an item whose expansion state is set and draws it statically
/// otherwise. `D` is the anchor detail type.
pub trait AnimatedItem<D> {
    fn expansion_state(&self) -> Option<ExpansionState>;
    fn set_expansion_state(&mut self, state: Option<ExpansionState>);
    fn anim_detail(&self) -> Option<&D>;
    fn set_anim_detail(&mut self, detail: Option<D>);

    fn is_custom_animated(&self) -> bool {
        self.expansion_state().is_some()
    }

    fn clear_anim(&mut self) {
        self.set_expansion_state(None);
        self.set_anim_detail(None);
    }
}

/// Access to the items currently displayed by the host, by position.
///
/// Positions refer to what is on screen *now*, which before a transition is still the
/// previous collection.
pub trait ItemLookup<D> {
    fn item_at(&mut self, position: usize) -> Option<&mut dyn AnimatedItem<D>>;
}

/// A ready-made item slot for hosts without their own item handle type.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemAnim<D = CollapsedSpan> {
    pub expansion_state: Option<ExpansionState>,
    pub detail: Option<D>,
}

impl<D> Default for ItemAnim<D> {
    fn default() -> Self {
        Self {
            expansion_state: None,
            detail: None,
        }
    }
}

impl<D> AnimatedItem<D> for ItemAnim<D> {
    fn expansion_state(&self) -> Option<ExpansionState> {
        self.expansion_state
    }

    fn set_expansion_state(&mut self, state: Option<ExpansionState>) {
        self.expansion_state = state;
    }

    fn anim_detail(&self) -> Option<&D> {
        self.detail.as_ref()
    }

    fn set_anim_detail(&mut self, detail: Option<D>) {
        self.detail = detail;
    }
}

impl<D, T: AnimatedItem<D>> ItemLookup<D> for [T] {
    fn item_at(&mut self, position: usize) -> Option<&mut dyn AnimatedItem<D>> {
        self.get_mut(position).map(|item| item as &mut dyn AnimatedItem<D>)
    }
}

impl<D, T: AnimatedItem<D>> ItemLookup<D> for Vec<T> {
    fn item_at(&mut self, position: usize) -> Option<&mut dyn AnimatedItem<D>> {
        self.as_mut_slice().item_at(position)
    }
}

/// Only the displayed window of a long list, keyed by position.
impl<D, T: AnimatedItem<D>> ItemLookup<D> for BTreeMap<usize, T> {
    fn item_at(&mut self, position: usize) -> Option<&mut dyn AnimatedItem<D>> {
        self.get_mut(&position)
            .map(|item| item as &mut dyn AnimatedItem<D>)
    }
}

/// Nothing displayed.
impl<D> ItemLookup<D> for () {
    fn item_at(&mut self, _position: usize) -> Option<&mut dyn AnimatedItem<D>> {
        None
    }
}
