use alloc::vec::Vec;

use crate::{Error, Op, Result};

/// Where an item of a [`ShadowList`] came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Slot {
    /// The item that sat at this index of the previous collection.
    Previous(usize),
    /// An item introduced by an insert-range.
    Inserted,
}

/// A positional model of the list host, for checking plans without a UI.
///
/// It starts as `len` items tagged with their previous index and applies operations with the
/// same positional semantics a list host uses: a move lifts the item out, then inserts it at
/// `to` in the shortened list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShadowList {
    slots: Vec<Slot>,
    changed: Vec<bool>,
}

impl ShadowList {
    pub fn new(len: usize) -> Self {
        Self {
            slots: (0..len).map(Slot::Previous).collect(),
            changed: alloc::vec![false; len],
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn origin_at(&self, index: usize) -> Option<Slot> {
        self.slots.get(index).copied()
    }

    /// Current position of the item that sat at `previous_index`, if it survived.
    pub fn position_of_origin(&self, previous_index: usize) -> Option<usize> {
        self.slots
            .iter()
            .position(|&s| s == Slot::Previous(previous_index))
    }

    /// Whether a change operation has been reported for the item now at `index`.
    pub fn changed(&self, index: usize) -> bool {
        self.changed.get(index).copied().unwrap_or(false)
    }

    pub fn apply(&mut self, op: &Op) -> Result<()> {
        let len = self.len();
        let out_of_bounds = || Error::OperationOutOfBounds { op: *op, len };
        match *op {
            Op::RemoveRange { start, count } => {
                let end = start.checked_add(count).filter(|&end| end <= len);
                let end = end.ok_or_else(out_of_bounds)?;
                self.slots.drain(start..end);
                self.changed.drain(start..end);
            }
            Op::InsertRange { start, count } => {
                if start > len {
                    return Err(out_of_bounds());
                }
                self.slots
                    .splice(start..start, core::iter::repeat_n(Slot::Inserted, count));
                self.changed
                    .splice(start..start, core::iter::repeat_n(false, count));
            }
            Op::Change { index } => {
                let flag = self.changed.get_mut(index).ok_or_else(out_of_bounds)?;
                *flag = true;
            }
            Op::Move { from, to } => {
                if from >= len || to >= len {
                    return Err(out_of_bounds());
                }
                let slot = self.slots.remove(from);
                let changed = self.changed.remove(from);
                self.slots.insert(to, slot);
                self.changed.insert(to, changed);
            }
        }
        Ok(())
    }

    pub fn apply_all<'a>(&mut self, ops: impl IntoIterator<Item = &'a Op>) -> Result<()> {
        for op in ops {
            self.apply(op)?;
        }
        Ok(())
    }
}
