use alloc::vec::Vec;

/// A structural list-update operation.
///
/// Operations are positional: each one is interpreted against the list as left by every
/// operation before it, so a sequence must be replayed strictly in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Op {
    RemoveRange { start: usize, count: usize },
    InsertRange { start: usize, count: usize },
    /// The item at `index` changed; for anchors this is what triggers the visual transform.
    Change { index: usize },
    Move { from: usize, to: usize },
}

impl Op {
    pub fn is_move(&self) -> bool {
        matches!(self, Self::Move { .. })
    }

    /// Forwards this operation to `sink`.
    pub fn apply_to<S: OpSink + ?Sized>(&self, sink: &mut S) {
        match *self {
            Self::RemoveRange { start, count } => sink.remove_range(start, count),
            Self::InsertRange { start, count } => sink.insert_range(start, count),
            Self::Change { index } => sink.change(index),
            Self::Move { from, to } => sink.move_item(from, to),
        }
    }
}

/// Receiver of structural operations, implemented by the list host.
///
/// The engine never applies operations itself; it only enumerates them in application order.
pub trait OpSink {
    fn remove_range(&mut self, start: usize, count: usize);
    fn insert_range(&mut self, start: usize, count: usize);
    fn change(&mut self, index: usize);
    fn move_item(&mut self, from: usize, to: usize);
}

impl OpSink for Vec<Op> {
    fn remove_range(&mut self, start: usize, count: usize) {
        self.push(Op::RemoveRange { start, count });
    }

    fn insert_range(&mut self, start: usize, count: usize) {
        self.push(Op::InsertRange { start, count });
    }

    fn change(&mut self, index: usize) {
        self.push(Op::Change { index });
    }

    fn move_item(&mut self, from: usize, to: usize) {
        self.push(Op::Move { from, to });
    }
}

impl<S: OpSink + ?Sized> OpSink for &mut S {
    fn remove_range(&mut self, start: usize, count: usize) {
        (**self).remove_range(start, count);
    }

    fn insert_range(&mut self, start: usize, count: usize) {
        (**self).insert_range(start, count);
    }

    fn change(&mut self, index: usize) {
        (**self).change(index);
    }

    fn move_item(&mut self, from: usize, to: usize) {
        (**self).move_item(from, to);
    }
}

/// Collects a plan while enforcing the emission contract.
///
/// - Empty ranges are dropped.
/// - Every operation must fit the list length left by the operations before it
///   (debug-asserted).
/// - Moves come strictly after every range and change operation (debug-asserted).
pub(crate) struct OpEmitter {
    len: usize,
    moving: bool,
    ops: Vec<Op>,
}

impl OpEmitter {
    pub(crate) fn new(len: usize) -> Self {
        Self {
            len,
            moving: false,
            ops: Vec::new(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn into_ops(self) -> Vec<Op> {
        self.ops
    }

    fn push(&mut self, op: Op) {
        ftrace!(?op, len = self.len, "emit");
        self.ops.push(op);
    }

    fn assert_not_moving(&self, what: &str) {
        if self.moving {
            fwarn!(what, "OpEmitter: operation emitted after a move");
        }
        debug_assert!(
            !self.moving,
            "OpEmitter: {what} emitted after a move; moves must come last"
        );
    }

    pub(crate) fn remove_range(&mut self, start: usize, count: usize) {
        if count == 0 {
            return;
        }
        self.assert_not_moving("remove_range");
        debug_assert!(
            start + count <= self.len,
            "OpEmitter: remove_range out of bounds (start={start}, count={count}, len={})",
            self.len
        );
        self.len = self.len.saturating_sub(count);
        self.push(Op::RemoveRange { start, count });
    }

    pub(crate) fn insert_range(&mut self, start: usize, count: usize) {
        if count == 0 {
            return;
        }
        self.assert_not_moving("insert_range");
        debug_assert!(
            start <= self.len,
            "OpEmitter: insert_range out of bounds (start={start}, len={})",
            self.len
        );
        self.len += count;
        self.push(Op::InsertRange { start, count });
    }

    pub(crate) fn change(&mut self, index: usize) {
        self.assert_not_moving("change");
        debug_assert!(
            index < self.len,
            "OpEmitter: change out of bounds (index={index}, len={})",
            self.len
        );
        self.push(Op::Change { index });
    }

    pub(crate) fn move_item(&mut self, from: usize, to: usize) {
        debug_assert!(
            from < self.len && to < self.len,
            "OpEmitter: move out of bounds (from={from}, to={to}, len={})",
            self.len
        );
        self.moving = true;
        self.push(Op::Move { from, to });
    }
}
