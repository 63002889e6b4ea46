/// Stable identity of a list item.
pub type ItemId = u64;

/// The two states a whole collection can be in.
///
/// As an anchor's target this is the state the item animates *toward*: `Expanded` for an
/// expanding item, `Collapsed` for a collapsing one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExpansionState {
    Expanded,
    Collapsed,
}

impl ExpansionState {
    pub fn opposite(self) -> Self {
        match self {
            Self::Expanded => Self::Collapsed,
            Self::Collapsed => Self::Expanded,
        }
    }

    pub fn is_expanded(self) -> bool {
        self == Self::Expanded
    }
}

/// Default animation detail: which lines of the expanded item stay visible once collapsed.
///
/// The engine never looks inside this value; it is passed through to the renderer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CollapsedSpan {
    /// Index of the first line visible in the collapsed representation.
    pub first_line: u32,
    /// Number of lines visible in the collapsed representation.
    pub line_count: u32,
}

impl CollapsedSpan {
    pub fn new(first_line: u32, line_count: u32) -> Self {
        Self {
            first_line,
            line_count,
        }
    }

    /// Exclusive end line.
    pub fn end_line(&self) -> u32 {
        self.first_line.saturating_add(self.line_count)
    }
}
