use alloc::string::String;

use crate::NodeId;

/// How far an expand or collapse operation recurses below its target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Depth {
    /// Exactly one level: the target's direct children.
    #[default]
    Children,
    /// Effectively unlimited (resolved to a large per-operation default).
    All,
    /// An explicit number of additional levels below the direct children.
    Levels(u32),
}

impl Depth {
    pub(crate) fn resolve(self, all: u32) -> u32 {
        match self {
            Self::Children => 0,
            Self::All => all,
            Self::Levels(n) => n,
        }
    }
}

/// How row heights are addressed by the scroll queries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HeightMode {
    /// Every row uses `TreeOptions::row_height`; conversions are O(1) arithmetic.
    #[default]
    Uniform,
    /// Rows may carry a height override; conversions walk the visible sequence.
    PerRow,
}

/// A structural or presentation signal emitted by the provider.
///
/// Events fire synchronously, immediately after the mutation that caused them.
/// Consumers must re-query the visible sequence rather than retain a copy
/// across structural events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TreeEvent {
    /// The dataset was replaced (or rebuilt in place, e.g. by a filter change).
    SetRoot,
    /// A row changed without a structural insert/remove at its position.
    Change(Option<NodeId>),
    Expand(NodeId),
    Collapse(NodeId),
    ChangeClass,
}

/// A window of the visible sequence addressed by pixel offsets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RowRange {
    pub start_index: usize,
    pub end_index: usize, // exclusive
    /// Pixel offset of the first row in the window.
    pub offset_px: u64,
}

impl RowRange {
    pub fn is_empty(&self) -> bool {
        self.start_index >= self.end_index
    }

    pub fn len(&self) -> usize {
        self.end_index.saturating_sub(self.start_index)
    }
}

/// A single row's vertical placement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RowPosition {
    pub top: u64,
    pub height: u32,
}

/// The payload a host passes to [`crate::TreeProvider::finish_load`] to report
/// a failed fetch.
///
/// The engine recovers locally (the node stays loaded but collapsed); the
/// message exists for the host's own logging.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadError {
    message: String,
}

impl LoadError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl core::fmt::Display for LoadError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "child load failed: {}", self.message)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for LoadError {}
