use core::cmp;

use crate::node::NodeId;
use crate::provider::TreeProvider;
use crate::types::{HeightMode, RowPosition, RowRange};

/// Offset↔index mapping over the visible sequence, for viewport renderers.
///
/// Under [`HeightMode::Uniform`] every conversion is O(1) arithmetic. Under
/// [`HeightMode::PerRow`] conversions walk the visible sequence accumulating
/// per-row heights, and the aggregate total is cached until the next
/// structural change — a deliberate simplicity-over-asymptotics trade-off,
/// each query being O(visible rows) in the worst case.
pub trait Scrollable {
    /// Total pixel height of the visible sequence.
    fn total_height(&self) -> u64;

    /// The rows covering `top..bottom`, with one extra trailing row for
    /// partial-row overscroll, plus the pixel offset of the first row.
    fn range_for_pixels(&self, top: u64, bottom: u64) -> RowRange;

    /// Vertical placement of a row. A node that is not currently visible
    /// falls back to its parent's row (e.g. right after that parent
    /// collapsed).
    fn node_position(&self, node: NodeId) -> RowPosition;

    /// The row index containing `offset`; `clip` clamps into
    /// `[0, row_count - 1]` instead of returning `None` past the end.
    fn index_at_offset(&self, offset: u64, clip: bool) -> Option<usize>;

    fn node_at_offset(&self, offset: u64, clip: bool) -> Option<NodeId>;
}

impl<M> TreeProvider<M> {
    fn row_height(&self) -> u64 {
        cmp::max(self.options.row_height as u64, 1)
    }

    pub(crate) fn item_height(&self, node: NodeId) -> u32 {
        self.node(node)
            .and_then(|n| n.height())
            .unwrap_or(self.options.row_height)
    }

    fn prefix_height(&self, index: usize) -> u64 {
        self.visible[..index.min(self.visible.len())]
            .iter()
            .map(|&id| self.item_height(id) as u64)
            .sum()
    }

    /// Index of the row containing `offset`, by accumulation; returns the
    /// row count when `offset` is at or past the end.
    fn walk_index_at_offset(&self, offset: u64) -> usize {
        let mut top = 0u64;
        let mut index = 0usize;
        while index < self.visible.len() {
            let height = self.item_height(self.visible[index]) as u64;
            top = top.saturating_add(height);
            index += 1;
            if top >= offset {
                index -= 1;
                break;
            }
        }
        index
    }

    fn resolve_row(&self, node: NodeId) -> Option<usize> {
        self.index_of_node(node).or_else(|| {
            self.node(node)
                .and_then(|n| n.parent())
                .and_then(|parent| self.index_of_node(parent))
        })
    }
}

impl<M> Scrollable for TreeProvider<M> {
    fn total_height(&self) -> u64 {
        match self.options.height_mode {
            HeightMode::Uniform => self.row_height() * self.visible.len() as u64,
            HeightMode::PerRow => {
                if let Some(total) = self.cached_height.get() {
                    return total;
                }
                let total = self.prefix_height(self.visible.len());
                self.cached_height.set(Some(total));
                total
            }
        }
    }

    fn range_for_pixels(&self, top: u64, bottom: u64) -> RowRange {
        let len = self.visible.len();
        if len == 0 {
            return RowRange::default();
        }
        match self.options.height_mode {
            HeightMode::Uniform => {
                let height = self.row_height();
                let start = cmp::min((top / height) as usize, len);
                let end = cmp::min((bottom.div_ceil(height) as usize).saturating_add(1), len);
                RowRange {
                    start_index: start,
                    end_index: end,
                    offset_px: start as u64 * height,
                }
            }
            HeightMode::PerRow => {
                let start = cmp::min(self.walk_index_at_offset(top), len - 1);
                let end = cmp::min(self.walk_index_at_offset(bottom), len - 1) + 1;
                RowRange {
                    start_index: start,
                    end_index: end,
                    offset_px: self.prefix_height(start),
                }
            }
        }
    }

    fn node_position(&self, node: NodeId) -> RowPosition {
        match self.options.height_mode {
            HeightMode::Uniform => {
                let index = self.resolve_row(node).unwrap_or(0);
                RowPosition {
                    top: index as u64 * self.row_height(),
                    height: self.options.row_height,
                }
            }
            HeightMode::PerRow => match self.resolve_row(node) {
                Some(index) => RowPosition {
                    top: self.prefix_height(index),
                    height: self.item_height(self.visible[index]),
                },
                None => RowPosition {
                    top: 0,
                    height: self.options.row_height,
                },
            },
        }
    }

    fn index_at_offset(&self, offset: u64, clip: bool) -> Option<usize> {
        let len = self.visible.len();
        let index = match self.options.height_mode {
            HeightMode::Uniform => (offset / self.row_height()) as usize,
            HeightMode::PerRow => self.walk_index_at_offset(offset),
        };
        if clip {
            if len == 0 {
                None
            } else {
                Some(cmp::min(index, len - 1))
            }
        } else if index < len {
            Some(index)
        } else {
            None
        }
    }

    fn node_at_offset(&self, offset: u64, clip: bool) -> Option<NodeId> {
        self.index_at_offset(offset, clip)
            .map(|index| self.visible[index])
    }
}
