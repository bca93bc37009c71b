//! A headless expansion and virtualization engine for hierarchical list views.
//!
//! This crate focuses on the state machinery behind a scrollable tree widget:
//! flattening the open subtree into an indexable row sequence, keeping that
//! sequence consistent under expand/collapse, lazy asynchronous child loading,
//! sorting and filtering, and mapping pixel offsets to rows (and back) under
//! both uniform and per-row heights.
//!
//! It is UI-agnostic. A TUI/GUI layer is expected to provide:
//! - the dataset ([`NodeData`]) and, optionally, a lazy child loader
//! - viewport pixel offsets for the [`Scrollable`] queries
//! - event-loop ticks for [`TreeProvider::update_loading`]
//!
//! Painting, scrollbars, and input handling stay on the host side; the engine
//! emits [`TreeEvent`]s so the host knows when to redraw.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod node;
mod options;
mod provider;
mod scroll;
mod sort;
mod types;


pub use node::{LoadStatus, Node, NodeData, NodeId, NodeState};
pub use options::{
    CompareFn, FilterFn, IconFn, LoadChildrenFn, OnEventCallback, TreeOptions,
};
pub use provider::TreeProvider;
pub use scroll::Scrollable;
pub use sort::alphanum_compare;
pub use types::{Depth, HeightMode, LoadError, RowPosition, RowRange, TreeEvent};
