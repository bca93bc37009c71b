use alloc::string::String;
use alloc::sync::Arc;
use core::cmp::Ordering;

use crate::node::{Node, NodeId};
use crate::types::{HeightMode, TreeEvent};

/// A callback fired for every structural or presentation signal.
pub type OnEventCallback = Arc<dyn Fn(TreeEvent) + Send + Sync>;

/// The lazy-load hook: invoked to start fetching a pending node's children.
///
/// The host completes the fetch — asynchronously, after the triggering call
/// has returned — by calling [`crate::TreeProvider::finish_load`] exactly once
/// for this node.
pub type LoadChildrenFn<M> = Arc<dyn Fn(NodeId, &Node<M>) + Send + Sync>;

/// The global filter predicate, applied at every level on every
/// materialization. Returning `false` hides the node and its subtree.
pub type FilterFn<M> = Arc<dyn Fn(&Node<M>) -> bool + Send + Sync>;

/// A label comparator replacing the default natural order
/// ([`crate::alphanum_compare`]). Directories-first grouping still applies
/// before it.
pub type CompareFn = Arc<dyn Fn(&str, &str) -> Ordering + Send + Sync>;

/// Per-row icon accessor for the renderer; absent means no icon.
pub type IconFn<M> = Arc<dyn Fn(&Node<M>) -> String + Send + Sync>;

/// Configuration for [`crate::TreeProvider`].
///
/// Cheap to clone: hook slots are stored in `Arc`s, so a host can tweak a few
/// fields and call `TreeProvider::set_options` without reallocating closures.
pub struct TreeOptions<M = ()> {
    /// Uniform row height, and the fallback height in [`HeightMode::PerRow`].
    pub row_height: u32,
    /// Pixels of indentation per depth level.
    pub indent_size: u32,
    pub height_mode: HeightMode,
    /// Sort materialized children (directories first, then by label).
    pub sort_nodes: bool,
    /// Promote the root to a visible row at depth 0 instead of keeping it as
    /// a hidden sentinel at depth −1.
    pub visible_root: bool,
    /// How long a fetch must stay outstanding before the node surfaces
    /// `LoadStatus::Loading`, as observed by `update_loading(now_ms)` ticks.
    pub loading_indicator_delay_ms: u64,
    /// What the renderer should show when the visible sequence is empty.
    pub empty_message: Option<String>,
    pub compare: Option<CompareFn>,
    pub filter: Option<FilterFn<M>>,
    pub load_children: Option<LoadChildrenFn<M>>,
    pub icon: Option<IconFn<M>>,
    pub on_event: Option<OnEventCallback>,
}

impl<M> TreeOptions<M> {
    pub fn new() -> Self {
        Self {
            row_height: 25,
            indent_size: 10,
            height_mode: HeightMode::Uniform,
            sort_nodes: true,
            visible_root: false,
            loading_indicator_delay_ms: 100,
            empty_message: None,
            compare: None,
            filter: None,
            load_children: None,
            icon: None,
            on_event: None,
        }
    }

    pub fn with_row_height(mut self, row_height: u32) -> Self {
        self.row_height = row_height;
        self
    }

    pub fn with_indent_size(mut self, indent_size: u32) -> Self {
        self.indent_size = indent_size;
        self
    }

    pub fn with_height_mode(mut self, height_mode: HeightMode) -> Self {
        self.height_mode = height_mode;
        self
    }

    pub fn with_sort_nodes(mut self, sort_nodes: bool) -> Self {
        self.sort_nodes = sort_nodes;
        self
    }

    pub fn with_visible_root(mut self, visible_root: bool) -> Self {
        self.visible_root = visible_root;
        self
    }

    pub fn with_loading_indicator_delay_ms(mut self, delay_ms: u64) -> Self {
        self.loading_indicator_delay_ms = delay_ms;
        self
    }

    pub fn with_empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = Some(message.into());
        self
    }

    pub fn with_compare(
        mut self,
        compare: Option<impl Fn(&str, &str) -> Ordering + Send + Sync + 'static>,
    ) -> Self {
        self.compare = compare.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_filter(
        mut self,
        filter: Option<impl Fn(&Node<M>) -> bool + Send + Sync + 'static>,
    ) -> Self {
        self.filter = filter.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_load_children(
        mut self,
        load_children: Option<impl Fn(NodeId, &Node<M>) + Send + Sync + 'static>,
    ) -> Self {
        self.load_children = load_children.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_icon(
        mut self,
        icon: Option<impl Fn(&Node<M>) -> String + Send + Sync + 'static>,
    ) -> Self {
        self.icon = icon.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_on_event(
        mut self,
        on_event: Option<impl Fn(TreeEvent) + Send + Sync + 'static>,
    ) -> Self {
        self.on_event = on_event.map(|f| Arc::new(f) as _);
        self
    }
}

impl<M> Default for TreeOptions<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Clone for TreeOptions<M> {
    fn clone(&self) -> Self {
        Self {
            row_height: self.row_height,
            indent_size: self.indent_size,
            height_mode: self.height_mode,
            sort_nodes: self.sort_nodes,
            visible_root: self.visible_root,
            loading_indicator_delay_ms: self.loading_indicator_delay_ms,
            empty_message: self.empty_message.clone(),
            compare: self.compare.clone(),
            filter: self.filter.clone(),
            load_children: self.load_children.clone(),
            icon: self.icon.clone(),
            on_event: self.on_event.clone(),
        }
    }
}

impl<M> core::fmt::Debug for TreeOptions<M> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TreeOptions")
            .field("row_height", &self.row_height)
            .field("indent_size", &self.indent_size)
            .field("height_mode", &self.height_mode)
            .field("sort_nodes", &self.sort_nodes)
            .field("visible_root", &self.visible_root)
            .field(
                "loading_indicator_delay_ms",
                &self.loading_indicator_delay_ms,
            )
            .field("empty_message", &self.empty_message)
            .finish_non_exhaustive()
    }
}
