use alloc::string::String;
use alloc::vec::Vec;
use core::cell::Cell;
use core::mem;

use crate::node::{ChildSource, LoadStatus, Node, NodeData, NodeId, NodeState};
use crate::options::{FilterFn, TreeOptions};
use crate::sort::alphanum_compare;
use crate::types::{Depth, LoadError, TreeEvent};

/// Resolved budget for `Depth::All` on expand.
const EXPAND_ALL: u32 = 100;
/// Resolved budget for `Depth::All` on collapse.
const COLLAPSE_ALL: u32 = 1000;

/// A lazy fetch dispatched but not yet completed.
///
/// `generation` ties the entry to the dataset it was dispatched against; a
/// completion arriving after the dataset was replaced finds no matching entry
/// and is dropped. `indicator_deadline` is armed by the first
/// `update_loading` tick and drives the debounced loading indicator.
#[derive(Clone, Copy, Debug)]
struct PendingLoad {
    node: NodeId,
    generation: u64,
    indicator_deadline: Option<u64>,
}

/// The expansion and visibility engine behind a scrollable tree widget.
///
/// This type is intentionally UI-agnostic:
/// - It does not hold any UI objects; rendering works off the flat
///   [`visible_rows`](Self::visible_rows) projection and the offset queries of
///   [`crate::Scrollable`].
/// - Suspension exists only at the lazy-load boundary: a host-installed
///   loader hook starts a fetch, and the host reports the outcome through
///   [`finish_load`](Self::finish_load).
/// - Time is driven by the host: call
///   [`update_loading`](Self::update_loading) from the event loop so slow
///   fetches can surface a loading indicator without flicker.
///
/// All visible-sequence mutation happens synchronously inside the call that
/// triggers it, immediately followed by event emission.
#[derive(Clone, Debug)]
pub struct TreeProvider<M = ()> {
    pub(crate) options: TreeOptions<M>,
    nodes: Vec<Option<Node<M>>>,
    free: Vec<u32>,
    root: NodeId,
    pub(crate) visible: Vec<NodeId>,
    selected: Option<NodeId>,
    force_empty: bool,
    generation: u64,
    pending_loads: Vec<PendingLoad>,
    pub(crate) cached_height: Cell<Option<u64>>,
}

impl<M> TreeProvider<M> {
    /// Creates a provider over an empty dataset.
    pub fn new(options: TreeOptions<M>) -> Self {
        Self::with_root(options, NodeData::new())
    }

    /// Creates a provider and installs `root` as the dataset.
    pub fn with_root(options: TreeOptions<M>, root: NodeData<M>) -> Self {
        let mut provider = Self {
            options,
            nodes: Vec::new(),
            free: Vec::new(),
            root: NodeId(0),
            visible: Vec::new(),
            selected: None,
            force_empty: false,
            generation: 0,
            pending_loads: Vec::new(),
            cached_height: Cell::new(None),
        };
        provider.set_root(root);
        provider
    }

    /// Creates a provider from a bare top-level item list.
    pub fn from_items(options: TreeOptions<M>, items: Vec<NodeData<M>>) -> Self {
        Self::with_root(options, NodeData::new().with_items(items))
    }

    pub fn options(&self) -> &TreeOptions<M> {
        &self.options
    }

    /// Replaces the options wholesale and rebuilds the visible sequence.
    pub fn set_options(&mut self, options: TreeOptions<M>) {
        self.options = options;
        self.rebuild();
    }

    /// Clones the current options, applies `f`, then delegates to
    /// `set_options`.
    pub fn update_options(&mut self, f: impl FnOnce(&mut TreeOptions<M>)) {
        let mut next = self.options.clone();
        f(&mut next);
        self.set_options(next);
    }

    // ------------------------------------------------------------------
    // Dataset lifecycle
    // ------------------------------------------------------------------

    /// Replaces the whole dataset.
    ///
    /// Discards every node of the previous tree, supersedes any outstanding
    /// lazy loads, re-derives the root sentinel, and rebuilds the visible
    /// sequence from scratch. Emits `SetRoot` then `Change`.
    pub fn set_root(&mut self, root: NodeData<M>) {
        tldebug!(generation = self.generation + 1, "set_root");
        self.nodes.clear();
        self.free.clear();
        self.visible.clear();
        self.pending_loads.clear();
        self.generation += 1;
        self.root = self.alloc(Node::from_data(root));
        self.finish_root_setup();
    }

    /// Convenience for a dataset supplied as a bare item list.
    pub fn set_root_items(&mut self, items: Vec<NodeData<M>>) {
        self.set_root(NodeData::new().with_items(items));
    }

    /// Rebuilds the visible sequence against the existing tree, keeping
    /// materialized nodes but re-running sort state and filters. Outstanding
    /// lazy loads are superseded just like on a full root replacement.
    fn rebuild(&mut self) {
        tldebug!(generation = self.generation + 1, "rebuild");
        self.pending_loads.clear();
        self.generation += 1;
        self.visible.clear();
        self.finish_root_setup();
    }

    fn finish_root_setup(&mut self) {
        let depth = if self.options.visible_root { 0 } else { -1 };
        if let Some(root) = self.node_mut(self.root) {
            root.depth = depth;
            root.parent = None;
        }
        self.invalidate_height();
        if depth < 0 {
            self.expand_inner(self.root, 0, false);
        } else {
            self.visible.push(self.root);
        }
        self.selected = Some(self.root);
        self.emit(TreeEvent::SetRoot);
        self.emit(TreeEvent::Change(None));
    }

    /// Installs (or clears) the global filter predicate and rebuilds, which
    /// makes the new predicate effective at every level immediately.
    pub fn set_filter(
        &mut self,
        filter: Option<impl Fn(&Node<M>) -> bool + Send + Sync + 'static>,
    ) {
        self.set_filter_fn(filter.map(|f| alloc::sync::Arc::new(f) as FilterFn<M>));
    }

    /// Like [`set_filter`](Self::set_filter), for an already-shared predicate.
    pub fn set_filter_fn(&mut self, filter: Option<FilterFn<M>>) {
        self.options.filter = filter;
        self.rebuild();
    }

    /// Forces the visible sequence empty (nodes keep their logical open
    /// state) until [`show_all_nodes`](Self::show_all_nodes) is called.
    pub fn hide_all_nodes(&mut self) {
        self.force_empty = true;
        self.rebuild();
    }

    pub fn show_all_nodes(&mut self) {
        self.force_empty = false;
        self.rebuild();
    }

    // ------------------------------------------------------------------
    // Node model
    // ------------------------------------------------------------------

    pub fn node(&self, id: NodeId) -> Option<&Node<M>> {
        self.nodes.get(id.index()).and_then(|slot| slot.as_ref())
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut Node<M>> {
        self.nodes.get_mut(id.index()).and_then(|slot| slot.as_mut())
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns the node's children in display order, or `None` when they are
    /// unknown (a pending fetch has not completed yet) — which is distinct
    /// from an empty list.
    ///
    /// Children are materialized from whichever source the supplier provided
    /// and cached the first time this is called; sorting happens once at that
    /// point (unless the node is pre-sorted). Depth and parent links are
    /// re-stamped and the active filter is re-applied on every call, so a
    /// filter change is effective without any separate invalidation.
    pub fn children_of(&mut self, id: NodeId) -> Option<Vec<NodeId>> {
        self.node(id)?;
        self.materialize(id);
        let node = self.node(id)?;
        let depth = node.depth + 1;
        let cache = node.children.clone()?;
        for &child in &cache {
            if let Some(child) = self.node_mut(child) {
                child.depth = depth;
                child.parent = Some(id);
            }
        }
        match self.options.filter.clone() {
            Some(filter) => Some(
                cache
                    .into_iter()
                    .filter(|&c| self.node(c).is_some_and(|n| filter(n)))
                    .collect(),
            ),
            None => Some(cache),
        }
    }

    /// Optimistic child test: a node with a pending fetch is assumed
    /// expandable until proven otherwise.
    pub fn has_children(&self, id: NodeId) -> bool {
        let Some(node) = self.node(id) else {
            return false;
        };
        if let Some(children) = &node.children {
            return !children.is_empty();
        }
        match &node.source {
            ChildSource::Children(v) => !v.is_empty(),
            ChildSource::Map(_) => true,
            ChildSource::Items(v) => node.status == LoadStatus::Pending || !v.is_empty(),
            ChildSource::None => node.status == LoadStatus::Pending,
        }
    }

    fn should_load_children(&self, id: NodeId) -> bool {
        self.node(id)
            .is_some_and(|n| n.status == LoadStatus::Pending)
    }

    fn materialize(&mut self, id: NodeId) {
        let Some(node) = self.node(id) else { return };
        if node.children.is_some() {
            return;
        }
        let direct = matches!(node.source, ChildSource::Children(_));
        if !direct && node.status == LoadStatus::Pending {
            return;
        }
        if matches!(node.source, ChildSource::None) {
            return;
        }
        let depth = node.depth + 1;
        let pre_sorted = node.pre_sorted;

        let Some(node) = self.node_mut(id) else { return };
        let source = mem::replace(&mut node.source, ChildSource::None);
        let specs = match source {
            ChildSource::Children(v) | ChildSource::Items(v) => v,
            ChildSource::Map(entries) => entries.into_iter().map(|(_, v)| v).collect(),
            ChildSource::None => return,
        };

        let mut ids = Vec::with_capacity(specs.len());
        for spec in specs {
            let child = self.alloc(Node::from_data(spec));
            if let Some(child) = self.node_mut(child) {
                child.depth = depth;
                child.parent = Some(id);
            }
            ids.push(child);
        }
        if self.options.sort_nodes && !pre_sorted {
            self.sort_children(&mut ids);
        }
        if let Some(node) = self.node_mut(id) {
            node.children = Some(ids);
        }
    }

    /// Directories-first, then the configured comparator over labels.
    fn sort_children(&self, ids: &mut [NodeId]) {
        let compare = self.options.compare.clone();
        ids.sort_by(|&a, &b| {
            let (Some(a), Some(b)) = (self.node(a), self.node(b)) else {
                return core::cmp::Ordering::Equal;
            };
            match (a.is_branch(), b.is_branch()) {
                (true, false) => core::cmp::Ordering::Less,
                (false, true) => core::cmp::Ordering::Greater,
                _ => {
                    let la = a.label().unwrap_or("");
                    let lb = b.label().unwrap_or("");
                    match &compare {
                        Some(f) => f(la, lb),
                        None => alphanum_compare(la, lb),
                    }
                }
            }
        });
    }

    // ------------------------------------------------------------------
    // Expansion state machine
    // ------------------------------------------------------------------

    /// Opens `node`, splicing its (sorted, filtered) children into the
    /// visible sequence right after it and recursing `depth` further levels.
    ///
    /// No-op when the node is unknown, or already open (unless it is the root
    /// of an empty sequence, which is how rebuilds restart). When a loader is
    /// installed and the node's children are pending, this dispatches the
    /// fetch instead and returns; the node is marked open synchronously so a
    /// re-entrant call short-circuits. A node that is not currently rendered
    /// (collapsed ancestor, or forced-empty mode) is marked open without
    /// touching the sequence.
    pub fn expand(&mut self, node: NodeId, depth: Depth, silent: bool) {
        self.expand_inner(node, depth.resolve(EXPAND_ALL), silent);
    }

    fn expand_inner(&mut self, id: NodeId, budget: u32, silent: bool) {
        let is_root = id == self.root;
        let Some(node) = self.node(id) else { return };
        if node.is_open() && (!is_root || !self.visible.is_empty()) {
            return;
        }

        let children = self.children_of(id);

        if self.options.load_children.is_some() && self.should_load_children(id) {
            tldebug!(node = id.0, "dispatching lazy child load");
            self.pending_loads.push(PendingLoad {
                node: id,
                generation: self.generation,
                indicator_deadline: None,
            });
            if let Some(node) = self.node_mut(id) {
                node.state = NodeState::Loading;
            }
            let loader = self.options.load_children.clone();
            if let (Some(loader), Some(node)) = (loader, self.node(id)) {
                loader(id, node);
            }
            return;
        }

        if let Some(node) = self.node_mut(id) {
            node.state = NodeState::Open;
        }
        let pos = self.index_of_node(id);
        let Some(children) = children else {
            self.emit(TreeEvent::Change(Some(id)));
            return;
        };
        if (pos.is_none() && !self.visible.is_empty()) || self.force_empty {
            return;
        }

        let at = pos.map_or(0, |p| p + 1);
        let tail = self.visible.split_off(at);
        self.visible.extend(children.iter().copied());
        self.visible.extend(tail);
        self.invalidate_height();

        for &child in &children {
            let stale_open = self.node(child).is_some_and(|n| n.is_open());
            if stale_open {
                // A leftover open flag from a previous materialization: reset
                // it and rebuild the subtree against current sort/filter state.
                if let Some(child) = self.node_mut(child) {
                    child.state = NodeState::Collapsed;
                }
                self.expand_inner(child, budget.saturating_sub(1), silent);
            } else if budget > 0 {
                self.expand_inner(child, budget.saturating_sub(1), silent);
            }
        }

        if !silent {
            self.emit(TreeEvent::Expand(id));
        }
    }

    /// Closes `node`, removing its subtree run from the visible sequence.
    ///
    /// The subtree is exactly the contiguous run of entries following the
    /// node with greater depth, valid because the sequence is maintained in
    /// depth-first pre-order. A deep collapse first closes open nodes within
    /// the run whose depth offset from the target is below the budget,
    /// emitting `Collapse` per node. Closing the root clears the sequence and
    /// immediately re-opens it one level, restoring its direct children.
    pub fn collapse(&mut self, node: NodeId, depth: Depth, silent: bool) {
        self.collapse_inner(node, depth.resolve(COLLAPSE_ALL), silent);
    }

    fn collapse_inner(&mut self, id: NodeId, budget: u32, silent: bool) {
        if id == self.root {
            let Some(root) = self.node_mut(id) else { return };
            root.state = NodeState::Collapsed;
            if budget > 0 {
                let root_depth = self.node(id).map_or(-1, |n| n.depth);
                let rows = self.visible.clone();
                for row in rows {
                    if row == id {
                        continue;
                    }
                    let Some(node) = self.node(row) else { continue };
                    if node.is_open() && node.depth - root_depth < budget as i32 {
                        if let Some(node) = self.node_mut(row) {
                            node.state = NodeState::Collapsed;
                        }
                        if !silent {
                            self.emit(TreeEvent::Collapse(row));
                        }
                    }
                }
            }
            self.visible.clear();
            if self.options.visible_root {
                self.visible.push(id);
            }
            self.invalidate_height();
            self.expand_inner(id, 0, silent);
            return;
        }

        let Some(node) = self.node(id) else { return };
        if !node.is_open() {
            return;
        }
        let Some(index) = self.index_of_node(id) else {
            return;
        };
        let this_depth = node.depth;

        let mut run = 0;
        for t in index + 1..self.visible.len() {
            if self
                .node(self.visible[t])
                .is_some_and(|n| n.depth > this_depth)
            {
                run += 1;
            } else {
                break;
            }
        }

        if budget > 0 {
            for t in index + 1..index + 1 + run {
                let row = self.visible[t];
                let Some(node) = self.node(row) else { continue };
                if node.is_open() && node.depth - this_depth < budget as i32 {
                    if let Some(node) = self.node_mut(row) {
                        node.state = NodeState::Collapsed;
                    }
                    if !silent {
                        self.emit(TreeEvent::Collapse(row));
                    }
                }
            }
        }

        self.visible.drain(index + 1..index + 1 + run);
        if let Some(node) = self.node_mut(id) {
            node.state = NodeState::Collapsed;
        }
        self.invalidate_height();
        if !silent {
            self.emit(TreeEvent::Collapse(id));
        }
    }

    pub fn toggle(&mut self, node: NodeId, depth: Depth, silent: bool) {
        if self.node(node).is_some_and(|n| n.is_open()) {
            self.collapse(node, depth, silent);
        } else {
            self.expand(node, depth, silent);
        }
    }

    /// `expand` with the default depth budget and events on.
    pub fn open(&mut self, node: NodeId) {
        self.expand(node, Depth::Children, false);
    }

    /// `collapse` with the default depth budget and events on.
    pub fn close(&mut self, node: NodeId) {
        self.collapse(node, Depth::Children, false);
    }

    // ------------------------------------------------------------------
    // Lazy loading
    // ------------------------------------------------------------------

    /// Completes a fetch started by the loader hook. Must be called exactly
    /// once per dispatched load.
    ///
    /// The node is force-collapsed (discarding any partial visual state),
    /// marked `Loaded`, and — on success — re-expanded so the now-known
    /// children materialize and splice in after it. A failed load leaves the
    /// node loaded but collapsed; nothing propagates. Completions for a node
    /// superseded by a dataset replacement are dropped.
    pub fn finish_load(&mut self, node: NodeId, result: Result<Vec<NodeData<M>>, LoadError>) {
        let Some(entry) = self
            .pending_loads
            .iter()
            .position(|p| p.node == node && p.generation == self.generation)
        else {
            tlwarn!(node = node.0, "ignoring load completion for a superseded node");
            return;
        };
        // Dropping the entry also cancels the loading-indicator delay,
        // whatever the outcome.
        self.pending_loads.remove(entry);

        self.collapse_inner(node, 0, true);
        match result {
            Ok(children) => {
                tldebug!(node = node.0, count = children.len(), "lazy load completed");
                let old = self.node_mut(node).and_then(|n| n.children.take());
                if let Some(old) = old {
                    for child in old {
                        self.free_subtree(child);
                    }
                }
                if let Some(node) = self.node_mut(node) {
                    node.source = ChildSource::Children(children);
                    node.status = LoadStatus::Loaded;
                }
                self.expand_inner(node, 0, false);
            }
            Err(_) => {
                tlwarn!(node = node.0, "lazy load failed");
                if let Some(node) = self.node_mut(node) {
                    node.status = LoadStatus::Loaded;
                }
            }
        }
    }

    /// Drives the debounced loading indicator; call from the host event loop.
    ///
    /// A load whose fetch is still outstanding one tick past the indicator
    /// delay surfaces `LoadStatus::Loading` and emits `Change` for its node,
    /// once. Fast fetches that complete before that never flicker.
    pub fn update_loading(&mut self, now_ms: u64) {
        let delay = self.options.loading_indicator_delay_ms;
        let mut surfaced: Vec<NodeId> = Vec::new();
        for pending in &mut self.pending_loads {
            match pending.indicator_deadline {
                None => pending.indicator_deadline = Some(now_ms.saturating_add(delay)),
                Some(deadline) if now_ms >= deadline => surfaced.push(pending.node),
                Some(_) => {}
            }
        }
        for id in surfaced {
            if self
                .node(id)
                .is_some_and(|n| n.status == LoadStatus::Pending)
            {
                if let Some(node) = self.node_mut(id) {
                    node.status = LoadStatus::Loading;
                }
                tltrace!(node = id.0, "surfacing loading indicator");
                self.emit(TreeEvent::Change(Some(id)));
            }
        }
    }

    /// Number of loads currently outstanding.
    pub fn loads_in_flight(&self) -> usize {
        self.pending_loads.len()
    }

    // ------------------------------------------------------------------
    // Visibility index
    // ------------------------------------------------------------------

    /// The flat projection of the open subtree, in depth-first pre-order.
    /// Treat as read-only and re-query after any structural event.
    pub fn visible_rows(&self) -> &[NodeId] {
        &self.visible
    }

    pub fn row_count(&self) -> usize {
        self.visible.len()
    }

    pub fn node_at_index(&self, index: usize) -> Option<NodeId> {
        self.visible.get(index).copied()
    }

    pub fn index_of_node(&self, node: NodeId) -> Option<usize> {
        self.visible.iter().position(|&n| n == node)
    }

    pub fn min_index(&self) -> usize {
        0
    }

    pub fn max_index(&self) -> Option<usize> {
        self.visible.len().checked_sub(1)
    }

    pub fn is_visible(&self, node: NodeId) -> bool {
        self.index_of_node(node).is_some()
    }

    /// A clamped window of the visible sequence, for row-window renderers.
    pub fn data_range(&self, start: usize, len: usize) -> &[NodeId] {
        let start = start.min(self.visible.len());
        let end = start.saturating_add(len).min(self.visible.len());
        &self.visible[start..end]
    }

    // ------------------------------------------------------------------
    // Traversal helpers
    // ------------------------------------------------------------------

    /// Inclusive ancestor test along parent links.
    pub fn is_ancestor(&self, node: NodeId, descendant: NodeId) -> bool {
        let mut current = Some(descendant);
        while let Some(id) = current {
            if id == node {
                return true;
            }
            current = self.node(id).and_then(|n| n.parent);
        }
        false
    }

    /// The sibling `dir` steps away in the parent's display order
    /// (`dir == 0` means next).
    pub fn sibling(&mut self, node: NodeId, dir: i32) -> Option<NodeId> {
        let dir = if dir == 0 { 1 } else { dir };
        let parent = self.node(node)?.parent?;
        let siblings = self.children_of(parent)?;
        let pos = siblings.iter().position(|&n| n == node)?;
        let target = pos as i64 + dir as i64;
        if target < 0 {
            return None;
        }
        siblings.get(target as usize).copied()
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    pub fn select(&mut self, node: Option<NodeId>) {
        self.selected = node;
    }

    pub fn is_selected(&self, node: NodeId) -> bool {
        self.node(node).is_some_and(|n| n.is_selected)
    }

    pub fn set_selected(&mut self, node: NodeId, selected: bool) {
        if let Some(node) = self.node_mut(node) {
            node.is_selected = selected;
        }
    }

    /// The hidden root sentinel and `no_select` nodes are not selectable.
    pub fn is_selectable(&self, node: NodeId) -> bool {
        self.node(node)
            .is_some_and(|n| !n.no_select && n.depth >= 0)
    }

    // ------------------------------------------------------------------
    // Presentation accessors
    // ------------------------------------------------------------------

    pub fn caption(&self, node: NodeId) -> &str {
        self.node(node).map_or("", |n| n.caption())
    }

    /// Plain-text form of the row; same content as [`caption`](Self::caption).
    pub fn text(&self, node: NodeId) -> &str {
        self.caption(node)
    }

    /// The node's class string, with a `loading` token appended while a fetch
    /// is surfaced.
    pub fn class_name(&self, node: NodeId) -> String {
        let Some(node) = self.node(node) else {
            return String::new();
        };
        let base = node.class_name().unwrap_or("");
        if node.status == LoadStatus::Loading {
            alloc::format!("{base} loading")
        } else {
            String::from(base)
        }
    }

    /// Adds or removes a class token, emitting `ChangeClass`.
    pub fn set_class(&mut self, node: NodeId, name: &str, include: bool) {
        let Some(entry) = self.node_mut(node) else {
            return;
        };
        let current = entry.class_name.take().unwrap_or_default();
        let mut tokens: Vec<&str> = current
            .split_whitespace()
            .filter(|token| *token != name)
            .collect();
        if include {
            tokens.push(name);
        }
        entry.class_name = Some(tokens.join(" "));
        self.emit(TreeEvent::ChangeClass);
    }

    pub fn set_label(&mut self, node: NodeId, label: impl Into<String>) {
        let Some(entry) = self.node_mut(node) else {
            return;
        };
        entry.label = Some(label.into());
        self.emit(TreeEvent::Change(Some(node)));
    }

    /// Overrides (or clears) the per-row height and invalidates the cached
    /// total height.
    pub fn set_height(&mut self, node: NodeId, height: Option<u32>) {
        let Some(entry) = self.node_mut(node) else {
            return;
        };
        entry.height = height;
        self.invalidate_height();
        self.emit(TreeEvent::Change(Some(node)));
    }

    /// Indentation level of the row (its depth).
    pub fn row_indent(&self, node: NodeId) -> i32 {
        self.node(node).map_or(0, |n| n.depth)
    }

    pub fn indent_px(&self, node: NodeId) -> u32 {
        let depth = self.node(node).map_or(0, |n| n.depth).max(0) as u32;
        depth * self.options.indent_size
    }

    pub fn icon(&self, node: NodeId) -> String {
        match (&self.options.icon, self.node(node)) {
            (Some(icon), Some(node)) => icon(node),
            _ => String::new(),
        }
    }

    pub fn empty_message(&self) -> &str {
        self.options.empty_message.as_deref().unwrap_or("")
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn alloc(&mut self, node: Node<M>) -> NodeId {
        if let Some(slot) = self.free.pop() {
            self.nodes[slot as usize] = Some(node);
            NodeId(slot)
        } else {
            let id = NodeId(self.nodes.len() as u32);
            self.nodes.push(Some(node));
            id
        }
    }

    fn free_subtree(&mut self, id: NodeId) {
        let Some(slot) = self.nodes.get_mut(id.index()) else {
            return;
        };
        let Some(node) = slot.take() else { return };
        self.free.push(id.0);
        if let Some(children) = node.children {
            for child in children {
                self.free_subtree(child);
            }
        }
    }

    fn invalidate_height(&self) {
        self.cached_height.set(None);
    }

    fn emit(&self, event: TreeEvent) {
        tltrace!(event = ?event, "emit");
        if let Some(on_event) = &self.options.on_event {
            on_event(event);
        }
    }
}
