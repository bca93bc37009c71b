use alloc::string::String;
use alloc::vec::Vec;

/// Handle to a node in the provider's arena.
///
/// Handles are stable while the owning subtree is alive; replacing the root
/// dataset (or reloading a subtree) invalidates the handles under it. Holding
/// a handle does not keep the node alive — ownership flows strictly
/// parent→children inside the provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Where a node stands with respect to knowing its children.
///
/// `Pending` means the children are unknown until fetched; this is distinct
/// from an empty child list. `Loading` is only surfaced once a fetch has been
/// outstanding past the loading-indicator delay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LoadStatus {
    #[default]
    None,
    Pending,
    Loading,
    Loaded,
}

/// The expansion state machine of a single node.
///
/// `Loading` means the open flag has been taken but a lazy fetch is still
/// outstanding; re-entrant expand calls short-circuit on it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeState {
    #[default]
    Collapsed,
    Loading,
    Open,
}

/// The input schema a data supplier hands to the provider.
///
/// A node offers its children through exactly one source: an ordered
/// `children` sequence, an ordered key→node `map` (supplier order preserved,
/// keys not otherwise interpreted), or — root only — an `items` sequence.
/// Whichever is present is consumed the first time children are requested.
///
/// `meta` is an open extension slot for host data the engine never interprets.
#[derive(Clone, Debug)]
pub struct NodeData<M = ()> {
    pub label: Option<String>,
    pub name: Option<String>,
    pub class_name: Option<String>,
    /// Per-row height override, meaningful under [`crate::HeightMode::PerRow`].
    pub height: Option<u32>,
    pub status: LoadStatus,
    /// Suppresses the sort pass for this node's children.
    pub pre_sorted: bool,
    pub no_select: bool,
    /// Pre-marks the node open; its subtree is expanded when it first becomes
    /// visible.
    pub is_open: bool,
    pub is_selected: bool,
    pub children: Option<Vec<NodeData<M>>>,
    pub map: Option<Vec<(String, NodeData<M>)>>,
    pub items: Option<Vec<NodeData<M>>>,
    pub meta: Option<M>,
}

impl<M> Default for NodeData<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> NodeData<M> {
    pub fn new() -> Self {
        Self {
            label: None,
            name: None,
            class_name: None,
            height: None,
            status: LoadStatus::None,
            pre_sorted: false,
            no_select: false,
            is_open: false,
            is_selected: false,
            children: None,
            map: None,
            items: None,
            meta: None,
        }
    }

    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::new()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn with_height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn with_status(mut self, status: LoadStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_children(mut self, children: Vec<NodeData<M>>) -> Self {
        self.children = Some(children);
        self
    }

    pub fn with_map(mut self, map: Vec<(String, NodeData<M>)>) -> Self {
        self.map = Some(map);
        self
    }

    pub fn with_items(mut self, items: Vec<NodeData<M>>) -> Self {
        self.items = Some(items);
        self
    }

    pub fn with_meta(mut self, meta: M) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn with_pre_sorted(mut self, pre_sorted: bool) -> Self {
        self.pre_sorted = pre_sorted;
        self
    }

    pub fn with_no_select(mut self, no_select: bool) -> Self {
        self.no_select = no_select;
        self
    }

    pub fn with_open(mut self, is_open: bool) -> Self {
        self.is_open = is_open;
        self
    }
}

/// The unconsumed child source carried by an arena node.
#[derive(Clone, Debug)]
pub(crate) enum ChildSource<M> {
    None,
    Children(Vec<NodeData<M>>),
    Map(Vec<(String, NodeData<M>)>),
    Items(Vec<NodeData<M>>),
}

/// An arena-resident node.
///
/// Scalar fields come from the supplying [`NodeData`]; `parent`/`depth` are
/// stamped by materialization, `children` is the materialization cache.
#[derive(Clone, Debug)]
pub struct Node<M = ()> {
    pub(crate) parent: Option<NodeId>,
    pub(crate) depth: i32,
    pub(crate) state: NodeState,
    pub(crate) is_selected: bool,
    pub(crate) children: Option<Vec<NodeId>>,
    pub(crate) source: ChildSource<M>,
    pub(crate) label: Option<String>,
    pub(crate) name: Option<String>,
    pub(crate) class_name: Option<String>,
    pub(crate) height: Option<u32>,
    pub(crate) status: LoadStatus,
    pub(crate) pre_sorted: bool,
    pub(crate) no_select: bool,
    pub(crate) meta: Option<M>,
}

impl<M> Node<M> {
    pub(crate) fn from_data(data: NodeData<M>) -> Self {
        let NodeData {
            label,
            name,
            class_name,
            height,
            status,
            pre_sorted,
            no_select,
            is_open,
            is_selected,
            children,
            map,
            items,
            meta,
        } = data;
        let source = if let Some(children) = children {
            ChildSource::Children(children)
        } else if let Some(map) = map {
            ChildSource::Map(map)
        } else if let Some(items) = items {
            ChildSource::Items(items)
        } else {
            ChildSource::None
        };
        Self {
            parent: None,
            depth: 0,
            state: if is_open {
                NodeState::Open
            } else {
                NodeState::Collapsed
            },
            is_selected,
            children: None,
            source,
            label,
            name,
            class_name,
            height,
            status,
            pre_sorted,
            no_select,
            meta,
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Distance from the root sentinel; the hidden root itself is −1.
    pub fn depth(&self) -> i32 {
        self.depth
    }

    pub fn state(&self) -> NodeState {
        self.state
    }

    /// Open for expansion purposes; `NodeState::Loading` counts as open.
    pub fn is_open(&self) -> bool {
        self.state != NodeState::Collapsed
    }

    pub fn is_selected(&self) -> bool {
        self.is_selected
    }

    pub fn status(&self) -> LoadStatus {
        self.status
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Display text: `label`, falling back to `name`, falling back to empty.
    pub fn caption(&self) -> &str {
        self.label
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or_default()
    }

    pub fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    pub fn height(&self) -> Option<u32> {
        self.height
    }

    pub fn pre_sorted(&self) -> bool {
        self.pre_sorted
    }

    pub fn no_select(&self) -> bool {
        self.no_select
    }

    pub fn meta(&self) -> Option<&M> {
        self.meta.as_ref()
    }

    /// Whether the node groups as a branch for directories-first ordering:
    /// non-empty (cached or supplied) children, or an unconsumed map source.
    /// An explicitly empty child list groups as a leaf.
    pub(crate) fn is_branch(&self) -> bool {
        if let Some(children) = &self.children {
            return !children.is_empty();
        }
        match &self.source {
            ChildSource::Children(v) => !v.is_empty(),
            ChildSource::Map(_) => true,
            _ => false,
        }
    }
}
