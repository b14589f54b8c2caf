//! Node types: NodeId, NodeFlags, ChildList, Node.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use slotmap::new_key_type;

use crate::geometry::{Offset, Region, Size};
use crate::layout::Layouter;
use crate::style::StyleProperty;
use crate::widget::Widget;

new_key_type! {
    /// Handle to a node in a [`Tree`](super::Tree). Copy, lightweight (u64).
    ///
    /// Handles do not keep nodes alive: once a node is freed every lookup with
    /// its id returns `None`.
    pub struct NodeId;
}

bitflags::bitflags! {
    /// Per-node state bits.
    ///
    /// The layout bits are stored as *valid* bits: a freshly created node has
    /// both cleared, which is what schedules its first layout.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u32 {
        const ENABLED = 1 << 0;
        const SELECTABLE = 1 << 1;
        const SELECTED = 1 << 2;
        const ACTIVE = 1 << 3;
        const DESTROYED = 1 << 4;
        /// The node's own layout is up to date.
        const LAYOUT_VALID = 1 << 5;
        /// No descendant of the node needs layout.
        const SUBTREE_LAYOUT_VALID = 1 << 6;
        /// Children are clipped to the node's absolute rectangle.
        const USES_SCISSOR = 1 << 7;
        const ALWAYS_ON_TOP = 1 << 8;
        /// Not moved by `bring_to_front`.
        const LOCKED = 1 << 9;
        /// Never reported by hit-testing; children still are.
        const HIT_TRANSPARENT = 1 << 10;
        /// Free for widget implementations.
        const WIDGET_RESERVED = 0xFFFF_0000;
    }
}

impl NodeFlags {
    /// Bits applications may toggle directly through `Tree::set_flags`.
    /// The rest are owned by the layout engine, the focus state machine and
    /// the destruction queue.
    pub const USER_SETTABLE: NodeFlags = NodeFlags::SELECTABLE
        .union(NodeFlags::USES_SCISSOR)
        .union(NodeFlags::ALWAYS_ON_TOP)
        .union(NodeFlags::LOCKED)
        .union(NodeFlags::HIT_TRANSPARENT)
        .union(NodeFlags::WIDGET_RESERVED);
}

// ---------------------------------------------------------------------------
// ChildList
// ---------------------------------------------------------------------------

/// Head, tail and length of a container's intrusive child list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChildList {
    pub(crate) first: Option<NodeId>,
    pub(crate) last: Option<NodeId>,
    pub(crate) count: usize,
}

impl ChildList {
    pub fn first(&self) -> Option<NodeId> {
        self.first
    }

    pub fn last(&self) -> Option<NodeId> {
        self.last
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// A single entry in the component tree.
///
/// Nodes are created with the builder methods below and handed to
/// [`Tree::insert`](super::Tree::insert). Structural links and geometry are
/// only mutated through the tree so that invalidation and damage stay in sync.
pub struct Node {
    pub(crate) name: Option<String>,
    pub(crate) rect: Region,
    pub(crate) abs_pos: Cell<Option<Offset>>,
    pub(crate) flags: NodeFlags,
    pub(crate) layouters: Vec<Rc<dyn Layouter>>,
    pub(crate) local_props: Vec<StyleProperty>,
    pub(crate) recursive_props: Vec<StyleProperty>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) next: Option<NodeId>,
    pub(crate) prev: Option<NodeId>,
    pub(crate) children: Option<ChildList>,
    pub(crate) widget: Option<Box<dyn Widget>>,
}

impl Node {
    fn with_children(children: Option<ChildList>) -> Self {
        Self {
            name: None,
            rect: Region::EMPTY,
            abs_pos: Cell::new(None),
            flags: NodeFlags::ENABLED,
            layouters: Vec::new(),
            local_props: Vec::new(),
            recursive_props: Vec::new(),
            parent: None,
            next: None,
            prev: None,
            children,
            widget: None,
        }
    }

    /// A node that cannot own children.
    pub fn leaf() -> Self {
        Self::with_children(None)
    }

    /// A node that owns an ordered list of children.
    pub fn container() -> Self {
        Self::with_children(Some(ChildList::default()))
    }

    /// Debug name (builder). Shows up in diagnostics and tree dumps.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Parent-relative rectangle (builder).
    pub fn with_rect(mut self, rect: Region) -> Self {
        self.rect = rect;
        self
    }

    /// Size at the parent's origin (builder).
    pub fn with_size(mut self, size: Size) -> Self {
        self.rect = Region::from_parts(self.rect.offset(), size);
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.flags.set(NodeFlags::ENABLED, enabled);
        self
    }

    pub fn selectable(mut self, selectable: bool) -> Self {
        self.flags.set(NodeFlags::SELECTABLE, selectable);
        self
    }

    pub fn always_on_top(mut self, on_top: bool) -> Self {
        self.flags.set(NodeFlags::ALWAYS_ON_TOP, on_top);
        self
    }

    pub fn locked(mut self, locked: bool) -> Self {
        self.flags.set(NodeFlags::LOCKED, locked);
        self
    }

    pub fn hit_transparent(mut self, transparent: bool) -> Self {
        self.flags.set(NodeFlags::HIT_TRANSPARENT, transparent);
        self
    }

    /// Clip descendants to this node's rectangle while drawing (builder).
    pub fn clip_children(mut self, clip: bool) -> Self {
        self.flags.set(NodeFlags::USES_SCISSOR, clip);
        self
    }

    /// Set widget-reserved bits (builder). Bits outside
    /// [`NodeFlags::WIDGET_RESERVED`] are ignored.
    pub fn with_widget_flags(mut self, bits: NodeFlags) -> Self {
        self.flags |= bits & NodeFlags::WIDGET_RESERVED;
        self
    }

    pub fn with_widget(mut self, widget: impl Widget + 'static) -> Self {
        self.widget = Some(Box::new(widget));
        self
    }

    /// Append a layout strategy (builder). Strategies run in registration order.
    pub fn with_layouter(mut self, layouter: Rc<dyn Layouter>) -> Self {
        self.layouters.push(layouter);
        self
    }

    /// Property active only while this node draws itself (builder).
    pub fn with_local_property(mut self, property: StyleProperty) -> Self {
        self.local_props.push(property);
        self
    }

    /// Property active for this node and its whole displayed subtree (builder).
    pub fn with_recursive_property(mut self, property: StyleProperty) -> Self {
        self.recursive_props.push(property);
        self
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Parent-relative rectangle.
    pub fn rect(&self) -> Region {
        self.rect
    }

    pub fn flags(&self) -> NodeFlags {
        self.flags
    }

    pub fn is_enabled(&self) -> bool {
        self.flags.contains(NodeFlags::ENABLED)
    }

    pub fn is_selectable(&self) -> bool {
        self.flags.contains(NodeFlags::SELECTABLE)
    }

    pub fn is_selected(&self) -> bool {
        self.flags.contains(NodeFlags::SELECTED)
    }

    pub fn is_active(&self) -> bool {
        self.flags.contains(NodeFlags::ACTIVE)
    }

    pub fn is_destroyed(&self) -> bool {
        self.flags.contains(NodeFlags::DESTROYED)
    }

    /// Whether this node's own layout is up to date.
    pub fn is_layout_valid(&self) -> bool {
        self.flags.contains(NodeFlags::LAYOUT_VALID)
    }

    /// Whether no descendant needs layout.
    pub fn is_subtree_layout_valid(&self) -> bool {
        self.flags.contains(NodeFlags::SUBTREE_LAYOUT_VALID)
    }

    pub fn is_container(&self) -> bool {
        self.children.is_some()
    }

    /// Capability query: the child list if this node is a container.
    pub fn as_container(&self) -> Option<&ChildList> {
        self.children.as_ref()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn next_sibling(&self) -> Option<NodeId> {
        self.next
    }

    pub fn prev_sibling(&self) -> Option<NodeId> {
        self.prev
    }

    pub fn layouters(&self) -> &[Rc<dyn Layouter>] {
        &self.layouters
    }

    pub fn local_properties(&self) -> &[StyleProperty] {
        &self.local_props
    }

    pub fn recursive_properties(&self) -> &[StyleProperty] {
        &self.recursive_props
    }

    pub fn widget(&self) -> Option<&dyn Widget> {
        self.widget.as_deref()
    }

    pub fn widget_mut(&mut self) -> Option<&mut (dyn Widget + 'static)> {
        self.widget.as_deref_mut()
    }

    /// Downcast the attached widget to a concrete type.
    pub fn widget_as<W: Widget + 'static>(&self) -> Option<&W> {
        self.widget.as_ref()?.as_any().downcast_ref::<W>()
    }

    /// Mutable downcast of the attached widget.
    pub fn widget_as_mut<W: Widget + 'static>(&mut self) -> Option<&mut W> {
        self.widget.as_mut()?.as_any_mut().downcast_mut::<W>()
    }

    /// Replace the attached widget, returning the previous one.
    pub fn set_widget(&mut self, widget: Option<Box<dyn Widget>>) -> Option<Box<dyn Widget>> {
        std::mem::replace(&mut self.widget, widget)
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// Replace the local style properties. Takes effect on the next display.
    pub fn set_local_properties(&mut self, properties: Vec<StyleProperty>) {
        self.local_props = properties;
    }

    /// Replace the recursive style properties. Takes effect on the next display.
    pub fn set_recursive_properties(&mut self, properties: Vec<StyleProperty>) {
        self.recursive_props = properties;
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name)
            .field("rect", &self.rect)
            .field("flags", &self.flags)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("layouters", &self.layouters.len())
            .field("widget", &self.widget.as_ref().map(|w| w.widget_type().to_owned()))
            .finish()
    }
}
