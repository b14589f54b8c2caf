//! Tree operations: insert, link, unlink, reparent, raise, walk.

use slotmap::SlotMap;
use tracing::warn;

use super::node::{ChildList, Node, NodeFlags, NodeId};
use crate::error::{Result, UiError};
use crate::render::DamageTracker;
use crate::widget::Widget;

/// The component tree, backed by a slotmap arena.
///
/// Every node lives in one `SlotMap`. Children form an intrusive doubly linked
/// list: each node stores its parent and its two siblings, and a container
/// stores the head, the tail and the count. All structural mutation funnels
/// through the `insert_*` / `remove` family below, which keeps three
/// invariants:
///
/// - a linked node's parent is exactly the container whose list holds it,
/// - `next`/`prev` links and the container's head/tail agree,
/// - no node is its own ancestor.
pub struct Tree {
    pub(crate) nodes: SlotMap<NodeId, Node>,
    root: Option<NodeId>,
    pub(crate) damage: DamageTracker,
}

impl Tree {
    /// Create an empty tree with a damage tracker in the given mode.
    pub fn new(lazy_rendering: bool) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root: None,
            damage: DamageTracker::new(lazy_rendering),
        }
    }

    /// Add a detached node to the arena.
    ///
    /// The first node inserted into an empty tree becomes the root.
    pub fn insert(&mut self, node: Node) -> NodeId {
        let id = self.nodes.insert(node);
        if self.root.is_none() {
            self.root = Some(id);
        }
        id
    }

    /// Insert `node` and append it under `parent` in one step.
    ///
    /// On failure the new node is dropped again and the tree is unchanged.
    pub fn create_child(&mut self, parent: NodeId, node: Node) -> Result<NodeId> {
        let id = self.nodes.insert(node);
        if let Err(err) = self.append(parent, id) {
            self.nodes.remove(id);
            return Err(err);
        }
        Ok(id)
    }

    /// Link `child` as the last child of `container`.
    pub fn append(&mut self, container: NodeId, child: NodeId) -> Result<()> {
        self.insert_before(container, child, None)
    }

    /// Link `child` as the first child of `container`.
    pub fn prepend(&mut self, container: NodeId, child: NodeId) -> Result<()> {
        self.insert_after(container, child, None)
    }

    /// Link `child` right after `after`. `None` means "at the front".
    ///
    /// `child` is detached from its current parent first, so this doubles as
    /// a move within or across containers.
    pub fn insert_after(
        &mut self,
        container: NodeId,
        child: NodeId,
        after: Option<NodeId>,
    ) -> Result<()> {
        self.check_link(container, child, after)?;
        if after == Some(child) {
            return Ok(());
        }
        self.invalidate_node_region(child);
        self.release_moved_selection(container, child);
        self.unlink(child);
        let next = match after {
            Some(sibling) => self.nodes[sibling].next,
            None => self.child_list(container).first,
        };
        self.link(container, child, after, next);
        Ok(())
    }

    /// Link `child` right before `before`. `None` means "at the back".
    pub fn insert_before(
        &mut self,
        container: NodeId,
        child: NodeId,
        before: Option<NodeId>,
    ) -> Result<()> {
        self.check_link(container, child, before)?;
        if before == Some(child) {
            return Ok(());
        }
        self.invalidate_node_region(child);
        self.release_moved_selection(container, child);
        self.unlink(child);
        let prev = match before {
            Some(sibling) => self.nodes[sibling].prev,
            None => self.child_list(container).last,
        };
        self.link(container, child, prev, before);
        Ok(())
    }

    /// Unlink `child` from `container`.
    ///
    /// The node stays in the arena, detached, and can be linked again. If
    /// `child` is not linked under `container` nothing changes and
    /// [`UiError::NotAChild`] is returned.
    pub fn remove(&mut self, container: NodeId, child: NodeId) -> Result<()> {
        let Some(node) = self.nodes.get(child) else {
            return Err(UiError::NoSuchNode(child));
        };
        if node.parent != Some(container) {
            warn!(?child, ?container, actual = ?node.parent, "remove: node is not a child of this container");
            return Err(UiError::NotAChild { child, container });
        }
        self.invalidate_node_region(child);
        self.unselect_subtree(child);
        self.unlink(child);
        Ok(())
    }

    /// Unlink `child` from whatever container holds it. Detached nodes are left alone.
    pub fn detach(&mut self, child: NodeId) -> Result<()> {
        let Some(node) = self.nodes.get(child) else {
            return Err(UiError::NoSuchNode(child));
        };
        match node.parent {
            Some(parent) => self.remove(parent, child),
            None if self.root == Some(child) => Err(UiError::RootImmutable),
            None => Ok(()),
        }
    }

    /// Move `child` (with its subtree) to the end of `new_parent`'s children.
    pub fn reparent(&mut self, child: NodeId, new_parent: NodeId) -> Result<()> {
        self.append(new_parent, child)
    }

    /// Move `id` to the end of its siblings so it draws last, staying below
    /// any trailing always-on-top siblings unless it is one itself.
    ///
    /// Returns `Ok(false)` when nothing moved: detached, locked, or already in front.
    pub fn bring_to_front(&mut self, id: NodeId) -> Result<bool> {
        let Some(node) = self.nodes.get(id) else {
            return Err(UiError::NoSuchNode(id));
        };
        let Some(parent) = node.parent else {
            return Ok(false);
        };
        if node.flags.contains(NodeFlags::LOCKED) {
            return Ok(false);
        }
        let mut before = None;
        if !node.flags.contains(NodeFlags::ALWAYS_ON_TOP) {
            let mut cursor = self.child_list(parent).last;
            while let Some(sibling) = cursor {
                let s = &self.nodes[sibling];
                if sibling == id || !s.flags.contains(NodeFlags::ALWAYS_ON_TOP) {
                    break;
                }
                before = Some(sibling);
                cursor = s.prev;
            }
        }
        if self.nodes[id].next == before {
            return Ok(false);
        }
        self.insert_before(parent, id, before)?;
        Ok(true)
    }

    // ── Internal linking ─────────────────────────────────────────────

    fn check_link(&self, container: NodeId, child: NodeId, sibling: Option<NodeId>) -> Result<()> {
        let Some(parent_node) = self.nodes.get(container) else {
            return Err(UiError::NoSuchNode(container));
        };
        let Some(child_node) = self.nodes.get(child) else {
            return Err(UiError::NoSuchNode(child));
        };
        // Destroyed nodes are only waiting to be freed.
        if parent_node.is_destroyed() {
            return Err(UiError::NoSuchNode(container));
        }
        if child_node.is_destroyed() {
            return Err(UiError::NoSuchNode(child));
        }
        if !parent_node.is_container() {
            return Err(UiError::NotAContainer { node: container, operation: "insert" });
        }
        if self.root == Some(child) {
            return Err(UiError::RootImmutable);
        }
        if child == container || self.is_ancestor_of(child, container) {
            return Err(UiError::Cycle { child, parent: container });
        }
        if let Some(sibling) = sibling {
            match self.nodes.get(sibling) {
                None => return Err(UiError::NoSuchNode(sibling)),
                Some(s) if s.parent != Some(container) => {
                    return Err(UiError::NotAChild { child: sibling, container });
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Moving a selected node under another parent unselects its subtree.
    /// Reordering within one container keeps the selection.
    fn release_moved_selection(&mut self, container: NodeId, child: NodeId) {
        let node = &self.nodes[child];
        if node.parent != Some(container) && node.is_selected() {
            self.unselect_subtree(child);
        }
    }

    fn child_list(&self, container: NodeId) -> ChildList {
        self.nodes
            .get(container)
            .and_then(|n| n.children)
            .unwrap_or_default()
    }

    fn child_list_mut(&mut self, container: NodeId) -> Option<&mut ChildList> {
        self.nodes.get_mut(container)?.children.as_mut()
    }

    /// Splice a detached `child` between `prev` and `next` under `container`.
    fn link(&mut self, container: NodeId, child: NodeId, prev: Option<NodeId>, next: Option<NodeId>) {
        {
            let node = &mut self.nodes[child];
            node.parent = Some(container);
            node.prev = prev;
            node.next = next;
        }
        match prev {
            Some(p) => self.nodes[p].next = Some(child),
            None => {
                if let Some(list) = self.child_list_mut(container) {
                    list.first = Some(child);
                }
            }
        }
        match next {
            Some(n) => self.nodes[n].prev = Some(child),
            None => {
                if let Some(list) = self.child_list_mut(container) {
                    list.last = Some(child);
                }
            }
        }
        if let Some(list) = self.child_list_mut(container) {
            list.count += 1;
        }
        self.child_rect_changed(container, child);
    }

    /// Take `child` out of its parent's list. No-op for detached nodes.
    fn unlink(&mut self, child: NodeId) {
        let (parent, prev, next) = {
            let node = &mut self.nodes[child];
            let Some(parent) = node.parent.take() else {
                return;
            };
            (parent, node.prev.take(), node.next.take())
        };
        match prev {
            Some(p) => self.nodes[p].next = next,
            None => {
                if let Some(list) = self.child_list_mut(parent) {
                    list.first = next;
                }
            }
        }
        match next {
            Some(n) => self.nodes[n].prev = prev,
            None => {
                if let Some(list) = self.child_list_mut(parent) {
                    list.last = prev;
                }
            }
        }
        if let Some(list) = self.child_list_mut(parent) {
            list.count -= 1;
        }
        self.invalidate_absolute_positions(child);
        self.invalidate_layout(parent);
    }

    /// The parent re-evaluates its layout and the child is laid out and
    /// repainted at its new place.
    fn child_rect_changed(&mut self, container: NodeId, child: NodeId) {
        self.invalidate_absolute_positions(child);
        self.invalidate_subtree_layout(child);
        self.invalidate_layout(container);
        self.invalidate_node_region(child);
    }

    /// Remove a detached subtree from the arena, returning the freed ids in
    /// pre-order. Linked nodes are unlinked first.
    pub(crate) fn free_subtree(&mut self, id: NodeId) -> Vec<NodeId> {
        if !self.nodes.contains_key(id) {
            return Vec::new();
        }
        self.unlink(id);
        let doomed = self.walk_depth_first(id);
        for &node in &doomed {
            self.nodes.remove(node);
        }
        if self.root.is_some_and(|root| doomed.contains(&root)) {
            self.root = None;
        }
        doomed
    }

    /// Move the widget out of its node so a hook can run with `&mut Tree`.
    pub(crate) fn take_widget(&mut self, id: NodeId) -> Option<Box<dyn Widget>> {
        self.nodes.get_mut(id)?.widget.take()
    }

    /// Put a widget taken with [`take_widget`](Self::take_widget) back, unless
    /// the node was freed or got a new widget meanwhile.
    pub(crate) fn restore_widget(&mut self, id: NodeId, widget: Box<dyn Widget>) {
        if let Some(node) = self.nodes.get_mut(id) {
            if node.widget.is_none() {
                node.widget = Some(widget);
            }
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Make `id` the root. Fails if `id` is linked under a parent.
    pub fn set_root(&mut self, id: NodeId) -> Result<()> {
        match self.nodes.get(id) {
            None => Err(UiError::NoSuchNode(id)),
            Some(node) if node.parent.is_some() => Err(UiError::RootImmutable),
            Some(_) => {
                self.root = Some(id);
                Ok(())
            }
        }
    }

    /// Number of nodes in the arena, detached ones included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id)?.parent
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id)?.children?.first
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id)?.children?.last
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id)?.next
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id)?.prev
    }

    pub fn child_count(&self, id: NodeId) -> usize {
        self.child_list(id).count
    }

    /// Iterate the children of `id` in order, following the sibling links.
    pub fn child_iter(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.first_child(id),
        }
    }

    /// Snapshot of the children of `id`. Safe to hold across mutation.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.child_iter(id).collect()
    }

    /// Ancestors of `id`, nearest first, ending at the topmost one.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut current = self.parent(id);
        while let Some(p) = current {
            result.push(p);
            current = self.parent(p);
        }
        result
    }

    /// Whether `ancestor` is a strict ancestor of `id`.
    pub fn is_ancestor_of(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = self.parent(id);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.parent(p);
        }
        false
    }

    /// Whether `id` is linked (transitively) under the root, or is the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        match self.root {
            Some(root) => root == id || (self.contains(id) && self.is_ancestor_of(root, id)),
            None => false,
        }
    }

    /// Pre-order depth-first snapshot of the subtree at `start`.
    pub fn walk_depth_first(&self, start: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        if !self.contains(start) {
            return result;
        }
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            result.push(current);
            // Push in reverse so the first child is visited first.
            let kids = self.children(current);
            stack.extend(kids.into_iter().rev());
        }
        result
    }

    /// All strict descendants of `id` in pre-order.
    pub fn collect_descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut all = self.walk_depth_first(id);
        if !all.is_empty() {
            all.remove(0);
        }
        all
    }

    /// Check the structural invariants over the whole arena, returning a
    /// description of every violation found.
    pub fn check_links(&self) -> Vec<String> {
        let mut problems = Vec::new();
        for (id, node) in &self.nodes {
            if let Some(parent) = node.parent {
                match self.nodes.get(parent) {
                    None => problems.push(format!("{id:?}: parent {parent:?} is gone")),
                    Some(p) if !p.is_container() => {
                        problems.push(format!("{id:?}: parent {parent:?} is a leaf"));
                    }
                    Some(_) => {
                        let listed = self.child_iter(parent).filter(|&c| c == id).count();
                        if listed != 1 {
                            problems.push(format!("{id:?}: listed {listed} times under {parent:?}"));
                        }
                    }
                }
                // Bounded climb: a parent cycle must not hang the check.
                let mut steps = 0;
                let mut current = Some(parent);
                while let Some(p) = current {
                    if p == id {
                        problems.push(format!("{id:?}: is its own ancestor"));
                        break;
                    }
                    steps += 1;
                    if steps > self.nodes.len() {
                        break;
                    }
                    current = self.nodes.get(p).and_then(|n| n.parent);
                }
            } else if node.next.is_some() || node.prev.is_some() {
                problems.push(format!("{id:?}: detached but has sibling links"));
            }
            if let Some(list) = node.children {
                let mut count = 0;
                let mut prev = None;
                let mut cursor = list.first;
                while let Some(child) = cursor {
                    let Some(c) = self.nodes.get(child) else {
                        problems.push(format!("{id:?}: child {child:?} is gone"));
                        break;
                    };
                    if c.parent != Some(id) {
                        problems.push(format!("{child:?}: in list of {id:?} but parent is {:?}", c.parent));
                    }
                    if c.prev != prev {
                        problems.push(format!("{child:?}: prev link disagrees with list order"));
                    }
                    count += 1;
                    if count > self.nodes.len() {
                        problems.push(format!("{id:?}: child list loops"));
                        break;
                    }
                    prev = Some(child);
                    cursor = c.next;
                }
                if list.last != prev {
                    problems.push(format!("{id:?}: tail {:?} but list ends at {prev:?}", list.last));
                }
                if list.count != count {
                    problems.push(format!("{id:?}: count {} but {count} linked", list.count));
                }
            }
        }
        problems
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new(false)
    }
}

/// Iterator over a container's children following the sibling links.
pub struct Children<'a> {
    tree: &'a Tree,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.next_sibling(current);
        Some(current)
    }
}
