//! Visitor traversal over the tree.
//!
//! The visitor receives `&mut Tree` and may restructure the tree while it
//! runs: each level iterates a snapshot of the child list and skips entries
//! that were freed or moved elsewhere in the meantime.

use super::node::NodeId;
use super::tree::Tree;

/// What a visitor wants next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// Descend into the children, then carry on with the siblings.
    Continue,
    /// Do not descend into this node's children.
    SkipChildren,
    /// Stop the whole traversal.
    Exit,
}

impl Tree {
    /// Pre-order traversal of the subtree at `start`.
    ///
    /// Returns [`Visit::Exit`] if the visitor stopped early.
    pub fn visit_subtree<F>(&mut self, start: NodeId, visitor: &mut F) -> Visit
    where
        F: FnMut(&mut Tree, NodeId) -> Visit,
    {
        if !self.contains(start) {
            return Visit::Continue;
        }
        match visitor(self, start) {
            Visit::Exit => return Visit::Exit,
            Visit::SkipChildren => return Visit::Continue,
            Visit::Continue => {}
        }
        self.visit_children(start, &mut |tree, child| tree.visit_subtree(child, visitor))
    }

    /// Visit the direct children of `parent` only.
    pub fn visit_children<F>(&mut self, parent: NodeId, visitor: &mut F) -> Visit
    where
        F: FnMut(&mut Tree, NodeId) -> Visit,
    {
        for child in self.children(parent) {
            if self.parent(child) != Some(parent) {
                continue;
            }
            if visitor(self, child) == Visit::Exit {
                return Visit::Exit;
            }
        }
        Visit::Continue
    }

    /// Read-only pre-order traversal; the visitor cannot mutate the tree.
    pub fn walk<F>(&self, start: NodeId, visitor: &mut F) -> Visit
    where
        F: FnMut(&Tree, NodeId) -> Visit,
    {
        if !self.contains(start) {
            return Visit::Continue;
        }
        match visitor(self, start) {
            Visit::Exit => return Visit::Exit,
            Visit::SkipChildren => return Visit::Continue,
            Visit::Continue => {}
        }
        for child in self.child_iter(start) {
            if self.walk(child, visitor) == Visit::Exit {
                return Visit::Exit;
            }
        }
        Visit::Continue
    }
}
