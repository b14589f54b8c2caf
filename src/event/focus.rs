//! Selection state machine and tab-order traversal.
//!
//! At most one root-to-leaf path is selected at any time. Selecting a node
//! unselects every sibling subtree along its path and everything below it,
//! then marks the node and all of its ancestors.

use slotmap::SecondaryMap;
use tracing::trace;

use crate::component::{NodeFlags, NodeId, Tree, Visit};
use crate::error::{Result, UiError};

impl Tree {
    /// Select `id`, making it the end of the selected path.
    ///
    /// Returns `Ok(false)` when nothing changed because the node sits in a
    /// disabled or detached subtree, or its widget refused the selection.
    pub fn select(&mut self, id: NodeId) -> Result<bool> {
        let Some(node) = self.get(id) else {
            return Err(UiError::NoSuchNode(id));
        };
        if node.widget().is_some_and(|w| !w.accept_selection()) {
            trace!(?id, "selection refused by widget");
            return Ok(false);
        }
        if !self.is_enabled_chain(id) || !self.is_attached(id) {
            return Ok(false);
        }

        let mut path = self.ancestors(id);
        path.reverse();
        path.push(id);

        // Clear everything off the new path first.
        for window in path.windows(2) {
            let (parent, on_path) = (window[0], window[1]);
            for sibling in self.children(parent) {
                if sibling != on_path {
                    self.unselect_subtree(sibling);
                }
            }
        }
        for child in self.children(id) {
            self.unselect_subtree(child);
        }

        for node in path {
            self.set_selected(node, true);
        }
        Ok(true)
    }

    /// Unselect `id` and everything below it. Ancestors stay selected.
    pub fn unselect_subtree(&mut self, id: NodeId) {
        for node in self.walk_depth_first(id) {
            self.set_selected(node, false);
        }
    }

    /// The deepest node of the selected path, starting at the root.
    pub fn selected_leaf(&self) -> Option<NodeId> {
        let mut current = self.root().filter(|&r| self.get(r).is_some_and(|n| n.is_selected()))?;
        while let Some(next) = self
            .child_iter(current)
            .find(|&c| self.get(c).is_some_and(|n| n.is_selected()))
        {
            current = next;
        }
        Some(current)
    }

    /// Every selected node, in pre-order.
    pub fn selected_nodes(&self) -> Vec<NodeId> {
        let Some(root) = self.root() else {
            return Vec::new();
        };
        self.walk_depth_first(root)
            .into_iter()
            .filter(|&id| self.get(id).is_some_and(|n| n.is_selected()))
            .collect()
    }

    /// Nodes Tab can move to, in tree order: enabled, selectable nodes
    /// reached through enabled ancestors.
    pub fn selection_candidates(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let Some(root) = self.root() else {
            return out;
        };
        self.walk(root, &mut |tree, id| {
            let Some(node) = tree.get(id) else {
                return Visit::SkipChildren;
            };
            if !node.is_enabled() {
                return Visit::SkipChildren;
            }
            if node.is_selectable() {
                out.push(id);
            }
            Visit::Continue
        });
        out
    }

    /// The candidate after (or before, with `backwards`) the current
    /// selection in tree order, wrapping around. With nothing selected, the
    /// first (or last) candidate.
    ///
    /// The selected leaf need not be a candidate itself: the search starts
    /// from its place in pre-order.
    pub fn next_selectable(&self, backwards: bool) -> Option<NodeId> {
        let candidates = self.selection_candidates();
        let (first, last) = (*candidates.first()?, *candidates.last()?);
        let Some(leaf) = self.selected_leaf() else {
            return Some(if backwards { last } else { first });
        };

        let mut rank = SecondaryMap::new();
        if let Some(root) = self.root() {
            for (index, id) in self.walk_depth_first(root).into_iter().enumerate() {
                rank.insert(id, index);
            }
        }
        let here = rank.get(leaf).copied()?;
        let after = |c: &NodeId| rank.get(*c).is_some_and(|&r| r > here);
        let before = |c: &NodeId| rank.get(*c).is_some_and(|&r| r < here);

        let next = if backwards {
            candidates.iter().rev().copied().find(|c| before(c)).unwrap_or(last)
        } else {
            candidates.iter().copied().find(|c| after(c)).unwrap_or(first)
        };
        Some(next)
    }

    /// Move the selection to the next candidate that accepts it. Returns the
    /// newly selected node.
    pub fn focus_next(&mut self, backwards: bool) -> Option<NodeId> {
        let candidates = self.selection_candidates();
        let first = self.next_selectable(backwards)?;
        let start = candidates.iter().position(|&c| c == first)?;
        let len = candidates.len();
        for step in 0..len {
            let index = if backwards {
                (start + len - step) % len
            } else {
                (start + step) % len
            };
            let candidate = candidates[index];
            if matches!(self.select(candidate), Ok(true)) {
                return Some(candidate);
            }
        }
        None
    }

    /// Flip the selected bit, notify the widget and repaint.
    fn set_selected(&mut self, id: NodeId, selected: bool) {
        let Some(node) = self.get_mut(id) else {
            return;
        };
        if node.is_selected() == selected {
            return;
        }
        node.flags.set(NodeFlags::SELECTED, selected);
        if let Some(widget) = node.widget_mut() {
            widget.selection_changed(selected);
        }
        self.invalidate_node_region(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Node;
    use crate::widget::{ShapePanel, WidgetExt};
    use crate::style::ids;
    use pretty_assertions::assert_eq;

    struct Fixture {
        tree: Tree,
        root: NodeId,
        left: NodeId,
        right: NodeId,
        a: NodeId,
        b: NodeId,
        c: NodeId,
    }

    fn fixture() -> Fixture {
        let mut tree = Tree::default();
        let root = tree.insert(Node::container());
        let left = tree.create_child(root, Node::container()).unwrap();
        let right = tree.create_child(root, Node::container()).unwrap();
        let a = tree.create_child(left, Node::leaf().selectable(true)).unwrap();
        let b = tree.create_child(left, Node::leaf().selectable(true)).unwrap();
        let c = tree.create_child(right, Node::leaf().selectable(true)).unwrap();
        Fixture { tree, root, left, right, a, b, c }
    }

    #[test]
    fn selecting_marks_the_whole_path() {
        let mut f = fixture();
        assert!(f.tree.select(f.a).unwrap());
        assert_eq!(f.tree.selected_nodes(), vec![f.root, f.left, f.a]);
        assert_eq!(f.tree.selected_leaf(), Some(f.a));
    }

    #[test]
    fn selecting_elsewhere_clears_sibling_subtrees() {
        let mut f = fixture();
        f.tree.select(f.a).unwrap();
        f.tree.select(f.c).unwrap();
        assert_eq!(f.tree.selected_nodes(), vec![f.root, f.right, f.c]);
    }

    #[test]
    fn selecting_an_ancestor_clears_below() {
        let mut f = fixture();
        f.tree.select(f.b).unwrap();
        f.tree.select(f.left).unwrap();
        assert_eq!(f.tree.selected_nodes(), vec![f.root, f.left]);
        assert_eq!(f.tree.selected_leaf(), Some(f.left));
    }

    #[test]
    fn widget_can_refuse() {
        let mut f = fixture();
        let picky = f
            .tree
            .create_child(
                f.right,
                ShapePanel::new(ids::BACKGROUND_SHAPE)
                    .accepts_selection(false)
                    .into_leaf()
                    .selectable(true),
            )
            .unwrap();
        f.tree.select(f.a).unwrap();
        assert!(!f.tree.select(picky).unwrap());
        assert_eq!(f.tree.selected_leaf(), Some(f.a));
    }

    #[test]
    fn disabled_nodes_cannot_be_selected() {
        let mut f = fixture();
        f.tree.set_enabled(f.right, false).unwrap();
        assert!(!f.tree.select(f.c).unwrap());
        assert!(f.tree.selected_nodes().is_empty());
    }

    #[test]
    fn tab_order_wraps_and_skips_disabled() {
        let mut f = fixture();
        assert_eq!(f.tree.selection_candidates(), vec![f.a, f.b, f.c]);
        assert_eq!(f.tree.focus_next(false), Some(f.a));
        assert_eq!(f.tree.focus_next(false), Some(f.b));
        assert_eq!(f.tree.focus_next(false), Some(f.c));
        assert_eq!(f.tree.focus_next(false), Some(f.a));
        assert_eq!(f.tree.focus_next(true), Some(f.c));

        f.tree.set_enabled(f.b, false).unwrap();
        f.tree.select(f.a).unwrap();
        assert_eq!(f.tree.focus_next(false), Some(f.c));
    }

    #[test]
    fn tab_skips_refusing_widgets() {
        let mut f = fixture();
        f.tree
            .create_child(
                f.left,
                ShapePanel::new(ids::BACKGROUND_SHAPE)
                    .accepts_selection(false)
                    .into_leaf()
                    .selectable(true),
            )
            .unwrap();
        f.tree.select(f.b).unwrap();
        assert_eq!(f.tree.focus_next(false), Some(f.c));
    }

    #[test]
    fn tab_continues_from_a_non_candidate_leaf() {
        let mut f = fixture();
        // `right` is not a candidate but ends the path once `c` is unselected.
        f.tree.select(f.c).unwrap();
        f.tree.unselect_subtree(f.c);
        assert_eq!(f.tree.selected_leaf(), Some(f.right));
        assert_eq!(f.tree.next_selectable(false), Some(f.c));
        assert_eq!(f.tree.next_selectable(true), Some(f.b));

        f.tree.unselect_subtree(f.right);
        f.tree.select(f.left).unwrap();
        assert_eq!(f.tree.next_selectable(false), Some(f.a));
        assert_eq!(f.tree.next_selectable(true), Some(f.c));
    }

    #[test]
    fn moving_a_selected_node_drops_its_selection() {
        let mut f = fixture();
        f.tree.select(f.a).unwrap();
        f.tree.reparent(f.a, f.right).unwrap();
        assert_eq!(f.tree.selected_nodes(), vec![f.root, f.left]);
        assert!(!f.tree.get(f.a).unwrap().is_selected());

        f.tree.select(f.a).unwrap();
        f.tree.detach(f.right).unwrap();
        assert!(f.tree.select(f.b).unwrap());
        f.tree.append(f.root, f.right).unwrap();
        assert_eq!(f.tree.selected_nodes(), vec![f.root, f.left, f.b]);
    }

    #[test]
    fn reordering_siblings_keeps_the_selection() {
        let mut f = fixture();
        f.tree.select(f.a).unwrap();
        f.tree.bring_to_front(f.a).unwrap();
        assert_eq!(f.tree.children(f.left), vec![f.b, f.a]);
        assert_eq!(f.tree.selected_nodes(), vec![f.root, f.left, f.a]);
    }

    #[test]
    fn detached_nodes_cannot_be_selected() {
        let mut f = fixture();
        f.tree.detach(f.left).unwrap();
        assert!(!f.tree.select(f.a).unwrap());
        assert!(!f.tree.get(f.a).unwrap().is_selected());
    }

    #[test]
    fn unselect_subtree_keeps_ancestors() {
        let mut f = fixture();
        f.tree.select(f.a).unwrap();
        f.tree.unselect_subtree(f.a);
        assert_eq!(f.tree.selected_nodes(), vec![f.root, f.left]);
    }
}
