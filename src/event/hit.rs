//! Hit-testing: which node is under a point.

use crate::component::{NodeFlags, NodeId, Tree, Visit};
use crate::geometry::Offset;

impl Tree {
    /// Topmost node under `point` (absolute coordinates), searching from the
    /// root.
    pub fn component_at(&self, point: Offset) -> Option<NodeId> {
        self.component_at_from(self.root()?, point)
    }

    /// Topmost node under `point` within the subtree at `start`.
    ///
    /// Descends only into enabled nodes that cover the point. Later siblings
    /// are drawn over earlier ones, so the last match in pre-order wins.
    /// Hit-transparent nodes are never the result, but their children are
    /// still searched.
    pub fn component_at_from(&self, start: NodeId, point: Offset) -> Option<NodeId> {
        let mut hit = None;
        self.walk(start, &mut |tree, id| {
            if !tree.covers(id, point) {
                return Visit::SkipChildren;
            }
            let transparent = tree
                .get(id)
                .is_some_and(|n| n.flags().contains(NodeFlags::HIT_TRANSPARENT));
            if !transparent {
                hit = Some(id);
            }
            Visit::Continue
        });
        hit
    }

    /// Whether the enabled node `id` covers the absolute `point`.
    pub fn covers(&self, id: NodeId, point: Offset) -> bool {
        let Some(node) = self.get(id) else {
            return false;
        };
        if !node.is_enabled() {
            return false;
        }
        let Some(area) = self.absolute_rect(id) else {
            return false;
        };
        let local = point - area.offset();
        match node.widget() {
            Some(widget) => widget.covers_point(local, area.size()),
            None => area.contains(point),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Node;
    use crate::geometry::Region;

    fn build() -> (Tree, NodeId, NodeId, NodeId) {
        let mut tree = Tree::default();
        let root = tree.insert(Node::container().with_rect(Region::new(0, 0, 100, 100)));
        let panel = tree
            .create_child(root, Node::container().with_rect(Region::new(10, 10, 50, 50)))
            .unwrap();
        let button = tree
            .create_child(panel, Node::leaf().with_rect(Region::new(5, 5, 10, 10)))
            .unwrap();
        (tree, root, panel, button)
    }

    #[test]
    fn deepest_node_wins() {
        let (tree, root, panel, button) = build();
        assert_eq!(tree.component_at(Offset::new(16, 16)), Some(button));
        assert_eq!(tree.component_at(Offset::new(40, 40)), Some(panel));
        assert_eq!(tree.component_at(Offset::new(90, 90)), Some(root));
        assert_eq!(tree.component_at(Offset::new(200, 0)), None);
    }

    #[test]
    fn later_sibling_is_on_top() {
        let (mut tree, root, panel, _) = build();
        let overlay = tree
            .create_child(root, Node::leaf().with_rect(Region::new(0, 0, 30, 30)))
            .unwrap();
        assert_eq!(tree.component_at(Offset::new(16, 16)), Some(overlay));
        tree.bring_to_front(panel).unwrap();
        assert_ne!(tree.component_at(Offset::new(16, 16)), Some(overlay));
    }

    #[test]
    fn disabled_nodes_are_not_hit() {
        let (mut tree, _, panel, button) = build();
        tree.set_enabled(button, false).unwrap();
        assert_eq!(tree.component_at(Offset::new(16, 16)), Some(panel));
        tree.set_enabled(button, true).unwrap();
        tree.set_enabled(panel, false).unwrap();
        assert_ne!(tree.component_at(Offset::new(16, 16)), Some(button));
    }

    #[test]
    fn transparent_node_passes_hits_to_children() {
        let (mut tree, root, panel, button) = build();
        tree.set_flags(panel, NodeFlags::HIT_TRANSPARENT, true).unwrap();
        assert_eq!(tree.component_at(Offset::new(40, 40)), Some(root));
        assert_eq!(tree.component_at(Offset::new(16, 16)), Some(button));
    }

    #[test]
    fn children_outside_parent_bounds_are_unreachable() {
        let (mut tree, _, panel, button) = build();
        tree.set_position(button, Offset::new(80, 80)).unwrap();
        assert_ne!(tree.component_at(Offset::new(95, 95)), Some(button));
        assert_eq!(tree.component_at_from(panel, Offset::new(12, 12)), Some(panel));
    }
}
