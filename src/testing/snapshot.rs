//! Plain-text dumps of the component tree for snapshot assertions.

use std::fmt::Write;

use crate::component::{NodeFlags, NodeId, Tree};

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Render the subtree at `root` as an indented outline, one node per line.
///
/// Each line reads `label x,y wxh` followed by state markers in brackets.
/// The label is the node's name, else its widget type, else `container` or
/// `leaf`. Children are indented two spaces below their parent.
///
/// ```
/// use arbor_ui::component::{Node, Tree};
/// use arbor_ui::geometry::Region;
/// use arbor_ui::testing::tree_to_string;
///
/// let mut tree = Tree::default();
/// let root = tree.insert(Node::container().named("root").with_rect(Region::new(0, 0, 8, 4)));
/// tree.create_child(root, Node::leaf().with_rect(Region::new(1, 1, 2, 2))).unwrap();
/// assert_eq!(tree_to_string(&tree, root), "root 0,0 8x4\n  leaf 1,1 2x2");
/// ```
pub fn tree_to_string(tree: &Tree, root: NodeId) -> String {
    let mut out = String::new();
    write_node(tree, root, 0, &mut out);
    out.truncate(out.trim_end().len());
    out
}

fn write_node(tree: &Tree, id: NodeId, depth: usize, out: &mut String) {
    let Some(node) = tree.get(id) else {
        return;
    };
    let label = node
        .name()
        .or_else(|| node.widget().map(|w| w.widget_type()))
        .unwrap_or(if node.is_container() { "container" } else { "leaf" });
    let rect = node.rect();
    let _ = write!(
        out,
        "{:indent$}{label} {},{} {}x{}",
        "",
        rect.x,
        rect.y,
        rect.width,
        rect.height,
        indent = depth * 2
    );

    let markers = state_markers(node.flags());
    if !markers.is_empty() {
        let _ = write!(out, " [{}]", markers.join(" "));
    }
    out.push('\n');

    for child in tree.child_iter(id) {
        write_node(tree, child, depth + 1, out);
    }
}

fn state_markers(flags: NodeFlags) -> Vec<&'static str> {
    let mut markers = Vec::new();
    if !flags.contains(NodeFlags::ENABLED) {
        markers.push("disabled");
    }
    if flags.contains(NodeFlags::SELECTED) {
        markers.push("selected");
    }
    if flags.contains(NodeFlags::ACTIVE) {
        markers.push("active");
    }
    if flags.contains(NodeFlags::DESTROYED) {
        markers.push("destroyed");
    }
    if flags.contains(NodeFlags::ALWAYS_ON_TOP) {
        markers.push("on-top");
    }
    markers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Node;
    use crate::geometry::Region;
    use crate::widget::{Label, WidgetExt};

    #[test]
    fn labels_and_markers() {
        let mut tree = Tree::default();
        let root = tree.insert(Node::container().with_rect(Region::new(0, 0, 20, 10)));
        tree.create_child(root, Label::new("hi").into_leaf().with_rect(Region::new(1, 2, 3, 1)))
            .unwrap();
        tree.create_child(root, Node::leaf().named("off").enabled(false))
            .unwrap();
        tree.create_child(root, Node::leaf().named("top").always_on_top(true))
            .unwrap();

        insta::assert_snapshot!(tree_to_string(&tree, root), @r"
        container 0,0 20x10
          Label 1,2 3x1
          off 0,0 0x0 [disabled]
          top 0,0 0x0 [on-top]
        ");
    }

    #[test]
    fn missing_root_is_empty() {
        let mut tree = Tree::default();
        let gone = tree.insert(Node::leaf());
        tree.free_subtree(gone);
        assert_eq!(tree_to_string(&tree, gone), "");
    }
}
