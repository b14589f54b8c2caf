//! The display traversal and the context widgets draw through.

use tracing::{debug, trace};

use super::backend::{rect_vertices, RenderBackend};
use super::scissor::ScissorStack;
use crate::component::{NodeFlags, NodeId, Tree};
use crate::geometry::{Offset, Region, Size};
use crate::style::{
    Color, FontHandle, PropertyId, PropertyStacks, Shape, ShapeFlags, StyleGuard, StyleHost,
};

// ---------------------------------------------------------------------------
// DisplayContext
// ---------------------------------------------------------------------------

/// Everything a widget needs while it draws: the backend, the style cascade
/// and the scissor stack.
pub struct DisplayContext<'a> {
    backend: &'a mut dyn RenderBackend,
    stacks: &'a mut PropertyStacks,
    scissors: ScissorStack,
    hovered: Option<NodeId>,
    pressed: Option<NodeId>,
    drawn: usize,
}

impl<'a> DisplayContext<'a> {
    pub fn new(backend: &'a mut dyn RenderBackend, stacks: &'a mut PropertyStacks) -> Self {
        Self {
            backend,
            stacks,
            scissors: ScissorStack::new(),
            hovered: None,
            pressed: None,
            drawn: 0,
        }
    }

    /// Nodes drawn with the hovered or pressed look.
    pub fn with_pointer_state(mut self, hovered: Option<NodeId>, pressed: Option<NodeId>) -> Self {
        self.hovered = hovered;
        self.pressed = pressed;
        self
    }

    pub fn backend(&mut self) -> &mut dyn RenderBackend {
        &mut *self.backend
    }

    pub fn stacks(&self) -> &PropertyStacks {
        self.stacks
    }

    // ── Scissor ──────────────────────────────────────────────────────

    /// Clip further drawing to `area`, intersected with the current clip.
    pub fn push_scissor(&mut self, area: Region) {
        let clip = self.scissors.push(area);
        self.backend.set_scissor(Some(clip));
    }

    pub fn pop_scissor(&mut self) {
        let clip = self.scissors.pop();
        self.backend.set_scissor(clip);
    }

    pub fn scissor(&self) -> Option<Region> {
        self.scissors.current()
    }

    pub fn scissor_depth(&self) -> usize {
        self.scissors.depth()
    }

    // ── Style lookups ────────────────────────────────────────────────

    pub fn active_color(&self, id: PropertyId) -> Color {
        self.stacks.color(id)
    }

    pub fn active_font(&self, id: PropertyId) -> FontHandle {
        self.stacks.font(id)
    }

    /// Current value of a scalar property.
    pub fn global_value(&self, id: PropertyId) -> f32 {
        self.stacks.scalar(id)
    }

    pub fn active_shape(&self, id: PropertyId) -> std::rc::Rc<dyn Shape> {
        self.stacks.shape(id)
    }

    /// Draw the shape currently bound to `id` inside `rect`.
    pub fn display_shape(&mut self, id: PropertyId, rect: Region, flags: ShapeFlags) {
        let shape = self.stacks.shape(id);
        shape.display(self, rect, flags);
    }

    /// Draw the shape currently bound to `id` along `points`.
    pub fn display_line_shape(&mut self, id: PropertyId, points: &[Offset], flags: ShapeFlags) {
        let shape = self.stacks.shape(id);
        shape.display_line(self, points, flags);
    }

    // ── Primitives ───────────────────────────────────────────────────

    /// Fill `rect` with `color`. Transparent colors and empty rects draw nothing.
    pub fn fill_rect(&mut self, rect: Region, color: Color) {
        if rect.is_empty() || color.is_transparent() {
            return;
        }
        self.backend.draw_triangles(&rect_vertices(rect, color), None);
    }

    pub fn draw_lines(&mut self, points: &[Offset], color: Color, width: f32) {
        if points.len() < 2 || color.is_transparent() {
            return;
        }
        self.backend.draw_lines(points, color, width);
    }

    pub fn measure_text(&self, font: FontHandle, text: &str) -> Size {
        self.backend.measure_text(font, text)
    }

    pub fn draw_text(&mut self, font: FontHandle, text: &str, at: Offset, color: Color) {
        if text.is_empty() || font.is_none() || color.is_transparent() {
            return;
        }
        self.backend.draw_text(font, text, at, color);
    }

    /// Number of widgets drawn so far.
    pub fn drawn(&self) -> usize {
        self.drawn
    }
}

impl StyleHost for DisplayContext<'_> {
    fn stacks_mut(&mut self) -> &mut PropertyStacks {
        self.stacks
    }
}

// ---------------------------------------------------------------------------
// Traversal
// ---------------------------------------------------------------------------

/// Draw the subtree at `root`.
///
/// With `clip` set (lazy rendering), drawing is scissored to it and nodes
/// whose area misses it are skipped. Returns the number of widgets drawn.
pub fn display_tree(
    tree: &Tree,
    root: NodeId,
    ctx: &mut DisplayContext<'_>,
    clip: Option<Region>,
) -> usize {
    let before = ctx.drawn;
    if let Some(clip) = clip {
        ctx.push_scissor(clip);
    }
    display_node(tree, root, ctx, clip);
    if clip.is_some() {
        ctx.pop_scissor();
    }
    let drawn = ctx.drawn - before;
    debug!(drawn, ?clip, "display pass");
    drawn
}

fn display_node(tree: &Tree, id: NodeId, ctx: &mut DisplayContext<'_>, clip: Option<Region>) {
    let Some(node) = tree.get(id) else {
        return;
    };
    if !node.is_enabled() {
        return;
    }
    let Some(area) = tree.absolute_rect(id) else {
        return;
    };
    let clips_children = node.flags().contains(NodeFlags::USES_SCISSOR);
    let visible = clip.is_none_or(|c| area.overlaps(c));
    if !visible && (!node.is_container() || clips_children) {
        return;
    }

    let mut subtree = StyleGuard::new(ctx);
    subtree.push_all(node.recursive_properties());

    if visible {
        if let Some(widget) = node.widget() {
            let mut own = StyleGuard::new(&mut *subtree);
            own.push_all(node.local_properties());
            let flags = shape_flags(&own, node.flags(), id);
            trace!(?id, widget = widget.widget_type(), ?area, "display");
            widget.display(&mut own, area, flags);
            own.drawn += 1;
        }
    }

    if node.is_container() {
        if clips_children {
            subtree.push_scissor(area);
        }
        for child in tree.child_iter(id) {
            display_node(tree, child, &mut subtree, clip);
        }
        if clips_children {
            subtree.pop_scissor();
        }
    }
}

fn shape_flags(ctx: &DisplayContext<'_>, flags: NodeFlags, id: NodeId) -> ShapeFlags {
    let mut out = ShapeFlags::empty();
    out.set(ShapeFlags::SELECTED, flags.contains(NodeFlags::SELECTED));
    out.set(ShapeFlags::ACTIVE, flags.contains(NodeFlags::ACTIVE));
    out.set(ShapeFlags::HOVERED, ctx.hovered == Some(id));
    out.set(ShapeFlags::PRESSED, ctx.pressed == Some(id));
    out
}
