//! Widget trait: display, layout, hit-test and selection hooks.
//!
//! The core only ever talks to widgets through this trait. A node without a
//! widget is a plain rectangle: it takes part in layout and hit-testing but
//! draws nothing.

use std::any::Any;

use crate::component::{Node, NodeId, Tree};
use crate::error::Result;
use crate::geometry::{Offset, Region, Size};
use crate::render::DisplayContext;
use crate::style::ShapeFlags;

// ---------------------------------------------------------------------------
// Widget trait
// ---------------------------------------------------------------------------

/// Behavior attached to a node.
///
/// Widget is object-safe: nodes store it as `Box<dyn Widget>`. Methods that
/// require `Self: Sized` live on [`WidgetExt`].
pub trait Widget {
    /// Type name used in diagnostics and tree dumps (e.g. "Panel").
    fn widget_type(&self) -> &str;

    /// Draw the widget inside `area` (absolute coordinates). The node's
    /// local and recursive style properties are in effect.
    fn display(&self, ctx: &mut DisplayContext<'_>, area: Region, flags: ShapeFlags) {
        let _ = (ctx, area, flags);
    }

    /// Layout hook, run after the node's layouters. The widget is detached
    /// from its node while this runs, so it may freely mutate the tree.
    fn layout(&mut self, tree: &mut Tree, id: NodeId) -> Result<()> {
        let _ = (tree, id);
        Ok(())
    }

    /// Whether `point`, relative to the node's top-left corner, hits the
    /// widget. Override for non-rectangular hit areas.
    fn covers_point(&self, point: Offset, size: Size) -> bool {
        point.x >= 0 && point.y >= 0 && point.x < size.width && point.y < size.height
    }

    /// Asked before the node becomes selected. Returning `false` vetoes the
    /// selection and nothing changes.
    fn accept_selection(&self) -> bool {
        true
    }

    /// Called when the node's selected state flips.
    fn selection_changed(&mut self, selected: bool) {
        let _ = selected;
    }

    /// Downcast to `&dyn Any` for runtime type inspection.
    fn as_any(&self) -> &dyn Any;

    /// Downcast to `&mut dyn Any` for mutable runtime type inspection.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

// ---------------------------------------------------------------------------
// WidgetExt
// ---------------------------------------------------------------------------

/// Builder-style helpers to wrap a widget in a node.
///
/// Automatically implemented for all types that implement `Widget`.
pub trait WidgetExt: Widget {
    /// A leaf node carrying this widget.
    fn into_leaf(self) -> Node
    where
        Self: Sized + 'static,
    {
        Node::leaf().with_widget(self)
    }

    /// A container node carrying this widget.
    fn into_container(self) -> Node
    where
        Self: Sized + 'static,
    {
        Node::container().with_widget(self)
    }
}

impl<T: Widget> WidgetExt for T {}
