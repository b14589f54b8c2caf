//! Generic widgets that draw purely from the style cascade.

use std::any::Any;

use super::traits::Widget;
use crate::geometry::{Offset, Region};
use crate::render::DisplayContext;
use crate::style::{ids, PropertyId, ShapeFlags};

/// Draws the shape bound to one shape property over the whole node.
#[derive(Debug, Clone)]
pub struct ShapePanel {
    shape: PropertyId,
    selectable: bool,
}

impl ShapePanel {
    pub fn new(shape: PropertyId) -> Self {
        Self {
            shape,
            selectable: true,
        }
    }

    /// Refuse selection when `false`, even if the node is flagged selectable.
    pub fn accepts_selection(mut self, selectable: bool) -> Self {
        self.selectable = selectable;
        self
    }

    pub fn shape(&self) -> PropertyId {
        self.shape
    }
}

impl Widget for ShapePanel {
    fn widget_type(&self) -> &str {
        "Panel"
    }

    fn display(&self, ctx: &mut DisplayContext<'_>, area: Region, flags: ShapeFlags) {
        ctx.display_shape(self.shape, area, flags);
    }

    fn accept_selection(&self) -> bool {
        self.selectable
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A single line of text.
///
/// The text color follows the node's state: [`ids::ACTIVE_TEXT`] while
/// pressed or active, [`ids::SELECTED_TEXT`] when selected,
/// [`ids::HOVERED_TEXT`] under the pointer, [`ids::TEXT`] otherwise.
#[derive(Debug, Clone, Default)]
pub struct Label {
    text: String,
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    fn color_id(flags: ShapeFlags) -> PropertyId {
        if flags.intersects(ShapeFlags::PRESSED | ShapeFlags::ACTIVE) {
            ids::ACTIVE_TEXT
        } else if flags.contains(ShapeFlags::SELECTED) {
            ids::SELECTED_TEXT
        } else if flags.contains(ShapeFlags::HOVERED) {
            ids::HOVERED_TEXT
        } else {
            ids::TEXT
        }
    }
}

impl Widget for Label {
    fn widget_type(&self) -> &str {
        "Label"
    }

    fn display(&self, ctx: &mut DisplayContext<'_>, area: Region, flags: ShapeFlags) {
        let font = ctx.active_font(ids::DEFAULT_FONT);
        let color = ctx.active_color(Self::color_id(flags));
        let size = ctx.measure_text(font, &self.text);
        let at = Offset::new(area.x, area.y + (area.height - size.height).max(0) / 2);
        ctx.draw_text(font, &self.text, at, color);
    }

    fn accept_selection(&self) -> bool {
        false
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
