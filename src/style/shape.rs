//! Shapes: style values that know how to draw themselves.

use bitflags::bitflags;

use super::value::PropertyId;
use crate::geometry::{Offset, Region};
use crate::render::DisplayContext;

bitflags! {
    /// Visual state a shape is drawn in.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ShapeFlags: u32 {
        const HOVERED = 1 << 0;
        const PRESSED = 1 << 1;
        const SELECTED = 1 << 2;
        const ACTIVE = 1 << 3;
        const DISABLED = 1 << 4;
    }
}

/// A drawable style value. Shapes read colors and scalars from the cascade
/// at draw time, so one shape instance serves every widget using it.
pub trait Shape {
    fn name(&self) -> &'static str;

    /// Draw inside `rect`, given in absolute coordinates.
    fn display(&self, ctx: &mut DisplayContext<'_>, rect: Region, flags: ShapeFlags);

    /// Draw along `points`. Shapes without a line form draw nothing.
    fn display_line(&self, ctx: &mut DisplayContext<'_>, points: &[Offset], flags: ShapeFlags) {
        let _ = (ctx, points, flags);
    }
}

/// Draws nothing. Resolved for unregistered shape ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullShape;

impl Shape for NullShape {
    fn name(&self) -> &'static str {
        "null"
    }

    fn display(&self, _ctx: &mut DisplayContext<'_>, _rect: Region, _flags: ShapeFlags) {}
}

/// Solid rectangle. The color is looked up per state: `active` when the
/// shape is pressed or active, `selected` when selected, otherwise `normal`.
#[derive(Debug, Clone, Copy)]
pub struct FilledRect {
    pub normal: PropertyId,
    pub selected: PropertyId,
    pub active: PropertyId,
}

impl FilledRect {
    /// A rectangle with one color for every state.
    pub const fn plain(color: PropertyId) -> Self {
        Self {
            normal: color,
            selected: color,
            active: color,
        }
    }

    fn color_id(&self, flags: ShapeFlags) -> PropertyId {
        if flags.intersects(ShapeFlags::PRESSED | ShapeFlags::ACTIVE) {
            self.active
        } else if flags.contains(ShapeFlags::SELECTED) {
            self.selected
        } else {
            self.normal
        }
    }
}

impl Shape for FilledRect {
    fn name(&self) -> &'static str {
        "filled-rect"
    }

    fn display(&self, ctx: &mut DisplayContext<'_>, rect: Region, flags: ShapeFlags) {
        let color = ctx.active_color(self.color_id(flags));
        ctx.fill_rect(rect, color);
    }

    fn display_line(&self, ctx: &mut DisplayContext<'_>, points: &[Offset], flags: ShapeFlags) {
        let color = ctx.active_color(self.color_id(flags));
        ctx.draw_lines(points, color, 1.0);
    }
}

/// Rectangular outline. `width` names a scalar property holding the line
/// width; widths below one are drawn as one.
#[derive(Debug, Clone, Copy)]
pub struct Frame {
    pub color: PropertyId,
    pub width: PropertyId,
}

impl Shape for Frame {
    fn name(&self) -> &'static str {
        "frame"
    }

    fn display(&self, ctx: &mut DisplayContext<'_>, rect: Region, _flags: ShapeFlags) {
        if rect.is_empty() {
            return;
        }
        let color = ctx.active_color(self.color);
        let width = ctx.global_value(self.width).max(1.0);
        let corners = [
            Offset::new(rect.x, rect.y),
            Offset::new(rect.right(), rect.y),
            Offset::new(rect.right(), rect.bottom()),
            Offset::new(rect.x, rect.bottom()),
            Offset::new(rect.x, rect.y),
        ];
        ctx.draw_lines(&corners, color, width);
    }

    fn display_line(&self, ctx: &mut DisplayContext<'_>, points: &[Offset], _flags: ShapeFlags) {
        let color = ctx.active_color(self.color);
        let width = ctx.global_value(self.width).max(1.0);
        ctx.draw_lines(points, color, width);
    }
}
