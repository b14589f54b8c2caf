//! The drawing contract consumed from a rendering backend.
//!
//! The core never rasterizes anything itself. It hands triangle and line
//! batches, text runs and scissor changes to a [`RenderBackend`].

use crate::geometry::{Offset, Region, Size};
use crate::style::{Color, FontHandle};

/// Opaque texture handle owned by the backend.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// One vertex of a triangle batch, in absolute coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Vertex {
    pub position: Offset,
    pub color: Color,
    /// Texture coordinates, only meaningful for textured batches.
    pub uv: (f32, f32),
}

impl Vertex {
    pub const fn new(position: Offset, color: Color) -> Self {
        Self {
            position,
            color,
            uv: (0.0, 0.0),
        }
    }
}

/// A drawing backend.
///
/// Calls arrive between [`begin_frame`](Self::begin_frame) and
/// [`end_frame`](Self::end_frame). `set_scissor(None)` removes clipping.
pub trait RenderBackend {
    fn begin_frame(&mut self, viewport: Size);

    fn end_frame(&mut self);

    fn set_scissor(&mut self, clip: Option<Region>);

    /// Draw a list of triangles, three vertices each.
    fn draw_triangles(&mut self, vertices: &[Vertex], texture: Option<TextureId>);

    /// Draw a connected polyline.
    fn draw_lines(&mut self, points: &[Offset], color: Color, width: f32);

    fn measure_text(&self, font: FontHandle, text: &str) -> Size;

    fn draw_text(&mut self, font: FontHandle, text: &str, at: Offset, color: Color);
}

/// Two triangles covering `rect`.
pub fn rect_vertices(rect: Region, color: Color) -> [Vertex; 6] {
    let tl = Offset::new(rect.x, rect.y);
    let tr = Offset::new(rect.right(), rect.y);
    let bl = Offset::new(rect.x, rect.bottom());
    let br = Offset::new(rect.right(), rect.bottom());
    [
        Vertex::new(tl, color),
        Vertex::new(tr, color),
        Vertex::new(bl, color),
        Vertex::new(tr, color),
        Vertex::new(br, color),
        Vertex::new(bl, color),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_vertices_span_corners() {
        let vs = rect_vertices(Region::new(1, 2, 3, 4), Color::RED);
        assert_eq!(vs[0].position, Offset::new(1, 2));
        assert_eq!(vs[4].position, Offset::new(4, 6));
        assert!(vs.iter().all(|v| v.color == Color::RED));
    }
}
