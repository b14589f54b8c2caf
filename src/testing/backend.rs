//! A render backend that records every call instead of drawing.

use crate::geometry::{Offset, Region, Size};
use crate::render::{RenderBackend, TextureId, Vertex};
use crate::style::{Color, FontHandle};

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    BeginFrame(Size),
    EndFrame,
    Scissor(Option<Region>),
    /// A triangle batch. `color` is the first vertex's color.
    Triangles {
        count: usize,
        color: Color,
        texture: Option<TextureId>,
    },
    Lines {
        points: Vec<Offset>,
        color: Color,
        width: f32,
    },
    Text {
        font: FontHandle,
        text: String,
        at: Offset,
        color: Color,
    },
}

/// Records calls in order. Text measures one unit per character and one
/// unit high.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    calls: Vec<DrawCall>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    /// Number of completed frames recorded.
    pub fn frames(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::EndFrame))
            .count()
    }

    /// Every text run drawn, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl RenderBackend for RecordingBackend {
    fn begin_frame(&mut self, viewport: Size) {
        self.calls.push(DrawCall::BeginFrame(viewport));
    }

    fn end_frame(&mut self) {
        self.calls.push(DrawCall::EndFrame);
    }

    fn set_scissor(&mut self, clip: Option<Region>) {
        self.calls.push(DrawCall::Scissor(clip));
    }

    fn draw_triangles(&mut self, vertices: &[Vertex], texture: Option<TextureId>) {
        self.calls.push(DrawCall::Triangles {
            count: vertices.len() / 3,
            color: vertices.first().map_or(Color::TRANSPARENT, |v| v.color),
            texture,
        });
    }

    fn draw_lines(&mut self, points: &[Offset], color: Color, width: f32) {
        self.calls.push(DrawCall::Lines {
            points: points.to_vec(),
            color,
            width,
        });
    }

    fn measure_text(&self, _font: FontHandle, text: &str) -> Size {
        Size::new(text.chars().count() as i32, 1)
    }

    fn draw_text(&mut self, font: FontHandle, text: &str, at: Offset, color: Color) {
        self.calls.push(DrawCall::Text {
            font,
            text: text.to_owned(),
            at,
            color,
        });
    }
}
