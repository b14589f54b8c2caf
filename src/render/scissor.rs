//! Nested clip rectangles.

use tracing::warn;

use crate::geometry::Region;

/// Stack of clip rectangles. Each push intersects with the current top, so the
/// top is always the effective clip.
#[derive(Debug, Clone, Default)]
pub struct ScissorStack {
    stack: Vec<Region>,
}

impl ScissorStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push `area`, clipped by the current scissor. Returns the effective clip.
    pub fn push(&mut self, area: Region) -> Region {
        let clip = match self.stack.last() {
            Some(top) => top.intersection(area),
            None => area,
        };
        self.stack.push(clip);
        clip
    }

    /// Pop the top clip and return the one now in effect.
    ///
    /// Popping an empty stack is logged and ignored.
    pub fn pop(&mut self) -> Option<Region> {
        if self.stack.pop().is_none() {
            warn!("scissor stack underflow");
        }
        self.current()
    }

    /// The clip in effect, or `None` when nothing is clipped.
    pub fn current(&self) -> Option<Region> {
        self.stack.last().copied()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn clear(&mut self) {
        self.stack.clear();
    }
}
