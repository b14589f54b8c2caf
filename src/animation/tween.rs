//! Built-in animations: linear position and size tweens.

use tracing::warn;

use super::scheduler::AnimationHook;
use crate::component::{NodeId, Tree};
use crate::geometry::{Offset, Size};

/// Slide a node from one parent-relative position to another.
#[derive(Debug, Clone, Copy)]
pub struct MoveAnimation {
    pub from: Offset,
    pub to: Offset,
}

impl AnimationHook for MoveAnimation {
    fn update(&mut self, tree: &mut Tree, node: NodeId, progress: f64) -> bool {
        match tree.set_position(node, self.from.blend(self.to, progress)) {
            Ok(()) => true,
            Err(err) => {
                warn!(?node, %err, "move animation");
                false
            }
        }
    }
}

/// Grow or shrink a node between two sizes.
#[derive(Debug, Clone, Copy)]
pub struct ResizeAnimation {
    pub from: Size,
    pub to: Size,
}

impl AnimationHook for ResizeAnimation {
    fn update(&mut self, tree: &mut Tree, node: NodeId, progress: f64) -> bool {
        match tree.set_size(node, self.from.blend(self.to, progress)) {
            Ok(()) => true,
            Err(err) => {
                warn!(?node, %err, "resize animation");
                false
            }
        }
    }
}
