//! Event payloads handed to listeners.

use crate::component::NodeId;
use crate::geometry::Offset;

use super::input::{ButtonMask, KeyEvent, Modifiers, MouseButton};

/// A mouse button press or release (wheel steps included).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonEvent {
    /// Node under the pointer, or the active node while it captures input.
    pub target: Option<NodeId>,
    pub button: MouseButton,
    pub pressed: bool,
    /// Absolute pointer position.
    pub position: Offset,
    pub modifiers: Modifiers,
}

/// Pointer movement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotionEvent {
    pub target: Option<NodeId>,
    pub position: Offset,
    /// Movement since the previous pointer event.
    pub delta: Offset,
    pub buttons: ButtonMask,
    pub modifiers: Modifiers,
}

/// Press and release of the same button on the same node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub target: NodeId,
    pub button: MouseButton,
    pub position: Offset,
}

/// A key event, routed to the selected chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPressEvent {
    /// Deepest selected node, if anything is selected.
    pub target: Option<NodeId>,
    pub key: KeyEvent,
}

/// A widget reported that the data it presents changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataChangedEvent {
    pub node: NodeId,
}

/// A node is about to be freed. Fired during the destruction flush at the
/// start of a frame, while the node can still be inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DestroyedEvent {
    pub node: NodeId,
}

/// Once per frame, after animations advanced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickEvent {
    /// Frame time in seconds.
    pub now: f64,
    pub frame: u64,
}

/// A named command raised by a widget, bubbling toward the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionEvent {
    pub source: NodeId,
    pub name: String,
}
