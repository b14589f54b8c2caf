//! Event routing: matching input against the tree and invoking listeners.
//!
//! Positional events go to the node under the pointer (or to the active node
//! while it captures input) and bubble toward the root. Key events go to the
//! deepest selected node and bubble the same way. Global listeners of a kind
//! always run first; any callback returning [`Flow::Consumed`] stops routing.

use tracing::{trace, warn};

use crate::component::NodeId;
use crate::geometry::Offset;
use crate::ui::{Press, Ui};

use super::events::{ButtonEvent, ClickEvent, KeyPressEvent, MotionEvent};
use super::input::{ButtonMask, InputEvent, KeyEvent, Modifiers, MouseButton};
use super::listener::{EventKind, Flow, ListenerKey};

/// Outcome of routing one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Routed {
    pub flow: Flow,
    /// Node whose listener consumed the event. `None` when a global
    /// listener consumed it or nothing did.
    pub consumer: Option<NodeId>,
}

impl Ui {
    /// Feed one input event through the dispatcher.
    pub fn handle_event(&mut self, event: InputEvent) -> Flow {
        trace!(?event, "input");
        match event {
            InputEvent::Button {
                button,
                pressed,
                position,
                modifiers,
            } => self.handle_button(button, pressed, position, modifiers),
            InputEvent::Motion {
                position,
                delta,
                buttons,
                modifiers,
            } => self.handle_motion(position, delta, buttons, modifiers),
            InputEvent::Key(key) => self.handle_key(key),
            InputEvent::Resize(size) => {
                self.set_viewport(size);
                Flow::Continue
            }
            InputEvent::Focus(true) => Flow::Continue,
            InputEvent::Focus(false) => {
                self.set_hovered(None);
                if let Some(press) = self.press.take() {
                    self.tree_mut().invalidate_node_region(press.node);
                }
                Flow::Continue
            }
        }
    }

    fn handle_button(
        &mut self,
        button: MouseButton,
        pressed: bool,
        position: Offset,
        modifiers: Modifiers,
    ) -> Flow {
        self.pointer = position;
        let hit = self.tree().component_at(position);
        let target = match self.active {
            Some(active) if !pressed && self.is_live(active) => Some(active),
            _ => hit,
        };

        if pressed && !button.is_wheel() && self.config().select_on_press {
            if let Some(selectable) = target.and_then(|t| self.selectable_ancestor(t)) {
                if let Err(err) = self.tree_mut().select(selectable) {
                    warn!(%err, "select on press");
                }
            }
        }

        let event = ButtonEvent {
            target,
            button,
            pressed,
            position,
            modifiers,
        };
        let routed = self.route(target, &event);

        if pressed {
            if button.is_wheel() {
                return routed.flow;
            }
            if let Some(consumer) = routed.consumer {
                if self.config().raise_on_press && self.is_live(consumer) {
                    if let Err(err) = self.tree_mut().bring_to_front(consumer) {
                        warn!(%err, "raise on press");
                    }
                }
            }
            if let Some(node) = routed.consumer.or(target) {
                if let Some(old) = self.press.replace(Press { node, button }) {
                    self.tree_mut().invalidate_node_region(old.node);
                }
                self.tree_mut().invalidate_node_region(node);
            }
            return routed.flow;
        }

        // Release: a matching press inside the same node becomes a click.
        let Some(press) = self.press.filter(|p| p.button == button) else {
            return routed.flow;
        };
        self.press = None;
        self.tree_mut().invalidate_node_region(press.node);
        let inside = hit.is_some_and(|h| h == press.node || self.tree().is_ancestor_of(press.node, h));
        if inside && self.is_live(press.node) {
            let click = ClickEvent {
                target: press.node,
                button,
                position,
            };
            trace!(node = ?press.node, ?button, "click");
            if self.route(Some(press.node), &click).flow.is_consumed() {
                return Flow::Consumed;
            }
        }
        routed.flow
    }

    fn handle_motion(
        &mut self,
        position: Offset,
        delta: Offset,
        buttons: ButtonMask,
        modifiers: Modifiers,
    ) -> Flow {
        let delta = if delta == Offset::ZERO {
            position - self.pointer
        } else {
            delta
        };
        self.pointer = position;

        let hit = self.tree().component_at(position);
        self.set_hovered(hit);

        let target = match self.active {
            Some(active) if self.is_live(active) => Some(active),
            _ => hit,
        };
        let event = MotionEvent {
            target,
            position,
            delta,
            buttons,
            modifiers,
        };
        self.route(target, &event).flow
    }

    fn handle_key(&mut self, key: KeyEvent) -> Flow {
        let target = self.tree().selected_leaf();
        let traversal = key.is_focus_traversal();
        let backwards = key.is_backwards();
        let event = KeyPressEvent { target, key };
        let routed = self.route(target, &event);
        if routed.flow.is_consumed() || !traversal {
            return routed.flow;
        }
        match self.tree_mut().focus_next(backwards) {
            Some(next) => {
                trace!(?next, backwards, "focus moved");
                Flow::Consumed
            }
            None => Flow::Continue,
        }
    }

    // ── Routing ──────────────────────────────────────────────────────

    /// Global listeners first, then bubble from `from` toward the root.
    pub(crate) fn route<E: EventKind>(&mut self, from: Option<NodeId>, event: &E) -> Routed {
        if self.dispatch_global(event).is_consumed() {
            return Routed {
                flow: Flow::Consumed,
                consumer: None,
            };
        }
        let consumer = from.and_then(|node| self.bubble(node, event));
        Routed {
            flow: consumer.is_some().into(),
            consumer,
        }
    }

    /// Offer `event` to `from` and then each ancestor. The chain is fixed
    /// before the first callback runs; nodes destroyed along the way are
    /// skipped. Returns the consuming node.
    pub(crate) fn bubble<E: EventKind>(&mut self, from: NodeId, event: &E) -> Option<NodeId> {
        let mut chain = vec![from];
        chain.extend(self.tree().ancestors(from));
        for node in chain {
            if !self.is_live(node) {
                continue;
            }
            if self.dispatch_node(node, event).is_consumed() {
                return Some(node);
            }
        }
        None
    }

    /// Run the listeners registered on `node`.
    pub(crate) fn dispatch_node<E: EventKind>(&mut self, node: NodeId, event: &E) -> Flow {
        self.dispatch_key(ListenerKey::Node(node), event)
    }

    /// Run the global listeners.
    pub(crate) fn dispatch_global<E: EventKind>(&mut self, event: &E) -> Flow {
        self.dispatch_key(ListenerKey::Global, event)
    }

    fn dispatch_key<E: EventKind>(&mut self, key: ListenerKey, event: &E) -> Flow {
        let callbacks = E::registry(&mut self.listeners).snapshot(key);
        for callback in callbacks {
            if callback(self, event).is_consumed() {
                return Flow::Consumed;
            }
        }
        Flow::Continue
    }

    // ── Helpers ──────────────────────────────────────────────────────

    fn is_live(&self, node: NodeId) -> bool {
        self.tree().get(node).is_some_and(|n| !n.is_destroyed())
    }

    fn selectable_ancestor(&self, node: NodeId) -> Option<NodeId> {
        let tree = self.tree();
        std::iter::once(node)
            .chain(tree.ancestors(node))
            .find(|&id| tree.get(id).is_some_and(|n| n.is_selectable()))
    }

    fn set_hovered(&mut self, hovered: Option<NodeId>) {
        if self.hovered == hovered {
            return;
        }
        let old = std::mem::replace(&mut self.hovered, hovered);
        for node in [old, hovered].into_iter().flatten() {
            self.tree_mut().invalidate_node_region(node);
        }
    }
}
