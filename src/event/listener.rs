//! Listener registries.
//!
//! One registry per event kind. Callbacks are keyed by node or by the global
//! key and identified by an opaque [`ListenerHandle`] used for removal.
//! Dispatch always runs over a snapshot of the matching callbacks, so a
//! callback may add or remove listeners (including itself) while it runs.

use std::rc::Rc;

use crate::component::NodeId;
use crate::ui::Ui;

use super::events::{
    ActionEvent, ButtonEvent, ClickEvent, DataChangedEvent, DestroyedEvent, KeyPressEvent,
    MotionEvent, TickEvent,
};

/// What a callback did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flow {
    /// Stop routing: no further listeners see the event.
    Consumed,
    #[default]
    Continue,
}

impl Flow {
    pub fn is_consumed(self) -> bool {
        self == Flow::Consumed
    }
}

impl From<bool> for Flow {
    /// `true` means consumed.
    fn from(consumed: bool) -> Self {
        if consumed {
            Flow::Consumed
        } else {
            Flow::Continue
        }
    }
}

/// Opaque handle returned on registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerHandle(u64);

/// Where a listener is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKey {
    /// Sees every event of its kind, before node listeners.
    Global,
    Node(NodeId),
}

impl From<NodeId> for ListenerKey {
    fn from(id: NodeId) -> Self {
        ListenerKey::Node(id)
    }
}

/// A registered callback.
pub type Callback<E> = Rc<dyn Fn(&mut Ui, &E) -> Flow>;

struct Entry<E> {
    handle: ListenerHandle,
    key: ListenerKey,
    callback: Callback<E>,
}

// ---------------------------------------------------------------------------
// ListenerRegistry
// ---------------------------------------------------------------------------

/// Callbacks for one event kind, in registration order.
pub struct ListenerRegistry<E> {
    entries: Vec<Entry<E>>,
}

impl<E> Default for ListenerRegistry<E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<E> ListenerRegistry<E> {
    fn insert(&mut self, handle: ListenerHandle, key: ListenerKey, callback: Callback<E>) {
        self.entries.push(Entry {
            handle,
            key,
            callback,
        });
    }

    /// Remove one registration. Returns `false` for unknown handles.
    pub fn remove(&mut self, handle: ListenerHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.handle != handle);
        self.entries.len() != before
    }

    /// Drop every registration keyed by `node`.
    pub fn remove_node(&mut self, node: NodeId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.key != ListenerKey::Node(node));
        before - self.entries.len()
    }

    /// Copy of the callbacks registered under `key`.
    pub fn snapshot(&self, key: ListenerKey) -> Vec<Callback<E>> {
        self.entries
            .iter()
            .filter(|e| e.key == key)
            .map(|e| Rc::clone(&e.callback))
            .collect()
    }

    /// Copy of every callback, whatever its key.
    pub fn snapshot_all(&self) -> Vec<Callback<E>> {
        self.entries.iter().map(|e| Rc::clone(&e.callback)).collect()
    }

    pub fn contains(&self, handle: ListenerHandle) -> bool {
        self.entries.iter().any(|e| e.handle == handle)
    }

    pub fn count(&self, key: ListenerKey) -> usize {
        self.entries.iter().filter(|e| e.key == key).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Listeners
// ---------------------------------------------------------------------------

/// Every registry, plus the handle counter shared between them.
#[derive(Default)]
pub struct Listeners {
    pub button: ListenerRegistry<ButtonEvent>,
    pub motion: ListenerRegistry<MotionEvent>,
    pub click: ListenerRegistry<ClickEvent>,
    pub key: ListenerRegistry<KeyPressEvent>,
    pub data_changed: ListenerRegistry<DataChangedEvent>,
    pub destroyed: ListenerRegistry<DestroyedEvent>,
    pub tick: ListenerRegistry<TickEvent>,
    pub action: ListenerRegistry<ActionEvent>,
    next_handle: u64,
}

impl Listeners {
    /// Register `callback` for events of kind `E`.
    pub fn add<E: EventKind>(
        &mut self,
        key: ListenerKey,
        callback: impl Fn(&mut Ui, &E) -> Flow + 'static,
    ) -> ListenerHandle {
        self.next_handle += 1;
        let handle = ListenerHandle(self.next_handle);
        E::registry(self).insert(handle, key, Rc::new(callback));
        handle
    }

    /// Remove `handle` from whichever registry holds it.
    pub fn remove(&mut self, handle: ListenerHandle) -> bool {
        self.button.remove(handle)
            || self.motion.remove(handle)
            || self.click.remove(handle)
            || self.key.remove(handle)
            || self.data_changed.remove(handle)
            || self.destroyed.remove(handle)
            || self.tick.remove(handle)
            || self.action.remove(handle)
    }

    /// Drop every registration keyed by `node`, in every registry.
    pub fn remove_node(&mut self, node: NodeId) -> usize {
        self.button.remove_node(node)
            + self.motion.remove_node(node)
            + self.click.remove_node(node)
            + self.key.remove_node(node)
            + self.data_changed.remove_node(node)
            + self.destroyed.remove_node(node)
            + self.tick.remove_node(node)
            + self.action.remove_node(node)
    }

    pub fn len(&self) -> usize {
        self.button.len()
            + self.motion.len()
            + self.click.len()
            + self.key.len()
            + self.data_changed.len()
            + self.destroyed.len()
            + self.tick.len()
            + self.action.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Maps an event payload type to its registry.
pub trait EventKind: Sized + 'static {
    fn registry(listeners: &mut Listeners) -> &mut ListenerRegistry<Self>;
}

impl EventKind for ButtonEvent {
    fn registry(listeners: &mut Listeners) -> &mut ListenerRegistry<Self> {
        &mut listeners.button
    }
}

impl EventKind for MotionEvent {
    fn registry(listeners: &mut Listeners) -> &mut ListenerRegistry<Self> {
        &mut listeners.motion
    }
}

impl EventKind for ClickEvent {
    fn registry(listeners: &mut Listeners) -> &mut ListenerRegistry<Self> {
        &mut listeners.click
    }
}

impl EventKind for KeyPressEvent {
    fn registry(listeners: &mut Listeners) -> &mut ListenerRegistry<Self> {
        &mut listeners.key
    }
}

impl EventKind for DataChangedEvent {
    fn registry(listeners: &mut Listeners) -> &mut ListenerRegistry<Self> {
        &mut listeners.data_changed
    }
}

impl EventKind for DestroyedEvent {
    fn registry(listeners: &mut Listeners) -> &mut ListenerRegistry<Self> {
        &mut listeners.destroyed
    }
}

impl EventKind for TickEvent {
    fn registry(listeners: &mut Listeners) -> &mut ListenerRegistry<Self> {
        &mut listeners.tick
    }
}

impl EventKind for ActionEvent {
    fn registry(listeners: &mut Listeners) -> &mut ListenerRegistry<Self> {
        &mut listeners.action
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick() -> TickEvent {
        TickEvent { now: 0.0, frame: 0 }
    }

    #[test]
    fn handles_are_unique_across_kinds() {
        let mut listeners = Listeners::default();
        let a = listeners.add::<TickEvent>(ListenerKey::Global, |_, _| Flow::Continue);
        let b = listeners.add::<KeyPressEvent>(ListenerKey::Global, |_, _| Flow::Continue);
        assert_ne!(a, b);
        assert_eq!(listeners.len(), 2);
        assert!(listeners.remove(b));
        assert!(!listeners.remove(b));
        assert!(listeners.tick.contains(a));
    }

    #[test]
    fn snapshot_filters_by_key_in_registration_order() {
        let mut registry = ListenerRegistry::<TickEvent>::default();
        let mut ui = Ui::new(crate::geometry::Size::new(10, 10));
        let node = ui.root();
        registry.insert(ListenerHandle(1), ListenerKey::Global, Rc::new(|_: &mut Ui, _: &TickEvent| Flow::Continue));
        registry.insert(ListenerHandle(2), ListenerKey::Node(node), Rc::new(|_: &mut Ui, _: &TickEvent| Flow::Consumed));
        registry.insert(ListenerHandle(3), ListenerKey::Global, Rc::new(|_: &mut Ui, _: &TickEvent| Flow::Consumed));

        let globals = registry.snapshot(ListenerKey::Global);
        assert_eq!(globals.len(), 2);
        assert_eq!(globals[0](&mut ui, &tick()), Flow::Continue);
        assert_eq!(globals[1](&mut ui, &tick()), Flow::Consumed);
        assert_eq!(registry.count(ListenerKey::Node(node)), 1);
        assert_eq!(registry.snapshot_all().len(), 3);

        assert_eq!(registry.remove_node(node), 1);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn flow_from_bool() {
        assert!(Flow::from(true).is_consumed());
        assert_eq!(Flow::from(false), Flow::Continue);
    }
}
