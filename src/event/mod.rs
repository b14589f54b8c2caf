//! Event system: input types, listener registries, hit-testing, selection
//! and routing.

pub mod dispatch;
pub mod events;
pub mod focus;
pub mod hit;
pub mod input;
pub mod listener;

pub use events::{
    ActionEvent, ButtonEvent, ClickEvent, DataChangedEvent, DestroyedEvent, KeyPressEvent,
    MotionEvent, TickEvent,
};
pub use input::{ButtonMask, InputEvent, Key, KeyEvent, Modifiers, MouseButton};
pub use listener::{
    Callback, EventKind, Flow, ListenerHandle, ListenerKey, ListenerRegistry, Listeners,
};
