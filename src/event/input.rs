//! Input event types fed into the dispatcher.
//!
//! Defines [`InputEvent`] and supporting types. Crossterm events are
//! converted via `From` impls so a terminal frontend can feed the dispatcher
//! directly; nothing else in the crate depends on crossterm.

use bitflags::bitflags;

use crate::geometry::{Offset, Size};

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// Keyboard key, decoupled from crossterm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Tab,
    BackTab,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
    /// Keys without a dedicated variant, and pasted text.
    Unknown,
}

bitflags! {
    /// Modifier key bitmask.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const CTRL = 1 << 1;
        const ALT = 1 << 2;
    }
}

// ---------------------------------------------------------------------------
// KeyEvent
// ---------------------------------------------------------------------------

/// A key press or release, with the text it produced.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: Key,
    pub modifiers: Modifiers,
    pub pressed: bool,
    /// Decoded text, empty for keys that do not produce any.
    pub text: String,
}

impl KeyEvent {
    /// A key press. Characters typed without Ctrl or Alt carry their text.
    pub fn press(code: Key, modifiers: Modifiers) -> Self {
        let text = match code {
            Key::Char(c) if !modifiers.intersects(Modifiers::CTRL | Modifiers::ALT) => c.to_string(),
            _ => String::new(),
        };
        Self {
            code,
            modifiers,
            pressed: true,
            text,
        }
    }

    pub fn release(code: Key, modifiers: Modifiers) -> Self {
        Self {
            pressed: false,
            text: String::new(),
            ..Self::press(code, modifiers)
        }
    }

    /// Text input with no particular key, e.g. a paste.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            code: Key::Unknown,
            modifiers: Modifiers::empty(),
            pressed: true,
            text: text.into(),
        }
    }

    /// Whether this is a press of Tab or Shift+Tab.
    pub fn is_focus_traversal(&self) -> bool {
        self.pressed && matches!(self.code, Key::Tab | Key::BackTab)
    }

    /// Direction of a focus traversal key: `true` for backwards.
    pub fn is_backwards(&self) -> bool {
        self.code == Key::BackTab || self.modifiers.contains(Modifiers::SHIFT)
    }
}

// ---------------------------------------------------------------------------
// Mouse
// ---------------------------------------------------------------------------

/// Mouse button. Wheel steps are reported as presses of the wheel buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    WheelUp,
    WheelDown,
    WheelLeft,
    WheelRight,
}

impl MouseButton {
    pub fn is_wheel(self) -> bool {
        matches!(
            self,
            Self::WheelUp | Self::WheelDown | Self::WheelLeft | Self::WheelRight
        )
    }

    /// Bit in a [`ButtonMask`]; wheel buttons have none.
    pub fn mask(self) -> ButtonMask {
        match self {
            Self::Left => ButtonMask::LEFT,
            Self::Right => ButtonMask::RIGHT,
            Self::Middle => ButtonMask::MIDDLE,
            _ => ButtonMask::empty(),
        }
    }
}

bitflags! {
    /// Buttons held down during a motion.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ButtonMask: u8 {
        const LEFT = 1 << 0;
        const RIGHT = 1 << 1;
        const MIDDLE = 1 << 2;
    }
}

// ---------------------------------------------------------------------------
// InputEvent
// ---------------------------------------------------------------------------

/// Top-level input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Button {
        button: MouseButton,
        pressed: bool,
        position: Offset,
        modifiers: Modifiers,
    },
    /// Pointer movement. `delta` may be left zero by the source; the
    /// dispatcher computes it from the previous position.
    Motion {
        position: Offset,
        delta: Offset,
        buttons: ButtonMask,
        modifiers: Modifiers,
    },
    Key(KeyEvent),
    Resize(Size),
    /// The window gained (`true`) or lost keyboard focus.
    Focus(bool),
}

impl InputEvent {
    pub fn press(button: MouseButton, position: Offset) -> Self {
        Self::Button {
            button,
            pressed: true,
            position,
            modifiers: Modifiers::empty(),
        }
    }

    pub fn release(button: MouseButton, position: Offset) -> Self {
        Self::Button {
            button,
            pressed: false,
            position,
            modifiers: Modifiers::empty(),
        }
    }

    pub fn motion(position: Offset, buttons: ButtonMask) -> Self {
        Self::Motion {
            position,
            delta: Offset::ZERO,
            buttons,
            modifiers: Modifiers::empty(),
        }
    }

    pub fn key(code: Key) -> Self {
        Self::Key(KeyEvent::press(code, Modifiers::empty()))
    }

    /// Pointer position carried by the event, if any.
    pub fn position(&self) -> Option<Offset> {
        match self {
            Self::Button { position, .. } | Self::Motion { position, .. } => Some(*position),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// From<crossterm> conversions
// ---------------------------------------------------------------------------

impl From<crossterm::event::KeyModifiers> for Modifiers {
    fn from(m: crossterm::event::KeyModifiers) -> Self {
        use crossterm::event::KeyModifiers as Ct;
        let mut out = Modifiers::empty();
        out.set(Modifiers::SHIFT, m.contains(Ct::SHIFT));
        out.set(Modifiers::CTRL, m.contains(Ct::CONTROL));
        out.set(Modifiers::ALT, m.contains(Ct::ALT));
        out
    }
}

impl From<crossterm::event::KeyCode> for Key {
    fn from(code: crossterm::event::KeyCode) -> Self {
        use crossterm::event::KeyCode as Ct;
        match code {
            Ct::Char(c) => Key::Char(c),
            Ct::Enter => Key::Enter,
            Ct::Esc => Key::Escape,
            Ct::Tab => Key::Tab,
            Ct::BackTab => Key::BackTab,
            Ct::Backspace => Key::Backspace,
            Ct::Delete => Key::Delete,
            Ct::Left => Key::Left,
            Ct::Right => Key::Right,
            Ct::Up => Key::Up,
            Ct::Down => Key::Down,
            Ct::Home => Key::Home,
            Ct::End => Key::End,
            Ct::PageUp => Key::PageUp,
            Ct::PageDown => Key::PageDown,
            Ct::F(n) => Key::F(n),
            _ => Key::Unknown,
        }
    }
}

impl From<crossterm::event::KeyEvent> for KeyEvent {
    fn from(ct: crossterm::event::KeyEvent) -> Self {
        let code = Key::from(ct.code);
        let modifiers = Modifiers::from(ct.modifiers);
        match ct.kind {
            crossterm::event::KeyEventKind::Release => KeyEvent::release(code, modifiers),
            _ => KeyEvent::press(code, modifiers),
        }
    }
}

fn convert_mouse_button(b: crossterm::event::MouseButton) -> MouseButton {
    match b {
        crossterm::event::MouseButton::Left => MouseButton::Left,
        crossterm::event::MouseButton::Right => MouseButton::Right,
        crossterm::event::MouseButton::Middle => MouseButton::Middle,
    }
}

impl From<crossterm::event::MouseEvent> for InputEvent {
    fn from(me: crossterm::event::MouseEvent) -> Self {
        use crossterm::event::MouseEventKind as Kind;
        let position = Offset::new(i32::from(me.column), i32::from(me.row));
        let modifiers = Modifiers::from(me.modifiers);
        let button = |button, pressed| InputEvent::Button {
            button,
            pressed,
            position,
            modifiers,
        };
        match me.kind {
            Kind::Down(b) => button(convert_mouse_button(b), true),
            Kind::Up(b) => button(convert_mouse_button(b), false),
            Kind::ScrollUp => button(MouseButton::WheelUp, true),
            Kind::ScrollDown => button(MouseButton::WheelDown, true),
            Kind::ScrollLeft => button(MouseButton::WheelLeft, true),
            Kind::ScrollRight => button(MouseButton::WheelRight, true),
            Kind::Drag(b) => InputEvent::Motion {
                position,
                delta: Offset::ZERO,
                buttons: convert_mouse_button(b).mask(),
                modifiers,
            },
            Kind::Moved => InputEvent::Motion {
                position,
                delta: Offset::ZERO,
                buttons: ButtonMask::empty(),
                modifiers,
            },
        }
    }
}

impl From<crossterm::event::Event> for InputEvent {
    fn from(ct: crossterm::event::Event) -> Self {
        use crossterm::event::Event;
        match ct {
            Event::Key(ke) => InputEvent::Key(KeyEvent::from(ke)),
            Event::Mouse(me) => InputEvent::from(me),
            Event::Resize(w, h) => InputEvent::Resize(Size::new(i32::from(w), i32::from(h))),
            Event::FocusGained => InputEvent::Focus(true),
            Event::FocusLost => InputEvent::Focus(false),
            Event::Paste(s) => InputEvent::Key(KeyEvent::text(s)),
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event as ct;

    // ── KeyEvent ─────────────────────────────────────────────────────

    #[test]
    fn typed_char_carries_text() {
        let ke = KeyEvent::press(Key::Char('a'), Modifiers::empty());
        assert_eq!(ke.text, "a");
        assert!(ke.pressed);
    }

    #[test]
    fn ctrl_char_has_no_text() {
        let ke = KeyEvent::press(Key::Char('c'), Modifiers::CTRL);
        assert!(ke.text.is_empty());
    }

    #[test]
    fn release_has_no_text() {
        let ke = KeyEvent::release(Key::Char('a'), Modifiers::empty());
        assert!(!ke.pressed);
        assert!(ke.text.is_empty());
    }

    #[test]
    fn focus_traversal_keys() {
        assert!(KeyEvent::press(Key::Tab, Modifiers::empty()).is_focus_traversal());
        assert!(!KeyEvent::release(Key::Tab, Modifiers::empty()).is_focus_traversal());
        assert!(KeyEvent::press(Key::Tab, Modifiers::SHIFT).is_backwards());
        assert!(KeyEvent::press(Key::BackTab, Modifiers::empty()).is_backwards());
        assert!(!KeyEvent::press(Key::Enter, Modifiers::empty()).is_focus_traversal());
    }

    // ── From<crossterm> ──────────────────────────────────────────────

    #[test]
    fn from_crossterm_key_with_modifiers() {
        let ke = KeyEvent::from(ct::KeyEvent::new(
            ct::KeyCode::Char('A'),
            ct::KeyModifiers::SHIFT | ct::KeyModifiers::ALT,
        ));
        assert_eq!(ke.code, Key::Char('A'));
        assert!(ke.modifiers.contains(Modifiers::SHIFT | Modifiers::ALT));
        assert!(ke.text.is_empty());
    }

    #[test]
    fn from_crossterm_key_release() {
        let mut raw = ct::KeyEvent::new(ct::KeyCode::Enter, ct::KeyModifiers::NONE);
        raw.kind = ct::KeyEventKind::Release;
        let ke = KeyEvent::from(raw);
        assert_eq!(ke.code, Key::Enter);
        assert!(!ke.pressed);
    }

    #[test]
    fn from_crossterm_unmapped_key() {
        let ke = KeyEvent::from(ct::KeyEvent::new(ct::KeyCode::Insert, ct::KeyModifiers::NONE));
        assert_eq!(ke.code, Key::Unknown);
    }

    fn mouse(kind: ct::MouseEventKind) -> InputEvent {
        InputEvent::from(ct::Event::Mouse(ct::MouseEvent {
            kind,
            column: 7,
            row: 3,
            modifiers: ct::KeyModifiers::NONE,
        }))
    }

    #[test]
    fn from_crossterm_mouse_down_up() {
        assert_eq!(
            mouse(ct::MouseEventKind::Down(ct::MouseButton::Left)),
            InputEvent::press(MouseButton::Left, Offset::new(7, 3))
        );
        assert_eq!(
            mouse(ct::MouseEventKind::Up(ct::MouseButton::Right)),
            InputEvent::release(MouseButton::Right, Offset::new(7, 3))
        );
    }

    #[test]
    fn from_crossterm_wheel_is_a_button_press() {
        assert_eq!(
            mouse(ct::MouseEventKind::ScrollDown),
            InputEvent::press(MouseButton::WheelDown, Offset::new(7, 3))
        );
        assert!(MouseButton::WheelDown.is_wheel());
        assert_eq!(MouseButton::WheelDown.mask(), ButtonMask::empty());
    }

    #[test]
    fn from_crossterm_drag_is_motion_with_mask() {
        assert_eq!(
            mouse(ct::MouseEventKind::Drag(ct::MouseButton::Left)),
            InputEvent::motion(Offset::new(7, 3), ButtonMask::LEFT)
        );
        assert_eq!(
            mouse(ct::MouseEventKind::Moved),
            InputEvent::motion(Offset::new(7, 3), ButtonMask::empty())
        );
    }

    #[test]
    fn from_crossterm_other_events() {
        assert_eq!(
            InputEvent::from(ct::Event::Resize(80, 24)),
            InputEvent::Resize(Size::new(80, 24))
        );
        assert_eq!(InputEvent::from(ct::Event::FocusLost), InputEvent::Focus(false));
        assert_eq!(
            InputEvent::from(ct::Event::Paste("hi".into())),
            InputEvent::Key(KeyEvent::text("hi"))
        );
    }

    #[test]
    fn position_of_pointer_events() {
        assert_eq!(
            InputEvent::press(MouseButton::Left, Offset::new(1, 2)).position(),
            Some(Offset::new(1, 2))
        );
        assert_eq!(InputEvent::key(Key::Tab).position(), None);
    }
}
