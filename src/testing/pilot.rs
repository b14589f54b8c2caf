//! Pilot: programmatic interaction with a headless [`Ui`].
//!
//! The `Pilot` owns a `Ui`, a [`RecordingBackend`] and an explicit clock.
//! Input helpers dispatch immediately, as if the event had been queued and
//! the frame had reached its input stage.

use crate::error::Result;
use crate::event::{ButtonMask, Flow, InputEvent, Key, KeyEvent, Modifiers, MouseButton};
use crate::geometry::{Offset, Size};
use crate::ui::{FrameReport, Ui, UiConfig};

use super::backend::RecordingBackend;

// ---------------------------------------------------------------------------
// Pilot
// ---------------------------------------------------------------------------

/// A headless UI driver for tests.
///
/// # Examples
///
/// ```
/// use arbor_ui::component::Node;
/// use arbor_ui::geometry::{Offset, Region, Size};
/// use arbor_ui::testing::Pilot;
///
/// let mut pilot = Pilot::new(Size::new(80, 24));
/// let root = pilot.ui().root();
/// let button = pilot
///     .ui_mut()
///     .add(root, Node::leaf().selectable(true).with_rect(Region::new(2, 2, 10, 3)))
///     .unwrap();
/// pilot.click(Offset::new(4, 3));
/// assert_eq!(pilot.ui().tree().selected_leaf(), Some(button));
/// ```
pub struct Pilot {
    ui: Ui,
    backend: RecordingBackend,
    clock: f64,
}

impl Pilot {
    pub fn new(viewport: Size) -> Self {
        Self::with_config(viewport, UiConfig::default())
    }

    pub fn with_config(viewport: Size, config: UiConfig) -> Self {
        Self {
            ui: Ui::with_config(viewport, config),
            backend: RecordingBackend::default(),
            clock: 0.0,
        }
    }

    pub fn ui(&self) -> &Ui {
        &self.ui
    }

    pub fn ui_mut(&mut self) -> &mut Ui {
        &mut self.ui
    }

    pub fn backend(&self) -> &RecordingBackend {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut RecordingBackend {
        &mut self.backend
    }

    /// Current clock, in seconds.
    pub fn now(&self) -> f64 {
        self.clock
    }

    // ── Frames ───────────────────────────────────────────────────────

    /// Run one frame at the current clock.
    pub fn frame(&mut self) -> Result<FrameReport> {
        self.ui.frame(&mut self.backend, self.clock)
    }

    /// Move the clock forward by `dt` seconds and run a frame.
    pub fn advance(&mut self, dt: f64) -> Result<FrameReport> {
        self.clock += dt;
        self.frame()
    }

    // ── Input simulation ─────────────────────────────────────────────

    pub fn press(&mut self, at: Offset) -> Flow {
        self.ui.handle_event(InputEvent::press(MouseButton::Left, at))
    }

    pub fn release(&mut self, at: Offset) -> Flow {
        self.ui.handle_event(InputEvent::release(MouseButton::Left, at))
    }

    /// Left press and release at the same point.
    pub fn click(&mut self, at: Offset) -> Flow {
        let pressed = self.press(at);
        let released = self.release(at);
        (pressed.is_consumed() || released.is_consumed()).into()
    }

    pub fn move_to(&mut self, at: Offset) -> Flow {
        self.ui.handle_event(InputEvent::motion(at, ButtonMask::empty()))
    }

    /// Press at `from`, move to `to` with the left button held, release.
    pub fn drag(&mut self, from: Offset, to: Offset) {
        self.press(from);
        self.ui.handle_event(InputEvent::motion(to, ButtonMask::LEFT));
        self.release(to);
    }

    pub fn scroll(&mut self, at: Offset, down: bool) -> Flow {
        let button = if down {
            MouseButton::WheelDown
        } else {
            MouseButton::WheelUp
        };
        self.ui.handle_event(InputEvent::press(button, at))
    }

    pub fn key(&mut self, key: Key) -> Flow {
        self.ui.handle_event(InputEvent::key(key))
    }

    pub fn key_with(&mut self, key: Key, modifiers: Modifiers) -> Flow {
        self.ui
            .handle_event(InputEvent::Key(KeyEvent::press(key, modifiers)))
    }

    /// One key press per character.
    pub fn type_text(&mut self, text: &str) {
        for ch in text.chars() {
            self.key(Key::Char(ch));
        }
    }

    pub fn resize(&mut self, size: Size) {
        self.ui.handle_event(InputEvent::Resize(size));
    }
}
