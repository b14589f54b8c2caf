//! Style values: colors, font handles, property ids and kinds.

use std::fmt;
use std::rc::Rc;

use super::shape::Shape;

/// 8-bit RGBA color.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// The "no value" color returned for unregistered ids.
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub const fn is_transparent(self) -> bool {
        self.a == 0
    }
}

/// Opaque handle to a font owned by the rendering backend.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FontHandle(pub u32);

impl FontHandle {
    /// No font. Text drawn with it is skipped by well-behaved backends.
    pub const NONE: FontHandle = FontHandle(0);

    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

/// Small integer naming a style slot. Each kind of value has its own id space.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyId(pub u16);

impl PropertyId {
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which stack family a property lives in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    Color,
    Font,
    Shape,
    Scalar,
}

/// A concrete style value.
#[derive(Clone)]
pub enum PropertyValue {
    Color(Color),
    Font(FontHandle),
    Shape(Rc<dyn Shape>),
    Scalar(f32),
}

impl PropertyValue {
    pub fn kind(&self) -> PropertyKind {
        match self {
            Self::Color(_) => PropertyKind::Color,
            Self::Font(_) => PropertyKind::Font,
            Self::Shape(_) => PropertyKind::Shape,
            Self::Scalar(_) => PropertyKind::Scalar,
        }
    }
}

impl fmt::Debug for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Color(c) => f.debug_tuple("Color").field(c).finish(),
            Self::Font(h) => f.debug_tuple("Font").field(h).finish(),
            Self::Shape(s) => f.debug_tuple("Shape").field(&s.name()).finish(),
            Self::Scalar(v) => f.debug_tuple("Scalar").field(v).finish(),
        }
    }
}

/// Well-known property ids installed by the toplevel registry.
///
/// Applications allocate their own ids from [`FIRST_APP_ID`] upwards.
pub mod ids {
    use super::PropertyId;

    // Colors
    pub const BACKGROUND: PropertyId = PropertyId(0);
    pub const FOREGROUND: PropertyId = PropertyId(1);
    pub const TEXT: PropertyId = PropertyId(2);
    pub const HOVERED_TEXT: PropertyId = PropertyId(3);
    pub const SELECTED_TEXT: PropertyId = PropertyId(4);
    pub const ACTIVE_TEXT: PropertyId = PropertyId(5);
    pub const DISABLED_TEXT: PropertyId = PropertyId(6);
    pub const FRAME_COLOR: PropertyId = PropertyId(7);

    // Fonts
    pub const DEFAULT_FONT: PropertyId = PropertyId(0);

    // Shapes
    pub const BACKGROUND_SHAPE: PropertyId = PropertyId(0);
    pub const FRAME_SHAPE: PropertyId = PropertyId(1);

    // Scalars
    pub const FRAME_WIDTH: PropertyId = PropertyId(0);
    pub const SPACING: PropertyId = PropertyId(1);

    pub const FIRST_APP_ID: PropertyId = PropertyId(32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_constants() {
        assert!(Color::TRANSPARENT.is_transparent());
        assert!(!Color::RED.is_transparent());
        assert_eq!(Color::RED.with_alpha(0), Color::rgba(255, 0, 0, 0));
    }

    #[test]
    fn value_kinds() {
        assert_eq!(PropertyValue::Color(Color::RED).kind(), PropertyKind::Color);
        assert_eq!(PropertyValue::Scalar(1.0).kind(), PropertyKind::Scalar);
        assert!(FontHandle::NONE.is_none());
        assert_eq!(PropertyId::new(5).to_string(), "#5");
    }
}
