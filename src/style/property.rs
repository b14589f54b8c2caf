//! Style properties attached to nodes, and the scoped guard that pushes them.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::rc::Rc;

use super::shape::Shape;
use super::stack::PropertyStacks;
use super::value::{Color, FontHandle, PropertyId, PropertyKind, PropertyValue};

/// A style entry on a node: what to push on which stack while the node (or
/// its subtree) is drawn.
#[derive(Clone)]
pub enum StyleProperty {
    /// Push a fixed value.
    Value { id: PropertyId, value: PropertyValue },
    /// Push whatever `source` holds at the moment this property is enabled.
    Alias {
        id: PropertyId,
        kind: PropertyKind,
        source: PropertyId,
    },
    /// Push the bottom (default) entry of `id`, masking any overrides above.
    StackDefault { id: PropertyId, kind: PropertyKind },
}

impl StyleProperty {
    pub fn color(id: PropertyId, color: Color) -> Self {
        Self::Value {
            id,
            value: PropertyValue::Color(color),
        }
    }

    pub fn font(id: PropertyId, font: FontHandle) -> Self {
        Self::Value {
            id,
            value: PropertyValue::Font(font),
        }
    }

    pub fn shape(id: PropertyId, shape: impl Shape + 'static) -> Self {
        Self::Value {
            id,
            value: PropertyValue::Shape(Rc::new(shape)),
        }
    }

    pub fn scalar(id: PropertyId, value: f32) -> Self {
        Self::Value {
            id,
            value: PropertyValue::Scalar(value),
        }
    }

    pub fn alias(id: PropertyId, kind: PropertyKind, source: PropertyId) -> Self {
        Self::Alias { id, kind, source }
    }

    pub fn stack_default(id: PropertyId, kind: PropertyKind) -> Self {
        Self::StackDefault { id, kind }
    }

    pub fn id(&self) -> PropertyId {
        match self {
            Self::Value { id, .. } | Self::Alias { id, .. } | Self::StackDefault { id, .. } => *id,
        }
    }

    pub fn kind(&self) -> PropertyKind {
        match self {
            Self::Value { value, .. } => value.kind(),
            Self::Alias { kind, .. } | Self::StackDefault { kind, .. } => *kind,
        }
    }

    /// The value this property would push right now.
    pub fn resolve(&self, stacks: &PropertyStacks) -> PropertyValue {
        match self {
            Self::Value { value, .. } => value.clone(),
            Self::Alias { kind, source, .. } => stacks.current(*source, *kind),
            Self::StackDefault { id, kind } => stacks.default_value(*id, *kind),
        }
    }

    pub fn enable(&self, stacks: &mut PropertyStacks) {
        let value = self.resolve(stacks);
        stacks.push(self.id(), value);
    }

    pub fn disable(&self, stacks: &mut PropertyStacks) {
        stacks.pop(self.id(), self.kind());
    }
}

impl fmt::Debug for StyleProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value { id, value } => write!(f, "{id} = {value:?}"),
            Self::Alias { id, kind, source } => write!(f, "{id} = {kind:?}({source})"),
            Self::StackDefault { id, kind } => write!(f, "{id} = default {kind:?}"),
        }
    }
}

// ---------------------------------------------------------------------------
// StyleGuard
// ---------------------------------------------------------------------------

/// Anything that owns a set of property stacks.
pub trait StyleHost {
    fn stacks_mut(&mut self) -> &mut PropertyStacks;
}

impl StyleHost for PropertyStacks {
    fn stacks_mut(&mut self) -> &mut PropertyStacks {
        self
    }
}

/// Pushes properties and pops them again, in reverse, when dropped.
///
/// The guard derefs to its host, so drawing code keeps using the host while
/// the properties are in effect. Guards nest by reborrowing:
///
/// ```
/// use arbor_ui::style::{Color, PropertyId, PropertyStacks, StyleGuard, StyleProperty};
///
/// let id = PropertyId(5);
/// let mut stacks = PropertyStacks::new();
/// {
///     let mut outer = StyleGuard::new(&mut stacks);
///     outer.push(&StyleProperty::color(id, Color::RED));
///     {
///         let mut inner = StyleGuard::new(&mut *outer);
///         inner.push(&StyleProperty::color(id, Color::BLUE));
///         assert_eq!(inner.color(id), Color::BLUE);
///     }
///     assert_eq!(outer.color(id), Color::RED);
/// }
/// assert_eq!(stacks.color(id), Color::TRANSPARENT);
/// ```
pub struct StyleGuard<'a, H: StyleHost + ?Sized> {
    host: &'a mut H,
    pushed: Vec<StyleProperty>,
}

impl<'a, H: StyleHost + ?Sized> StyleGuard<'a, H> {
    pub fn new(host: &'a mut H) -> Self {
        Self {
            host,
            pushed: Vec::new(),
        }
    }

    pub fn push(&mut self, property: &StyleProperty) {
        property.enable(self.host.stacks_mut());
        self.pushed.push(property.clone());
    }

    pub fn push_all(&mut self, properties: &[StyleProperty]) {
        for property in properties {
            self.push(property);
        }
    }

    /// Number of properties this guard will pop.
    pub fn len(&self) -> usize {
        self.pushed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pushed.is_empty()
    }
}

impl<H: StyleHost + ?Sized> Deref for StyleGuard<'_, H> {
    type Target = H;

    fn deref(&self) -> &H {
        self.host
    }
}

impl<H: StyleHost + ?Sized> DerefMut for StyleGuard<'_, H> {
    fn deref_mut(&mut self) -> &mut H {
        self.host
    }
}

impl<H: StyleHost + ?Sized> Drop for StyleGuard<'_, H> {
    fn drop(&mut self) {
        let stacks = self.host.stacks_mut();
        while let Some(property) = self.pushed.pop() {
            property.disable(stacks);
        }
    }
}
