//! Per-kind, per-id value stacks.
//!
//! Each property id owns a stack whose bottom entry is the process-wide
//! default. Values are pushed and popped in strict nesting order while the
//! tree is drawn; readers only ever look at the top.

use std::rc::Rc;

use tracing::warn;

use super::shape::{NullShape, Shape};
use super::value::{Color, FontHandle, PropertyId, PropertyKind, PropertyValue};

/// The value an unregistered id resolves to.
pub trait Neutral: Clone {
    fn neutral() -> Self;
}

impl Neutral for Color {
    fn neutral() -> Self {
        Color::TRANSPARENT
    }
}

impl Neutral for FontHandle {
    fn neutral() -> Self {
        FontHandle::NONE
    }
}

impl Neutral for Rc<dyn Shape> {
    fn neutral() -> Self {
        Rc::new(NullShape)
    }
}

impl Neutral for f32 {
    fn neutral() -> Self {
        0.0
    }
}

// ---------------------------------------------------------------------------
// KindStack
// ---------------------------------------------------------------------------

/// Stacks for one kind of value, indexed by property id.
#[derive(Clone)]
pub struct KindStack<T> {
    kind: PropertyKind,
    stacks: Vec<Vec<T>>,
}

impl<T: Neutral> KindStack<T> {
    pub fn new(kind: PropertyKind) -> Self {
        Self {
            kind,
            stacks: Vec::new(),
        }
    }

    /// Install `default` as the bottom entry for `id`. Values already pushed
    /// on top are kept.
    pub fn register(&mut self, id: PropertyId, default: T) {
        let index = id.index();
        if self.stacks.len() <= index {
            self.stacks.resize_with(index + 1, Vec::new);
        }
        let stack = &mut self.stacks[index];
        match stack.first_mut() {
            Some(bottom) => *bottom = default,
            None => stack.push(default),
        }
    }

    pub fn is_registered(&self, id: PropertyId) -> bool {
        self.stacks.get(id.index()).is_some_and(|s| !s.is_empty())
    }

    pub fn push(&mut self, id: PropertyId, value: T) {
        if !self.is_registered(id) {
            warn!(kind = ?self.kind, %id, "push on unregistered property, using a neutral default");
            self.register(id, T::neutral());
        }
        self.stacks[id.index()].push(value);
    }

    /// Pop the top of `id`. The default entry is never removed; trying to is
    /// logged and ignored. Returns whether something was popped.
    pub fn pop(&mut self, id: PropertyId) -> bool {
        match self.stacks.get_mut(id.index()) {
            Some(stack) if stack.len() > 1 => {
                stack.pop();
                true
            }
            _ => {
                warn!(kind = ?self.kind, %id, "property stack underflow");
                false
            }
        }
    }

    /// Top of the stack, or the neutral value for unregistered ids.
    pub fn current(&self, id: PropertyId) -> T {
        self.stacks
            .get(id.index())
            .and_then(|s| s.last())
            .cloned()
            .unwrap_or_else(T::neutral)
    }

    pub fn default_value(&self, id: PropertyId) -> T {
        self.stacks
            .get(id.index())
            .and_then(|s| s.first())
            .cloned()
            .unwrap_or_else(T::neutral)
    }

    /// Number of values pushed above the default.
    pub fn depth(&self, id: PropertyId) -> usize {
        self.stacks
            .get(id.index())
            .map_or(0, |s| s.len().saturating_sub(1))
    }

    /// Sum of [`depth`](Self::depth) over every id.
    pub fn total_depth(&self) -> usize {
        self.stacks.iter().map(|s| s.len().saturating_sub(1)).sum()
    }
}

// ---------------------------------------------------------------------------
// PropertyStacks
// ---------------------------------------------------------------------------

/// The style cascade: one [`KindStack`] per kind of value.
#[derive(Clone)]
pub struct PropertyStacks {
    pub colors: KindStack<Color>,
    pub fonts: KindStack<FontHandle>,
    pub shapes: KindStack<Rc<dyn Shape>>,
    pub scalars: KindStack<f32>,
}

impl Default for PropertyStacks {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyStacks {
    pub fn new() -> Self {
        Self {
            colors: KindStack::new(PropertyKind::Color),
            fonts: KindStack::new(PropertyKind::Font),
            shapes: KindStack::new(PropertyKind::Shape),
            scalars: KindStack::new(PropertyKind::Scalar),
        }
    }

    pub fn register(&mut self, id: PropertyId, default: PropertyValue) {
        match default {
            PropertyValue::Color(c) => self.colors.register(id, c),
            PropertyValue::Font(f) => self.fonts.register(id, f),
            PropertyValue::Shape(s) => self.shapes.register(id, s),
            PropertyValue::Scalar(v) => self.scalars.register(id, v),
        }
    }

    pub fn push(&mut self, id: PropertyId, value: PropertyValue) {
        match value {
            PropertyValue::Color(c) => self.colors.push(id, c),
            PropertyValue::Font(f) => self.fonts.push(id, f),
            PropertyValue::Shape(s) => self.shapes.push(id, s),
            PropertyValue::Scalar(v) => self.scalars.push(id, v),
        }
    }

    pub fn pop(&mut self, id: PropertyId, kind: PropertyKind) -> bool {
        match kind {
            PropertyKind::Color => self.colors.pop(id),
            PropertyKind::Font => self.fonts.pop(id),
            PropertyKind::Shape => self.shapes.pop(id),
            PropertyKind::Scalar => self.scalars.pop(id),
        }
    }

    /// Current value of `id` in the `kind` family.
    pub fn current(&self, id: PropertyId, kind: PropertyKind) -> PropertyValue {
        match kind {
            PropertyKind::Color => PropertyValue::Color(self.colors.current(id)),
            PropertyKind::Font => PropertyValue::Font(self.fonts.current(id)),
            PropertyKind::Shape => PropertyValue::Shape(self.shapes.current(id)),
            PropertyKind::Scalar => PropertyValue::Scalar(self.scalars.current(id)),
        }
    }

    pub fn default_value(&self, id: PropertyId, kind: PropertyKind) -> PropertyValue {
        match kind {
            PropertyKind::Color => PropertyValue::Color(self.colors.default_value(id)),
            PropertyKind::Font => PropertyValue::Font(self.fonts.default_value(id)),
            PropertyKind::Shape => PropertyValue::Shape(self.shapes.default_value(id)),
            PropertyKind::Scalar => PropertyValue::Scalar(self.scalars.default_value(id)),
        }
    }

    pub fn color(&self, id: PropertyId) -> Color {
        self.colors.current(id)
    }

    pub fn font(&self, id: PropertyId) -> FontHandle {
        self.fonts.current(id)
    }

    pub fn shape(&self, id: PropertyId) -> Rc<dyn Shape> {
        self.shapes.current(id)
    }

    pub fn scalar(&self, id: PropertyId) -> f32 {
        self.scalars.current(id)
    }

    /// Total number of values pushed above the defaults, over every kind.
    /// Zero whenever no traversal is in progress.
    pub fn depth(&self) -> usize {
        self.colors.total_depth()
            + self.fonts.total_depth()
            + self.shapes.total_depth()
            + self.scalars.total_depth()
    }
}
