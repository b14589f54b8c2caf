//! Style cascade: per-property value stacks pushed and popped while the tree
//! is drawn.

pub mod property;
pub mod shape;
pub mod stack;
pub mod value;

pub use property::{StyleGuard, StyleHost, StyleProperty};
pub use shape::{FilledRect, Frame, NullShape, Shape, ShapeFlags};
pub use stack::{KindStack, Neutral, PropertyStacks};
pub use value::{ids, Color, FontHandle, PropertyId, PropertyKind, PropertyValue};
