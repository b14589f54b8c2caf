//! Widget system: the trait the core talks to, plus generic widgets.

pub mod panel;
pub mod traits;

pub use panel::{Label, ShapePanel};
pub use traits::{Widget, WidgetExt};
