//! Rendering: backend contract, scissor stack, damage tracking and the
//! display traversal.

pub mod backend;
pub mod damage;
pub mod display;
pub mod scissor;

pub use backend::{rect_vertices, RenderBackend, TextureId, Vertex};
pub use damage::DamageTracker;
pub use display::{display_tree, DisplayContext};
pub use scissor::ScissorStack;
