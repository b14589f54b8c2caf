//! Component tree: slotmap-backed arena with intrusive sibling links.

pub mod node;
mod placement;
pub mod tree;
pub mod visit;

pub use node::{ChildList, Node, NodeFlags, NodeId};
pub use tree::{Children, Tree};
pub use visit::Visit;
