//! Layout: pluggable per-node strategies and the convergence loop.

pub mod engine;
pub mod layouter;

pub use engine::{LayoutEngine, LayoutReport};
pub use layouter::{
    Axis, FillParent, FitToChildren, FitWidthToChildren, Flex, Justify, Layouter, Stack,
};
