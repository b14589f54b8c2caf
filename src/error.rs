//! Error type for contract violations on the component tree.
//!
//! Only structural misuse surfaces as an error. Bookkeeping anomalies (stack
//! underflow, scissor underflow, unknown property ids) are logged and absorbed
//! where they happen.

use crate::component::NodeId;

/// A programming contract violation. The operation that returned it left the
/// tree untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UiError {
    /// The id is stale or was never issued by this tree.
    #[error("node {0:?} does not exist")]
    NoSuchNode(NodeId),

    /// A container-only operation was applied to a leaf.
    #[error("`{operation}` requires a container, but node {node:?} is a leaf")]
    NotAContainer {
        node: NodeId,
        operation: &'static str,
    },

    /// `child` is not linked under `container`.
    #[error("node {child:?} is not a child of container {container:?}")]
    NotAChild { child: NodeId, container: NodeId },

    /// Linking `child` under `parent` would make a node its own ancestor.
    #[error("inserting {child:?} under {parent:?} would create a cycle")]
    Cycle { child: NodeId, parent: NodeId },

    /// The root container cannot be detached or destroyed.
    #[error("the root container cannot be detached or destroyed")]
    RootImmutable,

    /// The flexbox solver rejected the generated layout tree.
    #[error("flex layout failed: {0}")]
    Flex(String),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, UiError>;
