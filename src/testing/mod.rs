//! Headless testing helpers: a recording backend, the Pilot driver and tree
//! dumps.
//!
//! Use the [`Pilot`] to drive a [`Ui`](crate::ui::Ui) frame by frame with an
//! explicit clock. Use [`tree_to_string`] to capture the tree as plain text
//! for snapshot-style assertions.

pub mod backend;
pub mod pilot;
pub mod snapshot;

pub use backend::{DrawCall, RecordingBackend};
pub use pilot::Pilot;
pub use snapshot::tree_to_string;
