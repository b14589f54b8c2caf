//! Animation scheduling: handlers advanced once per frame, dropped when done.

pub mod scheduler;
pub mod tween;

pub use scheduler::{AnimationHandler, AnimationHook, AnimationScheduler};
pub use tween::{MoveAnimation, ResizeAnimation};
