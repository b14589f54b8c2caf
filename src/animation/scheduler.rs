//! Time-driven per-frame mutators bound to nodes.

use tracing::trace;

use crate::component::{NodeId, Tree};

/// What an animation does to its node.
pub trait AnimationHook {
    /// Apply the state at `progress`, in `0.0..1.0`. Returning `false` ends
    /// the animation where it stands; [`finish`](Self::finish) is not called.
    fn update(&mut self, tree: &mut Tree, node: NodeId, progress: f64) -> bool;

    /// Apply the final state. Called at most once, when the animation runs
    /// out its duration or is finished early.
    fn finish(&mut self, tree: &mut Tree, node: NodeId) {
        self.update(tree, node, 1.0);
    }
}

// ---------------------------------------------------------------------------
// AnimationHandler
// ---------------------------------------------------------------------------

/// An animation bound to one node. Holds only the node's id: a freed node
/// simply ends the animation.
pub struct AnimationHandler {
    node: NodeId,
    start: f64,
    duration: f64,
    hook: Box<dyn AnimationHook>,
    finished: bool,
}

impl AnimationHandler {
    /// `duration` in seconds. The start time is stamped when the handler is
    /// added to a scheduler.
    pub fn new(node: NodeId, duration: f64, hook: impl AnimationHook + 'static) -> Self {
        Self {
            node,
            start: 0.0,
            duration,
            hook: Box::new(hook),
            finished: false,
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Progress at `now`, clamped to `0.0..=1.0`.
    pub fn progress(&self, now: f64) -> f64 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((now - self.start) / self.duration).clamp(0.0, 1.0)
    }

    /// Advance to `now`. Returns whether the animation keeps running; once
    /// past its end time it finishes itself and returns `false`, as it does
    /// when the hook asks to stop.
    pub fn update(&mut self, tree: &mut Tree, now: f64) -> bool {
        if self.finished {
            return false;
        }
        if !tree.contains(self.node) {
            self.finished = true;
            return false;
        }
        if now - self.start >= self.duration {
            self.finish(tree);
            return false;
        }
        let progress = self.progress(now);
        if !self.hook.update(tree, self.node, progress) {
            trace!(node = ?self.node, progress, "animation stopped by its hook");
            self.finished = true;
            return false;
        }
        true
    }

    /// Snap to the final state. Later calls do nothing.
    pub fn finish(&mut self, tree: &mut Tree) {
        if self.finished {
            return;
        }
        self.finished = true;
        if tree.contains(self.node) {
            self.hook.finish(tree, self.node);
        }
    }
}

// ---------------------------------------------------------------------------
// AnimationScheduler
// ---------------------------------------------------------------------------

/// The per-frame list of running animations.
#[derive(Default)]
pub struct AnimationScheduler {
    queue: Vec<AnimationHandler>,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp the handler's start time with `now` and enqueue it.
    pub fn add(&mut self, mut handler: AnimationHandler, now: f64) {
        handler.start = now;
        trace!(node = ?handler.node, duration = handler.duration, "animation added");
        self.queue.push(handler);
    }

    /// Run one frame. Handlers are visited newest first; the ones that stop
    /// are dropped. Returns how many are still running.
    pub fn advance(&mut self, tree: &mut Tree, now: f64) -> usize {
        let current = std::mem::take(&mut self.queue);
        let mut running = Vec::with_capacity(current.len());
        for mut handler in current.into_iter().rev() {
            if handler.update(tree, now) {
                running.push(handler);
            }
        }
        running.reverse();
        self.queue = running;
        self.queue.len()
    }

    /// Snap every animation on `node` to its final state and drop it.
    pub fn finish_animations(&mut self, tree: &mut Tree, node: NodeId) -> usize {
        let (mut done, keep): (Vec<_>, Vec<_>) = std::mem::take(&mut self.queue)
            .into_iter()
            .partition(|h| h.node == node);
        self.queue = keep;
        for handler in &mut done {
            handler.finish(tree);
        }
        done.len()
    }

    /// Drop every animation on `node` without finishing it; the node keeps
    /// whatever state the last update left.
    pub fn stop_animations(&mut self, node: NodeId) -> usize {
        let before = self.queue.len();
        self.queue.retain(|h| h.node != node);
        before - self.queue.len()
    }

    pub fn is_animating(&self, node: NodeId) -> bool {
        self.queue.iter().any(|h| h.node == node)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
