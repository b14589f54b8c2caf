//! The toplevel manager: owns the tree, the style stacks, the listener
//! registries and the animation queue, and drives one frame at a time.
//!
//! A frame runs the stages in a fixed order:
//!
//! 1. flush nodes destroyed since the last frame,
//! 2. advance animations,
//! 3. fire tick listeners,
//! 4. run layout to convergence,
//! 5. draw (clipped to the damaged region in lazy mode),
//! 6. dispatch queued input events.

use std::collections::VecDeque;
use std::rc::Rc;

use tracing::{debug, trace, warn};

use crate::animation::{AnimationHandler, AnimationScheduler};
use crate::component::{Node, NodeFlags, NodeId, Tree};
use crate::error::{Result, UiError};
use crate::event::{
    ActionEvent, ButtonEvent, ClickEvent, DataChangedEvent, DestroyedEvent, EventKind, Flow,
    InputEvent, KeyPressEvent, ListenerHandle, ListenerKey, Listeners, MotionEvent,
    MouseButton, TickEvent,
};
use crate::geometry::{Offset, Region, Size};
use crate::layout::{FillParent, FitToChildren, FitWidthToChildren, LayoutEngine, LayoutReport, Layouter};
use crate::render::{display_tree, DisplayContext, RenderBackend};
use crate::style::{ids, Color, FilledRect, FontHandle, Frame, PropertyStacks, PropertyValue};

// ---------------------------------------------------------------------------
// UiConfig
// ---------------------------------------------------------------------------

/// Runtime switches for a [`Ui`].
#[derive(Debug, Clone)]
pub struct UiConfig {
    /// Track damage and clip redraws to it. Without it every frame redraws
    /// everything.
    pub lazy_rendering: bool,
    /// Consecutive layout passes without progress before giving up.
    pub layout_stall_limit: usize,
    /// Hard cap on layout passes per frame.
    pub max_layout_passes: usize,
    /// A press selects the nearest selectable node under the pointer.
    pub select_on_press: bool,
    /// A consumed press brings the consuming node to the front.
    pub raise_on_press: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            lazy_rendering: false,
            layout_stall_limit: 3,
            max_layout_passes: 64,
            select_on_press: true,
            raise_on_press: true,
        }
    }
}

impl UiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable damage tracking (builder).
    pub fn with_lazy_rendering(mut self, lazy: bool) -> Self {
        self.lazy_rendering = lazy;
        self
    }

    pub fn with_layout_stall_limit(mut self, passes: usize) -> Self {
        self.layout_stall_limit = passes;
        self
    }

    pub fn with_max_layout_passes(mut self, passes: usize) -> Self {
        self.max_layout_passes = passes;
        self
    }

    pub fn with_select_on_press(mut self, select: bool) -> Self {
        self.select_on_press = select;
        self
    }

    pub fn with_raise_on_press(mut self, raise: bool) -> Self {
        self.raise_on_press = raise;
        self
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Shared defaults created once per [`Ui`]: stateless layouters nodes can
/// share, and the base values of the well-known style properties.
pub struct Registry {
    pub fill_parent: Rc<dyn Layouter>,
    pub fit_width: Rc<dyn Layouter>,
    pub fit_to_children: Rc<dyn Layouter>,
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            fill_parent: Rc::new(FillParent::default()),
            fit_width: Rc::new(FitWidthToChildren::default()),
            fit_to_children: Rc::new(FitToChildren::default()),
        }
    }
}

impl Registry {
    /// Register the default value of every well-known property id.
    pub fn install(&self, stacks: &mut PropertyStacks) {
        let colors = [
            (ids::BACKGROUND, Color::rgb(32, 32, 40)),
            (ids::FOREGROUND, Color::rgb(64, 64, 80)),
            (ids::TEXT, Color::rgb(220, 220, 220)),
            (ids::HOVERED_TEXT, Color::WHITE),
            (ids::SELECTED_TEXT, Color::rgb(255, 210, 90)),
            (ids::ACTIVE_TEXT, Color::rgb(255, 160, 60)),
            (ids::DISABLED_TEXT, Color::rgb(110, 110, 110)),
            (ids::FRAME_COLOR, Color::rgb(140, 140, 160)),
        ];
        for (id, color) in colors {
            stacks.register(id, PropertyValue::Color(color));
        }
        stacks.register(ids::DEFAULT_FONT, PropertyValue::Font(FontHandle(1)));
        stacks.register(
            ids::BACKGROUND_SHAPE,
            PropertyValue::Shape(Rc::new(FilledRect::plain(ids::BACKGROUND))),
        );
        stacks.register(
            ids::FRAME_SHAPE,
            PropertyValue::Shape(Rc::new(Frame {
                color: ids::FRAME_COLOR,
                width: ids::FRAME_WIDTH,
            })),
        );
        stacks.register(ids::FRAME_WIDTH, PropertyValue::Scalar(1.0));
        stacks.register(ids::SPACING, PropertyValue::Scalar(1.0));
    }
}

// ---------------------------------------------------------------------------
// Ui
// ---------------------------------------------------------------------------

/// The press a release may complete into a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Press {
    pub node: NodeId,
    pub button: MouseButton,
}

/// What one call to [`Ui::frame`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    pub frame: u64,
    pub destroyed: usize,
    pub animations: usize,
    pub layout: LayoutReport,
    /// Widgets drawn, or `None` when the frame was skipped as clean.
    pub drawn: Option<usize>,
    pub events: usize,
}

pub struct Ui {
    tree: Tree,
    root: NodeId,
    styles: PropertyStacks,
    registry: Registry,
    config: UiConfig,
    layout: LayoutEngine,
    animations: AnimationScheduler,
    pub(crate) listeners: Listeners,
    pending_destroy: VecDeque<NodeId>,
    queue: VecDeque<InputEvent>,
    pub(crate) active: Option<NodeId>,
    pub(crate) press: Option<Press>,
    pub(crate) hovered: Option<NodeId>,
    pub(crate) pointer: Offset,
    viewport: Size,
    now: f64,
    frame: u64,
}

impl Ui {
    /// A UI with the default configuration and a root container covering
    /// `viewport`.
    pub fn new(viewport: Size) -> Self {
        Self::with_config(viewport, UiConfig::default())
    }

    pub fn with_config(viewport: Size, config: UiConfig) -> Self {
        let mut tree = Tree::new(config.lazy_rendering);
        let root = tree.insert(Node::container().named("root").with_size(viewport));
        tree.invalidate_region(viewport.to_region());

        let registry = Registry::default();
        let mut styles = PropertyStacks::new();
        registry.install(&mut styles);

        Self {
            tree,
            root,
            styles,
            registry,
            layout: LayoutEngine::new(config.layout_stall_limit, config.max_layout_passes),
            config,
            animations: AnimationScheduler::new(),
            listeners: Listeners::default(),
            pending_destroy: VecDeque::new(),
            queue: VecDeque::new(),
            active: None,
            press: None,
            hovered: None,
            pointer: Offset::ZERO,
            viewport,
            now: 0.0,
            frame: 0,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    pub fn styles(&self) -> &PropertyStacks {
        &self.styles
    }

    /// Register application property ids here, before the first frame.
    pub fn styles_mut(&mut self) -> &mut PropertyStacks {
        &mut self.styles
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &UiConfig {
        &self.config
    }

    pub fn listeners(&self) -> &Listeners {
        &self.listeners
    }

    pub fn animations(&self) -> &AnimationScheduler {
        &self.animations
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Last known pointer position.
    pub fn pointer(&self) -> Offset {
        self.pointer
    }

    /// Time of the current frame, in seconds.
    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Node under the pointer after the last motion event.
    pub fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }

    /// Node capturing pointer input, if any.
    pub fn active(&self) -> Option<NodeId> {
        self.active
    }

    /// Node of the press waiting for its release.
    pub fn pressed(&self) -> Option<NodeId> {
        self.press.map(|p| p.node)
    }

    // ── Nodes ────────────────────────────────────────────────────────

    /// Create `node` and append it under `parent`.
    pub fn add(&mut self, parent: NodeId, node: Node) -> Result<NodeId> {
        self.tree.create_child(parent, node)
    }

    /// Schedule `id` and its subtree for destruction.
    ///
    /// The subtree is marked destroyed and unlinked now; listeners hear about
    /// it and the arena slots are freed at the start of the next frame.
    pub fn destroy(&mut self, id: NodeId) -> Result<()> {
        if id == self.root {
            return Err(UiError::RootImmutable);
        }
        let Some(node) = self.tree.get(id) else {
            return Err(UiError::NoSuchNode(id));
        };
        if node.is_destroyed() {
            warn!(?id, "destroy: node already destroyed");
            return Ok(());
        }
        self.tree.unselect_subtree(id);
        if self
            .active
            .is_some_and(|active| active == id || self.tree.is_ancestor_of(id, active))
        {
            self.deactivate();
        }
        for node in self.tree.walk_depth_first(id) {
            self.tree.set_state(node, NodeFlags::DESTROYED, true);
        }
        self.tree.detach(id)?;
        self.pending_destroy.push_back(id);
        debug!(?id, "node scheduled for destruction");
        Ok(())
    }

    /// Free every node destroyed since the last flush. Returns how many
    /// nodes were freed.
    pub fn flush_destroyed(&mut self) -> usize {
        let mut freed = 0;
        while let Some(id) = self.pending_destroy.pop_front() {
            if !self.tree.contains(id) {
                continue;
            }
            let subtree = self.tree.walk_depth_first(id);
            for &node in &subtree {
                let event = DestroyedEvent { node };
                self.dispatch_node(node, &event);
                self.dispatch_global(&event);
            }
            for &node in &subtree {
                self.animations.stop_animations(node);
                self.listeners.remove_node(node);
                if self.active == Some(node) {
                    self.active = None;
                }
                if self.hovered == Some(node) {
                    self.hovered = None;
                }
                if self.press.is_some_and(|p| p.node == node) {
                    self.press = None;
                }
            }
            freed += self.tree.free_subtree(id).len();
        }
        if freed > 0 {
            debug!(freed, "destroyed nodes freed");
        }
        freed
    }

    /// Select `id` as the end of the selected path.
    pub fn select(&mut self, id: NodeId) -> Result<bool> {
        self.tree.select(id)
    }

    /// Make `id` the active node: it captures motion and release events
    /// until [`deactivate`](Self::deactivate).
    pub fn activate(&mut self, id: NodeId) -> Result<()> {
        if self.tree.get(id).is_none_or(|n| n.is_destroyed()) {
            return Err(UiError::NoSuchNode(id));
        }
        if self.active == Some(id) {
            return Ok(());
        }
        self.deactivate();
        self.tree.set_state(id, NodeFlags::ACTIVE, true);
        self.tree.invalidate_node_region(id);
        self.active = Some(id);
        trace!(?id, "activated");
        Ok(())
    }

    /// Release pointer capture. Returns the node that held it.
    pub fn deactivate(&mut self) -> Option<NodeId> {
        let id = self.active.take()?;
        self.tree.set_state(id, NodeFlags::ACTIVE, false);
        self.tree.invalidate_node_region(id);
        Some(id)
    }

    /// Report an absolute area as needing a redraw.
    pub fn invalidate_region(&mut self, area: Region) {
        self.tree.invalidate_region(area);
    }

    // ── Listeners ────────────────────────────────────────────────────

    /// Register a callback for events of kind `E`.
    pub fn add_listener<E: EventKind>(
        &mut self,
        key: impl Into<ListenerKey>,
        callback: impl Fn(&mut Ui, &E) -> Flow + 'static,
    ) -> ListenerHandle {
        self.listeners.add(key.into(), callback)
    }

    /// Remove a registration of any kind.
    pub fn remove_listener(&mut self, handle: ListenerHandle) -> bool {
        self.listeners.remove(handle)
    }

    /// Raise a named action at `source`. Global listeners run first, then it
    /// bubbles from `source` toward the root until consumed.
    pub fn emit_action(&mut self, source: NodeId, name: impl Into<String>) -> Flow {
        let event = ActionEvent {
            source,
            name: name.into(),
        };
        self.route(Some(source), &event).flow
    }

    /// Tell listeners the data shown by `node` changed. Node listeners run
    /// first, then global ones.
    pub fn notify_data_changed(&mut self, node: NodeId) -> Flow {
        self.tree.invalidate_node_region(node);
        let event = DataChangedEvent { node };
        if self.dispatch_node(node, &event).is_consumed() {
            return Flow::Consumed;
        }
        self.dispatch_global(&event)
    }

    // ── Animations ───────────────────────────────────────────────────

    /// Start `handler` at the current frame time.
    pub fn add_animation_handler(&mut self, handler: AnimationHandler) {
        self.animations.add(handler, self.now);
    }

    /// Snap every animation on `node` to its end state.
    pub fn finish_animations(&mut self, node: NodeId) -> usize {
        self.animations.finish_animations(&mut self.tree, node)
    }

    /// Drop every animation on `node`, leaving its current state.
    pub fn stop_animations(&mut self, node: NodeId) -> usize {
        self.animations.stop_animations(node)
    }

    // ── Frame ────────────────────────────────────────────────────────

    /// Queue an input event for the next frame.
    pub fn queue_event(&mut self, event: InputEvent) {
        self.queue.push_back(event);
    }

    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    /// Dispatch every queued event. Returns how many were handled.
    pub fn process_events(&mut self) -> usize {
        let mut handled = 0;
        while let Some(event) = self.queue.pop_front() {
            self.handle_event(event);
            handled += 1;
        }
        handled
    }

    /// Run one frame at time `now` (seconds).
    ///
    /// A layout error is returned after the frame has still been drawn and
    /// its queued input dispatched.
    pub fn frame(&mut self, backend: &mut dyn RenderBackend, now: f64) -> Result<FrameReport> {
        self.now = now;
        self.frame += 1;

        let destroyed = self.flush_destroyed();
        let animations = self.animations.advance(&mut self.tree, now);

        let tick = TickEvent {
            now,
            frame: self.frame,
        };
        for callback in self.listeners.tick.snapshot_all() {
            callback(self, &tick);
        }

        let layout = self.layout.run(&mut self.tree, self.root);
        if let Err(err) = &layout {
            warn!(%err, frame = self.frame, "layout failed");
        }
        let drawn = self.display(backend);
        let events = self.process_events();
        let layout = layout?;

        let report = FrameReport {
            frame: self.frame,
            destroyed,
            animations,
            layout,
            drawn,
            events,
        };
        debug!(?report, "frame");
        Ok(report)
    }

    /// Draw the tree. In lazy mode a clean frame draws nothing and returns
    /// `None`; otherwise drawing is clipped to the damaged region, which is
    /// reset afterwards.
    pub fn display(&mut self, backend: &mut dyn RenderBackend) -> Option<usize> {
        let lazy = self.tree.damage().is_lazy();
        if lazy && self.tree.damage().is_clean() {
            trace!("display skipped: nothing damaged");
            return None;
        }
        let clip = lazy.then(|| self.tree.damage().region());

        backend.begin_frame(self.viewport);
        let drawn = {
            let mut ctx = DisplayContext::new(&mut *backend, &mut self.styles)
                .with_pointer_state(self.hovered, self.press.map(|p| p.node));
            display_tree(&self.tree, self.root, &mut ctx, clip)
        };
        backend.end_frame();
        self.tree.damage_mut().reset();
        Some(drawn)
    }

    /// Subtrees waiting for the next flush.
    pub fn pending_destroy(&self) -> usize {
        self.pending_destroy.len()
    }

    pub(crate) fn set_viewport(&mut self, size: Size) {
        self.viewport = size;
        if let Err(err) = self.tree.set_size(self.root, size) {
            warn!(%err, "resize root");
        }
        self.tree.invalidate_region(size.to_region());
    }
}

// ---------------------------------------------------------------------------
// Typed listener pairs
// ---------------------------------------------------------------------------

macro_rules! listener_pair {
    ($($add:ident, $remove:ident, $field:ident: $event:ty;)*) => {
        impl Ui {
            $(
                pub fn $add(
                    &mut self,
                    key: impl Into<ListenerKey>,
                    callback: impl Fn(&mut Ui, &$event) -> Flow + 'static,
                ) -> ListenerHandle {
                    self.listeners.add::<$event>(key.into(), callback)
                }

                pub fn $remove(&mut self, handle: ListenerHandle) -> bool {
                    self.listeners.$field.remove(handle)
                }
            )*
        }
    };
}

listener_pair! {
    add_button_listener, remove_button_listener, button: ButtonEvent;
    add_motion_listener, remove_motion_listener, motion: MotionEvent;
    add_click_listener, remove_click_listener, click: ClickEvent;
    add_key_listener, remove_key_listener, key: KeyPressEvent;
    add_data_changed_listener, remove_data_changed_listener, data_changed: DataChangedEvent;
    add_destroyed_listener, remove_destroyed_listener, destroyed: DestroyedEvent;
    add_tick_listener, remove_tick_listener, tick: TickEvent;
    add_action_listener, remove_action_listener, action: ActionEvent;
}
