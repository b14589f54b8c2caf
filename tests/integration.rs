//! Integration tests for arbor-ui.
//!
//! These exercise the public API from outside the crate: the tree, layout,
//! style stacks, routing, selection, damage and animation working together
//! through `Ui` and the headless `Pilot`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use arbor_ui::animation::{AnimationHandler, AnimationHook, AnimationScheduler, MoveAnimation};
use arbor_ui::component::{Node, NodeId, Tree};
use arbor_ui::event::{ButtonMask, Flow, InputEvent, Key, ListenerKey, MouseButton};
use arbor_ui::geometry::{Offset, Region, Size, Spacing};
use arbor_ui::layout::{FitToChildren, FitWidthToChildren, LayoutEngine, Layouter, Stack};
use arbor_ui::style::{
    ids, Color, PropertyId, PropertyKind, PropertyStacks, PropertyValue, StyleGuard, StyleProperty,
};
use arbor_ui::testing::{tree_to_string, DrawCall, Pilot, RecordingBackend};
use arbor_ui::widget::{Label, ShapePanel, WidgetExt};
use arbor_ui::{Ui, UiConfig, UiError};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use proptest::sample::Index;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn insert_after_links_siblings() {
    let mut tree = Tree::default();
    let c = tree.insert(Node::container());
    let a = tree.insert(Node::leaf());
    let b = tree.insert(Node::leaf());
    tree.append(c, a).unwrap();
    tree.insert_after(c, b, Some(a)).unwrap();

    let container = tree.get(c).unwrap().as_container().unwrap();
    assert_eq!(container.first(), Some(a));
    assert_eq!(container.last(), Some(b));
    assert_eq!(tree.next_sibling(a), Some(b));
    assert_eq!(tree.prev_sibling(b), Some(a));
}

#[test]
fn color_stack_push_pop() {
    let id = PropertyId::new(5);
    let mut stacks = PropertyStacks::new();
    stacks.register(id, PropertyValue::Color(Color::GREEN));

    stacks.push(id, PropertyValue::Color(Color::RED));
    stacks.push(id, PropertyValue::Color(Color::BLUE));
    assert!(stacks.pop(id, PropertyKind::Color));
    assert_eq!(stacks.color(id), Color::RED);
    assert!(stacks.pop(id, PropertyKind::Color));
    assert_eq!(stacks.color(id), Color::GREEN);

    // Underflow is logged and ignored.
    assert!(!stacks.pop(id, PropertyKind::Color));
    assert_eq!(stacks.color(id), Color::GREEN);
}

#[test]
fn width_follows_children_in_one_run() {
    let mut tree = Tree::default();
    let row = tree.insert(
        Node::container().with_layouter(Rc::new(FitWidthToChildren { gap: 0 })),
    );
    for (x, width) in [(0, 10), (10, 20), (30, 30)] {
        tree.create_child(row, Node::leaf().with_rect(Region::new(x, 0, width, 5)))
            .unwrap();
    }
    let report = LayoutEngine::default().run(&mut tree, row).unwrap();
    assert!(report.converged);
    assert_eq!(tree.rect(row).unwrap().width, 60);
}

#[test]
fn consumed_press_does_not_reach_parent() {
    init_tracing();
    let mut ui = Ui::new(Size::new(100, 100));
    let root = ui.root();
    let parent = ui
        .add(root, Node::container().with_rect(Region::new(0, 0, 80, 80)))
        .unwrap();
    let x = ui
        .add(parent, Node::leaf().with_rect(Region::new(10, 10, 20, 20)))
        .unwrap();

    let parent_calls = Rc::new(Cell::new(0));
    let counter = parent_calls.clone();
    ui.add_button_listener(x, |_, _| Flow::Consumed);
    ui.add_button_listener(parent, move |_, _| {
        counter.set(counter.get() + 1);
        Flow::Continue
    });

    let flow = ui.handle_event(InputEvent::press(
        MouseButton::Left,
        Offset::new(15, 15),
    ));
    assert!(flow.is_consumed());
    assert_eq!(parent_calls.get(), 0);
}

#[test]
fn selection_marks_path_only() {
    let mut tree = Tree::default();
    let root = tree.insert(Node::container());
    let mid = tree.create_child(root, Node::container()).unwrap();
    let mid_sibling = tree.create_child(root, Node::container()).unwrap();
    let leaf = tree.create_child(mid, Node::leaf().selectable(true)).unwrap();
    let cousin = tree
        .create_child(mid_sibling, Node::leaf().selectable(true))
        .unwrap();

    tree.select(cousin).unwrap();
    tree.select(leaf).unwrap();

    for id in [leaf, mid, root] {
        assert!(tree.get(id).unwrap().is_selected());
    }
    assert!(!tree.get(mid_sibling).unwrap().is_selected());
    assert!(!tree.get(cousin).unwrap().is_selected());
}

#[test]
fn overdue_animation_finishes_exactly_once() {
    struct Counting(Rc<Cell<u32>>);
    impl AnimationHook for Counting {
        fn update(&mut self, _: &mut Tree, _: NodeId, _: f64) -> bool {
            true
        }
        fn finish(&mut self, _: &mut Tree, _: NodeId) {
            self.0.set(self.0.get() + 1);
        }
    }

    let mut tree = Tree::default();
    let node = tree.insert(Node::leaf());
    let finished = Rc::new(Cell::new(0));
    let mut scheduler = AnimationScheduler::new();
    scheduler.add(AnimationHandler::new(node, 1.0, Counting(finished.clone())), 0.0);

    assert_eq!(scheduler.advance(&mut tree, 1.5), 0);
    assert!(scheduler.is_empty());
    scheduler.finish_animations(&mut tree, node);
    assert_eq!(finished.get(), 1);
}

// ---------------------------------------------------------------------------
// Whole-frame behavior
// ---------------------------------------------------------------------------

#[test]
fn drag_moves_the_active_node() {
    init_tracing();
    let mut pilot = Pilot::new(Size::new(100, 100));
    let root = pilot.ui().root();
    let handle = pilot
        .ui_mut()
        .add(root, Node::leaf().named("handle").with_rect(Region::new(10, 10, 10, 10)))
        .unwrap();

    pilot.ui_mut().add_button_listener(handle, move |ui, e| {
        if e.pressed {
            let _ = ui.activate(handle);
        } else {
            ui.deactivate();
        }
        Flow::Consumed
    });
    pilot.ui_mut().add_motion_listener(handle, move |ui, e| {
        if ui.active() != Some(handle) {
            return Flow::Continue;
        }
        let Some(rect) = ui.tree().rect(handle) else {
            return Flow::Continue;
        };
        let _ = ui.tree_mut().set_position(handle, rect.offset() + e.delta);
        Flow::Consumed
    });

    pilot.drag(Offset::new(12, 12), Offset::new(30, 25));
    assert_eq!(pilot.ui().tree().rect(handle), Some(Region::new(28, 23, 10, 10)));
    assert_eq!(pilot.ui().active(), None);
}

#[test]
fn lazy_frames_clip_to_damage() {
    let mut pilot = Pilot::with_config(Size::new(100, 100), UiConfig::new().with_lazy_rendering(true));
    let root = pilot.ui().root();
    let panel = pilot
        .ui_mut()
        .add(
            root,
            ShapePanel::new(ids::BACKGROUND_SHAPE)
                .into_leaf()
                .with_rect(Region::new(0, 0, 10, 10)),
        )
        .unwrap();
    pilot.frame().unwrap();
    pilot.backend_mut().clear();

    let clean = pilot.advance(0.1).unwrap();
    assert_eq!(clean.drawn, None);
    assert!(pilot.backend().calls().is_empty());

    pilot.ui_mut().tree_mut().set_position(panel, Offset::new(50, 50)).unwrap();
    let report = pilot.advance(0.1).unwrap();
    assert_eq!(report.drawn, Some(1));
    let clip = pilot.backend().calls().iter().find_map(|c| match c {
        DrawCall::Scissor(Some(clip)) => Some(*clip),
        _ => None,
    });
    assert_eq!(clip, Some(Region::new(0, 0, 60, 60)));
    assert!(pilot.ui().tree().damage().is_clean());
}

#[test]
fn animation_runs_through_frames() {
    let mut pilot = Pilot::new(Size::new(100, 100));
    let root = pilot.ui().root();
    let node = pilot
        .ui_mut()
        .add(root, Node::leaf().with_rect(Region::new(0, 0, 5, 5)))
        .unwrap();
    pilot.ui_mut().add_animation_handler(AnimationHandler::new(
        node,
        1.0,
        MoveAnimation {
            from: Offset::new(0, 0),
            to: Offset::new(40, 0),
        },
    ));

    let report = pilot.advance(0.5).unwrap();
    assert_eq!(report.animations, 1);
    assert_eq!(pilot.ui().tree().rect(node).unwrap().x, 20);

    let report = pilot.advance(0.6).unwrap();
    assert_eq!(report.animations, 0);
    assert_eq!(pilot.ui().tree().rect(node).unwrap().x, 40);
}

#[test]
fn tab_cycles_through_enabled_selectables() {
    let mut pilot = Pilot::new(Size::new(100, 100));
    let root = pilot.ui().root();
    let ui = pilot.ui_mut();
    let form = ui.add(root, Node::container()).unwrap();
    let first = ui.add(form, Node::leaf().selectable(true)).unwrap();
    let disabled = ui.add(form, Node::leaf().selectable(true).enabled(false)).unwrap();
    let last = ui.add(form, Node::leaf().selectable(true)).unwrap();
    ui.add(form, Label::new("caption").into_leaf()).unwrap();

    let mut visited = Vec::new();
    for _ in 0..3 {
        pilot.key(Key::Tab);
        visited.extend(pilot.ui().tree().selected_leaf());
    }
    assert_eq!(visited, vec![first, last, first]);
    assert!(!visited.contains(&disabled));
}

#[test]
fn destroyed_nodes_are_forgotten() {
    let mut pilot = Pilot::new(Size::new(100, 100));
    let root = pilot.ui().root();
    let panel = pilot
        .ui_mut()
        .add(root, Node::container().with_rect(Region::new(0, 0, 50, 50)))
        .unwrap();
    let button = pilot
        .ui_mut()
        .add(panel, Node::leaf().selectable(true).with_rect(Region::new(0, 0, 10, 10)))
        .unwrap();
    pilot.move_to(Offset::new(5, 5));
    pilot.press(Offset::new(5, 5));
    assert_eq!(pilot.ui().hovered(), Some(button));

    let ui = pilot.ui_mut();
    ui.destroy(panel).unwrap();
    assert_eq!(ui.destroy(root), Err(UiError::RootImmutable));
    pilot.frame().unwrap();

    let ui = pilot.ui();
    assert!(ui.tree().get(button).is_none());
    assert_eq!(ui.hovered(), None);
    assert_eq!(ui.pressed(), None);
    assert_eq!(ui.tree().selected_leaf(), Some(root));
    assert_eq!(pilot.ui().tree().children(root), Vec::<NodeId>::new());
}

#[test]
fn listener_added_during_dispatch_waits_for_next_event() {
    let mut ui = Ui::new(Size::new(10, 10));
    let calls = Rc::new(RefCell::new(Vec::new()));
    let outer = calls.clone();
    ui.add_action_listener(ListenerKey::Global, move |ui, _| {
        outer.borrow_mut().push("outer");
        let inner = outer.clone();
        ui.add_action_listener(ListenerKey::Global, move |_, _| {
            inner.borrow_mut().push("inner");
            Flow::Continue
        });
        Flow::Continue
    });
    let root = ui.root();
    ui.emit_action(root, "first");
    assert_eq!(*calls.borrow(), vec!["outer"]);
    ui.emit_action(root, "second");
    assert_eq!(*calls.borrow(), vec!["outer", "outer", "inner"]);
}

#[test]
fn stacked_layout_snapshot() {
    let mut ui = Ui::new(Size::new(200, 100));
    let root = ui.root();
    let column = ui
        .add(
            root,
            Node::container()
                .named("column")
                .with_layouter(Rc::new(Stack::column(2)))
                .with_layouter(Rc::new(FitToChildren {
                    padding: Spacing::all(1),
                })),
        )
        .unwrap();
    for (name, height) in [("title", 3), ("body", 10), ("footer", 2)] {
        ui.add(column, Node::leaf().named(name).with_size(Size::new(30, height)))
            .unwrap();
    }
    ui.frame(&mut RecordingBackend::default(), 0.0)
        .unwrap();

    insta::assert_snapshot!(tree_to_string(ui.tree(), root), @r"
    root 0,0 200x100
      column 0,0 31x20
        title 0,0 30x3
        body 0,5 30x10
        footer 0,17 30x2
    ");
}

// ---------------------------------------------------------------------------
// Properties over randomized operation sequences
// ---------------------------------------------------------------------------

/// One structural edit. Indices pick from the nodes created so far.
#[derive(Debug, Clone)]
enum Edit {
    Add { parent: Index, container: bool, selectable: bool },
    Reparent { child: Index, parent: Index },
    Detach(Index),
    Raise(Index),
    InsertFront { child: Index, parent: Index },
    Select(Index),
    Tab { backwards: bool },
}

fn structural_edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        2 => (any::<Index>(), any::<bool>(), any::<bool>())
            .prop_map(|(parent, container, selectable)| Edit::Add { parent, container, selectable }),
        1 => (any::<Index>(), any::<Index>())
            .prop_map(|(child, parent)| Edit::Reparent { child, parent }),
        1 => any::<Index>().prop_map(Edit::Detach),
        1 => any::<Index>().prop_map(Edit::Raise),
        1 => (any::<Index>(), any::<Index>())
            .prop_map(|(child, parent)| Edit::InsertFront { child, parent }),
    ]
}

fn selection_edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        3 => any::<Index>().prop_map(Edit::Select),
        1 => any::<bool>().prop_map(|backwards| Edit::Tab { backwards }),
        3 => structural_edit(),
    ]
}

/// A tree under edit, with the ids it has handed out.
struct Scratch {
    tree: Tree,
    containers: Vec<NodeId>,
    all: Vec<NodeId>,
}

impl Scratch {
    fn new(root: Node) -> Self {
        let mut tree = Tree::default();
        let root = tree.insert(root);
        Self { tree, containers: vec![root], all: vec![root] }
    }

    fn root(&self) -> NodeId {
        self.containers[0]
    }

    /// Apply `edit`. Rejected moves (cycles, the root) must leave the tree
    /// untouched, so their errors are ignored.
    fn apply(&mut self, edit: &Edit) {
        match *edit {
            Edit::Add { parent, container, selectable } => {
                let node = if container { Node::container() } else { Node::leaf() };
                let parent = *parent.get(&self.containers);
                let id = self.tree.create_child(parent, node.selectable(selectable)).unwrap();
                self.all.push(id);
                if container {
                    self.containers.push(id);
                }
            }
            Edit::Reparent { child, parent } => {
                let _ = self.tree.reparent(*child.get(&self.all), *parent.get(&self.containers));
            }
            Edit::Detach(child) => {
                let _ = self.tree.detach(*child.get(&self.all));
            }
            Edit::Raise(id) => {
                let _ = self.tree.bring_to_front(*id.get(&self.all));
            }
            Edit::InsertFront { child, parent } => {
                let parent = *parent.get(&self.containers);
                let anchor = self.tree.children(parent).first().copied();
                let _ = self.tree.insert_after(parent, *child.get(&self.all), anchor);
            }
            Edit::Select(id) => {
                let _ = self.tree.select(*id.get(&self.all));
            }
            Edit::Tab { backwards } => {
                self.tree.focus_next(backwards);
            }
        }
    }

    /// Every selected node is the root or has a selected parent, and no node
    /// has more than one selected child.
    fn selection_problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        for &id in &self.all {
            let node = self.tree.get(id).unwrap();
            if node.is_selected() && id != self.root() {
                match self.tree.parent(id) {
                    Some(parent) if self.tree.get(parent).unwrap().is_selected() => {}
                    parent => problems.push(format!("{id:?} selected under {parent:?}")),
                }
            }
            let selected_children = self
                .tree
                .child_iter(id)
                .filter(|&c| self.tree.get(c).unwrap().is_selected())
                .count();
            if selected_children > 1 {
                problems.push(format!("{id:?} has {selected_children} selected children"));
            }
        }
        problems
    }
}

#[derive(Debug, Clone)]
enum LayoutPiece {
    Container { parent: Index, layouter: u8 },
    Leaf { parent: Index, width: i32, height: i32 },
}

fn layout_piece() -> impl Strategy<Value = LayoutPiece> {
    prop_oneof![
        1 => (any::<Index>(), 0u8..3)
            .prop_map(|(parent, layouter)| LayoutPiece::Container { parent, layouter }),
        2 => (any::<Index>(), 1i32..=20, 1i32..=20)
            .prop_map(|(parent, width, height)| LayoutPiece::Leaf { parent, width, height }),
    ]
}

/// A nested run of style pushes: `pushes` happen in one guard, `nested`
/// scopes run inside it.
#[derive(Debug, Clone)]
struct StyleScope {
    pushes: Vec<StylePush>,
    nested: Vec<StyleScope>,
}

#[derive(Debug, Clone)]
enum StylePush {
    Color { slot: usize, red: u8 },
    Scalar { slot: usize, value: u8 },
}

fn style_push() -> impl Strategy<Value = StylePush> {
    prop_oneof![
        (0usize..3, any::<u8>()).prop_map(|(slot, red)| StylePush::Color { slot, red }),
        (0usize..2, 0u8..10).prop_map(|(slot, value)| StylePush::Scalar { slot, value }),
    ]
}

fn style_scope() -> impl Strategy<Value = StyleScope> {
    let flat = prop::collection::vec(style_push(), 0..4)
        .prop_map(|pushes| StyleScope { pushes, nested: Vec::new() });
    flat.prop_recursive(4, 64, 3, |inner| {
        (prop::collection::vec(style_push(), 0..4), prop::collection::vec(inner, 0..3))
            .prop_map(|(pushes, nested)| StyleScope { pushes, nested })
    })
}

const STYLE_COLORS: [PropertyId; 3] = [ids::BACKGROUND, ids::TEXT, PropertyId::new(40)];
const STYLE_SCALARS: [PropertyId; 2] = [ids::FRAME_WIDTH, ids::SPACING];

fn run_scope(stacks: &mut PropertyStacks, scope: &StyleScope) {
    let mut guard = StyleGuard::new(stacks);
    for push in &scope.pushes {
        let property = match *push {
            StylePush::Color { slot, red } => {
                StyleProperty::color(STYLE_COLORS[slot], Color::rgb(red, 0, 0))
            }
            StylePush::Scalar { slot, value } => {
                StyleProperty::scalar(STYLE_SCALARS[slot], f32::from(value))
            }
        };
        guard.push(&property);
    }
    for inner in &scope.nested {
        run_scope(&mut guard, inner);
    }
}

fn damage_area() -> impl Strategy<Value = Region> {
    (0i32..250, 0i32..250, 1i32..=50, 1i32..=50).prop_map(|(x, y, w, h)| Region::new(x, y, w, h))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn tree_links_stay_consistent(edits in prop::collection::vec(structural_edit(), 1..300)) {
        let mut scratch = Scratch::new(Node::container());
        for edit in &edits {
            scratch.apply(edit);
            let problems = scratch.tree.check_links();
            prop_assert!(problems.is_empty(), "after {:?}: {:#?}", edit, problems);
        }
    }

    #[test]
    fn layout_reaches_a_fixed_point(pieces in prop::collection::vec(layout_piece(), 1..60)) {
        let mut scratch = Scratch::new(Node::container().with_rect(Region::new(0, 0, 500, 500)));
        for piece in &pieces {
            match *piece {
                LayoutPiece::Container { parent, layouter } => {
                    let layouter: Rc<dyn Layouter> = match layouter {
                        0 => Rc::new(Stack::row(1)),
                        1 => Rc::new(Stack::column(1)),
                        _ => Rc::new(FitToChildren::default()),
                    };
                    let parent = *parent.get(&scratch.containers);
                    let id = scratch
                        .tree
                        .create_child(parent, Node::container().with_layouter(layouter))
                        .unwrap();
                    scratch.containers.push(id);
                }
                LayoutPiece::Leaf { parent, width, height } => {
                    let parent = *parent.get(&scratch.containers);
                    let leaf = Node::leaf().with_size(Size::new(width, height));
                    scratch.tree.create_child(parent, leaf).unwrap();
                }
            }
        }

        let root = scratch.root();
        let engine = LayoutEngine::default();
        let report = engine.run(&mut scratch.tree, root).unwrap();
        prop_assert!(report.converged);
        prop_assert_eq!(engine.pass(&mut scratch.tree, root).unwrap(), 0);
        prop_assert!(!scratch.tree.needs_layout(root));
    }

    #[test]
    fn style_stacks_return_to_defaults(scopes in prop::collection::vec(style_scope(), 1..8)) {
        let mut stacks = PropertyStacks::new();
        for id in STYLE_COLORS {
            stacks.register(id, PropertyValue::Color(Color::BLACK));
        }
        for id in STYLE_SCALARS {
            stacks.register(id, PropertyValue::Scalar(1.0));
        }

        for scope in &scopes {
            run_scope(&mut stacks, scope);
            prop_assert_eq!(stacks.depth(), 0);
            for id in STYLE_COLORS {
                prop_assert_eq!(stacks.color(id), Color::BLACK);
            }
            for id in STYLE_SCALARS {
                prop_assert_eq!(stacks.scalar(id), 1.0);
            }
        }
    }

    #[test]
    fn at_most_one_selected_path(edits in prop::collection::vec(selection_edit(), 1..200)) {
        let mut scratch = Scratch::new(Node::container().selectable(true));
        for edit in &edits {
            scratch.apply(edit);
            let problems = scratch.selection_problems();
            prop_assert!(problems.is_empty(), "after {:?}: {:#?}", edit, problems);
        }
    }

    #[test]
    fn damage_grows_until_redraw(
        batches in prop::collection::vec(prop::collection::vec(damage_area(), 1..9), 1..10),
    ) {
        let mut ui = Ui::with_config(Size::new(300, 300), UiConfig::new().with_lazy_rendering(true));
        let mut backend = RecordingBackend::default();

        for batch in &batches {
            ui.display(&mut backend);
            prop_assert!(ui.tree().damage().is_clean());

            for (seen, area) in batch.iter().enumerate() {
                ui.invalidate_region(*area);
                let region = ui.tree().damage().region();
                for earlier in &batch[..=seen] {
                    prop_assert!(region.contains_region(*earlier));
                }
            }
        }
    }
}

#[test]
fn reparenting_a_selected_node_keeps_one_path() {
    let mut scratch = Scratch::new(Node::container());
    let root = scratch.root();
    let left = scratch.tree.create_child(root, Node::container()).unwrap();
    let right = scratch.tree.create_child(root, Node::container()).unwrap();
    let a = scratch.tree.create_child(left, Node::leaf().selectable(true)).unwrap();
    let c = scratch.tree.create_child(right, Node::leaf().selectable(true)).unwrap();
    scratch.all.extend([left, right, a, c]);

    scratch.tree.select(a).unwrap();
    scratch.tree.reparent(a, right).unwrap();
    assert_eq!(scratch.selection_problems(), Vec::<String>::new());

    scratch.tree.select(a).unwrap();
    scratch.tree.detach(left).unwrap();
    scratch.tree.select(c).unwrap();
    scratch.tree.append(root, left).unwrap();
    assert_eq!(scratch.selection_problems(), Vec::<String>::new());
    assert_eq!(scratch.tree.selected_nodes(), vec![root, right, c]);
}

#[test]
fn hover_damage_lands_in_the_tracked_region() {
    let mut ui = Ui::with_config(Size::new(300, 300), UiConfig::new().with_lazy_rendering(true));
    let mut backend = RecordingBackend::default();
    let root = ui.root();
    let node = ui
        .add(root, Node::leaf().with_rect(Region::new(100, 100, 20, 20)))
        .unwrap();
    ui.display(&mut backend);
    ui.handle_event(InputEvent::motion(Offset::new(105, 105), ButtonMask::empty()));
    assert_eq!(ui.hovered(), Some(node));
    assert!(ui
        .tree()
        .damage()
        .region()
        .contains_region(Region::new(100, 100, 20, 20)));
}
