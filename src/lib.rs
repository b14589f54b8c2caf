//! # arbor-ui
//!
//! The runtime core of a retained-mode UI toolkit: a tree of components,
//! a layout engine that runs to convergence, a cascading style system applied
//! while drawing, event routing with a selection state machine, and damage
//! tracking for partial redraws.
//!
//! Everything is driven from one per-frame entry point, [`Ui::frame`]:
//! destroyed nodes are flushed, animations advance, layout converges, the
//! tree is drawn through a [`RenderBackend`](render::RenderBackend), then
//! queued input is dispatched.
//!
//! ## Core Systems
//!
//! - **[`component`]**: slotmap-backed node arena with intrusive child lists
//! - **[`layout`]**: per-node layout strategies and the convergence loop
//! - **[`style`]**: property stacks, style properties and shapes
//! - **[`render`]**: backend contract, scissor stack, damage tracker, display traversal
//! - **[`event`]**: input types, listener registries, hit-testing, selection, routing
//! - **[`animation`]**: per-frame animation handlers
//! - **[`widget`]**: the `Widget` trait and basic widgets
//! - **[`ui`]**: configuration and the toplevel [`Ui`]
//! - **[`testing`]**: recording backend, headless `Pilot`, tree dumps
//!
//! ```
//! use arbor_ui::component::Node;
//! use arbor_ui::geometry::{Region, Size};
//! use arbor_ui::style::ids;
//! use arbor_ui::testing::RecordingBackend;
//! use arbor_ui::widget::{ShapePanel, WidgetExt};
//! use arbor_ui::Ui;
//!
//! let mut ui = Ui::new(Size::new(320, 200));
//! let root = ui.root();
//! let panel = ShapePanel::new(ids::BACKGROUND_SHAPE)
//!     .into_container()
//!     .with_rect(Region::new(10, 10, 100, 50));
//! ui.add(root, panel).unwrap();
//!
//! let report = ui.frame(&mut RecordingBackend::default(), 0.0).unwrap();
//! assert!(report.layout.converged);
//! assert_eq!(report.drawn, Some(1));
//! ```

// Foundation
pub mod error;
pub mod geometry;

// Core systems
pub mod component;
pub mod layout;
pub mod style;

// Drawing
pub mod render;
pub mod widget;

// Input and time
pub mod animation;
pub mod event;

// Toplevel
pub mod ui;

pub mod testing;

pub use error::{Result, UiError};
pub use ui::{FrameReport, Ui, UiConfig};
