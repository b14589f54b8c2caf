//! Layout strategies attached to nodes.
//!
//! A [`Layouter`] is stateless per call: it reads the tree, computes
//! rectangles and writes them back through [`Tree::set_rect`], which takes
//! care of invalidation. The same instance may be shared by many nodes.

use taffy::prelude::{FromLength, TaffyAuto};
use taffy::style::{
    AlignItems, AvailableSpace, Dimension, FlexDirection, JustifyContent, LengthPercentage, Style,
};
use taffy::TaffyTree;

use crate::component::{NodeId, Tree};
use crate::error::{Result, UiError};
use crate::geometry::{Offset, Region, Size, Spacing};

// ---------------------------------------------------------------------------
// Layouter trait
// ---------------------------------------------------------------------------

/// A pluggable layout strategy.
pub trait Layouter {
    /// Name used in diagnostics and errors.
    fn name(&self) -> &'static str;

    /// Whether the strategy only makes sense on containers. The engine
    /// refuses to run such a layouter on a leaf.
    fn requires_container(&self) -> bool {
        false
    }

    /// Lay out `id`.
    fn layout(&self, tree: &mut Tree, id: NodeId) -> Result<()>;
}

/// Main axis of a linear layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Axis {
    #[default]
    Horizontal,
    Vertical,
}

fn enabled_children(tree: &Tree, id: NodeId) -> Vec<(NodeId, Region)> {
    tree.child_iter(id)
        .filter_map(|child| {
            let node = tree.get(child)?;
            node.is_enabled().then(|| (child, node.rect()))
        })
        .collect()
}

fn own_rect(tree: &Tree, id: NodeId) -> Result<Region> {
    tree.rect(id).ok_or(UiError::NoSuchNode(id))
}

// ---------------------------------------------------------------------------
// FillParent
// ---------------------------------------------------------------------------

/// Cover the parent's area, minus a margin. A node without a parent is left
/// alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct FillParent {
    pub margin: Spacing,
}

impl Layouter for FillParent {
    fn name(&self) -> &'static str {
        "FillParent"
    }

    fn layout(&self, tree: &mut Tree, id: NodeId) -> Result<()> {
        let Some(parent) = tree.parent(id) else {
            return Ok(());
        };
        let outer = own_rect(tree, parent)?;
        let inner = Region::from_parts(Offset::ZERO, outer.size()).shrink(self.margin);
        tree.set_rect(id, inner)
    }
}

// ---------------------------------------------------------------------------
// FitWidthToChildren
// ---------------------------------------------------------------------------

/// Set the width to the sum of the enabled children's widths, with `gap`
/// between neighbors. The height is left alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct FitWidthToChildren {
    pub gap: i32,
}

impl Layouter for FitWidthToChildren {
    fn name(&self) -> &'static str {
        "FitWidthToChildren"
    }

    fn requires_container(&self) -> bool {
        true
    }

    fn layout(&self, tree: &mut Tree, id: NodeId) -> Result<()> {
        let children = enabled_children(tree, id);
        let gaps = self.gap * (children.len() as i32 - 1).max(0);
        let width = children.iter().map(|(_, r)| r.width).sum::<i32>() + gaps;
        let rect = own_rect(tree, id)?;
        tree.set_size(id, Size::new(width, rect.height))
    }
}

// ---------------------------------------------------------------------------
// FitToChildren
// ---------------------------------------------------------------------------

/// Grow or shrink to the bounding box of the enabled children, plus padding
/// on the right and bottom. Children keep their positions.
#[derive(Debug, Clone, Copy, Default)]
pub struct FitToChildren {
    pub padding: Spacing,
}

impl Layouter for FitToChildren {
    fn name(&self) -> &'static str {
        "FitToChildren"
    }

    fn requires_container(&self) -> bool {
        true
    }

    fn layout(&self, tree: &mut Tree, id: NodeId) -> Result<()> {
        let children = enabled_children(tree, id);
        let right = children.iter().map(|(_, r)| r.right()).max().unwrap_or(0);
        let bottom = children.iter().map(|(_, r)| r.bottom()).max().unwrap_or(0);
        let size = Size::new(
            right.max(0) + self.padding.right,
            bottom.max(0) + self.padding.bottom,
        );
        tree.set_size(id, size)
    }
}

// ---------------------------------------------------------------------------
// Stack
// ---------------------------------------------------------------------------

/// Place the enabled children one after another along `axis`, `gap` apart,
/// inside `padding`. With `stretch`, children also take the full inner
/// extent on the cross axis.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stack {
    pub axis: Axis,
    pub gap: i32,
    pub padding: Spacing,
    pub stretch: bool,
}

impl Stack {
    pub fn row(gap: i32) -> Self {
        Self {
            axis: Axis::Horizontal,
            gap,
            ..Self::default()
        }
    }

    pub fn column(gap: i32) -> Self {
        Self {
            axis: Axis::Vertical,
            gap,
            ..Self::default()
        }
    }
}

impl Layouter for Stack {
    fn name(&self) -> &'static str {
        "Stack"
    }

    fn requires_container(&self) -> bool {
        true
    }

    fn layout(&self, tree: &mut Tree, id: NodeId) -> Result<()> {
        let inner = Region::from_parts(Offset::ZERO, own_rect(tree, id)?.size()).shrink(self.padding);
        let mut cursor = match self.axis {
            Axis::Horizontal => inner.x,
            Axis::Vertical => inner.y,
        };
        for (child, rect) in enabled_children(tree, id) {
            let placed = match self.axis {
                Axis::Horizontal => {
                    let height = if self.stretch { inner.height } else { rect.height };
                    Region::new(cursor, inner.y, rect.width, height)
                }
                Axis::Vertical => {
                    let width = if self.stretch { inner.width } else { rect.width };
                    Region::new(inner.x, cursor, width, rect.height)
                }
            };
            cursor += match self.axis {
                Axis::Horizontal => placed.width,
                Axis::Vertical => placed.height,
            } + self.gap;
            tree.set_rect(child, placed)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Flex
// ---------------------------------------------------------------------------

/// Distribution of free space along the main axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Justify {
    #[default]
    Start,
    Center,
    End,
    SpaceBetween,
}

/// Flexbox over the enabled children, solved by taffy.
///
/// Children keep their current size unless `grow` is set, in which case the
/// main axis is shared equally between them. A fresh taffy tree is built for
/// every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct Flex {
    pub axis: Axis,
    pub gap: i32,
    pub padding: Spacing,
    pub justify: Justify,
    pub grow: bool,
}

fn flex_error(err: taffy::TaffyError) -> UiError {
    UiError::Flex(err.to_string())
}

fn length(value: i32) -> LengthPercentage {
    LengthPercentage::from_length(value as f32)
}

impl Flex {
    fn child_style(&self, rect: Region) -> Style {
        let width = Dimension::from_length(rect.width as f32);
        let height = Dimension::from_length(rect.height as f32);
        let size = match (self.grow, self.axis) {
            (false, _) => taffy::geometry::Size { width, height },
            (true, Axis::Horizontal) => taffy::geometry::Size { width: Dimension::AUTO, height },
            (true, Axis::Vertical) => taffy::geometry::Size { width, height: Dimension::AUTO },
        };
        Style {
            size,
            flex_grow: if self.grow { 1.0 } else { 0.0 },
            flex_shrink: 0.0,
            flex_basis: if self.grow { Dimension::from_length(0.0) } else { Dimension::AUTO },
            ..Default::default()
        }
    }

    fn container_style(&self, size: Size) -> Style {
        Style {
            flex_direction: match self.axis {
                Axis::Horizontal => FlexDirection::Row,
                Axis::Vertical => FlexDirection::Column,
            },
            size: taffy::geometry::Size {
                width: Dimension::from_length(size.width as f32),
                height: Dimension::from_length(size.height as f32),
            },
            padding: taffy::geometry::Rect {
                left: length(self.padding.left),
                right: length(self.padding.right),
                top: length(self.padding.top),
                bottom: length(self.padding.bottom),
            },
            gap: taffy::geometry::Size {
                width: length(self.gap),
                height: length(self.gap),
            },
            justify_content: Some(match self.justify {
                Justify::Start => JustifyContent::FlexStart,
                Justify::Center => JustifyContent::Center,
                Justify::End => JustifyContent::FlexEnd,
                Justify::SpaceBetween => JustifyContent::SpaceBetween,
            }),
            align_items: Some(AlignItems::FlexStart),
            ..Default::default()
        }
    }
}

impl Layouter for Flex {
    fn name(&self) -> &'static str {
        "Flex"
    }

    fn requires_container(&self) -> bool {
        true
    }

    fn layout(&self, tree: &mut Tree, id: NodeId) -> Result<()> {
        let size = own_rect(tree, id)?.size();
        let children = enabled_children(tree, id);

        let mut taffy: TaffyTree<()> = TaffyTree::new();
        let mut leaves = Vec::with_capacity(children.len());
        for (_, rect) in &children {
            leaves.push(taffy.new_leaf(self.child_style(*rect)).map_err(flex_error)?);
        }
        let root = taffy
            .new_with_children(self.container_style(size), &leaves)
            .map_err(flex_error)?;
        taffy
            .compute_layout(
                root,
                taffy::geometry::Size {
                    width: AvailableSpace::Definite(size.width as f32),
                    height: AvailableSpace::Definite(size.height as f32),
                },
            )
            .map_err(flex_error)?;

        for (leaf, (child, _)) in leaves.into_iter().zip(children) {
            let solved = taffy.layout(leaf).map_err(flex_error)?;
            let rect = Region::new(
                solved.location.x.round() as i32,
                solved.location.y.round() as i32,
                solved.size.width.round() as i32,
                solved.size.height.round() as i32,
            );
            tree.set_rect(child, rect)?;
        }
        Ok(())
    }
}
