//! Geometry and invalidation: rectangles, absolute positions, layout dirty
//! bits, flags, and the damage entry point.

use tracing::{trace, warn};

use super::node::{NodeFlags, NodeId};
use super::tree::Tree;
use crate::error::{Result, UiError};
use crate::geometry::{Offset, Region, Size};

impl Tree {
    /// Parent-relative rectangle of `id`.
    pub fn rect(&self, id: NodeId) -> Option<Region> {
        self.get(id).map(|n| n.rect)
    }

    /// Replace the parent-relative rectangle of `id`.
    ///
    /// Always invalidates the node's own layout. A size change also
    /// invalidates the whole subtree (children may depend on this size) and
    /// the parent's own layout (the parent may depend on this size). The old
    /// and new absolute areas are both reported as damage.
    pub fn set_rect(&mut self, id: NodeId, rect: Region) -> Result<()> {
        let Some(node) = self.get(id) else {
            return Err(UiError::NoSuchNode(id));
        };
        let old = node.rect;
        if old == rect {
            return Ok(());
        }
        let parent = node.parent;

        self.invalidate_node_region(id);
        self.nodes[id].rect = rect;
        self.invalidate_layout(id);
        if old.size() != rect.size() {
            self.invalidate_subtree_layout(id);
            if let Some(parent) = parent {
                self.invalidate_layout(parent);
            }
        }
        if old.offset() != rect.offset() {
            self.invalidate_absolute_positions(id);
        }
        self.invalidate_node_region(id);
        Ok(())
    }

    /// Move `id` within its parent, keeping its size.
    pub fn set_position(&mut self, id: NodeId, position: Offset) -> Result<()> {
        let rect = self.rect(id).ok_or(UiError::NoSuchNode(id))?;
        self.set_rect(id, Region::from_parts(position, rect.size()))
    }

    /// Resize `id`, keeping its position.
    pub fn set_size(&mut self, id: NodeId, size: Size) -> Result<()> {
        let rect = self.rect(id).ok_or(UiError::NoSuchNode(id))?;
        self.set_rect(id, Region::from_parts(rect.offset(), size))
    }

    /// Absolute position of `id`, recomputed lazily and cached on the node.
    pub fn absolute_position(&self, id: NodeId) -> Option<Offset> {
        let node = self.get(id)?;
        if let Some(cached) = node.abs_pos.get() {
            return Some(cached);
        }
        let base = match node.parent {
            Some(parent) => self.absolute_position(parent)?,
            None => Offset::ZERO,
        };
        let position = base + node.rect.offset();
        node.abs_pos.set(Some(position));
        Some(position)
    }

    /// Rectangle of `id` in absolute coordinates.
    pub fn absolute_rect(&self, id: NodeId) -> Option<Region> {
        let rect = self.rect(id)?;
        Some(Region::from_parts(self.absolute_position(id)?, rect.size()))
    }

    /// Drop the cached absolute position of `id` and its descendants.
    pub(crate) fn invalidate_absolute_positions(&mut self, id: NodeId) {
        for node in self.walk_depth_first(id) {
            if let Some(n) = self.get(node) {
                n.abs_pos.set(None);
            }
        }
    }

    // ── Layout dirty bits ────────────────────────────────────────────

    /// Mark the own layout of `id` invalid and tell its ancestors.
    pub fn invalidate_layout(&mut self, id: NodeId) {
        let Some(node) = self.get_mut(id) else {
            return;
        };
        node.flags.remove(NodeFlags::LAYOUT_VALID);
        let parent = node.parent;
        self.propagate_subtree_dirty(parent);
    }

    /// Mark every node in the subtree at `id` as needing layout.
    pub fn invalidate_subtree_layout(&mut self, id: NodeId) {
        for node in self.walk_depth_first(id) {
            if let Some(n) = self.get_mut(node) {
                n.flags.remove(NodeFlags::LAYOUT_VALID | NodeFlags::SUBTREE_LAYOUT_VALID);
            }
        }
        let parent = self.parent(id);
        self.propagate_subtree_dirty(parent);
    }

    /// Clear the subtree-valid bit upward, stopping at the first ancestor that
    /// already has it cleared: everything above that one is cleared too.
    pub(crate) fn propagate_subtree_dirty(&mut self, from: Option<NodeId>) {
        let mut current = from;
        while let Some(id) = current {
            let Some(node) = self.get_mut(id) else {
                return;
            };
            if !node.flags.contains(NodeFlags::SUBTREE_LAYOUT_VALID) {
                return;
            }
            node.flags.remove(NodeFlags::SUBTREE_LAYOUT_VALID);
            current = node.parent;
        }
    }

    /// Whether `id` or anything below it still needs layout.
    pub fn needs_layout(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(|n| {
            !n.flags.contains(NodeFlags::LAYOUT_VALID | NodeFlags::SUBTREE_LAYOUT_VALID)
        })
    }

    // ── Flags ────────────────────────────────────────────────────────

    /// Enable or disable `id`. Disabled subtrees are neither laid out, drawn,
    /// hit-tested nor selected.
    pub fn set_enabled(&mut self, id: NodeId, enabled: bool) -> Result<()> {
        let Some(node) = self.get(id) else {
            return Err(UiError::NoSuchNode(id));
        };
        if node.is_enabled() == enabled {
            return Ok(());
        }
        if enabled {
            self.nodes[id].flags.insert(NodeFlags::ENABLED);
            // Layout skipped this subtree while it was disabled.
            self.invalidate_layout(id);
            self.invalidate_node_region(id);
        } else {
            self.invalidate_node_region(id);
            self.nodes[id].flags.remove(NodeFlags::ENABLED);
        }
        Ok(())
    }

    /// Whether `id` and every ancestor up to the root are enabled.
    pub fn is_enabled_chain(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(n) = current {
            match self.get(n) {
                Some(node) if node.is_enabled() => current = node.parent,
                _ => return false,
            }
        }
        true
    }

    /// Toggle application-owned flag bits. Bits outside
    /// [`NodeFlags::USER_SETTABLE`] are ignored with a warning.
    pub fn set_flags(&mut self, id: NodeId, flags: NodeFlags, on: bool) -> Result<()> {
        let Some(node) = self.get_mut(id) else {
            return Err(UiError::NoSuchNode(id));
        };
        let rejected = flags - NodeFlags::USER_SETTABLE;
        if !rejected.is_empty() {
            warn!(?id, ?rejected, "set_flags: ignoring managed flag bits");
        }
        node.flags.set(flags & NodeFlags::USER_SETTABLE, on);
        self.invalidate_node_region(id);
        Ok(())
    }

    /// Set or clear managed state bits without filtering.
    pub(crate) fn set_state(&mut self, id: NodeId, flags: NodeFlags, on: bool) {
        if let Some(node) = self.get_mut(id) {
            node.flags.set(flags, on);
        }
    }

    // ── Damage ───────────────────────────────────────────────────────

    /// Whether `id` hangs under the root with every node on the way enabled,
    /// i.e. whether drawing would reach it.
    pub fn is_displayed(&self, id: NodeId) -> bool {
        self.is_attached(id) && self.is_enabled_chain(id)
    }

    /// Report the current absolute area of `id` as damaged.
    ///
    /// Suppressed when the node is not displayed: nothing is drawn there.
    pub fn invalidate_node_region(&mut self, id: NodeId) {
        if !self.damage.is_lazy() || !self.is_displayed(id) {
            return;
        }
        if let Some(area) = self.absolute_rect(id) {
            trace!(?id, ?area, "damage");
            self.damage.invalidate(area);
        }
    }

    /// Report an absolute area as damaged.
    pub fn invalidate_region(&mut self, area: Region) {
        self.damage.invalidate(area);
    }

    pub fn damage(&self) -> &crate::render::DamageTracker {
        &self.damage
    }

    pub fn damage_mut(&mut self) -> &mut crate::render::DamageTracker {
        &mut self.damage
    }
}
