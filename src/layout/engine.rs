//! Layout convergence loop.
//!
//! [`LayoutEngine`] runs layout passes over the tree until a pass finds no
//! node to lay out. A single pass lays out children before their parent and
//! only visits subtrees whose subtree-valid bit is clear.

use tracing::{debug, trace, warn};

use crate::component::{NodeFlags, NodeId, Tree};
use crate::error::{Result, UiError};

/// Outcome of [`LayoutEngine::run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutReport {
    /// Passes executed, including the final zero-work pass.
    pub passes: usize,
    /// Total number of node layouts over all passes.
    pub nodes_laid_out: usize,
    /// `false` when the loop bailed out before reaching a fixed point.
    pub converged: bool,
}

/// Drives layout passes to a fixed point.
#[derive(Debug, Clone, Copy)]
pub struct LayoutEngine {
    stall_limit: usize,
    max_passes: usize,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(3, 64)
    }
}

impl LayoutEngine {
    /// `stall_limit` consecutive passes without less work than the previous
    /// one, or `max_passes` passes in total, end the loop with a warning.
    pub fn new(stall_limit: usize, max_passes: usize) -> Self {
        Self {
            stall_limit: stall_limit.max(1),
            max_passes: max_passes.max(1),
        }
    }

    pub fn stall_limit(&self) -> usize {
        self.stall_limit
    }

    pub fn max_passes(&self) -> usize {
        self.max_passes
    }

    /// Lay out the subtree at `root` until nothing changes.
    pub fn run(&self, tree: &mut Tree, root: NodeId) -> Result<LayoutReport> {
        let mut report = LayoutReport::default();
        let mut previous = usize::MAX;
        let mut stalls = 0;

        loop {
            if report.passes >= self.max_passes {
                warn!(passes = report.passes, "layout did not converge, pass limit reached");
                break;
            }
            let work = self.pass(tree, root)?;
            report.passes += 1;
            report.nodes_laid_out += work;
            trace!(pass = report.passes, work, "layout pass");

            if work == 0 {
                report.converged = true;
                break;
            }
            if work >= previous {
                stalls += 1;
                if stalls >= self.stall_limit {
                    warn!(
                        passes = report.passes,
                        work, "layout is not making progress, giving up"
                    );
                    break;
                }
            } else {
                stalls = 0;
            }
            previous = work;
        }

        if report.nodes_laid_out > 0 {
            debug!(
                passes = report.passes,
                nodes = report.nodes_laid_out,
                converged = report.converged,
                "layout"
            );
        }
        Ok(report)
    }

    /// One pass over the subtree at `root`. Returns how many nodes had their
    /// own layout run.
    pub fn pass(&self, tree: &mut Tree, root: NodeId) -> Result<usize> {
        let mut work = 0;
        self.layout_node(tree, root, &mut work)?;
        Ok(work)
    }

    fn layout_node(&self, tree: &mut Tree, id: NodeId, work: &mut usize) -> Result<()> {
        let Some(node) = tree.get(id) else {
            return Ok(());
        };
        if !node.is_enabled() {
            return Ok(());
        }

        if !node.is_subtree_layout_valid() {
            // Marked before descending so invalidations raised below survive.
            tree.set_state(id, NodeFlags::SUBTREE_LAYOUT_VALID, true);
            for child in tree.children(id) {
                if tree.parent(child) == Some(id) {
                    self.layout_node(tree, child, work)?;
                }
            }
        }

        match tree.get(id) {
            Some(node) if !node.is_layout_valid() => {}
            _ => return Ok(()),
        }
        tree.set_state(id, NodeFlags::LAYOUT_VALID, true);
        *work += 1;

        if let Err(err) = self.run_layouters(tree, id) {
            // Stay dirty so the failure is reported again on the next run.
            tree.invalidate_layout(id);
            return Err(err);
        }
        Ok(())
    }

    fn run_layouters(&self, tree: &mut Tree, id: NodeId) -> Result<()> {
        let Some(node) = tree.get(id) else {
            return Ok(());
        };
        let layouters = node.layouters().to_vec();
        let is_container = node.is_container();

        for layouter in layouters {
            if layouter.requires_container() && !is_container {
                return Err(UiError::NotAContainer {
                    node: id,
                    operation: layouter.name(),
                });
            }
            trace!(?id, layouter = layouter.name(), "layout");
            layouter.layout(tree, id)?;
            if !tree.contains(id) {
                return Ok(());
            }
        }

        if let Some(mut widget) = tree.take_widget(id) {
            let result = widget.layout(tree, id);
            tree.restore_widget(id, widget);
            result?;
        }
        Ok(())
    }
}
