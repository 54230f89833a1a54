// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nereid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Hierarchical auto-layout.
//!
//! `compute_layout` is a pure function of a graph snapshot, the node sizes the surface reports and
//! the viewport: it builds a forest from the connections, places it top-down, resolves overlaps
//! within a bounded budget and centers the result. It never mutates the model.

mod forest;
mod overlap;
mod placement;

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, warn};

use crate::config::LayoutConfig;
use crate::model::{GraphModel, NodeId, Point, Rect, Size};

use overlap::{OverlapBounds, OverlapOutcome};

/// Overlap resolution ran out of passes or time; positions are best effort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutNonConvergenceError {
    pub passes: usize,
    pub remaining_overlaps: usize,
    pub timed_out: bool,
}

impl fmt::Display for LayoutNonConvergenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cause = if self.timed_out { "time budget exhausted" } else { "pass limit reached" };
        write!(
            f,
            "overlap resolution did not converge ({cause} after {} passes, {} overlaps left)",
            self.passes, self.remaining_overlaps
        )
    }
}

impl std::error::Error for LayoutNonConvergenceError {}

/// Result of one layout pass: exactly one finite position per node of the input graph.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Layout {
    positions: BTreeMap<NodeId, Point>,
    sizes: BTreeMap<NodeId, Size>,
    roots: Vec<NodeId>,
    overlap_passes: usize,
    non_convergence: Option<LayoutNonConvergenceError>,
}

impl Layout {
    pub fn positions(&self) -> &BTreeMap<NodeId, Point> {
        &self.positions
    }

    pub fn into_positions(self) -> BTreeMap<NodeId, Point> {
        self.positions
    }

    pub fn position(&self, node_id: &NodeId) -> Option<Point> {
        self.positions.get(node_id).copied()
    }

    /// Bounding box a node occupies under this layout, using the size the layout assumed.
    pub fn bounds(&self, node_id: &NodeId) -> Option<Rect> {
        Some(Rect::new(self.position(node_id)?, *self.sizes.get(node_id)?))
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn overlap_passes(&self) -> usize {
        self.overlap_passes
    }

    pub fn non_convergence(&self) -> Option<&LayoutNonConvergenceError> {
        self.non_convergence.as_ref()
    }
}

pub fn compute_layout(
    model: &GraphModel,
    sizes: &BTreeMap<NodeId, Size>,
    viewport: Size,
    config: &LayoutConfig,
) -> Layout {
    if model.is_empty() {
        return Layout::default();
    }

    let mut forest = forest::build_forest(model, sizes);
    placement::place(&mut forest, config);

    let outcome = overlap::resolve_overlaps(
        &mut forest,
        &OverlapBounds {
            step_x: config.node_spacing_x,
            step_y: config.level_spacing,
            max_passes: config.max_overlap_passes,
            time_budget: config.overlap_time_budget(),
        },
    );
    placement::center(&mut forest, viewport, config);

    let non_convergence = match outcome {
        OverlapOutcome { converged: true, .. } => None,
        OverlapOutcome { passes, timed_out, remaining, .. } => {
            let err = LayoutNonConvergenceError { passes, remaining_overlaps: remaining, timed_out };
            warn!(nodes = forest.nodes.len(), "{err}");
            Some(err)
        }
    };
    debug!(
        nodes = forest.nodes.len(),
        roots = forest.roots.len(),
        artificial_roots = forest.artificial_roots,
        passes = outcome.passes,
        "layout computed"
    );

    let roots = forest.roots.iter().map(|&idx| forest.nodes[idx].id.clone()).collect();
    let mut positions = BTreeMap::new();
    let mut node_sizes = BTreeMap::new();
    for node in forest.nodes {
        node_sizes.insert(node.id.clone(), Size::new(node.width, node.height));
        positions.insert(node.id, Point::new(node.x, node.y));
    }

    Layout { positions, sizes: node_sizes, roots, overlap_passes: outcome.passes, non_convergence }
}
