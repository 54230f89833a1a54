// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nereid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Iterative overlap resolution.
//!
//! Every pass scans all unordered pairs; an intersecting pair is pushed apart by a fixed step on
//! the axis with the larger penetration (x on a tie). Passes repeat until one finds no overlap, the pass cap is hit
//! or the time budget runs out.

use std::time::{Duration, Instant};

use super::forest::{Forest, LayoutNode};
use crate::model::{Point, Rect, Size};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct OverlapOutcome {
    pub passes: usize,
    pub converged: bool,
    pub timed_out: bool,
    pub remaining: usize,
}

pub(crate) struct OverlapBounds {
    pub step_x: f64,
    pub step_y: f64,
    pub max_passes: usize,
    pub time_budget: Option<Duration>,
}

fn bounds_of(node: &LayoutNode) -> Rect {
    Rect::new(Point::new(node.x, node.y), Size::new(node.width, node.height))
}

pub(crate) fn resolve_overlaps(forest: &mut Forest, bounds: &OverlapBounds) -> OverlapOutcome {
    let started = Instant::now();
    let nodes = &mut forest.nodes;

    let mut passes = 0;
    let mut timed_out = false;
    while passes < bounds.max_passes {
        if bounds.time_budget.is_some_and(|budget| started.elapsed() >= budget) {
            timed_out = true;
            break;
        }
        passes += 1;

        let mut moved = false;
        for i in 0..nodes.len() {
            for j in (i + 1)..nodes.len() {
                let (a, b) = (bounds_of(&nodes[i]), bounds_of(&nodes[j]));
                if !a.intersects(&b) {
                    continue;
                }
                moved = true;
                push_apart(nodes, i, j, a, b, bounds);
            }
        }

        if !moved {
            return OverlapOutcome { passes, converged: true, timed_out: false, remaining: 0 };
        }
    }

    let remaining = count_overlaps(nodes);
    OverlapOutcome { passes, converged: remaining == 0, timed_out, remaining }
}

fn push_apart(nodes: &mut [LayoutNode], i: usize, j: usize, a: Rect, b: Rect, bounds: &OverlapBounds) {
    let (depth_x, depth_y) = a.penetration(&b);
    let a_center = (a.left() + a.right(), a.top() + a.bottom());
    let b_center = (b.left() + b.right(), b.top() + b.bottom());

    if depth_x >= depth_y {
        let sign = if a_center.0 <= b_center.0 { -1.0 } else { 1.0 };
        nodes[i].x += sign * bounds.step_x;
        nodes[j].x -= sign * bounds.step_x;
    } else {
        let sign = if a_center.1 <= b_center.1 { -1.0 } else { 1.0 };
        nodes[i].y += sign * bounds.step_y;
        nodes[j].y -= sign * bounds.step_y;
    }
}

pub(crate) fn count_overlaps(nodes: &[LayoutNode]) -> usize {
    let mut count = 0;
    for i in 0..nodes.len() {
        for j in (i + 1)..nodes.len() {
            if bounds_of(&nodes[i]).intersects(&bounds_of(&nodes[j])) {
                count += 1;
            }
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::{count_overlaps, resolve_overlaps, OverlapBounds};
    use crate::layout::forest::{Forest, LayoutNode};
    use crate::model::NodeId;

    fn node(id: &str, x: f64, y: f64) -> LayoutNode {
        LayoutNode {
            id: NodeId::new(id).unwrap(),
            parent: None,
            children: Vec::new(),
            x,
            y,
            width: 120.0,
            height: 40.0,
        }
    }

    fn forest(nodes: Vec<LayoutNode>) -> Forest {
        let roots = (0..nodes.len()).collect();
        Forest { nodes, roots, artificial_roots: 0 }
    }

    fn bounds(max_passes: usize) -> OverlapBounds {
        OverlapBounds { step_x: 120.0, step_y: 100.0, max_passes, time_budget: None }
    }

    #[test]
    fn disjoint_boxes_converge_in_one_clean_pass() {
        let mut forest = forest(vec![node("a", 0.0, 0.0), node("b", 300.0, 0.0)]);
        let outcome = resolve_overlaps(&mut forest, &bounds(10));

        assert!(outcome.converged);
        assert_eq!(outcome.passes, 1);
        assert_eq!(forest.nodes[0].x, 0.0);
    }

    #[test]
    fn deeper_horizontal_overlap_is_pushed_apart_horizontally() {
        // dx = 110, dy = 10
        let mut forest = forest(vec![node("a", 0.0, 0.0), node("b", 10.0, 30.0)]);
        let outcome = resolve_overlaps(&mut forest, &bounds(10));

        assert!(outcome.converged);
        assert_eq!((forest.nodes[0].x, forest.nodes[0].y), (-120.0, 0.0));
        assert_eq!((forest.nodes[1].x, forest.nodes[1].y), (130.0, 30.0));
    }

    #[test]
    fn deeper_vertical_overlap_is_pushed_apart_vertically() {
        // dx = 10, dy = 30
        let mut forest = forest(vec![node("a", 0.0, 0.0), node("b", 110.0, 10.0)]);
        let outcome = resolve_overlaps(&mut forest, &bounds(10));

        assert!(outcome.converged);
        assert_eq!((forest.nodes[0].x, forest.nodes[0].y), (0.0, -100.0));
        assert_eq!((forest.nodes[1].x, forest.nodes[1].y), (110.0, 110.0));
        assert_eq!(count_overlaps(&forest.nodes), 0);
    }

    #[test]
    fn equal_penetration_moves_along_x() {
        // dx = dy = 20
        let mut forest = forest(vec![node("a", 0.0, 0.0), node("b", 100.0, 20.0)]);
        resolve_overlaps(&mut forest, &bounds(10));

        assert_eq!((forest.nodes[0].x, forest.nodes[0].y), (-120.0, 0.0));
        assert_eq!((forest.nodes[1].x, forest.nodes[1].y), (220.0, 20.0));
    }

    #[test]
    fn identical_boxes_are_separated() {
        let mut forest = forest(vec![node("a", 0.0, 0.0), node("b", 0.0, 0.0), node("c", 0.0, 0.0)]);
        let outcome = resolve_overlaps(&mut forest, &bounds(100));

        assert!(outcome.converged);
        assert_eq!(count_overlaps(&forest.nodes), 0);
    }

    #[test]
    fn pass_cap_returns_best_effort_positions() {
        let nodes = (0..12).map(|i| node(&format!("n{i}"), 0.0, 0.0)).collect();
        let mut forest = forest(nodes);
        let outcome = resolve_overlaps(&mut forest, &bounds(1));

        assert!(!outcome.converged);
        assert_eq!(outcome.passes, 1);
        assert!(outcome.remaining > 0);
        assert!(forest.nodes.iter().all(|n| n.x.is_finite() && n.y.is_finite()));
    }

    #[test]
    fn exhausted_time_budget_stops_before_the_first_pass() {
        let mut forest = forest(vec![node("a", 0.0, 0.0), node("b", 0.0, 0.0)]);
        let outcome = resolve_overlaps(
            &mut forest,
            &OverlapBounds {
                step_x: 120.0,
                step_y: 100.0,
                max_passes: 10,
                time_budget: Some(std::time::Duration::ZERO),
            },
        );

        assert!(outcome.timed_out);
        assert_eq!(outcome.passes, 0);
        assert_eq!(outcome.remaining, 1);
    }
}
