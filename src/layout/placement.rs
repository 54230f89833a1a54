// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nereid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Width aggregation, top-down placement and viewport centering.

use super::forest::Forest;
use crate::config::LayoutConfig;
use crate::model::Size;

/// Horizontal room each subtree claims, trailing spacing included.
///
/// A leaf claims its own width plus spacing; an inner node claims the larger of its own width
/// and its children's claims, plus spacing.
pub(crate) fn subtree_widths(forest: &Forest, spacing: f64) -> Vec<f64> {
    let mut widths = vec![0.0; forest.nodes.len()];
    for idx in forest.preorder().into_iter().rev() {
        let node = &forest.nodes[idx];
        let children: f64 = node.children.iter().map(|&child| widths[child]).sum();
        widths[idx] = node.width.max(children) + spacing;
    }
    widths
}

/// Places every tree left to right from `x = 0`, one level per depth.
///
/// Each node is centered inside the slot its subtree claimed, and its children are centered
/// under it; the children then consume their own claims left to right. Subtrees never share
/// horizontal room, so a forest whose nodes are shorter than the level spacing starts out
/// overlap-free.
pub(crate) fn place(forest: &mut Forest, config: &LayoutConfig) {
    let spacing = config.node_spacing_x;
    let widths = subtree_widths(forest, spacing);

    let mut stack = Vec::<(usize, f64, usize)>::new();
    let mut cursor = 0.0;
    for &root in &forest.roots {
        stack.push((root, cursor, 0));
        cursor += widths[root];
    }

    while let Some((idx, slot_left, depth)) = stack.pop() {
        let children = forest.nodes[idx].children.clone();
        let width = forest.nodes[idx].width;

        let children_span = if children.is_empty() {
            0.0
        } else {
            children.iter().map(|&child| widths[child]).sum::<f64>() - spacing
        };
        let block = width.max(children_span);

        let node = &mut forest.nodes[idx];
        node.x = slot_left + (block - width) / 2.0;
        node.y = config.level_base_offset + depth as f64 * config.level_spacing;

        let mut child_left = node.x + (width - children_span) / 2.0;
        for child in children {
            stack.push((child, child_left, depth + 1));
            child_left += widths[child];
        }
    }
}

/// Translates the whole forest so its extent sits centered in the viewport.
///
/// A forest wider (or taller) than the viewport is pinned to the leading edge instead. Without
/// vertical centering the forest is only pushed back down if overlap resolution lifted it above
/// the base offset.
pub(crate) fn center(forest: &mut Forest, viewport: Size, config: &LayoutConfig) {
    if forest.nodes.is_empty() {
        return;
    }

    let min_x = forest.nodes.iter().map(|n| n.x).fold(f64::INFINITY, f64::min);
    let max_x = forest.nodes.iter().map(|n| n.x + n.width).fold(f64::NEG_INFINITY, f64::max);
    let min_y = forest.nodes.iter().map(|n| n.y).fold(f64::INFINITY, f64::min);
    let max_y = forest.nodes.iter().map(|n| n.y + n.height).fold(f64::NEG_INFINITY, f64::max);

    let dx = centered_offset(viewport.width, max_x - min_x) - min_x;
    let dy = if config.center_vertically {
        centered_offset(viewport.height, max_y - min_y) - min_y
    } else if min_y < config.level_base_offset {
        config.level_base_offset - min_y
    } else {
        0.0
    };

    for node in &mut forest.nodes {
        node.x += dx;
        node.y += dy;
    }
}

fn centered_offset(viewport: f64, extent: f64) -> f64 {
    if viewport.is_finite() {
        ((viewport - extent) / 2.0).max(0.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::{center, place, subtree_widths};
    use crate::config::LayoutConfig;
    use crate::layout::forest::build_forest;
    use crate::model::{ConnectionAttrs, GraphModel, NodeId, Size};

    fn nid(value: &str) -> NodeId {
        NodeId::new(value).expect("node id")
    }

    fn model(ids: &[&str], edges: &[(&str, &str)]) -> GraphModel {
        let mut model = GraphModel::default();
        for id in ids {
            model.add_node(Some(nid(id)), None, None).expect("node");
        }
        for (source, target) in edges {
            model.add_connection(&nid(source), &nid(target), ConnectionAttrs::default()).expect("edge");
        }
        model
    }

    #[test]
    fn widths_aggregate_bottom_up() {
        let model = model(&["1", "2", "3"], &[("1", "2"), ("1", "3")]);
        let forest = build_forest(&model, &BTreeMap::new());

        // Leaves: 120 + 120. Root: max(120, 480) + 120.
        assert_eq!(subtree_widths(&forest, 120.0), vec![600.0, 240.0, 240.0]);
    }

    #[test]
    fn wide_parent_floors_its_claim() {
        let model = model(&["1", "2"], &[("1", "2")]);
        let sizes = BTreeMap::from([(nid("1"), Size::new(500.0, 40.0))]);
        let forest = build_forest(&model, &sizes);

        assert_eq!(subtree_widths(&forest, 120.0)[0], 620.0);
    }

    #[test]
    fn children_are_centered_under_their_parent_one_level_down() {
        let model = model(&["1", "2", "3"], &[("1", "2"), ("1", "3")]);
        let mut forest = build_forest(&model, &BTreeMap::new());
        let config = LayoutConfig::default();
        place(&mut forest, &config);

        let [root, left, right] = [&forest.nodes[0], &forest.nodes[1], &forest.nodes[2]];
        assert_eq!(root.y, 50.0);
        assert_eq!(left.y, 150.0);
        assert_eq!(right.y, 150.0);
        assert_eq!(right.x - (left.x + left.width), 120.0);

        let children_mid = (left.x + right.x + right.width) / 2.0;
        assert_eq!(root.x + root.width / 2.0, children_mid);
    }

    #[test]
    fn roots_are_placed_left_to_right_in_discovery_order() {
        let model = model(&["a", "b", "c"], &[]);
        let mut forest = build_forest(&model, &BTreeMap::new());
        place(&mut forest, &LayoutConfig::default());

        let xs = forest.nodes.iter().map(|n| n.x).collect::<Vec<_>>();
        assert_eq!(xs, vec![0.0, 240.0, 480.0]);
    }

    #[test]
    fn centering_moves_a_single_node_to_the_viewport_center() {
        let model = model(&["only"], &[]);
        let mut forest = build_forest(&model, &BTreeMap::new());
        let config = LayoutConfig::default();
        place(&mut forest, &config);
        center(&mut forest, Size::new(1000.0, 600.0), &config);

        let node = &forest.nodes[0];
        assert_eq!(node.x + node.width / 2.0, 500.0);
        assert_eq!(node.y + node.height / 2.0, 300.0);
    }

    #[test]
    fn horizontal_only_centering_keeps_the_level_offsets() {
        let model = model(&["1", "2"], &[("1", "2")]);
        let mut forest = build_forest(&model, &BTreeMap::new());
        let config = LayoutConfig { center_vertically: false, ..LayoutConfig::default() };
        place(&mut forest, &config);
        center(&mut forest, Size::new(1000.0, 600.0), &config);

        assert_eq!(forest.nodes[0].y, 50.0);
        assert_eq!(forest.nodes[1].y, 150.0);
        assert_eq!(forest.nodes[0].x + 60.0, 500.0);
    }

    #[test]
    fn forests_wider_than_the_viewport_are_pinned_to_the_left_edge() {
        let model = model(&["a", "b", "c", "d"], &[]);
        let mut forest = build_forest(&model, &BTreeMap::new());
        let config = LayoutConfig::default();
        place(&mut forest, &config);
        center(&mut forest, Size::new(300.0, 600.0), &config);

        assert_eq!(forest.nodes[0].x, 0.0);
    }
}
