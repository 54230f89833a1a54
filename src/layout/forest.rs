// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nereid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Builds the layout forest from a graph snapshot.
//!
//! Every connection makes its source the parent of its target, but a node keeps only the first
//! parent it is discovered under. Later incoming connections stay in the graph (and are redrawn)
//! without shaping the tree. Nodes whose parent chain never reaches a root (cycles) are cut loose
//! and promoted to artificial roots, first-discovered first.

use std::collections::BTreeMap;

use crate::model::{GraphModel, NodeId, Size};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LayoutNode {
    pub id: NodeId,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct Forest {
    pub nodes: Vec<LayoutNode>,
    pub roots: Vec<usize>,
    pub artificial_roots: usize,
}

impl Forest {
    /// Pre-order walk over every tree, roots left to right.
    pub fn preorder(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = Vec::new();
        for &root in self.roots.iter().rev() {
            stack.push(root);
        }
        while let Some(idx) = stack.pop() {
            order.push(idx);
            for &child in self.nodes[idx].children.iter().rev() {
                stack.push(child);
            }
        }
        order
    }
}

pub(crate) fn build_forest(model: &GraphModel, sizes: &BTreeMap<NodeId, Size>) -> Forest {
    let fallback = model.default_node_size();

    let mut nodes = model
        .nodes()
        .map(|node| {
            let size = sizes.get(node.id()).copied().unwrap_or(node.size()).or_sane(fallback);
            LayoutNode {
                id: node.id().clone(),
                parent: None,
                children: Vec::new(),
                x: 0.0,
                y: 0.0,
                width: size.width,
                height: size.height,
            }
        })
        .collect::<Vec<_>>();

    let index = nodes
        .iter()
        .enumerate()
        .map(|(idx, node)| (node.id.clone(), idx))
        .collect::<BTreeMap<_, _>>();

    for connection in model.connections() {
        let (Some(&parent), Some(&child)) =
            (index.get(connection.source_id()), index.get(connection.target_id()))
        else {
            continue;
        };
        if parent == child || nodes[child].parent.is_some() {
            continue;
        }
        nodes[child].parent = Some(parent);
        nodes[parent].children.push(child);
    }

    let mut roots = (0..nodes.len()).filter(|&idx| nodes[idx].parent.is_none()).collect::<Vec<_>>();

    let mut reached = vec![false; nodes.len()];
    for &root in &roots {
        mark_subtree(&nodes, root, &mut reached);
    }

    let mut artificial_roots = 0;
    for idx in 0..nodes.len() {
        if reached[idx] {
            continue;
        }
        if let Some(parent) = nodes[idx].parent.take() {
            nodes[parent].children.retain(|&child| child != idx);
        }
        roots.push(idx);
        artificial_roots += 1;
        mark_subtree(&nodes, idx, &mut reached);
    }

    // Discovery order, artificial roots included.
    roots.sort_unstable();

    Forest { nodes, roots, artificial_roots }
}

fn mark_subtree(nodes: &[LayoutNode], root: usize, reached: &mut [bool]) {
    let mut stack = vec![root];
    while let Some(idx) = stack.pop() {
        if reached[idx] {
            continue;
        }
        reached[idx] = true;
        stack.extend(nodes[idx].children.iter().copied());
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::build_forest;
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

    fn root_ids(model: &GraphModel) -> Vec<String> {
        let forest = build_forest(model, &BTreeMap::new());
        forest.roots.iter().map(|&idx| forest.nodes[idx].id.to_string()).collect()
    }

    #[test]
    fn nodes_without_incoming_connections_are_roots() {
        let model = model(&["1", "2", "3", "4"], &[("1", "2"), ("1", "3")]);
        assert_eq!(root_ids(&model), vec!["1", "4"]);
    }

    #[test]
    fn a_node_keeps_only_its_first_parent() {
        let model = model(&["a", "b", "c"], &[("a", "c"), ("b", "c")]);
        let forest = build_forest(&model, &BTreeMap::new());

        assert_eq!(forest.nodes[2].parent, Some(0));
        assert_eq!(forest.nodes[0].children, vec![2]);
        assert!(forest.nodes[1].children.is_empty());
    }

    #[test]
    fn pure_cycle_promotes_the_first_node_to_artificial_root() {
        let model = model(&["1", "2"], &[("1", "2"), ("2", "1")]);
        let forest = build_forest(&model, &BTreeMap::new());

        assert_eq!(root_ids(&model), vec!["1"]);
        assert_eq!(forest.artificial_roots, 1);
        assert_eq!(forest.preorder().len(), 2);
    }

    #[test]
    fn cycles_hanging_off_nothing_are_still_reached() {
        // "r" is a genuine root, but b <-> c only point at each other.
        let model = model(&["r", "b", "c"], &[("b", "c"), ("c", "b")]);
        let forest = build_forest(&model, &BTreeMap::new());

        assert_eq!(root_ids(&model), vec!["r", "b"]);
        assert_eq!(forest.preorder().len(), 3);
    }

    #[test]
    fn self_loops_do_not_parent_a_node() {
        let model = model(&["solo"], &[("solo", "solo")]);
        assert_eq!(root_ids(&model), vec!["solo"]);
    }

    #[test]
    fn reported_sizes_override_model_sizes_and_insane_ones_fall_back() {
        let model = model(&["a", "b"], &[]);
        let sizes = BTreeMap::from([
            (nid("a"), Size::new(200.0, 60.0)),
            (nid("b"), Size::new(f64::INFINITY, 60.0)),
        ]);
        let forest = build_forest(&model, &sizes);

        assert_eq!((forest.nodes[0].width, forest.nodes[0].height), (200.0, 60.0));
        assert_eq!((forest.nodes[1].width, forest.nodes[1].height), (120.0, 40.0));
    }
}
