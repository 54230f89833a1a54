// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nereid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

use std::collections::BTreeMap;

use nereid_flow::model::{
    ConnectionAttrs, ConnectionData, GraphData, GraphModel, NodeData, NodeId, Point, Size,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DagParams {
    pub layers: usize,
    pub nodes_per_layer: usize,
    pub fanout: usize,
    pub cross_edges_per_node: usize,
}

impl DagParams {
    pub const fn new(
        layers: usize,
        nodes_per_layer: usize,
        fanout: usize,
        cross_edges_per_node: usize,
    ) -> Self {
        Self { layers, nodes_per_layer, fanout, cross_edges_per_node }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    Small,
    MediumDense,
    Large,
}

impl Case {
    pub const fn id(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::MediumDense => "medium_dense",
            Self::Large => "large",
        }
    }

    pub const fn params(self) -> DagParams {
        match self {
            Self::Small => DagParams::new(4, 5, 2, 0),
            Self::MediumDense => DagParams::new(6, 10, 3, 1),
            Self::Large => DagParams::new(10, 25, 2, 1),
        }
    }

    pub const ALL: [Case; 3] = [Case::Small, Case::MediumDense, Case::Large];
}

fn node_name(layer: usize, idx: usize) -> String {
    format!("l{layer:02}_n{idx:04}")
}

/// Deterministic layered DAG generator.
///
/// - All edges go from lower to higher layers (acyclic by construction).
/// - Every node past layer 0 has several candidate parents, so the single-parent rule is hit.
pub fn dag(params: DagParams) -> GraphData {
    assert!(params.layers >= 2, "layers must be >= 2");
    assert!(params.nodes_per_layer >= 1, "nodes_per_layer must be >= 1");
    assert!(params.fanout >= 1, "fanout must be >= 1");

    let mut data = GraphData::default();
    for layer in 0..params.layers {
        for idx in 0..params.nodes_per_layer {
            let id = node_name(layer, idx);
            data.nodes.push(NodeData { label: Some(format!("Node {id}")), id });
        }
    }

    let edge = |source: String, target: String| ConnectionData {
        source,
        target,
        label: None,
        style: None,
        anchors: None,
    };
    let fanout = params.fanout.min(params.nodes_per_layer);
    for layer in 0..params.layers - 1 {
        for idx in 0..params.nodes_per_layer {
            for k in 0..fanout {
                let to_idx = (idx + k) % params.nodes_per_layer;
                data.connections.push(edge(node_name(layer, idx), node_name(layer + 1, to_idx)));
            }

            if layer + 2 >= params.layers {
                continue;
            }
            let max_target_layers = params.layers - (layer + 2);
            for k in 0..params.cross_edges_per_node {
                let target_layer = layer + 2 + (k % max_target_layers);
                let to_idx = (idx + 1 + k.saturating_mul(3)) % params.nodes_per_layer;
                data.connections.push(edge(node_name(layer, idx), node_name(target_layer, to_idx)));
            }
        }
    }

    data
}

pub fn fixture(case: Case) -> GraphData {
    dag(case.params())
}

/// Builds a model straight from `data`, every node at the origin.
pub fn model(data: &GraphData) -> GraphModel {
    let mut model = GraphModel::default();
    for node in &data.nodes {
        let id = NodeId::new(node.id.as_str()).expect("valid node id");
        model.add_node(Some(id), node.label.clone(), Some(Point::default())).expect("add node");
    }
    for edge in &data.connections {
        let source = NodeId::new(edge.source.as_str()).expect("valid node id");
        let target = NodeId::new(edge.target.as_str()).expect("valid node id");
        model.add_connection(&source, &target, ConnectionAttrs::default()).expect("add connection");
    }
    model
}

pub fn sizes(model: &GraphModel) -> BTreeMap<NodeId, Size> {
    model.nodes().map(|node| (node.id().clone(), node.size())).collect()
}
