// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nereid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::design::{ConnectionData, GraphData, NodeData};

fn node(id: &str, label: &str) -> NodeData {
    NodeData { id: id.to_owned(), label: Some(label.to_owned()) }
}

fn edge(source: &str, target: &str) -> ConnectionData {
    ConnectionData {
        source: source.to_owned(),
        target: target.to_owned(),
        label: None,
        style: None,
        anchors: None,
    }
}

/// The built-in demo graph: one start node fanning out into two small process trees.
pub fn sample_graph() -> GraphData {
    GraphData {
        nodes: vec![
            node("1", "Start"),
            node("2", "Process A"),
            node("3", "Process B"),
            node("4", "Process C"),
            node("5", "Process D"),
            node("6", "Process E"),
        ],
        connections: vec![edge("1", "2"), edge("1", "3"), edge("2", "4"), edge("2", "5"), edge("3", "6")],
    }
}

#[cfg(test)]
pub(crate) fn fan_out() -> GraphData {
    GraphData {
        nodes: vec![node("1", "Root"), node("2", "Left"), node("3", "Right")],
        connections: vec![edge("1", "2"), edge("1", "3")],
    }
}

#[cfg(test)]
pub(crate) fn two_cycle() -> GraphData {
    GraphData {
        nodes: vec![node("1", "Ping"), node("2", "Pong")],
        connections: vec![edge("1", "2"), edge("2", "1")],
    }
}
