// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nereid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Serialisable views of the graph.
//!
//! `FlowDesign` is the persisted-state contract handed to the embedding UI; its JSON shape must
//! stay stable. `GraphData` is the bulk-load input (`{ nodes: [{id, label}], connections:
//! [{source, target}] }`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::graph::{Anchors, Connection, ConnectionStyle, GraphModel};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FlowDesign {
    pub nodes: BTreeMap<String, FlowDesignNode>,
    pub connections: Vec<FlowDesignConnection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowDesignNode {
    pub id: String,
    pub out_connections: Vec<String>,
    pub in_connections: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowDesignConnection {
    pub id: String,
    pub source_id: String,
    pub target_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<ConnectionStyle>,
    #[serde(default)]
    pub anchors: Anchors,
}

impl FlowDesign {
    pub fn from_model(model: &GraphModel) -> Self {
        let nodes = model
            .nodes()
            .map(|node| {
                let id = node.id().to_string();
                let design_node = FlowDesignNode {
                    id: id.clone(),
                    out_connections: model
                        .outgoing(node.id())
                        .into_iter()
                        .map(ToString::to_string)
                        .collect(),
                    in_connections: model
                        .incoming(node.id())
                        .into_iter()
                        .map(ToString::to_string)
                        .collect(),
                };
                (id, design_node)
            })
            .collect();

        let connections = model.connections().iter().map(connection_to_design).collect();

        Self { nodes, connections }
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn connection_to_design(connection: &Connection) -> FlowDesignConnection {
    FlowDesignConnection {
        id: connection.id().to_string(),
        source_id: connection.source_id().to_string(),
        target_id: connection.target_id().to_string(),
        label: connection.label().map(ToOwned::to_owned),
        style: connection.style().cloned(),
        anchors: connection.anchors(),
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphData {
    #[serde(default)]
    pub nodes: Vec<NodeData>,
    #[serde(default)]
    pub connections: Vec<ConnectionData>,
}

impl GraphData {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeData {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionData {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub style: Option<ConnectionStyle>,
    #[serde(default)]
    pub anchors: Option<Anchors>,
}
