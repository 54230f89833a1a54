// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nereid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The authoritative node/connection graph.
//!
//! `GraphModel` owns every `Node` and `Connection` for its lifetime. All mutation goes through its
//! methods, which keep the reference invariant (every connection endpoint is a live node) and emit
//! a `GraphEvent` per change.

use std::collections::BTreeMap;
use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::warn;

use super::events::{ConnectionEndpoints, EventBus, GraphEvent};
use super::geometry::{Point, Size};
use super::ids::{ConnectionId, NodeId};
use crate::config::{FlowConfig, NodeDefaults, ScatterConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Anchor {
    Top,
    Bottom,
    Left,
    Right,
    Center,
}

/// Source and target anchor of a drawn connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Anchors {
    pub source: Anchor,
    pub target: Anchor,
}

impl Default for Anchors {
    fn default() -> Self {
        Self { source: Anchor::Bottom, target: Anchor::Top }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConnectorKind {
    #[default]
    Straight,
    Bezier,
    Flowchart,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionStyle {
    pub stroke: String,
    pub stroke_width: f64,
    pub hover_stroke: Option<String>,
    pub connector: ConnectorKind,
}

impl Default for ConnectionStyle {
    fn default() -> Self {
        Self {
            stroke: "blue".to_owned(),
            stroke_width: 2.0,
            hover_stroke: Some("#1e8151".to_owned()),
            connector: ConnectorKind::Straight,
        }
    }
}

/// Optional metadata supplied when a connection is created.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConnectionAttrs {
    pub label: Option<String>,
    pub style: Option<ConnectionStyle>,
    pub anchors: Anchors,
}

/// Fields an edit may change on an existing connection. `None` leaves a field untouched; an
/// empty label clears it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConnectionPatch {
    pub label: Option<String>,
    pub stroke: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: NodeId,
    label: String,
    size: Size,
    position: Point,
}

impl Node {
    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn position(&self) -> Point {
        self.position
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    id: ConnectionId,
    source_id: NodeId,
    target_id: NodeId,
    label: Option<String>,
    style: Option<ConnectionStyle>,
    anchors: Anchors,
}

impl Connection {
    pub fn id(&self) -> &ConnectionId {
        &self.id
    }

    pub fn source_id(&self) -> &NodeId {
        &self.source_id
    }

    pub fn target_id(&self) -> &NodeId {
        &self.target_id
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn style(&self) -> Option<&ConnectionStyle> {
        self.style.as_ref()
    }

    pub fn anchors(&self) -> Anchors {
        self.anchors
    }

    pub fn touches(&self, node_id: &NodeId) -> bool {
        &self.source_id == node_id || &self.target_id == node_id
    }

    fn endpoints(&self) -> ConnectionEndpoints {
        ConnectionEndpoints {
            connection_id: self.id.clone(),
            source_id: self.source_id.clone(),
            target_id: self.target_id.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionEndpoint {
    Source,
    Target,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// A connection referenced a node id the model does not know.
    InvalidReference { endpoint: ConnectionEndpoint, node_id: NodeId },
    DuplicateNode { node_id: NodeId },
    NodeNotFound { node_id: NodeId },
    ConnectionNotFound { connection_id: ConnectionId },
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidReference { endpoint, node_id } => {
                let endpoint = match endpoint {
                    ConnectionEndpoint::Source => "source",
                    ConnectionEndpoint::Target => "target",
                };
                write!(f, "connection references unknown {endpoint} node {node_id}")
            }
            Self::DuplicateNode { node_id } => write!(f, "node already exists (id={node_id})"),
            Self::NodeNotFound { node_id } => write!(f, "node not found (id={node_id})"),
            Self::ConnectionNotFound { connection_id } => {
                write!(f, "connection not found (id={connection_id})")
            }
        }
    }
}

impl std::error::Error for GraphError {}

/// A node removed from the model together with the connections its removal cascaded to.
#[derive(Debug, Clone, PartialEq)]
pub struct RemovedNode {
    pub node: Node,
    pub connections: Vec<Connection>,
}

#[derive(Debug)]
pub struct GraphModel {
    nodes: BTreeMap<NodeId, Node>,
    node_order: Vec<NodeId>,
    connections: Vec<Connection>,
    node_counter: u64,
    defaults: NodeDefaults,
    scatter: ScatterConfig,
    rng: StdRng,
    events: EventBus,
}

impl Default for GraphModel {
    fn default() -> Self {
        Self::new(NodeDefaults::default(), ScatterConfig::default())
    }
}

impl GraphModel {
    pub fn new(defaults: NodeDefaults, scatter: ScatterConfig) -> Self {
        let rng = match scatter.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            nodes: BTreeMap::new(),
            node_order: Vec::new(),
            connections: Vec::new(),
            node_counter: 0,
            defaults,
            scatter,
            rng,
            events: EventBus::default(),
        }
    }

    pub fn from_config(config: &FlowConfig) -> Self {
        Self::new(config.nodes.clone(), config.scatter.clone())
    }

    pub fn subscribe(&mut self) -> UnboundedReceiver<GraphEvent> {
        self.events.subscribe()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn node(&self, node_id: &NodeId) -> Option<&Node> {
        self.nodes.get(node_id)
    }

    pub fn contains_node(&self, node_id: &NodeId) -> bool {
        self.nodes.contains_key(node_id)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.node_order.iter().filter_map(|node_id| self.nodes.get(node_id))
    }

    pub fn node_ids(&self) -> &[NodeId] {
        &self.node_order
    }

    /// Connections in insertion order.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn connection(&self, connection_id: &ConnectionId) -> Option<&Connection> {
        self.connections.iter().find(|c| c.id() == connection_id)
    }

    pub fn default_node_size(&self) -> Size {
        self.defaults.size()
    }

    /// Adds a node, generating `node<n>` ids, `<prefix><n>` labels and a scattered position
    /// for whatever the caller leaves out.
    pub fn add_node(
        &mut self,
        id: Option<NodeId>,
        label: Option<String>,
        position: Option<Point>,
    ) -> Result<&Node, GraphError> {
        let (node_id, generated_label) = match id {
            Some(node_id) => {
                if self.nodes.contains_key(&node_id) {
                    warn!(node_id = %node_id, "rejecting duplicate node id");
                    return Err(GraphError::DuplicateNode { node_id });
                }
                let label = node_id.to_string();
                (node_id, label)
            }
            None => self.next_generated_id(),
        };

        let position = match position {
            Some(position) if position.is_finite() => position,
            _ => self.scatter_position(),
        };

        let node = Node {
            id: node_id.clone(),
            label: label.unwrap_or(generated_label),
            size: self.defaults.size(),
            position,
        };
        self.nodes.insert(node_id.clone(), node);
        self.node_order.push(node_id.clone());
        self.events.emit(GraphEvent::NodeAdded { node_id: node_id.clone() });

        Ok(&self.nodes[&node_id])
    }

    fn next_generated_id(&mut self) -> (NodeId, String) {
        loop {
            self.node_counter += 1;
            let n = self.node_counter;
            // "node<n>" has no whitespace and is never empty.
            let Ok(node_id) = NodeId::new(format!("node{n}")) else {
                continue;
            };
            if !self.nodes.contains_key(&node_id) {
                return (node_id, format!("{}{n}", self.defaults.label_prefix));
            }
        }
    }

    fn scatter_position(&mut self) -> Point {
        let x = sample_range(&mut self.rng, self.scatter.x_min, self.scatter.x_max);
        let y = sample_range(&mut self.rng, self.scatter.y_min, self.scatter.y_max);
        Point::new(x, y)
    }

    /// Removes a node and every connection touching it.
    pub fn remove_node(&mut self, node_id: &NodeId) -> Result<RemovedNode, GraphError> {
        let Some(node) = self.nodes.remove(node_id) else {
            return Err(GraphError::NodeNotFound { node_id: node_id.clone() });
        };
        self.node_order.retain(|id| id != node_id);

        let (removed, kept): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.connections).into_iter().partition(|c| c.touches(node_id));
        self.connections = kept;

        for connection in &removed {
            self.events.emit(GraphEvent::ConnectionRemoved(connection.endpoints()));
        }
        self.events.emit(GraphEvent::NodeRemoved { node_id: node_id.clone() });

        Ok(RemovedNode { node, connections: removed })
    }

    pub fn set_node_position(&mut self, node_id: &NodeId, position: Point) -> Result<(), GraphError> {
        let node = self
            .nodes
            .get_mut(node_id)
            .ok_or_else(|| GraphError::NodeNotFound { node_id: node_id.clone() })?;
        node.position = position;
        Ok(())
    }

    pub fn set_node_size(&mut self, node_id: &NodeId, size: Size) -> Result<(), GraphError> {
        let node = self
            .nodes
            .get_mut(node_id)
            .ok_or_else(|| GraphError::NodeNotFound { node_id: node_id.clone() })?;
        node.size = size.or_sane(self.defaults.size());
        Ok(())
    }

    /// Adds a directed connection. Parallel connections between the same pair are kept.
    pub fn add_connection(
        &mut self,
        source_id: &NodeId,
        target_id: &NodeId,
        attrs: ConnectionAttrs,
    ) -> Result<&Connection, GraphError> {
        for (endpoint, node_id) in
            [(ConnectionEndpoint::Source, source_id), (ConnectionEndpoint::Target, target_id)]
        {
            if !self.nodes.contains_key(node_id) {
                warn!(source = %source_id, target = %target_id, "rejecting connection to unknown node {node_id}");
                return Err(GraphError::InvalidReference { endpoint, node_id: node_id.clone() });
            }
        }

        let connection_id = (0..)
            .map(|ordinal| ConnectionId::derive(source_id, target_id, ordinal))
            .find(|candidate| self.connection(candidate).is_none())
            .unwrap_or_else(|| ConnectionId::derive(source_id, target_id, self.connections.len()));

        let connection = Connection {
            id: connection_id,
            source_id: source_id.clone(),
            target_id: target_id.clone(),
            label: attrs.label.filter(|label| !label.is_empty()),
            style: attrs.style,
            anchors: attrs.anchors,
        };
        self.events.emit(GraphEvent::ConnectionCreated(connection.endpoints()));
        self.connections.push(connection);

        let index = self.connections.len() - 1;
        Ok(&self.connections[index])
    }

    pub fn remove_connection(&mut self, connection_id: &ConnectionId) -> Option<Connection> {
        let index = self.connections.iter().position(|c| c.id() == connection_id)?;
        Some(self.remove_connection_at(index))
    }

    /// Removes the first connection from `source_id` to `target_id`, if any.
    pub fn remove_connection_between(
        &mut self,
        source_id: &NodeId,
        target_id: &NodeId,
    ) -> Option<Connection> {
        let index = self
            .connections
            .iter()
            .position(|c| c.source_id() == source_id && c.target_id() == target_id)?;
        Some(self.remove_connection_at(index))
    }

    fn remove_connection_at(&mut self, index: usize) -> Connection {
        let connection = self.connections.remove(index);
        self.events.emit(GraphEvent::ConnectionRemoved(connection.endpoints()));
        connection
    }

    pub fn update_connection(
        &mut self,
        connection_id: &ConnectionId,
        patch: &ConnectionPatch,
    ) -> Result<&Connection, GraphError> {
        let connection = self
            .connections
            .iter_mut()
            .find(|c| c.id() == connection_id)
            .ok_or_else(|| GraphError::ConnectionNotFound { connection_id: connection_id.clone() })?;

        if let Some(label) = &patch.label {
            connection.label = (!label.is_empty()).then(|| label.clone());
        }
        if let Some(stroke) = &patch.stroke {
            connection.style.get_or_insert_with(ConnectionStyle::default).stroke = stroke.clone();
        }
        Ok(&*connection)
    }

    /// Outgoing connection ids of `node_id`, in insertion order.
    pub fn outgoing(&self, node_id: &NodeId) -> Vec<&ConnectionId> {
        self.connections.iter().filter(|c| c.source_id() == node_id).map(Connection::id).collect()
    }

    /// Incoming connection ids of `node_id`, in insertion order.
    pub fn incoming(&self, node_id: &NodeId) -> Vec<&ConnectionId> {
        self.connections.iter().filter(|c| c.target_id() == node_id).map(Connection::id).collect()
    }

    /// Removes everything and resets the id counter.
    pub fn clear(&mut self) {
        for connection in std::mem::take(&mut self.connections) {
            self.events.emit(GraphEvent::ConnectionRemoved(connection.endpoints()));
        }
        for node_id in std::mem::take(&mut self.node_order) {
            self.events.emit(GraphEvent::NodeRemoved { node_id });
        }
        self.nodes.clear();
        self.node_counter = 0;
    }
}

fn sample_range(rng: &mut StdRng, min: f64, max: f64) -> f64 {
    if !(max > min) {
        return min;
    }
    rng.gen_range(min..max).floor()
}
