// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nereid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The API the embedding UI talks to.
//!
//! `FlowDesigner` couples one `GraphModel` with one `ConnectionSynchronizer`: every user action
//! mutates the model first and then has the synchroniser mirror it on the surface. `&mut self`
//! keeps synchronisation cycles of a single owner strictly sequential; `SharedDesigner` extends
//! that guarantee to several tasks by queueing or rejecting overlapping cycles.

use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

use crate::config::FlowConfig;
use crate::model::fixtures::sample_graph;
use crate::model::{
    Connection, ConnectionAttrs, ConnectionId, ConnectionPatch, ConnectionStyle, FlowDesign,
    GraphData, GraphError, GraphEvent, GraphModel, IdError, NodeId, Point, RemovedNode,
};
use crate::surface::{RenderingSurface, SurfaceError, SurfaceEvent};
use crate::sync::{ConnectionSynchronizer, SyncReport};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DesignerError {
    InvalidId { value: String, source: IdError },
    Graph(GraphError),
    Surface(SurfaceError),
}

impl fmt::Display for DesignerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId { value, source } => write!(f, "invalid id {value:?}: {source}"),
            Self::Graph(err) => fmt::Display::fmt(err, f),
            Self::Surface(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl std::error::Error for DesignerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidId { source, .. } => Some(source),
            Self::Graph(err) => Some(err),
            Self::Surface(err) => Some(err),
        }
    }
}

impl From<GraphError> for DesignerError {
    fn from(err: GraphError) -> Self {
        Self::Graph(err)
    }
}

impl From<SurfaceError> for DesignerError {
    fn from(err: SurfaceError) -> Self {
        Self::Surface(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncError {
    /// Another auto-arrange cycle holds the designer.
    CycleInProgress,
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CycleInProgress => f.write_str("an auto-arrange cycle is already running"),
        }
    }
}

impl std::error::Error for SyncError {}

/// Outcome of a bulk load. Entries that failed are skipped and listed in `errors`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoadReport {
    pub nodes: usize,
    pub connections: usize,
    pub errors: Vec<DesignerError>,
}

fn parse_id(value: &str) -> Result<NodeId, DesignerError> {
    NodeId::new(value).map_err(|source| DesignerError::InvalidId { value: value.to_owned(), source })
}

#[derive(Debug)]
pub struct FlowDesigner<S> {
    model: GraphModel,
    sync: ConnectionSynchronizer<S>,
    config: FlowConfig,
}

impl<S: RenderingSurface> FlowDesigner<S> {
    pub fn new(surface: S, config: FlowConfig) -> Self {
        Self {
            model: GraphModel::from_config(&config),
            sync: ConnectionSynchronizer::new(surface, &config.sync),
            config,
        }
    }

    pub fn model(&self) -> &GraphModel {
        &self.model
    }

    pub fn config(&self) -> &FlowConfig {
        &self.config
    }

    pub fn synchronizer(&self) -> &ConnectionSynchronizer<S> {
        &self.sync
    }

    pub fn surface(&self) -> &S {
        self.sync.surface()
    }

    #[cfg(test)]
    pub(crate) fn surface_mut(&mut self) -> &mut S {
        self.sync.surface_mut()
    }

    pub fn subscribe(&mut self) -> UnboundedReceiver<GraphEvent> {
        self.model.subscribe()
    }

    /// Lets the surface register freshly created nodes. Connections to a node only succeed once
    /// the surface settled after its creation.
    pub async fn settle(&mut self) {
        self.sync.settle("host").await;
    }

    /// Adds a node to the model and the surface. A node the surface refuses is rolled back.
    pub fn add_node(
        &mut self,
        position: Option<Point>,
        id: Option<NodeId>,
        label: Option<String>,
    ) -> Result<NodeId, DesignerError> {
        let node = self.model.add_node(id, label, position)?.clone();
        if let Err(err) = self.sync.materialize_node(&node) {
            warn!(node_id = %node.id(), "surface refused node: {err}");
            self.model.remove_node(node.id())?;
            return Err(err.into());
        }
        debug!(node_id = %node.id(), "node added");
        Ok(node.id().clone())
    }

    /// Removes a node, its element and every connection touching it.
    pub fn delete_node(&mut self, node_id: &NodeId) -> Result<RemovedNode, DesignerError> {
        if !self.model.contains_node(node_id) {
            return Err(GraphError::NodeNotFound { node_id: node_id.clone() }.into());
        }
        if let Err(err) = self.sync.dematerialize_node(node_id) {
            warn!(node_id = %node_id, "failed to remove node element: {err}");
        }
        Ok(self.model.remove_node(node_id)?)
    }

    /// Records where the user dropped a node.
    pub fn move_node(&mut self, node_id: &NodeId, position: Point) -> Result<(), DesignerError> {
        self.model.set_node_position(node_id, position)?;
        self.sync.place_node(node_id, position)?;
        Ok(())
    }

    /// Connects two nodes in the model and draws the connection. If the surface refuses, the
    /// model record is dropped again.
    pub fn connect(
        &mut self,
        source_id: &NodeId,
        target_id: &NodeId,
        attrs: ConnectionAttrs,
    ) -> Result<ConnectionId, DesignerError> {
        let connection = self.model.add_connection(source_id, target_id, attrs)?.clone();
        if let Err(err) = self.sync.draw(&connection) {
            warn!(connection_id = %connection.id(), "surface refused connection: {err}");
            self.model.remove_connection(connection.id());
            return Err(err.into());
        }
        Ok(connection.id().clone())
    }

    /// Removes the first connection from `source_id` to `target_id`, if any.
    pub fn delete_connection(&mut self, source_id: &NodeId, target_id: &NodeId) -> Option<Connection> {
        let connection = self.model.remove_connection_between(source_id, target_id)?;
        if let Err(err) = self.sync.erase(connection.id()) {
            warn!(connection_id = %connection.id(), "failed to remove drawn connection: {err}");
        }
        Some(connection)
    }

    pub fn edit_connection(
        &mut self,
        connection_id: &ConnectionId,
        patch: &ConnectionPatch,
    ) -> Result<(), DesignerError> {
        let connection = self.model.update_connection(connection_id, patch)?.clone();
        self.sync.restyle(&connection)?;
        Ok(())
    }

    /// Empties the board and restarts generated ids at `node1`.
    pub fn clear_board(&mut self) {
        let node_ids = self.model.node_ids().to_vec();
        self.sync.clear_board(&node_ids);
        self.model.clear();
    }

    /// Replaces the board with `data`. Nodes are created at scattered positions and connections
    /// are only drawn after the surface settled, since it cannot connect unregistered nodes.
    pub async fn load_graph(&mut self, data: &GraphData) -> LoadReport {
        self.clear_board();
        let mut report = LoadReport::default();

        for node in &data.nodes {
            let created = parse_id(&node.id)
                .and_then(|node_id| self.add_node(None, Some(node_id), node.label.clone()));
            match created {
                Ok(_) => report.nodes += 1,
                Err(err) => {
                    warn!(node_id = %node.id, "skipping node: {err}");
                    report.errors.push(err);
                }
            }
        }

        self.sync.settle("register").await;

        for edge in &data.connections {
            let attrs = ConnectionAttrs {
                label: edge.label.clone(),
                style: Some(edge.style.clone().unwrap_or_default()),
                anchors: edge.anchors.unwrap_or_default(),
            };
            let connected = parse_id(&edge.source).and_then(|source_id| {
                let target_id = parse_id(&edge.target)?;
                self.connect(&source_id, &target_id, attrs)
            });
            match connected {
                Ok(_) => report.connections += 1,
                Err(err) => {
                    warn!(source = %edge.source, target = %edge.target, "skipping connection: {err}");
                    report.errors.push(err);
                }
            }
        }

        self.sync.repaint();
        info!(
            nodes = report.nodes,
            connections = report.connections,
            skipped = report.errors.len(),
            "graph loaded"
        );
        report
    }

    /// Loads the built-in demo graph and arranges it.
    pub async fn load_sample_data(&mut self) -> (LoadReport, SyncReport) {
        let load = self.load_graph(&sample_graph()).await;
        let arrange = self.auto_arrange().await;
        (load, arrange)
    }

    /// Runs one synchronisation cycle. Pending user gestures are applied to the model first.
    pub async fn auto_arrange(&mut self) -> SyncReport {
        for err in self.process_surface_events() {
            warn!("surface gesture rejected: {err}");
        }
        self.sync.arrange(&mut self.model, &self.config.layout).await
    }

    pub fn flow_design(&self) -> FlowDesign {
        FlowDesign::from_model(&self.model)
    }

    /// Applies one user gesture reported by the surface to the model.
    pub fn handle_surface_event(&mut self, event: SurfaceEvent) -> Result<(), DesignerError> {
        match event {
            SurfaceEvent::ConnectionCreated { source_id, target_id, handle } => {
                if self.sync.binding(handle).is_some() {
                    return Ok(());
                }
                let attrs = ConnectionAttrs { style: Some(ConnectionStyle::default()), ..Default::default() };
                match self.model.add_connection(&source_id, &target_id, attrs) {
                    Ok(connection) => {
                        let connection_id = connection.id().clone();
                        self.sync.adopt(handle, connection_id);
                        Ok(())
                    }
                    Err(err) => {
                        if let Err(surface_err) = self.sync.discard(handle) {
                            warn!(%handle, "failed to remove rejected connection: {surface_err}");
                        }
                        Err(err.into())
                    }
                }
            }
            SurfaceEvent::ConnectionDetached { source_id, target_id, handle } => {
                match self.sync.forget(handle) {
                    Some(connection_id) => {
                        self.model.remove_connection(&connection_id);
                    }
                    None => debug!(%handle, source = %source_id, target = %target_id, "detach of unbound connection"),
                }
                Ok(())
            }
        }
    }

    /// Drains and applies every pending user gesture, returning the ones the model rejected.
    pub fn process_surface_events(&mut self) -> Vec<DesignerError> {
        self.sync
            .take_surface_events()
            .into_iter()
            .filter_map(|event| self.handle_surface_event(event).err())
            .collect()
    }
}

/// A designer shared between tasks. At most one synchronisation cycle runs at a time.
#[derive(Debug)]
pub struct SharedDesigner<S> {
    inner: Arc<Mutex<FlowDesigner<S>>>,
}

impl<S> Clone for SharedDesigner<S> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<S: RenderingSurface> SharedDesigner<S> {
    pub fn new(designer: FlowDesigner<S>) -> Self {
        Self { inner: Arc::new(Mutex::new(designer)) }
    }

    pub async fn lock(&self) -> MutexGuard<'_, FlowDesigner<S>> {
        self.inner.lock().await
    }

    /// Waits for any running cycle to finish, then runs another.
    pub async fn auto_arrange(&self) -> SyncReport {
        self.inner.lock().await.auto_arrange().await
    }

    /// Runs a cycle only if none is running.
    pub async fn try_auto_arrange(&self) -> Result<SyncReport, SyncError> {
        let mut designer = self.inner.try_lock().map_err(|_| SyncError::CycleInProgress)?;
        Ok(designer.auto_arrange().await)
    }
}
