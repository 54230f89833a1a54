// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nereid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Model/surface reconciliation.
//!
//! `ConnectionSynchronizer` is the only component that issues draw commands. It remembers which
//! drawn handle belongs to which model connection, filters the events its own commands cause out
//! of the surface's event stream and runs the auto-arrange cycle:
//!
//! snapshot -> settle -> geometry -> layout -> reposition -> settle -> clear -> settle -> redraw -> repaint
//!
//! A connection that cannot be redrawn is reported in the `SyncReport` and the cycle goes on.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::config::{LayoutConfig, SyncConfig};
use crate::layout::{compute_layout, LayoutNonConvergenceError};
use crate::model::{Connection, ConnectionId, GraphModel, Node, NodeId, Point, Rect};
use crate::surface::{
    ConnectRequest, ConnectionHandle, DrawnConnection, RenderingSurface, SurfaceError, SurfaceEvent,
};

/// A drawn connection the surface refused to re-create during a bulk operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceSyncError {
    pub source_id: NodeId,
    pub target_id: NodeId,
    /// Model connection the drawn artefact belonged to, when it was bound to one.
    pub connection_id: Option<ConnectionId>,
    pub cause: SurfaceError,
}

impl fmt::Display for SurfaceSyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to redraw connection {} -> {}", self.source_id, self.target_id)?;
        if let Some(connection_id) = &self.connection_id {
            write!(f, " ({connection_id})")?;
        }
        write!(f, ": {}", self.cause)
    }
}

impl std::error::Error for SurfaceSyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.cause)
    }
}

/// Outcome of one auto-arrange cycle.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SyncReport {
    /// 1-based cycle number; 0 when the cycle was skipped.
    pub cycle: u64,
    pub positioned: usize,
    pub snapshot_len: usize,
    pub restored: usize,
    pub failures: Vec<SurfaceSyncError>,
    pub layout_non_convergence: Option<LayoutNonConvergenceError>,
}

impl SyncReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.layout_non_convergence.is_none()
    }
}

#[derive(Debug)]
pub struct ConnectionSynchronizer<S> {
    surface: S,
    bindings: BTreeMap<ConnectionHandle, ConnectionId>,
    settle_timeout: Duration,
    cycles: u64,
    own_created: BTreeSet<ConnectionHandle>,
    own_detached: BTreeSet<ConnectionHandle>,
    foreign: Vec<SurfaceEvent>,
}

impl<S: RenderingSurface> ConnectionSynchronizer<S> {
    pub fn new(surface: S, config: &SyncConfig) -> Self {
        Self {
            surface,
            bindings: BTreeMap::new(),
            settle_timeout: config.settle_timeout(),
            cycles: 0,
            own_created: BTreeSet::new(),
            own_detached: BTreeSet::new(),
            foreign: Vec::new(),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Direct surface access for simulating gestures in tests.
    #[cfg(test)]
    pub(crate) fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn binding(&self, handle: ConnectionHandle) -> Option<&ConnectionId> {
        self.bindings.get(&handle)
    }

    pub fn handle_of(&self, connection_id: &ConnectionId) -> Option<ConnectionHandle> {
        self.bindings.iter().find(|(_, bound)| *bound == connection_id).map(|(handle, _)| *handle)
    }

    /// Waits for the surface to commit pending work, giving up after the configured deadline.
    pub async fn settle(&mut self, step: &'static str) {
        if timeout(self.settle_timeout, self.surface.settle()).await.is_err() {
            warn!(
                step,
                timeout_ms = self.settle_timeout.as_millis() as u64,
                "surface did not settle in time; continuing"
            );
        }
    }

    /// Creates the visual element of a model node and makes it draggable inside the viewport.
    pub fn materialize_node(&mut self, node: &Node) -> Result<(), SurfaceError> {
        self.surface.create_node(node.id(), node.label(), node.position())?;
        let bounds = Rect::new(Point::default(), self.surface.viewport());
        self.surface.set_node_draggable(node.id(), bounds)
    }

    /// Removes a node element together with every connection drawn to or from it.
    pub fn dematerialize_node(&mut self, node_id: &NodeId) -> Result<(), SurfaceError> {
        for drawn in self.surface.all_connections() {
            if &drawn.source_id == node_id || &drawn.target_id == node_id {
                self.own_detached.insert(drawn.handle);
                self.bindings.remove(&drawn.handle);
            }
        }
        let result = self.surface.destroy_node(node_id);
        self.absorb_events();
        result
    }

    pub fn place_node(&mut self, node_id: &NodeId, position: Point) -> Result<(), SurfaceError> {
        self.surface.place_node(node_id, position)
    }

    /// Draws a model connection and binds the new handle to it.
    pub fn draw(&mut self, connection: &Connection) -> Result<ConnectionHandle, SurfaceError> {
        let handle = self.issue_connect(&ConnectRequest {
            source_id: connection.source_id().clone(),
            target_id: connection.target_id().clone(),
            style: connection.style().cloned(),
            anchors: connection.anchors(),
            label: connection.label().map(ToOwned::to_owned),
        })?;
        self.bindings.insert(handle, connection.id().clone());
        Ok(handle)
    }

    /// Removes the drawn artefact of a model connection. Unbound connections are left alone.
    pub fn erase(&mut self, connection_id: &ConnectionId) -> Result<(), SurfaceError> {
        let Some(handle) = self.handle_of(connection_id) else {
            return Ok(());
        };
        self.bindings.remove(&handle);
        self.issue_disconnect(handle)
    }

    /// Re-applies a model connection's label and style on its drawn artefact.
    pub fn restyle(&mut self, connection: &Connection) -> Result<(), SurfaceError> {
        let Some(handle) = self.handle_of(connection.id()) else {
            return Ok(());
        };
        self.surface.restyle(handle, connection.label(), connection.style())
    }

    /// Binds a connection the user drew to the model record created for it.
    pub fn adopt(&mut self, handle: ConnectionHandle, connection_id: ConnectionId) {
        self.bindings.insert(handle, connection_id);
    }

    /// Unbinds a handle the user detached, returning the model connection it stood for.
    pub fn forget(&mut self, handle: ConnectionHandle) -> Option<ConnectionId> {
        self.bindings.remove(&handle)
    }

    /// Removes a user-drawn artefact the model refused.
    pub fn discard(&mut self, handle: ConnectionHandle) -> Result<(), SurfaceError> {
        self.bindings.remove(&handle);
        self.issue_disconnect(handle)
    }

    /// Tears down every drawn connection and node element.
    pub fn clear_board(&mut self, node_ids: &[NodeId]) {
        self.issue_disconnect_all();
        for node_id in node_ids {
            if let Err(err) = self.surface.destroy_node(node_id) {
                warn!(node_id = %node_id, "failed to remove node element: {err}");
            }
        }
        self.bindings.clear();
        self.absorb_events();
        self.prune_pending_echoes();
        self.surface.repaint();
    }

    pub fn repaint(&mut self) {
        self.surface.repaint();
    }

    /// Surface events caused by user gestures, oldest first. Events caused by this
    /// synchroniser's own commands are never returned.
    pub fn take_surface_events(&mut self) -> Vec<SurfaceEvent> {
        self.absorb_events();
        std::mem::take(&mut self.foreign)
    }

    /// Recomputes the layout of `model`, applies it to the model and the surface, then
    /// re-creates every drawn connection with the label, style and anchors it had before.
    pub async fn arrange(&mut self, model: &mut GraphModel, config: &LayoutConfig) -> SyncReport {
        if model.is_empty() {
            debug!("auto-arrange skipped: empty graph");
            return SyncReport::default();
        }
        self.cycles += 1;
        let cycle = self.cycles;

        let snapshot = self.surface.all_connections();
        debug!(cycle, connections = snapshot.len(), "captured drawn connections");

        self.settle("geometry").await;
        let fallback = model.default_node_size();
        let mut sizes = BTreeMap::new();
        for node_id in model.node_ids().to_vec() {
            let size = self.surface.node_geometry(&node_id).unwrap_or(fallback).or_sane(fallback);
            if let Err(err) = model.set_node_size(&node_id, size) {
                warn!(node_id = %node_id, "{err}");
            }
            sizes.insert(node_id, size);
        }
        let viewport = self.surface.viewport();

        let layout = compute_layout(model, &sizes, viewport, config);
        for (node_id, position) in layout.positions() {
            if let Err(err) = model.set_node_position(node_id, *position) {
                warn!(node_id = %node_id, "{err}");
            }
            if let Err(err) = self.surface.place_node(node_id, *position) {
                warn!(node_id = %node_id, "failed to move node element: {err}");
            }
        }
        debug!(cycle, positioned = layout.positions().len(), "applied layout");
        self.settle("reposition").await;

        self.issue_disconnect_all();
        self.settle("detach").await;

        let mut restored = 0;
        let mut failures = Vec::new();
        for drawn in &snapshot {
            let connection_id = self.bindings.remove(&drawn.handle);
            match self.redraw(drawn, connection_id.clone()) {
                Ok(()) => restored += 1,
                Err(cause) => {
                    let err = SurfaceSyncError {
                        source_id: drawn.source_id.clone(),
                        target_id: drawn.target_id.clone(),
                        connection_id,
                        cause,
                    };
                    warn!(cycle, "{err}");
                    failures.push(err);
                }
            }
        }
        // Handles that vanished between snapshot and teardown are stale.
        let live = self.surface.all_connections().iter().map(|c| c.handle).collect::<BTreeSet<_>>();
        self.bindings.retain(|handle, _| live.contains(handle));

        self.surface.repaint();
        self.absorb_events();
        self.prune_pending_echoes();

        info!(
            cycle,
            nodes = layout.positions().len(),
            restored,
            failed = failures.len(),
            "auto-arrange complete"
        );
        SyncReport {
            cycle,
            positioned: layout.positions().len(),
            snapshot_len: snapshot.len(),
            restored,
            failures,
            layout_non_convergence: layout.non_convergence().copied(),
        }
    }

    fn redraw(
        &mut self,
        drawn: &DrawnConnection,
        connection_id: Option<ConnectionId>,
    ) -> Result<(), SurfaceError> {
        let handle = self.issue_connect(&drawn.to_request())?;
        if let Some(connection_id) = connection_id {
            self.bindings.insert(handle, connection_id);
        }
        Ok(())
    }

    fn issue_connect(&mut self, request: &ConnectRequest) -> Result<ConnectionHandle, SurfaceError> {
        let handle = self.surface.connect(request)?;
        self.own_created.insert(handle);
        self.absorb_events();
        Ok(handle)
    }

    fn issue_disconnect(&mut self, handle: ConnectionHandle) -> Result<(), SurfaceError> {
        self.own_detached.insert(handle);
        let result = self.surface.disconnect(handle);
        if result.is_err() {
            self.own_detached.remove(&handle);
        }
        self.absorb_events();
        result
    }

    fn issue_disconnect_all(&mut self) {
        for drawn in self.surface.all_connections() {
            self.own_detached.insert(drawn.handle);
        }
        self.surface.disconnect_all();
        self.absorb_events();
    }

    /// Forgets expected echoes the surface never delivered. A created handle stays expected only
    /// while it is still drawn; a detached one is never drawn again.
    fn prune_pending_echoes(&mut self) {
        let live = self.surface.all_connections().iter().map(|c| c.handle).collect::<BTreeSet<_>>();
        self.own_created.retain(|handle| live.contains(handle));
        self.own_detached.clear();
    }

    #[cfg(test)]
    pub(crate) fn pending_echoes(&self) -> usize {
        self.own_created.len() + self.own_detached.len()
    }

    fn absorb_events(&mut self) {
        for event in self.surface.take_events() {
            let own = match &event {
                SurfaceEvent::ConnectionCreated { handle, .. } => self.own_created.remove(handle),
                SurfaceEvent::ConnectionDetached { handle, .. } => self.own_detached.remove(handle),
            };
            if !own {
                self.foreign.push(event);
            }
        }
    }
}
