// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nereid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Headless surface keeping its state in memory.
//!
//! Behaves like a browser diagram library in the ways the synchroniser depends on: new nodes only
//! accept connections after the next `settle`, every connect/detach fires an event, and geometry
//! comes from per-node sizes. Failure injection covers stale ids and stalled settling.

use std::collections::{BTreeMap, BTreeSet};

use super::{
    ConnectRequest, ConnectionHandle, DrawnConnection, RenderingSurface, SurfaceError, SurfaceEvent,
};
use crate::model::{ConnectionStyle, NodeId, Point, Rect, Size};

#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceNode {
    pub label: String,
    pub position: Point,
    pub size: Size,
    pub draggable: Option<Rect>,
    pub registered: bool,
}

#[derive(Debug, Clone)]
pub struct InMemorySurface {
    viewport: Size,
    default_size: Size,
    nodes: BTreeMap<NodeId, SurfaceNode>,
    connections: Vec<DrawnConnection>,
    next_handle: u64,
    events: Vec<SurfaceEvent>,
    failing_nodes: BTreeSet<NodeId>,
    stalled: bool,
    repaints: usize,
    settles: usize,
}

impl InMemorySurface {
    pub fn new(viewport: Size, default_size: Size) -> Self {
        Self {
            viewport,
            default_size,
            nodes: BTreeMap::new(),
            connections: Vec::new(),
            next_handle: 0,
            events: Vec::new(),
            failing_nodes: BTreeSet::new(),
            stalled: false,
            repaints: 0,
            settles: 0,
        }
    }

    pub fn node(&self, node_id: &NodeId) -> Option<&SurfaceNode> {
        self.nodes.get(node_id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn repaint_count(&self) -> usize {
        self.repaints
    }

    pub fn settle_count(&self) -> usize {
        self.settles
    }

    /// Overrides the rendered size of a node, as if its content changed.
    pub fn resize_node(&mut self, node_id: &NodeId, size: Size) -> Result<(), SurfaceError> {
        self.node_mut(node_id)?.size = size;
        Ok(())
    }

    /// Every later connect touching `node_id` fails with `Rejected`.
    pub fn fail_connections_touching(&mut self, node_id: NodeId) {
        self.failing_nodes.insert(node_id);
    }

    /// Makes `settle` never resolve.
    pub fn stall(&mut self, stalled: bool) {
        self.stalled = stalled;
    }

    /// Simulates the user dragging a new connection between two nodes.
    pub fn user_connect(&mut self, source_id: &NodeId, target_id: &NodeId) -> Result<ConnectionHandle, SurfaceError> {
        self.connect(&ConnectRequest {
            source_id: source_id.clone(),
            target_id: target_id.clone(),
            style: None,
            anchors: Default::default(),
            label: None,
        })
    }

    /// Simulates the user removing a drawn connection.
    pub fn user_detach(&mut self, handle: ConnectionHandle) -> Result<(), SurfaceError> {
        self.disconnect(handle)
    }

    fn node_mut(&mut self, node_id: &NodeId) -> Result<&mut SurfaceNode, SurfaceError> {
        self.nodes.get_mut(node_id).ok_or_else(|| SurfaceError::UnknownNode { node_id: node_id.clone() })
    }

    fn ready_node(&self, node_id: &NodeId) -> Result<(), SurfaceError> {
        match self.nodes.get(node_id) {
            None => Err(SurfaceError::UnknownNode { node_id: node_id.clone() }),
            Some(node) if !node.registered => Err(SurfaceError::NodeNotReady { node_id: node_id.clone() }),
            Some(_) => Ok(()),
        }
    }

    fn detach_at(&mut self, index: usize) {
        let connection = self.connections.remove(index);
        self.events.push(SurfaceEvent::ConnectionDetached {
            source_id: connection.source_id,
            target_id: connection.target_id,
            handle: connection.handle,
        });
    }
}

impl RenderingSurface for InMemorySurface {
    fn create_node(&mut self, node_id: &NodeId, label: &str, position: Point) -> Result<(), SurfaceError> {
        if self.nodes.contains_key(node_id) {
            return Err(SurfaceError::Rejected { reason: format!("duplicate element id {node_id}") });
        }
        self.nodes.insert(
            node_id.clone(),
            SurfaceNode {
                label: label.to_owned(),
                position,
                size: self.default_size,
                draggable: None,
                registered: false,
            },
        );
        Ok(())
    }

    fn destroy_node(&mut self, node_id: &NodeId) -> Result<(), SurfaceError> {
        if self.nodes.remove(node_id).is_none() {
            return Err(SurfaceError::UnknownNode { node_id: node_id.clone() });
        }
        while let Some(index) = self
            .connections
            .iter()
            .position(|c| &c.source_id == node_id || &c.target_id == node_id)
        {
            self.detach_at(index);
        }
        Ok(())
    }

    fn set_node_draggable(&mut self, node_id: &NodeId, bounds: Rect) -> Result<(), SurfaceError> {
        self.node_mut(node_id)?.draggable = Some(bounds);
        Ok(())
    }

    fn place_node(&mut self, node_id: &NodeId, position: Point) -> Result<(), SurfaceError> {
        self.node_mut(node_id)?.position = position;
        Ok(())
    }

    fn connect(&mut self, request: &ConnectRequest) -> Result<ConnectionHandle, SurfaceError> {
        self.ready_node(&request.source_id)?;
        self.ready_node(&request.target_id)?;
        if let Some(node_id) = [&request.source_id, &request.target_id]
            .into_iter()
            .find(|id| self.failing_nodes.contains(*id))
        {
            return Err(SurfaceError::Rejected { reason: format!("endpoint {node_id} refused the connection") });
        }

        self.next_handle += 1;
        let handle = ConnectionHandle::new(self.next_handle);
        self.connections.push(DrawnConnection {
            handle,
            source_id: request.source_id.clone(),
            target_id: request.target_id.clone(),
            style: request.style.clone(),
            label: request.label.clone(),
            anchors: request.anchors,
        });
        self.events.push(SurfaceEvent::ConnectionCreated {
            source_id: request.source_id.clone(),
            target_id: request.target_id.clone(),
            handle,
        });
        Ok(handle)
    }

    fn restyle(
        &mut self,
        handle: ConnectionHandle,
        label: Option<&str>,
        style: Option<&ConnectionStyle>,
    ) -> Result<(), SurfaceError> {
        let connection = self
            .connections
            .iter_mut()
            .find(|c| c.handle == handle)
            .ok_or(SurfaceError::UnknownHandle { handle })?;
        connection.label = label.map(ToOwned::to_owned);
        connection.style = style.cloned();
        Ok(())
    }

    fn disconnect(&mut self, handle: ConnectionHandle) -> Result<(), SurfaceError> {
        let index = self
            .connections
            .iter()
            .position(|c| c.handle == handle)
            .ok_or(SurfaceError::UnknownHandle { handle })?;
        self.detach_at(index);
        Ok(())
    }

    fn disconnect_all(&mut self) {
        while !self.connections.is_empty() {
            self.detach_at(0);
        }
    }

    fn all_connections(&self) -> Vec<DrawnConnection> {
        self.connections.clone()
    }

    fn node_geometry(&self, node_id: &NodeId) -> Option<Size> {
        self.nodes.get(node_id).map(|node| node.size)
    }

    fn viewport(&self) -> Size {
        self.viewport
    }

    fn repaint(&mut self) {
        self.repaints += 1;
    }

    fn take_events(&mut self) -> Vec<SurfaceEvent> {
        std::mem::take(&mut self.events)
    }

    async fn settle(&mut self) {
        if self.stalled {
            std::future::pending::<()>().await;
        }
        tokio::task::yield_now().await;
        for node in self.nodes.values_mut() {
            node.registered = true;
        }
        self.settles += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::InMemorySurface;
    use crate::model::{NodeId, Point, Size};
    use crate::surface::{RenderingSurface, SurfaceError, SurfaceEvent};

    fn nid(value: &str) -> NodeId {
        NodeId::new(value).expect("node id")
    }

    fn surface() -> InMemorySurface {
        InMemorySurface::new(Size::new(800.0, 600.0), Size::new(120.0, 40.0))
    }

    #[tokio::test]
    async fn nodes_accept_connections_only_after_settling() {
        let mut surface = surface();
        surface.create_node(&nid("a"), "A", Point::default()).unwrap();
        surface.create_node(&nid("b"), "B", Point::default()).unwrap();

        assert_eq!(
            surface.user_connect(&nid("a"), &nid("b")),
            Err(SurfaceError::NodeNotReady { node_id: nid("a") })
        );

        surface.settle().await;
        let handle = surface.user_connect(&nid("a"), &nid("b")).expect("connect");
        assert_eq!(
            surface.take_events(),
            vec![SurfaceEvent::ConnectionCreated { source_id: nid("a"), target_id: nid("b"), handle }]
        );
    }

    #[tokio::test]
    async fn destroying_a_node_detaches_its_connections() {
        let mut surface = surface();
        for id in ["a", "b", "c"] {
            surface.create_node(&nid(id), id, Point::default()).unwrap();
        }
        surface.settle().await;
        surface.user_connect(&nid("a"), &nid("b")).unwrap();
        surface.user_connect(&nid("b"), &nid("c")).unwrap();
        surface.take_events();

        surface.destroy_node(&nid("b")).unwrap();

        assert_eq!(surface.connection_count(), 0);
        assert_eq!(surface.take_events().len(), 2);
    }

    #[tokio::test]
    async fn failure_injection_rejects_connections() {
        let mut surface = surface();
        surface.create_node(&nid("a"), "A", Point::default()).unwrap();
        surface.create_node(&nid("b"), "B", Point::default()).unwrap();
        surface.settle().await;
        surface.fail_connections_touching(nid("b"));

        assert!(matches!(
            surface.user_connect(&nid("a"), &nid("b")),
            Err(SurfaceError::Rejected { .. })
        ));
        assert!(surface.take_events().is_empty());
    }
}
