// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nereid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Contract with the diagram-drawing surface.
//!
//! The surface owns the visual artefacts: node elements, their endpoints and the drawn
//! connections. It reports user gestures as `SurfaceEvent`s and exposes geometry. Only the
//! `ConnectionSynchronizer` issues draw commands against it.

pub mod memory;

use std::fmt;
use std::future::Future;

use crate::model::{Anchors, ConnectionStyle, NodeId, Point, Rect, Size};

pub use memory::InMemorySurface;

/// Opaque handle of one drawn connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionHandle(u64);

impl ConnectionHandle {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConnectRequest {
    pub source_id: NodeId,
    pub target_id: NodeId,
    pub style: Option<ConnectionStyle>,
    pub anchors: Anchors,
    pub label: Option<String>,
}

/// A connection as currently drawn, with everything its position does not determine.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawnConnection {
    pub handle: ConnectionHandle,
    pub source_id: NodeId,
    pub target_id: NodeId,
    pub style: Option<ConnectionStyle>,
    pub label: Option<String>,
    pub anchors: Anchors,
}

impl DrawnConnection {
    pub fn to_request(&self) -> ConnectRequest {
        ConnectRequest {
            source_id: self.source_id.clone(),
            target_id: self.target_id.clone(),
            style: self.style.clone(),
            anchors: self.anchors,
            label: self.label.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    ConnectionCreated { source_id: NodeId, target_id: NodeId, handle: ConnectionHandle },
    ConnectionDetached { source_id: NodeId, target_id: NodeId, handle: ConnectionHandle },
}

impl SurfaceEvent {
    pub fn handle(&self) -> ConnectionHandle {
        match self {
            Self::ConnectionCreated { handle, .. } | Self::ConnectionDetached { handle, .. } => *handle,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    UnknownNode { node_id: NodeId },
    /// The node exists but has not finished registering its endpoints yet.
    NodeNotReady { node_id: NodeId },
    UnknownHandle { handle: ConnectionHandle },
    Rejected { reason: String },
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownNode { node_id } => write!(f, "surface has no node {node_id}"),
            Self::NodeNotReady { node_id } => {
                write!(f, "surface node {node_id} is not registered yet")
            }
            Self::UnknownHandle { handle } => write!(f, "surface has no connection {handle}"),
            Self::Rejected { reason } => write!(f, "surface rejected the command: {reason}"),
        }
    }
}

impl std::error::Error for SurfaceError {}

pub trait RenderingSurface {
    fn create_node(&mut self, node_id: &NodeId, label: &str, position: Point) -> Result<(), SurfaceError>;

    fn destroy_node(&mut self, node_id: &NodeId) -> Result<(), SurfaceError>;

    fn set_node_draggable(&mut self, node_id: &NodeId, bounds: Rect) -> Result<(), SurfaceError>;

    fn place_node(&mut self, node_id: &NodeId, position: Point) -> Result<(), SurfaceError>;

    fn connect(&mut self, request: &ConnectRequest) -> Result<ConnectionHandle, SurfaceError>;

    /// Re-applies label and style on an existing connection.
    fn restyle(
        &mut self,
        handle: ConnectionHandle,
        label: Option<&str>,
        style: Option<&ConnectionStyle>,
    ) -> Result<(), SurfaceError>;

    fn disconnect(&mut self, handle: ConnectionHandle) -> Result<(), SurfaceError>;

    fn disconnect_all(&mut self);

    fn all_connections(&self) -> Vec<DrawnConnection>;

    fn node_geometry(&self, node_id: &NodeId) -> Option<Size>;

    fn viewport(&self) -> Size;

    fn repaint(&mut self);

    /// Drains the events fired since the last call, oldest first.
    ///
    /// A surface should fire `ConnectionCreated`/`ConnectionDetached` for its own `connect`,
    /// `disconnect`, `disconnect_all` and `destroy_node` calls as well as for user gestures. The
    /// synchroniser discards the echoes of its own commands; a surface that stays silent about
    /// them is tolerated.
    fn take_events(&mut self) -> Vec<SurfaceEvent>;

    /// Resolves once pending registration, detach bookkeeping and geometry updates have been
    /// committed. This is the suspension point between dependent steps.
    fn settle(&mut self) -> impl Future<Output = ()>;
}
