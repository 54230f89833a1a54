// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nereid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Graph data model.
//!
//! Nodes and connections live in a `GraphModel`; ids, geometry and the serialisable design
//! snapshot sit next to it.

pub mod design;
pub mod events;
pub mod fixtures;
pub mod geometry;
pub mod graph;
pub mod ids;

pub use design::{
    ConnectionData, FlowDesign, FlowDesignConnection, FlowDesignNode, GraphData, NodeData,
};
pub use events::{ConnectionEndpoints, EventBus, GraphEvent};
pub use geometry::{Point, Rect, Size};
pub use graph::{
    Anchor, Anchors, Connection, ConnectionAttrs, ConnectionEndpoint, ConnectionPatch,
    ConnectionStyle, ConnectorKind, GraphError, GraphModel, Node, RemovedNode,
};
pub use ids::{ConnectionId, Id, IdError, NodeId};
