// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nereid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Nereid Flow: graph model, hierarchical auto-layout and rendering-surface synchronisation for
//! flow designers.
//!
//! The crate is split the way data flows through it: `model` holds the authoritative graph,
//! `layout` turns a graph snapshot into positions, `surface` is the contract with whatever draws
//! the graph, `sync` keeps the drawing consistent with the model and `designer` is the facade an
//! embedding UI calls.

pub mod config;
pub mod designer;
pub mod layout;
pub mod model;
pub mod surface;
pub mod sync;

pub use config::FlowConfig;
pub use designer::{DesignerError, FlowDesigner, LoadReport, SharedDesigner, SyncError};
pub use layout::{compute_layout, Layout, LayoutNonConvergenceError};
pub use model::{FlowDesign, GraphData, GraphModel};
pub use surface::{InMemorySurface, RenderingSurface};
pub use sync::{ConnectionSynchronizer, SurfaceSyncError, SyncReport};
