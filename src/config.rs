// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nereid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Tunables for layout, node scatter, default node geometry and surface synchronisation.
//!
//! Every section deserialises with defaults, so a config file only needs the keys it overrides.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::model::{Point, Size};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    pub layout: LayoutConfig,
    pub scatter: ScatterConfig,
    pub nodes: NodeDefaults,
    pub sync: SyncConfig,
    pub canvas: CanvasConfig,
}

impl FlowConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::from_json(&raw).map_err(|source| ConfigError::Json { path: path.to_path_buf(), source })
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Horizontal gap reserved after every subtree; also the horizontal overlap nudge.
    pub node_spacing_x: f64,
    /// Vertical distance between two depth levels; also the vertical overlap nudge.
    pub level_spacing: f64,
    /// `y` of depth level 0 before centering.
    pub level_base_offset: f64,
    pub center_vertically: bool,
    pub max_overlap_passes: usize,
    /// Wall-clock budget for overlap resolution. `None` leaves only the pass cap.
    pub overlap_time_budget_ms: Option<u64>,
}

impl LayoutConfig {
    pub fn overlap_time_budget(&self) -> Option<Duration> {
        self.overlap_time_budget_ms.map(Duration::from_millis)
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_spacing_x: 120.0,
            level_spacing: 100.0,
            level_base_offset: 50.0,
            center_vertically: true,
            max_overlap_passes: 256,
            overlap_time_budget_ms: Some(250),
        }
    }
}

/// Bounds for the random initial position of nodes added without one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScatterConfig {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    /// Fixed seed for reproducible scatter; entropy-seeded when absent.
    pub seed: Option<u64>,
}

impl ScatterConfig {
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x_min && point.x <= self.x_max && point.y >= self.y_min && point.y <= self.y_max
    }
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self { x_min: 100.0, x_max: 500.0, y_min: 50.0, y_max: 350.0, seed: None }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeDefaults {
    pub width: f64,
    pub height: f64,
    pub label_prefix: String,
}

impl NodeDefaults {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl Default for NodeDefaults {
    fn default() -> Self {
        Self { width: 120.0, height: 40.0, label_prefix: "Node ".to_owned() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Deadline for a single surface suspension point before the cycle moves on.
    pub settle_timeout_ms: u64,
}

impl SyncConfig {
    pub fn settle_timeout(&self) -> Duration {
        Duration::from_millis(self.settle_timeout_ms)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self { settle_timeout_ms: 1000 }
    }
}

/// Viewport of the headless surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: f64,
    pub height: f64,
}

impl CanvasConfig {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self { width: 1200.0, height: 800.0 }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: io::Error },
    Json { path: PathBuf, source: serde_json::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "failed to read config {}: {source}", path.display()),
            Self::Json { path, source } => {
                write!(f, "failed to parse config {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}
