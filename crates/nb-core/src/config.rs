//! Board configuration.

use crate::model::{DEFAULT_NODE_SIZE, MIN_NODE_SIZE};
use serde::{Deserialize, Serialize};

/// The visible area of the root canvas, in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

/// Configuration for a [`Board`](crate::board::Board).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Used by canvas centering to place the target mid-screen.
    pub viewport: Viewport,

    /// Size given to entities created through the form. Default: **300 × 300**.
    pub default_width: f32,
    pub default_height: f32,

    /// Resize floor applied by drag handles. Never lower than [`MIN_NODE_SIZE`].
    pub min_node_size: f32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            default_width: DEFAULT_NODE_SIZE,
            default_height: DEFAULT_NODE_SIZE,
            min_node_size: MIN_NODE_SIZE,
        }
    }
}

impl BoardConfig {
    #[must_use]
    pub fn with_viewport(mut self, width: f32, height: f32) -> Self {
        self.viewport = Viewport { width, height };
        self
    }

    /// The resize floor actually enforced.
    pub fn effective_min_size(&self) -> f32 {
        self.min_node_size.max(MIN_NODE_SIZE)
    }
}
