//! Tunables for a desktop session, normally taken from the `[runtime]` seed section.

use serde::{Deserialize, Serialize};

use crate::model::Position;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Invisible icon grid on the desktop surface.
pub struct GridConfig {
    /// Edge length of one grid cell in px.
    pub cell_size: i32,
    /// Desktop padding before the first column.
    pub offset_x: i32,
    /// Desktop padding before the first row.
    pub offset_y: i32,
    /// Gap between a grid line and the icon it holds.
    pub icon_inset: i32,
    /// Distance from the pointer to the icon's top-left corner while dragging.
    pub drop_anchor: i32,
    /// Vertical space kept free (taskbar and margins) when arranging icons.
    pub arrange_reserved_height: i32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_size: 85,
            offset_x: 16,
            offset_y: 16,
            icon_inset: 2,
            drop_anchor: 40,
            arrange_reserved_height: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub grid: GridConfig,
    /// Position a file receives when moved to the desktop without coordinates.
    pub default_drop_position: Position,
    /// Stack counter value before the first window is raised.
    pub z_index_base: u64,
    /// Stack counter value that triggers renormalisation of every z-index.
    pub z_index_renormalize_threshold: u64,
    pub screensaver_timeout_ms: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            default_drop_position: Position::new(100, 100),
            z_index_base: 100,
            z_index_renormalize_threshold: 1_000_000,
            screensaver_timeout_ms: 120_000,
        }
    }
}
