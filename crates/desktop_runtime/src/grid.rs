//! Desktop icon grid: drop snapping, "arrange icons" layout, shortcut placement and selection.

use std::collections::{BTreeMap, BTreeSet};

use desktop_app_contract::AppId;
use serde::{Deserialize, Serialize};

use crate::{
    config::GridConfig,
    model::{DesktopShortcut, IconRef, Position},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Resolved grid geometry. `origin` already includes the icon inset.
pub struct DesktopGrid {
    cell: i32,
    origin: Position,
    drop_anchor: i32,
    reserved_height: i32,
}

impl DesktopGrid {
    pub fn from_config(config: &GridConfig) -> Self {
        Self {
            cell: config.cell_size.max(1),
            origin: Position::new(
                config.offset_x.saturating_add(config.icon_inset).max(0),
                config.offset_y.saturating_add(config.icon_inset).max(0),
            ),
            drop_anchor: config.drop_anchor,
            reserved_height: config.arrange_reserved_height,
        }
    }

    /// Top-left cell of the grid.
    pub fn origin(&self) -> Position {
        self.origin
    }

    /// Snaps a raw icon coordinate onto the nearest grid cell.
    ///
    /// Computes `round((raw - origin) / cell) * cell + origin` per axis, never going above or
    /// left of the grid origin. Snapping an already-snapped coordinate returns it unchanged.
    pub fn snap(&self, raw: Position) -> Position {
        Position::new(
            snap_axis(raw.x, self.origin.x, self.cell),
            snap_axis(raw.y, self.origin.y, self.cell),
        )
    }

    /// Converts a pointer drop location into the snapped top-left corner of the dropped icon.
    pub fn snap_drop(&self, pointer: Position) -> Position {
        self.snap(Position::new(
            pointer.x.saturating_sub(self.drop_anchor).max(0),
            pointer.y.saturating_sub(self.drop_anchor).max(0),
        ))
    }

    /// Top-left corner of a grid cell, saturating at the far edge of the coordinate space.
    pub fn cell_position(&self, column: usize, row: usize) -> Position {
        Position::new(
            cell_axis(self.origin.x, column, self.cell),
            cell_axis(self.origin.y, row, self.cell),
        )
    }

    /// Rows that fit in a viewport of `viewport_height` px. Always at least one.
    pub fn max_rows(&self, viewport_height: i32) -> usize {
        let usable = viewport_height.saturating_sub(self.reserved_height);
        usize::try_from(usable / self.cell).unwrap_or(0).max(1)
    }

    /// Column-major slots for `count` icons.
    pub fn arrange(&self, count: usize, viewport_height: i32) -> Vec<Position> {
        let rows = self.max_rows(viewport_height);
        (0..count)
            .map(|index| self.cell_position(index / rows, index % rows))
            .collect()
    }
}

// Integer form of `floor(d / cell + 0.5)`, matching half-up rounding for negative offsets too.
// Worked in i64; a cell rounded past i32::MAX falls back to the last cell that fits.
fn snap_axis(raw: i32, origin: i32, cell: i32) -> i32 {
    let (raw, origin, cell) = (i64::from(raw), i64::from(origin), i64::from(cell));
    let cells = (2 * (raw - origin) + cell).div_euclid(2 * cell);
    let mut snapped = (cells * cell + origin).max(origin);
    if snapped > i64::from(i32::MAX) {
        snapped -= cell;
    }
    i32::try_from(snapped).unwrap_or(i32::MAX)
}

fn cell_axis(origin: i32, index: usize, cell: i32) -> i32 {
    i64::try_from(index)
        .ok()
        .and_then(|index| index.checked_mul(i64::from(cell)))
        .and_then(|offset| offset.checked_add(i64::from(origin)))
        .and_then(|value| i32::try_from(value).ok())
        .unwrap_or(i32::MAX)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
/// Placement of static app shortcuts plus the current icon selection.
pub struct DesktopIconLayout {
    shortcuts: Vec<DesktopShortcut>,
    positions: BTreeMap<AppId, Position>,
    selection: BTreeSet<IconRef>,
}

impl DesktopIconLayout {
    /// Places every shortcut in the first grid column, in table order.
    pub fn new(shortcuts: Vec<DesktopShortcut>, grid: &DesktopGrid) -> Self {
        let positions = shortcuts
            .iter()
            .enumerate()
            .map(|(row, shortcut)| (shortcut.app_id, grid.cell_position(0, row)))
            .collect();
        Self {
            shortcuts,
            positions,
            selection: BTreeSet::new(),
        }
    }

    pub fn shortcuts(&self) -> &[DesktopShortcut] {
        &self.shortcuts
    }

    pub fn has_shortcut(&self, app_id: AppId) -> bool {
        self.positions.contains_key(&app_id)
    }

    pub fn position(&self, app_id: AppId) -> Option<Position> {
        self.positions.get(&app_id).copied()
    }

    /// Moves a shortcut. Returns `false` for apps without a desktop shortcut.
    pub fn set_position(&mut self, app_id: AppId, position: Position) -> bool {
        match self.positions.get_mut(&app_id) {
            Some(slot) => {
                *slot = position;
                true
            }
            None => false,
        }
    }

    /// Plain click selects only `icon`; an additive (ctrl) click toggles it.
    pub fn select(&mut self, icon: IconRef, additive: bool) {
        if !additive {
            self.selection.clear();
            self.selection.insert(icon);
        } else if !self.selection.remove(&icon) {
            self.selection.insert(icon);
        }
    }

    pub fn deselect(&mut self, icon: &IconRef) {
        self.selection.remove(icon);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn is_selected(&self, icon: &IconRef) -> bool {
        self.selection.contains(icon)
    }

    pub fn selection(&self) -> impl Iterator<Item = &IconRef> + '_ {
        self.selection.iter()
    }
}
