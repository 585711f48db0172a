//! Lifecycle and stacking order for the closed set of application windows.
//!
//! There is exactly one [`WindowRecord`] per [`AppId`], allocated up front and never removed.
//! Raising a window hands it `current_top + 1`; the focused window is derived from the stack and
//! never stored.

use desktop_app_contract::{AppId, LaunchParams, WindowLifecycleEvent};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::model::{Position, WindowRecord, WindowSize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRegistry {
    /// Indexed by [`AppId::index`].
    windows: Vec<WindowRecord>,
    current_top: u64,
    z_index_base: u64,
    renormalize_threshold: u64,
}

impl WindowRegistry {
    /// Allocates a closed record for every app, taking geometry and titles from `seed` where a
    /// row exists and contract defaults otherwise.
    pub fn new(
        seed: impl IntoIterator<Item = WindowRecord>,
        z_index_base: u64,
        renormalize_threshold: u64,
    ) -> Self {
        let mut windows: Vec<WindowRecord> =
            AppId::ALL.into_iter().map(WindowRecord::closed).collect();
        for mut record in seed {
            record.is_open = false;
            record.is_minimized = false;
            let index = record.app_id.index();
            windows[index] = record;
        }
        Self {
            windows,
            current_top: z_index_base,
            z_index_base,
            renormalize_threshold,
        }
    }

    /// Record for `app_id`, open or not.
    pub fn get(&self, app_id: AppId) -> &WindowRecord {
        &self.windows[app_id.index()]
    }

    /// Every record in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &WindowRecord> + '_ {
        self.windows.iter()
    }

    /// Highest z-index handed out so far.
    pub fn current_top(&self) -> u64 {
        self.current_top
    }

    /// Opens (or re-opens) a window and raises it.
    pub fn open(&mut self, app_id: AppId) -> WindowLifecycleEvent {
        self.open_with(app_id, None)
    }

    /// Opens a window for a specific file, replacing any previous launch parameters.
    pub fn open_with(
        &mut self,
        app_id: AppId,
        launch_params: Option<LaunchParams>,
    ) -> WindowLifecycleEvent {
        debug!("opening window {app_id}");
        let z_index = self.next_top();
        let window = self.record_mut(app_id);
        window.is_open = true;
        window.is_minimized = false;
        window.z_index = z_index;
        window.launch_params = launch_params;
        self.renormalize_if_needed();
        WindowLifecycleEvent::Opened
    }

    /// Closes a window. The stale z-index is kept and ignored while closed.
    pub fn close(&mut self, app_id: AppId) -> Option<WindowLifecycleEvent> {
        let window = self.record_mut(app_id);
        if !window.is_open {
            return None;
        }
        debug!("closing window {app_id}");
        window.is_open = false;
        Some(WindowLifecycleEvent::Closed)
    }

    /// Hides a window to the taskbar without closing it.
    ///
    /// The flag is set whatever the window state; only a visible window reports an event.
    pub fn minimize(&mut self, app_id: AppId) -> Option<WindowLifecycleEvent> {
        let window = self.record_mut(app_id);
        let was_visible = window.is_visible();
        window.is_minimized = true;
        if !was_visible {
            return None;
        }
        debug!("minimizing window {app_id}");
        Some(WindowLifecycleEvent::Minimized)
    }

    /// Raises a window to the top, un-minimizing it first when needed.
    pub fn focus(&mut self, app_id: AppId) -> WindowLifecycleEvent {
        debug!("focusing window {app_id}");
        let z_index = self.next_top();
        let window = self.record_mut(app_id);
        let was_minimized = window.is_minimized;
        window.is_minimized = false;
        window.z_index = z_index;
        self.renormalize_if_needed();
        if was_minimized {
            WindowLifecycleEvent::Restored
        } else {
            WindowLifecycleEvent::Focused
        }
    }

    /// Taskbar button behaviour: restore a minimized window, minimize the focused one, otherwise
    /// bring it to the front.
    pub fn toggle_taskbar(&mut self, app_id: AppId) -> Option<WindowLifecycleEvent> {
        if !self.get(app_id).is_open {
            return None;
        }
        if self.get(app_id).is_minimized {
            Some(self.focus(app_id))
        } else if self.is_focused(app_id) {
            self.minimize(app_id)
        } else {
            Some(self.focus(app_id))
        }
    }

    /// `true` when `app_id` is open, visible and on top of every other visible window.
    pub fn is_focused(&self, app_id: AppId) -> bool {
        let window = self.get(app_id);
        window.is_visible() && self.top_visible_z() == Some(window.z_index)
    }

    /// Topmost visible window, if any.
    pub fn focused(&self) -> Option<AppId> {
        self.windows
            .iter()
            .filter(|window| window.is_visible())
            .max_by_key(|window| window.z_index)
            .map(|window| window.app_id)
    }

    /// Open, minimized or not.
    pub fn is_open(&self, app_id: AppId) -> bool {
        self.get(app_id).is_open
    }

    /// Open windows (minimized included) in registry order, as the taskbar lists them.
    pub fn open_windows(&self) -> impl Iterator<Item = &WindowRecord> + '_ {
        self.windows.iter().filter(|window| window.is_open)
    }

    /// Visible windows from bottom to top.
    pub fn visible_stack(&self) -> Vec<&WindowRecord> {
        let mut stack: Vec<&WindowRecord> = self
            .windows
            .iter()
            .filter(|window| window.is_visible())
            .collect();
        stack.sort_by_key(|window| window.z_index);
        stack
    }

    /// Title bar text, e.g. the document name for TextCraft.
    pub fn set_title(&mut self, app_id: AppId, title: impl Into<String>) {
        self.record_mut(app_id).title = title.into();
    }

    /// Stores the window's top-left corner after a title bar drag.
    pub fn set_position(&mut self, app_id: AppId, position: Position) {
        self.record_mut(app_id).position = position;
    }

    /// Stores the size after a resize.
    pub fn set_size(&mut self, app_id: AppId, size: WindowSize) {
        self.record_mut(app_id).size = Some(size);
    }

    /// Reassigns every z-index to its rank above the base, preserving relative order.
    pub fn renormalize(&mut self) {
        let mut order: Vec<usize> = (0..self.windows.len()).collect();
        order.sort_by_key(|&index| (self.windows[index].z_index, index));
        for (rank, index) in order.into_iter().enumerate() {
            self.windows[index].z_index = self.z_index_base + rank as u64 + 1;
        }
        self.current_top = self.z_index_base + self.windows.len() as u64;
        debug!("renormalized window stack, top is now {}", self.current_top);
    }

    fn top_visible_z(&self) -> Option<u64> {
        self.windows
            .iter()
            .filter(|window| window.is_visible())
            .map(|window| window.z_index)
            .max()
    }

    fn next_top(&mut self) -> u64 {
        self.current_top = self.current_top.saturating_add(1);
        self.current_top
    }

    fn renormalize_if_needed(&mut self) {
        if self.current_top >= self.renormalize_threshold {
            self.renormalize();
        }
    }

    fn record_mut(&mut self, app_id: AppId) -> &mut WindowRecord {
        &mut self.windows[app_id.index()]
    }
}
