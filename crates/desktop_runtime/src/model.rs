use desktop_app_contract::{AppId, LaunchParams};
use serde::{Deserialize, Serialize};

use crate::{
    config::RuntimeConfig, file_registry::FileRegistry, grid::DesktopIconLayout,
    system::SystemSession, window_manager::WindowRegistry,
};

/// Pixel coordinate relative to the desktop's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Explicit window size; absent until the user resizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSize {
    pub width: i32,
    pub height: i32,
}

/// Logical container a file lives in. Membership is exclusive.
/// The single place a file lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileLocation {
    Desktop,
    Floppy,
    CDrive,
    RecycleBin,
}

impl FileLocation {
    pub const ALL: [FileLocation; 4] = [
        FileLocation::Desktop,
        FileLocation::Floppy,
        FileLocation::CDrive,
        FileLocation::RecycleBin,
    ];

    pub const fn token(self) -> &'static str {
        match self {
            Self::Desktop => "desktop",
            Self::Floppy => "floppy",
            Self::CDrive => "c-drive",
            Self::RecycleBin => "recycle-bin",
        }
    }
}

impl std::fmt::Display for FileLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

/// Decides which viewer opens a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileKind {
    Image,
    Text,
    System,
    Executable,
}

/// A virtual file. `position` is only set while the file is on the desktop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: String,
    pub name: String,
    pub kind: FileKind,
    #[serde(default)]
    pub icon_id: String,
    pub location: FileLocation,
    /// Only populated while `location` is [`FileLocation::Desktop`].
    #[serde(default)]
    pub position: Option<Position>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl FileRecord {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: FileKind,
        location: FileLocation,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            icon_id: String::new(),
            location,
            position: None,
            content: None,
            url: None,
        }
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// Lifecycle and geometry of one application window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRecord {
    pub app_id: AppId,
    pub title: String,
    pub icon_id: String,
    pub is_open: bool,
    pub is_minimized: bool,
    /// Relative stacking key; only the ordering among open windows matters.
    pub z_index: u64,
    pub position: Position,
    pub size: Option<WindowSize>,
    pub resizable: bool,
    pub launch_params: Option<LaunchParams>,
}

impl WindowRecord {
    /// Closed record using the contract defaults for `app_id`.
    pub fn closed(app_id: AppId) -> Self {
        Self {
            app_id,
            title: app_id.title().to_string(),
            icon_id: app_id.icon_id().to_string(),
            is_open: false,
            is_minimized: false,
            z_index: 0,
            position: Position::new(48, 48),
            size: None,
            resizable: app_id.resizable(),
            launch_params: None,
        }
    }

    /// Open and not minimized.
    pub fn is_visible(&self) -> bool {
        self.is_open && !self.is_minimized
    }
}

/// Something the user can select or double-click on the desktop surface.
/// Icon on the desktop or in a folder window.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "kebab-case")]
pub enum IconRef {
    App(AppId),
    File(String),
}

/// Static desktop shortcut launching an application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesktopShortcut {
    pub app_id: AppId,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
/// Where the scripted System32 folder currently sits.
pub enum SystemFolderState {
    #[default]
    InPlace,
    Recycled,
}

/// Entry shown by the recycle bin browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "kebab-case")]
pub enum RecycleEntry {
    File(String),
    SystemFolder,
}

/// Everything the presentation layer renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesktopState {
    pub config: RuntimeConfig,
    pub files: FileRegistry,
    pub windows: WindowRegistry,
    pub icons: DesktopIconLayout,
    pub session: SystemSession,
    pub system_folder: SystemFolderState,
    pub start_menu_open: bool,
}

impl DesktopState {
    /// App whose window is on top, if any.
    pub fn focused_app(&self) -> Option<AppId> {
        self.windows.focused()
    }

    /// Whether the recycle bin icon should render as full.
    pub fn recycle_bin_is_full(&self) -> bool {
        self.files.count(FileLocation::RecycleBin) > 0
            || self.system_folder == SystemFolderState::Recycled
    }

    /// Items shown in the recycle bin, files first in insertion order.
    pub fn recycle_entries(&self) -> Vec<RecycleEntry> {
        let mut entries: Vec<RecycleEntry> = self
            .files
            .query(FileLocation::RecycleBin)
            .map(|file| RecycleEntry::File(file.id.clone()))
            .collect();
        if self.system_folder == SystemFolderState::Recycled {
            entries.push(RecycleEntry::SystemFolder);
        }
        entries
    }
}
