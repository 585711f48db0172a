//! State core of a mid-1990s style desktop: virtual file system, window manager, drag-and-drop
//! protocol, desktop grid and boot session, composed behind a single reducer.

pub mod config;
pub mod controller;
pub mod drag;
pub mod file_registry;
pub mod grid;
pub mod menus;
pub mod model;
pub mod notices;
pub mod reducer;
pub mod seed;
pub mod system;
pub mod window_manager;

pub use config::{GridConfig, RuntimeConfig};
pub use controller::{DesktopController, EffectSink};
pub use drag::{DragChannels, DragError, DragPayload, ProtectedItem};
pub use file_registry::{FileRegistry, FileRegistryError};
pub use grid::{DesktopGrid, DesktopIconLayout};
pub use menus::{context_menu, ContextMenuEntry, ContextMenuTarget};
pub use model::*;
pub use notices::{Notice, NoticeButton, NoticeSeverity};
pub use reducer::{reduce_desktop, DesktopAction, DropTarget, ReducerError, RuntimeEffect};
pub use seed::{SeedError, SeedTables};
pub use system::{BootPhase, SystemSession};
pub use window_manager::WindowRegistry;
