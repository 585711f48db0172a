//! Right-click menus for the desktop surface and its icons.

use desktop_app_contract::AppId;
use serde::{Deserialize, Serialize};

use crate::{
    model::{DesktopState, IconRef},
    reducer::DesktopAction,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "kebab-case")]
pub enum ContextMenuTarget {
    Desktop,
    File(String),
    App(AppId),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextMenuItem {
    pub label: &'static str,
    /// `None` renders the item disabled.
    pub action: Option<DesktopAction>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ContextMenuEntry {
    Item(ContextMenuItem),
    Separator,
}

impl ContextMenuEntry {
    fn item(label: &'static str, action: DesktopAction) -> Self {
        Self::Item(ContextMenuItem {
            label,
            action: Some(action),
        })
    }

    fn disabled(label: &'static str) -> Self {
        Self::Item(ContextMenuItem {
            label,
            action: None,
        })
    }

    pub fn label(&self) -> Option<&'static str> {
        match self {
            Self::Item(item) => Some(item.label),
            Self::Separator => None,
        }
    }

    pub fn action(&self) -> Option<&DesktopAction> {
        match self {
            Self::Item(item) => item.action.as_ref(),
            Self::Separator => None,
        }
    }
}

/// Builds the menu for `target`. Returns an empty menu for a file id that is no longer
/// registered.
///
/// `viewport_height` is forwarded to the arrange actions.
pub fn context_menu(
    state: &DesktopState,
    target: &ContextMenuTarget,
    viewport_height: i32,
) -> Vec<ContextMenuEntry> {
    use ContextMenuEntry::Separator;

    let arrange = [
        ContextMenuEntry::item(
            "Arrange Icons",
            DesktopAction::ArrangeIcons { viewport_height },
        ),
        ContextMenuEntry::item(
            "Line up Icons",
            DesktopAction::ArrangeIcons { viewport_height },
        ),
        Separator,
        ContextMenuEntry::item("Refresh", DesktopAction::ResetSession),
        Separator,
    ];

    match target {
        ContextMenuTarget::Desktop => {
            let mut entries = Vec::from(arrange);
            entries.extend([
                ContextMenuEntry::item(
                    "New",
                    DesktopAction::OpenWindow {
                        app_id: AppId::Textcraft,
                    },
                ),
                Separator,
                ContextMenuEntry::item("Properties", DesktopAction::ShowDesktopProperties),
            ]);
            entries
        }
        ContextMenuTarget::File(file_id) => {
            if state.files.get(file_id).is_none() {
                return Vec::new();
            }
            let mut entries = vec![
                ContextMenuEntry::item(
                    "Open",
                    DesktopAction::ActivateIcon {
                        icon: IconRef::File(file_id.clone()),
                    },
                ),
                Separator,
                ContextMenuEntry::item(
                    "Delete",
                    DesktopAction::DeleteFile {
                        file_id: file_id.clone(),
                    },
                ),
                Separator,
            ];
            entries.extend(arrange);
            entries.push(ContextMenuEntry::disabled("Properties"));
            entries
        }
        ContextMenuTarget::App(app_id) => {
            let mut entries = vec![
                ContextMenuEntry::item("Open", DesktopAction::OpenWindow { app_id: *app_id }),
                Separator,
            ];
            if *app_id == AppId::RecycleBin {
                entries.extend([
                    ContextMenuEntry::item(
                        "Empty Recycle Bin",
                        DesktopAction::RequestEmptyRecycleBin { step: 0 },
                    ),
                    Separator,
                ]);
            }
            entries.extend(arrange);
            entries.push(ContextMenuEntry::disabled("Properties"));
            entries
        }
    }
}
