//! Message boxes handed to the presentation layer.
//!
//! A [`Notice`] is plain data. Confirmation flows are expressed through [`NoticeButton::action`]:
//! the host dispatches the attached action when the button is pressed and nothing happens in the
//! core until then.

use serde::{Deserialize, Serialize};

use crate::{
    drag::{EasterEgg, ProtectedItem, ProtectionReason, SystemFileClass},
    model::RecycleEntry,
    reducer::DesktopAction,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NoticeSeverity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoticeButton {
    pub label: String,
    /// Default button, triggered by Enter.
    pub primary: bool,
    /// Action to dispatch when pressed. `None` just dismisses the notice.
    pub action: Option<DesktopAction>,
}

impl NoticeButton {
    pub fn dismiss(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            primary: false,
            action: None,
        }
    }

    pub fn dispatch(label: impl Into<String>, action: DesktopAction) -> Self {
        Self {
            label: label.into(),
            primary: false,
            action: Some(action),
        }
    }

    pub fn primary(mut self) -> Self {
        self.primary = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub title: String,
    pub message: String,
    pub severity: NoticeSeverity,
    pub buttons: Vec<NoticeButton>,
}

impl Notice {
    /// Notice with a single primary "OK" button.
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        severity: NoticeSeverity,
    ) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            severity,
            buttons: vec![NoticeButton::dismiss("OK").primary()],
        }
    }

    pub fn with_buttons(mut self, buttons: Vec<NoticeButton>) -> Self {
        self.buttons = buttons;
        self
    }

    /// Actions reachable from this notice's buttons.
    pub fn actions(&self) -> impl Iterator<Item = &DesktopAction> + '_ {
        self.buttons.iter().filter_map(|button| button.action.as_ref())
    }
}

/// What the user tried to do with a protected item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RejectedVerb {
    Move,
    Delete,
}

pub fn rejected_drop(item: &ProtectedItem, verb: RejectedVerb) -> Notice {
    let (title, verb_text) = match verb {
        RejectedVerb::Move => ("Error Moving File", "move"),
        RejectedVerb::Delete => ("Error Deleting File", "delete"),
    };
    let reason = match (item.reason, verb) {
        (ProtectionReason::Drive, _) => {
            "This is a system drive and cannot be moved or deleted.".to_string()
        }
        (ProtectionReason::SystemFile(_), RejectedVerb::Move) => {
            "Access is denied. This file is required by Windows and cannot be moved or deleted."
                .to_string()
        }
        (ProtectionReason::SystemFile(_), RejectedVerb::Delete) => {
            "Access is denied. This file is required by Windows and cannot be deleted.".to_string()
        }
    };
    Notice::new(
        title,
        format!("Cannot {verb_text} {}\n\n{reason}", item.name),
        NoticeSeverity::Error,
    )
}

/// Explanation shown when a system file is double-clicked.
pub fn cannot_open(name: &str, class: SystemFileClass) -> Notice {
    use NoticeSeverity::{Error, Warning};

    let (message, severity) = match class {
        SystemFileClass::Component => (
            format!(
                "Cannot open '{name}':\n\nThis file is a system component and cannot be opened \
                 directly. It is used by Windows and other programs."
            ),
            Error,
        ),
        SystemFileClass::Program => (
            format!(
                "Cannot run '{name}':\n\nAccess is denied. You do not have permission to run \
                 this program.\n\nContact your system administrator."
            ),
            Error,
        ),
        SystemFileClass::Driver => (
            format!(
                "Cannot open '{name}':\n\nThis is a Windows system driver file. Opening or \
                 modifying this file may cause system instability."
            ),
            Warning,
        ),
        SystemFileClass::Configuration => (
            format!(
                "Cannot open '{name}':\n\nThis configuration file is in use by the system and is \
                 locked for editing."
            ),
            Error,
        ),
        SystemFileClass::Font => (
            format!(
                "Cannot preview '{name}':\n\nThis font file is currently in use by the system.\
                 \n\nClose all programs and try again."
            ),
            Warning,
        ),
        SystemFileClass::Data => (
            format!(
                "Cannot open '{name}':\n\nThis file contains system data and cannot be viewed or \
                 modified.\n\nAccess is denied."
            ),
            Error,
        ),
        SystemFileClass::Log => (
            format!(
                "Cannot open '{name}':\n\nThis system log file is currently in use by another \
                 process."
            ),
            Warning,
        ),
        SystemFileClass::Other => (
            format!("Cannot open '{name}':\n\nThis file is protected and cannot be accessed."),
            Error,
        ),
    };
    Notice::new(name, message, severity)
}

pub fn confirm_recycle(egg: EasterEgg) -> Notice {
    let name = egg.display_name();
    Notice::new(
        "Are you sure?",
        format!(
            "You are attempting to move '{name}' to the Recycle Bin.\n\nThis folder contains \
             critical system files required for Windows to function.\n\nAre you sure you want to \
             do this?"
        ),
        NoticeSeverity::Warning,
    )
    .with_buttons(vec![
        NoticeButton::dispatch("Yes", DesktopAction::ConfirmSystemFolderRecycle),
        NoticeButton::dismiss("No").primary(),
    ])
}

pub fn system_folder_recycled() -> Notice {
    Notice::new(
        "Recycle Bin",
        "System32 has been moved to the Recycle Bin.\n\n...You monster.",
        NoticeSeverity::Info,
    )
}

pub fn system_folder_restored() -> Notice {
    Notice::new(
        "Recycle Bin",
        "System32 has been restored.\n\nYour computer thanks you for your mercy.",
        NoticeSeverity::Info,
    )
}

pub fn file_restored() -> Notice {
    Notice::new("Recycle Bin", "File restored to Desktop.", NoticeSeverity::Info)
}

pub fn recycle_bin_already_empty() -> Notice {
    Notice::new(
        "Recycle Bin",
        "The Recycle Bin is already empty.",
        NoticeSeverity::Info,
    )
}

/// Warnings shown, one after the other, before the System32 folder is destroyed.
pub const SYSTEM_FOLDER_WARNINGS: u8 = 3;

/// Confirmation before emptying the bin. `item_count` includes the System32 folder.
///
/// With System32 in the bin the confirmation escalates: each "yes" at `step` asks again at
/// `step + 1` and only the last warning carries [`DesktopAction::EmptyRecycleBin`].
pub fn confirm_empty_recycle_bin(
    item_count: usize,
    includes_system_folder: bool,
    step: u8,
) -> Notice {
    if !includes_system_folder {
        return Notice::new(
            "Confirm Multiple File Delete",
            format!(
                "Are you sure you want to permanently delete {item_count} item(s)?\n\nThis \
                 action cannot be undone."
            ),
            NoticeSeverity::Warning,
        )
        .with_buttons(vec![
            NoticeButton::dispatch("Yes", DesktopAction::EmptyRecycleBin),
            NoticeButton::dismiss("No").primary(),
        ]);
    }

    let step = last_warning(step);
    let (title, message, confirm, cancel) = match step {
        0 => (
            "CRITICAL SYSTEM WARNING",
            format!(
                "You are about to permanently delete {item_count} item(s), including SYSTEM32!\
                 \n\nThis folder contains essential Windows system files. Deleting it will \
                 cause catastrophic system failure.\n\nAre you SURE you want to empty the \
                 Recycle Bin?"
            ),
            "Yes, Empty It",
            "No, Cancel",
        ),
        1 => (
            "SERIOUSLY?!",
            "Wait, you actually clicked yes?\n\nLet me be clear: deleting System32 will \
             literally break Windows. Your desktop will disappear. Programs will stop working. \
             Cats and dogs will start living together. Mass hysteria!\n\nAre you REALLY sure?"
                .to_string(),
            "Yes, I'm Sure!",
            "On second thought...",
        ),
        _ => (
            "FINAL WARNING",
            "Okay, I give up trying to stop you.\n\nJust know that IT will probably yell at \
             you, your computer will make that sad noise, and you'll be telling this story at \
             parties for years.\n\n\"Remember that time I deleted System32?\"\n\nLast chance \
             to back out..."
                .to_string(),
            "YOLO! Delete Everything!",
            "Fine, I'll keep it...",
        ),
    };
    let next = if step + 1 < SYSTEM_FOLDER_WARNINGS {
        DesktopAction::RequestEmptyRecycleBin { step: step + 1 }
    } else {
        DesktopAction::EmptyRecycleBin
    };
    escalating(title, message, (confirm, next), cancel)
}

/// Confirmation before permanently deleting one recycle bin entry. Purging System32 escalates
/// through [`SYSTEM_FOLDER_WARNINGS`] notices the same way emptying the bin does.
pub fn confirm_purge(name: &str, entry: RecycleEntry, step: u8) -> Notice {
    if entry != RecycleEntry::SystemFolder {
        return Notice::new(
            "Confirm File Delete",
            format!(
                "Are you sure you want to permanently delete '{name}'?\n\nThis action cannot \
                 be undone."
            ),
            NoticeSeverity::Warning,
        )
        .with_buttons(vec![
            NoticeButton::dispatch("Yes", DesktopAction::PurgeFromRecycleBin { entry }),
            NoticeButton::dismiss("No").primary(),
        ]);
    }

    let step = last_warning(step);
    let (title, message, confirm, cancel) = match step {
        0 => (
            "CRITICAL SYSTEM WARNING",
            format!(
                "You are about to permanently delete {name}!\n\nThis folder contains essential \
                 Windows system files. Deleting it will cause your computer to become \
                 completely unusable.\n\nAre you ABSOLUTELY SURE you want to do this?"
            ),
            "Yes, Delete It",
            "No, Keep It!",
        ),
        1 => (
            "LAST WARNING",
            format!(
                "REALLY? You REALLY want to delete {name}?\n\nThis is like removing the brain \
                 from a computer. There's no going back. Your OS will literally stop working.\
                 \n\nAre you REALLY, REALLY sure?"
            ),
            "I'm Really Sure",
            "No, I was just kidding",
        ),
        _ => (
            "POINT OF NO RETURN",
            "Okay, this is it. Final chance.\n\nYou're about to break everything. Like, \
             EVERYTHING everything.\n\nDon't say we didn't warn you...\n\nReally, REALLY, \
             REALLY sure?"
                .to_string(),
            "DO IT!",
            "Okay, maybe not...",
        ),
    };
    let next = if step + 1 < SYSTEM_FOLDER_WARNINGS {
        DesktopAction::RequestPurge {
            entry,
            step: step + 1,
        }
    } else {
        DesktopAction::PurgeFromRecycleBin { entry }
    };
    escalating(title, message, (confirm, next), cancel)
}

fn last_warning(step: u8) -> u8 {
    step.min(SYSTEM_FOLDER_WARNINGS - 1)
}

fn escalating(
    title: &str,
    message: String,
    (confirm, action): (&str, DesktopAction),
    cancel: &str,
) -> Notice {
    Notice::new(title, message, NoticeSeverity::Error).with_buttons(vec![
        NoticeButton::dispatch(confirm, action),
        NoticeButton::dismiss(cancel).primary(),
    ])
}

pub fn desktop_properties() -> Notice {
    Notice::new("Display Properties", "Desktop Properties", NoticeSeverity::Info)
}
