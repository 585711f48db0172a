//! Shared contract types between the desktop window registry and the applications it hosts.
//!
//! The application set is closed: every window the shell can ever show is one of the
//! [`AppId`] variants. Ids arriving from outside the type system (drag channels, seed tables,
//! deep links) go through [`AppId::from_str`], which fails loudly with [`UnknownAppId`].

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
/// Stable identifier for one of the built-in applications.
pub enum AppId {
    /// Pixel Studio paint program.
    PixelArt,
    /// Nostalgia trivia game.
    Trivia,
    /// NetWorld Navigator browser simulation.
    WebBrowser,
    /// Product registration wizard.
    Register,
    /// About dialog.
    About,
    /// Floppy drive (A:) browser.
    FloppyDrive,
    /// Fake file transfer progress dialog.
    FileTransfer,
    /// Minesweeper.
    Minesweeper,
    /// TextCraft notepad.
    Textcraft,
    /// Media player.
    MediaPlayer,
    /// My Computer explorer.
    MyComputer,
    /// Recycle Bin browser.
    RecycleBin,
    /// Image viewer for desktop pictures.
    ImageViewer,
    /// Security terminal easter egg.
    JurassicTerminal,
}

/// Error returned when an external string does not name a known application.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown application id `{0}`")]
pub struct UnknownAppId(pub String);

impl AppId {
    /// Every application, in registry order.
    pub const ALL: [AppId; 14] = [
        AppId::PixelArt,
        AppId::Trivia,
        AppId::WebBrowser,
        AppId::Register,
        AppId::About,
        AppId::FloppyDrive,
        AppId::FileTransfer,
        AppId::Minesweeper,
        AppId::Textcraft,
        AppId::MediaPlayer,
        AppId::MyComputer,
        AppId::RecycleBin,
        AppId::ImageViewer,
        AppId::JurassicTerminal,
    ];

    /// Number of applications in the closed set.
    pub const COUNT: usize = Self::ALL.len();

    /// Position of this id inside [`AppId::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the stable wire token (`MY_COMPUTER`, `TEXTCRAFT`, ...).
    pub const fn token(self) -> &'static str {
        match self {
            Self::PixelArt => "PIXEL_ART",
            Self::Trivia => "TRIVIA",
            Self::WebBrowser => "WEB_BROWSER",
            Self::Register => "REGISTER",
            Self::About => "ABOUT",
            Self::FloppyDrive => "FLOPPY_DRIVE",
            Self::FileTransfer => "FILE_TRANSFER",
            Self::Minesweeper => "MINESWEEPER",
            Self::Textcraft => "TEXTCRAFT",
            Self::MediaPlayer => "MEDIA_PLAYER",
            Self::MyComputer => "MY_COMPUTER",
            Self::RecycleBin => "RECYCLE_BIN",
            Self::ImageViewer => "IMAGE_VIEWER",
            Self::JurassicTerminal => "JURASSIC_TERMINAL",
        }
    }

    /// Default window title used when the seed table does not override it.
    pub fn title(self) -> &'static str {
        match self {
            Self::PixelArt => "Pixel Studio 95",
            Self::Trivia => "Nostalgia Trivia",
            Self::WebBrowser => "NetWorld Navigator",
            Self::Register => "Register RetroWave OS",
            Self::About => "About RetroWave OS",
            Self::FloppyDrive => "3½ Floppy (A:)",
            Self::FileTransfer => "File Transfer",
            Self::Minesweeper => "Minesweeper",
            Self::Textcraft => "TextCraft - Untitled",
            Self::MediaPlayer => "Media Player",
            Self::MyComputer => "My Computer",
            Self::RecycleBin => "Recycle Bin",
            Self::ImageViewer => "Image Viewer",
            Self::JurassicTerminal => "Security Terminal",
        }
    }

    /// Presentation icon token.
    pub fn icon_id(self) -> &'static str {
        match self {
            Self::PixelArt => "paint",
            Self::Trivia => "trivia",
            Self::WebBrowser => "browser",
            Self::Register => "register",
            Self::About => "about",
            Self::FloppyDrive => "floppy",
            Self::FileTransfer => "file-transfer",
            Self::Minesweeper => "minesweeper",
            Self::Textcraft => "notepad",
            Self::MediaPlayer => "media-player",
            Self::MyComputer => "computer",
            Self::RecycleBin => "recycle-bin-empty",
            Self::ImageViewer => "image-viewer",
            Self::JurassicTerminal => "terminal",
        }
    }

    /// Whether the window frame offers resize handles by default.
    pub fn resizable(self) -> bool {
        !matches!(
            self,
            Self::Register | Self::About | Self::FileTransfer | Self::JurassicTerminal
        )
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for AppId {
    type Err = UnknownAppId;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|app| app.token() == raw)
            .ok_or_else(|| UnknownAppId(raw.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
/// Typed parameters handed to a window when it is opened for a specific file.
pub enum LaunchParams {
    /// Show a picture in the image viewer.
    Image {
        /// Source url of the picture.
        image_url: String,
        /// Display name of the file.
        file_name: String,
    },
    /// Load a text document into TextCraft.
    TextDocument {
        /// Registry id of the file being edited.
        file_id: String,
        /// Display name of the file.
        file_name: String,
        /// Initial document text.
        content: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Lifecycle transitions the window registry reports to presentation hooks.
pub enum WindowLifecycleEvent {
    /// Window was opened (or re-opened) and raised.
    Opened,
    /// Window was raised to the top of the stack.
    Focused,
    /// Window was hidden to the taskbar.
    Minimized,
    /// Minimized window was shown again.
    Restored,
    /// Window was closed.
    Closed,
}

impl WindowLifecycleEvent {
    /// Returns a stable string token for logging and presentation hooks.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Opened => "opened",
            Self::Focused => "focused",
            Self::Minimized => "minimized",
            Self::Restored => "restored",
            Self::Closed => "closed",
        }
    }

    /// Named UI sound cue associated with this transition, if any.
    pub const fn sound_cue(self) -> Option<&'static str> {
        match self {
            Self::Opened => Some("pop"),
            Self::Minimized => Some("minimize"),
            Self::Restored => Some("maximize"),
            Self::Closed => Some("close"),
            Self::Focused => None,
        }
    }
}
