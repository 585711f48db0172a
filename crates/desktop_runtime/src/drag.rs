//! Drag-and-drop transfer protocol.
//!
//! Drag sources publish string channels (`DragChannels`), the same way a browser `DataTransfer`
//! carries several MIME-keyed fields at once. Channels are resolved exactly once, at the input
//! boundary, into a single [`DragPayload`]; everything past that point matches on the enum.

use std::collections::BTreeMap;

use desktop_app_contract::{AppId, UnknownAppId};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Channel carrying a [`crate::model::FileRecord`] id.
pub const CHANNEL_FILE: &str = "application/x-retrodesk-file";
/// Channel carrying an [`AppId`] token for a desktop shortcut.
pub const CHANNEL_ICON: &str = "application/x-retrodesk-icon";
/// Channel carrying a JSON-encoded protected item (`{"name": .., "is_drive": ..}`).
pub const CHANNEL_PROTECTED: &str = "application/x-retrodesk-protected";
/// Channel carrying a scripted special item token.
pub const CHANNEL_SPECIAL: &str = "application/x-retrodesk-special";
/// Untyped fallback; only consulted for app icons.
pub const CHANNEL_TEXT: &str = "text/plain";

/// Kind of system file, derived from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SystemFileClass {
    Component,
    Program,
    Driver,
    Configuration,
    Font,
    Data,
    Log,
    Other,
}

impl SystemFileClass {
    pub fn from_file_name(name: &str) -> Self {
        let extension = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "dll" | "ocx" | "cpl" => Self::Component,
            "exe" | "com" => Self::Program,
            "sys" | "drv" | "vxd" => Self::Driver,
            "ini" | "cfg" | "inf" => Self::Configuration,
            "ttf" | "fon" | "fot" => Self::Font,
            "dat" => Self::Data,
            "txt" | "log" => Self::Log,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "class", rename_all = "kebab-case")]
pub enum ProtectionReason {
    Drive,
    SystemFile(SystemFileClass),
}

/// A drive or system file that can be dragged but never relocated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectedItem {
    pub name: String,
    pub reason: ProtectionReason,
}

impl ProtectedItem {
    pub fn drive(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reason: ProtectionReason::Drive,
        }
    }

    pub fn system_file(name: impl Into<String>) -> Self {
        let name = name.into();
        let class = SystemFileClass::from_file_name(&name);
        Self {
            name,
            reason: ProtectionReason::SystemFile(class),
        }
    }

    pub fn is_drive(&self) -> bool {
        self.reason == ProtectionReason::Drive
    }
}

/// Scripted exceptions to the protection rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EasterEgg {
    /// The System32 folder; its only legal destination is the recycle bin.
    SystemFolder,
}

impl EasterEgg {
    pub const fn token(self) -> &'static str {
        match self {
            Self::SystemFolder => "system32",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::SystemFolder => "System32",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DragPayloadKind {
    PlainFile,
    ProtectedItem,
    AppIcon,
    SpecialEasterEgg,
}

/// What is being dragged. Ephemeral; never stored in [`crate::model::DesktopState`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum DragPayload {
    PlainFile { file_id: String },
    Protected(ProtectedItem),
    AppIcon { app_id: AppId },
    EasterEgg { egg: EasterEgg },
}

impl DragPayload {
    pub fn plain_file(file_id: impl Into<String>) -> Self {
        Self::PlainFile {
            file_id: file_id.into(),
        }
    }

    pub fn kind(&self) -> DragPayloadKind {
        match self {
            Self::PlainFile { .. } => DragPayloadKind::PlainFile,
            Self::Protected(_) => DragPayloadKind::ProtectedItem,
            Self::AppIcon { .. } => DragPayloadKind::AppIcon,
            Self::EasterEgg { .. } => DragPayloadKind::SpecialEasterEgg,
        }
    }

    /// Raw channels a drag source publishes for this payload.
    pub fn to_channels(&self) -> DragChannels {
        match self {
            Self::PlainFile { file_id } => DragChannels::new().with(CHANNEL_FILE, file_id.clone()),
            Self::Protected(item) => {
                let wire = ProtectedWire {
                    name: item.name.clone(),
                    is_drive: item.is_drive(),
                };
                let encoded = serde_json::to_string(&wire).unwrap_or_default();
                DragChannels::new()
                    .with(CHANNEL_PROTECTED, encoded)
                    .with(CHANNEL_TEXT, item.name.clone())
            }
            Self::AppIcon { app_id } => DragChannels::new()
                .with(CHANNEL_ICON, app_id.token())
                .with(CHANNEL_TEXT, app_id.token()),
            Self::EasterEgg { egg } => DragChannels::new()
                .with(CHANNEL_SPECIAL, egg.token())
                .with(CHANNEL_TEXT, egg.display_name()),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DragError {
    #[error(transparent)]
    UnknownApp(#[from] UnknownAppId),
    #[error("unknown special drag item `{0}`")]
    UnknownSpecial(String),
}

#[derive(Debug, Serialize, Deserialize)]
struct ProtectedWire {
    name: String,
    #[serde(default, alias = "isDrive")]
    is_drive: bool,
}

/// Raw drag channels keyed by MIME-like names. Empty values count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragChannels {
    fields: BTreeMap<String, String>,
}

impl DragChannels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, channel: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(channel, value);
        self
    }

    pub fn set(&mut self, channel: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(channel.into(), value.into());
    }

    pub fn get(&self, channel: &str) -> Option<&str> {
        self.fields
            .get(channel)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Picks the payload by priority: special, protected, file, then app icon.
    ///
    /// `Ok(None)` means nothing recognisable was dragged. A malformed protected channel is logged
    /// and skipped; an unknown app token on the icon channel is an error, while the `text/plain`
    /// fallback is only trusted when it names a known app.
    ///
    /// # Errors
    ///
    /// Returns [`DragError`] for an unknown special token or app icon id.
    pub fn resolve(&self) -> Result<Option<DragPayload>, DragError> {
        if let Some(token) = self.get(CHANNEL_SPECIAL) {
            return match token {
                "system32" => Ok(Some(DragPayload::EasterEgg {
                    egg: EasterEgg::SystemFolder,
                })),
                other => Err(DragError::UnknownSpecial(other.to_string())),
            };
        }

        if let Some(raw) = self.get(CHANNEL_PROTECTED) {
            match serde_json::from_str::<ProtectedWire>(raw) {
                Ok(wire) if wire.is_drive => {
                    return Ok(Some(DragPayload::Protected(ProtectedItem::drive(wire.name))));
                }
                Ok(wire) => {
                    return Ok(Some(DragPayload::Protected(ProtectedItem::system_file(
                        wire.name,
                    ))));
                }
                Err(err) => warn!("ignoring malformed protected drag payload {raw:?}: {err}"),
            }
        }

        if let Some(file_id) = self.get(CHANNEL_FILE) {
            return Ok(Some(DragPayload::plain_file(file_id)));
        }

        if let Some(token) = self.get(CHANNEL_ICON) {
            let app_id: AppId = token.parse()?;
            return Ok(Some(DragPayload::AppIcon { app_id }));
        }

        if let Some(token) = self.get(CHANNEL_TEXT) {
            match token.parse::<AppId>() {
                Ok(app_id) => return Ok(Some(DragPayload::AppIcon { app_id })),
                Err(err) => debug!("ignoring plain-text drag payload: {err}"),
            }
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn extension_classes_follow_the_system_file_taxonomy() {
        let cases = [
            ("USER32.DLL", SystemFileClass::Component),
            ("calc.exe", SystemFileClass::Program),
            ("HIMEM.SYS", SystemFileClass::Driver),
            ("WIN.INI", SystemFileClass::Configuration),
            ("ARIAL.TTF", SystemFileClass::Font),
            ("USER.DAT", SystemFileClass::Data),
            ("SETUPLOG.TXT", SystemFileClass::Log),
            ("README", SystemFileClass::Other),
            ("archive.zip", SystemFileClass::Other),
        ];
        for (name, class) in cases {
            assert_eq!(SystemFileClass::from_file_name(name), class, "{name}");
        }
    }

    #[test]
    fn special_beats_every_other_channel() {
        let channels = DragChannels::new()
            .with(CHANNEL_SPECIAL, "system32")
            .with(CHANNEL_PROTECTED, r#"{"name":"C:","is_drive":true}"#)
            .with(CHANNEL_FILE, "readme")
            .with(CHANNEL_ICON, "MY_COMPUTER");
        assert_eq!(
            channels.resolve(),
            Ok(Some(DragPayload::EasterEgg {
                egg: EasterEgg::SystemFolder
            }))
        );
    }

    #[test]
    fn protected_beats_file_and_icon() {
        let channels = DragChannels::new()
            .with(CHANNEL_PROTECTED, r#"{"name":"KERNEL32.DLL","isDrive":false}"#)
            .with(CHANNEL_FILE, "readme")
            .with(CHANNEL_ICON, "MY_COMPUTER");
        let payload = channels.resolve().expect("resolve").expect("payload");
        assert_eq!(
            payload,
            DragPayload::Protected(ProtectedItem {
                name: "KERNEL32.DLL".to_string(),
                reason: ProtectionReason::SystemFile(SystemFileClass::Component),
            })
        );
        assert_eq!(payload.kind(), DragPayloadKind::ProtectedItem);
    }

    #[test]
    fn file_beats_icon() {
        let channels = DragChannels::new()
            .with(CHANNEL_FILE, "readme")
            .with(CHANNEL_ICON, "MY_COMPUTER");
        assert_eq!(channels.resolve(), Ok(Some(DragPayload::plain_file("readme"))));
    }

    #[test]
    fn malformed_protected_channel_falls_through() {
        let channels = DragChannels::new()
            .with(CHANNEL_PROTECTED, "not json")
            .with(CHANNEL_FILE, "readme");
        assert_eq!(channels.resolve(), Ok(Some(DragPayload::plain_file("readme"))));
    }

    #[test]
    fn unknown_icon_is_an_error_but_unknown_text_is_ignored() {
        let icon = DragChannels::new().with(CHANNEL_ICON, "SOLITAIRE");
        assert_eq!(
            icon.resolve(),
            Err(DragError::UnknownApp(UnknownAppId("SOLITAIRE".to_string())))
        );

        let text = DragChannels::new().with(CHANNEL_TEXT, "hello");
        assert_eq!(text.resolve(), Ok(None));

        let fallback = DragChannels::new().with(CHANNEL_TEXT, "TEXTCRAFT");
        assert_eq!(
            fallback.resolve(),
            Ok(Some(DragPayload::AppIcon {
                app_id: AppId::Textcraft
            }))
        );
    }

    #[test]
    fn empty_values_count_as_absent() {
        let channels = DragChannels::new()
            .with(CHANNEL_SPECIAL, "")
            .with(CHANNEL_FILE, "");
        assert_eq!(channels.resolve(), Ok(None));
    }

    #[test]
    fn published_channels_resolve_back_to_the_payload() {
        let payloads = [
            DragPayload::plain_file("f1"),
            DragPayload::Protected(ProtectedItem::drive("C:")),
            DragPayload::Protected(ProtectedItem::system_file("WIN.INI")),
            DragPayload::AppIcon {
                app_id: AppId::RecycleBin,
            },
            DragPayload::EasterEgg {
                egg: EasterEgg::SystemFolder,
            },
        ];
        for payload in payloads {
            assert_eq!(payload.to_channels().resolve(), Ok(Some(payload.clone())));
        }
    }
}
