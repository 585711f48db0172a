//! Seed tables a desktop session is initialised (and reset) from.
//!
//! The built-in tables live in `seed/desktop.toml`; `build.rs` validates that file and compiles
//! it into a JSON catalog constant which is parsed here.

use std::collections::BTreeSet;

use desktop_app_contract::AppId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    config::RuntimeConfig,
    file_registry::{FileRegistry, FileRegistryError},
    grid::{DesktopGrid, DesktopIconLayout},
    model::{
        DesktopShortcut, DesktopState, FileRecord, Position, SystemFolderState, WindowRecord,
        WindowSize,
    },
    system::SystemSession,
    window_manager::WindowRegistry,
};

include!(concat!(env!("OUT_DIR"), "/desktop_seed_generated.rs"));

/// Seed layout version understood by this crate.
pub const SEED_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to parse seed tables: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("seed schema mismatch: expected {expected}, found {found}")]
    SchemaMismatch { expected: u32, found: u32 },
    #[error("duplicate window row for `{0}`")]
    DuplicateWindow(AppId),
    #[error("duplicate desktop shortcut for `{0}`")]
    DuplicateShortcut(AppId),
    #[error(transparent)]
    File(#[from] FileRegistryError),
}

/// One row of the window table. Omitted fields fall back to the app descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSeed {
    pub app_id: AppId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub z_index: u64,
    #[serde(default)]
    pub position: Option<Position>,
    #[serde(default)]
    pub size: Option<WindowSize>,
    #[serde(default)]
    pub resizable: Option<bool>,
}

impl WindowSeed {
    pub fn to_record(&self) -> WindowRecord {
        let mut record = WindowRecord::closed(self.app_id);
        if let Some(title) = &self.title {
            record.title = title.clone();
        }
        if let Some(position) = self.position {
            record.position = position;
        }
        if let Some(resizable) = self.resizable {
            record.resizable = resizable;
        }
        record.z_index = self.z_index;
        record.size = self.size;
        record
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedTables {
    pub schema_version: u32,
    #[serde(default)]
    pub runtime: RuntimeConfig,
    #[serde(default)]
    pub windows: Vec<WindowSeed>,
    #[serde(default)]
    pub files: Vec<FileRecord>,
    #[serde(default)]
    pub desktop_icons: Vec<DesktopShortcut>,
}

impl SeedTables {
    /// Tables compiled into the crate from `seed/desktop.toml`.
    ///
    /// # Errors
    ///
    /// Returns a [`SeedError`] if the generated catalog does not parse or validate.
    pub fn builtin() -> Result<Self, SeedError> {
        Self::from_json(DESKTOP_SEED_JSON)
    }

    /// Parses and validates seed tables from JSON.
    ///
    /// # Errors
    ///
    /// Returns a [`SeedError`] when the JSON is malformed or the tables are inconsistent.
    pub fn from_json(raw: &str) -> Result<Self, SeedError> {
        let tables: Self = serde_json::from_str(raw)?;
        tables.validate()?;
        Ok(tables)
    }

    /// Checks the schema version and id uniqueness across tables.
    ///
    /// # Errors
    ///
    /// Returns the first inconsistency found.
    pub fn validate(&self) -> Result<(), SeedError> {
        if self.schema_version != SEED_SCHEMA_VERSION {
            return Err(SeedError::SchemaMismatch {
                expected: SEED_SCHEMA_VERSION,
                found: self.schema_version,
            });
        }

        let mut windows = BTreeSet::new();
        for row in &self.windows {
            if !windows.insert(row.app_id) {
                return Err(SeedError::DuplicateWindow(row.app_id));
            }
        }

        let mut shortcuts = BTreeSet::new();
        for shortcut in &self.desktop_icons {
            if !shortcuts.insert(shortcut.app_id) {
                return Err(SeedError::DuplicateShortcut(shortcut.app_id));
            }
        }

        let mut files = BTreeSet::new();
        for file in &self.files {
            if !files.insert(file.id.as_str()) {
                return Err(FileRegistryError::DuplicateId(file.id.clone()).into());
            }
        }
        Ok(())
    }
}

impl DesktopState {
    /// Builds a fresh session from seed tables: every window closed, files at their seeded
    /// locations, shortcuts in the first grid column.
    ///
    /// # Errors
    ///
    /// Returns a [`SeedError`] when the tables do not validate.
    pub fn from_seed(seed: &SeedTables) -> Result<Self, SeedError> {
        seed.validate()?;
        let config = seed.runtime.clone();
        let grid = DesktopGrid::from_config(&config.grid);
        let files =
            FileRegistry::from_records(seed.files.iter().cloned(), config.default_drop_position)?;
        let windows = WindowRegistry::new(
            seed.windows.iter().map(WindowSeed::to_record),
            config.z_index_base,
            config.z_index_renormalize_threshold,
        );
        let icons = DesktopIconLayout::new(seed.desktop_icons.clone(), &grid);
        let session = SystemSession::new(config.screensaver_timeout_ms);
        Ok(Self {
            config,
            files,
            windows,
            icons,
            session,
            system_folder: SystemFolderState::InPlace,
            start_menu_open: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::model::FileLocation;

    #[test]
    fn builtin_tables_parse_and_build_a_closed_session() {
        let seed = SeedTables::builtin().expect("builtin seed");
        let state = DesktopState::from_seed(&seed).expect("state");

        assert_eq!(state.windows.iter().count(), AppId::COUNT);
        assert!(state.windows.iter().all(|window| !window.is_open));
        assert_eq!(
            state.windows.get(AppId::FileTransfer).title,
            "0.49% of cc32e47.exe Completed"
        );
        assert!(!state.windows.get(AppId::About).resizable);

        let desktop: Vec<&str> = state
            .files
            .query(FileLocation::Desktop)
            .map(|file| file.id.as_str())
            .collect();
        assert_eq!(desktop, vec!["magical_nedrysaurus"]);
        assert_eq!(
            state.files.get("magical_nedrysaurus").and_then(|file| file.position),
            Some(Position::new(100, 300))
        );
        assert_eq!(state.files.count(FileLocation::Floppy), 2);
        assert_eq!(
            state.icons.position(AppId::MyComputer),
            Some(Position::new(18, 18))
        );
        assert_eq!(state.windows.current_top(), 100);
    }

    #[test]
    fn window_rows_fall_back_to_app_descriptor() {
        let seed = SeedTables::from_json(
            &json!({
                "schema_version": 1,
                "windows": [{ "app_id": "MINESWEEPER" }]
            })
            .to_string(),
        )
        .expect("seed");
        let record = seed.windows[0].to_record();
        assert_eq!(record.title, AppId::Minesweeper.title());
        assert_eq!(record.resizable, AppId::Minesweeper.resizable());
    }

    #[test]
    fn validation_rejects_inconsistent_tables() {
        let mismatch = SeedTables::from_json(&json!({ "schema_version": 7 }).to_string());
        assert!(matches!(
            mismatch,
            Err(SeedError::SchemaMismatch { expected: 1, found: 7 })
        ));

        let duplicate_window = SeedTables::from_json(
            &json!({
                "schema_version": 1,
                "windows": [{ "app_id": "TRIVIA" }, { "app_id": "TRIVIA" }]
            })
            .to_string(),
        );
        assert!(matches!(
            duplicate_window,
            Err(SeedError::DuplicateWindow(AppId::Trivia))
        ));

        let duplicate_file = SeedTables::from_json(
            &json!({
                "schema_version": 1,
                "files": [
                    { "id": "a", "name": "A.TXT", "kind": "text", "location": "floppy" },
                    { "id": "a", "name": "B.TXT", "kind": "text", "location": "c-drive" }
                ]
            })
            .to_string(),
        );
        assert!(matches!(
            duplicate_file,
            Err(SeedError::File(FileRegistryError::DuplicateId(id))) if id == "a"
        ));
    }

    #[test]
    fn build_script_tokens_match_the_app_contract() {
        let tokens: Vec<&str> = AppId::ALL.iter().map(|app_id| app_id.token()).collect();
        assert_eq!(tokens, SEED_APP_TOKENS.to_vec());
    }

    #[test]
    fn unknown_app_tokens_fail_to_parse() {
        let err = SeedTables::from_json(
            &json!({ "schema_version": 1, "windows": [{ "app_id": "SOLITAIRE" }] }).to_string(),
        );
        assert!(matches!(err, Err(SeedError::Parse(_))));
    }
}
