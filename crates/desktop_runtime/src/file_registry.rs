//! Single source of truth for where every virtual file lives.
//!
//! Each record carries exactly one [`FileLocation`]; moving a file relabels that field in place.
//! Operations naming an id that is no longer registered are silent no-ops: drag events can race
//! a purge, and a stale reference must never take the session down. Mutators report whether they
//! were applied so callers can decide what to surface.

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{FileLocation, FileRecord, Position};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FileRegistryError {
    #[error("file id `{0}` is already registered")]
    DuplicateId(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRegistry {
    files: Vec<FileRecord>,
    default_desktop_position: Position,
}

impl FileRegistry {
    /// Empty registry. `default_desktop_position` is used for desktop moves without a position.
    pub fn new(default_desktop_position: Position) -> Self {
        Self {
            files: Vec::new(),
            default_desktop_position,
        }
    }

    /// Builds a registry from seed records, in order.
    ///
    /// # Errors
    ///
    /// Returns [`FileRegistryError::DuplicateId`] when two records share an id.
    pub fn from_records(
        records: impl IntoIterator<Item = FileRecord>,
        default_desktop_position: Position,
    ) -> Result<Self, FileRegistryError> {
        let mut registry = Self::new(default_desktop_position);
        for record in records {
            registry.create(record)?;
        }
        Ok(registry)
    }

    /// Registers a new file. Desktop files without coordinates get the default position and
    /// coordinates on non-desktop files are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`FileRegistryError::DuplicateId`] when the id is already registered.
    pub fn create(&mut self, mut record: FileRecord) -> Result<(), FileRegistryError> {
        if self.contains(&record.id) {
            return Err(FileRegistryError::DuplicateId(record.id));
        }
        record.position = match record.location {
            FileLocation::Desktop => {
                Some(record.position.unwrap_or(self.default_desktop_position))
            }
            _ => None,
        };
        debug!("creating file {} at {}", record.id, record.location);
        self.files.push(record);
        Ok(())
    }

    /// Record for `file_id`, wherever it is.
    pub fn get(&self, file_id: &str) -> Option<&FileRecord> {
        self.files.iter().find(|file| file.id == file_id)
    }

    /// Whether `file_id` is registered.
    pub fn contains(&self, file_id: &str) -> bool {
        self.get(file_id).is_some()
    }

    /// Every record in insertion order.
    pub fn all(&self) -> &[FileRecord] {
        &self.files
    }

    /// Files at `location`, in insertion order.
    pub fn query(&self, location: FileLocation) -> impl Iterator<Item = &FileRecord> + '_ {
        self.files
            .iter()
            .filter(move |file| file.location == location)
    }

    /// Number of records at `location`.
    pub fn count(&self, location: FileLocation) -> usize {
        self.query(location).count()
    }

    /// Relocates a file. Moving to the desktop sets `position` (or the default); any other
    /// location clears it. Returns `false` when the id is unknown.
    pub fn move_file(
        &mut self,
        file_id: &str,
        location: FileLocation,
        position: Option<Position>,
    ) -> bool {
        let default_position = self.default_desktop_position;
        let Some(file) = self.find_mut(file_id) else {
            debug!("ignoring move of unknown file {file_id}");
            return false;
        };
        debug!("moving file {file_id} to {location}");
        file.location = location;
        file.position = match location {
            FileLocation::Desktop => Some(position.unwrap_or(default_position)),
            _ => None,
        };
        true
    }

    /// Repositions a desktop file. Files elsewhere are left untouched.
    pub fn update_position(&mut self, file_id: &str, position: Position) -> bool {
        match self.find_mut(file_id) {
            Some(file) if file.location == FileLocation::Desktop => {
                file.position = Some(position);
                true
            }
            Some(file) => {
                debug!(
                    "ignoring position update for {file_id} outside the desktop ({})",
                    file.location
                );
                false
            }
            None => {
                debug!("ignoring position update for unknown file {file_id}");
                false
            }
        }
    }

    /// Moves a file to the recycle bin.
    pub fn soft_delete(&mut self, file_id: &str) -> bool {
        self.move_file(file_id, FileLocation::RecycleBin, None)
    }

    /// Undoes a soft delete by moving the file to `location`.
    pub fn restore(&mut self, file_id: &str, location: FileLocation) -> bool {
        self.move_file(file_id, location, None)
    }

    /// Removes a record for good. There is no undo.
    pub fn purge(&mut self, file_id: &str) -> Option<FileRecord> {
        let Some(index) = self.files.iter().position(|file| file.id == file_id) else {
            debug!("ignoring purge of unknown file {file_id}");
            return None;
        };
        debug!("purging file {file_id}");
        Some(self.files.remove(index))
    }

    /// Purges every soft-deleted record and returns them.
    pub fn purge_recycled(&mut self) -> Vec<FileRecord> {
        let (purged, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.files)
            .into_iter()
            .partition(|file| file.location == FileLocation::RecycleBin);
        self.files = kept;
        debug!("emptied recycle bin ({} files)", purged.len());
        purged
    }

    fn find_mut(&mut self, file_id: &str) -> Option<&mut FileRecord> {
        self.files.iter_mut().find(|file| file.id == file_id)
    }
}
