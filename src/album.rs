//! Album inventory model
//!
//! One [`AlbumRecord`] per remote album, keyed by the externally assigned
//! album ID. The [`Inventory`] keeps rows in listing order and guarantees
//! that no two rows share an ID.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Prefix of the actions log entry written after a successful delete.
pub const DELETED_PREFIX: &str = "Deleted on ";

/// Prefix of the actions log entry written after a successful rename.
pub const RENAMED_PREFIX: &str = "Renamed from ";

/// Timestamp layout used in actions log entries.
pub const LOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single album row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumRecord {
    pub id: String,
    pub title: String,
    /// Empty means no rename proposed
    pub proposed_title: String,
    pub photo_count: u64,
    pub delete_flag: bool,
    pub url: String,
    /// Append-only audit trail
    pub actions_log: Vec<String>,
}

impl AlbumRecord {
    /// Fresh row as produced by a listing refresh.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        photo_count: u64,
        url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            proposed_title: String::new(),
            photo_count,
            delete_flag: false,
            url: url.into(),
            actions_log: Vec::new(),
        }
    }

    /// True once a delete has been confirmed for this album.
    pub fn is_deleted(&self) -> bool {
        self.actions_log
            .iter()
            .any(|entry| entry.starts_with(DELETED_PREFIX))
    }

    /// True when a rename target is set and would change the title.
    pub fn has_pending_rename(&self) -> bool {
        !self.proposed_title.is_empty() && self.proposed_title != self.title
    }

    /// Flagged for deletion and not yet deleted.
    pub fn awaiting_delete(&self) -> bool {
        self.delete_flag && !self.is_deleted()
    }

    /// Record a completed delete.
    pub fn log_deleted(&mut self, at: DateTime<Local>) {
        self.actions_log
            .push(format!("{DELETED_PREFIX}{}", at.format(LOG_TIMESTAMP_FORMAT)));
    }

    /// Record a completed rename and apply the new title.
    pub fn log_renamed(&mut self, at: DateTime<Local>) {
        let old = std::mem::replace(&mut self.title, std::mem::take(&mut self.proposed_title));
        self.actions_log.push(format!(
            "{RENAMED_PREFIX}'{old}' on {}",
            at.format(LOG_TIMESTAMP_FORMAT)
        ));
    }
}

/// Ordered set of album rows with unique IDs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    records: Vec<AlbumRecord>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row. Returns false and leaves the inventory untouched when
    /// the ID is already present.
    pub fn insert(&mut self, record: AlbumRecord) -> bool {
        if self.contains(&record.id) {
            return false;
        }
        self.records.push(record);
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.iter().any(|r| r.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&AlbumRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut AlbumRecord> {
        self.records.iter_mut().find(|r| r.id == id)
    }

    pub fn records(&self) -> &[AlbumRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AlbumRecord> {
        self.records.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, AlbumRecord> {
        self.records.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a Inventory {
    type Item = &'a AlbumRecord;
    type IntoIter = std::slice::Iter<'a, AlbumRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
