//! Rule engine
//!
//! Pure passes over the [`Inventory`] that set annotation fields. Nothing
//! here touches the actions log or performs I/O.
//!
//! Deletion policy, first match wins:
//!
//! | Order | Rule |
//! |-------|------|
//! | 1 | empty albums, when enabled |
//! | 2 | title contains any configured substring |
//! | 3 | title contains `iPhoto Events` and a `Mon D, YYYY` date |
//! | 4 | [`custom_rule`], user extension point |

use crate::album::{AlbumRecord, Inventory};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, info};

/// Marker that identifies albums imported from iPhoto event folders.
pub const IPHOTO_EVENTS_MARKER: &str = "iPhoto Events";

/// Prefix the photo service prepends to duplicated albums.
pub const COPY_PREFIX: &str = "Copy of ";

static EVENT_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\b \d{1,2}, \d{4}")
        .expect("event date pattern is a valid literal")
});

/// Inputs to the deletion pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletionRules {
    pub empty_albums_eligible: bool,
    /// Blank entries are ignored
    pub name_substrings: Vec<String>,
}

impl DeletionRules {
    pub fn new(empty_albums_eligible: bool, name_substrings: Vec<String>) -> Self {
        Self {
            empty_albums_eligible,
            name_substrings,
        }
    }

    /// Which rule, if any, selects this row.
    pub fn matching_rule(&self, record: &AlbumRecord) -> Option<MatchedRule> {
        if self.empty_albums_eligible && record.photo_count == 0 {
            return Some(MatchedRule::Empty);
        }
        if self
            .name_substrings
            .iter()
            .filter(|s| !s.is_empty())
            .any(|s| record.title.contains(s.as_str()))
        {
            return Some(MatchedRule::NameContains);
        }
        if is_dated_iphoto_event(&record.title) {
            return Some(MatchedRule::DatedIphotoEvent);
        }
        if custom_rule(record) {
            return Some(MatchedRule::Custom);
        }
        None
    }
}

/// The rule that flagged a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchedRule {
    Empty,
    NameContains,
    DatedIphotoEvent,
    Custom,
}

/// Counts from a marking pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkSummary {
    /// Rows that matched a rule during this pass
    pub matched: usize,
    /// Rows whose flag went from false to true during this pass
    pub newly_flagged: usize,
}

/// True for titles carrying the iPhoto events marker and an event date.
pub fn is_dated_iphoto_event(title: &str) -> bool {
    title.contains(IPHOTO_EVENTS_MARKER) && EVENT_DATE.is_match(title)
}

/// Extension point for site-specific deletion criteria. Always false.
pub fn custom_rule(_record: &AlbumRecord) -> bool {
    false
}

/// Flag rows for deletion. Flags are only ever set, never cleared.
pub fn mark_for_deletion(inventory: &mut Inventory, rules: &DeletionRules) -> MarkSummary {
    let mut summary = MarkSummary::default();
    for record in inventory.iter_mut() {
        let Some(rule) = rules.matching_rule(record) else {
            continue;
        };
        summary.matched += 1;
        if !record.delete_flag {
            debug!(id = %record.id, title = %record.title, ?rule, "Flagging album for deletion");
            record.delete_flag = true;
            summary.newly_flagged += 1;
        }
    }
    info!(
        matched = summary.matched,
        newly_flagged = summary.newly_flagged,
        "Deletion marking complete"
    );
    summary
}

/// Propose a title without the first `Copy of ` for every row containing it.
///
/// Rows without the prefix keep whatever proposal they already had. Returns
/// the number of rows given a proposal.
pub fn mark_for_rename(inventory: &mut Inventory) -> usize {
    let mut proposed = 0;
    for record in inventory.iter_mut() {
        if !record.title.contains(COPY_PREFIX) {
            continue;
        }
        record.proposed_title = record.title.replacen(COPY_PREFIX, "", 1);
        debug!(id = %record.id, from = %record.title, to = %record.proposed_title, "Proposed rename");
        proposed += 1;
    }
    info!(proposed, "Rename marking complete");
    proposed
}
