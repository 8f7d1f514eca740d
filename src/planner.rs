//! Action planner
//!
//! Reads the inventory and produces bounded, ordered work lists. Pure logic:
//! the only side effect is a log line when a plan is truncated.

use crate::album::{AlbumRecord, Inventory};
use tracing::{info, warn};

/// Flagged albums not yet deleted, in inventory order, at most `max_count`.
pub fn plan_deletions(inventory: &Inventory, max_count: usize) -> Vec<AlbumRecord> {
    let eligible: Vec<&AlbumRecord> = inventory.iter().filter(|r| r.awaiting_delete()).collect();
    truncate_plan("delete", eligible, max_count)
}

/// Albums with a pending rename, in inventory order.
///
/// Albums already deleted are left out since there is nothing left to rename.
/// The batch cap is applied by the driver.
pub fn plan_renames(inventory: &Inventory) -> Vec<AlbumRecord> {
    let plan: Vec<AlbumRecord> = inventory
        .iter()
        .filter(|r| r.has_pending_rename() && !r.is_deleted())
        .cloned()
        .collect();
    info!(kind = "rename", planned = plan.len(), "Plan ready");
    plan
}

fn truncate_plan(kind: &'static str, eligible: Vec<&AlbumRecord>, max_count: usize) -> Vec<AlbumRecord> {
    let total = eligible.len();
    if total > max_count {
        warn!(
            kind,
            eligible = total,
            max_count,
            "Plan truncated to the configured maximum"
        );
    }
    let plan: Vec<AlbumRecord> = eligible.into_iter().take(max_count).cloned().collect();
    info!(kind, planned = plan.len(), "Plan ready");
    plan
}
