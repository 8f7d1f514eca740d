//! Application operations
//!
//! Each operation is a thin wrapper: load the inventory, run one engine,
//! planner or driver call, persist. The interactive menu and the CLI
//! subcommands both go through [`App`].

use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use crate::actuator::Actuator;
use crate::album::{AlbumRecord, Inventory};
use crate::config::SweepConfig;
use crate::driver::{ActionKind, BatchReport, Driver, Targets};
use crate::listing::{AlbumSource, ListingOutcome, PhotosLibraryClient, refresh_inventory};
use crate::planner::{plan_deletions, plan_renames};
use crate::recorder;
use crate::rules::{self, MarkSummary};
use crate::signals::StopSignal;
use crate::store;
use crate::types::RecordingKind;

pub struct App {
    config: SweepConfig,
    config_path: PathBuf,
    actuator: Box<dyn Actuator>,
    /// Never persist actuator results
    dry_run: bool,
    stop: StopSignal,
}

impl App {
    pub fn new(
        config: SweepConfig,
        config_path: impl Into<PathBuf>,
        actuator: Box<dyn Actuator>,
        dry_run: bool,
    ) -> Self {
        Self {
            config,
            config_path: config_path.into(),
            actuator,
            dry_run,
            stop: StopSignal::new(),
        }
    }

    pub fn with_stop_signal(mut self, stop: StopSignal) -> Self {
        self.stop = stop;
        self
    }

    pub fn stop_signal(&self) -> &StopSignal {
        &self.stop
    }

    fn inventory_path(&self) -> &Path {
        &self.config.listing.inventory_file
    }

    fn load_inventory(&self) -> Result<Inventory> {
        store::load(self.inventory_path()).with_context(|| {
            format!(
                "Failed to load inventory {:?} (run a listing refresh first?)",
                self.inventory_path()
            )
        })
    }

    fn save_inventory(&self, inventory: &Inventory) -> Result<()> {
        store::save(inventory, self.inventory_path())
            .with_context(|| format!("Failed to save inventory {:?}", self.inventory_path()))
    }

    /// Replace the inventory with a fresh listing from the library API.
    pub fn refresh_listing(&mut self) -> Result<ListingOutcome> {
        let mut client = PhotosLibraryClient::from_config(&self.config.listing)
            .context("Failed to set up the album listing client")?;
        self.refresh_from(&mut client)
    }

    /// Replace the inventory with a fresh listing from `source`.
    ///
    /// A listing that failed midway is still saved; it holds every album
    /// received before the failure. If not even the first page arrived, the
    /// stored inventory is left untouched and the error is returned.
    pub fn refresh_from(&mut self, source: &mut dyn AlbumSource) -> Result<ListingOutcome> {
        let outcome = refresh_inventory(
            source,
            self.config.listing.list_length_limit,
            Duration::from_millis(self.config.listing.page_pause_ms),
        );
        if let Some(e) = &outcome.error {
            if outcome.pages == 0 {
                anyhow::bail!(
                    "Listing failed before any album arrived ({}); {:?} was left unchanged",
                    e,
                    self.inventory_path()
                );
            }
            warn!("Listing ended early ({}); saving the {} albums received", e, outcome.inventory.len());
        }
        self.save_inventory(&outcome.inventory)?;
        Ok(outcome)
    }

    /// Propose titles for `Copy of` albums and persist them.
    pub fn mark_for_rename(&mut self) -> Result<usize> {
        let mut inventory = self.load_inventory()?;
        let proposed = rules::mark_for_rename(&mut inventory);
        self.save_inventory(&inventory)?;
        Ok(proposed)
    }

    /// Flag albums matching the configured rules and persist the flags.
    pub fn mark_for_delete(&mut self) -> Result<MarkSummary> {
        let mut inventory = self.load_inventory()?;
        let summary =
            rules::mark_for_deletion(&mut inventory, &self.config.rules.deletion_rules());
        self.save_inventory(&inventory)?;
        Ok(summary)
    }

    /// Record click positions for `kind` and save them to the config file.
    /// Returns false when the operator cancelled.
    pub fn record_coordinates<R: BufRead, W: Write>(
        &mut self,
        kind: RecordingKind,
        input: &mut R,
        output: &mut W,
    ) -> Result<bool> {
        let Some(recorded) =
            recorder::record_targets(kind, self.actuator.as_mut(), input, output)?
        else {
            return Ok(false);
        };
        recorder::apply(&mut self.config.coordinates, &recorded);
        self.config
            .save_to_file(&self.config_path)
            .context("Failed to save recorded coordinates")?;
        info!(%kind, path = ?self.config_path, "Saved recorded coordinates");
        Ok(true)
    }

    /// Delete flagged albums, up to `deleter.max_albums_to_delete`.
    pub fn execute_deletes(&mut self) -> Result<BatchReport> {
        if !self.config.deleter.enabled && !self.dry_run {
            anyhow::bail!(
                "Deleting albums is disabled; set deleter.enabled to true in {:?}",
                self.config_path
            );
        }
        let max = self.config.deleter.max_albums_to_delete;
        let mut inventory = self.load_inventory()?;
        let plan = plan_deletions(&inventory, max);
        self.run_batch(ActionKind::Delete, &mut inventory, &plan, max)
    }

    /// Rename albums with a proposed title, up to `renamer.max_albums_to_rename`.
    pub fn execute_renames(&mut self) -> Result<BatchReport> {
        let max = self.config.renamer.max_albums_to_rename;
        let mut inventory = self.load_inventory()?;
        let plan = plan_renames(&inventory);
        self.run_batch(ActionKind::Rename, &mut inventory, &plan, max)
    }

    fn run_batch(
        &mut self,
        kind: ActionKind,
        inventory: &mut Inventory,
        plan: &[AlbumRecord],
        max: usize,
    ) -> Result<BatchReport> {
        let points = self.config.coordinates.require(kind.targets())?;
        let targets = Targets::from_points(kind, &points)?;
        if plan.is_empty() {
            info!(%kind, "Nothing to {kind}");
            return Ok(BatchReport::default());
        }

        self.stop.reset();
        let path = self.config.listing.inventory_file.clone();
        let dry_run = self.dry_run;
        let mut checkpoint = |inv: &Inventory| {
            if dry_run {
                return Ok(());
            }
            store::save(inv, &path)
        };

        let report = Driver::new(
            self.actuator.as_mut(),
            self.config.deleter.pacing(),
            self.config.actuator.close_tab_modifier,
        )
        .with_stop_signal(self.stop.clone())
        .execute(inventory, plan, &targets, max, &mut checkpoint);
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actuator::DryRunActuator;
    use crate::listing::{AlbumPage, ListedAlbum};
    use crate::types::Point;
    use tempfile::TempDir;

    fn app_in(dir: &TempDir, dry_run: bool) -> App {
        let mut config = SweepConfig::default();
        config.listing.inventory_file = dir.path().join("albums.md");
        config.listing.page_pause_ms = 0;
        config.deleter.enabled = true;
        config.deleter.page_load_wait_ms = 0;
        config.deleter.mouse_move_wait_ms = 0;
        config.deleter.mouse_click_wait_ms = 0;
        config.rules.delete_empty_albums = true;
        config.coordinates.three_dots = Some(Point::new(1, 1));
        config.coordinates.delete_button = Some(Point::new(2, 2));
        config.coordinates.confirm_delete_button = Some(Point::new(3, 3));
        App::new(
            config,
            dir.path().join("album-sweep.json"),
            Box::new(DryRunActuator::new()),
            dry_run,
        )
    }

    struct OnePage;

    impl AlbumSource for OnePage {
        fn fetch_page(&mut self, _token: Option<&str>) -> crate::error::Result<AlbumPage> {
            Ok(AlbumPage {
                albums: vec![
                    ListedAlbum {
                        id: "A".into(),
                        title: "Empty".into(),
                        photo_count: 0,
                        url: "https://photos/A".into(),
                    },
                    ListedAlbum {
                        id: "B".into(),
                        title: "Copy of Trip".into(),
                        photo_count: 4,
                        url: "https://photos/B".into(),
                    },
                ],
                next_page_token: None,
            })
        }
    }

    #[test]
    fn test_refresh_mark_and_delete_pipeline() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir, false);

        app.refresh_from(&mut OnePage).unwrap();
        assert_eq!(app.mark_for_delete().unwrap().newly_flagged, 1);
        assert_eq!(app.mark_for_rename().unwrap(), 1);

        let report = app.execute_deletes().unwrap();
        assert_eq!(report.completed, vec!["A"]);

        let stored = store::load(&dir.path().join("albums.md")).unwrap();
        assert!(stored.get("A").unwrap().is_deleted());
        assert_eq!(stored.get("B").unwrap().proposed_title, "Trip");

        // A second run has nothing left to delete.
        let report = app.execute_deletes().unwrap();
        assert!(report.completed.is_empty());
    }

    /// Fails on the page after `good_pages` successful ones.
    struct FailsAfter {
        good_pages: usize,
    }

    impl AlbumSource for FailsAfter {
        fn fetch_page(&mut self, token: Option<&str>) -> crate::error::Result<AlbumPage> {
            let served = token.map_or(0, |t| t.parse::<usize>().unwrap_or(0));
            if served >= self.good_pages {
                return Err(crate::error::SweepError::listing("HTTP 401: token expired"));
            }
            Ok(AlbumPage {
                albums: vec![ListedAlbum {
                    id: format!("N{served}"),
                    title: "New".into(),
                    photo_count: 1,
                    url: format!("https://photos/N{served}"),
                }],
                next_page_token: Some((served + 1).to_string()),
            })
        }
    }

    #[test]
    fn test_failed_first_page_keeps_stored_inventory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("albums.md");
        let mut app = app_in(&dir, false);
        let mut inv = Inventory::new();
        let mut old = AlbumRecord::new("OLD", "Kept", 2, "https://photos/OLD");
        old.actions_log.push("Deleted on 2024-03-01 10:22:03".to_string());
        inv.insert(old);
        store::save(&inv, &path).unwrap();
        let before = std::fs::read_to_string(&path).unwrap();

        let err = app.refresh_from(&mut FailsAfter { good_pages: 0 }).unwrap_err();
        assert!(format!("{err:#}").contains("HTTP 401"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
        assert_eq!(store::load(&path).unwrap(), inv);
    }

    #[test]
    fn test_partial_listing_is_still_saved() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir, false);

        let outcome = app.refresh_from(&mut FailsAfter { good_pages: 2 }).unwrap();
        assert_eq!(outcome.pages, 2);
        assert!(outcome.error.is_some());
        let stored = store::load(&dir.path().join("albums.md")).unwrap();
        assert_eq!(stored.len(), 2);
        assert!(stored.get("N1").is_some());
    }

    #[test]
    fn test_dry_run_never_persists_results() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir, true);
        app.refresh_from(&mut OnePage).unwrap();
        app.mark_for_delete().unwrap();

        let report = app.execute_deletes().unwrap();
        assert_eq!(report.completed, vec!["A"]);
        let stored = store::load(&dir.path().join("albums.md")).unwrap();
        assert!(!stored.get("A").unwrap().is_deleted());
    }

    #[test]
    fn test_disabled_deleter_refuses() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir, false);
        app.config.deleter.enabled = false;
        app.refresh_from(&mut OnePage).unwrap();
        assert!(app.execute_deletes().is_err());
    }

    #[test]
    fn test_renames_need_recorded_coordinates() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir, false);
        app.refresh_from(&mut OnePage).unwrap();
        app.mark_for_rename().unwrap();
        let err = app.execute_renames().unwrap_err();
        assert!(err.to_string().contains("rename_button"));
    }

    #[test]
    fn test_missing_inventory_is_reported() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir, false);
        let err = app.mark_for_delete().unwrap_err();
        assert!(format!("{err:#}").contains("not found"));
    }

    #[test]
    fn test_renames_apply_new_title() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir, false);
        app.config.coordinates.rename_button = Some(Point::new(4, 4));
        app.config.coordinates.rename_textbox = Some(Point::new(5, 5));
        app.config.coordinates.rename_save_button = Some(Point::new(6, 6));
        let mut inv = Inventory::new();
        inv.insert(AlbumRecord::new("B", "Copy of Trip", 4, "https://photos/B"));
        store::save(&inv, &dir.path().join("albums.md")).unwrap();

        app.mark_for_rename().unwrap();
        let report = app.execute_renames().unwrap();
        assert_eq!(report.completed, vec!["B"]);

        let stored = store::load(&dir.path().join("albums.md")).unwrap();
        let b = stored.get("B").unwrap();
        assert_eq!(b.title, "Trip");
        assert!(b.proposed_title.is_empty());
        assert!(b.actions_log[0].starts_with("Renamed from 'Copy of Trip' on "));
    }
}
