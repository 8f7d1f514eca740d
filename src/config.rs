//! Configuration file handling.
//!
//! The whole configuration is one typed [`SweepConfig`] read from JSON.
//! Unknown keys and unknown enum values are rejected while parsing, and
//! [`SweepConfig::validate`] is called before any album work starts.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::rules::DeletionRules;
use crate::types::{ActuatorBackend, CoordinateTarget, LogLevel, Modifier, Point};

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "album-sweep.json";

/// Photo service landing page, opened while recording coordinates.
pub const PHOTOS_HOME_URL: &str = "https://photos.google.com";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SweepConfig {
    pub logging: LoggingConfig,
    pub listing: ListingConfig,
    pub rules: RulesConfig,
    pub deleter: DeleterConfig,
    pub renamer: RenamerConfig,
    pub actuator: ActuatorConfig,
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log file, truncated at startup. Logs go to stderr when unset.
    pub file: Option<PathBuf>,
    pub level: LogLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ListingConfig {
    /// Inventory table written by a refresh and read by every other action
    pub inventory_file: PathBuf,
    /// Stop paging once more than this many albums were listed
    pub list_length_limit: usize,
    pub page_size: u32,
    /// Pause between pages
    pub page_pause_ms: u64,
    pub endpoint: String,
    /// File holding an OAuth access token for the library API
    pub token_file: PathBuf,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            inventory_file: PathBuf::from("albums.md"),
            list_length_limit: 10_000,
            page_size: 50,
            page_pause_ms: 1000,
            endpoint: "https://photoslibrary.googleapis.com".to_string(),
            token_file: PathBuf::from("token.txt"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RulesConfig {
    pub delete_empty_albums: bool,
    pub delete_albums_that_contain: Vec<String>,
}

impl RulesConfig {
    pub fn deletion_rules(&self) -> DeletionRules {
        DeletionRules::new(
            self.delete_empty_albums,
            self.delete_albums_that_contain
                .iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeleterConfig {
    /// Master switch for executing deletes
    pub enabled: bool,
    pub max_albums_to_delete: usize,
    pub page_load_wait_ms: u64,
    pub mouse_move_wait_ms: u64,
    pub mouse_click_wait_ms: u64,
}

impl Default for DeleterConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_albums_to_delete: 10,
            page_load_wait_ms: 1000,
            mouse_move_wait_ms: 1000,
            mouse_click_wait_ms: 1000,
        }
    }
}

impl DeleterConfig {
    pub fn pacing(&self) -> Pacing {
        Pacing {
            page_load: Duration::from_millis(self.page_load_wait_ms),
            mouse_move: Duration::from_millis(self.mouse_move_wait_ms),
            mouse_click: Duration::from_millis(self.mouse_click_wait_ms),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenamerConfig {
    pub max_albums_to_rename: usize,
}

impl Default for RenamerConfig {
    fn default() -> Self {
        Self {
            max_albums_to_rename: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ActuatorConfig {
    pub backend: ActuatorBackend,
    /// Device pixels per recorded pixel (2.0 on most HiDPI displays)
    pub scale_factor: f64,
    pub close_tab_modifier: Modifier,
    /// Command used to open album URLs
    pub browser_command: String,
}

impl Default for ActuatorConfig {
    fn default() -> Self {
        Self {
            backend: ActuatorBackend::Xdotool,
            scale_factor: 1.0,
            close_tab_modifier: Modifier::Auto,
            browser_command: "xdg-open".to_string(),
        }
    }
}

/// Recorded screen positions. Unset until the operator records them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Coordinates {
    pub three_dots: Option<Point>,
    pub delete_button: Option<Point>,
    pub confirm_delete_button: Option<Point>,
    pub rename_button: Option<Point>,
    pub rename_textbox: Option<Point>,
    pub rename_save_button: Option<Point>,
}

impl Coordinates {
    pub fn get(&self, target: CoordinateTarget) -> Option<Point> {
        match target {
            CoordinateTarget::ThreeDots => self.three_dots,
            CoordinateTarget::DeleteButton => self.delete_button,
            CoordinateTarget::ConfirmDeleteButton => self.confirm_delete_button,
            CoordinateTarget::RenameButton => self.rename_button,
            CoordinateTarget::RenameTextbox => self.rename_textbox,
            CoordinateTarget::RenameSaveButton => self.rename_save_button,
        }
    }

    pub fn set(&mut self, target: CoordinateTarget, point: Point) {
        let slot = match target {
            CoordinateTarget::ThreeDots => &mut self.three_dots,
            CoordinateTarget::DeleteButton => &mut self.delete_button,
            CoordinateTarget::ConfirmDeleteButton => &mut self.confirm_delete_button,
            CoordinateTarget::RenameButton => &mut self.rename_button,
            CoordinateTarget::RenameTextbox => &mut self.rename_textbox,
            CoordinateTarget::RenameSaveButton => &mut self.rename_save_button,
        };
        *slot = Some(point);
    }

    /// Look up a set of targets, naming every one still unrecorded.
    pub fn require(&self, targets: &[CoordinateTarget]) -> Result<Vec<Point>> {
        let missing: Vec<String> = targets
            .iter()
            .filter(|t| self.get(**t).is_none())
            .map(|t| t.to_string())
            .collect();
        if !missing.is_empty() {
            anyhow::bail!(
                "Coordinates not recorded: {} (run the record action first)",
                missing.join(", ")
            );
        }
        Ok(targets.iter().filter_map(|t| self.get(*t)).collect())
    }
}

/// Unconditional delays that let the remote UI finish rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pacing {
    pub page_load: Duration,
    pub mouse_move: Duration,
    pub mouse_click: Duration,
}

impl SweepConfig {
    /// Save configuration to a JSON file (temp file, then rename)
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize configuration to JSON")?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());
        let tmp = path.with_file_name(format!(".{name}.tmp"));
        fs::write(&tmp, json)
            .with_context(|| format!("Failed to write configuration to {:?}", tmp))?;
        fs::rename(&tmp, path)
            .with_context(|| format!("Failed to replace configuration at {:?}", path))?;

        Ok(())
    }

    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read configuration from {:?}", path.as_ref()))?;

        let config: Self =
            serde_json::from_str(&content).context("Failed to parse configuration JSON")?;

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.listing.inventory_file.as_os_str().is_empty() {
            anyhow::bail!("listing.inventory_file must be specified");
        }
        if self.listing.list_length_limit == 0 {
            anyhow::bail!("listing.list_length_limit must be greater than 0");
        }
        if !(1..=50).contains(&self.listing.page_size) {
            anyhow::bail!("listing.page_size must be between 1 and 50");
        }
        let endpoint = self.listing.endpoint.trim();
        if !endpoint.starts_with("https://") && !endpoint.starts_with("http://") {
            anyhow::bail!("listing.endpoint must start with http:// or https://");
        }

        if self.deleter.max_albums_to_delete == 0 {
            anyhow::bail!("deleter.max_albums_to_delete must be greater than 0");
        }
        if self.renamer.max_albums_to_rename == 0 {
            anyhow::bail!("renamer.max_albums_to_rename must be greater than 0");
        }

        if !self.actuator.scale_factor.is_finite() || self.actuator.scale_factor <= 0.0 {
            anyhow::bail!("actuator.scale_factor must be a positive number");
        }
        if self.actuator.browser_command.trim().is_empty() {
            anyhow::bail!("actuator.browser_command must be specified");
        }

        Ok(())
    }
}
