//! albumsweep Library
//!
//! Core functionality for listing photo albums, marking them by rule and
//! renaming or deleting them through a desktop actuator.

pub mod actuator;
pub mod album;
pub mod app;
pub mod cli;
pub mod config;
pub mod driver;
pub mod error;
pub mod listing;
pub mod menu;
pub mod planner;
pub mod recorder;
pub mod rules;
pub mod signals;
pub mod store;
pub mod types;

// Re-export main types for convenience
pub use actuator::{Actuator, ActuatorStep, DryRunActuator, XdotoolActuator};
pub use album::{AlbumRecord, Inventory};
pub use app::App;
pub use config::{Coordinates, Pacing, SweepConfig};
pub use driver::{ActionKind, BatchHalt, BatchReport, Driver, ItemFailure, ItemRun, ItemStage, Targets};
pub use error::{StoreLoadError, SweepError};
pub use listing::{AlbumSource, ListingOutcome, PhotosLibraryClient, refresh_inventory};
pub use planner::{plan_deletions, plan_renames};
pub use rules::{DeletionRules, MarkSummary, mark_for_deletion, mark_for_rename};
pub use signals::StopSignal;
pub use types::{ActuatorBackend, CoordinateTarget, LogLevel, Modifier, Point, RecordingKind};
