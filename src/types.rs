//! Type-safe configuration types for albumsweep
//!
//! Enumerated configuration options are proper Rust enums so unknown values
//! are rejected when the config file is parsed rather than at first use.

use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{Display, EnumIter, EnumString};

/// A device-relative screen position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Multiply both axes by `factor`, rounding to the nearest pixel.
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            x: (f64::from(self.x) * factor).round() as i32,
            y: (f64::from(self.y) * factor).round() as i32,
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Modifier key used for keyboard chords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Modifier {
    /// Pick `cmd` on macOS and `ctrl` everywhere else
    #[default]
    Auto,
    Ctrl,
    Cmd,
    Alt,
    Shift,
}

impl Modifier {
    /// Resolve `Auto` against the running platform.
    pub fn resolve(self) -> Self {
        match self {
            Self::Auto if cfg!(target_os = "macos") => Self::Cmd,
            Self::Auto => Self::Ctrl,
            other => other,
        }
    }

    /// Key name understood by xdotool.
    pub fn xdotool_name(self) -> &'static str {
        match self.resolve() {
            Self::Cmd => "super",
            Self::Alt => "alt",
            Self::Shift => "shift",
            Self::Ctrl | Self::Auto => "ctrl",
        }
    }
}

/// Which actuator implementation drives the desktop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ActuatorBackend {
    #[default]
    Xdotool,
    /// Log every step without touching the desktop
    DryRun,
}

/// Log verbosity accepted in the `logging.level` option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

/// Which click sequence is being calibrated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RecordingKind {
    Delete,
    Rename,
}

impl RecordingKind {
    /// Targets in the order the operator clicks them.
    pub const fn targets(self) -> &'static [CoordinateTarget] {
        match self {
            Self::Delete => &[
                CoordinateTarget::ThreeDots,
                CoordinateTarget::DeleteButton,
                CoordinateTarget::ConfirmDeleteButton,
            ],
            Self::Rename => &[
                CoordinateTarget::ThreeDots,
                CoordinateTarget::RenameButton,
                CoordinateTarget::RenameTextbox,
                CoordinateTarget::RenameSaveButton,
            ],
        }
    }
}

/// A named on-screen control the actuator clicks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum CoordinateTarget {
    ThreeDots,
    DeleteButton,
    ConfirmDeleteButton,
    RenameButton,
    RenameTextbox,
    RenameSaveButton,
}

impl CoordinateTarget {
    /// Instruction shown to the operator while recording this target.
    pub const fn prompt(self) -> &'static str {
        match self {
            Self::ThreeDots => "Click the three dots at the top right of the album page.",
            Self::DeleteButton => "Click the \"Delete album\" menu item.",
            Self::ConfirmDeleteButton => "Click the \"Delete\" button in the confirmation dialog.",
            Self::RenameButton => "Click the \"Edit album\" menu item.",
            Self::RenameTextbox => "Click the album name field at or near the beginning.",
            Self::RenameSaveButton => {
                "Click the checkmark button at the top left of the screen (confirms edit)."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_point_scaling_rounds() {
        assert_eq!(Point::new(100, 51).scaled(2.0), Point::new(200, 102));
        assert_eq!(Point::new(101, 51).scaled(0.5), Point::new(51, 26));
    }

    #[test]
    fn test_modifier_resolve_never_auto() {
        assert_ne!(Modifier::Auto.resolve(), Modifier::Auto);
        assert_eq!(Modifier::Alt.resolve(), Modifier::Alt);
    }

    #[test]
    fn test_backend_strings() {
        assert_eq!(ActuatorBackend::DryRun.to_string(), "dry-run");
        assert_eq!(ActuatorBackend::from_str("xdotool").unwrap(), ActuatorBackend::Xdotool);
        let parsed: ActuatorBackend = serde_json::from_str("\"dry-run\"").unwrap();
        assert_eq!(parsed, ActuatorBackend::DryRun);
    }

    #[test]
    fn test_recording_targets_start_with_menu() {
        assert_eq!(RecordingKind::Delete.targets()[0], CoordinateTarget::ThreeDots);
        assert_eq!(RecordingKind::Rename.targets().len(), 4);
        assert_eq!(CoordinateTarget::ConfirmDeleteButton.to_string(), "confirm_delete_button");
    }
}
