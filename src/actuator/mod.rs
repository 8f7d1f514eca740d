//! Desktop actuator
//!
//! The photo service offers no API for deleting or renaming albums, so those
//! mutations are performed by driving the browser with simulated input. The
//! [`Actuator`] trait is the seam: every call either succeeds or fails with
//! [`SweepError::Actuator`].
//!
//! Only one actuator call runs at a time. The pointer and keyboard focus are a
//! single shared desktop resource.

pub mod dry_run;
pub mod xdotool;

use crate::config::ActuatorConfig;
use crate::error::Result;
use crate::types::{ActuatorBackend, Modifier, Point};
use std::fmt;
use std::time::Duration;

pub use dry_run::DryRunActuator;
pub use xdotool::XdotoolActuator;

/// How a backend learns where the operator wants a click recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureMode {
    /// `await_next_click` blocks until the operator clicks.
    Click,
    /// The operator hovers over the control and confirms on the terminal;
    /// `await_next_click` then reads the pointer position straight away.
    HoverAndEnter,
}

/// Simulated input against the operator's desktop session.
pub trait Actuator {
    /// Open `url` in the browser.
    fn navigate(&mut self, url: &str) -> Result<()>;

    /// Move the pointer without clicking.
    fn move_to(&mut self, point: Point) -> Result<()>;

    /// Left click at `point`.
    fn click(&mut self, point: Point) -> Result<()>;

    /// Press `modifier`+`key` together (e.g. ctrl+w).
    fn key_chord(&mut self, modifier: Modifier, key: &str) -> Result<()>;

    /// Type literal text into the focused control.
    fn type_text(&mut self, text: &str) -> Result<()>;

    /// Return the position to record, per [`Actuator::capture_mode`].
    fn await_next_click(&mut self) -> Result<Point>;

    fn capture_mode(&self) -> CaptureMode {
        CaptureMode::Click
    }

    /// Pacing delay between steps.
    fn pause(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// A single positioned action in an item's click sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActuatorStep {
    Navigate(String),
    MoveTo(Point),
    Click(Point),
    KeyChord { modifier: Modifier, key: String },
    TypeText(String),
    Wait(Duration),
}

impl ActuatorStep {
    /// Run this step on `actuator`.
    pub fn apply(&self, actuator: &mut dyn Actuator) -> Result<()> {
        match self {
            Self::Navigate(url) => actuator.navigate(url),
            Self::MoveTo(point) => actuator.move_to(*point),
            Self::Click(point) => actuator.click(*point),
            Self::KeyChord { modifier, key } => actuator.key_chord(*modifier, key),
            Self::TypeText(text) => actuator.type_text(text),
            Self::Wait(duration) => {
                actuator.pause(*duration);
                Ok(())
            }
        }
    }
}

impl fmt::Display for ActuatorStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Navigate(url) => write!(f, "Navigate({url})"),
            Self::MoveTo(point) => write!(f, "MoveTo{point}"),
            Self::Click(point) => write!(f, "Click{point}"),
            Self::KeyChord { modifier, key } => write!(f, "KeyChord({}+{key})", modifier.resolve()),
            Self::TypeText(text) => write!(f, "TypeText({} chars)", text.chars().count()),
            Self::Wait(duration) => write!(f, "Wait({}ms)", duration.as_millis()),
        }
    }
}

/// Build the actuator selected by configuration. `dry_run` overrides it.
pub fn from_config(config: &ActuatorConfig, dry_run: bool) -> Box<dyn Actuator> {
    if dry_run || config.backend == ActuatorBackend::DryRun {
        return Box::new(DryRunActuator::new());
    }
    Box::new(XdotoolActuator::new(
        config.scale_factor,
        config.browser_command.clone(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_display() {
        assert_eq!(ActuatorStep::Click(Point::new(3, 4)).to_string(), "Click(3, 4)");
        assert_eq!(
            ActuatorStep::Wait(Duration::from_millis(250)).to_string(),
            "Wait(250ms)"
        );
        assert_eq!(
            ActuatorStep::KeyChord { modifier: Modifier::Ctrl, key: "w".into() }.to_string(),
            "KeyChord(ctrl+w)"
        );
    }

    #[test]
    fn test_apply_routes_to_actuator() {
        let mut actuator = DryRunActuator::new();
        ActuatorStep::Navigate("https://photos/a".into())
            .apply(&mut actuator)
            .unwrap();
        ActuatorStep::Wait(Duration::from_secs(5)).apply(&mut actuator).unwrap();
        assert_eq!(actuator.steps().len(), 2);
        assert_eq!(actuator.steps()[0], ActuatorStep::Navigate("https://photos/a".into()));
    }
}
