//! xdotool-backed actuator.
//!
//! Every call spawns one blocking `xdotool` (or browser) process and waits
//! for it. A spawn failure or non-zero exit becomes an actuator failure
//! carrying the tool's stderr.

use super::{Actuator, CaptureMode};
use crate::error::{Result, SweepError};
use crate::types::{Modifier, Point};
use std::process::Command;
use tracing::{debug, error};

pub struct XdotoolActuator {
    /// Device pixels per configured pixel
    scale_factor: f64,
    browser_command: String,
}

impl XdotoolActuator {
    pub fn new(scale_factor: f64, browser_command: String) -> Self {
        Self {
            scale_factor,
            browser_command,
        }
    }

    fn device_point(&self, point: Point) -> Point {
        point.scaled(self.scale_factor)
    }

    fn xdotool(&self, args: &[&str]) -> Result<String> {
        run_command("xdotool", args)
    }
}

/// Run a command to completion, returning its stdout.
fn run_command(program: &str, args: &[&str]) -> Result<String> {
    debug!("Executing {} {:?}", program, args);
    Command::new(program)
        .args(args)
        .output()
        .map_err(|e| {
            error!("Failed to spawn {}: {}", program, e);
            SweepError::actuator(format!("failed to run {program}: {e}"))
        })
        .and_then(|output| {
            if output.status.success() {
                Ok(String::from_utf8_lossy(&output.stdout).to_string())
            } else {
                let stderr = String::from_utf8_lossy(&output.stderr);
                error!("{} {:?} failed with {}: {}", program, args, output.status, stderr.trim());
                Err(SweepError::actuator(format!(
                    "{program} exited with {}: {}",
                    output.status,
                    stderr.trim()
                )))
            }
        })
}

/// Parse `xdotool getmouselocation --shell` output.
fn parse_mouse_location(output: &str) -> Option<Point> {
    let mut x = None;
    let mut y = None;
    for line in output.lines() {
        match line.split_once('=') {
            Some(("X", value)) => x = value.trim().parse().ok(),
            Some(("Y", value)) => y = value.trim().parse().ok(),
            _ => {}
        }
    }
    Some(Point::new(x?, y?))
}

impl Actuator for XdotoolActuator {
    fn navigate(&mut self, url: &str) -> Result<()> {
        let mut parts = self.browser_command.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| SweepError::actuator("browser command is empty"))?;
        let mut args: Vec<&str> = parts.collect();
        args.push(url);
        run_command(program, &args).map(|_| ())
    }

    fn move_to(&mut self, point: Point) -> Result<()> {
        let p = self.device_point(point);
        self.xdotool(&["mousemove", &p.x.to_string(), &p.y.to_string()])
            .map(|_| ())
    }

    fn click(&mut self, point: Point) -> Result<()> {
        let p = self.device_point(point);
        self.xdotool(&[
            "mousemove",
            &p.x.to_string(),
            &p.y.to_string(),
            "click",
            "1",
        ])
        .map(|_| ())
    }

    fn key_chord(&mut self, modifier: Modifier, key: &str) -> Result<()> {
        let chord = format!("{}+{}", modifier.xdotool_name(), key);
        self.xdotool(&["key", "--clearmodifiers", &chord]).map(|_| ())
    }

    fn type_text(&mut self, text: &str) -> Result<()> {
        self.xdotool(&["type", "--delay", "50", "--", text]).map(|_| ())
    }

    /// xdotool cannot wait for a click, so the operator places the pointer
    /// and presses Enter in the terminal instead.
    fn capture_mode(&self) -> CaptureMode {
        CaptureMode::HoverAndEnter
    }

    /// Current pointer position in configured pixels.
    fn await_next_click(&mut self) -> Result<Point> {
        let output = self.xdotool(&["getmouselocation", "--shell"])?;
        let device = parse_mouse_location(&output).ok_or_else(|| {
            SweepError::actuator(format!("unreadable pointer location: {}", output.trim()))
        })?;
        Ok(device.scaled(1.0 / self.scale_factor))
    }
}
