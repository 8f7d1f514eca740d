//! Dry-run actuator: logs every step and never touches the desktop.

use super::{Actuator, ActuatorStep};
use crate::error::{Result, SweepError};
use crate::types::{Modifier, Point};
use std::time::Duration;
use tracing::info;

/// Records the steps it was asked to perform.
#[derive(Debug, Default)]
pub struct DryRunActuator {
    steps: Vec<ActuatorStep>,
}

impl DryRunActuator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Steps received so far, in order.
    pub fn steps(&self) -> &[ActuatorStep] {
        &self.steps
    }

    fn record(&mut self, step: ActuatorStep) -> Result<()> {
        info!("[DRY RUN] {}", step);
        self.steps.push(step);
        Ok(())
    }
}

impl Actuator for DryRunActuator {
    fn navigate(&mut self, url: &str) -> Result<()> {
        self.record(ActuatorStep::Navigate(url.to_string()))
    }

    fn move_to(&mut self, point: Point) -> Result<()> {
        self.record(ActuatorStep::MoveTo(point))
    }

    fn click(&mut self, point: Point) -> Result<()> {
        self.record(ActuatorStep::Click(point))
    }

    fn key_chord(&mut self, modifier: Modifier, key: &str) -> Result<()> {
        self.record(ActuatorStep::KeyChord {
            modifier,
            key: key.to_string(),
        })
    }

    fn type_text(&mut self, text: &str) -> Result<()> {
        self.record(ActuatorStep::TypeText(text.to_string()))
    }

    fn await_next_click(&mut self) -> Result<Point> {
        Err(SweepError::actuator(
            "coordinates cannot be recorded in dry-run mode",
        ))
    }

    /// Recorded but not slept, so a dry run finishes immediately.
    fn pause(&mut self, duration: Duration) {
        let _ = self.record(ActuatorStep::Wait(duration));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_order_without_sleeping() {
        let mut actuator = DryRunActuator::new();
        let start = std::time::Instant::now();
        actuator.move_to(Point::new(1, 2)).unwrap();
        actuator.pause(Duration::from_secs(30));
        actuator.click(Point::new(1, 2)).unwrap();
        assert!(start.elapsed() < Duration::from_secs(5));
        assert_eq!(
            actuator.steps(),
            &[
                ActuatorStep::MoveTo(Point::new(1, 2)),
                ActuatorStep::Wait(Duration::from_secs(30)),
                ActuatorStep::Click(Point::new(1, 2)),
            ]
        );
    }

    #[test]
    fn test_cannot_record_clicks() {
        let mut actuator = DryRunActuator::new();
        assert!(actuator.await_next_click().is_err());
    }
}
