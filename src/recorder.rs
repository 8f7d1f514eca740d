//! Coordinate recording
//!
//! Walks the operator through clicking each control of a delete or rename
//! sequence once, so later batches know where to click. Every recorded click
//! is echoed back and must be accepted before moving on.

use crate::actuator::{Actuator, CaptureMode};
use crate::config::{Coordinates, PHOTOS_HOME_URL};
use crate::error::Result;
use crate::types::{CoordinateTarget, Point, RecordingKind};
use std::io::{BufRead, Write};
use tracing::info;

/// Operator's answer after a click was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Answer {
    Accept,
    Cancel,
    Retry,
}

impl Answer {
    fn parse(line: &str) -> Self {
        match line.trim().to_lowercase().as_str() {
            "y" => Self::Accept,
            "c" => Self::Cancel,
            _ => Self::Retry,
        }
    }
}

/// Read one line; `None` on end of input.
fn read_answer<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

/// Prompt for and capture one position. `None` when input ends while
/// waiting for the operator to confirm a hover.
fn capture<R: BufRead, W: Write>(
    actuator: &mut dyn Actuator,
    target: CoordinateTarget,
    input: &mut R,
    output: &mut W,
) -> Result<Option<Point>> {
    match actuator.capture_mode() {
        CaptureMode::Click => {
            writeln!(
                output,
                "\nOnly the very next click is recorded. Use alt-tab (cmd-tab on mac) to \
                 switch to the browser window.\n{}",
                target.prompt()
            )?;
        }
        CaptureMode::HoverAndEnter => {
            writeln!(
                output,
                "\n{}\nHover over the control, then press <enter> here to record the position.",
                target.prompt()
            )?;
            output.flush()?;
            if read_answer(input)?.is_none() {
                return Ok(None);
            }
        }
    }
    actuator.await_next_click().map(Some)
}

/// Record every target of `kind`. Returns `None` when the operator cancels.
pub fn record_targets<R: BufRead, W: Write>(
    kind: RecordingKind,
    actuator: &mut dyn Actuator,
    input: &mut R,
    output: &mut W,
) -> Result<Option<Vec<(CoordinateTarget, Point)>>> {
    writeln!(output, "Opening {PHOTOS_HOME_URL} in your browser.")?;
    actuator.navigate(PHOTOS_HOME_URL)?;
    writeln!(
        output,
        "Log in, open the Albums tab and open an album you can {kind}.\n\
         Then come back here, type \"y\" and press <enter> (anything else cancels)."
    )?;
    match read_answer(input)? {
        Some(line) if Answer::parse(&line) == Answer::Accept => {}
        _ => {
            writeln!(output, "Ok, skipping {kind} coordinates.")?;
            return Ok(None);
        }
    }

    let mut recorded = Vec::with_capacity(kind.targets().len());
    for &target in kind.targets() {
        loop {
            let Some(point) = capture(actuator, target, input, output)? else {
                writeln!(output, "Ok, nothing will be saved.")?;
                return Ok(None);
            };
            writeln!(output, "Click recorded as {target} at {point}")?;
            writeln!(
                output,
                "Was that the click you wanted? (\"y\" for yes, \"c\" to cancel, anything else to try again)"
            )?;

            let answer = read_answer(input)?.map_or(Answer::Cancel, |l| Answer::parse(&l));
            match answer {
                Answer::Accept => {
                    info!(%target, %point, "Recorded coordinate");
                    recorded.push((target, point));
                    break;
                }
                Answer::Cancel => {
                    writeln!(output, "Ok, nothing will be saved.")?;
                    return Ok(None);
                }
                Answer::Retry => writeln!(output, "Ok, try again.")?,
            }
        }
    }
    Ok(Some(recorded))
}

/// Write recorded points into `coordinates`.
pub fn apply(coordinates: &mut Coordinates, recorded: &[(CoordinateTarget, Point)]) {
    for (target, point) in recorded {
        coordinates.set(*target, *point);
    }
}
