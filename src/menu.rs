//! Interactive numbered menu and the operator-facing summaries shared with
//! the one-shot subcommands.

use anyhow::Result;
use std::io::{BufRead, Write};
use strum::{EnumIter, IntoEnumIterator};
use tracing::{error, info};

use crate::app::App;
use crate::driver::ActionKind;
use crate::types::RecordingKind;

/// Entries of the main menu, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum MenuChoice {
    RefreshListing,
    MarkForRename,
    MarkForDelete,
    RecordCoordinates,
    ExecuteRenames,
    ExecuteDeletes,
    Quit,
}

impl MenuChoice {
    /// 1-based menu number.
    pub fn number(self) -> usize {
        Self::iter().position(|c| c == self).map_or(0, |i| i + 1)
    }

    pub fn from_number(n: usize) -> Option<Self> {
        n.checked_sub(1).and_then(|i| Self::iter().nth(i))
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::RefreshListing => "Refresh album listing",
            Self::MarkForRename => "Mark albums for rename",
            Self::MarkForDelete => "Mark albums for delete",
            Self::RecordCoordinates => "Record click coordinates",
            Self::ExecuteRenames => "Execute renames",
            Self::ExecuteDeletes => "Execute deletes",
            Self::Quit => "Quit",
        }
    }
}

/// One unit of work, whether picked from the menu or given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Refresh,
    MarkRename,
    MarkDelete,
    Record(RecordingKind),
    Rename,
    Delete,
}

/// Run `action` and write a short summary to `output`.
pub fn perform<R: BufRead, W: Write>(
    app: &mut App,
    action: Action,
    input: &mut R,
    output: &mut W,
) -> Result<()> {
    info!(?action, "Running action");
    match action {
        Action::Refresh => {
            let outcome = app.refresh_listing()?;
            writeln!(
                output,
                "✓ Listed {} albums over {} pages",
                outcome.inventory.len(),
                outcome.pages
            )?;
            if let Some(e) = outcome.error {
                writeln!(output, "⚠ Listing ended early, inventory is partial: {e}")?;
            }
        }
        Action::MarkRename => {
            let proposed = app.mark_for_rename()?;
            writeln!(output, "✓ Proposed new titles for {proposed} albums")?;
        }
        Action::MarkDelete => {
            let summary = app.mark_for_delete()?;
            writeln!(
                output,
                "✓ {} albums match the deletion rules ({} newly flagged)",
                summary.matched, summary.newly_flagged
            )?;
        }
        Action::Record(kind) => {
            if app.record_coordinates(kind, input, output)? {
                writeln!(output, "✓ Saved {kind} coordinates")?;
            } else {
                writeln!(output, "Nothing recorded")?;
            }
        }
        Action::Rename => {
            let report = app.execute_renames()?;
            for line in report.summary_lines(ActionKind::Rename) {
                writeln!(output, "{line}")?;
            }
        }
        Action::Delete => {
            let report = app.execute_deletes()?;
            for line in report.summary_lines(ActionKind::Delete) {
                writeln!(output, "{line}")?;
            }
        }
    }
    Ok(())
}

fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn ask_recording_kind<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> Result<Option<RecordingKind>> {
    writeln!(output, "Record coordinates for: 1) delete  2) rename  (anything else to go back)")?;
    Ok(match read_line(input)?.as_deref() {
        Some("1") => Some(RecordingKind::Delete),
        Some("2") => Some(RecordingKind::Rename),
        _ => None,
    })
}

/// Show the menu until the operator quits, input ends or a stop is requested.
/// Failed actions are reported and the menu is shown again.
pub fn run_menu<R: BufRead, W: Write>(app: &mut App, input: &mut R, output: &mut W) -> Result<()> {
    loop {
        writeln!(output)?;
        for choice in MenuChoice::iter() {
            writeln!(output, "{}. {}", choice.number(), choice.label())?;
        }
        write!(output, "Choose an action: ")?;
        output.flush()?;

        let Some(line) = read_line(input)? else {
            break;
        };
        let Some(choice) = line.parse().ok().and_then(MenuChoice::from_number) else {
            writeln!(output, "Invalid choice '{line}', enter a number from the menu")?;
            continue;
        };

        let action = match choice {
            MenuChoice::Quit => break,
            MenuChoice::RefreshListing => Action::Refresh,
            MenuChoice::MarkForRename => Action::MarkRename,
            MenuChoice::MarkForDelete => Action::MarkDelete,
            MenuChoice::RecordCoordinates => match ask_recording_kind(input, output)? {
                Some(kind) => Action::Record(kind),
                None => continue,
            },
            MenuChoice::ExecuteRenames => Action::Rename,
            MenuChoice::ExecuteDeletes => Action::Delete,
        };

        if let Err(e) = perform(app, action, input, output) {
            error!(?action, "Action failed: {:#}", e);
            writeln!(output, "✗ {e:#}")?;
        }
        if app.stop_signal().is_requested() {
            writeln!(output, "Stop requested, exiting")?;
            break;
        }
    }
    info!("Leaving menu");
    Ok(())
}
