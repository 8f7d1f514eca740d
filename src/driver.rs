//! Actuator driver
//!
//! Executes planned albums one at a time. Each album walks a forward-only
//! stage sequence; every transition is one group of actuator calls plus the
//! pacing delays that follow them.
//!
//! # Stage Flow
//!
//! ```text
//! Delete: Pending → Navigated → MenuOpened → DeleteClicked → Confirmed → Closed → Logged
//! Rename: Pending → Navigated → MenuOpened → EditClicked → TitleEntered → Saved → Closed → Logged
//!
//! (Any non-terminal stage can transition to Abandoned)
//! ```
//!
//! An album's row is only touched on reaching `Closed`: one log entry is
//! appended (and, for renames, the title updated) and the inventory is
//! checkpointed. An abandoned album leaves its row exactly as it was, so a
//! re-run attempts it again.

use crate::actuator::{Actuator, ActuatorStep};
use crate::album::{AlbumRecord, Inventory};
use crate::config::Pacing;
use crate::error::{Result, SweepError};
use crate::signals::StopSignal;
use crate::types::{CoordinateTarget, Modifier, Point, RecordingKind};
use chrono::{DateTime, Local};
use std::fmt;
use tracing::{error, info, warn};

/// What the driver does to an album.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Delete,
    Rename,
}

impl ActionKind {
    /// Stages in order, from `Pending` to `Logged`.
    pub const fn stages(self) -> &'static [ItemStage] {
        match self {
            Self::Delete => &[
                ItemStage::Pending,
                ItemStage::Navigated,
                ItemStage::MenuOpened,
                ItemStage::DeleteClicked,
                ItemStage::Confirmed,
                ItemStage::Closed,
                ItemStage::Logged,
            ],
            Self::Rename => &[
                ItemStage::Pending,
                ItemStage::Navigated,
                ItemStage::MenuOpened,
                ItemStage::EditClicked,
                ItemStage::TitleEntered,
                ItemStage::Saved,
                ItemStage::Closed,
                ItemStage::Logged,
            ],
        }
    }

    /// Screen positions this action clicks, in click order.
    pub const fn targets(self) -> &'static [CoordinateTarget] {
        match self {
            Self::Delete => RecordingKind::Delete.targets(),
            Self::Rename => RecordingKind::Rename.targets(),
        }
    }

    /// Execution-time skip check against the live row.
    fn still_wanted(self, record: &AlbumRecord) -> bool {
        match self {
            Self::Delete => record.awaiting_delete(),
            Self::Rename => record.has_pending_rename() && !record.is_deleted(),
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Delete => write!(f, "delete"),
            Self::Rename => write!(f, "rename"),
        }
    }
}

/// Per-album execution stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemStage {
    Pending,
    Navigated,
    MenuOpened,
    DeleteClicked,
    Confirmed,
    EditClicked,
    TitleEntered,
    Saved,
    Closed,
    /// Log entry written (terminal, success)
    Logged,
    /// An actuator call failed (terminal)
    Abandoned,
}

impl ItemStage {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Logged | Self::Abandoned)
    }
}

impl fmt::Display for ItemStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "Pending",
            Self::Navigated => "Navigated",
            Self::MenuOpened => "MenuOpened",
            Self::DeleteClicked => "DeleteClicked",
            Self::Confirmed => "Confirmed",
            Self::EditClicked => "EditClicked",
            Self::TitleEntered => "TitleEntered",
            Self::Saved => "Saved",
            Self::Closed => "Closed",
            Self::Logged => "Logged",
            Self::Abandoned => "Abandoned",
        };
        f.write_str(name)
    }
}

/// Tracks one album through its stage sequence.
///
/// Only the immediate next stage of the action's sequence can be entered;
/// `abandon` is allowed from any non-terminal stage.
#[derive(Debug, Clone)]
pub struct ItemRun {
    kind: ActionKind,
    current: ItemStage,
    failed_at: Option<ItemStage>,
}

impl ItemRun {
    pub fn new(kind: ActionKind) -> Self {
        Self {
            kind,
            current: ItemStage::Pending,
            failed_at: None,
        }
    }

    #[inline]
    pub fn current_stage(&self) -> ItemStage {
        self.current
    }

    /// Stage that was current when the item was abandoned.
    #[inline]
    pub fn failed_at(&self) -> Option<ItemStage> {
        self.failed_at
    }

    /// Next stage in this action's sequence, if any.
    pub fn next_stage(&self) -> Option<ItemStage> {
        let stages = self.kind.stages();
        stages
            .iter()
            .position(|s| *s == self.current)
            .and_then(|i| stages.get(i + 1))
            .copied()
    }

    /// Enter `target`, which must be the immediate next stage.
    pub fn transition_to(&mut self, target: ItemStage) -> Result<ItemStage> {
        if self.current.is_terminal() {
            return Err(SweepError::StageTransition(format!(
                "{} item is already {}",
                self.kind, self.current
            )));
        }
        if self.next_stage() != Some(target) {
            return Err(SweepError::StageTransition(format!(
                "{} item cannot go from {} to {}",
                self.kind, self.current, target
            )));
        }
        self.current = target;
        Ok(target)
    }

    /// Give up on the item at its current stage.
    pub fn abandon(&mut self) -> Result<()> {
        if self.current.is_terminal() {
            return Err(SweepError::StageTransition(format!(
                "{} item is already {}",
                self.kind, self.current
            )));
        }
        self.failed_at = Some(self.current);
        self.current = ItemStage::Abandoned;
        Ok(())
    }
}

/// Resolved screen positions for one action kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Targets {
    Delete {
        three_dots: Point,
        delete_button: Point,
        confirm_button: Point,
    },
    Rename {
        three_dots: Point,
        rename_button: Point,
        textbox: Point,
        save_button: Point,
    },
}

impl Targets {
    /// Build from points ordered as in [`ActionKind::targets`].
    pub fn from_points(kind: ActionKind, points: &[Point]) -> Result<Self> {
        match (kind, points) {
            (ActionKind::Delete, [three_dots, delete_button, confirm_button]) => Ok(Self::Delete {
                three_dots: *three_dots,
                delete_button: *delete_button,
                confirm_button: *confirm_button,
            }),
            (ActionKind::Rename, [three_dots, rename_button, textbox, save_button]) => {
                Ok(Self::Rename {
                    three_dots: *three_dots,
                    rename_button: *rename_button,
                    textbox: *textbox,
                    save_button: *save_button,
                })
            }
            _ => Err(SweepError::config(format!(
                "{kind} needs {} coordinates, got {}",
                kind.targets().len(),
                points.len()
            ))),
        }
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            Self::Delete { .. } => ActionKind::Delete,
            Self::Rename { .. } => ActionKind::Rename,
        }
    }
}

/// Actuator steps for each transition of one album, in order.
pub type ItemScript = Vec<(ItemStage, Vec<ActuatorStep>)>;

fn move_and_click(point: Point, pacing: &Pacing) -> Vec<ActuatorStep> {
    vec![
        ActuatorStep::MoveTo(point),
        ActuatorStep::Wait(pacing.mouse_move),
        ActuatorStep::Click(point),
        ActuatorStep::Wait(pacing.mouse_click),
    ]
}

/// Build the click script for one album. `Logged` has no actuator steps and
/// is not part of the script.
pub fn build_script(
    record: &AlbumRecord,
    targets: &Targets,
    pacing: &Pacing,
    close_modifier: Modifier,
) -> ItemScript {
    let navigate = vec![
        ActuatorStep::Navigate(record.url.clone()),
        ActuatorStep::Wait(pacing.page_load),
    ];
    let close = vec![
        ActuatorStep::KeyChord {
            modifier: close_modifier,
            key: "w".to_string(),
        },
        ActuatorStep::Wait(pacing.mouse_click),
    ];

    match targets {
        Targets::Delete {
            three_dots,
            delete_button,
            confirm_button,
        } => vec![
            (ItemStage::Navigated, navigate),
            (ItemStage::MenuOpened, move_and_click(*three_dots, pacing)),
            (ItemStage::DeleteClicked, move_and_click(*delete_button, pacing)),
            (ItemStage::Confirmed, move_and_click(*confirm_button, pacing)),
            (ItemStage::Closed, close),
        ],
        Targets::Rename {
            three_dots,
            rename_button,
            textbox,
            save_button,
        } => {
            let mut enter_title = move_and_click(*textbox, pacing);
            enter_title.extend([
                ActuatorStep::KeyChord {
                    modifier: close_modifier,
                    key: "a".to_string(),
                },
                ActuatorStep::TypeText(record.proposed_title.clone()),
                ActuatorStep::Wait(pacing.mouse_click),
            ]);
            vec![
                (ItemStage::Navigated, navigate),
                (ItemStage::MenuOpened, move_and_click(*three_dots, pacing)),
                (ItemStage::EditClicked, move_and_click(*rename_button, pacing)),
                (ItemStage::TitleEntered, enter_title),
                (ItemStage::Saved, move_and_click(*save_button, pacing)),
                (ItemStage::Closed, close),
            ]
        }
    }
}

/// Why a batch ended before working through its whole plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchHalt {
    /// The item cap was reached with planned items remaining
    CapReached,
    /// A stop signal arrived between items
    StopRequested,
    /// Persisting a completed item failed; continuing could repeat work
    CheckpointFailed(String),
}

/// An album whose click sequence failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    pub album_id: String,
    pub title: String,
    pub stage: ItemStage,
    pub error: String,
}

/// Outcome of one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub completed: Vec<String>,
    pub failed: Vec<ItemFailure>,
    /// Planned albums no longer needing the action when their turn came
    pub skipped: Vec<String>,
    pub halt: Option<BatchHalt>,
}

impl BatchReport {
    /// Items the actuator was started on.
    pub fn attempted(&self) -> usize {
        self.completed.len() + self.failed.len()
    }

    /// Operator-facing summary.
    pub fn summary_lines(&self, kind: ActionKind) -> Vec<String> {
        let mut lines = vec![format!(
            "{kind}: {} completed, {} failed, {} skipped",
            self.completed.len(),
            self.failed.len(),
            self.skipped.len()
        )];
        for failure in &self.failed {
            lines.push(format!(
                "  failed '{}' ({}) at {}: {}",
                failure.title, failure.album_id, failure.stage, failure.error
            ));
        }
        match &self.halt {
            Some(BatchHalt::CapReached) => {
                lines.push("  stopped: maximum number of albums per batch reached".to_string())
            }
            Some(BatchHalt::StopRequested) => {
                lines.push("  stopped: interrupted by operator".to_string())
            }
            Some(BatchHalt::CheckpointFailed(e)) => {
                lines.push(format!("  stopped: could not save inventory: {e}"))
            }
            None => {}
        }
        lines
    }
}

/// Runs planned albums against an actuator, strictly one at a time.
pub struct Driver<'a> {
    actuator: &'a mut dyn Actuator,
    pacing: Pacing,
    close_modifier: Modifier,
    stop: StopSignal,
    clock: fn() -> DateTime<Local>,
}

impl<'a> Driver<'a> {
    pub fn new(actuator: &'a mut dyn Actuator, pacing: Pacing, close_modifier: Modifier) -> Self {
        Self {
            actuator,
            pacing,
            close_modifier,
            stop: StopSignal::new(),
            clock: Local::now,
        }
    }

    /// Check `stop` before each item.
    pub fn with_stop_signal(mut self, stop: StopSignal) -> Self {
        self.stop = stop;
        self
    }

    /// Timestamp source for log entries.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Local>) -> Self {
        self.clock = clock;
        self
    }

    /// Execute `plan` against `inventory`.
    ///
    /// At most `max_count` albums are attempted. Each row is re-checked right
    /// before its turn; rows that no longer need the action are skipped.
    /// `checkpoint` is called with the inventory after every completed album.
    pub fn execute(
        &mut self,
        inventory: &mut Inventory,
        plan: &[AlbumRecord],
        targets: &Targets,
        max_count: usize,
        checkpoint: &mut dyn FnMut(&Inventory) -> Result<()>,
    ) -> BatchReport {
        let kind = targets.kind();
        let mut report = BatchReport::default();
        info!(%kind, planned = plan.len(), max_count, "Starting batch");

        for planned in plan {
            if report.attempted() >= max_count {
                info!(%kind, max_count, "Reached maximum number of albums for this batch");
                report.halt = Some(BatchHalt::CapReached);
                break;
            }
            if self.stop.is_requested() {
                warn!(%kind, "Stop requested, ending batch before next album");
                report.halt = Some(BatchHalt::StopRequested);
                break;
            }

            let Some(record) = inventory.get(&planned.id) else {
                warn!(id = %planned.id, "Planned album no longer in inventory, skipping");
                report.skipped.push(planned.id.clone());
                continue;
            };
            if !kind.still_wanted(record) {
                info!(id = %record.id, title = %record.title, "Album no longer needs {kind}, skipping");
                report.skipped.push(record.id.clone());
                continue;
            }
            let record = record.clone();

            match self.run_item(&record, targets) {
                Ok(()) => {
                    if let Some(row) = inventory.get_mut(&record.id) {
                        let now = (self.clock)();
                        match kind {
                            ActionKind::Delete => row.log_deleted(now),
                            ActionKind::Rename => row.log_renamed(now),
                        }
                    }
                    info!(id = %record.id, title = %record.title, "Album {kind} logged");
                    report.completed.push(record.id.clone());

                    if let Err(e) = checkpoint(inventory) {
                        error!(id = %record.id, "Failed to save inventory after {kind}: {}", e);
                        report.halt = Some(BatchHalt::CheckpointFailed(e.to_string()));
                        break;
                    }
                }
                Err(failure) => {
                    error!(
                        id = %failure.album_id,
                        title = %failure.title,
                        stage = %failure.stage,
                        "Album {kind} abandoned: {}",
                        failure.error
                    );
                    report.failed.push(failure);
                }
            }
        }

        info!(
            %kind,
            completed = report.completed.len(),
            failed = report.failed.len(),
            skipped = report.skipped.len(),
            "Batch finished"
        );
        report
    }

    /// Walk one album from `Pending` to `Closed`.
    fn run_item(&mut self, record: &AlbumRecord, targets: &Targets) -> std::result::Result<(), ItemFailure> {
        let kind = targets.kind();
        let mut run = ItemRun::new(kind);
        info!(id = %record.id, title = %record.title, url = %record.url, "Starting album {kind}");

        let fail = |run: &mut ItemRun, error: SweepError| {
            // A finished run cannot be abandoned; report the stage it ended on.
            if let Err(e) = run.abandon() {
                warn!(id = %record.id, "Failure after the album finished: {}", e);
            }
            ItemFailure {
                album_id: record.id.clone(),
                title: record.title.clone(),
                stage: run.failed_at().unwrap_or(run.current_stage()),
                error: error.to_string(),
            }
        };

        for (stage, steps) in build_script(record, targets, &self.pacing, self.close_modifier) {
            for step in &steps {
                if let Err(e) = step.apply(self.actuator) {
                    return Err(fail(&mut run, e));
                }
            }
            if let Err(e) = run.transition_to(stage) {
                return Err(fail(&mut run, e));
            }
        }
        if let Err(e) = run.transition_to(ItemStage::Logged) {
            return Err(fail(&mut run, e));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actuator::DryRunActuator;
    use chrono::TimeZone;
    use std::time::Duration;

    fn fixed_clock() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 1, 10, 22, 3).unwrap()
    }

    fn delete_targets() -> Targets {
        Targets::Delete {
            three_dots: Point::new(1, 1),
            delete_button: Point::new(2, 2),
            confirm_button: Point::new(3, 3),
        }
    }

    fn flagged(id: &str) -> AlbumRecord {
        let mut r = AlbumRecord::new(id, format!("Album {id}"), 0, format!("https://photos/{id}"));
        r.delete_flag = true;
        r
    }

    /// Fails the n-th click (1-based) it receives.
    struct FailingClicks {
        clicks: usize,
        fail_on: Vec<usize>,
    }

    impl Actuator for FailingClicks {
        fn navigate(&mut self, _url: &str) -> Result<()> {
            Ok(())
        }
        fn move_to(&mut self, _point: Point) -> Result<()> {
            Ok(())
        }
        fn click(&mut self, point: Point) -> Result<()> {
            self.clicks += 1;
            if self.fail_on.contains(&self.clicks) {
                return Err(SweepError::actuator(format!("click at {point} failed")));
            }
            Ok(())
        }
        fn key_chord(&mut self, _modifier: Modifier, _key: &str) -> Result<()> {
            Ok(())
        }
        fn type_text(&mut self, _text: &str) -> Result<()> {
            Ok(())
        }
        fn await_next_click(&mut self) -> Result<Point> {
            Ok(Point::new(0, 0))
        }
        fn pause(&mut self, _duration: Duration) {}
    }

    #[test]
    fn test_item_run_is_forward_only() {
        let mut run = ItemRun::new(ActionKind::Delete);
        assert!(run.transition_to(ItemStage::MenuOpened).is_err());
        run.transition_to(ItemStage::Navigated).unwrap();
        assert!(run.transition_to(ItemStage::EditClicked).is_err());
        assert_eq!(run.next_stage(), Some(ItemStage::MenuOpened));
        run.abandon().unwrap();
        assert_eq!(run.failed_at(), Some(ItemStage::Navigated));
        assert!(run.abandon().is_err());
        assert!(run.transition_to(ItemStage::MenuOpened).is_err());
    }

    #[test]
    fn test_abandon_records_stage_only_before_the_end() {
        let mut run = ItemRun::new(ActionKind::Delete);
        run.abandon().unwrap();
        assert_eq!(run.failed_at(), Some(ItemStage::Pending));
        assert_eq!(run.current_stage(), ItemStage::Abandoned);

        let mut finished = ItemRun::new(ActionKind::Delete);
        for stage in &ActionKind::Delete.stages()[1..] {
            finished.transition_to(*stage).unwrap();
        }
        let err = finished.abandon().unwrap_err();
        assert!(matches!(err, SweepError::StageTransition(_)));
        assert_eq!(finished.failed_at(), None);
        assert_eq!(finished.current_stage(), ItemStage::Logged);
    }

    #[test]
    fn test_delete_script_shape() {
        let record = flagged("A");
        let pacing = Pacing {
            page_load: Duration::from_millis(10),
            mouse_move: Duration::from_millis(20),
            mouse_click: Duration::from_millis(30),
        };
        let script = build_script(&record, &delete_targets(), &pacing, Modifier::Ctrl);
        let stages: Vec<ItemStage> = script.iter().map(|(s, _)| *s).collect();
        assert_eq!(
            stages,
            vec![
                ItemStage::Navigated,
                ItemStage::MenuOpened,
                ItemStage::DeleteClicked,
                ItemStage::Confirmed,
                ItemStage::Closed,
            ]
        );
        assert_eq!(
            script[0].1,
            vec![
                ActuatorStep::Navigate("https://photos/A".into()),
                ActuatorStep::Wait(Duration::from_millis(10)),
            ]
        );
        assert_eq!(
            script[3].1,
            vec![
                ActuatorStep::MoveTo(Point::new(3, 3)),
                ActuatorStep::Wait(Duration::from_millis(20)),
                ActuatorStep::Click(Point::new(3, 3)),
                ActuatorStep::Wait(Duration::from_millis(30)),
            ]
        );
    }

    #[test]
    fn test_rename_script_types_new_title() {
        let mut record = AlbumRecord::new("B", "Copy of Trip", 2, "https://photos/B");
        record.proposed_title = "Trip".into();
        let targets = Targets::from_points(
            ActionKind::Rename,
            &[Point::new(1, 1), Point::new(2, 2), Point::new(3, 3), Point::new(4, 4)],
        )
        .unwrap();
        let script = build_script(&record, &targets, &Pacing::default(), Modifier::Ctrl);
        let (stage, steps) = &script[3];
        assert_eq!(*stage, ItemStage::TitleEntered);
        assert!(steps.contains(&ActuatorStep::TypeText("Trip".into())));
        assert_eq!(script.len(), 6);
    }

    #[test]
    fn test_targets_from_points_checks_count() {
        assert!(Targets::from_points(ActionKind::Delete, &[Point::new(1, 1)]).is_err());
    }

    #[test]
    fn test_execute_logs_each_completed_album() {
        let mut inv = Inventory::new();
        inv.insert(flagged("A"));
        inv.insert(flagged("B"));
        let plan = inv.records().to_vec();

        let mut actuator = DryRunActuator::new();
        let mut saves = 0;
        let report = Driver::new(&mut actuator, Pacing::default(), Modifier::Ctrl)
            .with_clock(fixed_clock)
            .execute(&mut inv, &plan, &delete_targets(), 10, &mut |_| {
                saves += 1;
                Ok(())
            });

        assert_eq!(report.completed, vec!["A", "B"]);
        assert_eq!(saves, 2);
        assert_eq!(
            inv.get("A").unwrap().actions_log,
            vec!["Deleted on 2024-03-01 10:22:03".to_string()]
        );
        assert!(report.halt.is_none());
    }

    #[test]
    fn test_failed_item_leaves_row_untouched_and_batch_continues() {
        let mut inv = Inventory::new();
        inv.insert(flagged("A"));
        inv.insert(flagged("B"));
        let plan = inv.records().to_vec();
        let before_a = inv.get("A").unwrap().clone();

        // Third click of album A is the confirm button.
        let mut actuator = FailingClicks { clicks: 0, fail_on: vec![3] };
        let report = Driver::new(&mut actuator, Pacing::default(), Modifier::Ctrl)
            .execute(&mut inv, &plan, &delete_targets(), 10, &mut |_| Ok(()));

        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].album_id, "A");
        assert_eq!(report.failed[0].stage, ItemStage::DeleteClicked);
        assert_eq!(inv.get("A").unwrap(), &before_a);
        assert_eq!(report.completed, vec!["B"]);
    }

    #[test]
    fn test_cap_counts_attempts() {
        let mut inv = Inventory::new();
        for id in ["A", "B", "C"] {
            inv.insert(flagged(id));
        }
        let plan = inv.records().to_vec();
        let mut actuator = FailingClicks { clicks: 0, fail_on: vec![1] };
        let report = Driver::new(&mut actuator, Pacing::default(), Modifier::Ctrl)
            .execute(&mut inv, &plan, &delete_targets(), 2, &mut |_| Ok(()));

        assert_eq!(report.attempted(), 2);
        assert_eq!(report.halt, Some(BatchHalt::CapReached));
        assert!(!inv.get("C").unwrap().is_deleted());
    }

    #[test]
    fn test_stop_signal_ends_batch_between_items() {
        let mut inv = Inventory::new();
        inv.insert(flagged("A"));
        let plan = inv.records().to_vec();
        let stop = StopSignal::new();
        stop.request();

        let mut actuator = DryRunActuator::new();
        let report = Driver::new(&mut actuator, Pacing::default(), Modifier::Ctrl)
            .with_stop_signal(stop)
            .execute(&mut inv, &plan, &delete_targets(), 10, &mut |_| Ok(()));

        assert_eq!(report.halt, Some(BatchHalt::StopRequested));
        assert!(actuator.steps().is_empty());
    }

    #[test]
    fn test_rows_changed_since_planning_are_skipped() {
        let mut inv = Inventory::new();
        inv.insert(flagged("A"));
        inv.insert(flagged("B"));
        let plan = inv.records().to_vec();
        inv.get_mut("A").unwrap().log_deleted(fixed_clock());

        let mut actuator = DryRunActuator::new();
        let report = Driver::new(&mut actuator, Pacing::default(), Modifier::Ctrl)
            .execute(&mut inv, &plan, &delete_targets(), 10, &mut |_| Ok(()));

        assert_eq!(report.skipped, vec!["A"]);
        assert_eq!(report.completed, vec!["B"]);
        assert_eq!(inv.get("A").unwrap().actions_log.len(), 1);
    }

    #[test]
    fn test_checkpoint_failure_halts_batch() {
        let mut inv = Inventory::new();
        inv.insert(flagged("A"));
        inv.insert(flagged("B"));
        let plan = inv.records().to_vec();

        let mut actuator = DryRunActuator::new();
        let report = Driver::new(&mut actuator, Pacing::default(), Modifier::Ctrl)
            .execute(&mut inv, &plan, &delete_targets(), 10, &mut |_| {
                Err(SweepError::store_save("disk full"))
            });

        assert_eq!(report.completed, vec!["A"]);
        assert!(matches!(report.halt, Some(BatchHalt::CheckpointFailed(_))));
    }
}
