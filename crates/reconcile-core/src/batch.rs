//! Batch orchestration over the current selection.
//!
//! Pre-flight checks run before any mutation; each failure stops the whole
//! batch with a user-facing notification and zero side effects. On success
//! one undo checkpoint covers the entire batch, then points are processed
//! one at a time in selection order. A failure local to one point does not
//! prevent processing of the remaining selection.

use trackdir_host_api::TrackingHost;
use trackdir_scene_model::{CameraId, GroupId, TrackingDirection};

use crate::mutator::{DirectionMutator, MutationReport};

/// Dialog title used for fatal pre-flight notifications.
const PREFLIGHT_TITLE: &str = "Change Tracking Direction";

/// Pre-flight failures; fatal for the whole batch, zero mutation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PreflightError {
    #[error("there is no active point group")]
    NoPointGroup,

    #[error("there is no active camera")]
    NoCamera,

    #[error("no points are selected in group '{0}'")]
    EmptySelection(GroupId),

    #[error("camera '{0}' has no frames")]
    NoFrames(CameraId),
}

/// Options for one batch invocation.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchOptions {
    /// Classify and report only; no direction or role writes, no undo
    /// checkpoint.
    pub dry_run: bool,
}

/// Aggregated outcome of one batch invocation.
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// Target direction of the batch.
    pub target: TrackingDirection,

    /// Points processed to completion.
    pub processed: usize,

    /// Per-point reports in selection order (failed points are absent).
    pub reports: Vec<MutationReport>,

    /// Flat diagnostic list for the caller to display or log.
    pub messages: Vec<String>,
}

impl BatchReport {
    fn new(target: TrackingDirection) -> Self {
        Self {
            target,
            processed: 0,
            reports: vec![],
            messages: vec![],
        }
    }

    pub fn total_status_writes(&self) -> usize {
        self.reports.iter().map(|r| r.status_writes).sum()
    }

    pub fn total_stale_skips(&self) -> usize {
        self.reports.iter().map(|r| r.stale_skips).sum()
    }

    pub fn total_verify_mismatches(&self) -> usize {
        self.reports.iter().map(|r| r.verify_mismatches).sum()
    }
}

/// Change the tracking direction of every selected point in the active
/// group, reconciling keyframe roles per point.
pub fn apply_direction<H: TrackingHost + ?Sized>(
    host: &mut H,
    target: TrackingDirection,
    options: &BatchOptions,
) -> Result<BatchReport, PreflightError> {
    let group = match host.current_point_group() {
        Some(group) => group,
        None => {
            host.notify_user(PREFLIGHT_TITLE, "There is no active point group.");
            return Err(PreflightError::NoPointGroup);
        }
    };

    let camera = match host.current_camera() {
        Some(camera) => camera,
        None => {
            host.notify_user(PREFLIGHT_TITLE, "There is no active camera.");
            return Err(PreflightError::NoCamera);
        }
    };

    let selection = host.selected_points(&group);
    if selection.is_empty() {
        host.notify_user(PREFLIGHT_TITLE, "Please select at least one point.");
        return Err(PreflightError::EmptySelection(group));
    }

    let frame_count = host.frame_count(&camera);
    if frame_count == 0 {
        host.notify_user(PREFLIGHT_TITLE, "The active camera has no frames.");
        return Err(PreflightError::NoFrames(camera));
    }

    tracing::info!(
        %group,
        %camera,
        frame_count,
        selected = selection.len(),
        %target,
        dry_run = options.dry_run,
        "starting direction change"
    );

    let mutator = DirectionMutator::new(camera, frame_count, target);
    let mut report = BatchReport::new(target);

    // One restore point for the whole batch, not per point.
    if !options.dry_run {
        host.push_undo_checkpoint();
    }

    for point in &selection {
        let result = if options.dry_run {
            mutator
                .capture(host, point)
                .map(|records| MutationReport::from_preview(point.clone(), target, &records))
        } else {
            mutator.apply(host, point)
        };

        match result {
            Ok(point_report) => {
                report.messages.push(point_report.summary());
                report.reports.push(point_report);
                report.processed += 1;
            }
            Err(e) => {
                tracing::warn!(%point, error = %e, "skipping point after host failure");
                report
                    .messages
                    .push(format!("point '{point}' failed: {e}"));
            }
        }
    }

    tracing::info!(
        processed = report.processed,
        writes = report.total_status_writes(),
        "direction change complete"
    );
    Ok(report)
}
