//! The per-point direction-change protocol.
//!
//! Four phases, strictly sequential, no re-entry:
//! `CAPTURE → MUTATE_DIRECTION → RESTORE_STATUSES → VERIFY`.
//!
//! Capture fully materializes the classification list before any write is
//! issued. Writing `Regular`/`End` to a frame can change what neighbor
//! validity would report for adjacent frames in a naive re-read, so mutation
//! is never interleaved with the reads that decide what to mutate.

use trackdir_host_api::{HostError, TrackingHost};
use trackdir_scene_model::{
    CameraId, FrameNumber, KeyframeStatus, PointId, TrackingDirection,
};

use crate::classifier::{classify, ClassificationRecord, Ruleset};
use crate::sampler::PositionSampler;

/// Runs the direction-change protocol for one point at a time.
#[derive(Debug, Clone)]
pub struct DirectionMutator {
    camera: CameraId,
    frame_count: u32,
    target: TrackingDirection,
}

/// What one mutator run did to one point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationReport {
    /// The point that was processed.
    pub point: PointId,

    /// Target direction of the run.
    pub target: TrackingDirection,

    /// Whether the direction attribute was actually written (false when the
    /// point already had the target direction).
    pub direction_changed: bool,

    /// Keyframes considered (frames with a `Regular` or `End` role).
    pub candidates: usize,

    /// Records whose computed role differs from the captured one.
    pub reclassified: usize,

    /// Status writes issued during restore.
    pub status_writes: usize,

    /// Records skipped in restore because the frame lost its valid position.
    pub stale_skips: usize,

    /// Written frames whose re-read role matched expectations.
    pub verified: usize,

    /// Written frames whose re-read role did not match. Advisory only.
    pub verify_mismatches: usize,
}

impl MutationReport {
    fn new(point: PointId, target: TrackingDirection) -> Self {
        Self {
            point,
            target,
            direction_changed: false,
            candidates: 0,
            reclassified: 0,
            status_writes: 0,
            stale_skips: 0,
            verified: 0,
            verify_mismatches: 0,
        }
    }

    /// Report for a preview run: classification only, nothing written.
    pub fn from_preview(
        point: PointId,
        target: TrackingDirection,
        records: &[ClassificationRecord],
    ) -> Self {
        let mut report = Self::new(point, target);
        report.candidates = records.len();
        report.reclassified = records.iter().filter(|r| r.changed()).count();
        report
    }

    /// One-line summary for the batch diagnostic list.
    pub fn summary(&self) -> String {
        let mut parts = vec![format!(
            "point '{}': {} keyframes, {} reclassified, {} written",
            self.point, self.candidates, self.reclassified, self.status_writes
        )];
        if self.stale_skips > 0 {
            parts.push(format!("{} stale frames skipped", self.stale_skips));
        }
        if self.verify_mismatches > 0 {
            parts.push(format!("{} verify mismatches", self.verify_mismatches));
        }
        if !self.direction_changed {
            parts.push("direction unchanged".to_string());
        }
        parts.join(", ")
    }
}

impl DirectionMutator {
    pub fn new(camera: CameraId, frame_count: u32, target: TrackingDirection) -> Self {
        Self {
            camera,
            frame_count,
            target,
        }
    }

    /// CAPTURE: classify every keyframe of `point` under the target rule
    /// set. Read-only; the returned list is fully materialized before the
    /// caller issues any write.
    ///
    /// The bidirectional rule set only applies when the point's pre-existing
    /// direction is backward; other transitions into bidirectional produce
    /// identity records.
    pub fn capture<H: TrackingHost + ?Sized>(
        &self,
        host: &H,
        point: &PointId,
    ) -> Result<Vec<ClassificationRecord>, HostError> {
        let current_direction = host.direction(point)?;
        let reclassify = match self.target {
            TrackingDirection::Bidirectional => {
                current_direction == TrackingDirection::Backward
            }
            _ => true,
        };
        let ruleset = Ruleset::from(self.target);
        let sampler = PositionSampler::new(host, point, &self.camera, self.frame_count);

        let mut records = vec![];
        for frame in 1..=self.frame_count {
            let current = host.status(point, &self.camera, frame);
            if !current.is_keyframe() {
                continue;
            }

            let computed = if reclassify {
                let (prev_valid, next_valid) = sampler.neighbor_validity(frame);
                classify(current, prev_valid, next_valid, ruleset)
            } else {
                current
            };

            records.push(ClassificationRecord {
                frame,
                original: current,
                computed,
            });
        }

        tracing::debug!(
            point = %point,
            candidates = records.len(),
            reclassified = records.iter().filter(|r| r.changed()).count(),
            "capture complete"
        );
        Ok(records)
    }

    /// Run the full protocol for one point.
    pub fn apply<H: TrackingHost + ?Sized>(
        &self,
        host: &mut H,
        point: &PointId,
    ) -> Result<MutationReport, HostError> {
        let mut report = MutationReport::new(point.clone(), self.target);

        // CAPTURE
        let records = self.capture(host, point)?;
        report.candidates = records.len();
        report.reclassified = records.iter().filter(|r| r.changed()).count();

        // MUTATE_DIRECTION: write exactly once, only if it differs.
        if host.direction(point)? != self.target {
            host.set_direction(point, self.target)?;
            report.direction_changed = true;
        }

        // RESTORE_STATUSES
        let written = self.restore_statuses(host, point, &records, &mut report)?;

        // VERIFY: advisory, never a precondition for success.
        self.verify(host, point, &written, &mut report);

        Ok(report)
    }

    /// RESTORE: re-check validity per record, then write the computed role
    /// where it differs. Returns the `(frame, role)` pairs actually written.
    fn restore_statuses<H: TrackingHost + ?Sized>(
        &self,
        host: &mut H,
        point: &PointId,
        records: &[ClassificationRecord],
        report: &mut MutationReport,
    ) -> Result<Vec<(FrameNumber, KeyframeStatus)>, HostError> {
        let mut written = vec![];

        for record in records {
            let still_valid = {
                let sampler = PositionSampler::new(host, point, &self.camera, self.frame_count);
                sampler.is_valid(record.frame)
            };
            if !still_valid {
                tracing::warn!(
                    point = %point,
                    frame = record.frame,
                    "frame lost its valid position since capture; skipping role write"
                );
                report.stale_skips += 1;
                continue;
            }

            if record.changed() {
                host.set_status(point, &self.camera, record.frame, record.computed)?;
                report.status_writes += 1;
                written.push((record.frame, record.computed));
            }
        }

        Ok(written)
    }

    /// VERIFY: re-read every written frame and count matches vs mismatches.
    fn verify<H: TrackingHost + ?Sized>(
        &self,
        host: &H,
        point: &PointId,
        written: &[(FrameNumber, KeyframeStatus)],
        report: &mut MutationReport,
    ) {
        for &(frame, expected) in written {
            let actual = host.status(point, &self.camera, frame);
            if actual == expected {
                report.verified += 1;
            } else {
                tracing::warn!(
                    point = %point,
                    frame,
                    %expected,
                    %actual,
                    "role verification mismatch"
                );
                report.verify_mismatches += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trackdir_host_api::SceneHost;
    use trackdir_scene_model::{
        Camera, GroupId, PointGroup, Position, Scene, TrackedPoint,
    };

    /// One camera with `frame_count` frames, one group, one point with valid
    /// positions at `valid_frames` and the given keyframe roles.
    fn build_host(
        frame_count: u32,
        valid_frames: &[FrameNumber],
        roles: &[(FrameNumber, KeyframeStatus)],
        direction: TrackingDirection,
    ) -> SceneHost {
        let mut scene = Scene::new("Mutator");
        scene.cameras.push(Camera::new("cam1", "Plate", frame_count));
        scene.active_camera = Some(CameraId::new("cam1"));

        let mut group = PointGroup::new("grp1", "Group");
        let mut point = TrackedPoint::new("p1", "P1");
        point.direction = direction;
        for &frame in valid_frames {
            point.set_position(frame, 0.1 * frame as f64, 0.5);
        }
        for &(frame, role) in roles {
            point.set_status(frame, role);
        }
        group.selection.push(point.id.clone());
        group.points.push(point);
        scene.groups.push(group);
        scene.active_group = Some(GroupId::new("grp1"));

        SceneHost::new(scene)
    }

    fn mutator(frame_count: u32, target: TrackingDirection) -> DirectionMutator {
        DirectionMutator::new(CameraId::new("cam1"), frame_count, target)
    }

    #[test]
    fn test_forward_promotes_end_with_continuation() {
        let mut host = build_host(
            5,
            &[1, 2, 3, 4, 5],
            &[(3, KeyframeStatus::End)],
            TrackingDirection::Backward,
        );
        let report = mutator(5, TrackingDirection::Forward)
            .apply(&mut host, &PointId::new("p1"))
            .unwrap();

        assert!(report.direction_changed);
        assert_eq!(report.status_writes, 1);
        assert_eq!(report.verified, 1);
        assert_eq!(report.verify_mismatches, 0);
        assert_eq!(
            host.status(&PointId::new("p1"), &CameraId::new("cam1"), 3),
            KeyframeStatus::Regular
        );
    }

    #[test]
    fn test_direction_write_elided_when_already_target() {
        let mut host = build_host(
            5,
            &[1, 2, 3],
            &[(3, KeyframeStatus::End)],
            TrackingDirection::Forward,
        );
        let report = mutator(5, TrackingDirection::Forward)
            .apply(&mut host, &PointId::new("p1"))
            .unwrap();

        assert!(!report.direction_changed);
        // Frame 4 has no data, so the end marker already sits right.
        assert_eq!(report.status_writes, 0);
    }

    #[test]
    fn test_second_run_writes_nothing() {
        let mut host = build_host(
            6,
            &[1, 2, 3, 4],
            &[
                (2, KeyframeStatus::Regular),
                (4, KeyframeStatus::End),
            ],
            TrackingDirection::Forward,
        );
        let point = PointId::new("p1");
        let m = mutator(6, TrackingDirection::Backward);

        let first = m.apply(&mut host, &point).unwrap();
        let second = m.apply(&mut host, &point).unwrap();

        assert_eq!(second.status_writes, 0);
        assert!(!second.direction_changed);
        assert_eq!(second.candidates, first.candidates);
    }

    #[test]
    fn test_bidirectional_guard_skips_non_backward_points() {
        let mut host = build_host(
            6,
            &[1, 2, 3, 4, 5],
            &[(5, KeyframeStatus::Regular)],
            TrackingDirection::Forward,
        );
        let report = mutator(6, TrackingDirection::Bidirectional)
            .apply(&mut host, &PointId::new("p1"))
            .unwrap();

        // Direction still changes; roles do not.
        assert!(report.direction_changed);
        assert_eq!(report.reclassified, 0);
        assert_eq!(report.status_writes, 0);
        assert_eq!(
            host.status(&PointId::new("p1"), &CameraId::new("cam1"), 5),
            KeyframeStatus::Regular
        );
    }

    #[test]
    fn test_preview_reports_without_writing() {
        let host = build_host(
            5,
            &[1, 2, 3, 4, 5],
            &[(3, KeyframeStatus::End)],
            TrackingDirection::Backward,
        );
        let point = PointId::new("p1");
        let m = mutator(5, TrackingDirection::Forward);

        let records = m.capture(&host, &point).unwrap();
        let report = MutationReport::from_preview(point.clone(), TrackingDirection::Forward, &records);

        assert_eq!(report.candidates, 1);
        assert_eq!(report.reclassified, 1);
        assert_eq!(report.status_writes, 0);
        assert_eq!(
            host.status(&point, &CameraId::new("cam1"), 3),
            KeyframeStatus::End
        );
    }

    /// Delegating host that invalidates one frame's position as a side
    /// effect of the direction write, mimicking concurrent invalidation
    /// between capture and restore.
    struct VanishingHost {
        inner: SceneHost,
        vanish_frame: FrameNumber,
    }

    impl TrackingHost for VanishingHost {
        fn current_point_group(&self) -> Option<GroupId> {
            self.inner.current_point_group()
        }
        fn current_camera(&self) -> Option<CameraId> {
            self.inner.current_camera()
        }
        fn selected_points(&self, group: &GroupId) -> Vec<PointId> {
            self.inner.selected_points(group)
        }
        fn frame_count(&self, camera: &CameraId) -> u32 {
            self.inner.frame_count(camera)
        }
        fn position(&self, point: &PointId, camera: &CameraId, frame: FrameNumber) -> Position {
            self.inner.position(point, camera, frame)
        }
        fn status(&self, point: &PointId, camera: &CameraId, frame: FrameNumber) -> KeyframeStatus {
            self.inner.status(point, camera, frame)
        }
        fn set_status(
            &mut self,
            point: &PointId,
            camera: &CameraId,
            frame: FrameNumber,
            status: KeyframeStatus,
        ) -> Result<(), trackdir_host_api::HostError> {
            self.inner.set_status(point, camera, frame, status)
        }
        fn direction(
            &self,
            point: &PointId,
        ) -> Result<TrackingDirection, trackdir_host_api::HostError> {
            self.inner.direction(point)
        }
        fn set_direction(
            &mut self,
            point: &PointId,
            direction: TrackingDirection,
        ) -> Result<(), trackdir_host_api::HostError> {
            let vanish = self.vanish_frame;
            let result = self.inner.set_direction(point, direction);
            if result.is_ok() {
                let mut scene = self.inner.scene().clone();
                scene.groups[0].points[0].clear_position(vanish);
                self.inner = SceneHost::new(scene);
            }
            result
        }
        fn push_undo_checkpoint(&mut self) {
            self.inner.push_undo_checkpoint()
        }
        fn notify_user(&mut self, title: &str, message: &str) {
            self.inner.notify_user(title, message)
        }
    }

    #[test]
    fn test_stale_frame_is_skipped_with_warning_not_error() {
        let inner = build_host(
            5,
            &[1, 2, 3, 4, 5],
            &[(3, KeyframeStatus::End)],
            TrackingDirection::Backward,
        );
        let mut host = VanishingHost {
            inner,
            vanish_frame: 3,
        };

        let report = mutator(5, TrackingDirection::Forward)
            .apply(&mut host, &PointId::new("p1"))
            .unwrap();

        assert_eq!(report.reclassified, 1);
        assert_eq!(report.stale_skips, 1);
        assert_eq!(report.status_writes, 0);
        // The stale frame keeps its captured role.
        assert_eq!(
            host.status(&PointId::new("p1"), &CameraId::new("cam1"), 3),
            KeyframeStatus::End
        );
    }

    /// Delegating host that acknowledges role writes without applying them,
    /// to exercise the advisory verification pass.
    struct StubbornHost {
        inner: SceneHost,
    }

    impl TrackingHost for StubbornHost {
        fn current_point_group(&self) -> Option<GroupId> {
            self.inner.current_point_group()
        }
        fn current_camera(&self) -> Option<CameraId> {
            self.inner.current_camera()
        }
        fn selected_points(&self, group: &GroupId) -> Vec<PointId> {
            self.inner.selected_points(group)
        }
        fn frame_count(&self, camera: &CameraId) -> u32 {
            self.inner.frame_count(camera)
        }
        fn position(&self, point: &PointId, camera: &CameraId, frame: FrameNumber) -> Position {
            self.inner.position(point, camera, frame)
        }
        fn status(&self, point: &PointId, camera: &CameraId, frame: FrameNumber) -> KeyframeStatus {
            self.inner.status(point, camera, frame)
        }
        fn set_status(
            &mut self,
            _point: &PointId,
            _camera: &CameraId,
            _frame: FrameNumber,
            _status: KeyframeStatus,
        ) -> Result<(), trackdir_host_api::HostError> {
            Ok(())
        }
        fn direction(
            &self,
            point: &PointId,
        ) -> Result<TrackingDirection, trackdir_host_api::HostError> {
            self.inner.direction(point)
        }
        fn set_direction(
            &mut self,
            point: &PointId,
            direction: TrackingDirection,
        ) -> Result<(), trackdir_host_api::HostError> {
            self.inner.set_direction(point, direction)
        }
        fn push_undo_checkpoint(&mut self) {
            self.inner.push_undo_checkpoint()
        }
        fn notify_user(&mut self, title: &str, message: &str) {
            self.inner.notify_user(title, message)
        }
    }

    #[test]
    fn test_verify_mismatch_is_counted_not_raised() {
        let inner = build_host(
            5,
            &[1, 2, 3, 4, 5],
            &[(3, KeyframeStatus::End)],
            TrackingDirection::Backward,
        );
        let mut host = StubbornHost { inner };

        let report = mutator(5, TrackingDirection::Forward)
            .apply(&mut host, &PointId::new("p1"))
            .unwrap();

        assert_eq!(report.status_writes, 1);
        assert_eq!(report.verified, 0);
        assert_eq!(report.verify_mismatches, 1);
    }
}
