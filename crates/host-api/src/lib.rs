//! TrackDir host contracts.
//!
//! This crate defines the capability surface the reconciliation engine
//! consumes from a tracking host, without coupling to a concrete host
//! application. The engine only ever talks to [`TrackingHost`], so it runs
//! unchanged against [`SceneHost`] (the in-memory implementation used by the
//! CLI, fixtures, and tests) or against bindings into a real host.
//!
//! Reads are total: anything missing or malformed reads as
//! [`Position::Invalid`] or [`KeyframeStatus::None`]. Writes are fallible
//! and report [`HostError`] for unknown ids or out-of-range frames.

pub mod scene_host;

pub use scene_host::SceneHost;

use trackdir_scene_model::{
    CameraId, FrameNumber, GroupId, KeyframeStatus, PointId, Position, TrackingDirection,
};

/// Errors reported by host write operations.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("unknown point '{0}'")]
    UnknownPoint(PointId),

    #[error("unknown camera '{0}'")]
    UnknownCamera(CameraId),

    #[error("unknown point group '{0}'")]
    UnknownGroup(GroupId),

    #[error("frame {frame} outside [1, {frame_count}]")]
    FrameOutOfRange {
        frame: FrameNumber,
        frame_count: u32,
    },
}

/// Capability surface of a tracking host.
///
/// One invocation of the engine holds exclusive access for its whole
/// duration; the trait therefore has no locking surface.
pub trait TrackingHost {
    /// The active point group, or `None` if the host has no group context.
    fn current_point_group(&self) -> Option<GroupId>;

    /// The active camera, or `None` if the host has no camera context.
    fn current_camera(&self) -> Option<CameraId>;

    /// Selected point ids in selection order; possibly empty.
    fn selected_points(&self, group: &GroupId) -> Vec<PointId>;

    /// Frame count of a camera; 0 when unknown or before footage loads.
    fn frame_count(&self, camera: &CameraId) -> u32;

    /// Tracked position of a point at a frame. Missing points, cameras, or
    /// frame data all read as [`Position::Invalid`].
    fn position(&self, point: &PointId, camera: &CameraId, frame: FrameNumber) -> Position;

    /// Keyframe role of a point at a frame. Missing data reads as
    /// [`KeyframeStatus::None`].
    fn status(&self, point: &PointId, camera: &CameraId, frame: FrameNumber) -> KeyframeStatus;

    /// Write the keyframe role of a point at a frame.
    fn set_status(
        &mut self,
        point: &PointId,
        camera: &CameraId,
        frame: FrameNumber,
        status: KeyframeStatus,
    ) -> Result<(), HostError>;

    /// Tracking direction of a point.
    fn direction(&self, point: &PointId) -> Result<TrackingDirection, HostError>;

    /// Write the tracking direction of a point.
    fn set_direction(
        &mut self,
        point: &PointId,
        direction: TrackingDirection,
    ) -> Result<(), HostError>;

    /// Record a restore point before a batch of mutations.
    fn push_undo_checkpoint(&mut self);

    /// Surface a blocking, user-facing message for fatal pre-flight errors.
    fn notify_user(&mut self, title: &str, message: &str);
}
