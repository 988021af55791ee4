//! Boundary-guarded position sampling.

use trackdir_host_api::TrackingHost;
use trackdir_scene_model::{CameraId, FrameNumber, PointId, Position};

/// Read-only view of one point's positions on one camera timeline.
///
/// Frames outside `[1, frame_count]` read as [`Position::Invalid`] without a
/// host call, so neighbor lookups at the sequence boundary need no special
/// casing: frame 1 always sees an invalid previous frame, frame `N` an
/// invalid next frame.
pub struct PositionSampler<'a, H: TrackingHost + ?Sized> {
    host: &'a H,
    point: &'a PointId,
    camera: &'a CameraId,
    frame_count: u32,
}

impl<'a, H: TrackingHost + ?Sized> PositionSampler<'a, H> {
    pub fn new(host: &'a H, point: &'a PointId, camera: &'a CameraId, frame_count: u32) -> Self {
        Self {
            host,
            point,
            camera,
            frame_count,
        }
    }

    /// Position at `frame`; out-of-range frames are `Invalid`.
    pub fn sample(&self, frame: FrameNumber) -> Position {
        if frame < 1 || frame > self.frame_count {
            return Position::Invalid;
        }
        self.host.position(self.point, self.camera, frame)
    }

    /// Whether `frame` carries valid tracked data.
    pub fn is_valid(&self, frame: FrameNumber) -> bool {
        self.sample(frame).is_valid()
    }

    /// Validity of the two neighbors of `frame` as `(prev, next)`.
    pub fn neighbor_validity(&self, frame: FrameNumber) -> (bool, bool) {
        (
            self.is_valid(frame.saturating_sub(1)),
            self.is_valid(frame.saturating_add(1)),
        )
    }
}
