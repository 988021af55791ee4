//! In-memory host backed by a [`Scene`] snapshot.

use trackdir_scene_model::{
    CameraId, FrameNumber, GroupId, KeyframeStatus, PointId, Position, Scene, TrackedPoint,
    TrackingDirection,
};

use crate::{HostError, TrackingHost};

/// A [`TrackingHost`] over an owned [`Scene`].
///
/// Undo checkpoints are full scene clones on a stack, and user notifications
/// are recorded instead of shown, so tests can assert on both.
#[derive(Debug, Clone)]
pub struct SceneHost {
    scene: Scene,
    checkpoints: Vec<Scene>,
    notifications: Vec<(String, String)>,
}

impl SceneHost {
    pub fn new(scene: Scene) -> Self {
        Self {
            scene,
            checkpoints: vec![],
            notifications: vec![],
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Consume the host and return the (possibly mutated) scene.
    pub fn into_scene(self) -> Scene {
        self.scene
    }

    /// Notifications surfaced via [`TrackingHost::notify_user`], oldest first.
    pub fn notifications(&self) -> &[(String, String)] {
        &self.notifications
    }

    /// Number of undo checkpoints currently held.
    pub fn undo_depth(&self) -> usize {
        self.checkpoints.len()
    }

    /// Restore the scene to the most recent checkpoint. Returns `false` when
    /// no checkpoint exists.
    pub fn rollback(&mut self) -> bool {
        match self.checkpoints.pop() {
            Some(snapshot) => {
                self.scene = snapshot;
                true
            }
            None => false,
        }
    }

    fn find_point(&self, id: &PointId) -> Option<&TrackedPoint> {
        self.scene.groups.iter().find_map(|group| group.point(id))
    }

    fn find_point_mut(&mut self, id: &PointId) -> Option<&mut TrackedPoint> {
        self.scene
            .groups
            .iter_mut()
            .find_map(|group| group.point_mut(id))
    }
}

impl TrackingHost for SceneHost {
    fn current_point_group(&self) -> Option<GroupId> {
        self.scene
            .active_group()
            .map(|group| group.id.clone())
    }

    fn current_camera(&self) -> Option<CameraId> {
        self.scene.active_camera().map(|camera| camera.id.clone())
    }

    fn selected_points(&self, group: &GroupId) -> Vec<PointId> {
        self.scene
            .group(group)
            .map(|g| g.selection.clone())
            .unwrap_or_default()
    }

    fn frame_count(&self, camera: &CameraId) -> u32 {
        self.scene.camera(camera).map(|c| c.frame_count).unwrap_or(0)
    }

    fn position(&self, point: &PointId, camera: &CameraId, frame: FrameNumber) -> Position {
        if self.scene.camera(camera).is_none() {
            return Position::Invalid;
        }
        self.find_point(point)
            .map(|p| p.position(frame))
            .unwrap_or(Position::Invalid)
    }

    fn status(&self, point: &PointId, camera: &CameraId, frame: FrameNumber) -> KeyframeStatus {
        if self.scene.camera(camera).is_none() {
            return KeyframeStatus::None;
        }
        self.find_point(point)
            .map(|p| p.status(frame))
            .unwrap_or(KeyframeStatus::None)
    }

    fn set_status(
        &mut self,
        point: &PointId,
        camera: &CameraId,
        frame: FrameNumber,
        status: KeyframeStatus,
    ) -> Result<(), HostError> {
        let frame_count = self
            .scene
            .camera(camera)
            .ok_or_else(|| HostError::UnknownCamera(camera.clone()))?
            .frame_count;

        if frame < 1 || frame > frame_count {
            return Err(HostError::FrameOutOfRange { frame, frame_count });
        }

        let target = self
            .find_point_mut(point)
            .ok_or_else(|| HostError::UnknownPoint(point.clone()))?;
        target.set_status(frame, status);
        Ok(())
    }

    fn direction(&self, point: &PointId) -> Result<TrackingDirection, HostError> {
        self.find_point(point)
            .map(|p| p.direction)
            .ok_or_else(|| HostError::UnknownPoint(point.clone()))
    }

    fn set_direction(
        &mut self,
        point: &PointId,
        direction: TrackingDirection,
    ) -> Result<(), HostError> {
        let target = self
            .find_point_mut(point)
            .ok_or_else(|| HostError::UnknownPoint(point.clone()))?;
        target.direction = direction;
        Ok(())
    }

    fn push_undo_checkpoint(&mut self) {
        tracing::debug!(depth = self.checkpoints.len() + 1, "undo checkpoint");
        self.checkpoints.push(self.scene.clone());
    }

    fn notify_user(&mut self, title: &str, message: &str) {
        tracing::warn!(title, "{message}");
        self.notifications.push((title.to_string(), message.to_string()));
    }
}
