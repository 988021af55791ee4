//! Scene snapshot: cameras, point groups, and persistence.
//!
//! A scene is the top-level container the CLI and test fixtures operate on.
//! The reconciliation engine itself never reads or writes snapshots; it only
//! sees the host capability trait.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::track::{CameraId, GroupId, PointId, TrackedPoint};

/// A camera timeline. Frames run `1..=frame_count`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Identifier, unique within the scene.
    pub id: CameraId,

    /// Human-readable name.
    pub name: String,

    /// Number of frames in the footage; 0 before footage is loaded.
    pub frame_count: u32,
}

impl Camera {
    pub fn new(id: impl Into<String>, name: impl Into<String>, frame_count: u32) -> Self {
        Self {
            id: CameraId::new(id),
            name: name.into(),
            frame_count,
        }
    }
}

/// An ordered group of tracked points plus the user's current selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointGroup {
    /// Identifier, unique within the scene.
    pub id: GroupId,

    /// Human-readable name.
    pub name: String,

    /// Points in creation order.
    pub points: Vec<TrackedPoint>,

    /// Selected point ids in selection order.
    #[serde(default)]
    pub selection: Vec<PointId>,
}

impl PointGroup {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: GroupId::new(id),
            name: name.into(),
            points: vec![],
            selection: vec![],
        }
    }

    pub fn point(&self, id: &PointId) -> Option<&TrackedPoint> {
        self.points.iter().find(|p| &p.id == id)
    }

    pub fn point_mut(&mut self, id: &PointId) -> Option<&mut TrackedPoint> {
        self.points.iter_mut().find(|p| &p.id == id)
    }
}

/// Top-level scene snapshot (`scene.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Schema version.
    pub version: String,

    /// Human-readable scene name.
    pub name: String,

    /// Creation timestamp (ISO 8601).
    pub created_at: String,

    /// Last modified timestamp (ISO 8601).
    pub modified_at: String,

    /// Cameras in the scene.
    pub cameras: Vec<Camera>,

    /// Point groups in the scene.
    pub groups: Vec<PointGroup>,

    /// Currently active camera, if any.
    #[serde(default)]
    pub active_camera: Option<CameraId>,

    /// Currently active point group, if any.
    #[serde(default)]
    pub active_group: Option<GroupId>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new(name: impl Into<String>) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            version: "1.0".to_string(),
            name: name.into(),
            created_at: now.clone(),
            modified_at: now,
            cameras: vec![],
            groups: vec![],
            active_camera: None,
            active_group: None,
        }
    }

    pub fn camera(&self, id: &CameraId) -> Option<&Camera> {
        self.cameras.iter().find(|c| &c.id == id)
    }

    pub fn group(&self, id: &GroupId) -> Option<&PointGroup> {
        self.groups.iter().find(|g| &g.id == id)
    }

    pub fn group_mut(&mut self, id: &GroupId) -> Option<&mut PointGroup> {
        self.groups.iter_mut().find(|g| &g.id == id)
    }

    /// The active camera, resolved.
    pub fn active_camera(&self) -> Option<&Camera> {
        self.active_camera.as_ref().and_then(|id| self.camera(id))
    }

    /// The active point group, resolved.
    pub fn active_group(&self) -> Option<&PointGroup> {
        self.active_group.as_ref().and_then(|id| self.group(id))
    }

    /// Load a scene snapshot from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref().to_path_buf();
        let json = std::fs::read_to_string(&path).map_err(|e| SceneError::IoError {
            path: path.clone(),
            source: e,
        })?;
        serde_json::from_str(&json).map_err(|e| SceneError::ParseError { path, source: e })
    }

    /// Save the scene snapshot to a JSON file, stamping `modified_at`.
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<(), SceneError> {
        let path = path.as_ref().to_path_buf();
        self.modified_at = chrono::Utc::now().to_rfc3339();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| SceneError::IoError {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let json =
            serde_json::to_string_pretty(self).map_err(|e| SceneError::ParseError {
                path: path.clone(),
                source: e,
            })?;
        std::fs::write(&path, json).map_err(|e| SceneError::IoError { path, source: e })
    }

    /// Check internal consistency. Returns one message per finding; an empty
    /// list means the scene is consistent.
    pub fn validate(&self) -> Vec<String> {
        let mut findings = vec![];

        if let Some(id) = &self.active_camera {
            if self.camera(id).is_none() {
                findings.push(format!("Active camera '{id}' does not exist"));
            }
        }
        if let Some(id) = &self.active_group {
            if self.group(id).is_none() {
                findings.push(format!("Active point group '{id}' does not exist"));
            }
        }

        let frame_count = self.active_camera().map(|c| c.frame_count);

        for group in &self.groups {
            for selected in &group.selection {
                if group.point(selected).is_none() {
                    findings.push(format!(
                        "Group '{}': selection references unknown point '{selected}'",
                        group.id
                    ));
                }
            }

            for point in &group.points {
                if group.points.iter().filter(|p| p.id == point.id).count() > 1 {
                    findings.push(format!(
                        "Group '{}': duplicate point id '{}'",
                        group.id, point.id
                    ));
                }

                if let Some(n) = frame_count {
                    for &frame in point.keyframes.keys() {
                        if frame < 1 || frame > n {
                            findings.push(format!(
                                "Point '{}': keyframe at frame {frame} outside [1, {n}]",
                                point.id
                            ));
                        }
                    }
                    for &frame in point.positions.keys() {
                        if frame < 1 || frame > n {
                            findings.push(format!(
                                "Point '{}': position at frame {frame} outside [1, {n}]",
                                point.id
                            ));
                        }
                    }
                }

                for (&frame, status) in &point.keyframes {
                    if status.is_keyframe() && !point.position(frame).is_valid() {
                        findings.push(format!(
                            "Point '{}': {status} keyframe at frame {frame} has no valid position",
                            point.id
                        ));
                    }
                }
            }
        }

        findings.sort();
        findings.dedup();
        findings
    }
}

/// Errors that can occur when working with scene snapshots.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid scene: {message}")]
    ValidationError { message: String },
}
