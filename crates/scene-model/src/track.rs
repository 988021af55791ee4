//! Tracked-point types: positions, keyframe roles, and tracking direction.
//!
//! A tracked point carries one curve per camera timeline: a raw 2D position
//! per frame plus a keyframe role per frame. Both are stored sparsely; a
//! frame without an entry has no tracked data and no keyframe role.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// 1-based frame index within a camera timeline.
pub type FrameNumber = u32;

/// Sentinel pair used by tracking hosts to mark "no data" positions.
pub const INVALID_POSITION_SENTINEL: (f64, f64) = (-1.0, -1.0);

/// Identifier of a tracked point, scoped to its point group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointId(pub String);

/// Identifier of a point group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub String);

/// Identifier of a camera.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CameraId(pub String);

macro_rules! impl_id {
    ($name:ident) => {
        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

impl_id!(PointId);
impl_id!(GroupId);
impl_id!(CameraId);

/// A tracked 2D position for one frame.
///
/// Either fully valid or fully invalid; partial validity (one coordinate
/// only) never occurs. Construct from host data with [`Position::from_host`]
/// so the sentinel pair and non-finite values normalize to `Invalid`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Position {
    /// Tracked data exists at this frame.
    Valid { x: f64, y: f64 },
    /// No tracked data at this frame.
    Invalid,
}

impl Position {
    /// Normalize a raw host coordinate pair.
    ///
    /// The `(-1.0, -1.0)` sentinel and any non-finite coordinate map to
    /// `Invalid`.
    pub fn from_host(x: f64, y: f64) -> Self {
        if (x, y) == INVALID_POSITION_SENTINEL || !x.is_finite() || !y.is_finite() {
            Position::Invalid
        } else {
            Position::Valid { x, y }
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Position::Valid { .. })
    }

    /// Coordinates if valid.
    pub fn xy(&self) -> Option<(f64, f64)> {
        match *self {
            Position::Valid { x, y } => Some((x, y)),
            Position::Invalid => None,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::Invalid
    }
}

/// Keyframe role of a (point, frame) pair.
///
/// `None` frames are not user-authored keyframes and are never touched by
/// the reconciliation engine; only `Regular` and `End` frames are candidates
/// for reclassification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyframeStatus {
    #[default]
    None,
    Regular,
    End,
}

impl KeyframeStatus {
    /// Whether this frame is a user-authored keyframe (`Regular` or `End`).
    pub fn is_keyframe(&self) -> bool {
        !matches!(self, KeyframeStatus::None)
    }
}

impl fmt::Display for KeyframeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            KeyframeStatus::None => "none",
            KeyframeStatus::Regular => "regular",
            KeyframeStatus::End => "end",
        };
        f.write_str(s)
    }
}

/// Temporal tracking direction of a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingDirection {
    #[default]
    Forward,
    Backward,
    Bidirectional,
}

impl fmt::Display for TrackingDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TrackingDirection::Forward => "forward",
            TrackingDirection::Backward => "backward",
            TrackingDirection::Bidirectional => "bidirectional",
        };
        f.write_str(s)
    }
}

impl FromStr for TrackingDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "forward" | "fw" => Ok(TrackingDirection::Forward),
            "backward" | "bw" => Ok(TrackingDirection::Backward),
            "bidirectional" | "bidir" => Ok(TrackingDirection::Bidirectional),
            other => Err(format!(
                "unknown tracking direction '{other}' (expected forward, backward, or bidirectional)"
            )),
        }
    }
}

/// A 2D feature-tracking point with its per-frame curve data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedPoint {
    /// Identifier, unique within the owning point group.
    pub id: PointId,

    /// Human-readable name shown in the host UI.
    pub name: String,

    /// Temporal tracking direction.
    #[serde(default)]
    pub direction: TrackingDirection,

    /// Raw tracked positions keyed by frame. Hosts store the
    /// `(-1.0, -1.0)` sentinel for frames without data; absent entries mean
    /// the same thing.
    #[serde(default)]
    pub positions: BTreeMap<FrameNumber, (f64, f64)>,

    /// Keyframe roles keyed by frame. Absent entries are `None` roles.
    #[serde(default)]
    pub keyframes: BTreeMap<FrameNumber, KeyframeStatus>,
}

impl TrackedPoint {
    /// Create an empty point with no curve data.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: PointId::new(id),
            name: name.into(),
            direction: TrackingDirection::default(),
            positions: BTreeMap::new(),
            keyframes: BTreeMap::new(),
        }
    }

    /// Normalized position at a frame; absent entries read as `Invalid`.
    pub fn position(&self, frame: FrameNumber) -> Position {
        match self.positions.get(&frame) {
            Some(&(x, y)) => Position::from_host(x, y),
            None => Position::Invalid,
        }
    }

    /// Store a raw position pair at a frame.
    pub fn set_position(&mut self, frame: FrameNumber, x: f64, y: f64) {
        self.positions.insert(frame, (x, y));
    }

    /// Mark a frame as having no tracked data.
    pub fn clear_position(&mut self, frame: FrameNumber) {
        self.positions.insert(frame, INVALID_POSITION_SENTINEL);
    }

    /// Keyframe role at a frame; absent entries read as `None`.
    pub fn status(&self, frame: FrameNumber) -> KeyframeStatus {
        self.keyframes.get(&frame).copied().unwrap_or_default()
    }

    /// Set the keyframe role at a frame. Writing `None` removes the entry.
    pub fn set_status(&mut self, frame: FrameNumber, status: KeyframeStatus) {
        if status.is_keyframe() {
            self.keyframes.insert(frame, status);
        } else {
            self.keyframes.remove(&frame);
        }
    }

    /// Number of frames with a `Regular` or `End` role.
    pub fn keyframe_count(&self) -> usize {
        self.keyframes
            .values()
            .filter(|status| status.is_keyframe())
            .count()
    }

    /// Number of frames with a valid tracked position.
    pub fn valid_frame_count(&self) -> usize {
        self.positions
            .iter()
            .filter(|(_, &(x, y))| Position::from_host(x, y).is_valid())
            .count()
    }
}
