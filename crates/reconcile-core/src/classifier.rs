//! Keyframe-role classification rule sets.
//!
//! One pure function decides the required role of a keyframe under a target
//! tracking direction, given only the current role and whether the
//! neighboring frames carry valid tracked data. The three rule sets share a
//! signature so the mutator stays a single parameterized engine instead of
//! three near-duplicate passes.

use trackdir_scene_model::{FrameNumber, KeyframeStatus, TrackingDirection};

/// Rule set applied during a direction change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ruleset {
    /// Target direction is forward: an end marker belongs on the frame after
    /// which no valid position exists.
    Forward,
    /// Target direction is backward: end markers with data before them are
    /// demoted, isolated regular keyframes become terminal.
    Backward,
    /// Target direction is bidirectional, coming from a backward point:
    /// end markers realign to the forward sense of "terminal".
    Bidirectional,
}

impl From<TrackingDirection> for Ruleset {
    fn from(direction: TrackingDirection) -> Self {
        match direction {
            TrackingDirection::Forward => Ruleset::Forward,
            TrackingDirection::Backward => Ruleset::Backward,
            TrackingDirection::Bidirectional => Ruleset::Bidirectional,
        }
    }
}

/// The required role for one keyframe under `ruleset`.
///
/// `prev_valid` / `next_valid` report whether the neighboring frames carry
/// valid tracked positions; sequence boundaries substitute `false` for the
/// missing neighbor. `KeyframeStatus::None` passes through untouched — the
/// engine never classifies non-keyframe frames.
pub fn classify(
    current: KeyframeStatus,
    prev_valid: bool,
    next_valid: bool,
    ruleset: Ruleset,
) -> KeyframeStatus {
    use KeyframeStatus::{End, None, Regular};

    match ruleset {
        Ruleset::Forward => match current {
            None => None,
            Regular | End => {
                if next_valid {
                    Regular
                } else {
                    End
                }
            }
        },
        Ruleset::Backward => match current {
            // An end marker is invalid once a neighbor precedes it with data.
            End if prev_valid => Regular,
            // An isolated regular keyframe with no continuation either way is
            // terminal for backward playback.
            Regular if !prev_valid && !next_valid => End,
            other => other,
        },
        Ruleset::Bidirectional => match current {
            Regular if !next_valid => End,
            End if next_valid => Regular,
            other => other,
        },
    }
}

/// Outcome of classifying one keyframe; lives only for the duration of one
/// mutator run and is never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationRecord {
    /// Frame the keyframe sits on.
    pub frame: FrameNumber,
    /// Role observed during capture.
    pub original: KeyframeStatus,
    /// Role required under the target rule set.
    pub computed: KeyframeStatus,
}

impl ClassificationRecord {
    /// Whether restoring this record requires a status write.
    pub fn changed(&self) -> bool {
        self.original != self.computed
    }
}
