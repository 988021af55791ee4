//! TrackDir Reconcile Core — the direction-change engine.
//!
//! Changes the tracking direction of selected 2D points and reconciles every
//! affected frame's keyframe role in lock-step:
//! - **Sampler:** boundary-guarded position reads and neighbor validity
//! - **Classifier:** pure, per-rule-set reclassification of keyframe roles
//! - **Mutator:** the capture → mutate → restore → verify protocol per point
//! - **Batch:** pre-flight validation and selection-order orchestration
//!
//! This crate is pure orchestration over the [`TrackingHost`] capability
//! trait — no I/O of its own, no platform dependencies. All host access is
//! injected; the whole engine runs unchanged against the in-memory
//! `SceneHost` or bindings into a real tracking application.
//!
//! [`TrackingHost`]: trackdir_host_api::TrackingHost

pub mod batch;
pub mod classifier;
pub mod mutator;
pub mod sampler;

pub use batch::{apply_direction, BatchOptions, BatchReport, PreflightError};
pub use classifier::{classify, ClassificationRecord, Ruleset};
pub use mutator::{DirectionMutator, MutationReport};
pub use sampler::PositionSampler;
