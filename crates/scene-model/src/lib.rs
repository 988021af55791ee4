//! TrackDir Scene Model
//!
//! Defines the core data contracts for TrackDir:
//! - **Track:** Per-frame tracked positions and keyframe roles for 2D points
//! - **Scene:** Point groups, cameras, selection, and snapshot persistence
//!
//! Frames are 1-based; frame `N` is the last frame of the active camera.
//! Hosts mark "no tracked data" with the `(-1.0, -1.0)` sentinel pair, which
//! is normalized into [`Position::Invalid`] at the model boundary so that no
//! downstream code ever compares against magic coordinates.

pub mod scene;
pub mod track;

pub use scene::*;
pub use track::*;
